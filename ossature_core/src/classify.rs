// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape-grammar classification.
//!
//! [`Classifier`] walks a joint subtree top-down. At each joint it selects a
//! rule from the joint's role table by child count (see
//! [`rules`](crate::rules) for key priority) and hands each child a role.
//! Children then recurse with their own role's table.
//!
//! ## Resolving a rule
//!
//! - A [`ClassSpec::Broadcast`] gives every child the same role.
//! - A [`ClassSpec::Sequence`] gives child `i` entry `i`. Missing entries
//!   repeat the last resolved role; surplus entries are ignored.
//! - An [`Entry::Nested`] table is applied to its child and yields a single
//!   role: the matched rule's broadcast role, or its first entry, which when
//!   itself nested is applied one level further down (to child 0).
//!
//! ## Sequences and sides
//!
//! A child repeating its parent's role continues the parent's name sequence
//! (`parent + 1`); any other child starts over. Childless joints are
//! *terminal*. Sides are forced by [`ClassifyOptions::side`] or derived from
//! world position.
//!
//! The walk uses an explicit stack and touches nothing: a failure leaves the
//! tree exactly as it was.

use core::hash::Hash;
use std::collections::{BTreeMap, HashMap};

use crate::error::ClassifyError;
use crate::grammar::Grammar;
use crate::role::Role;
use crate::rules::{BranchKind, ClassSpec, Entry, Rule, RuleTable};
use crate::side::{DEFAULT_SIDE_TOLERANCE, FrontAxis, Side};
use crate::trace::{JointClassifiedEvent, PassBeginEvent, PassEndEvent, PassKind, Tracer, count_u32};
#[cfg(feature = "trace-rich")]
use crate::trace::RuleMatchEvent;
use crate::tree::JointTree;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for a classification pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifyOptions {
    /// Axis the character faces; decides which world axis splits left/right.
    pub front: FrontAxis,
    /// Half-width of the center band.
    pub side_tolerance: f64,
    /// Side forced onto every joint instead of deriving it.
    pub side: Option<Side>,
    /// Name sequence of the classification root.
    pub first_name_sequence: u32,
}

impl ClassifyOptions {
    /// Front `z`, default tolerance, derived sides, sequences from 1.
    pub const DEFAULT: Self = Self {
        front: FrontAxis::Z,
        side_tolerance: DEFAULT_SIDE_TOLERANCE,
        side: None,
        first_name_sequence: 1,
    };
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The role and sequence information settled for one joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifiedJoint<I> {
    /// The joint.
    pub joint: I,
    /// Assigned role.
    pub role: Role,
    /// Position within a run of same-role ancestors, starting at 1.
    pub name_sequence: u32,
    /// Whether the joint has no children.
    pub terminal: bool,
    /// Resolved side.
    pub side: Side,
    /// Index of the parent entry, `None` for the classification root.
    pub parent: Option<usize>,
    /// Distance from the classification root.
    pub depth: u32,
    /// Kind of the key that classified this joint's children.
    pub branch: Option<BranchKind>,
}

/// Per-joint results of a pass, in pre-order.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification<I> {
    joints: Vec<ClassifiedJoint<I>>,
}

impl<I: Copy + Eq + Hash> Classification<I> {
    /// All entries in pre-order.
    #[must_use]
    pub fn joints(&self) -> &[ClassifiedJoint<I>] {
        &self.joints
    }

    /// Number of classified joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether nothing was classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Iterates entries in pre-order.
    pub fn iter(&self) -> core::slice::Iter<'_, ClassifiedJoint<I>> {
        self.joints.iter()
    }

    /// Returns the entry for `joint`.
    #[must_use]
    pub fn get(&self, joint: I) -> Option<&ClassifiedJoint<I>> {
        self.joints.iter().find(|c| c.joint == joint)
    }

    /// Returns the role assigned to `joint`.
    #[must_use]
    pub fn role_of(&self, joint: I) -> Option<Role> {
        self.get(joint).map(|c| c.role)
    }

    /// Groups joints by role, each group in pre-order.
    #[must_use]
    pub fn by_role(&self) -> BTreeMap<Role, Vec<I>> {
        let mut map: BTreeMap<Role, Vec<I>> = BTreeMap::new();
        for c in &self.joints {
            map.entry(c.role).or_default().push(c.joint);
        }
        map
    }

    /// Carries this classification over to a structurally identical tree.
    ///
    /// `pairs` maps each classified joint to its counterpart, as returned by
    /// [`JointStore::duplicate_subtree`](crate::joint::JointStore::duplicate_subtree)
    /// or [`pair_subtrees`]. Returns `None` if a joint has no counterpart.
    #[must_use]
    pub fn mirror<J: Copy>(&self, pairs: &[(I, J)]) -> Option<Classification<J>> {
        let lookup: HashMap<I, J> = pairs.iter().copied().collect();
        let joints = self
            .joints
            .iter()
            .map(|c| {
                lookup.get(&c.joint).map(|&joint| ClassifiedJoint {
                    joint,
                    role: c.role,
                    name_sequence: c.name_sequence,
                    terminal: c.terminal,
                    side: c.side,
                    parent: c.parent,
                    depth: c.depth,
                    branch: c.branch,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Classification { joints })
    }
}

impl<'a, I> IntoIterator for &'a Classification<I> {
    type Item = &'a ClassifiedJoint<I>;
    type IntoIter = core::slice::Iter<'a, ClassifiedJoint<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.joints.iter()
    }
}

/// Walks two subtrees in lockstep pre-order and pairs their joints.
///
/// Returns `None` as soon as the shapes differ.
pub fn pair_subtrees<T: JointTree>(tree: &T, a: T::Id, b: T::Id) -> Option<Vec<(T::Id, T::Id)>> {
    let mut pairs = Vec::new();
    let mut stack = vec![(a, b)];
    while let Some((x, y)) = stack.pop() {
        let xs = tree.children_of(x);
        let ys = tree.children_of(y);
        if xs.len() != ys.len() {
            return None;
        }
        pairs.push((x, y));
        stack.extend(xs.into_iter().zip(ys).rev());
    }
    Some(pairs)
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

struct Pending<I> {
    joint: I,
    role: Role,
    parent: Option<usize>,
    depth: u32,
    name_sequence: u32,
}

/// Applies a [`Grammar`] to joint hierarchies.
#[derive(Clone, Copy, Debug)]
pub struct Classifier<'g> {
    grammar: &'g Grammar,
    options: ClassifyOptions,
}

impl<'g> Classifier<'g> {
    /// Creates a classifier over `grammar`.
    #[must_use]
    pub const fn new(grammar: &'g Grammar, options: ClassifyOptions) -> Self {
        Self { grammar, options }
    }

    /// The grammar in use.
    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// The options in use.
    #[must_use]
    pub const fn options(&self) -> &ClassifyOptions {
        &self.options
    }

    /// Classifies the subtree under `root`, which gets `root_role`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if some joint's shape matches no rule of its
    /// role's table.
    pub fn classify<T: JointTree>(
        &self,
        tree: &T,
        root: T::Id,
        root_role: Role,
        tracer: &mut Tracer<'_>,
    ) -> Result<Classification<T::Id>, ClassifyError> {
        self.run(tree, root, root_role, None, tracer)
    }

    /// Like [`classify`](Self::classify), but the root's children are
    /// assigned by `rules` instead of the root role's table.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if some joint's shape matches no rule.
    pub fn classify_with<T: JointTree>(
        &self,
        tree: &T,
        root: T::Id,
        root_role: Role,
        rules: &RuleTable,
        tracer: &mut Tracer<'_>,
    ) -> Result<Classification<T::Id>, ClassifyError> {
        self.run(tree, root, root_role, Some(rules), tracer)
    }

    fn run<T: JointTree>(
        &self,
        tree: &T,
        root: T::Id,
        root_role: Role,
        root_rules: Option<&RuleTable>,
        tracer: &mut Tracer<'_>,
    ) -> Result<Classification<T::Id>, ClassifyError> {
        tracer.pass_begin(&PassBeginEvent {
            pass: PassKind::Classify,
            roots: 1,
        });
        let result = self.walk(tree, root, root_role, root_rules, tracer);
        tracer.pass_end(&PassEndEvent {
            pass: PassKind::Classify,
            joints: result.as_ref().map_or(0, |c| count_u32(c.len())),
            ok: result.is_ok(),
        });
        result
    }

    fn walk<T: JointTree>(
        &self,
        tree: &T,
        root: T::Id,
        root_role: Role,
        root_rules: Option<&RuleTable>,
        tracer: &mut Tracer<'_>,
    ) -> Result<Classification<T::Id>, ClassifyError> {
        let mut joints: Vec<ClassifiedJoint<T::Id>> = Vec::new();
        let mut stack = vec![Pending {
            joint: root,
            role: root_role,
            parent: None,
            depth: 0,
            name_sequence: self.options.first_name_sequence,
        }];

        while let Some(p) = stack.pop() {
            let children = tree.children_of(p.joint);
            let table = match root_rules {
                Some(rules) if p.parent.is_none() => rules,
                _ => self.grammar.rules(p.role),
            };
            let (roles, branch) = if children.is_empty() {
                (Vec::new(), None)
            } else {
                let (roles, kind) = Self::assign(tree, p.joint, p.role, table, tracer)?;
                (roles, Some(kind))
            };

            let side = self.options.side.unwrap_or_else(|| {
                Side::from_position(
                    tree.world_position(p.joint),
                    self.options.front,
                    self.options.side_tolerance,
                )
            });
            let entry = ClassifiedJoint {
                joint: p.joint,
                role: p.role,
                name_sequence: p.name_sequence,
                terminal: children.is_empty(),
                side,
                parent: p.parent,
                depth: p.depth,
                branch,
            };
            tracer.joint_classified(&JointClassifiedEvent {
                order: count_u32(joints.len()),
                depth: p.depth,
                joint: tree.joint_name(p.joint),
                role: p.role,
                name_sequence: p.name_sequence,
                terminal: entry.terminal,
                side,
                child_count: count_u32(children.len()),
                branch,
            });
            let index = joints.len();
            joints.push(entry);

            for (&child, &role) in children.iter().zip(&roles).rev() {
                let name_sequence = if role == p.role {
                    p.name_sequence.saturating_add(1)
                } else {
                    self.options.first_name_sequence
                };
                stack.push(Pending {
                    joint: child,
                    role,
                    parent: Some(index),
                    depth: p.depth.saturating_add(1),
                    name_sequence,
                });
            }
        }

        Ok(Classification { joints })
    }

    /// Resolves the roles of `joint`'s children from `table`.
    fn assign<T: JointTree>(
        tree: &T,
        joint: T::Id,
        owner: Role,
        table: &RuleTable,
        tracer: &mut Tracer<'_>,
    ) -> Result<(Vec<Role>, BranchKind), ClassifyError> {
        let rule = Self::select(tree, joint, owner, table, false, tracer)?;
        let children = tree.children_of(joint);
        let roles = match &rule.spec {
            ClassSpec::Broadcast(role) => vec![*role; children.len()],
            ClassSpec::Sequence(entries) => {
                if entries.is_empty() {
                    return Err(ClassifyError::EmptySequence {
                        joint: tree.joint_name(joint).to_owned(),
                        role: owner,
                    });
                }
                let mut roles = Vec::with_capacity(children.len());
                for (entry, &child) in entries.iter().zip(&children) {
                    roles.push(Self::resolve_entry(tree, child, owner, entry, tracer)?);
                }
                if let Some(&last) = roles.last() {
                    roles.resize(children.len(), last);
                }
                roles
            }
        };
        Ok((roles, rule.key.kind()))
    }

    /// Reduces one sequence entry to a role for `child`.
    fn resolve_entry<T: JointTree>(
        tree: &T,
        child: T::Id,
        owner: Role,
        entry: &Entry,
        tracer: &mut Tracer<'_>,
    ) -> Result<Role, ClassifyError> {
        let mut entry = entry;
        let mut at = child;
        loop {
            let table = match entry {
                Entry::Role(role) => return Ok(*role),
                Entry::Nested(table) => table,
            };
            let rule = Self::select(tree, at, owner, table, true, tracer)?;
            let first = match &rule.spec {
                ClassSpec::Broadcast(role) => return Ok(*role),
                ClassSpec::Sequence(entries) => {
                    entries.first().ok_or_else(|| ClassifyError::EmptySequence {
                        joint: tree.joint_name(at).to_owned(),
                        role: owner,
                    })?
                }
            };
            if matches!(first, Entry::Nested(_)) {
                at = tree.child(at, 0).ok_or_else(|| ClassifyError::MissingChild {
                    joint: tree.joint_name(at).to_owned(),
                    role: owner,
                })?;
            }
            entry = first;
        }
    }

    fn select<'t, T: JointTree>(
        tree: &T,
        joint: T::Id,
        owner: Role,
        table: &'t RuleTable,
        nested: bool,
        tracer: &mut Tracer<'_>,
    ) -> Result<&'t Rule, ClassifyError> {
        let rule = table
            .select(tree, joint)
            .ok_or_else(|| ClassifyError::StructuralMismatch {
                joint: tree.joint_name(joint).to_owned(),
                role: owner,
                child_count: tree.child_count(joint),
            })?;
        #[cfg(feature = "trace-rich")]
        tracer.rule_match(&RuleMatchEvent {
            joint: tree.joint_name(joint),
            owner,
            key: rule.key,
            child_count: count_u32(tree.child_count(joint)),
            nested,
        });
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (nested, &tracer);
        }
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::joint::{JointId, JointStore};
    use crate::rules::Predicate;
    use crate::testing::{biped, chain, joint, named};

    fn polyped_classify(
        store: &JointStore,
        root: JointId,
        role: Role,
    ) -> Result<Classification<JointId>, ClassifyError> {
        let grammar = Grammar::polyped();
        Classifier::new(&grammar, ClassifyOptions::DEFAULT).classify(
            store,
            root,
            role,
            &mut Tracer::none(),
        )
    }

    /// `(name, role, name_sequence, terminal)` in pre-order.
    fn summary(store: &JointStore, c: &Classification<JointId>) -> Vec<(String, Role, u32, bool)> {
        c.iter()
            .map(|j| {
                (
                    store.name(j.joint).to_owned(),
                    j.role,
                    j.name_sequence,
                    j.terminal,
                )
            })
            .collect()
    }

    #[test]
    fn spine_chain_counts_up_to_tip() {
        let mut store = JointStore::new();
        let top = chain(&mut store, &["a", "b", "c"]);
        let c = polyped_classify(&store, top, Role::Spine).unwrap();
        assert_eq!(
            summary(&store, &c),
            [
                ("a".to_owned(), Role::Spine, 1, false),
                ("b".to_owned(), Role::Spine, 2, false),
                ("c".to_owned(), Role::Spine, 3, true),
            ]
        );
        assert!(c.iter().all(|j| j.side == Side::Center));
        assert_eq!(c.joints()[1].parent, Some(0));
        assert_eq!(c.joints()[2].depth, 2);
    }

    #[test]
    fn hand_with_five_children_gets_digits() {
        let mut store = JointStore::new();
        let hand = store.create_joint("hand");
        let mut digits = Vec::new();
        for i in 0..5 {
            let tip = joint(&mut store, Some(hand), &format!("d{i}"), [0.0, 0.0, 0.0]);
            joint(&mut store, Some(tip), &format!("d{i}_end"), [0.0, 0.0, 1.0]);
            digits.push(tip);
        }
        let c = polyped_classify(&store, hand, Role::Hand).unwrap();
        let roles: Vec<_> = digits.iter().map(|&d| c.role_of(d).unwrap()).collect();
        assert_eq!(
            roles,
            [
                Role::MiddleFinger,
                Role::IndexFinger,
                Role::RingFinger,
                Role::PinkyFinger,
                Role::ExtraFinger,
            ]
        );
        assert!(roles.iter().all(|r| r.is_dead_end()));
        // Dead ends carry their role down the chain.
        let end = named(&store, "d3_end");
        assert_eq!(c.get(end).map(|j| (j.role, j.name_sequence)), Some((Role::PinkyFinger, 2)));
        assert_eq!(c.get(hand).unwrap().branch, Some(BranchKind::Wildcard));
    }

    #[test]
    fn wildcard_sequence_pads_with_last_entry() {
        let mut store = JointStore::new();
        let hub = store.create_joint("hub");
        let kids: Vec<_> = (0..5)
            .map(|i| joint(&mut store, Some(hub), &format!("k{i}"), [0.0; 3]))
            .collect();
        let table = RuleTable::new()
            .exact(1, Role::Spine)
            .exact(2, Role::Spine)
            .wildcard(ClassSpec::sequence([Role::Neck, Role::Head, Role::Jaw]));
        let grammar = Grammar::polyped();
        let c = Classifier::new(&grammar, ClassifyOptions::DEFAULT)
            .classify_with(&store, hub, Role::Other, &table, &mut Tracer::none())
            .unwrap();
        let roles: Vec<_> = kids.iter().map(|&k| c.role_of(k).unwrap()).collect();
        assert_eq!(
            roles,
            [Role::Neck, Role::Head, Role::Jaw, Role::Jaw, Role::Jaw]
        );
    }

    #[test]
    fn surplus_entries_are_ignored() {
        let mut store = JointStore::new();
        let hub = store.create_joint("hub");
        let only = joint(&mut store, Some(hub), "only", [0.0; 3]);
        let table = RuleTable::new().wildcard(ClassSpec::sequence([Role::Tail, Role::Hip]));
        let grammar = Grammar::polyped();
        let c = Classifier::new(&grammar, ClassifyOptions::DEFAULT)
            .classify_with(&store, hub, Role::Spine, &table, &mut Tracer::none())
            .unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.role_of(only), Some(Role::Tail));
    }

    #[test]
    fn override_applies_only_to_root_children() {
        let mut store = JointStore::new();
        let top = chain(&mut store, &["a", "b", "c", "d"]);
        let table = RuleTable::new().exact(1, Role::Neck);
        let grammar = Grammar::polyped();
        let c = Classifier::new(&grammar, ClassifyOptions::DEFAULT)
            .classify_with(&store, top, Role::Spine, &table, &mut Tracer::none())
            .unwrap();
        let roles: Vec<_> = c.iter().map(|j| j.role).collect();
        // `c` sits above a leaf, so the neck table reads it as the head.
        assert_eq!(roles, [Role::Spine, Role::Neck, Role::Head, Role::Head]);
    }

    #[test]
    fn biped_roles() {
        let mut store = JointStore::new();
        let root = biped(&mut store);
        let c = polyped_classify(&store, root, Role::Root).unwrap();
        assert_eq!(c.len(), 29);

        let role = |name: &str| c.role_of(named(&store, name)).unwrap();
        let seq = |name: &str| c.get(named(&store, name)).unwrap().name_sequence;
        assert_eq!(role("root"), Role::Root);
        assert_eq!(role("hips"), Role::Pelvis);
        assert_eq!(role("spine_1"), Role::Spine);
        assert_eq!((role("chest"), seq("chest")), (Role::Spine, 3));
        assert_eq!(role("neck_1"), Role::Neck);
        assert_eq!((role("neck_2"), seq("neck_2")), (Role::Neck, 2));
        assert_eq!((role("head"), seq("head")), (Role::Head, 1));
        assert_eq!((role("head_end"), seq("head_end")), (Role::Head, 2));
        assert_eq!(role("collar_l"), Role::Collar);
        assert_eq!(role("shoulder_r"), Role::Shoulder);
        assert_eq!(role("elbow_l"), Role::Elbow);
        assert_eq!(role("hand_r"), Role::Hand);
        assert_eq!((role("hand_l_end"), seq("hand_l_end")), (Role::Hand, 2));
        assert_eq!(role("thumb_l"), Role::Thumb);
        assert_eq!(role("hip_l"), Role::Hip);
        assert_eq!(role("knee_r"), Role::Knee);
        assert_eq!(role("foot_l"), Role::Foot);
        assert_eq!((role("toe_l"), seq("toe_l")), (Role::Foot, 2));

        let side = |name: &str| c.get(named(&store, name)).unwrap().side;
        assert_eq!(side("spine_2"), Side::Center);
        assert_eq!(side("knee_l"), Side::Left);
        assert_eq!(side("thumb_r"), Side::Right);

        let by_role = c.by_role();
        assert_eq!(by_role[&Role::Hip].len(), 2);
        assert_eq!(by_role[&Role::Spine].len(), 3);
        assert!(!by_role.contains_key(&Role::Tail));
    }

    #[test]
    fn pre_order_matches_store_descendants() {
        let mut store = JointStore::new();
        let root = biped(&mut store);
        let c = polyped_classify(&store, root, Role::Root).unwrap();
        let order: Vec<_> = c.iter().map(|j| j.joint).collect();
        let expected: Vec<_> = store.descendants(root).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn reclassification_is_idempotent() {
        let mut store = JointStore::new();
        let root = biped(&mut store);
        let first = polyped_classify(&store, root, Role::Root).unwrap();
        let second = polyped_classify(&store, root, Role::Root).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn structural_mismatch_names_the_joint() {
        let mut store = JointStore::new();
        let chest = store.create_joint("chest");
        for i in 0..5 {
            joint(&mut store, Some(chest), &format!("k{i}"), [0.0; 3]);
        }
        let before: Vec<_> = store.names().map(str::to_owned).collect();
        let err = polyped_classify(&store, chest, Role::Spine).unwrap_err();
        assert_eq!(
            err,
            ClassifyError::StructuralMismatch {
                joint: "chest".to_owned(),
                role: Role::Spine,
                child_count: 5,
            }
        );
        let after: Vec<_> = store.names().map(str::to_owned).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn dead_end_branching_is_a_mismatch() {
        let mut store = JointStore::new();
        let thumb = store.create_joint("thumb");
        joint(&mut store, Some(thumb), "a", [0.0; 3]);
        joint(&mut store, Some(thumb), "b", [0.0; 3]);
        assert!(matches!(
            polyped_classify(&store, thumb, Role::Thumb),
            Err(ClassifyError::StructuralMismatch { role: Role::Thumb, child_count: 2, .. })
        ));
    }

    #[test]
    fn nested_lookup_below_leaf_is_missing_child() {
        let mut store = JointStore::new();
        let hub = store.create_joint("hub");
        joint(&mut store, Some(hub), "leaf", [0.0; 3]);
        let deeper = RuleTable::new().wildcard(Role::Spine);
        let table = RuleTable::new().wildcard(ClassSpec::sequence([
            RuleTable::new().wildcard(ClassSpec::sequence([deeper])),
        ]));
        let grammar = Grammar::polyped();
        let err = Classifier::new(&grammar, ClassifyOptions::DEFAULT)
            .classify_with(&store, hub, Role::Spine, &table, &mut Tracer::none())
            .unwrap_err();
        assert_eq!(
            err,
            ClassifyError::MissingChild {
                joint: "leaf".to_owned(),
                role: Role::Spine,
            }
        );
    }

    #[test]
    fn empty_sequence_is_reported() {
        let mut store = JointStore::new();
        let hub = store.create_joint("hub");
        joint(&mut store, Some(hub), "leaf", [0.0; 3]);
        let table = RuleTable::new().wildcard(ClassSpec::Sequence(Vec::new()));
        let grammar = Grammar::polyped();
        let err = Classifier::new(&grammar, ClassifyOptions::DEFAULT)
            .classify_with(&store, hub, Role::Other, &table, &mut Tracer::none())
            .unwrap_err();
        assert!(matches!(err, ClassifyError::EmptySequence { .. }));
    }

    #[test]
    fn pelvis_lookahead_picks_tail() {
        let mut store = JointStore::new();
        let pelvis = store.create_joint("pelvis");
        let tail = chain(&mut store, &["tail_1", "tail_2"]);
        store.add_child(pelvis, tail);
        joint(&mut store, Some(pelvis), "hip_l", [1.0, 0.0, 0.0]);
        joint(&mut store, Some(pelvis), "hip_r", [-1.0, 0.0, 0.0]);
        let c = polyped_classify(&store, pelvis, Role::Pelvis).unwrap();
        assert_eq!(c.role_of(tail), Some(Role::Tail));
        assert_eq!(c.get(pelvis).unwrap().branch, Some(BranchKind::Exact));
    }

    #[test]
    fn forced_side_and_front_axis() {
        let mut store = JointStore::new();
        let a = joint(&mut store, None, "a", [0.0, 0.0, -2.0]);
        let grammar = Grammar::prop();
        let derived = Classifier::new(
            &grammar,
            ClassifyOptions {
                front: FrontAxis::X,
                ..ClassifyOptions::DEFAULT
            },
        )
        .classify(&store, a, Role::Other, &mut Tracer::none())
        .unwrap();
        assert_eq!(derived.joints()[0].side, Side::Left);

        let forced = Classifier::new(
            &grammar,
            ClassifyOptions {
                side: Some(Side::None),
                ..ClassifyOptions::DEFAULT
            },
        )
        .classify(&store, a, Role::Other, &mut Tracer::none())
        .unwrap();
        assert_eq!(forced.joints()[0].side, Side::None);
    }

    #[test]
    fn mirror_follows_duplicate() {
        let mut store = JointStore::new();
        let root = biped(&mut store);
        let drive = polyped_classify(&store, root, Role::Root).unwrap();
        let pairs = store.duplicate_subtree(root);
        let bind = drive.mirror(&pairs).unwrap();
        assert_eq!(bind.len(), drive.len());
        for (d, b) in drive.iter().zip(&bind) {
            assert_ne!(d.joint, b.joint);
            assert_eq!((d.role, d.name_sequence, d.side), (b.role, b.name_sequence, b.side));
        }
        assert_eq!(pair_subtrees(&store, root, pairs[0].1), Some(pairs));
        assert!(drive.mirror::<JointId>(&[]).is_none());
    }

    #[test]
    fn pair_subtrees_rejects_different_shapes() {
        let mut store = JointStore::new();
        let a = chain(&mut store, &["a1", "a2"]);
        let b = chain(&mut store, &["b1", "b2", "b3"]);
        assert!(pair_subtrees(&store, a, b).is_none());
    }

    proptest! {
        #[test]
        fn wildcard_never_fails(counts in prop::collection::vec(0_usize..6, 1..12)) {
            // Each count is the fan-out of the next joint in a chain.
            let mut store = JointStore::new();
            let root = store.create_joint("root");
            let mut at = root;
            for (i, &n) in counts.iter().enumerate() {
                let mut first = None;
                for k in 0..n {
                    let id = store.create_joint(format!("j{i}_{k}"));
                    store.add_child(at, id);
                    first.get_or_insert(id);
                }
                match first {
                    Some(id) => at = id,
                    None => break,
                }
            }
            let mut grammar = Grammar::polyped();
            let table = RuleTable::new()
                .lookahead(Predicate::lt(2), Role::Tail)
                .wildcard(ClassSpec::sequence([Role::Spine, Role::Neck]));
            grammar.set_rules(Role::Spine, table.clone()).unwrap();
            grammar.set_rules(Role::Neck, table.clone()).unwrap();
            let c = Classifier::new(&grammar, ClassifyOptions::DEFAULT)
                .classify_with(&store, root, Role::Spine, &table, &mut Tracer::none());
            prop_assert!(c.is_ok());
            prop_assert_eq!(c.unwrap().len(), store.joint_count());
        }
    }
}
