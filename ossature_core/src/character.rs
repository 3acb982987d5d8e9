// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character assembly: classify, plan names, duplicate, commit.
//!
//! [`Character::build`] turns a selection of joints into a rigged character:
//!
//! 1. **Classify** each selected skeleton (the *drive chain*) once.
//! 2. **Plan** every name up front: drive and bind names per joint, with the
//!    side sequence bumped until both are free, the names of bind joints to
//!    insert along bones, and parent-constraint names.
//! 3. **Commit**: duplicate each drive skeleton into a *bind chain* (the
//!    classification is carried over through the lockstep pairs the
//!    duplication returns), set bone radii, give every participating joint a throwaway
//!    placeholder name, apply the planned names, labels, and colors, and
//!    insert the extra bind joints.
//!
//! Anything that can fail does so during steps 1 and 2, before the store is
//! touched. The one exception is a bind copy that does not line up with its
//! classification; its copies are destroyed before the error is returned.

use std::collections::{BTreeMap, HashSet};

use crate::bones::{BoneLengthRange, BoneRadius, apply_subtree_radii};
use crate::classify::{Classification, ClassifiedJoint, Classifier, ClassifyOptions};
use crate::error::{NamingError, RigError};
use crate::grammar::{Archetype, Grammar};
use crate::joint::{JointId, JointStore};
use crate::naming::{DEFAULT_PATTERN, FieldKey, FieldValue, Fields, NamingSpec, NodeType, TIP};
use crate::role::Role;
use crate::side::{DEFAULT_SIDE_TOLERANCE, FrontAxis, Side};
use crate::trace::{
    JointInsertedEvent, NameAssignedEvent, NameCollisionEvent, PassBeginEvent, PassEndEvent,
    PassKind, PassSummary, PassSummaryBuilder, Tracer, count_u32,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Everything [`Character::build`] needs besides the joints.
#[derive(Clone, Debug)]
pub struct CharacterConfig {
    /// Rule tables per role.
    pub grammar: Grammar,
    /// Role given to each selected root.
    pub root_role: Role,
    /// Naming pattern.
    pub pattern: String,
    /// `<nt>` of drive joints.
    pub drive_type: NodeType,
    /// `<nt>` of bind joints.
    pub bind_type: NodeType,
    /// `<nt>` of the parent constraints tying bind joints to drive joints.
    pub constraint_type: NodeType,
    /// Axis the character faces.
    pub front: FrontAxis,
    /// Half-width of the center band.
    pub side_tolerance: f64,
    /// Side forced onto every joint.
    pub side: Option<Side>,
    /// Prefix of the temporary names applied before final naming.
    pub placeholder: String,
    /// Highest side sequence tried before giving up.
    pub max_side_sequence: u32,
    /// Set host joint labels.
    pub label_joints: bool,
    /// Color joints by side.
    pub colorize: bool,
    /// Bone radius mode, or `None` to leave radii alone.
    pub bone_radius: Option<BoneRadius>,
    /// Bind joints to insert along each bone of a role.
    pub insertions: Vec<(Role, usize)>,
}

impl CharacterConfig {
    /// Defaults for `archetype`, with no bind-joint insertions.
    #[must_use]
    pub fn for_archetype(archetype: Archetype) -> Self {
        Self {
            grammar: archetype.grammar(),
            root_role: archetype.root_role(),
            pattern: DEFAULT_PATTERN.to_owned(),
            drive_type: NodeType::DriveJoint,
            bind_type: NodeType::BindJoint,
            constraint_type: NodeType::ParentConstraint,
            front: FrontAxis::Z,
            side_tolerance: DEFAULT_SIDE_TOLERANCE,
            side: archetype.forced_side(),
            placeholder: "FooJoint".to_owned(),
            max_side_sequence: 99,
            label_joints: true,
            colorize: true,
            bone_radius: Some(BoneRadius::DEFAULT),
            insertions: Vec::new(),
        }
    }

    /// A polyped with three extra forearm bind joints.
    #[must_use]
    pub fn polyped() -> Self {
        Self {
            insertions: vec![
                (Role::Shoulder, 0),
                (Role::Elbow, 3),
                (Role::Hip, 0),
                (Role::Knee, 0),
            ],
            ..Self::for_archetype(Archetype::Polyped)
        }
    }

    /// A sideless prop chain.
    #[must_use]
    pub fn prop() -> Self {
        Self::for_archetype(Archetype::Prop)
    }

    fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            front: self.front,
            side_tolerance: self.side_tolerance,
            side: self.side,
            ..ClassifyOptions::DEFAULT
        }
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self::polyped()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One drive/bind pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RigJoint {
    /// Joint in the drive chain.
    pub drive: JointId,
    /// Its counterpart in the bind chain.
    pub bind: JointId,
    /// Shared role.
    pub role: Role,
    /// Shared side.
    pub side: Side,
    /// Side sequence that made the names unique.
    pub side_sequence: u32,
    /// Name sequence within the role run.
    pub name_sequence: u32,
    /// Whether the joint has no children.
    pub terminal: bool,
    /// Final drive name.
    pub drive_name: String,
    /// Final bind name.
    pub bind_name: String,
}

/// A bind joint added along a bone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertedJoint {
    /// The new joint.
    pub joint: JointId,
    /// The bind joint whose bone was split.
    pub above: JointId,
    /// Role shared with `above`.
    pub role: Role,
    /// Name sequence continuing from `above`.
    pub name_sequence: u32,
    /// Assigned name.
    pub name: String,
}

/// A named parent constraint from a drive joint to its bind joint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintPlan {
    /// Driving joint.
    pub driver: JointId,
    /// Driven joint.
    pub driven: JointId,
    /// Constraint name.
    pub name: String,
}

/// A rigged character.
#[derive(Debug)]
pub struct Character {
    front: FrontAxis,
    naming: NamingSpec,
    roots: Vec<JointId>,
    bind_roots: Vec<JointId>,
    joints: Vec<RigJoint>,
    inserted: Vec<InsertedJoint>,
    constraints: Vec<ConstraintPlan>,
    drive: BTreeMap<Role, Vec<JointId>>,
    bind: BTreeMap<Role, Vec<JointId>>,
    summary: PassSummary,
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

struct PlannedJoint {
    classified: ClassifiedJoint<JointId>,
    side_sequence: u32,
    drive_name: String,
    bind_name: String,
}

struct PlannedInsert {
    at: usize,
    role: Role,
    names: Vec<(u32, String)>,
}

fn sequence_value(c: &ClassifiedJoint<JointId>) -> FieldValue {
    if c.terminal {
        FieldValue::from(TIP)
    } else {
        FieldValue::Int(c.name_sequence)
    }
}

fn base_fields(c: &ClassifiedJoint<JointId>, side_sequence: u32) -> Fields {
    Fields::new()
        .with(FieldKey::Side, c.side.code())
        .with(FieldKey::SideSequence, side_sequence)
        .with(FieldKey::Name, c.role.name())
        .with(FieldKey::NameSequence, sequence_value(c))
}

fn typed(fields: &Fields, node_type: NodeType) -> Fields {
    fields.clone().with(FieldKey::NodeType, node_type.code())
}

impl Character {
    /// Rigs the skeletons containing `selection`.
    ///
    /// Every skeleton root reachable from the selection is classified and
    /// named; nothing in `store` changes unless the whole build succeeds.
    ///
    /// # Errors
    ///
    /// - [`RigError::EmptySelection`] if `selection` is empty.
    /// - [`RigError::Classify`] if a skeleton matches no rule.
    /// - [`RigError::Naming`] if the pattern is invalid, a name cannot be
    ///   rendered, or the side sequence runs out.
    /// - [`RigError::NameCollision`] if an inserted bind joint's name is taken.
    ///
    /// # Panics
    ///
    /// Panics if a selected handle is stale.
    pub fn build(
        store: &mut JointStore,
        selection: &[JointId],
        config: &CharacterConfig,
        tracer: &mut Tracer<'_>,
    ) -> Result<Self, RigError> {
        if selection.is_empty() {
            return Err(RigError::EmptySelection);
        }
        let naming = NamingSpec::compile(&config.pattern)?;
        if config.drive_type == config.bind_type || !naming.uses(FieldKey::NodeType) {
            return Err(NamingError::IndistinctJointTypes(config.pattern.clone()).into());
        }
        let roots = store.roots_of(selection);
        let mut summary = PassSummaryBuilder::new(roots.len());

        // -- Classify --
        let classifier = Classifier::new(&config.grammar, config.classify_options());
        let mut classifications = Vec::with_capacity(roots.len());
        for &root in &roots {
            classifications.push(classifier.classify(&*store, root, config.root_role, tracer)?);
        }
        let classified = classifications
            .iter()
            .flat_map(|c| c.iter().copied())
            .collect();

        // -- Plan --
        tracer.pass_begin(&PassBeginEvent {
            pass: PassKind::Plan,
            roots: count_u32(roots.len()),
        });
        let planned = Self::plan(store, &roots, classified, &naming, config, tracer, &mut summary);
        tracer.pass_end(&PassEndEvent {
            pass: PassKind::Plan,
            joints: planned.as_ref().map_or(0, |(p, _)| count_u32(p.len())),
            ok: planned.is_ok(),
        });
        let (planned, inserts) = planned?;

        let constraints: Vec<String> = planned
            .iter()
            .map(|p| {
                naming.format(&typed(
                    &base_fields(&p.classified, p.side_sequence),
                    config.constraint_type,
                ))
            })
            .collect::<Result<_, _>>()?;

        // -- Commit --
        tracer.pass_begin(&PassBeginEvent {
            pass: PassKind::Commit,
            roots: count_u32(roots.len()),
        });
        let range = BoneLengthRange::measure(store, &roots);
        let bound = Self::duplicate(store, &roots, &classifications);
        if bound.is_err() {
            tracer.pass_end(&PassEndEvent {
                pass: PassKind::Commit,
                joints: 0,
                ok: false,
            });
        }
        let (bind_roots, bind_ids) = bound?;
        if let (Some(mode), Some(range)) = (config.bone_radius, range) {
            for &root in roots.iter().chain(&bind_roots) {
                apply_subtree_radii(store, root, mode, range);
            }
        }

        let mut placeholder = 1_u32;
        for &joint in planned.iter().map(|p| &p.classified.joint).chain(&bind_ids) {
            let name = loop {
                let candidate = format!("{}{placeholder}", config.placeholder);
                placeholder += 1;
                if store.count_named(&candidate) == 0 {
                    break candidate;
                }
            };
            store.set_name(joint, name);
        }

        let mut joints = Vec::with_capacity(planned.len());
        let mut drive: BTreeMap<Role, Vec<JointId>> = BTreeMap::new();
        let mut bind: BTreeMap<Role, Vec<JointId>> = BTreeMap::new();
        let mut constraint_plans = Vec::with_capacity(planned.len());
        for ((p, &bind_id), constraint) in planned.into_iter().zip(&bind_ids).zip(constraints) {
            let c = p.classified;
            store.set_name(c.joint, p.drive_name.clone());
            store.set_name(bind_id, p.bind_name.clone());
            for id in [c.joint, bind_id] {
                Self::decorate(store, id, c.role, c.side, config);
            }
            drive.entry(c.role).or_default().push(c.joint);
            bind.entry(c.role).or_default().push(bind_id);
            constraint_plans.push(ConstraintPlan {
                driver: c.joint,
                driven: bind_id,
                name: constraint,
            });
            summary.constraint();
            joints.push(RigJoint {
                drive: c.joint,
                bind: bind_id,
                role: c.role,
                side: c.side,
                side_sequence: p.side_sequence,
                name_sequence: c.name_sequence,
                terminal: c.terminal,
                drive_name: p.drive_name,
                bind_name: p.bind_name,
            });
        }

        let mut inserted = Vec::new();
        for insert in inserts {
            let rig = &joints[insert.at];
            let Some(child) = store.children(rig.bind).next() else {
                continue;
            };
            let new = store.split_bone(child, insert.names.len());
            for (joint, (name_sequence, name)) in new.into_iter().zip(insert.names) {
                store.set_name(joint, name.clone());
                Self::decorate(store, joint, insert.role, rig.side, config);
                tracer.joint_inserted(&JointInsertedEvent {
                    parent: &rig.bind_name,
                    name: &name,
                    role: insert.role,
                });
                summary.inserted();
                bind.entry(insert.role).or_default().push(joint);
                inserted.push(InsertedJoint {
                    joint,
                    above: rig.bind,
                    role: insert.role,
                    name_sequence,
                    name,
                });
            }
            if let (Some(mode), Some(range)) = (config.bone_radius, range) {
                apply_subtree_radii(store, rig.bind, mode, range);
            }
        }

        tracer.pass_end(&PassEndEvent {
            pass: PassKind::Commit,
            joints: count_u32(joints.len() + inserted.len()),
            ok: true,
        });
        let summary = summary.finish();
        tracer.pass_summary(&summary);

        Ok(Self {
            front: config.front,
            naming,
            roots,
            bind_roots,
            joints,
            inserted,
            constraints: constraint_plans,
            drive,
            bind,
            summary,
        })
    }

    /// Copies each drive skeleton and carries its classification over to the
    /// copy through the lockstep pairs.
    ///
    /// Returns the bind roots and, in classification order, the bind joint of
    /// every classified drive joint. If a copy does not line up with its
    /// classification, every copy made so far is destroyed again.
    fn duplicate(
        store: &mut JointStore,
        roots: &[JointId],
        classifications: &[Classification<JointId>],
    ) -> Result<(Vec<JointId>, Vec<JointId>), RigError> {
        let mut copies: Vec<JointId> = Vec::new();
        let mut bind_roots = Vec::with_capacity(roots.len());
        let mut bind_ids = Vec::new();
        for (&root, classification) in roots.iter().zip(classifications) {
            let pairs = store.duplicate_subtree(root);
            copies.extend(pairs.iter().map(|&(_, copy)| copy));
            let Some(mirrored) = classification.mirror(&pairs) else {
                // Pre-order reversed: children go before their parents.
                for &copy in copies.iter().rev() {
                    store.destroy_joint(copy);
                }
                return Err(RigError::BindMismatch(store.name(root).to_owned()));
            };
            bind_roots.extend(pairs.first().map(|&(_, copy)| copy));
            bind_ids.extend(mirrored.iter().map(|c| c.joint));
        }
        Ok((bind_roots, bind_ids))
    }

    /// Computes every final name without touching the store.
    fn plan(
        store: &JointStore,
        roots: &[JointId],
        classified: Vec<ClassifiedJoint<JointId>>,
        naming: &NamingSpec,
        config: &CharacterConfig,
        tracer: &mut Tracer<'_>,
        summary: &mut PassSummaryBuilder,
    ) -> Result<(Vec<PlannedJoint>, Vec<PlannedInsert>), RigError> {
        let participating: HashSet<JointId> = roots
            .iter()
            .flat_map(|&root| store.descendants(root))
            .collect();
        let mut used: HashSet<String> = HashSet::new();
        for top in store.roots() {
            used.extend(
                store
                    .descendants(top)
                    .filter(|j| !participating.contains(j))
                    .map(|j| store.name(j).to_owned()),
            );
        }

        let mut planned = Vec::with_capacity(classified.len());
        for (order, c) in classified.into_iter().enumerate() {
            summary.joint(c.depth);
            let mut side_sequence = 1;
            let mut attempts = 0;
            let (drive_name, bind_name) = loop {
                attempts += 1;
                let fields = base_fields(&c, side_sequence);
                let drive_name = naming.format(&typed(&fields, config.drive_type))?;
                let bind_name = naming.format(&typed(&fields, config.bind_type))?;
                let taken = [&drive_name, &bind_name]
                    .into_iter()
                    .find(|name| used.contains(name.as_str()));
                let Some(taken) = taken else {
                    break (drive_name, bind_name);
                };
                tracer.name_collision(&NameCollisionEvent {
                    order: count_u32(order),
                    candidate: taken,
                    side_sequence,
                });
                summary.collision();
                if side_sequence >= config.max_side_sequence {
                    return Err(NamingError::SequenceExhausted {
                        name: drive_name,
                        ceiling: config.max_side_sequence,
                    }
                    .into());
                }
                side_sequence += 1;
            };
            tracer.name_assigned(&NameAssignedEvent {
                order: count_u32(order),
                drive: &drive_name,
                bind: &bind_name,
                side_sequence,
                attempts,
            });
            used.insert(drive_name.clone());
            used.insert(bind_name.clone());
            planned.push(PlannedJoint {
                classified: c,
                side_sequence,
                drive_name,
                bind_name,
            });
        }

        let mut inserts = Vec::new();
        for &(role, count) in config.insertions.iter().filter(|(_, n)| *n > 0) {
            for (at, p) in planned.iter().enumerate() {
                let c = &p.classified;
                if c.role != role || c.terminal {
                    continue;
                }
                let mut names = Vec::with_capacity(count);
                for k in 1..=count {
                    let name_sequence = c.name_sequence.saturating_add(count_u32(k));
                    let fields = base_fields(c, p.side_sequence)
                        .with(FieldKey::NameSequence, name_sequence);
                    let name = naming.format(&typed(&fields, config.bind_type))?;
                    if !used.insert(name.clone()) {
                        return Err(RigError::NameCollision(name));
                    }
                    names.push((name_sequence, name));
                }
                inserts.push(PlannedInsert { at, role, names });
            }
        }
        Ok((planned, inserts))
    }

    fn decorate(
        store: &mut JointStore,
        joint: JointId,
        role: Role,
        side: Side,
        config: &CharacterConfig,
    ) {
        if config.label_joints {
            store.set_label(joint, Some(role.label(side)));
        }
        if config.colorize {
            store.set_color(joint, Some(side.color_index()));
        }
    }

    // -- Accessors --

    /// The axis the character faces.
    #[must_use]
    pub fn front(&self) -> FrontAxis {
        self.front
    }

    /// The naming convention used.
    #[must_use]
    pub fn naming(&self) -> &NamingSpec {
        &self.naming
    }

    /// Drive-chain roots, in selection order.
    #[must_use]
    pub fn roots(&self) -> &[JointId] {
        &self.roots
    }

    /// Bind-chain roots, parallel to [`roots`](Self::roots).
    #[must_use]
    pub fn bind_roots(&self) -> &[JointId] {
        &self.bind_roots
    }

    /// Drive/bind pairs in classification order.
    #[must_use]
    pub fn joints(&self) -> &[RigJoint] {
        &self.joints
    }

    /// Bind joints inserted along bones.
    #[must_use]
    pub fn inserted(&self) -> &[InsertedJoint] {
        &self.inserted
    }

    /// One parent constraint per drive/bind pair.
    #[must_use]
    pub fn constraints(&self) -> &[ConstraintPlan] {
        &self.constraints
    }

    /// Drive joints grouped by role.
    #[must_use]
    pub fn drive_joints(&self) -> &BTreeMap<Role, Vec<JointId>> {
        &self.drive
    }

    /// Bind joints grouped by role, inserted joints last.
    #[must_use]
    pub fn bind_joints(&self) -> &BTreeMap<Role, Vec<JointId>> {
        &self.bind
    }

    /// Tally of the build.
    #[must_use]
    pub fn summary(&self) -> &PassSummary {
        &self.summary
    }

    /// Returns the pair whose drive or bind joint is `joint`.
    #[must_use]
    pub fn find(&self, joint: JointId) -> Option<&RigJoint> {
        self.joints
            .iter()
            .find(|j| j.drive == joint || j.bind == joint)
    }
}
