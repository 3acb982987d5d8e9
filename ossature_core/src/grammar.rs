// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-archetype rule data.
//!
//! A [`Grammar`] attaches one [`RuleTable`] to every [`Role`]. The built-in
//! archetypes are [`Archetype::Polyped`] (a vertebrate with spine, limbs,
//! digits, and tail) and [`Archetype::Prop`] (an unstructured chain whose
//! joints are all [`Role::Other`]).
//!
//! The polyped grammar, written `count: [child roles]` with nested tables in
//! braces:
//!
//! ```text
//!   Root     1: [{1: Spine, *: Pelvis}]   2: [Spine, Pelvis]
//!   Spine    1: [Spine]   2: [Spine, Appendage]
//!            3: [{~%d<3: Neck, *: Spine}, Limb, Limb]
//!   Limb     1: [{1: [{1: [{2: Collar, *: Hip}], *: Hip}], *: Hip}]   *: Hip
//!   Neck     1: [{1: [{0: Head, 1: Neck}], 2: [Neck, Appendage]}]
//!   Head     1: [Head]   2: [Head, Jaw]
//!   Collar > Shoulder > Elbow > Hand           (1 child each)
//!   Hand     1: [Hand]   2: [Hand, Thumb]   *: [Middle, Index, Ring, Pinky, Extra]
//!   Pelvis   1: [Tail]   2: [Hip, Hip]   3: [{~%d<2: Tail, *: Spine}, Hip, Hip]
//!            4: [Spine, Tail, Hip, Hip]
//!   Hip > Knee > Foot                          (1 child each)
//!   Ankle    1: [Foot]   2: [Foot, BigToe]
//!   Foot     1: [Foot]   2: [Foot, BigToe]   *: [IndexToe .. ExtraToe]
//! ```
//!
//! `Limb` tells an arm from a leg by shape: an arm is four single-child
//! joints down to a hand that carries exactly a digit chain and a thumb.

use crate::error::RuleError;
use crate::role::Role;
use crate::rules::{ClassSpec, Entry, Predicate, RuleTable};
use crate::side::Side;

/// The built-in character archetypes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Spine, head, arms, legs, digits, tail.
    #[default]
    Polyped,
    /// A rigid or chain prop; every joint is [`Role::Other`].
    Prop,
}

impl Archetype {
    /// The role assigned to each selected root.
    #[must_use]
    pub const fn root_role(self) -> Role {
        match self {
            Self::Polyped => Role::Root,
            Self::Prop => Role::Other,
        }
    }

    /// The side forced onto every joint, if the archetype does not derive
    /// sides from position.
    #[must_use]
    pub const fn forced_side(self) -> Option<Side> {
        match self {
            Self::Polyped => None,
            Self::Prop => Some(Side::None),
        }
    }

    /// Builds the archetype's grammar.
    #[must_use]
    pub fn grammar(self) -> Grammar {
        match self {
            Self::Polyped => Grammar::polyped(),
            Self::Prop => Grammar::prop(),
        }
    }
}

/// One rule table per role.
#[derive(Clone, Debug, PartialEq)]
pub struct Grammar {
    tables: Vec<RuleTable>,
}

fn seq<const N: usize>(entries: [Entry; N]) -> ClassSpec {
    ClassSpec::Sequence(entries.into())
}

fn role(role: Role) -> Entry {
    Entry::Role(role)
}

fn nested(table: RuleTable) -> Entry {
    Entry::Nested(table)
}

/// Distinguishes an arm (reaching a two-child hand four joints down) from a
/// leg.
fn limb() -> RuleTable {
    let at_hand = RuleTable::new().exact(2, Role::Collar).wildcard(Role::Hip);
    let at_elbow = RuleTable::new()
        .exact(1, seq([nested(at_hand)]))
        .wildcard(Role::Hip);
    let at_shoulder = RuleTable::new()
        .exact(1, seq([nested(at_elbow)]))
        .wildcard(Role::Hip);
    RuleTable::new()
        .exact(1, seq([nested(at_shoulder)]))
        .wildcard(Role::Hip)
}

fn chain(next: Role) -> RuleTable {
    RuleTable::new().exact(1, next)
}

impl Grammar {
    /// A grammar where every role is a dead end.
    #[must_use]
    pub fn dead_ends() -> Self {
        Self {
            tables: Role::ALL.into_iter().map(RuleTable::dead_end).collect(),
        }
    }

    /// The vertebrate grammar.
    #[must_use]
    pub fn polyped() -> Self {
        let mut grammar = Self::dead_ends();
        let mut set = |r: Role, table: RuleTable| grammar.tables[r.index()] = table;

        set(
            Role::Root,
            RuleTable::new()
                .exact(
                    1,
                    seq([nested(
                        RuleTable::new().exact(1, Role::Spine).wildcard(Role::Pelvis),
                    )]),
                )
                .exact(2, seq([role(Role::Spine), role(Role::Pelvis)])),
        );
        set(
            Role::Spine,
            RuleTable::new()
                .exact(1, Role::Spine)
                .exact(2, seq([role(Role::Spine), role(Role::Appendage)]))
                .exact(
                    3,
                    seq([
                        nested(
                            RuleTable::new()
                                .lookahead(Predicate::lt(3), Role::Neck)
                                .wildcard(Role::Spine),
                        ),
                        nested(limb()),
                        nested(limb()),
                    ]),
                ),
        );
        set(
            Role::Neck,
            RuleTable::new().exact(
                1,
                seq([nested(
                    RuleTable::new()
                        .exact(
                            1,
                            seq([nested(
                                RuleTable::new().exact(0, Role::Head).exact(1, Role::Neck),
                            )]),
                        )
                        .exact(2, seq([role(Role::Neck), role(Role::Appendage)])),
                )]),
            ),
        );
        set(
            Role::Head,
            RuleTable::new()
                .exact(1, Role::Head)
                .exact(2, seq([role(Role::Head), role(Role::Jaw)])),
        );
        set(Role::Collar, chain(Role::Shoulder));
        set(Role::Shoulder, chain(Role::Elbow));
        set(Role::Elbow, chain(Role::Hand));
        set(
            Role::Hand,
            RuleTable::new()
                .exact(1, Role::Hand)
                .exact(2, seq([role(Role::Hand), role(Role::Thumb)]))
                .wildcard(seq([
                    role(Role::MiddleFinger),
                    role(Role::IndexFinger),
                    role(Role::RingFinger),
                    role(Role::PinkyFinger),
                    role(Role::ExtraFinger),
                ])),
        );
        set(
            Role::Pelvis,
            RuleTable::new()
                .exact(1, Role::Tail)
                .exact(2, seq([role(Role::Hip), role(Role::Hip)]))
                .exact(
                    3,
                    seq([
                        nested(
                            RuleTable::new()
                                .lookahead(Predicate::lt(2), Role::Tail)
                                .wildcard(Role::Spine),
                        ),
                        role(Role::Hip),
                        role(Role::Hip),
                    ]),
                )
                .exact(
                    4,
                    seq([
                        role(Role::Spine),
                        role(Role::Tail),
                        role(Role::Hip),
                        role(Role::Hip),
                    ]),
                ),
        );
        set(Role::Hip, chain(Role::Knee));
        set(Role::Knee, chain(Role::Foot));
        set(
            Role::Ankle,
            RuleTable::new()
                .exact(1, Role::Foot)
                .exact(2, seq([role(Role::Foot), role(Role::BigToe)])),
        );
        set(
            Role::Foot,
            RuleTable::new()
                .exact(1, Role::Foot)
                .exact(2, seq([role(Role::Foot), role(Role::BigToe)]))
                .wildcard(seq([
                    role(Role::IndexToe),
                    role(Role::MiddleToe),
                    role(Role::RingToe),
                    role(Role::PinkyToe),
                    role(Role::ExtraToe),
                ])),
        );
        grammar
    }

    /// The prop grammar: a chain of [`Role::Other`].
    #[must_use]
    pub fn prop() -> Self {
        Self::dead_ends()
    }

    /// Returns the rule table for `role`.
    #[must_use]
    pub fn rules(&self, role: Role) -> &RuleTable {
        &self.tables[role.index()]
    }

    /// Replaces the rule table for a non-dead-end role.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DeadEndOverride`] for dead-end roles, whose
    /// single-branch rule is fixed.
    pub fn set_rules(&mut self, role: Role, table: RuleTable) -> Result<(), RuleError> {
        if role.is_dead_end() {
            return Err(RuleError::DeadEndOverride(role));
        }
        self.tables[role.index()] = table;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::BranchKey;

    #[test]
    fn dead_end_roles_keep_fixed_tables() {
        let grammar = Grammar::polyped();
        for r in Role::ALL.into_iter().filter(|r| r.is_dead_end()) {
            assert_eq!(grammar.rules(r), &RuleTable::dead_end(r), "{r}");
        }
    }

    #[test]
    fn hand_has_digit_wildcard() {
        let grammar = Grammar::polyped();
        let hand = grammar.rules(Role::Hand);
        assert!(hand.has_wildcard());
        assert_eq!(hand.rules()[0].key, BranchKey::Exact(1));
    }

    #[test]
    fn set_rules_rejects_dead_ends() {
        let mut grammar = Grammar::polyped();
        assert_eq!(
            grammar.set_rules(Role::Thumb, RuleTable::new().wildcard(Role::Thumb)),
            Err(RuleError::DeadEndOverride(Role::Thumb))
        );
        let tail_spine = RuleTable::new().wildcard(Role::Spine);
        assert_eq!(grammar.set_rules(Role::Pelvis, tail_spine.clone()), Ok(()));
        assert_eq!(grammar.rules(Role::Pelvis), &tail_spine);
    }

    #[test]
    fn archetype_defaults() {
        assert_eq!(Archetype::Polyped.root_role(), Role::Root);
        assert_eq!(Archetype::Prop.root_role(), Role::Other);
        assert_eq!(Archetype::Prop.forced_side(), Some(Side::None));
        assert_eq!(Archetype::Prop.grammar(), Grammar::prop());
    }
}
