// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed catalog of structural roles.
//!
//! A [`Role`] is what the classifier assigns to a joint: spine segment,
//! shoulder, finger, and so on. The catalog is fixed; what varies per
//! character archetype is the rule table attached to each role, which lives
//! in a [`Grammar`](crate::grammar::Grammar).

use core::fmt;

use crate::label::JointLabel;
use crate::side::Side;

/// A structural role a joint can play in a skeleton.
///
/// Ordering follows catalog order, so maps keyed by `Role` iterate from the
/// root outward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs, reason = "variant names are the role names")]
pub enum Role {
    Root,
    Spine,
    Appendage,
    Neck,
    Head,
    Jaw,
    Collar,
    Shoulder,
    Elbow,
    Hand,
    IndexFinger,
    MiddleFinger,
    RingFinger,
    PinkyFinger,
    ExtraFinger,
    Thumb,
    Pelvis,
    Tail,
    Hip,
    Knee,
    Ankle,
    Foot,
    IndexToe,
    MiddleToe,
    RingToe,
    PinkyToe,
    ExtraToe,
    BigToe,
    Other,
}

impl Role {
    /// Number of roles in the catalog.
    pub const COUNT: usize = 29;

    /// Every role, in catalog order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Root,
        Self::Spine,
        Self::Appendage,
        Self::Neck,
        Self::Head,
        Self::Jaw,
        Self::Collar,
        Self::Shoulder,
        Self::Elbow,
        Self::Hand,
        Self::IndexFinger,
        Self::MiddleFinger,
        Self::RingFinger,
        Self::PinkyFinger,
        Self::ExtraFinger,
        Self::Thumb,
        Self::Pelvis,
        Self::Tail,
        Self::Hip,
        Self::Knee,
        Self::Ankle,
        Self::Foot,
        Self::IndexToe,
        Self::MiddleToe,
        Self::RingToe,
        Self::PinkyToe,
        Self::ExtraToe,
        Self::BigToe,
        Self::Other,
    ];

    /// Returns the position of this role in [`Role::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the role at `index` in [`Role::ALL`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the short label used as the `<n>` field of generated names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Spine => "Spine",
            Self::Appendage => "Appendage",
            Self::Neck => "Neck",
            Self::Head => "Head",
            Self::Jaw => "Jaw",
            Self::Collar => "Collar",
            Self::Shoulder => "Shoulder",
            Self::Elbow => "Elbow",
            Self::Hand => "Hand",
            Self::IndexFinger => "IndexFinger",
            Self::MiddleFinger => "MiddleFinger",
            Self::RingFinger => "RingFinger",
            Self::PinkyFinger => "PinkyFinger",
            Self::ExtraFinger => "ExtraFinger",
            Self::Thumb => "Thumb",
            Self::Pelvis => "Pelvis",
            Self::Tail => "Tail",
            Self::Hip => "Hip",
            Self::Knee => "Knee",
            Self::Ankle => "Ankle",
            Self::Foot => "Foot",
            Self::IndexToe => "IndexToe",
            Self::MiddleToe => "MiddleToe",
            Self::RingToe => "RingToe",
            Self::PinkyToe => "PinkyToe",
            Self::ExtraToe => "ExtraToe",
            Self::BigToe => "BigToe",
            Self::Other => "Other",
        }
    }

    /// Looks up a role by its short label.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }

    /// Whether this role terminates classification.
    ///
    /// Dead-end roles have the fixed rule "exactly one child, same role":
    /// a chain below a finger stays a finger, and any branching below it is
    /// a structural mismatch.
    #[must_use]
    pub const fn is_dead_end(self) -> bool {
        matches!(
            self,
            Self::Appendage
                | Self::Jaw
                | Self::IndexFinger
                | Self::MiddleFinger
                | Self::RingFinger
                | Self::PinkyFinger
                | Self::ExtraFinger
                | Self::Thumb
                | Self::Tail
                | Self::IndexToe
                | Self::MiddleToe
                | Self::RingToe
                | Self::PinkyToe
                | Self::ExtraToe
                | Self::BigToe
                | Self::Other
        )
    }

    /// Returns the host joint label for a joint with this role on `side`.
    #[must_use]
    pub fn label(self, side: Side) -> JointLabel {
        JointLabel::new(side, self.name())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
