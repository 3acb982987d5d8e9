// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bone display radii.
//!
//! A bone runs from a joint to its first child. In [`BoneRadius::Varying`]
//! mode each joint's radius is interpolated between the short and long radius
//! by where its bone length falls in the skeleton's [`BoneLengthRange`];
//! childless joints get the tip radius.

use crate::joint::{JointId, JointStore};

/// How bone radii are chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoneRadius {
    /// Interpolate by bone length.
    Varying {
        /// Radius of the shortest bone.
        short: f64,
        /// Radius of the longest bone.
        long: f64,
        /// Radius of childless joints.
        tip: f64,
    },
    /// One radius for every bone.
    Fixed {
        /// Radius of joints with children.
        radius: f64,
        /// Radius of childless joints.
        tip: f64,
    },
}

impl BoneRadius {
    /// Varying from 0.5 to 2.0, tips 0.25.
    pub const DEFAULT: Self = Self::Varying {
        short: 0.5,
        long: 2.0,
        tip: 0.25,
    };

    /// Radius for a bone of `length`.
    #[must_use]
    pub fn radius_for(self, length: f64, range: BoneLengthRange) -> f64 {
        match self {
            Self::Fixed { radius, .. } => radius,
            Self::Varying { short, long, .. } => {
                let span = range.long - range.short;
                if span <= f64::EPSILON {
                    short
                } else {
                    short + (length - range.short) / span * (long - short)
                }
            }
        }
    }

    /// Radius of childless joints.
    #[must_use]
    pub const fn tip(self) -> f64 {
        match self {
            Self::Varying { tip, .. } | Self::Fixed { tip, .. } => tip,
        }
    }
}

impl Default for BoneRadius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Shortest and longest parent-to-child distance in a set of skeletons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneLengthRange {
    /// Shortest distance.
    pub short: f64,
    /// Longest distance.
    pub long: f64,
}

impl BoneLengthRange {
    /// Measures every parent-to-child distance under `roots`.
    ///
    /// Returns `None` when the skeletons have no bones at all.
    #[must_use]
    pub fn measure(store: &JointStore, roots: &[JointId]) -> Option<Self> {
        let mut range: Option<Self> = None;
        for &root in roots {
            for joint in store.descendants(root) {
                let from = store.world_position(joint);
                for child in store.children(joint) {
                    let d = from.distance(store.world_position(child));
                    range = Some(match range {
                        Some(r) => Self {
                            short: r.short.min(d),
                            long: r.long.max(d),
                        },
                        None => Self { short: d, long: d },
                    });
                }
            }
        }
        range
    }
}

/// Length of the bone from `joint` to its first child, or `0.0` for a leaf.
#[must_use]
pub fn bone_length(store: &JointStore, joint: JointId) -> f64 {
    store.children(joint).next().map_or(0.0, |child| {
        store
            .world_position(joint)
            .distance(store.world_position(child))
    })
}

/// Sets the radius of every joint under `roots`, measuring the length range
/// from the same skeletons.
pub fn apply_bone_radii(store: &mut JointStore, roots: &[JointId], mode: BoneRadius) {
    let range = BoneLengthRange::measure(store, roots).unwrap_or(BoneLengthRange {
        short: 0.0,
        long: 0.0,
    });
    for &root in roots {
        apply_subtree_radii(store, root, mode, range);
    }
}

/// Sets the radius of every joint under `top` against a fixed `range`.
pub(crate) fn apply_subtree_radii(
    store: &mut JointStore,
    top: JointId,
    mode: BoneRadius,
    range: BoneLengthRange,
) {
    let joints: Vec<JointId> = store.descendants(top).collect();
    for joint in joints {
        let radius = if store.child_count(joint) == 0 {
            mode.tip()
        } else {
            mode.radius_for(bone_length(store, joint), range)
        };
        store.set_radius(joint, radius);
    }
}
