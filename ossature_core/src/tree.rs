// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only view of a joint hierarchy.
//!
//! The classifier never mutates the tree it walks; it only asks for child
//! counts, ordered children, world positions, and names. [`JointTree`] is
//! that query surface. [`JointStore`] implements it, and a host integration
//! can implement it directly over its own scene graph.

use core::fmt;
use core::hash::Hash;

use crate::joint::{JointId, JointStore};
use crate::point::Point3;

/// Queries the classifier needs from a joint hierarchy.
pub trait JointTree {
    /// Stable joint identity.
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Returns the number of direct children of `joint`.
    fn child_count(&self, joint: Self::Id) -> usize;

    /// Returns the `index`-th child of `joint`, in declaration order.
    fn child(&self, joint: Self::Id, index: usize) -> Option<Self::Id>;

    /// Returns the world-space position of `joint`.
    fn world_position(&self, joint: Self::Id) -> Point3;

    /// Returns the current name of `joint`.
    fn joint_name(&self, joint: Self::Id) -> &str;

    /// Returns the children of `joint`, in declaration order.
    fn children_of(&self, joint: Self::Id) -> Vec<Self::Id> {
        (0..self.child_count(joint))
            .filter_map(|i| self.child(joint, i))
            .collect()
    }
}

impl JointTree for JointStore {
    type Id = JointId;

    fn child_count(&self, joint: JointId) -> usize {
        Self::child_count(self, joint)
    }

    fn child(&self, joint: JointId, index: usize) -> Option<JointId> {
        self.children(joint).nth(index)
    }

    fn world_position(&self, joint: JointId) -> Point3 {
        Self::world_position(self, joint)
    }

    fn joint_name(&self, joint: JointId) -> &str {
        self.name(joint)
    }

    fn children_of(&self, joint: JointId) -> Vec<JointId> {
        self.children(joint).collect()
    }
}
