// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection for host synchronization.
//!
//! Evaluation drains each dirty channel in turn:
//!
//! 1. **POSITION**: Drain affected indices (marked joints plus all of their
//!    descendants) in parent-before-child order.
//! 2. **NAME** / **ATTRIBUTES**: Drain marked indices (no propagation;
//!    hosts read the current values directly from the store).
//! 3. **TOPOLOGY**: Drain and discard (the traversal order was already
//!    rebuilt at the start of evaluation if needed).
//!
//! [`TreeChanges`] uses raw slot indices (`u32`) rather than [`JointId`]
//! handles so that hosts can index directly into the store via the `*_at()`
//! accessors (e.g. [`name_at`](super::JointStore::name_at)).
//!
//! [`JointId`]: super::JointId

use super::id::INVALID;
use super::store::JointStore;
use crate::dirty;

/// The set of changes produced by a single [`JointStore::evaluate`] call.
///
/// Each field contains the raw slot indices of joints that changed in the
/// corresponding category.
#[derive(Clone, Debug, Default)]
pub struct TreeChanges {
    /// Joints whose world position may have changed.
    pub positions: Vec<u32>,
    /// Joints that were renamed.
    pub names: Vec<u32>,
    /// Joints whose label, override color, or radius changed.
    pub attributes: Vec<u32>,
    /// Joints added since the last evaluate.
    pub added: Vec<u32>,
    /// Joints removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.names.clear();
        self.attributes.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
            && self.names.is_empty()
            && self.attributes.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl JointStore {
    /// Drains all dirty channels and returns the set of changes since the
    /// previous call.
    ///
    /// This also rebuilds the traversal order if topology changed.
    pub fn evaluate(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut TreeChanges) {
        changes.clear();

        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        changes.positions = self
            .dirty
            .drain(dirty::POSITION)
            .affected()
            .deterministic()
            .run()
            .collect();

        changes.names = self
            .dirty
            .drain(dirty::NAME)
            .deterministic()
            .run()
            .collect();

        changes.attributes = self
            .dirty
            .drain(dirty::ATTRIBUTES)
            .deterministic()
            .run()
            .collect();

        // Structural changes are already reflected in the traversal order.
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        // Slots destroyed since they were marked carry no meaningful state.
        let freed = &self.free_list;
        changes.positions.retain(|idx| !freed.contains(idx));
        changes.names.retain(|idx| !freed.contains(idx));
        changes.attributes.retain(|idx| !freed.contains(idx));

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the current traversal order (depth-first pre-order over all
    /// roots).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called at least
    /// once.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Rebuilds the depth-first pre-order traversal of all live joints.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        let mut stack = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] != INVALID || self.free_list.contains(&idx) {
                continue;
            }
            stack.push(idx);
            while let Some(idx) = stack.pop() {
                self.traversal_order.push(idx);
                let start = stack.len();
                let mut child = self.first_child[idx as usize];
                while child != INVALID {
                    stack.push(child);
                    child = self.next_sibling[child as usize];
                }
                stack[start..].reverse();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::label::JointLabel;
    use crate::point::Point3;
    use crate::side::Side;

    use super::*;

    #[test]
    fn first_evaluate_reports_creation() {
        let mut store = JointStore::new();
        let root = store.create_joint("root");
        let child = store.create_joint("child");
        store.add_child(root, child);

        let changes = store.evaluate();
        assert!(changes.topology_changed);
        assert_eq!(changes.added, vec![root.index(), child.index()]);
        assert!(changes.positions.contains(&child.index()));
    }

    #[test]
    fn no_change_evaluate_returns_empty() {
        let mut store = JointStore::new();
        let _root = store.create_joint("root");
        let _ = store.evaluate();

        let changes = store.evaluate();
        assert!(changes.is_empty());
    }

    #[test]
    fn translation_propagates_to_descendants() {
        let mut store = JointStore::new();
        let a = store.create_joint("a");
        let b = store.create_joint("b");
        let c = store.create_joint("c");
        let other = store.create_joint("other");
        store.add_child(a, b);
        store.add_child(b, c);
        let _ = store.evaluate();

        store.set_translation(b, Point3::new(0.0, 1.0, 0.0));
        let changes = store.evaluate();
        assert!(changes.positions.contains(&b.index()));
        assert!(changes.positions.contains(&c.index()));
        assert!(!changes.positions.contains(&a.index()));
        assert!(!changes.positions.contains(&other.index()));
        assert!(!changes.topology_changed);
    }

    #[test]
    fn names_and_attributes_are_local() {
        let mut store = JointStore::new();
        let a = store.create_joint("a");
        let b = store.create_joint("b");
        store.add_child(a, b);
        let _ = store.evaluate();

        store.set_name(a, "renamed");
        store.set_label(b, Some(JointLabel::new(Side::Center, "Spine")));
        let changes = store.evaluate();
        assert_eq!(changes.names, vec![a.index()]);
        assert_eq!(changes.attributes, vec![b.index()]);
        assert!(changes.positions.is_empty());
    }

    #[test]
    fn destroyed_joints_are_reported_removed() {
        let mut store = JointStore::new();
        let a = store.create_joint("a");
        let _ = store.evaluate();

        store.set_name(a, "doomed");
        store.destroy_joint(a);
        let changes = store.evaluate();
        assert_eq!(changes.removed, vec![a.index()]);
        assert!(changes.names.is_empty());
    }

    #[test]
    fn traversal_order_is_depth_first() {
        let mut store = JointStore::new();
        let a = store.create_joint("a");
        let b = store.create_joint("b");
        let c = store.create_joint("c");
        let d = store.create_joint("d");

        // Tree: a -> [b -> [d], c]
        store.add_child(a, b);
        store.add_child(a, c);
        store.add_child(b, d);

        let _ = store.evaluate();
        assert_eq!(
            store.traversal_order(),
            &[a.index(), b.index(), d.index(), c.index()]
        );
    }

    #[test]
    fn traversal_order_covers_multiple_roots() {
        let mut store = JointStore::new();
        let root_a = store.create_joint("a");
        let child_a = store.create_joint("a1");
        let root_b = store.create_joint("b");
        store.add_child(root_a, child_a);

        let _ = store.evaluate();
        assert_eq!(
            store.traversal_order(),
            &[root_a.index(), child_a.index(), root_b.index()]
        );
    }
}
