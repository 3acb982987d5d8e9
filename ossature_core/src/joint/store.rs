// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays joint storage with allocation, topology, and attribute
//! management.

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, JointId};
use super::traverse::{Children, Descendants};
use crate::dirty;
use crate::label::JointLabel;
use crate::point::Point3;

/// Bone radius given to freshly created joints.
pub const DEFAULT_RADIUS: f64 = 1.0;

/// Struct-of-arrays storage for all joints of a scene.
///
/// Joints are addressed by [`JointId`] handles. Internally, each joint
/// occupies a slot in parallel arrays. Destroyed joints are recycled via a
/// free list, and generation counters prevent stale handle access.
///
/// Names are not required to be unique; collision avoidance is the job of
/// the naming layer (see [`Character`](crate::character::Character)).
#[derive(Debug)]
pub struct JointStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties (set by callers) --
    pub(crate) name: Vec<String>,
    pub(crate) translation: Vec<Point3>,
    pub(crate) label: Vec<Option<JointLabel>>,
    pub(crate) color: Vec<Option<u8>>,
    pub(crate) radius: Vec<f64>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for JointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JointStore {
    /// Creates an empty joint store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            name: Vec::new(),
            translation: Vec::new(),
            label: Vec::new(),
            color: Vec::new(),
            radius: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new joint and returns its handle.
    ///
    /// The joint starts at the origin of its parent space, unlabelled, with
    /// no override color, [`DEFAULT_RADIUS`], and no parent.
    pub fn create_joint(&mut self, name: impl Into<String>) -> JointId {
        let name = name.into();
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.name[i] = name;
            self.translation[i] = Point3::ZERO;
            self.label[i] = None;
            self.color[i] = None;
            self.radius[i] = DEFAULT_RADIUS;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.name.push(name);
            self.translation.push(Point3::ZERO);
            self.label.push(None);
            self.color.push(None);
            self.radius.push(DEFAULT_RADIUS);
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        self.handle(idx)
    }

    /// Destroys a joint, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the joint has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_joint(&mut self, id: JointId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy joint with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live joint.
    #[must_use]
    pub fn is_alive(&self, id: JointId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Marks `child`'s subtree POSITION-dirty, since its world positions now
    /// include the new ancestry.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: JointId, child: JointId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == INVALID,
            "child already has a parent"
        );
        self.link_last(parent.idx, child.idx);
    }

    /// Removes `child` from its current parent, making it a root.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the joint has no parent.
    pub fn remove_from_parent(&mut self, child: JointId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "joint has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.remove_dependency(c, p, dirty::POSITION);

        self.dirty.mark_with(c, dirty::POSITION, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Moves `child` to be the last child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first. The local
    /// translation is kept, so the subtree moves in world space.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `new_parent` is `child` or
    /// one of its descendants.
    pub fn reparent(&mut self, child: JointId, new_parent: JointId) {
        self.validate(child);
        self.validate(new_parent);
        assert!(
            !self.is_ancestor_or_self(child.idx, new_parent.idx),
            "cannot parent a joint under its own subtree"
        );

        if self.parent[child.idx as usize] != INVALID {
            let old_p = self.parent[child.idx as usize];
            self.unlink_from_parent(child.idx);
            self.dirty
                .remove_dependency(child.idx, old_p, dirty::POSITION);
            self.dirty.mark(old_p, dirty::TOPOLOGY);
        }

        self.link_last(new_parent.idx, child.idx);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: JointId, sibling: JointId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        let _ = self.dirty.add_dependency(c, p, dirty::POSITION);

        self.dirty.mark_with(c, dirty::POSITION, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Splits the bone ending at `child` into `count + 1` equal segments.
    ///
    /// `count` new joints are inserted between `child` and its parent, taking
    /// `child`'s place among its siblings. Each new joint, and `child`
    /// itself, gets `1 / (count + 1)` of `child`'s original translation, so
    /// `child`'s world position is unchanged. New joints copy `child`'s
    /// radius and are otherwise unnamed and unlabelled.
    ///
    /// Returns the new joints from the parent end down.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `child` has no parent.
    pub fn split_bone(&mut self, child: JointId, count: usize) -> Vec<JointId> {
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] != INVALID,
            "joint has no parent"
        );
        if count == 0 {
            return Vec::new();
        }

        let step = self.translation[child.idx as usize] / (count + 1) as f64;
        let radius = self.radius[child.idx as usize];

        let mut inserted = Vec::with_capacity(count);
        let mut below = child;
        // Build the chain upward so each new joint takes the slot of the one
        // beneath it.
        for _ in 0..count {
            let joint = self.create_joint(String::new());
            self.insert_before(joint, below);
            self.reparent(below, joint);
            self.set_translation(joint, step);
            self.set_radius(joint, radius);
            inserted.push(joint);
            below = joint;
        }
        self.set_translation(child, step);
        inserted.reverse();
        inserted
    }

    /// Returns the parent of a joint, if any.
    #[must_use]
    pub fn parent(&self, id: JointId) -> Option<JointId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.handle(p))
    }

    /// Returns the topmost ancestor of a joint (the joint itself for roots).
    #[must_use]
    pub fn root_of(&self, id: JointId) -> JointId {
        self.validate(id);
        let mut idx = id.idx;
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
        }
        self.handle(idx)
    }

    /// Returns the distinct roots of a selection, in first-seen order.
    ///
    /// Each selected joint is walked up to its topmost ancestor, so selecting
    /// any joint of a skeleton selects the whole skeleton.
    #[must_use]
    pub fn roots_of(&self, selection: &[JointId]) -> Vec<JointId> {
        let mut roots = Vec::new();
        for &id in selection {
            let root = self.root_of(id);
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        roots
    }

    /// Returns an iterator over the direct children of a joint.
    #[must_use]
    pub fn children(&self, id: JointId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the number of direct children of a joint.
    #[must_use]
    pub fn child_count(&self, id: JointId) -> usize {
        self.children(id).count()
    }

    /// Returns a depth-first pre-order iterator over `id` and all of its
    /// descendants.
    #[must_use]
    pub fn descendants(&self, id: JointId) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx)
    }

    /// Returns all live root joints (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<JointId> {
        self.live_slots()
            .filter(|&idx| self.parent[idx as usize] == INVALID)
            .map(|idx| self.handle(idx))
            .collect()
    }

    /// Copies the subtree rooted at `root`.
    ///
    /// The copy carries names, translations, labels, colors, and radii. If
    /// `root` has a parent, the copy is added as that parent's last child;
    /// otherwise it is a new root.
    ///
    /// Returns `(original, copy)` pairs in depth-first pre-order, the first
    /// pair being the two roots. Both sides of every pair are reached along
    /// the same child-index path, so the list doubles as a lockstep mapping
    /// between the trees.
    pub fn duplicate_subtree(&mut self, root: JointId) -> Vec<(JointId, JointId)> {
        self.validate(root);
        let mut pairs = Vec::new();
        let mut stack: Vec<(JointId, Option<JointId>)> = vec![(root, None)];

        while let Some((original, copy_parent)) = stack.pop() {
            let o = original.idx as usize;
            let copy = self.create_joint(self.name[o].clone());
            self.set_translation(copy, self.translation[o]);
            self.set_label(copy, self.label[o]);
            self.set_color(copy, self.color[o]);
            self.set_radius(copy, self.radius[o]);

            if let Some(parent) = copy_parent.or_else(|| self.parent(original)) {
                self.add_child(parent, copy);
            }
            pairs.push((original, copy));

            let children: Vec<JointId> = self.children(original).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, Some(copy))));
        }
        pairs
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the name of a joint.
    #[must_use]
    pub fn name(&self, id: JointId) -> &str {
        self.validate(id);
        &self.name[id.idx as usize]
    }

    /// Returns the translation of a joint relative to its parent.
    #[must_use]
    pub fn translation(&self, id: JointId) -> Point3 {
        self.validate(id);
        self.translation[id.idx as usize]
    }

    /// Returns the world-space position of a joint.
    ///
    /// Computed on demand as the sum of the translations along the ancestor
    /// chain; always current.
    #[must_use]
    pub fn world_position(&self, id: JointId) -> Point3 {
        self.validate(id);
        let mut idx = id.idx;
        let mut position = Point3::ZERO;
        loop {
            position = position + self.translation[idx as usize];
            idx = self.parent[idx as usize];
            if idx == INVALID {
                return position;
            }
        }
    }

    /// Returns the host label of a joint, if one has been set.
    #[must_use]
    pub fn label(&self, id: JointId) -> Option<JointLabel> {
        self.validate(id);
        self.label[id.idx as usize]
    }

    /// Returns the override color index of a joint, if one has been set.
    #[must_use]
    pub fn color(&self, id: JointId) -> Option<u8> {
        self.validate(id);
        self.color[id.idx as usize]
    }

    /// Returns the display radius of a joint.
    #[must_use]
    pub fn radius(&self, id: JointId) -> f64 {
        self.validate(id);
        self.radius[id.idx as usize]
    }

    /// Returns the number of live joints named exactly `name`.
    #[must_use]
    pub fn count_named(&self, name: &str) -> usize {
        self.live_slots()
            .filter(|&idx| self.name[idx as usize] == name)
            .count()
    }

    /// Returns the live joints named exactly `name`.
    #[must_use]
    pub fn find_named(&self, name: &str) -> Vec<JointId> {
        self.live_slots()
            .filter(|&idx| self.name[idx as usize] == name)
            .map(|idx| self.handle(idx))
            .collect()
    }

    /// Returns an iterator over the names of all live joints.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.live_slots().map(|idx| self.name[idx as usize].as_str())
    }

    // -- Mutation API (auto-marks dirty) --

    /// Renames a joint.
    pub fn set_name(&mut self, id: JointId, name: impl Into<String>) {
        self.validate(id);
        self.name[id.idx as usize] = name.into();
        self.dirty.mark(id.idx, dirty::NAME);
    }

    /// Sets the translation of a joint relative to its parent.
    ///
    /// Marks the POSITION channel dirty with eager propagation to descendants.
    pub fn set_translation(&mut self, id: JointId, translation: Point3) {
        self.validate(id);
        self.translation[id.idx as usize] = translation;
        self.dirty.mark_with(id.idx, dirty::POSITION, &EagerPolicy);
    }

    /// Sets (or clears) the host label of a joint.
    pub fn set_label(&mut self, id: JointId, label: Option<JointLabel>) {
        self.validate(id);
        self.label[id.idx as usize] = label;
        self.dirty.mark(id.idx, dirty::ATTRIBUTES);
    }

    /// Sets (or clears) the override color index of a joint.
    pub fn set_color(&mut self, id: JointId, color: Option<u8>) {
        self.validate(id);
        self.color[id.idx as usize] = color;
        self.dirty.mark(id.idx, dirty::ATTRIBUTES);
    }

    /// Sets the display radius of a joint.
    pub fn set_radius(&mut self, id: JointId, radius: f64) {
        self.validate(id);
        self.radius[id.idx as usize] = radius;
        self.dirty.mark(id.idx, dirty::ATTRIBUTES);
    }

    // -- Raw-index accessors for host integrations --
    //
    // These accept raw slot indices (as found in `TreeChanges`) rather than
    // `JointId` handles, skipping generation validation. Only use with indices
    // that came from `TreeChanges` or `traversal_order()`.

    /// Returns the name at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn name_at(&self, idx: u32) -> &str {
        self.check_slot(idx);
        &self.name[idx as usize]
    }

    /// Returns the world-space position at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn world_position_at(&self, idx: u32) -> Point3 {
        self.check_slot(idx);
        self.world_position(self.handle(idx))
    }

    /// Returns the label at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn label_at(&self, idx: u32) -> Option<JointLabel> {
        self.check_slot(idx);
        self.label[idx as usize]
    }

    /// Returns the radius at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn radius_at(&self, idx: u32) -> f64 {
        self.check_slot(idx);
        self.radius[idx as usize]
    }

    // -- Internal helpers --

    /// Builds a handle for a live slot.
    pub(crate) fn handle(&self, idx: u32) -> JointId {
        JointId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Iterates the indices of all live slots.
    fn live_slots(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len).filter(|idx| !self.free_list.contains(idx))
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: JointId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale JointId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Whether `ancestor` is `idx` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    /// Appends `c` to `p`'s child list and wires up dirty dependencies.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        let _ = self.dirty.add_dependency(c, p, dirty::POSITION);

        self.dirty.mark_with(c, dirty::POSITION, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelType;
    use crate::side::Side;

    /// `root -> [a -> [c], b]`
    fn small_tree(store: &mut JointStore) -> [JointId; 4] {
        let root = store.create_joint("root");
        let a = store.create_joint("a");
        let b = store.create_joint("b");
        let c = store.create_joint("c");
        store.add_child(root, a);
        store.add_child(root, b);
        store.add_child(a, c);
        [root, a, b, c]
    }

    #[test]
    fn create_and_destroy() {
        let mut store = JointStore::new();
        let id = store.create_joint("j");
        assert!(store.is_alive(id));
        assert_eq!(store.joint_count(), 1);
        store.destroy_joint(id);
        assert!(!store.is_alive(id));
        assert_eq!(store.joint_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = JointStore::new();
        let id1 = store.create_joint("first");
        store.destroy_joint(id1);
        let id2 = store.create_joint("second");
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(store.name(id2), "second");
    }

    #[test]
    fn add_child_and_query() {
        let mut store = JointStore::new();
        let [root, a, b, c] = small_tree(&mut store);

        assert_eq!(store.parent(a), Some(root));
        assert_eq!(store.parent(c), Some(a));
        assert_eq!(store.children(root).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(store.child_count(root), 2);
        assert_eq!(store.child_count(b), 0);
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut store = JointStore::new();
        let [root, a, b, c] = small_tree(&mut store);
        assert_eq!(
            store.descendants(root).collect::<Vec<_>>(),
            vec![root, a, c, b]
        );
        assert_eq!(store.descendants(a).collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn remove_from_parent_works() {
        let mut store = JointStore::new();
        let [root, a, b, _] = small_tree(&mut store);

        store.remove_from_parent(a);
        assert_eq!(store.parent(a), None);
        assert_eq!(store.children(root).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn insert_before_works() {
        let mut store = JointStore::new();
        let [root, a, b, _] = small_tree(&mut store);
        let x = store.create_joint("x");
        store.insert_before(x, b);
        assert_eq!(store.children(root).collect::<Vec<_>>(), vec![a, x, b]);
    }

    #[test]
    fn reparent_works() {
        let mut store = JointStore::new();
        let [root, a, b, c] = small_tree(&mut store);

        store.reparent(c, b);
        assert_eq!(store.parent(c), Some(b));
        assert!(store.children(a).next().is_none());
        assert_eq!(store.root_of(c), root);
    }

    #[test]
    #[should_panic(expected = "cannot parent a joint under its own subtree")]
    fn reparent_into_own_subtree_panics() {
        let mut store = JointStore::new();
        let [_, a, _, c] = small_tree(&mut store);
        store.reparent(a, c);
    }

    #[test]
    fn roots_and_roots_of_selection() {
        let mut store = JointStore::new();
        let [root, a, b, c] = small_tree(&mut store);
        let lone = store.create_joint("lone");

        let roots = store.roots();
        assert_eq!(roots, vec![root, lone]);

        assert_eq!(store.roots_of(&[c, b, lone, a]), vec![root, lone]);
        assert!(store.roots_of(&[]).is_empty());
    }

    #[test]
    fn world_position_sums_ancestors() {
        let mut store = JointStore::new();
        let [root, a, _, c] = small_tree(&mut store);
        store.set_translation(root, Point3::new(0.0, 10.0, 0.0));
        store.set_translation(a, Point3::new(2.0, 0.0, 0.0));
        store.set_translation(c, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(store.world_position(c), Point3::new(2.0, 10.0, -1.0));
    }

    #[test]
    fn world_position_is_current_without_evaluate() {
        let mut store = JointStore::new();
        let [root, a, _, c] = small_tree(&mut store);
        let _ = store.evaluate();
        store.set_translation(a, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(store.world_position(c), Point3::new(1.0, 0.0, 0.0));
        store.reparent(c, root);
        assert_eq!(store.world_position(c), Point3::ZERO);
    }

    #[test]
    fn split_bone_keeps_world_position() {
        let mut store = JointStore::new();
        let [_, a, _, c] = small_tree(&mut store);
        store.set_translation(c, Point3::new(0.0, -8.0, 0.0));
        store.set_radius(c, 0.75);
        let before = store.world_position(c);

        let inserted = store.split_bone(c, 3);
        assert_eq!(inserted.len(), 3);
        assert_eq!(store.parent(inserted[0]), Some(a));
        assert_eq!(store.parent(inserted[1]), Some(inserted[0]));
        assert_eq!(store.parent(inserted[2]), Some(inserted[1]));
        assert_eq!(store.parent(c), Some(inserted[2]));
        assert_eq!(store.translation(c), Point3::new(0.0, -2.0, 0.0));
        assert_eq!(store.translation(inserted[0]), Point3::new(0.0, -2.0, 0.0));
        assert_eq!(store.world_position(c), before);
        assert_eq!(store.radius(inserted[1]), 0.75);
    }

    #[test]
    fn split_bone_keeps_sibling_order() {
        let mut store = JointStore::new();
        let [root, a, b, _] = small_tree(&mut store);
        let inserted = store.split_bone(a, 1);
        assert_eq!(store.children(root).collect::<Vec<_>>(), vec![inserted[0], b]);
        assert!(store.split_bone(b, 0).is_empty());
    }

    #[test]
    fn duplicate_subtree_copies_shape_and_attributes() {
        let mut store = JointStore::new();
        let [root, a, b, c] = small_tree(&mut store);
        store.set_translation(c, Point3::new(1.0, 2.0, 3.0));
        store.set_label(a, Some(JointLabel::new(Side::Left, "Hip")));
        store.set_radius(b, 0.25);

        let pairs = store.duplicate_subtree(root);
        let originals: Vec<_> = pairs.iter().map(|&(o, _)| o).collect();
        assert_eq!(originals, vec![root, a, c, b]);

        let copy_root = pairs[0].1;
        assert_eq!(store.parent(copy_root), None);
        let copy_kids: Vec<_> = store.children(copy_root).collect();
        assert_eq!(copy_kids, vec![pairs[1].1, pairs[3].1]);
        assert_eq!(store.parent(pairs[2].1), Some(pairs[1].1));

        for &(original, copy) in &pairs {
            assert_ne!(original, copy);
            assert_eq!(store.name(original), store.name(copy));
            assert_eq!(store.translation(original), store.translation(copy));
        }
        assert_eq!(
            store.label(pairs[1].1).map(|l| l.kind),
            Some(LabelType::Hip)
        );
        assert_eq!(store.radius(pairs[3].1), 0.25);
        assert_eq!(store.count_named("a"), 2);
    }

    #[test]
    fn duplicate_of_parented_joint_stays_under_parent() {
        let mut store = JointStore::new();
        let [_, a, _, c] = small_tree(&mut store);
        let pairs = store.duplicate_subtree(c);
        assert_eq!(pairs.len(), 1);
        assert_eq!(store.parent(pairs[0].1), Some(a));
    }

    #[test]
    fn name_queries_skip_destroyed_joints() {
        let mut store = JointStore::new();
        let x = store.create_joint("dup");
        let y = store.create_joint("dup");
        assert_eq!(store.count_named("dup"), 2);
        store.destroy_joint(x);
        assert_eq!(store.count_named("dup"), 1);
        assert_eq!(store.find_named("dup"), vec![y]);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["dup"]);
    }

    #[test]
    #[should_panic(expected = "cannot destroy joint with children")]
    fn destroy_with_children_panics() {
        let mut store = JointStore::new();
        let [root, ..] = small_tree(&mut store);
        store.destroy_joint(root);
    }

    #[test]
    #[should_panic(expected = "stale JointId")]
    fn destroyed_handle_panics_on_name() {
        let mut store = JointStore::new();
        let id = store.create_joint("gone");
        store.destroy_joint(id);
        let _ = store.name(id);
    }

    #[test]
    #[should_panic(expected = "stale JointId")]
    fn destroyed_handle_panics_on_add_child() {
        let mut store = JointStore::new();
        let parent = store.create_joint("p");
        let child = store.create_joint("c");
        store.destroy_joint(child);
        store.add_child(parent, child);
    }

    #[test]
    #[should_panic(expected = "slot index 9 out of range")]
    fn raw_accessor_checks_range() {
        let store = JointStore::new();
        let _ = store.name_at(9);
    }
}
