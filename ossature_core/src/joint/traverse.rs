// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, JointId};
use super::store::JointStore;

/// An iterator over the direct children of a joint.
///
/// Created by [`JointStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a JointStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a JointStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = JointId;

    fn next(&mut self) -> Option<JointId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(self.store.handle(idx))
    }
}

/// A depth-first pre-order iterator over a subtree, including its root.
///
/// Created by [`JointStore::descendants`]. Uses an explicit stack, so
/// arbitrarily deep chains do not grow the call stack.
#[derive(Debug)]
pub struct Descendants<'a> {
    store: &'a JointStore,
    stack: Vec<u32>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(store: &'a JointStore, root: u32) -> Self {
        Self {
            store,
            stack: vec![root],
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = JointId;

    fn next(&mut self) -> Option<JointId> {
        let idx = self.stack.pop()?;
        // Push children in reverse so the first child is visited next.
        let start = self.stack.len();
        let mut child = self.store.first_child[idx as usize];
        while child != INVALID {
            self.stack.push(child);
            child = self.store.next_sibling[child as usize];
        }
        self.stack[start..].reverse();
        Some(self.store.handle(idx))
    }
}
