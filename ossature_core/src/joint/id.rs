// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Joint identity.

use core::fmt;

/// Sentinel value indicating "no joint" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a joint in a [`JointStore`](super::JointStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a joint is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl JointId {
    /// Returns the raw slot index (for diagnostics and [`TreeChanges`] lookups).
    ///
    /// [`TreeChanges`]: super::TreeChanges
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JointId({}@gen{})", self.idx, self.generation)
    }
}
