// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract for host scene integrations.
//!
//! Ossature owns a [`JointStore`] mirror of the host's skeleton. Classification
//! and naming mutate that mirror; a host integration then pushes the result
//! into the real scene graph (a DCC application's DAG, a game engine's
//! skeleton asset) by implementing [`HostSync`].
//!
//! # Crate boundaries
//!
//! `ossature_core` owns the data model, classification, naming, and this
//! contract. Integrations depend on `ossature_core`, build the store from the
//! host's joints, run a [`Character`](crate::character::Character) build or a
//! [`BatchRenamer`](crate::rename::BatchRenamer) pass, and forward changes.

use crate::joint::{JointStore, TreeChanges};

/// Applies evaluated tree changes to a host scene.
///
/// # Sync loop pseudocode
///
/// ```rust,ignore
/// let character = Character::build(&mut store, &selection, &config, &mut tracer)?;
///
/// // Evaluate: drain dirty channels into a change set
/// let changes = store.evaluate();
///
/// // Sync: create duplicated joints, rename, relabel in the host
/// host.apply(&store, &changes);
/// ```
pub trait HostSync {
    /// Applies the given [`TreeChanges`] to the host scene, reading current
    /// values from `store` as needed.
    fn apply(&mut self, store: &JointStore, changes: &TreeChanges);
}
