// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Joint tree data model.
//!
//! A *joint* is a node in a skeleton hierarchy. Each joint has:
//!
//! - An identity ([`JointId`]): a generational handle that becomes stale when
//!   the joint is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//!   Child order is significant: rule tables assign roles by child index.
//! - **Properties** set by the caller: [`name`](JointStore::set_name),
//!   [`translation`](JointStore::set_translation),
//!   [`label`](JointStore::set_label), [`color`](JointStore::set_color), and
//!   [`radius`](JointStore::set_radius).
//! - A **world position**, the sum of the translations along the ancestor
//!   chain, computed on demand.
//!
//! Joints are stored in struct-of-arrays layout with index-based handles.
//!
//! # Dirty tracking
//!
//! Mutations automatically mark the corresponding dirty channel (see
//! [`dirty`](crate::dirty)):
//!
//! - **POSITION**: propagates to all descendants.
//! - **NAME** / **ATTRIBUTES**: local-only.
//! - **TOPOLOGY**: structural changes that trigger a traversal-order rebuild.
//!
//! [`JointStore::evaluate`] drains them into [`TreeChanges`].

mod evaluate;
mod id;
mod store;
mod traverse;

pub use evaluate::TreeChanges;
pub use id::{INVALID, JointId};
pub use store::{DEFAULT_RADIUS, JointStore};
pub use traverse::{Children, Descendants};
