// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Ossature uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! tell a host integration exactly which joints it must refresh after a
//! classification or rename pass. Each channel represents an independent
//! category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`POSITION`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from child to parent. Moving a joint moves its whole subtree in world
//!   space, so every descendant is reported.
//!
//! - **Local-only**: [`NAME`] and [`ATTRIBUTES`] are marked with the default
//!   policy. Only the explicitly marked joint appears in the drain output.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on topology mutations
//!   (add/remove child, create/destroy joint). It triggers a traversal-order
//!   rebuild during evaluation but does not propagate to descendants.
//!
//! # Consumption
//!
//! Each [`JointStore::evaluate`](crate::joint::JointStore::evaluate) call
//! drains all channels and surfaces the results as
//! [`TreeChanges`](crate::joint::TreeChanges), which host integrations
//! [consume](crate::host::HostSync::apply).

use understory_dirty::Channel;

/// Local translation changed, or the joint moved under a new parent.
pub const POSITION: Channel = Channel::new(0);

/// Joint name changed.
pub const NAME: Channel = Channel::new(1);

/// Joint label, override color, or bone radius changed.
pub const ATTRIBUTES: Channel = Channel::new(2);

/// Tree topology changed; triggers a traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(3);
