// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape-grammar joint classification and convention-driven naming.
//!
//! `ossature_core` looks at the shape of a character skeleton (how many
//! children each joint has, and where it sits in space) and decides what each
//! joint is: spine, neck, shoulder, finger, toe. From those roles it derives
//! systematic names such as `DJ_L01_Elbow02`, builds a parallel bind
//! skeleton, and plans the constraints that tie the two together.
//!
//! # Architecture
//!
//! ```text
//!   JointStore (host mirror)
//!       │
//!       ▼
//!   Classifier::classify() ──► Classification ──► naming plan
//!                                                     │
//!                 ┌───────────────────────────────────┘
//!                 ▼
//!   Character::build() ──► JointStore::evaluate() ──► HostSync::apply()
//! ```
//!
//! **[`joint`]**: Struct-of-arrays joint tree with generational handles.
//! Translations, names, and display attributes are set by the caller; world
//! positions are summed along the ancestor chain on each query and do not
//! wait for evaluation.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`.
//! POSITION propagates to descendants; NAME and ATTRIBUTES are local-only;
//! TOPOLOGY triggers a traversal rebuild.
//!
//! **[`tree`]**: The read-only [`JointTree`](tree::JointTree) view the
//! classifier walks.
//!
//! **[`role`]**, **[`rules`]**, **[`grammar`]**: The role catalog, rule tables
//! keyed by child count, and the per-archetype grammars built from them.
//!
//! **[`classify`]**: The [`Classifier`](classify::Classifier) that assigns a
//! role, name sequence, and side to every joint of a subtree.
//!
//! **[`naming`]**: Token patterns compiled into
//! [`NamingSpec`](naming::NamingSpec)s that format and parse names.
//!
//! **[`character`]**: End-to-end rig construction: classify, name with
//! collision avoidance, duplicate, insert, label, and plan constraints.
//!
//! **[`rename`]**: Atomic batch renaming of arbitrary joint sets.
//!
//! **[`bones`]**: Bone display radii by length.
//!
//! **[`side`]**, **[`label`]**, **[`point`]**: Side detection, host joint
//! labels, and the 3D point type.
//!
//! **[`host`]**: The [`HostSync`](host::HostSync) trait that scene
//! integrations implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pass instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-joint rule
//!   match events.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bones;
pub mod character;
pub mod classify;
pub mod dirty;
pub mod error;
pub mod grammar;
pub mod host;
pub mod joint;
pub mod label;
pub mod naming;
pub mod point;
pub mod rename;
pub mod role;
pub mod rules;
pub mod side;
pub mod trace;
pub mod tree;

#[cfg(test)]
mod testing;
