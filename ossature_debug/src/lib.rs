// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON report export for ossature
//! diagnostics.
//!
//! This crate provides [`TraceSink`](ossature_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`report::export`]: writes a JSON rig report from recorded bytes.

pub mod pretty;
pub mod recorder;
pub mod report;
