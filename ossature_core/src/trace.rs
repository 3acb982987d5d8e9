// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for classification and naming passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! classifier, the naming pass, and character assembly call as they work. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`PassSummaryBuilder`] is a convenience helper that tallies a rig build and
//! produces a [`PassSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`RuleMatchEvent`], emitted for
//!   every rule-table lookup including nested tables.

use crate::role::Role;
#[cfg(feature = "trace-rich")]
use crate::rules::BranchKey;
use crate::rules::BranchKind;
use crate::side::Side;

/// Clamps a count into a `u32` event field.
pub(crate) fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which pass is being reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Role assignment over the drive chain.
    Classify,
    /// Name computation and collision avoidance (no mutation).
    Plan,
    /// Duplication, renaming, labelling, and joint insertion.
    Commit,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassBeginEvent {
    /// Which pass is starting.
    pub pass: PassKind,
    /// Number of skeleton roots the pass covers.
    pub roots: u32,
}

/// Marks the end of a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassEndEvent {
    /// Which pass is ending.
    pub pass: PassKind,
    /// Number of joints the pass handled.
    pub joints: u32,
    /// Whether the pass completed without error.
    pub ok: bool,
}

/// Emitted once per joint, in pre-order, when its role is settled.
#[derive(Clone, Copy, Debug)]
pub struct JointClassifiedEvent<'a> {
    /// Position of the joint in classification order.
    pub order: u32,
    /// Distance from the classification root.
    pub depth: u32,
    /// The joint's current name.
    pub joint: &'a str,
    /// Assigned role.
    pub role: Role,
    /// Name sequence within a same-role run.
    pub name_sequence: u32,
    /// Whether the joint has no children.
    pub terminal: bool,
    /// Resolved side.
    pub side: Side,
    /// Number of children.
    pub child_count: u32,
    /// Kind of the key that classified the children, if any.
    pub branch: Option<BranchKind>,
}

/// Emitted when a drive/bind name pair is settled.
#[derive(Clone, Copy, Debug)]
pub struct NameAssignedEvent<'a> {
    /// Position of the joint in classification order.
    pub order: u32,
    /// Final drive-joint name.
    pub drive: &'a str,
    /// Final bind-joint name.
    pub bind: &'a str,
    /// Side sequence that made the pair unique.
    pub side_sequence: u32,
    /// Number of candidates tried.
    pub attempts: u32,
}

/// Emitted for each candidate name rejected as already taken.
#[derive(Clone, Copy, Debug)]
pub struct NameCollisionEvent<'a> {
    /// Position of the joint in classification order.
    pub order: u32,
    /// The rejected candidate.
    pub candidate: &'a str,
    /// Side sequence of the rejected candidate.
    pub side_sequence: u32,
}

/// Emitted for each extra bind joint inserted along a bone.
#[derive(Clone, Copy, Debug)]
pub struct JointInsertedEvent<'a> {
    /// Name of the bind joint the bone starts at.
    pub parent: &'a str,
    /// Name given to the inserted joint.
    pub name: &'a str,
    /// Role of the inserted joint.
    pub role: Role,
}

/// Emitted for each rule-table lookup (requires `trace-rich` feature).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct RuleMatchEvent<'a> {
    /// Joint the table was applied to.
    pub joint: &'a str,
    /// Role owning the outermost table.
    pub owner: Role,
    /// Matched key.
    pub key: BranchKey,
    /// Child count of `joint`.
    pub child_count: u32,
    /// Whether the table was nested inside another rule.
    pub nested: bool,
}

/// Per-build tally produced by [`PassSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Skeleton roots rigged.
    pub roots: u32,
    /// Drive joints classified.
    pub joints: u32,
    /// Deepest joint, counted from its root.
    pub max_depth: u32,
    /// Candidate names rejected as taken.
    pub collisions: u32,
    /// Bind joints inserted along bones.
    pub inserted: u32,
    /// Parent-constraint names produced.
    pub constraints: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from classification and naming.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the beginning of a pass.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass.
    fn on_pass_end(&mut self, e: &PassEndEvent) {
        _ = e;
    }

    /// Called when a joint's role is settled.
    fn on_joint_classified(&mut self, e: &JointClassifiedEvent<'_>) {
        _ = e;
    }

    /// Called when a drive/bind name pair is settled.
    fn on_name_assigned(&mut self, e: &NameAssignedEvent<'_>) {
        _ = e;
    }

    /// Called when a candidate name is rejected.
    fn on_name_collision(&mut self, e: &NameCollisionEvent<'_>) {
        _ = e;
    }

    /// Called when a bind joint is inserted.
    fn on_joint_inserted(&mut self, e: &JointInsertedEvent<'_>) {
        _ = e;
    }

    /// Called with the summary of a rig build.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called for every rule-table lookup (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_rule_match(&mut self, e: &RuleMatchEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassEndEvent`].
    #[inline]
    pub fn pass_end(&mut self, e: &PassEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`JointClassifiedEvent`].
    #[inline]
    pub fn joint_classified(&mut self, e: &JointClassifiedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_joint_classified(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NameAssignedEvent`].
    #[inline]
    pub fn name_assigned(&mut self, e: &NameAssignedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_name_assigned(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NameCollisionEvent`].
    #[inline]
    pub fn name_collision(&mut self, e: &NameCollisionEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_name_collision(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`JointInsertedEvent`].
    #[inline]
    pub fn joint_inserted(&mut self, e: &JointInsertedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_joint_inserted(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`RuleMatchEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn rule_match(&mut self, e: &RuleMatchEvent<'_>) {
        if let Some(s) = &mut self.sink {
            s.on_rule_match(e);
        }
    }
}

// ---------------------------------------------------------------------------
// PassSummaryBuilder
// ---------------------------------------------------------------------------

/// Tallies a rig build and produces a [`PassSummary`].
#[derive(Debug, Default)]
pub struct PassSummaryBuilder {
    summary: PassSummary,
}

impl PassSummaryBuilder {
    /// Starts a summary for a build over `roots` skeletons.
    #[must_use]
    pub fn new(roots: usize) -> Self {
        Self {
            summary: PassSummary {
                roots: count_u32(roots),
                ..PassSummary::default()
            },
        }
    }

    /// Records a classified joint at `depth`.
    pub fn joint(&mut self, depth: u32) {
        self.summary.joints = self.summary.joints.saturating_add(1);
        self.summary.max_depth = self.summary.max_depth.max(depth);
    }

    /// Records a rejected candidate name.
    pub fn collision(&mut self) {
        self.summary.collisions = self.summary.collisions.saturating_add(1);
    }

    /// Records an inserted bind joint.
    pub fn inserted(&mut self) {
        self.summary.inserted = self.summary.inserted.saturating_add(1);
    }

    /// Records a parent-constraint name.
    pub fn constraint(&mut self) {
        self.summary.constraints = self.summary.constraints.saturating_add(1);
    }

    /// Consumes the builder and produces the final [`PassSummary`].
    #[must_use]
    pub fn finish(self) -> PassSummary {
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
