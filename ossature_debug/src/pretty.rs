// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Classified
//! joints are indented by depth so the output reads like the hierarchy.

use std::io::Write;

use ossature_core::rules::BranchKind;
use ossature_core::trace::{
    JointClassifiedEvent, JointInsertedEvent, NameAssignedEvent, NameCollisionEvent,
    PassBeginEvent, PassEndEvent, PassKind, PassSummary, RuleMatchEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    rule_matches: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("rule_matches", &self.rule_matches)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            rule_matches: false,
        }
    }

    /// Also prints one line per rule-table lookup.
    #[must_use]
    pub fn with_rule_matches(mut self, on: bool) -> Self {
        self.rule_matches = on;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn pass_name(pass: PassKind) -> &'static str {
    match pass {
        PassKind::Classify => "classify",
        PassKind::Plan => "plan",
        PassKind::Commit => "commit",
    }
}

fn branch_name(kind: Option<BranchKind>) -> &'static str {
    match kind {
        Some(BranchKind::Exact) => "exact",
        Some(BranchKind::Predicate) => "pred",
        Some(BranchKind::Lookahead) => "look",
        Some(BranchKind::Wildcard) => "any",
        None => "-",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] {} roots={}",
            pass_name(e.pass),
            e.roots,
        );
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        let status = if e.ok { "ok" } else { "FAILED" };
        let _ = writeln!(
            self.writer,
            "[pass:end] {} joints={} {status}",
            pass_name(e.pass),
            e.joints,
        );
    }

    fn on_joint_classified(&mut self, e: &JointClassifiedEvent<'_>) {
        let depth = usize::try_from(e.depth).unwrap_or(usize::MAX).min(32);
        let seq = if e.terminal {
            "Tip".to_owned()
        } else {
            format!("{:02}", e.name_sequence)
        };
        let _ = writeln!(
            self.writer,
            "[joint] {:indent$}{} -> {}{seq} side={} children={} via={}",
            "",
            e.joint,
            e.role,
            e.side.code(),
            e.child_count,
            branch_name(e.branch),
            indent = depth * 2,
        );
    }

    fn on_name_assigned(&mut self, e: &NameAssignedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[name] #{} {} / {} ss={} tries={}",
            e.order, e.drive, e.bind, e.side_sequence, e.attempts,
        );
    }

    fn on_name_collision(&mut self, e: &NameCollisionEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[collision] #{} {} taken",
            e.order, e.candidate,
        );
    }

    fn on_joint_inserted(&mut self, e: &JointInsertedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[insert] {} below {} ({})",
            e.name, e.parent, e.role,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] roots={} joints={} depth={} collisions={} inserted={} constraints={}",
            s.roots, s.joints, s.max_depth, s.collisions, s.inserted, s.constraints,
        );
    }

    fn on_rule_match(&mut self, e: &RuleMatchEvent<'_>) {
        if !self.rule_matches {
            return;
        }
        let nested = if e.nested { " nested" } else { "" };
        let _ = writeln!(
            self.writer,
            "[rule] {} {}[{}] children={}{nested}",
            e.joint, e.owner, e.key, e.child_count,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossature_core::role::Role;
    use ossature_core::rules::BranchKey;
    use ossature_core::side::Side;

    #[test]
    fn pretty_print_joint_is_indented() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_joint_classified(&JointClassifiedEvent {
            order: 2,
            depth: 2,
            joint: "spine_1",
            role: Role::Spine,
            name_sequence: 1,
            terminal: false,
            side: Side::Center,
            child_count: 1,
            branch: Some(BranchKind::Exact),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            output,
            "[joint]     spine_1 -> Spine01 side=C children=1 via=exact\n"
        );
    }

    #[test]
    fn rule_matches_are_opt_in() {
        let event = RuleMatchEvent {
            joint: "chest",
            owner: Role::Spine,
            key: BranchKey::Exact(3),
            child_count: 3,
            nested: false,
        };
        let mut quiet = PrettyPrintSink::with_writer(Vec::<u8>::new());
        quiet.on_rule_match(&event);
        assert!(quiet.into_inner().is_empty());

        let mut loud = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_rule_matches(true);
        loud.on_rule_match(&event);
        let output = String::from_utf8(loud.into_inner()).unwrap();
        assert!(output.contains("[rule] chest Spine[3]"), "got: {output}");
    }

    #[test]
    fn failed_pass_is_flagged() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_pass_end(&PassEndEvent {
            pass: PassKind::Plan,
            joints: 12,
            ok: false,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("plan joints=12 FAILED"), "got: {output}");
    }
}
