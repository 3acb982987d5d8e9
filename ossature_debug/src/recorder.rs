// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. Joint names are stored as a `u32`
//! byte length followed by UTF-8. [`decode`] reads them back as an iterator
//! of [`RecordedEvent`], with names as owned strings.

use ossature_core::role::Role;
use ossature_core::rules::{BranchKey, BranchKind, CmpOp, Predicate};
use ossature_core::side::Side;
use ossature_core::trace::{
    JointClassifiedEvent, JointInsertedEvent, NameAssignedEvent, NameCollisionEvent,
    PassBeginEvent, PassEndEvent, PassKind, PassSummary, RuleMatchEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PASS_BEGIN: u8 = 1;
const TAG_PASS_END: u8 = 2;
const TAG_JOINT_CLASSIFIED: u8 = 3;
const TAG_NAME_ASSIGNED: u8 = 4;
const TAG_NAME_COLLISION: u8 = 5;
const TAG_JOINT_INSERTED: u8 = 6;
const TAG_PASS_SUMMARY: u8 = 7;
const TAG_RULE_MATCH: u8 = 8;

const NO_BRANCH: u8 = u8::MAX;

fn clamp_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(clamp_u32(s.len()));
        self.buf.extend_from_slice(s.as_bytes());
    }

    fn write_pass(&mut self, p: PassKind) {
        self.write_u8(match p {
            PassKind::Classify => 0,
            PassKind::Plan => 1,
            PassKind::Commit => 2,
        });
    }

    fn write_role(&mut self, role: Role) {
        self.write_u8(u8::try_from(role.index()).unwrap_or(u8::MAX));
    }

    fn write_side(&mut self, side: Side) {
        self.write_u8(side.label_index());
    }

    fn write_branch(&mut self, kind: Option<BranchKind>) {
        self.write_u8(match kind {
            Some(BranchKind::Exact) => 0,
            Some(BranchKind::Predicate) => 1,
            Some(BranchKind::Lookahead) => 2,
            Some(BranchKind::Wildcard) => 3,
            None => NO_BRANCH,
        });
    }

    fn write_predicate(&mut self, p: Predicate) {
        self.write_u8(match p.op {
            CmpOp::Lt => 0,
            CmpOp::Le => 1,
            CmpOp::Gt => 2,
            CmpOp::Ge => 3,
            CmpOp::Eq => 4,
            CmpOp::Ne => 5,
        });
        self.write_u32(clamp_u32(p.operand));
    }

    fn write_key(&mut self, key: BranchKey) {
        self.write_branch(Some(key.kind()));
        match key {
            BranchKey::Exact(n) => self.write_u32(clamp_u32(n)),
            BranchKey::Predicate(p) | BranchKey::Lookahead(p) => self.write_predicate(p),
            BranchKey::Wildcard => {}
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_pass(e.pass);
        self.write_u32(e.roots);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.write_u8(TAG_PASS_END);
        self.write_pass(e.pass);
        self.write_u32(e.joints);
        self.write_bool(e.ok);
    }

    fn on_joint_classified(&mut self, e: &JointClassifiedEvent<'_>) {
        self.write_u8(TAG_JOINT_CLASSIFIED);
        self.write_u32(e.order);
        self.write_u32(e.depth);
        self.write_str(e.joint);
        self.write_role(e.role);
        self.write_u32(e.name_sequence);
        self.write_bool(e.terminal);
        self.write_side(e.side);
        self.write_u32(e.child_count);
        self.write_branch(e.branch);
    }

    fn on_name_assigned(&mut self, e: &NameAssignedEvent<'_>) {
        self.write_u8(TAG_NAME_ASSIGNED);
        self.write_u32(e.order);
        self.write_str(e.drive);
        self.write_str(e.bind);
        self.write_u32(e.side_sequence);
        self.write_u32(e.attempts);
    }

    fn on_name_collision(&mut self, e: &NameCollisionEvent<'_>) {
        self.write_u8(TAG_NAME_COLLISION);
        self.write_u32(e.order);
        self.write_str(e.candidate);
        self.write_u32(e.side_sequence);
    }

    fn on_joint_inserted(&mut self, e: &JointInsertedEvent<'_>) {
        self.write_u8(TAG_JOINT_INSERTED);
        self.write_str(e.parent);
        self.write_str(e.name);
        self.write_role(e.role);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.write_u8(TAG_PASS_SUMMARY);
        self.write_u32(s.roots);
        self.write_u32(s.joints);
        self.write_u32(s.max_depth);
        self.write_u32(s.collisions);
        self.write_u32(s.inserted);
        self.write_u32(s.constraints);
    }

    fn on_rule_match(&mut self, e: &RuleMatchEvent<'_>) {
        self.write_u8(TAG_RULE_MATCH);
        self.write_str(e.joint);
        self.write_role(e.owner);
        self.write_key(e.key);
        self.write_u32(e.child_count);
        self.write_bool(e.nested);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// A [`PassEndEvent`].
    PassEnd(PassEndEvent),
    /// A [`JointClassifiedEvent`].
    JointClassified {
        /// Position in classification order.
        order: u32,
        /// Distance from the classification root.
        depth: u32,
        /// Joint name at classification time.
        joint: String,
        /// Assigned role.
        role: Role,
        /// Name sequence.
        name_sequence: u32,
        /// Whether the joint had no children.
        terminal: bool,
        /// Resolved side.
        side: Side,
        /// Number of children.
        child_count: u32,
        /// Kind of the key that classified the children.
        branch: Option<BranchKind>,
    },
    /// A [`NameAssignedEvent`].
    NameAssigned {
        /// Position in classification order.
        order: u32,
        /// Drive-joint name.
        drive: String,
        /// Bind-joint name.
        bind: String,
        /// Side sequence.
        side_sequence: u32,
        /// Candidates tried.
        attempts: u32,
    },
    /// A [`NameCollisionEvent`].
    NameCollision {
        /// Position in classification order.
        order: u32,
        /// Rejected candidate.
        candidate: String,
        /// Side sequence of the candidate.
        side_sequence: u32,
    },
    /// A [`JointInsertedEvent`].
    JointInserted {
        /// Bind joint the bone starts at.
        parent: String,
        /// Inserted joint's name.
        name: String,
        /// Inserted joint's role.
        role: Role,
    },
    /// A [`PassSummary`].
    PassSummary(PassSummary),
    /// A [`RuleMatchEvent`].
    RuleMatch {
        /// Joint the table was applied to.
        joint: String,
        /// Role owning the outermost table.
        owner: Role,
        /// Matched key.
        key: BranchKey,
        /// Child count.
        child_count: u32,
        /// Whether the table was nested.
        nested: bool,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        let v = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_usize(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_string(&mut self) -> Option<String> {
        let len = self.read_usize()?;
        if self.remaining() < len {
            return None;
        }
        let s = core::str::from_utf8(&self.data[self.pos..self.pos + len]).ok()?;
        self.pos += len;
        Some(s.to_owned())
    }

    fn read_pass(&mut self) -> Option<PassKind> {
        Some(match self.read_u8()? {
            0 => PassKind::Classify,
            1 => PassKind::Plan,
            _ => PassKind::Commit,
        })
    }

    fn read_role(&mut self) -> Option<Role> {
        Role::from_index(usize::from(self.read_u8()?))
    }

    fn read_side(&mut self) -> Option<Side> {
        Some(match self.read_u8()? {
            0 => Side::Center,
            1 => Side::Left,
            2 => Side::Right,
            _ => Side::None,
        })
    }

    fn read_branch(&mut self) -> Option<Option<BranchKind>> {
        Some(match self.read_u8()? {
            0 => Some(BranchKind::Exact),
            1 => Some(BranchKind::Predicate),
            2 => Some(BranchKind::Lookahead),
            3 => Some(BranchKind::Wildcard),
            _ => None,
        })
    }

    fn read_predicate(&mut self) -> Option<Predicate> {
        let op = match self.read_u8()? {
            0 => CmpOp::Lt,
            1 => CmpOp::Le,
            2 => CmpOp::Gt,
            3 => CmpOp::Ge,
            4 => CmpOp::Eq,
            _ => CmpOp::Ne,
        };
        Some(Predicate::new(op, self.read_usize()?))
    }

    fn read_key(&mut self) -> Option<BranchKey> {
        Some(match self.read_branch()?? {
            BranchKind::Exact => BranchKey::Exact(self.read_usize()?),
            BranchKind::Predicate => BranchKey::Predicate(self.read_predicate()?),
            BranchKind::Lookahead => BranchKey::Lookahead(self.read_predicate()?),
            BranchKind::Wildcard => BranchKey::Wildcard,
        })
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass: self.read_pass()?,
            roots: self.read_u32()?,
        }))
    }

    fn decode_pass_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassEnd(PassEndEvent {
            pass: self.read_pass()?,
            joints: self.read_u32()?,
            ok: self.read_bool()?,
        }))
    }

    fn decode_joint_classified(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::JointClassified {
            order: self.read_u32()?,
            depth: self.read_u32()?,
            joint: self.read_string()?,
            role: self.read_role()?,
            name_sequence: self.read_u32()?,
            terminal: self.read_bool()?,
            side: self.read_side()?,
            child_count: self.read_u32()?,
            branch: self.read_branch()?,
        })
    }

    fn decode_name_assigned(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::NameAssigned {
            order: self.read_u32()?,
            drive: self.read_string()?,
            bind: self.read_string()?,
            side_sequence: self.read_u32()?,
            attempts: self.read_u32()?,
        })
    }

    fn decode_name_collision(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::NameCollision {
            order: self.read_u32()?,
            candidate: self.read_string()?,
            side_sequence: self.read_u32()?,
        })
    }

    fn decode_joint_inserted(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::JointInserted {
            parent: self.read_string()?,
            name: self.read_string()?,
            role: self.read_role()?,
        })
    }

    fn decode_pass_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassSummary(PassSummary {
            roots: self.read_u32()?,
            joints: self.read_u32()?,
            max_depth: self.read_u32()?,
            collisions: self.read_u32()?,
            inserted: self.read_u32()?,
            constraints: self.read_u32()?,
        }))
    }

    fn decode_rule_match(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RuleMatch {
            joint: self.read_string()?,
            owner: self.read_role()?,
            key: self.read_key()?,
            child_count: self.read_u32()?,
            nested: self.read_bool()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_PASS_END => self.decode_pass_end(),
            TAG_JOINT_CLASSIFIED => self.decode_joint_classified(),
            TAG_NAME_ASSIGNED => self.decode_name_assigned(),
            TAG_NAME_COLLISION => self.decode_name_collision(),
            TAG_JOINT_INSERTED => self.decode_joint_inserted(),
            TAG_PASS_SUMMARY => self.decode_pass_summary(),
            TAG_RULE_MATCH => self.decode_rule_match(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_classified(joint: &str) -> JointClassifiedEvent<'_> {
        JointClassifiedEvent {
            order: 4,
            depth: 3,
            joint,
            role: Role::Elbow,
            name_sequence: 1,
            terminal: false,
            side: Side::Left,
            child_count: 1,
            branch: Some(BranchKind::Exact),
        }
    }

    #[test]
    fn classified_joint_keeps_name_and_side() {
        let mut rec = RecorderSink::new();
        rec.on_joint_classified(&sample_classified("elbow_l"));

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [RecordedEvent::JointClassified {
                order: 4,
                depth: 3,
                joint: "elbow_l".to_owned(),
                role: Role::Elbow,
                name_sequence: 1,
                terminal: false,
                side: Side::Left,
                child_count: 1,
                branch: Some(BranchKind::Exact),
            }]
        );
    }

    #[test]
    fn leaf_without_branch() {
        let mut rec = RecorderSink::new();
        rec.on_joint_classified(&JointClassifiedEvent {
            terminal: true,
            child_count: 0,
            branch: None,
            ..sample_classified("toe_r")
        });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::JointClassified {
                terminal, branch, ..
            }) => {
                assert!(terminal, "leaf must stay terminal");
                assert_eq!(branch, None);
            }
            other => panic!("expected JointClassified, got {other:?}"),
        }
    }

    #[test]
    fn rule_match_keys() {
        let mut rec = RecorderSink::new();
        let keys = [
            BranchKey::Exact(2),
            BranchKey::Predicate(Predicate::new(CmpOp::Ge, 5)),
            BranchKey::Lookahead(Predicate::lt(3)),
            BranchKey::Wildcard,
        ];
        for key in keys {
            rec.on_rule_match(&RuleMatchEvent {
                joint: "chest",
                owner: Role::Spine,
                key,
                child_count: 3,
                nested: matches!(key, BranchKey::Lookahead(_)),
            });
        }
        let decoded: Vec<BranchKey> = decode(rec.as_bytes())
            .map(|e| match e {
                RecordedEvent::RuleMatch { key, .. } => key,
                other => panic!("expected RuleMatch, got {other:?}"),
            })
            .collect();
        assert_eq!(decoded, keys);
    }

    #[test]
    fn multiple_events_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            pass: PassKind::Plan,
            roots: 1,
        });
        rec.on_name_collision(&NameCollisionEvent {
            order: 0,
            candidate: "DJ_C01_Root01",
            side_sequence: 1,
        });
        rec.on_name_assigned(&NameAssignedEvent {
            order: 0,
            drive: "DJ_C02_Root01",
            bind: "BJ_C02_Root01",
            side_sequence: 2,
            attempts: 2,
        });
        rec.on_joint_inserted(&JointInsertedEvent {
            parent: "BJ_L01_Elbow01",
            name: "BJ_L01_Elbow02",
            role: Role::Elbow,
        });
        rec.on_pass_end(&PassEndEvent {
            pass: PassKind::Plan,
            joints: 1,
            ok: true,
        });
        rec.on_pass_summary(&PassSummary {
            roots: 1,
            joints: 1,
            collisions: 1,
            ..PassSummary::default()
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], RecordedEvent::PassBegin(_)));
        assert!(matches!(
            &events[1],
            RecordedEvent::NameCollision { candidate, .. } if candidate == "DJ_C01_Root01"
        ));
        assert!(matches!(
            &events[2],
            RecordedEvent::NameAssigned { side_sequence: 2, attempts: 2, .. }
        ));
        assert!(matches!(
            &events[3],
            RecordedEvent::JointInserted { role: Role::Elbow, .. }
        ));
        assert!(matches!(events[4], RecordedEvent::PassEnd(PassEndEvent { ok: true, .. })));
        match &events[5] {
            RecordedEvent::PassSummary(s) => assert_eq!(s.collisions, 1),
            other => panic!("expected PassSummary, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops() {
        let mut rec = RecorderSink::new();
        rec.on_joint_classified(&sample_classified("hand_l"));
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert!(events.is_empty());
    }
}
