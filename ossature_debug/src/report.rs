// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON rig report exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes one JSON object grouping the events by kind:
//!
//! ```text
//! {
//!   "passes":      [{ "pass", "roots", "joints", "ok" }],
//!   "joints":      [{ "order", "depth", "joint", "role", "name_sequence", ... }],
//!   "names":       [{ "order", "drive", "bind", "side_sequence", "attempts" }],
//!   "collisions":  [{ "order", "candidate", "side_sequence" }],
//!   "inserted":    [{ "parent", "name", "role" }],
//!   "rule_matches": [{ "joint", "owner", "key", "child_count", "nested" }],
//!   "summary":     { "roots", "joints", ... } | null
//! }
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON rig report.
///
/// A pass begin and its matching end are merged into one `passes` entry; a
/// pass that never ended is reported with `"ok": null`.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut passes: Vec<Value> = Vec::new();
    let mut joints: Vec<Value> = Vec::new();
    let mut names: Vec<Value> = Vec::new();
    let mut collisions: Vec<Value> = Vec::new();
    let mut inserted: Vec<Value> = Vec::new();
    let mut rule_matches: Vec<Value> = Vec::new();
    let mut summary = Value::Null;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::PassBegin(e) => {
                passes.push(json!({
                    "pass": format!("{:?}", e.pass),
                    "roots": e.roots,
                    "joints": null,
                    "ok": null,
                }));
            }
            RecordedEvent::PassEnd(e) => {
                let name = format!("{:?}", e.pass);
                let open = passes
                    .iter_mut()
                    .rev()
                    .find(|p| p["pass"] == name.as_str() && p["ok"].is_null());
                match open {
                    Some(entry) => {
                        entry["joints"] = json!(e.joints);
                        entry["ok"] = json!(e.ok);
                    }
                    None => passes.push(json!({
                        "pass": name,
                        "roots": null,
                        "joints": e.joints,
                        "ok": e.ok,
                    })),
                }
            }
            RecordedEvent::JointClassified {
                order,
                depth,
                joint,
                role,
                name_sequence,
                terminal,
                side,
                child_count,
                branch,
            } => {
                joints.push(json!({
                    "order": order,
                    "depth": depth,
                    "joint": joint,
                    "role": role.name(),
                    "name_sequence": name_sequence,
                    "terminal": terminal,
                    "side": side.code(),
                    "child_count": child_count,
                    "branch": branch.map(|k| format!("{k:?}")),
                }));
            }
            RecordedEvent::NameAssigned {
                order,
                drive,
                bind,
                side_sequence,
                attempts,
            } => {
                names.push(json!({
                    "order": order,
                    "drive": drive,
                    "bind": bind,
                    "side_sequence": side_sequence,
                    "attempts": attempts,
                }));
            }
            RecordedEvent::NameCollision {
                order,
                candidate,
                side_sequence,
            } => {
                collisions.push(json!({
                    "order": order,
                    "candidate": candidate,
                    "side_sequence": side_sequence,
                }));
            }
            RecordedEvent::JointInserted { parent, name, role } => {
                inserted.push(json!({
                    "parent": parent,
                    "name": name,
                    "role": role.name(),
                }));
            }
            RecordedEvent::PassSummary(s) => {
                summary = json!({
                    "roots": s.roots,
                    "joints": s.joints,
                    "max_depth": s.max_depth,
                    "collisions": s.collisions,
                    "inserted": s.inserted,
                    "constraints": s.constraints,
                });
            }
            RecordedEvent::RuleMatch {
                joint,
                owner,
                key,
                child_count,
                nested,
            } => {
                rule_matches.push(json!({
                    "joint": joint,
                    "owner": owner.name(),
                    "key": key.to_string(),
                    "child_count": child_count,
                    "nested": nested,
                }));
            }
        }
    }

    let report = json!({
        "passes": passes,
        "joints": joints,
        "names": names,
        "collisions": collisions,
        "inserted": inserted,
        "rule_matches": rule_matches,
        "summary": summary,
    });
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}
