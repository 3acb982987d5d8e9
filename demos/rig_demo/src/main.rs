// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builds a biped skeleton, rigs it, and exercises the diagnostics pipeline.
//!
//! Events go to both a [`PrettyPrintSink`] and a [`RecorderSink`]; the
//! recording is then exported as `rig_report.json`. A console [`HostSync`]
//! stands in for a real scene graph.

use std::fs::File;
use std::io::BufWriter;

use ossature_core::character::{Character, CharacterConfig};
use ossature_core::host::HostSync;
use ossature_core::joint::{JointId, JointStore, TreeChanges};
use ossature_core::naming::{FieldKey, Fields, NamingSpec};
use ossature_core::point::Point3;
use ossature_core::rename::BatchRenamer;
use ossature_core::trace::{
    JointClassifiedEvent, JointInsertedEvent, NameAssignedEvent, NameCollisionEvent,
    PassBeginEvent, PassEndEvent, PassSummary, RuleMatchEvent, TraceSink, Tracer,
};

use ossature_debug::pretty::PrettyPrintSink;
use ossature_debug::recorder::RecorderSink;

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.a.on_pass_begin(e);
        self.b.on_pass_begin(e);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.a.on_pass_end(e);
        self.b.on_pass_end(e);
    }

    fn on_joint_classified(&mut self, e: &JointClassifiedEvent<'_>) {
        self.a.on_joint_classified(e);
        self.b.on_joint_classified(e);
    }

    fn on_name_assigned(&mut self, e: &NameAssignedEvent<'_>) {
        self.a.on_name_assigned(e);
        self.b.on_name_assigned(e);
    }

    fn on_name_collision(&mut self, e: &NameCollisionEvent<'_>) {
        self.a.on_name_collision(e);
        self.b.on_name_collision(e);
    }

    fn on_joint_inserted(&mut self, e: &JointInsertedEvent<'_>) {
        self.a.on_joint_inserted(e);
        self.b.on_joint_inserted(e);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.a.on_pass_summary(s);
        self.b.on_pass_summary(s);
    }

    fn on_rule_match(&mut self, e: &RuleMatchEvent<'_>) {
        self.a.on_rule_match(e);
        self.b.on_rule_match(e);
    }
}

/// Prints what a scene graph would have to do.
#[derive(Default)]
struct ConsoleHost {
    syncs: u32,
}

impl HostSync for ConsoleHost {
    fn apply(&mut self, store: &JointStore, changes: &TreeChanges) {
        self.syncs += 1;
        println!(
            "[host] sync {}: +{} -{} renamed={} moved={} attrs={}",
            self.syncs,
            changes.added.len(),
            changes.removed.len(),
            changes.names.len(),
            changes.positions.len(),
            changes.attributes.len(),
        );
        for &idx in changes.added.iter().take(3) {
            let p = store.world_position_at(idx);
            println!(
                "[host]   create {} at ({:.2}, {:.2}, {:.2})",
                store.name_at(idx),
                p.x,
                p.y,
                p.z
            );
        }
    }
}

fn joint(store: &mut JointStore, parent: Option<JointId>, name: &str, at: [f64; 3]) -> JointId {
    let id = store.create_joint(name);
    store.set_translation(id, Point3::new(at[0], at[1], at[2]));
    if let Some(parent) = parent {
        store.add_child(parent, id);
    }
    id
}

/// A biped facing `+z`; each hand carries one digit chain and a thumb.
fn biped(store: &mut JointStore) -> JointId {
    let root = joint(store, None, "root", [0.0, 0.0, 0.0]);
    let hips = joint(store, Some(root), "hips", [0.0, 10.0, 0.0]);
    let spine_1 = joint(store, Some(hips), "spine_1", [0.0, 1.0, 0.0]);
    let spine_2 = joint(store, Some(spine_1), "spine_2", [0.0, 1.5, 0.0]);
    let chest = joint(store, Some(spine_2), "chest", [0.0, 2.0, 0.0]);

    let neck = joint(store, Some(chest), "neck", [0.0, 1.5, 0.0]);
    let head = joint(store, Some(neck), "head", [0.0, 0.75, 0.0]);
    joint(store, Some(head), "head_end", [0.0, 2.0, 0.0]);

    for (s, x) in [("l", 1.0), ("r", -1.0)] {
        let collar = joint(store, Some(chest), &format!("collar_{s}"), [x * 0.5, 1.0, 0.0]);
        let shoulder = joint(store, Some(collar), &format!("shoulder_{s}"), [x, 0.0, 0.0]);
        let elbow = joint(store, Some(shoulder), &format!("elbow_{s}"), [x * 2.5, 0.0, 0.0]);
        let hand = joint(store, Some(elbow), &format!("hand_{s}"), [x * 2.5, 0.0, 0.0]);
        let digit = joint(store, Some(hand), &format!("digit_{s}_1"), [x, 0.0, 0.0]);
        let digit_2 = joint(store, Some(digit), &format!("digit_{s}_2"), [x * 0.4, 0.0, 0.0]);
        joint(store, Some(digit_2), &format!("digit_{s}_end"), [x * 0.3, 0.0, 0.0]);
        let thumb = joint(store, Some(hand), &format!("thumb_{s}_1"), [x * 0.4, 0.0, 0.5]);
        joint(store, Some(thumb), &format!("thumb_{s}_end"), [x * 0.4, 0.0, 0.3]);
    }

    for (s, x) in [("l", 1.0), ("r", -1.0)] {
        let hip = joint(store, Some(hips), &format!("hip_{s}"), [x, -0.5, 0.0]);
        let knee = joint(store, Some(hip), &format!("knee_{s}"), [0.0, -4.5, 0.5]);
        let foot = joint(store, Some(knee), &format!("foot_{s}"), [0.0, -4.5, -0.5]);
        joint(store, Some(foot), &format!("toe_{s}"), [0.0, -0.5, 1.5]);
    }
    root
}

fn main() {
    // -- scene -------------------------------------------------------------
    let mut store = JointStore::new();
    let mut host = ConsoleHost::default();
    let root = biped(&mut store);
    let changes = store.evaluate();
    host.apply(&store, &changes);

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- rig ---------------------------------------------------------------
    let config = CharacterConfig::polyped();
    let character = {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        Character::build(&mut store, &[root], &config, &mut tracer).expect("biped must rig")
    };
    let changes = store.evaluate();
    host.apply(&store, &changes);

    for plan in character.constraints().iter().take(5) {
        println!(
            "[constraint] {} : {} -> {}",
            plan.name,
            store.name(plan.driver),
            store.name(plan.driven)
        );
    }

    // -- retag the bind skeleton as skin joints ------------------------------
    let spec = NamingSpec::compile(&config.pattern).expect("pattern must compile");
    let bind: Vec<JointId> = character
        .bind_roots()
        .iter()
        .flat_map(|&top| store.descendants(top).collect::<Vec<_>>())
        .collect();
    let overrides = Fields::new().with(FieldKey::NodeType, "JNT");
    let renamed = BatchRenamer::new()
        .retag(&mut store, &bind, &spec, &overrides)
        .expect("bind names follow the convention");
    println!("[retag] {} bind joints, first {}", renamed.len(), renamed[0]);
    let changes = store.evaluate();
    host.apply(&store, &changes);

    // -- export report -----------------------------------------------------
    let path = "rig_report.json";
    let file = File::create(path).expect("failed to create rig_report.json");
    let mut writer = BufWriter::new(file);
    ossature_debug::report::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write rig report");

    let summary = character.summary();
    println!(
        "Wrote {path} ({} joints, {} inserted, {} collisions)",
        summary.joints, summary.inserted, summary.collisions
    );
}
