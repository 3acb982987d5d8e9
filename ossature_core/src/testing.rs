// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Skeleton fixtures shared by the unit tests.

use crate::joint::{JointId, JointStore};
use crate::point::Point3;

/// Creates a joint with a local translation, parented under `parent`.
pub(crate) fn joint(
    store: &mut JointStore,
    parent: Option<JointId>,
    name: &str,
    at: [f64; 3],
) -> JointId {
    let id = store.create_joint(name);
    store.set_translation(id, Point3::new(at[0], at[1], at[2]));
    if let Some(parent) = parent {
        store.add_child(parent, id);
    }
    id
}

/// A straight chain of joints one unit apart along `y`; returns the top.
pub(crate) fn chain(store: &mut JointStore, names: &[&str]) -> JointId {
    let mut parent = None;
    let mut top = None;
    for name in names {
        let id = joint(store, parent, name, [0.0, 1.0, 0.0]);
        top.get_or_insert(id);
        parent = Some(id);
    }
    top.expect("chain needs at least one name")
}

/// Looks up the single joint called `name`.
pub(crate) fn named(store: &JointStore, name: &str) -> JointId {
    let found = store.find_named(name);
    assert_eq!(found.len(), 1, "expected exactly one joint named `{name}`");
    found[0]
}

/// A 29-joint biped facing `+z`; returns the root.
///
/// ```text
/// root
/// └─ hips
///    ├─ spine_1 ─ spine_2 ─ chest
///    │                      ├─ neck_1 ─ neck_2 ─ head ─ head_end
///    │                      ├─ collar_l ─ shoulder_l ─ elbow_l ─ hand_l ─┬─ hand_l_end
///    │                      │                                            └─ thumb_l
///    │                      └─ collar_r ...
///    ├─ hip_l ─ knee_l ─ foot_l ─ toe_l
///    └─ hip_r ...
/// ```
pub(crate) fn biped(store: &mut JointStore) -> JointId {
    let root = joint(store, None, "root", [0.0, 0.0, 0.0]);
    let hips = joint(store, Some(root), "hips", [0.0, 10.0, 0.0]);
    let spine_1 = joint(store, Some(hips), "spine_1", [0.0, 1.0, 0.0]);
    let spine_2 = joint(store, Some(spine_1), "spine_2", [0.0, 1.5, 0.0]);
    let chest = joint(store, Some(spine_2), "chest", [0.0, 2.0, 0.0]);

    let neck_1 = joint(store, Some(chest), "neck_1", [0.0, 1.5, 0.0]);
    let neck_2 = joint(store, Some(neck_1), "neck_2", [0.0, 0.5, 0.0]);
    let head = joint(store, Some(neck_2), "head", [0.0, 0.5, 0.0]);
    joint(store, Some(head), "head_end", [0.0, 2.0, 0.0]);

    for (suffix, x) in [("l", 1.0), ("r", -1.0)] {
        let collar = joint(store, Some(chest), &format!("collar_{suffix}"), [x * 0.5, 1.0, 0.0]);
        let shoulder = joint(store, Some(collar), &format!("shoulder_{suffix}"), [x, 0.0, 0.0]);
        let elbow = joint(store, Some(shoulder), &format!("elbow_{suffix}"), [x * 2.5, 0.0, 0.0]);
        let hand = joint(store, Some(elbow), &format!("hand_{suffix}"), [x * 2.5, 0.0, 0.0]);
        joint(store, Some(hand), &format!("hand_{suffix}_end"), [x, 0.0, 0.0]);
        joint(store, Some(hand), &format!("thumb_{suffix}"), [x * 0.5, 0.0, 0.5]);
    }
    for (suffix, x) in [("l", 1.0), ("r", -1.0)] {
        let hip = joint(store, Some(hips), &format!("hip_{suffix}"), [x, -0.5, 0.0]);
        let knee = joint(store, Some(hip), &format!("knee_{suffix}"), [0.0, -4.5, 0.5]);
        let foot = joint(store, Some(knee), &format!("foot_{suffix}"), [0.0, -4.5, -0.5]);
        joint(store, Some(foot), &format!("toe_{suffix}"), [0.0, -0.5, 1.5]);
    }
    root
}
