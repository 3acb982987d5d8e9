// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host joint labels.
//!
//! Animation hosts tag joints with a side and a body-part type so that
//! mirroring and retargeting tools can pair them up. The label vocabulary is
//! fixed by the host; roles without a matching entry are labelled
//! [`LabelType::Other`] with their role name attached.

use crate::side::Side;

/// Body-part types understood by the host, in host index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "variant names are the host's label names")]
pub enum LabelType {
    None,
    Root,
    Hip,
    Knee,
    Foot,
    Toe,
    Spine,
    Neck,
    Head,
    Collar,
    Shoulder,
    Elbow,
    Hand,
    Finger,
    Thumb,
    PropA,
    PropB,
    PropC,
    Other,
    IndexFinger,
    MiddleFinger,
    RingFinger,
    PinkyFinger,
    ExtraFinger,
    BigToe,
    IndexToe,
    MiddleToe,
    RingToe,
    PinkyToe,
    ExtraToe,
}

impl LabelType {
    /// Every label type, in host index order.
    pub const ALL: [Self; 30] = [
        Self::None,
        Self::Root,
        Self::Hip,
        Self::Knee,
        Self::Foot,
        Self::Toe,
        Self::Spine,
        Self::Neck,
        Self::Head,
        Self::Collar,
        Self::Shoulder,
        Self::Elbow,
        Self::Hand,
        Self::Finger,
        Self::Thumb,
        Self::PropA,
        Self::PropB,
        Self::PropC,
        Self::Other,
        Self::IndexFinger,
        Self::MiddleFinger,
        Self::RingFinger,
        Self::PinkyFinger,
        Self::ExtraFinger,
        Self::BigToe,
        Self::IndexToe,
        Self::MiddleToe,
        Self::RingToe,
        Self::PinkyToe,
        Self::ExtraToe,
    ];

    /// Returns the host's integer value for this label type.
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a label type by its host name (e.g. `"Elbow"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|label| format!("{label:?}") == name)
    }
}

/// The label written onto a joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JointLabel {
    /// Side attribute.
    pub side: Side,
    /// Body-part type attribute.
    pub kind: LabelType,
    /// Free-form type name, set when `kind` is [`LabelType::Other`].
    pub other: Option<&'static str>,
}

impl JointLabel {
    /// Builds a label from a side and a type name.
    ///
    /// Names unknown to the host become [`LabelType::Other`] carrying `name`.
    #[must_use]
    pub fn new(side: Side, name: &'static str) -> Self {
        match LabelType::from_name(name) {
            Some(kind) if kind != LabelType::Other => Self {
                side,
                kind,
                other: None,
            },
            _ => Self {
                side,
                kind: LabelType::Other,
                other: Some(name),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_host_order() {
        assert_eq!(LabelType::None.index(), 0);
        assert_eq!(LabelType::Spine.index(), 6);
        assert_eq!(LabelType::Other.index(), 18);
        assert_eq!(LabelType::ExtraToe.index(), 29);
        for (i, label) in LabelType::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(label.index()), i);
        }
    }

    #[test]
    fn known_names_map_directly() {
        let label = JointLabel::new(Side::Left, "Elbow");
        assert_eq!(label.kind, LabelType::Elbow);
        assert_eq!(label.other, None);
    }

    #[test]
    fn unknown_names_become_other() {
        let label = JointLabel::new(Side::Center, "Pelvis");
        assert_eq!(label.kind, LabelType::Other);
        assert_eq!(label.other, Some("Pelvis"));
    }
}
