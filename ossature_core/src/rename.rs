// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch renaming of arbitrary joint sets.
//!
//! Every operation computes all new names first, checks them against each
//! other and against the rest of the store, then renames through unique
//! placeholders. A failed check leaves every name as it was.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::RigError;
use crate::joint::{JointId, JointStore};
use crate::naming::{Fields, NamingSpec};

/// `%d` or `%0Nd`.
static COUNTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(?:0(\d+))?d").unwrap_or_else(|e| unreachable!("counter regex: {e}"))
});

/// Renames sets of joints atomically.
#[derive(Clone, Debug)]
pub struct BatchRenamer {
    placeholder: String,
}

impl Default for BatchRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchRenamer {
    /// A renamer using `FooJoint` placeholders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_placeholder("FooJoint")
    }

    /// A renamer using the given placeholder prefix.
    #[must_use]
    pub fn with_placeholder(prefix: impl Into<String>) -> Self {
        Self {
            placeholder: prefix.into(),
        }
    }

    /// Names `joints` from `template`, replacing each `%d` or `%0Nd` with the
    /// joint's 1-based position. A `%d` is appended to templates without one.
    ///
    /// Returns the new names.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::NameCollision`] if a new name is already used by a
    /// joint outside `joints`, or twice within it.
    pub fn assign_sequential(
        &self,
        store: &mut JointStore,
        joints: &[JointId],
        template: &str,
    ) -> Result<Vec<String>, RigError> {
        let template = if COUNTER.is_match(template) {
            template.to_owned()
        } else {
            format!("{template}%d")
        };
        let names: Vec<String> = (1..=joints.len())
            .map(|i| {
                COUNTER
                    .replace_all(&template, |caps: &Captures<'_>| {
                        let width = caps
                            .get(1)
                            .and_then(|w| w.as_str().parse::<usize>().ok())
                            .unwrap_or(0);
                        format!("{i:0width$}")
                    })
                    .into_owned()
            })
            .collect();
        self.commit(store, joints, &names)?;
        Ok(names)
    }

    /// Replaces the first match of `pattern` in each joint's name.
    ///
    /// `replacement` may refer to capture groups (`$1`, `${name}`). Joints
    /// whose names do not match are left alone.
    ///
    /// Returns how many joints were renamed.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::NameCollision`] if two joints would end up with the
    /// same name, or one would take a name used elsewhere.
    pub fn search_replace(
        &self,
        store: &mut JointStore,
        joints: &[JointId],
        pattern: &Regex,
        replacement: &str,
    ) -> Result<usize, RigError> {
        let (targets, names): (Vec<JointId>, Vec<String>) = joints
            .iter()
            .filter_map(|&joint| {
                let old = store.name(joint);
                pattern
                    .is_match(old)
                    .then(|| (joint, pattern.replacen(old, 1, replacement).into_owned()))
            })
            .unzip();
        self.commit(store, &targets, &names)?;
        Ok(targets.len())
    }

    /// Parses each name with `spec`, overrides the fields in `overrides`,
    /// and renders the result.
    ///
    /// Returns the new names.
    ///
    /// # Errors
    ///
    /// - [`RigError::Naming`] with
    ///   [`NamingError::PatternMismatch`](crate::error::NamingError::PatternMismatch)
    ///   if a current name does not follow `spec`, or with a format error if
    ///   an override cannot be rendered.
    /// - [`RigError::NameCollision`] as for
    ///   [`assign_sequential`](Self::assign_sequential).
    pub fn retag(
        &self,
        store: &mut JointStore,
        joints: &[JointId],
        spec: &NamingSpec,
        overrides: &Fields,
    ) -> Result<Vec<String>, RigError> {
        let names = joints
            .iter()
            .map(|&joint| {
                let mut fields = spec.match_name(store.name(joint))?;
                fields.merge(overrides);
                spec.format(&fields)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.commit(store, joints, &names)?;
        Ok(names)
    }

    fn commit(
        &self,
        store: &mut JointStore,
        joints: &[JointId],
        names: &[String],
    ) -> Result<(), RigError> {
        let renamed: HashSet<JointId> = joints.iter().copied().collect();
        let mut used: HashSet<&str> = HashSet::new();
        for top in store.roots() {
            used.extend(
                store
                    .descendants(top)
                    .filter(|j| !renamed.contains(j))
                    .map(|j| store.name(j)),
            );
        }
        let mut fresh: HashSet<&str> = HashSet::new();
        for name in names {
            if used.contains(name.as_str()) || !fresh.insert(name) {
                return Err(RigError::NameCollision(name.clone()));
            }
        }
        drop(used);

        let mut n = 1_u32;
        for &joint in joints {
            let placeholder = loop {
                let candidate = format!("{}{n}", self.placeholder);
                n += 1;
                if store.count_named(&candidate) == 0 && !fresh.contains(candidate.as_str()) {
                    break candidate;
                }
            };
            store.set_name(joint, placeholder);
        }
        for (&joint, name) in joints.iter().zip(names) {
            store.set_name(joint, name.clone());
        }
        Ok(())
    }
}
