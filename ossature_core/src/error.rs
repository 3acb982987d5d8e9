// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use core::fmt;

use crate::naming::FieldKey;
use crate::role::Role;

/// Errors from building rule tables and grammars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// A branch key that is neither a count, a predicate, nor `*`.
    InvalidKey(String),
    /// A predicate that is not `%d <op> N` or `N <op> %d`.
    InvalidPredicate(String),
    /// Dead-end roles keep their fixed single-branch rule.
    DeadEndOverride(Role),
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid branch key `{key}`"),
            Self::InvalidPredicate(p) => write!(f, "invalid child-count predicate `{p}`"),
            Self::DeadEndOverride(role) => {
                write!(f, "{role} is a dead-end role and its rules cannot be replaced")
            }
        }
    }
}

impl core::error::Error for RuleError {}

/// Errors from classifying a joint hierarchy.
///
/// Every variant names the joint where resolution stopped and the role whose
/// rule table was being applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifyError {
    /// No rule key matched the joint's child count and the table has no
    /// wildcard.
    StructuralMismatch {
        /// Name of the joint whose children could not be classified.
        joint: String,
        /// Role whose table was consulted.
        role: Role,
        /// The joint's child count.
        child_count: usize,
    },
    /// A nested table needed to look at the first child of a leaf.
    MissingChild {
        /// Name of the childless joint.
        joint: String,
        /// Role whose table was consulted.
        role: Role,
    },
    /// A matched rule carried an empty sequence.
    EmptySequence {
        /// Name of the joint being classified.
        joint: String,
        /// Role whose table was consulted.
        role: Role,
    },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructuralMismatch {
                joint,
                role,
                child_count,
            } => write!(
                f,
                "{child_count} children not supported for {role} (joint `{joint}`)"
            ),
            Self::MissingChild { joint, role } => write!(
                f,
                "{role} rules look below joint `{joint}`, which has no children"
            ),
            Self::EmptySequence { joint, role } => {
                write!(f, "{role} rule for joint `{joint}` assigns no roles")
            }
        }
    }
}

impl core::error::Error for ClassifyError {}

/// Errors from compiling naming patterns and generating or matching names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamingError {
    /// A `<...>` token that is not one of the known field keys.
    UnknownToken(String),
    /// A field key appears twice in the pattern.
    DuplicateToken(FieldKey),
    /// The pattern contains no field tokens.
    NoTokens(String),
    /// The compiled matcher was rejected by the regex engine.
    InvalidPattern(String),
    /// A field required by the pattern was not supplied.
    MissingField(FieldKey),
    /// No formatting template could render the fields into a conforming name.
    FormatMismatch(String),
    /// An existing name does not follow the convention.
    PatternMismatch {
        /// The offending name.
        name: String,
        /// The pattern source.
        pattern: String,
    },
    /// Drive and bind joints would render to the same names, either because
    /// the pattern has no `<nt>` token or because both share one node type.
    IndistinctJointTypes(String),
    /// Collision avoidance ran out of side-sequence numbers.
    SequenceExhausted {
        /// The last candidate tried.
        name: String,
        /// The ceiling that was hit.
        ceiling: u32,
    },
}

impl fmt::Display for NamingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownToken(token) => write!(f, "unknown naming token `<{token}>`"),
            Self::DuplicateToken(key) => write!(f, "naming token `<{key}>` appears twice"),
            Self::NoTokens(pattern) => write!(f, "naming pattern `{pattern}` has no tokens"),
            Self::InvalidPattern(reason) => write!(f, "naming pattern does not compile: {reason}"),
            Self::MissingField(key) => write!(f, "no value supplied for naming field `{key}`"),
            Self::FormatMismatch(fields) => {
                write!(f, "string format mismatch: cannot render {fields}")
            }
            Self::PatternMismatch { name, pattern } => write!(
                f,
                "name `{name}` does not match the required naming convention: {pattern}"
            ),
            Self::IndistinctJointTypes(pattern) => write!(
                f,
                "naming pattern `{pattern}` gives drive and bind joints the same names"
            ),
            Self::SequenceExhausted { name, ceiling } => write!(
                f,
                "no unique name found after side sequence {ceiling} (last tried `{name}`)"
            ),
        }
    }
}

impl core::error::Error for NamingError {}

/// Errors from building a [`Character`](crate::character::Character) or
/// running a batch rename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RigError {
    /// Nothing was selected.
    EmptySelection,
    /// Classification of the drive chain failed.
    Classify(ClassifyError),
    /// A name could not be generated or parsed.
    Naming(NamingError),
    /// A name that must keep its fields verbatim is already taken.
    NameCollision(String),
    /// The bind copy of the named root does not line up with its drive
    /// skeleton.
    BindMismatch(String),
}

impl fmt::Display for RigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelection => f.write_str("selection requires at least one joint"),
            Self::Classify(e) => write!(f, "classification failed: {e}"),
            Self::Naming(e) => write!(f, "naming failed: {e}"),
            Self::NameCollision(name) => write!(f, "name `{name}` is already in use"),
            Self::BindMismatch(root) => {
                write!(f, "bind copy of `{root}` does not match its drive skeleton")
            }
        }
    }
}

impl core::error::Error for RigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Classify(e) => Some(e),
            Self::Naming(e) => Some(e),
            Self::EmptySelection | Self::NameCollision(_) | Self::BindMismatch(_) => None,
        }
    }
}

impl From<ClassifyError> for RigError {
    fn from(e: ClassifyError) -> Self {
        Self::Classify(e)
    }
}

impl From<NamingError> for RigError {
    fn from(e: NamingError) -> Self {
        Self::Naming(e)
    }
}
