// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule tables: how a joint's child count selects its children's roles.
//!
//! A [`RuleTable`] is an ordered list of [`Rule`]s. Each rule pairs a
//! [`BranchKey`] (which child counts it applies to) with a [`ClassSpec`]
//! (which roles the children get).
//!
//! # Key priority
//!
//! For a joint with `n` children, keys are probed by kind, first match wins:
//!
//! 1. [`BranchKey::Exact`]: `n` equals the key.
//! 2. [`BranchKey::Predicate`]: a comparison such as `%d<3` holds for `n`.
//! 3. [`BranchKey::Lookahead`]: a comparison such as `~%d<3` holds for the
//!    joint **and every descendant's** child count.
//! 4. [`BranchKey::Wildcard`]: always matches.
//!
//! Within one kind, declaration order decides.

use core::fmt;
use core::str::FromStr;

use crate::error::RuleError;
use crate::role::Role;
use crate::tree::JointTree;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl CmpOp {
    /// Returns the operator's source text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    /// The operator with its operands swapped (`a < b` ⇔ `b > a`).
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            Self::Eq => Self::Eq,
            Self::Ne => Self::Ne,
        }
    }
}

/// A comparison between a child count and a constant: `%d <op> operand`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Predicate {
    /// Comparison operator, with the child count on the left.
    pub op: CmpOp,
    /// Constant right-hand side.
    pub operand: usize,
}

impl Predicate {
    /// Creates a predicate `%d <op> operand`.
    #[must_use]
    pub const fn new(op: CmpOp, operand: usize) -> Self {
        Self { op, operand }
    }

    /// `%d < operand`.
    #[must_use]
    pub const fn lt(operand: usize) -> Self {
        Self::new(CmpOp::Lt, operand)
    }

    /// `%d >= operand`.
    #[must_use]
    pub const fn ge(operand: usize) -> Self {
        Self::new(CmpOp::Ge, operand)
    }

    /// Evaluates the predicate for a child count.
    #[must_use]
    pub const fn eval(self, count: usize) -> bool {
        match self.op {
            CmpOp::Lt => count < self.operand,
            CmpOp::Le => count <= self.operand,
            CmpOp::Gt => count > self.operand,
            CmpOp::Ge => count >= self.operand,
            CmpOp::Eq => count == self.operand,
            CmpOp::Ne => count != self.operand,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%d{}{}", self.op.as_str(), self.operand)
    }
}

/// Placeholder for the child count in predicate source text.
const COUNT_PLACEHOLDER: &str = "%d";

impl FromStr for Predicate {
    type Err = RuleError;

    /// Parses `%d<3`, `%d >= 2`, or the mirrored form `3>%d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RuleError::InvalidPredicate(s.to_owned());
        let text = s.trim();
        // Longest operators first so `<=` is not read as `<`.
        const OPS: [CmpOp; 6] = [
            CmpOp::Le,
            CmpOp::Ge,
            CmpOp::Eq,
            CmpOp::Ne,
            CmpOp::Lt,
            CmpOp::Gt,
        ];
        let (op, at) = OPS
            .into_iter()
            .find_map(|op| text.find(op.as_str()).map(|at| (op, at)))
            .ok_or_else(invalid)?;
        let lhs = text[..at].trim();
        let rhs = text[at + op.as_str().len()..].trim();

        match (lhs == COUNT_PLACEHOLDER, rhs == COUNT_PLACEHOLDER) {
            (true, false) => Ok(Self::new(op, rhs.parse().map_err(|_| invalid())?)),
            (false, true) => Ok(Self::new(op.flipped(), lhs.parse().map_err(|_| invalid())?)),
            _ => Err(invalid()),
        }
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Which child counts a [`Rule`] applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchKey {
    /// Exactly this many children.
    Exact(usize),
    /// The joint's child count satisfies the predicate.
    Predicate(Predicate),
    /// The child count of the joint and of every descendant satisfies the
    /// predicate.
    Lookahead(Predicate),
    /// Any child count.
    Wildcard,
}

/// The kind of a [`BranchKey`], in probe order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BranchKind {
    /// [`BranchKey::Exact`].
    Exact,
    /// [`BranchKey::Predicate`].
    Predicate,
    /// [`BranchKey::Lookahead`].
    Lookahead,
    /// [`BranchKey::Wildcard`].
    Wildcard,
}

impl BranchKind {
    /// All kinds, in probe order.
    pub const PROBE_ORDER: [Self; 4] = [
        Self::Exact,
        Self::Predicate,
        Self::Lookahead,
        Self::Wildcard,
    ];
}

impl BranchKey {
    /// Returns the kind of this key.
    #[must_use]
    pub const fn kind(self) -> BranchKind {
        match self {
            Self::Exact(_) => BranchKind::Exact,
            Self::Predicate(_) => BranchKind::Predicate,
            Self::Lookahead(_) => BranchKind::Lookahead,
            Self::Wildcard => BranchKind::Wildcard,
        }
    }
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Predicate(p) => write!(f, "{p}"),
            Self::Lookahead(p) => write!(f, "~{p}"),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

impl FromStr for BranchKey {
    type Err = RuleError;

    /// Parses `"3"`, `"%d<3"`, `"~%d<3"`, or `"*"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text == "*" {
            Ok(Self::Wildcard)
        } else if let Some(rest) = text.strip_prefix('~') {
            rest.parse().map(Self::Lookahead)
        } else if text.contains(COUNT_PLACEHOLDER) {
            text.parse().map(Self::Predicate)
        } else {
            text.parse()
                .map(Self::Exact)
                .map_err(|_| RuleError::InvalidKey(s.to_owned()))
        }
    }
}

// ---------------------------------------------------------------------------
// Specs
// ---------------------------------------------------------------------------

/// One position in a [`ClassSpec::Sequence`].
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// The child at this position gets this role.
    Role(Role),
    /// The child at this position gets the role this table selects when
    /// applied to that child.
    Nested(RuleTable),
}

impl From<Role> for Entry {
    fn from(role: Role) -> Self {
        Self::Role(role)
    }
}

impl From<RuleTable> for Entry {
    fn from(table: RuleTable) -> Self {
        Self::Nested(table)
    }
}

/// The roles a matched rule hands out to a joint's children.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassSpec {
    /// Every child gets this role.
    Broadcast(Role),
    /// Child `i` gets entry `i`. Short sequences repeat their last resolved
    /// entry; surplus entries are ignored.
    Sequence(Vec<Entry>),
}

impl ClassSpec {
    /// Builds a sequence spec from roles and nested tables.
    #[must_use]
    pub fn sequence<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Entry>,
    {
        Self::Sequence(entries.into_iter().map(Into::into).collect())
    }
}

impl From<Role> for ClassSpec {
    fn from(role: Role) -> Self {
        Self::Broadcast(role)
    }
}

// ---------------------------------------------------------------------------
// RuleTable
// ---------------------------------------------------------------------------

/// A key/spec pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Which child counts this rule applies to.
    pub key: BranchKey,
    /// The roles it assigns.
    pub spec: ClassSpec,
}

/// An ordered list of rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Creates an empty table. An empty table matches nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The fixed table of a dead-end role: one child, same role.
    #[must_use]
    pub fn dead_end(role: Role) -> Self {
        Self::new().exact(1, role)
    }

    /// Appends a rule.
    #[must_use]
    pub fn with(mut self, key: BranchKey, spec: impl Into<ClassSpec>) -> Self {
        self.rules.push(Rule {
            key,
            spec: spec.into(),
        });
        self
    }

    /// Appends an exact-count rule.
    #[must_use]
    pub fn exact(self, count: usize, spec: impl Into<ClassSpec>) -> Self {
        self.with(BranchKey::Exact(count), spec)
    }

    /// Appends a predicate rule.
    #[must_use]
    pub fn predicate(self, predicate: Predicate, spec: impl Into<ClassSpec>) -> Self {
        self.with(BranchKey::Predicate(predicate), spec)
    }

    /// Appends a lookahead rule.
    #[must_use]
    pub fn lookahead(self, predicate: Predicate, spec: impl Into<ClassSpec>) -> Self {
        self.with(BranchKey::Lookahead(predicate), spec)
    }

    /// Appends a wildcard rule.
    #[must_use]
    pub fn wildcard(self, spec: impl Into<ClassSpec>) -> Self {
        self.with(BranchKey::Wildcard, spec)
    }

    /// Appends a rule whose key is given in source form (`"2"`, `"%d<3"`,
    /// `"~%d<3"`, `"*"`).
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the key does not parse.
    pub fn parsed(self, key: &str, spec: impl Into<ClassSpec>) -> Result<Self, RuleError> {
        Ok(self.with(key.parse()?, spec))
    }

    /// Returns the rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns `true` if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether some rule matches every child count.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.rules.iter().any(|r| r.key == BranchKey::Wildcard)
    }

    /// Selects the rule that applies to `joint`, honoring key priority.
    ///
    /// Returns `None` if nothing matches.
    pub fn select<T: JointTree>(&self, tree: &T, joint: T::Id) -> Option<&Rule> {
        let count = tree.child_count(joint);
        BranchKind::PROBE_ORDER.into_iter().find_map(|kind| {
            self.rules
                .iter()
                .filter(|rule| rule.key.kind() == kind)
                .find(|rule| match rule.key {
                    BranchKey::Exact(n) => n == count,
                    BranchKey::Predicate(p) => p.eval(count),
                    BranchKey::Lookahead(p) => lookahead_holds(tree, joint, p),
                    BranchKey::Wildcard => true,
                })
        })
    }
}

/// Whether `predicate` holds for the child count of `joint` and of every
/// joint below it.
pub fn lookahead_holds<T: JointTree>(tree: &T, joint: T::Id, predicate: Predicate) -> bool {
    let mut stack = vec![joint];
    while let Some(id) = stack.pop() {
        let count = tree.child_count(id);
        if !predicate.eval(count) {
            return false;
        }
        stack.extend((0..count).filter_map(|i| tree.child(id, i)));
    }
    true
}
