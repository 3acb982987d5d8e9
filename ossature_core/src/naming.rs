// Copyright 2026 the Ossature Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Token-based naming conventions.
//!
//! A pattern such as `<nt>_<s><ss>_<n><ns>` is compiled into a
//! [`NamingSpec`]: an ordered list of [`Segment`]s, one anchored matcher
//! regex, and one or more formatting templates.
//!
//! ## Tokens
//!
//! | Token  | Field                      | Formats            | Matches            |
//! |--------|----------------------------|--------------------|--------------------|
//! | `<nt>` | [`FieldKey::NodeType`]     | `%s`               | `[A-Z]{2,4}`       |
//! | `<s>`  | [`FieldKey::Side`]         | `%s`               | `[A-Z]`            |
//! | `<ss>` | [`FieldKey::SideSequence`] | `%02d`             | `\d{2,}`           |
//! | `<n>`  | [`FieldKey::Name`]         | `%s`               | `[A-Z][A-Za-z]*`   |
//! | `<ns>` | [`FieldKey::NameSequence`] | `%02d`, then `%s`  | `\d{2,}` or `Tip`  |
//!
//! Literal text after a token becomes that segment's suffix; text before the
//! first token is the pattern prefix.
//!
//! ## Templates
//!
//! A compiled pattern carries as many templates as its longest format list
//! (two for the default fields). Template `i` renders each segment with its `i`-th format,
//! falling back to the first. [`NamingSpec::format`] tries the templates in
//! order and keeps the first one whose format codes accept every value, so a
//! name sequence of `Int(2)` renders as `02` and `Text("Tip")` as `Tip`.
//! Counters past 99 render with more digits (`100`), which the matcher still
//! accepts. Text values are not checked against the matcher when formatting;
//! only [`NamingSpec::match_name`] enforces the convention.

use core::fmt;
use std::collections::BTreeMap;

use regex::Regex;

use crate::error::NamingError;

/// The default naming pattern.
pub const DEFAULT_PATTERN: &str = "<nt>_<s><ss>_<n><ns>";

/// The `<ns>` text for a childless joint.
pub const TIP: &str = "Tip";

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A naming field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    /// Node-type code (`DJ`, `BJ`, `PC`, ...).
    NodeType,
    /// Side code (`C`, `L`, `R`, `N`).
    Side,
    /// Disambiguating counter among same-named joints.
    SideSequence,
    /// Role name.
    Name,
    /// Position within a same-role chain, or `Tip`.
    NameSequence,
}

impl FieldKey {
    /// Every field, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::NodeType,
        Self::Side,
        Self::SideSequence,
        Self::Name,
        Self::NameSequence,
    ];

    /// The token text between `<` and `>`.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::NodeType => "nt",
            Self::Side => "s",
            Self::SideSequence => "ss",
            Self::Name => "n",
            Self::NameSequence => "ns",
        }
    }

    /// Looks up a field by token text.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.token() == token)
    }

    /// The format codes tried for this field, in template order.
    #[must_use]
    pub const fn formats(self) -> &'static [FormatCode] {
        match self {
            Self::NodeType | Self::Side | Self::Name => &[FormatCode::Str],
            Self::SideSequence => &[FormatCode::ZeroPad2],
            Self::NameSequence => &[FormatCode::ZeroPad2, FormatCode::Str],
        }
    }

    /// The regex fragment a rendered field must match.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::NodeType => "[A-Z]{2,4}",
            Self::Side => "[A-Z]",
            Self::SideSequence => r"\d{2,}",
            Self::Name => "[A-Z][A-Za-z]*",
            Self::NameSequence => r"\d{2,}|Tip",
        }
    }

    fn is_numeric(self) -> bool {
        self.formats().contains(&FormatCode::ZeroPad2)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A field value: text or a counter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// Rendered verbatim by `%s`.
    Text(String),
    /// Rendered by `%02d` (or as plain digits by `%s`).
    Int(u32),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Int(n)
    }
}

/// A set of field values keyed by [`FieldKey`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl Fields {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, builder style.
    #[must_use]
    pub fn with(mut self, key: FieldKey, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a field.
    pub fn set(&mut self, key: FieldKey, value: impl Into<FieldValue>) {
        self.values.insert(key, value.into());
    }

    /// Returns a field's value.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    /// Overwrites every field present in `other`.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(*key, value.clone());
        }
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Number of fields set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// Format codes
// ---------------------------------------------------------------------------

/// How a field value is rendered into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatCode {
    /// `%s`: text verbatim, integers as plain digits.
    Str,
    /// `%02d`: integers zero-padded to two digits; text is rejected.
    ZeroPad2,
}

impl FormatCode {
    /// Renders `value`, or `None` if this code cannot render it.
    #[must_use]
    pub fn apply(self, value: &FieldValue) -> Option<String> {
        match (self, value) {
            (Self::Str, FieldValue::Text(text)) => Some(text.clone()),
            (Self::Str, FieldValue::Int(n)) => Some(n.to_string()),
            (Self::ZeroPad2, FieldValue::Int(n)) => Some(format!("{n:02}")),
            (Self::ZeroPad2, FieldValue::Text(_)) => None,
        }
    }
}

impl fmt::Display for FormatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Str => "%s",
            Self::ZeroPad2 => "%02d",
        })
    }
}

// ---------------------------------------------------------------------------
// NamingSpec
// ---------------------------------------------------------------------------

/// One token of a compiled pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Field rendered by this segment.
    pub key: FieldKey,
    /// Position of the token in the pattern.
    pub index: usize,
    /// Literal text following the token.
    pub suffix: String,
}

impl Segment {
    /// The format code template `template` uses for this segment.
    #[must_use]
    pub fn format_for(&self, template: usize) -> FormatCode {
        let formats = self.key.formats();
        formats
            .get(template)
            .or_else(|| formats.first())
            .copied()
            .unwrap_or(FormatCode::Str)
    }
}

/// A compiled naming convention.
#[derive(Clone, Debug)]
pub struct NamingSpec {
    source: String,
    prefix: String,
    segments: Vec<Segment>,
    templates: usize,
    matcher: Regex,
}

impl NamingSpec {
    /// Compiles a token pattern.
    ///
    /// # Errors
    ///
    /// - [`NamingError::UnknownToken`] for a `<...>` that is not a field.
    /// - [`NamingError::DuplicateToken`] when a field appears twice.
    /// - [`NamingError::NoTokens`] when the pattern has no field at all.
    /// - [`NamingError::InvalidPattern`] if the matcher fails to build.
    pub fn compile(pattern: &str) -> Result<Self, NamingError> {
        let mut prefix = String::new();
        let mut segments: Vec<Segment> = Vec::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('<') {
            let Some(len) = rest[open..].find('>') else {
                break;
            };
            let token = &rest[open + 1..open + len];
            let key = FieldKey::from_token(token)
                .ok_or_else(|| NamingError::UnknownToken(token.to_owned()))?;
            if segments.iter().any(|seg| seg.key == key) {
                return Err(NamingError::DuplicateToken(key));
            }
            let literal = &rest[..open];
            match segments.last_mut() {
                Some(prev) => prev.suffix.push_str(literal),
                None => prefix.push_str(literal),
            }
            segments.push(Segment {
                key,
                index: segments.len(),
                suffix: String::new(),
            });
            rest = &rest[open + len + 1..];
        }
        match segments.last_mut() {
            Some(last) => last.suffix.push_str(rest),
            None => return Err(NamingError::NoTokens(pattern.to_owned())),
        }

        let mut source = String::from("^");
        source.push_str(&regex::escape(&prefix));
        for seg in &segments {
            source.push_str(&format!(
                "(?P<{}>{}){}",
                seg.key.token(),
                seg.key.pattern(),
                regex::escape(&seg.suffix)
            ));
        }
        source.push('$');
        let matcher = Regex::new(&source).map_err(|e| NamingError::InvalidPattern(e.to_string()))?;

        let templates = segments
            .iter()
            .map(|seg| seg.key.formats().len())
            .max()
            .unwrap_or(1);

        Ok(Self {
            source: pattern.to_owned(),
            prefix,
            segments,
            templates,
            matcher,
        })
    }

    /// The pattern this spec was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Literal text before the first token.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Segments in token order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of formatting templates.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.templates
    }

    /// The anchored matcher regex source.
    #[must_use]
    pub fn regex_source(&self) -> &str {
        self.matcher.as_str()
    }

    /// Whether `name` follows this convention.
    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }

    /// Whether this pattern uses `key`.
    #[must_use]
    pub fn uses(&self, key: FieldKey) -> bool {
        self.segments.iter().any(|seg| seg.key == key)
    }

    /// Renders `fields` into a name.
    ///
    /// Fields the pattern does not use are ignored.
    ///
    /// # Errors
    ///
    /// - [`NamingError::MissingField`] if a used field is absent.
    /// - [`NamingError::FormatMismatch`] if every template has a format code
    ///   that cannot render its value (text where `%02d` is required).
    pub fn format(&self, fields: &Fields) -> Result<String, NamingError> {
        if let Some(seg) = self.segments.iter().find(|seg| fields.get(seg.key).is_none()) {
            return Err(NamingError::MissingField(seg.key));
        }
        (0..self.templates)
            .find_map(|t| self.render(fields, t))
            .ok_or_else(|| NamingError::FormatMismatch(fields.to_string()))
    }

    fn render(&self, fields: &Fields, template: usize) -> Option<String> {
        let mut name = self.prefix.clone();
        for seg in &self.segments {
            let value = fields.get(seg.key)?;
            name.push_str(&seg.format_for(template).apply(value)?);
            name.push_str(&seg.suffix);
        }
        Some(name)
    }

    /// Parses a name back into its fields.
    ///
    /// Numeric fields come back as [`FieldValue::Int`] unless the text is
    /// not a number (such as `Tip`).
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::PatternMismatch`] if `name` does not follow the
    /// convention.
    pub fn match_name(&self, name: &str) -> Result<Fields, NamingError> {
        let caps = self
            .matcher
            .captures(name)
            .ok_or_else(|| NamingError::PatternMismatch {
                name: name.to_owned(),
                pattern: self.source.clone(),
            })?;
        let mut fields = Fields::new();
        for seg in &self.segments {
            let Some(text) = caps.name(seg.key.token()).map(|m| m.as_str()) else {
                continue;
            };
            let value = match text.parse::<u32>() {
                Ok(n) if seg.key.is_numeric() => FieldValue::Int(n),
                _ => FieldValue::from(text),
            };
            fields.set(seg.key, value);
        }
        Ok(fields)
    }
}

impl Default for NamingSpec {
    /// The convention `<nt>_<s><ss>_<n><ns>`.
    fn default() -> Self {
        match Self::compile(DEFAULT_PATTERN) {
            Ok(spec) => spec,
            Err(e) => unreachable!("default naming pattern must compile: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Node types
// ---------------------------------------------------------------------------

/// Node-type codes used as the `<nt>` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// `AC`
    AimConstraint,
    /// `BJ`
    BindJoint,
    /// `BUF`
    Buffer,
    /// `CND`
    Condition,
    /// `CTRL`
    Control,
    /// `JNT`
    ControlJoint,
    /// `CI`
    CurveInfo,
    /// `DD`
    DistanceDimension,
    /// `DJ`
    DriveJoint,
    /// `EFF`
    IkEffector,
    /// `FOL`
    Follicle,
    /// `GC`
    GeometryConstraint,
    /// `GRP`
    Group,
    /// `HS`
    HairSystem,
    /// `IKJ`
    IkJoint,
    /// `IKH`
    IkHandle,
    /// `LOC`
    Locator,
    /// `MOD`
    Module,
    /// `MD`
    MultiplyDivide,
    /// `NC`
    NormalConstraint,
    /// `NUL`
    Null,
    /// `CRV`
    Curve,
    /// `OC`
    OrientConstraint,
    /// `PC`
    ParentConstraint,
    /// `PMA`
    PlusMinusAverage,
    /// `XC`
    PointConstraint,
    /// `POP`
    PointOnPolyConstraint,
    /// `PV`
    PoleVector,
    /// `PVC`
    PoleVectorConstraint,
    /// `ROT`
    Rotation,
    /// `SC`
    SkinCluster,
}

impl NodeType {
    /// Every node type.
    pub const ALL: [Self; 31] = [
        Self::AimConstraint,
        Self::BindJoint,
        Self::Buffer,
        Self::Condition,
        Self::Control,
        Self::ControlJoint,
        Self::CurveInfo,
        Self::DistanceDimension,
        Self::DriveJoint,
        Self::IkEffector,
        Self::Follicle,
        Self::GeometryConstraint,
        Self::Group,
        Self::HairSystem,
        Self::IkJoint,
        Self::IkHandle,
        Self::Locator,
        Self::Module,
        Self::MultiplyDivide,
        Self::NormalConstraint,
        Self::Null,
        Self::Curve,
        Self::OrientConstraint,
        Self::ParentConstraint,
        Self::PlusMinusAverage,
        Self::PointConstraint,
        Self::PointOnPolyConstraint,
        Self::PoleVector,
        Self::PoleVectorConstraint,
        Self::Rotation,
        Self::SkinCluster,
    ];

    /// The `<nt>` code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AimConstraint => "AC",
            Self::BindJoint => "BJ",
            Self::Buffer => "BUF",
            Self::Condition => "CND",
            Self::Control => "CTRL",
            Self::ControlJoint => "JNT",
            Self::CurveInfo => "CI",
            Self::DistanceDimension => "DD",
            Self::DriveJoint => "DJ",
            Self::IkEffector => "EFF",
            Self::Follicle => "FOL",
            Self::GeometryConstraint => "GC",
            Self::Group => "GRP",
            Self::HairSystem => "HS",
            Self::IkJoint => "IKJ",
            Self::IkHandle => "IKH",
            Self::Locator => "LOC",
            Self::Module => "MOD",
            Self::MultiplyDivide => "MD",
            Self::NormalConstraint => "NC",
            Self::Null => "NUL",
            Self::Curve => "CRV",
            Self::OrientConstraint => "OC",
            Self::ParentConstraint => "PC",
            Self::PlusMinusAverage => "PMA",
            Self::PointConstraint => "XC",
            Self::PointOnPolyConstraint => "POP",
            Self::PoleVector => "PV",
            Self::PoleVectorConstraint => "PVC",
            Self::Rotation => "ROT",
            Self::SkinCluster => "SC",
        }
    }

    /// Looks up a node type by code. `JNT` resolves to
    /// [`NodeType::ControlJoint`].
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|nt| nt.code() == code)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn joint_fields(side: &str, ss: u32, name: &str, ns: FieldValue) -> Fields {
        Fields::new()
            .with(FieldKey::NodeType, "DJ")
            .with(FieldKey::Side, side)
            .with(FieldKey::SideSequence, ss)
            .with(FieldKey::Name, name)
            .with(FieldKey::NameSequence, ns)
    }

    #[test]
    fn default_pattern_compiles() {
        let spec = NamingSpec::default();
        assert_eq!(spec.source(), DEFAULT_PATTERN);
        assert_eq!(spec.prefix(), "");
        assert_eq!(spec.template_count(), 2);
        let keys: Vec<_> = spec.segments().iter().map(|s| s.key).collect();
        assert_eq!(keys, FieldKey::ALL);
        let suffixes: Vec<_> = spec.segments().iter().map(|s| s.suffix.as_str()).collect();
        assert_eq!(suffixes, ["_", "", "_", "", ""]);
        assert_eq!(
            spec.regex_source(),
            r"^(?P<nt>[A-Z]{2,4})_(?P<s>[A-Z])(?P<ss>\d{2,})_(?P<n>[A-Z][A-Za-z]*)(?P<ns>\d{2,}|Tip)$"
        );
    }

    #[test]
    fn spine_chain_names() {
        let spec = NamingSpec::default();
        let names: Vec<_> = [
            FieldValue::Int(1),
            FieldValue::Int(2),
            FieldValue::from(TIP),
        ]
        .into_iter()
        .map(|ns| spec.format(&joint_fields("C", 1, "Spine", ns)).unwrap())
        .collect();
        assert_eq!(names, ["DJ_C01_Spine01", "DJ_C01_Spine02", "DJ_C01_SpineTip"]);
    }

    #[test]
    fn prefix_and_custom_order() {
        let spec = NamingSpec::compile("rig:<n>.<s>-<nt>").unwrap();
        assert_eq!(spec.prefix(), "rig:");
        assert_eq!(spec.template_count(), 1);
        let fields = Fields::new()
            .with(FieldKey::NodeType, "CTRL")
            .with(FieldKey::Side, "L")
            .with(FieldKey::Name, "Hand");
        let name = spec.format(&fields).unwrap();
        assert_eq!(name, "rig:Hand.L-CTRL");
        assert_eq!(spec.match_name(&name).unwrap(), fields);
        // The `.` literal is escaped.
        assert!(!spec.is_match("rig:HandxL-CTRL"));
    }

    #[test]
    fn compile_errors() {
        assert_eq!(
            NamingSpec::compile("<nt>_<side>").unwrap_err(),
            NamingError::UnknownToken("side".to_owned())
        );
        assert_eq!(
            NamingSpec::compile("<n>_<n>").unwrap_err(),
            NamingError::DuplicateToken(FieldKey::Name)
        );
        assert_eq!(
            NamingSpec::compile("plain").unwrap_err(),
            NamingError::NoTokens("plain".to_owned())
        );
    }

    #[test]
    fn unclosed_angle_is_literal() {
        let spec = NamingSpec::compile("<n>_<x").unwrap();
        assert_eq!(spec.segments()[0].suffix, "_<x");
        let fields = Fields::new().with(FieldKey::Name, "Foot");
        assert_eq!(spec.format(&fields).unwrap(), "Foot_<x");
    }

    #[test]
    fn missing_field_is_fatal() {
        let spec = NamingSpec::default();
        let fields = Fields::new().with(FieldKey::NodeType, "DJ");
        assert_eq!(
            spec.format(&fields),
            Err(NamingError::MissingField(FieldKey::Side))
        );
    }

    #[test]
    fn format_mismatch_on_text_counter() {
        let spec = NamingSpec::default();
        // A side sequence given as text cannot be zero-padded.
        let fields = joint_fields("C", 1, "Spine", FieldValue::Int(1))
            .with(FieldKey::SideSequence, "one");
        assert!(matches!(
            spec.format(&fields),
            Err(NamingError::FormatMismatch(_))
        ));
    }

    #[test]
    fn counters_past_two_digits_widen() {
        let spec = NamingSpec::default();
        let name = spec
            .format(&joint_fields("C", 100, "Spine", FieldValue::Int(123)))
            .unwrap();
        assert_eq!(name, "DJ_C100_Spine123");
        let fields = spec.match_name(&name).unwrap();
        assert_eq!(fields.get(FieldKey::SideSequence), Some(&FieldValue::Int(100)));
        assert_eq!(fields.get(FieldKey::NameSequence), Some(&FieldValue::Int(123)));
        // Single digits still pad.
        assert!(!spec.is_match("DJ_C1_Spine01"));
    }

    #[test]
    fn format_does_not_validate_text() {
        let spec = NamingSpec::default();
        let name = spec
            .format(&joint_fields("C", 1, "spine", FieldValue::Int(1)))
            .unwrap();
        assert_eq!(name, "DJ_C01_spine01");
        assert!(matches!(
            spec.match_name(&name),
            Err(NamingError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn match_reports_pattern() {
        let spec = NamingSpec::default();
        assert_eq!(
            spec.match_name("joint1"),
            Err(NamingError::PatternMismatch {
                name: "joint1".to_owned(),
                pattern: DEFAULT_PATTERN.to_owned(),
            })
        );
    }

    #[test]
    fn match_types_numeric_fields() {
        let spec = NamingSpec::default();
        let fields = spec.match_name("BJ_L02_IndexFingerTip").unwrap();
        assert_eq!(fields.get(FieldKey::SideSequence), Some(&FieldValue::Int(2)));
        assert_eq!(
            fields.get(FieldKey::NameSequence),
            Some(&FieldValue::from(TIP))
        );
        assert_eq!(
            fields.get(FieldKey::Name),
            Some(&FieldValue::from("IndexFinger"))
        );
    }

    #[test]
    fn merge_overrides() {
        let mut fields = joint_fields("L", 1, "Knee", FieldValue::Int(1));
        fields.merge(&Fields::new().with(FieldKey::NodeType, "BJ"));
        assert_eq!(fields.get(FieldKey::NodeType), Some(&FieldValue::from("BJ")));
        assert_eq!(fields.len(), 5);
        assert_eq!(
            Fields::new().with(FieldKey::Side, "R").to_string(),
            "{s=R}"
        );
    }

    #[test]
    fn node_type_codes() {
        assert_eq!(NodeType::DriveJoint.code(), "DJ");
        assert_eq!(NodeType::from_code("PC"), Some(NodeType::ParentConstraint));
        assert_eq!(NodeType::from_code("JNT"), Some(NodeType::ControlJoint));
        assert_eq!(NodeType::from_code("ZZ"), None);
        let spec = NamingSpec::default();
        for nt in NodeType::ALL {
            let fields = joint_fields("C", 1, "Spine", FieldValue::Int(1))
                .with(FieldKey::NodeType, nt.code());
            assert!(spec.format(&fields).is_ok(), "{nt}");
        }
    }

    fn arb_fields() -> impl Strategy<Value = Fields> {
        (
            "[A-Z]{2,4}",
            prop::sample::select(vec!["C", "L", "R", "N"]),
            0_u32..100,
            "[A-Z][a-z]{0,8}",
            prop_oneof![(0_u32..100).prop_map(FieldValue::Int), Just(FieldValue::from(TIP))],
        )
            .prop_map(|(nt, s, ss, n, ns)| {
                Fields::new()
                    .with(FieldKey::NodeType, nt)
                    .with(FieldKey::Side, s)
                    .with(FieldKey::SideSequence, ss)
                    .with(FieldKey::Name, n)
                    .with(FieldKey::NameSequence, ns)
            })
    }

    proptest! {
        #[test]
        fn format_then_match_recovers_fields(fields in arb_fields()) {
            let spec = NamingSpec::default();
            let name = spec.format(&fields).unwrap();
            prop_assert_eq!(spec.match_name(&name).unwrap(), fields);
        }
    }
}
