//! Column metadata and per-field coercion of raw cell text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::checksum::{Checksum, hash_strs};
use crate::datetime::{format_with_pattern, parse_with_candidates, parse_with_pattern};
use crate::error::EngineIssue;
use crate::format::NumberFormat;
use crate::inference::ColumnProfile;
use crate::setting::Setting;
use crate::value::{Value, parse_f64};

/// Raw values that coerce to `false` for boolean fields (case-insensitive).
pub const FALSE_LITERALS: &[&str] = &["false", "off", "0"];

/// Declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    None,
    String,
    Number,
    Boolean,
    #[serde(alias = "date")]
    Time,
    Hidden,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Time => "time",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "time" | "date" => Ok(Self::Time),
            "hidden" => Ok(Self::Hidden),
            other => Err(format!("unknown field type '{other}'")),
        }
    }
}

/// Display (and for time fields, parse) transform built from a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Formatter {
    Identity,
    Time(String),
    Number(NumberFormat),
    /// A non-time pattern outside the supported number syntax. Formatting
    /// through it always fails.
    Unsupported(String),
}

impl Formatter {
    pub fn format(&self, value: &Value) -> Result<String, String> {
        match self {
            Self::Identity => Ok(value.to_string()),
            Self::Time(pattern) => match value {
                Value::Time(time) => format_with_pattern(time, pattern)
                    .ok_or_else(|| format!("invalid time pattern '{pattern}'")),
                other => Ok(other.to_string()),
            },
            Self::Number(format) => match value {
                Value::Number(n) => Ok(format.format(*n)),
                Value::Text(s) => Ok(parse_f64(s).map_or_else(|| s.clone(), |n| format.format(n))),
                other => Ok(other.to_string()),
            },
            Self::Unsupported(pattern) => Err(format!("unsupported format pattern '{pattern}'")),
        }
    }

    /// Inverse direction. Only meaningful for time and number patterns;
    /// identity parsing returns the text unchanged.
    pub fn parse(&self, raw: &str) -> Option<Value> {
        match self {
            Self::Identity => Some(Value::text(raw)),
            Self::Time(pattern) => parse_with_pattern(raw, pattern).map(Value::Time),
            Self::Number(_) => parse_f64(&raw.replace([',', '$', '%'], "")).map(Value::Number),
            Self::Unsupported(_) => None,
        }
    }
}

/// Column descriptor: label, declared type, parse mask, and display format.
///
/// Each attribute remembers whether it was set explicitly, so an intentional
/// empty label can be told apart from an unset one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    label: Setting<String>,
    #[serde(default, rename = "type")]
    field_type: Setting<FieldType>,
    #[serde(default)]
    mask: Setting<String>,
    #[serde(default)]
    format: Setting<String>,
    #[serde(skip)]
    profile: Option<ColumnProfile>,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        let mut field = Self::new();
        field.set_label(label);
        field
    }

    #[must_use]
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.set_type(field_type);
        self
    }

    #[must_use]
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.set_mask(mask);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.set_format(format);
        self
    }

    pub fn label(&self) -> &str {
        self.label.get()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label.set(label.into());
    }

    pub fn set_label_default(&mut self, label: impl Into<String>) {
        self.label.set_default(label.into());
    }

    pub fn field_type(&self) -> FieldType {
        *self.field_type.get()
    }

    pub fn set_type(&mut self, field_type: FieldType) {
        self.field_type.set(field_type);
    }

    pub fn mask(&self) -> &str {
        self.mask.get()
    }

    pub fn set_mask(&mut self, mask: impl Into<String>) {
        self.mask.set(mask.into());
    }

    pub fn format(&self) -> &str {
        self.format.get()
    }

    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format.set(format.into());
    }

    pub fn label_setting(&self) -> &Setting<String> {
        &self.label
    }

    pub fn type_setting(&self) -> &Setting<FieldType> {
        &self.field_type
    }

    pub fn mask_setting(&self) -> &Setting<String> {
        &self.mask
    }

    pub fn format_setting(&self) -> &Setting<String> {
        &self.format
    }

    /// Result of the last `Grid::analyse` over this column, if any.
    pub fn profile(&self) -> Option<&ColumnProfile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: Option<ColumnProfile>) {
        self.profile = profile;
    }

    /// Copy every explicitly set attribute of `other` onto this field.
    pub fn merge_from(&mut self, other: &Field) {
        self.label.merge_from(&other.label);
        self.field_type.merge_from(&other.field_type);
        self.mask.merge_from(&other.mask);
        self.format.merge_from(&other.format);
    }

    /// A copy carrying only the configuration, without analysis results.
    pub fn config_clone(&self) -> Field {
        Field {
            label: self.label.clone(),
            field_type: self.field_type.clone(),
            mask: self.mask.clone(),
            format: self.format.clone(),
            profile: None,
        }
    }

    pub fn checksum(&self) -> Checksum {
        hash_strs([
            self.label(),
            self.field_type().as_str(),
            self.mask(),
            self.format(),
        ])
    }

    /// Coerce raw text to the declared type.
    pub fn type_transform(&self, raw: &str) -> Result<Value, String> {
        match self.field_type() {
            FieldType::Number => parse_f64(raw)
                .map(Value::Number)
                .ok_or_else(|| "not a number".to_string()),
            FieldType::Boolean => {
                let lowered = raw.trim().to_ascii_lowercase();
                Ok(Value::Boolean(!FALSE_LITERALS.contains(&lowered.as_str())))
            }
            FieldType::Time => {
                let parsed = if self.mask().is_empty() {
                    parse_with_candidates(raw)
                } else {
                    parse_with_pattern(raw, self.mask())
                };
                parsed
                    .map(Value::Time)
                    .ok_or_else(|| format!("does not match mask '{}'", self.mask()))
            }
            FieldType::String | FieldType::None | FieldType::Hidden => Ok(Value::text(raw)),
        }
    }

    /// Typed value of `raw`, or [`Value::Null`] for empty input and for
    /// values that fail coercion (the failure is logged).
    pub fn parse(&self, raw: &str) -> Value {
        if raw.is_empty() {
            return Value::Null;
        }
        match self.type_transform(raw) {
            Ok(value) => value,
            Err(reason) => {
                self.parse_failure(raw, reason).report();
                Value::Null
            }
        }
    }

    /// Display string of `raw`: coerced, then formatted with [`Field::format`].
    pub fn transform(&self, raw: &str) -> Option<String> {
        if raw.is_empty() {
            return None;
        }
        let formatted = self
            .type_transform(raw)
            .and_then(|value| self.formatter(self.format()).format(&value));
        match formatted {
            Ok(text) => Some(text),
            Err(reason) => {
                self.parse_failure(raw, reason).report();
                None
            }
        }
    }

    pub fn formatter(&self, pattern: &str) -> Formatter {
        if pattern.is_empty() {
            return Formatter::Identity;
        }
        if self.field_type() == FieldType::Time {
            return Formatter::Time(pattern.to_string());
        }
        match NumberFormat::parse(pattern) {
            Some(format) => Formatter::Number(format),
            None => Formatter::Unsupported(pattern.to_string()),
        }
    }

    fn parse_failure(&self, raw: &str, reason: String) -> EngineIssue {
        EngineIssue::ParseFailure {
            label: self.label().to_string(),
            field_type: self.field_type().to_string(),
            raw: raw.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_fields_parse_numerically() {
        let field = Field::labeled("Amount").with_type(FieldType::Number);
        assert_eq!(field.parse("10"), Value::Number(10.0));
        assert_eq!(field.parse(" -2.5 "), Value::Number(-2.5));
        assert_eq!(field.parse("ten"), Value::Null);
        assert_eq!(field.parse("Infinity"), Value::Null);
        assert_eq!(field.parse(""), Value::Null);
    }

    #[test]
    fn boolean_false_literals() {
        let field = Field::labeled("Flag").with_type(FieldType::Boolean);
        for raw in ["false", "FALSE", "Off", "0"] {
            assert_eq!(field.parse(raw), Value::Boolean(false), "{raw}");
        }
        for raw in ["true", "yes", "1", "anything"] {
            assert_eq!(field.parse(raw), Value::Boolean(true), "{raw}");
        }
    }

    #[test]
    fn string_and_untyped_fields_pass_text_through() {
        let field = Field::labeled("Name").with_type(FieldType::String);
        assert_eq!(field.parse("007"), Value::text("007"));
        assert_eq!(Field::labeled("x").parse("007"), Value::text("007"));
    }

    #[test]
    fn time_fields_use_mask() {
        let field = Field::labeled("When")
            .with_type(FieldType::Time)
            .with_mask("%d/%m/%Y")
            .with_format("%Y-%m-%d");
        assert_eq!(field.transform("15/01/2024").as_deref(), Some("2024-01-15"));
        assert_eq!(field.transform("2024-01-15"), None);
    }

    #[test]
    fn time_fields_without_mask_use_candidates() {
        let field = Field::labeled("When").with_type(FieldType::Time);
        assert!(matches!(field.parse("2024-01-15T10:00:00Z"), Value::Time(_)));
    }

    #[test]
    fn transform_applies_number_format() {
        let field = Field::labeled("Revenue")
            .with_type(FieldType::Number)
            .with_format(",.2f");
        assert_eq!(field.transform("1234.5").as_deref(), Some("1,234.50"));
        assert_eq!(field.transform(""), None);
        assert_eq!(field.transform("n/a"), None);
    }

    #[test]
    fn transform_without_format_is_identity() {
        let field = Field::labeled("Revenue").with_type(FieldType::Number);
        assert_eq!(field.transform("010.50").as_deref(), Some("10.5"));
    }

    #[test]
    fn unsupported_format_fails_softly() {
        let field = Field::labeled("Revenue")
            .with_type(FieldType::Number)
            .with_format("bogus");
        assert_eq!(field.transform("1"), None);
    }

    #[test]
    fn oversized_precision_fails_softly() {
        let field = Field::labeled("n")
            .with_type(FieldType::Number)
            .with_format(".70000f");
        assert!(matches!(field.formatter(field.format()), Formatter::Unsupported(_)));
        assert_eq!(field.transform("1"), None);
        assert_eq!(field.parse("1"), Value::Number(1.0));
    }

    #[test]
    fn time_formatter_is_a_parser_too() {
        let field = Field::labeled("When").with_type(FieldType::Time);
        let formatter = field.formatter("%Y-%m-%d");
        let parsed = formatter.parse("2024-02-29").expect("parsed");
        assert_eq!(formatter.format(&parsed).as_deref(), Ok("2024-02-29"));
    }

    #[test]
    fn checksum_tracks_every_attribute() {
        let base = Field::labeled("A");
        let typed = base.clone().with_type(FieldType::Number);
        let masked = typed.clone().with_mask("%Y");
        let formatted = masked.clone().with_format(".2f");
        let sums = [
            base.checksum(),
            typed.checksum(),
            masked.checksum(),
            formatted.checksum(),
        ];
        for (i, a) in sums.iter().enumerate() {
            for b in &sums[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(base.checksum(), Field::labeled("A").checksum());
    }

    #[test]
    fn clone_is_independent_and_keeps_explicit_bits() {
        let mut original = Field::new();
        original.set_label("");
        original.set_label_default("Fallback");
        let mut copy = original.clone();
        assert!(copy.label_setting().is_explicit());
        assert_eq!(copy.label(), "");

        copy.set_label("Changed");
        assert_eq!(original.label(), "");
    }

    #[test]
    fn merge_respects_explicit_empty_label() {
        let mut target = Field::labeled("Target").with_type(FieldType::Number);
        let mut incoming = Field::new();
        incoming.set_label("");
        target.merge_from(&incoming);
        assert_eq!(target.label(), "");
        assert_eq!(target.field_type(), FieldType::Number);

        let mut defaulted = Field::new();
        defaulted.set_label_default("Ignored");
        target.merge_from(&defaulted);
        assert_eq!(target.label(), "");
    }

    #[test]
    fn field_type_names() {
        assert_eq!("date".parse::<FieldType>(), Ok(FieldType::Time));
        assert_eq!("".parse::<FieldType>(), Ok(FieldType::None));
        assert!("money".parse::<FieldType>().is_err());
        let json = serde_json::to_string(&FieldType::Number).expect("serialize type");
        assert_eq!(json, "\"number\"");
    }
}
