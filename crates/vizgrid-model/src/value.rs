//! Typed values produced by field coercion and by the aggregation pipeline.

use std::fmt;

use chrono::NaiveDateTime;

/// Display form used for time values when no format pattern is set.
pub const DEFAULT_TIME_DISPLAY: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A coerced cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
    Boolean(bool),
    Time(NaiveDateTime),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value. Text is parsed; booleans map to 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_f64(s),
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Null | Self::Time(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_numeric(*n)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Time(t) => write!(f, "{}", t.format(DEFAULT_TIME_DISPLAY)),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::Number(_) => serializer.serialize_none(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Time(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

/// Formats a floating-point number in its shortest form.
///
/// Integral values print without a decimal point and negative zero prints
/// as `0`.
///
/// # Examples
///
/// ```
/// use vizgrid_model::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(100.0), "100");
/// assert_eq!(format_numeric(-0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

/// Parses a string as `f64`, returning `None` for invalid, empty, NaN, or
/// infinite input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(1.50), "1.5");
        assert_eq!(format_numeric(0.1), "0.1");
        assert_eq!(format_numeric(-3.0), "-3");
        assert_eq!(format_numeric(1200.0), "1200");
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("3.25"), Some(3.25));
        assert_eq!(parse_f64("  -7  "), Some(-7.0));
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("-Infinity"), None);
        assert_eq!(parse_f64("abc"), None);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Number(15.0).to_string(), "15");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        let t = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .expect("valid timestamp");
        assert_eq!(Value::Time(t).to_string(), "2024-01-15T08:30:00");
    }

    #[test]
    fn value_serializes_as_plain_json() {
        let row = vec![Value::text("A"), Value::Number(15.0), Value::Null];
        let json = serde_json::to_string(&row).expect("serialize row");
        assert_eq!(json, r#"["A",15.0,null]"#);
    }
}
