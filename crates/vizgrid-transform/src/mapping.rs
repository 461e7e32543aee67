//! Output-column specs for the aggregation pipeline.
//!
//! A spec is either a bare column label (group by / pass through) or a
//! function over a numerator column and an optional denominator column.
//! Specs deserialize from `"Label"` or `{"func": "SUM", "params": ["A"]}`
//! and parse from text as `Label` or `SUM(A)` / `AVE(A, B)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingSpecError {
    #[error("mapping spec is empty")]
    Empty,

    #[error("unknown mapping function '{0}'")]
    UnknownFunction(String),

    #[error("{func} needs a numerator column")]
    MissingNumerator { func: MappingFn },

    #[error("{func} takes at most two columns, got {count}")]
    TooManyParams { func: MappingFn, count: usize },

    #[error("malformed mapping spec '{0}'")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MappingFn {
    Sum,
    Ave,
    Min,
    Max,
    Scale,
}

impl MappingFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "SUM",
            Self::Ave => "AVE",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Scale => "SCALE",
        }
    }

    /// Whether the function reduces a group (everything but `SCALE`).
    pub fn is_aggregate(&self) -> bool {
        !matches!(self, Self::Scale)
    }
}

impl fmt::Display for MappingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingFn {
    type Err = MappingSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUM" => Ok(Self::Sum),
            "AVE" => Ok(Self::Ave),
            "MIN" => Ok(Self::Min),
            "MAX" => Ok(Self::Max),
            "SCALE" => Ok(Self::Scale),
            _ => Err(MappingSpecError::UnknownFunction(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingSpec {
    GroupBy(String),
    Function { func: MappingFn, params: Vec<String> },
}

impl MappingSpec {
    pub fn group_by(label: impl Into<String>) -> Self {
        Self::GroupBy(label.into())
    }

    pub fn function(func: MappingFn, numerator: impl Into<String>) -> Self {
        Self::Function {
            func,
            params: vec![numerator.into()],
        }
    }

    pub fn ratio(
        func: MappingFn,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self::Function {
            func,
            params: vec![numerator.into(), denominator.into()],
        }
    }

    pub fn func(&self) -> Option<MappingFn> {
        match self {
            Self::GroupBy(_) => None,
            Self::Function { func, .. } => Some(*func),
        }
    }

    /// The grouped column, or the function's numerator.
    pub fn numerator(&self) -> Option<&str> {
        match self {
            Self::GroupBy(label) => Some(label),
            Self::Function { params, .. } => params.first().map(String::as_str),
        }
    }

    pub fn denominator(&self) -> Option<&str> {
        match self {
            Self::GroupBy(_) => None,
            Self::Function { params, .. } => params.get(1).map(String::as_str),
        }
    }

    /// Check parameter counts. Deserialized specs are not validated on
    /// their own.
    pub fn validate(&self) -> Result<(), MappingSpecError> {
        match self {
            Self::GroupBy(label) if label.trim().is_empty() => Err(MappingSpecError::Empty),
            Self::GroupBy(_) => Ok(()),
            Self::Function { func, params } => match params.len() {
                0 => Err(MappingSpecError::MissingNumerator { func: *func }),
                1 | 2 => Ok(()),
                count => Err(MappingSpecError::TooManyParams { func: *func, count }),
            },
        }
    }
}

impl fmt::Display for MappingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroupBy(label) => f.write_str(label),
            Self::Function { func, params } => write!(f, "{func}({})", params.join(",")),
        }
    }
}

impl FromStr for MappingSpec {
    type Err = MappingSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(MappingSpecError::Empty);
        }
        let Some(open) = text.find('(') else {
            if text.contains(')') {
                return Err(MappingSpecError::Malformed(text.to_string()));
            }
            return Ok(Self::group_by(text));
        };
        let Some(inner) = text[open + 1..].strip_suffix(')') else {
            return Err(MappingSpecError::Malformed(text.to_string()));
        };
        if inner.contains(['(', ')']) {
            return Err(MappingSpecError::Malformed(text.to_string()));
        }
        let func: MappingFn = text[..open].parse()?;
        let params: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .map(str::to_string)
            .collect();
        let spec = Self::Function { func, params };
        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_specs() {
        assert_eq!("Label".parse::<MappingSpec>(), Ok(MappingSpec::group_by("Label")));
        assert_eq!(
            "sum(Amount)".parse::<MappingSpec>(),
            Ok(MappingSpec::function(MappingFn::Sum, "Amount"))
        );
        assert_eq!(
            " AVE( Sales , Visits ) ".parse::<MappingSpec>(),
            Ok(MappingSpec::ratio(MappingFn::Ave, "Sales", "Visits"))
        );
    }

    #[test]
    fn rejects_bad_text_specs() {
        assert_eq!("".parse::<MappingSpec>(), Err(MappingSpecError::Empty));
        assert_eq!(
            "MEDIAN(A)".parse::<MappingSpec>(),
            Err(MappingSpecError::UnknownFunction("MEDIAN".to_string()))
        );
        assert_eq!(
            "SUM()".parse::<MappingSpec>(),
            Err(MappingSpecError::MissingNumerator {
                func: MappingFn::Sum
            })
        );
        assert_eq!(
            "MAX(A,B,C)".parse::<MappingSpec>(),
            Err(MappingSpecError::TooManyParams {
                func: MappingFn::Max,
                count: 3
            })
        );
        assert!(matches!(
            "SUM(A".parse::<MappingSpec>(),
            Err(MappingSpecError::Malformed(_))
        ));
    }

    #[test]
    fn deserializes_both_shapes() {
        let specs: Vec<MappingSpec> =
            serde_json::from_str(r#"["Label", {"func": "SCALE", "params": ["Revenue", "Total"]}]"#)
                .expect("specs");
        assert_eq!(
            specs,
            vec![
                MappingSpec::group_by("Label"),
                MappingSpec::ratio(MappingFn::Scale, "Revenue", "Total"),
            ]
        );
        assert_eq!(specs[1].numerator(), Some("Revenue"));
        assert_eq!(specs[1].denominator(), Some("Total"));
    }

    #[test]
    fn display_round_trips_text() {
        let spec = MappingSpec::ratio(MappingFn::Ave, "A", "B");
        assert_eq!(spec.to_string(), "AVE(A,B)");
        assert_eq!(spec.to_string().parse::<MappingSpec>(), Ok(spec));
    }

    #[test]
    fn only_scale_is_row_wise() {
        assert!(MappingFn::Sum.is_aggregate());
        assert!(!MappingFn::Scale.is_aggregate());
    }
}
