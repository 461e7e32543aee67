//! Column-type inference.
//!
//! Every non-empty value of a column is tested against a chain of predicates
//! and the first family that accepts all of them wins:
//!
//! 1. boolean (`true` / `false`, any case)
//! 2. number (anything that parses to a finite `f64`)
//! 3. string, then sub-classified, again first match wins:
//!    US state code, date-time, date, time
//!
//! Empty cells never take part. A column without any non-empty value gets
//! no flags at all.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::datetime::{
    DATE_PATTERNS, DATE_TIME_PATTERNS, TIME_PATTERNS, matches_date, matches_date_time,
    matches_time,
};
use crate::value::parse_f64;

/// US state, district, and territory postal codes.
pub const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AS", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FM", "FL", "GA", "GU", "HI",
    "ID", "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MH", "MD", "MA", "MI", "MN", "MS", "MO",
    "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "MP", "OH", "OK", "OR", "PW", "PA",
    "PR", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VI", "VA", "WA", "WV", "WI", "WY",
];

/// Inferred type flags for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub is_boolean: bool,
    pub is_number: bool,
    pub is_string: bool,
    pub is_us_state: bool,
    pub is_date_time: bool,
    pub is_date: bool,
    pub is_time: bool,
    /// The concrete date/time pattern that matched, if any.
    pub pattern: Option<String>,
    /// Count of non-empty values.
    pub non_empty: usize,
    /// Count of distinct non-empty values.
    pub distinct: usize,
}

impl ColumnProfile {
    /// Short name of the winning classification.
    pub fn kind(&self) -> &'static str {
        if self.is_boolean {
            "boolean"
        } else if self.is_number {
            "number"
        } else if self.is_us_state {
            "us-state"
        } else if self.is_date_time {
            "date-time"
        } else if self.is_date {
            "date"
        } else if self.is_time {
            "time"
        } else if self.is_string {
            "string"
        } else {
            "empty"
        }
    }
}

pub fn is_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

pub fn is_number(value: &str) -> bool {
    parse_f64(value).is_some()
}

pub fn is_us_state(value: &str) -> bool {
    value.len() == 2
        && US_STATE_CODES
            .iter()
            .any(|code| code.eq_ignore_ascii_case(value))
}

fn first_pattern(
    values: &[&str],
    patterns: &[&'static str],
    test: fn(&str, &str) -> bool,
) -> Option<&'static str> {
    patterns
        .iter()
        .copied()
        .find(|pattern| values.iter().all(|value| test(value, pattern)))
}

/// Profile one column from its raw cell text.
pub fn profile_column<'a>(values: impl IntoIterator<Item = &'a str>) -> ColumnProfile {
    let values: Vec<&str> = values.into_iter().filter(|v| !v.is_empty()).collect();
    let distinct: BTreeSet<&str> = values.iter().copied().collect();
    let mut profile = ColumnProfile {
        non_empty: values.len(),
        distinct: distinct.len(),
        ..ColumnProfile::default()
    };
    if values.is_empty() {
        return profile;
    }
    let distinct: Vec<&str> = distinct.into_iter().collect();

    if distinct.iter().all(|v| is_boolean(v)) {
        profile.is_boolean = true;
        return profile;
    }
    if distinct.iter().all(|v| is_number(v)) {
        profile.is_number = true;
        return profile;
    }
    profile.is_string = true;

    if distinct.iter().all(|v| is_us_state(v)) {
        profile.is_us_state = true;
    } else if let Some(pattern) = first_pattern(&distinct, DATE_TIME_PATTERNS, matches_date_time) {
        profile.is_date_time = true;
        profile.pattern = Some(pattern.to_string());
    } else if let Some(pattern) = first_pattern(&distinct, DATE_PATTERNS, matches_date) {
        profile.is_date = true;
        profile.pattern = Some(pattern.to_string());
    } else if let Some(pattern) = first_pattern(&distinct, TIME_PATTERNS, matches_time) {
        profile.is_time = true;
        profile.pattern = Some(pattern.to_string());
    }
    profile
}
