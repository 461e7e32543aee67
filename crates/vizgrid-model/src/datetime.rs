//! Date/time pattern tables and pattern-driven parsing.
//!
//! Patterns use strftime syntax as understood by `chrono`. The d3 token `%L`
//! (milliseconds) is also accepted and rewritten to `%3f`.
//!
//! The candidate tables drive column-type inference and the parse fallback
//! for time fields without a mask. Order matters: the first pattern that
//! accepts every value in a column wins.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Date-only candidates.
pub const DATE_PATTERNS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y_%m_%d", "%m/%d/%Y"];

/// Time-only candidates. `%.f` accepts an absent fraction.
pub const TIME_PATTERNS: &[&str] = &["%H:%M:%S%.fZ", "%H:%M:%S%.f", "%H:%M"];

/// Every date pattern combined with every time pattern, joined by `T` and
/// then by a space.
pub const DATE_TIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%dT%H:%M:%S%.fZ",
    "%Y/%m/%dT%H:%M:%S%.f",
    "%Y/%m/%dT%H:%M",
    "%Y_%m_%dT%H:%M:%S%.fZ",
    "%Y_%m_%dT%H:%M:%S%.f",
    "%Y_%m_%dT%H:%M",
    "%m/%d/%YT%H:%M:%S%.fZ",
    "%m/%d/%YT%H:%M:%S%.f",
    "%m/%d/%YT%H:%M",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.fZ",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y_%m_%d %H:%M:%S%.fZ",
    "%Y_%m_%d %H:%M:%S%.f",
    "%Y_%m_%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.fZ",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Rewrite d3-only tokens into their chrono equivalents.
pub fn normalize_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('L') => out.push_str("%3f"),
            Some(next) => {
                out.push('%');
                out.push(next);
            }
            None => out.push('%'),
        }
    }
    out
}

fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

pub fn matches_date_time(raw: &str, pattern: &str) -> bool {
    NaiveDateTime::parse_from_str(raw, pattern).is_ok()
}

pub fn matches_date(raw: &str, pattern: &str) -> bool {
    NaiveDate::parse_from_str(raw, pattern).is_ok()
}

pub fn matches_time(raw: &str, pattern: &str) -> bool {
    NaiveTime::parse_from_str(raw, pattern).is_ok()
}

fn epoch_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1900, 1, 1)
}

/// Parse `raw` with a single pattern.
///
/// A pattern without time fields yields midnight; a pattern without date
/// fields yields a time on 1900-01-01.
pub fn parse_with_pattern(raw: &str, pattern: &str) -> Option<NaiveDateTime> {
    let pattern = normalize_pattern(pattern);
    if !is_valid_pattern(&pattern) {
        return None;
    }
    let raw = raw.trim();
    if let Ok(value) = NaiveDateTime::parse_from_str(raw, &pattern) {
        return Some(value);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, &pattern) {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(time) = NaiveTime::parse_from_str(raw, &pattern) {
        return epoch_date().map(|date| date.and_time(time));
    }
    None
}

/// Parse `raw` against the candidate tables, date-times first.
pub fn parse_with_candidates(raw: &str) -> Option<NaiveDateTime> {
    DATE_TIME_PATTERNS
        .iter()
        .chain(DATE_PATTERNS)
        .chain(TIME_PATTERNS)
        .find_map(|pattern| parse_with_pattern(raw, pattern))
}

/// Format `value` with `pattern`, or `None` when the pattern is malformed.
pub fn format_with_pattern(value: &NaiveDateTime, pattern: &str) -> Option<String> {
    let pattern = normalize_pattern(pattern);
    let items: Vec<Item<'_>> = StrftimeItems::new(&pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", value.format_with_items(items.iter())).ok()?;
    Some(out)
}
