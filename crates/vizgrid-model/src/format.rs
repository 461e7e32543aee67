//! Number display patterns.
//!
//! A small subset of the d3 format mini-language:
//! `[+][$][,][.precision][type]` where `type` is one of `f`, `d`, `%`, `e`,
//! or absent. Without a type the number prints in its shortest form, rounded
//! to `precision` significant digits when a precision is given.

use crate::value::format_numeric;

/// Largest precision a pattern may ask for.
pub const MAX_PRECISION: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    Shortest,
    Fixed,
    Integer,
    Percent,
    Exponent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub plus_sign: bool,
    pub currency: bool,
    pub grouping: bool,
    pub precision: Option<usize>,
    pub style: NumberStyle,
}

impl NumberFormat {
    /// Parse a pattern, or `None` if it uses anything outside the subset.
    pub fn parse(pattern: &str) -> Option<Self> {
        let mut rest = pattern;
        let plus_sign = strip(&mut rest, '+');
        let currency = strip(&mut rest, '$');
        let grouping = strip(&mut rest, ',');
        let mut precision = None;
        if strip(&mut rest, '.') {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                return None;
            }
            rest = &rest[digits.len()..];
            let value: usize = digits.parse().ok()?;
            if value > MAX_PRECISION {
                return None;
            }
            precision = Some(value);
        }
        let style = match rest {
            "" => NumberStyle::Shortest,
            "f" => NumberStyle::Fixed,
            "d" => NumberStyle::Integer,
            "%" => NumberStyle::Percent,
            "e" => NumberStyle::Exponent,
            _ => return None,
        };
        Some(Self {
            plus_sign,
            currency,
            grouping,
            precision,
            style,
        })
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return format_numeric(value);
        }
        let negative = value.is_sign_negative() && value != 0.0;
        let magnitude = value.abs();
        let mut body = match self.style {
            NumberStyle::Shortest => match self.precision {
                Some(p) => format_numeric(round_significant(magnitude, p.max(1))),
                None => format_numeric(magnitude),
            },
            NumberStyle::Fixed => format!("{:.*}", self.precision.unwrap_or(6), magnitude),
            NumberStyle::Integer => format!("{}", magnitude.round()),
            NumberStyle::Percent => {
                format!("{:.*}%", self.precision.unwrap_or(6), magnitude * 100.0)
            }
            NumberStyle::Exponent => exponent(magnitude, self.precision.unwrap_or(6)),
        };
        if self.grouping {
            body = group_thousands(&body);
        }
        let mut out = String::with_capacity(body.len() + 2);
        if negative {
            out.push('-');
        } else if self.plus_sign {
            out.push('+');
        }
        if self.currency {
            out.push('$');
        }
        out.push_str(&body);
        out
    }
}

fn strip(rest: &mut &str, ch: char) -> bool {
    match rest.strip_prefix(ch) {
        Some(tail) => {
            *rest = tail;
            true
        }
        None => false,
    }
}

fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits as i32 - 1 - magnitude;
    if shift >= 0 {
        let scale = 10f64.powi(shift);
        (value * scale).round() / scale
    } else {
        let scale = 10f64.powi(-shift);
        (value / scale).round() * scale
    }
}

fn exponent(value: f64, precision: usize) -> String {
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => raw,
    }
}

fn group_thousands(body: &str) -> String {
    let split = body
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(body.len());
    let (int_part, tail) = body.split_at(split);
    let mut grouped = String::with_capacity(body.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(tail);
    grouped
}
