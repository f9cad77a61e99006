//! FILENAME: crosstab-engine/src/value.rs
//! PURPOSE: Scalar cell values of the flat input and their coercions.
//! CONTEXT: A column may mix text, numbers and blanks. Two total functions
//! give every value a number (for arithmetic aggregations) and a canonical
//! string (for grouping), so no caller relies on implicit coercion.

use serde::{Deserialize, Serialize};

/// A single cell of the flat input.
///
/// Serialized untagged: numbers, strings and `null`. `Missing` (an absent
/// cell, as opposed to an explicit null) serializes as `null` and therefore
/// reads back as `Null`; both group and aggregate identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Text(String),
    Null,
    Missing,
}

impl Default for ScalarValue {
    fn default() -> Self {
        ScalarValue::Missing
    }
}

impl ScalarValue {
    pub fn text(s: impl Into<String>) -> Self {
        ScalarValue::Text(s.into())
    }

    /// True for `Null` and `Missing`.
    pub fn is_blank(&self) -> bool {
        matches!(self, ScalarValue::Null | ScalarValue::Missing)
    }

    /// Numeric coercion used by sum/avg/min/max.
    ///
    /// Numbers pass through (NaN becomes 0). Text is read like `parseFloat`:
    /// the longest numeric literal after leading whitespace, 0 when there is
    /// none. Blanks are 0.
    pub fn to_number(&self) -> f64 {
        match self {
            ScalarValue::Number(n) if n.is_nan() => 0.0,
            ScalarValue::Number(n) => *n,
            ScalarValue::Text(s) => parse_float_prefix(s).unwrap_or(0.0),
            ScalarValue::Null | ScalarValue::Missing => 0.0,
        }
    }

    /// Canonical string used for group equality and header ordering.
    ///
    /// Values that render the same share a group: `100` and `"100"` are one
    /// group, as are `Null`, `Missing` and `""`.
    pub fn key_text(&self) -> String {
        match self {
            ScalarValue::Text(s) => s.clone(),
            ScalarValue::Number(n) => format_number_key(*n),
            ScalarValue::Null | ScalarValue::Missing => String::new(),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(value as f64)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Number(value as f64)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ScalarValue::Null, Into::into)
    }
}

// ============================================================================
// COERCION HELPERS
// ============================================================================

/// Renders a number for grouping the way JSON serializers render numbers:
/// no trailing `.0`, a single zero, spelled-out non-finite values, and
/// exponent form with a signed exponent outside `[1e-6, 1e21)`.
fn format_number_key(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // `{:e}` gives the shortest mantissa but an unsigned positive exponent
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        format!("{}", n)
    }
}

/// Parses the longest leading decimal literal of `s`, after leading
/// whitespace. Accepts an optional sign, digits with an optional fraction,
/// an optional exponent, and `Infinity`.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if trimmed[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digit_count = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digit_count += frac_end - frac_start;
        if digit_count > 0 {
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}
