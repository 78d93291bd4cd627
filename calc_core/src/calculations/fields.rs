//! # Form Field Parsing
//!
//! Raw calculator forms carry loosely typed values: text typed into an input
//! box, a number from a JSON client, or nothing at all. These helpers turn
//! them into typed values and collect every missing required field so the
//! caller gets one [`CalcError::IncompleteInput`] listing all of them.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A raw form value: either text as typed, or a JSON number.
///
/// ```rust
/// use calc_core::calculations::fields::FormValue;
///
/// let typed: FormValue = serde_json::from_str("\" 2.5 \"").unwrap();
/// let sent: FormValue = serde_json::from_str("2.5").unwrap();
/// assert_eq!(typed.as_number(), Some(2.5));
/// assert_eq!(sent.as_number(), Some(2.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    /// Finite numeric value, if the field holds one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            FormValue::Text(s) => parse_number(s),
        }
    }

    /// Trimmed text, or `None` when blank
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FormValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FormValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(Cow::Borrowed(trimmed))
            }
        }
    }

    /// True when the field was left blank
    pub fn is_blank(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::Number(n)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

/// Parse decimal input, rejecting NaN and infinities
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Collects missing required fields while a form is being read.
#[derive(Debug, Default)]
pub struct FieldReader {
    missing: Vec<String>,
}

impl FieldReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a required number; absent, blank or non-numeric marks it missing.
    pub fn number(&mut self, field: &str, raw: Option<&FormValue>) -> Option<f64> {
        let value = raw.and_then(FormValue::as_number);
        if value.is_none() {
            self.mark_missing(field);
        }
        value
    }

    /// Read a required number that only counts when greater than zero.
    pub fn positive(&mut self, field: &str, raw: Option<&FormValue>) -> Option<f64> {
        let value = raw.and_then(FormValue::as_number).filter(|n| *n > 0.0);
        if value.is_none() {
            self.mark_missing(field);
        }
        value
    }

    /// Read a required text (option code); absent or blank marks it missing.
    pub fn text<'v>(&mut self, field: &str, raw: Option<&'v str>) -> Option<&'v str> {
        let value = raw.map(str::trim).filter(|s| !s.is_empty());
        if value.is_none() {
            self.mark_missing(field);
        }
        value
    }

    pub fn mark_missing(&mut self, field: &str) {
        self.missing.push(field.to_string());
    }

    /// `Err(IncompleteInput)` listing every missing field, in read order
    pub fn finish(self) -> CalcResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(CalcError::IncompleteInput {
                fields: self.missing,
            })
        }
    }
}

/// Text of an optional option-code field, `None` when absent or blank
pub fn optional_text(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Require a strictly positive value
pub fn require_positive(field: &str, value: f64) -> CalcResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Must be greater than zero"))
    }
}

/// Require a value no larger than `max`
pub fn require_at_most(field: &str, value: f64, max: f64, reason: &str) -> CalcResult<f64> {
    if value <= max {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), reason))
    }
}

/// Optional whole-number override: blank means "derive it", anything else
/// must be a positive integer no larger than `max`.
pub fn optional_count(field: &str, raw: Option<&FormValue>, max: u32) -> CalcResult<Option<u32>> {
    let Some(raw) = raw.filter(|v| !v.is_blank()) else {
        return Ok(None);
    };
    let text = raw.as_text().map(Cow::into_owned).unwrap_or_default();
    let value = raw
        .as_number()
        .ok_or_else(|| CalcError::invalid_input(field, text.clone(), "Must be a whole number"))?;
    if value.fract() != 0.0 || value < 1.0 {
        return Err(CalcError::invalid_input(field, text, "Must be a whole number of at least 1"));
    }
    if value > f64::from(max) {
        return Err(CalcError::invalid_input(field, text, format!("Cannot exceed {}", max)));
    }
    Ok(Some(value as u32))
}

/// Optional positive number: blank, non-numeric or non-positive reads as absent.
pub fn optional_positive(raw: Option<&FormValue>) -> Option<f64> {
    raw.and_then(FormValue::as_number).filter(|n| *n > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 13.5 "), Some(13.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_reader_collects_all_missing() {
        let mut reader = FieldReader::new();
        let height = FormValue::from("20");
        let width = FormValue::from("wide");
        assert_eq!(reader.number("height_m", Some(&height)), Some(20.0));
        assert_eq!(reader.number("length_m", None), None);
        assert_eq!(reader.number("width_m", Some(&width)), None);
        assert_eq!(reader.text("method", Some("   ")), None);

        let err = reader.finish().unwrap_err();
        assert_eq!(err, CalcError::incomplete(["length_m", "width_m", "method"]));
    }

    #[test]
    fn test_reader_positive_treats_non_positive_as_missing() {
        let mut reader = FieldReader::new();
        assert_eq!(reader.positive("current_a", Some(&FormValue::from("16"))), Some(16.0));
        assert_eq!(reader.positive("length_m", Some(&FormValue::from("0"))), None);
        assert_eq!(reader.positive("power_kw", Some(&FormValue::Number(-2.0))), None);
        let err = reader.finish().unwrap_err();
        assert_eq!(err, CalcError::incomplete(["length_m", "power_kw"]));
    }

    #[test]
    fn test_reader_ok_when_complete() {
        let mut reader = FieldReader::new();
        reader.number("x", Some(&FormValue::Number(1.0)));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_optional_count() {
        assert_eq!(optional_count("bays", None, 100).unwrap(), None);
        assert_eq!(optional_count("bays", Some(&FormValue::from(" ")), 100).unwrap(), None);
        assert_eq!(optional_count("bays", Some(&FormValue::from("6")), 100).unwrap(), Some(6));
        assert_eq!(optional_count("bays", Some(&FormValue::Number(3.0)), 100).unwrap(), Some(3));
        assert!(optional_count("bays", Some(&FormValue::from("2.5")), 100).is_err());
        assert!(optional_count("bays", Some(&FormValue::from("0")), 100).is_err());
        assert!(optional_count("bays", Some(&FormValue::from("six")), 100).is_err());
        assert!(optional_count("bays", Some(&FormValue::from("101")), 100).is_err());
    }

    #[test]
    fn test_optional_positive() {
        assert_eq!(optional_positive(Some(&FormValue::from("12.5"))), Some(12.5));
        assert_eq!(optional_positive(Some(&FormValue::from("0"))), None);
        assert_eq!(optional_positive(Some(&FormValue::from("n/a"))), None);
        assert_eq!(optional_positive(None), None);
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("thickness_mm", 0.0).is_err());
        assert!(require_positive("thickness_mm", -10.0).is_err());
        assert_eq!(require_positive("thickness_mm", 100.0).unwrap(), 100.0);
    }

    #[test]
    fn test_untagged_deserialization() {
        let value: Option<FormValue> = serde_json::from_str("null").unwrap();
        assert_eq!(value, None);
        let value: FormValue = serde_json::from_str("32").unwrap();
        assert_eq!(value, FormValue::Number(32.0));
    }
}
