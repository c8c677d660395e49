//! Common types used across the report card workspace

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::error::MarksError;

/// Marks awarded for one subject.
///
/// A fixed-point decimal with two fractional digits, held as integer
/// hundredths so arithmetic and storage never go through floating point.
/// Valid values are `0.00 ..= 999.99`.
///
/// # Examples
///
/// ```
/// use reportcard_common::types::Marks;
///
/// let marks: Marks = "88.5".parse().unwrap();
/// assert_eq!(marks.hundredths(), 8850);
/// assert_eq!(marks.to_string(), "88.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Marks(i64);

impl Marks {
    /// Largest representable value (999.99).
    pub const MAX_HUNDREDTHS: i64 = 99_999;

    /// Build from integer hundredths, rejecting values outside the valid range.
    pub fn from_hundredths(hundredths: i64) -> Result<Self, MarksError> {
        if !(0..=Self::MAX_HUNDREDTHS).contains(&hundredths) {
            return Err(MarksError::OutOfRange(format_hundredths(hundredths)));
        }
        Ok(Self(hundredths))
    }

    pub fn hundredths(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Interpret a JSON value as marks.
    ///
    /// Numbers and numeric strings are accepted; everything else is
    /// [`MarksError::NotNumeric`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, MarksError> {
        match value {
            serde_json::Value::Number(number) => number.to_string().parse(),
            serde_json::Value::String(text) => text.parse(),
            other => Err(MarksError::NotNumeric(other.to_string())),
        }
    }
}

impl FromStr for Marks {
    type Err = MarksError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction)
        {
            return Err(MarksError::NotNumeric(raw.to_string()));
        }
        if fraction.len() > 2 {
            return Err(MarksError::TooPrecise(raw.to_string()));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| MarksError::OutOfRange(raw.to_string()))?
        };
        let fraction_value: i64 = match fraction.len() {
            0 => 0,
            1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
            _ => i64::from(fraction.as_bytes()[0] - b'0') * 10
                + i64::from(fraction.as_bytes()[1] - b'0'),
        };

        let hundredths = whole_value
            .checked_mul(100)
            .and_then(|value| value.checked_add(fraction_value))
            .ok_or_else(|| MarksError::OutOfRange(raw.to_string()))?;

        if negative && hundredths != 0 {
            return Err(MarksError::OutOfRange(raw.to_string()));
        }

        Self::from_hundredths(hundredths).map_err(|_| MarksError::OutOfRange(raw.to_string()))
    }
}

impl TryFrom<i64> for Marks {
    type Error = MarksError;

    fn try_from(hundredths: i64) -> Result<Self, Self::Error> {
        Self::from_hundredths(hundredths)
    }
}

impl std::fmt::Display for Marks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_hundredths(self.0))
    }
}

impl Serialize for Marks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Marks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Marks::from_json(&value).map_err(de::Error::custom)
    }
}

fn format_hundredths(hundredths: i64) -> String {
    let sign = if hundredths < 0 { "-" } else { "" };
    let magnitude = hundredths.unsigned_abs();
    format!("{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
}
