//! Shared validation utilities
//!
//! Field messages follow the wording clients of the original service
//! already match on ("This field is required." and friends).
//!
//! ```rust,ignore
//! use reportcard_server::features::shared::validation::validate_text;
//!
//! let name = validate_text(command.name.as_deref(), 100)?;
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Errors for a required, length-limited text field
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextValidationError {
    #[error("This field is required.")]
    Required,

    #[error("This field may not be null.")]
    Null,

    #[error("Not a valid string.")]
    NotAString,

    #[error("This field may not be blank.")]
    Blank,

    #[error("Ensure this field has no more than {max_length} characters.")]
    TooLong { max_length: usize },
}

/// Validate a required text field and return it trimmed.
///
/// Length is counted in characters, not bytes.
pub fn validate_text(value: Option<&str>, max_length: usize) -> Result<String, TextValidationError> {
    let value = value.ok_or(TextValidationError::Required)?.trim();

    if value.is_empty() {
        return Err(TextValidationError::Blank);
    }

    if value.chars().count() > max_length {
        return Err(TextValidationError::TooLong { max_length });
    }

    Ok(value.to_string())
}

/// Validate a text field taken straight from a JSON body.
///
/// Numbers are accepted in their JSON spelling (`5` becomes `"5"`); other
/// non-string values are rejected for this field alone.
pub fn validate_json_text(
    value: Option<&Value>,
    max_length: usize,
) -> Result<String, TextValidationError> {
    let text = match value {
        None => return Err(TextValidationError::Required),
        Some(Value::Null) => return Err(TextValidationError::Null),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(_) => return Err(TextValidationError::NotAString),
    };
    validate_text(Some(&text), max_length)
}

/// Keep an explicit `null` as `Some(Value::Null)`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Parse an identifier taken from a path or body.
///
/// Unparseable identifiers cannot name an existing record, so callers
/// treat `None` as "not found".
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
