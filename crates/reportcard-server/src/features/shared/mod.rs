//! Shared utilities and types for feature modules
//!
//! - **validation**: input validation for request fields and identifiers
//! - **error_helpers**: database constraint violation helpers
//! - **test_helpers**: in-memory database and fixtures (test-only)

pub mod error_helpers;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use validation::{parse_id, validate_text, TextValidationError};
