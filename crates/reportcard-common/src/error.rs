//! Error types shared across the workspace

use thiserror::Error;

/// Reasons a marks value is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarksError {
    #[error("a valid number is required, got '{0}'")]
    NotNumeric(String),

    #[error("ensure that there are no more than 2 decimal places, got '{0}'")]
    TooPrecise(String),

    #[error("marks must be between 0 and 999.99, got '{0}'")]
    OutOfRange(String),
}
