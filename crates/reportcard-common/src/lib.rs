//! Report Card Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging bootstrap, and error handling for the report card
//! workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`MarksError`] for rejected marks values
//! - **Logging**: centralized `tracing` subscriber setup
//! - **Types**: domain value types shared by every crate, such as [`Marks`]
//!
//! # Example
//!
//! ```
//! use reportcard_common::{Marks, MarksError};
//!
//! fn parse(raw: &str) -> Result<Marks, MarksError> {
//!     raw.parse::<Marks>()
//! }
//!
//! assert_eq!(parse("88").unwrap().to_string(), "88.00");
//! assert!(parse("88.125").is_err());
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::MarksError;
pub use types::Marks;
