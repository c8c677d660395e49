//! Report Card Server Library
//!
//! HTTP service that records students and their subject marks and issues
//! report cards as PDF documents.
//!
//! # Overview
//!
//! - **API Endpoints**: JSON API under `/api/v1` for students and report cards
//! - **Record Store**: SQLite through SQLx, schema managed by embedded migrations
//! - **Documents**: Handlebars templates laid out as PDF pages
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS and request logging
//!
//! # Architecture
//!
//! Features are vertical slices split into **commands** (writes) and
//! **queries** (reads). A batch of subject marks and the report card issued
//! for it are written in one transaction, committed only after the document
//! has rendered.
//!
//! # Example
//!
//! ```no_run
//! use reportcard_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;
pub mod render;

// Re-export commonly used types
pub use error::AppError;
