//! Feature modules implementing the report card API
//!
//! Each feature is a vertical slice with its own commands, queries and,
//! where it is exposed over HTTP, routes.
//!
//! # Features
//!
//! - **students**: create, fetch and delete students
//! - **subjects**: subject get-or-create by name
//! - **marks**: per-subject marks for a student
//! - **report_cards**: subject batches, report card issue and retrieval
//!
//! # Architecture
//!
//! - `commands/` - Write operations
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//!
//! Store operations take any `SqliteExecutor`, so the report card flows can
//! run several of them inside one transaction.

pub mod marks;
pub mod report_cards;
pub mod shared;
pub mod students;
pub mod subjects;

use axum::Router;

use crate::render::ReportRenderer;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// SQLite connection pool
    pub db: sqlx::SqlitePool,
    /// Report card template registry
    pub renderer: ReportRenderer,
}

/// Creates the API router with all feature routes mounted
///
/// - `/students` - Student management
/// - `/reportcards` - Subject submission and report cards
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/students", students::students_routes().with_state(state.db.clone()))
        .nest("/reportcards", report_cards::report_cards_routes().with_state(state))
}
