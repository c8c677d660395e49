//! Database models
//!
//! One struct per table. Rows are read with `sqlx::FromRow`; writes live in
//! the feature commands that own each table.

use chrono::{DateTime, Utc};
use reportcard_common::Marks;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A student. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub class: String,
    pub section: String,
    pub created_at: DateTime<Utc>,
}

/// A subject shared by every student who takes it. Unique by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
}

/// Marks for one (student, subject) pair. At most one row per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StudentSubject {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    #[sqlx(rename = "marks_hundredths", try_from = "i64")]
    pub marks: Marks,
    /// Always empty: no grading scheme is defined
    pub grade: String,
    pub comments: Option<String>,
}

/// A generated report card. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReportCard {
    pub id: Uuid,
    pub student_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub pdf_url: Option<String>,
    pub final_comments: Option<String>,
}
