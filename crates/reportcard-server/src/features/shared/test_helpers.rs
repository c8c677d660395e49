//! Test helpers and fixtures for database tests
//!
//! ```rust,ignore
//! use crate::features::shared::test_helpers::*;
//!
//! #[sqlx::test(migrator = "crate::db::MIGRATOR")]
//! async fn test_something(pool: SqlitePool) -> sqlx::Result<()> {
//!     let student = TestStudent::new("R1").with_name("Asha").insert(&pool).await?;
//!     // ... test logic ...
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::Student;

/// Builder for creating test students
#[derive(Debug, Clone)]
pub struct TestStudent {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub class: String,
    pub section: String,
}

impl TestStudent {
    pub fn new(roll_number: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Test Student".to_string(),
            roll_number: roll_number.to_string(),
            class: "5".to_string(),
            section: "A".to_string(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Student> {
        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (id, name, roll_number, class, section, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, roll_number, class, section, created_at
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.roll_number)
        .bind(&self.class)
        .bind(&self.section)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}

pub async fn count_report_cards(pool: &SqlitePool, student_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM report_cards WHERE student_id = ?")
        .bind(student_id)
        .fetch_one(pool)
        .await
}

pub async fn count_student_subjects(pool: &SqlitePool, student_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM student_subjects WHERE student_id = ?")
        .bind(student_id)
        .fetch_one(pool)
        .await
}

/// Insert a report card with an explicit timestamp
pub async fn insert_report_card_at(
    pool: &SqlitePool,
    student_id: Uuid,
    generated_at: DateTime<Utc>,
    final_comments: &str,
) -> sqlx::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO report_cards (id, student_id, generated_at, final_comments) VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(student_id)
    .bind(generated_at)
    .bind(final_comments)
    .execute(pool)
    .await?;
    Ok(id)
}
