use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::models::Student;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStudentQuery {
    pub student_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetStudentError {
    #[error("Student not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Look a student up by id on any executor, including an open transaction
pub async fn find<'e, E>(executor: E, student_id: Uuid) -> sqlx::Result<Option<Student>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Student>(
        r#"
        SELECT id, name, roll_number, class, section, created_at
        FROM students
        WHERE id = ?
        "#,
    )
    .bind(student_id)
    .fetch_optional(executor)
    .await
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetStudentQuery) -> Result<Student, GetStudentError> {
    find(&pool, query.student_id)
        .await?
        .ok_or(GetStudentError::NotFound(query.student_id))
}
