use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStudentCommand {
    pub student_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStudentResponse {
    pub status: String,
    pub student_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteStudentError {
    #[error("Student not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Remove a student. Marks and report cards go with it through the
/// `ON DELETE CASCADE` foreign keys.
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    command: DeleteStudentCommand,
) -> Result<DeleteStudentResponse, DeleteStudentError> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(command.student_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteStudentError::NotFound(command.student_id));
    }

    tracing::info!(student_id = %command.student_id, "Student deleted");

    Ok(DeleteStudentResponse {
        status: "deleted".to_string(),
        student_id: command.student_id,
    })
}
