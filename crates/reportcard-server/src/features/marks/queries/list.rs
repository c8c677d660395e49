//! Read a student's recorded marks

use reportcard_common::Marks;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use uuid::Uuid;

/// A student's marks for one subject, with the subject's name and code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StudentSubjectDetail {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub subject_code: Option<String>,
    #[sqlx(rename = "marks_hundredths", try_from = "i64")]
    pub marks: Marks,
    pub grade: String,
    pub comments: Option<String>,
}

/// All of a student's rows, in the order they were first recorded.
///
/// Re-recording a subject updates its row in place and keeps its position.
pub async fn list_for_student<'e, E>(
    executor: E,
    student_id: Uuid,
) -> sqlx::Result<Vec<StudentSubjectDetail>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, StudentSubjectDetail>(
        r#"
        SELECT
            s.id AS subject_id,
            s.name AS subject_name,
            s.code AS subject_code,
            ss.marks_hundredths,
            ss.grade,
            ss.comments
        FROM student_subjects ss
        JOIN subjects s ON s.id = ss.subject_id
        WHERE ss.student_id = ?
        ORDER BY ss.rowid
        "#,
    )
    .bind(student_id)
    .fetch_all(executor)
    .await
}
