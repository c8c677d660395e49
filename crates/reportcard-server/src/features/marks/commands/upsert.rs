//! Record marks for a (student, subject) pair

use reportcard_common::Marks;
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::models::StudentSubject;

/// Values written for one (student, subject) pair
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSubjectUpsert {
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub marks: Marks,
    pub grade: String,
    pub comments: Option<String>,
}

impl StudentSubjectUpsert {
    /// Ungraded, uncommented marks
    pub fn new(student_id: Uuid, subject_id: Uuid, marks: Marks) -> Self {
        Self {
            student_id,
            subject_id,
            marks,
            grade: String::new(),
            comments: None,
        }
    }

    pub fn with_comments(mut self, comments: Option<String>) -> Self {
        self.comments = comments;
        self
    }
}

/// Insert the pair, or replace marks, grade and comments if it exists.
///
/// The row keeps its id and position, so re-recording a subject does not
/// reorder the student's subjects.
#[tracing::instrument(skip(executor), fields(student_id = %values.student_id, subject_id = %values.subject_id))]
pub async fn upsert<'e, E>(executor: E, values: &StudentSubjectUpsert) -> sqlx::Result<StudentSubject>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, StudentSubject>(
        r#"
        INSERT INTO student_subjects (id, student_id, subject_id, marks_hundredths, grade, comments)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (student_id, subject_id) DO UPDATE SET
            marks_hundredths = excluded.marks_hundredths,
            grade = excluded.grade,
            comments = excluded.comments
        RETURNING id, student_id, subject_id, marks_hundredths, grade, comments
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(values.student_id)
    .bind(values.subject_id)
    .bind(values.marks.hundredths())
    .bind(&values.grade)
    .bind(&values.comments)
    .fetch_one(executor)
    .await
}
