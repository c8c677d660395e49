//! Collect what a report card shows for each subject

use reportcard_common::Marks;
use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::features::marks::{list_for_student, StudentSubjectDetail};

/// One line of a report card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRow {
    pub subject_name: String,
    pub subject_code: Option<String>,
    pub marks: Marks,
}

impl From<StudentSubjectDetail> for SubjectRow {
    fn from(detail: StudentSubjectDetail) -> Self {
        Self {
            subject_name: detail.subject_name,
            subject_code: detail.subject_code,
            marks: detail.marks,
        }
    }
}

/// Every subject recorded for the student. Empty, not an error, when
/// nothing has been recorded or the student does not exist.
pub async fn aggregate<'e, E>(executor: E, student_id: Uuid) -> sqlx::Result<Vec<SubjectRow>>
where
    E: SqliteExecutor<'e>,
{
    let rows = list_for_student(executor, student_id).await?;
    Ok(rows.into_iter().map(SubjectRow::from).collect())
}
