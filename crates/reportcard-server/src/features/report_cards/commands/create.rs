//! Append a report card row

use chrono::Utc;
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::models::ReportCard;

/// Insert a report card stamped with the current time.
///
/// `pdf_url` stays null: documents are streamed to the caller, never stored.
#[tracing::instrument(skip(executor, final_comments))]
pub async fn create<'e, E>(
    executor: E,
    student_id: Uuid,
    final_comments: Option<&str>,
) -> sqlx::Result<ReportCard>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, ReportCard>(
        r#"
        INSERT INTO report_cards (id, student_id, generated_at, pdf_url, final_comments)
        VALUES (?, ?, ?, NULL, ?)
        RETURNING id, student_id, generated_at, pdf_url, final_comments
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(student_id)
    .bind(Utc::now())
    .bind(final_comments)
    .fetch_one(executor)
    .await
}
