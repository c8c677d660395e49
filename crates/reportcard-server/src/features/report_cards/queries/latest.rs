use chrono::{DateTime, Utc};
use reportcard_common::Marks;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::features::marks::list_for_student;
use crate::features::students::queries::get::find;
use crate::models::{ReportCard, Student, Subject};

pub const NOT_FOUND_MESSAGE: &str = "Report card not found.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetLatestReportCardQuery {
    pub student_id: Uuid,
}

/// The latest report card with its student and the student's current marks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCardDetail {
    pub id: Uuid,
    pub student: Student,
    pub generated_at: DateTime<Utc>,
    pub pdf_url: Option<String>,
    pub final_comments: Option<String>,
    pub subjects: Vec<ReportCardSubject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCardSubject {
    pub subject: Subject,
    pub marks: Marks,
    pub grade: String,
    pub comments: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetLatestReportCardError {
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Most recent report card for a student. Ties on `generated_at` go to the
/// row inserted last.
pub async fn latest<'e, E>(executor: E, student_id: Uuid) -> sqlx::Result<Option<ReportCard>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, ReportCard>(
        r#"
        SELECT id, student_id, generated_at, pdf_url, final_comments
        FROM report_cards
        WHERE student_id = ?
        ORDER BY generated_at DESC, rowid DESC
        LIMIT 1
        "#,
    )
    .bind(student_id)
    .fetch_optional(executor)
    .await
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: GetLatestReportCardQuery,
) -> Result<ReportCardDetail, GetLatestReportCardError> {
    // One read transaction so the card, student and marks agree
    let mut tx = pool.begin().await?;

    let report_card = latest(&mut *tx, query.student_id)
        .await?
        .ok_or(GetLatestReportCardError::NotFound(query.student_id))?;
    let student = find(&mut *tx, query.student_id)
        .await?
        .ok_or(GetLatestReportCardError::NotFound(query.student_id))?;
    let subjects = list_for_student(&mut *tx, query.student_id)
        .await?
        .into_iter()
        .map(|row| ReportCardSubject {
            subject: Subject {
                id: row.subject_id,
                name: row.subject_name,
                code: row.subject_code,
            },
            marks: row.marks,
            grade: row.grade,
            comments: row.comments,
        })
        .collect();

    tx.commit().await?;

    Ok(ReportCardDetail {
        id: report_card.id,
        student,
        generated_at: report_card.generated_at,
        pdf_url: report_card.pdf_url,
        final_comments: report_card.final_comments,
        subjects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::marks::{upsert, StudentSubjectUpsert};
    use crate::features::shared::test_helpers::{insert_report_card_at, TestStudent};
    use crate::features::subjects::get_or_create;
    use chrono::{Duration, TimeZone};

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_latest_picks_newest_generated_at(pool: SqlitePool) -> sqlx::Result<()> {
        let student = TestStudent::new("R1").insert(&pool).await?;
        let t1 = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let t2 = t1 + Duration::hours(1);

        // Inserted out of order so rowid alone would pick the wrong one
        let newer = insert_report_card_at(&pool, student.id, t2, "second").await?;
        insert_report_card_at(&pool, student.id, t1, "first").await?;

        let card = latest(&pool, student.id).await?.unwrap();
        assert_eq!(card.id, newer);
        assert_eq!(card.generated_at, t2);
        Ok(())
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_latest_ties_go_to_last_inserted(pool: SqlitePool) -> sqlx::Result<()> {
        let student = TestStudent::new("R1").insert(&pool).await?;
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();

        insert_report_card_at(&pool, student.id, at, "a").await?;
        let last = insert_report_card_at(&pool, student.id, at, "b").await?;

        assert_eq!(latest(&pool, student.id).await?.unwrap().id, last);
        Ok(())
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_handle_nests_student_and_subjects(pool: SqlitePool) -> sqlx::Result<()> {
        let student = TestStudent::new("R1").with_name("Asha").insert(&pool).await?;
        let math = get_or_create(&pool, "Math").await?;
        let marks = Marks::from_hundredths(8800).unwrap();
        upsert(
            &pool,
            &StudentSubjectUpsert::new(student.id, math.id, marks)
                .with_comments(Some("Solid".to_string())),
        )
        .await?;
        insert_report_card_at(&pool, student.id, Utc::now(), "Good").await?;

        let detail = handle(pool.clone(), GetLatestReportCardQuery { student_id: student.id })
            .await
            .unwrap();

        assert_eq!(detail.student.name, "Asha");
        assert_eq!(detail.final_comments.as_deref(), Some("Good"));
        assert_eq!(detail.pdf_url, None);
        assert_eq!(detail.subjects.len(), 1);
        assert_eq!(detail.subjects[0].subject, math);
        assert_eq!(detail.subjects[0].marks, marks);
        assert_eq!(detail.subjects[0].grade, "");
        assert_eq!(detail.subjects[0].comments.as_deref(), Some("Solid"));
        Ok(())
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_handle_without_report_card(pool: SqlitePool) -> sqlx::Result<()> {
        let student = TestStudent::new("R1").insert(&pool).await?;

        let result = handle(pool.clone(), GetLatestReportCardQuery { student_id: student.id }).await;
        assert!(matches!(result, Err(GetLatestReportCardError::NotFound(_))));

        let result = handle(pool, GetLatestReportCardQuery { student_id: Uuid::new_v4() }).await;
        assert!(matches!(result, Err(GetLatestReportCardError::NotFound(_))));
        Ok(())
    }
}
