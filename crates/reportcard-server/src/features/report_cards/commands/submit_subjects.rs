//! Record a batch of subject marks and issue a report card for them

use chrono::{DateTime, Utc};
use reportcard_common::{Marks, MarksError};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

use super::create::create;
use crate::db::begin_write;
use crate::features::marks::{upsert, StudentSubjectUpsert};
use crate::features::report_cards::assembler::build_context;
use crate::features::report_cards::queries::SubjectRow;
use crate::features::shared::validation::{validate_text, TextValidationError};
use crate::features::students::queries::get::find;
use crate::features::subjects::{get_or_create, NAME_MAX_LENGTH};
use crate::models::{ReportCard, Student};
use crate::render::{RenderError, ReportRenderer, REPORT_CARD_TEMPLATE};

/// One subject in a submitted batch, as sent by the client.
///
/// `marks` stays a raw JSON value until validation so that a number, a
/// numeric string, and garbage can each be told apart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectEntry {
    pub name: Option<String>,
    pub marks: Option<serde_json::Value>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitSubjectsCommand {
    /// Taken from the request path
    #[serde(skip)]
    pub student_id: Uuid,
    pub subjects: Option<Vec<SubjectEntry>>,
    pub final_comments: Option<String>,
    /// Render the PDF as part of the submission
    #[serde(skip)]
    pub render_pdf: bool,
}

/// A subject entry that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubjectEntry {
    pub name: String,
    pub marks: Marks,
    pub comments: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitSubjectsError {
    #[error("At least one subject is required.")]
    SubjectsRequired,
    #[error("subjects[{index}].name: {source}")]
    InvalidName {
        index: usize,
        source: TextValidationError,
    },
    #[error("subjects[{index}].marks: This field is required.")]
    MarksRequired { index: usize },
    #[error("subjects[{index}].marks: {source}")]
    InvalidMarks { index: usize, source: MarksError },
    #[error("Student not found")]
    StudentNotFound(Uuid),
    #[error("Failed to render report card: {0}")]
    Render(#[from] RenderError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The stored report card and what was shown on it
#[derive(Debug, Clone)]
pub struct SubmittedReportCard {
    pub report_card: ReportCard,
    pub student: Student,
    /// One row per distinct subject, in first-submitted order
    pub subjects: Vec<SubjectRow>,
    /// Present when the command asked for rendering
    pub pdf: Option<Vec<u8>>,
}

/// JSON summary returned when no PDF was requested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSubjectsResponse {
    pub status: String,
    pub report_card_id: Uuid,
    pub student_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub final_comments: Option<String>,
    pub subjects: Vec<SubjectRow>,
}

impl SubmittedReportCard {
    pub fn summary(&self) -> SubmitSubjectsResponse {
        SubmitSubjectsResponse {
            status: "success".to_string(),
            report_card_id: self.report_card.id,
            student_id: self.student.id,
            generated_at: self.report_card.generated_at,
            final_comments: self.report_card.final_comments.clone(),
            subjects: self.subjects.clone(),
        }
    }
}

impl SubmitSubjectsCommand {
    /// Validate the whole batch. The first bad entry fails it.
    pub fn validate(&self) -> Result<Vec<ValidSubjectEntry>, SubmitSubjectsError> {
        let entries = match self.subjects {
            Some(ref entries) if !entries.is_empty() => entries,
            _ => return Err(SubmitSubjectsError::SubjectsRequired),
        };

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let name = validate_text(entry.name.as_deref(), NAME_MAX_LENGTH)
                    .map_err(|source| SubmitSubjectsError::InvalidName { index, source })?;
                let marks = match entry.marks {
                    Some(ref value) => Marks::from_json(value)
                        .map_err(|source| SubmitSubjectsError::InvalidMarks { index, source })?,
                    None => return Err(SubmitSubjectsError::MarksRequired { index }),
                };

                Ok(ValidSubjectEntry {
                    name,
                    marks,
                    comments: entry.comments.clone(),
                })
            })
            .collect()
    }
}

/// Upsert every entry, append a report card and optionally render it.
///
/// Everything runs in one transaction that commits only once rendering has
/// succeeded, so a rejected batch or a failed render writes nothing.
#[tracing::instrument(skip(pool, renderer, command), fields(student_id = %command.student_id))]
pub async fn handle(
    pool: SqlitePool,
    renderer: &ReportRenderer,
    command: SubmitSubjectsCommand,
) -> Result<SubmittedReportCard, SubmitSubjectsError> {
    let mut tx = begin_write(&pool).await?;

    let student = find(&mut *tx, command.student_id)
        .await?
        .ok_or(SubmitSubjectsError::StudentNotFound(command.student_id))?;
    let entries = command.validate()?;

    let mut subjects: Vec<SubjectRow> = Vec::with_capacity(entries.len());
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for entry in entries {
        let subject = get_or_create(&mut *tx, &entry.name).await?;
        upsert(
            &mut *tx,
            &StudentSubjectUpsert::new(student.id, subject.id, entry.marks)
                .with_comments(entry.comments),
        )
        .await?;

        let row = SubjectRow {
            subject_name: subject.name,
            subject_code: subject.code,
            marks: entry.marks,
        };
        match positions.get(&subject.id) {
            Some(&position) => subjects[position] = row,
            None => {
                positions.insert(subject.id, subjects.len());
                subjects.push(row);
            },
        }
    }

    let report_card = create(&mut *tx, student.id, command.final_comments.as_deref()).await?;

    let pdf = if command.render_pdf {
        let context = build_context(
            &student,
            &subjects,
            report_card.final_comments.as_deref(),
            report_card.generated_at,
        );
        Some(renderer.render(REPORT_CARD_TEMPLATE, &context)?)
    } else {
        None
    };

    tx.commit().await?;

    tracing::info!(
        report_card_id = %report_card.id,
        subjects = subjects.len(),
        "Subjects submitted and report card created"
    );

    Ok(SubmittedReportCard {
        report_card,
        student,
        subjects,
        pdf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::report_cards::queries::aggregate;
    use crate::features::shared::test_helpers::{
        count_report_cards, count_student_subjects, TestStudent,
    };
    use serde_json::json;

    fn entry(name: &str, marks: serde_json::Value) -> SubjectEntry {
        SubjectEntry {
            name: Some(name.to_string()),
            marks: Some(marks),
            comments: None,
        }
    }

    fn command(student_id: Uuid, subjects: Vec<SubjectEntry>) -> SubmitSubjectsCommand {
        SubmitSubjectsCommand {
            student_id,
            subjects: Some(subjects),
            final_comments: Some("Good".to_string()),
            render_pdf: false,
        }
    }

    #[test]
    fn test_validate_requires_subjects() {
        let mut cmd = command(Uuid::new_v4(), vec![]);
        assert!(matches!(cmd.validate(), Err(SubmitSubjectsError::SubjectsRequired)));

        cmd.subjects = None;
        assert!(matches!(cmd.validate(), Err(SubmitSubjectsError::SubjectsRequired)));
    }

    #[test]
    fn test_validate_names_the_bad_entry() {
        let mut missing = entry("Eng", json!(1));
        missing.marks = None;
        let cmd = command(Uuid::new_v4(), vec![entry("Math", json!(88)), missing]);

        let err = cmd.validate().unwrap_err();
        assert!(matches!(err, SubmitSubjectsError::MarksRequired { index: 1 }));
        assert_eq!(err.to_string(), "subjects[1].marks: This field is required.");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cmd = command(Uuid::new_v4(), vec![entry("  ", json!(88))]);
        assert!(matches!(
            cmd.validate(),
            Err(SubmitSubjectsError::InvalidName { index: 0, .. })
        ));

        let cmd = command(Uuid::new_v4(), vec![entry("Math", json!("eighty"))]);
        assert!(matches!(
            cmd.validate(),
            Err(SubmitSubjectsError::InvalidMarks { index: 0, source: MarksError::NotNumeric(_) })
        ));

        let cmd = command(Uuid::new_v4(), vec![entry("Math", json!(1000))]);
        assert!(matches!(
            cmd.validate(),
            Err(SubmitSubjectsError::InvalidMarks { source: MarksError::OutOfRange(_), .. })
        ));
    }

    #[test]
    fn test_validate_accepts_numeric_strings() {
        let cmd = command(Uuid::new_v4(), vec![entry(" Math ", json!("88.5"))]);
        let entries = cmd.validate().unwrap();
        assert_eq!(entries[0].name, "Math");
        assert_eq!(entries[0].marks.to_string(), "88.50");
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_handle_records_marks_and_report_card(pool: SqlitePool) -> sqlx::Result<()> {
        let renderer = ReportRenderer::new().unwrap();
        let student = TestStudent::new("R1").with_name("Asha").insert(&pool).await?;

        let mut cmd = command(
            student.id,
            vec![entry("Math", json!(88)), entry("Eng", json!(91))],
        );
        cmd.render_pdf = true;

        let submitted = handle(pool.clone(), &renderer, cmd).await.unwrap();

        assert_eq!(submitted.student.id, student.id);
        assert_eq!(submitted.subjects.len(), 2);
        assert_eq!(submitted.subjects[0].subject_name, "Math");
        assert_eq!(submitted.subjects[1].marks.to_string(), "91.00");
        assert!(submitted.pdf.unwrap().starts_with(b"%PDF-"));
        assert_eq!(submitted.report_card.final_comments.as_deref(), Some("Good"));
        assert_eq!(count_report_cards(&pool, student.id).await?, 1);
        assert_eq!(aggregate(&pool, student.id).await?.len(), 2);
        Ok(())
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_handle_duplicate_names_last_wins(pool: SqlitePool) -> sqlx::Result<()> {
        let renderer = ReportRenderer::new().unwrap();
        let student = TestStudent::new("R1").insert(&pool).await?;

        let cmd = command(
            student.id,
            vec![entry("Math", json!(40)), entry("Eng", json!(70)), entry("Math", json!(95))],
        );
        let submitted = handle(pool.clone(), &renderer, cmd).await.unwrap();

        assert!(submitted.pdf.is_none());
        let names: Vec<&str> = submitted.subjects.iter().map(|s| s.subject_name.as_str()).collect();
        assert_eq!(names, vec!["Math", "Eng"]);
        assert_eq!(submitted.subjects[0].marks.to_string(), "95.00");
        assert_eq!(count_student_subjects(&pool, student.id).await?, 2);
        Ok(())
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_invalid_entry_writes_nothing(pool: SqlitePool) -> sqlx::Result<()> {
        let renderer = ReportRenderer::new().unwrap();
        let student = TestStudent::new("R1").insert(&pool).await?;

        let mut bad = entry("Eng", json!(1));
        bad.marks = None;
        let cmd = command(student.id, vec![entry("Math", json!(88)), bad]);

        let result = handle(pool.clone(), &renderer, cmd).await;
        assert!(matches!(result, Err(SubmitSubjectsError::MarksRequired { index: 1 })));
        assert_eq!(count_report_cards(&pool, student.id).await?, 0);
        assert_eq!(count_student_subjects(&pool, student.id).await?, 0);
        Ok(())
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_render_failure_rolls_back(pool: SqlitePool) -> sqlx::Result<()> {
        let renderer =
            ReportRenderer::with_template(REPORT_CARD_TEMPLATE, "{{student.nickname}}").unwrap();
        let student = TestStudent::new("R1").insert(&pool).await?;

        let mut cmd = command(student.id, vec![entry("Math", json!(88))]);
        cmd.render_pdf = true;

        let result = handle(pool.clone(), &renderer, cmd).await;
        assert!(matches!(result, Err(SubmitSubjectsError::Render(_))));
        assert_eq!(count_report_cards(&pool, student.id).await?, 0);
        assert_eq!(count_student_subjects(&pool, student.id).await?, 0);

        let subjects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
            .fetch_one(&pool)
            .await?;
        assert_eq!(subjects, 0);
        Ok(())
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn test_unknown_student(pool: SqlitePool) -> sqlx::Result<()> {
        let renderer = ReportRenderer::new().unwrap();
        let cmd = command(Uuid::new_v4(), vec![entry("Math", json!(88))]);

        let result = handle(pool, &renderer, cmd).await;
        assert!(matches!(result, Err(SubmitSubjectsError::StudentNotFound(_))));
        Ok(())
    }
}
