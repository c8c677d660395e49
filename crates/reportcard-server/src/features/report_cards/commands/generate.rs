//! Issue a report card from the marks already on record

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::create::create;
use crate::db::begin_write;
use crate::features::report_cards::assembler::build_context;
use crate::features::report_cards::queries::aggregate;
use crate::features::shared::parse_id;
use crate::features::students::queries::get::find;
use crate::models::ReportCard;
use crate::render::{RenderError, ReportRenderer, REPORT_CARD_TEMPLATE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateReportCardCommand {
    /// Kept loose so that a missing id (400) and an id that names nobody
    /// (404) are reported differently
    pub student_id: Option<serde_json::Value>,
    pub final_comments: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateReportCardError {
    #[error("Student ID is required")]
    StudentIdRequired,
    #[error("Student not found")]
    StudentNotFound(String),
    #[error("No subjects recorded for this student")]
    NoSubjects(Uuid),
    #[error("Failed to render report card: {0}")]
    Render(#[from] RenderError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct GeneratedReportCard {
    pub report_card: ReportCard,
    pub pdf: Vec<u8>,
}

impl GenerateReportCardCommand {
    /// Resolve the student id; anything that is not a UUID cannot exist
    pub fn validate(&self) -> Result<Uuid, GenerateReportCardError> {
        let raw = match self.student_id {
            None | Some(serde_json::Value::Null) => {
                return Err(GenerateReportCardError::StudentIdRequired)
            },
            Some(serde_json::Value::String(ref text)) if text.trim().is_empty() => {
                return Err(GenerateReportCardError::StudentIdRequired)
            },
            Some(serde_json::Value::String(ref text)) => text.clone(),
            Some(ref other) => other.to_string(),
        };

        parse_id(&raw).ok_or(GenerateReportCardError::StudentNotFound(raw))
    }
}

#[tracing::instrument(skip(pool, renderer, command))]
pub async fn handle(
    pool: SqlitePool,
    renderer: &ReportRenderer,
    command: GenerateReportCardCommand,
) -> Result<GeneratedReportCard, GenerateReportCardError> {
    let student_id = command.validate()?;

    let mut tx = begin_write(&pool).await?;

    let student = find(&mut *tx, student_id)
        .await?
        .ok_or_else(|| GenerateReportCardError::StudentNotFound(student_id.to_string()))?;

    let rows = aggregate(&mut *tx, student.id).await?;
    if rows.is_empty() {
        return Err(GenerateReportCardError::NoSubjects(student.id));
    }

    let report_card = create(&mut *tx, student.id, command.final_comments.as_deref()).await?;
    let context = build_context(
        &student,
        &rows,
        report_card.final_comments.as_deref(),
        report_card.generated_at,
    );
    let pdf = renderer.render(REPORT_CARD_TEMPLATE, &context)?;

    tx.commit().await?;

    tracing::info!(
        student_id = %student.id,
        report_card_id = %report_card.id,
        subjects = rows.len(),
        "Report card generated from recorded marks"
    );

    Ok(GeneratedReportCard { report_card, pdf })
}
