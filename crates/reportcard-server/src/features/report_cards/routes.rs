//! Report card API routes
//!
//! - `POST /api/v1/reportcards/:student_id` - Record subject marks and issue a report card
//! - `GET /api/v1/reportcards/:student_id` - Latest report card for a student
//! - `POST /api/v1/reportcards/generate` - Issue a report card from recorded marks (PDF)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::{
    commands::{
        GenerateReportCardCommand, GenerateReportCardError, SubmitSubjectsCommand,
        SubmitSubjectsError,
    },
    queries::{latest::NOT_FOUND_MESSAGE, GetLatestReportCardError, GetLatestReportCardQuery},
};
use crate::api::response::{ErrorResponse, PdfResponse};
use crate::features::shared::parse_id;
use crate::features::FeatureState;

const PDF_MEDIA_TYPE: &str = "application/pdf";

pub fn report_cards_routes() -> Router<FeatureState> {
    Router::new()
        .route("/generate", post(generate_report_card))
        .route("/:student_id", get(get_latest_report_card).post(submit_subjects))
}

fn wants_pdf(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.to_ascii_lowercase().contains(PDF_MEDIA_TYPE))
}

/// Record subject marks and issue a report card
///
/// # Request Body
///
/// ```json
/// {
///   "subjects": [{ "name": "Math", "marks": 88 }, { "name": "Eng", "marks": 91 }],
///   "final_comments": "Good"
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - JSON summary of the stored report card
/// - `200 OK` - the PDF, when `Accept` names `application/pdf`
/// - `400 Bad Request` - empty batch or an invalid entry; nothing is stored
/// - `404 Not Found` - unknown student
#[tracing::instrument(skip(state, headers, payload))]
async fn submit_subjects(
    State(state): State<FeatureState>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<SubmitSubjectsCommand>, JsonRejection>,
) -> Result<Response, ReportCardApiError> {
    let student_id = parse_id(&student_id).ok_or(ReportCardApiError::UnknownStudent)?;
    let Json(mut command) = payload?;
    command.student_id = student_id;
    command.render_pdf = wants_pdf(&headers);

    let mut submitted =
        super::commands::submit_subjects::handle(state.db, &state.renderer, command).await?;

    if let Some(bytes) = submitted.pdf.take() {
        return Ok(PdfResponse { bytes }.into_response());
    }

    Ok((StatusCode::CREATED, Json(submitted.summary())).into_response())
}

/// Latest report card with its student and subjects
///
/// - `200 OK` - nested JSON
/// - `404 Not Found` - `{"error": "Report card not found."}`
#[tracing::instrument(skip(state))]
async fn get_latest_report_card(
    State(state): State<FeatureState>,
    Path(student_id): Path<String>,
) -> Result<Response, ReportCardApiError> {
    let student_id = parse_id(&student_id).ok_or(ReportCardApiError::UnknownReportCard)?;
    let detail =
        super::queries::latest::handle(state.db, GetLatestReportCardQuery { student_id }).await?;

    Ok((StatusCode::OK, Json(detail)).into_response())
}

/// Issue a report card from the marks already recorded
///
/// # Request Body
///
/// ```json
/// { "student_id": "<uuid>", "final_comments": "Good" }
/// ```
///
/// - `200 OK` - the PDF
/// - `400 Bad Request` - missing `student_id`
/// - `404 Not Found` - unknown student, or no marks recorded
#[tracing::instrument(skip(state, payload))]
async fn generate_report_card(
    State(state): State<FeatureState>,
    payload: Result<Json<GenerateReportCardCommand>, JsonRejection>,
) -> Result<Response, ReportCardApiError> {
    let Json(command) = payload?;
    let generated = super::commands::generate::handle(state.db, &state.renderer, command).await?;

    Ok(PdfResponse { bytes: generated.pdf }.into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum ReportCardApiError {
    InvalidBody(JsonRejection),
    UnknownStudent,
    UnknownReportCard,
    SubmitError(SubmitSubjectsError),
    GenerateError(GenerateReportCardError),
    LatestError(GetLatestReportCardError),
}

impl From<JsonRejection> for ReportCardApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl From<SubmitSubjectsError> for ReportCardApiError {
    fn from(err: SubmitSubjectsError) -> Self {
        Self::SubmitError(err)
    }
}

impl From<GenerateReportCardError> for ReportCardApiError {
    fn from(err: GenerateReportCardError) -> Self {
        Self::GenerateError(err)
    }
}

impl From<GetLatestReportCardError> for ReportCardApiError {
    fn from(err: GetLatestReportCardError) -> Self {
        Self::LatestError(err)
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

impl IntoResponse for ReportCardApiError {
    fn into_response(self) -> Response {
        match self {
            ReportCardApiError::InvalidBody(rejection) => {
                error(StatusCode::BAD_REQUEST, rejection.body_text())
            },
            ReportCardApiError::UnknownStudent => error(StatusCode::NOT_FOUND, "Student not found"),
            ReportCardApiError::UnknownReportCard => {
                error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
            },

            // Submit errors
            ReportCardApiError::SubmitError(
                ref err @ (SubmitSubjectsError::SubjectsRequired
                | SubmitSubjectsError::InvalidName { .. }
                | SubmitSubjectsError::MarksRequired { .. }
                | SubmitSubjectsError::InvalidMarks { .. }),
            ) => error(StatusCode::BAD_REQUEST, err.to_string()),
            ReportCardApiError::SubmitError(ref err @ SubmitSubjectsError::StudentNotFound(_)) => {
                error(StatusCode::NOT_FOUND, err.to_string())
            },
            ReportCardApiError::SubmitError(ref err @ SubmitSubjectsError::Render(_)) => {
                tracing::error!("Render error during subject submission: {}", err);
                error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            },
            ReportCardApiError::SubmitError(ref err @ SubmitSubjectsError::Database(_)) => {
                tracing::error!("Database error during subject submission: {}", err);
                error(StatusCode::INTERNAL_SERVER_ERROR, "A database error occurred")
            },

            // Generate errors
            ReportCardApiError::GenerateError(
                ref err @ GenerateReportCardError::StudentIdRequired,
            ) => error(StatusCode::BAD_REQUEST, err.to_string()),
            ReportCardApiError::GenerateError(
                ref err @ (GenerateReportCardError::StudentNotFound(_)
                | GenerateReportCardError::NoSubjects(_)),
            ) => error(StatusCode::NOT_FOUND, err.to_string()),
            ReportCardApiError::GenerateError(ref err @ GenerateReportCardError::Render(_)) => {
                tracing::error!("Render error during report card generation: {}", err);
                error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            },
            ReportCardApiError::GenerateError(ref err @ GenerateReportCardError::Database(_)) => {
                tracing::error!("Database error during report card generation: {}", err);
                error(StatusCode::INTERNAL_SERVER_ERROR, "A database error occurred")
            },

            // Latest errors
            ReportCardApiError::LatestError(GetLatestReportCardError::NotFound(_)) => {
                error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
            },
            ReportCardApiError::LatestError(ref err @ GetLatestReportCardError::Database(_)) => {
                tracing::error!("Database error during report card retrieval: {}", err);
                error(StatusCode::INTERNAL_SERVER_ERROR, "A database error occurred")
            },
        }
    }
}
