//! Student API routes
//!
//! - `POST /api/v1/students` - Create a student
//! - `GET /api/v1/students/:student_id` - Get a student
//! - `DELETE /api/v1/students/:student_id` - Delete a student and everything recorded for it

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{
    commands::{CreateStudentCommand, CreateStudentError, DeleteStudentCommand, DeleteStudentError},
    queries::{GetStudentError, GetStudentQuery},
};
use crate::api::response::ErrorResponse;
use crate::features::shared::parse_id;

pub fn students_routes() -> Router<SqlitePool> {
    Router::new()
        .route("/", post(create_student))
        .route("/:student_id", get(get_student).delete(delete_student))
}

#[derive(Debug, Serialize)]
struct StudentCreatedResponse {
    status: &'static str,
    student_id: Uuid,
}

/// Create a student
///
/// # Request Body
///
/// ```json
/// { "name": "Asha", "roll_number": "R1", "class": "5", "section": "A" }
/// ```
///
/// # Response
///
/// - `201 Created` - `{"status": "success", "student_id": "<uuid>"}`
/// - `400 Bad Request` - field errors, e.g. `{"roll_number": ["..."]}`
#[tracing::instrument(skip(pool, payload))]
async fn create_student(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateStudentCommand>, JsonRejection>,
) -> Result<Response, StudentApiError> {
    let Json(command) = payload?;
    let student = super::commands::create::handle(pool, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(StudentCreatedResponse {
            status: "success",
            student_id: student.id,
        }),
    )
        .into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_student(
    State(pool): State<SqlitePool>,
    Path(student_id): Path<String>,
) -> Result<Response, StudentApiError> {
    let student_id = parse_id(&student_id).ok_or(StudentApiError::UnknownId)?;
    let student = super::queries::get::handle(pool, GetStudentQuery { student_id }).await?;

    Ok((StatusCode::OK, Json(student)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_student(
    State(pool): State<SqlitePool>,
    Path(student_id): Path<String>,
) -> Result<Response, StudentApiError> {
    let student_id = parse_id(&student_id).ok_or(StudentApiError::UnknownId)?;
    let response = super::commands::delete::handle(pool, DeleteStudentCommand { student_id }).await?;

    Ok((StatusCode::OK, Json(response)).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum StudentApiError {
    InvalidBody(JsonRejection),
    UnknownId,
    CreateError(CreateStudentError),
    GetError(GetStudentError),
    DeleteError(DeleteStudentError),
}

impl From<JsonRejection> for StudentApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl From<CreateStudentError> for StudentApiError {
    fn from(err: CreateStudentError) -> Self {
        Self::CreateError(err)
    }
}

impl From<GetStudentError> for StudentApiError {
    fn from(err: GetStudentError) -> Self {
        Self::GetError(err)
    }
}

impl From<DeleteStudentError> for StudentApiError {
    fn from(err: DeleteStudentError) -> Self {
        Self::DeleteError(err)
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

impl IntoResponse for StudentApiError {
    fn into_response(self) -> Response {
        match self {
            StudentApiError::InvalidBody(rejection) => {
                error(StatusCode::BAD_REQUEST, rejection.body_text())
            },
            StudentApiError::CreateError(ref err) => match err.field_errors() {
                Some(errors) => errors.into_response(),
                None => {
                    tracing::error!("Database error during student creation: {}", err);
                    error(StatusCode::INTERNAL_SERVER_ERROR, "A database error occurred")
                },
            },
            StudentApiError::UnknownId
            | StudentApiError::GetError(GetStudentError::NotFound(_))
            | StudentApiError::DeleteError(DeleteStudentError::NotFound(_)) => {
                error(StatusCode::NOT_FOUND, "Student not found")
            },
            StudentApiError::GetError(GetStudentError::Database(ref e))
            | StudentApiError::DeleteError(DeleteStudentError::Database(ref e)) => {
                tracing::error!("Database error during student request: {}", e);
                error(StatusCode::INTERNAL_SERVER_ERROR, "A database error occurred")
            },
        }
    }
}
