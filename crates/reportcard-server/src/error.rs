//! Server-wide error type for failures outside a single feature slice

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::db::DbError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database unavailable: {0}")]
    Db(#[from] DbError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Db(ref e) => {
                tracing::error!("Database health check failed: {:?}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable".to_string())
            },
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
