use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body for errors that escaped an operation (HTTP 400).
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Body for unmatched routes (HTTP 404).
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", database_message(.0))]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    MalformedPath(String),
    #[error("Not found")]
    NotFound,
}

/// Prefers the engine's own message text over sqlx's wrapped display form.
pub fn database_message(err: &sqlx::Error) -> String {
    match err.as_database_error() {
        Some(db_err) => db_err.message().to_string(),
        None => err.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(NotFoundResponse { error: "Not found" }),
            )
                .into_response(),
            err => {
                tracing::debug!(error = %err, "Request failed");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        success: false,
                        error: err.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
