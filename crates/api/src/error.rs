use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagecraft_core::error::CoreError;
use serde_json::json;

/// Errors returned by the JSON API as `{ "error", "code" }` bodies.
///
/// Delivery routes answer with HTML pages instead and never produce this.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

type Parts = (StatusCode, &'static str, String);

fn internal(detail: &dyn std::fmt::Display) -> Parts {
    tracing::error!(error = %detail, "Request failed with an internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl AppError {
    fn parts(&self) -> Parts {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) | AppError::InternalError(msg) => internal(msg),
            AppError::Database(err) => sqlx_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

/// A missing row is a 404 and a taken slug or token (`uq_*`) is a 409.
fn sqlx_parts(err: &sqlx::Error) -> Parts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            match db_err.constraint().filter(|c| c.starts_with("uq_")) {
                Some(constraint) => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                None => internal(db_err),
            }
        }
        other => internal(other),
    }
}
