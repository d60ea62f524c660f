use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use uuid::Uuid;

use crate::builds::BuildError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `FORBIDDEN`, `NOT_FOUND`,
    /// `CONFLICT`, `USERNAME_TAKEN`, `COMPONENTS_NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Build name must be 3-100 characters")]
    pub message: String,
    /// Machine-readable context, e.g. `{"component_ids": [...]}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    UsernameTaken,
    /// Some referenced catalog components do not exist.
    ComponentsNotFound(Vec<Uuid>),
    Internal(String),
}

fn body(code: &'static str, message: impl Into<String>) -> ErrorBody {
    ErrorBody {
        code,
        message: message.into(),
        detail: None,
    }
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, body("VALIDATION_ERROR", msg)),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                body("TOKEN_MISSING", "Authentication required"),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                body("TOKEN_INVALID", "Invalid or expired token"),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                body("INVALID_CREDENTIALS", "Invalid username or password"),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, body("FORBIDDEN", msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, body("NOT_FOUND", msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, body("CONFLICT", msg)),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                body("USERNAME_TAKEN", "Username is already taken"),
            ),
            AppError::ComponentsNotFound(ids) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    code: "COMPONENTS_NOT_FOUND",
                    message: format!("{} component(s) not found in the catalog", ids.len()),
                    detail: Some(serde_json::json!({ "component_ids": ids })),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    body("INTERNAL_ERROR", "An unexpected error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::InvalidArgument(msg) => AppError::Validation(msg),
            BuildError::Unauthenticated => AppError::TokenMissing,
            BuildError::Forbidden(msg) => AppError::Forbidden(msg),
            BuildError::NotFound(msg) => AppError::NotFound(msg),
            BuildError::ComponentsNotFound(ids) => AppError::ComponentsNotFound(ids),
            BuildError::TransactionFailure(detail) => AppError::Internal(detail),
        }
    }
}
