use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::DocumentError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// `Validation` is always raised before any external call is made.
/// `Fetch`, `Gateway` and `Parse` are the pipeline failures; whether they reach
/// the caller depends on the feature's `OnParseFailure` policy.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] LlmError),

    #[error("Parse error: {reason} (model output: {raw:?})")]
    Parse { reason: String, raw: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        AppError::Fetch(err.to_string())
    }
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Stable machine-readable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Fetch(_) => "FETCH_ERROR",
            AppError::Gateway(_) => "GATEWAY_ERROR",
            AppError::Parse { .. } => "PARSE_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch(_) | AppError::Gateway(_) | AppError::Parse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to a client. Upstream detail (locations, model
    /// output, driver errors) stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Fetch(_) => "The resume document could not be retrieved".to_string(),
            AppError::Gateway(_) => "An AI processing error occurred".to_string(),
            AppError::Parse { .. } => "The AI response could not be understood".to_string(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::NotFound(_) | AppError::Validation(_) => {}
            AppError::Parse { reason, raw } => {
                tracing::error!("Parse error: {reason}; output: {raw:?}")
            }
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            other => tracing::error!("{other}"),
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (self.status(), body).into_response()
    }
}
