//! Typed errors and HTTP mapping.

use crate::service::Violations;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("There is no book with an isbn '{0}'")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(Violations),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Db(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Db(_) => "database_error",
            AppError::Conflict(_) => "conflict",
            AppError::BadRequest(_) => "bad_request",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// `{"error": {...}, "message": ...}`; every 400 carries `message` as a list of
/// strings, other statuses a single string.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
    pub message: serde_json::Value,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub status: u16,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let error = ErrorDetail {
            status: status.as_u16(),
            code: self.code().to_string(),
        };
        let message = match self {
            AppError::Validation(violations) => serde_json::json!(violations),
            AppError::BadRequest(text) => serde_json::json!([text]),
            other => serde_json::Value::String(other.to_string()),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}
