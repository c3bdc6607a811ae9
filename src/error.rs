use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::services::normalizer::NormalizeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Referential integrity violation: {0}")]
    Integrity(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database connection failed: {0}")]
    Connection(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl AppError {
    fn is_unique_violation(err: &sqlx::Error) -> bool {
        err.as_database_error()
            .and_then(|db_err| db_err.code())
            // 2067 = SQLite Unique Constraint
            // 23505 = PostgreSQL Unique Violation
            .is_some_and(|code| code == "2067" || code == "23505")
    }

    fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
        err.as_database_error()
            .and_then(|db_err| db_err.code())
            // 787 = SQLite Foreign Key Constraint
            // 23503 = PostgreSQL Foreign Key Violation
            .is_some_and(|code| code == "787" || code == "23503")
    }

    /// True when a write referenced a row that does not exist.
    pub fn is_missing_reference(&self) -> bool {
        matches!(self, AppError::Database(e) if Self::is_foreign_key_violation(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            AppError::Database(e) if Self::is_unique_violation(e) => (
                StatusCode::CONFLICT,
                "Resource already exists (duplicate entry)".to_string(),
                None,
            ),
            AppError::Database(e) if Self::is_foreign_key_violation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Referenced resource does not exist".to_string(),
                None,
            ),
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Connection(msg) => {
                error!("Connection error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Integrity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone(), None),
            AppError::Config(msg) | AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let body = match detail {
            Some(detail) => json!({ "success": false, "message": message, "error": detail }),
            None => json!({ "success": false, "message": message }),
        };

        (status, Json(body)).into_response()
    }
}
