// visibility-backend/src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbErr(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::DbErr(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationErrors(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::DbErr(db_err) => {
                // サーバーログには詳細を出す
                tracing::error!(error = ?db_err, "Database error");

                let (message, details) = match &db_err {
                    DbErr::RecordNotFound(entity) => (
                        "The requested resource was not found",
                        Some(json!({ "entity": entity })),
                    ),
                    DbErr::Exec(_) => (
                        "A database operation failed",
                        Some(json!({ "operation": "exec" })),
                    ),
                    DbErr::Query(_) => (
                        "A database query failed",
                        Some(json!({ "operation": "query" })),
                    ),
                    _ => ("A database error occurred", None),
                };
                let mut response = ErrorResponse::new("database_error", message);
                response.details = details;
                response
            }
            AppError::NotFound(message) => ErrorResponse::new("not_found", message),
            AppError::ValidationErrors(errors) => {
                let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
                for error in &errors {
                    if let Some((field, message)) = error.split_once(": ") {
                        field_errors
                            .entry(field.to_string())
                            .or_default()
                            .push(message.to_string());
                    }
                }
                ErrorResponse::validation(field_errors, &errors)
            }
            AppError::BadRequest(message) => ErrorResponse::new("bad_request", message),
            AppError::Unauthorized(message) => ErrorResponse::new("unauthorized", message),
            AppError::Forbidden(message) => ErrorResponse::new("forbidden", message),
            AppError::InternalServerError(message) => {
                tracing::error!(message = %message, "Internal server error");
                ErrorResponse::new("internal_server_error", "An internal server error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
    pub error_type: String,
}

impl ErrorResponse {
    fn new(error_type: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            error: message.clone(),
            message,
            details: None,
            validation_errors: None,
            errors: None,
            error_type: error_type.to_string(),
        }
    }

    fn validation(field_errors: HashMap<String, Vec<String>>, messages: &[String]) -> Self {
        let mut response = Self::new("validation_errors", "Validation failed");
        response.validation_errors = Some(field_errors);
        response.errors = Some(messages.iter().map(|m| json!({ "message": m })).collect());
        response
    }
}
