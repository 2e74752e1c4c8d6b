// visibility-backend/src/utils/error_helper.rs

//! エラーハンドリングの統一化ヘルパー
//!
//! サービス層とハンドラー層で共通して使用する、ログ付きのエラー生成。

use crate::error::AppError;
use tracing::{error, warn};
use validator::ValidationErrors;

// =============================================================================
// バリデーションエラー処理の統一
// =============================================================================

/// validatorのValidationErrorsをAppErrorに変換する
///
/// # Arguments
/// * `validation_errors` - validator crate からのバリデーションエラー
/// * `context` - エラーが発生したコンテキスト（ログ用）
pub fn convert_validation_errors(validation_errors: ValidationErrors, context: &str) -> AppError {
    warn!(
        context = %context,
        error_count = validation_errors.field_errors().len(),
        "Validation failed"
    );

    let errors: Vec<String> = validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| "Invalid value".to_string(), |cow| cow.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();

    AppError::ValidationErrors(errors)
}

// =============================================================================
// ログ付きエラー変換パターン
// =============================================================================

pub fn internal_server_error<E: std::fmt::Display>(
    error: E,
    context: &str,
    user_message: &str,
) -> AppError {
    error!(
        error = %error,
        context = %context,
        "Internal server error occurred"
    );
    AppError::InternalServerError(user_message.to_string())
}

/// 業務ルール違反（作成時の検証など）
pub fn bad_request_error(message: &str, context: &str) -> AppError {
    warn!(
        context = %context,
        message = %message,
        "Request rejected"
    );
    AppError::BadRequest(message.to_string())
}

pub fn forbidden_error(message: &str, context: &str, employee_id: Option<&str>) -> AppError {
    warn!(
        context = %context,
        message = %message,
        employee_id = employee_id.unwrap_or("unknown"),
        "Forbidden access attempt"
    );
    AppError::Forbidden(message.to_string())
}

pub fn not_found_error(resource: &str, identifier: &str, context: &str) -> AppError {
    warn!(
        context = %context,
        resource = %resource,
        identifier = %identifier,
        "Resource not found"
    );
    AppError::NotFound(format!(
        "{} with identifier {} not found",
        resource, identifier
    ))
}
