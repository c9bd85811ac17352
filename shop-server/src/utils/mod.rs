//! Utilities - shared helpers and types
//!
//! - [`AppError`] - application error type (from shared::error)
//! - [`ApiResponse`] - API response envelope (from shared::error)
//! - logging and input validation

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Wrap data in a success envelope
pub fn ok<T>(data: T) -> axum::Json<ApiResponse<T>> {
    axum::Json(ApiResponse::success(data))
}

/// Wrap data in a success envelope with a custom message
pub fn ok_with_message<T>(message: impl Into<String>, data: T) -> axum::Json<ApiResponse<T>> {
    axum::Json(ApiResponse::success_with_message(message, data))
}

/// Handler result carrying the success envelope
pub type ApiResult<T> = Result<axum::Json<ApiResponse<T>>, AppError>;
