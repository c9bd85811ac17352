use crate::db::repository::RepoError;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Order placement errors
#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed input, rejected before any database access
    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    #[error("Product {name} not found")]
    ProductNotFound { product_id: i64, name: String },

    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepoError),
}

impl OrderError {
    pub fn invalid(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Validation { code, .. } => AppError::with_message(code, message),
            OrderError::ProductNotFound { product_id, .. } => {
                AppError::with_message(ErrorCode::ProductNotFound, message)
                    .with_detail("productId", product_id)
            }
            OrderError::InsufficientStock {
                product_id,
                requested,
                available,
                ..
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("productId", product_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            OrderError::Database(e) => {
                tracing::error!(error = %e, "Order placement database error");
                AppError::database("Failed to place order")
            }
            OrderError::Repository(e) => e.into(),
        }
    }
}
