//! Shared types for the storefront
//!
//! Wire and domain types used by the server and any Rust client:
//! the unified error system, domain models, the category master list
//! and small utilities.

pub mod catalog;
pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
