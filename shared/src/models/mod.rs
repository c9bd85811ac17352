//! Data models
//!
//! Shared between the server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix millis.

pub mod order;
pub mod product;
pub mod stats;
pub mod user;

// Re-exports
pub use order::*;
pub use product::*;
pub use stats::*;
pub use user::*;
