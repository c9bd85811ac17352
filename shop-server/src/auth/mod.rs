//! Authentication and authorization
//!
//! - [`JwtService`] - token issuing and validation
//! - [`CurrentUser`] - caller identity, usable as an extractor
//! - [`require_admin`] - admin-only middleware
//! - [`auth_rate_limit`] - per-IP limiter for the auth routes
//! - argon2 password hashing

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod rate_limit;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_admin;
pub use password::{hash_password, verify_password};
pub use rate_limit::{RateLimiter, auth_rate_limit};
