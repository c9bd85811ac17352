//! Shop Server - storefront backend
//!
//! # Overview
//!
//! REST/JSON service for a small clothing storefront:
//!
//! - **Catalog** (`api::products`): products, sales, soft delete, image upload
//! - **Orders** (`orders`): transactional placement with stock decrement
//! - **Accounts** (`auth`, `api::auth`): argon2 passwords, JWT sessions
//! - **Back office** (`api::admin`): order verification and stats
//! - **Storage** (`db`): SQLite through sqlx
//!
//! # Module layout
//!
//! ```text
//! shop-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, passwords, extractor, rate limiting
//! ├── services/      # upload storage, admin bootstrap
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # logging, validation
//! ├── db/            # pool, migrations, repositories
//! └── orders/        # order placement workflow
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger;

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env`, then initialize logging from `LOG_LEVEL` / `LOG_DIR`.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = log_dir.as_deref() {
        std::fs::create_dir_all(dir)?;
    }
    init_logger(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_  ____  ____
  \__ \/ __ \/ __ \/ __ \
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\____/ .___/
                /_/
    "#
    );
}
