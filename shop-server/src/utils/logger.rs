//! Logging Infrastructure
//!
//! Structured logging with an env filter and an optional daily log file.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor `LOG_LEVEL` is set
const DEFAULT_FILTER: &str = "shop_server=info,tower_http=info";

/// Build the filter: `RUST_LOG` wins, then `LOG_LEVEL`, then the default.
fn build_filter(log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match log_level {
        Some(level) => EnvFilter::new(format!("shop_server={level},tower_http={level}")),
        None => EnvFilter::new(DEFAULT_FILTER),
    })
}

/// Initialize the logger with optional file output
pub fn init_logger(log_level: Option<&str>, log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "shop-server");
            let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
            return;
        }
    }

    let _ = subscriber.try_init();
}
