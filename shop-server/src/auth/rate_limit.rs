//! Application-layer rate limiting for login and registration routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::AppError;
use crate::core::ServerState;
use crate::security_log;

/// Auth routes: 5 requests per 15 minutes per IP
const AUTH_MAX_REQUESTS: u32 = 5;
const AUTH_WINDOW: Duration = Duration::from_secs(15 * 60);

struct IpEntry {
    count: u32,
    window_start: Instant,
    window: Duration,
}

impl IpEntry {
    fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.window_start) >= self.window
    }
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(
        &self,
        route: &'static str,
        ip: &str,
        max_requests: u32,
        window: Duration,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
            window,
        });

        if entry.expired(now) {
            entry.count = 0;
            entry.window_start = now;
            entry.window = window;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Remove entries whose window has passed
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| !entry.expired(now));
        }

        map.retain(|_, route_map| !route_map.is_empty());
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.inner.lock().await.values().map(HashMap::len).sum()
    }
}

/// Extract client IP: X-Forwarded-For header first (reverse proxy), then peer address.
fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Rate limit middleware for register / login / admin login
pub async fn auth_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request);
    if !state
        .rate_limiter
        .check("auth", &ip, AUTH_MAX_REQUESTS, AUTH_WINDOW)
        .await
    {
        security_log!(
            "WARN",
            "rate_limited",
            ip = ip.as_str(),
            uri = format!("{:?}", request.uri())
        );
        return Err(AppError::too_many_requests());
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blocks_after_limit() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            assert!(limiter.check("auth", "10.0.0.1", 5, AUTH_WINDOW).await);
        }
        assert!(!limiter.check("auth", "10.0.0.1", 5, AUTH_WINDOW).await);
        // Other IPs and routes have their own counters
        assert!(limiter.check("auth", "10.0.0.2", 5, AUTH_WINDOW).await);
        assert!(limiter.check("other", "10.0.0.1", 5, AUTH_WINDOW).await);
    }

    #[tokio::test]
    async fn cleanup_keeps_open_windows() {
        let limiter = RateLimiter::new();
        limiter.check("auth", "10.0.0.1", 5, AUTH_WINDOW).await;
        limiter.check("auth", "10.0.0.2", 5, Duration::ZERO).await;
        assert_eq!(limiter.tracked().await, 2);

        limiter.cleanup().await;
        assert_eq!(limiter.tracked().await, 1);
    }

    #[test]
    fn forwarded_for_wins() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&request), "203.0.113.7");

        let request = Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&request), "unknown");
    }
}
