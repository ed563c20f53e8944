//! # Middleware Module
//!
//! Process-wide rate limiting for the Guardian HTTP API.
//!
//! `GUARDIAN_RATE_LIMIT` sets requests per second (default 100, `0` disables
//! the limiter entirely).

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Requests per second when nothing is configured.
const DEFAULT_RATE_LIMIT: u32 = 100;

/// Shared, unkeyed limiter.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a limiter allowing `requests_per_second`, bursting up to the same amount.
///
/// A zero rate falls back to [`DEFAULT_RATE_LIMIT`]; callers disable limiting
/// by not installing the middleware at all.
pub fn create_rate_limiter(requests_per_second: u32) -> GlobalRateLimiter {
    let rps = NonZeroU32::new(requests_per_second)
        .or_else(|| NonZeroU32::new(DEFAULT_RATE_LIMIT))
        .unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Parse a configured rate. Unparseable values fall back to the default.
fn parse_rate_limit(raw: Option<&str>) -> u32 {
    match raw.map(str::trim) {
        None => DEFAULT_RATE_LIMIT,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid GUARDIAN_RATE_LIMIT '{}', using {}",
                value,
                DEFAULT_RATE_LIMIT
            );
            DEFAULT_RATE_LIMIT
        }),
    }
}

/// Get rate limit from `GUARDIAN_RATE_LIMIT`.
pub fn get_rate_limit_from_env() -> u32 {
    parse_rate_limit(std::env::var("GUARDIAN_RATE_LIMIT").ok().as_deref())
}

/// Reject with 429 once the limiter is exhausted.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if limiter.check().is_err() {
        tracing::warn!(
            event = "rate_limited",
            path = request.uri().path(),
            "Rate limit exceeded"
        );
        return Err((StatusCode::TOO_MANY_REQUESTS, "Too Many Requests"));
    }
    Ok(next.run(request).await)
}

// =============================================================================
// TESTS
// =============================================================================
