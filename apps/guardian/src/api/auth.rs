//! # Authentication Module
//!
//! Bearer API key authentication for the Guardian HTTP API.
//!
//! `GUARDIAN_API_KEY` turns authentication on. Once set, every route except
//! the ones in [`PUBLIC_PATHS`] needs `Authorization: Bearer <key>`.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// Routes reachable without a key (load balancer probes, static reference data).
const PUBLIC_PATHS: [&str; 2] = ["/health", "/stages"];

/// Get API key from environment variable.
///
/// Returns `None` (authentication disabled) when `GUARDIAN_API_KEY` is unset
/// or empty.
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("GUARDIAN_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// Pull the key out of an `Authorization` header value.
///
/// Accepts `Bearer <key>` and a bare `<key>`.
fn provided_key(header_value: &str) -> &str {
    header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim()
}

/// Compare two keys in time independent of where they differ.
///
/// Both sides are padded to the same length so the comparison always covers
/// the same number of bytes.
fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let len = provided.len().max(expected.len());
    let mut a = vec![0u8; len];
    let mut b = vec![0u8; len];
    a[..provided.len()].copy_from_slice(provided);
    b[..expected.len()].copy_from_slice(expected);

    let same_bytes: bool = a.ct_eq(&b).into();
    same_bytes && provided.len() == expected.len()
}

/// API key authentication middleware.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = get_api_key_from_env() else {
        return Ok(next.run(request).await);
    };

    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let Some(header_value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!(
            event = "auth_failure",
            reason = "missing_authorization_header",
            path = request.uri().path(),
            "Missing Authorization header"
        );
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    if keys_match(provided_key(header_value), &expected) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            event = "auth_failure",
            reason = "invalid_api_key",
            path = request.uri().path(),
            "Authentication failed: invalid API key"
        );
        Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_stripped() {
        assert_eq!(provided_key("Bearer abc123"), "abc123");
        assert_eq!(provided_key("abc123"), "abc123");
    }

    #[test]
    fn equal_keys_match() {
        assert!(keys_match("site-key-01", "site-key-01"));
    }

    #[test]
    fn prefix_does_not_match() {
        assert!(!keys_match("site-key", "site-key-01"));
        assert!(!keys_match("site-key-01-extra", "site-key-01"));
        assert!(!keys_match("", "site-key-01"));
    }
}
