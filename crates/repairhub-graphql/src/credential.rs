//! Bearer credential extraction.
//!
//! The gateway does not validate tokens; it only forwards whatever the caller
//! sent so the upstream can decide. A missing or unreadable header is never
//! an error, it simply results in an unauthenticated upstream call.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

/// Prefix every forwarded credential carries.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Ensures `token` carries exactly one `Bearer ` prefix.
///
/// Idempotent: normalizing an already-normalized value returns it unchanged.
#[must_use]
pub fn normalize_bearer(token: &str) -> String {
    if token.starts_with(BEARER_PREFIX) {
        token.to_string()
    } else {
        format!("{BEARER_PREFIX}{token}")
    }
}

/// Reads the `authorization` header and returns a normalized bearer credential.
///
/// Header lookup is case-insensitive. Returns `None` when the header is
/// absent, empty, or not valid visible ASCII.
#[must_use]
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    if raw.is_empty() {
        return None;
    }
    Some(normalize_bearer(raw))
}
