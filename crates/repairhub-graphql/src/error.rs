//! Error types for the gateway.
//!
//! Upstream failures and normalization failures are kept apart so callers can
//! tell a transport problem from a malformed payload. Both are converted into
//! GraphQL errors with a machine-readable `code` extension.

use async_graphql::ErrorExtensions;

/// Errors raised while talking to the upstream REST API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// The upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status} for {method} {path}")]
    Status {
        /// HTTP method of the failed call.
        method: String,
        /// Request path relative to the base URL.
        path: String,
        /// Status code returned by the upstream.
        status: u16,
    },

    /// The call did not complete within the configured timeout.
    #[error("upstream request {method} {path} timed out after {timeout_secs}s")]
    Timeout {
        method: String,
        path: String,
        timeout_secs: u64,
    },

    /// Connection or protocol failure before a status was received.
    #[error("upstream request {method} {path} failed: {message}")]
    Transport {
        method: String,
        path: String,
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("failed to decode upstream response from {path}: {message}")]
    Decode { path: String, message: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(String),

    /// A header name or value could not be encoded.
    #[error("invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },
}

impl UpstreamError {
    /// Returns the upstream HTTP status, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the upstream answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Status { .. } => "UPSTREAM_STATUS",
            Self::Timeout { .. } => "UPSTREAM_TIMEOUT",
            Self::Transport { .. } => "UPSTREAM_TRANSPORT",
            Self::Decode { .. } => "UPSTREAM_DECODE",
            Self::Client(_) | Self::InvalidHeader { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Errors raised while reshaping upstream JSON into typed records.
///
/// Absent or null fields never produce these; only values that are present
/// but cannot be coerced to the field's numeric type do.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("{record}.{field}: expected a decimal number, got {value}")]
    InvalidDecimal {
        record: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{record}.{field}: expected an integer, got {value}")]
    InvalidInteger {
        record: &'static str,
        field: &'static str,
        value: String,
    },
}

impl NormalizeError {
    /// Returns the `record.field` path of the offending value.
    #[must_use]
    pub fn field_path(&self) -> String {
        match self {
            Self::InvalidDecimal { record, field, .. } | Self::InvalidInteger { record, field, .. } => {
                format!("{record}.{field}")
            }
        }
    }
}

/// Any failure a resolver can surface.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("invalid upstream data: {0}")]
    Normalize(#[from] NormalizeError),
}

impl GatewayError {
    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Upstream(e) => e.error_code(),
            Self::Normalize(_) => "INVALID_UPSTREAM_DATA",
        }
    }
}

impl ErrorExtensions for GatewayError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.error_code());
            match self {
                Self::Upstream(e) => {
                    if let Some(status) = e.status() {
                        ext.set("status", status);
                    }
                }
                Self::Normalize(e) => ext.set("field", e.field_path()),
            }
        })
    }
}

impl ErrorExtensions for UpstreamError {
    fn extend(&self) -> async_graphql::Error {
        GatewayError::Upstream(self.clone()).extend()
    }
}

impl ErrorExtensions for NormalizeError {
    fn extend(&self) -> async_graphql::Error {
        GatewayError::Normalize(self.clone()).extend()
    }
}
