//! HTTP client for the upstream REST API.
//!
//! Every call attaches the caller's bearer credential (when there is one),
//! uses the configured timeout, and fails on any non-2xx status without
//! retrying or rewriting the upstream error.
//!
//! Calls run on a spawned task: if the inbound request is dropped while an
//! upstream call is in flight, the call still runs to completion or to its
//! timeout instead of being cancelled midway.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::credential::normalize_bearer;
use crate::error::UpstreamError;

/// A completed upstream call with a 2xx status.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Parsed JSON body; `Value::Null` when the body was empty.
    pub body: Value,
}

/// Client for the upstream REST service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        })
    }

    /// Joins `path` onto the base URL with exactly one slash between them.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Assembles outbound headers.
    ///
    /// The credential is re-normalized here so callers that skipped the
    /// extractor still send a single `Bearer ` prefix. Extra headers are
    /// merged last and win over anything set before them.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is not a valid header value.
    pub fn build_headers(
        credential: Option<&str>,
        extra: Option<&HeaderMap>,
    ) -> Result<HeaderMap, UpstreamError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = credential {
            let value = HeaderValue::from_str(&normalize_bearer(token)).map_err(|e| {
                UpstreamError::InvalidHeader {
                    name: AUTHORIZATION.to_string(),
                    message: e.to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(extra) = extra {
            for (name, value) in extra {
                headers.insert(name.clone(), value.clone());
            }
        }

        Ok(headers)
    }

    /// `GET path`, returning the parsed body.
    pub async fn get(&self, path: &str, credential: Option<&str>) -> Result<Value, UpstreamError> {
        self.request(Method::GET, path, None, credential, None)
            .await
            .map(|resp| resp.body)
    }

    /// `POST path` with a JSON body, returning the parsed response body.
    pub async fn post(
        &self,
        path: &str,
        body: &Value,
        credential: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        self.request(Method::POST, path, Some(body.clone()), credential, None)
            .await
            .map(|resp| resp.body)
    }

    /// `DELETE path`, returning the success status.
    pub async fn delete(
        &self,
        path: &str,
        credential: Option<&str>,
    ) -> Result<StatusCode, UpstreamError> {
        self.request(Method::DELETE, path, None, credential, None)
            .await
            .map(|resp| resp.status)
    }

    /// Performs one upstream call.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Status`] for any non-2xx status, and
    /// timeout/transport/decode errors otherwise.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        credential: Option<&str>,
        extra_headers: Option<&HeaderMap>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let headers = Self::build_headers(credential, extra_headers)?;
        let url = self.url(path);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .headers(headers)
            .timeout(self.timeout);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        debug!(
            method = %method,
            path = %path,
            authenticated = credential.is_some(),
            "Calling upstream"
        );

        let started = Instant::now();
        let outcome = tokio::spawn(async move {
            let response = builder.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes))
        })
        .await;

        let (status, bytes) = match outcome {
            Ok(Ok(parts)) => parts,
            Ok(Err(e)) => {
                warn!(method = %method, path = %path, error = %e, "Upstream call failed");
                return Err(self.classify(&method, path, &e));
            }
            Err(join) => {
                warn!(method = %method, path = %path, error = %join, "Upstream task aborted");
                return Err(UpstreamError::Transport {
                    method: method.to_string(),
                    path: path.to_string(),
                    message: join.to_string(),
                });
            }
        };

        debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms = %started.elapsed().as_millis(),
            "Upstream responded"
        );

        if !status.is_success() {
            warn!(method = %method, path = %path, status = status.as_u16(), "Upstream returned error status");
            return Err(UpstreamError::Status {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            })?
        };

        Ok(UpstreamResponse { status, body })
    }

    fn classify(&self, method: &Method, path: &str, err: &reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout {
                method: method.to_string(),
                path: path.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else if err.is_decode() {
            UpstreamError::Decode {
                path: path.to_string(),
                message: err.to_string(),
            }
        } else {
            UpstreamError::Transport {
                method: method.to_string(),
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderName;

    fn client(base: &str) -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig::new(base)).unwrap()
    }

    #[test]
    fn test_url_joining() {
        assert_eq!(client("http://api.local").url("/users"), "http://api.local/users");
        assert_eq!(client("http://api.local/").url("users"), "http://api.local/users");
        assert_eq!(
            client("http://api.local/v1/").url("/repair-orders/stats/overview"),
            "http://api.local/v1/repair-orders/stats/overview"
        );
    }

    #[test]
    fn test_headers_without_credential() {
        let headers = UpstreamClient::build_headers(None, None).unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_headers_normalize_credential() {
        let headers = UpstreamClient::build_headers(Some("abc123"), None).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");

        let headers = UpstreamClient::build_headers(Some("Bearer abc123"), None).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");
    }

    #[test]
    fn test_extra_headers_take_precedence() {
        let mut extra = HeaderMap::new();
        extra.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        extra.insert(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-1"),
        );

        let headers = UpstreamClient::build_headers(Some("abc"), Some(&extra)).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Basic dXNlcg==");
        assert_eq!(headers["x-request-id"], "req-1");
    }

    #[test]
    fn test_invalid_credential_header() {
        let result = UpstreamClient::build_headers(Some("line\nbreak"), None);
        assert!(matches!(result, Err(UpstreamError::InvalidHeader { .. })));
    }
}
