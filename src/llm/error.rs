//! Typed errors for LLM operations
//!
//! Structured variants let callers log and report upstream failures without
//! string matching. The verdict service folds every variant into its
//! fail-open answer, so none of these ever reach the HTTP caller as a status.

use thiserror::Error;

/// LLM operation errors with typed variants
///
/// - `Unauthorized` (401) - API key rejected
/// - `RateLimited` (429) - quota exceeded
/// - `BadRequest` (400) - malformed request or unknown model
/// - `ServiceError` (5xx) - server-side issue
/// - `Network` - connection refused, DNS, timeout
/// - `Malformed` - 2xx reply whose body could not be decoded
/// - `Other` - catch-all for unhandled errors
#[derive(Debug, Error)]
pub enum LlmError {
    /// Authentication token is invalid (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded (HTTP 429)
    ///
    /// The inner string may contain quota reset time if available.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Malformed request (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server-side error (HTTP 5xx)
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Network connectivity issue (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the chat completions schema
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Other errors not fitting the above categories
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl LlmError {
    /// Convert HTTP status code and error text into typed LlmError
    pub fn from_http_status(status: reqwest::StatusCode, error_text: String) -> Self {
        match status.as_u16() {
            401 => LlmError::Unauthorized(error_text),
            429 => LlmError::RateLimited(error_text),
            400 => LlmError::BadRequest(error_text),
            500..=599 => LlmError::ServiceError(error_text),
            _ => LlmError::Other(anyhow::anyhow!("HTTP {}: {}", status, error_text)),
        }
    }

    /// Convert network/connection errors into typed LlmError
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            LlmError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            LlmError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            let error_text = e.to_string();
            Self::from_http_status(status, error_text)
        } else {
            LlmError::Other(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        let err = LlmError::from_http_status(
            reqwest::StatusCode::UNAUTHORIZED,
            "Invalid API Key".to_string(),
        );
        assert!(matches!(err, LlmError::Unauthorized(_)));

        let err = LlmError::from_http_status(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "Rate limit reached".to_string(),
        );
        assert!(matches!(err, LlmError::RateLimited(_)));

        let err =
            LlmError::from_http_status(reqwest::StatusCode::BAD_REQUEST, "Bad request".to_string());
        assert!(matches!(err, LlmError::BadRequest(_)));

        let err = LlmError::from_http_status(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            "over capacity".to_string(),
        );
        assert!(matches!(err, LlmError::ServiceError(_)));

        let err = LlmError::from_http_status(reqwest::StatusCode::NOT_FOUND, "nope".to_string());
        assert!(matches!(err, LlmError::Other(_)));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_error_display() {
        let err = LlmError::RateLimited("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Rate limited: quota exceeded");

        let err = LlmError::Malformed("missing field `choices`".to_string());
        assert_eq!(err.to_string(), "Malformed response: missing field `choices`");
    }

    #[test]
    fn test_convert_to_anyhow() {
        let llm_err = LlmError::Network("Connection failed".to_string());
        let anyhow_err: anyhow::Error = llm_err.into();
        assert!(anyhow_err.to_string().contains("Network error"));
        assert!(anyhow_err.downcast_ref::<LlmError>().is_some());
    }
}
