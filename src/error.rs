//! Error types for the A1Base client.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for all A1Base client operations.
pub enum Error {
    /// The API rejected the configured key/secret (HTTP 401).
    #[error("authentication error: invalid API credentials")]
    Authentication,
    /// The API rejected the request payload (HTTP 422).
    #[error("invalid request: {detail}")]
    Validation {
        /// Error body returned by the server.
        detail: serde_json::Value,
    },
    /// The API is throttling this account (HTTP 429).
    #[error("rate limit exceeded")]
    RateLimit,
    /// HTTP response returned any other non-success status with body.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// Underlying HTTP client error (timeout, DNS, connection reset).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Failure reported by a non-reqwest transport.
    #[error("transport error: {0}")]
    Transport(String),
    /// A success response whose body is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A required request field is empty; raised before any network call.
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    /// The configured base URL does not use HTTPS.
    #[error("base URL must use https: {0}")]
    InsecureBaseUrl(String),
    /// Malformed client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this is the generic API failure class: a non-2xx status other
    /// than 401/422/429, a transport failure, or an unreadable success body.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            Error::Status { .. } | Error::Http(_) | Error::Transport(_) | Error::Json(_)
        )
    }

    /// HTTP status behind this error, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Authentication => Some(StatusCode::UNAUTHORIZED),
            Error::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            Error::RateLimit => Some(StatusCode::TOO_MANY_REQUESTS),
            Error::Status { status, .. } => Some(*status),
            Error::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Result type for A1Base client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_class_covers_status_and_transport() {
        let status = Error::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        };
        assert!(status.is_api_error());
        assert!(Error::Transport("reset".into()).is_api_error());
        assert!(!Error::Authentication.is_api_error());
        assert!(!Error::RateLimit.is_api_error());
        assert!(!Error::MissingField { field: "from" }.is_api_error());
    }

    #[test]
    fn classified_errors_report_their_status() {
        assert_eq!(Error::Authentication.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(Error::RateLimit.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(Error::Config("x".into()).status(), None);
    }

    #[test]
    fn validation_display_includes_server_body() {
        let err = Error::Validation {
            detail: serde_json::json!({"to": ["invalid number"]}),
        };
        assert!(err.to_string().contains("invalid number"));
    }
}
