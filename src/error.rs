//! Error types for the Syncthing API client
//!
//! Two layers: [`RawError`] is the set of unwrapped failures surfaced by
//! `Client::raw_request`, and [`Error`] is the public surface: construction
//! failures plus the single normalized request failure wrapping a `RawError`
//! as its cause.

use std::path::PathBuf;
use thiserror::Error;

/// Unwrapped request failures, as surfaced by `Client::raw_request`.
///
/// Callers implementing their own retry or classification logic branch on
/// these variants directly; everyone else goes through `Client::request` and
/// sees them only as the cause of [`Error::Syncthing`].
#[derive(Error, Debug)]
pub enum RawError {
    /// Transport-level failure (connect, send, receive).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status outside 200-299.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Response status code.
        status: u16,
        /// Response body captured as text for diagnostics.
        body: String,
    },

    /// The whole request-response cycle exceeded the configured deadline.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// The deadline that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// A 2xx response body was not valid JSON.
    #[error("Failed to decode JSON response: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// The request path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The owning client was closed before this request was issued.
    #[error("Client is closed")]
    ClientClosed,
}

impl RawError {
    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RawError::HttpStatus { status, .. } => Some(*status),
            RawError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this failure was a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        match self {
            RawError::Timeout { .. } => true,
            RawError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RawError::Http(_) | RawError::Timeout { .. } => true,
            RawError::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// The main error type for the Syncthing API client
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration field was empty or absent.
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Name of the missing field.
        field: String,
    },

    /// A configuration field held a value outside its allowed range.
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue {
        /// Name of the offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The configured certificate path does not point at a regular file.
    #[error("Certificate file not found: {}", path.display())]
    CertificateNotFound {
        /// The offending path.
        path: PathBuf,
    },

    /// The certificate file exists but could not be parsed as PEM.
    #[error("Invalid certificate file {}: {source}", path.display())]
    InvalidCertificate {
        /// The offending path.
        path: PathBuf,
        /// The underlying parse failure.
        #[source]
        source: reqwest::Error,
    },

    /// The configured base URL is not a valid absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP session could not be built.
    #[error("Failed to initialize HTTP session: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure while reading the certificate file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The single normalized request failure. The original cause is kept as
    /// the error source.
    #[error("Syncthing API request failed: {source}")]
    Syncthing {
        /// The underlying failure.
        #[source]
        source: RawError,
    },
}

impl Error {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The unwrapped cause, when this is the normalized request failure.
    pub fn cause(&self) -> Option<&RawError> {
        match self {
            Error::Syncthing { source } => Some(source),
            _ => None,
        }
    }
}

impl From<RawError> for Error {
    fn from(source: RawError) -> Self {
        Error::Syncthing { source }
    }
}

/// Result type alias for the Syncthing API client
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::missing_field("api_key");
        assert_eq!(err.to_string(), "Missing required config field: api_key");

        let err = Error::invalid_value("timeout", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'timeout': must be positive"
        );

        let err = Error::CertificateNotFound {
            path: PathBuf::from("/etc/syncthing/cert.pem"),
        };
        assert_eq!(
            err.to_string(),
            "Certificate file not found: /etc/syncthing/cert.pem"
        );
    }

    #[test]
    fn test_raw_error_display() {
        let err = RawError::HttpStatus {
            status: 404,
            body: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");

        let err = RawError::Timeout { timeout_ms: 10_000 };
        assert_eq!(err.to_string(), "Request timeout after 10000ms");

        assert_eq!(RawError::ClientClosed.to_string(), "Client is closed");
    }

    #[test]
    fn test_normalized_error_keeps_cause() {
        let err = Error::from(RawError::HttpStatus {
            status: 401,
            body: String::new(),
        });

        assert!(matches!(err, Error::Syncthing { .. }));
        assert_eq!(err.cause().and_then(RawError::status), Some(401));

        // The cause is reachable through the std error chain too.
        let source = err.source().expect("normalized error has a source");
        assert!(source.to_string().contains("HTTP 401"));
    }

    #[test]
    fn test_cause_is_none_for_construction_errors() {
        assert!(Error::missing_field("api_key").cause().is_none());
    }

    #[test]
    fn test_is_retryable() {
        assert!(RawError::Timeout { timeout_ms: 1 }.is_retryable());
        assert!(RawError::HttpStatus {
            status: 429,
            body: String::new()
        }
        .is_retryable());
        assert!(RawError::HttpStatus {
            status: 503,
            body: String::new()
        }
        .is_retryable());

        assert!(!RawError::HttpStatus {
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(!RawError::HttpStatus {
            status: 401,
            body: String::new()
        }
        .is_retryable());
        assert!(!RawError::ClientClosed.is_retryable());
    }

    #[test]
    fn test_status_helper() {
        let err = RawError::HttpStatus {
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(RawError::ClientClosed.status(), None);
    }

    #[test]
    fn test_is_timeout_helper() {
        assert!(RawError::Timeout { timeout_ms: 250 }.is_timeout());
        assert!(!RawError::ClientClosed.is_timeout());
    }
}
