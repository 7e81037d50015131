//! Error types for market data operations.
//!
//! Providers return these errors for diagnostics and logging; the
//! aggregation layer treats every error as an absent result and moves on
//! to the next provider in the chain. Nothing here propagates to HTTP
//! callers as a failure status.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider did not answer within its request deadline.
    #[error("[{provider}] request timed out")]
    Timeout { provider: &'static str },

    /// The provider answered with a non-success HTTP status.
    #[error("[{provider}] unexpected status {status}")]
    Status {
        provider: &'static str,
        status: u16,
    },

    /// The provider answered but the payload did not have the expected
    /// shape (missing fields, wrong types, unparseable numbers).
    #[error("[{provider}] malformed payload: {message}")]
    MalformedPayload {
        provider: &'static str,
        message: String,
    },

    /// A required API credential is not configured. Raised before any
    /// network call is attempted.
    #[error("missing credential '{key}'")]
    MissingCredential { key: &'static str },

    /// The provider does not implement the requested operation.
    #[error("[{provider}] operation not supported: {operation}")]
    NotSupported {
        provider: &'static str,
        operation: &'static str,
    },

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

impl MarketDataError {
    /// Wraps a reqwest error, promoting timeouts to the dedicated
    /// variant so log lines can tell deadline misses from dead hosts.
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MarketDataError::Timeout { provider }
        } else {
            MarketDataError::Network(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = MarketDataError::Status {
            provider: "FMP",
            status: 429,
        };
        assert_eq!(err.to_string(), "[FMP] unexpected status 429");
    }

    #[test]
    fn test_missing_credential_display() {
        let err = MarketDataError::MissingCredential {
            key: "TWELVEDATA_API_KEY",
        };
        assert!(err.to_string().contains("TWELVEDATA_API_KEY"));
    }

    #[test]
    fn test_malformed_payload_display() {
        let err = MarketDataError::MalformedPayload {
            provider: "MYNET",
            message: "price span not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "[MYNET] malformed payload: price span not found"
        );
    }
}
