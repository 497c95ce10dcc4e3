// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for lazyxss
//!
//! Only configuration-time and infrastructure faults are errors. Per-candidate
//! outcomes (no reflection, network fault, no dialog) are plain values, see
//! [`crate::xss::ReflectionResult`] and [`crate::xss::ConfirmationResult`].

use thiserror::Error;

/// Result type alias for lazyxss operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lazyxss
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server kept answering with a retryable status until retries ran out
    #[error("Server error {status} from {url} after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        status: u16,
        attempts: u32,
    },

    /// Browser launch or driver fault
    #[error("Browser error: {0}")]
    Browser(String),

    /// Navigation failed
    #[error("Navigation failed to {url}: {reason}")]
    NavigationFailed { url: String, reason: String },

    /// Timeout error
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        url: Option<String>,
    },

    /// Browser pool has been shut down
    #[error("Browser pool is closed")]
    PoolClosed,
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a browser error
    pub fn browser<S: Into<String>>(msg: S) -> Self {
        Error::Browser(msg.into())
    }

    /// Create a navigation error
    pub fn navigation_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::NavigationFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a timeout error with URL
    pub fn timeout_with_url(
        operation: impl Into<String>,
        duration_ms: u64,
        url: impl Into<String>,
    ) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
            url: Some(url.into()),
        }
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if the browser pool rejected the request
    pub fn is_pool_closed(&self) -> bool {
        matches!(self, Error::PoolClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_error() {
        let err = Error::navigation_failed("https://example.com", "net::ERR_NAME_NOT_RESOLVED");

        assert!(!err.is_timeout());
        assert!(err.to_string().contains("ERR_NAME_NOT_RESOLVED"));
        assert!(err.to_string().contains("https://example.com"));
    }

    #[test]
    fn test_timeout_error() {
        let err = Error::timeout_with_url("read response body", 2000, "https://example.com");

        assert!(err.is_timeout());
        assert!(err.to_string().contains("2000"));
    }

    #[test]
    fn test_pool_closed() {
        assert!(Error::PoolClosed.is_pool_closed());
        assert!(!Error::config("bad").is_pool_closed());
    }
}
