//! Error types for newsdesk.

use thiserror::Error;

/// Common error type for newsdesk.
#[derive(Error, Debug)]
pub enum NewsError {
    /// Network retrieval of a feed failed.
    ///
    /// Covers connection failures, non-success HTTP status, body read
    /// failures and oversized bodies. Local to one source.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Feed body is not well-formed feed markup. Local to one source.
    #[error("parse error: {0}")]
    Parse(String),

    /// Snapshot could not be read, decoded or written.
    #[error("store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// The background crawler task is not running.
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

impl NewsError {
    /// Whether this error only affects a single source within a crawl cycle.
    pub fn is_source_local(&self) -> bool {
        matches!(self, NewsError::Fetch(_) | NewsError::Parse(_))
    }
}

/// Result type alias for newsdesk operations.
pub type Result<T> = std::result::Result<T, NewsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = NewsError::Fetch("HTTP error: 503 Service Unavailable".to_string());
        assert_eq!(
            err.to_string(),
            "fetch error: HTTP error: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = NewsError::Parse("unexpected end of input".to_string());
        assert_eq!(err.to_string(), "parse error: unexpected end of input");
    }

    #[test]
    fn test_store_error_display() {
        let err = NewsError::Store("ai_news.json: expected value".to_string());
        assert_eq!(err.to_string(), "store error: ai_news.json: expected value");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NewsError = io_err.into();
        assert!(matches!(err, NewsError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_source_local_classification() {
        assert!(NewsError::Fetch("x".into()).is_source_local());
        assert!(NewsError::Parse("x".into()).is_source_local());
        assert!(!NewsError::Store("x".into()).is_source_local());
        assert!(!NewsError::Config("x".into()).is_source_local());
    }
}
