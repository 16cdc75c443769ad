//! Error types for Tweetsmith
//!
//! Centralized error handling using thiserror. Hitting the attempt ceiling is
//! not an error; see `domain::LoopOutcome`.

use thiserror::Error;

/// All error types that can occur in Tweetsmith
#[derive(Debug, Error)]
pub enum TweetsmithError {
    /// A required stage input was missing or empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Fetching produced no usable content
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    /// The model call failed or returned something we could not use
    #[error("Model call failed: {0}")]
    ModelCall(String),

    /// Example store error
    #[error("Example store error: {0}")]
    Store(String),

    /// Fetcher setup error. Pipeline runs report fetch failures as ContentUnavailable
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Prompt template error
    #[error("Template error: {0}")]
    Template(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TweetsmithError {
    /// Shorthand used by stages that reject empty inputs.
    pub fn invalid_input(what: impl Into<String>) -> Self {
        TweetsmithError::InvalidInput(what.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, TweetsmithError::InvalidInput(_))
    }

    pub fn is_content_unavailable(&self) -> bool {
        matches!(self, TweetsmithError::ContentUnavailable(_))
    }

    pub fn is_model_call(&self) -> bool {
        matches!(self, TweetsmithError::ModelCall(_))
    }
}

/// Result type alias for Tweetsmith operations
pub type Result<T> = std::result::Result<T, TweetsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let err = TweetsmithError::InvalidInput("no feedback to revise with".to_string());
        assert_eq!(err.to_string(), "Invalid input: no feedback to revise with");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_content_unavailable_error() {
        let err = TweetsmithError::ContentUnavailable("https://github.com/a/b".to_string());
        assert_eq!(err.to_string(), "Content unavailable: https://github.com/a/b");
        assert!(err.is_content_unavailable());
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_model_call_error() {
        let err = TweetsmithError::ModelCall("API error 500".to_string());
        assert_eq!(err.to_string(), "Model call failed: API error 500");
        assert!(err.is_model_call());
    }

    #[test]
    fn test_store_error() {
        let err = TweetsmithError::Store("dataset missing".to_string());
        assert_eq!(err.to_string(), "Example store error: dataset missing");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TweetsmithError = io_err.into();
        assert!(matches!(err, TweetsmithError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: TweetsmithError = json_err.into();
        assert!(matches!(err, TweetsmithError::Json(_)));
    }

    #[test]
    fn test_invalid_input_helper() {
        let err = TweetsmithError::invalid_input("empty facts");
        assert!(matches!(err, TweetsmithError::InvalidInput(ref s) if s == "empty facts"));
    }
}
