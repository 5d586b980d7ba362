//! Error types shared by the analysis services

use thiserror::Error;

use crate::service::llm::LlmError;
use crate::service::response::MalformedResponse;

/// Error type for fallacy and misconception analysis
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Text exceeds maximum length of {max} characters (got {actual})")]
    InputTooLong { max: usize, actual: usize },

    #[error("Model credential is not configured (set OPENAI_API_KEY)")]
    NotConfigured,

    #[error(transparent)]
    Upstream(#[from] LlmError),

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
}

/// Trimmed value of a required text field, or a validation error naming it
pub fn require_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AnalysisError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(AnalysisError::InvalidInput(format!("{} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some("  hello "), "text").unwrap(), "hello");

        let err = require_text(Some("   "), "text").unwrap_err();
        assert_eq!(err.to_string(), "text is required");

        assert!(matches!(
            require_text(None, "studentAnswer"),
            Err(AnalysisError::InvalidInput(msg)) if msg == "studentAnswer is required"
        ));
    }

    #[test]
    fn test_too_long_message() {
        let err = AnalysisError::InputTooLong { max: 5000, actual: 5001 };
        assert_eq!(
            err.to_string(),
            "Text exceeds maximum length of 5000 characters (got 5001)"
        );
    }
}
