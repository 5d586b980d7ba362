//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::retriever::RetrieverError;
use crate::service::{AnalysisError, ArticleError, LlmError, MalformedResponse};

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error type/code
    pub code: String,
    /// Unique request ID for tracing
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Bounded prefix of an unusable model response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_response: Option<String>,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Bad request / validation error (400)
    #[error("{0}")]
    BadRequest(String),

    /// Analyzed text over the configured limit (413)
    #[error("Text exceeds maximum length of {max} characters")]
    TextTooLong { max: usize, actual: usize },

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Server misconfiguration (500)
    #[error("Server configuration error: {0}")]
    Configuration(String),

    /// Model provider rejected our credentials (401)
    #[error("Authentication with the model provider failed")]
    UpstreamAuth(String),

    /// Model provider rate limit (429)
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited(String),

    /// Model output unusable (422)
    #[error("The AI response was not in the expected format. Please try again.")]
    MalformedResponse(MalformedResponse),

    /// Fetched page had no readable text (422)
    #[error("Could not extract readable content from the URL")]
    NoReadableContent(Option<String>),

    /// Page fetch failed (500)
    #[error("Failed to fetch URL: {0}")]
    FetchFailed(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::TextTooLong { .. } => "text_too_long",
            ApiError::NotFound(_) => "not_found",
            ApiError::Configuration(_) => "configuration_error",
            ApiError::UpstreamAuth(_) => "upstream_auth_error",
            ApiError::RateLimited(_) => "rate_limited",
            ApiError::MalformedResponse(_) => "malformed_response",
            ApiError::NoReadableContent(_) => "no_readable_content",
            ApiError::FetchFailed(_) => "fetch_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::TextTooLong { max, actual } => {
                Some(format!("Received {} characters, limit is {}", actual, max))
            }
            ApiError::UpstreamAuth(detail) | ApiError::RateLimited(detail) => Some(detail.clone()),
            ApiError::MalformedResponse(malformed) => Some(malformed.diagnostic.clone()),
            ApiError::NoReadableContent(detail) => detail.clone(),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TextTooLong { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamAuth(_) => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MalformedResponse(_) | ApiError::NoReadableContent(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Configuration(_) | ApiError::FetchFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let code = self.code();
        let request_id = Uuid::new_v4().to_string();
        let details = self.details();

        if status.is_server_error() {
            tracing::error!(
                error_type = code,
                status = status.as_u16(),
                request_id = %request_id,
                message = %self,
                details = ?details,
                "API error"
            );
        } else {
            tracing::warn!(
                error_type = code,
                status = status.as_u16(),
                request_id = %request_id,
                message = %self,
                details = ?details,
                "API error"
            );
        }

        let received_response = match self {
            ApiError::MalformedResponse(malformed) => Some(malformed.received.clone()),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            request_id,
            details,
            received_response,
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited(msg) => ApiError::RateLimited(msg),
            LlmError::Unauthorized(msg) => ApiError::UpstreamAuth(msg),
            LlmError::ClientInit(msg) => ApiError::Configuration(msg),
            other => ApiError::Internal(format!("Analysis failed: {}", other)),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AnalysisError::InputTooLong { max, actual } => ApiError::TextTooLong { max, actual },
            AnalysisError::NotConfigured => ApiError::Configuration(err.to_string()),
            AnalysisError::Upstream(e) => e.into(),
            AnalysisError::Malformed(e) => ApiError::MalformedResponse(e),
        }
    }
}

impl From<ArticleError> for ApiError {
    fn from(err: ArticleError) -> Self {
        match err {
            ArticleError::InvalidUrl(detail) => {
                ApiError::BadRequest(format!("A valid URL is required: {}", detail))
            }
            ArticleError::NoReadableContent => ApiError::NoReadableContent(None),
            ArticleError::Retrieval(e @ RetrieverError::Blocked(_)) => {
                ApiError::BadRequest(e.to_string())
            }
            ArticleError::Retrieval(e @ RetrieverError::UnsupportedContent(_)) => {
                ApiError::NoReadableContent(Some(e.to_string()))
            }
            ArticleError::Retrieval(e) => ApiError::FetchFailed(e.to_string()),
        }
    }
}
