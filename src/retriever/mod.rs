//! Page retrieval for article extraction

mod extract;
mod web;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

pub use extract::{collapse_whitespace, extract_article};
pub use web::WebPageRetriever;

#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    #[error("Could not connect to the site: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("The page could not be accessed (HTTP {0}); it may not exist or may block automated access")]
    ClientStatus(StatusCode),

    #[error("The site returned an error (HTTP {0})")]
    ServerStatus(StatusCode),

    #[error("URL blocked by configuration: {0}")]
    Blocked(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),
}

impl RetrieverError {
    /// Classify a non-success upstream status
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_client_error() {
            RetrieverError::ClientStatus(status)
        } else {
            RetrieverError::ServerStatus(status)
        }
    }
}

/// A fetched page body
#[derive(Debug, Clone)]
pub struct RetrievedPage {
    /// Final URL after redirects
    pub url: Url,
    pub content_type: String,
    pub body: String,
}

impl RetrievedPage {
    pub fn is_html(&self) -> bool {
        self.content_type.is_empty()
            || self.content_type.contains("text/html")
            || self.content_type.contains("application/xhtml")
    }

    pub fn is_plain_text(&self) -> bool {
        self.content_type.contains("text/plain")
    }
}

/// Trait for page retrievers
#[async_trait]
pub trait PageRetriever: Send + Sync {
    /// Check if this retriever is allowed to fetch the given URL
    fn can_handle(&self, url: &Url) -> bool;

    /// Retrieve the page at the URL
    async fn retrieve(&self, url: &Url) -> Result<RetrievedPage, RetrieverError>;
}
