//! Article service: fetch a page and extract its readable text

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use url::Url;

use crate::model::Article;
use crate::retriever::{
    PageRetriever, RetrieverError, collapse_whitespace, extract_article,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArticleError {
    #[error("A valid URL is required")]
    InvalidUrl(String),

    #[error("Could not extract readable content from the URL")]
    NoReadableContent,

    #[error(transparent)]
    Retrieval(#[from] RetrieverError),
}

pub struct ArticleService {
    retriever: Arc<dyn PageRetriever>,
}

impl ArticleService {
    pub fn new(retriever: Arc<dyn PageRetriever>) -> Self {
        Self { retriever }
    }

    /// Fetch `url` and extract the article text and metadata
    pub async fn scrape(&self, url: Option<&str>) -> Result<Article, ArticleError> {
        let url = parse_url(url)?;

        let start = Instant::now();
        let page = self.retriever.retrieve(&url).await?;

        let article = if page.is_html() {
            let extracted = extract_article(&page.body);
            Article {
                url: page.url.to_string(),
                text: extracted.text,
                title: extracted.title,
                description: extracted.description,
                published: extracted.published,
            }
        } else if page.is_plain_text() {
            Article {
                url: page.url.to_string(),
                text: collapse_whitespace(&page.body),
                title: None,
                description: None,
                published: None,
            }
        } else {
            return Err(RetrieverError::UnsupportedContent(page.content_type).into());
        };

        if article.text.is_empty() {
            tracing::warn!(url = %url, "No readable content found");
            return Err(ArticleError::NoReadableContent);
        }

        tracing::info!(
            url = %url,
            length = article.text.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Article extracted"
        );

        Ok(article)
    }
}

/// An absolute http(s) URL
fn parse_url(url: Option<&str>) -> Result<Url, ArticleError> {
    let raw = url.map(str::trim).filter(|u| !u.is_empty()).ok_or_else(|| {
        ArticleError::InvalidUrl("url is required".to_string())
    })?;

    let parsed = Url::parse(raw).map_err(|e| ArticleError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        scheme => Err(ArticleError::InvalidUrl(format!(
            "unsupported URL scheme '{}'",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::RetrievedPage;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    struct StaticPage {
        content_type: &'static str,
        body: &'static str,
        status: Option<StatusCode>,
    }

    #[async_trait]
    impl PageRetriever for StaticPage {
        fn can_handle(&self, _url: &Url) -> bool {
            true
        }

        async fn retrieve(&self, url: &Url) -> Result<RetrievedPage, RetrieverError> {
            if let Some(status) = self.status {
                return Err(RetrieverError::from_status(status));
            }
            Ok(RetrievedPage {
                url: url.clone(),
                content_type: self.content_type.to_string(),
                body: self.body.to_string(),
            })
        }
    }

    fn service(content_type: &'static str, body: &'static str) -> ArticleService {
        ArticleService::new(Arc::new(StaticPage {
            content_type,
            body,
            status: None,
        }))
    }

    #[tokio::test]
    async fn test_scrape_html() {
        let service = service(
            "text/html; charset=utf-8",
            "<html><head><title>T</title></head><body><article>Hello   world</article></body></html>",
        );

        let article = service.scrape(Some("https://example.com/a")).await.unwrap();

        assert_eq!(article.text, "Hello world");
        assert_eq!(article.title.as_deref(), Some("T"));
        assert_eq!(article.url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_scrape_plain_text() {
        let service = service("text/plain", "  line one\n\nline two ");
        let article = service.scrape(Some("https://example.com/a.txt")).await.unwrap();
        assert_eq!(article.text, "line one line two");
    }

    #[tokio::test]
    async fn test_invalid_urls() {
        let service = service("text/html", "<p>x</p>");

        for url in [None, Some(""), Some("not a url"), Some("ftp://example.com/file"), Some("/relative")] {
            assert!(
                matches!(service.scrape(url).await, Err(ArticleError::InvalidUrl(_))),
                "{url:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_no_readable_content() {
        let service = service("text/html", "<html><body><nav>Menu</nav></body></html>");
        assert!(matches!(
            service.scrape(Some("https://example.com")).await,
            Err(ArticleError::NoReadableContent)
        ));
    }

    #[tokio::test]
    async fn test_unsupported_content_type() {
        let service = service("application/pdf", "%PDF");
        assert!(matches!(
            service.scrape(Some("https://example.com/a.pdf")).await,
            Err(ArticleError::Retrieval(RetrieverError::UnsupportedContent(_)))
        ));
    }

    #[tokio::test]
    async fn test_upstream_status_propagates() {
        let service = ArticleService::new(Arc::new(StaticPage {
            content_type: "text/html",
            body: "",
            status: Some(StatusCode::FORBIDDEN),
        }));

        assert!(matches!(
            service.scrape(Some("https://example.com")).await,
            Err(ArticleError::Retrieval(RetrieverError::ClientStatus(StatusCode::FORBIDDEN)))
        ));
    }
}
