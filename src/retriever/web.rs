//! Web page retriever

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::{Action, Attempt, Policy};
use url::Url;

use super::{PageRetriever, RetrievedPage, RetrieverError};
use crate::model::RetrieverConfig;

/// Browser-like user agent; many sites reject unknown agents
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const MAX_REDIRECTS: usize = 10;

/// Retriever for arbitrary web pages, filtered by the configured allow/deny lists
pub struct WebPageRetriever {
    client: Client,
    config: RetrieverConfig,
}

impl WebPageRetriever {
    pub fn new(config: RetrieverConfig) -> Result<Self, RetrieverError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect_policy(config.clone()))
            .build()?;

        if !config.allow.is_empty() {
            tracing::info!(allow = ?config.allow, "Retriever whitelist configured");
        }
        if !config.deny.is_empty() {
            tracing::info!(deny = ?config.deny, "Retriever blacklist configured");
        }

        Ok(Self { client, config })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("redirect to blocked URL {0}")]
struct BlockedRedirect(Url);

/// Follow redirects only to hosts the allow/deny lists accept
fn redirect_policy(config: RetrieverConfig) -> Policy {
    Policy::custom(move |attempt: Attempt| -> Action {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if !config.is_url_allowed(attempt.url()) {
            let target = attempt.url().clone();
            attempt.error(BlockedRedirect(target))
        } else {
            attempt.follow()
        }
    })
}

/// Blocked redirect target carried in the error's source chain, if any
fn blocked_redirect(error: &reqwest::Error) -> Option<&Url> {
    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        if let Some(BlockedRedirect(target)) = err.downcast_ref::<BlockedRedirect>() {
            return Some(target);
        }
        source = err.source();
    }
    None
}

#[async_trait]
impl PageRetriever for WebPageRetriever {
    fn can_handle(&self, url: &Url) -> bool {
        self.config.is_url_allowed(url)
    }

    async fn retrieve(&self, url: &Url) -> Result<RetrievedPage, RetrieverError> {
        if !self.can_handle(url) {
            tracing::debug!(url = %url, "URL blocked by configuration");
            return Err(RetrieverError::Blocked(url.to_string()));
        }

        tracing::debug!(url = %url, "Fetching web page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| match blocked_redirect(&e) {
                Some(target) => {
                    tracing::warn!(url = %url, target = %target, "Redirect to blocked URL");
                    RetrieverError::Blocked(target.to_string())
                }
                None => RetrieverError::HttpError(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Web page request failed");
            return Err(RetrieverError::from_status(status));
        }

        let final_url = response.url().clone();
        if !self.can_handle(&final_url) {
            return Err(RetrieverError::Blocked(final_url.to_string()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        let body = response.text().await?;

        Ok(RetrievedPage {
            url: final_url,
            content_type,
            body,
        })
    }
}
