//! REST API endpoint for article extraction

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::Article;
use crate::service::ArticleService;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrapeRequest {
    /// Absolute http(s) URL of the page
    #[serde(default)]
    pub url: Option<String>,
}

/// Fetch a web page and extract its readable article text
#[utoipa::path(
    post,
    path = "/api/scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Extracted article", body = Article),
        (status = 400, description = "Invalid or blocked URL", body = ErrorResponse),
        (status = 422, description = "No readable content", body = ErrorResponse),
        (status = 500, description = "Page could not be fetched", body = ErrorResponse)
    ),
    tag = "articles"
)]
#[post("/api/scrape")]
pub async fn scrape_article(
    service: web::Data<ArticleService>,
    body: web::Json<ScrapeRequest>,
) -> Result<HttpResponse, ApiError> {
    let article = service.scrape(body.url.as_deref()).await?;
    Ok(HttpResponse::Ok().json(article))
}

/// Configure article routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(scrape_article);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use url::Url;

    use super::*;
    use crate::retriever::{PageRetriever, RetrievedPage, RetrieverError};

    struct FixedPage(Result<&'static str, reqwest::StatusCode>);

    #[async_trait]
    impl PageRetriever for FixedPage {
        fn can_handle(&self, _url: &Url) -> bool {
            true
        }

        async fn retrieve(&self, url: &Url) -> Result<RetrievedPage, RetrieverError> {
            match self.0 {
                Ok(body) => Ok(RetrievedPage {
                    url: url.clone(),
                    content_type: "text/html".to_string(),
                    body: body.to_string(),
                }),
                Err(status) => Err(RetrieverError::from_status(status)),
            }
        }
    }

    async fn call(page: FixedPage, body: Value) -> (StatusCode, Value) {
        let service = web::Data::new(ArticleService::new(Arc::new(page)));
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(crate::api::json_config())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/scrape")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn test_scrape_success() {
        let page = FixedPage(Ok(
            "<html><head><title>Op-ed</title></head><body><main><p>Everyone agrees.</p></main></body></html>",
        ));

        let (status, body) = call(page, json!({"url": "https://example.com/op-ed"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Everyone agrees.");
        assert_eq!(body["title"], "Op-ed");
        assert_eq!(body["url"], "https://example.com/op-ed");
    }

    #[actix_web::test]
    async fn test_scrape_invalid_url() {
        let (status, body) = call(FixedPage(Ok("")), json!({"url": "not-a-url"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
    }

    #[actix_web::test]
    async fn test_scrape_no_content() {
        let (status, body) = call(
            FixedPage(Ok("<html><body><footer>Footer</footer></body></html>")),
            json!({"url": "https://example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "no_readable_content");
    }

    #[actix_web::test]
    async fn test_scrape_upstream_failure_messages_differ() {
        let (status, not_found) = call(
            FixedPage(Err(reqwest::StatusCode::NOT_FOUND)),
            json!({"url": "https://example.com"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(not_found["code"], "fetch_failed");

        let (_, bad_gateway) = call(
            FixedPage(Err(reqwest::StatusCode::BAD_GATEWAY)),
            json!({"url": "https://example.com"}),
        )
        .await;

        assert_ne!(not_found["error"], bad_gateway["error"]);
    }
}
