//! HTTP API: route modules, OpenAPI document and request-body handling

pub mod analysis;
pub mod article;
pub mod error;
pub mod health;
pub mod openapi;
pub mod taxonomy;

use actix_web::web;
use utoipa::OpenApi;

pub use error::ApiError;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reasoning Lens API",
        description = "Fallacy and misconception analysis against closed reference taxonomies"
    ),
    paths(
        analysis::analyze_fallacies,
        analysis::analyze_misconceptions,
        article::scrape_article,
        taxonomy::list_fallacies,
        taxonomy::get_fallacy,
        taxonomy::get_framework,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        analysis::FallacyAnalysisRequest,
        analysis::MisconceptionAnalysisRequest,
        article::ScrapeRequest,
        taxonomy::FallacyListResponse,
        taxonomy::FrameworkResponse,
        error::ErrorResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
        crate::model::FallacyAnalysis,
        crate::model::AnalyzedFallacy,
        crate::model::AnalysisDebug,
        crate::model::MisconceptionAnalysis,
        crate::model::Misconception,
        crate::model::TeachingSuggestion,
        crate::model::FrameworkAnalysis,
        crate::model::InterventionPriority,
        crate::model::Article,
        crate::model::taxonomy::Fallacy,
        crate::model::taxonomy::MisconceptionCategory,
        crate::model::taxonomy::TreatmentStrategy,
        crate::model::taxonomy::Prevalence,
        crate::model::taxonomy::Persistence,
        crate::model::taxonomy::Complexity,
    )),
    tags(
        (name = "analysis", description = "LLM-backed text analysis"),
        (name = "articles", description = "Article extraction from web pages"),
        (name = "taxonomy", description = "Reference taxonomies"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// JSON body configuration: malformed bodies become standard 400 errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(analysis::configure)
        .configure(article::configure)
        .configure(taxonomy::configure)
        .configure(health::configure)
        .configure(openapi::configure);
}
