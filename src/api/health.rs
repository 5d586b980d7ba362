//! Health check endpoints for Kubernetes liveness and readiness probes

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::taxonomy::{FallacyTaxonomy, MisconceptionFramework};

/// Whether analysis requests can reach a model
#[derive(Debug, Clone)]
pub struct ModelStatus {
    pub configured: bool,
    pub model: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyHealth {
    pub fallacies: usize,
    pub misconception_categories: usize,
    pub treatment_strategies: usize,
    /// "configured" or "missing"
    pub model_credential: String,
    pub model: String,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// Taxonomies are loaded before the server starts, so the service always
/// accepts traffic. Without a model credential it reports `degraded`: the
/// reference and scraping endpoints work, the analysis endpoints answer 500.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(
    fallacies: web::Data<FallacyTaxonomy>,
    framework: web::Data<MisconceptionFramework>,
    model: web::Data<ModelStatus>,
) -> impl Responder {
    let status = if model.configured { "ready" } else { "degraded" };

    HttpResponse::Ok().json(ReadinessStatus {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            fallacies: fallacies.len(),
            misconception_categories: framework.categories.len(),
            treatment_strategies: framework.strategies.len(),
            model_credential: if model.configured { "configured" } else { "missing" }.to_string(),
            model: model.model.clone(),
        },
    })
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}
