//! REST API endpoints for the reference taxonomies

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::taxonomy::{Fallacy, MisconceptionCategory, TreatmentStrategy};
use crate::taxonomy::{FallacyTaxonomy, MisconceptionFramework};

/// Query parameters for listing fallacies
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListFallaciesParams {
    /// Case-insensitive substring over name, aliases, description and category
    pub search: Option<String>,
    /// Exact category filter (case-insensitive)
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FallacyListResponse {
    /// Number of fallacies returned
    pub total: usize,
    /// Every category in the taxonomy
    pub categories: Vec<String>,
    pub fallacies: Vec<Fallacy>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkResponse {
    pub misconception_categories: Vec<MisconceptionCategory>,
    pub treatment_strategies: Vec<TreatmentStrategy>,
}

/// List fallacies in the reference taxonomy
#[utoipa::path(
    get,
    path = "/api/fallacies",
    params(ListFallaciesParams),
    responses(
        (status = 200, description = "Fallacies matching the filters", body = FallacyListResponse)
    ),
    tag = "taxonomy"
)]
#[get("/api/fallacies")]
pub async fn list_fallacies(
    taxonomy: web::Data<FallacyTaxonomy>,
    query: web::Query<ListFallaciesParams>,
) -> HttpResponse {
    let search = query.search.as_deref().unwrap_or_default();
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let fallacies: Vec<Fallacy> = taxonomy
        .search(search)
        .into_iter()
        .filter(|f| category.is_none_or(|c| f.category.eq_ignore_ascii_case(c)))
        .cloned()
        .collect();

    HttpResponse::Ok().json(FallacyListResponse {
        total: fallacies.len(),
        categories: taxonomy.categories().into_iter().map(str::to_string).collect(),
        fallacies,
    })
}

/// Get a single fallacy by name or alias
#[utoipa::path(
    get,
    path = "/api/fallacies/{name}",
    params(
        ("name" = String, Path, description = "Fallacy name or alias, case-insensitive")
    ),
    responses(
        (status = 200, description = "Fallacy found", body = Fallacy),
        (status = 404, description = "Unknown fallacy", body = ErrorResponse)
    ),
    tag = "taxonomy"
)]
#[get("/api/fallacies/{name}")]
pub async fn get_fallacy(
    taxonomy: web::Data<FallacyTaxonomy>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();

    match taxonomy.resolve(&name) {
        Some(fallacy) => Ok(HttpResponse::Ok().json(fallacy)),
        None => Err(ApiError::NotFound(format!("Unknown fallacy: {}", name))),
    }
}

/// The misconception categories and treatment strategies
#[utoipa::path(
    get,
    path = "/api/framework",
    responses(
        (status = 200, description = "Misconception framework", body = FrameworkResponse)
    ),
    tag = "taxonomy"
)]
#[get("/api/framework")]
pub async fn get_framework(framework: web::Data<MisconceptionFramework>) -> HttpResponse {
    HttpResponse::Ok().json(FrameworkResponse {
        misconception_categories: framework.categories.entries().to_vec(),
        treatment_strategies: framework.strategies.entries().to_vec(),
    })
}

/// Configure taxonomy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_fallacies)
        .service(get_fallacy)
        .service(get_framework);
}
