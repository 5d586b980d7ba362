//! REST API endpoints for fallacy and misconception analysis

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{FallacyAnalysis, MisconceptionAnalysis};
use crate::service::{FallacyService, MisconceptionService};

/// Request body for fallacy analysis
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FallacyAnalysisRequest {
    /// Text to analyze (required)
    #[serde(default)]
    pub text: Option<String>,
    /// Optional background for the text
    #[serde(default)]
    pub context: Option<String>,
}

/// Request body for misconception analysis
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MisconceptionAnalysisRequest {
    /// Educational context of the question (required)
    #[serde(default)]
    pub context: Option<String>,
    /// The student's answer (required)
    #[serde(default)]
    pub student_answer: Option<String>,
}

/// Detect logical fallacies in a text
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = FallacyAnalysisRequest,
    responses(
        (status = 200, description = "Fallacies found in the text", body = FallacyAnalysis),
        (status = 400, description = "Missing or empty text", body = ErrorResponse),
        (status = 413, description = "Text too long", body = ErrorResponse),
        (status = 422, description = "Model response could not be used", body = ErrorResponse),
        (status = 429, description = "Model provider rate limit", body = ErrorResponse),
        (status = 500, description = "Configuration or upstream failure", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/api/analyze")]
pub async fn analyze_fallacies(
    service: web::Data<FallacyService>,
    body: web::Json<FallacyAnalysisRequest>,
) -> Result<HttpResponse, ApiError> {
    let analysis = service
        .analyze(body.text.as_deref(), body.context.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(analysis))
}

/// Classify misconceptions in a student answer
#[utoipa::path(
    post,
    path = "/api/misconceptions",
    request_body = MisconceptionAnalysisRequest,
    responses(
        (status = 200, description = "Misconception analysis", body = MisconceptionAnalysis),
        (status = 400, description = "Missing context or student answer", body = ErrorResponse),
        (status = 401, description = "Model provider rejected credentials", body = ErrorResponse),
        (status = 413, description = "Answer too long", body = ErrorResponse),
        (status = 422, description = "Model response could not be used", body = ErrorResponse),
        (status = 429, description = "Model provider rate limit", body = ErrorResponse),
        (status = 500, description = "Configuration or upstream failure", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/api/misconceptions")]
pub async fn analyze_misconceptions(
    service: web::Data<MisconceptionService>,
    body: web::Json<MisconceptionAnalysisRequest>,
) -> Result<HttpResponse, ApiError> {
    let analysis = service
        .analyze(body.context.as_deref(), body.student_answer.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(analysis))
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze_fallacies)
        .service(analyze_misconceptions);
}
