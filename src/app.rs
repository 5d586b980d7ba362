//! Application state and service initialization
//!
//! This module centralizes service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use actix_web::web;

use crate::api::health::ModelStatus;
use crate::model::Config;
use crate::retriever::{RetrieverError, WebPageRetriever};
use crate::service::{
    ArticleService, CompletionBackend, FallacyService, LlmClient, LlmError, MisconceptionService,
};
use crate::taxonomy::{self, FallacyTaxonomy, MisconceptionFramework, TaxonomyError};

/// Application state containing all services and shared resources
///
/// Everything here is built once at startup and shared read-only between
/// Actix-web workers.
pub struct AppState {
    pub fallacies: Arc<FallacyTaxonomy>,
    pub framework: Arc<MisconceptionFramework>,
    pub fallacy_service: Arc<FallacyService>,
    pub misconception_service: Arc<MisconceptionService>,
    pub article_service: Arc<ArticleService>,
    pub model_status: ModelStatus,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Taxonomy loading and index construction
    /// 2. LLM client initialization (optional, requires OPENAI_API_KEY)
    /// 3. Service dependency graph construction
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let fallacies = Arc::new(taxonomy::load_fallacies(&config.taxonomy)?);
        let framework = Arc::new(taxonomy::load_framework(&config.taxonomy)?);

        let backend = Self::build_backend(config)?;
        let model_status = ModelStatus {
            configured: backend.is_some(),
            model: config.llm.model.clone(),
        };

        let fallacy_service = Arc::new(FallacyService::new(
            Arc::clone(&fallacies),
            backend.clone(),
            config.analysis.clone(),
        ));

        let misconception_service = Arc::new(MisconceptionService::new(
            Arc::clone(&framework),
            backend,
            config.analysis.clone(),
        ));

        let retriever = WebPageRetriever::new(config.retrievers.clone())?;
        let article_service = Arc::new(ArticleService::new(Arc::new(retriever)));

        Ok(Self {
            fallacies,
            framework,
            fallacy_service,
            misconception_service,
            article_service,
            model_status,
        })
    }

    /// Shared LLM client, or `None` when no credential is configured
    fn build_backend(config: &Config) -> Result<Option<Arc<dyn CompletionBackend>>, AppError> {
        let Some(api_key) = config.api_key.as_deref() else {
            tracing::warn!("OPENAI_API_KEY is not set; analysis endpoints will answer 500");
            return Ok(None);
        };

        let client = LlmClient::new(api_key, config.llm.clone())?;
        tracing::info!(
            model = %config.llm.model,
            temperature = config.llm.temperature,
            max_tokens = config.llm.max_tokens,
            "LLM client initialized"
        );

        Ok(Some(Arc::new(client)))
    }

    /// Register the shared state as Actix-web app data
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(Arc::clone(&self.fallacies)))
            .app_data(web::Data::from(Arc::clone(&self.framework)))
            .app_data(web::Data::from(Arc::clone(&self.fallacy_service)))
            .app_data(web::Data::from(Arc::clone(&self.misconception_service)))
            .app_data(web::Data::from(Arc::clone(&self.article_service)))
            .app_data(web::Data::new(self.model_status.clone()));
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Reference dataset could not be loaded
    #[error("Taxonomy initialization failed: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// Model client could not be created
    #[error("Invalid model configuration: {0}")]
    Llm(#[from] LlmError),

    /// HTTP client for page retrieval could not be created
    #[error("Retriever initialization failed: {0}")]
    Retriever(#[from] RetrieverError),
}
