//! Fallacy analysis service
//!
//! Validates the submitted text, asks the model to classify it against the
//! fallacy taxonomy and reconciles the answer back onto the taxonomy.

use std::sync::Arc;
use std::time::Instant;

use crate::model::{AnalysisConfig, AnalysisDebug, FallacyAnalysis};
use crate::service::error::{AnalysisError, require_text};
use crate::service::llm::CompletionBackend;
use crate::taxonomy::FallacyTaxonomy;

mod prompts;
mod reconcile;

pub use prompts::{FALLACY_SYSTEM_PROMPT, build_fallacy_prompt};
pub use reconcile::reconcile_fallacy_response;

/// Service for detecting logical fallacies in text
pub struct FallacyService {
    taxonomy: Arc<FallacyTaxonomy>,
    backend: Option<Arc<dyn CompletionBackend>>,
    config: AnalysisConfig,
}

impl FallacyService {
    pub fn new(
        taxonomy: Arc<FallacyTaxonomy>,
        backend: Option<Arc<dyn CompletionBackend>>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            taxonomy,
            backend,
            config,
        }
    }

    /// Analyze `text` for fallacies. Input is validated before any model call.
    pub async fn analyze(
        &self,
        text: Option<&str>,
        context: Option<&str>,
    ) -> Result<FallacyAnalysis, AnalysisError> {
        let text = require_text(text, "text")?;

        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(AnalysisError::InputTooLong {
                max: self.config.max_text_length,
                actual: length,
            });
        }

        let backend = self.backend.as_ref().ok_or(AnalysisError::NotConfigured)?;

        let prompt = build_fallacy_prompt(&self.taxonomy, text, context);

        tracing::info!(
            model = %backend.model(),
            text_length = length,
            prompt_length = prompt.len(),
            "Requesting fallacy analysis"
        );

        let start = Instant::now();
        let raw = backend.complete(FALLACY_SYSTEM_PROMPT, &prompt).await?;

        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            response_length = raw.len(),
            "Fallacy analysis response received"
        );

        let fallacies = reconcile_fallacy_response(&self.taxonomy, &raw)?;

        tracing::info!(
            fallacies = fallacies.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fallacy analysis complete"
        );

        let debug = self
            .config
            .include_debug
            .then(|| AnalysisDebug { raw_response: raw });

        Ok(FallacyAnalysis { fallacies, debug })
    }
}
