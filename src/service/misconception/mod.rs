//! Misconception analysis service
//!
//! Classifies the misconceptions in a student answer against the science
//! misconception framework and recommends treatment strategies from it.

use std::sync::Arc;
use std::time::Instant;

use crate::model::{AnalysisConfig, MisconceptionAnalysis};
use crate::service::error::{AnalysisError, require_text};
use crate::service::llm::CompletionBackend;
use crate::taxonomy::MisconceptionFramework;

mod prompts;
mod reconcile;

pub use prompts::{MISCONCEPTION_SYSTEM_PROMPT, build_misconception_prompt};
pub use reconcile::reconcile_misconception_response;

/// Service for analyzing student answers against the misconception framework
pub struct MisconceptionService {
    framework: Arc<MisconceptionFramework>,
    backend: Option<Arc<dyn CompletionBackend>>,
    config: AnalysisConfig,
}

impl MisconceptionService {
    pub fn new(
        framework: Arc<MisconceptionFramework>,
        backend: Option<Arc<dyn CompletionBackend>>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            framework,
            backend,
            config,
        }
    }

    /// Analyze a student answer given its educational context
    pub async fn analyze(
        &self,
        context: Option<&str>,
        student_answer: Option<&str>,
    ) -> Result<MisconceptionAnalysis, AnalysisError> {
        let context = require_text(context, "context")?;
        let student_answer = require_text(student_answer, "studentAnswer")?;

        let length = student_answer.chars().count();
        if length > self.config.max_text_length {
            return Err(AnalysisError::InputTooLong {
                max: self.config.max_text_length,
                actual: length,
            });
        }

        let backend = self.backend.as_ref().ok_or(AnalysisError::NotConfigured)?;

        let prompt = build_misconception_prompt(&self.framework, context, student_answer);

        tracing::info!(
            model = %backend.model(),
            answer_length = length,
            prompt_length = prompt.len(),
            "Requesting misconception analysis"
        );

        let start = Instant::now();
        let raw = backend.complete(MISCONCEPTION_SYSTEM_PROMPT, &prompt).await?;
        let analysis = reconcile_misconception_response(&self.framework, &raw)?;

        tracing::info!(
            misconceptions = analysis.misconceptions.len(),
            teaching_suggestions = analysis.teaching_suggestions.len(),
            primary_category = %analysis.framework_analysis.primary_category,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Misconception analysis complete"
        );

        Ok(analysis)
    }
}
