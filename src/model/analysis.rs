//! Reconciled analysis results returned to API callers

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::taxonomy::{Complexity, Persistence, Prevalence};

/// A fallacy found in the analyzed text: the static taxonomy entry merged with
/// the model's per-instance commentary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedFallacy {
    pub name: String,
    pub description: String,
    pub logical_form: String,
    pub example: String,
    pub category: String,
    pub alt_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Why this text commits the fallacy
    pub explanation: String,
    /// Verbatim span of the analyzed text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDebug {
    pub raw_response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FallacyAnalysis {
    pub fallacies: Vec<AnalyzedFallacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<AnalysisDebug>,
}

/// A misconception found in a student answer, classified into a framework category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Misconception {
    pub description: String,
    pub category: String,
    pub category_description: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub prevalence: Prevalence,
    pub persistence: Persistence,
    pub complexity: Complexity,
    pub examples_from_framework: Vec<String>,
    pub cognitive_origins: Vec<String>,
    /// Framework examples the model related to this misconception
    pub related_framework_examples: Vec<String>,
}

/// A treatment strategy recommended for the identified misconceptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeachingSuggestion {
    pub strategy: String,
    pub description: String,
    pub rationale: String,
    pub implementation: String,
    pub categories_targeted: Vec<String>,
    pub duration: String,
    pub success_rate: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum InterventionPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl InterventionPriority {
    pub const ALL: [InterventionPriority; 4] = [
        InterventionPriority::Critical,
        InterventionPriority::High,
        InterventionPriority::Medium,
        InterventionPriority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionPriority::Critical => "Critical",
            InterventionPriority::High => "High",
            InterventionPriority::Medium => "Medium",
            InterventionPriority::Low => "Low",
        }
    }

    /// Case-insensitive parse of a model-provided priority label
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkAnalysis {
    pub primary_category: String,
    pub intervention_priority: InterventionPriority,
    pub recommended_approach: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MisconceptionAnalysis {
    pub misconceptions: Vec<Misconception>,
    pub correct_concepts: Vec<String>,
    pub teaching_suggestions: Vec<TeachingSuggestion>,
    pub overall_confidence: f64,
    pub framework_analysis: FrameworkAnalysis,
}
