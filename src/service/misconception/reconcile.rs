//! Reconciliation of model-reported misconceptions against the misconception framework

use serde_json::{Map, Value};

use crate::model::{
    FrameworkAnalysis, InterventionPriority, Misconception, MisconceptionAnalysis,
    TeachingSuggestion,
};
use crate::service::response::{
    JsonShape, MalformedResponse, json_kind, parse_model_json, str_field, string_list,
};
use crate::taxonomy::MisconceptionFramework;

pub const DEFAULT_OVERALL_CONFIDENCE: f64 = 0.8;
pub const UNKNOWN_PRIMARY_CATEGORY: &str = "Unknown";
pub const DEFAULT_RECOMMENDED_APPROACH: &str = "Multi-strategy approach";

/// Parse a raw model response into a [`MisconceptionAnalysis`], keeping only
/// records that reference the framework and defaulting the summary fields
pub fn reconcile_misconception_response(
    framework: &MisconceptionFramework,
    raw: &str,
) -> Result<MisconceptionAnalysis, MalformedResponse> {
    let value = parse_model_json(raw, JsonShape::Object)?;

    let Value::Object(root) = value else {
        return Err(MalformedResponse::new(
            format!("Expected a JSON object, found {}", json_kind(&value)),
            raw,
        ));
    };

    let misconception_records = required_array(&root, "misconceptions", raw)?;
    let suggestion_records = optional_array(&root, "teachingSuggestions", raw)?;
    optional_array(&root, "correctConcepts", raw)?;

    let misconceptions: Vec<Misconception> = misconception_records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| reconcile_misconception(framework, position, record))
        .collect();

    let teaching_suggestions: Vec<TeachingSuggestion> = suggestion_records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| reconcile_suggestion(framework, position, record))
        .collect();

    let dropped = (misconception_records.len() - misconceptions.len())
        + (suggestion_records.len() - teaching_suggestions.len());
    if dropped > 0 {
        tracing::warn!(
            misconceptions = misconceptions.len(),
            teaching_suggestions = teaching_suggestions.len(),
            dropped,
            "Dropped misconception records outside the framework"
        );
    }

    let root = Value::Object(root);
    Ok(MisconceptionAnalysis {
        misconceptions,
        correct_concepts: string_list(&root, "correctConcepts"),
        teaching_suggestions,
        overall_confidence: root
            .get("overallConfidence")
            .and_then(confidence_value)
            .unwrap_or(DEFAULT_OVERALL_CONFIDENCE),
        framework_analysis: framework_analysis(framework, root.get("frameworkAnalysis")),
    })
}

fn required_array<'a>(
    root: &'a Map<String, Value>,
    key: &str,
    raw: &str,
) -> Result<&'a [Value], MalformedResponse> {
    match root.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(MalformedResponse::new(
            format!("Field '{}' must be an array, found {}", key, json_kind(other)),
            raw,
        )),
        None => Err(MalformedResponse::new(
            format!("Missing required field '{}'", key),
            raw,
        )),
    }
}

fn optional_array<'a>(
    root: &'a Map<String, Value>,
    key: &str,
    raw: &str,
) -> Result<&'a [Value], MalformedResponse> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(_) => required_array(root, key, raw),
    }
}

/// A confidence score in `0.0..=1.0`
fn confidence_value(value: &Value) -> Option<f64> {
    value.as_f64().filter(|c| (0.0..=1.0).contains(c))
}

fn reconcile_misconception(
    framework: &MisconceptionFramework,
    position: usize,
    record: &Value,
) -> Option<Misconception> {
    let (Some(description), Some(category_name), Some(explanation)) = (
        str_field(record, "description"),
        str_field(record, "category"),
        str_field(record, "explanation"),
    ) else {
        tracing::warn!(position, "Misconception record missing required fields, dropping");
        return None;
    };

    let Some(category) = framework.categories.resolve(category_name) else {
        tracing::warn!(
            position,
            unmatched_name = %category_name,
            "Unknown misconception category, dropping"
        );
        return None;
    };

    let mut related = string_list(record, "related_framework_examples");
    if related.is_empty() {
        related = string_list(record, "relatedFrameworkExamples");
    }

    Some(Misconception {
        description: description.to_string(),
        category: category.category.clone(),
        category_description: category.description.clone(),
        explanation: explanation.to_string(),
        confidence: record.get("confidence").and_then(confidence_value),
        prevalence: category.prevalence,
        persistence: category.persistence,
        complexity: category.complexity,
        examples_from_framework: category.examples.clone(),
        cognitive_origins: category.cognitive_origins.clone(),
        related_framework_examples: related,
    })
}

fn reconcile_suggestion(
    framework: &MisconceptionFramework,
    position: usize,
    record: &Value,
) -> Option<TeachingSuggestion> {
    let (Some(strategy_name), Some(rationale), Some(implementation)) = (
        str_field(record, "strategy"),
        str_field(record, "rationale"),
        str_field(record, "implementation"),
    ) else {
        tracing::warn!(position, "Teaching suggestion missing required fields, dropping");
        return None;
    };

    let Some(strategy) = framework.strategies.resolve(strategy_name) else {
        tracing::warn!(
            position,
            unmatched_name = %strategy_name,
            "Unknown treatment strategy, dropping"
        );
        return None;
    };

    let mut targeted = string_list(record, "categories_targeted");
    if let Some(single) = str_field(record, "category_targeted") {
        targeted.push(single.to_string());
    }

    let mut categories_targeted: Vec<String> = Vec::new();
    for name in &targeted {
        match framework.categories.resolve(name) {
            Some(category) if !categories_targeted.contains(&category.category) => {
                categories_targeted.push(category.category.clone());
            }
            Some(_) => {}
            None => tracing::debug!(unmatched_name = %name, "Ignoring unknown targeted category"),
        }
    }
    if categories_targeted.is_empty() {
        categories_targeted = strategy.target_categories.clone();
    }

    Some(TeachingSuggestion {
        strategy: strategy.strategy.clone(),
        description: strategy.description.clone(),
        rationale: rationale.to_string(),
        implementation: implementation.to_string(),
        categories_targeted,
        duration: strategy.duration.clone(),
        success_rate: strategy.success_rate.clone(),
    })
}

/// Summary fields default independently when absent or outside the framework
fn framework_analysis(framework: &MisconceptionFramework, value: Option<&Value>) -> FrameworkAnalysis {
    let summary = value.filter(|v| v.is_object());
    let field = |key: &str| summary.and_then(|s| str_field(s, key));

    let primary_category = field("primaryCategory")
        .and_then(|name| framework.categories.resolve(name))
        .map(|c| c.category.clone())
        .unwrap_or_else(|| UNKNOWN_PRIMARY_CATEGORY.to_string());

    let intervention_priority = field("interventionPriority")
        .and_then(InterventionPriority::parse)
        .unwrap_or_default();

    let recommended_approach = field("recommendedApproach")
        .and_then(|name| framework.strategies.resolve(name))
        .map(|s| s.strategy.clone())
        .unwrap_or_else(|| DEFAULT_RECOMMENDED_APPROACH.to_string());

    FrameworkAnalysis {
        primary_category,
        intervention_priority,
        recommended_approach,
    }
}
