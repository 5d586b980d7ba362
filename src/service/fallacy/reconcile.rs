//! Reconciliation of model-reported fallacies against the fallacy taxonomy

use serde_json::Value;

use crate::model::AnalyzedFallacy;
use crate::model::taxonomy::Fallacy;
use crate::service::response::{JsonShape, MalformedResponse, json_kind, parse_model_json, str_field};
use crate::taxonomy::FallacyTaxonomy;

/// Parse a raw model response and keep only the fallacies present in the taxonomy
pub fn reconcile_fallacy_response(
    taxonomy: &FallacyTaxonomy,
    raw: &str,
) -> Result<Vec<AnalyzedFallacy>, MalformedResponse> {
    let value = parse_model_json(raw, JsonShape::Array)?;

    let Value::Array(records) = value else {
        return Err(MalformedResponse::new(
            format!("Expected a JSON array of fallacies, found {}", json_kind(&value)),
            raw,
        ));
    };

    let fallacies: Vec<AnalyzedFallacy> = records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| reconcile_record(taxonomy, position, record))
        .collect();

    let dropped = records.len() - fallacies.len();
    if dropped > 0 {
        tracing::warn!(
            asserted = records.len(),
            kept = fallacies.len(),
            dropped,
            "Dropped unrecognized fallacy records"
        );
    }

    Ok(fallacies)
}

fn reconcile_record(
    taxonomy: &FallacyTaxonomy,
    position: usize,
    record: &Value,
) -> Option<AnalyzedFallacy> {
    let Some(name) = str_field(record, "name") else {
        tracing::warn!(position, "Fallacy record has no name, dropping");
        return None;
    };

    let Some(explanation) = str_field(record, "explanation") else {
        tracing::warn!(position, name = %name, "Fallacy record has no explanation, dropping");
        return None;
    };

    let Some(fallacy) = taxonomy.resolve(name) else {
        tracing::warn!(position, unmatched_name = %name, "Unknown fallacy name, dropping");
        return None;
    };

    Some(merge(fallacy, explanation, str_field(record, "quote")))
}

/// Static taxonomy fields plus the model's per-instance commentary
fn merge(fallacy: &Fallacy, explanation: &str, quote: Option<&str>) -> AnalyzedFallacy {
    AnalyzedFallacy {
        name: fallacy.name.clone(),
        description: fallacy.description.clone(),
        logical_form: fallacy.logical_form.clone(),
        example: fallacy.example.clone(),
        category: fallacy.category.clone(),
        alt_names: fallacy.alt_names.clone(),
        source: fallacy.source.clone(),
        explanation: explanation.to_string(),
        quote: quote.map(str::to_string),
    }
}
