//! Prompts for fallacy detection

use crate::model::taxonomy::TaxonomyEntry;
use crate::taxonomy::FallacyTaxonomy;

/// System prompt for fallacy detection
pub const FALLACY_SYSTEM_PROMPT: &str = r#"You are an expert in informal logic and critical thinking. Your task is to identify logical fallacies in a piece of text, using ONLY the fallacies listed in the reference catalog you are given.

CRITICAL RULES:
1. Only report fallacies that are actually committed in the text. Do not speculate.
2. Every reported name must be copied exactly from the catalog. Never invent new fallacy names.
3. Quote the offending span verbatim from the text when possible.
4. Respond with the JSON array only: no prose, no markdown, no code fences."#;

/// Build the fallacy detection prompt: the full catalog, the required output
/// shape and the text under analysis
pub fn build_fallacy_prompt(taxonomy: &FallacyTaxonomy, text: &str, context: Option<&str>) -> String {
    let catalog = taxonomy
        .entries()
        .iter()
        .map(|fallacy| {
            let aliases = if fallacy.aliases().is_empty() {
                String::new()
            } else {
                format!(" (also: {})", fallacy.aliases().join(", "))
            };
            format!("- {}{}: {}", fallacy.name, aliases, fallacy.description)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let context_section = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("Context:\n{}\n\n", c))
        .unwrap_or_default();

    format!(
        r#"Reference Catalog ({count} fallacies):
{catalog}

{context_section}Text to analyze:
"""
{text}
"""

Required Output Format:
A JSON array where each element is an object with exactly these fields:
[
  {{
    "name": "Fallacy name, exactly as written in the catalog",
    "explanation": "Why this text commits the fallacy",
    "quote": "The exact words from the text that contain the fallacy"
  }}
]

If the text contains no fallacies, respond with an empty array: []
Return ONLY the JSON array."#,
        count = taxonomy.len(),
        catalog = catalog,
        context_section = context_section,
        text = text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaxonomyConfig;
    use crate::taxonomy::load_fallacies;

    #[test]
    fn test_prompt_lists_every_fallacy() {
        let taxonomy = load_fallacies(&TaxonomyConfig::default()).unwrap();
        let prompt = build_fallacy_prompt(&taxonomy, "Everyone is doing it.", None);

        for fallacy in taxonomy.entries() {
            assert!(
                prompt.contains(&format!("- {}", fallacy.name)),
                "missing {}",
                fallacy.name
            );
        }
        assert!(prompt.contains(&format!("({} fallacies)", taxonomy.len())));
        assert!(prompt.contains("Everyone is doing it."));
        assert!(prompt.contains("respond with an empty array: []"));
        assert!(!prompt.contains("Context:"));
    }

    #[test]
    fn test_prompt_includes_context_and_is_deterministic() {
        let taxonomy = load_fallacies(&TaxonomyConfig::default()).unwrap();

        let first = build_fallacy_prompt(&taxonomy, "text", Some("A political debate"));
        let second = build_fallacy_prompt(&taxonomy, "text", Some("A political debate"));

        assert_eq!(first, second);
        assert!(first.contains("Context:\nA political debate"));
    }

    #[test]
    fn test_blank_context_is_omitted() {
        let taxonomy = load_fallacies(&TaxonomyConfig::default()).unwrap();
        let prompt = build_fallacy_prompt(&taxonomy, "text", Some("   "));
        assert!(!prompt.contains("Context:"));
    }
}
