//! Prompts for misconception analysis

use crate::model::InterventionPriority;
use crate::taxonomy::MisconceptionFramework;

/// System prompt for misconception analysis
pub const MISCONCEPTION_SYSTEM_PROMPT: &str = r#"You are an expert science education analyst using a research-based misconception framework. Your task is to analyze a student's answer using ONLY the misconception categories and treatment strategies from the framework database you are given.

CRITICAL RULES:
1. STRICT DATABASE COMPLIANCE: use only categories and strategies that exist in the framework, spelled exactly as listed.
2. EVIDENCE-BASED: reference specific examples from the framework when classifying a misconception.
3. NO EXTERNAL VARIABLES: do not add assessment metrics that are not present in the framework.
4. Respond with the JSON object only: no prose, no markdown, no code fences."#;

/// Build the misconception analysis prompt: both framework catalogs, the
/// required output shape and the student answer under analysis
pub fn build_misconception_prompt(
    framework: &MisconceptionFramework,
    context: &str,
    student_answer: &str,
) -> String {
    let categories = framework
        .categories
        .entries()
        .iter()
        .map(|c| {
            let mut line = format!("- {}: {}", c.category, c.description);
            if !c.examples.is_empty() {
                line.push_str(&format!("\n  Examples: {}", c.examples.join("; ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    let strategies = framework
        .strategies
        .entries()
        .iter()
        .map(|s| {
            format!(
                "- {}: {}\n  Targets: {}. Duration: {}. Success rate: {}",
                s.strategy,
                s.description,
                s.target_categories.join(", "),
                s.duration,
                s.success_rate
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let category_names = framework.categories.names().join(", ");
    let strategy_names = framework.strategies.names().join(", ");
    let priorities = InterventionPriority::ALL
        .iter()
        .map(InterventionPriority::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Misconception Categories ({category_count}):
{categories}

Treatment Strategies ({strategy_count}):
{strategies}

Context:
{context}

Student Answer:
"""
{student_answer}
"""

Instructions:
1. Identify any misconceptions in the student answer.
2. Classify each misconception into exactly ONE framework category.
3. Select treatment strategies from the framework that match the identified misconceptions.
4. Reference related examples from the framework for each misconception.

Required Output Format:
{{
  "misconceptions": [
    {{
      "description": "Brief description of the misconception found in the student answer",
      "category": "Exactly one of: {category_names}",
      "explanation": "Why this fits the chosen category, referencing the framework description",
      "confidence": 0.0,
      "related_framework_examples": ["Framework examples similar to this misconception"]
    }}
  ],
  "correctConcepts": ["Correct scientific concepts the student demonstrates"],
  "teachingSuggestions": [
    {{
      "strategy": "Exactly one of: {strategy_names}",
      "rationale": "Why this strategy is appropriate for the identified misconception category",
      "implementation": "Specific implementation steps, customized for this student",
      "categories_targeted": ["Framework categories this strategy addresses"]
    }}
  ],
  "overallConfidence": 0.0,
  "frameworkAnalysis": {{
    "primaryCategory": "The most prominent category, exactly one of: {category_names}",
    "interventionPriority": "One of: {priorities}",
    "recommendedApproach": "The most suitable strategy, exactly one of: {strategy_names}"
  }}
}}

If no misconceptions are found, use an empty array: "misconceptions": []
Return ONLY the JSON object."#,
        category_count = framework.categories.len(),
        categories = categories,
        strategy_count = framework.strategies.len(),
        strategies = strategies,
        context = context,
        student_answer = student_answer,
        category_names = category_names,
        strategy_names = strategy_names,
        priorities = priorities,
    )
}
