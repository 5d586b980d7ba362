//! Static taxonomy entries loaded from the reference datasets

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An entry that can be registered in a [`crate::taxonomy::TaxonomyIndex`]
pub trait TaxonomyEntry {
    /// Display name used in prompts and responses
    fn canonical_name(&self) -> &str;

    /// Alternative names that resolve to this entry
    fn aliases(&self) -> &[String];

    /// Short description embedded in prompt catalogs
    fn description(&self) -> &str;

    /// Case-insensitive substring match used by reference-list search.
    /// `needle` is already lower-cased.
    fn matches(&self, needle: &str) -> bool {
        self.canonical_name().to_lowercase().contains(needle)
            || self.description().to_lowercase().contains(needle)
            || self
                .aliases()
                .iter()
                .any(|alias| alias.to_lowercase().contains(needle))
    }
}

/// A logical fallacy from the fallacy reference list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fallacy {
    pub name: String,
    pub description: String,
    pub logical_form: String,
    pub example: String,
    pub category: String,
    #[serde(default)]
    pub alt_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl TaxonomyEntry for Fallacy {
    fn canonical_name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> &[String] {
        &self.alt_names
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn matches(&self, needle: &str) -> bool {
        self.category.to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .alt_names
                .iter()
                .any(|alias| alias.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Prevalence {
    Rare,
    Occasional,
    Common,
    Pervasive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
    Low,
    Moderate,
    High,
    Extreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
    Multidimensional,
}

/// One of the misconception categories of the science misconception framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MisconceptionCategory {
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    pub prevalence: Prevalence,
    pub persistence: Persistence,
    pub complexity: Complexity,
    #[serde(default, alias = "cognitive_origins")]
    pub cognitive_origins: Vec<String>,
}

impl TaxonomyEntry for MisconceptionCategory {
    fn canonical_name(&self) -> &str {
        &self.category
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// A research-based treatment strategy for misconceptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentStrategy {
    pub strategy: String,
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, alias = "target_categories")]
    pub target_categories: Vec<String>,
    pub duration: String,
    #[serde(alias = "success_rate")]
    pub success_rate: String,
}

impl TaxonomyEntry for TreatmentStrategy {
    fn canonical_name(&self) -> &str {
        &self.strategy
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn description(&self) -> &str {
        &self.description
    }
}
