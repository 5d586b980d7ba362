//! Reference datasets: the fallacy list and the misconception framework

use std::borrow::Cow;
use std::fs;

use serde::Deserialize;

use super::{DuplicatePolicy, TaxonomyError, TaxonomyIndex};
use crate::model::TaxonomyConfig;
use crate::model::taxonomy::{Fallacy, MisconceptionCategory, TreatmentStrategy};

const EMBEDDED_FALLACIES: &str = include_str!("../../data/fallacies.json");
const EMBEDDED_FRAMEWORK: &str = include_str!("../../data/misconception-framework.json");

pub type FallacyTaxonomy = TaxonomyIndex<Fallacy>;

impl TaxonomyIndex<Fallacy> {
    pub fn from_json(json: &str, policy: DuplicatePolicy) -> Result<Self, TaxonomyError> {
        let fallacies: Vec<Fallacy> = serde_json::from_str(json)?;
        TaxonomyIndex::build(fallacies, policy)
    }

    /// Distinct fallacy categories in dataset order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for fallacy in self.entries() {
            if !categories.contains(&fallacy.category.as_str()) {
                categories.push(&fallacy.category);
            }
        }
        categories
    }
}

/// Misconception categories and treatment strategies, each a closed enumeration
#[derive(Debug, Clone)]
pub struct MisconceptionFramework {
    pub categories: TaxonomyIndex<MisconceptionCategory>,
    pub strategies: TaxonomyIndex<TreatmentStrategy>,
}

#[derive(Deserialize)]
struct FrameworkFile {
    misconception_categories: Vec<MisconceptionCategory>,
    treatment_strategies: Vec<TreatmentStrategy>,
}

impl MisconceptionFramework {
    pub fn from_json(json: &str, policy: DuplicatePolicy) -> Result<Self, TaxonomyError> {
        let file: FrameworkFile = serde_json::from_str(json)?;
        let categories = TaxonomyIndex::build(file.misconception_categories, policy)?;

        let mut treatment_strategies = file.treatment_strategies;
        for strategy in &mut treatment_strategies {
            strategy.target_categories = strategy
                .target_categories
                .iter()
                .map(|target| {
                    categories
                        .resolve(target)
                        .map(|category| category.category.clone())
                        .ok_or_else(|| TaxonomyError::UnknownTargetCategory {
                            strategy: strategy.strategy.clone(),
                            category: target.clone(),
                        })
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(Self {
            categories,
            strategies: TaxonomyIndex::build(treatment_strategies, policy)?,
        })
    }
}

/// Load the fallacy taxonomy from the configured file, or the embedded dataset
pub fn load_fallacies(config: &TaxonomyConfig) -> Result<FallacyTaxonomy, TaxonomyError> {
    let json = read_dataset(config.fallacies_path.as_deref(), EMBEDDED_FALLACIES)?;
    let taxonomy = FallacyTaxonomy::from_json(&json, config.duplicate_names)?;
    tracing::info!(
        fallacies = taxonomy.len(),
        categories = taxonomy.categories().len(),
        "Fallacy taxonomy loaded"
    );
    Ok(taxonomy)
}

/// Load the misconception framework from the configured file, or the embedded dataset
pub fn load_framework(config: &TaxonomyConfig) -> Result<MisconceptionFramework, TaxonomyError> {
    let json = read_dataset(config.framework_path.as_deref(), EMBEDDED_FRAMEWORK)?;
    let framework = MisconceptionFramework::from_json(&json, config.duplicate_names)?;
    tracing::info!(
        categories = framework.categories.len(),
        strategies = framework.strategies.len(),
        "Misconception framework loaded"
    );
    Ok(framework)
}

fn read_dataset(path: Option<&str>, embedded: &'static str) -> Result<Cow<'static, str>, TaxonomyError> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path, "Reading taxonomy dataset from file");
            fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| TaxonomyError::Io {
                    path: path.to_string(),
                    source,
                })
        }
        None => Ok(Cow::Borrowed(embedded)),
    }
}
