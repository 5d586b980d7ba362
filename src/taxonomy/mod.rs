//! Closed-world taxonomy indexes
//!
//! A [`TaxonomyIndex`] owns the entries of one reference dataset and maps every
//! canonical name and alias (trimmed, lower-cased) to its owning entry. Indexes
//! are built once at startup and shared read-only between request handlers.

mod datasets;

use std::collections::HashMap;

use serde::Deserialize;

use crate::model::taxonomy::TaxonomyEntry;

pub use datasets::{FallacyTaxonomy, MisconceptionFramework, load_fallacies, load_framework};

/// How index construction treats a name registered by two different entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The entry registered last owns the name
    #[default]
    LastWriteWins,
    /// Construction fails on the first collision
    Reject,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TaxonomyError {
    #[error("Failed to read taxonomy dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse taxonomy dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Taxonomy dataset contains no entries")]
    Empty,

    #[error("Taxonomy entry at position {0} has an empty name")]
    EmptyName(usize),

    #[error("Treatment strategy '{strategy}' targets unknown category '{category}'")]
    UnknownTargetCategory { strategy: String, category: String },

    #[error("Duplicate taxonomy name '{name}' registered by '{first}' and '{second}'")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
}

/// Normalize a name for lookup: trim surrounding whitespace and lower-case
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read-only lookup from canonical names and aliases to taxonomy entries
#[derive(Debug, Clone)]
pub struct TaxonomyIndex<T> {
    entries: Vec<T>,
    lookup: HashMap<String, usize>,
}

impl<T: TaxonomyEntry> TaxonomyIndex<T> {
    /// Build the index, registering each entry's canonical name and aliases in
    /// dataset order
    pub fn build(entries: Vec<T>, policy: DuplicatePolicy) -> Result<Self, TaxonomyError> {
        if entries.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let mut lookup: HashMap<String, usize> = HashMap::new();

        for (position, entry) in entries.iter().enumerate() {
            if entry.canonical_name().trim().is_empty() {
                return Err(TaxonomyError::EmptyName(position));
            }

            let names = std::iter::once(entry.canonical_name())
                .chain(entry.aliases().iter().map(String::as_str));

            for name in names {
                let key = normalize_name(name);
                if key.is_empty() {
                    continue;
                }

                if let Some(previous) = lookup.insert(key, position)
                    && previous != position
                {
                    let first = entries[previous].canonical_name();
                    match policy {
                        DuplicatePolicy::Reject => {
                            return Err(TaxonomyError::DuplicateName {
                                name: name.to_string(),
                                first: first.to_string(),
                                second: entry.canonical_name().to_string(),
                            });
                        }
                        DuplicatePolicy::LastWriteWins => {
                            tracing::warn!(
                                name = %name,
                                previous_owner = %first,
                                new_owner = %entry.canonical_name(),
                                "Duplicate taxonomy name, later entry wins"
                            );
                        }
                    }
                }
            }
        }

        tracing::debug!(
            entries = entries.len(),
            names = lookup.len(),
            "Taxonomy index built"
        );

        Ok(Self { entries, lookup })
    }

    /// Resolve a name or alias, ignoring case and surrounding whitespace
    pub fn resolve(&self, name: &str) -> Option<&T> {
        self.lookup
            .get(&normalize_name(name))
            .map(|&position| &self.entries[position])
    }

    /// All entries in dataset order
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Canonical names in dataset order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.canonical_name()).collect()
    }

    /// Entries whose name, aliases or description contain `query`
    pub fn search(&self, query: &str) -> Vec<&T> {
        let needle = normalize_name(query);
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries.iter().filter(|e| e.matches(&needle)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::taxonomy::Fallacy;

    fn fallacy(name: &str, alt_names: &[&str]) -> Fallacy {
        Fallacy {
            name: name.to_string(),
            description: format!("{} description", name),
            logical_form: "If P then Q".to_string(),
            example: "An example".to_string(),
            category: "Fallacies of Relevance".to_string(),
            alt_names: alt_names.iter().map(|s| s.to_string()).collect(),
            source: None,
        }
    }

    #[test]
    fn test_resolves_names_and_aliases_case_insensitively() {
        let index = TaxonomyIndex::build(
            vec![
                fallacy("Bandwagon Fallacy", &["Appeal to Popularity", "Argumentum ad Populum"]),
                fallacy("Straw Man", &["Strawman"]),
            ],
            DuplicatePolicy::LastWriteWins,
        )
        .unwrap();

        for entry in index.entries() {
            assert_eq!(index.resolve(&entry.name).unwrap().name, entry.name);
            assert_eq!(
                index.resolve(&entry.name.to_uppercase()).unwrap().name,
                entry.name
            );
            for alias in &entry.alt_names {
                assert_eq!(index.resolve(alias).unwrap().name, entry.name);
            }
        }

        assert_eq!(
            index.resolve("  argumentum AD populum ").unwrap().name,
            "Bandwagon Fallacy"
        );
    }

    #[test]
    fn test_unknown_name_is_none() {
        let index =
            TaxonomyIndex::build(vec![fallacy("Straw Man", &[])], DuplicatePolicy::default())
                .unwrap();

        assert!(index.resolve("Invented Fallacy").is_none());
        assert!(index.resolve("").is_none());
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let index = TaxonomyIndex::build(
            vec![
                fallacy("False Cause", &["Post Hoc"]),
                fallacy("Post Hoc Ergo Propter Hoc", &["Post Hoc"]),
            ],
            DuplicatePolicy::LastWriteWins,
        )
        .unwrap();

        assert_eq!(
            index.resolve("post hoc").unwrap().name,
            "Post Hoc Ergo Propter Hoc"
        );
        assert_eq!(index.resolve("False Cause").unwrap().name, "False Cause");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = TaxonomyIndex::build(
            vec![
                fallacy("False Cause", &["Post Hoc"]),
                fallacy("Post Hoc Ergo Propter Hoc", &["post hoc"]),
            ],
            DuplicatePolicy::Reject,
        );

        match result {
            Err(TaxonomyError::DuplicateName { first, second, .. }) => {
                assert_eq!(first, "False Cause");
                assert_eq!(second, "Post Hoc Ergo Propter Hoc");
            }
            other => panic!("expected duplicate error, got {:?}", other.map(|i| i.len())),
        }
    }

    #[test]
    fn test_alias_equal_to_own_name_is_not_a_duplicate() {
        let index = TaxonomyIndex::build(
            vec![fallacy("Strawman", &["strawman", "Straw Man"])],
            DuplicatePolicy::Reject,
        );

        assert!(index.is_ok());
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let result = TaxonomyIndex::<Fallacy>::build(vec![], DuplicatePolicy::default());
        assert!(matches!(result, Err(TaxonomyError::Empty)));
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = TaxonomyIndex::build(
            vec![fallacy("Straw Man", &[]), fallacy("   ", &[])],
            DuplicatePolicy::default(),
        );
        assert!(matches!(result, Err(TaxonomyError::EmptyName(1))));
    }

    #[test]
    fn test_search_matches_category_and_aliases() {
        let mut formal = fallacy("Affirming the Consequent", &["Converse Error"]);
        formal.category = "Formal Fallacies".to_string();
        let index = TaxonomyIndex::build(
            vec![fallacy("Straw Man", &["Strawman"]), formal],
            DuplicatePolicy::default(),
        )
        .unwrap();

        let by_category: Vec<_> = index.search("formal").iter().map(|f| &f.name).collect();
        assert_eq!(by_category, vec!["Affirming the Consequent"]);

        let by_alias: Vec<_> = index.search("CONVERSE").iter().map(|f| &f.name).collect();
        assert_eq!(by_alias, vec!["Affirming the Consequent"]);

        assert_eq!(index.search("").len(), 2);
        assert!(index.search("nothing like this").is_empty());
    }
}
