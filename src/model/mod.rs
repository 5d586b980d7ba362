pub mod analysis;
pub mod article;
pub mod config;
pub mod taxonomy;

pub use analysis::*;
pub use article::Article;
pub use config::{AnalysisConfig, Config, LlmConfig, RetrieverConfig, TaxonomyConfig};
