use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

use crate::taxonomy::DuplicatePolicy;

const ENV_CONFIG_PATH: &str = "REASONING_LENS_CONFIG_PATH";
const ENV_ANALYSIS_MODEL: &str = "ANALYSIS_MODEL";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Analysis request limits and response options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum length of the analyzed text, in characters
    pub max_text_length: usize,
    /// Attach the raw model response to fallacy analysis results
    pub include_debug: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_text_length: 5000,
            include_debug: false,
        }
    }
}

/// Model call parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u64,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: rig::providers::openai::GPT_4O_MINI.to_string(),
            temperature: 0.3,
            max_tokens: 2000,
            timeout_secs: 60,
        }
    }
}

/// Reference dataset locations; the embedded datasets are used when unset
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    pub fallacies_path: Option<String>,
    pub framework_path: Option<String>,
    pub duplicate_names: DuplicatePolicy,
}

/// Article retriever filtering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Allowed domains (whitelist). If empty, all domains are allowed.
    pub allow: Vec<String>,
    /// Denied domains (blacklist). Applied after allow list.
    pub deny: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            allow: Vec::new(),
            deny: Vec::new(),
            timeout_secs: 15,
        }
    }
}

impl RetrieverConfig {
    /// Check if a URL is allowed based on the allow/deny lists
    pub fn is_url_allowed(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        if self.deny.iter().any(|d| host.contains(&d.to_lowercase())) {
            return false;
        }

        if self.allow.is_empty() {
            return true;
        }

        self.allow.iter().any(|a| host.contains(&a.to_lowercase()))
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub analysis: AnalysisConfig,
    pub llm: LlmConfig,
    pub taxonomy: TaxonomyConfig,
    pub retrievers: RetrieverConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub llm: LlmConfig,
    pub taxonomy: TaxonomyConfig,
    pub retrievers: RetrieverConfig,
    /// Model provider credential; analysis endpoints answer 500 without it
    pub api_key: Option<String>,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            llm: LlmConfig::default(),
            taxonomy: TaxonomyConfig::default(),
            retrievers: RetrieverConfig::default(),
            api_key: None,
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        let mut llm = file.llm;
        if let Ok(model) = std::env::var(ENV_ANALYSIS_MODEL) {
            llm.model = model;
        }

        Self {
            analysis: file.analysis,
            llm,
            taxonomy: file.taxonomy,
            retrievers: file.retrievers,
            api_key,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse_config(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration from file");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    /// Parse YAML configuration; an empty document yields the defaults
    fn parse_config(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
        let contents = contents.trim();
        if contents.is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse_config("  \n").unwrap();

        assert_eq!(config.analysis.max_text_length, 5000);
        assert!(!config.analysis.include_debug);
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.retrievers.timeout_secs, 15);
        assert_eq!(config.taxonomy.duplicate_names, DuplicatePolicy::LastWriteWins);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let yaml = r#"
analysis:
  max_text_length: 800
llm:
  model: gpt-4o
taxonomy:
  duplicate_names: reject
retrievers:
  deny:
    - example.org
"#;
        let config = Config::parse_config(yaml).unwrap();

        assert_eq!(config.analysis.max_text_length, 800);
        assert!(!config.analysis.include_debug);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.3);
        assert_eq!(config.taxonomy.duplicate_names, DuplicatePolicy::Reject);
        assert!(config.taxonomy.fallacies_path.is_none());
        assert_eq!(config.retrievers.deny, vec!["example.org"]);
        assert_eq!(config.retrievers.timeout_secs, 15);
    }

    #[test]
    fn test_invalid_duplicate_policy_is_error() {
        let yaml = "taxonomy:\n  duplicate_names: first_wins\n";
        assert!(Config::parse_config(yaml).is_err());
    }

    #[test]
    fn test_url_allow_and_deny_lists() {
        let config = RetrieverConfig {
            allow: vec!["Example.com".to_string()],
            deny: vec!["ads.example.com".to_string()],
            ..RetrieverConfig::default()
        };

        let allowed = Url::parse("https://www.example.com/article").unwrap();
        let denied = Url::parse("https://ads.example.com/banner").unwrap();
        let other = Url::parse("https://news.test/story").unwrap();

        assert!(config.is_url_allowed(&allowed));
        assert!(!config.is_url_allowed(&denied));
        assert!(!config.is_url_allowed(&other));
    }

    #[test]
    fn test_empty_allow_list_allows_everything_not_denied() {
        let config = RetrieverConfig::default();
        let url = Url::parse("https://news.test/story").unwrap();
        assert!(config.is_url_allowed(&url));
    }
}
