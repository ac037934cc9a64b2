//! Configuration for the RAG chain

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Model identifier the deployment actually serves. Generation always uses
/// this model; see [`LlmConfig::resolved_model`].
pub const DEPLOYED_MODEL: &str = "mistral";

/// Main chain configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Vector index endpoint configuration
    #[serde(default)]
    pub index: IndexConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl ChainConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| Error::config(format!("invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Surfaces misconfiguration at
    /// construction time rather than per request.
    pub fn validate(&self) -> Result<()> {
        if self.llm.base_url.trim().is_empty() {
            return Err(Error::config("llm.base_url must not be empty"));
        }
        if self.index.base_url.trim().is_empty() {
            return Err(Error::config("index.base_url must not be empty"));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::config("retrieval.top_k must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::config(format!(
                "llm.temperature {} out of range [0.0, 2.0]",
                self.llm.temperature
            )));
        }
        Ok(())
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Requested model name. Advisory only; generation always uses the
    /// deployed local model, see [`LlmConfig::resolved_model`].
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: DEPLOYED_MODEL.to_string(),
            temperature: 0.2,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Resolve the model id to send to the serving process.
    ///
    /// The requested model name is advisory only; the deployed local model
    /// is always used. Callers passing "gpt-4o" or similar still get
    /// [`DEPLOYED_MODEL`].
    pub fn resolved_model(&self) -> &'static str {
        DEPLOYED_MODEL
    }
}

/// Vector index endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the similarity-search service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    2
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: default_top_k() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_model_is_advisory() {
        let config = LlmConfig {
            model: "gpt-4o".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolved_model(), "mistral");
    }

    #[test]
    fn test_default_resolves_to_deployed_model() {
        let config = LlmConfig::default();
        assert_eq!(config.resolved_model(), DEPLOYED_MODEL);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ChainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = ChainConfig::default();
        config.retrieval.top_k = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = ChainConfig::default();
        config.llm.base_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = ChainConfig::default();
        config.llm.temperature = 3.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_toml_parse_with_partial_sections() {
        let raw = r#"
            [retrieval]
            top_k = 4

            [llm]
            base_url = "http://ollama.internal:11434"
            model = "llama3"
            temperature = 0.1
            timeout_secs = 60
        "#;
        let config: ChainConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.llm.model, "llama3");
        // index section omitted, falls back to defaults
        assert_eq!(config.index.base_url, "http://localhost:8000");
        // the requested model never wins
        assert_eq!(config.llm.resolved_model(), "mistral");
    }
}
