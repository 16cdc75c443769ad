use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tweetsmith::fetch::DEFAULT_MAX_CONTENT_CHARS;
use tweetsmith::llm::anthropic::{ANTHROPIC_API_URL, DEFAULT_API_KEY_ENV, DEFAULT_MODEL};
use tweetsmith::pipeline::{DEFAULT_EXAMPLE_LIMIT, PipelineMode};
use tweetsmith::prompt::Persona;
use tweetsmith::runner::DEFAULT_MAX_ATTEMPTS;
use tweetsmith::stages::DEFAULT_MAX_WORDS;
use tweetsmith::store::{LANGSMITH_API_KEY_ENV, LANGSMITH_API_URL};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
    pub store: StoreConfig,
    pub fetch: FetchConfig,
    pub persona: Persona,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub base_url: String,
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            timeout_ms: 120000,
            base_url: ANTHROPIC_API_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: PipelineMode,
    pub max_attempts: u32,
    pub retrieve_examples: bool,
    pub example_limit: usize,
    pub max_words: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: PipelineMode::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retrieve_examples: true,
            example_limit: DEFAULT_EXAMPLE_LIMIT,
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Local,
    Langsmith,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub dataset_id: String,
    pub local_dir: PathBuf,
    pub api_url: String,
    pub api_key_env: String,
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            dataset_id: "tweets".to_string(),
            local_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tweetsmith")
                .join("examples"),
            api_url: LANGSMITH_API_URL.to_string(),
            api_key_env: LANGSMITH_API_KEY_ENV.to_string(),
            timeout_ms: 30000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub user_agent: Option<String>,
    pub max_content_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            user_agent: None,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pipeline.max_attempts, 4);
        assert_eq!(config.pipeline.example_limit, 5);
        assert_eq!(config.pipeline.max_words, 20);
        assert_eq!(config.pipeline.mode, PipelineMode::FactBased);
        assert_eq!(config.store.backend, StoreBackend::Local);
        assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tweetsmith.yml");
        fs::write(
            &path,
            "pipeline:\n  mode: raw-article\n  max_attempts: 2\nstore:\n  backend: langsmith\n  dataset_id: ds-42\npersona:\n  name: Ada\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.pipeline.mode, PipelineMode::RawArticle);
        assert_eq!(config.pipeline.max_attempts, 2);
        assert_eq!(config.pipeline.example_limit, 5);
        assert_eq!(config.store.backend, StoreBackend::Langsmith);
        assert_eq!(config.store.dataset_id, "ds-42");
        assert_eq!(config.persona.name, "Ada");
        assert_eq!(config.llm.max_tokens, 1024);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let missing = PathBuf::from("/definitely/not/here/tweetsmith.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.yml");
        fs::write(&path, "pipeline: [not, a, map").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
