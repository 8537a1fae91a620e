//! Configuration management for resume scout

use crate::error::{Result, ResumeScoutError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub extraction: ExtractionConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub enable_rag: bool,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_top_k: usize,
    /// Optional newline-delimited gazetteer extending the built-in entity lists
    pub gazetteer_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub api_key_env: String,
    pub default_count: usize,
    pub days_ago: u32,
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub saved_jobs_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let saved_jobs_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scout")
            .join("saved_jobs");

        Self {
            llm: LlmConfig {
                api_base: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                chat_model: "gpt-3.5-turbo".to_string(),
                embedding_model: "text-embedding-ada-002".to_string(),
                max_tokens: 1500,
                temperature: 0.7,
                request_timeout_secs: 120,
            },
            extraction: ExtractionConfig {
                enable_rag: true,
                chunk_size: 1000,
                chunk_overlap: 200,
                retrieval_top_k: 4,
                gazetteer_path: None,
            },
            search: SearchConfig {
                api_key_env: "SERPAPI_API_KEY".to_string(),
                default_count: 5,
                days_ago: 7,
                platforms: vec![
                    "LinkedIn".to_string(),
                    "Indeed".to_string(),
                    "Glassdoor".to_string(),
                    "ZipRecruiter".to_string(),
                    "Monster".to_string(),
                ],
            },
            storage: StorageConfig { saved_jobs_dir },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeScoutError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeScoutError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scout")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.chunk_size <= self.extraction.chunk_overlap {
            return Err(ResumeScoutError::Configuration(format!(
                "extraction.chunk_size ({}) must be greater than extraction.chunk_overlap ({})",
                self.extraction.chunk_size, self.extraction.chunk_overlap
            )));
        }
        if self.extraction.retrieval_top_k == 0 {
            return Err(ResumeScoutError::Configuration(
                "extraction.retrieval_top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// LLM credential from the environment. `None` means AI features are off.
    pub fn llm_api_key(&self) -> Option<String> {
        read_secret(&self.llm.api_key_env)
    }

    pub fn search_api_key(&self) -> Option<String> {
        read_secret(&self.search.api_key_env)
    }
}

fn read_secret(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
