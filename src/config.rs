//! Configuration types for webgist.
//!
//! One TOML file with three tables: `[acquire]` (providers and fetching),
//! `[llm]` (the summarisation model) and `[usefulness]` (which acquired
//! pages are worth summarising). Every field has a default, so an empty
//! or missing file is a working configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use webgist_acquire::{AcquireConfig, UsefulnessPolicy};

use crate::error::{Result, WebgistError};

/// Environment variables consulted, in order, when no API key is configured.
pub const API_KEY_ENV_VARS: &[&str] = &["WEBGIST_API_KEY", "OPENAI_API_KEY"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebgistConfig {
    /// Content acquisition.
    pub acquire: AcquireConfig,
    /// Summarisation model.
    pub llm: LlmConfig,
    /// Filter applied to acquired content before summarisation.
    pub usefulness: UsefulnessPolicy,
}

/// Chat Completions endpoint and model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the `/v1/...` path.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key. Prefer the environment; see [`API_KEY_ENV_VARS`].
    pub api_key: Option<String>,
    /// Token budget for acquired content in the prompt.
    pub max_context_tokens: usize,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
            max_context_tokens: 6000,
            max_tokens: 1024,
            temperature: 0.2,
            timeout_seconds: 60,
        }
    }
}

impl LlmConfig {
    /// The configured key, else the first non-empty environment variable
    /// from [`API_KEY_ENV_VARS`].
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// [`Self::resolve_api_key`] with an injectable environment lookup.
    pub fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|name| lookup(name))
                    .find(|key| !key.trim().is_empty())
            })
    }
}

impl WebgistConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WebgistError::Config(e.to_string()))
    }

    /// Load `path` if given, else the default file if it exists, else defaults.
    ///
    /// The result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, any file
    /// fails to parse, or the settings are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WebgistError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/webgist/config.toml`.
    pub fn default_config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("webgist").join("config.toml"),
            None => PathBuf::from("/tmp/webgist-config/config.toml"),
        }
    }

    /// Check every table.
    ///
    /// # Errors
    ///
    /// Returns [`WebgistError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.acquire.validate()?;
        if self.llm.model.trim().is_empty() {
            return Err(WebgistError::Config("llm.model must not be empty".into()));
        }
        if self.llm.max_context_tokens == 0 {
            return Err(WebgistError::Config(
                "llm.max_context_tokens must be greater than 0".into(),
            ));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(WebgistError::Config(
                "llm.timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
