//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or `~/.local/share/obra/config.toml` when it exists
//! 2. Built-in defaults
//!
//! Environment variables are applied on top:
//! - `OBRA_CATALOG`: catalog JSON path
//! - `OBRA_OUTPUT_DIR`: export directory
//! - `AI_BACKEND`: openai_compatible (default), ollama, mock
//! - `OPENAI_COMPATIBLE_HOST` / `OPENAI_COMPATIBLE_MODEL` / `OPENAI_COMPATIBLE_API_KEY`
//!   (`OPENAI_MODEL` and `OPENAI_API_KEY` are accepted as fallbacks)
//! - `OLLAMA_HOST` / `OLLAMA_MODEL`
//!
//! ```toml
//! catalog = "data/catalog.json"
//! output_dir = "exports"
//!
//! [ai]
//! backend = "openai_compatible"
//! model = "gpt-4o-mini"
//! temperature = 0.3
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Default catalog location, relative to the working directory
pub const DEFAULT_CATALOG: &str = "data/catalog.json";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Reference catalog JSON file
    pub catalog: PathBuf,
    /// Directory export files are written to
    pub output_dir: PathBuf,
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG),
            output_dir: PathBuf::from("."),
            ai: AiConfig::default(),
        }
    }
}

/// Advisory backend settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// openai_compatible, ollama or mock
    pub backend: String,
    /// Server URL; the OpenAI API is assumed when unset and an API key is present
    pub host: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f32,
    /// Response limit for budget analysis
    pub max_tokens: u32,
    /// Response limit for single-item consultations
    pub consult_max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: "openai_compatible".to_string(),
            host: None,
            model: None,
            api_key: None,
            temperature: 0.3,
            max_tokens: 800,
            consult_max_tokens: 500,
        }
    }
}

impl AppConfig {
    /// Parse a TOML config string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid config: {}", e)))
    }

    /// Load config from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Resolve config: explicit file, else the default file if present, else defaults;
    /// then environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!(path = %path.display(), "Loading default config file");
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(catalog) = lookup("OBRA_CATALOG") {
            self.catalog = PathBuf::from(catalog);
        }
        if let Some(dir) = lookup("OBRA_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(backend) = lookup("AI_BACKEND") {
            self.ai.backend = backend;
        }

        if self.ai.backend.eq_ignore_ascii_case("ollama") {
            if let Some(host) = lookup("OLLAMA_HOST") {
                self.ai.host = Some(host);
            }
            if let Some(model) = lookup("OLLAMA_MODEL") {
                self.ai.model = Some(model);
            }
        } else {
            if let Some(host) = lookup("OPENAI_COMPATIBLE_HOST") {
                self.ai.host = Some(host);
            }
            if let Some(model) = lookup("OPENAI_COMPATIBLE_MODEL").or_else(|| lookup("OPENAI_MODEL"))
            {
                self.ai.model = Some(model);
            }
            if let Some(key) =
                lookup("OPENAI_COMPATIBLE_API_KEY").or_else(|| lookup("OPENAI_API_KEY"))
            {
                self.ai.api_key = Some(key);
            }
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("obra").join("config.toml"))
}
