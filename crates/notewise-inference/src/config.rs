//! Inference configuration.
//!
//! Configuration can be loaded from:
//! - a TOML file named by `NOTEWISE_CONFIG`
//! - environment variables (`NOTEWISE_*` prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use notewise_inference::config::InferenceConfig;
//!
//! // File from NOTEWISE_CONFIG, or environment variables
//! let config = InferenceConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = InferenceConfig::from_file(std::path::Path::new("notewise.toml")).expect("Failed to load");
//! ```
//!
//! # File format
//!
//! ```toml
//! [ollama]
//! base_url = "http://127.0.0.1:11434"
//! model = "gpt-oss:20b"
//! timeout_secs = 120
//! api_key = "${OLLAMA_API_KEY}"
//!
//! [processing]
//! max_tags = 5
//! summary_sentences = 3
//! ```
//!
//! `${VAR}` placeholders are replaced from the environment before parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

use notewise_core::defaults;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "NOTEWISE_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for notewise_core::Error {
    fn from(e: ConfigError) -> Self {
        notewise_core::Error::Config(e.to_string())
    }
}

/// Ollama backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL for Ollama API.
    #[serde(default = "OllamaConfig::default_base_url")]
    pub base_url: String,
    /// Model to use for text generation.
    #[serde(default = "OllamaConfig::default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "OllamaConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token for proxied deployments (optional for local Ollama).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            timeout_secs: Self::default_timeout_secs(),
            api_key: None,
        }
    }
}

impl OllamaConfig {
    fn default_base_url() -> String {
        defaults::OLLAMA_URL.to_string()
    }

    fn default_model() -> String {
        defaults::GEN_MODEL.to_string()
    }

    fn default_timeout_secs() -> u64 {
        defaults::GEN_TIMEOUT_SECS
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "Ollama base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "Ollama base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.model.is_empty() {
            return Err(ConfigError::Validation(
                "Ollama model cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Ollama timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Limits applied around summary and tag generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub min_content_chars: usize,
    pub max_content_chars: usize,
    pub summary_sentences: usize,
    pub max_tags: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            min_content_chars: defaults::MIN_CONTENT_CHARS,
            max_content_chars: defaults::MAX_CONTENT_CHARS,
            summary_sentences: defaults::SUMMARY_SENTENCES,
            max_tags: defaults::MAX_TAGS,
        }
    }
}

impl ProcessingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_content_chars >= self.max_content_chars {
            return Err(ConfigError::Validation(format!(
                "min_content_chars ({}) must be below max_content_chars ({})",
                self.min_content_chars, self.max_content_chars
            )));
        }
        if self.summary_sentences == 0 {
            return Err(ConfigError::Validation(
                "summary_sentences must be positive".to_string(),
            ));
        }
        if self.max_tags == 0 {
            return Err(ConfigError::Validation(
                "max_tags must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main inference configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl InferenceConfig {
    /// Load from the file named by `NOTEWISE_CONFIG`, falling back to
    /// environment variables.
    pub fn load() -> ConfigResult<Self> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => {
                info!("Loading inference config from: {}", path);
                Self::from_file(Path::new(&path))
            }
            _ => {
                debug!("{} not set, using environment variables", CONFIG_PATH_ENV);
                let config = Self::from_env()?;
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            base_url = %config.ollama.base_url,
            model = %config.ollama.model,
            "Loaded inference config file"
        );
        Ok(config)
    }

    /// Parse and validate TOML content, substituting `${VAR}` placeholders.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let content = substitute_env_vars(content);
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from `NOTEWISE_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let defaults = Self::default();

        let parse_usize = |name: &str, default: usize| -> ConfigResult<usize> {
            match lookup(name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: name.to_string(),
                        value,
                    }),
                None => Ok(default),
            }
        };

        let timeout_secs = match lookup("NOTEWISE_GEN_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "NOTEWISE_GEN_TIMEOUT_SECS".to_string(),
                    value,
                })?,
            None => defaults.ollama.timeout_secs,
        };

        Ok(Self {
            ollama: OllamaConfig {
                base_url: lookup("NOTEWISE_OLLAMA_URL").unwrap_or(defaults.ollama.base_url),
                model: lookup("NOTEWISE_GEN_MODEL").unwrap_or(defaults.ollama.model),
                timeout_secs,
                api_key: lookup("NOTEWISE_OLLAMA_API_KEY").filter(|k| !k.is_empty()),
            },
            processing: ProcessingConfig {
                min_content_chars: parse_usize(
                    "NOTEWISE_MIN_CONTENT_CHARS",
                    defaults.processing.min_content_chars,
                )?,
                max_content_chars: parse_usize(
                    "NOTEWISE_MAX_CONTENT_CHARS",
                    defaults.processing.max_content_chars,
                )?,
                summary_sentences: parse_usize(
                    "NOTEWISE_SUMMARY_SENTENCES",
                    defaults.processing.summary_sentences,
                )?,
                max_tags: parse_usize("NOTEWISE_MAX_TAGS", defaults.processing.max_tags)?,
            },
        })
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.ollama.validate()?;
        self.processing.validate()
    }
}

/// Replace `${VAR}` with the variable's value; unknown variables are left as-is.
fn substitute_env_vars(content: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder regex is valid"));
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
