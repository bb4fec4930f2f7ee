use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::summarize::{DEFAULT_API_BASE, DEFAULT_CHUNK_SIZE, DEFAULT_MODEL, GenerationParams};
use crate::youtube::{FallbackMode, LanguagePolicy};
use crate::{Error, Result};

pub const DEFAULT_PRIMARY_LANG: &str = "pt";
pub const DEFAULT_FALLBACK_LANG: &str = "en";

/// Contents of the optional config file. Every key may be omitted.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub primary_lang: Option<String>,
    pub fallback_lang: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub chunk_size: Option<usize>,
    pub max_length: Option<u32>,
    pub min_length: Option<u32>,
    pub fallback_mode: Option<FallbackMode>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&content)?)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

/// Effective settings for one run, after config and CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub languages: LanguagePolicy,
    pub model: String,
    pub api_base: String,
    pub chunk_size: usize,
    pub generation: GenerationParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            languages: LanguagePolicy {
                primary: DEFAULT_PRIMARY_LANG.to_string(),
                fallback: DEFAULT_FALLBACK_LANG.to_string(),
                fallback_mode: FallbackMode::default(),
            },
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            generation: GenerationParams::default(),
        }
    }
}

impl From<Config> for Settings {
    fn from(config: Config) -> Self {
        let mut settings = Settings::default();
        if let Some(lang) = config.primary_lang {
            settings.languages.primary = lang;
        }
        if let Some(lang) = config.fallback_lang {
            settings.languages.fallback = lang;
        }
        if let Some(mode) = config.fallback_mode {
            settings.languages.fallback_mode = mode;
        }
        if let Some(model) = config.model {
            settings.model = model;
        }
        if let Some(api_base) = config.api_base {
            settings.api_base = api_base;
        }
        if let Some(chunk_size) = config.chunk_size {
            settings.chunk_size = chunk_size;
        }
        if let Some(max_length) = config.max_length {
            settings.generation.max_length = max_length;
        }
        if let Some(min_length) = config.min_length {
            settings.generation.min_length = min_length;
        }
        settings
    }
}

/// Per-run values given on the command line; `None` keeps the configured value.
#[derive(Debug, Default)]
pub struct Overrides {
    pub primary_lang: Option<String>,
    pub fallback_lang: Option<String>,
    pub fallback_mode: Option<FallbackMode>,
    pub model: Option<String>,
    pub chunk_size: Option<usize>,
}

impl Settings {
    /// Config file over built-in defaults, then `overrides` over both.
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self> {
        let mut settings = Settings::from(config);
        settings.apply_overrides(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(lang) = overrides.primary_lang {
            self.languages.primary = lang;
        }
        if let Some(lang) = overrides.fallback_lang {
            self.languages.fallback = lang;
        }
        if let Some(mode) = overrides.fallback_mode {
            self.languages.fallback_mode = mode;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(chunk_size) = overrides.chunk_size {
            self.chunk_size = chunk_size;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.generation.min_length > self.generation.max_length {
            return Err(Error::Config(format!(
                "min_length ({}) is greater than max_length ({})",
                self.generation.min_length, self.generation.max_length
            )));
        }
        if self.languages.primary.is_empty() || self.languages.fallback.is_empty() {
            return Err(Error::Config("caption languages must not be empty".to_string()));
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}
