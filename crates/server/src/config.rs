//! Server configuration: optional TOML file, then environment overrides.

use std::path::{Path, PathBuf};

use expiry_ocr::{KeywordError, KeywordSet};
use serde::Deserialize;
use thiserror::Error;

/// Env var naming the TOML config file.
pub const CONFIG_PATH_VAR: &str = "EXPIRY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
    #[error("Invalid keyword vocabulary: {0}")]
    Keywords(#[from] KeywordError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    pub data_path: Option<String>,
    pub lang: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self { data_path: None, lang: "eng".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// Replaces the built-in keyword vocabulary when set.
    pub keywords: Option<Vec<String>>,
    /// Appended to the vocabulary in use.
    pub extra_keywords: Vec<String>,
    pub tesseract: TesseractConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5002,
            max_upload_bytes: 10 * 1024 * 1024,
            keywords: None,
            extra_keywords: Vec::new(),
            tesseract: TesseractConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|var| std::env::var(var).ok())
    }

    /// Load using `env` as the variable source (useful for testing).
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match env(CONFIG_PATH_VAR).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(host) = env("HOST").filter(|h| !h.is_empty()) {
            config.host = host;
        }
        if let Some(port) = env("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { var: "PORT", value: port.clone() })?;
        }
        if let Some(limit) = env("EXPIRY_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = limit.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "EXPIRY_MAX_UPLOAD_BYTES",
                value: limit.clone(),
            })?;
        }

        // Surface a bad vocabulary at startup, not on the first request.
        config.keyword_set()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn keyword_set(&self) -> Result<KeywordSet, ConfigError> {
        let set = match &self.keywords {
            Some(base) => KeywordSet::new(base.iter().chain(&self.extra_keywords).cloned())?,
            None if self.extra_keywords.is_empty() => KeywordSet::default(),
            None => KeywordSet::extended(self.extra_keywords.iter().cloned())?,
        };
        Ok(set)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
