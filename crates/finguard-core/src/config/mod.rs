mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FinguardError;
use defaults::*;

pub use defaults::DEFAULT_BACKEND_URL;

/// Top-level FinGuard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub finguard: FinguardConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinguardConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily-rolling log files. Empty = stderr only.
    #[serde(default)]
    pub log_dir: String,
}

impl Default for FinguardConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

/// HTTP listener for the analysis proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// External analysis backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which OCR engine extracts text from uploaded images.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrEngineKind {
    /// Local `tesseract` binary (default, no API key needed).
    #[default]
    Tesseract,
    /// OCR.space HTTP API.
    OcrSpace,
}

impl OcrEngineKind {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Tesseract => "tesseract",
            Self::OcrSpace => "ocr_space",
        }
    }
}

/// OCR settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default)]
    pub engine: OcrEngineKind,
    /// Recognition language. Fixed per deployment, not per request.
    #[serde(default = "default_ocr_language")]
    pub language: String,
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// OCR.space API key.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::default(),
            language: default_ocr_language(),
            tesseract_path: default_tesseract_path(),
            api_key: String::new(),
            endpoint: default_ocr_endpoint(),
        }
    }
}

/// Settings for the `check` and `chat` commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, FinguardError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| FinguardError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| FinguardError::Config(format!("failed to parse config: {}", e)))?;

    if config.backend.url.trim().is_empty() {
        return Err(FinguardError::Config("backend.url must not be empty".into()));
    }

    Ok(config)
}
