//! Service configuration from environment variables.
//!
//! `.env` is honoured when present. Engine thresholds come from an optional
//! YAML rules file (`TRIAGE_RULES_PATH`), otherwise the reference defaults.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use sat_triage_core::TriageConfig;

/// Default listen port
const DEFAULT_PORT: u16 = 10000;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_RESULT_LOG: &str = "analysis_log.csv";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api_key: Option<String>,
    pub model: String,
    pub upload_dir: PathBuf,
    /// `None` disables the result log.
    pub result_log_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub triage: TriageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            result_log_path: Some(PathBuf::from(DEFAULT_RESULT_LOG)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            triage: TriageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT '{}'", raw))?,
            None => defaults.port,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid MAX_UPLOAD_BYTES '{}'", raw))?,
            None => defaults.max_upload_bytes,
        };

        let result_log_path = match lookup("RESULT_LOG_PATH") {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(PathBuf::from(raw)),
            None => defaults.result_log_path,
        };

        let triage = match lookup("TRIAGE_RULES_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => TriageConfig::from_file(&path)
                .with_context(|| format!("failed to load triage rules from {}", path))?,
            None => defaults.triage,
        };

        Ok(Self {
            port,
            api_key: lookup("GOOGLE_API_KEY").filter(|k| !k.trim().is_empty()),
            model: lookup("VISION_MODEL").unwrap_or(defaults.model),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            result_log_path,
            max_upload_bytes,
            triage,
        })
    }

    /// The provider API key, required to serve requests.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("GOOGLE_API_KEY environment variable not set"))
    }
}
