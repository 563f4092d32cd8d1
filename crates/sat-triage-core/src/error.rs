//! Error types for the triage engine.

use thiserror::Error;

/// Failure to recover a JSON object from raw model text.
///
/// Always surfaced to the caller. A missing observation is never defaulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `{...}` span exists in the text.
    #[error("no valid JSON object found")]
    NoJsonObject,

    /// A candidate span exists but does not decode as a JSON object.
    #[error("no valid JSON object found: {0}")]
    InvalidJson(String),
}

/// Invalid threshold configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("threshold '{name}' must be within [0, 100], got {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("urgency bands must not increase from CRITICAL to MEDIUM ({0})")]
    BandOrder(&'static str),

    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rules YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
