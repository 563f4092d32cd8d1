//! Threshold configuration
//!
//! Defaults are the reference bands. A rules file may override any subset:
//!
//! ```yaml
//! urgency:
//!   critical_severity: 85
//! policy:
//!   research_area: 45
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Band thresholds for urgency. A band matches when severity OR area reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyBands {
    pub critical_severity: f64,
    pub critical_area: f64,
    pub high_severity: f64,
    pub high_area: f64,
    pub medium_severity: f64,
    pub medium_area: f64,
}

impl Default for UrgencyBands {
    fn default() -> Self {
        Self {
            critical_severity: 90.0,
            critical_area: 70.0,
            high_severity: 70.0,
            high_area: 50.0,
            medium_severity: 40.0,
            medium_area: 30.0,
        }
    }
}

/// Thresholds used by the research-worthiness policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyThresholds {
    /// Severity at or above which an observation is always worth research.
    pub research_severity: f64,
    /// Area at or above which an observation is always worth research.
    pub research_area: f64,
    /// Below this severity and area, an unclassified observation is dismissed.
    pub negligible: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            research_severity: 60.0,
            research_area: 50.0,
            negligible: 20.0,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub urgency: UrgencyBands,
    pub policy: PolicyThresholds,
}

impl TriageConfig {
    /// Parse and validate a YAML rules document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML rules file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let u = &self.urgency;
        let p = &self.policy;
        let named = [
            ("urgency.critical_severity", u.critical_severity),
            ("urgency.critical_area", u.critical_area),
            ("urgency.high_severity", u.high_severity),
            ("urgency.high_area", u.high_area),
            ("urgency.medium_severity", u.medium_severity),
            ("urgency.medium_area", u.medium_area),
            ("policy.research_severity", p.research_severity),
            ("policy.research_area", p.research_area),
            ("policy.negligible", p.negligible),
        ];
        for (name, value) in named {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }

        if u.critical_severity < u.high_severity || u.high_severity < u.medium_severity {
            return Err(ConfigError::BandOrder("severity"));
        }
        if u.critical_area < u.high_area || u.high_area < u.medium_area {
            return Err(ConfigError::BandOrder("area"));
        }
        Ok(())
    }
}
