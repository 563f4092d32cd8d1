//! Severity and urgency resolver.

use serde::{Deserialize, Serialize};

use crate::config::UrgencyBands;
use crate::observation::{EventType, Observation};

/// Operational triage tier. Ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band an observation by severity and area, top band first.
///
/// Non-satellite observations are always [`Urgency::Low`].
pub fn resolve_urgency(obs: &Observation, bands: &UrgencyBands) -> Urgency {
    if obs.event_type == EventType::NonSatellite {
        return Urgency::Low;
    }

    let severity = obs.severity_score;
    let area = obs.area_affected_percent;

    if severity >= bands.critical_severity || area >= bands.critical_area {
        Urgency::Critical
    } else if severity >= bands.high_severity || area >= bands.high_area {
        Urgency::High
    } else if severity >= bands.medium_severity || area >= bands.medium_area {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}
