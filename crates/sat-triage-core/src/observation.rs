//! Canonical observation record.
//!
//! An [`Observation`] is what every provider schema variant is reduced to
//! before classification and policy run.

use serde::{Deserialize, Serialize};

/// Event classification for one analysed image.
///
/// Unresolved inputs map to [`EventType::Unknown`]; there is no "missing" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Flood,
    Fire,
    Cyclone,
    Drought,
    TerrainInstability,
    Erosion,
    CommunicationFailure,
    InfrastructureCollapse,
    /// The image is not an overhead or satellite view.
    NonSatellite,
    #[default]
    Unknown,
}

impl EventType {
    /// All variants, in declaration order.
    pub const ALL: [EventType; 10] = [
        EventType::Flood,
        EventType::Fire,
        EventType::Cyclone,
        EventType::Drought,
        EventType::TerrainInstability,
        EventType::Erosion,
        EventType::CommunicationFailure,
        EventType::InfrastructureCollapse,
        EventType::NonSatellite,
        EventType::Unknown,
    ];

    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Fire => "fire",
            Self::Cyclone => "cyclone",
            Self::Drought => "drought",
            Self::TerrainInstability => "terrain_instability",
            Self::Erosion => "erosion",
            Self::CommunicationFailure => "communication_failure",
            Self::InfrastructureCollapse => "infrastructure_collapse",
            Self::NonSatellite => "non_satellite",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a provider-supplied event label.
    ///
    /// Matches canonical names and a handful of common aliases, ignoring case
    /// and treating `-` and spaces like `_`. Returns `None` for anything else,
    /// including `"unknown"`, so callers can fall through to the next source.
    pub fn from_label(label: &str) -> Option<Self> {
        let key = label.trim().to_lowercase().replace(['-', ' '], "_");
        let event = match key.as_str() {
            "flood" | "flooding" => Self::Flood,
            "fire" | "wildfire" => Self::Fire,
            "cyclone" | "hurricane" | "typhoon" => Self::Cyclone,
            "drought" => Self::Drought,
            "terrain_instability" | "landslide" => Self::TerrainInstability,
            "erosion" => Self::Erosion,
            "communication_failure" => Self::CommunicationFailure,
            "infrastructure_collapse" => Self::InfrastructureCollapse,
            "non_satellite" | "nonsatellite" => Self::NonSatellite,
            _ => return None,
        };
        Some(event)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized description of one image.
///
/// `area_affected_percent` and `severity_score` are always within `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub event_type: EventType,
    /// Observed risk indicators, trimmed and deduplicated ignoring case.
    /// Original casing is kept for display.
    pub factors: Vec<String>,
    pub area_affected_percent: f64,
    /// Severity rescaled onto 0-100 from whichever rating scale the provider used.
    pub severity_score: f64,
    pub summary: String,
}

/// Clamp a value into the canonical `[0, 100]` range.
pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
