//! Result assembler
//!
//! Builds the [`Decision`] returned to callers and the flattened CSV line
//! written by the append-only result log.

use serde::{Deserialize, Serialize};

use crate::observation::{EventType, Observation};
use crate::policy::Verdict;
use crate::urgency::Urgency;

/// Header of the append-only result log.
pub const LOG_HEADER: &str = "filename,event,event_area_percent,severity_rating,verdict,summary";

/// Summary text longer than this is truncated in log lines.
pub const MAX_LOG_SUMMARY_CHARS: usize = 200;

/// Final triage decision for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub event_type: EventType,
    pub urgency: Urgency,
    pub verdict: Verdict,
    /// Normalized severity, rounded to a whole percent.
    pub severity_percent: u8,
    pub area_affected_percent: u8,
    pub factors: Vec<String>,
    pub summary: String,
}

/// Combine the outputs of each stage into a [`Decision`].
pub fn assemble(obs: Observation, urgency: Urgency, verdict: Verdict) -> Decision {
    Decision {
        event_type: obs.event_type,
        urgency,
        verdict,
        severity_percent: round_percent(obs.severity_score),
        area_affected_percent: round_percent(obs.area_affected_percent),
        factors: obs.factors,
        summary: obs.summary,
    }
}

fn round_percent(value: f64) -> u8 {
    // Inputs are already clamped; clamp again so the cast can never wrap.
    value.round().clamp(0.0, 100.0) as u8
}

impl Decision {
    /// Render a single CSV line matching [`LOG_HEADER`].
    ///
    /// Commas and line breaks in free text become spaces, and the summary is
    /// cut to [`MAX_LOG_SUMMARY_CHARS`] characters.
    pub fn log_line(&self, filename: &str) -> String {
        let summary: String = flatten(&self.summary)
            .chars()
            .take(MAX_LOG_SUMMARY_CHARS)
            .collect();
        format!(
            "{},{},{},{},{},{}",
            flatten(filename),
            self.event_type,
            self.area_affected_percent,
            self.severity_percent,
            self.verdict,
            summary.trim_end()
        )
    }
}

fn flatten(text: &str) -> String {
    text.replace(['\r', '\n', ','], " ").trim().to_string()
}
