//! Research-worthiness policy
//!
//! One ordered rule list replaces the per-prompt verdict rules. Verdicts are
//! binary; the three-way "worth research with caution" value some prompts
//! emitted is not produced.

use serde::{Deserialize, Serialize};

use crate::config::PolicyThresholds;
use crate::observation::{EventType, Observation};
use crate::urgency::Urgency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    WorthResearch,
    NotWorthResearch,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorthResearch => "WORTH_RESEARCH",
            Self::NotWorthResearch => "NOT_WORTH_RESEARCH",
        }
    }

    pub fn is_worth_research(&self) -> bool {
        matches!(self, Self::WorthResearch)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether an observation is worth research. Rules run top-down and
/// the first one that applies decides.
pub fn decide(obs: &Observation, urgency: Urgency, thresholds: &PolicyThresholds) -> Verdict {
    let severity = obs.severity_score;
    let area = obs.area_affected_percent;

    if obs.event_type == EventType::NonSatellite {
        return Verdict::NotWorthResearch;
    }
    if urgency == Urgency::Critical {
        return Verdict::WorthResearch;
    }
    if severity >= thresholds.research_severity || area >= thresholds.research_area {
        return Verdict::WorthResearch;
    }
    if severity < thresholds.negligible
        && area < thresholds.negligible
        && obs.event_type == EventType::Unknown
    {
        return Verdict::NotWorthResearch;
    }

    match urgency {
        Urgency::High | Urgency::Medium => Verdict::WorthResearch,
        Urgency::Low | Urgency::Critical => Verdict::NotWorthResearch,
    }
}
