//! Triage engine
//!
//! Chains parser, normalizer, urgency resolver, policy and assembler. The
//! classifier runs inside normalization.

use crate::config::TriageConfig;
use crate::decision::{assemble, Decision};
use crate::error::ParseError;
use crate::normalizer::normalize;
use crate::observation::Observation;
use crate::parser::{parse_observation_text, ParsedJson};
use crate::policy::decide;
use crate::urgency::resolve_urgency;

/// Stateless triage engine. Holds only its thresholds, so it is cheap to
/// clone and safe to share between concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
    config: TriageConfig,
}

impl TriageEngine {
    pub fn new(config: TriageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Evaluate raw provider text. Fails only if no JSON object can be recovered.
    pub fn evaluate(&self, raw: &str) -> Result<Decision, ParseError> {
        let parsed = parse_observation_text(raw).map_err(|e| {
            tracing::debug!(error = %e, chars = raw.chars().count(), "model text rejected");
            e
        })?;
        Ok(self.evaluate_parsed(&parsed))
    }

    /// Evaluate an already-extracted JSON object.
    pub fn evaluate_parsed(&self, parsed: &ParsedJson) -> Decision {
        self.evaluate_observation(normalize(parsed))
    }

    /// Run urgency, policy and assembly on a canonical observation.
    pub fn evaluate_observation(&self, obs: Observation) -> Decision {
        let urgency = resolve_urgency(&obs, &self.config.urgency);
        let verdict = decide(&obs, urgency, &self.config.policy);
        tracing::debug!(
            event_type = %obs.event_type,
            severity = obs.severity_score,
            area = obs.area_affected_percent,
            %urgency,
            %verdict,
            "observation triaged"
        );
        assemble(obs, urgency, verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::EventType;
    use crate::policy::Verdict;
    use crate::urgency::Urgency;

    #[test]
    fn evaluates_fenced_legacy_output() {
        let raw = "```json\n{\"event\":\"flood\",\"event_area_percent\":80,\"severity_rating\":5,\"summary\":\"x\"}\n```";
        let decision = TriageEngine::default().evaluate(raw).unwrap();
        assert_eq!(decision.event_type, EventType::Flood);
        assert_eq!(decision.urgency, Urgency::Critical);
        assert_eq!(decision.verdict, Verdict::WorthResearch);
        assert_eq!(decision.severity_percent, 100);
        assert_eq!(decision.summary, "x");
    }

    #[test]
    fn parse_failure_surfaces() {
        let err = TriageEngine::default().evaluate("I cannot analyse this image.");
        assert_eq!(err, Err(ParseError::NoJsonObject));
    }

    #[test]
    fn thresholds_come_from_config() {
        let mut config = TriageConfig::default();
        config.urgency.medium_area = 10.0;
        let engine = TriageEngine::new(config);
        assert_eq!(engine.config().urgency.medium_area, 10.0);
        let decision = engine
            .evaluate(r#"{"event_type": "drought", "area_affected_percent": 12, "intensity_rating": 1}"#)
            .unwrap();
        assert_eq!(decision.urgency, Urgency::Medium);
        assert_eq!(decision.verdict, Verdict::WorthResearch);
    }
}
