//! Schema normalizer
//!
//! Provider prompts have drifted over time, so the same quantity arrives under
//! different keys and on different scales. Each canonical field has an ordered
//! list of source keys; the first key holding a usable value wins. New source
//! names are added to these tables, not to callers.
//!
//! Normalization never fails: missing or malformed fields fall back to defaults.

use serde_json::Value;

use crate::classifier::{classify, signals_non_satellite};
use crate::observation::{clamp_percent, EventType, Observation};
use crate::parser::ParsedJson;

/// Keys carrying an explicit event label.
const EVENT_TYPE_KEYS: &[&str] = &["eventType", "event_type"];

/// Keys carrying a free-text event description.
const EVENT_TEXT_KEYS: &[&str] = &["event"];

/// Keywords searched for in free-text event descriptions, in priority order.
const EVENT_TEXT_KEYWORDS: &[(EventType, &str)] = &[
    (EventType::Flood, "flood"),
    (EventType::Fire, "fire"),
    (EventType::Cyclone, "cyclone"),
    (EventType::Drought, "drought"),
];

const AREA_KEYS: &[&str] = &[
    "areaAffectedPercent",
    "area_affected_percent",
    "event_area_percent",
    "severity_percent",
];

const FACTOR_KEYS: &[&str] = &["factors"];

const SUMMARY_KEYS: &[&str] = &["summary"];

/// A severity source key and the top of its rating scale.
struct RatingSource {
    key: &'static str,
    max_scale: f64,
}

const SEVERITY_SOURCES: &[RatingSource] = &[
    RatingSource {
        key: "severityScore",
        max_scale: 100.0,
    },
    RatingSource {
        key: "intensity_rating",
        max_scale: 10.0,
    },
    RatingSource {
        key: "severity_rating",
        max_scale: 5.0,
    },
];

/// Scale of the severity derived from area when no rating is present
/// (`area / 20`, i.e. 0-5).
const DERIVED_SEVERITY_DIVISOR: f64 = 20.0;
const DERIVED_SEVERITY_SCALE: f64 = 5.0;

/// Map a parsed provider object onto the canonical [`Observation`].
pub fn normalize(parsed: &ParsedJson) -> Observation {
    let factors = resolve_factors(parsed);
    let explicit = resolve_event_type(parsed);
    let event_type = classify(explicit, &factors);

    let area_affected_percent = first_numeric(parsed, AREA_KEYS)
        .map(|(key, value)| {
            tracing::debug!(key, value, "area resolved");
            clamp_percent(value)
        })
        .unwrap_or(0.0);

    let severity_score = SEVERITY_SOURCES
        .iter()
        .find_map(|source| {
            parsed.get(source.key).and_then(numeric).map(|rating| {
                tracing::debug!(key = source.key, rating, scale = source.max_scale, "severity resolved");
                rating * (100.0 / source.max_scale)
            })
        })
        .unwrap_or_else(|| {
            let rating = area_affected_percent / DERIVED_SEVERITY_DIVISOR;
            rating * (100.0 / DERIVED_SEVERITY_SCALE)
        });

    let summary = SUMMARY_KEYS
        .iter()
        .find_map(|key| parsed.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    Observation {
        event_type,
        factors,
        area_affected_percent,
        severity_score: clamp_percent(severity_score),
        summary,
    }
}

/// Explicit event type from labels or free-text descriptions, before factor
/// inference. Any non-satellite signal among these fields wins outright.
fn resolve_event_type(parsed: &ParsedJson) -> EventType {
    let signals: Vec<&str> = EVENT_TYPE_KEYS
        .iter()
        .chain(EVENT_TEXT_KEYS)
        .filter_map(|key| parsed.get(*key).and_then(Value::as_str))
        .collect();
    if signals.iter().any(|s| signals_non_satellite(s)) {
        return EventType::NonSatellite;
    }

    let labelled = EVENT_TYPE_KEYS
        .iter()
        .filter_map(|key| parsed.get(*key).and_then(Value::as_str))
        .find_map(EventType::from_label);
    if let Some(event) = labelled {
        return event;
    }

    EVENT_TEXT_KEYS
        .iter()
        .filter_map(|key| parsed.get(*key).and_then(Value::as_str))
        .find_map(|text| {
            let text = text.to_lowercase();
            EVENT_TEXT_KEYWORDS
                .iter()
                .find(|(_, keyword)| text.contains(keyword))
                .map(|(event, _)| *event)
        })
        .unwrap_or(EventType::Unknown)
}

/// Factor strings, trimmed and deduplicated ignoring case. A bare string is
/// accepted as a single factor; non-string entries are skipped.
fn resolve_factors(parsed: &ParsedJson) -> Vec<String> {
    let raw: Vec<&str> = match FACTOR_KEYS.iter().find_map(|key| parsed.get(*key)) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(single)) => vec![single.as_str()],
        _ => Vec::new(),
    };

    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .filter(|f| seen.insert(f.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn first_numeric(parsed: &ParsedJson, keys: &[&'static str]) -> Option<(&'static str, f64)> {
    keys.iter()
        .find_map(|key| parsed.get(*key).and_then(numeric).map(|v| (*key, v)))
}

/// A finite number, or a string holding one (optionally suffixed with `%`).
fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
