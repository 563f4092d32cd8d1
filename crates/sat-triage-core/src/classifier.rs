//! Factor classifier
//!
//! Derives a single [`EventType`] from free-text risk factors. The keyword
//! table is ordered: when several categories match, the earliest row wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::observation::EventType;

/// Category keywords in priority order. Matching is a case-insensitive
/// substring test against each factor.
pub const CATEGORY_KEYWORDS: &[(EventType, &str)] = &[
    (EventType::Flood, "flood"),
    (EventType::Fire, "fire"),
    (EventType::Cyclone, "cyclone"),
    (EventType::TerrainInstability, "terrain"),
    (EventType::Erosion, "erosion"),
    (EventType::CommunicationFailure, "communication"),
    (EventType::InfrastructureCollapse, "infrastructure"),
];

/// Markers that the image is not an overhead view. A marker matches when its
/// words appear consecutively in a signal split on anything that is not a
/// letter or digit, so `non_satellite_image` and `Human face` match while
/// `surface water` does not.
pub const NON_SATELLITE_MARKERS: &[&str] = &[
    "non satellite",
    "nonsatellite",
    "not satellite",
    "not a satellite",
    "face",
    "faces",
    "document",
    "documents",
    "indoor",
    "indoors",
];

static WORD_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("word split pattern is valid"));

fn words(text: &str) -> Vec<String> {
    WORD_SPLIT_RE
        .split(&text.to_lowercase())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

static MARKER_WORDS: Lazy<Vec<Vec<String>>> =
    Lazy::new(|| NON_SATELLITE_MARKERS.iter().map(|m| words(m)).collect());

/// True if `signal` says the image is not a satellite or overhead view.
pub fn signals_non_satellite(signal: &str) -> bool {
    let signal = words(signal);
    MARKER_WORDS.iter().any(|marker| {
        !marker.is_empty() && signal.windows(marker.len()).any(|w| w == marker.as_slice())
    })
}

/// Resolve the event type for an observation.
///
/// A non-satellite signal in any factor or in `explicit` wins over everything.
/// Otherwise an explicit, known event type is returned unchanged, and only
/// then are factors scanned against [`CATEGORY_KEYWORDS`].
pub fn classify<S: AsRef<str>>(explicit: EventType, factors: &[S]) -> EventType {
    if explicit == EventType::NonSatellite
        || factors.iter().any(|f| signals_non_satellite(f.as_ref()))
    {
        return EventType::NonSatellite;
    }

    if !explicit.is_unknown() {
        return explicit;
    }

    let keys: Vec<String> = factors.iter().map(|f| f.as_ref().to_lowercase()).collect();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keyword)| keys.iter().any(|k| k.contains(keyword)))
        .map(|(event, _)| *event)
        .unwrap_or(EventType::Unknown)
}
