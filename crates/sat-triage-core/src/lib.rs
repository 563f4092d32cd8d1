//! Observation normalization and triage decisions for satellite imagery.
//!
//! A vision model describes an image in loosely structured text. This crate
//! turns that text into a stable, reproducible [`Decision`]: what kind of
//! event it is, how urgent, and whether it is worth further research.
//!
//! # Architecture
//!
//! ```text
//! RawModelText ──► parser ──► normalizer ──► classifier
//!                                                 │
//!                     ┌───────────────────────────┘
//!                     ▼
//!                  urgency ──► policy ──► decision (Decision + log line)
//! ```
//!
//! Every stage is a pure function of its input. Nothing is cached between
//! calls, so a single [`TriageEngine`] can be shared across threads.
//!
//! # Example
//!
//! ```
//! use sat_triage_core::{TriageEngine, Urgency, Verdict};
//!
//! let engine = TriageEngine::default();
//! let raw = "```json\n{\"event_type\":\"fire\",\"area_affected_percent\":75,\"intensity_rating\":9.5}\n```";
//! let decision = engine.evaluate(raw).unwrap();
//! assert_eq!(decision.urgency, Urgency::Critical);
//! assert_eq!(decision.verdict, Verdict::WorthResearch);
//! ```

pub mod classifier;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod observation;
pub mod parser;
pub mod policy;
pub mod urgency;

pub use classifier::classify;
pub use config::{PolicyThresholds, TriageConfig, UrgencyBands};
pub use decision::{assemble, Decision, LOG_HEADER, MAX_LOG_SUMMARY_CHARS};
pub use engine::TriageEngine;
pub use error::{ConfigError, ParseError};
pub use normalizer::normalize;
pub use observation::{EventType, Observation};
pub use parser::{parse_observation_text, ParsedJson};
pub use policy::{decide, Verdict};
pub use urgency::{resolve_urgency, Urgency};
