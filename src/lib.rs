//! Satellite image triage service
//!
//! Wires the pure [`sat_triage_core`] engine to its collaborators: the
//! vision-model provider, temporary image staging, the append-only result
//! log, and the HTTP upload endpoint.
//!
//! ## Request flow
//!
//! ```text
//! upload ──► StagedImage ──► VisionClient ──► TriageEngine ──► Decision
//!                │                                              │
//!                └── removed on drop                 ResultLog ◄┘
//! ```
//!
//! ## Provider selection
//!
//! Only Gemini is built in. Other providers plug in through [`VisionClient`].

pub mod config;
pub mod error;
pub mod service;
pub mod sink;
pub mod upload;
pub mod vision;

#[cfg(feature = "server")]
pub mod api;

pub use config::AppConfig;
pub use error::AppError;
pub use service::AnalysisService;
pub use sink::ResultLog;
pub use upload::StagedImage;
pub use vision::{GeminiVisionClient, ImageInput, VisionClient, DEFAULT_INSTRUCTION};

pub use sat_triage_core::{Decision, EventType, TriageConfig, TriageEngine, Urgency, Verdict};
