//! Analysis service: provider call, triage, result log.

use std::sync::Arc;

use sat_triage_core::{Decision, TriageEngine};

use crate::error::AppError;
use crate::sink::ResultLog;
use crate::upload::StagedImage;
use crate::vision::{VisionClient, DEFAULT_INSTRUCTION};

pub struct AnalysisService {
    vision: Arc<dyn VisionClient>,
    engine: TriageEngine,
    instruction: String,
    result_log: Option<ResultLog>,
}

impl AnalysisService {
    pub fn new(vision: Arc<dyn VisionClient>, engine: TriageEngine) -> Self {
        Self {
            vision,
            engine,
            instruction: DEFAULT_INSTRUCTION.to_string(),
            result_log: None,
        }
    }

    pub fn with_result_log(mut self, log: ResultLog) -> Self {
        self.result_log = Some(log);
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn model_name(&self) -> &str {
        self.vision.model_name()
    }

    /// Analyse one staged image. The provider is called once; a parse
    /// failure is returned as-is for the caller to report.
    pub async fn analyze(&self, image: &StagedImage) -> Result<Decision, AppError> {
        let input = image.load().await?;

        let raw = self
            .vision
            .describe(&input, &self.instruction)
            .await
            .map_err(AppError::Upstream)?;
        tracing::debug!(chars = raw.len(), model = self.vision.model_name(), "provider responded");

        let decision = self.engine.evaluate(&raw)?;
        tracing::info!(
            filename = image.filename(),
            event_type = %decision.event_type,
            urgency = %decision.urgency,
            verdict = %decision.verdict,
            worth_research = decision.verdict.is_worth_research(),
            "image analysed"
        );

        if let Some(log) = &self.result_log {
            if let Err(e) = log.append(image.filename(), &decision).await {
                tracing::warn!("Failed to append to result log {}: {}", log.path().display(), e);
            }
        }

        Ok(decision)
    }
}
