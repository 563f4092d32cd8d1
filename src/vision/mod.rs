//! Vision-description provider abstraction
//!
//! A provider takes an image and a natural-language instruction and returns
//! free text. Nothing about that text is trusted; the triage engine decides
//! whether it holds a usable JSON object.

mod gemini_client;

use anyhow::Result;
use async_trait::async_trait;

pub use gemini_client::GeminiVisionClient;

/// Instruction sent with every image.
pub const DEFAULT_INSTRUCTION: &str = include_str!("prompts/satellite_analysis.md");

/// Raw image handed to a provider.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Vision provider interface
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Describe `image` following `instruction`. Errors when the provider fails
    /// or returns no text.
    async fn describe(&self, image: &ImageInput, instruction: &str) -> Result<String>;

    /// Model identifier, for logging and health output.
    fn model_name(&self) -> &str;
}
