//! Gemini Client
//!
//! Vision client for the Google Generative Language `generateContent` API.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use super::{ImageInput, VisionClient};
use crate::config::DEFAULT_MODEL;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client
#[derive(Clone)]
pub struct GeminiVisionClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl GeminiVisionClient {
    /// Create a new client for the default model
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create with a specific model
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body(image: &ImageInput, instruction: &str) -> serde_json::Value {
        let data = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        serde_json::json!({
            "contents": [{
                "parts": [
                    {"text": instruction},
                    {"inline_data": {"mime_type": &image.mime_type, "data": data}}
                ]
            }]
        })
    }
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Concatenated text of the first candidate, trimmed.
fn response_text(response: ApiResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(anyhow!("Gemini returned no text"));
    }
    Ok(text.to_string())
}

#[async_trait]
impl VisionClient for GeminiVisionClient {
    async fn describe(&self, image: &ImageInput, instruction: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&Self::request_body(image, instruction))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, body));
        }

        let api_response: ApiResponse = response.json().await?;
        response_text(api_response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_inline_image() {
        let image = ImageInput {
            bytes: vec![0xff, 0xd8, 0xff],
            mime_type: "image/jpeg".into(),
        };
        let body = GeminiVisionClient::request_body(&image, "describe");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "describe");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "/9j/");
    }

    #[test]
    fn joins_text_parts() {
        let response: ApiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "```json\n{"}, {"text": "}\n```"}]}}]
        }))
        .unwrap();
        assert_eq!(response_text(response).unwrap(), "```json\n{}\n```");
    }

    #[test]
    fn empty_response_is_an_error() {
        let response: ApiResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        assert!(response_text(response).is_err());

        let response: ApiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}]
        }))
        .unwrap();
        assert!(response_text(response).is_err());
    }

    #[test]
    fn model_and_base_url() {
        let client = GeminiVisionClient::with_model("k".into(), "gemini-pro-vision")
            .with_base_url("http://localhost:9000/");
        assert_eq!(client.model_name(), "gemini-pro-vision");
        assert_eq!(client.base_url, "http://localhost:9000");
        assert_eq!(GeminiVisionClient::new("k".into()).model_name(), DEFAULT_MODEL);
    }
}
