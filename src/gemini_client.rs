//! Google Gemini API client for prompt and image generation
//!
//! Thin wrapper around the Gemini generateContent endpoint. Three
//! operations cross this boundary: image-to-prompt generation, per-card
//! prompt regeneration, and prompt-to-image generation. Everything the
//! upstream service can do wrong is folded into [`GenerationError`].

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::options::{AspectRatio, GenerationOptions, PromptStyle, PromptTone, SourceImage};
use crate::prompts;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_PROMPT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the generation boundary
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Gemini API key is not configured")]
    MissingCredential,

    #[error("Gemini API request failed: {0}")]
    Request(String),

    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse Gemini response: {0}")]
    Parse(String),

    #[error("Gemini response contained no {0}")]
    EmptyResponse(&'static str),
}

/// The generation boundary the orchestrator depends on.
///
/// [`GeminiClient`] is the production implementation; tests substitute
/// stubs to simulate latency and failure.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    /// Turn one image plus the shared option set into a prompt string
    async fn generate_prompt_for_image(
        &self,
        image: &SourceImage,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;

    /// Reword one existing prompt, preserving its subject
    async fn regenerate_prompt(
        &self,
        existing: &str,
        style: PromptStyle,
        tone: PromptTone,
    ) -> Result<String, GenerationError>;

    /// Turn a prompt into a base64 PNG payload
    async fn generate_image_for_prompt(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String, GenerationError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    prompt_model: String,
    image_model: String,
}

// -- Response types --

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponsePart {
    inline_data: Option<GeminiInlineData>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    #[allow(dead_code)]
    mime_type: String,
    data: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Result<Self, GenerationError> {
        Self::with_models(
            api_key,
            DEFAULT_PROMPT_MODEL,
            DEFAULT_IMAGE_MODEL,
            DEFAULT_TIMEOUT,
        )
    }

    /// Build a client from configuration, resolving the credential
    /// (environment first) before any network attempt
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let api_key = config
            .resolve_api_key()
            .ok_or(GenerationError::MissingCredential)?;
        Self::with_models(
            &api_key,
            &config.prompt_model,
            &config.image_model,
            config.request_timeout(),
        )
    }

    pub fn with_models(
        api_key: &str,
        prompt_model: &str,
        image_model: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            prompt_model: prompt_model.to_string(),
            image_model: image_model.to_string(),
        })
    }

    pub fn build_prompt_request_body(
        image_base64: &str,
        mime_type: &str,
        instruction: &str,
    ) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": mime_type,
                            "data": image_base64
                        }
                    },
                    {"text": instruction}
                ]
            }]
        })
    }

    pub fn build_text_request_body(instruction: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "parts": [{"text": instruction}]
            }]
        })
    }

    pub fn build_image_request_body(prompt: &str, aspect_ratio: AspectRatio) -> serde_json::Value {
        let mut body = serde_json::json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "responseModalities": ["IMAGE"]
            }
        });
        // Auto leaves the ratio to the model
        if aspect_ratio != AspectRatio::Auto {
            body["generationConfig"]["imageConfig"] =
                serde_json::json!({ "aspectRatio": aspect_ratio.tag() });
        }
        body
    }

    pub fn extract_text(response: &GeminiResponse) -> Option<String> {
        response
            .candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.text.as_ref()))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Truncate an upstream error body to avoid leaking sensitive data.
    /// Error messages can be localized or quote user content, so the cut
    /// must land on a char boundary, never a fixed byte offset.
    fn truncate_error_body(body: &str) -> &str {
        body.char_indices()
            .nth(200)
            .map_or(body, |(index, _)| &body[..index])
    }

    pub fn extract_image_base64(response: &GeminiResponse) -> Option<String> {
        response
            .candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.inline_data.as_ref()))
            .map(|d| d.data.clone())
    }

    async fn post_generate(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<GeminiResponse, GenerationError> {
        let url = format!("{}/{}:generateContent", GEMINI_ENDPOINT, model);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(
                "x-goog-api-key",
                HeaderValue::from_str(&self.api_key)
                    .map_err(|e| GenerationError::Request(format!("Invalid API key header: {}", e)))?,
            )
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: Self::truncate_error_body(&error_body).to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PromptGenerator for GeminiClient {
    async fn generate_prompt_for_image(
        &self,
        image: &SourceImage,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let instruction = prompts::image_prompt(options);
        let body =
            Self::build_prompt_request_body(&image.base64_data(), &image.mime_type, &instruction);

        info!(
            image_bytes = image.data.len(),
            mime_type = %image.mime_type,
            style = %options.style.name(),
            "Gemini prompt generation"
        );

        let response = self.post_generate(&self.prompt_model, &body).await?;
        Self::extract_text(&response).ok_or(GenerationError::EmptyResponse("prompt text"))
    }

    async fn regenerate_prompt(
        &self,
        existing: &str,
        style: PromptStyle,
        tone: PromptTone,
    ) -> Result<String, GenerationError> {
        let instruction = prompts::regenerate_prompt(existing, style, tone);
        let body = Self::build_text_request_body(&instruction);

        info!(
            prompt_chars = existing.len(),
            style = %style.name(),
            tone = %tone.name(),
            "Gemini prompt regeneration"
        );

        let response = self.post_generate(&self.prompt_model, &body).await?;
        Self::extract_text(&response).ok_or(GenerationError::EmptyResponse("prompt text"))
    }

    async fn generate_image_for_prompt(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String, GenerationError> {
        let body = Self::build_image_request_body(prompt, aspect_ratio);

        info!(
            prompt_chars = prompt.len(),
            aspect_ratio = %aspect_ratio.tag(),
            "Gemini image generation"
        );

        let response = self.post_generate(&self.image_model, &body).await?;
        Self::extract_image_base64(&response).ok_or(GenerationError::EmptyResponse("image data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_request_body() {
        let body = GeminiClient::build_prompt_request_body("aGVsbG8=", "image/png", "Describe");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert_eq!(parts[1]["text"], "Describe");
    }

    #[test]
    fn test_build_image_request_body_fixed_ratio() {
        let body = GeminiClient::build_image_request_body("A knight", AspectRatio::Landscape);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "A knight");
        assert_eq!(body["generationConfig"]["responseModalities"][0], "IMAGE");
        assert_eq!(
            body["generationConfig"]["imageConfig"]["aspectRatio"],
            "4:3"
        );
    }

    #[test]
    fn test_build_image_request_body_auto_omits_ratio() {
        let body = GeminiClient::build_image_request_body("A knight", AspectRatio::Auto);
        assert!(body["generationConfig"]["imageConfig"].is_null());
    }

    #[test]
    fn test_extract_text_valid() {
        let response_json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "  A lone lighthouse at dusk --ar 16:9  "
                    }]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(response_json).unwrap();
        assert_eq!(
            GeminiClient::extract_text(&response),
            Some("A lone lighthouse at dusk --ar 16:9".to_string())
        );
    }

    #[test]
    fn test_extract_text_no_text_part() {
        let response_json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": "image/png",
                            "data": "iVBORw0KGgo="
                        }
                    }]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(response_json).unwrap();
        assert!(GeminiClient::extract_text(&response).is_none());
    }

    #[test]
    fn test_extract_text_blank_text_counts_as_empty() {
        let response_json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "   " }] }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(response_json).unwrap();
        assert!(GeminiClient::extract_text(&response).is_none());
    }

    #[test]
    fn test_extract_image_base64_valid() {
        let response_json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": "image/png",
                            "data": "iVBORw0KGgo="
                        }
                    }]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(response_json).unwrap();
        assert_eq!(
            GeminiClient::extract_image_base64(&response),
            Some("iVBORw0KGgo=".to_string())
        );
    }

    #[test]
    fn test_extract_image_base64_no_image() {
        let response_json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "I cannot generate that image"
                    }]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(response_json).unwrap();
        assert!(GeminiClient::extract_image_base64(&response).is_none());
    }

    #[test]
    fn test_parse_response_empty_candidates() {
        let response_json = serde_json::json!({ "candidates": [] });
        let response: GeminiResponse = serde_json::from_value(response_json).unwrap();
        assert!(GeminiClient::extract_text(&response).is_none());
        assert!(GeminiClient::extract_image_base64(&response).is_none());
    }

    #[test]
    fn test_truncate_error_body_respects_char_boundaries() {
        // 150 chars but 300 bytes: under the cap, passed through whole
        let short = "é".repeat(150);
        assert_eq!(GeminiClient::truncate_error_body(&short), short);

        // Over the cap: cut to 200 chars, never mid-character
        let long = "é".repeat(250);
        let truncated = GeminiClient::truncate_error_body(&long);
        assert_eq!(truncated.chars().count(), 200);
        assert!(long.starts_with(truncated));
    }

    #[test]
    fn test_truncate_error_body_ascii() {
        let body = "x".repeat(500);
        assert_eq!(GeminiClient::truncate_error_body(&body).len(), 200);
        assert_eq!(GeminiClient::truncate_error_body("short"), "short");
    }

    #[test]
    fn test_new_empty_api_key() {
        let result = GeminiClient::new("");
        assert!(matches!(result, Err(GenerationError::MissingCredential)));
    }

    #[test]
    fn test_new_valid_api_key() {
        let result = GeminiClient::new("test-key-123");
        assert!(result.is_ok());
    }

    #[test]
    fn test_from_config_without_credential() {
        let config = Config::default();
        if std::env::var(crate::config::GEMINI_API_KEY_ENV).is_err() {
            let result = GeminiClient::from_config(&config);
            assert!(matches!(result, Err(GenerationError::MissingCredential)));
        }
    }
}
