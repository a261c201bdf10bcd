//! The remote vision capability behind a narrow trait.
//!
//! The pipeline treats the AI service as an opaque request/response
//! collaborator: one method per capability, nothing else. This keeps the
//! orchestration in [`crate::controller`] testable with a substitute
//! implementation ([`MockVisionProvider`]) and lets a different backend be
//! plugged in without touching pipeline logic.
//!
//! [`GeminiProvider`] implements the trait against the
//! `models/{model}:generateContent` REST contract:
//!
//! * **extraction** — an inline base64 image part plus the extraction
//!   instruction; the reply's text parts are the extracted text.
//! * **structured generation** — a text prompt plus a JSON response schema in
//!   the generation config; the reply's text is a JSON payload matching the
//!   schema.

use crate::config::PipelineConfig;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// An encoded image ready for transport: base64 payload + media type.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Base64-encoded image bytes (no data-URI prefix).
    pub data: String,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
}

/// One method per remote capability (see the module docs).
///
/// Implementations must be `Send + Sync`; the trait is object-safe so the
/// controller can hold an `Arc<dyn VisionProvider>`.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Extract all legible text from the image. Returns the raw (untrimmed)
    /// text; the extraction client owns trimming and empty-text handling.
    async fn extract_text(&self, image: &EncodedImage) -> Result<String, ProviderError>;

    /// Generate a JSON payload matching `schema` from the prompt.
    /// Returns the raw JSON text; parsing and validation happen upstream.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<String, ProviderError>;
}

// ── Gemini REST implementation ───────────────────────────────────────────

/// Provider backed by the Gemini generateContent REST endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_output_tokens: usize,
    timeout_secs: u64,
}

impl GeminiProvider {
    /// Build a provider from the pipeline config.
    ///
    /// The API key comes from the config or, failing that, `GEMINI_API_KEY` —
    /// the single externally supplied credential the pipeline uses.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ProviderError> {
        let api_key = match config.api_key.clone() {
            Some(k) if !k.is_empty() => k,
            _ => std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .ok_or(ProviderError::MissingApiKey)?,
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout_secs: config.api_timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn call(&self, request: &GenerateContentRequest<'_>) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    ProviderError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let text = parsed.text();
        debug!("Provider returned {} bytes of text", text.len());
        Ok(text)
    }
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    async fn extract_text(&self, image: &EncodedImage) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_image(&image.mime_type, &image.data),
                    Part::text(crate::prompts::EXTRACT_INSTRUCTION),
                ],
            }],
            generation_config: None,
        };
        self.call(&request).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema.clone(),
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            }),
        };
        self.call(&request).await
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
enum Part<'a> {
    #[serde(rename = "text")]
    Text(&'a str),
    #[serde(rename = "inlineData", rename_all = "camelCase")]
    InlineData { mime_type: &'a str, data: &'a str },
}

impl<'a> Part<'a> {
    fn text(s: &'a str) -> Self {
        Part::Text(s)
    }

    fn inline_image(mime_type: &'a str, data: &'a str) -> Self {
        Part::InlineData { mime_type, data }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: Value,
    temperature: f32,
    max_output_tokens: usize,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

// ── Mock provider for tests ──────────────────────────────────────────────

/// Canned-response provider so the orchestration can be exercised without a
/// network.
pub struct MockVisionProvider {
    extract_response: Result<String, ProviderError>,
    generate_response: Result<String, ProviderError>,
}

impl MockVisionProvider {
    /// Succeeds both capabilities with the given payloads.
    pub fn new(
        extract_response: impl Into<String>,
        generate_response: impl Into<String>,
    ) -> Self {
        Self {
            extract_response: Ok(extract_response.into()),
            generate_response: Ok(generate_response.into()),
        }
    }

    /// Fail extraction with the given error.
    pub fn failing_extract(error: ProviderError) -> Self {
        Self {
            extract_response: Err(error),
            generate_response: Ok(String::new()),
        }
    }

    /// Fail structured generation with the given error.
    pub fn failing_generate(extract_response: impl Into<String>, error: ProviderError) -> Self {
        Self {
            extract_response: Ok(extract_response.into()),
            generate_response: Err(error),
        }
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn extract_text(&self, _image: &EncodedImage) -> Result<String, ProviderError> {
        self.extract_response.clone()
    }

    async fn generate_structured(
        &self,
        _prompt: &str,
        _schema: &Value,
    ) -> Result<String, ProviderError> {
        self.generate_response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "Hello world");
    }

    #[test]
    fn empty_response_yields_empty_text() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn inline_image_part_serialises_to_wire_shape() {
        let part = Part::inline_image("image/png", "QUJD");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["inlineData"]["data"], "QUJD");
    }

    #[test]
    fn generation_config_serialises_camel_case() {
        let config = GenerationConfig {
            response_mime_type: "application/json",
            response_schema: serde_json::json!({"type": "OBJECT"}),
            temperature: 0.2,
            max_output_tokens: 8192,
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["responseMimeType"], "application/json");
        assert_eq!(json["maxOutputTokens"], 8192);
    }

    #[tokio::test]
    async fn mock_provider_returns_canned_responses() {
        let provider = MockVisionProvider::new("extracted", "{}");
        let image = EncodedImage {
            data: "QUJD".into(),
            mime_type: "image/png".into(),
        };
        assert_eq!(provider.extract_text(&image).await.unwrap(), "extracted");
        assert_eq!(
            provider.generate_structured("p", &Value::Null).await.unwrap(),
            "{}"
        );
    }

    #[test]
    fn gemini_provider_requires_api_key() {
        // Only run when the ambient environment doesn't define the key;
        // otherwise from_config legitimately succeeds.
        if std::env::var("GEMINI_API_KEY").is_ok() {
            return;
        }
        let config = PipelineConfig::default();
        let result = GeminiProvider::from_config(&config);
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
    }

    #[test]
    fn gemini_endpoint_includes_model() {
        let config = PipelineConfig::builder()
            .api_key("test-key")
            .base_url("https://example.com/")
            .build()
            .unwrap();
        let provider = GeminiProvider::from_config(&config).unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
