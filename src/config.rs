//! Configuration for the document-generation pipeline.
//!
//! All behaviour is controlled through [`PipelineConfig`], built via its
//! [`PipelineConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across a CLI run, serialise it for logging,
//! and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest; `build()` validates constraints
//! once instead of every call site re-checking them.

use crate::error::DocGenError;
use serde::{Deserialize, Serialize};

/// Configuration for extraction, generation, and rendering.
///
/// Built via [`PipelineConfig::builder()`] or [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use quickdocs::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .model("gemini-2.5-flash")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Vision model identifier. Default: `gemini-2.5-flash`.
    ///
    /// Both remote capabilities (text extraction and schema-constrained
    /// generation) go through the same multimodal model, so one identifier
    /// covers the whole pipeline.
    pub model: String,

    /// API key for the remote service. If `None`, read from `GEMINI_API_KEY`.
    ///
    /// This is the single externally supplied credential the pipeline uses;
    /// nothing else in the crate reads the environment.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the generateContent endpoint.
    /// Default: `https://generativelanguage.googleapis.com`.
    ///
    /// Overridable so tests and self-hosted gateways can point the pipeline
    /// at a local stand-in without touching DNS.
    pub base_url: String,

    /// Sampling temperature for structured generation. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to the extracted text —
    /// exactly what you want when populating a fixed schema. Extraction
    /// always runs at the service default.
    pub temperature: f32,

    /// Maximum tokens the model may generate per call. Default: 8192.
    ///
    /// Dense source documents (long line-item tables) can produce large JSON
    /// payloads; setting this too low silently truncates the reply and
    /// surfaces as a schema-validation failure.
    pub max_output_tokens: usize,

    /// Per-remote-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Company name printed in the invoice header band.
    /// Default: `"QuickDocs Inc."`.
    pub letterhead: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.2,
            max_output_tokens: 8192,
            api_timeout_secs: 60,
            letterhead: "QuickDocs Inc.".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn letterhead(mut self, name: impl Into<String>) -> Self {
        self.config.letterhead = name.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, DocGenError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(DocGenError::InvalidConfig("Model must not be empty".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(DocGenError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_output_tokens == 0 {
            return Err(DocGenError::InvalidConfig(
                "max_output_tokens must be ≥ 1".into(),
            ));
        }
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(DocGenError::InvalidConfig(format!(
                "Base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.api_timeout_secs, 60);
        assert_eq!(config.letterhead, "QuickDocs Inc.");
    }

    #[test]
    fn temperature_is_clamped() {
        let config = PipelineConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = PipelineConfig::builder().api_timeout_secs(0).build();
        assert!(matches!(err, Err(DocGenError::InvalidConfig(_))));
    }

    #[test]
    fn non_http_base_url_rejected() {
        let err = PipelineConfig::builder().base_url("ftp://nope").build();
        assert!(matches!(err, Err(DocGenError::InvalidConfig(_))));
    }

    #[test]
    fn empty_model_rejected() {
        let err = PipelineConfig::builder().model("  ").build();
        assert!(matches!(err, Err(DocGenError::InvalidConfig(_))));
    }
}
