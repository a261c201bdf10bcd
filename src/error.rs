//! Error types for the quickdocs library.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`DocGenError`] — the user-facing taxonomy returned by every pipeline
//!   operation. Each variant maps to one failure condition a caller can act
//!   on (bad input, empty crop, remote failure, …).
//!
//! * [`ProviderError`] — transport-level failures from the remote vision
//!   capability. These never escape the pipeline: the extraction and
//!   generation clients convert them to [`DocGenError::ExtractionFailed`] or
//!   [`DocGenError::GenerationFailed`] at the boundary, so callers see one
//!   consistent taxonomy regardless of which provider is plugged in.
//!
//! No error here is fatal to the process — the pipeline controller always
//! returns to an interactive state, keeping the image and crop selection so
//! the user can retry without re-uploading.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the quickdocs library.
#[derive(Debug, Error)]
pub enum DocGenError {
    // ── Acquisition errors ────────────────────────────────────────────────
    /// The supplied bytes are not a supported image format.
    #[error("Unsupported media type: '{detail}'\nSupported formats: PNG, JPEG, WEBP.")]
    InvalidMediaType { detail: String },

    /// Input file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    // ── Crop errors ───────────────────────────────────────────────────────
    /// The crop region maps to a zero-area rectangle in source pixels.
    #[error("Crop region is empty: {width}x{height} source pixels.\nDraw a larger selection or clear the crop.")]
    EmptyCropRegion { width: u32, height: u32 },

    // ── Remote-capability errors ──────────────────────────────────────────
    /// Text extraction failed for transport or service reasons.
    #[error("Text extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    /// Extraction succeeded but the image contained no legible text.
    #[error("No text could be extracted from the image.\nTry a sharper image or a tighter crop around the text.")]
    NoTextFound,

    /// Structured generation failed for transport or service reasons.
    #[error("Document generation failed: {reason}")]
    GenerationFailed { reason: String },

    /// The remote reply could not be parsed into the template's shape.
    #[error("Generated data does not match the {template} schema: {detail}")]
    SchemaValidationFailed { template: String, detail: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// PDF layout could not proceed (font registration, document assembly).
    #[error("PDF rendering failed: {detail}")]
    RenderFailed { detail: String },

    /// QR code encoding failed (input too long for the symbol capacity).
    #[error("QR code generation failed: {detail}")]
    QrFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Transport-level failure from a [`crate::provider::VisionProvider`].
///
/// Converted into [`DocGenError`] by the pipeline clients; carries enough
/// detail for the user-visible message without leaking provider internals.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Could not reach the service (connect, TLS, DNS).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The service answered with a non-success HTTP status.
    #[error("service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No API key was configured and none was found in the environment.
    #[error("no API key configured; set GEMINI_API_KEY or provide one in PipelineConfig")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_crop_display_names_dimensions() {
        let e = DocGenError::EmptyCropRegion {
            width: 0,
            height: 12,
        };
        let msg = e.to_string();
        assert!(msg.contains("0x12"), "got: {msg}");
    }

    #[test]
    fn schema_validation_display_names_template() {
        let e = DocGenError::SchemaValidationFailed {
            template: "invoice".into(),
            detail: "missing field `items`".into(),
        };
        assert!(e.to_string().contains("invoice"));
        assert!(e.to_string().contains("items"));
    }

    #[test]
    fn provider_api_error_display() {
        let e = ProviderError::Api {
            status: 429,
            body: "rate limited".into(),
        };
        assert!(e.to_string().contains("429"));
    }

    #[test]
    fn no_text_found_mentions_retry_hint() {
        let msg = DocGenError::NoTextFound.to_string();
        assert!(msg.contains("No text"));
    }
}
