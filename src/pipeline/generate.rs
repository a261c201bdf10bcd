//! Remote structured generation — the second suspension point.
//!
//! Takes the extracted text plus a template-selected schema descriptor and
//! returns a typed [`StructuredDocument`]. Only reachable after extraction
//! succeeds: calling with empty text is rejected up front rather than
//! wasting a remote round-trip on an unanswerable prompt.

use crate::error::DocGenError;
use crate::prompts::structuring_prompt;
use crate::provider::VisionProvider;
use crate::template::{StructuredDocument, TemplateKind};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Generate a schema-conformant document from extracted text.
///
/// Failure taxonomy: transport/service errors surface as
/// [`DocGenError::GenerationFailed`]; a reply that cannot be parsed into the
/// template's shape surfaces as [`DocGenError::SchemaValidationFailed`].
pub async fn generate_document(
    provider: &Arc<dyn VisionProvider>,
    extracted_text: &str,
    template: TemplateKind,
) -> Result<StructuredDocument, DocGenError> {
    if extracted_text.trim().is_empty() {
        return Err(DocGenError::NoTextFound);
    }

    let start = Instant::now();
    let prompt = structuring_prompt(extracted_text);
    let schema = template.schema();
    debug!("Generation request for template '{}'", template);

    let raw = provider
        .generate_structured(&prompt, &schema)
        .await
        .map_err(|e| DocGenError::GenerationFailed {
            reason: e.to_string(),
        })?;

    let document = template.parse_document(raw.trim())?;
    info!(
        "Generated {} document in {}ms",
        template,
        start.elapsed().as_millis()
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::MockVisionProvider;

    #[tokio::test]
    async fn parses_invoice_reply() {
        let reply = r#"{"from":"Acme","billTo":"Globex","invoiceNumber":"123",
            "date":"2025-03-01","items":[],"total":42.0}"#;
        let provider: Arc<dyn VisionProvider> = Arc::new(MockVisionProvider::new("x", reply));
        let doc = generate_document(&provider, "some text", TemplateKind::Invoice)
            .await
            .unwrap();
        match doc {
            StructuredDocument::Invoice(inv) => {
                assert_eq!(inv.invoice_number, "123");
                assert_eq!(inv.total, 42.0);
            }
            _ => panic!("expected invoice"),
        }
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_remote_call() {
        let provider: Arc<dyn VisionProvider> = Arc::new(MockVisionProvider::new("x", "{}"));
        let err = generate_document(&provider, "   ", TemplateKind::Report)
            .await
            .unwrap_err();
        assert!(matches!(err, DocGenError::NoTextFound));
    }

    #[tokio::test]
    async fn unparseable_reply_is_schema_validation_failure() {
        let provider: Arc<dyn VisionProvider> =
            Arc::new(MockVisionProvider::new("x", "certainly not json"));
        let err = generate_document(&provider, "text", TemplateKind::Resume)
            .await
            .unwrap_err();
        assert!(matches!(err, DocGenError::SchemaValidationFailed { .. }));
    }

    #[tokio::test]
    async fn transport_error_becomes_generation_failed() {
        let provider: Arc<dyn VisionProvider> = Arc::new(MockVisionProvider::failing_generate(
            "x",
            ProviderError::Timeout { secs: 60 },
        ));
        let err = generate_document(&provider, "text", TemplateKind::Invoice)
            .await
            .unwrap_err();
        assert!(matches!(err, DocGenError::GenerationFailed { .. }));
    }
}
