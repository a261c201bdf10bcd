//! Remote plain-text extraction — the first of the two suspension points.
//!
//! A single request/response exchange: "extract all legible text from this
//! image, return text only". The call is idempotent but never cached; every
//! invocation re-contacts the remote service.

use crate::error::DocGenError;
use crate::pipeline::acquire::ImageAsset;
use crate::provider::VisionProvider;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract trimmed plain text from the asset.
///
/// An empty reply (after trimming) is a user-visible failure condition
/// ([`DocGenError::NoTextFound`]), not a silently accepted success —
/// downstream structured generation is meaningless without source text.
pub async fn extract_text(
    provider: &Arc<dyn VisionProvider>,
    asset: &ImageAsset,
) -> Result<String, DocGenError> {
    let start = Instant::now();
    let payload = asset.to_encoded();
    debug!(
        "Extraction request: {} ({} bytes base64)",
        payload.mime_type,
        payload.data.len()
    );

    let raw = provider
        .extract_text(&payload)
        .await
        .map_err(|e| DocGenError::ExtractionFailed {
            reason: e.to_string(),
        })?;

    let text = raw.trim().to_string();
    if text.is_empty() {
        return Err(DocGenError::NoTextFound);
    }

    info!(
        "Extracted {} chars in {}ms",
        text.len(),
        start.elapsed().as_millis()
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::pipeline::acquire::test_support::png_bytes;
    use crate::provider::MockVisionProvider;

    fn asset() -> ImageAsset {
        ImageAsset::from_bytes(&png_bytes(40, 30)).unwrap()
    }

    #[tokio::test]
    async fn trims_surrounding_whitespace() {
        let provider: Arc<dyn VisionProvider> =
            Arc::new(MockVisionProvider::new("  Invoice #123  \n", "{}"));
        let text = extract_text(&provider, &asset()).await.unwrap();
        assert_eq!(text, "Invoice #123");
    }

    #[tokio::test]
    async fn empty_reply_is_no_text_found() {
        let provider: Arc<dyn VisionProvider> =
            Arc::new(MockVisionProvider::new("   \n\t ", "{}"));
        let err = extract_text(&provider, &asset()).await.unwrap_err();
        assert!(matches!(err, DocGenError::NoTextFound));
    }

    #[tokio::test]
    async fn transport_error_becomes_extraction_failed() {
        let provider: Arc<dyn VisionProvider> = Arc::new(MockVisionProvider::failing_extract(
            ProviderError::Api {
                status: 500,
                body: "backend exploded".into(),
            },
        ));
        let err = extract_text(&provider, &asset()).await.unwrap_err();
        match err {
            DocGenError::ExtractionFailed { reason } => {
                assert!(reason.contains("500"), "got: {reason}")
            }
            other => panic!("expected ExtractionFailed, got {other:?}"),
        }
    }
}
