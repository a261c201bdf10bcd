//! Rendered output: the in-memory PDF plus preview and download handles.

use crate::error::DocGenError;
use crate::template::TemplateKind;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// A rendered, paginated document owned by the pipeline until cleared or
/// replaced.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// The finished PDF bytes.
    pub pdf_bytes: Vec<u8>,
    /// Number of pages the layout produced.
    pub page_count: usize,
    /// The template that produced this document.
    pub template: TemplateKind,
}

impl RenderedDocument {
    /// Download filename: `invoice.pdf`, `report.pdf`, or `resume.pdf`.
    pub fn filename(&self) -> String {
        self.template.filename()
    }

    /// Embeddable preview representation of the PDF.
    pub fn preview_data_uri(&self) -> String {
        format!(
            "data:application/pdf;base64,{}",
            STANDARD.encode(&self.pdf_bytes)
        )
    }

    /// Write the PDF to disk.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), DocGenError> {
        let path = path.as_ref();
        std::fs::write(path, &self.pdf_bytes).map_err(|e| DocGenError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> RenderedDocument {
        RenderedDocument {
            pdf_bytes: b"%PDF-1.7 test".to_vec(),
            page_count: 1,
            template: TemplateKind::Invoice,
        }
    }

    #[test]
    fn filename_follows_template() {
        assert_eq!(doc().filename(), "invoice.pdf");
    }

    #[test]
    fn preview_uri_is_base64_pdf() {
        let uri = doc().preview_data_uri();
        assert!(uri.starts_with("data:application/pdf;base64,"));
        let b64 = uri.strip_prefix("data:application/pdf;base64,").unwrap();
        assert_eq!(STANDARD.decode(b64).unwrap(), b"%PDF-1.7 test");
    }

    #[test]
    fn save_to_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        doc().save_to(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7 test");
    }

    #[test]
    fn save_to_bad_path_reports_output_error() {
        let err = doc().save_to("/no/such/dir/invoice.pdf").unwrap_err();
        assert!(matches!(err, DocGenError::OutputWriteFailed { .. }));
    }
}
