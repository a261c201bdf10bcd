//! QR code generation: text in, PNG bytes out.
//!
//! Entirely local and deterministic. Error-correction level and module
//! sizing are fixed so the same input always yields the same image.

use crate::error::DocGenError;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Rendered side length floor in pixels (the encoder rounds up to a whole
/// number of modules).
const MIN_SIDE_PX: u32 = 400;

/// Suggested download filename.
pub const QR_FILENAME: &str = "qrcode.png";

/// Encode `text` as a QR code and render it to PNG bytes.
///
/// Empty input is rejected; oversized input (beyond QR capacity) surfaces
/// as [`DocGenError::QrFailed`] with the encoder's reason.
pub fn qr_png(text: &str) -> Result<Vec<u8>, DocGenError> {
    if text.is_empty() {
        return Err(DocGenError::QrFailed {
            detail: "input text is empty".to_string(),
        });
    }

    let code = QrCode::new(text.as_bytes()).map_err(|e| DocGenError::QrFailed {
        detail: e.to_string(),
    })?;

    let rendered = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_SIDE_PX, MIN_SIDE_PX)
        .quiet_zone(true)
        .build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(rendered)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| DocGenError::QrFailed {
            detail: format!("PNG encode failed: {}", e),
        })?;

    Ok(bytes)
}

/// The PNG wrapped as an embeddable data URI.
pub fn qr_data_uri(text: &str) -> Result<String, DocGenError> {
    let png = qr_png(text)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_a_square_png() {
        let png = qr_png("https://example.com").unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), img.height());
        assert!(img.width() >= MIN_SIDE_PX);
    }

    #[test]
    fn same_input_same_bytes() {
        let a = qr_png("deterministic payload").unwrap();
        let b = qr_png("deterministic payload").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_input_different_bytes() {
        let a = qr_png("payload one").unwrap();
        let b = qr_png("payload two").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = qr_png("").unwrap_err();
        assert!(matches!(err, DocGenError::QrFailed { .. }));
    }

    #[test]
    fn data_uri_wraps_the_png() {
        let uri = qr_data_uri("hello").unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn oversized_input_is_rejected() {
        // Beyond version-40 byte capacity.
        let huge = "x".repeat(4000);
        let err = qr_png(&huge).unwrap_err();
        assert!(matches!(err, DocGenError::QrFailed { .. }));
    }
}
