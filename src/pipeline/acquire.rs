//! Image acquisition: normalise raw bytes into one validated in-memory asset.
//!
//! The original product accepts images from clipboard paste, drag-and-drop,
//! and a file picker; all three funnel into one validated operation. The
//! library mirrors that: [`ImageAsset::from_bytes`] is the single entry
//! point, and [`ImageAsset::from_file`] / [`ImageAsset::from_reader`] only
//! obtain the bytes before delegating — no divergent logic per entry point.
//!
//! Validation sniffs the actual byte signature rather than trusting a
//! declared extension; a `.png` file containing a GIF is rejected with
//! [`DocGenError::InvalidMediaType`] and existing state is left untouched.

use crate::error::DocGenError;
use crate::provider::EncodedImage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Supported media types. Anything else fails acquisition, so downstream
/// stages (crop re-encoding, transport) never meet an unsupported format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
    Webp,
}

impl MediaType {
    /// MIME string used in the remote request body.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Webp => "image/webp",
        }
    }

    /// The `image` crate format for re-encoding.
    pub fn format(&self) -> ImageFormat {
        match self {
            MediaType::Png => ImageFormat::Png,
            MediaType::Jpeg => ImageFormat::Jpeg,
            MediaType::Webp => ImageFormat::WebP,
        }
    }

    /// Parse a MIME string (`image/png`, `image/jpeg`, `image/webp`).
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(MediaType::Png),
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/webp" => Some(MediaType::Webp),
            _ => None,
        }
    }

    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(MediaType::Png),
            ImageFormat::Jpeg => Some(MediaType::Jpeg),
            ImageFormat::WebP => Some(MediaType::Webp),
            _ => None,
        }
    }
}

/// A decoded image plus its encoded-for-transport payload.
///
/// At most one asset is live per pipeline instance; replacing or clearing it
/// drops the decoded pixels (the ownership equivalent of releasing a
/// renderable object-URL handle).
#[derive(Debug, Clone)]
pub struct ImageAsset {
    /// Decoded raster, kept for natural dimensions and crop rasterisation.
    pub image: DynamicImage,
    /// Base64 of the original encoded bytes, ready for the request body.
    pub encoded: String,
    pub media_type: MediaType,
}

impl ImageAsset {
    /// The single validated acquisition operation.
    ///
    /// Sniffs the format from the byte signature, rejects anything that is
    /// not PNG/JPEG/WEBP, and decodes the raster eagerly so natural
    /// dimensions are always available.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocGenError> {
        let format = image::guess_format(bytes).map_err(|_| DocGenError::InvalidMediaType {
            detail: "unrecognised image signature".to_string(),
        })?;

        let media_type =
            MediaType::from_format(format).ok_or_else(|| DocGenError::InvalidMediaType {
                detail: format!("{:?}", format),
            })?;

        let image = image::load_from_memory_with_format(bytes, format).map_err(|e| {
            DocGenError::InvalidMediaType {
                detail: format!("decode failed: {}", e),
            }
        })?;

        debug!(
            "Acquired {} image: {}x{} px, {} bytes",
            media_type.mime(),
            image.width(),
            image.height(),
            bytes.len()
        );

        Ok(Self {
            image,
            encoded: STANDARD.encode(bytes),
            media_type,
        })
    }

    /// File-picker entry point: read the file and funnel into `from_bytes`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocGenError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|_| DocGenError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Paste/stream entry point: drain the reader and funnel into `from_bytes`.
    pub fn from_reader(reader: &mut impl Read) -> Result<Self, DocGenError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| DocGenError::Internal(format!("read failed: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Natural (source) resolution of the decoded image.
    pub fn natural_size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Transport payload for the remote capability.
    pub fn to_encoded(&self) -> EncodedImage {
        EncodedImage {
            data: self.encoded.clone(),
            mime_type: self.media_type.mime().to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encode a solid-colour test image of the given size as PNG bytes.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([40, 90, 200, 255]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("encode test png");
        buf
    }

    /// Encode a solid-colour test image as JPEG bytes.
    pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let rgba = RgbaImage::from_pixel(width, height, Rgba([40, 90, 200, 255]));
        let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .expect("encode test jpeg");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{jpeg_bytes, png_bytes};
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn acquires_png_with_natural_size() {
        let asset = ImageAsset::from_bytes(&png_bytes(400, 300)).unwrap();
        assert_eq!(asset.media_type, MediaType::Png);
        assert_eq!(asset.natural_size(), (400, 300));
        // Encoded payload round-trips as base64 of the original bytes.
        let decoded = STANDARD.decode(&asset.encoded).unwrap();
        assert_eq!(decoded, png_bytes(400, 300));
    }

    #[test]
    fn acquires_jpeg() {
        let asset = ImageAsset::from_bytes(&jpeg_bytes(64, 48)).unwrap();
        assert_eq!(asset.media_type, MediaType::Jpeg);
        assert_eq!(asset.to_encoded().mime_type, "image/jpeg");
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = ImageAsset::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DocGenError::InvalidMediaType { .. }));
    }

    #[test]
    fn rejects_unsupported_image_format() {
        // Minimal GIF89a header: a real image type, but not a supported one.
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        let err = ImageAsset::from_bytes(gif).unwrap_err();
        assert!(matches!(err, DocGenError::InvalidMediaType { .. }));
    }

    #[test]
    fn mime_parsing_round_trips() {
        assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime("IMAGE/JPEG"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("image/gif"), None);
        for mt in [MediaType::Png, MediaType::Jpeg, MediaType::Webp] {
            assert_eq!(MediaType::from_mime(mt.mime()), Some(mt));
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ImageAsset::from_file("/no/such/image.png").unwrap_err();
        assert!(matches!(err, DocGenError::FileNotFound { .. }));
    }

    #[test]
    fn reader_entry_point_funnels_into_from_bytes() {
        let bytes = png_bytes(10, 10);
        let mut cursor = std::io::Cursor::new(bytes);
        let asset = ImageAsset::from_reader(&mut cursor).unwrap();
        assert_eq!(asset.media_type, MediaType::Png);
    }
}
