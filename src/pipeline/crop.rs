//! Crop transform: displayed-space rectangle → source pixels → new asset.
//!
//! The user draws a rectangle on a *displayed* (scaled-down) rendering of the
//! image, so the selection must be mapped back to source pixels before
//! rasterising: `scale_x = natural_w / displayed_w`, `scale_y = natural_h /
//! displayed_h`, each coordinate and dimension multiplied by its respective
//! factor. The transform is pure and synchronous; it never touches network
//! state.
//!
//! Re-encoding preserves the original media type. The supported output set
//! (PNG/JPEG/WEBP) is exactly the [`MediaType`] enum, so the "default to PNG
//! for anything else" branch of the original is unrepresentable here —
//! unsupported formats were already rejected at acquisition.

use crate::error::DocGenError;
use crate::pipeline::acquire::{ImageAsset, MediaType};
use std::io::Cursor;
use tracing::debug;

/// A user-drawn rectangle in displayed-image pixel space.
///
/// Recomputed on every drag; a region only counts as *active* when both
/// dimensions are positive (see [`CropRegion::is_active`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The crop mapped into source-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A region participates in extraction only when it has positive area.
    pub fn is_active(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Map this displayed-space rectangle into source pixels.
    ///
    /// Fails with [`DocGenError::EmptyCropRegion`] when the mapped width or
    /// height rounds to zero — the caller must not proceed to extraction.
    pub fn map_to_source(
        &self,
        displayed: (f32, f32),
        natural: (u32, u32),
    ) -> Result<SourceRect, DocGenError> {
        let (dw, dh) = displayed;
        if dw <= 0.0 || dh <= 0.0 {
            return Err(DocGenError::Internal(format!(
                "displayed size must be positive, got {}x{}",
                dw, dh
            )));
        }

        let scale_x = natural.0 as f32 / dw;
        let scale_y = natural.1 as f32 / dh;

        let rect = SourceRect {
            x: (self.x * scale_x).round() as u32,
            y: (self.y * scale_y).round() as u32,
            width: (self.width * scale_x).round() as u32,
            height: (self.height * scale_y).round() as u32,
        };

        if rect.width == 0 || rect.height == 0 {
            return Err(DocGenError::EmptyCropRegion {
                width: rect.width,
                height: rect.height,
            });
        }

        Ok(rect)
    }
}

/// Rasterise the selected sub-rectangle into a new encoded asset.
///
/// The source rect is clamped to the image bounds before cropping so a
/// selection that slightly overshoots the displayed edge (a common drag
/// artefact) still crops rather than erroring.
pub fn crop_asset(
    asset: &ImageAsset,
    region: &CropRegion,
    displayed: (f32, f32),
) -> Result<ImageAsset, DocGenError> {
    let natural = asset.natural_size();
    let rect = region.map_to_source(displayed, natural)?;

    let x = rect.x.min(natural.0.saturating_sub(1));
    let y = rect.y.min(natural.1.saturating_sub(1));
    let width = rect.width.min(natural.0 - x);
    let height = rect.height.min(natural.1 - y);

    if width == 0 || height == 0 {
        return Err(DocGenError::EmptyCropRegion { width, height });
    }

    let cropped = asset.image.crop_imm(x, y, width, height);

    let mut bytes = Vec::new();
    let output = encode_with_media_type(&cropped, asset.media_type, &mut bytes)?;

    debug!(
        "Cropped {}x{} → {}x{} ({})",
        natural.0,
        natural.1,
        width,
        height,
        output.mime()
    );

    ImageAsset::from_bytes(&bytes)
}

/// Re-encode preserving the media type; JPEG encoding needs an
/// alpha-free buffer first.
fn encode_with_media_type(
    image: &image::DynamicImage,
    media_type: MediaType,
    out: &mut Vec<u8>,
) -> Result<MediaType, DocGenError> {
    let result = match media_type {
        MediaType::Jpeg => image
            .to_rgb8()
            .write_to(&mut Cursor::new(&mut *out), media_type.format()),
        MediaType::Png | MediaType::Webp => {
            image.write_to(&mut Cursor::new(&mut *out), media_type.format())
        }
    };
    result.map_err(|e| DocGenError::Internal(format!("re-encode failed: {}", e)))?;
    Ok(media_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::acquire::test_support::{jpeg_bytes, png_bytes};

    #[test]
    fn maps_coordinates_by_independent_scale_factors() {
        // Displayed 800x600 rendering of a 1600x1200 source: scale 2x both.
        let region = CropRegion::new(50.0, 50.0, 100.0, 100.0);
        let rect = region
            .map_to_source((800.0, 600.0), (1600, 1200))
            .unwrap();
        assert_eq!(
            rect,
            SourceRect {
                x: 100,
                y: 100,
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn maps_with_asymmetric_scales() {
        // 400x300 displayed, 1200x600 natural: scale_x=3, scale_y=2.
        let region = CropRegion::new(10.0, 20.0, 40.0, 30.0);
        let rect = region.map_to_source((400.0, 300.0), (1200, 600)).unwrap();
        assert_eq!(
            rect,
            SourceRect {
                x: 30,
                y: 40,
                width: 120,
                height: 60
            }
        );
    }

    #[test]
    fn identity_when_displayed_equals_natural() {
        let region = CropRegion::new(5.0, 7.0, 11.0, 13.0);
        let rect = region.map_to_source((640.0, 480.0), (640, 480)).unwrap();
        assert_eq!(
            rect,
            SourceRect {
                x: 5,
                y: 7,
                width: 11,
                height: 13
            }
        );
    }

    #[test]
    fn zero_width_region_is_rejected() {
        let region = CropRegion::new(10.0, 10.0, 0.0, 50.0);
        assert!(!region.is_active());
        let err = region
            .map_to_source((800.0, 600.0), (800, 600))
            .unwrap_err();
        assert!(matches!(err, DocGenError::EmptyCropRegion { .. }));
    }

    #[test]
    fn subpixel_region_rounding_to_zero_is_rejected() {
        // 0.1 displayed px on a downscaled image rounds to 0 source px.
        let region = CropRegion::new(0.0, 0.0, 0.1, 0.1);
        let err = region
            .map_to_source((1000.0, 1000.0), (500, 500))
            .unwrap_err();
        assert!(matches!(err, DocGenError::EmptyCropRegion { .. }));
    }

    #[test]
    fn crop_asset_produces_scaled_subimage_preserving_type() {
        let asset = ImageAsset::from_bytes(&png_bytes(1600, 1200)).unwrap();
        let region = CropRegion::new(50.0, 50.0, 100.0, 100.0);
        let cropped = crop_asset(&asset, &region, (800.0, 600.0)).unwrap();
        assert_eq!(cropped.natural_size(), (200, 200));
        assert_eq!(cropped.media_type, MediaType::Png);
    }

    #[test]
    fn crop_asset_preserves_jpeg() {
        let asset = ImageAsset::from_bytes(&jpeg_bytes(200, 200)).unwrap();
        let region = CropRegion::new(0.0, 0.0, 50.0, 50.0);
        let cropped = crop_asset(&asset, &region, (100.0, 100.0)).unwrap();
        assert_eq!(cropped.media_type, MediaType::Jpeg);
        assert_eq!(cropped.natural_size(), (100, 100));
    }

    #[test]
    fn overshooting_selection_is_clamped_to_image_bounds() {
        let asset = ImageAsset::from_bytes(&png_bytes(100, 100)).unwrap();
        // Selection extends 20px past the right edge of the displayed image.
        let region = CropRegion::new(80.0, 0.0, 40.0, 50.0);
        let cropped = crop_asset(&asset, &region, (100.0, 100.0)).unwrap();
        assert_eq!(cropped.natural_size(), (20, 50));
    }
}
