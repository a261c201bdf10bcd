//! # quickdocs
//!
//! Turn a photographed or scanned document into a clean, professionally
//! formatted PDF: acquire an image, optionally crop it, extract its text
//! with a remote vision model, generate schema-conformant structured data
//! for a chosen template (invoice, report or resume), and lay it out as a
//! paginated A4 document. A standalone QR code generator rides along.
//!
//! ## Pipeline
//!
//! ```text
//! image bytes ──► acquire ──► [crop] ──► extract ──► generate ──► render ──► PDF
//!                 (local)     (local)   (remote)     (remote)     (local)
//! ```
//!
//! Only the two middle stages touch the network; everything else is local
//! and deterministic. The [`Pipeline`] controller owns the session state,
//! allows one in-flight request at a time, and drops responses that arrive
//! after the session was cleared or the image replaced.
//!
//! ## Quick start
//!
//! ```no_run
//! use quickdocs::{GeminiProvider, ImageAsset, Pipeline, PipelineConfig, TemplateKind};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let provider = Arc::new(GeminiProvider::from_config(&config)?);
//! let mut pipeline = Pipeline::new(provider, &config);
//!
//! pipeline.load_image(ImageAsset::from_file("invoice.jpg")?, None);
//! pipeline.select_template(TemplateKind::Invoice);
//! pipeline.extract().await;
//! pipeline.generate().await;
//!
//! if let Some(doc) = pipeline.document() {
//!     doc.save_to(doc.filename())?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The remote capability sits behind the [`VisionProvider`] trait, so tests
//! (and alternative backends) plug in without touching pipeline logic.

pub mod config;
pub mod controller;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod qr;
pub mod render;
pub mod template;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use controller::{Pipeline, PipelineState};
pub use error::{DocGenError, ProviderError};
pub use output::RenderedDocument;
pub use pipeline::acquire::{ImageAsset, MediaType};
pub use pipeline::crop::{CropRegion, SourceRect};
pub use provider::{EncodedImage, GeminiProvider, MockVisionProvider, VisionProvider};
pub use qr::{qr_data_uri, qr_png, QR_FILENAME};
pub use render::{render, RenderOptions};
pub use template::{StructuredDocument, TemplateKind};
