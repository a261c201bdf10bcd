//! Session state machine driving the acquire → crop → extract → generate →
//! render sequence.
//!
//! One [`Pipeline`] owns one in-flight request at most. Each remote
//! operation is split into a synchronous `begin_*` step (validates state,
//! marks busy, snapshots inputs) and a `finish_*` step (applies the result),
//! with the async convenience methods composing the two around the provider
//! call. The split keeps every transition unit-testable without a network.
//!
//! ## Stale responses
//!
//! `begin_*` captures the current *epoch*; [`Pipeline::clear`] and
//! [`Pipeline::load_image`] bump it. A `finish_*` carrying an old epoch is
//! dropped silently, so a response racing a reset can never resurrect
//! discarded state.

use crate::config::PipelineConfig;
use crate::error::DocGenError;
use crate::output::RenderedDocument;
use crate::pipeline::acquire::ImageAsset;
use crate::pipeline::crop::{crop_asset, CropRegion};
use crate::pipeline::{extract, generate};
use crate::provider::VisionProvider;
use crate::render::{render, RenderOptions};
use crate::template::{StructuredDocument, TemplateKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Observable phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Empty,
    ImageLoaded,
    Extracting,
    Extracted,
    Generating,
    Rendered,
    Failed,
}

/// Ticket handed out by a `begin_*` call; pairs the snapshot the request
/// should use with the epoch that must still hold when the result lands.
#[derive(Debug)]
pub struct ExtractTicket {
    pub epoch: u64,
    pub asset: ImageAsset,
}

#[derive(Debug)]
pub struct GenerateTicket {
    pub epoch: u64,
    pub text: String,
    pub template: TemplateKind,
}

pub struct Pipeline {
    provider: Arc<dyn VisionProvider>,
    options: RenderOptions,
    image: Option<ImageAsset>,
    displayed_size: Option<(f32, f32)>,
    crop: Option<CropRegion>,
    extracted: Option<String>,
    template: TemplateKind,
    structured: Option<StructuredDocument>,
    document: Option<RenderedDocument>,
    error: Option<String>,
    busy: bool,
    epoch: u64,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn VisionProvider>, config: &PipelineConfig) -> Self {
        Self::with_options(provider, RenderOptions::from_config(config))
    }

    pub fn with_options(provider: Arc<dyn VisionProvider>, options: RenderOptions) -> Self {
        Self {
            provider,
            options,
            image: None,
            displayed_size: None,
            crop: None,
            extracted: None,
            template: TemplateKind::Invoice,
            structured: None,
            document: None,
            error: None,
            busy: false,
            epoch: 0,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn state(&self) -> PipelineState {
        if self.busy {
            if self.extracted.is_some() {
                PipelineState::Generating
            } else {
                PipelineState::Extracting
            }
        } else if self.error.is_some() {
            PipelineState::Failed
        } else if self.document.is_some() {
            PipelineState::Rendered
        } else if self.extracted.is_some() {
            PipelineState::Extracted
        } else if self.image.is_some() {
            PipelineState::ImageLoaded
        } else {
            PipelineState::Empty
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn image(&self) -> Option<&ImageAsset> {
        self.image.as_ref()
    }

    pub fn crop(&self) -> Option<&CropRegion> {
        self.crop.as_ref()
    }

    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted.as_deref()
    }

    pub fn template(&self) -> TemplateKind {
        self.template
    }

    pub fn structured(&self) -> Option<&StructuredDocument> {
        self.structured.as_ref()
    }

    pub fn document(&self) -> Option<&RenderedDocument> {
        self.document.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ── Synchronous transitions ──────────────────────────────────────────

    /// Load a new image, discarding all downstream state from any previous
    /// session. Invalidates in-flight requests.
    pub fn load_image(&mut self, asset: ImageAsset, displayed_size: Option<(f32, f32)>) {
        self.epoch += 1;
        self.busy = false;
        self.image = Some(asset);
        self.displayed_size = displayed_size;
        self.crop = None;
        self.extracted = None;
        self.structured = None;
        self.document = None;
        self.error = None;
    }

    /// Record the user's crop selection and the size the image is displayed
    /// at. Inactive (zero-area) regions are treated as no selection.
    pub fn set_crop(&mut self, region: CropRegion, displayed_size: (f32, f32)) {
        self.displayed_size = Some(displayed_size);
        self.crop = region.is_active().then_some(region);
    }

    pub fn clear_crop(&mut self) {
        self.crop = None;
    }

    /// Switch the target template. A document already rendered for another
    /// template is discarded; extracted text is kept so the user can
    /// regenerate without re-extracting.
    pub fn select_template(&mut self, template: TemplateKind) {
        if self.template != template {
            self.template = template;
            self.structured = None;
            self.document = None;
        }
    }

    /// Reset the whole session. Invalidates in-flight requests.
    pub fn clear(&mut self) {
        self.epoch += 1;
        self.busy = false;
        self.image = None;
        self.displayed_size = None;
        self.crop = None;
        self.extracted = None;
        self.structured = None;
        self.document = None;
        self.error = None;
    }

    // ── Extraction ───────────────────────────────────────────────────────

    /// Start an extraction: snapshot the asset to send (cropped when an
    /// active selection exists) and mark the session busy.
    ///
    /// Returns `None` without side effects when there is no image or a
    /// request is already in flight. A failing crop transform records the
    /// error and also yields `None`.
    pub fn begin_extract(&mut self) -> Option<ExtractTicket> {
        if self.busy {
            debug!("extract ignored: request already in flight");
            return None;
        }
        let image = self.image.as_ref()?;

        let asset = match (&self.crop, self.displayed_size) {
            (Some(region), Some(displayed)) => match crop_asset(image, region, displayed) {
                Ok(cropped) => cropped,
                Err(e) => {
                    self.error = Some(e.to_string());
                    return None;
                }
            },
            _ => image.clone(),
        };

        self.busy = true;
        self.error = None;
        self.extracted = None;
        self.structured = None;
        self.document = None;
        Some(ExtractTicket {
            epoch: self.epoch,
            asset,
        })
    }

    /// Apply an extraction result. Results from a superseded epoch are
    /// dropped without touching state.
    pub fn finish_extract(&mut self, epoch: u64, result: Result<String, DocGenError>) {
        if epoch != self.epoch {
            warn!("dropping stale extraction result (epoch {epoch} != {})", self.epoch);
            return;
        }
        self.busy = false;
        match result {
            Ok(text) => {
                self.extracted = Some(text);
                self.error = None;
            }
            // The image and crop stay loaded so the user can retry.
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Run extraction against the provider. Returns whether a request was
    /// actually issued.
    pub async fn extract(&mut self) -> bool {
        let Some(ticket) = self.begin_extract() else {
            return false;
        };
        let result = extract::extract_text(&self.provider, &ticket.asset).await;
        self.finish_extract(ticket.epoch, result);
        true
    }

    // ── Generation ───────────────────────────────────────────────────────

    /// Start structured generation from the extracted text.
    pub fn begin_generate(&mut self) -> Option<GenerateTicket> {
        if self.busy {
            debug!("generate ignored: request already in flight");
            return None;
        }
        let text = self.extracted.clone()?;

        self.busy = true;
        self.error = None;
        self.structured = None;
        self.document = None;
        Some(GenerateTicket {
            epoch: self.epoch,
            text,
            template: self.template,
        })
    }

    /// Apply a generation result; on success the document is rendered
    /// immediately (rendering is local and synchronous).
    pub fn finish_generate(&mut self, epoch: u64, result: Result<StructuredDocument, DocGenError>) {
        if epoch != self.epoch {
            warn!("dropping stale generation result (epoch {epoch} != {})", self.epoch);
            return;
        }
        self.busy = false;
        match result.and_then(|doc| {
            let rendered = render(&doc, &self.options)?;
            Ok((doc, rendered))
        }) {
            Ok((structured, rendered)) => {
                self.structured = Some(structured);
                self.document = Some(rendered);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Run generation against the provider. Returns whether a request was
    /// actually issued.
    pub async fn generate(&mut self) -> bool {
        let Some(ticket) = self.begin_generate() else {
            return false;
        };
        let result =
            generate::generate_document(&self.provider, &ticket.text, ticket.template).await;
        self.finish_generate(ticket.epoch, result);
        true
    }
}
