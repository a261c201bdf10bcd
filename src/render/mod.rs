//! Deterministic PDF layout: structured data → paginated A4 document.
//!
//! Purely local — no network. Each template is a distinct layout algorithm
//! ([`invoice`], [`report`], [`resume`]) but all three share one pagination
//! primitive: [`DocWriter::write_wrapped`] computes the wrapped line count at
//! the current font size and column width, and starts a new page whenever
//! `cursor + lines × line_height` would cross the printable bottom margin.
//! Expressing the overflow check once keeps the three algorithms from
//! drifting apart.
//!
//! ## Geometry
//!
//! A4-equivalent fixed page: 210 × 297 mm, 20 mm margins, 5 mm body line
//! height. The cursor is anchored at the *top* of the page (matching how the
//! layouts are specified); printpdf's bottom-left origin is converted at the
//! single point where text and shapes are emitted.
//!
//! ## Determinism
//!
//! Word-wrapping uses a character budget derived from the column width and
//! Helvetica's average glyph advance, so re-rendering the same
//! [`StructuredDocument`] always produces identical page counts and text
//! placement. Currency values render with exactly two decimals; absent
//! fields render as defaults ("" / 0), never an error.

pub mod invoice;
pub mod report;
pub mod resume;

use crate::config::PipelineConfig;
use crate::error::DocGenError;
use crate::output::RenderedDocument;
use crate::template::{StructuredDocument, TemplateKind};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};
use std::io::BufWriter;

// ── Page geometry ────────────────────────────────────────────────────────

pub(crate) const PAGE_WIDTH: f32 = 210.0;
pub(crate) const PAGE_HEIGHT: f32 = 297.0;
pub(crate) const MARGIN: f32 = 20.0;
pub(crate) const LINE_HEIGHT: f32 = 5.0;

/// Points → millimetres (PDF user-space points are 1/72 inch).
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Average Helvetica glyph advance as a fraction of the font size.
/// Deliberately conservative so wrapped lines never overrun their column.
const AVG_GLYPH_ADVANCE: f32 = 0.5;

// ── Palette (shared by the templates) ────────────────────────────────────

pub(crate) const BRAND: (f32, f32, f32) = (0.290, 0.502, 1.0); // #4a80ff
pub(crate) const LIGHT_GRAY: (f32, f32, f32) = (0.953, 0.957, 0.965); // #f3f4f6
pub(crate) const DARK_GRAY: (f32, f32, f32) = (0.216, 0.255, 0.318); // #374151
pub(crate) const MID_GRAY: (f32, f32, f32) = (0.420, 0.447, 0.502); // #6b7280
pub(crate) const HAIRLINE: (f32, f32, f32) = (0.898, 0.906, 0.922); // #e5e7eb
pub(crate) const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);

/// Rendering options independent of the structured data.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Company name printed in the invoice header band.
    pub letterhead: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            letterhead: "QuickDocs Inc.".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            letterhead: config.letterhead.clone(),
        }
    }
}

/// Render a structured document with the template it was generated for.
pub fn render(
    document: &StructuredDocument,
    options: &RenderOptions,
) -> Result<RenderedDocument, DocGenError> {
    match document {
        StructuredDocument::Invoice(data) => invoice::render_invoice(data, options),
        StructuredDocument::Report(data) => report::render_report(data),
        StructuredDocument::Resume(data) => resume::render_resume(data),
    }
}

// ── Text measurement ─────────────────────────────────────────────────────

/// Estimated rendered width of a string in millimetres.
pub(crate) fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_GLYPH_ADVANCE * PT_TO_MM
}

/// Character budget for one wrapped line in a column of `width_mm`.
pub(crate) fn max_chars_for_width(width_mm: f32, font_size: f32) -> usize {
    let per_char = font_size * AVG_GLYPH_ADVANCE * PT_TO_MM;
    ((width_mm / per_char).floor() as usize).max(1)
}

/// Word-wrap `text` into lines of at most `max_chars` characters.
///
/// Explicit newlines are respected; a blank input still yields one (empty)
/// line so callers can advance the cursor uniformly.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars
            {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Wrapped line count for `text` in a column of `width_mm` at `font_size` —
/// used by layouts that must know a block's height before writing it
/// (invoice row heights, zebra fills).
pub(crate) fn wrapped_lines(text: &str, width_mm: f32, font_size: f32) -> Vec<String> {
    wrap_text(text, max_chars_for_width(width_mm, font_size))
}

// ── Fonts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Oblique => &self.oblique,
        }
    }
}

// ── The shared writer/pagination primitive ───────────────────────────────

/// Top-anchored cursor over a printpdf document.
///
/// All template layouts drive one of these: absolute text placement for
/// fixed chrome (headers, footers, table cells), and [`write_wrapped`] for
/// flowing body text with automatic pagination.
///
/// [`write_wrapped`]: DocWriter::write_wrapped
pub(crate) struct DocWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    y: f32,
    page_count: usize,
    bottom_margin: f32,
}

impl DocWriter {
    /// Create a one-page A4 document with the Helvetica family registered.
    ///
    /// `bottom_margin` is the printable floor used by the overflow check —
    /// the invoice reserves ~50 mm for its fixed footer, the others use the
    /// standard margin.
    pub fn new(title: &str, bottom_margin: f32) -> Result<Self, DocGenError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        fn font_err(e: impl std::fmt::Display) -> DocGenError {
            DocGenError::RenderFailed {
                detail: format!("font registration failed: {}", e),
            }
        }
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(font_err)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(font_err)?,
            oblique: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(font_err)?,
        };
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            fonts,
            y: MARGIN,
            page_count: 1,
            bottom_margin,
        })
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Start a new page and reset the cursor to the top margin.
    pub fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = MARGIN;
        self.page_count += 1;
    }

    /// The common pagination rule: break before a block of `needed` mm
    /// would cross the printable floor.
    pub fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > PAGE_HEIGHT - self.bottom_margin {
            self.new_page();
        }
    }

    /// Convert a top-anchored baseline to printpdf's bottom-left origin.
    fn pdf_y(y_top: f32) -> Mm {
        Mm(PAGE_HEIGHT - y_top)
    }

    // ── Colour state ─────────────────────────────────────────────────────

    /// Set the fill colour (affects both text and filled shapes).
    pub fn set_fill(&self, (r, g, b): (f32, f32, f32)) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn set_outline(&self, (r, g, b): (f32, f32, f32), thickness_pt: f32) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
        self.layer.set_outline_thickness(thickness_pt);
    }

    // ── Text placement ───────────────────────────────────────────────────

    /// Write a single line at an absolute position (no cursor movement).
    pub fn text_at(&self, text: &str, x: f32, y_top: f32, style: FontStyle, size: f32) {
        self.layer
            .use_text(text, size, Mm(x), Self::pdf_y(y_top), self.fonts.get(style));
    }

    /// Write a single line at the current cursor (no cursor movement).
    pub fn text(&self, text: &str, x: f32, style: FontStyle, size: f32) {
        self.text_at(text, x, self.y, style, size);
    }

    /// Right-align a single line so it ends at `x_right`.
    pub fn text_right(&self, text: &str, x_right: f32, y_top: f32, style: FontStyle, size: f32) {
        let x = x_right - text_width_mm(text, size);
        self.text_at(text, x.max(0.0), y_top, style, size);
    }

    /// Centre a single line on `x_center`.
    pub fn text_center(&self, text: &str, x_center: f32, y_top: f32, style: FontStyle, size: f32) {
        let x = x_center - text_width_mm(text, size) / 2.0;
        self.text_at(text, x.max(0.0), y_top, style, size);
    }

    /// The shared "print wrapped text, advance cursor, paginate on overflow"
    /// primitive. Returns the number of lines written.
    pub fn write_wrapped(
        &mut self,
        text: &str,
        x: f32,
        width_mm: f32,
        style: FontStyle,
        size: f32,
    ) -> usize {
        let lines = wrapped_lines(text, width_mm, size);
        self.ensure_space(lines.len() as f32 * LINE_HEIGHT);
        for line in &lines {
            self.text(line, x, style, size);
            self.y += LINE_HEIGHT;
        }
        lines.len()
    }

    // ── Shapes ───────────────────────────────────────────────────────────

    /// Filled rectangle; `y_top` is the rectangle's top edge.
    pub fn fill_rect(&self, x: f32, y_top: f32, width: f32, height: f32, color: (f32, f32, f32)) {
        self.set_fill(color);
        let rect = Rect::new(
            Mm(x),
            Self::pdf_y(y_top + height),
            Mm(x + width),
            Self::pdf_y(y_top),
        )
        .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    /// Horizontal rule from `x1` to `x2` at `y_top`.
    pub fn hline(&self, x1: f32, x2: f32, y_top: f32, color: (f32, f32, f32), thickness_pt: f32) {
        self.set_outline(color, thickness_pt);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Self::pdf_y(y_top)), false),
                (Point::new(Mm(x2), Self::pdf_y(y_top)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    /// Save the document and hand back the finished output.
    pub fn finish(self, template: TemplateKind) -> Result<RenderedDocument, DocGenError> {
        let page_count = self.page_count;
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf).map_err(|e| DocGenError::RenderFailed {
            detail: format!("PDF save failed: {}", e),
        })?;
        let pdf_bytes = buf
            .into_inner()
            .map_err(|e| DocGenError::RenderFailed {
                detail: format!("PDF buffer flush failed: {}", e),
            })?;

        Ok(RenderedDocument {
            pdf_bytes,
            page_count,
            template,
        })
    }
}

/// Currency formatting: exactly two decimal places, `$` prefix.
pub(crate) fn currency(amount: f64) -> String {
    format!("${:.2}", amount)
}
