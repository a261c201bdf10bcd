//! Templates: the pairing of a generation schema with a layout algorithm.
//!
//! Each [`TemplateKind`] owns two artefacts:
//!
//! * a **schema descriptor** — the declarative JSON shape sent to the remote
//!   structured-generation capability (object/array/string/number fields with
//!   required-field lists), and
//! * a **typed document** — the [`StructuredDocument`] variant the reply is
//!   parsed into.
//!
//! The descriptors ask the model for every field (`required` lists are
//! exhaustive), but parsing is deliberately lenient: every field carries
//! `#[serde(default)]` so a missing numeric becomes `0.0` and a missing
//! string becomes `""`. The renderer substitutes defaults instead of failing
//! on absent fields.

use crate::error::DocGenError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// The three document templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Invoice,
    Report,
    Resume,
}

impl TemplateKind {
    /// Stable lowercase name, used for filenames (`invoice.pdf`) and
    /// error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Invoice => "invoice",
            TemplateKind::Report => "report",
            TemplateKind::Resume => "resume",
        }
    }

    /// Download filename for a rendered document of this template.
    pub fn filename(&self) -> String {
        format!("{}.pdf", self.name())
    }

    /// The declarative schema descriptor sent to the remote capability.
    pub fn schema(&self) -> Value {
        match self {
            TemplateKind::Invoice => invoice_schema(),
            TemplateKind::Report => report_schema(),
            TemplateKind::Resume => resume_schema(),
        }
    }

    /// Parse a generation reply into the typed document for this template.
    pub fn parse_document(&self, raw_json: &str) -> Result<StructuredDocument, DocGenError> {
        let invalid = |e: serde_json::Error| DocGenError::SchemaValidationFailed {
            template: self.name().to_string(),
            detail: e.to_string(),
        };
        match self {
            TemplateKind::Invoice => Ok(StructuredDocument::Invoice(
                serde_json::from_str(raw_json).map_err(invalid)?,
            )),
            TemplateKind::Report => Ok(StructuredDocument::Report(
                serde_json::from_str(raw_json).map_err(invalid)?,
            )),
            TemplateKind::Resume => Ok(StructuredDocument::Resume(
                serde_json::from_str(raw_json).map_err(invalid)?,
            )),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateKind {
    type Err = DocGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "invoice" => Ok(TemplateKind::Invoice),
            "report" => Ok(TemplateKind::Report),
            "resume" => Ok(TemplateKind::Resume),
            other => Err(DocGenError::InvalidConfig(format!(
                "Unknown template '{}': expected invoice, report, or resume",
                other
            ))),
        }
    }
}

// ── Schema descriptors ───────────────────────────────────────────────────

fn invoice_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "from": { "type": "STRING", "description": "The sender's name and address." },
            "billTo": { "type": "STRING", "description": "The recipient's name and address." },
            "invoiceNumber": { "type": "STRING" },
            "date": { "type": "STRING" },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "description": { "type": "STRING" },
                        "quantity": { "type": "NUMBER" },
                        "price": { "type": "NUMBER" }
                    },
                    "required": ["description", "quantity", "price"]
                }
            },
            "total": { "type": "NUMBER", "description": "The total amount due." }
        },
        "required": ["from", "billTo", "invoiceNumber", "date", "items", "total"]
    })
}

fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "introduction": { "type": "STRING" },
            "sections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "heading": { "type": "STRING" },
                        "content": { "type": "STRING" }
                    },
                    "required": ["heading", "content"]
                }
            },
            "conclusion": { "type": "STRING" }
        },
        "required": ["title", "introduction", "sections", "conclusion"]
    })
}

fn resume_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "contact": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "phone": { "type": "STRING" },
                    "email": { "type": "STRING" }
                },
                "required": ["name", "phone", "email"]
            },
            "summary": { "type": "STRING" },
            "experience": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "company": { "type": "STRING" },
                        "role": { "type": "STRING" },
                        "dates": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["company", "role", "dates", "description"]
                }
            },
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "school": { "type": "STRING" },
                        "degree": { "type": "STRING" },
                        "dates": { "type": "STRING" }
                    },
                    "required": ["school", "degree", "dates"]
                }
            },
            "skills": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["contact", "summary", "experience", "education", "skills"]
    })
}

// ── Typed documents ──────────────────────────────────────────────────────

/// A schema-conformant record produced by structured generation.
/// Consumed exactly once by the document renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuredDocument {
    Invoice(InvoiceData),
    Report(ReportData),
    Resume(ResumeData),
}

impl StructuredDocument {
    /// The template this document was generated for.
    pub fn template(&self) -> TemplateKind {
        match self {
            StructuredDocument::Invoice(_) => TemplateKind::Invoice,
            StructuredDocument::Report(_) => TemplateKind::Report,
            StructuredDocument::Resume(_) => TemplateKind::Resume,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub bill_to: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub sections: Vec<ReportSection>,
    #[serde(default)]
    pub conclusion: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub dates: String,
}
