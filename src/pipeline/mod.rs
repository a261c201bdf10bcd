//! Pipeline stages for image-to-document generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different remote provider) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! acquire ──▶ crop ──▶ extract ──▶ generate ──▶ render
//! (bytes)   (optional)  (remote)    (remote)   (local PDF)
//! ```
//!
//! 1. [`acquire`]  — validate and decode raw bytes into an [`acquire::ImageAsset`]
//! 2. [`crop`]     — map a displayed-space rectangle to source pixels and
//!    rasterise the selection; pure and synchronous
//! 3. [`extract`]  — remote plain-text extraction; first of the two
//!    suspension points
//! 4. [`generate`] — remote schema-constrained generation; second suspension
//!    point, only reachable with non-empty extracted text
//!
//! Rendering lives in [`crate::render`] — it is deterministic local layout,
//! not a remote stage.

pub mod acquire;
pub mod crop;
pub mod extract;
pub mod generate;
