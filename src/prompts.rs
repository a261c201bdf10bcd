//! Prompts sent to the remote vision capability.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the extraction instruction or the
//!    structuring framing requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    spinning up a real provider, making prompt regressions easy to catch.

/// Instruction sent alongside the image for plain-text extraction.
///
/// The "text only" framing matters: without it the model adds commentary
/// ("The image contains…") that pollutes downstream structuring.
pub const EXTRACT_INSTRUCTION: &str = "Extract all text from this image. Only return the \
extracted text, without any additional formatting or commentary.";

/// Build the structuring prompt embedding the extracted text.
///
/// The schema itself travels separately in the request's generation config;
/// the prompt only carries the source text and the instruction to fill the
/// schema faithfully.
pub fn structuring_prompt(extracted_text: &str) -> String {
    format!(
        "Based on the following extracted text, populate the provided JSON schema. \
Ensure all fields are filled accurately. Extracted text:\n---\n{}\n---",
        extracted_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_instruction_demands_text_only() {
        assert!(EXTRACT_INSTRUCTION.contains("Only return the extracted text"));
    }

    #[test]
    fn structuring_prompt_embeds_source_text() {
        let p = structuring_prompt("Invoice #123");
        assert!(p.contains("Invoice #123"));
        assert!(p.contains("JSON schema"));
    }
}
