//! Report layout: centred title, then Introduction, the numbered body
//! sections, and a Conclusion as flowing headed paragraphs.

use super::{DocWriter, FontStyle, DARK_GRAY, MARGIN, MID_GRAY, PAGE_WIDTH};
use crate::error::DocGenError;
use crate::output::RenderedDocument;
use crate::template::{ReportData, TemplateKind};

/// Flowing body column width.
const BODY_WIDTH: f32 = 170.0;

/// A heading plus its paragraph, with the break check before each part so a
/// heading never ends up orphaned at the bottom of a page.
fn write_section(w: &mut DocWriter, heading: &str, body: &str) {
    w.ensure_space(18.0);
    w.set_fill(DARK_GRAY);
    w.text(heading, MARGIN, FontStyle::Bold, 14.0);
    w.advance(8.0);

    w.set_fill(MID_GRAY);
    w.write_wrapped(body, MARGIN, BODY_WIDTH, FontStyle::Regular, 12.0);
    w.advance(10.0);
}

pub fn render_report(data: &ReportData) -> Result<RenderedDocument, DocGenError> {
    let mut w = DocWriter::new("Report", MARGIN)?;

    w.set_fill(DARK_GRAY);
    w.text_center(&data.title, PAGE_WIDTH / 2.0, 20.0, FontStyle::Bold, 24.0);
    w.set_y(35.0);

    write_section(&mut w, "Introduction", &data.introduction);
    for section in &data.sections {
        write_section(&mut w, &section.heading, &section.content);
    }
    write_section(&mut w, "Conclusion", &data.conclusion);

    w.finish(TemplateKind::Report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ReportSection;

    fn section(heading: &str, content: &str) -> ReportSection {
        ReportSection {
            heading: heading.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn short_report_is_one_page() {
        let data = ReportData {
            title: "Quarterly Summary".to_string(),
            introduction: "A short introduction.".to_string(),
            sections: vec![section("Findings", "Everything is nominal.")],
            conclusion: "Nothing to report.".to_string(),
        };
        let doc = render_report(&data).unwrap();
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.template, TemplateKind::Report);
    }

    #[test]
    fn long_sections_paginate() {
        let body = "The quick brown fox jumps over the lazy dog. ".repeat(60);
        let data = ReportData {
            title: "Annual Review".to_string(),
            introduction: body.clone(),
            sections: (0..4)
                .map(|i| section(&format!("Section {}", i + 1), &body))
                .collect(),
            conclusion: body,
        };
        let doc = render_report(&data).unwrap();
        assert!(doc.page_count > 1);
    }

    #[test]
    fn empty_report_renders() {
        let doc = render_report(&ReportData::default()).unwrap();
        assert_eq!(doc.page_count, 1);
    }

    #[test]
    fn page_count_is_stable_across_renders() {
        let body = "Repeated content for determinism checks. ".repeat(40);
        let data = ReportData {
            title: "Determinism".to_string(),
            introduction: body.clone(),
            sections: vec![section("One", &body), section("Two", &body)],
            conclusion: body,
        };
        let a = render_report(&data).unwrap();
        let b = render_report(&data).unwrap();
        assert_eq!(a.page_count, b.page_count);
    }
}
