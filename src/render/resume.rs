//! Resume layout: centred name and contact line, then Professional Summary,
//! Experience, Education and Skills sections over the shared wrapped-text
//! primitive.

use super::{DocWriter, FontStyle, DARK_GRAY, HAIRLINE, MARGIN, MID_GRAY, PAGE_WIDTH};
use crate::error::DocGenError;
use crate::output::RenderedDocument;
use crate::template::{ResumeData, TemplateKind};

const BODY_WIDTH: f32 = 170.0;
const BULLET_WIDTH: f32 = 168.0;

fn section_heading(w: &mut DocWriter, heading: &str) {
    w.ensure_space(14.0);
    w.set_fill(DARK_GRAY);
    w.text(heading, MARGIN, FontStyle::Bold, 14.0);
    w.advance(2.0);
    w.hline(MARGIN, PAGE_WIDTH - MARGIN, w.y(), HAIRLINE, 0.5);
    w.advance(7.0);
}

/// Multi-line descriptions become one bullet per line.
fn bulleted(description: &str) -> String {
    let bullets: Vec<String> = description
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("\u{2022} {}", line.trim()))
        .collect();
    bullets.join("\n")
}

pub fn render_resume(data: &ResumeData) -> Result<RenderedDocument, DocGenError> {
    let mut w = DocWriter::new("Resume", MARGIN)?;

    // Name and contact line, centred.
    w.set_fill(DARK_GRAY);
    w.text_center(&data.contact.name, PAGE_WIDTH / 2.0, 20.0, FontStyle::Bold, 28.0);
    w.set_fill(MID_GRAY);
    let contact = match (data.contact.phone.is_empty(), data.contact.email.is_empty()) {
        (false, false) => format!("{}  |  {}", data.contact.phone, data.contact.email),
        (false, true) => data.contact.phone.clone(),
        (true, false) => data.contact.email.clone(),
        (true, true) => String::new(),
    };
    w.text_center(&contact, PAGE_WIDTH / 2.0, 28.0, FontStyle::Regular, 12.0);
    w.hline(MARGIN, PAGE_WIDTH - MARGIN, 33.0, HAIRLINE, 0.5);
    w.set_y(42.0);

    if !data.summary.is_empty() {
        section_heading(&mut w, "Professional Summary");
        w.set_fill(MID_GRAY);
        w.write_wrapped(&data.summary, MARGIN, BODY_WIDTH, FontStyle::Regular, 11.0);
        w.advance(8.0);
    }

    if !data.experience.is_empty() {
        section_heading(&mut w, "Experience");
        for entry in &data.experience {
            w.ensure_space(16.0);
            w.set_fill(DARK_GRAY);
            w.text(&entry.role, MARGIN, FontStyle::Bold, 12.0);
            w.text_right(&entry.dates, PAGE_WIDTH - MARGIN, w.y(), FontStyle::Regular, 10.0);
            w.advance(6.0);
            w.set_fill(MID_GRAY);
            w.text(&entry.company, MARGIN, FontStyle::Oblique, 11.0);
            w.advance(6.0);
            if !entry.description.is_empty() {
                w.write_wrapped(
                    &bulleted(&entry.description),
                    MARGIN + 2.0,
                    BULLET_WIDTH,
                    FontStyle::Regular,
                    10.0,
                );
            }
            w.advance(6.0);
        }
        w.advance(2.0);
    }

    if !data.education.is_empty() {
        section_heading(&mut w, "Education");
        for entry in &data.education {
            w.ensure_space(14.0);
            w.set_fill(DARK_GRAY);
            w.text(&entry.degree, MARGIN, FontStyle::Bold, 12.0);
            w.text_right(&entry.dates, PAGE_WIDTH - MARGIN, w.y(), FontStyle::Regular, 10.0);
            w.advance(6.0);
            w.set_fill(MID_GRAY);
            w.text(&entry.school, MARGIN, FontStyle::Oblique, 11.0);
            w.advance(8.0);
        }
        w.advance(2.0);
    }

    if !data.skills.is_empty() {
        section_heading(&mut w, "Skills");
        w.set_fill(MID_GRAY);
        w.write_wrapped(
            &data.skills.join("  \u{2022}  "),
            MARGIN,
            BODY_WIDTH,
            FontStyle::Regular,
            11.0,
        );
    }

    w.finish(TemplateKind::Resume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Contact, Education, Experience};

    fn sample() -> ResumeData {
        ResumeData {
            contact: Contact {
                name: "Ada Lovelace".to_string(),
                phone: "555-0100".to_string(),
                email: "ada@example.com".to_string(),
            },
            summary: "Analytical engineer with a decade of experience.".to_string(),
            experience: vec![Experience {
                company: "Analytical Engines Ltd".to_string(),
                role: "Principal Engineer".to_string(),
                dates: "1840 - 1852".to_string(),
                description: "Designed the first program\nPublished extensive notes".to_string(),
            }],
            education: vec![Education {
                school: "Home tutoring".to_string(),
                degree: "Mathematics".to_string(),
                dates: "1830s".to_string(),
            }],
            skills: vec!["Mathematics".to_string(), "Translation".to_string()],
        }
    }

    #[test]
    fn one_page_for_a_short_resume() {
        let doc = render_resume(&sample()).unwrap();
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.template, TemplateKind::Resume);
    }

    #[test]
    fn long_experience_paginates() {
        let mut data = sample();
        let description =
            "Shipped a large system component with measurable user impact\n".repeat(12);
        data.experience = (0..10)
            .map(|i| Experience {
                company: format!("Company {}", i),
                role: "Engineer".to_string(),
                dates: "2020 - 2024".to_string(),
                description: description.clone(),
            })
            .collect();
        let doc = render_resume(&data).unwrap();
        assert!(doc.page_count > 1);
    }

    #[test]
    fn empty_resume_renders() {
        let doc = render_resume(&ResumeData::default()).unwrap();
        assert_eq!(doc.page_count, 1);
    }

    #[test]
    fn multiline_description_gets_one_bullet_per_line() {
        let text = bulleted("first line\nsecond line\n\nthird");
        assert_eq!(text, "\u{2022} first line\n\u{2022} second line\n\u{2022} third");
    }
}
