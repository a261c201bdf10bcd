//! Invoice layout: branded header band, party columns, zebra-striped line
//! item table with row-level pagination, totals block and a fixed footer.

use super::{
    currency, wrapped_lines, DocWriter, FontStyle, RenderOptions, BRAND, DARK_GRAY, HAIRLINE,
    LIGHT_GRAY, LINE_HEIGHT, MID_GRAY, PAGE_HEIGHT, PAGE_WIDTH, WHITE,
};
use crate::error::DocGenError;
use crate::output::RenderedDocument;
use crate::template::{InvoiceData, LineItem, TemplateKind};

/// Space reserved at the bottom of every page for the footer block.
const FOOTER_RESERVE: f32 = 50.0;

/// Description column width in the item table.
const DESC_WIDTH: f32 = 105.0;

/// Quantities print without a decimal point when whole.
fn quantity(q: f64) -> String {
    if q.fract() == 0.0 {
        format!("{}", q as i64)
    } else {
        format!("{}", q)
    }
}

/// Dates are filled in by the remote service when legible on the source
/// document; when absent the invoice is dated today.
fn effective_date(date: &str) -> String {
    if date.trim().is_empty() {
        chrono::Local::now().format("%Y-%m-%d").to_string()
    } else {
        date.trim().to_string()
    }
}

pub fn render_invoice(
    data: &InvoiceData,
    options: &RenderOptions,
) -> Result<RenderedDocument, DocGenError> {
    let mut w = DocWriter::new("Invoice", FOOTER_RESERVE)?;

    // Brand band across the top of the first page.
    w.fill_rect(0.0, 0.0, PAGE_WIDTH, 30.0, BRAND);
    w.set_fill(WHITE);
    w.text_at(&options.letterhead, 15.0, 20.0, FontStyle::Bold, 20.0);

    w.set_fill(DARK_GRAY);
    w.text_right("INVOICE", 195.0, 45.0, FontStyle::Bold, 36.0);

    w.set_fill(MID_GRAY);
    w.text_right(
        &format!("Invoice #: {}", data.invoice_number),
        195.0,
        55.0,
        FontStyle::Regular,
        10.0,
    );
    w.text_right(
        &format!("Date: {}", effective_date(&data.date)),
        195.0,
        60.0,
        FontStyle::Regular,
        10.0,
    );

    // Sender and recipient columns.
    w.set_fill(DARK_GRAY);
    w.text_at("From:", 15.0, 75.0, FontStyle::Bold, 11.0);
    w.text_at("Bill To:", 110.0, 75.0, FontStyle::Bold, 11.0);

    let from_lines = wrapped_lines(&data.from, 80.0, 10.0);
    let bill_lines = wrapped_lines(&data.bill_to, 80.0, 10.0);
    let mut line_y = 82.0;
    for line in &from_lines {
        w.text_at(line, 15.0, line_y, FontStyle::Regular, 10.0);
        line_y += LINE_HEIGHT;
    }
    line_y = 82.0;
    for line in &bill_lines {
        w.text_at(line, 110.0, line_y, FontStyle::Regular, 10.0);
        line_y += LINE_HEIGHT;
    }
    let party_lines = from_lines.len().max(bill_lines.len());
    w.set_y(82.0 + party_lines as f32 * LINE_HEIGHT + 15.0);

    draw_table_header(&w);
    w.advance(10.0);

    for (index, item) in data.items.iter().enumerate() {
        draw_item_row(&mut w, index, item);
    }

    // Totals block.
    w.advance(10.0);
    w.ensure_space(10.0);
    w.set_fill(DARK_GRAY);
    w.text_right("Total:", 140.0, w.y(), FontStyle::Bold, 14.0);
    w.set_fill(BRAND);
    w.text_right(&currency(data.total), 190.0, w.y(), FontStyle::Bold, 16.0);

    draw_footer(&w);

    w.finish(TemplateKind::Invoice)
}

fn draw_table_header(w: &DocWriter) {
    let y = w.y();
    w.fill_rect(15.0, y, 180.0, 10.0, DARK_GRAY);
    w.set_fill(WHITE);
    w.text_at("Description", 20.0, y + 6.5, FontStyle::Bold, 10.0);
    w.text_right("Qty", 135.0, y + 6.5, FontStyle::Bold, 10.0);
    w.text_right("Unit Price", 160.0, y + 6.5, FontStyle::Bold, 10.0);
    w.text_right("Total", 190.0, y + 6.5, FontStyle::Bold, 10.0);
}

fn draw_item_row(w: &mut DocWriter, index: usize, item: &LineItem) {
    let desc_lines = wrapped_lines(&item.description, DESC_WIDTH, 10.0);
    let row_height = desc_lines.len() as f32 * LINE_HEIGHT + 4.0;

    // Rows never straddle a page boundary; an overflowing row moves whole
    // to the next page with the header redrawn above it.
    if w.y() + row_height > PAGE_HEIGHT - FOOTER_RESERVE {
        w.new_page();
        draw_table_header(w);
        w.advance(10.0);
    }

    let y = w.y();
    if index % 2 == 1 {
        w.fill_rect(15.0, y, 180.0, row_height, LIGHT_GRAY);
    }

    w.set_fill(DARK_GRAY);
    let mut text_y = y + LINE_HEIGHT;
    for line in &desc_lines {
        w.text_at(line, 20.0, text_y, FontStyle::Regular, 10.0);
        text_y += LINE_HEIGHT;
    }

    let first_line = y + LINE_HEIGHT;
    w.text_right(&quantity(item.quantity), 135.0, first_line, FontStyle::Regular, 10.0);
    w.text_right(&currency(item.price), 160.0, first_line, FontStyle::Regular, 10.0);
    w.text_right(
        &currency(item.quantity * item.price),
        190.0,
        first_line,
        FontStyle::Regular,
        10.0,
    );

    w.advance(row_height);
}

/// Fixed-position footer on the page the totals landed on.
fn draw_footer(w: &DocWriter) {
    let footer_y = PAGE_HEIGHT - 35.0;

    w.hline(140.0, 195.0, footer_y - 15.0, DARK_GRAY, 0.5);
    w.set_fill(MID_GRAY);
    w.text_center(
        "Authorized Signature",
        167.5,
        footer_y - 10.0,
        FontStyle::Regular,
        8.0,
    );

    w.hline(15.0, 195.0, footer_y, HAIRLINE, 0.5);
    w.text_center(
        "Thank you for your business!",
        PAGE_WIDTH / 2.0,
        footer_y + 6.0,
        FontStyle::Oblique,
        9.0,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, quantity: f64, price: f64) -> LineItem {
        LineItem {
            description: description.to_string(),
            quantity,
            price,
        }
    }

    fn base_invoice() -> InvoiceData {
        InvoiceData {
            from: "Acme Corp\n1 Infinite Loop".to_string(),
            bill_to: "Globex Inc\n2 Main St".to_string(),
            invoice_number: "123".to_string(),
            date: "2025-03-01".to_string(),
            items: vec![item("Consulting", 2.0, 21.0)],
            total: 42.0,
        }
    }

    #[test]
    fn short_invoice_is_one_page() {
        let doc = render_invoice(&base_invoice(), &RenderOptions::default()).unwrap();
        assert_eq!(doc.page_count, 1);
        assert!(doc.pdf_bytes.starts_with(b"%PDF"));
        assert_eq!(doc.template, TemplateKind::Invoice);
    }

    #[test]
    fn many_items_paginate() {
        let mut data = base_invoice();
        data.items = (0..80)
            .map(|i| item(&format!("Line item number {}", i), 1.0, 10.0))
            .collect();
        let doc = render_invoice(&data, &RenderOptions::default()).unwrap();
        assert!(doc.page_count > 1, "expected pagination, got 1 page");
    }

    #[test]
    fn rendering_is_repeatable() {
        let data = base_invoice();
        let a = render_invoice(&data, &RenderOptions::default()).unwrap();
        let b = render_invoice(&data, &RenderOptions::default()).unwrap();
        assert_eq!(a.page_count, b.page_count);
    }

    #[test]
    fn defaulted_fields_render_without_error() {
        let data = InvoiceData::default();
        let doc = render_invoice(&data, &RenderOptions::default()).unwrap();
        assert_eq!(doc.page_count, 1);
    }

    #[test]
    fn whole_quantities_print_without_decimals() {
        assert_eq!(quantity(3.0), "3");
        assert_eq!(quantity(2.5), "2.5");
    }

    #[test]
    fn blank_date_falls_back_to_today() {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(effective_date(""), today);
        assert_eq!(effective_date("  "), today);
        assert_eq!(effective_date("2024-12-31"), "2024-12-31");
    }
}
