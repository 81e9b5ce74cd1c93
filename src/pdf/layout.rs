//! Fixed single-page layout.
//!
//! Coordinates are millimetres on an A4 page with the origin at the top-left
//! corner. Text `y` is the baseline; rectangle and image `y` is the top edge.

use tracing::debug;

use super::asset::LogoAsset;
use crate::error::RenderError;
use crate::quotation::{format_money, Quotation};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
const BOTTOM_MARGIN: f32 = 10.0;

const LOGO_X: f32 = 10.0;
const LOGO_Y: f32 = 10.0;
const LOGO_BOX: f32 = 30.0;
const TITLE_X: f32 = 50.0;
const TITLE_Y: f32 = 20.0;

const LEFT_X: f32 = 10.0;
const DETAILS_Y: [f32; 4] = [50.0, 60.0, 70.0, 80.0];

const TABLE_X: f32 = 10.0;
const TABLE_WIDTH: f32 = 190.0;
const TABLE_Y: f32 = 100.0;
const ROW_HEIGHT: f32 = 10.0;
const BASELINE_OFFSET: f32 = 7.0;
const COLUMN_X: [f32; 4] = [15.0, 75.0, 115.0, 165.0];
const COLUMN_LABELS: [&str; 4] = ["Description", "Quantity", "Unit Price", "Amount"];

const TOTALS_LABEL_X: f32 = 120.0;
const TOTALS_VALUE_X: f32 = 165.0;
const FOOTER_GAP: f32 = 20.0;

const TITLE_SIZE: f32 = 20.0;
const DETAILS_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const PRIMARY: Color = Color::rgb(0x4C, 0xAF, 0x50);
    pub const ROW_SHADE: Color = Color::rgb(0xF4, 0xF4, 0xF4);
    pub const TEXT: Color = Color::rgb(0x33, 0x33, 0x33);
    pub const MUTED: Color = Color::rgb(0x66, 0x66, 0x66);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    /// Font size in points
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    const fn new(weight: FontWeight, size: f32, color: Color) -> Self {
        Self { weight, size, color }
    }
}

/// Images the encoder knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef {
    Logo,
}

/// One primitive drawing operation, in page order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: ImageRef,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
    },
    FilledRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
}

/// Document texts that come from configuration rather than the quotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub title: String,
    pub currency_symbol: String,
    pub footer: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            title: "QUOTATIONBOX".to_string(),
            currency_symbol: "$".to_string(),
            footer: "Thank you for your business!".to_string(),
        }
    }
}

/// Most item rows that still leave room for totals and footer on one page.
pub fn max_rows() -> usize {
    let first_row = TABLE_Y + ROW_HEIGHT;
    let below_rows = 2.0 * ROW_HEIGHT + FOOTER_GAP;
    ((PAGE_HEIGHT - BOTTOM_MARGIN - first_row - below_rows) / ROW_HEIGHT).floor() as usize
}

/// Lay out `quotation` as an ordered list of draw instructions.
///
/// Fails with [`RenderError::PageOverflow`] rather than clipping rows.
pub fn render(
    quotation: &Quotation,
    logo: &LogoAsset,
    settings: &RenderSettings,
) -> Result<Vec<DrawInstruction>, RenderError> {
    let rows = quotation.items().len();
    let capacity = max_rows();
    if rows > capacity {
        return Err(RenderError::PageOverflow { rows, capacity });
    }

    let mut out = Vec::with_capacity(16 + rows * 5);
    let symbol = settings.currency_symbol.as_str();

    // Logo and title
    let (logo_width, logo_height) = fit_logo(logo);
    out.push(DrawInstruction::Image {
        x: LOGO_X,
        y: LOGO_Y,
        width: logo_width,
        height: logo_height,
        image: ImageRef::Logo,
    });
    text(
        &mut out,
        TITLE_X,
        TITLE_Y,
        &settings.title,
        TextStyle::new(FontWeight::Bold, TITLE_SIZE, Color::PRIMARY),
    );

    // Quotation details
    let details_style = TextStyle::new(FontWeight::Bold, DETAILS_SIZE, Color::TEXT);
    let details = [
        format!("Quotation Number: {}", quotation.quotation_number()),
        format!("Date: {}", quotation.date()),
        format!("Client Name: {}", quotation.client_name()),
        format!("Client Address: {}", quotation.client_address()),
    ];
    for (line, y) in details.iter().zip(DETAILS_Y) {
        text(&mut out, LEFT_X, y, line, details_style);
    }

    // Table header
    out.push(DrawInstruction::FilledRect {
        x: TABLE_X,
        y: TABLE_Y,
        width: TABLE_WIDTH,
        height: ROW_HEIGHT,
        color: Color::PRIMARY,
    });
    let header_style = TextStyle::new(FontWeight::Bold, DETAILS_SIZE, Color::WHITE);
    for (label, x) in COLUMN_LABELS.iter().zip(COLUMN_X) {
        text(&mut out, x, TABLE_Y + BASELINE_OFFSET, label, header_style);
    }

    // Item rows
    let row_style = TextStyle::new(FontWeight::Bold, BODY_SIZE, Color::TEXT);
    let mut y = TABLE_Y + ROW_HEIGHT;
    for (index, item) in quotation.items().iter().enumerate() {
        out.push(DrawInstruction::FilledRect {
            x: TABLE_X,
            y,
            width: TABLE_WIDTH,
            height: ROW_HEIGHT,
            color: if index % 2 == 0 { Color::ROW_SHADE } else { Color::WHITE },
        });

        let cells = [
            item.description().to_string(),
            item.quantity().to_string(),
            format_money(symbol, item.unit_price_value()),
            format_money(symbol, item.amount()),
        ];
        for (cell, x) in cells.iter().zip(COLUMN_X) {
            text(&mut out, x, y + BASELINE_OFFSET, cell, row_style);
        }

        y += ROW_HEIGHT;
    }

    // Totals
    let totals_style = TextStyle::new(FontWeight::Bold, BODY_SIZE, Color::PRIMARY);
    y += ROW_HEIGHT;
    text(&mut out, TOTALS_LABEL_X, y, "Subtotal", totals_style);
    text(&mut out, TOTALS_VALUE_X, y, &format_money(symbol, quotation.subtotal()), totals_style);
    y += ROW_HEIGHT;
    text(&mut out, TOTALS_LABEL_X, y, "Total", totals_style);
    text(&mut out, TOTALS_VALUE_X, y, &format_money(symbol, quotation.total()), totals_style);

    // Footer
    y += FOOTER_GAP;
    text(
        &mut out,
        LEFT_X,
        y,
        &settings.footer,
        TextStyle::new(FontWeight::Italic, BODY_SIZE, Color::MUTED),
    );

    debug!(rows, instructions = out.len(), "quotation laid out");
    Ok(out)
}

/// Blank text draws nothing, so it is not emitted.
fn text(out: &mut Vec<DrawInstruction>, x: f32, y: f32, text: &str, style: TextStyle) {
    if text.trim().is_empty() {
        return;
    }
    out.push(DrawInstruction::Text {
        x,
        y,
        text: text.to_string(),
        style,
    });
}

/// Scale the logo into its square box, keeping the aspect ratio.
fn fit_logo(logo: &LogoAsset) -> (f32, f32) {
    let (w, h) = (logo.width() as f32, logo.height() as f32);
    if w <= 0.0 || h <= 0.0 {
        return (LOGO_BOX, LOGO_BOX);
    }
    let scale = LOGO_BOX / w.max(h);
    (w * scale, h * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_leaves_room_for_totals_and_footer() {
        let rows = max_rows();
        assert_eq!(rows, 13);
        let footer_y = TABLE_Y + ROW_HEIGHT * (rows as f32 + 1.0) + 2.0 * ROW_HEIGHT + FOOTER_GAP;
        assert!(footer_y <= PAGE_HEIGHT - BOTTOM_MARGIN);
    }

    #[test]
    fn wide_logo_keeps_aspect_ratio() {
        let logo = LogoAsset::from_image(&image::DynamicImage::new_rgba8(60, 30));
        assert_eq!(fit_logo(&logo), (30.0, 15.0));
    }

    #[test]
    fn blank_text_is_skipped() {
        let mut out = Vec::new();
        let style = TextStyle::new(FontWeight::Normal, 10.0, Color::TEXT);
        text(&mut out, 0.0, 0.0, "   ", style);
        assert!(out.is_empty());
        text(&mut out, 0.0, 0.0, "x", style);
        assert_eq!(out.len(), 1);
    }
}
