use lopdf::content::Content;
use lopdf::{Document, Object};
use pretty_assertions::assert_eq;
use quotation::pdf::{
    encode, max_rows, render, Color, DrawInstruction, FontWeight, ImageRef, LogoAsset,
    RenderSettings,
};
use quotation::{generate_pdf, HeaderField, ItemField, Quotation, RenderError};

fn sample_quotation() -> Quotation {
    Quotation::new()
        .set_field(HeaderField::QuotationNumber, "Q-1")
        .set_field(HeaderField::Date, "2026-10-18")
        .set_field(HeaderField::ClientName, "Acme")
        .set_field(HeaderField::ClientAddress, "1 Road")
        .set_item_field(0, ItemField::Description, "A")
        .and_then(|q| q.set_item_field(0, ItemField::Quantity, "1"))
        .and_then(|q| q.set_item_field(0, ItemField::UnitPrice, "10"))
        .map(|q| q.add_item())
        .and_then(|q| q.set_item_field(1, ItemField::Description, "B"))
        .and_then(|q| q.set_item_field(1, ItemField::Quantity, "2"))
        .and_then(|q| q.set_item_field(1, ItemField::UnitPrice, "7.75"))
        .unwrap()
        .set_tax("2")
}

fn texts(instructions: &[DrawInstruction]) -> Vec<&str> {
    instructions
        .iter()
        .filter_map(|i| match i {
            DrawInstruction::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn text_at<'a>(instructions: &'a [DrawInstruction], wanted: &str) -> &'a DrawInstruction {
    instructions
        .iter()
        .find(|i| matches!(i, DrawInstruction::Text { text, .. } if text == wanted))
        .unwrap_or_else(|| panic!("no text {wanted:?}"))
}

#[test]
fn texts_appear_in_page_order() {
    let out = render(&sample_quotation(), &LogoAsset::placeholder(), &RenderSettings::default())
        .unwrap();

    assert_eq!(
        texts(&out),
        vec![
            "QUOTATIONBOX",
            "Quotation Number: Q-1",
            "Date: 2026-10-18",
            "Client Name: Acme",
            "Client Address: 1 Road",
            "Description",
            "Quantity",
            "Unit Price",
            "Amount",
            "A",
            "1",
            "$10.00",
            "$10.00",
            "B",
            "2",
            "$7.75",
            "$15.50",
            "Subtotal",
            "$25.50",
            "Total",
            "$27.50",
            "Thank you for your business!",
        ]
    );
}

#[test]
fn logo_comes_first_and_title_is_green() {
    let out = render(&sample_quotation(), &LogoAsset::placeholder(), &RenderSettings::default())
        .unwrap();

    assert_eq!(
        out[0],
        DrawInstruction::Image {
            x: 10.0,
            y: 10.0,
            width: 30.0,
            height: 30.0,
            image: ImageRef::Logo,
        }
    );
    match &out[1] {
        DrawInstruction::Text { x, y, text, style } => {
            assert_eq!((*x, *y), (50.0, 20.0));
            assert_eq!(text, "QUOTATIONBOX");
            assert_eq!(style.weight, FontWeight::Bold);
            assert_eq!(style.size, 20.0);
            assert_eq!(style.color, Color::PRIMARY);
        }
        other => panic!("expected title text, got {other:?}"),
    }
}

#[test]
fn rows_alternate_shading_below_the_green_header() {
    let out = render(&sample_quotation(), &LogoAsset::placeholder(), &RenderSettings::default())
        .unwrap();

    let rects: Vec<(f32, Color)> = out
        .iter()
        .filter_map(|i| match i {
            DrawInstruction::FilledRect {
                x, y, width, color, ..
            } => {
                assert_eq!((*x, *width), (10.0, 190.0));
                Some((*y, *color))
            }
            _ => None,
        })
        .collect();

    assert_eq!(
        rects,
        vec![
            (100.0, Color::PRIMARY),
            (110.0, Color::ROW_SHADE),
            (120.0, Color::WHITE),
        ]
    );
}

#[test]
fn totals_and_footer_follow_the_last_row() {
    let out = render(&sample_quotation(), &LogoAsset::placeholder(), &RenderSettings::default())
        .unwrap();

    let DrawInstruction::Text { x, y, .. } = text_at(&out, "Subtotal") else {
        unreachable!()
    };
    assert_eq!((*x, *y), (120.0, 140.0));

    let DrawInstruction::Text { x, y, style, .. } = text_at(&out, "$27.50") else {
        unreachable!()
    };
    assert_eq!((*x, *y), (165.0, 150.0));
    assert_eq!(style.color, Color::PRIMARY);

    let DrawInstruction::Text { y, style, .. } = text_at(&out, "Thank you for your business!")
    else {
        unreachable!()
    };
    assert_eq!(*y, 170.0);
    assert_eq!(style.weight, FontWeight::Italic);
    assert_eq!(style.color, Color::MUTED);
}

#[test]
fn configured_texts_replace_the_defaults() {
    let settings = RenderSettings {
        title: "ACME QUOTES".to_string(),
        currency_symbol: "€".to_string(),
        footer: "Valid for 30 days".to_string(),
    };
    let out = render(&sample_quotation(), &LogoAsset::placeholder(), &settings).unwrap();
    let texts = texts(&out);

    assert_eq!(texts[0], "ACME QUOTES");
    assert!(texts.contains(&"€27.50"));
    assert_eq!(texts.last(), Some(&"Valid for 30 days"));
}

#[test]
fn empty_quotation_still_renders_header_and_totals() {
    let quotation = Quotation::new().remove_item(0).unwrap();
    let out = render(&quotation, &LogoAsset::placeholder(), &RenderSettings::default()).unwrap();

    let DrawInstruction::Text { y, .. } = text_at(&out, "Subtotal") else {
        unreachable!()
    };
    assert_eq!(*y, 120.0);
    assert!(texts(&out).contains(&"$0.00"));
}

#[test]
fn rendering_is_deterministic() {
    let quotation = sample_quotation();
    let logo = LogoAsset::placeholder();
    let settings = RenderSettings::default();

    let first = render(&quotation, &logo, &settings).unwrap();
    let second = render(&quotation, &logo, &settings).unwrap();
    assert_eq!(first, second);

    let first = encode(&first, &logo).unwrap();
    let second = encode(&second, &logo).unwrap();
    assert_eq!(first, second);
}

#[test]
fn too_many_rows_are_rejected() {
    let mut quotation = Quotation::new();
    while quotation.items().len() <= max_rows() {
        quotation = quotation.add_item();
    }

    let err = render(&quotation, &LogoAsset::placeholder(), &RenderSettings::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::PageOverflow { rows: 14, capacity: 13 }
    ));

    // A full page is still fine
    let full = quotation.remove_item(0).unwrap();
    assert!(render(&full, &LogoAsset::placeholder(), &RenderSettings::default()).is_ok());
}

#[test]
fn encoded_pdf_has_one_page_with_the_totals() {
    let bytes = generate_pdf(
        &sample_quotation(),
        &LogoAsset::placeholder(),
        &RenderSettings::default(),
    )
    .unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));

    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let page_id = *pages.get(&1).unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    let shown: Vec<Vec<u8>> = content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(bytes.clone()),
            _ => None,
        })
        .collect();

    assert!(shown.contains(&b"Subtotal".to_vec()));
    assert!(shown.contains(&b"$27.50".to_vec()));
    assert_eq!(content.operations.iter().filter(|op| op.operator == "Do").count(), 1);
}

#[test]
fn quantity_cell_shows_the_text_as_entered() {
    let quotation = Quotation::new()
        .set_item_field(0, ItemField::Description, "Cable")
        .and_then(|q| q.set_item_field(0, ItemField::Quantity, "1.50"))
        .and_then(|q| q.set_item_field(0, ItemField::UnitPrice, "4"))
        .unwrap();
    let out = render(&quotation, &LogoAsset::placeholder(), &RenderSettings::default()).unwrap();

    let DrawInstruction::Text { x, y, .. } = text_at(&out, "1.50") else {
        unreachable!()
    };
    assert_eq!((*x, *y), (75.0, 117.0));
    assert!(texts(&out).contains(&"$6.00"));

    // A blank quantity draws nothing in its cell
    let blank = quotation
        .set_item_field(0, ItemField::Quantity, "")
        .unwrap();
    let out = render(&blank, &LogoAsset::placeholder(), &RenderSettings::default()).unwrap();
    let row_texts: Vec<&str> = texts(&out)[9..13].to_vec();
    assert_eq!(row_texts, vec!["Cable", "$4.00", "$0.00", "Subtotal"]);
}
