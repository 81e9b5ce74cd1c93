use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

use super::asset::LogoAsset;
use super::layout::{Color, DrawInstruction, FontWeight, ImageRef, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::RenderError;

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_ITALIC: &str = "F3";
const LOGO_NAME: &str = "Im1";

/// Serialize draw instructions into a single-page PDF.
pub fn encode(instructions: &[DrawInstruction], logo: &LogoAsset) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font = |base: &str| {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        }
    };
    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let italic_id = doc.add_object(font("Helvetica-Oblique"));
    let logo_id = add_logo(&mut doc, logo)?;

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
            FONT_ITALIC => italic_id,
        },
        "XObject" => dictionary! {
            LOGO_NAME => logo_id,
        },
    });

    let page_height = mm(PAGE_HEIGHT);
    let content = Content {
        operations: instructions
            .iter()
            .flat_map(|instruction| operations(instruction, page_height))
            .collect::<Vec<_>>(),
    };
    let mut content_stream = Stream::new(dictionary! {}, content.encode()?);
    content_stream.compress()?;
    let content_id = doc.add_object(content_stream);

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), mm(PAGE_WIDTH).into(), page_height.into()],
        "Contents" => content_id,
        "Resources" => resources_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    debug!(bytes = bytes.len(), instructions = instructions.len(), "pdf encoded");
    Ok(bytes)
}

/// Embed the logo as an RGB image with a soft mask for its alpha channel.
fn add_logo(doc: &mut Document, logo: &LogoAsset) -> Result<lopdf::ObjectId, RenderError> {
    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => logo.width(),
        "Height" => logo.height(),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };

    if !logo.is_opaque() {
        let mut mask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => logo.width(),
                "Height" => logo.height(),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            logo.alpha().to_vec(),
        );
        mask.compress()?;
        image_dict.set("SMask", doc.add_object(mask));
    }

    let mut image = Stream::new(image_dict, logo.rgb().to_vec());
    image.compress()?;
    Ok(doc.add_object(image))
}

fn operations(instruction: &DrawInstruction, page_height: f32) -> Vec<Operation> {
    match instruction {
        DrawInstruction::FilledRect {
            x,
            y,
            width,
            height,
            color,
        } => vec![
            fill_color(*color),
            Operation::new(
                "re",
                vec![
                    mm(*x).into(),
                    (page_height - mm(y + height)).into(),
                    mm(*width).into(),
                    mm(*height).into(),
                ],
            ),
            Operation::new("f", vec![]),
        ],
        DrawInstruction::Text { x, y, text, style } => {
            let font = match style.weight {
                FontWeight::Normal => FONT_REGULAR,
                FontWeight::Bold => FONT_BOLD,
                FontWeight::Italic => FONT_ITALIC,
            };
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![font.into(), style.size.into()]),
                fill_color(style.color),
                Operation::new("Td", vec![mm(*x).into(), (page_height - mm(*y)).into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ]
        }
        DrawInstruction::Image {
            x,
            y,
            width,
            height,
            image,
        } => {
            let name = match image {
                ImageRef::Logo => LOGO_NAME,
            };
            vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        mm(*width).into(),
                        0.into(),
                        0.into(),
                        mm(*height).into(),
                        mm(*x).into(),
                        (page_height - mm(y + height)).into(),
                    ],
                ),
                Operation::new("Do", vec![name.into()]),
                Operation::new("Q", vec![]),
            ]
        }
    }
}

fn fill_color(color: Color) -> Operation {
    Operation::new(
        "rg",
        vec![
            (color.r as f32 / 255.0).into(),
            (color.g as f32 / 255.0).into(),
            (color.b as f32 / 255.0).into(),
        ],
    )
}

fn mm(value: f32) -> f32 {
    value * PT_PER_MM
}

/// Latin-1 maps straight onto WinAnsi; the 0x80-0x9F block holds the
/// typographic punctuation and a few letters. Everything else becomes `?`.
fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}
