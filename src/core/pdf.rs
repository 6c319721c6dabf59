//! PDF rendering of laid-out receipts with lopdf.
//!
//! Uses the standard Helvetica faces with WinAnsi encoding, so no font files
//! are embedded. Text outside Latin-1 is written as `?`.

use crate::{
    core::receipt::{Align, DrawOp, FontWeight, PAGE_HEIGHT, PAGE_WIDTH, PdfBackend, ReceiptDocument},
    errors::{Error, Result},
};
use lopdf::{
    Document, Object, ObjectId, Stream,
    content::{Content, Operation},
    dictionary,
};

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

/// Helvetica advance widths for ASCII 32..=126, in thousandths of the font size.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // 'A'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // 'a'..'z'
    334, 260, 334, 584, // '{'..'~'
];
const DEFAULT_WIDTH: u16 = 556;

/// Renders receipts with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    fn render(&self, document: &ReceiptDocument) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
        for page in &document.pages {
            let operations: Vec<Operation> = page.ops.iter().flat_map(operations_for).collect();
            let content = Content { operations };
            let encoded = content.encode().map_err(pdf_error)?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = i64::try_from(kids.len()).map_err(|e| Error::Pdf {
            message: e.to_string(),
        })?;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(latin1(&document.title)),
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(|e| Error::Pdf {
            message: e.to_string(),
        })?;
        Ok(bytes)
    }
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

#[allow(clippy::needless_pass_by_value)]
fn pdf_error(e: lopdf::Error) -> Error {
    Error::Pdf {
        message: e.to_string(),
    }
}

/// Content stream operations for one draw instruction. Layout y runs from
/// the top edge, PDF y from the bottom.
fn operations_for(op: &DrawOp) -> Vec<Operation> {
    match op {
        DrawOp::Text {
            text,
            x,
            y,
            size,
            weight,
            align,
        } => {
            let font = match weight {
                FontWeight::Normal => REGULAR_FONT,
                FontWeight::Bold => BOLD_FONT,
            };
            let start_x = match align {
                Align::Left => *x,
                Align::Right => x - text_width(text, *size),
            };
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(font.to_vec()), Object::Real(*size)]),
                Operation::new(
                    "Td",
                    vec![Object::Real(start_x), Object::Real(PAGE_HEIGHT - y)],
                ),
                Operation::new("Tj", vec![Object::string_literal(latin1(text))]),
                Operation::new("ET", vec![]),
            ]
        }
        DrawOp::Rule { x1, x2, y, width } => {
            let pdf_y = PAGE_HEIGHT - y;
            vec![
                Operation::new("w", vec![Object::Real(*width)]),
                Operation::new("m", vec![Object::Real(*x1), Object::Real(pdf_y)]),
                Operation::new("l", vec![Object::Real(*x2), Object::Real(pdf_y)]),
                Operation::new("S", vec![]),
            ]
        }
    }
}

/// Rendered width of `text` in points.
fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let index = (c as usize).wrapping_sub(32);
            u32::from(HELVETICA_WIDTHS.get(index).copied().unwrap_or(DEFAULT_WIDTH))
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let units = units as f32;
    units * size / 1000.0
}

/// Latin-1 bytes for `text`, `?` for anything outside it.
fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::app::ReceiptSettings;
    use crate::core::item::CartItem;
    use crate::core::receipt::layout_receipt;
    use crate::test_utils::sample_cart;

    fn generated_at() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_renders_single_page_receipt() -> Result<()> {
        let document = layout_receipt(&sample_cart(), generated_at(), &ReceiptSettings::default());
        let bytes = LopdfBackend.render(&document)?;
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
        Ok(())
    }

    #[test]
    fn test_renders_every_page() -> Result<()> {
        let items: Vec<CartItem> = (0..60)
            .map(|i| CartItem::new(format!("Producto {i}"), 10.0, 1, "", None))
            .collect();
        let document = layout_receipt(&items, generated_at(), &ReceiptSettings::default());
        let bytes = LopdfBackend.render(&document)?;

        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
        Ok(())
    }

    #[test]
    fn test_empty_receipt_renders() -> Result<()> {
        let document = layout_receipt(&[], generated_at(), &ReceiptSettings::default());
        let bytes = LopdfBackend.render(&document)?;
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
        Ok(())
    }

    #[test]
    fn test_latin1_encoding() {
        assert_eq!(latin1("Orégano"), b"Or\xe9gano".to_vec());
        assert_eq!(latin1("€5"), b"?5".to_vec());
    }

    #[test]
    fn test_text_width() {
        // five 556 glyphs and a period at 278
        let width = text_width("$50.00", 11.0);
        assert!((width - 33.638).abs() < 1e-3);
        assert!(text_width("", 11.0).abs() < f32::EPSILON);
        assert!((text_width("ñ", 10.0) - 5.56).abs() < 1e-3);
    }

    #[test]
    fn test_right_aligned_text_ends_at_anchor() {
        let op = DrawOp::Text {
            text: "$50.00".to_string(),
            x: 500.0,
            y: 124.0,
            size: 11.0,
            weight: FontWeight::Normal,
            align: Align::Right,
        };
        let operations = operations_for(&op);
        let td = &operations[2];
        assert_eq!(td.operator, "Td");
        let x = td.operands[0].as_float().unwrap();
        let y = td.operands[1].as_float().unwrap();
        assert!((x - (500.0 - 33.638)).abs() < 1e-3);
        assert!((y - (PAGE_HEIGHT - 124.0)).abs() < 1e-3);
    }
}
