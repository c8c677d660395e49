//! Plain-text to PDF layout
//!
//! Lays rendered template text out on A4 pages in a monospaced core font.
//! Line breaks in the text are preserved. Lines wider than the printable
//! area wrap at the last space that fits, and pages break automatically.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::RenderError;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const FONT_SIZE: i64 = 10;
const LEADING: i64 = 14;

/// Courier advances every glyph by 600/1000 of the font size
const GLYPH_WIDTH_MILLIS: i64 = 600;

/// Lines that fit between the top and bottom margins
pub const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Characters that fit between the left and right margins
pub const COLUMNS: usize =
    ((PAGE_WIDTH - 2 * MARGIN) * 1000 / (FONT_SIZE * GLYPH_WIDTH_MILLIS)) as usize;

/// Build a PDF document holding `text`.
pub fn text_to_pdf(title: &str, text: &str) -> Result<Vec<u8>, RenderError> {
    let lines: Vec<Vec<u8>> = text
        .lines()
        .map(encode_line)
        .flat_map(|line| wrap_line(&line))
        .collect();
    let chunks: Vec<&[Vec<u8>]> = if lines.is_empty() {
        vec![&lines[..]]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let page_id = add_page(&mut doc, pages_id, chunk)?;
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_line(title)),
        "Producer" => Object::string_literal(concat!("reportcard-server ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn add_page(doc: &mut Document, pages_id: ObjectId, lines: &[Vec<u8>]) -> Result<ObjectId, RenderError> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Integer(FONT_SIZE)]),
        Operation::new("TL", vec![Object::Integer(LEADING)]),
        Operation::new(
            "Td",
            vec![Object::Integer(MARGIN), Object::Integer(PAGE_HEIGHT - MARGIN)],
        ),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(line.clone())]));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations }
        .encode()
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Split an encoded line into rows of at most [`COLUMNS`] bytes.
///
/// Breaks replace the last space that fits; a word longer than a full row
/// is cut at the margin.
fn wrap_line(line: &[u8]) -> Vec<Vec<u8>> {
    let mut rows = Vec::new();
    let mut rest = line;
    while rest.len() > COLUMNS {
        let space = rest[..=COLUMNS]
            .iter()
            .rposition(|&b| b == b' ')
            .filter(|&index| index > 0);
        match space {
            Some(index) => {
                rows.push(rest[..index].to_vec());
                rest = &rest[index + 1..];
            },
            None => {
                rows.push(rest[..COLUMNS].to_vec());
                rest = &rest[COLUMNS..];
            },
        }
    }
    rows.push(rest.to_vec());
    rows
}

/// WinAnsi covers Latin-1; anything outside it prints as '?'
fn encode_line(line: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => bytes.extend_from_slice(b"    "),
            '\r' => {},
            c if (c as u32) < 0x20 => bytes.push(b' '),
            c if (c as u32) <= 0xFF => bytes.push(c as u32 as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}
