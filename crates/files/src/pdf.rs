//! PDF rendering for exported reports.
//!
//! Uses the builtin Helvetica faces, which only encode Latin-1. Characters outside that range
//! (the emoji category markers in particular) are dropped before layout.

use crate::FilesError;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 20.0;
const TOP_MM: f32 = 280.0;
const BOTTOM_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 4.5;
const BLANK_LINE_MM: f32 = 2.5;
const WRAP_CHARS: usize = 90;

/// Renders `title` and `body` (one output line per input line, word-wrapped) to PDF bytes.
///
/// # Errors
///
/// Returns `FilesError::Pdf` if a font cannot be registered or the document cannot be saved.
pub fn render_pdf(title: &str, body: &str) -> Result<Vec<u8>, FilesError> {
    let (doc, page1, layer1) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| FilesError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| FilesError::Pdf(format!("font error: {e}")))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = TOP_MM;

    layer.use_text(latin1(title), 14.0, Mm(MARGIN_LEFT_MM), Mm(y), &bold);
    y -= 10.0;

    for raw_line in body.lines() {
        let line = latin1(raw_line);
        let line = line.trim_start();
        if line.is_empty() {
            y -= BLANK_LINE_MM;
            continue;
        }

        // Section headers are written in upper case and end with a colon.
        let is_header = line.ends_with(':') && line == line.to_uppercase();

        for wrapped in wrap_text(line, WRAP_CHARS) {
            if y < BOTTOM_MM {
                let (page, layer_index) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(layer_index);
                y = TOP_MM;
            }
            let face = if is_header { &bold } else { &font };
            layer.use_text(wrapped, 9.0, Mm(MARGIN_LEFT_MM), Mm(y), face);
            y -= LINE_HEIGHT_MM;
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| FilesError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| FilesError::Pdf(format!("buffer error: {e}")))
}

fn latin1(text: &str) -> String {
    text.chars()
        .filter(|c| (*c as u32) <= 0xFF && !c.is_control())
        .collect()
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
