//! Draws a laid-out [`Document`] with printpdf.

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use printpdf::*;

use crate::error::AppError;
use crate::layout::{Document, Element};
use crate::metrics::FontWeight;

const MM_PER_PT: f32 = 25.4 / 72.0;
/// Cubic Bézier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;
const BORDER_GRAY: f32 = 180.0 / 255.0;
const BORDER_THICKNESS: f32 = 0.8;

fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn build(document: &Document, title: &str) -> Result<PdfDocumentReference, AppError> {
    let g = document.geometry;
    let (doc, page1, layer1) = PdfDocument::new(title, mm(g.width), mm(g.height), "Layer 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::PdfError(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::PdfError(e.to_string()))?,
    };

    for (i, page) in document.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (new_page, new_layer) = doc.add_page(mm(g.width), mm(g.height), "Layer 1");
            doc.get_page(new_page).get_layer(new_layer)
        };

        for element in &page.elements {
            draw_element(&layer, &fonts, g.height, element);
        }
    }

    Ok(doc)
}

fn draw_element(layer: &PdfLayerReference, fonts: &Fonts, page_height: f32, element: &Element) {
    match element {
        Element::Text { x, y, text, weight, size } => {
            layer.use_text(text.as_str(), *size, mm(*x), mm(page_height - y), fonts.get(*weight));
        }
        Element::RoundedRect { x, y, width, height, radius } => {
            layer.set_outline_color(Color::Rgb(Rgb::new(BORDER_GRAY, BORDER_GRAY, BORDER_GRAY, None)));
            layer.set_outline_thickness(BORDER_THICKNESS);
            let bottom = page_height - y - height;
            layer.add_line(rounded_rect(*x, bottom, *width, *height, *radius));
        }
    }
}

/// Closed outline in page points with the origin at the bottom-left.
fn rounded_rect(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Line {
    let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let k = r * KAPPA;
    let (x0, y0, x1, y1) = (x, y, x + width, y + height);

    // `true` marks a point whose successor is a Bézier handle.
    let outline = [
        (x0 + r, y1, false),
        (x1 - r, y1, true),
        (x1 - r + k, y1, true),
        (x1, y1 - r + k, false),
        (x1, y1 - r, false),
        (x1, y0 + r, true),
        (x1, y0 + r - k, true),
        (x1 - r + k, y0, false),
        (x1 - r, y0, false),
        (x0 + r, y0, true),
        (x0 + r - k, y0, true),
        (x0, y0 + r - k, false),
        (x0, y0 + r, false),
        (x0, y1 - r, true),
        (x0, y1 - r + k, true),
        (x0 + r - k, y1, false),
        (x0 + r, y1, false),
    ];

    Line {
        points: outline
            .iter()
            .map(|&(px, py, handle)| (Point::new(mm(px), mm(py)), handle))
            .collect(),
        is_closed: true,
    }
}

pub fn render_pdf(document: &Document, title: &str) -> Result<Vec<u8>, AppError> {
    let doc = build(document, title)?;
    let mut buf = Vec::new();
    {
        let mut writer = BufWriter::new(Cursor::new(&mut buf));
        doc.save(&mut writer)
            .map_err(|e| AppError::PdfError(e.to_string()))?;
    }
    Ok(buf)
}

pub fn save_pdf(document: &Document, title: &str, output_path: &Path) -> Result<(), AppError> {
    let doc = build(document, title)?;
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    Ok(())
}
