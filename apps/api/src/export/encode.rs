//! Writes paginated runs into a PDF container with printpdf.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{IndirectFontRef, Mm, PdfDocument};

use crate::export::font_metrics::{self, FontFamily};
use crate::export::paginate::Page;
use crate::export::surface::PageGeometry;
use crate::export::ExportError;

/// PDF points per CSS pixel.
const PT_PER_CSS_PX: f32 = 0.75;

const LAYER: &str = "Content";

fn encode_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Encode(e.to_string())
}

/// Rejects text the base fonts would silently drop.
fn check_encodable(pages: &[Page]) -> Result<(), ExportError> {
    let unsupported = pages
        .iter()
        .flat_map(|page| &page.runs)
        .flat_map(|run| run.text.chars())
        .find(|c| !font_metrics::is_encodable(*c));
    match unsupported {
        Some(c) => Err(ExportError::UnsupportedCharacter(c)),
        None => Ok(()),
    }
}

/// Encodes `pages` and writes the document to `out`.
pub fn encode(
    pages: &[Page],
    family: FontFamily,
    title: &str,
    geometry: &PageGeometry,
    out: &Path,
) -> Result<(), ExportError> {
    check_encodable(pages)?;

    let width = Mm(geometry.width_mm);
    let height = Mm(geometry.height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER);

    let regular: IndirectFontRef = doc
        .add_builtin_font(family.builtin(false))
        .map_err(encode_err)?;
    let bold: IndirectFontRef = doc
        .add_builtin_font(family.builtin(true))
        .map_err(encode_err)?;

    for (index, page) in pages.iter().enumerate() {
        let (page_ref, layer_ref) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, LAYER)
        };
        let layer = doc.get_page(page_ref).get_layer(layer_ref);

        for run in &page.runs {
            let font = if run.bold { &bold } else { &regular };
            let size_pt = run.size / geometry.scale * PT_PER_CSS_PX;
            let x = geometry.margin_mm + geometry.px_to_mm(run.x);
            // PDF user space grows upwards from the bottom edge.
            let y = geometry.height_mm - geometry.margin_mm - geometry.px_to_mm(run.baseline());
            layer.use_text(run.text.as_str(), size_pt, Mm(x), Mm(y), font);
        }
    }

    let file = File::create(out)?;
    doc.save(&mut BufWriter::new(file)).map_err(encode_err)?;
    Ok(())
}
