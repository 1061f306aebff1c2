//! Export pipeline: rendered markup → paginated PDF.
//!
//! Stages, each its own module:
//! 1. **Host** the markup on an off-screen A4 surface ([`surface`], [`markup`])
//! 2. **Rasterize** at a fixed scale factor into a display list ([`raster`])
//! 3. **Paginate** into page-height slices ([`paginate`])
//! 4. **Encode** the pages as PDF ([`encode`])
//!
//! The surface is dropped before returning, on every path.

pub mod encode;
pub mod font_metrics;
pub mod markup;
pub mod paginate;
pub mod raster;
pub mod surface;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use tracing::debug;

use crate::export::surface::RenderSurface;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("render surface I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot rasterize <{0}> content")]
    Unrasterizable(String),

    #[error("document has no printable content")]
    EmptyDocument,

    #[error("text contains '{0}', which the PDF fonts cannot render")]
    UnsupportedCharacter(char),

    #[error("document exceeds {0} pages")]
    TooManyPages(usize),

    #[error("PDF encoding failed: {0}")]
    Encode(String),

    #[error("export task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub filename: String,
    pub bytes: Bytes,
    pub page_count: usize,
}

const DEFAULT_FILENAME: &str = "Resume";

/// Turns a resume name into a download filename ending in `.pdf`.
pub fn filename_for(hint: &str) -> String {
    let stem: String = hint
        .trim()
        .trim_end_matches(".pdf")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        format!("{DEFAULT_FILENAME}.pdf")
    } else {
        format!("{stem}.pdf")
    }
}

/// RFC 5987 `attr-char`: everything else is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `filename` with every non-ASCII character replaced, for clients that
/// ignore `filename*`.
fn ascii_filename(filename: &str) -> String {
    let stem: String = filename
        .trim_end_matches(".pdf")
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        format!("{DEFAULT_FILENAME}.pdf")
    } else {
        format!("{stem}.pdf")
    }
}

/// `Content-Disposition` value for downloading `filename`.
pub fn content_disposition(filename: &str) -> String {
    let fallback = ascii_filename(filename);
    if fallback == filename {
        return format!("attachment; filename=\"{filename}\"");
    }
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(filename, ATTR_CHAR)
    )
}

/// Runs the pipeline with the surface created under `scratch`, or the system
/// temp dir when `None`.
pub fn export_pdf_in(
    scratch: Option<&Path>,
    markup: &str,
    filename_hint: &str,
) -> Result<PdfArtifact, ExportError> {
    let surface = RenderSurface::host(scratch, markup)?;
    let geometry = *surface.geometry();

    let document = markup::parse(&surface.read_markup()?)?;
    let display = raster::rasterize(&document, &geometry);
    let pages = paginate::paginate(display, &geometry)?;

    let filename = filename_for(filename_hint);
    let title = filename.trim_end_matches(".pdf");
    let output = surface.output_path();
    encode::encode(&pages, document.family, title, &geometry, &output)?;
    let bytes = std::fs::read(&output)?;

    debug!(
        surface = %surface.path().display(),
        filename = %filename,
        pages = pages.len(),
        bytes = bytes.len(),
        "pdf encoded"
    );
    Ok(PdfArtifact {
        filename,
        bytes: Bytes::from(bytes),
        page_count: pages.len(),
    })
}

pub fn export_pdf(markup: &str, filename_hint: &str) -> Result<PdfArtifact, ExportError> {
    export_pdf_in(None, markup, filename_hint)
}

/// Runs the pipeline on the blocking pool.
pub async fn export_pdf_blocking(
    scratch: Option<PathBuf>,
    markup: String,
    filename_hint: String,
) -> Result<PdfArtifact, ExportError> {
    tokio::task::spawn_blocking(move || match scratch {
        Some(dir) => export_pdf_in(Some(&dir), &markup, &filename_hint),
        None => export_pdf(&markup, &filename_hint),
    })
    .await
    .map_err(|e| ExportError::Task(e.to_string()))?
}
