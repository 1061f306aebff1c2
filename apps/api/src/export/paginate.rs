//! Slices a display list into page-height pieces.
//!
//! A line is never split: a run that would cross the bottom of the content box
//! moves, whole, to the top of the next page.

use crate::export::raster::{DisplayList, TextRun};
use crate::export::surface::PageGeometry;
use crate::export::ExportError;

/// Upper bound on pages in one export.
pub const MAX_PAGES: usize = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Runs with `top` relative to this page's content box.
    pub runs: Vec<TextRun>,
}

pub fn paginate(list: DisplayList, geometry: &PageGeometry) -> Result<Vec<Page>, ExportError> {
    let page_height = geometry.content_height_px();
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut origin = 0.0_f32;

    for mut run in list.runs {
        if run.top - origin + run.height > page_height && !current.runs.is_empty() {
            pages.push(std::mem::take(&mut current));
            if pages.len() >= MAX_PAGES {
                return Err(ExportError::TooManyPages(MAX_PAGES));
            }
            origin = run.top;
        }
        run.top -= origin;
        current.runs.push(run);
    }
    if !current.runs.is_empty() {
        pages.push(current);
    }
    Ok(pages)
}
