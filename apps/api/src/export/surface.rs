//! The off-screen render surface: a scratch directory holding the hosted
//! markup and the encoded output, sized to one physical page format.
//!
//! The directory is removed when the surface is dropped, so every exit path
//! out of the pipeline (success, `?`, panic unwinding) releases it.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::export::ExportError;

/// CSS reference pixels per millimetre (96 dpi).
pub const CSS_PX_PER_MM: f32 = 96.0 / 25.4;

/// Device pixels per CSS pixel. Fixed for print-quality output.
pub const SCALE_FACTOR: f32 = 2.0;

const MARKUP_FILE: &str = "document.html";
const OUTPUT_FILE: &str = "document.pdf";

/// Page format and margins, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub scale: f32,
}

impl PageGeometry {
    /// A4 portrait, 10 mm margins.
    pub const A4: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 10.0,
        scale: SCALE_FACTOR,
    };

    pub fn device_px_per_mm(&self) -> f32 {
        CSS_PX_PER_MM * self.scale
    }

    /// Printable width in device pixels.
    pub fn content_width_px(&self) -> f32 {
        (self.width_mm - 2.0 * self.margin_mm) * self.device_px_per_mm()
    }

    /// Printable height of one page in device pixels.
    pub fn content_height_px(&self) -> f32 {
        (self.height_mm - 2.0 * self.margin_mm) * self.device_px_per_mm()
    }

    pub fn px_to_mm(&self, px: f32) -> f32 {
        px / self.device_px_per_mm()
    }
}

#[derive(Debug)]
pub struct RenderSurface {
    dir: TempDir,
    geometry: PageGeometry,
}

impl RenderSurface {
    /// Creates the surface under `scratch` (or the system temp dir) and writes
    /// the markup into it.
    pub fn host(scratch: Option<&Path>, markup: &str) -> Result<Self, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("resume-export-");
        let dir = match scratch {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        fs::write(dir.path().join(MARKUP_FILE), markup)?;
        debug!(path = %dir.path().display(), bytes = markup.len(), "render surface created");
        Ok(RenderSurface {
            dir,
            geometry: PageGeometry::A4,
        })
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read_markup(&self) -> Result<String, ExportError> {
        Ok(fs::read_to_string(self.dir.path().join(MARKUP_FILE))?)
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_FILE)
    }
}
