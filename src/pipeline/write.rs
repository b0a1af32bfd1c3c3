//! Output: turn composed grid canvases into pages of a new PDF.
//!
//! Canvases are handed to a [`GridSink`] one at a time. [`PdfiumSink`] builds
//! a pdfium document in memory and only touches the filesystem in
//! [`PdfiumSink::save`], which writes to a temp file beside the destination
//! and renames it into place. A failed save leaves no partial output behind.

use crate::error::TileError;
use image::{DynamicImage, RgbImage};
use pdfium_render::prelude::*;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Receives composed grid pages in output order.
pub trait GridSink {
    fn add_canvas(&mut self, canvas: &RgbImage) -> Result<(), TileError>;
}

/// Collects canvases in memory; handy for previews and tests.
impl GridSink for Vec<RgbImage> {
    fn add_canvas(&mut self, canvas: &RgbImage) -> Result<(), TileError> {
        self.push(canvas.clone());
        Ok(())
    }
}

/// Appends one PDF page per canvas to a new pdfium document.
pub struct PdfiumSink<'a> {
    document: PdfDocument<'a>,
    dpi: u32,
    pages: usize,
}

impl<'a> PdfiumSink<'a> {
    /// New empty document. Canvas pixels are mapped to points at `dpi`.
    pub fn new(pdfium: &'a Pdfium, dpi: u32) -> Result<Self, TileError> {
        let document = pdfium
            .create_new_pdf()
            .map_err(|e| TileError::PdfEncodeFailed {
                detail: format!("{:?}", e),
            })?;
        Ok(Self {
            document,
            dpi,
            pages: 0,
        })
    }

    /// Pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Write the document to `path` atomically.
    pub fn save(self, path: &Path) -> Result<(), TileError> {
        info!("Saving {} grid pages to {}", self.pages, path.display());

        let bytes = self
            .document
            .save_to_bytes()
            .map_err(|e| TileError::PdfEncodeFailed {
                detail: format!("{:?}", e),
            })?;

        write_atomic(path, &bytes)?;
        info!("PDF saved successfully ({} bytes)", bytes.len());
        Ok(())
    }
}

impl GridSink for PdfiumSink<'_> {
    fn add_canvas(&mut self, canvas: &RgbImage) -> Result<(), TileError> {
        let encode_err = |e: PdfiumError| TileError::PdfEncodeFailed {
            detail: format!("{:?}", e),
        };

        let (width_pt, height_pt) = page_size_points(canvas.width(), canvas.height(), self.dpi);
        let width = PdfPoints::new(width_pt);
        let height = PdfPoints::new(height_pt);

        let mut page = self
            .document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(width, height))
            .map_err(encode_err)?;

        let image = DynamicImage::ImageRgb8(canvas.clone());
        let mut image_object = PdfPageImageObject::new(&self.document, &image).map_err(encode_err)?;
        image_object
            .scale(width.value, height.value)
            .map_err(encode_err)?;

        page.objects_mut()
            .add_object(PdfPageObject::Image(image_object))
            .map_err(encode_err)?;

        self.pages += 1;
        debug!(
            "Added grid page {} ({}x{} px → {:.1}x{:.1} pt)",
            self.pages,
            canvas.width(),
            canvas.height(),
            width_pt,
            height_pt
        );
        Ok(())
    }
}

/// Physical page size for a canvas rendered at `dpi`.
pub fn page_size_points(width_px: u32, height_px: u32, dpi: u32) -> (f32, f32) {
    let scale = 72.0 / dpi as f32;
    (width_px as f32 * scale, height_px as f32 * scale)
}

/// Write `bytes` to a temp file next to `path`, then rename it over `path`.
///
/// The destination directory must already exist.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), TileError> {
    let write_err = |source: std::io::Error| TileError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(TileError::OutputDirMissing {
            path: dir.to_path_buf(),
        });
    }

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
