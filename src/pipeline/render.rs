//! PDF rasterisation: render eligible pages to RGB images via pdfium.
//!
//! The pipeline talks to the document through the [`PageSource`] trait so the
//! tiling logic can be driven by pdfium in production and by synthetic pages
//! in tests. [`PdfiumSource`] owns the open `PdfDocument`; dropping it closes
//! the document, so every exit path (including `?` on a failed page) releases
//! the handle.
//!
//! Resolution is expressed in DPI: pdfium renders one pixel per point at
//! scale 1.0, so the scale factor is `dpi / 72`.

use crate::config::TileConfig;
use crate::error::TileError;
use crate::output::DocumentInfo;
use crate::progress::TileProgressCallback;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// A decoded source page. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// 0-based index of the page in the source document.
    pub page_index: usize,
    pub image: RgbImage,
}

impl PageImage {
    /// 1-based page number, as shown in a viewer.
    pub fn page_num(&self) -> usize {
        self.page_index + 1
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Anything that can rasterise numbered pages.
pub trait PageSource {
    /// Total pages in the document.
    fn page_count(&self) -> usize;

    /// Render the page at 0-based `index` as 3-channel RGB at `dpi`.
    fn render_page(&self, index: usize, dpi: u32) -> Result<RgbImage, TileError>;
}

/// 0-based indices of the pages a run tiles, in ascending order.
pub fn eligible_indices(total_pages: usize, skip_first_page: bool) -> Vec<usize> {
    let first = usize::from(skip_first_page);
    (first..total_pages).collect()
}

/// Rasterise every eligible page of `source`, in source order.
///
/// Produces `max(0, N − 1)` images when the first page is skipped. A failure
/// on any page aborts the whole run.
pub fn rasterize_pages<S: PageSource + ?Sized>(
    source: &S,
    config: &TileConfig,
    progress: Option<&dyn TileProgressCallback>,
) -> Result<Vec<PageImage>, TileError> {
    let indices = eligible_indices(source.page_count(), config.skip_first_page);
    render_indices(source, &indices, config.dpi, indices.len(), progress)
}

/// Rasterise the given pages. `total` is only used for progress reporting.
pub(crate) fn render_indices<S: PageSource + ?Sized>(
    source: &S,
    indices: &[usize],
    dpi: u32,
    total: usize,
    progress: Option<&dyn TileProgressCallback>,
) -> Result<Vec<PageImage>, TileError> {
    let mut images = Vec::with_capacity(indices.len());
    for &page_index in indices {
        let image = source.render_page(page_index, dpi)?;
        debug!(
            "Rendered page {} → {}x{} px",
            page_index + 1,
            image.width(),
            image.height()
        );
        if let Some(cb) = progress {
            cb.on_page_rendered(page_index + 1, total);
        }
        images.push(PageImage { page_index, image });
    }
    Ok(images)
}

/// An open pdfium document.
pub struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    /// Open `path`, mapping pdfium's load errors onto [`TileError`] open
    /// failures.
    pub fn open(
        pdfium: &'a Pdfium,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Self, TileError> {
        let document = pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| classify_open_error(path, password.is_some(), format!("{:?}", e)))?;

        let source = Self { document };
        info!("PDF loaded: {} pages", source.page_count());
        Ok(source)
    }

    /// Document facts without rendering anything.
    pub fn info(&self, skip_first_page: bool) -> DocumentInfo {
        let metadata = self.document.metadata();
        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().trim().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        let page_count = self.page_count();
        DocumentInfo {
            page_count,
            eligible_pages: eligible_indices(page_count, skip_first_page).len(),
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            pdf_version: format!("{:?}", self.document.version()),
        }
    }
}

impl PageSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, dpi: u32) -> Result<RgbImage, TileError> {
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| TileError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            TileError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        Ok(bitmap.as_image().to_rgb8())
    }
}

/// Turn a pdfium load error into the most specific open failure.
fn classify_open_error(path: &Path, password_given: bool, detail: String) -> TileError {
    if detail.to_lowercase().contains("password") {
        if password_given {
            TileError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            TileError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        TileError::CorruptPdf {
            path: path.to_path_buf(),
            detail,
        }
    }
}
