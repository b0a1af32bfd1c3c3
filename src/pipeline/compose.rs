//! Grid composition: paste each chunk of page images onto a blank canvas.
//!
//! All cells share the size of the first page image of the run. Pages of a
//! different size are still placed inside their own cell: larger ones are
//! cropped at the cell edge, smaller ones sit at the cell's top-left corner
//! with background around them. Nothing ever spills into a neighbouring cell.

use crate::config::BackgroundColor;
use crate::error::TileError;
use crate::pipeline::layout::GridLayout;
use crate::pipeline::render::PageImage;
use image::{imageops, Rgb, RgbImage};
use tracing::{debug, warn};

/// Size of one grid cell in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    /// Cell size of a run, taken from its first image.
    pub fn of_first(images: &[PageImage]) -> Option<Self> {
        images.first().map(|p| {
            let (width, height) = p.dimensions();
            Self { width, height }
        })
    }
}

/// Compose one output page from `chunk` (at most `rows × cols` images).
pub fn compose_grid(
    chunk: &[PageImage],
    layout: &GridLayout,
    cell: CellSize,
    background: BackgroundColor,
) -> Result<RgbImage, TileError> {
    if chunk.len() > layout.slots_per_page() {
        return Err(TileError::Internal(format!(
            "chunk of {} images does not fit a {}x{} grid",
            chunk.len(),
            layout.rows,
            layout.cols
        )));
    }

    let (width, height) = layout.canvas_size(cell.width, cell.height)?;
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(background.0));

    for (i, page) in chunk.iter().enumerate() {
        let (x, y) = layout.offset(i, cell.width, cell.height);
        debug!(
            "Placing page {} in slot {:?} at ({}, {})",
            page.page_num(),
            layout.slot(i),
            x,
            y
        );

        if page.dimensions() == (cell.width, cell.height) {
            imageops::replace(&mut canvas, &page.image, x as i64, y as i64);
        } else {
            let (w, h) = page.dimensions();
            warn!(
                "Page {} is {}x{} px but cells are {}x{} px; fitting it to its cell",
                page.page_num(),
                w,
                h,
                cell.width,
                cell.height
            );
            let fitted =
                imageops::crop_imm(&page.image, 0, 0, w.min(cell.width), h.min(cell.height))
                    .to_image();
            imageops::replace(&mut canvas, &fitted, x as i64, y as i64);
        }
    }

    Ok(canvas)
}

/// Compose every output page for `images`, in order.
///
/// Returns no canvases for an empty input.
pub fn paginate(
    images: &[PageImage],
    layout: &GridLayout,
    background: BackgroundColor,
) -> Result<Vec<RgbImage>, TileError> {
    let Some(cell) = CellSize::of_first(images) else {
        return Ok(Vec::new());
    };

    layout
        .chunk_ranges(images.len())
        .into_iter()
        .map(|range| compose_grid(&images[range], layout, cell, background))
        .collect()
}
