//! Grid arithmetic: which slot each image lands in, and where that slot is.
//!
//! A run of `L` images is cut into consecutive chunks of `rows × cols`
//! images, one chunk per output page. The last chunk may be short; it is
//! never padded with earlier images. Inside a chunk, the local index `i`
//! maps to a slot according to [`FillOrder`]:
//!
//! ```text
//! ColumnMajor (default)      RowMajor
//!   rows=4, cols=2             rows=4, cols=2
//!   ┌───┬───┐                  ┌───┬───┐
//!   │ 0 │ 4 │                  │ 0 │ 1 │
//!   │ 1 │ 5 │                  │ 2 │ 3 │
//!   │ 2 │ 6 │                  │ 4 │ 5 │
//!   │ 3 │ 7 │                  │ 6 │ 7 │
//!   └───┴───┘                  └───┴───┘
//! row = i mod R, col = i div R   row = i div C, col = i mod C
//! ```

use crate::config::{FillOrder, TileConfig};
use crate::error::TileError;
use std::ops::Range;

/// One grid position, zero-based from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
}

/// Shape of one output page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub fill_order: FillOrder,
}

impl GridLayout {
    /// Column-major layout with the given shape.
    ///
    /// `rows` and `cols` must be at least 1 and `rows × cols` must fit in
    /// `usize`; use [`GridLayout::try_new`] for unchecked input.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            fill_order: FillOrder::ColumnMajor,
        }
    }

    /// Column-major layout, rejecting empty or overflowing grids.
    pub fn try_new(rows: usize, cols: usize) -> Result<Self, TileError> {
        match rows.checked_mul(cols) {
            Some(slots) if slots > 0 => Ok(Self::new(rows, cols)),
            _ => Err(TileError::InvalidConfig(format!(
                "unusable grid {rows}x{cols}"
            ))),
        }
    }

    pub fn with_fill_order(mut self, fill_order: FillOrder) -> Self {
        self.fill_order = fill_order;
        self
    }

    pub fn from_config(config: &TileConfig) -> Result<Self, TileError> {
        Ok(Self::try_new(config.rows, config.cols)?.with_fill_order(config.fill_order))
    }

    pub fn slots_per_page(&self) -> usize {
        self.rows * self.cols
    }

    /// Output pages needed for `image_count` images: `ceil(L / (R·C))`.
    pub fn page_count(&self, image_count: usize) -> usize {
        image_count.div_ceil(self.slots_per_page())
    }

    /// Slots left empty on the last page.
    pub fn empty_slots(&self, image_count: usize) -> usize {
        let per_page = self.slots_per_page();
        (per_page - image_count % per_page) % per_page
    }

    /// Slot for the `index`-th image of a chunk.
    pub fn slot(&self, index: usize) -> Slot {
        debug_assert!(index < self.slots_per_page(), "index {index} outside chunk");
        match self.fill_order {
            FillOrder::ColumnMajor => Slot {
                row: index % self.rows,
                col: index / self.rows,
            },
            FillOrder::RowMajor => Slot {
                row: index / self.cols,
                col: index % self.cols,
            },
        }
    }

    /// Top-left pixel of the `index`-th slot for cells of `cell_w × cell_h`.
    pub fn offset(&self, index: usize, cell_w: u32, cell_h: u32) -> (u32, u32) {
        let slot = self.slot(index);
        (slot.col as u32 * cell_w, slot.row as u32 * cell_h)
    }

    /// Canvas size `(cols·W, rows·H)`, rejecting sizes that overflow `u32`.
    pub fn canvas_size(&self, cell_w: u32, cell_h: u32) -> Result<(u32, u32), TileError> {
        let width = (self.cols as u64).saturating_mul(cell_w as u64);
        let height = (self.rows as u64).saturating_mul(cell_h as u64);
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => Ok((w, h)),
            _ => Err(TileError::CanvasTooLarge { width, height }),
        }
    }

    /// Consecutive index ranges, one per output page, covering `0..image_count`.
    pub fn chunk_ranges(&self, image_count: usize) -> Vec<Range<usize>> {
        let per_page = self.slots_per_page();
        (0..image_count)
            .step_by(per_page)
            .map(|start| start..start.saturating_add(per_page).min(image_count))
            .collect()
    }
}
