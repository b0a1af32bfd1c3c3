//! Result types returned by the tiling entry points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TileOutcome {
    /// Grid pages were produced (and, for [`crate::tile`], saved).
    Written(TileStats),
    /// The document opened fine but had no eligible pages; nothing was written.
    NothingToTile { source_pages: usize },
}

impl TileOutcome {
    /// Stats of a run that produced output.
    pub fn stats(&self) -> Option<&TileStats> {
        match self {
            TileOutcome::Written(stats) => Some(stats),
            TileOutcome::NothingToTile { .. } => None,
        }
    }

    /// Number of output pages produced (0 when nothing was tiled).
    pub fn grid_pages(&self) -> usize {
        self.stats().map_or(0, |s| s.grid_pages)
    }
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileStats {
    /// Pages in the source document.
    pub source_pages: usize,
    /// Source pages rasterised and placed.
    pub rendered_pages: usize,
    /// Output pages produced.
    pub grid_pages: usize,
    /// Grid slots per output page (rows × cols).
    pub slots_per_page: usize,
    /// Slots left showing the background (only ever on the last page).
    pub empty_slots: usize,
    /// Width of one grid cell in pixels.
    pub cell_width: u32,
    /// Height of one grid cell in pixels.
    pub cell_height: u32,
    pub render_ms: u64,
    pub compose_ms: u64,
    pub write_ms: u64,
    pub total_ms: u64,
    /// Where the output was saved; `None` until it has been written.
    pub output_path: Option<PathBuf>,
}

/// Document facts reported by [`crate::inspect`] without rendering anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    /// Pages a run would tile, given the `skip_first_page` passed to `inspect`.
    pub eligible_pages: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub pdf_version: String,
}
