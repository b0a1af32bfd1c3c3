//! # pdf-grid
//!
//! Rasterise the pages of a PDF and tile them, several to a page, into a new
//! PDF. The default run skips the cover page, renders at 150 DPI and packs
//! eight pages per output page in a 4 × 2 grid, filling each column top to
//! bottom before moving to the next.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate input file and output directory
//!  ├─ 2. Render   rasterise pages 2..N via pdfium (blocking, spawn_blocking)
//!  ├─ 3. Layout   chunk into rows × cols, column-major slot order
//!  ├─ 4. Compose  paste each chunk onto a background-filled canvas
//!  └─ 5. Write    one PDF page per canvas, saved atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_grid::{tile, TileConfig, TileOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TileConfig::builder("lecture.pdf", "lecture_grid.pdf")
//!         .rows(4)
//!         .cols(2)
//!         .build()?;
//!     match tile(&config).await? {
//!         TileOutcome::Written(stats) => {
//!             eprintln!("{} pages → {} grid pages", stats.rendered_pages, stats.grid_pages)
//!         }
//!         TileOutcome::NothingToTile { source_pages } => {
//!             eprintln!("nothing to tile in a {source_pages}-page document")
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfgrid` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## pdfium
//!
//! Rendering and PDF output go through [pdfium-render]. The shared library
//! is looked up via `PDFIUM_LIB_PATH`, then the current directory, then the
//! system search path.
//!
//! [pdfium-render]: https://docs.rs/pdfium-render

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BackgroundColor, FillOrder, TileConfig, TileConfigBuilder};
pub use convert::{inspect, tile, tile_sync, tile_with};
pub use error::TileError;
pub use output::{DocumentInfo, TileOutcome, TileStats};
pub use pipeline::compose::{compose_grid, paginate, CellSize};
pub use pipeline::layout::{GridLayout, Slot};
pub use pipeline::render::{eligible_indices, rasterize_pages, PageImage, PageSource};
pub use pipeline::write::GridSink;
pub use progress::{NoopProgressCallback, ProgressCallback, TileProgressCallback};
