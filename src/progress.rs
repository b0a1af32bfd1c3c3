//! Progress-callback trait for rasterisation and grid-composition events.
//!
//! Inject an [`Arc<dyn TileProgressCallback>`] via
//! [`crate::config::TileConfigBuilder::progress_callback`] to observe a run
//! as it renders source pages and composes grid pages. The pipeline itself is
//! single-threaded, but the trait is `Send + Sync` because [`crate::tile`]
//! moves the whole run onto a blocking worker thread.
//!
//! # Example
//!
//! ```rust
//! use pdf_grid::{TileConfig, TileProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl TileProgressCallback for CountingCallback {
//!     fn on_page_rendered(&self, page_num: usize, total: usize) {
//!         let done = self.rendered.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("rendered page {page_num} ({done}/{total})");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { rendered: AtomicUsize::new(0) });
//!
//! let config = TileConfig::builder("in.pdf", "out.pdf")
//!     .progress_callback(counter as Arc<dyn TileProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the tiling pipeline as it works through a document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait TileProgressCallback: Send + Sync {
    /// Called once, after the source has been opened and before any page is
    /// rendered.
    ///
    /// # Arguments
    /// * `pages_to_render` — eligible source pages
    /// * `grid_pages`      — output pages that will be produced
    fn on_tiling_start(&self, pages_to_render: usize, grid_pages: usize) {
        let _ = (pages_to_render, grid_pages);
    }

    /// Called after each source page has been rasterised.
    ///
    /// # Arguments
    /// * `page_num` — 1-indexed page number in the source document
    /// * `total`    — eligible pages in this run
    fn on_page_rendered(&self, page_num: usize, total: usize) {
        let _ = (page_num, total);
    }

    /// Called after each grid canvas is complete.
    ///
    /// # Arguments
    /// * `grid_page`       — 1-indexed output page number
    /// * `total_grid_pages` — output pages in this run
    /// * `images_on_page`  — filled slots on this page
    fn on_grid_page_composed(&self, grid_page: usize, total_grid_pages: usize, images_on_page: usize) {
        let _ = (grid_page, total_grid_pages, images_on_page);
    }

    /// Called once when every eligible page has been placed.
    fn on_tiling_complete(&self, rendered: usize, grid_pages: usize) {
        let _ = (rendered, grid_pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TileProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TileConfig`].
pub type ProgressCallback = Arc<dyn TileProgressCallback>;
