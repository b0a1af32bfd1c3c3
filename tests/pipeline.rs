//! Pipeline tests over synthetic pages.
//!
//! A fake [`PageSource`] produces solid-colour pages whose colour encodes the
//! source page index, and canvases are collected in a `Vec<RgbImage>` sink,
//! so every layout property can be checked pixel by pixel without pdfium.

use image::{Rgb, RgbImage};
use pdf_grid::{
    rasterize_pages, tile_with, BackgroundColor, FillOrder, PageSource, TileConfig, TileError,
    TileOutcome, TileProgressCallback,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const W: u32 = 12;
const H: u32 = 16;
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

// ── Test helpers ─────────────────────────────────────────────────────────────

struct SyntheticPdf {
    pages: usize,
    fail_at: Option<usize>,
}

impl SyntheticPdf {
    fn with_pages(pages: usize) -> Self {
        Self {
            pages,
            fail_at: None,
        }
    }
}

/// Colour of source page `index` (0-based). Never white.
fn page_colour(index: usize) -> Rgb<u8> {
    Rgb([index as u8 + 1, 100, 200])
}

impl PageSource for SyntheticPdf {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn render_page(&self, index: usize, _dpi: u32) -> Result<RgbImage, TileError> {
        if self.fail_at == Some(index) {
            return Err(TileError::RasterisationFailed {
                page: index + 1,
                detail: "synthetic failure".into(),
            });
        }
        Ok(RgbImage::from_pixel(W, H, page_colour(index)))
    }
}

fn config(rows: usize, cols: usize) -> TileConfig {
    TileConfig::builder("in.pdf", "out.pdf")
        .rows(rows)
        .cols(cols)
        .build()
        .expect("valid config")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn run(pages: usize, config: &TileConfig) -> (TileOutcome, Vec<RgbImage>) {
    init_tracing();
    let mut sink: Vec<RgbImage> = Vec::new();
    let outcome = tile_with(&SyntheticPdf::with_pages(pages), &mut sink, config)
        .expect("tiling should succeed");
    (outcome, sink)
}

/// Colour at the centre of cell (row, col).
fn cell(canvas: &RgbImage, row: u32, col: u32) -> Rgb<u8> {
    *canvas.get_pixel(col * W + W / 2, row * H + H / 2)
}

fn background_cells(canvas: &RgbImage, rows: u32, cols: u32) -> usize {
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c)))
        .filter(|&(r, c)| cell(canvas, r, c) == WHITE)
        .count()
}

// ── Rasterizer ───────────────────────────────────────────────────────────────

#[test]
fn rasterizer_yields_n_minus_one_pages_in_order() {
    for n in 1..=6 {
        let images = rasterize_pages(&SyntheticPdf::with_pages(n), &config(4, 2), None).unwrap();
        assert_eq!(images.len(), n - 1, "document of {n} pages");
        let indices: Vec<usize> = images.iter().map(|p| p.page_index).collect();
        assert_eq!(indices, (1..n).collect::<Vec<_>>());
    }
}

#[test]
fn single_page_document_writes_nothing() {
    let (outcome, sink) = run(1, &config(4, 2));
    assert_eq!(outcome, TileOutcome::NothingToTile { source_pages: 1 });
    assert!(sink.is_empty());
}

#[test]
fn empty_document_writes_nothing() {
    let (outcome, sink) = run(0, &config(4, 2));
    assert_eq!(outcome.grid_pages(), 0);
    assert!(sink.is_empty());
}

// ── Paginator ────────────────────────────────────────────────────────────────

#[test]
fn grid_page_count_is_ceiling_of_images_over_slots() {
    for (rows, cols) in [(1, 1), (2, 2), (4, 2), (3, 5)] {
        for pages in 2..=20 {
            let (outcome, sink) = run(pages, &config(rows, cols));
            let images = pages - 1;
            let expected = images.div_ceil(rows * cols);
            assert_eq!(sink.len(), expected, "{pages} pages on {rows}x{cols}");
            assert_eq!(outcome.grid_pages(), expected);
        }
    }
}

#[test]
fn placement_law_two_by_two_with_three_images() {
    // 4 source pages → pages 2, 3, 4 are tiled.
    let (_, sink) = run(4, &config(2, 2));
    assert_eq!(sink.len(), 1);
    let canvas = &sink[0];
    assert_eq!(canvas.dimensions(), (2 * W, 2 * H));

    assert_eq!(cell(canvas, 0, 0), page_colour(1));
    assert_eq!(cell(canvas, 1, 0), page_colour(2));
    assert_eq!(cell(canvas, 0, 1), page_colour(3));
    assert_eq!(cell(canvas, 1, 1), WHITE);
}

#[test]
fn placement_law_holds_for_every_pixel() {
    let cfg = config(3, 2);
    let (_, sink) = run(8, &cfg);
    let images = 7;
    for (page, canvas) in sink.iter().enumerate() {
        for i in 0..6 {
            let global = page * 6 + i;
            let (x, y) = ((i / 3) as u32 * W, (i % 3) as u32 * H);
            let expected = if global < images {
                page_colour(global + 1)
            } else {
                WHITE
            };
            for (dx, dy) in [(0, 0), (W - 1, 0), (0, H - 1), (W - 1, H - 1)] {
                assert_eq!(canvas.get_pixel(x + dx, y + dy), &expected, "page {page} slot {i}");
            }
        }
    }
}

#[test]
fn nine_pages_fill_one_four_by_two_grid() {
    let (outcome, sink) = run(9, &config(4, 2));
    assert_eq!(sink.len(), 1);
    assert_eq!(background_cells(&sink[0], 4, 2), 0);

    let stats = outcome.stats().unwrap();
    assert_eq!(stats.rendered_pages, 8);
    assert_eq!(stats.empty_slots, 0);
    assert_eq!((stats.cell_width, stats.cell_height), (W, H));
}

#[test]
fn ten_pages_spill_one_image_onto_second_grid() {
    let (outcome, sink) = run(10, &config(4, 2));
    assert_eq!(sink.len(), 2);
    assert_eq!(background_cells(&sink[0], 4, 2), 0);
    assert_eq!(background_cells(&sink[1], 4, 2), 7);
    assert_eq!(cell(&sink[1], 0, 0), page_colour(9));
    assert_eq!(outcome.stats().unwrap().empty_slots, 7);
}

#[test]
fn last_grid_never_repeats_earlier_pages() {
    let (_, sink) = run(12, &config(2, 2));
    let mut seen = Vec::new();
    for canvas in &sink {
        for r in 0..2 {
            for c in 0..2 {
                let colour = cell(canvas, r, c);
                if colour != WHITE {
                    assert!(!seen.contains(&colour), "page colour {colour:?} placed twice");
                    seen.push(colour);
                }
            }
        }
    }
    assert_eq!(seen.len(), 11);
}

#[test]
fn covered_pixels_equal_images_times_cell_area() {
    for pages in [2, 5, 9, 10, 17] {
        let (_, sink) = run(pages, &config(4, 2));
        let covered: usize = sink
            .iter()
            .map(|c| c.pixels().filter(|p| **p != WHITE).count())
            .sum();
        assert_eq!(covered, (pages - 1) * (W * H) as usize, "{pages} pages");
    }
}

#[test]
fn repeated_runs_are_identical() {
    let cfg = config(4, 2);
    let (a_outcome, a) = run(13, &cfg);
    let (b_outcome, b) = run(13, &cfg);
    assert_eq!(a, b);
    assert_eq!(a_outcome.grid_pages(), b_outcome.grid_pages());
}

#[test]
fn streaming_mode_matches_materialised_mode() {
    let eager = config(3, 2);
    let mut streaming = eager.clone();
    streaming.streaming = true;

    for pages in [2, 7, 13] {
        let (_, a) = run(pages, &eager);
        let (_, b) = run(pages, &streaming);
        assert_eq!(a, b, "{pages} pages");
    }
}

#[test]
fn row_major_and_keep_first_page() {
    let cfg = TileConfig::builder("in.pdf", "out.pdf")
        .rows(2)
        .cols(2)
        .fill_order(FillOrder::RowMajor)
        .skip_first_page(false)
        .background(BackgroundColor::BLACK)
        .build()
        .unwrap();
    let (_, sink) = run(3, &cfg);
    let canvas = &sink[0];
    assert_eq!(cell(canvas, 0, 0), page_colour(0));
    assert_eq!(cell(canvas, 0, 1), page_colour(1));
    assert_eq!(cell(canvas, 1, 0), page_colour(2));
    assert_eq!(cell(canvas, 1, 1), Rgb([0, 0, 0]));
}

#[test]
fn page_failure_is_fatal_in_both_modes() {
    for streaming in [false, true] {
        let mut cfg = config(2, 2);
        cfg.streaming = streaming;
        let source = SyntheticPdf {
            pages: 10,
            fail_at: Some(7),
        };
        let mut sink: Vec<RgbImage> = Vec::new();
        let err = tile_with(&source, &mut sink, &cfg).unwrap_err();
        assert!(
            matches!(err, TileError::RasterisationFailed { page: 8, .. }),
            "got {err}"
        );
        assert!(!err.is_open_failure());
    }
}

#[test]
fn unusable_grid_set_after_build_is_rejected() {
    let mut zero_rows = TileConfig::new("in.pdf", "out.pdf");
    zero_rows.rows = 0;

    let mut overflowing = TileConfig::new("in.pdf", "out.pdf");
    overflowing.rows = usize::MAX / 2;
    overflowing.cols = 3;

    for cfg in [zero_rows, overflowing] {
        let mut sink: Vec<RgbImage> = Vec::new();
        let err = tile_with(&SyntheticPdf::with_pages(5), &mut sink, &cfg).unwrap_err();
        assert!(matches!(err, TileError::InvalidConfig(_)), "got {err}");
        assert!(sink.is_empty());
    }
}

// ── Progress events ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    start: Mutex<Option<(usize, usize)>>,
    rendered: AtomicUsize,
    composed: Mutex<Vec<(usize, usize)>>,
    complete: AtomicUsize,
}

impl TileProgressCallback for Recorder {
    fn on_tiling_start(&self, pages_to_render: usize, grid_pages: usize) {
        *self.start.lock().unwrap() = Some((pages_to_render, grid_pages));
    }

    fn on_page_rendered(&self, _page_num: usize, _total: usize) {
        self.rendered.fetch_add(1, Ordering::SeqCst);
    }

    fn on_grid_page_composed(&self, grid_page: usize, _total: usize, images_on_page: usize) {
        self.composed.lock().unwrap().push((grid_page, images_on_page));
    }

    fn on_tiling_complete(&self, _rendered: usize, grid_pages: usize) {
        self.complete.store(grid_pages, Ordering::SeqCst);
    }
}

#[test]
fn progress_events_follow_the_run() {
    for streaming in [false, true] {
        let recorder = Arc::new(Recorder::default());
        let cfg = TileConfig::builder("in.pdf", "out.pdf")
            .streaming(streaming)
            .progress_callback(recorder.clone() as Arc<dyn TileProgressCallback>)
            .build()
            .unwrap();

        let (_, sink) = run(10, &cfg);
        assert_eq!(sink.len(), 2);
        assert_eq!(*recorder.start.lock().unwrap(), Some((9, 2)));
        assert_eq!(recorder.rendered.load(Ordering::SeqCst), 9);
        assert_eq!(*recorder.composed.lock().unwrap(), vec![(1, 8), (2, 1)]);
        assert_eq!(recorder.complete.load(Ordering::SeqCst), 2);
    }
}
