//! Tiling entry points.
//!
//! [`tile_with`] is the synchronous core: it pulls pages from any
//! [`PageSource`], composes grid canvases and hands them to any [`GridSink`].
//! [`tile`] wires it to pdfium for a real file and saves the result;
//! [`tile_sync`] does the same without an async caller.
//!
//! Two execution modes produce identical output:
//!
//! * materialised (default) — rasterise every eligible page, then paginate
//! * streaming — rasterise one chunk, compose it, drop it, repeat; peak
//!   memory is one chunk of page images plus one canvas

use crate::config::TileConfig;
use crate::error::TileError;
use crate::output::{DocumentInfo, TileOutcome, TileStats};
use crate::pipeline::compose::{compose_grid, paginate, CellSize};
use crate::pipeline::layout::GridLayout;
use crate::pipeline::render::{self, eligible_indices, PageImage, PageSource, PdfiumSource};
use crate::pipeline::write::{GridSink, PdfiumSink};
use crate::pipeline::{binding, input};
use crate::progress::TileProgressCallback;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Tile the configured input PDF into grid pages and save the output PDF.
///
/// pdfium is not async-safe, so the whole run happens on a blocking worker
/// thread via `spawn_blocking`.
///
/// # Returns
/// * `Ok(TileOutcome::Written(stats))` — output saved to `config.output_path`
/// * `Ok(TileOutcome::NothingToTile { .. })` — the document has no eligible
///   pages; no file is created
///
/// # Errors
/// Open failures (missing, unreadable, non-PDF, corrupt or locked input),
/// any page failing to render, and output write failures.
pub async fn tile(config: &TileConfig) -> Result<TileOutcome, TileError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || tile_blocking(&config))
        .await
        .map_err(|e| TileError::Internal(format!("Tiling task panicked: {}", e)))?
}

/// Synchronous wrapper around [`tile`].
///
/// Creates a temporary tokio runtime internally.
pub fn tile_sync(config: &TileConfig) -> Result<TileOutcome, TileError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TileError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(tile(config))
}

/// Report page count and metadata without rendering anything.
///
/// `skip_first_page` only affects [`DocumentInfo::eligible_pages`].
pub async fn inspect(
    path: impl AsRef<Path>,
    password: Option<&str>,
    skip_first_page: bool,
) -> Result<DocumentInfo, TileError> {
    let path = path.as_ref().to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        input::validate_input(&path)?;
        let pdfium = binding::bind_pdfium()?;
        let source = PdfiumSource::open(&pdfium, &path, password.as_deref())?;
        Ok(source.info(skip_first_page))
    })
    .await
    .map_err(|e| TileError::Internal(format!("Inspect task panicked: {}", e)))?
}

/// Blocking implementation of [`tile`].
fn tile_blocking(config: &TileConfig) -> Result<TileOutcome, TileError> {
    let total_start = Instant::now();
    info!("Starting tiling: {}", config.input_path.display());

    config.validate()?;
    input::validate_input(&config.input_path)?;
    input::validate_output(&config.output_path)?;

    let pdfium = binding::bind_pdfium()?;
    let source = PdfiumSource::open(&pdfium, &config.input_path, config.password.as_deref())?;
    let mut sink = PdfiumSink::new(&pdfium, config.dpi)?;

    let outcome = tile_with(&source, &mut sink, config)?;
    // Source document is no longer needed once every canvas is in the sink.
    drop(source);

    let mut stats = match outcome {
        TileOutcome::Written(stats) => stats,
        nothing @ TileOutcome::NothingToTile { .. } => return Ok(nothing),
    };

    let write_start = Instant::now();
    sink.save(&config.output_path)?;
    stats.write_ms = write_start.elapsed().as_millis() as u64;
    stats.total_ms = total_start.elapsed().as_millis() as u64;
    stats.output_path = Some(config.output_path.clone());

    info!(
        "Tiling complete: {} pages → {} grid pages, {}ms total",
        stats.rendered_pages, stats.grid_pages, stats.total_ms
    );
    Ok(TileOutcome::Written(stats))
}

/// Tile every eligible page of `source` into `sink`.
///
/// Nothing is written to disk here; saving is up to the caller. When the
/// source has no eligible pages the sink is left untouched and
/// [`TileOutcome::NothingToTile`] is returned.
pub fn tile_with<S, K>(source: &S, sink: &mut K, config: &TileConfig) -> Result<TileOutcome, TileError>
where
    S: PageSource + ?Sized,
    K: GridSink + ?Sized,
{
    let total_start = Instant::now();
    config.validate()?;
    let layout = GridLayout::from_config(config)?;
    let source_pages = source.page_count();
    let indices = eligible_indices(source_pages, config.skip_first_page);

    if indices.is_empty() {
        info!(
            "No pages to arrange ({} page document, skip_first_page={}); nothing written",
            source_pages, config.skip_first_page
        );
        return Ok(TileOutcome::NothingToTile { source_pages });
    }

    let grid_pages = layout.page_count(indices.len());
    info!(
        "Arranging {} pages in a {}x{} grid ({:?}) → {} grid pages",
        indices.len(),
        layout.rows,
        layout.cols,
        layout.fill_order,
        grid_pages
    );

    let progress = config.progress_callback.as_deref();
    if let Some(cb) = progress {
        cb.on_tiling_start(indices.len(), grid_pages);
    }

    let mut stats = TileStats {
        source_pages,
        rendered_pages: indices.len(),
        grid_pages,
        slots_per_page: layout.slots_per_page(),
        empty_slots: layout.empty_slots(indices.len()),
        ..Default::default()
    };

    let cell = if config.streaming {
        tile_streaming(source, sink, config, &layout, &indices, &mut stats, progress)?
    } else {
        tile_materialised(source, sink, config, &layout, &mut stats, progress)?
    };
    stats.cell_width = cell.width;
    stats.cell_height = cell.height;
    stats.total_ms = total_start.elapsed().as_millis() as u64;

    if let Some(cb) = progress {
        cb.on_tiling_complete(stats.rendered_pages, stats.grid_pages);
    }
    Ok(TileOutcome::Written(stats))
}

/// Rasterise everything, then paginate.
fn tile_materialised<S, K>(
    source: &S,
    sink: &mut K,
    config: &TileConfig,
    layout: &GridLayout,
    stats: &mut TileStats,
    progress: Option<&dyn TileProgressCallback>,
) -> Result<CellSize, TileError>
where
    S: PageSource + ?Sized,
    K: GridSink + ?Sized,
{
    let render_start = Instant::now();
    let images = render::rasterize_pages(source, config, progress)?;
    stats.render_ms = render_start.elapsed().as_millis() as u64;
    info!("Converted {} pages to images in {}ms", images.len(), stats.render_ms);

    let cell = CellSize::of_first(&images)
        .ok_or_else(|| TileError::Internal("no pages rendered".into()))?;

    let compose_start = Instant::now();
    let canvases = paginate(&images, layout, config.background)?;
    let ranges = layout.chunk_ranges(images.len());
    for (page_no, (canvas, range)) in canvases.iter().zip(ranges).enumerate() {
        log_chunk(&images[range.clone()], page_no + 1);
        sink.add_canvas(canvas)?;
        if let Some(cb) = progress {
            cb.on_grid_page_composed(page_no + 1, canvases.len(), range.len());
        }
    }
    stats.compose_ms = compose_start.elapsed().as_millis() as u64;
    Ok(cell)
}

/// Rasterise and compose one chunk at a time.
fn tile_streaming<S, K>(
    source: &S,
    sink: &mut K,
    config: &TileConfig,
    layout: &GridLayout,
    indices: &[usize],
    stats: &mut TileStats,
    progress: Option<&dyn TileProgressCallback>,
) -> Result<CellSize, TileError>
where
    S: PageSource + ?Sized,
    K: GridSink + ?Sized,
{
    let ranges = layout.chunk_ranges(indices.len());
    let total_grid_pages = ranges.len();
    let mut cell_size: Option<CellSize> = None;

    for (page_no, range) in ranges.into_iter().enumerate() {
        let render_start = Instant::now();
        let chunk = render::render_indices(
            source,
            &indices[range],
            config.dpi,
            indices.len(),
            progress,
        )?;
        stats.render_ms += render_start.elapsed().as_millis() as u64;

        let cell = match cell_size {
            Some(cell) => cell,
            None => *cell_size.insert(
                CellSize::of_first(&chunk)
                    .ok_or_else(|| TileError::Internal("empty chunk".into()))?,
            ),
        };

        let compose_start = Instant::now();
        log_chunk(&chunk, page_no + 1);
        let canvas = compose_grid(&chunk, layout, cell, config.background)?;
        sink.add_canvas(&canvas)?;
        stats.compose_ms += compose_start.elapsed().as_millis() as u64;

        if let Some(cb) = progress {
            cb.on_grid_page_composed(page_no + 1, total_grid_pages, chunk.len());
        }
    }

    cell_size.ok_or_else(|| TileError::Internal("no pages rendered".into()))
}

fn log_chunk(chunk: &[PageImage], grid_page: usize) {
    if let (Some(first), Some(last)) = (chunk.first(), chunk.last()) {
        info!(
            "Creating grid page {} from source pages {} to {}",
            grid_page,
            first.page_num(),
            last.page_num()
        );
    }
}
