//! CLI binary for pdf-grid.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `TileConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_grid::{
    inspect, tile, BackgroundColor, FillOrder, ProgressCallback, TileConfig, TileOutcome,
    TileProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over rendered source pages, one log
/// line per finished grid page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Spinner until `on_tiling_start` reports the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Rendering");
        self.bar.reset_eta();
    }

    /// Remove the bar from the terminal. Safe to call more than once.
    fn clear(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl TileProgressCallback for CliProgressCallback {
    fn on_tiling_start(&self, pages_to_render: usize, grid_pages: usize) {
        self.activate_bar(pages_to_render);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Tiling {pages_to_render} pages onto {grid_pages} grid pages…"
            ))
        ));
    }

    fn on_page_rendered(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
        self.bar.inc(1);
    }

    fn on_grid_page_composed(&self, grid_page: usize, total_grid_pages: usize, images_on_page: usize) {
        self.bar.println(format!(
            "  {} Grid page {:>3}/{:<3}  {}",
            green("✓"),
            grid_page,
            total_grid_pages,
            dim(&format!("{images_on_page} pages placed")),
        ));
    }

    fn on_tiling_complete(&self, _rendered: usize, _grid_pages: usize) {
        self.clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Classic layout: skip the cover, 4 rows x 2 columns, down-then-over
  pdfgrid slides.pdf -o slides_grid.pdf

  # 3x3 handout in reading order, keeping the first page
  pdfgrid --rows 3 --cols 3 --row-major --keep-first-page deck.pdf

  # Lower memory use on very long documents
  pdfgrid --streaming --dpi 100 book.pdf -o book_grid.pdf

  # Page count and metadata only
  pdfgrid --inspect-only deck.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory); otherwise ./ and
                    the system library path are searched
  RUST_LOG          Override log filtering (e.g. RUST_LOG=pdf_grid=debug)
"#;

/// Tile PDF pages into a grid and write them to a new PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdfgrid",
    version,
    about = "Tile PDF pages into a rows × cols grid and save them as a new PDF",
    long_about = "Rasterise every page of a PDF (except the first, by default), arrange the \
images several to a page in a fixed grid, and write the grid pages to a new PDF.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source PDF file.
    input: PathBuf,

    /// Output PDF. Default: <input>_grid_<rows>x<cols>.pdf beside the input.
    #[arg(short, long, env = "PDFGRID_OUTPUT")]
    output: Option<PathBuf>,

    /// Grid rows per output page.
    #[arg(long, env = "PDFGRID_ROWS", default_value_t = 4,
          value_parser = clap::value_parser!(u16).range(1..))]
    rows: u16,

    /// Grid columns per output page.
    #[arg(long, env = "PDFGRID_COLS", default_value_t = 2,
          value_parser = clap::value_parser!(u16).range(1..))]
    cols: u16,

    /// Rendering DPI (36–600).
    #[arg(long, env = "PDFGRID_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(36..=600))]
    dpi: u32,

    /// Include the first page (skipped by default).
    #[arg(long, env = "PDFGRID_KEEP_FIRST_PAGE")]
    keep_first_page: bool,

    /// Fill rows left to right instead of columns top to bottom.
    #[arg(long, env = "PDFGRID_ROW_MAJOR")]
    row_major: bool,

    /// Canvas colour: white, black, grey, #rgb or #rrggbb.
    #[arg(long, env = "PDFGRID_BACKGROUND", default_value = "white")]
    background: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFGRID_PASSWORD")]
    password: Option<String>,

    /// Render and compose one grid page at a time to bound memory use.
    #[arg(long, env = "PDFGRID_STREAMING")]
    streaming: bool,

    /// Print page count and metadata only, no tiling.
    #[arg(long)]
    inspect_only: bool,

    /// Print the result as JSON.
    #[arg(long, env = "PDFGRID_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFGRID_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFGRID_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFGRID_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; -v brings them back.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let skip_first_page = !cli.keep_first_page;
        let info = inspect(&cli.input, cli.password.as_deref(), skip_first_page)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = info.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = info.author {
                println!("Author:       {}", a);
            }
            println!("Pages:        {}", info.page_count);
            let note = if skip_first_page {
                "first page skipped"
            } else {
                "first page kept"
            };
            println!("Tileable:     {} ({note})", info.eligible_pages);
            println!("PDF Version:  {}", info.pdf_version);
        }
        return Ok(());
    }

    // ── Progress ─────────────────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new_dynamic);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn TileProgressCallback>);

    // ── Run ──────────────────────────────────────────────────────────────
    let result = match build_config(&cli, progress_cb) {
        Ok(config) => tile(&config)
            .await
            .context("Tiling failed")
            .map(|outcome| (config, outcome)),
        Err(e) => Err(e),
    };
    // Errors and empty documents never reach on_tiling_complete.
    if let Some(cb) = &cli_progress {
        cb.clear();
    }
    let (config, outcome) = result?;

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if !cli.quiet {
        match &outcome {
            TileOutcome::Written(stats) => {
                eprintln!(
                    "{}  {} pages → {} grid pages  {}ms  →  {}",
                    green("✔"),
                    stats.rendered_pages,
                    stats.grid_pages,
                    stats.total_ms,
                    bold(&config.output_path.display().to_string()),
                );
                if stats.empty_slots > 0 {
                    eprintln!(
                        "   {}",
                        dim(&format!("{} empty cells on the last page", stats.empty_slots))
                    );
                }
            }
            TileOutcome::NothingToTile { source_pages } => {
                eprintln!(
                    "{}  No pages to arrange ({} page document); nothing written",
                    cyan("⚠"),
                    source_pages
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `TileConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TileConfig> {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input, cli.rows, cli.cols));

    let background: BackgroundColor = cli
        .background
        .parse()
        .with_context(|| format!("Invalid --background '{}'", cli.background))?;

    let fill_order = if cli.row_major {
        FillOrder::RowMajor
    } else {
        FillOrder::ColumnMajor
    };

    let mut builder = TileConfig::builder(&cli.input, output)
        .rows(cli.rows as usize)
        .cols(cli.cols as usize)
        .dpi(cli.dpi)
        .skip_first_page(!cli.keep_first_page)
        .fill_order(fill_order)
        .background(background)
        .streaming(cli.streaming);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// `<dir>/<stem>_grid_<rows>x<cols>.pdf` beside the input.
fn default_output_path(input: &Path, rows: u16, cols: u16) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_grid_{rows}x{cols}.pdf"))
}
