//! Configuration types for PDF grid tiling.
//!
//! Every knob of a run lives in [`TileConfig`], built via its
//! [`TileConfigBuilder`]. Defaults reproduce the classic behaviour: skip the
//! cover page, render at 150 DPI, tile four rows by two columns, fill each
//! column top to bottom before moving right, on a white background.

use crate::error::TileError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Lowest accepted rendering DPI.
pub const MIN_DPI: u32 = 36;
/// Highest accepted rendering DPI.
pub const MAX_DPI: u32 = 600;

/// Configuration for one tiling run.
///
/// # Example
/// ```rust
/// use pdf_grid::{FillOrder, TileConfig};
///
/// let config = TileConfig::builder("slides.pdf", "slides_grid.pdf")
///     .rows(3)
///     .cols(3)
///     .dpi(120)
///     .fill_order(FillOrder::RowMajor)
///     .build()
///     .unwrap();
/// assert_eq!(config.rows * config.cols, 9);
/// ```
#[derive(Clone)]
pub struct TileConfig {
    /// Source PDF.
    pub input_path: PathBuf,

    /// Destination PDF. Created or overwritten; its directory must exist.
    pub output_path: PathBuf,

    /// Grid rows per output page. Default: 4.
    pub rows: usize,

    /// Grid columns per output page. Default: 2.
    pub cols: usize,

    /// Rendering DPI used when rasterising each source page. Default: 150.
    ///
    /// Also fixes the physical size of the output pages: a cell is
    /// `width_px * 72 / dpi` points wide, i.e. the size of the source page.
    pub dpi: u32,

    /// Leave the first source page out of the grid. Default: true.
    pub skip_first_page: bool,

    /// Order in which a chunk fills its grid slots. Default: column-major.
    pub fill_order: FillOrder,

    /// Colour of the canvas behind (and in empty) grid cells. Default: white.
    pub background: BackgroundColor,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Rasterise and compose one output page at a time instead of holding
    /// every rendered page in memory. Output is identical. Default: false.
    pub streaming: bool,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl TileConfig {
    /// Config with default settings for the given paths.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            rows: 4,
            cols: 2,
            dpi: 150,
            skip_first_page: true,
            fill_order: FillOrder::default(),
            background: BackgroundColor::default(),
            password: None,
            streaming: false,
            progress_callback: None,
        }
    }

    /// Create a new builder for `TileConfig`.
    pub fn builder(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> TileConfigBuilder {
        TileConfigBuilder {
            config: Self::new(input_path, output_path),
        }
    }

    /// Number of source images one output page holds.
    ///
    /// Saturates for grids that [`TileConfig::validate`] would reject.
    pub fn slots_per_page(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Check the constraints [`TileConfigBuilder::build`] enforces.
    ///
    /// Fields are public, so entry points re-run this before doing any grid
    /// arithmetic.
    pub fn validate(&self) -> Result<(), TileError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(TileError::InvalidConfig(format!(
                "grid must have at least one row and one column, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.rows.checked_mul(self.cols).is_none() {
            return Err(TileError::InvalidConfig(format!(
                "grid {}x{} has too many slots",
                self.rows, self.cols
            )));
        }
        if self.dpi < MIN_DPI || self.dpi > MAX_DPI {
            return Err(TileError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                self.dpi
            )));
        }
        if is_blank(&self.input_path) {
            return Err(TileError::InvalidConfig("input path is empty".into()));
        }
        if is_blank(&self.output_path) {
            return Err(TileError::InvalidConfig("output path is empty".into()));
        }
        if self.input_path == self.output_path {
            return Err(TileError::InvalidConfig(format!(
                "output path must differ from input path '{}'",
                self.input_path.display()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for TileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileConfig")
            .field("input_path", &self.input_path)
            .field("output_path", &self.output_path)
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("dpi", &self.dpi)
            .field("skip_first_page", &self.skip_first_page)
            .field("fill_order", &self.fill_order)
            .field("background", &self.background)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("streaming", &self.streaming)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn TileProgressCallback>"),
            )
            .finish()
    }
}

/// Builder for [`TileConfig`].
#[derive(Debug)]
pub struct TileConfigBuilder {
    config: TileConfig,
}

impl TileConfigBuilder {
    pub fn rows(mut self, rows: usize) -> Self {
        self.config.rows = rows;
        self
    }

    pub fn cols(mut self, cols: usize) -> Self {
        self.config.cols = cols;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn skip_first_page(mut self, v: bool) -> Self {
        self.config.skip_first_page = v;
        self
    }

    pub fn fill_order(mut self, order: FillOrder) -> Self {
        self.config.fill_order = order;
        self
    }

    pub fn background(mut self, colour: BackgroundColor) -> Self {
        self.config.background = colour;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn streaming(mut self, v: bool) -> Self {
        self.config.streaming = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TileConfig, TileError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Order in which the images of one chunk occupy grid slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOrder {
    /// Down then over: fill a whole column top to bottom before the next. (default)
    #[default]
    ColumnMajor,
    /// Reading order: fill a whole row left to right before the next.
    RowMajor,
}

/// Solid RGB colour used to pre-fill grid canvases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundColor(pub [u8; 3]);

impl BackgroundColor {
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const BLACK: Self = Self([0, 0, 0]);
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl FromStr for BackgroundColor {
    type Err = TileError;

    /// Accepts `white`, `black`, `gray`/`grey`, `#rgb` and `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            "gray" | "grey" => return Ok(Self([128, 128, 128])),
            _ => {}
        }

        let invalid = || TileError::InvalidConfig(format!("invalid background colour '{s}'"));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());

        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    rgb[i] = v * 17;
                }
                Ok(Self(rgb))
            }
            6 if hex.is_ascii() => Ok(Self([
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ])),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_layout() {
        let c = TileConfig::new("in.pdf", "out.pdf");
        assert_eq!(c.rows, 4);
        assert_eq!(c.cols, 2);
        assert_eq!(c.dpi, 150);
        assert!(c.skip_first_page);
        assert_eq!(c.fill_order, FillOrder::ColumnMajor);
        assert_eq!(c.background, BackgroundColor::WHITE);
        assert!(!c.streaming);
        assert_eq!(c.slots_per_page(), 8);
    }

    #[test]
    fn builder_rejects_empty_grid() {
        let err = TileConfig::builder("in.pdf", "out.pdf")
            .rows(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, TileError::InvalidConfig(_)));

        let err = TileConfig::builder("in.pdf", "out.pdf")
            .cols(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("4x0"), "got: {err}");
    }

    #[test]
    fn builder_rejects_grid_with_overflowing_slot_count() {
        let err = TileConfig::builder("in.pdf", "out.pdf")
            .rows(usize::MAX / 2)
            .cols(3)
            .build()
            .unwrap_err();
        assert!(matches!(err, TileError::InvalidConfig(_)), "got: {err}");
        assert!(err.to_string().contains("too many slots"), "got: {err}");
    }

    #[test]
    fn validate_catches_fields_set_after_build() {
        let mut c = TileConfig::builder("in.pdf", "out.pdf").build().unwrap();
        assert!(c.validate().is_ok());

        c.rows = 0;
        assert!(matches!(c.validate(), Err(TileError::InvalidConfig(_))));
        assert_eq!(c.slots_per_page(), 0);

        c.rows = usize::MAX;
        assert!(matches!(c.validate(), Err(TileError::InvalidConfig(_))));
        assert_eq!(c.slots_per_page(), usize::MAX);
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = TileConfig::builder("in.pdf", "out.pdf")
            .dpi(5000)
            .build()
            .unwrap();
        assert_eq!(c.dpi, MAX_DPI);

        let c = TileConfig::builder("in.pdf", "out.pdf").dpi(1).build().unwrap();
        assert_eq!(c.dpi, MIN_DPI);
    }

    #[test]
    fn builder_rejects_same_input_and_output() {
        let err = TileConfig::builder("doc.pdf", "doc.pdf").build().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn builder_rejects_empty_paths() {
        assert!(TileConfig::builder("", "out.pdf").build().is_err());
        assert!(TileConfig::builder("in.pdf", "").build().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let c = TileConfig::builder("in.pdf", "out.pdf")
            .password("hunter2")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn parse_background_names_and_hex() {
        assert_eq!("white".parse::<BackgroundColor>().unwrap(), BackgroundColor::WHITE);
        assert_eq!(" Black ".parse::<BackgroundColor>().unwrap(), BackgroundColor::BLACK);
        assert_eq!(
            "#ff8000".parse::<BackgroundColor>().unwrap(),
            BackgroundColor([255, 128, 0])
        );
        assert_eq!(
            "#0f0".parse::<BackgroundColor>().unwrap(),
            BackgroundColor([0, 255, 0])
        );
    }

    #[test]
    fn parse_background_rejects_garbage() {
        for bad in ["", "blue-ish", "#12", "#12345g", "ff8000", "#ééé"] {
            assert!(bad.parse::<BackgroundColor>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn background_display_round_trips() {
        let c = BackgroundColor([18, 52, 86]);
        assert_eq!(c.to_string(), "#123456");
        assert_eq!(c.to_string().parse::<BackgroundColor>().unwrap(), c);
    }
}
