//! Error types for the pdf-grid library.
//!
//! Every failure that stops a run is a [`TileError`]. A document that simply
//! has nothing to tile (one page, first page skipped) is not an error; it is
//! reported as [`crate::output::TileOutcome::NothingToTile`] so callers can
//! tell "could not open the file" apart from "the file had no eligible pages".

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-grid library.
#[derive(Debug, Error)]
pub enum TileError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Layout errors ─────────────────────────────────────────────────────
    /// The grid canvas would not fit in a single image buffer.
    #[error("Grid canvas of {width}x{height} px is too large; lower --dpi or the grid size")]
    CanvasTooLarge { width: u64, height: u64 },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The directory the output should be written into does not exist.
    #[error("Output directory does not exist: '{path}'")]
    OutputDirMissing { path: PathBuf },

    /// pdfium could not assemble the output document.
    #[error("Failed to build output PDF: {detail}")]
    PdfEncodeFailed { detail: String },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or the directory containing it).\n\
  • Place libpdfium next to where you run pdfgrid.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TileError {
    /// `true` when the source document could not be opened at all.
    ///
    /// These are the cases that would otherwise be indistinguishable from an
    /// empty document.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            TileError::FileNotFound { .. }
                | TileError::PermissionDenied { .. }
                | TileError::NotAPdf { .. }
                | TileError::CorruptPdf { .. }
                | TileError::PasswordRequired { .. }
                | TileError::WrongPassword { .. }
        )
    }
}
