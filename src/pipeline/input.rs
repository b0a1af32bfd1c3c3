//! Input validation: make sure the source looks like a readable PDF before
//! pdfium sees it, and that the output has somewhere to go.
//!
//! pdfium reports every load problem as one opaque error. Checking existence,
//! permissions and the `%PDF` magic bytes up front turns the common mistakes
//! into specific [`TileError`] variants.

use crate::error::TileError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Validate that `path` exists, is readable, and starts with `%PDF`.
pub fn validate_input(path: &Path) -> Result<(), TileError> {
    if !path.exists() {
        return Err(TileError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(TileError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TileError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(TileError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(())
}

/// Validate that the directory `path` will be written into exists.
///
/// No directories are created.
pub fn validate_output(path: &Path) -> Result<(), TileError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(TileError::OutputDirMissing {
                path: dir.to_path_buf(),
            })
        }
        _ => Ok(()),
    }
}
