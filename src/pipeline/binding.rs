//! Locate and bind the pdfium shared library.
//!
//! Search order:
//! 1. `PDFIUM_LIB_PATH` — the library file itself, or a directory holding it
//! 2. the current directory (`./libpdfium.so`, `./libpdfium.dylib`, `./pdfium.dll`)
//! 3. the system library search path

use crate::error::TileError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit pdfium library (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to the first pdfium library found.
pub fn bind_pdfium() -> Result<Pdfium, TileError> {
    if let Some(path) = library_from_env() {
        debug!("Binding pdfium from {}", path.display());
        return Pdfium::bind_to_library(&path)
            .map(Pdfium::new)
            .map_err(|e| {
                TileError::PdfiumBindingFailed(format!("{}: {:?}", path.display(), e))
            });
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| TileError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Library path named by `PDFIUM_LIB_PATH`, if set.
fn library_from_env() -> Option<PathBuf> {
    let value = std::env::var_os(PDFIUM_LIB_PATH_ENV)?;
    if value.is_empty() {
        return None;
    }
    Some(resolve_library_path(Path::new(&value)))
}

/// A directory resolves to the platform library name inside it.
fn resolve_library_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_is_used_verbatim() {
        let p = Path::new("/opt/pdfium/lib/libpdfium-custom.so");
        assert_eq!(resolve_library_path(p), p.to_path_buf());
    }

    #[test]
    fn directory_resolves_to_platform_library() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_library_path(dir.path());
        assert_eq!(resolved.parent(), Some(dir.path()));
        assert_eq!(resolved, Pdfium::pdfium_platform_library_name_at_path(dir.path()));
    }
}
