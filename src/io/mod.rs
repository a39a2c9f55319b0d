//! Mesh file import.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Notes |
//! |--------|-----------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | `v` and `f` records only |
//!
//! # Usage
//!
//! ```no_run
//! use patchwork::io::load;
//!
//! let mesh = load("model.obj").unwrap();
//! ```
//!
//! The format-specific module can also read from any [`std::io::BufRead`]:
//!
//! ```
//! use patchwork::io::obj;
//!
//! let mesh = obj::parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
//! assert_eq!(mesh.num_patches(), 1);
//! ```

pub mod obj;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{PatchMesh, DEFAULT_COLOR_SEED};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PatchMesh> {
    load_with_seed(path, DEFAULT_COLOR_SEED)
}

/// Load a mesh, drawing patch colors from `seed`.
pub fn load_with_seed<P: AsRef<Path>>(path: P, seed: u64) -> Result<PatchMesh> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Obj => obj::load_with_seed(path, seed),
    }
}
