//! Error types for patchwork.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh import and editing.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A numeric token in the input could not be parsed.
    #[error("line {line}: malformed number {token:?}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A position record has fewer than three coordinates.
    #[error("line {line}: position record needs three coordinates")]
    MissingCoordinate {
        /// 1-based line number.
        line: usize,
    },

    /// A face references a vertex that has not been declared.
    #[error("line {line}: face references invalid vertex index {index}")]
    InvalidVertexIndex {
        /// 1-based line number.
        line: usize,
        /// The 1-based index as written in the file.
        index: usize,
    },

    /// A face record has fewer than three vertex references.
    #[error("line {line}: face has {count} vertices, at least 3 are required")]
    DegenerateFace {
        /// 1-based line number.
        line: usize,
        /// Number of vertices found.
        count: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// An edit was requested but nothing of the required kind is selected.
    #[error("no {kind} is selected")]
    NoSelection {
        /// The element kind the edit needs.
        kind: &'static str,
    },

    /// A handle does not refer to an element of this mesh.
    #[error("{kind} {index} does not exist in this mesh")]
    InvalidHandle {
        /// The element kind.
        kind: &'static str,
        /// The raw handle index.
        index: usize,
    },

    /// An operation that needs a paired half-edge met a boundary half-edge.
    #[error("half-edge {edge} has no sym (boundary edge)")]
    BoundaryEdge {
        /// Index of the unpaired half-edge.
        edge: usize,
    },

    /// A traversal exceeded the number of half-edges in the mesh.
    #[error("{walk} starting at half-edge {start} does not close after {limit} steps")]
    BrokenLoop {
        /// Which traversal failed.
        walk: &'static str,
        /// Index of the starting half-edge.
        start: usize,
        /// The iteration cap that was hit.
        limit: usize,
    },

    /// A patch loop does not have the shape an operation needs.
    #[error("patch {patch} is malformed: {reason}")]
    MalformedPatch {
        /// Index of the patch.
        patch: usize,
        /// What is wrong with its loop.
        reason: &'static str,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
