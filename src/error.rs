//! Error types for cellsnap.
//!
//! [`MeshError`] covers building and loading meshes, [`SnapError`] covers the
//! snap and offset operations themselves.

use std::path::PathBuf;
use thiserror::Error;

use crate::ops::Severity;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Result type alias using [`SnapError`].
pub type SnapResult<T> = std::result::Result<T, SnapError>;

/// Errors that can occur while building, loading or saving meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners or repeats a vertex.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A UV channel does not carry exactly one coordinate per loop.
    #[error("UV channel '{channel}' has {found} coordinates, expected {expected}")]
    ChannelLength {
        /// The channel name.
        channel: String,
        /// Number of loops in the mesh.
        expected: usize,
        /// Number of coordinates supplied.
        found: usize,
    },

    /// A UV channel with the same name was added twice.
    #[error("UV channel '{0}' already exists")]
    DuplicateChannel(String),

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

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

/// Errors produced by island detection and the grid operators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapError {
    /// The configured UV channel is absent on a mesh.
    #[error("UV channel '{channel}' not found")]
    ChannelNotFound {
        /// The channel name that was looked up.
        channel: String,
    },

    /// The requested grid cell does not exist.
    #[error("Cell index out of bounds")]
    CellIndexOutOfBounds {
        /// The requested cell.
        index: usize,
        /// Number of cells in the grid.
        cells: usize,
    },

    /// A mesh has no selected faces.
    #[error("No selected UVs found")]
    EmptySelection,

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

impl SnapError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        SnapError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Severity this error is reported with.
    ///
    /// An empty selection is only a warning; the mesh is skipped as a no-op.
    pub fn severity(&self) -> Severity {
        match self {
            SnapError::EmptySelection => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
