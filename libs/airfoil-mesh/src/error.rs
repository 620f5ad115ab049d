//! # Mesh Errors
//!
//! Error types for block construction, smoothing, connection and export.

use airfoil_contour::ContourError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during mesh generation.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Error from contour loading or refinement
    #[error("Contour error: {0}")]
    Contour(#[from] ContourError),

    /// Lines or boundary curves do not fit the block lattice
    #[error("Block '{block}': {message}")]
    BlockShape {
        /// Block name
        block: String,
        /// What does not fit
        message: String,
    },

    /// Smoothing stopped at its iteration cap
    #[error("Smoothing did not converge after {iterations} iterations (residual {residual:e})")]
    SmoothingNonconvergence {
        /// Iterations performed
        iterations: usize,
        /// Largest node displacement of the last iteration
        residual: f64,
    },

    /// Block merging could not produce a consistent mesh
    #[error("Connectivity ambiguity: {message}")]
    ConnectivityAmbiguity {
        /// What collapsed or overlapped
        message: String,
    },

    /// An argument is outside its valid range
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        message: String,
    },

    /// Writing a mesh file failed
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// File being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl MeshError {
    /// Creates a block shape error.
    pub fn block_shape(block: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BlockShape {
            block: block.into(),
            message: message.into(),
        }
    }

    /// Creates a connectivity ambiguity error.
    pub fn ambiguity(message: impl Into<String>) -> Self {
        Self::ConnectivityAmbiguity {
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Creates an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
