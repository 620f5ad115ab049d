//! # Contour Errors
//!
//! Error types for contour loading, spline fitting and refinement.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or refining a contour.
#[derive(Debug, Error)]
pub enum ContourError {
    /// A contour line could not be parsed
    #[error("Format error at line {line}: '{content}' ({message})")]
    FileFormat {
        /// 1-based line number in the input
        line: usize,
        /// The offending line as read
        content: String,
        /// What went wrong
        message: String,
    },

    /// Reading the contour file failed
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Spline construction failed
    #[error("Spline fit failed: {message}")]
    SplineFit {
        /// Reason for the failure
        message: String,
    },

    /// Adaptive refinement hit its pass limit
    #[error("Refinement did not converge after {passes} passes ({points} points)")]
    RefinementNonconvergence {
        /// Passes performed
        passes: usize,
        /// Sample size when refinement gave up
        points: usize,
    },

    /// An argument is outside its valid range
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        message: String,
    },
}

impl ContourError {
    /// Creates a format error for one input line.
    pub fn file_format(line: usize, content: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileFormat {
            line,
            content: content.into(),
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

    /// Creates a spline fit error.
    pub fn spline_fit(message: impl Into<String>) -> Self {
        Self::SplineFit {
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
}

/// Result alias for contour operations.
pub type ContourResult<T> = Result<T, ContourError>;
