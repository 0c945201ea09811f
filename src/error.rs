//! Error types for distmesh.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors reported by a triangulation oracle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriangulationError {
    /// Fewer points than a single simplex needs.
    #[error("need at least {required} points to triangulate, got {actual}")]
    TooFewPoints {
        /// Minimum number of points (D + 1).
        required: usize,
        /// Number of points supplied.
        actual: usize,
    },

    /// A point coordinate is NaN or infinite.
    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint {
        /// Index of the offending point.
        index: usize,
    },

    /// Two input points coincide.
    #[error("point {index} duplicates point {other}")]
    DuplicatePoint {
        /// Index of the point being inserted.
        index: usize,
        /// Index of the existing point it coincides with.
        other: usize,
    },

    /// The point set spans a lower-dimensional subspace (collinear in 2D, coplanar in 3D).
    #[error("point set is degenerate: {0}")]
    Degenerate(String),

    /// The oracle does not support this dimension.
    #[error("triangulation is not supported in dimension {0}")]
    UnsupportedDimension(usize),
}

/// Errors that can occur during mesh generation.
#[derive(Error, Debug)]
pub enum MeshError {
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

    /// The bounding box is empty, inverted, or not finite along some axis.
    #[error("invalid bounding box on axis {axis}: [{min}, {max}]")]
    InvalidBoundingBox {
        /// The offending axis.
        axis: usize,
        /// Lower extent.
        min: f64,
        /// Upper extent.
        max: f64,
    },

    /// A fixed point has a non-finite coordinate.
    #[error("fixed point {index} has a non-finite coordinate")]
    InvalidFixedPoint {
        /// Index of the fixed point.
        index: usize,
    },

    /// The sizing field returned a non-positive or non-finite value.
    #[error("sizing field must be positive, got {value} at point {index}")]
    InvalidDensity {
        /// Index of the sampled point.
        index: usize,
        /// The returned value.
        value: f64,
    },

    /// Too few points survived sampling or density control to form a simplex.
    #[error("need at least {required} points to mesh, got {actual}")]
    TooFewPoints {
        /// Minimum number of points (D + 1).
        required: usize,
        /// Number of points available.
        actual: usize,
    },

    /// Every simplex was discarded, leaving nothing to relax.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The triangulation oracle failed.
    #[error("triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),

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
