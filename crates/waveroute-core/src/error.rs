//! Error types for the geometry primitives.

use thiserror::Error;

/// Errors raised while constructing or manipulating geometry.
#[derive(Error, Debug, Clone)]
pub enum GeometryError {
    /// A polygon was given too few vertices to enclose any area.
    #[error("polygon needs at least 3 vertices, got {vertex_count}")]
    DegeneratePolygon {
        /// Number of vertices actually supplied.
        vertex_count: usize,
    },
}

/// Result alias for geometry operations.
pub type GeometryResult<T> = std::result::Result<T, GeometryError>;
