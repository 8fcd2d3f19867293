//! # Waveroute Core
//!
//! Geometry and angle-grid primitives for waveroute.
//! Provides the planar types, grid-angle arithmetic and coordinate unit
//! handling that the layout crate builds route synthesis on.

pub mod angle;
pub mod error;
pub mod geometry;
pub mod units;

pub use error::{GeometryError, GeometryResult};
pub use geometry::{Point, Polygon, ProbeLine, Rect};
pub use units::CoordinateUnits;
