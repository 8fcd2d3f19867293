//! Error types for route synthesis and region operations.
//!
//! Every failure is terminal: the synthesizer never retries and never
//! returns a partial route. Variants carry the diagnostic context that the
//! corresponding log lines report.

use thiserror::Error;
use waveroute_core::GeometryError;

use crate::region::LayerRef;

/// Errors raised while synthesizing a route between anchors.
#[derive(Error, Debug, Clone)]
pub enum RouteError {
    /// No registered anchor inside the search radius of a path endpoint.
    #[error("no anchor within {search_radius} of ({x}, {y})")]
    AnchorNotFound {
        /// Queried position.
        x: f64,
        y: f64,
        /// Search bound the lookup was limited to.
        search_radius: f64,
    },

    /// A drawn path needs at least two waypoints.
    #[error("route needs at least {min} waypoints, got {got}")]
    TooFewWaypoints { min: usize, got: usize },

    /// An open-ended path never committed a single turn, so there is no
    /// terminal vertex to route to.
    #[error("route never turns and has no end anchor; nothing to synthesize")]
    EmptyRoute,

    /// A turn of exactly 180 degrees was requested.
    #[error("reversal from heading {from} to {to} cannot be routed")]
    Reversal { from: f64, to: f64 },

    /// Consecutive grid probes do not cross after turns were committed.
    #[error("probe at waypoint {index} (heading {heading}) never crosses the previous heading {previous}")]
    NoCrossing {
        /// Index of the offending raw waypoint.
        index: usize,
        heading: f64,
        previous: f64,
    },

    /// The end-anchor probe does not cross the current route heading.
    #[error("end anchor probe (heading {heading}) never crosses the route heading {previous}")]
    AnchorNoCrossing { heading: f64, previous: f64 },

    /// A straight run came out negative after subtracting turn tangents.
    #[error("straight run {index} has length {length} after turn tangents at radius {radius}")]
    NegativeLength {
        /// Index of the straight run in the operation list.
        index: usize,
        /// The negative length that was computed.
        length: f64,
        radius: f64,
    },

    /// The end anchor sits closer than its lateral offset can recover.
    #[error("end anchor unreachable: lateral offset {lateral} exceeds the chord {chord}")]
    UnreachableAnchor {
        /// Perpendicular offset of the anchor from the route heading.
        lateral: f64,
        /// Straight-line distance from the last vertex to the anchor.
        chord: f64,
    },
}

/// Errors raised by region construction and layer queries.
#[derive(Error, Debug, Clone)]
pub enum RegionError {
    /// Invalid input geometry.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The referenced layer does not exist in the layout.
    #[error("layer {layer} not present in the layout")]
    UnknownLayer { layer: LayerRef },

    /// A clip box is required and none was supplied or selected.
    #[error("no clip box supplied and none selected")]
    NoClipBox,
}

/// Result alias for route synthesis.
pub type RouteResult<T> = std::result::Result<T, RouteError>;

/// Result alias for region operations.
pub type RegionResult<T> = std::result::Result<T, RegionError>;
