//! # Waveroute Layout
//!
//! This crate provides the layout-facing half of the router: anchor
//! bookkeeping, grid-snapped route synthesis, and merged-region geometry for
//! collision checks and window cuts.
//!
//! ## Core Components
//!
//! ### Routing
//! - **Anchors**: Oriented connection points with bounded nearest lookup
//! - **Synthesizer**: Waypoints in, vertices and turn angles out
//! - **Routes**: Alternating straight/turn operation lists
//!
//! ### Regions
//! - **Region**: Merged closed loops with cavity tracking
//! - **Layout sources**: Read-only polygon access to a layout database
//! - **Cuts**: Window-versus-content subtraction and intersection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use waveroute_layout::{Anchor, AnchorRegistry, RouteSynthesizer};
//!
//! let mut anchors = AnchorRegistry::new();
//! anchors.register(Anchor::new(0.0, 0.0, 0.0));
//!
//! let synthesizer = RouteSynthesizer::default();
//! let route = synthesizer.link_nearest(&anchors, &waypoints)?;
//! ```

pub mod anchor;
pub mod cut;
pub mod error;
pub mod region;
pub mod route;
pub mod router;

// Re-export all public types from submodules
pub use anchor::{Anchor, AnchorId, AnchorRegistry};
pub use cut::{cut, scan_markers, BoxMarker, CutOp};
pub use error::{RegionError, RegionResult, RouteError, RouteResult};
pub use region::{
    CellId, LayerFilter, LayerId, LayerRef, LayoutSource, Region, RegionInput,
    POINT_DISK_RADIUS, POINT_DISK_SEGMENTS,
};
pub use route::{Route, RouteOp};
pub use router::{RouteSynthesizer, RouterConfig};
