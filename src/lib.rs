//! # Waveroute
//!
//! A 2D route synthesizer for waveguide and trace layout with support for:
//! - Grid-snapped headings with configurable angle step
//! - Probe-line vertex reconstruction between waypoints
//! - Anchor registries with bounded nearest lookup
//! - Merged-region collision checks and window cuts
//!
//! ## Architecture
//!
//! Waveroute is organized as a workspace with multiple crates:
//!
//! 1. **waveroute-core** - Angle arithmetic, probe geometry, units
//! 2. **waveroute-layout** - Anchors, route synthesis, regions, cuts
//! 3. **waveroute** - Facade that re-exports the public surface

// Re-export the public surface of the member crates
pub use waveroute_core::{
    angle, CoordinateUnits, GeometryError, GeometryResult, Point, Polygon, ProbeLine, Rect,
};

pub use waveroute_layout::{
    cut, scan_markers, Anchor, AnchorId, AnchorRegistry, BoxMarker, CellId, CutOp, LayerFilter,
    LayerId, LayerRef, LayoutSource, Region, RegionError, RegionInput, RegionResult, Route,
    RouteError, RouteOp, RouteResult, RouteSynthesizer, RouterConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
