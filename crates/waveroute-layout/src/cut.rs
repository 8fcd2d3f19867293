//! Carving and cropping cell content against a clip window.
//!
//! A cut partitions a window into the window region and the merged content
//! under it, then either subtracts the content from the window (leaving the
//! free space) or intersects the two (leaving the occupied space). Scan
//! markers label the resulting loops so downstream tooling can refer to them
//! by name.

use tracing::debug;
use waveroute_core::{Point, Rect};

use crate::error::RegionResult;
use crate::region::{CellId, LayerFilter, LayoutSource, Region};

/// How the window and the content under it are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutOp {
    /// Window minus content: the space left free.
    Subtract,
    /// Window clipped to content: the space occupied.
    Intersect,
}

/// A named label attached to one merged loop of a cut result.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMarker {
    pub name: String,
    /// Minimum corner of the loop's bounding box.
    pub position: Point,
}

/// Cuts the selected layer content of `cells` against a clip window.
pub fn cut<S: LayoutSource>(
    source: &S,
    cells: &[CellId],
    filter: &LayerFilter,
    clip: Option<&Rect>,
    op: CutOp,
) -> RegionResult<Region> {
    let (window, content) = Region::partition_by_layers(source, cells, filter, clip)?;
    let result = match op {
        CutOp::Subtract => window.subtract(&content),
        CutOp::Intersect => window.intersect(&content),
    };
    debug!(
        ?op,
        content_loops = content.outer_count(),
        result_loops = result.outer_count(),
        "cut window against cell content"
    );
    Ok(result)
}

/// Merges the selected layer content of `cells` and labels each resulting
/// loop as `M1`, `M2`, ... in storage order.
///
/// Markers sit at the minimum corner of each loop's bounding box. Unlike
/// [`cut`], scanning runs unclipped: every shape on the selected layers
/// contributes.
pub fn scan_markers<S: LayoutSource>(
    source: &S,
    cells: &[CellId],
    filter: &LayerFilter,
) -> RegionResult<Vec<BoxMarker>> {
    let merged = Region::from_layers(source, cells, filter)?;
    let markers = merged
        .polygons()
        .iter()
        .enumerate()
        .map(|(i, polygon)| BoxMarker {
            name: format!("M{}", i + 1),
            position: polygon.bounding_box().min_corner(),
        })
        .collect::<Vec<_>>();
    debug!(count = markers.len(), "scanned layer content into markers");
    Ok(markers)
}
