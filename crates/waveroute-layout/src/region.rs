//! Merged-region bookkeeping over polyline boolean operations.
//!
//! A [`Region`] holds a set of closed loops kept in merged form: outer loops
//! never overlap or touch each other, and cavities carved out of the solid are
//! tracked separately. All boolean heavy lifting is delegated to
//! `cavalier_contours`; this module owns the normalization and the bookkeeping
//! around it, plus the bridge from layout sources ([`LayoutSource`]) into
//! regions.

use std::fmt;

use cavalier_contours::polyline::{
    BooleanOp, FindIntersectsOptions, PlineSource, PlineSourceMut, PlineVertex, Polyline,
};
use tracing::debug;
use waveroute_core::{GeometryError, Point, Polygon, Rect};

use crate::error::{RegionError, RegionResult};

/// Positional tolerance handed to the boolean engine.
const POS_EQUAL_EPS: f64 = 1.0e-5;

/// Tolerance for collapsing consecutive duplicate vertices on input loops.
const DUPLICATE_EPS: f64 = 1.0e-6;

/// Radius of the disk used to test a bare point against a region.
pub const POINT_DISK_RADIUS: f64 = 1_000.0;

/// Segment count of the point-test disk.
pub const POINT_DISK_SEGMENTS: usize = 8;

/// Database-local layer handle resolved through a [`LayoutSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

/// Cell handle within a [`LayoutSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub u32);

/// A layer named either symbolically or by layer/datatype pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerRef {
    /// Symbolic layer name, e.g. `"metal1"`.
    Name(String),
    /// Numeric layer/datatype pair as stored in the database.
    Index { layer: u32, datatype: u32 },
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerRef::Name(name) => write!(f, "{}", name),
            LayerRef::Index { layer, datatype } => write!(f, "{}/{}", layer, datatype),
        }
    }
}

impl From<&str> for LayerRef {
    fn from(name: &str) -> Self {
        LayerRef::Name(name.to_string())
    }
}

impl From<(u32, u32)> for LayerRef {
    fn from((layer, datatype): (u32, u32)) -> Self {
        LayerRef::Index { layer, datatype }
    }
}

/// Selects which layers participate in a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerFilter {
    /// Only the listed layers.
    Within(Vec<LayerRef>),
    /// Every layer in the source except the listed ones.
    Except(Vec<LayerRef>),
}

/// Read access to the polygon content of a layout database.
///
/// The router and cut orchestration never mutate a layout; they only pull
/// polygons off layers, so the trait surface stays read-only.
pub trait LayoutSource {
    /// Resolves a layer reference to a database handle, if present.
    fn find_layer(&self, layer: &LayerRef) -> Option<LayerId>;

    /// All layer handles present in the source.
    fn layer_ids(&self) -> Vec<LayerId>;

    /// The top-level cells of the source.
    fn top_cells(&self) -> Vec<CellId>;

    /// Every polygon on `layer` under `cell`, including instantiated content.
    fn polygons_on_layer(&self, cell: CellId, layer: LayerId) -> Vec<Polygon>;

    /// Polygons on `layer` under `cell` that touch `clip`.
    fn polygons_touching(&self, cell: CellId, layer: LayerId, clip: &Rect) -> Vec<Polygon>;
}

/// Anything a region can swallow in one [`Region::insert`] call.
#[derive(Debug, Clone)]
pub enum RegionInput {
    Polygon(Polygon),
    Polygons(Vec<Polygon>),
    Region(Region),
}

impl From<Polygon> for RegionInput {
    fn from(polygon: Polygon) -> Self {
        RegionInput::Polygon(polygon)
    }
}

impl From<Vec<Polygon>> for RegionInput {
    fn from(polygons: Vec<Polygon>) -> Self {
        RegionInput::Polygons(polygons)
    }
}

impl From<Rect> for RegionInput {
    fn from(rect: Rect) -> Self {
        RegionInput::Polygon(rect.to_polygon())
    }
}

impl From<Region> for RegionInput {
    fn from(region: Region) -> Self {
        RegionInput::Region(region)
    }
}

/// A set of merged closed loops with cavity tracking.
///
/// Outer loops are stored counter-clockwise and pairwise non-interacting;
/// cavities are stored as separate counter-clockwise loops. Subtrahend
/// regions are treated as filled solids: cavities inside an argument of
/// [`Region::subtract`] or [`Region::intersect`] do not add area back.
#[derive(Debug, Clone, Default)]
pub struct Region {
    outers: Vec<Polyline<f64>>,
    holes: Vec<Polyline<f64>>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a region from a single polygon.
    pub fn from_polygon(polygon: &Polygon) -> RegionResult<Self> {
        let mut region = Region::new();
        region.insert(polygon.clone())?;
        Ok(region)
    }

    /// Builds a rectangular region, typically a clip window.
    pub fn from_rect(rect: &Rect) -> Self {
        let mut region = Region::new();
        if let Some(pline) = closed_loop(rect.to_polygon().points()) {
            region.outers.push(pline);
        }
        region
    }

    /// Inserts new content and immediately re-merges.
    ///
    /// Zero-area slivers are dropped silently; loops that collapse below
    /// three distinct vertices are rejected as degenerate.
    pub fn insert(&mut self, input: impl Into<RegionInput>) -> RegionResult<()> {
        match input.into() {
            RegionInput::Polygon(polygon) => self.insert_polygon(&polygon)?,
            RegionInput::Polygons(polygons) => {
                for polygon in &polygons {
                    self.insert_polygon(polygon)?;
                }
            }
            RegionInput::Region(other) => {
                // Cavities of the incoming region survive only where this
                // region has no solid yet.
                let incoming_holes = Region {
                    outers: other.holes.clone(),
                    holes: Vec::new(),
                };
                let surviving = incoming_holes.subtract(self);
                for outer in other.outers {
                    self.absorb_loop(outer);
                }
                self.holes.extend(surviving.outers);
            }
        }
        self.holes = merged_loops(std::mem::take(&mut self.holes));
        Ok(())
    }

    fn insert_polygon(&mut self, polygon: &Polygon) -> RegionResult<()> {
        let distinct = distinct_vertices(polygon.points());
        if distinct.len() < 3 {
            return Err(RegionError::Geometry(GeometryError::DegeneratePolygon {
                vertex_count: distinct.len(),
            }));
        }
        match closed_loop(polygon.points()) {
            Some(pline) => self.absorb_loop(pline),
            None => debug!(
                vertices = polygon.vertex_count(),
                "dropping zero-area sliver"
            ),
        }
        Ok(())
    }

    /// Merges one new loop into the solid, keeping outers non-interacting.
    fn absorb_loop(&mut self, new_loop: Polyline<f64>) {
        // The incoming solid may bite into existing cavities.
        for hole in std::mem::take(&mut self.holes) {
            if boundary_intersects(&new_loop, &hole) {
                let clipped = hole.boolean(&new_loop, BooleanOp::Not);
                for piece in clipped.pos_plines {
                    self.holes.push(ccw_loop(&piece.pline));
                }
            } else if contains_vertex(&new_loop, &hole) {
                // Cavity swallowed whole by the new solid.
            } else {
                self.holes.push(hole);
            }
        }

        let mut acc = new_loop;
        let mut keep: Vec<Polyline<f64>> = Vec::new();
        for existing in std::mem::take(&mut self.outers) {
            if boundary_intersects(&acc, &existing) {
                let merged = acc.boolean(&existing, BooleanOp::Or);
                for cavity in merged.neg_plines {
                    self.holes.push(ccw_loop(&cavity.pline));
                }
                let mut outer: Option<Polyline<f64>> = None;
                for piece in merged.pos_plines {
                    let piece = ccw_loop(&piece.pline);
                    match &outer {
                        Some(current) if piece.area() <= current.area() => keep.push(piece),
                        _ => {
                            if let Some(previous) = outer.take() {
                                keep.push(previous);
                            }
                            outer = Some(piece);
                        }
                    }
                }
                match outer {
                    Some(merged_outer) => acc = merged_outer,
                    None => keep.push(existing),
                }
            } else if contains_vertex(&acc, &existing) {
                if self.hole_covers(&existing) {
                    // Sits inside a cavity of the merged solid; still separate.
                    keep.push(existing);
                }
                // Otherwise fully covered by the accumulated solid.
            } else if contains_vertex(&existing, &acc) {
                if self.hole_covers(&acc) {
                    keep.push(existing);
                } else {
                    acc = existing;
                }
            } else {
                keep.push(existing);
            }
        }
        keep.push(acc);
        self.outers = keep;
    }

    fn hole_covers(&self, pline: &Polyline<f64>) -> bool {
        self.holes
            .iter()
            .any(|hole| !boundary_intersects(pline, hole) && contains_vertex(hole, pline))
    }

    /// Union of two regions.
    pub fn union(&self, other: &Region) -> Region {
        let mut result = self.clone();
        // Insert of a region clone cannot fail; loops are already normalized.
        let _ = result.insert(other.clone());
        result
    }

    /// This region minus the solid of `other`.
    pub fn subtract(&self, other: &Region) -> Region {
        let mut result = Region::new();
        let subtrahends: Vec<&Polyline<f64>> =
            other.outers.iter().chain(self.holes.iter()).collect();
        for outer in &self.outers {
            let mut pieces = vec![outer.clone()];
            for sub in &subtrahends {
                let mut next = Vec::new();
                for piece in pieces {
                    if boundary_intersects(&piece, sub) {
                        let carved = piece.boolean(*sub, BooleanOp::Not);
                        for kept in carved.pos_plines {
                            next.push(ccw_loop(&kept.pline));
                        }
                        for cavity in carved.neg_plines {
                            result.holes.push(ccw_loop(&cavity.pline));
                        }
                    } else if contains_vertex(sub, &piece) {
                        // Piece erased entirely.
                    } else if contains_vertex(&piece, sub) {
                        result.holes.push(ccw_loop(sub));
                        next.push(piece);
                    } else {
                        next.push(piece);
                    }
                }
                pieces = next;
            }
            result.outers.extend(pieces);
        }
        result.holes = merged_loops(std::mem::take(&mut result.holes));
        result
    }

    /// The overlap of two regions.
    pub fn intersect(&self, other: &Region) -> Region {
        let mut result = Region::new();
        for a in &self.outers {
            for b in &other.outers {
                if boundary_intersects(a, b) {
                    let clipped = a.boolean(b, BooleanOp::And);
                    for piece in clipped.pos_plines {
                        result.outers.push(ccw_loop(&piece.pline));
                    }
                    for cavity in clipped.neg_plines {
                        result.holes.push(ccw_loop(&cavity.pline));
                    }
                } else if contains_vertex(a, b) {
                    result.outers.push(b.clone());
                } else if contains_vertex(b, a) {
                    result.outers.push(a.clone());
                }
            }
        }
        let cavities = merged_loops(
            self.holes
                .iter()
                .chain(other.holes.iter())
                .cloned()
                .collect(),
        );
        if cavities.is_empty() {
            result
        } else {
            result.subtract(&Region {
                outers: cavities,
                holes: Vec::new(),
            })
        }
    }

    /// True when the solids of the two regions overlap or touch.
    pub fn conflicts(&self, other: &Region) -> bool {
        for a in &self.outers {
            for b in &other.outers {
                if boundary_intersects(a, b) {
                    return true;
                }
                if contains_vertex(a, b) && !self.hole_covers(b) {
                    return true;
                }
                if contains_vertex(b, a) && !other.hole_covers(a) {
                    return true;
                }
            }
        }
        false
    }

    /// Tests a bare point by inflating it to a small disk first.
    ///
    /// Probing with a disk rather than the point itself makes near-touch
    /// situations behave the same way as polygon-to-polygon checks.
    pub fn conflicts_point(&self, point: &Point) -> bool {
        let disk = Polygon::disk(*point, POINT_DISK_RADIUS, POINT_DISK_SEGMENTS);
        let mut probe = Region::new();
        if let Some(pline) = closed_loop(disk.points()) {
            probe.outers.push(pline);
        }
        self.conflicts(&probe)
    }

    /// Total solid area.
    pub fn area(&self) -> f64 {
        let outer: f64 = self.outers.iter().map(|p| p.area()).sum();
        let cavity: f64 = self.holes.iter().map(|p| p.area()).sum();
        outer - cavity
    }

    /// Axis-aligned bounds of the solid, or `None` when empty.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.outers
            .iter()
            .map(loop_bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// The merged outer loops as polygons, in storage order.
    pub fn polygons(&self) -> Vec<Polygon> {
        self.outers
            .iter()
            .filter_map(|pline| Polygon::new(loop_points(pline)).ok())
            .collect()
    }

    pub fn outer_count(&self) -> usize {
        self.outers.len()
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outers.is_empty()
    }

    /// Collects every polygon on one layer across the top cells of `source`.
    pub fn from_layer<S: LayoutSource>(source: &S, layer: &LayerRef) -> RegionResult<Region> {
        let id = source
            .find_layer(layer)
            .ok_or_else(|| RegionError::UnknownLayer {
                layer: layer.clone(),
            })?;
        let mut region = Region::new();
        for cell in source.top_cells() {
            region.insert(source.polygons_on_layer(cell, id))?;
        }
        debug!(layer = %layer, outers = region.outer_count(), "collected layer region");
        Ok(region)
    }

    /// Merges every polygon on the selected layers under `cells`, unclipped.
    pub fn from_layers<S: LayoutSource>(
        source: &S,
        cells: &[CellId],
        filter: &LayerFilter,
    ) -> RegionResult<Region> {
        let selected = resolve_filter(source, filter)?;
        let mut region = Region::new();
        for cell in cells {
            for layer in &selected {
                region.insert(source.polygons_on_layer(*cell, *layer))?;
            }
        }
        Ok(region)
    }

    /// Splits a clip window into the window itself and the content under it.
    ///
    /// Returns `(window, content)`: a rectangular region for `clip` and the
    /// merged region of every polygon on the selected layers that touches it.
    pub fn partition_by_layers<S: LayoutSource>(
        source: &S,
        cells: &[CellId],
        filter: &LayerFilter,
        clip: Option<&Rect>,
    ) -> RegionResult<(Region, Region)> {
        let clip = clip.ok_or(RegionError::NoClipBox)?;
        let selected = resolve_filter(source, filter)?;
        let window = Region::from_rect(clip);
        let mut content = Region::new();
        for cell in cells {
            for layer in &selected {
                content.insert(source.polygons_touching(*cell, *layer, clip))?;
            }
        }
        Ok((window, content))
    }
}

fn resolve_filter<S: LayoutSource>(
    source: &S,
    filter: &LayerFilter,
) -> RegionResult<Vec<LayerId>> {
    let resolve = |refs: &[LayerRef]| -> RegionResult<Vec<LayerId>> {
        refs.iter()
            .map(|r| {
                source
                    .find_layer(r)
                    .ok_or_else(|| RegionError::UnknownLayer { layer: r.clone() })
            })
            .collect()
    };
    match filter {
        LayerFilter::Within(refs) => resolve(refs),
        LayerFilter::Except(refs) => {
            let excluded = resolve(refs)?;
            Ok(source
                .layer_ids()
                .into_iter()
                .filter(|id| !excluded.contains(id))
                .collect())
        }
    }
}

/// Unions a bag of loose loops into pairwise non-interacting loops.
fn merged_loops(loops: Vec<Polyline<f64>>) -> Vec<Polyline<f64>> {
    let mut scratch = Region::new();
    for l in loops {
        scratch.absorb_loop(l);
    }
    scratch.outers
}

/// Collapses consecutive duplicates, including a duplicated closing vertex.
fn distinct_vertices(points: &[Point]) -> Vec<Point> {
    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if let Some(last) = distinct.last() {
            if last.distance_to(p) <= DUPLICATE_EPS {
                continue;
            }
        }
        distinct.push(*p);
    }
    if distinct.len() > 1 {
        let first = distinct[0];
        if distinct[distinct.len() - 1].distance_to(&first) <= DUPLICATE_EPS {
            distinct.pop();
        }
    }
    distinct
}

/// Builds a closed counter-clockwise loop, or `None` for zero-area input.
fn closed_loop(points: &[Point]) -> Option<Polyline<f64>> {
    let mut vertices = distinct_vertices(points);
    if vertices.len() < 3 {
        return None;
    }
    let mut signed_area = 0.0;
    for i in 0..vertices.len() {
        let p1 = vertices[i];
        let p2 = vertices[(i + 1) % vertices.len()];
        signed_area += p1.x * p2.y - p2.x * p1.y;
    }
    if signed_area == 0.0 {
        return None;
    }
    if signed_area < 0.0 {
        vertices.reverse();
    }
    let mut pline = Polyline::new();
    for p in vertices {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    pline.set_is_closed(true);
    Some(pline)
}

fn loop_points(pline: &Polyline<f64>) -> Vec<Point> {
    (0..pline.vertex_count())
        .map(|i| {
            let v = pline.at(i);
            Point::new(v.x, v.y)
        })
        .collect()
}

/// Re-normalizes an engine result loop to counter-clockwise orientation.
fn ccw_loop(pline: &Polyline<f64>) -> Polyline<f64> {
    if pline.area() >= 0.0 {
        return pline.clone();
    }
    let mut points = loop_points(pline);
    points.reverse();
    let mut reversed = Polyline::new();
    for p in points {
        reversed.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    reversed.set_is_closed(true);
    reversed
}

/// Axis-aligned bounds of one loop. Loops always carry at least three
/// vertices, so the fold has a seed.
fn loop_bounds(pline: &Polyline<f64>) -> Rect {
    let first = pline.at(0);
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for i in 1..pline.vertex_count() {
        let v = pline.at(i);
        min_x = min_x.min(v.x);
        min_y = min_y.min(v.y);
        max_x = max_x.max(v.x);
        max_y = max_y.max(v.y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

fn boundary_intersects(a: &Polyline<f64>, b: &Polyline<f64>) -> bool {
    let opts = FindIntersectsOptions {
        pline1_aabb_index: None,
        pos_equal_eps: POS_EQUAL_EPS,
    };
    let found = a.find_intersects_opt(b, &opts);
    !found.basic_intersects.is_empty() || !found.overlapping_intersects.is_empty()
}

/// Even-odd containment test for one vertex of `inner` against `outer`.
///
/// Only meaningful once `boundary_intersects` has ruled out boundary
/// contact, which keeps the ray cast away from edge-grazing cases.
fn contains_vertex(outer: &Polyline<f64>, inner: &Polyline<f64>) -> bool {
    let probe = inner.at(0);
    point_in_loop(outer, probe.x, probe.y)
}

fn point_in_loop(pline: &Polyline<f64>, x: f64, y: f64) -> bool {
    let n = pline.vertex_count();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = pline.at(i);
        let vj = pline.at(j);
        if (vi.y > y) != (vj.y > y) {
            let crossing_x = vi.x + (y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x);
            if x < crossing_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
