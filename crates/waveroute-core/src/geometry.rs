//! Planar geometry primitives for mask-layout routing.
//!
//! Coordinates are `f64` database units. The types here are deliberately
//! small: routing needs points, axis-aligned boxes, simple polygons and the
//! long construction segments (`ProbeLine`) that grid headings are traced
//! along when route vertices are reconstructed by intersection.

use serde::{Deserialize, Serialize};

use crate::angle::unit_vector;
use crate::error::{GeometryError, GeometryResult};

/// Relative tolerance for the parallel test in segment intersection.
///
/// Probe segments are on the order of 2^30 units long, so the cross product
/// has to be compared against a threshold scaled by both segment lengths; an
/// absolute epsilon is meaningless at that magnitude.
const PARALLEL_EPSILON: f64 = 1.0e-9;

/// A point in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point reached by travelling `distance` along `angle` degrees.
    pub fn offset_along(&self, angle: f64, distance: f64) -> Point {
        let (dx, dy) = unit_vector(angle);
        Point::new(self.x + distance * dx, self.y + distance * dy)
    }
}

/// An axis-aligned box, used for clip windows and bounding boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "rect extents must be >= 0");
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Lower-left corner.
    pub fn min_corner(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// The box as a counterclockwise polygon.
    pub fn to_polygon(&self) -> Polygon {
        Polygon {
            points: vec![
                Point::new(self.min_x(), self.min_y()),
                Point::new(self.max_x(), self.min_y()),
                Point::new(self.max_x(), self.max_y()),
                Point::new(self.min_x(), self.max_y()),
            ],
        }
    }
}

/// A simple closed polygon (implicitly closed, no repeated end vertex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Build a polygon, rejecting anything that cannot enclose area.
    pub fn new(points: Vec<Point>) -> GeometryResult<Self> {
        if points.len() < 3 {
            return Err(GeometryError::DegeneratePolygon {
                vertex_count: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Regular n-gon approximation of a disk, counterclockwise.
    ///
    /// Eight segments is the collision-test default; the stand-in only has to
    /// be convex and contain the disk's interaction envelope approximately.
    pub fn disk(center: Point, radius: f64, segments: usize) -> Self {
        debug_assert!(segments >= 3, "a disk needs at least 3 segments");
        debug_assert!(radius > 0.0, "disk radius must be positive");
        let step = 360.0 / segments as f64;
        let points = (0..segments)
            .map(|i| center.offset_along(step * i as f64, radius))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Shoelace area: positive for counterclockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    pub fn bounding_box(&self) -> Rect {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Polygon {
        Polygon {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect(),
        }
    }
}

/// A long finite construction segment through a point at a fixed heading.
///
/// Route vertices are reconstructed by intersecting consecutive probes. The
/// constructors encode which side of the origin a crossing may fall on:
///
/// * [`ProbeLine::forward`]: the first probe of a route; a route cannot
///   begin behind its start anchor.
/// * [`ProbeLine::spanning`]: interior probes; the crossing may fall on
///   either side of the raw waypoint.
/// * [`ProbeLine::backward`]: the end-anchor probe; the route closes onto
///   the anchor from upstream of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeLine {
    pub p1: Point,
    pub p2: Point,
}

impl ProbeLine {
    /// Segment from `origin` out to `origin + reach` along `angle`.
    pub fn forward(origin: Point, angle: f64, reach: f64) -> Self {
        Self {
            p1: origin,
            p2: origin.offset_along(angle, reach),
        }
    }

    /// Segment from `origin` back to `origin - reach` along `angle`.
    pub fn backward(origin: Point, angle: f64, reach: f64) -> Self {
        Self {
            p1: origin,
            p2: origin.offset_along(angle, -reach),
        }
    }

    /// Segment straddling `origin` by `reach` on both sides.
    pub fn spanning(origin: Point, angle: f64, reach: f64) -> Self {
        Self {
            p1: origin.offset_along(angle, reach),
            p2: origin.offset_along(angle, -reach),
        }
    }

    /// Carrier direction in degrees.
    pub fn angle_degrees(&self) -> f64 {
        (self.p2.y - self.p1.y).atan2(self.p2.x - self.p1.x).to_degrees()
    }

    pub fn length(&self) -> f64 {
        self.p1.distance_to(&self.p2)
    }

    /// Segment-segment intersection point, if the two probes cross.
    ///
    /// Parametric cross-product solve; both parameters must land in `[0, 1]`
    /// (endpoint touching counts as a crossing). Parallel probes never cross.
    pub fn crossing(&self, other: &ProbeLine) -> Option<Point> {
        let d1x = self.p2.x - self.p1.x;
        let d1y = self.p2.y - self.p1.y;
        let d2x = other.p2.x - other.p1.x;
        let d2y = other.p2.y - other.p1.y;

        let denom = d1x * d2y - d1y * d2x;
        let scale = (d1x * d1x + d1y * d1y).sqrt() * (d2x * d2x + d2y * d2y).sqrt();
        if denom.abs() <= PARALLEL_EPSILON * scale {
            return None;
        }

        let ox = other.p1.x - self.p1.x;
        let oy = other.p1.y - self.p1.y;
        let t = (ox * d2y - oy * d2x) / denom;
        let u = (ox * d1y - oy * d1x) / denom;
        if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
            return None;
        }

        Some(Point::new(self.p1.x + t * d1x, self.p1.y + t * d1y))
    }

    /// Perpendicular offset of a point from the probe's carrier line.
    ///
    /// Positive when the point lies to the left of the p1 -> p2 direction.
    pub fn signed_distance_to(&self, point: &Point) -> f64 {
        let dx = self.p2.x - self.p1.x;
        let dy = self.p2.y - self.p1.y;
        let len = (dx * dx + dy * dy).sqrt();
        debug_assert!(len > 0.0, "probe has zero length");
        (dx * (point.y - self.p1.y) - dy * (point.x - self.p1.x)) / len
    }
}
