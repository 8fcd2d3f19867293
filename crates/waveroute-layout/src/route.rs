//! The operation list a synthesized route hands to the path executor.

use serde::{Deserialize, Serialize};

use waveroute_core::Point;

/// One drawing operation of a synthesized route.
///
/// The executor consumes these in order. Arc lengths are its business: a
/// turn carries the signed radius and the turn magnitude, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RouteOp {
    /// Advance along the current heading. Lengths are always `>= 0`.
    Straight { length: f64 },
    /// Turn in place on an arc. `radius` is signed (negative turns left,
    /// counterclockwise); `angle` is the positive magnitude in degrees.
    Turn { radius: f64, angle: f64 },
}

/// A fully synthesized route between two anchors.
///
/// Invariants, checked at construction:
/// * `vertices.len() == turn_angles.len() + 2` (start, one vertex per turn,
///   terminal),
/// * `ops` alternates Straight/Turn and both ends are a Straight, so it has
///   `2 * turn_angles.len() + 1` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Start point, one reconstructed vertex per turn, terminal point.
    pub vertices: Vec<Point>,
    /// Signed grid turn deltas, one per interior vertex.
    pub turn_angles: Vec<f64>,
    /// Executor operations.
    pub ops: Vec<RouteOp>,
}

impl Route {
    pub fn new(vertices: Vec<Point>, turn_angles: Vec<f64>, ops: Vec<RouteOp>) -> Self {
        debug_assert_eq!(
            vertices.len(),
            turn_angles.len() + 2,
            "a route has one vertex per turn plus both endpoints"
        );
        debug_assert_eq!(
            ops.len(),
            2 * turn_angles.len() + 1,
            "ops alternate straight/turn and start and end straight"
        );
        Self {
            vertices,
            turn_angles,
            ops,
        }
    }

    pub fn start(&self) -> &Point {
        &self.vertices[0]
    }

    pub fn end(&self) -> &Point {
        &self.vertices[self.vertices.len() - 1]
    }

    pub fn turn_count(&self) -> usize {
        self.turn_angles.len()
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Sum of all straight runs. Arc lengths at turns are the executor's
    /// responsibility and are not included.
    pub fn straight_length(&self) -> f64 {
        self.ops
            .iter()
            .map(|op| match op {
                RouteOp::Straight { length } => *length,
                RouteOp::Turn { .. } => 0.0,
            })
            .sum()
    }
}
