//! Grid route synthesis between oriented anchors.
//!
//! The synthesizer folds a hand-drawn waypoint sequence into a grid-angle
//! route: raw segment headings snap to the angle grid, collinear points are
//! absorbed, and every route vertex is reconstructed as the crossing of two
//! consecutive heading probes instead of trusting the raw points. The result
//! is the [`Route`] operation list handed to the path executor.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use waveroute_core::angle::{normalize, snap_to_grid, turn_delta};
use waveroute_core::{Point, ProbeLine};

use crate::anchor::{Anchor, AnchorRegistry};
use crate::error::{RouteError, RouteResult};
use crate::route::{Route, RouteOp};

/// Tuning parameters for route synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Heading grid granularity in degrees. Must evenly divide 180.
    pub angle_step: f64,
    /// Arc radius handed to the executor at every turn.
    pub turning_radius: f64,
    /// Reach of the construction probes; anything that should cross does so
    /// well inside this bound.
    pub max_probe_length: f64,
    /// Bound for nearest-anchor lookups.
    pub search_radius: f64,
    /// Perpendicular offset below which an end anchor counts as dead ahead.
    pub straight_tolerance: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            angle_step: 45.0,
            turning_radius: 50_000.0,
            max_probe_length: 1_073_741_824.0,
            search_radius: 500_000.0,
            straight_tolerance: 10.0,
        }
    }
}

/// Synthesizes executable routes from drawn waypoint paths.
#[derive(Debug, Clone, Default)]
pub struct RouteSynthesizer {
    config: RouterConfig,
}

impl RouteSynthesizer {
    pub fn new(config: RouterConfig) -> Self {
        debug_assert!(config.angle_step > 0.0, "angle step must be positive");
        debug_assert!(
            (180.0 / config.angle_step).fract() == 0.0,
            "angle step must evenly divide 180"
        );
        debug_assert!(config.turning_radius > 0.0, "turning radius must be positive");
        debug_assert!(config.max_probe_length > 0.0, "probe reach must be positive");
        debug_assert!(
            config.straight_tolerance >= 0.0,
            "straight tolerance must be >= 0"
        );
        Self { config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Synthesize a route from `start` through `waypoints`, optionally
    /// closing onto `end`.
    ///
    /// Without an end anchor the route terminates at the last waypoint that
    /// committed a turn. All failures are terminal; no partial route is ever
    /// returned.
    pub fn link(
        &self,
        start: &Anchor,
        end: Option<&Anchor>,
        waypoints: &[Point],
    ) -> RouteResult<Route> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints {
                min: 2,
                got: waypoints.len(),
            });
        }

        let reach = self.config.max_probe_length;
        let step = self.config.angle_step;

        // Parallel stacks: one heading and probe per committed vertex. The
        // first probe only reaches forward; a route cannot begin behind its
        // start anchor.
        let start_heading = normalize(start.direction);
        let mut headings = vec![start_heading];
        let mut vertices = vec![start.position];
        let mut probes = vec![ProbeLine::forward(start.position, start_heading, reach)];
        let mut turns: Vec<f64> = Vec::new();
        let mut last_committed: Option<Point> = None;

        for index in 1..waypoints.len() {
            let prev = &waypoints[index - 1];
            let curr = &waypoints[index];
            let raw = (curr.y - prev.y).atan2(curr.x - prev.x).to_degrees();
            let snapped = snap_to_grid(raw, step);
            let current = headings[headings.len() - 1];
            let da = turn_delta(current, snapped);

            if da == 0.0 {
                // Collinear with the current heading; hand-drawn jitter is
                // absorbed here.
                continue;
            }
            if da == 180.0 {
                return Err(RouteError::Reversal {
                    from: current,
                    to: snapped,
                });
            }

            let probe = ProbeLine::spanning(*curr, snapped, reach);
            let current_probe = probes[probes.len() - 1];
            match current_probe.crossing(&probe) {
                Some(vertex) => {
                    vertices.push(vertex);
                    headings.push(snapped);
                    probes.push(probe);
                    turns.push(da);
                    last_committed = Some(*curr);
                }
                None => {
                    if turns.is_empty() {
                        // Stray points before the first committed corner are
                        // noise, not an error.
                        debug!(
                            index,
                            heading = snapped,
                            previous = current,
                            "skipping waypoint before the first crossing"
                        );
                        continue;
                    }
                    debug!(
                        index,
                        heading = snapped,
                        previous = current,
                        "probe never crosses the committed route"
                    );
                    return Err(RouteError::NoCrossing {
                        index,
                        heading: snapped,
                        previous: current,
                    });
                }
            }
        }

        let terminal = match end {
            Some(anchor) => {
                self.close_onto_anchor(
                    anchor,
                    &mut headings,
                    &mut vertices,
                    &mut probes,
                    &mut turns,
                )?;
                anchor.position
            }
            None => match last_committed {
                Some(p) => p,
                None => return Err(RouteError::EmptyRoute),
            },
        };
        vertices.push(terminal);

        self.generate_ops(vertices, turns)
    }

    /// Resolve both anchors by proximity and synthesize.
    ///
    /// The start anchor is required; a missing end anchor leaves the route
    /// open-ended, terminating at its last committed waypoint.
    pub fn link_nearest(
        &self,
        registry: &AnchorRegistry,
        waypoints: &[Point],
    ) -> RouteResult<Route> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints {
                min: 2,
                got: waypoints.len(),
            });
        }
        let first = &waypoints[0];
        let last = &waypoints[waypoints.len() - 1];
        let radius = self.config.search_radius;

        let start = registry
            .nearest(first, radius)
            .map(|(_, anchor)| anchor)
            .ok_or(RouteError::AnchorNotFound {
                x: first.x,
                y: first.y,
                search_radius: radius,
            })?;
        let end = registry.nearest(last, radius).map(|(_, anchor)| anchor);
        self.link(start, end, waypoints)
    }

    /// Close the folded route onto the end anchor.
    ///
    /// Handles the degenerate cases in order: a trailing corner parallel to
    /// the arrival heading is dropped, a grid reversal is rejected, a purely
    /// parallel approach is resolved as either a direct straight or an
    /// S-bend, and everything else closes with an ordinary final turn.
    fn close_onto_anchor(
        &self,
        anchor: &Anchor,
        headings: &mut Vec<f64>,
        vertices: &mut Vec<Point>,
        probes: &mut Vec<ProbeLine>,
        turns: &mut Vec<f64>,
    ) -> RouteResult<()> {
        let reach = self.config.max_probe_length;
        let step = self.config.angle_step;

        // Routes arrive facing into the anchor, opposite its outward side.
        let arrival = normalize(anchor.direction + 180.0);
        let grid_arrival = snap_to_grid(arrival, step);

        if grid_arrival == headings[headings.len() - 1] && !turns.is_empty() {
            // The last committed corner runs parallel to the arrival and
            // would force a zero-angle turn; drop it and close from the
            // previous heading. One pop suffices: consecutive committed
            // headings always differ.
            headings.pop();
            vertices.pop();
            probes.pop();
            turns.pop();
            debug!("dropped trailing corner parallel to the arrival heading");
        }

        let current = headings[headings.len() - 1];
        let grid_da = turn_delta(current, grid_arrival);
        if grid_da == 180.0 {
            return Err(RouteError::Reversal {
                from: current,
                to: grid_arrival,
            });
        }

        let da = turn_delta(current, arrival);
        let end_probe = ProbeLine::backward(anchor.position, arrival, reach);

        if arrival == current && turns.is_empty() {
            // Parallel approach with nothing committed yet: either the
            // anchor is dead ahead, or it needs a lateral S-bend.
            let current_probe = probes[probes.len() - 1];
            let dis = current_probe.signed_distance_to(&anchor.position);
            if dis.abs() < self.config.straight_tolerance {
                return Ok(());
            }

            let last = vertices[vertices.len() - 1];
            let dse = last.distance_to(&anchor.position);
            if dse * dse < dis * dis {
                return Err(RouteError::UnreachableAnchor {
                    lateral: dis,
                    chord: dse,
                });
            }
            let dp = (dse * dse - dis * dis).sqrt();
            let l1 = (dp - dis.abs()) / 2.0;

            // Two 45-degree turns of opposite sign, the first toward the
            // anchor's side of the heading.
            let (first, second) = if dis > 0.0 {
                (-45.0, 45.0)
            } else {
                (45.0, -45.0)
            };
            let pt1 = last.offset_along(current, l1);
            let pt2 = anchor.position.offset_along(current, -l1);
            debug!(dis, dp, l1, "closing with an S-bend");

            vertices.push(pt1);
            vertices.push(pt2);
            headings.push(normalize(current - first));
            headings.push(current);
            turns.push(first);
            turns.push(second);
            probes.push(ProbeLine { p1: pt1, p2: pt2 });
            probes.push(end_probe);
            return Ok(());
        }

        let current_probe = probes[probes.len() - 1];
        match current_probe.crossing(&end_probe) {
            Some(vertex) => {
                vertices.push(vertex);
                headings.push(arrival);
                probes.push(end_probe);
                turns.push(da);
                Ok(())
            }
            None => {
                debug!(
                    heading = arrival,
                    previous = current,
                    "end anchor probe never crosses the route"
                );
                Err(RouteError::AnchorNoCrossing {
                    heading: arrival,
                    previous: current,
                })
            }
        }
    }

    /// Turn the folded vertices and turn deltas into executor operations.
    ///
    /// Each turn consumes `r * tan(|da| / 2)` of tangent length from both
    /// adjacent straights. Every straight, the final one included, must come
    /// out non-negative or the whole route is rejected.
    fn generate_ops(&self, vertices: Vec<Point>, turns: Vec<f64>) -> RouteResult<Route> {
        let radius = self.config.turning_radius;
        let mut ops = Vec::with_capacity(2 * turns.len() + 1);
        let mut carry = 0.0;

        for (i, &da) in turns.iter().enumerate() {
            let magnitude = da.abs();
            let tangent = radius * (magnitude.to_radians() / 2.0).tan();
            let length = vertices[i].distance_to(&vertices[i + 1]) - carry - tangent;
            carry = tangent;
            if length < 0.0 {
                warn!(
                    index = i,
                    length, "straight run shorter than its turn tangents"
                );
                return Err(RouteError::NegativeLength {
                    index: i,
                    length,
                    radius,
                });
            }
            ops.push(RouteOp::Straight { length });
            ops.push(RouteOp::Turn {
                radius: da.signum() * radius,
                angle: magnitude,
            });
        }

        let n = vertices.len();
        let length = vertices[n - 2].distance_to(&vertices[n - 1]) - carry;
        if length < 0.0 {
            warn!(
                index = turns.len(),
                length, "final straight shorter than its turn tangent"
            );
            return Err(RouteError::NegativeLength {
                index: turns.len(),
                length,
                radius,
            });
        }
        ops.push(RouteOp::Straight { length });

        Ok(Route::new(vertices, turns, ops))
    }
}
