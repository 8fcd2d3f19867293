//! Oriented connection anchors and the registry routes start and end on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waveroute_core::angle::normalize;
use waveroute_core::Point;

/// An oriented connection point on the mask.
///
/// `direction` faces outward: it is the heading a route travels when leaving
/// the anchor. A route arriving at an anchor therefore travels along
/// `direction + 180`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub position: Point,
    /// Outward heading in degrees, normalized to `(-180, 180]`.
    pub direction: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64, direction: f64) -> Self {
        Self {
            position: Point::new(x, y),
            direction: normalize(direction),
        }
    }

    /// The same anchor facing the opposite way.
    pub fn reversed(&self) -> Anchor {
        Anchor {
            position: self.position,
            direction: normalize(self.direction + 180.0),
        }
    }
}

/// Registry handle for an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(Uuid);

impl AnchorId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Owned, append-only collection of the anchors known to a routing session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnchorRegistry {
    anchors: Vec<(AnchorId, Anchor)>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor and return its handle. Anchors are never removed.
    pub fn register(&mut self, anchor: Anchor) -> AnchorId {
        let id = AnchorId::new();
        self.anchors.push((id, anchor));
        id
    }

    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors
            .iter()
            .find(|(aid, _)| *aid == id)
            .map(|(_, a)| a)
    }

    /// Nearest anchor to `point`, bounded by `search_radius`.
    ///
    /// Linear scan with a strict bound: an anchor at exactly the search
    /// radius is not found.
    pub fn nearest(&self, point: &Point, search_radius: f64) -> Option<(AnchorId, &Anchor)> {
        let mut best = search_radius;
        let mut found = None;
        for (id, anchor) in &self.anchors {
            let d = anchor.position.distance_to(point);
            if d < best {
                best = d;
                found = Some((*id, anchor));
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> {
        self.anchors.iter().map(|(id, a)| (*id, a))
    }
}
