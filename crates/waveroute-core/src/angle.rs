//! Angle arithmetic on the routing grid.
//!
//! All angles are `f64` degrees. Every public operation returns values in the
//! normalized interval `(-180, 180]`, which keeps turn deltas directly
//! comparable: `0` means straight ahead, `180` means a reversal.

/// Normalize an angle into `(-180, 180]`.
///
/// Uses modular reduction, so it terminates for every finite input no matter
/// how large. `-180` maps to `180` (the interval is open at the bottom).
pub fn normalize(angle: f64) -> f64 {
    debug_assert!(angle.is_finite(), "angle must be finite");
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Snap an angle to the nearest multiple of `step`, normalized.
///
/// `step` must evenly divide 180 (45 is the routing default); otherwise the
/// snapped grid cannot represent a straight-through heading and the fold
/// invariants do not hold. Ties round away from zero, so 22.5 snaps to 45.
/// Idempotent: snapping a snapped angle returns it unchanged.
pub fn snap_to_grid(angle: f64, step: f64) -> f64 {
    debug_assert!(step > 0.0, "grid step must be positive");
    debug_assert!(
        (180.0 / step).fract() == 0.0,
        "grid step must evenly divide 180"
    );
    normalize((angle / step).round() * step)
}

/// Signed turn from one heading to another, normalized.
///
/// Defined as `normalize(from - to)`: positive is a clockwise (right) turn,
/// negative a counterclockwise (left) turn. Exactly `180` is a reversal and
/// is rejected by the route synthesizer.
pub fn turn_delta(from: f64, to: f64) -> f64 {
    normalize(from - to)
}

/// Direction cosines for a heading in degrees.
pub fn unit_vector(angle: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    (rad.cos(), rad.sin())
}
