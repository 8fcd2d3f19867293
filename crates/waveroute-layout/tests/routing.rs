//! Integration tests for route synthesis

use waveroute_core::Point;
use waveroute_layout::{
    Anchor, AnchorRegistry, RouteError, RouteOp, RouteSynthesizer, RouterConfig,
};

fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1.0e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected}, got {actual}"
    );
}

fn assert_point_close(actual: &Point, expected: (f64, f64)) {
    assert_close(actual.x, expected.0);
    assert_close(actual.y, expected.1);
}

#[test]
fn test_straight_link_between_facing_anchors() {
    let mut anchors = AnchorRegistry::new();
    anchors.register(Anchor::new(0.0, 0.0, 0.0));
    anchors.register(Anchor::new(200_000.0, 0.0, 180.0));

    // Hand-drawn path wobbles but stays on the shared axis.
    let waypoints = vec![
        Point::new(500.0, 300.0),
        Point::new(80_000.0, 200.0),
        Point::new(199_800.0, -200.0),
    ];
    let route = RouteSynthesizer::default()
        .link_nearest(&anchors, &waypoints)
        .unwrap();

    assert_eq!(route.turn_count(), 0);
    assert_eq!(route.op_count(), 1);
    assert_point_close(route.end(), (200_000.0, 0.0));
    assert_close(route.straight_length(), 200_000.0);
}

#[test]
fn test_l_bend_drops_redundant_trailing_corner() {
    // The drawn path already turns onto the arrival heading, so closing onto
    // the anchor would commit a zero-angle corner; that corner is dropped and
    // the close re-runs from the previous heading.
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let end = Anchor::new(100_000.0, 100_000.0, -90.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(100_000.0, 200.0),
        Point::new(100_000.0, 100_000.0),
    ];
    let route = synth.link(&start, Some(&end), &waypoints).unwrap();

    assert_eq!(route.turn_count(), 1);
    assert_eq!(route.vertices.len(), 3);
    assert_point_close(&route.vertices[1], (100_000.0, 0.0));
    assert_point_close(route.end(), (100_000.0, 100_000.0));

    assert_eq!(route.ops.len(), 3);
    match route.ops[0] {
        RouteOp::Straight { length } => assert_close(length, 50_000.0),
        _ => panic!("expected a straight first"),
    }
    match route.ops[1] {
        RouteOp::Turn { radius, angle } => {
            // Left turn: negative radius.
            assert_close(radius, -50_000.0);
            assert_close(angle, 90.0);
        }
        _ => panic!("expected a turn second"),
    }
    match route.ops[2] {
        RouteOp::Straight { length } => assert_close(length, 50_000.0),
        _ => panic!("expected a straight last"),
    }
}

#[test]
fn test_double_forty_five_bend() {
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let end = Anchor::new(100_000.0, 100_000.0, -90.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(50_000.0, 200.0),
        Point::new(100_000.0, 50_000.0),
    ];
    let route = synth.link(&start, Some(&end), &waypoints).unwrap();

    assert_eq!(route.turn_count(), 2);
    assert_eq!(route.turn_angles, vec![-45.0, -45.0]);
    assert_point_close(&route.vertices[1], (50_000.0, 0.0));
    assert_point_close(&route.vertices[2], (100_000.0, 50_000.0));

    // r * tan(22.5 deg) of tangent length comes off each side of a turn.
    let tangent = 50_000.0 * (22.5_f64.to_radians()).tan();
    match route.ops[2] {
        RouteOp::Straight { length } => {
            assert_close(length, 50_000.0 * std::f64::consts::SQRT_2 - 2.0 * tangent)
        }
        _ => panic!("expected the diagonal straight"),
    }
}

#[test]
fn test_open_ended_route_ends_at_last_committed_waypoint() {
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(50_000.0, 100.0),
        Point::new(100_000.0, 50_000.0),
    ];
    let route = synth.link(&start, None, &waypoints).unwrap();

    assert_eq!(route.turn_count(), 1);
    assert_eq!(route.op_count(), 3);
    assert_point_close(route.end(), (100_000.0, 50_000.0));
    match route.ops[2] {
        RouteOp::Straight { length } => assert_close(length, 50_000.0),
        _ => panic!("expected a straight last"),
    }
}

#[test]
fn test_leading_noise_before_first_crossing_is_skipped() {
    // The first drawn segment heads away behind the start anchor; its probe
    // never crosses the forward-only start probe. Before any committed turn
    // that is noise, not an error.
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(-20_000.0, 30_000.0),
        Point::new(80_000.0, 30_000.0),
        Point::new(80_000.0, 100_000.0),
    ];
    let route = synth.link(&start, None, &waypoints).unwrap();

    assert_eq!(route.turn_count(), 1);
    assert_point_close(&route.vertices[1], (80_000.0, 0.0));
    assert_point_close(route.end(), (80_000.0, 100_000.0));
}

#[test]
fn test_empty_route_without_turns_or_anchor() {
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(50_000.0, 0.0),
        Point::new(120_000.0, 0.0),
    ];
    let err = synth.link(&start, None, &waypoints).unwrap_err();
    assert!(matches!(err, RouteError::EmptyRoute));
}

#[test]
fn test_s_bend_resolves_lateral_offset() {
    // Start and end run parallel but 40k apart; the close synthesizes a pair
    // of opposite 45s through the midpoint diagonal.
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let end = Anchor::new(160_000.0, 40_000.0, 180.0);
    let waypoints = vec![Point::new(0.0, 0.0), Point::new(80_000.0, 0.0)];
    let route = synth.link(&start, Some(&end), &waypoints).unwrap();

    assert_eq!(route.turn_angles, vec![-45.0, 45.0]);
    assert_point_close(&route.vertices[1], (60_000.0, 0.0));
    assert_point_close(&route.vertices[2], (100_000.0, 40_000.0));
    assert_point_close(route.end(), (160_000.0, 40_000.0));
}

#[test]
fn test_s_bend_mirrors_below_the_heading() {
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let end = Anchor::new(160_000.0, -40_000.0, 180.0);
    let waypoints = vec![Point::new(0.0, 0.0), Point::new(80_000.0, 0.0)];
    let route = synth.link(&start, Some(&end), &waypoints).unwrap();

    assert_eq!(route.turn_angles, vec![45.0, -45.0]);
    assert_point_close(&route.vertices[1], (60_000.0, 0.0));
    assert_point_close(&route.vertices[2], (100_000.0, -40_000.0));
}

#[test]
fn test_lateral_offset_within_tolerance_closes_straight() {
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let end = Anchor::new(150_000.0, 5.0, 180.0);
    let waypoints = vec![Point::new(0.0, 0.0), Point::new(150_000.0, 5.0)];
    let route = synth.link(&start, Some(&end), &waypoints).unwrap();

    assert_eq!(route.turn_count(), 0);
    assert_eq!(route.op_count(), 1);
    assert_point_close(route.end(), (150_000.0, 5.0));
}

#[test]
fn test_no_crossing_after_committed_turns() {
    // Once a corner is committed, a probe that never crosses the running
    // route is a hard failure carrying the waypoint index.
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(100_000.0, 100.0),
        Point::new(100_000.0, 100_000.0),
        Point::new(2_000_000_000.0, 2_000_000_000.0),
    ];
    let err = synth.link(&start, None, &waypoints).unwrap_err();
    match err {
        RouteError::NoCrossing { index, .. } => assert_eq!(index, 3),
        other => panic!("expected NoCrossing, got {other:?}"),
    }
}

#[test]
fn test_end_anchor_probe_miss() {
    // The route runs north at x = 100k while the end anchor faces east, so
    // its backward probe extends further east and never meets the route.
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let end = Anchor::new(200_000.0, 50_000.0, 0.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(100_000.0, 100.0),
        Point::new(100_000.0, 80_000.0),
    ];
    let err = synth.link(&start, Some(&end), &waypoints).unwrap_err();
    assert!(matches!(err, RouteError::AnchorNoCrossing { .. }));
}

#[test]
fn test_straight_shorter_than_turn_tangent_is_rejected() {
    // The first leg is 30k but a 90-degree turn at r = 50k consumes 50k of
    // tangent length from it.
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(30_000.0, 100.0),
        Point::new(30_000.0, 100_000.0),
    ];
    let err = synth.link(&start, None, &waypoints).unwrap_err();
    match err {
        RouteError::NegativeLength { index, length, .. } => {
            assert_eq!(index, 0);
            assert!(length < 0.0);
        }
        other => panic!("expected NegativeLength, got {other:?}"),
    }
}

#[test]
fn test_custom_turning_radius() {
    let synth = RouteSynthesizer::new(RouterConfig {
        turning_radius: 10_000.0,
        ..RouterConfig::default()
    });
    let start = Anchor::new(0.0, 0.0, 0.0);
    let end = Anchor::new(100_000.0, 100_000.0, -90.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(100_000.0, 200.0),
        Point::new(100_000.0, 100_000.0),
    ];
    let route = synth.link(&start, Some(&end), &waypoints).unwrap();

    match route.ops[0] {
        RouteOp::Straight { length } => assert_close(length, 90_000.0),
        _ => panic!("expected a straight first"),
    }
    match route.ops[1] {
        RouteOp::Turn { radius, angle } => {
            assert_close(radius, -10_000.0);
            assert_close(angle, 90.0);
        }
        _ => panic!("expected a turn second"),
    }
}

#[test]
fn test_ops_serialize_for_the_executor() {
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let end = Anchor::new(100_000.0, 100_000.0, -90.0);
    let waypoints = vec![
        Point::new(0.0, 0.0),
        Point::new(100_000.0, 200.0),
        Point::new(100_000.0, 100_000.0),
    ];
    let route = synth.link(&start, Some(&end), &waypoints).unwrap();

    let json = serde_json::to_value(&route.ops).unwrap();
    let straight = json[0]["Straight"]["length"].as_f64().unwrap();
    assert_close(straight, 50_000.0);
    assert_eq!(json[1]["Turn"]["radius"].as_f64().unwrap(), -50_000.0);
    assert_eq!(json[1]["Turn"]["angle"].as_f64().unwrap(), 90.0);
}

#[test]
fn test_anchor_not_found_outside_search_radius() {
    let mut anchors = AnchorRegistry::new();
    anchors.register(Anchor::new(0.0, 0.0, 0.0));
    let waypoints = vec![Point::new(900_000.0, 0.0), Point::new(1_000_000.0, 0.0)];
    let err = RouteSynthesizer::default()
        .link_nearest(&anchors, &waypoints)
        .unwrap_err();
    match err {
        RouteError::AnchorNotFound { x, search_radius, .. } => {
            assert_eq!(x, 900_000.0);
            assert_eq!(search_radius, 500_000.0);
        }
        other => panic!("expected AnchorNotFound, got {other:?}"),
    }
}

#[test]
fn test_link_nearest_leaves_route_open_when_end_misses() {
    let mut anchors = AnchorRegistry::new();
    anchors.register(Anchor::new(0.0, 0.0, 0.0));
    // The last waypoint sits well outside the search radius of any anchor.
    let waypoints = vec![
        Point::new(100.0, 0.0),
        Point::new(700_000.0, 100.0),
        Point::new(700_000.0, 600_000.0),
    ];
    let route = RouteSynthesizer::default()
        .link_nearest(&anchors, &waypoints)
        .unwrap();

    assert_eq!(route.turn_count(), 1);
    assert_point_close(route.end(), (700_000.0, 600_000.0));
}
