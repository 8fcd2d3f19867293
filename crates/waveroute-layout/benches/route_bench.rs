use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use waveroute_core::{Point, Rect};
use waveroute_layout::{Anchor, Region, RouteSynthesizer};

/// Staircase path alternating east and north legs, one commit per corner.
fn staircase_waypoints(corners: usize) -> Vec<Point> {
    let step = 200_000.0;
    let mut waypoints = vec![Point::new(0.0, 0.0)];
    let mut x = 0.0;
    let mut y = 0.0;
    for i in 0..corners {
        if i % 2 == 0 {
            x += step;
        } else {
            y += step;
        }
        waypoints.push(Point::new(x, y));
    }
    waypoints
}

fn bench_link_staircase(c: &mut Criterion) {
    let synth = RouteSynthesizer::default();
    let start = Anchor::new(0.0, 0.0, 0.0);
    let waypoints = staircase_waypoints(20);

    c.bench_function("link_staircase_20_corners", |b| {
        b.iter(|| {
            let route = synth
                .link(black_box(&start), None, black_box(&waypoints))
                .expect("staircase synthesizes");
            black_box(route.op_count())
        })
    });
}

fn bench_region_merge(c: &mut Criterion) {
    c.bench_function("region_merge_overlapping_grid", |b| {
        b.iter(|| {
            let mut region = Region::new();
            // 10 x 10 grid at 100 pitch; side 120 overlaps the neighbors.
            for row in 0..10 {
                for col in 0..10 {
                    let rect =
                        Rect::new(col as f64 * 100.0, row as f64 * 100.0, 120.0, 120.0);
                    region
                        .insert(rect.to_polygon())
                        .expect("grid squares are valid");
                }
            }
            black_box(region.area())
        })
    });
}

criterion_group!(benches, bench_link_staircase, bench_region_merge);
criterion_main!(benches);
