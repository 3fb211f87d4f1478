// Benchmark suite for ring clipping

use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tileclip_core::{clip_ring, Point, WindingOrder};

/// A counter-clockwise star with `tips` points around (5, 5).
fn star(tips: usize, outer: f64, inner: f64) -> Vec<f64> {
    (0..tips * 2)
        .flat_map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = 0.13 + i as f64 * PI / tips as f64;
            [5.0 + radius * angle.cos(), 5.0 + radius * angle.sin()]
        })
        .collect()
}

fn bench_clip_ring(c: &mut Criterion) {
    let min = Point { x: 0.0, y: 0.0 };
    let max = Point { x: 10.0, y: 10.0 };
    let mut group = c.benchmark_group("clip_ring");

    for tips in [8, 64, 512] {
        // Every spike crosses the boundary twice.
        let crossing = star(tips, 8.0, 3.0);
        group.bench_with_input(BenchmarkId::new("crossing", tips), &crossing, |b, s| {
            b.iter(|| clip_ring(WindingOrder::CounterClockwise, black_box(s), min, max))
        });

        let inside = star(tips, 4.0, 2.0);
        group.bench_with_input(BenchmarkId::new("inside", tips), &inside, |b, s| {
            b.iter(|| clip_ring(WindingOrder::CounterClockwise, black_box(s), min, max))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_clip_ring);
criterion_main!(benches);
