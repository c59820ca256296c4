//! Benchmarks for breakpoint resolution and transition dispatch.
//!
//! Run with: `cargo bench --package breakzone --bench resolve_bench`
//!
//! Resolution is a linear scan over the registered thresholds, so the
//! interesting axis is the number of breakpoints. Dispatch cost is dominated
//! by the listener snapshot.

use std::hint::black_box;

use breakzone::{BreakpointMap, BreakpointRegistry, BreakpointSet};
use breakzone_core::SimulatedSurface;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn set_with(n: usize) -> BreakpointSet {
    let mut set = BreakpointSet::new();
    set.insert_all((0..n).map(|i| (format!("bp{i:03}"), (i as f64 + 1.0) * 100.0)))
        .unwrap();
    set
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for n in [4usize, 16, 64, 256] {
        let set = set_with(n);
        let top = n as f64 * 100.0;
        group.bench_with_input(BenchmarkId::new("breakpoints", n), &set, |b, set| {
            let mut w = 0.0;
            b.iter(|| {
                w = (w + 37.0) % (top + 500.0);
                black_box(set.resolve(black_box(w)));
            });
        });
    }
    group.finish();
}

fn bench_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition");
    for listeners in [0usize, 1, 8, 32] {
        let surface = SimulatedSurface::new(100.0, 600.0);
        let registry = BreakpointRegistry::builder()
            .defaults(BreakpointMap::new())
            .breakpoints(BreakpointMap::from([("small", 300.0), ("med", 600.0)]))
            .surface(surface.clone())
            .build()
            .unwrap();
        for _ in 0..listeners {
            registry.add_change_listener(|ev| {
                black_box(ev.width);
            });
        }
        group.bench_with_input(
            BenchmarkId::new("listeners", listeners),
            &listeners,
            |b, _| {
                let mut wide = false;
                b.iter(|| {
                    wide = !wide;
                    surface.resize_to(if wide { 500.0 } else { 100.0 }, 600.0);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_transition);
criterion_main!(benches);
