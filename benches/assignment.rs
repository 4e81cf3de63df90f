use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use routematch::{AssignmentConfig, QueryPoint, ReferencePoint, Resolver, RouteIndex};

/// Synthetic reference grid around Bengaluru: `routes` routes of `per_route`
/// stores each, one route per grid row.
fn reference_grid(routes: usize, per_route: usize) -> Vec<ReferencePoint> {
    let mut reference = Vec::with_capacity(routes * per_route);
    for route in 0..routes {
        let route_code = format!("KA{route:03}-R01");
        for member in 0..per_route {
            reference.push(ReferencePoint::new(
                format!("KA{route:03}-{member:02}"),
                &route_code,
                12.9 + 0.002 * route as f64,
                77.5 + 0.002 * member as f64,
                "South",
            ));
        }
    }
    reference
}

fn query_grid(count: usize) -> Vec<QueryPoint> {
    (0..count)
        .map(|i| {
            QueryPoint::new(
                format!("KA{:03}-Q{i}", i % 100),
                12.9 + 0.002 * (i % 100) as f64 + 0.0007,
                77.5 + 0.002 * (i % 25) as f64 + 0.0007,
                "south",
            )
        })
        .collect()
}

fn benchmark_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [1_000, 10_000] {
        let reference = reference_grid(size / 25, 25);
        group.bench_with_input(BenchmarkId::from_parameter(size), &reference, |b, rows| {
            b.iter(|| RouteIndex::build(black_box(rows.clone())).unwrap())
        });
    }

    group.finish();
}

fn benchmark_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    let index = RouteIndex::build(reference_grid(400, 25)).unwrap();
    let queries = query_grid(1_000);

    group.bench_function("nearest_10", |b| {
        b.iter(|| {
            index.nearest(
                black_box(12.9716),
                black_box(77.5946),
                black_box(routematch::K_FETCH),
            )
        })
    });

    group.bench_function("resolve_1k_queries", |b| {
        b.iter(|| {
            let mut resolver = Resolver::new(&index, AssignmentConfig::default());
            resolver.resolve_all(black_box(&queries))
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_index_build, benchmark_resolution);
criterion_main!(benches);
