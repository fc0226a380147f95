use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vorosweep::{BoundingBox, Point, SweepEngine, Voronoi};

const SIZES: [usize; 4] = [100, 1000, 10_000, 100_000];

fn benchmark_sweep_scaling(c: &mut Criterion) {
    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);

    let mut group = c.benchmark_group("sweep");
    group.sample_size(10);

    for &size in &SIZES {
        let mut voronoi = Voronoi::new(bounds);
        voronoi.random_sites(size, 123456789);
        let sites = voronoi.sites().to_vec();

        group.bench_with_input(BenchmarkId::new("random", size), &sites, |b, sites| {
            b.iter(|| SweepEngine::new().compute(black_box(sites), bounds))
        });
    }
    group.finish();
}

fn benchmark_sweep_grid(c: &mut Criterion) {
    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);

    // Regular grid: many co-circular sites
    let n = 100;
    let step = 100.0 / n as f64;
    let mut sites = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            sites.push(Point::new((i as f64 + 0.5) * step, (j as f64 + 0.5) * step));
        }
    }

    c.bench_function(&format!("grid_{}_points", sites.len()), |b| {
        b.iter(|| SweepEngine::new().compute(black_box(&sites), bounds))
    });
}

criterion_group!(benches, benchmark_sweep_scaling, benchmark_sweep_grid);
criterion_main!(benches);
