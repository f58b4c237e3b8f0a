use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lineation::cluster::{Clustering, Kmeans};
use lineation::{
    contained_segments_matrix, GapLineFinder, IndexLineFinder, LineFinder, Segment, SelectorParams,
    SweepParams,
};
use rand::prelude::*;

fn page(rng: &mut StdRng, lines: usize, per_line: usize) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(lines * per_line);
    for line in 0..lines {
        for col in 0..per_line {
            let y = line as f32 * 30.0 + rng.random::<f32>() * 2.0;
            let h = 12.0 + rng.random::<f32>();
            segments.push(Segment::new(col as f32 * 14.0, y, 10.0, h));
        }
    }
    segments
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    // Generate synthetic data
    let mut rng = StdRng::seed_from_u64(42);
    let n = 1000;
    let d = 16;
    let k = 10;

    let data: Vec<Vec<f32>> = (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f32>()).collect())
        .collect();

    group.bench_function("fit_predict_n1000_d16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new(k).with_max_iter(10).with_seed(42);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

fn bench_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("lines");

    let mut rng = StdRng::seed_from_u64(7);
    let segments = page(&mut rng, 20, 40);

    let index = IndexLineFinder::new(SelectorParams {
        sweep: SweepParams::with_range(3, 30).seeded(1),
        ..SelectorParams::default()
    });
    group.bench_function("index_finder_20x40", |b| {
        b.iter(|| index.find_lines(black_box(&segments)))
    });

    let gap = GapLineFinder {
        sweep: SweepParams::with_range(2, 2).seeded(1),
        ..GapLineFinder::default()
    };
    group.bench_function("gap_finder_20x40", |b| {
        b.iter(|| gap.find_lines(black_box(&segments)))
    });

    group.bench_function("containment_800", |b| {
        b.iter(|| contained_segments_matrix(black_box(&segments)))
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_lines);
criterion_main!(benches);
