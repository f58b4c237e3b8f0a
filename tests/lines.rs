//! End-to-end line inference on synthetic pages.

use lineation::cluster::{column, ClusteringResult, SweepParams};
use lineation::{
    CompositeSelector, Error, GapLineFinder, IndexLineFinder, IndexWeights, LineFinder,
    LineOrderer, RowBucketOrderer, Segment, SegmentLayout, SegmentOrderer, SelectorParams,
};
use rand::prelude::*;

const CENTERS: [f32; 5] = [10.0, 40.0, 70.0, 100.0, 130.0];

fn gaussian(rng: &mut StdRng, sigma: f32) -> f32 {
    // Box-Muller.
    let u1 = rng.random::<f32>().max(1e-7);
    let u2 = rng.random::<f32>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos() * sigma
}

/// Five lines of twelve glyphs each, noisy tops, glyph height ~12.
fn synthetic_page(seed: u64) -> Vec<Segment> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut segments = Vec::new();
    for &center in &CENTERS {
        for col in 0..12 {
            let y = center + gaussian(&mut rng, 1.0);
            let h = 12.0 + gaussian(&mut rng, 0.5);
            segments.push(Segment::new(col as f32 * 15.0 + 3.0, y, 10.0, h));
        }
    }
    segments.shuffle(&mut rng);
    segments
}

fn page_selector(seed: u64) -> SelectorParams {
    SelectorParams {
        sweep: SweepParams::with_range(3, 10).seeded(seed),
        ..SelectorParams::default()
    }
}

#[test]
fn selector_recovers_five_lines() {
    let mut rng = StdRng::seed_from_u64(2024);
    let ys: Vec<f32> = CENTERS
        .iter()
        .flat_map(|&c| (0..15).map(move |_| c))
        .map(|c| c + gaussian(&mut rng, 1.0))
        .collect();

    let selection = CompositeSelector::new(page_selector(17)).select(&column(&ys)).unwrap();
    assert_eq!(selection.k, 5);
    assert_eq!(selection.ks, (3..=10).collect::<Vec<_>>());

    let tops = selection.scalar_centroids().unwrap();
    for (found, expected) in tops.iter().zip(CENTERS.iter()) {
        assert!((found - expected).abs() <= 2.0, "{found} vs {expected}");
    }
}

#[test]
fn three_index_selector_recovers_five_lines() {
    let mut rng = StdRng::seed_from_u64(99);
    let ys: Vec<f32> = CENTERS
        .iter()
        .flat_map(|&c| (0..15).map(move |_| c))
        .map(|c| c + gaussian(&mut rng, 1.0))
        .collect();

    let params = SelectorParams {
        weights: IndexWeights::three_index(),
        ..page_selector(5)
    };
    let selection = CompositeSelector::new(params).select(&column(&ys)).unwrap();
    assert_eq!(selection.k, 5);
}

#[test]
fn gated_selector_accepts_clean_lines() {
    for seed in 0..5u64 {
        let mut rng = StdRng::seed_from_u64(300 + seed);
        let ys: Vec<f32> = CENTERS
            .iter()
            .flat_map(|&c| (0..15).map(move |_| c))
            .map(|c| c + gaussian(&mut rng, 1.0))
            .collect();

        let params = SelectorParams {
            sweep: SweepParams::with_range(3, 10).seeded(seed),
            ..SelectorParams::gated()
        };
        let selection = CompositeSelector::new(params).select(&column(&ys)).unwrap();
        assert_eq!(selection.k, 5);
        assert!(selection.confidence.unwrap() >= 5.0);
    }
}

/// Fits over five points at the origin with unit-spaced centroids, so only the
/// separation index tells candidates apart.
fn unit_spaced_fit(centroids: &[f32]) -> ClusteringResult {
    let k = centroids.len();
    ClusteringResult {
        k,
        centroids: column(centroids),
        belongings: (0..5).map(|j| j.min(k - 1)).collect(),
        compactness: 1.0,
    }
}

#[test]
fn gated_selector_rejects_close_runner_up() {
    let points = column(&[0.0; 5]);
    // Separation 0.8, 0.667 and 0.5: the lead over k=4 is smaller than the
    // margin between k=4 and k=5.
    let results = vec![
        unit_spaced_fit(&[-0.75, 0.25, 1.25]),
        unit_spaced_fit(&[-1.5, -0.5, 0.5, 1.5]),
        unit_spaced_fit(&[-2.0, -1.0, 0.0, 1.0, 2.0]),
    ];

    let selector = CompositeSelector::new(SelectorParams::gated());
    let err = selector.select_from(&points, results.clone()).unwrap_err();
    match err {
        Error::LowConfidence {
            confidence,
            threshold,
        } => {
            assert!((confidence - 0.8).abs() < 1e-3, "{confidence}");
            assert_eq!(threshold, 5.0);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let ungated = SelectorParams {
        confidence_threshold: None,
        ..SelectorParams::gated()
    };
    let selection = CompositeSelector::new(ungated)
        .select_from(&points, results)
        .unwrap();
    assert_eq!(selection.k, 3);
    assert_eq!(selection.confidence, None);
}

#[test]
fn index_line_finder_builds_line_model() {
    let segments = synthetic_page(7);
    let finder = IndexLineFinder::new(page_selector(3));
    let model = finder.find_lines(&segments).unwrap();

    assert_eq!(model.len(), 5);
    assert_eq!(model.inter().len(), 4);
    for (i, &center) in CENTERS.iter().enumerate() {
        assert!((model.tops()[i] - center).abs() <= 2.0);
        assert!((model.bottoms()[i] - (center + 12.0)).abs() <= 2.0);
        assert!((model.middles()[i] - (model.tops()[i] + model.bottoms()[i]) / 2.0).abs() < 1e-4);
    }
    for i in 0..4 {
        let expected = (model.bottoms()[i] + model.tops()[i + 1]) / 2.0;
        assert!((model.inter()[i] - expected).abs() < 1e-4);
    }
}

#[test]
fn gap_line_finder_agrees_with_index_finder() {
    let segments = synthetic_page(11);
    let gap = GapLineFinder {
        sweep: SweepParams::with_range(2, 2).seeded(4),
        ..GapLineFinder::default()
    }
    .find_lines(&segments)
    .unwrap();
    let index = IndexLineFinder::new(page_selector(4))
        .find_lines(&segments)
        .unwrap();

    assert_eq!(gap.len(), 5);
    assert_eq!(gap.len(), index.len());
    for (a, b) in gap.tops().iter().zip(index.tops().iter()) {
        assert!((a - b).abs() <= 1.0);
    }
}

#[test]
fn layout_orders_segments_line_by_line() {
    let segments = synthetic_page(21);
    let mut layout = SegmentLayout::new(segments);
    assert!(matches!(
        LineOrderer::default().order(&layout),
        Err(Error::MissingDependency(_))
    ));

    let finder = IndexLineFinder::new(page_selector(8));
    assert_eq!(layout.find_lines(&finder).unwrap().len(), 5);

    let ordered = LineOrderer::default().order(&layout).unwrap();
    assert_eq!(ordered.len(), 60);
    for (line, chunk) in ordered.chunks(12).enumerate() {
        for s in chunk {
            assert!((s.y - CENTERS[line]).abs() < 6.0);
        }
        for pair in chunk.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
    }
}

#[test]
fn row_bucket_orderer_on_aligned_rows() {
    let segments: Vec<Segment> = [(40.0, 45.0), (0.0, 5.0), (20.0, 45.0), (60.0, 5.0)]
        .iter()
        .map(|&(x, y)| Segment::new(x, y, 10.0, 10.0))
        .collect();
    let ordered = RowBucketOrderer::default()
        .order(&SegmentLayout::new(segments))
        .unwrap();
    let xs: Vec<f32> = ordered.iter().map(|s| s.x).collect();
    assert_eq!(xs, vec![0.0, 60.0, 20.0, 40.0]);
}

#[test]
fn index_finder_rejects_too_few_distinct_edges() {
    let segments = vec![
        Segment::new(0.0, 10.0, 5.0, 5.0),
        Segment::new(10.0, 10.0, 5.0, 5.0),
    ];
    let err = IndexLineFinder::default().find_lines(&segments).unwrap_err();
    assert!(matches!(err, Error::DegenerateInput(_)));
}
