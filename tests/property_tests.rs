use lineation::cluster::{Clustering, Kmeans};
use lineation::select::zscore;
use lineation::{
    contained_segments_matrix, even_distribution_index, guess_segments_lines, separation_index,
    Segment,
};
use proptest::prelude::*;

fn rects() -> impl Strategy<Value = Vec<Segment>> {
    // Small coordinate ranges so that shared edges (ties) are common.
    prop::collection::vec((0i32..20, 0i32..20, 1i32..20, 1i32..20), 0..16).prop_map(|v| {
        v.into_iter()
            .map(|(x, y, w, h)| Segment::new(x as f32, y as f32, w as f32, h as f32))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_kmeans_all_assigned(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..20),
        k in 1usize..5
    ) {
        // Skip if k > n
        if k <= data.len() {
            let model = Kmeans::new(k).with_seed(42);
            let labels = model.fit_predict(&data).unwrap();

            prop_assert_eq!(labels.len(), data.len());
            for &l in &labels {
                prop_assert!(l < k);
            }
        }
    }

    #[test]
    fn prop_containment_matches_brute_force(segments in rects()) {
        let m = contained_segments_matrix(&segments);
        prop_assert_eq!(m.len(), segments.len());
        for (i, a) in segments.iter().enumerate() {
            for (j, b) in segments.iter().enumerate() {
                prop_assert_eq!(m.contains(i, j), a.is_inside(b), "pair ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn prop_containment_antisymmetric_and_transitive(segments in rects()) {
        let m = contained_segments_matrix(&segments);
        let n = segments.len();
        for i in 0..n {
            prop_assert!(!m.contains(i, i));
            for j in 0..n {
                if m.contains(i, j) {
                    prop_assert!(!m.contains(j, i));
                    for l in 0..n {
                        if m.contains(j, l) {
                            prop_assert!(m.contains(i, l));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn prop_assigned_line_is_nearest(
        ys in prop::collection::vec(-100.0f32..300.0, 1..30),
        mut lines in prop::collection::vec(0.0f32..200.0, 1..8),
        tolerance in 0.0f32..3.0
    ) {
        lines.sort_by(|a, b| a.total_cmp(b));
        let segments: Vec<Segment> = ys.iter().map(|&y| Segment::new(0.0, y, 1.0, 1.0)).collect();
        let assigned = guess_segments_lines(&segments, &lines, tolerance).unwrap();

        prop_assert_eq!(assigned.len(), segments.len());
        for (s, line) in segments.iter().zip(assigned.iter()) {
            if let Some(l) = *line {
                let d = (s.y - lines[l]).abs();
                for &other in &lines {
                    prop_assert!(d <= (s.y - other).abs());
                }
            }
        }
    }

    #[test]
    fn prop_separation_translation_invariant(
        points in prop::collection::vec((-50i32..50, -50i32..50), 3..30),
        centroids in prop::collection::vec((-50i32..50, -50i32..50), 1..4),
        shift in (-500i32..500, -500i32..500)
    ) {
        prop_assume!(centroids.len() <= points.len());
        let k = centroids.len();
        let labels: Vec<usize> = (0..points.len()).map(|i| i % k).collect();

        let to_vec = |v: &[(i32, i32)], dx: i32, dy: i32| -> Vec<Vec<f32>> {
            v.iter().map(|&(x, y)| vec![(x + dx) as f32, (y + dy) as f32]).collect()
        };

        let base = separation_index(&to_vec(&points, 0, 0), &to_vec(&centroids, 0, 0), &labels).unwrap();
        let moved = separation_index(
            &to_vec(&points, shift.0, shift.1),
            &to_vec(&centroids, shift.0, shift.1),
            &labels,
        )
        .unwrap();

        prop_assert!(base >= 0.0);
        prop_assert_eq!(base, moved);
    }

    #[test]
    fn prop_even_distribution_zero_for_equal_spacing(
        start in -500i32..500,
        step in 1i32..100,
        k in 3usize..12
    ) {
        let centroids: Vec<Vec<f32>> = (0..k).map(|i| vec![(start + step * i as i32) as f32]).collect();
        prop_assert_eq!(even_distribution_index(&centroids).unwrap(), 0.0);
    }

    #[test]
    fn prop_zscore_moments(series in prop::collection::vec(-1000.0f32..1000.0, 2..30)) {
        let n = series.len() as f32;
        let m = series.iter().sum::<f32>() / n;
        let sd = (series.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / n).sqrt();
        prop_assume!(sd > 1.0);

        let z = zscore(&series).unwrap();
        let zm = z.iter().sum::<f32>() / n;
        let zsd = (z.iter().map(|v| (v - zm) * (v - zm)).sum::<f32>() / n).sqrt();
        prop_assert!(zm.abs() < 1e-3);
        prop_assert!((zsd - 1.0).abs() < 1e-3);
    }
}
