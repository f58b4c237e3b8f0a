use std::cmp::Ordering;

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[inline]
pub(crate) fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

/// Arithmetic mean; `0.0` for an empty slice.
pub(crate) fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub(crate) fn std_dev(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32;
    var.sqrt()
}

/// Indices that sort `values` ascending. Stable, so equal values keep input order.
pub(crate) fn argsort(values: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

fn lexicographic(a: &[f32], b: &[f32]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Number of distinct points (exact equality).
pub(crate) fn distinct_count(data: &[Vec<f32>]) -> usize {
    let mut rows: Vec<&[f32]> = data.iter().map(Vec::as_slice).collect();
    rows.sort_by(|a, b| lexicographic(a, b));
    rows.dedup_by(|a, b| lexicographic(a, b) == Ordering::Equal);
    rows.len()
}

/// Check that every point has the same, non-zero dimension. Returns that dimension.
pub(crate) fn check_dimensions(data: &[Vec<f32>]) -> crate::error::Result<usize> {
    use crate::error::Error;

    let d = data.first().map(Vec::len).ok_or(Error::EmptyInput)?;
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }
    for point in data.iter().skip(1) {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
    }
    Ok(d)
}
