//! Cluster quality indices used to compare fits with different k.
//!
//! Every index here is oriented so that **larger is better**:
//!
//! - [`separation_index`]: Dunn-like ratio of the smallest gap between
//!   centroids to the widest cluster spread.
//! - [`even_distribution_index`]: negative variance of the spacing between
//!   sorted 1-D centroids. Text lines are roughly equally spaced, so uneven
//!   spacing is penalized.
//! - [`compactness_delta`]: drop in log-objective gained by adding one more
//!   cluster.
//!
//! [`index_series`] evaluates an index over a whole [`sweep`](crate::cluster::sweep)
//! and aligns the result with the k range.

use crate::cluster::util::{euclidean, mean};
use crate::cluster::ClusteringResult;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Added to the maximum intra-cluster distance before dividing.
pub const SEPARATION_EPSILON: f32 = 1e-10;

/// Added to the objective before taking its logarithm.
pub const COMPACTNESS_EPSILON: f32 = 1e-10;

/// Quality index selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QualityIndex {
    /// See [`separation_index`].
    Separation,
    /// See [`even_distribution_index`].
    EvenDistribution,
    /// See [`compactness_delta`].
    CompactnessDelta,
}

/// Separation index: `min inter-centroid distance / (max intra-cluster distance + ε)`.
///
/// The intra-cluster distance of a cluster is the mean Euclidean distance of its
/// members to its centroid. With a single centroid there is no pair to measure,
/// and an inter-centroid distance of 1 is used instead.
///
/// # Errors
///
/// - [`Error::DegenerateInput`] if some cluster has no members.
/// - [`Error::InvalidParameter`] if a label is out of range or lengths differ.
/// - [`Error::DimensionMismatch`] if points and centroids differ in dimension.
pub fn separation_index(
    points: &[Vec<f32>],
    centroids: &[Vec<f32>],
    belongings: &[usize],
) -> Result<f32> {
    let k = centroids.len();
    if k == 0 || points.is_empty() {
        return Err(Error::EmptyInput);
    }
    if points.len() != belongings.len() {
        return Err(Error::InvalidParameter {
            name: "belongings",
            message: "must have one label per point",
        });
    }
    let d = centroids[0].len();
    if let Some(bad) = points
        .iter()
        .chain(centroids.iter())
        .find(|v| v.len() != d)
    {
        return Err(Error::DimensionMismatch {
            expected: d,
            found: bad.len(),
        });
    }

    let mut spread = vec![0.0f32; k];
    let mut members = vec![0usize; k];
    for (p, &label) in points.iter().zip(belongings.iter()) {
        if label >= k {
            return Err(Error::InvalidParameter {
                name: "belongings",
                message: "label out of range",
            });
        }
        spread[label] += euclidean(p, &centroids[label]);
        members[label] += 1;
    }

    let mut max_intra = 0.0f32;
    for (c, (&total, &count)) in spread.iter().zip(members.iter()).enumerate() {
        if count == 0 {
            return Err(Error::DegenerateInput(format!("cluster {c} of {k} has no members")));
        }
        max_intra = max_intra.max(total / count as f32);
    }

    let mut min_inter = f32::INFINITY;
    for i in 0..k {
        for j in (i + 1)..k {
            min_inter = min_inter.min(euclidean(&centroids[i], &centroids[j]));
        }
    }
    if k == 1 {
        min_inter = 1.0;
    }

    Ok(min_inter / (max_intra + SEPARATION_EPSILON))
}

/// Even-distribution index: `-mean((s - mean(s))²)` over the spacings `s`
/// between consecutive sorted centroids.
///
/// Exactly 0 for equally spaced centroids. Squared deviation (rather than the
/// standard deviation) weighs a single odd gap more heavily.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] for fewer than three centroids, or for
/// centroids that are not 1-D.
pub fn even_distribution_index(centroids: &[Vec<f32>]) -> Result<f32> {
    if centroids.iter().any(|c| c.len() != 1) {
        return Err(Error::InvalidConfiguration(
            "even distribution index is only implemented for 1-D centroids",
        ));
    }
    if centroids.len() < 3 {
        return Err(Error::InvalidConfiguration(
            "even distribution index needs at least 3 centroids",
        ));
    }

    let mut cs: Vec<f32> = centroids.iter().map(|c| c[0]).collect();
    cs.sort_by(|a, b| a.total_cmp(b));
    let spacing: Vec<f32> = cs.windows(2).map(|w| w[1] - w[0]).collect();
    let avg = mean(&spacing);
    let msd = spacing.iter().map(|s| (s - avg) * (s - avg)).sum::<f32>() / spacing.len() as f32;

    Ok(-msd)
}

/// Compactness-delta series over consecutive k: `-(ln(c[i] + ε) - ln(c[i-1] + ε))`.
///
/// Position 0 has no predecessor and is back-filled with the worst (smallest)
/// observed value. An input of length 1 yields `[0.0]`.
pub fn compactness_delta(compactness: &[f32]) -> Vec<f32> {
    if compactness.len() < 2 {
        return vec![0.0; compactness.len()];
    }

    let logs: Vec<f32> = compactness
        .iter()
        .map(|c| (c + COMPACTNESS_EPSILON).ln())
        .collect();
    let gains: Vec<f32> = logs.windows(2).map(|w| w[0] - w[1]).collect();
    let worst = gains.iter().copied().fold(f32::INFINITY, f32::min);

    std::iter::once(worst).chain(gains).collect()
}

/// Evaluate `index` for every fit of a sweep, aligned with the fits' k order.
///
/// The even-distribution index is undefined for `k < 3`; those leading
/// positions are back-filled with the worst observed value.
pub fn index_series(
    index: QualityIndex,
    points: &[Vec<f32>],
    results: &[ClusteringResult],
) -> Result<Vec<f32>> {
    match index {
        QualityIndex::Separation => results
            .iter()
            .map(|r| separation_index(points, &r.centroids, &r.belongings))
            .collect(),
        QualityIndex::EvenDistribution => {
            let mut series: Vec<Option<f32>> = Vec::with_capacity(results.len());
            for r in results {
                if r.k < 3 {
                    series.push(None);
                } else {
                    series.push(Some(even_distribution_index(&r.centroids)?));
                }
            }
            let worst = series
                .iter()
                .flatten()
                .copied()
                .reduce(f32::min)
                .ok_or(Error::InvalidConfiguration(
                    "even distribution index needs a candidate with k >= 3",
                ))?;
            Ok(series.into_iter().map(|v| v.unwrap_or(worst)).collect())
        }
        QualityIndex::CompactnessDelta => {
            let compactness: Vec<f32> = results.iter().map(|r| r.compactness).collect();
            Ok(compactness_delta(&compactness))
        }
    }
}
