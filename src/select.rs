//! Composite model selection: pick the cluster count from several quality indices.
//!
//! # Procedure
//!
//! 1. Fit k-means for every k in the configured range ([`sweep`]).
//! 2. Evaluate each enabled quality index over the fits ([`index_series`]).
//! 3. Z-score every series independently so that indices on different scales
//!    become comparable.
//! 4. Combine the normalized series with fixed weights.
//! 5. Take the k with the **largest** combined score. Every index in
//!    [`crate::quality`] is oriented larger-is-better, so the combination is too.
//!    Ties go to the smallest k.
//!
//! # Confidence gate
//!
//! Optionally, the selection is rejected when the winner does not clearly beat
//! the runner-up. With the combined scores sorted best first (`s0 >= s1 >= s2`),
//!
//! ```text
//! confidence = (s0 - s1) / (s1 - s2)
//! ```
//!
//! and a confidence below the threshold fails with [`Error::LowConfidence`].

use crate::cluster::util::{mean, std_dev};
use crate::cluster::{sweep, ClusteringResult, SweepParams};
use crate::error::{Error, Result};
use crate::quality::{index_series, QualityIndex};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Canonical confidence threshold for the gate.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 5.0;

/// Weights applied to the z-scored index series.
///
/// A zero weight disables the index (it is not computed).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct IndexWeights {
    /// Weight of the separation index.
    pub separation: f32,
    /// Weight of the even-distribution index.
    pub even_distribution: f32,
    /// Weight of the compactness-delta index.
    pub compactness_delta: f32,
}

impl IndexWeights {
    /// Separation and even distribution: `0.65 / 0.35`.
    pub fn two_index() -> Self {
        Self {
            separation: 0.65,
            even_distribution: 0.35,
            compactness_delta: 0.0,
        }
    }

    /// Separation, even distribution, and compactness delta: `0.6 / 0.3 / 0.1`.
    pub fn three_index() -> Self {
        Self {
            separation: 0.6,
            even_distribution: 0.3,
            compactness_delta: 0.1,
        }
    }

    fn enabled(&self) -> Vec<(QualityIndex, f32)> {
        [
            (QualityIndex::Separation, self.separation),
            (QualityIndex::EvenDistribution, self.even_distribution),
            (QualityIndex::CompactnessDelta, self.compactness_delta),
        ]
        .into_iter()
        .filter(|(_, w)| *w != 0.0)
        .collect()
    }
}

impl Default for IndexWeights {
    fn default() -> Self {
        Self::two_index()
    }
}

/// Selector configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SelectorParams {
    /// k range and k-means settings.
    pub sweep: SweepParams,
    /// Index weights.
    pub weights: IndexWeights,
    /// Minimum confidence; `None` disables the gate.
    pub confidence_threshold: Option<f32>,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            sweep: SweepParams::default(),
            weights: IndexWeights::default(),
            confidence_threshold: None,
        }
    }
}

impl SelectorParams {
    /// Three-index weights with the confidence gate at its canonical threshold.
    pub fn gated() -> Self {
        Self {
            sweep: SweepParams::default(),
            weights: IndexWeights::three_index(),
            confidence_threshold: Some(DEFAULT_CONFIDENCE_THRESHOLD),
        }
    }
}

/// Outcome of a model selection.
#[derive(Clone, Debug)]
pub struct Selection {
    /// Selected cluster count.
    pub k: usize,
    /// Position of the selected fit within the sweep.
    pub index: usize,
    /// Centroids of the selected fit (sorted ascending for 1-D data).
    pub centroids: Vec<Vec<f32>>,
    /// Combined score per candidate, aligned with `ks`.
    pub scores: Vec<f32>,
    /// Candidate cluster counts.
    pub ks: Vec<usize>,
    /// Confidence ratio, when the gate is enabled.
    pub confidence: Option<f32>,
}

impl Selection {
    /// Selected 1-D centroids as scalars.
    pub fn scalar_centroids(&self) -> Result<Vec<f32>> {
        self.centroids
            .iter()
            .map(|c| match c.as_slice() {
                [v] => Ok(*v),
                _ => Err(Error::InvalidConfiguration("centroids are not one-dimensional")),
            })
            .collect()
    }
}

/// Z-score a series: subtract the mean, divide by the (population) standard deviation.
///
/// A constant series carries no ranking information and maps to all zeros.
///
/// # Errors
///
/// [`Error::DegenerateInput`] for fewer than two values.
pub fn zscore(series: &[f32]) -> Result<Vec<f32>> {
    if series.len() < 2 {
        return Err(Error::DegenerateInput(format!(
            "cannot normalize a series of {} value(s)",
            series.len()
        )));
    }
    let m = mean(series);
    let s = std_dev(series);
    if s > 0.0 && s.is_finite() {
        Ok(series.iter().map(|v| (v - m) / s).collect())
    } else {
        Ok(vec![0.0; series.len()])
    }
}

/// Weighted sum of equally long series.
pub fn combine(weighted: &[(Vec<f32>, f32)]) -> Vec<f32> {
    let len = weighted.first().map_or(0, |(s, _)| s.len());
    let mut out = vec![0.0f32; len];
    for (series, w) in weighted {
        for (o, v) in out.iter_mut().zip(series.iter()) {
            *o += w * v;
        }
    }
    out
}

/// Position of the largest value; the first one wins ties. `None` if empty.
pub fn argmax_first(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Confidence that the best score stands apart: `(s0 - s1) / (s1 - s2)` over
/// the scores sorted best first.
///
/// A three-way tie (`0 / 0`) has zero confidence. A clear winner over a tied
/// runner-up pair gives `+inf`.
///
/// # Errors
///
/// [`Error::DegenerateInput`] for fewer than three scores.
pub fn confidence(scores: &[f32]) -> Result<f32> {
    if scores.len() < 3 {
        return Err(Error::DegenerateInput(format!(
            "confidence needs at least 3 candidates, got {}",
            scores.len()
        )));
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let lead = sorted[0] - sorted[1];
    let runner_up = sorted[1] - sorted[2];
    let ratio = lead / runner_up;
    Ok(if ratio.is_nan() { 0.0 } else { ratio })
}

/// Fail with [`Error::LowConfidence`] unless `confidence(scores) >= threshold`.
pub fn confidence_gate(scores: &[f32], threshold: f32) -> Result<f32> {
    let c = confidence(scores)?;
    if c < threshold {
        return Err(Error::LowConfidence {
            confidence: c,
            threshold,
        });
    }
    Ok(c)
}

/// Picks the best cluster count for a point set.
#[derive(Clone, Debug, Default)]
pub struct CompositeSelector {
    params: SelectorParams,
}

impl CompositeSelector {
    /// Create a selector.
    pub fn new(params: SelectorParams) -> Self {
        Self { params }
    }

    /// Access the configuration.
    pub fn params(&self) -> &SelectorParams {
        &self.params
    }

    /// Sweep k over `points` and select the best fit.
    pub fn select(&self, points: &[Vec<f32>]) -> Result<Selection> {
        let results = sweep(points, &self.params.sweep)?;
        self.select_from(points, results)
    }

    /// Select among fits already computed for `points`.
    pub fn select_from(
        &self,
        points: &[Vec<f32>],
        mut results: Vec<ClusteringResult>,
    ) -> Result<Selection> {
        let enabled = self.params.weights.enabled();
        if enabled.is_empty() {
            return Err(Error::InvalidParameter {
                name: "weights",
                message: "at least one index weight must be non-zero",
            });
        }

        let mut weighted = Vec::with_capacity(enabled.len());
        for (index, w) in enabled {
            let raw = index_series(index, points, &results)?;
            weighted.push((zscore(&raw)?, w));
        }
        let scores = combine(&weighted);

        let confidence = match self.params.confidence_threshold {
            Some(threshold) => Some(confidence_gate(&scores, threshold)?),
            None => None,
        };

        let index = argmax_first(&scores).ok_or(Error::EmptyInput)?;
        let ks: Vec<usize> = results.iter().map(|r| r.k).collect();
        debug!(
            "composite selection: k={} from {:?}, scores {:?}, confidence {:?}",
            ks[index], ks, scores, confidence
        );

        let mut centroids = results.swap_remove(index).centroids;
        if centroids.iter().all(|c| c.len() == 1) {
            centroids.sort_by(|a, b| a[0].total_cmp(&b[0]));
        }

        Ok(Selection {
            k: ks[index],
            index,
            centroids,
            scores,
            ks,
            confidence,
        })
    }
}
