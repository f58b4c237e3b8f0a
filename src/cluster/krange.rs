//! Run k-means once per candidate cluster count.
//!
//! Model selection needs a fit for every k in an inclusive range. Each fit uses
//! a small iteration cap and coarse tolerance, since the fits are only compared
//! against each other.

use super::kmeans::Kmeans;
use super::util::{check_dimensions, distinct_count};
use crate::error::{Error, Result};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for a sweep over `k_min..=k_max`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SweepParams {
    /// Smallest cluster count tried (>= 1).
    pub k_min: usize,
    /// Largest cluster count tried. Clamped to the number of distinct points.
    pub k_max: usize,
    /// Lloyd iteration cap per fit.
    pub max_iter: usize,
    /// Centroid shift under which a fit stops early.
    pub tol: f32,
    /// Restarts per k; the lowest objective wins.
    pub attempts: usize,
    /// Optional RNG seed. Fit `k` is seeded with `seed + k`.
    pub seed: Option<u64>,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            k_min: 1,
            k_max: 50,
            max_iter: 10,
            tol: 1.0,
            attempts: 3,
            seed: None,
        }
    }
}

impl SweepParams {
    /// Parameters for the inclusive range `k_min..=k_max`, other fields default.
    pub fn with_range(k_min: usize, k_max: usize) -> Self {
        Self {
            k_min,
            k_max,
            ..Self::default()
        }
    }

    /// Fix the RNG seed.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn kmeans(&self, k: usize) -> Kmeans {
        let model = Kmeans::new(k)
            .with_max_iter(self.max_iter)
            .with_tol(self.tol)
            .with_attempts(self.attempts);
        match self.seed {
            Some(s) => model.with_seed(s.wrapping_add(k as u64)),
            None => model,
        }
    }
}

/// One k-means fit within a sweep.
#[derive(Clone, Debug)]
pub struct ClusteringResult {
    /// Number of clusters.
    pub k: usize,
    /// Cluster centers, `k` rows.
    pub centroids: Vec<Vec<f32>>,
    /// Cluster index per point, each `< k`.
    pub belongings: Vec<usize>,
    /// Within-cluster sum of squares reported by the fit.
    pub compactness: f32,
}

impl ClusteringResult {
    /// Centroids of a 1-D fit as scalars, sorted ascending.
    ///
    /// Returns [`Error::InvalidConfiguration`] if the centroids are not 1-D.
    pub fn sorted_scalar_centroids(&self) -> Result<Vec<f32>> {
        let mut out = Vec::with_capacity(self.centroids.len());
        for c in &self.centroids {
            if c.len() != 1 {
                return Err(Error::InvalidConfiguration("centroids are not one-dimensional"));
            }
            out.push(c[0]);
        }
        out.sort_by(|a, b| a.total_cmp(b));
        Ok(out)
    }
}

/// Fit k-means for every `k` in `params.k_min..=params.k_max`, in k order.
///
/// `k_max` is clamped to the number of distinct points, so every returned fit
/// has non-empty clusters. Fails with [`Error::DegenerateInput`] if fewer than
/// `k_min` distinct points exist.
pub fn sweep(data: &[Vec<f32>], params: &SweepParams) -> Result<Vec<ClusteringResult>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if params.k_min == 0 {
        return Err(Error::InvalidParameter {
            name: "k_min",
            message: "must be at least 1",
        });
    }
    if params.k_min > params.k_max {
        return Err(Error::InvalidParameter {
            name: "k_max",
            message: "must be at least k_min",
        });
    }
    check_dimensions(data)?;

    let distinct = distinct_count(data);
    if distinct < params.k_min {
        return Err(Error::DegenerateInput(format!(
            "{distinct} distinct points cannot form {} clusters",
            params.k_min
        )));
    }
    let k_max = params.k_max.min(distinct);
    if k_max < params.k_max {
        debug!(
            "k sweep: clamping k_max {} -> {} ({} distinct of {} points)",
            params.k_max,
            k_max,
            distinct,
            data.len()
        );
    }

    (params.k_min..=k_max)
        .map(|k| {
            let fit = params.kmeans(k).fit(data)?;
            Ok(ClusteringResult {
                k,
                centroids: fit.centroids,
                belongings: fit.labels,
                compactness: fit.objective,
            })
        })
        .collect()
}

/// Wrap scalars as 1-D points.
pub fn column(values: &[f32]) -> Vec<Vec<f32>> {
    values.iter().map(|&v| vec![v]).collect()
}
