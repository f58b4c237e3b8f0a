//! K-means with k-means++ seeding and bounded Lloyd iterations.
//!
//! # The Algorithm (Lloyd, 1982; Arthur & Vassilvitskii, 2007)
//!
//! 1. **Seeding (k-means++)**: pick the first centroid uniformly at random, then
//!    each further centroid with probability proportional to its squared distance
//!    from the nearest centroid chosen so far.
//! 2. **Assignment**: label every point with its nearest centroid.
//! 3. **Update**: move each centroid to the mean of its members.
//! 4. Repeat 2-3 until no centroid moves more than `tol` or `max_iter` is reached.
//!
//! The whole procedure is run `attempts` times and the fit with the lowest
//! objective (within-cluster sum of squares) wins.
//!
//! ## Empty clusters
//!
//! When an update leaves a cluster without members, it is reseeded with the
//! point farthest from its own centroid (taken from a cluster that can spare
//! it). As long as the data holds at least `k` distinct points, every cluster
//! of the returned fit has at least one member.
//!
//! ## Stopping criterion
//!
//! Model selection over a range of k does not need tight convergence, so the
//! sweep in [`super::sweep()`] runs this with a small iteration cap (10) and a
//! coarse shift tolerance. Standalone use defaults to 100 iterations.

use super::traits::Clustering;
use super::util::{check_dimensions, squared_euclidean};
use crate::error::{Error, Result};
use rand::prelude::*;

/// K-means clusterer.
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    tol: f32,
    attempts: usize,
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Cluster centers, one per cluster (`k` rows of the input dimension).
    pub centroids: Vec<Vec<f32>>,
    /// Cluster index per input point.
    pub labels: Vec<usize>,
    /// Within-cluster sum of squared distances (compactness).
    pub objective: f32,
    /// Lloyd iterations used by the winning attempt.
    pub iterations: usize,
}

impl Kmeans {
    /// Create a new k-means clusterer for `k` clusters.
    ///
    /// Defaults: `max_iter = 100`, `tol = 1e-4`, `attempts = 1`, random seed.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-4,
            attempts: 1,
            seed: None,
        }
    }

    /// Set the maximum number of Lloyd iterations per attempt.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop once no centroid moves further than `tol` (Euclidean) in one iteration.
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Number of independent seedings; the fit with the lowest objective is kept.
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Fix the RNG seed for reproducible seeding.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fit the model and return centroids, labels, and objective.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.attempts == 0 {
            return Err(Error::InvalidParameter {
                name: "attempts",
                message: "must be at least 1",
            });
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be non-negative",
            });
        }
        let d = check_dimensions(data)?;

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut best: Option<KmeansFit> = None;
        for _ in 0..self.attempts {
            let fit = self.fit_once(data, d, &mut rng);
            let better = match &best {
                Some(b) => fit.objective < b.objective,
                None => true,
            };
            if better {
                best = Some(fit);
            }
        }

        best.ok_or(Error::EmptyInput)
    }

    fn fit_once<R: Rng>(&self, data: &[Vec<f32>], d: usize, rng: &mut R) -> KmeansFit {
        let mut centroids = plus_plus_init(data, self.k, rng);
        let mut labels = vec![0usize; data.len()];
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;
            assign(data, &centroids, &mut labels);
            let updated = update(data, &mut labels, self.k, d, &centroids);

            let shift = centroids
                .iter()
                .zip(updated.iter())
                .map(|(a, b)| squared_euclidean(a, b))
                .fold(0.0f32, f32::max)
                .sqrt();
            centroids = updated;

            if shift <= self.tol {
                break;
            }
        }

        let objective = data
            .iter()
            .zip(labels.iter())
            .map(|(p, &l)| squared_euclidean(p, &centroids[l]))
            .sum();

        KmeansFit {
            centroids,
            labels,
            objective,
            iterations,
        }
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// k-means++ seeding.
fn plus_plus_init<R: Rng>(data: &[Vec<f32>], k: usize, rng: &mut R) -> Vec<Vec<f32>> {
    let n = data.len();
    let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);
    centroids.push(data[rng.random_range(0..n)].clone());

    let mut nearest: Vec<f32> = data
        .iter()
        .map(|p| squared_euclidean(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f32 = nearest.iter().sum();
        let idx = if total > 0.0 {
            let target = rng.random::<f32>() * total;
            let mut acc = 0.0f32;
            let mut chosen = None;
            for (i, &w) in nearest.iter().enumerate() {
                acc += w;
                if w > 0.0 && acc >= target {
                    chosen = Some(i);
                    break;
                }
            }
            // Rounding can leave `acc` just short of `target`; fall back to the last
            // point with positive weight.
            chosen.unwrap_or_else(|| nearest.iter().rposition(|&w| w > 0.0).unwrap_or(0))
        } else {
            // Every point coincides with a centroid already.
            rng.random_range(0..n)
        };

        let c = data[idx].clone();
        for (p, best) in data.iter().zip(nearest.iter_mut()) {
            let dist = squared_euclidean(p, &c);
            if dist < *best {
                *best = dist;
            }
        }
        centroids.push(c);
    }

    centroids
}

fn assign(data: &[Vec<f32>], centroids: &[Vec<f32>], labels: &mut [usize]) {
    for (p, label) in data.iter().zip(labels.iter_mut()) {
        let mut best = f32::INFINITY;
        for (c, centroid) in centroids.iter().enumerate() {
            let dist = squared_euclidean(p, centroid);
            if dist < best {
                best = dist;
                *label = c;
            }
        }
    }
}

/// Recompute centroids from `labels`, reseeding empty clusters in place.
fn update(
    data: &[Vec<f32>],
    labels: &mut [usize],
    k: usize,
    d: usize,
    previous: &[Vec<f32>],
) -> Vec<Vec<f32>> {
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }

    for c in 0..k {
        if counts[c] > 0 {
            continue;
        }
        // Steal the worst-fitting point from a cluster with members to spare.
        let donor = data
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[labels[*i]] > 1)
            .map(|(i, p)| (i, squared_euclidean(p, &previous[labels[i]])))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);
        if let Some(i) = donor {
            counts[labels[i]] -= 1;
            labels[i] = c;
            counts[c] = 1;
        }
    }

    let mut sums = vec![vec![0.0f32; d]; k];
    for (p, &l) in data.iter().zip(labels.iter()) {
        for (s, v) in sums[l].iter_mut().zip(p.iter()) {
            *s += v;
        }
    }

    sums.into_iter()
        .enumerate()
        .map(|(c, mut s)| {
            if counts[c] == 0 {
                return previous[c].clone();
            }
            let inv = 1.0 / counts[c] as f32;
            for v in s.iter_mut() {
                *v *= inv;
            }
            s
        })
        .collect()
}
