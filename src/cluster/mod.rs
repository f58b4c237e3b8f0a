//! Clustering primitives used by line inference.
//!
//! ## K-means
//!
//! Assign each point to the nearest centroid, then move centroids to the mean
//! of their points. Repeat.
//!
//! **Objective**: minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! K-means needs k up front. Text-line inference does not know k, so
//! [`sweep`] fits every k in a range and the quality indices in
//! [`crate::quality`] decide between the fits.
//!
//! ## Usage
//!
//! ```rust
//! use lineation::cluster::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod kmeans;
mod krange;
mod traits;
pub(crate) mod util;

pub use kmeans::{Kmeans, KmeansFit};
pub use krange::{column, sweep, ClusteringResult, SweepParams};
pub use traits::Clustering;
