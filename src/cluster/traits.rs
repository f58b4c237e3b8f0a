use crate::error::Result;

/// Hard clustering: one label per point.
///
/// [`super::Kmeans`] is the implementation the line finders run; the trait is
/// the seam for swapping in another partitioning algorithm.
pub trait Clustering {
    /// Fit the model and return one cluster label per input point.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// The configured number of clusters.
    fn n_clusters(&self) -> usize;
}
