use thiserror::Error;

/// Errors returned by clustering, model selection, and line inference.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A quality index was requested for a clustering it is not defined on.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Top and bottom edges were clustered into a different number of lines.
    #[error("inconsistent line count: {tops} tops, {bottoms} bottoms")]
    InconsistentResult {
        /// Number of lines found on segment tops.
        tops: usize,
        /// Number of lines found on segment bottoms.
        bottoms: usize,
    },

    /// The best cluster count does not stand out from the runner-up.
    #[error("low confidence selection: {confidence} below threshold {threshold}")]
    LowConfidence {
        /// Observed confidence ratio.
        confidence: f32,
        /// Configured minimum.
        threshold: f32,
    },

    /// Input cannot support the requested computation (too few points, empty clusters).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A stage was run before the stage that produces its input.
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
