//! Text-line inference for scanned documents.
//!
//! `lineation` takes the bounding boxes of glyphs or connected components
//! ("segments") found on a page and works out its horizontal line structure
//! without knowing how many lines there are:
//!
//! - [`cluster`]: k-means (k-means++ seeding, bounded Lloyd iterations) and a
//!   sweep over a range of cluster counts
//! - [`quality`]: cluster quality indices (separation, even distribution,
//!   compactness delta)
//! - [`select`]: z-scored, weighted model selection with an optional
//!   confidence gate
//! - [`lines`]: line bands from segment tops and bottoms, by index selection
//!   or by gap clustering
//! - [`geometry`]: segment-to-line assignment with outlier rejection, and the
//!   rectangle containment matrix
//! - [`order`]: reading-order sorting
//!
//! ```rust
//! use lineation::{contained_segments_matrix, guess_segments_lines, Segment};
//!
//! let segments = [
//!     Segment::new(0.0, 0.0, 10.0, 10.0),
//!     Segment::new(2.0, 2.0, 3.0, 3.0),
//! ];
//! let m = contained_segments_matrix(&segments);
//! assert!(m.contains(1, 0));
//! assert!(!m.contains(0, 1));
//!
//! let glyph = Segment::new(0.0, 52.0, 4.0, 8.0);
//! let lines = guess_segments_lines(&[glyph], &[10.0, 50.0, 90.0], 999.0).unwrap();
//! assert_eq!(lines, vec![Some(1)]);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod geometry;
pub mod lines;
pub mod order;
pub mod quality;
pub mod select;

pub use cluster::{sweep, Clustering, ClusteringResult, Kmeans, KmeansFit, SweepParams};
pub use error::{Error, Result};
pub use geometry::{
    contained_segments_matrix, guess_segments_lines, ContainmentMatrix, LineAssigner, Segment,
};
pub use lines::{GapLineFinder, IndexLineFinder, LineFinder, LineModel};
pub use order::{order_by_lines, LineOrderer, RowBucketOrderer, SegmentLayout, SegmentOrderer};
pub use quality::{even_distribution_index, separation_index, QualityIndex};
pub use select::{CompositeSelector, IndexWeights, Selection, SelectorParams};
