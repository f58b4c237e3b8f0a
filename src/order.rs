//! Reading order: left to right, top to bottom.

use crate::error::{Error, Result};
use crate::geometry::{LineAssigner, Segment};
use crate::lines::{LineFinder, LineModel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Segments of one page together with the lines found on it, if any.
///
/// The line model lives here for as long as the page is being processed, so
/// that ordering (and any rendering) can consume it without re-running line
/// inference.
#[derive(Clone, Debug, Default)]
pub struct SegmentLayout {
    /// Page segments, in upstream order.
    pub segments: Vec<Segment>,
    /// Lines inferred for `segments`.
    pub lines: Option<LineModel>,
}

impl SegmentLayout {
    /// Layout without lines.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            lines: None,
        }
    }

    /// Attach an already computed line model.
    pub fn with_lines(mut self, lines: LineModel) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Run `finder` on the segments and keep the result.
    pub fn find_lines(&mut self, finder: &dyn LineFinder) -> Result<&LineModel> {
        let model = finder.find_lines(&self.segments)?;
        Ok(&*self.lines.insert(model))
    }

    /// The line model, or [`Error::MissingDependency`] if none was computed.
    pub fn require_lines(&self) -> Result<&LineModel> {
        self.lines
            .as_ref()
            .ok_or(Error::MissingDependency("line middles"))
    }
}

/// Sorts segments into reading order.
pub trait SegmentOrderer {
    /// Permutation of `layout.segments` in reading order.
    fn order_indices(&self, layout: &SegmentLayout) -> Result<Vec<usize>>;

    /// `layout.segments` in reading order.
    fn order(&self, layout: &SegmentLayout) -> Result<Vec<Segment>> {
        Ok(self
            .order_indices(layout)?
            .into_iter()
            .map(|i| layout.segments[i])
            .collect())
    }
}

/// Orders by fixed-height row buckets, then by x.
///
/// The sort key is `max_line_width * floor(y / max_line_height) + x`, so a
/// segment in a lower bucket always comes later as long as `x < max_line_width`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RowBucketOrderer {
    /// Height of one row bucket.
    pub max_line_height: f32,
    /// Stride between buckets; should exceed any x coordinate.
    pub max_line_width: f32,
}

impl Default for RowBucketOrderer {
    fn default() -> Self {
        Self {
            max_line_height: 20.0,
            max_line_width: 10000.0,
        }
    }
}

impl RowBucketOrderer {
    fn key(&self, s: &Segment) -> f64 {
        let row = (f64::from(s.y) / f64::from(self.max_line_height)).floor();
        f64::from(self.max_line_width) * row + f64::from(s.x)
    }
}

impl SegmentOrderer for RowBucketOrderer {
    fn order_indices(&self, layout: &SegmentLayout) -> Result<Vec<usize>> {
        if self.max_line_height.is_nan() || self.max_line_height <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "max_line_height",
                message: "must be positive",
            });
        }
        if self.max_line_width.is_nan() || self.max_line_width <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "max_line_width",
                message: "must be positive",
            });
        }

        let keys: Vec<f64> = layout.segments.iter().map(|s| self.key(s)).collect();
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
        Ok(order)
    }
}

/// Orders by assigned line (nearest line middle), then by x.
///
/// Segments that the assigner rejects as outliers go last, in their
/// upstream order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LineOrderer {
    /// Assignment of segments to line middles.
    pub assigner: LineAssigner,
}

impl LineOrderer {
    /// Orderer with the given assignment tolerance.
    pub fn new(tolerance: f32) -> Self {
        Self {
            assigner: LineAssigner::new(tolerance),
        }
    }
}

impl SegmentOrderer for LineOrderer {
    fn order_indices(&self, layout: &SegmentLayout) -> Result<Vec<usize>> {
        let lines = layout.require_lines()?;
        order_indices_by_lines(&layout.segments, lines, &self.assigner)
    }
}

fn order_indices_by_lines(
    segments: &[Segment],
    lines: &LineModel,
    assigner: &LineAssigner,
) -> Result<Vec<usize>> {
    let assigned = assigner.assign(segments, lines.middles())?;
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&a, &b| {
        let line_a = assigned[a].unwrap_or(usize::MAX);
        let line_b = assigned[b].unwrap_or(usize::MAX);
        line_a
            .cmp(&line_b)
            .then_with(|| match (assigned[a], assigned[b]) {
                (Some(_), Some(_)) => segments[a].x.total_cmp(&segments[b].x),
                _ => std::cmp::Ordering::Equal,
            })
    });
    Ok(order)
}

/// Sort `segments` by line (nearest middle of `lines`), then by x.
pub fn order_by_lines(
    segments: &[Segment],
    lines: &LineModel,
    tolerance: f32,
) -> Result<Vec<Segment>> {
    let order = order_indices_by_lines(segments, lines, &LineAssigner::new(tolerance))?;
    Ok(order.into_iter().map(|i| segments[i]).collect())
}
