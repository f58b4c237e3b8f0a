//! Segment geometry: line assignment and rectangle containment.

use crate::cluster::util::{argsort, mean, std_dev};
use crate::error::{Error, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a glyph or connected component.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    /// Left edge.
    pub x: f32,
    /// Top edge (y grows downwards).
    pub y: f32,
    /// Width, `> 0`.
    pub width: f32,
    /// Height, `> 0`.
    pub height: f32,
}

impl Segment {
    /// Build a segment without validating its size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a segment, rejecting non-positive (or NaN) sizes.
    pub fn try_new(x: f32, y: f32, width: f32, height: f32) -> Result<Self> {
        if width.is_nan() || width <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "width",
                message: "must be positive",
            });
        }
        if height.is_nan() || height <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "height",
                message: "must be positive",
            });
        }
        Ok(Self::new(x, y, width, height))
    }

    /// Build a segment from integer pixel coordinates.
    pub fn from_ints(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        Self::try_new(x as f32, y as f32, width as f32, height as f32)
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge, `y + height`.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge, `x + width`.
    #[inline]
    pub fn x2(&self) -> f32 {
        self.x + self.width
    }

    /// Alias of [`Segment::bottom`].
    #[inline]
    pub fn y2(&self) -> f32 {
        self.bottom()
    }

    /// Whether `self` lies strictly inside `other` on both axes.
    pub fn is_inside(&self, other: &Segment) -> bool {
        self.x > other.x && self.x2() < other.x2() && self.y > other.y && self.y2() < other.y2()
    }
}

/// `n × n` boolean matrix; entry `(i, j)` is set iff segment `i` is strictly
/// nested inside segment `j`.
#[derive(Clone, PartialEq, Eq)]
pub struct ContainmentMatrix {
    n: usize,
    cells: Vec<bool>,
}

impl ContainmentMatrix {
    /// Number of segments (rows and columns).
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix covers zero segments.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Whether segment `i` lies inside segment `j`.
    ///
    /// # Panics
    ///
    /// If `i` or `j` is out of range.
    #[inline]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        assert!(i < self.n && j < self.n, "index out of range");
        self.cells[i * self.n + j]
    }

    /// Row `i`: which segments contain segment `i`.
    pub fn row(&self, i: usize) -> &[bool] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    /// Indices of the segments that contain segment `i`.
    pub fn containers_of(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(i)
            .iter()
            .enumerate()
            .filter_map(|(j, &inside)| inside.then_some(j))
    }

    /// Whether segment `i` is nested inside any other segment.
    pub fn is_contained(&self, i: usize) -> bool {
        self.row(i).iter().any(|&b| b)
    }
}

impl fmt::Debug for ContainmentMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ContainmentMatrix({}x{})", self.n, self.n)?;
        for i in 0..self.n {
            let row: String = self.row(i).iter().map(|&b| if b { '1' } else { '.' }).collect();
            writeln!(f, "  {row}")?;
        }
        Ok(())
    }
}

/// Rank of each value in ascending order. Equal values share the smallest rank
/// of their group, so `rank[a] < rank[b]` iff `values[a] < values[b]`.
fn ranks(values: &[f32]) -> Vec<usize> {
    let order = argsort(values);
    let mut rank = vec![0usize; values.len()];
    for (pos, &idx) in order.iter().enumerate() {
        rank[idx] = match pos.checked_sub(1).map(|p| order[p]) {
            Some(prev) if values[prev] == values[idx] => rank[prev],
            _ => pos,
        };
    }
    rank
}

/// Build the containment matrix for `segments`.
///
/// Each of the four edges (`x1, x2, y1, y2`) is rank-transformed once, so the
/// pairwise comparisons run on integer ranks, and the per-axis relations are
/// intersected:
///
/// ```text
/// inside(i, j) = x1[j] < x1[i]  &&  x2[i] < x2[j]  &&  y1[j] < y1[i]  &&  y2[i] < y2[j]
/// ```
pub fn contained_segments_matrix(segments: &[Segment]) -> ContainmentMatrix {
    let n = segments.len();
    let left = ranks(&segments.iter().map(|s| s.x).collect::<Vec<_>>());
    let right = ranks(&segments.iter().map(Segment::x2).collect::<Vec<_>>());
    let top = ranks(&segments.iter().map(|s| s.y).collect::<Vec<_>>());
    let bottom = ranks(&segments.iter().map(Segment::y2).collect::<Vec<_>>());

    let mut cells = vec![false; n * n];
    for i in 0..n {
        for j in 0..n {
            let inside_x = left[j] < left[i] && right[i] < right[j];
            cells[i * n + j] = inside_x && top[j] < top[i] && bottom[i] < bottom[j];
        }
    }

    ContainmentMatrix { n, cells }
}

/// Default line assignment tolerance. Large enough to disable outlier rejection.
pub const DEFAULT_NEARLINE_TOLERANCE: f32 = 999.0;

/// Assign each segment to the line coordinate nearest to its top edge.
///
/// With `d` the nearest-line distances of all segments, a segment is left
/// unassigned (`None`) when its distance exceeds `mean(d) + tolerance * std(d)`.
/// The cut adapts to the noise level of the current page.
///
/// Ties between two equally near lines go to the lower index.
///
/// # Errors
///
/// [`Error::EmptyInput`] if `lines` is empty.
pub fn guess_segments_lines(
    segments: &[Segment],
    lines: &[f32],
    tolerance: f32,
) -> Result<Vec<Option<usize>>> {
    if lines.is_empty() {
        return Err(Error::EmptyInput);
    }
    if segments.is_empty() {
        return Ok(Vec::new());
    }

    let nearest: Vec<(usize, f32)> = segments
        .iter()
        .map(|s| {
            lines
                .iter()
                .map(|&l| (s.y - l).abs())
                .enumerate()
                .fold((0, f32::INFINITY), |best, (i, d)| {
                    if d < best.1 {
                        (i, d)
                    } else {
                        best
                    }
                })
        })
        .collect();

    let distances: Vec<f32> = nearest.iter().map(|&(_, d)| d).collect();
    let cutoff = mean(&distances) + tolerance * std_dev(&distances);

    Ok(nearest
        .into_iter()
        .map(|(line, d)| (d <= cutoff).then_some(line))
        .collect())
}

/// Line assignment with a configured outlier tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LineAssigner {
    /// Multiple of the distance standard deviation tolerated above the mean.
    pub tolerance: f32,
}

impl Default for LineAssigner {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_NEARLINE_TOLERANCE,
        }
    }
}

impl LineAssigner {
    /// Assigner with the given tolerance.
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// See [`guess_segments_lines`].
    pub fn assign(&self, segments: &[Segment], lines: &[f32]) -> Result<Vec<Option<usize>>> {
        guess_segments_lines(segments, lines, self.tolerance)
    }
}
