//! Text-line inference from segment edges.
//!
//! Two strategies implement [`LineFinder`] and produce the same [`LineModel`]:
//!
//! - [`IndexLineFinder`] clusters segment tops and, independently, segment
//!   bottoms with the [`CompositeSelector`], so the number of lines is chosen by
//!   the quality indices.
//! - [`GapLineFinder`] sorts the edge coordinates and splits the consecutive
//!   gaps into "small" and "large" with 2-means. A large gap starts a new line.
//!   No k range is involved.
//!
//! Both fail with [`Error::InconsistentResult`] when tops and bottoms disagree
//! on the line count.

use crate::cluster::util::{distinct_count, mean};
use crate::cluster::{column, sweep, SweepParams};
use crate::error::{Error, Result};
use crate::geometry::Segment;
use crate::select::{CompositeSelector, SelectorParams};
use log::debug;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Line bands of a page, all sorted ascending.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LineModel {
    tops: Vec<f32>,
    bottoms: Vec<f32>,
    middles: Vec<f32>,
    inter: Vec<f32>,
    topbottoms: Vec<f32>,
    topmiddlebottoms: Vec<f32>,
}

impl LineModel {
    /// Pair line tops with line bottoms and derive middles and separators.
    ///
    /// Both inputs are sorted before pairing.
    ///
    /// # Errors
    ///
    /// [`Error::InconsistentResult`] if the counts differ, [`Error::EmptyInput`]
    /// if both are empty.
    pub fn from_bounds(mut tops: Vec<f32>, mut bottoms: Vec<f32>) -> Result<Self> {
        if tops.len() != bottoms.len() {
            return Err(Error::InconsistentResult {
                tops: tops.len(),
                bottoms: bottoms.len(),
            });
        }
        if tops.is_empty() {
            return Err(Error::EmptyInput);
        }
        tops.sort_by(|a, b| a.total_cmp(b));
        bottoms.sort_by(|a, b| a.total_cmp(b));

        let middles: Vec<f32> = tops
            .iter()
            .zip(bottoms.iter())
            .map(|(t, b)| (t + b) / 2.0)
            .collect();
        let inter: Vec<f32> = bottoms
            .iter()
            .zip(tops.iter().skip(1))
            .map(|(b, t)| (b + t) / 2.0)
            .collect();

        let mut topbottoms: Vec<f32> = tops.iter().chain(bottoms.iter()).copied().collect();
        topbottoms.sort_by(|a, b| a.total_cmp(b));
        let mut topmiddlebottoms: Vec<f32> = tops
            .iter()
            .chain(middles.iter())
            .chain(bottoms.iter())
            .copied()
            .collect();
        topmiddlebottoms.sort_by(|a, b| a.total_cmp(b));

        Ok(Self {
            tops,
            bottoms,
            middles,
            inter,
            topbottoms,
            topmiddlebottoms,
        })
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.tops.len()
    }

    /// Always false for a constructed model.
    pub fn is_empty(&self) -> bool {
        self.tops.is_empty()
    }

    /// Top edge of each line.
    pub fn tops(&self) -> &[f32] {
        &self.tops
    }

    /// Bottom edge of each line.
    pub fn bottoms(&self) -> &[f32] {
        &self.bottoms
    }

    /// `(top + bottom) / 2` per line.
    pub fn middles(&self) -> &[f32] {
        &self.middles
    }

    /// `(bottom[i] + top[i + 1]) / 2`, one fewer than the line count.
    pub fn inter(&self) -> &[f32] {
        &self.inter
    }

    /// Tops and bottoms merged and sorted.
    pub fn topbottoms(&self) -> &[f32] {
        &self.topbottoms
    }

    /// Tops, middles and bottoms merged and sorted.
    pub fn topmiddlebottoms(&self) -> &[f32] {
        &self.topmiddlebottoms
    }
}

impl fmt::Display for LineModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} line(s)", self.len())?;
        for (i, (t, b)) in self.tops.iter().zip(self.bottoms.iter()).enumerate() {
            writeln!(f, "  line {i:>3}: {t:>9.2} .. {b:>9.2}")?;
        }
        Ok(())
    }
}

/// Infers the line structure of a page from its segments.
pub trait LineFinder {
    /// Compute line bands for `segments`.
    fn find_lines(&self, segments: &[Segment]) -> Result<LineModel>;
}

fn tops_of(segments: &[Segment]) -> Vec<f32> {
    segments.iter().map(Segment::top).collect()
}

fn bottoms_of(segments: &[Segment]) -> Vec<f32> {
    segments.iter().map(Segment::bottom).collect()
}

/// Line finder driven by composite quality-index selection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct IndexLineFinder {
    /// Selector configuration, used for both tops and bottoms.
    pub selector: SelectorParams,
}

impl Default for IndexLineFinder {
    fn default() -> Self {
        Self {
            selector: SelectorParams {
                sweep: SweepParams::with_range(3, 50),
                ..SelectorParams::default()
            },
        }
    }
}

impl IndexLineFinder {
    /// Line finder with the given selector configuration.
    pub fn new(selector: SelectorParams) -> Self {
        Self { selector }
    }

    /// Select line coordinates for one set of edges.
    pub fn guess_lines(&self, ys: &[f32]) -> Result<Vec<f32>> {
        let selection = CompositeSelector::new(self.selector.clone()).select(&column(ys))?;
        selection.scalar_centroids()
    }
}

impl LineFinder for IndexLineFinder {
    fn find_lines(&self, segments: &[Segment]) -> Result<LineModel> {
        if segments.is_empty() {
            return Err(Error::EmptyInput);
        }
        let tops = self.guess_lines(&tops_of(segments))?;
        let bottoms = self.guess_lines(&bottoms_of(segments))?;
        debug!(
            "index line finder: {} top line(s), {} bottom line(s)",
            tops.len(),
            bottoms.len()
        );
        LineModel::from_bounds(tops, bottoms)
    }
}

/// Line finder that splits sorted edge coordinates at large gaps.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GapLineFinder {
    /// Gaps at or below this size never start a new line.
    pub min_gap: f32,
    /// k-means settings for the gap split (`k_min`/`k_max` are forced to 2).
    pub sweep: SweepParams,
}

impl Default for GapLineFinder {
    fn default() -> Self {
        Self {
            min_gap: 0.0,
            sweep: SweepParams::with_range(2, 2),
        }
    }
}

impl GapLineFinder {
    /// Line coordinates for one set of edges: the mean of each run of values
    /// between line breaks.
    pub fn guess_lines(&self, ys: &[f32]) -> Result<Vec<f32>> {
        if ys.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut sorted = ys.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let gaps: Vec<f32> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
        let breaks = self.classify_gaps(&gaps)?;

        let mut lines = Vec::new();
        let mut start = 0;
        for (i, &is_break) in breaks.iter().enumerate() {
            if is_break {
                lines.push(mean(&sorted[start..=i]));
                start = i + 1;
            }
        }
        lines.push(mean(&sorted[start..]));
        Ok(lines)
    }

    /// Mark each gap that starts a new line.
    fn classify_gaps(&self, gaps: &[f32]) -> Result<Vec<bool>> {
        let points = column(gaps);
        if points.is_empty() || distinct_count(&points) < 2 {
            // Uniform gaps carry no break.
            return Ok(vec![false; gaps.len()]);
        }

        let params = SweepParams {
            k_min: 2,
            k_max: 2,
            ..self.sweep.clone()
        };
        let fit = sweep(&points, &params)?
            .pop()
            .ok_or_else(|| Error::DegenerateInput("no fit for gap clustering".to_string()))?;
        let large = if fit.centroids[0][0] >= fit.centroids[1][0] {
            0
        } else {
            1
        };

        let breaks: Vec<bool> = gaps
            .iter()
            .zip(fit.belongings.iter())
            .map(|(&g, &label)| label == large && g > self.min_gap)
            .collect();
        debug!(
            "gap line finder: {} break(s) among {} gap(s), centroids {:?}",
            breaks.iter().filter(|&&b| b).count(),
            gaps.len(),
            fit.centroids
        );
        Ok(breaks)
    }
}

impl LineFinder for GapLineFinder {
    fn find_lines(&self, segments: &[Segment]) -> Result<LineModel> {
        if segments.is_empty() {
            return Err(Error::EmptyInput);
        }
        let tops = self.guess_lines(&tops_of(segments))?;
        let bottoms = self.guess_lines(&bottoms_of(segments))?;
        LineModel::from_bounds(tops, bottoms)
    }
}
