//! Explicit year alignment of two series and the gap fill policy.

use std::fmt;
use std::str::FromStr;

use macrocycle_series::{PartialSeries, Year};
use tracing::{debug, info, instrument, warn};

use crate::error::SyncError;

/// How gaps left after the inner join are treated before paired statistics.
///
/// Carrying values forward and backward keeps every aligned year usable
/// but repeats observations, which can inflate correlation on sparse
/// data. The fill count is always reported so the effect is auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// Leave gaps undefined; paired statistics skip them.
    None,
    /// Carry the last known value forward, then the first known value backward.
    #[default]
    ForwardBackward,
}

impl FromStr for FillPolicy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "ffill-bfill" => Ok(Self::ForwardBackward),
            other => Err(SyncError::UnknownFillPolicy {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::ForwardBackward => "ffill-bfill",
        })
    }
}

/// Two series on a shared year index.
///
/// `years[i]` corresponds to `left[i]` and `right[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedPair {
    years: Vec<Year>,
    left: Vec<Option<f64>>,
    right: Vec<Option<f64>>,
    filled: usize,
}

impl AlignedPair {
    /// Return the shared year index.
    #[must_use]
    pub fn years(&self) -> &[Year] {
        &self.years
    }

    /// Return the left-hand entries.
    #[must_use]
    pub fn left(&self) -> &[Option<f64>] {
        &self.left
    }

    /// Return the right-hand entries.
    #[must_use]
    pub fn right(&self) -> &[Option<f64>] {
        &self.right
    }

    /// Return the number of aligned years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Return true if no year is shared by both inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Return the number of cells filled by [`AlignedPair::fill`].
    #[must_use]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Iterate over `(left, right)` for years where both sides are defined.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.left
            .iter()
            .zip(&self.right)
            .filter_map(|(l, r)| Some(((*l)?, (*r)?)))
    }

    /// Return the number of years where both sides are defined.
    #[must_use]
    pub fn n_pairs(&self) -> usize {
        self.pairs().count()
    }

    /// Restrict to the inclusive `[start, end]` year range.
    #[must_use]
    pub fn between(&self, start: Year, end: Year) -> Self {
        let lo = self.years.partition_point(|&y| y < start);
        let hi = self.years.partition_point(|&y| y <= end).max(lo);
        Self {
            years: self.years[lo..hi].to_vec(),
            left: self.left[lo..hi].to_vec(),
            right: self.right[lo..hi].to_vec(),
            filled: 0,
        }
    }

    /// Apply a gap fill policy to both sides.
    #[must_use]
    pub fn fill(mut self, policy: FillPolicy) -> Self {
        if policy == FillPolicy::None {
            return self;
        }
        let left = forward_backward(&mut self.left);
        let right = forward_backward(&mut self.right);
        self.filled += left + right;
        if self.filled > 0 {
            warn!(
                filled_left = left,
                filled_right = right,
                %policy,
                "filled gaps in aligned series; repeated values can inflate correlation"
            );
        } else {
            debug!(%policy, "no gaps to fill");
        }
        self
    }
}

/// Fill `None` entries forward then backward in place; return how many were filled.
fn forward_backward(values: &mut [Option<f64>]) -> usize {
    let mut filled = 0;
    let mut last = None;
    for v in values.iter_mut() {
        match *v {
            Some(x) => last = Some(x),
            None if last.is_some() => {
                *v = last;
                filled += 1;
            }
            None => {}
        }
    }
    let mut next = None;
    for v in values.iter_mut().rev() {
        match *v {
            Some(x) => next = Some(x),
            None if next.is_some() => {
                *v = next;
                filled += 1;
            }
            None => {}
        }
    }
    filled
}

/// Inner-join two series on year.
///
/// Years present in only one input are dropped; the number dropped from
/// each side is logged.
#[instrument(skip_all, fields(n_left = left.len(), n_right = right.len()))]
pub fn align(left: &PartialSeries, right: &PartialSeries) -> AlignedPair {
    let mut years = Vec::with_capacity(left.len().min(right.len()));
    let mut lv = Vec::with_capacity(years.capacity());
    let mut rv = Vec::with_capacity(years.capacity());

    let (mut i, mut j) = (0, 0);
    let (ly, ry) = (left.years(), right.years());
    while i < ly.len() && j < ry.len() {
        match ly[i].cmp(&ry[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                years.push(ly[i]);
                lv.push(left.values()[i]);
                rv.push(right.values()[j]);
                i += 1;
                j += 1;
            }
        }
    }

    let dropped_left = left.len() - years.len();
    let dropped_right = right.len() - years.len();
    if dropped_left > 0 || dropped_right > 0 {
        info!(dropped_left, dropped_right, "dropped years not shared by both series");
    }
    debug!(n_aligned = years.len(), "alignment complete");

    AlignedPair {
        years,
        left: lv,
        right: rv,
        filled: 0,
    }
}
