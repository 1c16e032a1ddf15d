//! Result type of a synchronization analysis.

use macrocycle_series::PartialSeries;

use crate::align::{AlignedPair, FillPolicy};
use crate::period::PeriodCorrelation;

/// Outcome of [`SyncConfig::analyze`](crate::SyncConfig::analyze).
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// Left input after z-normalization, on its own year index.
    pub left_normalized: PartialSeries,
    /// Right input after z-normalization, on its own year index.
    pub right_normalized: PartialSeries,
    /// Normalized inputs joined on year, after gap filling.
    pub aligned: AlignedPair,
    /// Pearson correlation over every aligned year defined on both sides.
    pub global: Option<f64>,
    /// Number of pairs behind [`SyncResult::global`].
    pub n_pairs: usize,
    /// Rolling correlation, one entry per aligned year.
    pub rolling: PartialSeries,
    /// Correlation of each configured period slice.
    pub periods: Vec<PeriodCorrelation>,
    /// Gap fill policy that was applied.
    pub fill_policy: FillPolicy,
}

impl SyncResult {
    /// Return the number of cells manufactured by gap filling.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.aligned.filled()
    }

    /// Return the period with the strongest defined correlation, if any.
    #[must_use]
    pub fn strongest_period(&self) -> Option<&PeriodCorrelation> {
        self.periods
            .iter()
            .filter_map(|p| Some((p, p.correlation?)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(p, _)| p)
    }
}
