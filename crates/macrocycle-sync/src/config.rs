//! Configuration builder for the synchronization analysis.

use macrocycle_series::PartialSeries;
use tracing::{info, instrument};

use crate::align::{FillPolicy, align};
use crate::correlation::{pearson, rolling_correlation, validate_window};
use crate::error::SyncError;
use crate::normalize::z_normalize;
use crate::period::{PeriodSet, period_correlations};
use crate::result::SyncResult;

/// Configuration for comparing two countries' cyclical components.
///
/// Construct via [`SyncConfig::new`] or [`SyncConfig::default`], then chain
/// `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter     | Default                          |
/// |---------------|----------------------------------|
/// | `window`      | 5                                |
/// | `min_periods` | 3                                |
/// | `fill_policy` | `FillPolicy::ForwardBackward`    |
/// | `periods`     | [`PeriodSet::standard`]          |
#[derive(Debug, Clone)]
pub struct SyncConfig {
    window: usize,
    min_periods: usize,
    fill_policy: FillPolicy,
    periods: PeriodSet,
}

impl SyncConfig {
    /// Rolling correlation window in years.
    pub const DEFAULT_WINDOW: usize = 5;
    /// Minimum valid pairs for a rolling correlation value.
    pub const DEFAULT_MIN_PERIODS: usize = 3;

    /// Create a configuration with the given rolling window parameters.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SyncError::InvalidWindow`] | `window` is zero |
    /// | [`SyncError::InvalidMinPeriods`] | `min_periods` is zero or exceeds `window` |
    pub fn new(window: usize, min_periods: usize) -> Result<Self, SyncError> {
        validate_window(window, min_periods)?;
        Ok(Self {
            window,
            min_periods,
            fill_policy: FillPolicy::default(),
            periods: PeriodSet::standard(),
        })
    }

    /// Set how gaps left by the year join are treated.
    #[must_use]
    pub fn with_fill_policy(mut self, fill_policy: FillPolicy) -> Self {
        self.fill_policy = fill_policy;
        self
    }

    /// Replace the period slices.
    #[must_use]
    pub fn with_periods(mut self, periods: PeriodSet) -> Self {
        self.periods = periods;
        self
    }

    /// Return the rolling window.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Return the rolling min-periods threshold.
    #[must_use]
    pub fn min_periods(&self) -> usize {
        self.min_periods
    }

    /// Return the gap fill policy.
    #[must_use]
    pub fn fill_policy(&self) -> FillPolicy {
        self.fill_policy
    }

    /// Return the period slices.
    #[must_use]
    pub fn periods(&self) -> &PeriodSet {
        &self.periods
    }

    /// Compare two cyclical series, typically percentage deviations from trend.
    ///
    /// Each input is z-normalized over its own range, then the two are
    /// joined on year. Rolling correlation runs on the joined pair before
    /// gap filling; global and period correlations run after it.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SyncError::TooFewValues`] | An input has fewer than two defined values |
    /// | [`SyncError::ConstantSeries`] | An input has zero variance |
    #[instrument(skip_all, fields(window = self.window, min_periods = self.min_periods, fill = %self.fill_policy))]
    pub fn analyze(
        &self,
        left: &PartialSeries,
        right: &PartialSeries,
    ) -> Result<SyncResult, SyncError> {
        let left_normalized = z_normalize(left)?;
        let right_normalized = z_normalize(right)?;

        let joined = align(&left_normalized, &right_normalized);
        let rolling = rolling_correlation(&joined, self.window, self.min_periods)?;
        let aligned = joined.fill(self.fill_policy);

        let global = pearson(aligned.pairs());
        let n_pairs = aligned.n_pairs();
        let periods = period_correlations(&aligned, &self.periods);

        info!(
            n_pairs,
            global = ?global,
            filled = aligned.filled(),
            n_periods = periods.len(),
            "synchronization analysis complete"
        );

        Ok(SyncResult {
            left_normalized,
            right_normalized,
            aligned,
            global,
            n_pairs,
            rolling,
            periods,
            fill_policy: self.fill_policy,
        })
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window: Self::DEFAULT_WINDOW,
            min_periods: Self::DEFAULT_MIN_PERIODS,
            fill_policy: FillPolicy::default(),
            periods: PeriodSet::standard(),
        }
    }
}
