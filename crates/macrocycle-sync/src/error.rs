use macrocycle_series::{SeriesError, Year};

/// Errors from cycle normalization, alignment and correlation analysis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// Returned when a series has too few defined values to normalize.
    #[error("need at least {min} defined values to normalize, got {n}")]
    TooFewValues {
        /// Number of defined values.
        n: usize,
        /// Minimum required.
        min: usize,
    },

    /// Returned when every defined value is identical (zero standard deviation).
    #[error("cannot normalize a constant series ({n} values equal to {value})")]
    ConstantSeries {
        /// Number of defined values.
        n: usize,
        /// The repeated value.
        value: f64,
    },

    /// Returned when a rolling window of zero is requested.
    #[error("rolling window must be at least 1, got {window}")]
    InvalidWindow {
        /// The rejected window.
        window: usize,
    },

    /// Returned when min_periods is zero or exceeds the window.
    #[error("min_periods must be in 1..={window}, got {min_periods}")]
    InvalidMinPeriods {
        /// The rejected threshold.
        min_periods: usize,
        /// The rolling window it was paired with.
        window: usize,
    },

    /// Returned when a period ends before it starts or has an empty name.
    #[error("invalid period \"{name}\": [{start}, {end}]")]
    InvalidPeriod {
        /// Period name.
        name: String,
        /// First year.
        start: Year,
        /// Last year.
        end: Year,
    },

    /// Returned when a period specification string cannot be parsed.
    #[error("cannot parse period \"{raw}\": expected NAME=START:END or START-END")]
    PeriodSyntax {
        /// The rejected text.
        raw: String,
    },

    /// Returned when two periods share a name.
    #[error("duplicate period name \"{name}\"")]
    DuplicatePeriod {
        /// The repeated name.
        name: String,
    },

    /// Returned when two periods cover a common year.
    #[error("periods \"{first}\" and \"{second}\" overlap")]
    OverlappingPeriods {
        /// Earlier period.
        first: String,
        /// Later period.
        second: String,
    },

    /// Returned when a fill policy name is not recognised.
    #[error("unknown fill policy \"{name}\" (expected none or ffill-bfill)")]
    UnknownFillPolicy {
        /// The rejected name.
        name: String,
    },

    /// Wraps a series error raised while building a derived series.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
