//! Error types for series construction, decomposition and statistics.

/// Errors from annual series construction and validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when an empty set of observations is provided.
    #[error("annual series must be non-empty")]
    EmptySeries,

    /// Returned when the year and value vectors differ in length.
    #[error("year index has {years} entries but {values} values were provided")]
    LengthMismatch {
        /// Number of years supplied.
        years: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// Returned when a year is not strictly greater than its predecessor.
    #[error("years must be strictly increasing: {year} follows {previous} at index {index}")]
    NonIncreasingYear {
        /// Position of the offending year.
        index: usize,
        /// The year before it.
        previous: i32,
        /// The offending year.
        year: i32,
    },

    /// Returned when a value is NaN, infinity, or negative infinity.
    #[error("non-finite value in year {year}")]
    NonFiniteValue {
        /// Year of the first non-finite value found.
        year: i32,
    },
}

/// Errors from Hodrick-Prescott trend/cycle decomposition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecomposeError {
    /// Returned when the smoothing parameter is negative or not finite.
    #[error("smoothing parameter must be finite and >= 0, got {lambda}")]
    InvalidLambda {
        /// The rejected smoothing parameter.
        lambda: f64,
    },

    /// Returned when the series is too short for the filter to be well-conditioned.
    #[error("HP filter needs at least {min} observations, got {len}")]
    TooShort {
        /// Number of observations provided.
        len: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when the penalized system loses positive definiteness
    /// (only reachable through extreme floating-point cancellation).
    #[error("HP system is not positive definite at row {row}")]
    NotPositiveDefinite {
        /// Row at which the Cholesky pivot became non-positive.
        row: usize,
    },

    /// Wraps a series error raised while assembling the components.
    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Errors from descriptive statistics, rolling statistics and regression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when a statistic is requested over zero observations.
    #[error("cannot compute statistics of an empty sample")]
    EmptySample,

    /// Returned when a rolling window of zero is requested.
    #[error("window must be at least 1, got {window}")]
    InvalidWindow {
        /// The rejected window length.
        window: usize,
    },

    /// Returned when a regression has too few points to estimate its error.
    #[error("regression needs at least {min} points, got {n}")]
    TooFewPoints {
        /// Number of points provided.
        n: usize,
        /// Minimum number of points required.
        min: usize,
    },

    /// Returned when the regressor has zero variance.
    #[error("regressor is constant; slope is undefined")]
    ConstantRegressor,

    /// Returned when the regressor and response differ in length.
    #[error("regressor has {x} values but response has {y}")]
    LengthMismatch {
        /// Length of the regressor.
        x: usize,
        /// Length of the response.
        y: usize,
    },

    /// Wraps a series error raised while building a derived series.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
