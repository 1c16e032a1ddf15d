//! Annual series types, Hodrick-Prescott decomposition and descriptive statistics.
//!
//! Pure math library with no I/O. Provides validated year-indexed series,
//! an exact Hodrick-Prescott trend/cycle filter, descriptive moments,
//! rolling standard deviation, growth rates and an OLS trend test.

mod error;
mod growth;
mod hp;
mod regression;
mod rolling;
mod series;
mod stats;

pub use error::{DecomposeError, SeriesError, StatsError};
pub use growth::{pct_change, ratio_pct};
pub use hp::{Decomposition, HpFilter};
pub use regression::LinearFit;
pub use rolling::rolling_std;
pub use series::{AnnualSeries, PartialSeries, Year};
pub use stats::{DescriptiveStats, mean, median, sample_std};
