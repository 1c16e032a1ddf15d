//! Rolling-window statistics.

use crate::error::StatsError;
use crate::series::{AnnualSeries, PartialSeries, defined};
use crate::stats::sample_std;

/// Rolling sample standard deviation over the trailing `window` observations.
///
/// Windows are positional (the last `window` entries of the index, not the
/// last `window` calendar years). Only full windows produce a value, so the
/// first `window − 1` entries are undefined. A window of one observation is
/// undefined throughout because the sample standard deviation needs two.
///
/// # Errors
///
/// Returns [`StatsError::InvalidWindow`] if `window` is zero.
pub fn rolling_std(series: &AnnualSeries, window: usize) -> Result<PartialSeries, StatsError> {
    if window == 0 {
        return Err(StatsError::InvalidWindow { window });
    }
    let values = series.values();
    let out = (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                sample_std(&values[i + 1 - window..=i]).and_then(defined)
            }
        })
        .collect();
    Ok(PartialSeries::from_checked(series.years().to_vec(), out))
}
