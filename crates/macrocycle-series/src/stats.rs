//! Descriptive moments of a sample.

use crate::error::StatsError;

/// Arithmetic mean. `None` for an empty sample.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (divides by `n − 1`). `None` below two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|&x| (x - m).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Median, averaging the two middle values for even-length samples.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Summary of a sample's location, spread and shape.
///
/// Skewness and kurtosis are the biased moment estimators
/// (`g1 = m3 / m2^1.5`, `g2 = m4 / m2² − 3`), so a normal sample has
/// kurtosis near zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// Number of observations.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Sample standard deviation; undefined for a single observation.
    pub std: Option<f64>,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
    /// Fisher-Pearson skewness; undefined for a constant sample.
    pub skewness: Option<f64>,
    /// Excess kurtosis; undefined for a constant sample.
    pub kurtosis: Option<f64>,
}

impl DescriptiveStats {
    /// Compute the summary of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySample`] if `values` is empty.
    pub fn compute(values: &[f64]) -> Result<Self, StatsError> {
        let n = values.len();
        let mean = mean(values).ok_or(StatsError::EmptySample)?;
        let median = median(values).ok_or(StatsError::EmptySample)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let nf = n as f64;
        let central = |p: i32| values.iter().map(|&x| (x - mean).powi(p)).sum::<f64>() / nf;
        let m2 = central(2);
        let (skewness, kurtosis) = if m2 > 0.0 {
            (
                Some(central(3) / m2.powf(1.5)),
                Some(central(4) / (m2 * m2) - 3.0),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            n,
            mean,
            median,
            std: sample_std(values),
            min,
            max,
            skewness,
            kurtosis,
        })
    }
}
