//! Pearson correlation: global and rolling.

use macrocycle_series::PartialSeries;
use tracing::{debug, instrument};

use crate::align::AlignedPair;
use crate::error::SyncError;

/// Pearson correlation coefficient of paired observations.
///
/// Returns `None` when fewer than two pairs are given or either side has
/// zero variance; the coefficient is undefined there, not zero.
#[must_use]
pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let pairs: Vec<(f64, f64)> = pairs.into_iter().collect();
    let n = pairs.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / nf;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = cov / (var_x * var_y).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Rolling Pearson correlation over the trailing `window` aligned years.
///
/// Windows are positional over the aligned index and shrink at the start
/// of the sample. A year's value is undefined when its window holds fewer
/// than `min_periods` years where both sides are defined, or when the
/// coefficient itself is undefined.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SyncError::InvalidWindow`] | `window` is zero |
/// | [`SyncError::InvalidMinPeriods`] | `min_periods` is zero or exceeds `window` |
#[instrument(skip(pair), fields(n = pair.len()))]
pub fn rolling_correlation(
    pair: &AlignedPair,
    window: usize,
    min_periods: usize,
) -> Result<PartialSeries, SyncError> {
    validate_window(window, min_periods)?;

    let (left, right) = (pair.left(), pair.right());
    let values: Vec<Option<f64>> = (0..pair.len())
        .map(|i| {
            let lo = (i + 1).saturating_sub(window);
            let window_pairs: Vec<(f64, f64)> = left[lo..=i]
                .iter()
                .zip(&right[lo..=i])
                .filter_map(|(l, r)| Some(((*l)?, (*r)?)))
                .collect();
            if window_pairs.len() < min_periods {
                None
            } else {
                pearson(window_pairs)
            }
        })
        .collect();

    let n_defined = values.iter().filter(|v| v.is_some()).count();
    debug!(n_defined, "rolling correlation computed");
    Ok(PartialSeries::new(pair.years().to_vec(), values)?)
}

pub(crate) fn validate_window(window: usize, min_periods: usize) -> Result<(), SyncError> {
    if window == 0 {
        return Err(SyncError::InvalidWindow { window });
    }
    if min_periods == 0 || min_periods > window {
        return Err(SyncError::InvalidMinPeriods {
            min_periods,
            window,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use macrocycle_series::Year;

    use super::*;
    use crate::align::align;

    fn pair_of(left: Vec<Option<f64>>, right: Vec<Option<f64>>) -> AlignedPair {
        let years: Vec<Year> = (2000..2000 + left.len() as Year).collect();
        let l = PartialSeries::new(years.clone(), left).unwrap();
        let r = PartialSeries::new(years, right).unwrap();
        align(&l, &r)
    }

    #[test]
    fn perfect_positive() {
        let r = pearson(vec![(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perfect_negative() {
        let r = pearson(vec![(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn undefined_below_two_pairs() {
        assert_eq!(pearson(vec![(1.0, 1.0)]), None);
        assert_eq!(pearson(Vec::new()), None);
    }

    #[test]
    fn undefined_for_zero_variance() {
        assert_eq!(pearson(vec![(1.0, 5.0), (2.0, 5.0), (3.0, 5.0)]), None);
    }

    #[test]
    fn rolling_undefined_before_min_periods() {
        let p = pair_of(
            (0..8).map(|i| Some(i as f64)).collect(),
            (0..8).map(|i| Some((i * i) as f64)).collect(),
        );
        let r = rolling_correlation(&p, 5, 3).unwrap();
        assert_eq!(r.len(), 8);
        assert_eq!(r.values()[0], None);
        assert_eq!(r.values()[1], None);
        for v in &r.values()[2..] {
            assert!(v.unwrap() > 0.9);
        }
    }

    #[test]
    fn rolling_counts_only_valid_pairs() {
        // Every window of 5 holds at most two years defined on both sides.
        let p = pair_of(
            vec![Some(1.0), None, Some(3.0), None, None, Some(6.0)],
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(6.0)],
        );
        let strict = rolling_correlation(&p, 5, 3).unwrap();
        assert!(strict.values().iter().all(Option::is_none));

        let loose = rolling_correlation(&p, 5, 2).unwrap();
        assert_eq!(loose.values()[0], None);
        assert_eq!(loose.values()[1], None);
        assert!((loose.values()[2].unwrap() - 1.0).abs() < 1e-12);
        assert!((loose.values()[5].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rolling_uses_trailing_window_only() {
        // First half co-moves, second half moves inversely.
        let left: Vec<Option<f64>> = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0]
            .iter()
            .map(|&v| Some(v))
            .collect();
        let right: Vec<Option<f64>> = [1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0]
            .iter()
            .map(|&v| Some(v))
            .collect();
        let r = rolling_correlation(&pair_of(left, right), 3, 3).unwrap();
        assert!((r.values()[3].unwrap() - 1.0).abs() < 1e-12);
        assert!((r.values()[7].unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_window_parameters() {
        let p = pair_of(vec![Some(1.0)], vec![Some(1.0)]);
        assert!(matches!(
            rolling_correlation(&p, 0, 0),
            Err(SyncError::InvalidWindow { window: 0 })
        ));
        assert!(matches!(
            rolling_correlation(&p, 3, 4),
            Err(SyncError::InvalidMinPeriods { min_periods: 4, window: 3 })
        ));
        assert!(matches!(
            rolling_correlation(&p, 3, 0),
            Err(SyncError::InvalidMinPeriods { .. })
        ));
    }
}
