//! Z-score normalization of cyclical components.

use macrocycle_series::{PartialSeries, mean, sample_std};

use crate::error::SyncError;

/// Z-normalize the defined entries of a series: `(x − mean) / std`.
///
/// Mean and sample standard deviation (n − 1) are taken over the series'
/// own defined values; undefined entries stay undefined. Each series is
/// normalized over its full range, before any alignment with another
/// series.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SyncError::TooFewValues`] | Fewer than two defined values |
/// | [`SyncError::ConstantSeries`] | All defined values are equal |
pub fn z_normalize(series: &PartialSeries) -> Result<PartialSeries, SyncError> {
    let data: Vec<f64> = series.values().iter().flatten().copied().collect();
    let (Some(m), Some(sd)) = (mean(&data), sample_std(&data)) else {
        return Err(SyncError::TooFewValues {
            n: data.len(),
            min: 2,
        });
    };
    if sd == 0.0 {
        return Err(SyncError::ConstantSeries {
            n: data.len(),
            value: data[0],
        });
    }

    let normalized = series
        .values()
        .iter()
        .map(|v| v.map(|x| (x - m) / sd))
        .collect();
    Ok(PartialSeries::new(series.years().to_vec(), normalized)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(values: Vec<Option<f64>>) -> PartialSeries {
        let years = (1978..1978 + values.len() as i32).collect();
        PartialSeries::new(years, values).unwrap()
    }

    fn defined(p: &PartialSeries) -> Vec<f64> {
        p.values().iter().flatten().copied().collect()
    }

    #[test]
    fn zero_mean_unit_sample_std() {
        let p = partial(vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
        let z = z_normalize(&p).unwrap();
        let data = defined(&z);
        assert!(mean(&data).unwrap().abs() < 1e-12);
        assert!((sample_std(&data).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalizing_twice_is_idempotent() {
        let p = partial(vec![Some(3.0), Some(-1.5), Some(7.25), None, Some(0.5), Some(2.0)]);
        let once = z_normalize(&p).unwrap();
        let twice = z_normalize(&once).unwrap();
        assert_eq!(once.years(), twice.years());
        for (a, b) in once.values().iter().zip(twice.values()) {
            match (a, b) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-12, "{a} vs {b}"),
                (None, None) => {}
                other => panic!("definedness changed: {other:?}"),
            }
        }
    }

    #[test]
    fn undefined_entries_stay_undefined() {
        let p = partial(vec![Some(1.0), None, Some(3.0)]);
        let z = z_normalize(&p).unwrap();
        assert_eq!(z.values()[1], None);
        assert!(z.values()[0].unwrap() < 0.0);
        assert!(z.values()[2].unwrap() > 0.0);
    }

    #[test]
    fn constant_series_rejected() {
        let p = partial(vec![Some(2.0), Some(2.0), Some(2.0)]);
        assert!(matches!(
            z_normalize(&p),
            Err(SyncError::ConstantSeries { n: 3, value: 2.0 })
        ));
    }

    #[test]
    fn single_value_rejected() {
        let p = partial(vec![None, Some(2.0)]);
        assert!(matches!(
            z_normalize(&p),
            Err(SyncError::TooFewValues { n: 1, min: 2 })
        ));
    }
}
