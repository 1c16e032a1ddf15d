//! Growth rates and composition ratios.

use crate::series::{PartialSeries, defined};

/// Period-over-period percentage change: `100 × (x_t / x_{t−1} − 1)`.
///
/// Changes are taken between consecutive entries of the index. The first
/// entry is undefined, as is any entry whose current or previous value is
/// undefined or whose previous value is zero.
#[must_use]
pub fn pct_change(series: &PartialSeries) -> PartialSeries {
    let values = series.values();
    let changes = (0..values.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            match (values[i - 1], values[i]) {
                (Some(prev), Some(curr)) if prev != 0.0 => defined((curr / prev - 1.0) * 100.0),
                _ => None,
            }
        })
        .collect();
    PartialSeries::from_checked(series.years().to_vec(), changes)
}

/// Ratio of two series in percent: `100 × numerator / denominator`.
///
/// The result covers the years present in both inputs. Entries are
/// undefined where either side is undefined or the denominator is zero.
#[must_use]
pub fn ratio_pct(numerator: &PartialSeries, denominator: &PartialSeries) -> PartialSeries {
    let mut years = Vec::with_capacity(numerator.len().min(denominator.len()));
    let mut values = Vec::with_capacity(years.capacity());
    for (year, num) in numerator.iter() {
        let Some(den) = denominator.get(year) else {
            continue;
        };
        years.push(year);
        values.push(match (num, den) {
            (Some(n), Some(d)) if d != 0.0 => defined(100.0 * n / d),
            _ => None,
        });
    }
    PartialSeries::from_checked(years, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(start: i32, values: Vec<Option<f64>>) -> PartialSeries {
        let years = (start..start + values.len() as i32).collect();
        PartialSeries::new(years, values).unwrap()
    }

    #[test]
    fn pct_change_first_entry_undefined() {
        let s = partial(2000, vec![Some(100.0), Some(110.0), Some(99.0)]);
        let g = pct_change(&s);
        assert_eq!(g.values()[0], None);
        assert!((g.values()[1].unwrap() - 10.0).abs() < 1e-12);
        assert!((g.values()[2].unwrap() + 10.0).abs() < 1e-12);
    }

    #[test]
    fn pct_change_after_zero_is_undefined() {
        let s = partial(2000, vec![Some(0.0), Some(5.0), Some(10.0)]);
        let g = pct_change(&s);
        assert_eq!(g.values()[1], None);
        assert!((g.values()[2].unwrap() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn pct_change_around_missing_is_undefined() {
        let s = partial(2000, vec![Some(1.0), None, Some(2.0), Some(3.0)]);
        let g = pct_change(&s);
        assert_eq!(g.values()[1], None);
        assert_eq!(g.values()[2], None);
        assert!(g.values()[3].is_some());
    }

    #[test]
    fn ratio_pct_joins_on_years() {
        let num = partial(2000, vec![Some(1.0), Some(2.0), Some(3.0)]);
        let den = partial(2001, vec![Some(4.0), Some(0.0), Some(8.0)]);
        let r = ratio_pct(&num, &den);
        assert_eq!(r.years(), &[2001, 2002]);
        assert!((r.values()[0].unwrap() - 50.0).abs() < 1e-12);
        assert_eq!(r.values()[1], None);
    }
}
