//! Named historical periods and period-sliced correlation.

use std::fmt;
use std::str::FromStr;

use macrocycle_series::Year;

use crate::align::AlignedPair;
use crate::correlation::pearson;
use crate::error::SyncError;

/// A named inclusive year range `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    name: String,
    start: Year,
    end: Year,
}

impl Period {
    /// Create a validated period.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SyncError::InvalidPeriod`] | Name is blank or `end < start` |
    pub fn new(name: impl Into<String>, start: Year, end: Year) -> Result<Self, SyncError> {
        let name = name.into().trim().to_string();
        if name.is_empty() || end < start {
            return Err(SyncError::InvalidPeriod { name, start, end });
        }
        Ok(Self { name, start, end })
    }

    /// Return the period name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the first year.
    #[must_use]
    pub fn start(&self) -> Year {
        self.start
    }

    /// Return the last year.
    #[must_use]
    pub fn end(&self) -> Year {
        self.end
    }

    /// Return true if `year` falls inside the period.
    #[must_use]
    pub fn contains(&self, year: Year) -> bool {
        (self.start..=self.end).contains(&year)
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Parses `NAME=START:END`, or `START-END` which is also used as the name.
impl FromStr for Period {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || SyncError::PeriodSyntax { raw: s.to_string() };
        let (name, range, sep) = match s.split_once('=') {
            Some((name, range)) => (name.trim(), range.trim(), ':'),
            None => (s.trim(), s.trim(), '-'),
        };
        let (start, end) = range.split_once(sep).ok_or_else(syntax)?;
        let start: Year = start.trim().parse().map_err(|_| syntax())?;
        let end: Year = end.trim().parse().map_err(|_| syntax())?;
        Self::new(name, start, end)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}:{}", self.name, self.start, self.end)
    }
}

/// An ordered set of non-overlapping, uniquely named periods.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeriodSet {
    periods: Vec<Period>,
}

impl PeriodSet {
    /// Validate and sort periods by start year.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SyncError::DuplicatePeriod`] | Two periods share a name |
    /// | [`SyncError::OverlappingPeriods`] | Two periods share a year |
    pub fn new(mut periods: Vec<Period>) -> Result<Self, SyncError> {
        for (i, p) in periods.iter().enumerate() {
            if periods[..i].iter().any(|q| q.name == p.name) {
                return Err(SyncError::DuplicatePeriod {
                    name: p.name.clone(),
                });
            }
        }
        periods.sort_by_key(|p| p.start);
        for w in periods.windows(2) {
            if w[0].overlaps(&w[1]) {
                return Err(SyncError::OverlappingPeriods {
                    first: w[0].name.clone(),
                    second: w[1].name.clone(),
                });
            }
        }
        Ok(Self { periods })
    }

    /// Reform-era phases of the Chinese economy from 1978 to 2023.
    #[must_use]
    pub fn standard() -> Self {
        let periods = [
            (1978, 1990),
            (1991, 2001),
            (2002, 2008),
            (2009, 2019),
            (2020, 2023),
        ]
        .into_iter()
        .map(|(start, end)| Period {
            name: format!("{start}-{end}"),
            start,
            end,
        })
        .collect();
        Self { periods }
    }

    /// Iterate over periods in start-year order.
    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter()
    }

    /// Return the number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Return true if the set holds no period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Correlation of one period slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodCorrelation {
    /// Period name.
    pub name: String,
    /// First year.
    pub start: Year,
    /// Last year.
    pub end: Year,
    /// Years in the slice where both sides are defined.
    pub n_pairs: usize,
    /// Pearson coefficient; `None` below two pairs or at zero variance.
    pub correlation: Option<f64>,
}

/// Pearson correlation restricted to each period's years.
#[must_use]
pub fn period_correlations(pair: &AlignedPair, periods: &PeriodSet) -> Vec<PeriodCorrelation> {
    periods
        .iter()
        .map(|p| {
            let slice = pair.between(p.start, p.end);
            PeriodCorrelation {
                name: p.name.clone(),
                start: p.start,
                end: p.end,
                n_pairs: slice.n_pairs(),
                correlation: pearson(slice.pairs()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use macrocycle_series::PartialSeries;

    use super::*;
    use crate::align::align;

    fn pair(start: Year, left: &[f64], right: &[f64]) -> AlignedPair {
        let years: Vec<Year> = (start..start + left.len() as Year).collect();
        let l = PartialSeries::new(years.clone(), left.iter().map(|&v| Some(v)).collect()).unwrap();
        let r = PartialSeries::new(years, right.iter().map(|&v| Some(v)).collect()).unwrap();
        align(&l, &r)
    }

    #[test]
    fn parses_named_and_bare_forms() {
        let named: Period = "boom=2002:2008".parse().unwrap();
        assert_eq!((named.name(), named.start(), named.end()), ("boom", 2002, 2008));

        let bare: Period = "1991-2001".parse().unwrap();
        assert_eq!((bare.name(), bare.start(), bare.end()), ("1991-2001", 1991, 2001));
        assert_eq!(bare.to_string(), "1991-2001=1991:2001");
    }

    #[test]
    fn rejects_malformed_periods() {
        for raw in ["boom", "boom=2002", "boom=x:2008", "2008-2002", "=2000:2001"] {
            assert!(raw.parse::<Period>().is_err(), "{raw} should be rejected");
        }
        assert!(matches!(
            "late=2010:2000".parse::<Period>(),
            Err(SyncError::InvalidPeriod { start: 2010, end: 2000, .. })
        ));
    }

    #[test]
    fn single_year_period_is_valid() {
        let p = Period::new("covid", 2020, 2020).unwrap();
        assert!(p.contains(2020));
        assert!(!p.contains(2021));
    }

    #[test]
    fn set_rejects_duplicates_and_overlaps() {
        let a = Period::new("a", 2000, 2005).unwrap();
        let b = Period::new("a", 2010, 2012).unwrap();
        assert!(matches!(
            PeriodSet::new(vec![a.clone(), b]),
            Err(SyncError::DuplicatePeriod { .. })
        ));

        let c = Period::new("c", 2005, 2008).unwrap();
        assert!(matches!(
            PeriodSet::new(vec![c, a]),
            Err(SyncError::OverlappingPeriods { first, second }) if first == "a" && second == "c"
        ));
    }

    #[test]
    fn set_sorts_by_start() {
        let set = PeriodSet::new(vec![
            Period::new("late", 2010, 2012).unwrap(),
            Period::new("early", 1990, 1999).unwrap(),
        ])
        .unwrap();
        let names: Vec<&str> = set.iter().map(Period::name).collect();
        assert_eq!(names, ["early", "late"]);
    }

    #[test]
    fn standard_periods_cover_reform_era() {
        let set = PeriodSet::standard();
        assert_eq!(set.len(), 5);
        let first = set.iter().next().unwrap();
        assert_eq!((first.name(), first.start(), first.end()), ("1978-1990", 1978, 1990));
        assert!(PeriodSet::new(set.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn slice_with_one_pair_is_undefined() {
        let p = pair(2018, &[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 9.0]);
        let set = PeriodSet::new(vec![
            Period::new("before", 2000, 2018).unwrap(),
            Period::new("after", 2019, 2021).unwrap(),
            Period::new("future", 2030, 2040).unwrap(),
        ])
        .unwrap();
        let out = period_correlations(&p, &set);
        assert_eq!(out[0].n_pairs, 1);
        assert_eq!(out[0].correlation, None);
        assert_eq!(out[1].n_pairs, 3);
        assert!((out[1].correlation.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(out[2].n_pairs, 0);
        assert_eq!(out[2].correlation, None);
    }
}
