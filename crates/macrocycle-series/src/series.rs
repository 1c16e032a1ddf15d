//! Year-indexed series types with validation guarantees.

use crate::error::SeriesError;

/// Calendar year used as the index of every series.
pub type Year = i32;

/// Check that `years` is strictly increasing.
pub(crate) fn check_years(years: &[Year]) -> Result<(), SeriesError> {
    for (index, pair) in years.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(SeriesError::NonIncreasingYear {
                index: index + 1,
                previous: pair[0],
                year: pair[1],
            });
        }
    }
    Ok(())
}

/// Map a computed value to `None` when it is not finite.
pub(crate) fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Owned, validated annual series.
///
/// Guaranteed non-empty, with strictly increasing years and all values finite.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSeries {
    years: Vec<Year>,
    values: Vec<f64>,
}

impl AnnualSeries {
    /// Create a new annual series from parallel year and value vectors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::EmptySeries`] | No observations |
    /// | [`SeriesError::LengthMismatch`] | `years.len() != values.len()` |
    /// | [`SeriesError::NonIncreasingYear`] | A year repeats or goes backwards |
    /// | [`SeriesError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(years: Vec<Year>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if years.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                years: years.len(),
                values: values.len(),
            });
        }
        if years.is_empty() {
            return Err(SeriesError::EmptySeries);
        }
        check_years(&years)?;
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFiniteValue { year: years[i] });
        }
        Ok(Self { years, values })
    }

    /// Create a series from data that is already known to satisfy the invariants.
    pub(crate) fn new_unchecked(years: Vec<Year>, values: Vec<f64>) -> Self {
        debug_assert_eq!(years.len(), values.len());
        debug_assert!(!years.is_empty());
        debug_assert!(check_years(&years).is_ok());
        Self { years, values }
    }

    /// Create a new annual series from `(year, value)` pairs.
    ///
    /// # Errors
    ///
    /// Same conditions as [`AnnualSeries::new`].
    pub fn from_pairs<I>(pairs: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (Year, f64)>,
    {
        let (years, values) = pairs.into_iter().unzip();
        Self::new(years, values)
    }

    /// Return the year index.
    #[must_use]
    pub fn years(&self) -> &[Year] {
        &self.years
    }

    /// Return the observed values in year order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Return the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return true if the series has no observations.
    ///
    /// Always `false` for series built through [`AnnualSeries::new`]; provided
    /// to satisfy the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the first year of the index.
    #[must_use]
    pub fn first_year(&self) -> Year {
        self.years[0]
    }

    /// Return the last year of the index.
    #[must_use]
    pub fn last_year(&self) -> Year {
        self.years[self.years.len() - 1]
    }

    /// Look up the value observed in `year`.
    #[must_use]
    pub fn get(&self, year: Year) -> Option<f64> {
        self.years
            .binary_search(&year)
            .ok()
            .map(|i| self.values[i])
    }

    /// Iterate over `(year, value)` pairs in year order.
    pub fn iter(&self) -> impl Iterator<Item = (Year, f64)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }

    /// Restrict the series to the inclusive `[start, end]` year range.
    ///
    /// Returns `None` when no observation falls inside the range.
    #[must_use]
    pub fn between(&self, start: Year, end: Year) -> Option<Self> {
        let lo = self.years.partition_point(|&y| y < start);
        let hi = self.years.partition_point(|&y| y <= end);
        if lo >= hi {
            return None;
        }
        Some(Self {
            years: self.years[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        })
    }

    /// Consume and return the year and value vectors.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Year>, Vec<f64>) {
        (self.years, self.values)
    }
}

/// Year-indexed series whose entries may be explicitly undefined.
///
/// `None` marks an undefined result (zero denominator, insufficient
/// window, missing cell). Defined entries are always finite. Years are
/// strictly increasing; the series may be empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartialSeries {
    years: Vec<Year>,
    values: Vec<Option<f64>>,
}

impl PartialSeries {
    /// Create a new partial series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::LengthMismatch`] | `years.len() != values.len()` |
    /// | [`SeriesError::NonIncreasingYear`] | A year repeats or goes backwards |
    /// | [`SeriesError::NonFiniteValue`] | A defined entry is NaN or infinite |
    pub fn new(years: Vec<Year>, values: Vec<Option<f64>>) -> Result<Self, SeriesError> {
        if years.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                years: years.len(),
                values: values.len(),
            });
        }
        check_years(&years)?;
        if let Some(i) = values
            .iter()
            .position(|v| v.is_some_and(|x| !x.is_finite()))
        {
            return Err(SeriesError::NonFiniteValue { year: years[i] });
        }
        Ok(Self { years, values })
    }

    /// Build from a year index that is already known to be valid.
    pub(crate) fn from_checked(years: Vec<Year>, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(years.len(), values.len());
        debug_assert!(check_years(&years).is_ok());
        debug_assert!(values.iter().flatten().all(|v| v.is_finite()));
        Self { years, values }
    }

    /// Return the year index.
    #[must_use]
    pub fn years(&self) -> &[Year] {
        &self.years
    }

    /// Return the entries in year order.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Return the number of entries, defined or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return true if the series has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the number of defined entries.
    #[must_use]
    pub fn n_defined(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Look up the entry for `year`.
    ///
    /// The outer `Option` is `None` when `year` is not in the index; the
    /// inner one is `None` when the entry is undefined.
    #[must_use]
    pub fn get(&self, year: Year) -> Option<Option<f64>> {
        self.years
            .binary_search(&year)
            .ok()
            .map(|i| self.values[i])
    }

    /// Iterate over `(year, entry)` pairs in year order.
    pub fn iter(&self) -> impl Iterator<Item = (Year, Option<f64>)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }

    /// Restrict the series to the inclusive `[start, end]` year range.
    #[must_use]
    pub fn between(&self, start: Year, end: Year) -> Self {
        let lo = self.years.partition_point(|&y| y < start);
        let hi = self.years.partition_point(|&y| y <= end).max(lo);
        Self {
            years: self.years[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        }
    }

    /// Drop undefined entries, returning the defined ones as an [`AnnualSeries`].
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::EmptySeries`] when no entry is defined.
    pub fn drop_undefined(&self) -> Result<AnnualSeries, SeriesError> {
        AnnualSeries::from_pairs(self.iter().filter_map(|(y, v)| v.map(|v| (y, v))))
    }
}

impl From<AnnualSeries> for PartialSeries {
    fn from(series: AnnualSeries) -> Self {
        let (years, values) = series.into_parts();
        Self {
            years,
            values: values.into_iter().map(Some).collect(),
        }
    }
}

impl From<&AnnualSeries> for PartialSeries {
    fn from(series: &AnnualSeries) -> Self {
        Self {
            years: series.years.clone(),
            values: series.values.iter().copied().map(Some).collect(),
        }
    }
}
