//! Typed tables for CSV export.

use std::collections::BTreeSet;
use std::fmt;

use macrocycle_series::{PartialSeries, Year};

use crate::IoError;

/// Text written for an undefined cell.
pub const MISSING: &str = "NA";

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Free text such as a variable name.
    Text(String),
    /// Whole number such as a year or a count.
    Int(i64),
    /// Finite measurement.
    Number(f64),
    /// Undefined result; written as `NA`.
    Missing,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Number(x) if x.is_finite() => write!(f, "{x}"),
            Self::Number(_) | Self::Missing => f.write_str(MISSING),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Self::Number(x)
    }
}

impl From<Option<f64>> for Cell {
    fn from(x: Option<f64>) -> Self {
        x.map_or(Self::Missing, Self::Number)
    }
}

impl From<Year> for Cell {
    fn from(y: Year) -> Self {
        Self::Int(i64::from(y))
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Self::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

/// A rectangular table with a header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given column headers.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Outer-join series on year, one row per year in any input.
    ///
    /// The first column is `year_label`; a series without an entry for a
    /// year contributes an undefined cell.
    pub fn by_year(year_label: &str, columns: &[(&str, &PartialSeries)]) -> Self {
        let years: BTreeSet<Year> = columns
            .iter()
            .flat_map(|(_, s)| s.years().iter().copied())
            .collect();
        let mut table = Self::new(
            std::iter::once(year_label).chain(columns.iter().map(|(name, _)| *name)),
        );
        for year in years {
            let mut row = Vec::with_capacity(columns.len() + 1);
            row.push(Cell::from(year));
            row.extend(columns.iter().map(|(_, s)| Cell::from(s.get(year).flatten())));
            table.rows.push(row);
        }
        table
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::TableShape`] if the row length differs from the
    /// number of columns.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), IoError> {
        if row.len() != self.columns.len() {
            return Err(IoError::TableShape {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Return the column headers.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Return the data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Return the number of data rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Serialize as CSV into any writer.
    pub(crate) fn write_csv<W: std::io::Write>(&self, out: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(ToString::to_string))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_partial(start: Year, values: Vec<Option<f64>>) -> PartialSeries {
        let years = (start..start + values.len() as Year).collect();
        PartialSeries::new(years, values).unwrap()
    }

    fn render(table: &Table) -> String {
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn undefined_cells_written_as_na() {
        let mut t = Table::new(["Variable", "Skewness"]);
        t.push_row(vec!["GDP".into(), Cell::from(None)]).unwrap();
        t.push_row(vec!["CPI".into(), 0.25.into()]).unwrap();
        assert_eq!(render(&t), "Variable,Skewness\nGDP,NA\nCPI,0.25\n");
    }

    #[test]
    fn row_length_checked() {
        let mut t = Table::new(["a", "b"]);
        let result = t.push_row(vec![Cell::Int(1)]);
        assert!(matches!(result, Err(IoError::TableShape { expected: 2, got: 1 })));
        assert_eq!(t.n_rows(), 0);
    }

    #[test]
    fn by_year_outer_joins() {
        let a = make_partial(2000, vec![Some(1.0), Some(2.0)]);
        let b = make_partial(2001, vec![None, Some(3.5)]);
        let t = Table::by_year("Year", &[("a", &a), ("b", &b)]);
        assert_eq!(t.columns(), &["Year", "a", "b"]);
        assert_eq!(render(&t), "Year,a,b\n2000,1,NA\n2001,2,NA\n2002,NA,3.5\n");
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let mut t = Table::new(["Variable"]);
        t.push_row(vec!["GDP, real".into()]).unwrap();
        assert_eq!(render(&t), "Variable\n\"GDP, real\"\n");
    }
}
