//! Domain types for macrocycle-io.

use macrocycle_series::{AnnualSeries, PartialSeries, Year};
use tracing::{info, warn};

use crate::IoError;

/// A validated report name used as the prefix of every output file.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName(String);

impl ReportName {
    /// Parse and validate a report name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidReportName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidReportName { name });
        }
        Ok(Self(name))
    }

    /// Return the report name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An annual panel: one strictly increasing year index and named columns.
///
/// Produced by [`PanelReader`](crate::PanelReader). Columns keep header
/// order; a cell is `None` when it was empty or not a finite number.
#[derive(Debug, Clone)]
pub struct Panel {
    years: Vec<Year>,
    names: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl Panel {
    pub(crate) fn new(years: Vec<Year>, names: Vec<String>, cells: Vec<Vec<Option<f64>>>) -> Self {
        debug_assert_eq!(names.len(), cells.len());
        debug_assert!(cells.iter().all(|c| c.len() == years.len()));
        Self { years, names, cells }
    }

    /// Return the year index.
    #[must_use]
    pub fn years(&self) -> &[Year] {
        &self.years
    }

    /// Return the column names in header order, excluding `Year`.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Return the number of data rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.years.len()
    }

    /// Return true if the panel has a column with this (trimmed) name.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Return a column on the full year index, gaps included.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<PartialSeries> {
        let i = self.position(name)?;
        Some(
            PartialSeries::new(self.years.clone(), self.cells[i].clone())
                .expect("panel years are increasing and cells finite"),
        )
    }

    /// Select columns for analysis, dropping rows where each is missing.
    ///
    /// Every requested name absent from the panel produces one warning
    /// and is listed in [`Selection::missing`]. A column with no value
    /// left after dropping is warned about and listed in
    /// [`Selection::empty`]. Neither stops the remaining columns.
    pub fn select<S: AsRef<str>>(&self, required: &[S]) -> Selection {
        let mut selection = Selection::default();
        for name in required {
            let name = name.as_ref().trim();
            let Some(column) = self.column(name) else {
                warn!(column = name, "column not found in panel; skipping");
                selection.missing.push(name.to_string());
                continue;
            };
            let dropped = column.len() - column.n_defined();
            match column.drop_undefined() {
                Ok(series) => {
                    if dropped > 0 {
                        info!(column = name, dropped, kept = series.len(), "dropped rows with missing values");
                    }
                    selection.series.push(NamedSeries {
                        name: name.to_string(),
                        series,
                        dropped,
                    });
                }
                Err(_) => {
                    warn!(column = name, "column has no valid data; skipping");
                    selection.empty.push(name.to_string());
                }
            }
        }
        selection
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.names.iter().position(|n| n == name)
    }
}

/// A panel column after its missing rows were dropped.
#[derive(Debug, Clone)]
pub struct NamedSeries {
    /// Column name.
    pub name: String,
    /// Defined values on their own year index.
    pub series: AnnualSeries,
    /// Number of rows dropped because the cell was missing.
    pub dropped: usize,
}

/// Outcome of [`Panel::select`].
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Usable columns in request order.
    pub series: Vec<NamedSeries>,
    /// Requested names absent from the panel.
    pub missing: Vec<String>,
    /// Requested names present but without any valid value.
    pub empty: Vec<String>,
}

impl Selection {
    /// Look up a usable column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AnnualSeries> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_panel() -> Panel {
        Panel::new(
            vec![2000, 2001, 2002, 2003],
            vec!["GDP".into(), "Sparse".into(), "Blank".into()],
            vec![
                vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
                vec![Some(1.0), None, Some(3.0), None],
                vec![None; 4],
            ],
        )
    }

    #[test]
    fn report_name_valid() {
        let name = ReportName::new("china-2024_v1".to_string());
        assert_eq!(name.unwrap().as_str(), "china-2024_v1");
    }

    #[test]
    fn report_name_rejects_empty() {
        let name = ReportName::new(String::new());
        assert!(matches!(name, Err(IoError::InvalidReportName { .. })));
    }

    #[test]
    fn report_name_rejects_path_separators() {
        let name = ReportName::new("../out".to_string());
        assert!(matches!(name, Err(IoError::InvalidReportName { .. })));
    }

    #[test]
    fn column_keeps_gaps() {
        let panel = make_panel();
        let sparse = panel.column("Sparse").unwrap();
        assert_eq!(sparse.len(), 4);
        assert_eq!(sparse.values()[1], None);
        assert!(panel.column("Nope").is_none());
        assert!(panel.has_column(" GDP "));
    }

    #[test]
    fn select_sorts_columns_into_usable_missing_and_empty() {
        let panel = make_panel();
        let sel = panel.select(&["GDP", "Sparse", "Blank", "Nope"]);
        assert_eq!(sel.series.len(), 2);
        assert_eq!(sel.missing, ["Nope"]);
        assert_eq!(sel.empty, ["Blank"]);

        let sparse = &sel.series[1];
        assert_eq!(sparse.dropped, 2);
        assert_eq!(sparse.series.years(), &[2000, 2002]);
        assert_eq!(sel.get("GDP").unwrap().len(), 4);
    }
}
