//! CSV panel reader with year-index validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use macrocycle_series::Year;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{Panel, Selection};

/// Name of the mandatory year column.
pub const YEAR_COLUMN: &str = "Year";

/// Reads an annual macro panel from a CSV file.
///
/// Expected CSV format:
/// - Header row required; names are trimmed of surrounding whitespace
/// - One `Year` column (anywhere in the header) holding whole numbers,
///   written either as `1978` or `1978.0`, strictly increasing
/// - Any number of further named numeric columns
///
/// Cells that are empty, non-numeric, NaN or infinite are read as missing
/// rather than rejected. Rows whose every cell is empty are skipped.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingYearColumn`] | Header has no `Year` column |
/// | [`IoError::DuplicateColumn`] | Two header cells share a trimmed name |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::InvalidYear`] | Year cell is not a whole number |
/// | [`IoError::NonIncreasingYear`] | Year repeats or goes backwards |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
pub struct PanelReader {
    path: PathBuf,
}

impl PanelReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`Panel`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Panel, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that InconsistentRowLength fires instead of a
        // low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let names: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();
        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(IoError::DuplicateColumn {
                path: self.path.clone(),
                name: dup.clone(),
            });
        }
        let year_index = names
            .iter()
            .position(|n| n == YEAR_COLUMN)
            .ok_or_else(|| IoError::MissingYearColumn {
                path: self.path.clone(),
            })?;
        let expected_cols = names.len();
        debug!(expected_cols, year_index, "read CSV header");

        let mut years: Vec<Year> = Vec::new();
        let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); expected_cols - 1];
        let mut n_coerced = 0usize;
        let mut n_blank_rows = 0usize;

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }
            if record.iter().all(|c| c.trim().is_empty()) {
                n_blank_rows += 1;
                continue;
            }

            let raw_year = record.get(year_index).unwrap_or("");
            let year = parse_year(raw_year).ok_or_else(|| IoError::InvalidYear {
                path: self.path.clone(),
                row_index,
                raw: raw_year.to_string(),
            })?;
            if let Some(&previous) = years.last()
                && year <= previous
            {
                return Err(IoError::NonIncreasingYear {
                    path: self.path.clone(),
                    row_index,
                    previous,
                    year,
                });
            }
            years.push(year);

            let values = record
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != year_index)
                .map(|(_, raw)| raw);
            for (column, raw) in cells.iter_mut().zip(values) {
                let value = parse_cell(raw);
                if value.is_none() && !raw.trim().is_empty() {
                    n_coerced += 1;
                }
                column.push(value);
            }
        }

        if years.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }
        if n_coerced > 0 {
            debug!(n_coerced, "non-numeric cells read as missing");
        }
        if n_blank_rows > 0 {
            debug!(n_blank_rows, "skipped blank rows");
        }

        let mut names = names;
        names.remove(year_index);
        info!(
            n_years = years.len(),
            n_columns = names.len(),
            first_year = years[0],
            last_year = years[years.len() - 1],
            "panel loaded"
        );

        Ok(Panel::new(years, names, cells))
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

/// Read the panel at `path` and select `required` columns from it.
///
/// # Errors
///
/// Any file-level error from [`PanelReader::read`]. Missing or empty
/// columns are not errors; see [`Panel::select`].
pub fn load<S: AsRef<str>>(path: &Path, required: &[S]) -> Result<Selection, IoError> {
    let panel = PanelReader::new(path).read()?;
    Ok(panel.select(required))
}

/// Whole-number years, accepting a spreadsheet-style `.0` suffix.
fn parse_year(raw: &str) -> Option<Year> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<Year>() {
        return Some(year);
    }
    let value: f64 = raw.parse().ok()?;
    let in_range = value >= f64::from(Year::MIN) && value <= f64::from(Year::MAX);
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as Year)
}

fn parse_cell(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_panel() {
        let csv = "Year,GDP,CPI\n2000,1.5,100\n2001,1.7,102\n2002,1.9,104\n";
        let f = write_csv(csv);
        let panel = PanelReader::new(f.path()).read().unwrap();
        assert_eq!(panel.years(), &[2000, 2001, 2002]);
        assert_eq!(panel.column_names(), &["GDP", "CPI"]);
        assert_eq!(panel.column("CPI").unwrap().values()[2], Some(104.0));
    }

    #[test]
    fn header_names_are_trimmed() {
        let csv = " Year , GDP \n2000,1.0\n";
        let f = write_csv(csv);
        let panel = PanelReader::new(f.path()).read().unwrap();
        assert_eq!(panel.column_names(), &["GDP"]);
    }

    #[test]
    fn year_column_may_appear_anywhere() {
        let csv = "GDP,Year,CPI\n1.0,1999,10\n2.0,2000,11\n";
        let f = write_csv(csv);
        let panel = PanelReader::new(f.path()).read().unwrap();
        assert_eq!(panel.years(), &[1999, 2000]);
        assert_eq!(panel.column("GDP").unwrap().values(), &[Some(1.0), Some(2.0)]);
        assert_eq!(panel.column("CPI").unwrap().values(), &[Some(10.0), Some(11.0)]);
    }

    #[test]
    fn spreadsheet_float_years_accepted() {
        let csv = "Year,GDP\n1978.0,1.0\n1979.0,2.0\n";
        let f = write_csv(csv);
        let panel = PanelReader::new(f.path()).read().unwrap();
        assert_eq!(panel.years(), &[1978, 1979]);
    }

    #[test]
    fn non_numeric_cells_become_missing() {
        let csv = "Year,GDP\n2000,1.0\n2001,n/a\n2002,\n2003,NaN\n2004,inf\n2005,5.0\n";
        let f = write_csv(csv);
        let panel = PanelReader::new(f.path()).read().unwrap();
        let gdp = panel.column("GDP").unwrap();
        assert_eq!(gdp.values(), &[Some(1.0), None, None, None, None, Some(5.0)]);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let csv = "Year,GDP\n2000,1.0\n,\n2001,2.0\n";
        let f = write_csv(csv);
        let panel = PanelReader::new(f.path()).read().unwrap();
        assert_eq!(panel.n_rows(), 2);
    }

    #[test]
    fn error_file_not_found() {
        let result = PanelReader::new(Path::new("/nonexistent/panel.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_missing_year_column() {
        let f = write_csv("Date,GDP\n2000,1.0\n");
        let result = PanelReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::MissingYearColumn { .. })));
    }

    #[test]
    fn error_duplicate_column() {
        let f = write_csv("Year,GDP, GDP\n2000,1.0,2.0\n");
        let result = PanelReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::DuplicateColumn { name, .. }) if name == "GDP"));
    }

    #[test]
    fn error_invalid_year() {
        let f = write_csv("Year,GDP\n2000,1.0\n2000.5,2.0\n");
        let result = PanelReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::InvalidYear { row_index: 1, .. })));
    }

    #[test]
    fn error_non_increasing_year() {
        let f = write_csv("Year,GDP\n2001,1.0\n2000,2.0\n");
        let result = PanelReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::NonIncreasingYear { previous: 2001, year: 2000, .. })
        ));
    }

    #[test]
    fn error_inconsistent_row_length() {
        let f = write_csv("Year,GDP,CPI\n2000,1.0,2.0\n2001,1.0\n");
        let result = PanelReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::InconsistentRowLength { row_index: 1, expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("Year,GDP\n");
        let result = PanelReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn parse_year_forms() {
        assert_eq!(parse_year("1978"), Some(1978));
        assert_eq!(parse_year(" 1978.0 "), Some(1978));
        assert_eq!(parse_year("1978.5"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("abc"), None);
    }
}
