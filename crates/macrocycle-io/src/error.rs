//! I/O error types for macrocycle-io.

use std::path::PathBuf;

use macrocycle_series::Year;

/// Errors from panel loading, table export and report writing.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the header has no `Year` column.
    #[error("no Year column in {path}")]
    MissingYearColumn {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when two header cells carry the same trimmed name.
    #[error("duplicate column \"{name}\" in {path}")]
    DuplicateColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// The repeated column name.
        name: String,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a Year cell is not a whole number.
    #[error("invalid year in {path}: row {row_index}, raw value \"{raw}\"")]
    InvalidYear {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// The raw cell text.
        raw: String,
    },

    /// Returned when years are repeated or out of order.
    #[error("years must be strictly increasing in {path}: row {row_index} has {year} after {previous}")]
    NonIncreasingYear {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Year of the preceding row.
        previous: Year,
        /// The offending year.
        year: Year,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a table row does not match the table's column count.
    #[error("table row has {got} cells, expected {expected}")]
    TableShape {
        /// Number of table columns.
        expected: usize,
        /// Number of cells supplied.
        got: usize,
    },

    /// Returned when the report name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid report name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidReportName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when an artifact cannot be serialized to JSON.
    #[error("cannot serialize {path}")]
    Serialize {
        /// Path the artifact was meant for.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },

    /// Returned when a CSV table cannot be written.
    #[error("cannot write CSV table {path}")]
    CsvWrite {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
}
