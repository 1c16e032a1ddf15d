//! Report writer for tables, JSON artifacts and rendered charts.

use std::fs;
use std::path::{Path, PathBuf};

use macrocycle_series::{DescriptiveStats, Year};
use macrocycle_sync::{PeriodCorrelation, SyncResult};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::chart::{ChartSpec, render_html};
use crate::domain::ReportName;
use crate::table::{Cell, Table};

/// Writes analysis outputs under one report name.
///
/// Creates the output directory on construction if it does not exist.
/// Every file is named `{report}_{stem}.{ext}`.
pub struct ReportWriter {
    output_dir: PathBuf,
    report: ReportName,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and report name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), report = %report))]
    pub fn new(output_dir: &Path, report: ReportName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            report,
        })
    }

    /// Return the path `{output_dir}/{report}_{stem}.{ext}` without writing.
    #[must_use]
    pub fn path_for(&self, stem: &str, ext: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{stem}.{ext}", self.report.as_str()))
    }

    /// Write a table to `{report}_{stem}.csv`; undefined cells become `NA`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be created and
    /// [`IoError::CsvWrite`] if a record cannot be written.
    #[instrument(skip(self, table), fields(n_rows = table.n_rows()))]
    pub fn write_table(&self, stem: &str, table: &Table) -> Result<PathBuf, IoError> {
        let path = self.path_for(stem, "csv");
        let file = fs::File::create(&path).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        table.write_csv(file).map_err(|e| IoError::CsvWrite {
            path: path.clone(),
            source: e,
        })?;
        info!(path = %path.display(), "table written");
        Ok(path)
    }

    /// Write any serializable artifact to `{report}_{stem}.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] if the artifact cannot be encoded and
    /// [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip(self, artifact))]
    pub fn write_json<T: Serialize>(&self, stem: &str, artifact: &T) -> Result<PathBuf, IoError> {
        let path = self.path_for(stem, "json");
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        info!(path = %path.display(), "artifact written");
        Ok(path)
    }

    /// Render a chart to `{report}_{stem}.html`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip(self, chart), fields(title = chart.title(), n_traces = chart.traces().len()))]
    pub fn write_chart(&self, stem: &str, chart: &ChartSpec) -> Result<PathBuf, IoError> {
        let path = self.path_for(stem, "html");
        fs::write(&path, render_html(chart)).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        info!(path = %path.display(), "chart written");
        Ok(path)
    }

    /// Write one row of moments per variable to
    /// `{report}_descriptive_statistics.csv`.
    ///
    /// # Errors
    ///
    /// See [`ReportWriter::write_table`].
    pub fn write_descriptive(
        &self,
        stats: &[(String, DescriptiveStats)],
    ) -> Result<PathBuf, IoError> {
        let mut table = Table::new([
            "Variable", "N", "Mean", "Median", "Std Dev", "Min", "Max", "Skewness", "Kurtosis",
        ]);
        for (name, s) in stats {
            table.push_row(vec![
                Cell::from(name.as_str()),
                Cell::from(s.n),
                Cell::from(s.mean),
                Cell::from(s.median),
                Cell::from(s.std),
                Cell::from(s.min),
                Cell::from(s.max),
                Cell::from(s.skewness),
                Cell::from(s.kurtosis),
            ])?;
        }
        self.write_table("descriptive_statistics", &table)
    }

    /// Write period slices to `{report}_period_correlations.csv`.
    ///
    /// # Errors
    ///
    /// See [`ReportWriter::write_table`].
    pub fn write_period_correlations(
        &self,
        periods: &[PeriodCorrelation],
    ) -> Result<PathBuf, IoError> {
        let mut table = Table::new(["Period", "Start", "End", "Pairs", "Correlation"]);
        for p in periods {
            table.push_row(vec![
                Cell::from(p.name.as_str()),
                Cell::from(p.start),
                Cell::from(p.end),
                Cell::from(p.n_pairs),
                Cell::from(p.correlation),
            ])?;
        }
        self.write_table("period_correlations", &table)
    }

    /// Write a synchronization result to `{report}_sync.json`.
    ///
    /// Uses shadow structs so the artifact layout is independent of the
    /// in-memory result types.
    ///
    /// # Errors
    ///
    /// See [`ReportWriter::write_json`].
    #[instrument(skip_all, fields(left = left_name, right = right_name))]
    pub fn write_sync(
        &self,
        left_name: &str,
        right_name: &str,
        result: &SyncResult,
    ) -> Result<PathBuf, IoError> {
        let aligned = result.aligned.years().iter().enumerate().map(|(i, &year)| YearEntry {
            year,
            left: result.aligned.left()[i],
            right: result.aligned.right()[i],
            rolling_correlation: result.rolling.get(year).flatten(),
        });
        let artifact = SyncArtifact {
            report: self.report.as_str(),
            left: left_name,
            right: right_name,
            fill_policy: result.fill_policy.to_string(),
            filled: result.filled(),
            n_pairs: result.n_pairs,
            global_correlation: result.global,
            periods: result
                .periods
                .iter()
                .map(|p| PeriodEntry {
                    name: p.name.as_str(),
                    start: p.start,
                    end: p.end,
                    n_pairs: p.n_pairs,
                    correlation: p.correlation,
                })
                .collect(),
            years: aligned.collect(),
        };
        self.write_json("sync", &artifact)
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct SyncArtifact<'a> {
    report: &'a str,
    left: &'a str,
    right: &'a str,
    fill_policy: String,
    filled: usize,
    n_pairs: usize,
    global_correlation: Option<f64>,
    periods: Vec<PeriodEntry<'a>>,
    years: Vec<YearEntry>,
}

#[derive(Serialize)]
struct PeriodEntry<'a> {
    name: &'a str,
    start: Year,
    end: Year,
    n_pairs: usize,
    correlation: Option<f64>,
}

#[derive(Serialize)]
struct YearEntry {
    year: Year,
    left: Option<f64>,
    right: Option<f64>,
    rolling_correlation: Option<f64>,
}
