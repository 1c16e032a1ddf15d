mod figures;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use macrocycle_io::{Panel, PanelReader, ReportName, ReportWriter, Table, load};
use macrocycle_series::{
    AnnualSeries, DescriptiveStats, HpFilter, LinearFit, PartialSeries, Year, pct_change, ratio_pct, rolling_std,
};
use macrocycle_sync::{FillPolicy, Period, PeriodSet, SyncConfig};

const DEFAULT_DATA: &str = "Macro_Data.csv";

const US_GDP: &str = "US_Real_GDP_Hundred_Million_Yuan";
const CN_GDP: &str = "China_Real_GDP_Hundred_Million_Yuan";
const CN_YOUTH_UNEMPLOYMENT: &str = "China_Youth_Unemployment_Rate";
const CN_FIXED_ASSET_INVESTMENT: &str = "China_Fixed_Asset_Investment_Hundred_Million_Yuan";
const CN_POPULATION: &str = "China_Population_Billion";
const CN_FINAL_CONSUMPTION: &str = "China_Final_Consumption_Hundred_Million_Yuan";
const CN_CAPITAL_FORMATION: &str = "China_Capital_Formation_Hundred_Million_Yuan";

const DESCRIBE_VARIABLES: [&str; 6] = [
    CN_GDP,
    CN_YOUTH_UNEMPLOYMENT,
    CN_FIXED_ASSET_INVESTMENT,
    CN_POPULATION,
    CN_FINAL_CONSUMPTION,
    CN_CAPITAL_FORMATION,
];

const VOLATILITY_WINDOW: usize = 10;
const VOLATILITY_FROM: Year = 1987;
const VOLATILITY_TO: Year = 2023;
const SIGNIFICANCE: f64 = 0.05;
const YOUTH_SINCE: Year = 2020;

#[derive(Parser)]
#[command(name = "macrocycle")]
#[command(about = "Trend-cycle decomposition and business-cycle synchronization for annual macro panels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Input and output locations shared by every analysis.
#[derive(Args, Debug, Clone)]
struct ReportArgs {
    /// Path to the annual panel CSV (Year column plus named series)
    #[arg(long, default_value = DEFAULT_DATA)]
    data: PathBuf,

    /// Output directory for tables, artifacts and charts
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Report name prefixed to every output file (must match [a-zA-Z0-9_-]+)
    #[arg(long, default_value = "macro")]
    name: String,
}

#[derive(Subcommand)]
enum Command {
    /// Descriptive statistics of selected variables
    Describe {
        /// Variables to summarize (repeatable)
        #[arg(long = "variable", default_values_t = DESCRIBE_VARIABLES.map(String::from))]
        variables: Vec<String>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Rolling standard deviation and a linear trend test of volatility
    Volatility {
        /// Column to analyse
        #[arg(long, default_value = CN_GDP)]
        column: String,

        /// Rolling window in years (full windows only)
        #[arg(long, default_value_t = VOLATILITY_WINDOW)]
        window: usize,

        /// First year of the charted and tested range
        #[arg(long, default_value_t = VOLATILITY_FROM)]
        from: Year,

        /// Last year of the charted and tested range
        #[arg(long, default_value_t = VOLATILITY_TO)]
        to: Year,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Hodrick-Prescott decomposition and US-China cycle synchronization
    Cycles {
        /// US real GDP column
        #[arg(long, default_value = US_GDP)]
        us_column: String,

        /// China real GDP column
        #[arg(long, default_value = CN_GDP)]
        cn_column: String,

        /// HP smoothing parameter (100 for annual data)
        #[arg(long, default_value_t = HpFilter::ANNUAL_LAMBDA)]
        lambda: f64,

        /// Rolling correlation window in years
        #[arg(long, default_value_t = SyncConfig::DEFAULT_WINDOW)]
        window: usize,

        /// Minimum valid pairs for a rolling correlation value
        #[arg(long, default_value_t = SyncConfig::DEFAULT_MIN_PERIODS)]
        min_periods: usize,

        /// Gap treatment after the year join: "ffill-bfill" or "none"
        #[arg(long, default_value_t = FillPolicy::default())]
        fill: FillPolicy,

        /// Period slice as NAME=START:END or START-END (repeatable; replaces the defaults)
        #[arg(long = "period")]
        periods: Vec<Period>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// GDP growth, consumption and capital formation rates, youth unemployment
    Growth {
        /// US real GDP column
        #[arg(long, default_value = US_GDP)]
        us_column: String,

        /// China real GDP column
        #[arg(long, default_value = CN_GDP)]
        cn_column: String,

        /// China final consumption column
        #[arg(long, default_value = CN_FINAL_CONSUMPTION)]
        consumption_column: String,

        /// China capital formation column
        #[arg(long, default_value = CN_CAPITAL_FORMATION)]
        capital_column: String,

        /// China youth unemployment column
        #[arg(long, default_value = CN_YOUTH_UNEMPLOYMENT)]
        youth_column: String,

        /// First year of the youth unemployment regression
        #[arg(long, default_value_t = YOUTH_SINCE)]
        since: Year,

        #[command(flatten)]
        report: ReportArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct DescribeOutput {
    report: String,
    variables: Vec<VariableOutput>,
    missing: Vec<String>,
    empty: Vec<String>,
}

#[derive(Serialize)]
struct VariableOutput {
    name: String,
    n: usize,
    dropped: usize,
    mean: f64,
    median: f64,
    std: Option<f64>,
    min: f64,
    max: f64,
    skewness: Option<f64>,
    kurtosis: Option<f64>,
}

#[derive(Serialize)]
struct VolatilityOutput {
    report: String,
    column: String,
    window: usize,
    from: Year,
    to: Year,
    n_points: usize,
    slope: f64,
    intercept: f64,
    r_squared: f64,
    p_value: f64,
    std_err: f64,
    significant: bool,
}

#[derive(Serialize)]
struct CyclesOutput {
    report: String,
    lambda: f64,
    n_years_us: usize,
    n_years_cn: usize,
    fill_policy: String,
    filled: usize,
    n_pairs: usize,
    global_correlation: Option<f64>,
    strongest_period: Option<String>,
    periods: Vec<PeriodOutput>,
}

#[derive(Serialize)]
struct PeriodOutput {
    name: String,
    n_pairs: usize,
    correlation: Option<f64>,
}

#[derive(Serialize)]
struct GrowthOutput {
    report: String,
    n_years: usize,
    mean_growth_us: Option<f64>,
    mean_growth_cn: Option<f64>,
    youth_fit: Option<FitOutput>,
}

#[derive(Serialize)]
struct FitOutput {
    since: Year,
    n: usize,
    slope: f64,
    intercept: f64,
    r_squared: f64,
    p_value: f64,
}

fn open_writer(report: &ReportArgs) -> Result<ReportWriter> {
    let name = ReportName::new(report.name.clone())?;
    let writer = ReportWriter::new(&report.output_dir, name)?;
    Ok(writer)
}

fn mean_defined(series: &PartialSeries) -> Option<f64> {
    let values: Vec<f64> = series.values().iter().flatten().copied().collect();
    macrocycle_series::mean(&values)
}

/// Look up a panel column, warning once by name when it is absent.
fn panel_column(panel: &Panel, name: &str, skipping: &str) -> Option<PartialSeries> {
    let column = panel.column(name);
    if column.is_none() {
        warn!(column = name, "column not found in panel; skipping {skipping}");
    }
    column
}

/// Growth and composition rates on the panel's year index.
///
/// Each rate is `None` when a column it depends on is absent; the others
/// are still computed.
#[derive(Debug)]
struct GrowthRates {
    us: Option<PartialSeries>,
    cn: Option<PartialSeries>,
    consumption: Option<PartialSeries>,
    capital: Option<PartialSeries>,
    /// China GDP levels, the regressor of the youth unemployment fit.
    cn_gdp: Option<PartialSeries>,
}

impl GrowthRates {
    fn compute(
        panel: &Panel,
        us_column: &str,
        cn_column: &str,
        consumption_column: &str,
        capital_column: &str,
    ) -> Self {
        let us_gdp = panel_column(panel, us_column, "US GDP growth");
        let cn_gdp = panel_column(
            panel,
            cn_column,
            "China GDP growth, composition rates and youth unemployment fit",
        );
        let share = |column: &str, skipping: &str| {
            let gdp = cn_gdp.as_ref()?;
            panel_column(panel, column, skipping).map(|c| ratio_pct(&c, gdp))
        };
        let consumption = share(consumption_column, "consumption rate");
        let capital = share(capital_column, "capital formation rate");
        Self {
            us: us_gdp.as_ref().map(pct_change),
            cn: cn_gdp.as_ref().map(pct_change),
            consumption,
            capital,
            cn_gdp,
        }
    }

    /// One column per available rate, outer-joined on year.
    fn table(&self) -> Table {
        let columns: Vec<(&str, &PartialSeries)> = [
            ("US_GDP_Growth_Rate", self.us.as_ref()),
            ("China_GDP_Growth_Rate", self.cn.as_ref()),
            ("Consumption_Rate", self.consumption.as_ref()),
            ("Capital_Formation_Rate", self.capital.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, series)| Some((name, series?)))
        .collect();
        Table::by_year("Year", &columns)
    }
}

/// Rolling standard deviation of one column and the OLS trend over a year range.
struct VolatilityTrend {
    /// Rolling values with leading partial windows dropped.
    defined: AnnualSeries,
    /// Rolling values within the requested range.
    in_range: AnnualSeries,
    fit: LinearFit,
}

impl VolatilityTrend {
    fn compute(
        column: &str,
        series: &AnnualSeries,
        window: usize,
        from: Year,
        to: Year,
    ) -> Result<Self> {
        let rolling = rolling_std(series, window).context("rolling standard deviation failed")?;
        let defined = rolling
            .drop_undefined()
            .with_context(|| format!("{column} has fewer than {window} observations"))?;
        info!(
            dropped = rolling.len() - defined.len(),
            kept = defined.len(),
            "dropped years without a full rolling window"
        );

        let in_range = defined
            .between(from, to)
            .with_context(|| format!("no rolling values between {from} and {to}"))?;
        let fit = LinearFit::over_years(&in_range).context("volatility trend test failed")?;
        Ok(Self {
            defined,
            in_range,
            fit,
        })
    }
}

/// `(gdp, rate)` points from `since` on where both are defined.
fn youth_points(gdp: &PartialSeries, youth: &PartialSeries, since: Year) -> Vec<(f64, f64)> {
    gdp.iter()
        .filter(|(year, _)| *year >= since)
        .filter_map(|(year, g)| Some((g?, youth.get(year).flatten()?)))
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Describe { variables, report } => {
            let selection = load(&report.data, &variables).context("failed to load panel")?;
            if selection.series.is_empty() {
                bail!("none of the requested variables has usable data");
            }

            let mut stats = Vec::with_capacity(selection.series.len());
            let mut variables_out = Vec::with_capacity(selection.series.len());
            for s in &selection.series {
                let d = DescriptiveStats::compute(s.series.values())
                    .with_context(|| format!("statistics failed for {}", s.name))?;
                variables_out.push(VariableOutput {
                    name: s.name.clone(),
                    n: d.n,
                    dropped: s.dropped,
                    mean: d.mean,
                    median: d.median,
                    std: d.std,
                    min: d.min,
                    max: d.max,
                    skewness: d.skewness,
                    kurtosis: d.kurtosis,
                });
                stats.push((s.name.clone(), d));
            }

            let writer = open_writer(&report)?;
            writer.write_descriptive(&stats)?;

            let output = DescribeOutput {
                report: report.name,
                variables: variables_out,
                missing: selection.missing,
                empty: selection.empty,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Volatility {
            column,
            window,
            from,
            to,
            report,
        } => {
            if from > to {
                bail!("--from {from} is after --to {to}");
            }
            let selection = load(&report.data, &[column.as_str()]).context("failed to load panel")?;
            let series = selection
                .get(&column)
                .with_context(|| format!("column {column} has no usable data"))?;

            // 1. Rolling std and its trend test, before anything is written
            let trend = VolatilityTrend::compute(&column, series, window, from, to)?;
            let (defined, in_range, fit) = (trend.defined, trend.in_range, trend.fit);

            // 2. Persist the full defined table and the chart of the range
            let writer = open_writer(&report)?;
            let values = PartialSeries::from(series);
            let rolling_defined = PartialSeries::from(&defined);
            let observed = values.between(defined.first_year(), defined.last_year());
            let table = Table::by_year(
                "Year",
                &[(column.as_str(), &observed), ("Rolling_STD", &rolling_defined)],
            );
            writer.write_table("rolling_std", &table)?;
            writer.write_chart(
                "rolling_std",
                &figures::volatility(&column, window, &PartialSeries::from(&in_range)),
            )?;
            let significant = fit.is_significant(SIGNIFICANCE);
            if significant {
                info!(slope = fit.slope, p_value = fit.p_value, "volatility trend is significant");
            } else {
                info!(slope = fit.slope, p_value = fit.p_value, "no significant volatility trend");
            }

            let output = VolatilityOutput {
                report: report.name,
                column,
                window,
                from,
                to,
                n_points: fit.n,
                slope: fit.slope,
                intercept: fit.intercept,
                r_squared: fit.r_squared(),
                p_value: fit.p_value,
                std_err: fit.std_err,
                significant,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Cycles {
            us_column,
            cn_column,
            lambda,
            window,
            min_periods,
            fill,
            periods,
            report,
        } => {
            let selection = load(&report.data, &[us_column.as_str(), cn_column.as_str()])
                .context("failed to load panel")?;
            let us = selection
                .get(&us_column)
                .with_context(|| format!("column {us_column} has no usable data"))?;
            let cn = selection
                .get(&cn_column)
                .with_context(|| format!("column {cn_column} has no usable data"))?;

            // 1. Decompose
            let hp = HpFilter::new(lambda)?;
            let us_d = hp.decompose(us).context("US decomposition failed")?;
            let cn_d = hp.decompose(cn).context("China decomposition failed")?;
            let us_pct = us_d.cycle_pct();
            let cn_pct = cn_d.cycle_pct();

            // 2. Synchronize
            let periods = if periods.is_empty() {
                PeriodSet::standard()
            } else {
                PeriodSet::new(periods)?
            };
            let config = SyncConfig::new(window, min_periods)?
                .with_fill_policy(fill)
                .with_periods(periods);
            let result = config
                .analyze(&us_pct, &cn_pct)
                .context("synchronization analysis failed")?;
            if let Some(strongest) = result.strongest_period() {
                info!(period = %strongest.name, correlation = ?strongest.correlation, "strongest co-movement");
            }

            // 3. Tables and artifacts
            let writer = open_writer(&report)?;
            let us_gdp = PartialSeries::from(us);
            let us_trend = PartialSeries::from(us_d.trend());
            let us_cycle = PartialSeries::from(us_d.cycle());
            let cn_gdp = PartialSeries::from(cn);
            let cn_trend = PartialSeries::from(cn_d.trend());
            let cn_cycle = PartialSeries::from(cn_d.cycle());
            let table = Table::by_year(
                "Year",
                &[
                    ("US_GDP", &us_gdp),
                    ("US_Trend", &us_trend),
                    ("US_Cycle", &us_cycle),
                    ("US_Cycle_pct", &us_pct),
                    ("CN_GDP", &cn_gdp),
                    ("CN_Trend", &cn_trend),
                    ("CN_Cycle", &cn_cycle),
                    ("CN_Cycle_pct", &cn_pct),
                    ("US_Norm", &result.left_normalized),
                    ("CN_Norm", &result.right_normalized),
                    ("Rolling_Corr", &result.rolling),
                ],
            );
            writer.write_table("decomposition", &table)?;
            writer.write_period_correlations(&result.periods)?;
            writer.write_sync("US", "China", &result)?;

            // 4. Charts
            writer.write_chart("us_trend", &figures::trend("US", &us_d, &figures::US_PALETTE))?;
            writer.write_chart("us_cycle", &figures::cycle("US", &us_pct, &figures::US_PALETTE))?;
            writer.write_chart("cn_trend", &figures::trend("China", &cn_d, &figures::CN_PALETTE))?;
            writer.write_chart("cn_cycle", &figures::cycle("China", &cn_pct, &figures::CN_PALETTE))?;
            writer.write_chart(
                "synchronization",
                &figures::synchronization("US", "China", window, &result),
            )?;
            writer.write_chart("cycle_scatter", &figures::cycle_scatter("US", "China", &result))?;

            let output = CyclesOutput {
                report: report.name,
                lambda,
                n_years_us: us.len(),
                n_years_cn: cn.len(),
                fill_policy: result.fill_policy.to_string(),
                filled: result.filled(),
                n_pairs: result.n_pairs,
                global_correlation: result.global,
                strongest_period: result.strongest_period().map(|p| p.name.clone()),
                periods: result
                    .periods
                    .iter()
                    .map(|p| PeriodOutput {
                        name: p.name.clone(),
                        n_pairs: p.n_pairs,
                        correlation: p.correlation,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Growth {
            us_column,
            cn_column,
            consumption_column,
            capital_column,
            youth_column,
            since,
            report,
        } => {
            let panel = PanelReader::new(&report.data)
                .read()
                .context("failed to load panel")?;

            // 1. Growth and composition rates on the full panel index
            let rates = GrowthRates::compute(
                &panel,
                &us_column,
                &cn_column,
                &consumption_column,
                &capital_column,
            );
            if rates.us.is_none() && rates.cn.is_none() {
                bail!("neither {us_column} nor {cn_column} found in {}", report.data.display());
            }

            let writer = open_writer(&report)?;
            writer.write_table("growth", &rates.table())?;

            // 2. Charts
            writer.write_chart(
                "gdp_growth_comparison",
                &figures::growth_comparison("US", rates.us.as_ref(), "China", rates.cn.as_ref()),
            )?;
            if let (Some(consumption), Some(capital)) = (&rates.consumption, &rates.capital) {
                writer.write_chart(
                    "consumption_capital_formation",
                    &figures::composition(consumption, capital),
                )?;
            }

            // 3. Youth unemployment against GDP in recent years
            let youth = rates
                .cn_gdp
                .as_ref()
                .and_then(|_| panel_column(&panel, &youth_column, "youth unemployment fit"));
            let youth_fit = match (&rates.cn_gdp, youth) {
                (Some(gdp), Some(youth)) => {
                    let points = youth_points(gdp, &youth, since);
                    let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
                    match LinearFit::fit(&x, &y) {
                        Ok(fit) => {
                            writer.write_chart(
                                "youth_unemployment_gdp",
                                &figures::youth_unemployment(&points, &fit, since),
                            )?;
                            Some(FitOutput {
                                since,
                                n: fit.n,
                                slope: fit.slope,
                                intercept: fit.intercept,
                                r_squared: fit.r_squared(),
                                p_value: fit.p_value,
                            })
                        }
                        Err(e) => {
                            warn!(since, n_points = points.len(), error = %e, "skipping youth unemployment fit");
                            None
                        }
                    }
                }
                _ => None,
            };

            let output = GrowthOutput {
                report: report.name,
                n_years: panel.n_rows(),
                mean_growth_us: rates.us.as_ref().and_then(mean_defined),
                mean_growth_cn: rates.cn.as_ref().and_then(mean_defined),
                youth_fit,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
