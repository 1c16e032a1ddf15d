//! Chart specifications for each analysis.
//!
//! Every function returns a complete [`ChartSpec`]; nothing is drawn here.

use macrocycle_io::{Axis, Band, ChartSpec, EventMarker, Trace, TraceStyle};
use macrocycle_series::{Decomposition, LinearFit, PartialSeries, Year};
use macrocycle_sync::SyncResult;

/// Attribution shown under the growth charts.
pub const DATA_SOURCE: &str = "Data source: iFinD";

/// Crises marked on the synchronization chart.
pub const CYCLE_EVENTS: [(Year, &str); 4] = [
    (1997, "Asian Financial Crisis"),
    (2008, "Global Financial Crisis"),
    (2015, "China Stock Market Crash"),
    (2020, "COVID-19 Pandemic"),
];

/// Symmetric y limit of the cycle charts, in percent of trend.
pub const CYCLE_PCT_LIMIT: f64 = 20.0;

/// Years of the investment-driven growth band on the composition chart.
pub const INVESTMENT_BAND: (Year, Year) = (2000, 2023);

/// Colours of one country's trend and cycle panels.
pub struct Palette {
    /// Fitted trend line.
    pub trend: &'static str,
    /// Observed series drawn under the trend.
    pub actual: &'static str,
    /// Cycle area fill.
    pub cycle: &'static str,
}

/// Blue trend with a red cycle.
pub const US_PALETTE: Palette = Palette {
    trend: "#1f77b4",
    actual: "#aec7e8",
    cycle: "#d62728",
};

/// Green trend with a purple cycle.
pub const CN_PALETTE: Palette = Palette {
    trend: "#2ca02c",
    actual: "#98df8a",
    cycle: "#9467bd",
};

/// Rolling standard deviation over the analysed year range.
pub fn volatility(column: &str, window: usize, rolling: &PartialSeries) -> ChartSpec {
    ChartSpec::new(
        format!("{window}-Year Rolling Standard Deviation of {column}"),
        "Year",
        "Rolling Standard Deviation",
    )
    .with_trace(Trace::from_series(format!("{window}-year Rolling Std Dev"), rolling).with_color("blue"))
}

/// Trend against the observed series.
pub fn trend(country: &str, decomposition: &Decomposition, palette: &Palette) -> ChartSpec {
    ChartSpec::new(format!("{country} GDP Trend Component"), "Year", "GDP (100 million yuan)")
        .with_trace(
            Trace::from_series("Trend", &PartialSeries::from(decomposition.trend()))
                .with_color(palette.trend),
        )
        .with_trace(
            Trace::from_series("Real GDP", &PartialSeries::from(decomposition.reconstruct()))
                .with_color(palette.actual)
                .with_style(TraceStyle::Dashed),
        )
}

/// Cyclical deviation from trend in percent.
pub fn cycle(country: &str, cycle_pct: &PartialSeries, palette: &Palette) -> ChartSpec {
    ChartSpec::new(format!("{country} GDP Cyclical Fluctuation"), "Year", "Deviation from trend (%)")
        .with_trace(
            Trace::from_series("Cycle", cycle_pct)
                .with_color(palette.cycle)
                .with_style(TraceStyle::AreaToZero),
        )
        .with_y_range(-CYCLE_PCT_LIMIT, CYCLE_PCT_LIMIT)
        .with_hline(0.0)
}

/// Both normalized cycles with the rolling correlation on a second axis.
pub fn synchronization(
    left: &str,
    right: &str,
    window: usize,
    result: &SyncResult,
) -> ChartSpec {
    let (first, last) = span(&result.left_normalized, &result.right_normalized);
    let mut spec = ChartSpec::new(
        format!("{left}-{right} Business Cycle Synchronization ({first}-{last})"),
        "Year",
        "Normalized fluctuation",
    )
    .with_trace(
        Trace::from_series(format!("{left} cycle"), &result.left_normalized).with_color("#1f77b4"),
    )
    .with_trace(
        Trace::from_series(format!("{right} cycle"), &result.right_normalized)
            .with_color("#ff7f0e"),
    )
    .with_trace(
        Trace::from_series(format!("{window}-year rolling correlation"), &result.rolling)
            .with_color("#2ca02c")
            .on_axis(Axis::Secondary),
    )
    .with_secondary_axis("Correlation", Some((-1.0, 1.0)));
    for (year, label) in CYCLE_EVENTS {
        spec = spec.with_marker(EventMarker::new(year, label));
    }
    spec
}

/// Normalized cycles against each other, one point per aligned year.
pub fn cycle_scatter(left: &str, right: &str, result: &SyncResult) -> ChartSpec {
    let (x, y): (Vec<f64>, Vec<Option<f64>>) =
        result.aligned.pairs().map(|(l, r)| (l, Some(r))).unzip();
    ChartSpec::new(
        format!("{left} vs {right} Business Cycle"),
        format!("{left} cycle"),
        format!("{right} cycle"),
    )
    .with_trace(Trace::new("Years", x, y).with_style(TraceStyle::Markers))
}

/// Year-on-year growth of two countries on separate axes.
///
/// A country without a series is left out of the chart.
pub fn growth_comparison(
    left: &str,
    left_growth: Option<&PartialSeries>,
    right: &str,
    right_growth: Option<&PartialSeries>,
) -> ChartSpec {
    let none = PartialSeries::default();
    let (first, last) = span(left_growth.unwrap_or(&none), right_growth.unwrap_or(&none));
    let mut spec = ChartSpec::new(
        format!("Real GDP Growth, {right} vs {left} ({first}-{last})"),
        "Year",
        format!("{left} GDP growth (%)"),
    );
    if let Some(growth) = left_growth {
        spec = spec.with_trace(
            Trace::from_series(format!("{left} GDP growth"), growth).with_color("blue"),
        );
    }
    if let Some(growth) = right_growth {
        spec = spec
            .with_trace(
                Trace::from_series(format!("{right} GDP growth"), growth)
                    .with_color("red")
                    .on_axis(Axis::Secondary),
            )
            .with_secondary_axis(format!("{right} GDP growth (%)"), None);
    }
    spec.with_marker(EventMarker::new(2008, "2008 Financial Crisis").with_color("green"))
        .with_marker(EventMarker::new(2020, "COVID-19 Pandemic").with_color("purple"))
        .with_footnote(DATA_SOURCE)
}

/// Consumption and capital formation shares stacked as areas.
pub fn composition(consumption: &PartialSeries, capital: &PartialSeries) -> ChartSpec {
    let (first, last) = span(consumption, capital);
    ChartSpec::new(
        format!("China Consumption and Capital Formation Rates ({first}-{last})"),
        "Year",
        "Share of GDP (%)",
    )
    .with_trace(
        Trace::from_series("Consumption rate", consumption)
            .with_color("blue")
            .with_style(TraceStyle::AreaToZero),
    )
    .with_trace(
        Trace::from_series("Capital formation rate", capital)
            .with_color("orange")
            .with_style(TraceStyle::AreaToPrevious),
    )
    .with_band(Band {
        start: INVESTMENT_BAND.0,
        end: INVESTMENT_BAND.1,
        label: "Investment-driven growth dominates (post-2000 infrastructure boom)".into(),
        color: "green".into(),
    })
    .with_footnote(DATA_SOURCE)
}

/// Youth unemployment against GDP with the fitted OLS line.
pub fn youth_unemployment(points: &[(f64, f64)], fit: &LinearFit, since: Year) -> ChartSpec {
    let x: Vec<f64> = points.iter().map(|p| p.0).collect();
    let y: Vec<Option<f64>> = points.iter().map(|p| Some(p.1)).collect();
    let fitted: Vec<Option<f64>> = x.iter().map(|&v| Some(fit.predict(v))).collect();
    ChartSpec::new(
        format!("Youth Unemployment and GDP (since {since})"),
        "China real GDP (100 million yuan)",
        "Youth unemployment rate (%)",
    )
    .with_trace(Trace::new("Observed", x.clone(), y).with_style(TraceStyle::Markers))
    .with_trace(Trace::new(format!("OLS (R² = {:.3})", fit.r_squared()), x, fitted).with_color("red"))
    .with_footnote(DATA_SOURCE)
}

/// First and last year covered by either series.
fn span(a: &PartialSeries, b: &PartialSeries) -> (Year, Year) {
    let first = a.years().first().into_iter().chain(b.years().first()).min();
    let last = a.years().last().into_iter().chain(b.years().last()).max();
    (first.copied().unwrap_or_default(), last.copied().unwrap_or_default())
}
