//! Accuracy regression tests for macrocycle-series.
//!
//! Reference trends were computed with exact rational arithmetic on the dense
//! `(I + λ D'D) τ = y` system and are hardcoded to catch regressions in the
//! banded solver.

use macrocycle_series::{
    AnnualSeries, DescriptiveStats, HpFilter, LinearFit, PartialSeries, pct_change, rolling_std,
};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn annual(start: i32, values: &[f64]) -> AnnualSeries {
    let years = (start..start + values.len() as i32).collect();
    AnnualSeries::new(years, values.to_vec()).expect("valid test series")
}

fn assert_close(got: &[f64], want: &[f64], tol: f64) {
    assert_eq!(got.len(), want.len());
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        assert!((g - w).abs() < tol, "index {i}: got {g:.15}, expected {w:.15}");
    }
}

// ---------------------------------------------------------------------------
// a) hp_trend_matches_exact_solution
// ---------------------------------------------------------------------------

#[test]
fn hp_trend_matches_exact_solution_lambda_100() {
    let s = annual(2000, &[10.0, 12.0, 15.0, 13.0, 18.0, 21.0, 20.0, 25.0]);
    let d = HpFilter::annual().decompose(&s).unwrap();
    let expected = [
        9.790379461098478,
        11.761194976880716,
        13.73410669805197,
        15.713598880232448,
        17.716814712061836,
        19.7337613933775,
        21.757277976896187,
        23.792865901400862,
    ];
    assert_close(d.trend().values(), &expected, 1e-10);
}

#[test]
fn hp_trend_matches_exact_solution_lambda_1600() {
    let s = annual(1990, &[3.0, -1.0, 4.0, 1.0, 5.0, 9.0]);
    let d = HpFilter::new(1600.0).unwrap().decompose(&s).unwrap();
    let expected = [
        0.28891927915454474,
        1.570896921519283,
        2.8545689893345494,
        4.1400230974749235,
        5.428062755196649,
        6.7175289573200505,
    ];
    assert_close(d.trend().values(), &expected, 1e-10);
}

// ---------------------------------------------------------------------------
// b) decomposition_reconstructs_every_year
// ---------------------------------------------------------------------------

#[test]
fn decomposition_reconstructs_every_year() {
    // GDP-like exponential growth with a business cycle on top.
    let values: Vec<f64> = (0..46)
        .map(|i| {
            let t = i as f64;
            3_600.0 * 1.09f64.powf(t) * (1.0 + 0.03 * (t * 0.8).sin())
        })
        .collect();
    let s = annual(1978, &values);
    let d = HpFilter::annual().decompose(&s).unwrap();
    let rebuilt = d.reconstruct();
    for (year, value) in s.iter() {
        let got = rebuilt.get(year).unwrap();
        assert!(
            (got - value).abs() <= 1e-9 * value.abs().max(1.0),
            "year {year}: {got} vs {value}"
        );
    }
    // Positive trend everywhere, so every percentage deviation is defined.
    assert_eq!(d.cycle_pct().n_defined(), s.len());
}

// ---------------------------------------------------------------------------
// c) derived statistics on a fixed panel column
// ---------------------------------------------------------------------------

#[test]
fn rolling_std_then_trend_test() {
    // Volatility that grows linearly: rolling std over a widening zig-zag.
    let values: Vec<f64> = (0..30)
        .map(|i| if i % 2 == 0 { i as f64 } else { -(i as f64) })
        .collect();
    let s = annual(1980, &values);
    let rolling = rolling_std(&s, 10).unwrap();
    assert_eq!(rolling.n_defined(), 21);

    let defined = rolling.drop_undefined().unwrap();
    assert_eq!(defined.first_year(), 1989);
    let fit = LinearFit::over_years(&defined).unwrap();
    assert!(fit.slope > 0.0);
    assert!(fit.is_significant(0.05));
}

#[test]
fn growth_rates_of_compound_series_are_constant() {
    let values: Vec<f64> = (0..10).map(|i| 100.0 * 1.07f64.powi(i)).collect();
    let s = annual(2000, &values);
    let g = pct_change(&PartialSeries::from(&s));
    assert_eq!(g.values()[0], None);
    for v in g.values().iter().skip(1) {
        assert!((v.unwrap() - 7.0).abs() < 1e-9);
    }
}

#[test]
fn descriptive_stats_known_sample() {
    let stats = DescriptiveStats::compute(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
    assert_eq!(stats.median, 3.0);
    assert!((stats.mean - 22.0).abs() < 1e-12);
    assert!(stats.skewness.unwrap() > 1.0);
    assert!(stats.kurtosis.unwrap() > -3.0);
}
