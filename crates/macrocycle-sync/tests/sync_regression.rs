//! End-to-end regression tests for the synchronization analysis.

use macrocycle_series::{AnnualSeries, HpFilter, PartialSeries, Year};
use macrocycle_sync::{FillPolicy, Period, PeriodSet, SyncConfig};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn partial(start: Year, values: &[Option<f64>]) -> PartialSeries {
    let years = (start..start + values.len() as Year).collect();
    PartialSeries::new(years, values.to_vec()).expect("valid test series")
}

fn defined(start: Year, values: &[f64]) -> PartialSeries {
    let values: Vec<Option<f64>> = values.iter().map(|&v| Some(v)).collect();
    partial(start, &values)
}

// ---------------------------------------------------------------------------
// a) perfect co-movement and perfect opposition
// ---------------------------------------------------------------------------

#[test]
fn identical_cycles_correlate_perfectly() {
    let s = defined(2020, &[1.0, -1.0, 1.0, -1.0]);
    let result = SyncConfig::default().analyze(&s, &s).unwrap();

    assert_eq!(result.n_pairs, 4);
    assert!((result.global.unwrap() - 1.0).abs() < 1e-12);

    let covid = result.periods.iter().find(|p| p.name == "2020-2023").unwrap();
    assert_eq!(covid.n_pairs, 4);
    assert!((covid.correlation.unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn opposite_cycles_correlate_negatively() {
    let us = defined(2020, &[1.0, -1.0, 1.0, -1.0]);
    let cn = defined(2020, &[-1.0, 1.0, -1.0, 1.0]);
    let result = SyncConfig::default().analyze(&us, &cn).unwrap();
    assert!((result.global.unwrap() + 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// b) rolling correlation and period slices with sparse data
// ---------------------------------------------------------------------------

#[test]
fn rolling_correlation_waits_for_min_periods() {
    let s = defined(2020, &[1.0, -1.0, 1.0, -1.0]);
    let result = SyncConfig::default().analyze(&s, &s).unwrap();
    let rolling = result.rolling.values();
    assert_eq!(rolling.len(), 4);
    assert_eq!(rolling[0], None);
    assert_eq!(rolling[1], None);
    assert!((rolling[2].unwrap() - 1.0).abs() < 1e-12);
    assert!((rolling[3].unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn periods_outside_the_sample_are_undefined() {
    let s = defined(2020, &[1.0, -1.0, 1.0, -1.0]);
    let result = SyncConfig::default().analyze(&s, &s).unwrap();
    let undefined: Vec<&str> = result
        .periods
        .iter()
        .filter(|p| p.correlation.is_none())
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(undefined, ["1978-1990", "1991-2001", "2002-2008", "2009-2019"]);
    assert_eq!(result.strongest_period().unwrap().name, "2020-2023");
}

#[test]
fn single_year_slice_is_undefined() {
    let us = defined(2018, &[0.5, -1.0, 2.0, -0.5, 1.0]);
    let cn = defined(2018, &[0.4, -0.8, 1.5, -0.2, 0.7]);
    let periods = PeriodSet::new(vec![
        Period::new("early", 2018, 2018).unwrap(),
        Period::new("late", 2019, 2022).unwrap(),
    ])
    .unwrap();
    let result = SyncConfig::default()
        .with_periods(periods)
        .analyze(&us, &cn)
        .unwrap();
    assert_eq!(result.periods[0].n_pairs, 1);
    assert_eq!(result.periods[0].correlation, None);
    assert!(result.periods[1].correlation.unwrap() > 0.9);
}

// ---------------------------------------------------------------------------
// c) gap filling is configurable and audited
// ---------------------------------------------------------------------------

#[test]
fn fill_policy_controls_pair_count() {
    let us = defined(2000, &[1.0, 3.0, 2.0, 5.0, 4.0, 6.0]);
    let cn = partial(2000, &[Some(2.0), Some(5.0), None, Some(9.0), Some(7.0), Some(11.0)]);

    let filled = SyncConfig::default().analyze(&us, &cn).unwrap();
    assert_eq!(filled.fill_policy, FillPolicy::ForwardBackward);
    assert_eq!(filled.filled(), 1);
    assert_eq!(filled.n_pairs, 6);

    let strict = SyncConfig::default()
        .with_fill_policy(FillPolicy::None)
        .analyze(&us, &cn)
        .unwrap();
    assert_eq!(strict.filled(), 0);
    assert_eq!(strict.n_pairs, 5);
    assert_ne!(filled.global, strict.global);
}

#[test]
fn rolling_correlation_ignores_filled_cells() {
    let us = defined(2000, &[1.0, 3.0, 2.0, 5.0, 4.0, 6.0]);
    let cn = partial(2000, &[Some(2.0), None, None, Some(9.0), Some(7.0), Some(11.0)]);
    let result = SyncConfig::default().analyze(&us, &cn).unwrap();
    // Years 2000..=2003 hold only two valid pairs before filling.
    assert_eq!(&result.rolling.values()[..4], &[None, None, None, None]);
    assert!(result.rolling.values()[4].is_some());
}

#[test]
fn partially_overlapping_years_are_joined() {
    let us = defined(1990, &[1.0, 2.0, 0.0, 3.0, 1.0, 4.0]);
    let cn = defined(1993, &[2.0, 0.5, 3.5, 1.0, 2.0]);
    let result = SyncConfig::default().analyze(&us, &cn).unwrap();
    assert_eq!(result.aligned.years(), &[1993, 1994, 1995]);
    assert_eq!(result.left_normalized.len(), 6);
    assert_eq!(result.right_normalized.len(), 5);
}

// ---------------------------------------------------------------------------
// d) full decomposition pipeline
// ---------------------------------------------------------------------------

#[test]
fn hp_cycles_of_shared_shock_are_synchronized() {
    let years: Vec<Year> = (1978..2024).collect();
    let shock = |t: f64| (t * 0.7).sin() + 0.5 * (t * 0.23).cos();
    let us: Vec<f64> = (0..46)
        .map(|i| {
            let t = f64::from(i);
            1_000.0 * 1.03f64.powf(t) * (1.0 + 0.02 * shock(t))
        })
        .collect();
    let cn: Vec<f64> = (0..46)
        .map(|i| {
            let t = f64::from(i);
            300.0 * 1.09f64.powf(t) * (1.0 + 0.05 * shock(t))
        })
        .collect();

    let hp = HpFilter::annual();
    let us_pct = hp
        .decompose(&AnnualSeries::new(years.clone(), us).unwrap())
        .unwrap()
        .cycle_pct();
    let cn_pct = hp
        .decompose(&AnnualSeries::new(years, cn).unwrap())
        .unwrap()
        .cycle_pct();

    let result = SyncConfig::default().analyze(&us_pct, &cn_pct).unwrap();
    assert_eq!(result.n_pairs, 46);
    assert_eq!(result.filled(), 0);
    assert!(result.global.unwrap() > 0.9);
    assert!(result.periods.iter().all(|p| p.correlation.is_some()));
}
