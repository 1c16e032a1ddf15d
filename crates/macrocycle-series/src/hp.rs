//! Hodrick-Prescott trend/cycle decomposition.
//!
//! The trend `τ` minimizes
//!
//! ```text
//! Σ (y_t − τ_t)² + λ Σ (τ_{t+1} − 2τ_t + τ_{t−1})²
//! ```
//!
//! whose normal equations are `(I + λ D'D) τ = y` with `D` the
//! `(n−2) × n` second-difference operator. The system matrix is symmetric,
//! positive definite and pentadiagonal, so it is factored exactly with a
//! banded Cholesky decomposition in O(n).

use crate::error::DecomposeError;
use crate::growth::ratio_pct;
use crate::series::{AnnualSeries, PartialSeries, Year};

/// Second-difference stencil applied by each row of `D`.
const STENCIL: [f64; 3] = [1.0, -2.0, 1.0];

/// Hodrick-Prescott filter with a fixed smoothing parameter.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `lambda`  | 100 (annual data) |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HpFilter {
    lambda: f64,
}

impl HpFilter {
    /// Conventional smoothing parameter for annual observations.
    pub const ANNUAL_LAMBDA: f64 = 100.0;

    /// Fewest observations the filter accepts.
    pub const MIN_OBSERVATIONS: usize = 4;

    /// Create a filter with the given smoothing parameter.
    ///
    /// Larger values penalize trend curvature more heavily and yield a
    /// smoother trend; `0` reproduces the input as its own trend.
    ///
    /// # Errors
    ///
    /// Returns [`DecomposeError::InvalidLambda`] if `lambda` is negative or
    /// not finite.
    pub fn new(lambda: f64) -> Result<Self, DecomposeError> {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(DecomposeError::InvalidLambda { lambda });
        }
        Ok(Self { lambda })
    }

    /// Create a filter with λ = 100.
    #[must_use]
    pub fn annual() -> Self {
        Self {
            lambda: Self::ANNUAL_LAMBDA,
        }
    }

    /// Return the smoothing parameter.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Split `series` into trend and cycle components over its full index.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DecomposeError::TooShort`] | Fewer than [`HpFilter::MIN_OBSERVATIONS`] observations |
    /// | [`DecomposeError::NotPositiveDefinite`] | Factorization broke down numerically |
    /// | [`DecomposeError::Series`] | A component contains non-finite values |
    pub fn decompose(&self, series: &AnnualSeries) -> Result<Decomposition, DecomposeError> {
        let n = series.len();
        if n < Self::MIN_OBSERVATIONS {
            return Err(DecomposeError::TooShort {
                len: n,
                min: Self::MIN_OBSERVATIONS,
            });
        }

        let y = series.values();
        let trend = solve_penalized(y, self.lambda)?;
        let cycle: Vec<f64> = y.iter().zip(&trend).map(|(v, t)| v - t).collect();

        Ok(Decomposition {
            trend: AnnualSeries::new(series.years().to_vec(), trend)?,
            cycle: AnnualSeries::new(series.years().to_vec(), cycle)?,
            lambda: self.lambda,
        })
    }
}

impl Default for HpFilter {
    fn default() -> Self {
        Self::annual()
    }
}

/// Solve `(I + λ D'D) τ = y` for `τ`.
///
/// Lower band storage: `band[i][d]` holds entry `(i, i − d)` for `d ∈ {0, 1, 2}`.
fn solve_penalized(y: &[f64], lambda: f64) -> Result<Vec<f64>, DecomposeError> {
    let n = y.len();

    let mut band = vec![[0.0f64; 3]; n];
    for row in &mut band {
        row[0] = 1.0;
    }
    for r in 0..n - 2 {
        for p in 0..3 {
            for q in 0..=p {
                band[r + p][p - q] += lambda * STENCIL[p] * STENCIL[q];
            }
        }
    }

    // Cholesky factor L in the same band layout: l[i][d] = L[i][i - d].
    let mut l = vec![[0.0f64; 3]; n];
    for i in 0..n {
        for d in (0..=i.min(2)).rev() {
            let j = i - d;
            let mut s = band[i][d];
            for k in i.saturating_sub(2)..j {
                s -= l[i][i - k] * l[j][j - k];
            }
            if d == 0 {
                if !(s > 0.0 && s.is_finite()) {
                    return Err(DecomposeError::NotPositiveDefinite { row: i });
                }
                l[i][0] = s.sqrt();
            } else {
                l[i][d] = s / l[j][0];
            }
        }
    }

    // L z = y
    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut s = y[i];
        for d in 1..=i.min(2) {
            s -= l[i][d] * z[i - d];
        }
        z[i] = s / l[i][0];
    }

    // L' τ = z
    let mut tau = vec![0.0; n];
    for i in (0..n).rev() {
        let mut s = z[i];
        for d in 1..=2 {
            if i + d < n {
                s -= l[i + d][d] * tau[i + d];
            }
        }
        tau[i] = s / l[i][0];
    }

    Ok(tau)
}

/// Trend and cycle components of an annual series.
///
/// `trend + cycle` reproduces the decomposed series at every year.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    trend: AnnualSeries,
    cycle: AnnualSeries,
    lambda: f64,
}

impl Decomposition {
    /// Return the smooth long-run component.
    #[must_use]
    pub fn trend(&self) -> &AnnualSeries {
        &self.trend
    }

    /// Return the residual short-run component.
    #[must_use]
    pub fn cycle(&self) -> &AnnualSeries {
        &self.cycle
    }

    /// Return the smoothing parameter used.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Return the shared year index.
    #[must_use]
    pub fn years(&self) -> &[Year] {
        self.trend.years()
    }

    /// Cycle as a percentage deviation from trend: `100 × cycle / trend`.
    ///
    /// Entries where the trend is exactly zero are undefined.
    #[must_use]
    pub fn cycle_pct(&self) -> PartialSeries {
        ratio_pct(
            &PartialSeries::from(&self.cycle),
            &PartialSeries::from(&self.trend),
        )
    }

    /// Recombine the components: `trend + cycle`.
    #[must_use]
    pub fn reconstruct(&self) -> AnnualSeries {
        let values = self
            .trend
            .values()
            .iter()
            .zip(self.cycle.values())
            .map(|(t, c)| t + c)
            .collect();
        AnnualSeries::new_unchecked(self.trend.years().to_vec(), values)
    }
}
