//! Ordinary least squares line fit with a two-sided significance test on the slope.

use crate::error::StatsError;
use crate::series::AnnualSeries;

/// Result of fitting `y = intercept + slope · x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Number of points fitted.
    pub n: usize,
    /// Estimated slope.
    pub slope: f64,
    /// Estimated intercept.
    pub intercept: f64,
    /// Pearson correlation between `x` and `y`.
    pub r_value: f64,
    /// Two-sided p-value for the null hypothesis `slope = 0` (Student t, n − 2 df).
    pub p_value: f64,
    /// Standard error of the slope estimate.
    pub std_err: f64,
}

impl LinearFit {
    /// Fewest points for which the slope's standard error is defined.
    pub const MIN_POINTS: usize = 3;

    /// Fit a least squares line through `(x, y)`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`StatsError::LengthMismatch`] | `x` and `y` differ in length |
    /// | [`StatsError::TooFewPoints`] | Fewer than [`LinearFit::MIN_POINTS`] points |
    /// | [`StatsError::ConstantRegressor`] | All `x` values are equal |
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, StatsError> {
        if x.len() != y.len() {
            return Err(StatsError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        let n = x.len();
        if n < Self::MIN_POINTS {
            return Err(StatsError::TooFewPoints {
                n,
                min: Self::MIN_POINTS,
            });
        }

        let nf = n as f64;
        let x_mean = x.iter().sum::<f64>() / nf;
        let y_mean = y.iter().sum::<f64>() / nf;
        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (&xi, &yi) in x.iter().zip(y) {
            let dx = xi - x_mean;
            let dy = yi - y_mean;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        if sxx == 0.0 {
            return Err(StatsError::ConstantRegressor);
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let r_value = if syy == 0.0 {
            0.0
        } else {
            (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
        };

        let df = nf - 2.0;
        let unexplained = 1.0 - r_value * r_value;
        let (p_value, std_err) = if unexplained <= 0.0 {
            (0.0, 0.0)
        } else {
            let t = r_value * (df / unexplained).sqrt();
            let std_err = (unexplained * syy / sxx / df).sqrt();
            (student_t_two_sided(t, df), std_err)
        };

        Ok(Self {
            n,
            slope,
            intercept,
            r_value,
            p_value,
            std_err,
        })
    }

    /// Fit `value` against `year` for an annual series.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LinearFit::fit`].
    pub fn over_years(series: &AnnualSeries) -> Result<Self, StatsError> {
        let x: Vec<f64> = series.years().iter().map(|&y| f64::from(y)).collect();
        Self::fit(&x, series.values())
    }

    /// Coefficient of determination.
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }

    /// Evaluate the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Whether the slope differs from zero at significance level `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Two-sided tail probability `P(|T| > |t|)` for Student's t with `df` degrees of freedom.
fn student_t_two_sided(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    regularized_beta(df / (df + t * t), df / 2.0, 0.5)
}

/// Regularized incomplete beta function `I_x(a, b)`.
fn regularized_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    if x < (a + 1.0) / (a + b + 2.0) {
        ln_front.exp() * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - ln_front.exp() * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    const MAX_ITER: usize = 300;
    const EPS: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Natural log of the gamma function (Lanczos approximation, g = 7).
fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + G + 0.5;
    let series = COEF
        .iter()
        .enumerate()
        .skip(1)
        .fold(COEF[0], |acc, (i, c)| acc + c / (x + i as f64));
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}
