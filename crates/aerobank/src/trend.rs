//! Power-law trendlines.
//!
//! Two distinct models are supported. An empirical fit runs ordinary least
//! squares on `(ln x, ln y)`; the slope is the exponent and `exp(intercept)`
//! the coefficient. A theoretical curve instead takes a fixed exponent from
//! the chart's aerodynamic scaling law and a caller-supplied coefficient.
//! Both are sampled over a logarithmically spaced domain for overlay.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::chart::ChartKind;
use crate::error::{Error, Result};
use crate::series::Series;

/// `y = coefficient * x^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerLaw {
    /// Multiplicative coefficient `k`.
    pub coefficient: f64,
    /// Exponent `n`.
    pub exponent: f64,
}

impl PowerLaw {
    /// Evaluate the law at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficient * x.powf(self.exponent)
    }
}

/// Result of a least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerLawFit {
    /// Fitted law.
    #[serde(flatten)]
    pub law: PowerLaw,
    /// Coefficient of determination in log-log space.
    pub r_squared: f64,
    /// Number of points used.
    pub points: usize,
}

/// A sampled curve point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Fit `y = k * x^n` to `points` by least squares in log-log space.
///
/// Points with a non-positive or non-finite coordinate are ignored. Returns
/// `None` when fewer than two usable points remain or when all usable points
/// share the same x.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_power_law(points: &[(f64, f64)]) -> Option<PowerLawFit> {
    let logs: Vec<(f64, f64)> = points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite() && *x > 0.0 && *y > 0.0)
        .map(|(x, y)| (x.ln(), y.ln()))
        .collect();
    if logs.len() < 2 {
        return None;
    }

    let n = logs.len() as f64;
    let mean_x = logs.iter().map(|(lx, _)| lx).sum::<f64>() / n;
    let mean_y = logs.iter().map(|(_, ly)| ly).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (lx, ly) in &logs {
        let dx = lx - mean_x;
        let dy = ly - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx <= f64::EPSILON * n {
        return None;
    }

    let exponent = sxy / sxx;
    let intercept = mean_y - exponent * mean_x;
    let coefficient = intercept.exp();
    if !coefficient.is_finite() || !exponent.is_finite() {
        return None;
    }

    // A horizontal line through identical y values fits exactly.
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Some(PowerLawFit {
        law: PowerLaw {
            coefficient,
            exponent,
        },
        r_squared,
        points: logs.len(),
    })
}

/// Sample `y = coefficient * x^exponent` at `n` log-spaced x values from
/// `x_min` to `x_max` inclusive.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `coefficient` or `exponent` is not
/// finite, if `n < 2`, if `x_min` is not strictly positive, or if `x_max` is
/// not greater than `x_min`.
#[allow(clippy::cast_precision_loss)]
pub fn sample_power_law(
    coefficient: f64,
    exponent: f64,
    x_min: f64,
    x_max: f64,
    n: usize,
) -> Result<Vec<TrendPoint>> {
    if !(coefficient.is_finite() && exponent.is_finite()) {
        return Err(Error::invalid_argument(format!(
            "power law must be finite, got {coefficient} * x^{exponent}"
        )));
    }
    if n < 2 {
        return Err(Error::invalid_argument(format!(
            "at least 2 samples required, got {n}"
        )));
    }
    if !(x_min.is_finite() && x_min > 0.0) {
        return Err(Error::invalid_argument(format!(
            "domain start must be positive, got {x_min}"
        )));
    }
    if !(x_max.is_finite() && x_max > x_min) {
        return Err(Error::invalid_argument(format!(
            "domain end must exceed start, got [{x_min}, {x_max}]"
        )));
    }

    let law = PowerLaw {
        coefficient,
        exponent,
    };
    let ratio = x_max / x_min;
    let last = (n - 1) as f64;
    Ok((0..n)
        .map(|i| {
            let x = x_min * ratio.powf(i as f64 / last);
            TrendPoint { x, y: law.eval(x) }
        })
        .collect())
}

/// Fit one power law per group of `series`.
///
/// Groups with fewer than two usable points are left out.
#[must_use]
pub fn fit_groups(series: &Series) -> BTreeMap<String, PowerLawFit> {
    series
        .groups
        .iter()
        .filter_map(|(label, points)| {
            let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
            match fit_power_law(&xy) {
                Some(fit) => Some((label.clone(), fit)),
                None => {
                    debug!(group = %label, points = xy.len(), "Skipping trendline for group");
                    None
                }
            }
        })
        .collect()
}

/// Sample the theoretical scaling-law curve of `chart`.
///
/// `coefficient` overrides the law's default coefficient. Returns `Ok(None)`
/// for charts without a scaling law, which always includes speed against
/// weight.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for a non-finite or non-positive
/// coefficient, or fewer than two samples.
pub fn theoretical_trendline(
    chart: ChartKind,
    coefficient: Option<f64>,
    samples: usize,
) -> Result<Option<Vec<TrendPoint>>> {
    if !chart.allows_trendline() {
        debug!(%chart, "Chart has no trendline");
        return Ok(None);
    }
    let Some(law) = chart.scaling_law() else {
        return Ok(None);
    };

    let k = coefficient.unwrap_or(law.default_coefficient);
    if !(k.is_finite() && k > 0.0) {
        return Err(Error::invalid_argument(format!(
            "trendline coefficient must be positive, got {k}"
        )));
    }
    sample_power_law(k, law.exponent, law.x_min, law.x_max, samples).map(Some)
}
