//! Forecast engine: polynomial regression with a 90-day horizon.
//!
//! Fits a least-squares polynomial to the full observed series (day as
//! numeric x, total as y) and appends one synthetic point at the fixed
//! horizon past the last observed day. The brushable selection range in
//! the UI spans the observed data plus this projection; interpolating
//! between the last real point and the synthetic one is the rendering
//! layer's job.
//!
//! Recomputed once per full data load, never per render frame.

use chrono::Duration;

use crate::types::{CumulativeSeries, Forecast, ForecastPoint};

/// Days past the last observed day the projection lands on.
pub const FORECAST_HORIZON_DAYS: i64 = 90;

/// Polynomial degree for the fit, capped at `points - 1` for short
/// series.
const REGRESSION_DEGREE: usize = 3;

/// Fit the observed series and project it onto the 90-day horizon.
///
/// Fewer than 2 observed points leave the regression undefined; that is
/// surfaced as [`Forecast::InsufficientData`] rather than NaN or a
/// panic, and the caller must not render a forecast line.
pub fn forecast(series: &CumulativeSeries) -> Forecast {
    let Some((first, last)) = series.first().zip(series.last()) else {
        return Forecast::InsufficientData;
    };
    if series.len() < 2 {
        return Forecast::InsufficientData;
    }

    // Days since the first observed day keep x small and the normal
    // equations well conditioned.
    let points: Vec<(f64, f64)> = series
        .iter()
        .map(|p| {
            let x = (p.day - first.day).num_days() as f64;
            (x, p.total as f64)
        })
        .collect();

    let degree = REGRESSION_DEGREE.min(points.len() - 1);
    let coeffs = fit_polynomial(&points, degree);

    let horizon = last.day + Duration::days(FORECAST_HORIZON_DAYS);
    let horizon_x = (horizon - first.day).num_days() as f64;
    let predicted = evaluate(&coeffs, horizon_x);

    let mut projected: Vec<ForecastPoint> = series
        .iter()
        .map(|p| ForecastPoint {
            day: p.day,
            total: p.total as f64,
        })
        .collect();
    projected.push(ForecastPoint {
        day: horizon,
        total: predicted,
    });

    tracing::debug!(
        observed = series.len(),
        degree,
        horizon = %horizon,
        predicted,
        "Forecast recomputed"
    );

    Forecast::Projected {
        series: projected,
        horizon,
    }
}

/// Least-squares polynomial fit via the normal equations.
///
/// Returns coefficients lowest power first. With distinct x values and
/// `degree <= points - 1` the system is nonsingular.
fn fit_polynomial(points: &[(f64, f64)], degree: usize) -> Vec<f64> {
    let n = degree + 1;

    // Power sums Σ x^k for k = 0..2*degree and moment sums Σ y*x^k.
    let mut x_pows = vec![0.0; 2 * degree + 1];
    let mut moments = vec![0.0; n];
    for &(x, y) in points {
        let mut xp = 1.0;
        for (k, pow) in x_pows.iter_mut().enumerate() {
            *pow += xp;
            if k < n {
                moments[k] += y * xp;
            }
            xp *= x;
        }
    }

    let mut matrix = vec![vec![0.0; n + 1]; n];
    for (row, matrix_row) in matrix.iter_mut().enumerate() {
        for col in 0..n {
            matrix_row[col] = x_pows[row + col];
        }
        matrix_row[n] = moments[row];
    }

    gaussian_elimination(&mut matrix)
}

/// Solve an augmented linear system in place with partial pivoting.
fn gaussian_elimination(matrix: &mut [Vec<f64>]) -> Vec<f64> {
    let n = matrix.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| {
                matrix[a][col]
                    .abs()
                    .partial_cmp(&matrix[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        matrix.swap(col, pivot);

        let pivot_value = matrix[col][col];
        if pivot_value.abs() < f64::EPSILON {
            continue;
        }

        for row in (col + 1)..n {
            let factor = matrix[row][col] / pivot_value;
            for k in col..=n {
                matrix[row][k] -= factor * matrix[col][k];
            }
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let mut value = matrix[row][n];
        for col in (row + 1)..n {
            value -= matrix[row][col] * solution[col];
        }
        let pivot_value = matrix[row][row];
        solution[row] = if pivot_value.abs() < f64::EPSILON {
            0.0
        } else {
            value / pivot_value
        };
    }
    solution
}

/// Evaluate a polynomial (coefficients lowest power first) at x.
fn evaluate(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
