use serde::{Deserialize, Serialize};

use crate::result::AiError;

/// Ordinary least-squares linear model with an intercept.
///
/// Model:
/// - `y ≈ intercept + Σ coefficients[j] * x[j]`
/// - Columns and target are centered before forming `XᵀX`, so a large common
///   offset in a feature does not swamp its variation.
/// - The centered normal matrix is solved through its eigen-decomposition
///   (cyclic Jacobi). Directions with a negligible eigenvalue are dropped,
///   which yields the minimum-norm solution for constant or collinear columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// Eigenvalues below this fraction of the largest one are treated as zero.
const RANK_TOLERANCE: f64 = 1e-12;

/// Upper bound on Jacobi sweeps; a symmetric matrix converges in far fewer.
const MAX_SWEEPS: usize = 64;

impl LinearRegression {
    /// Fit a model on `features` (one row per observation) against `targets`.
    pub fn fit(features: &[Vec<f64>], targets: &[f64]) -> Result<Self, AiError> {
        if features.len() != targets.len() {
            return Err(AiError::InvalidInput(format!(
                "feature rows ({}) and targets ({}) differ in length",
                features.len(),
                targets.len()
            )));
        }

        let width = features.first().map(Vec::len).unwrap_or(0);
        if features.iter().any(|row| row.len() != width) {
            return Err(AiError::InvalidInput("feature rows have inconsistent widths".to_string()));
        }

        // One parameter per feature plus the intercept.
        let params = width + 1;
        if targets.len() < params {
            return Err(AiError::InvalidInput(format!(
                "need at least {params} rows to fit {params} parameters (got {})",
                targets.len()
            )));
        }

        if features.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
            return Err(AiError::InvalidInput("inputs must be finite numbers".to_string()));
        }

        let x_mean = column_means(features, width);
        let y_mean = mean(targets);

        // Centered XᵀX and Xᵀy.
        let mut xtx = vec![vec![0.0; width]; width];
        let mut xty = vec![0.0; width];
        for (row, &y) in features.iter().zip(targets) {
            let x: Vec<f64> = row.iter().zip(&x_mean).map(|(v, m)| v - m).collect();
            let dy = y - y_mean;
            for i in 0..width {
                xty[i] += x[i] * dy;
                for j in 0..width {
                    xtx[i][j] += x[i] * x[j];
                }
            }
        }

        let coefficients = pseudo_solve(xtx, &xty)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        if !intercept.is_finite() || coefficients.iter().any(|b| !b.is_finite()) {
            return Err(AiError::InferenceFailed("fitted parameters are not finite".to_string()));
        }

        Ok(Self { intercept, coefficients })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }

    /// Coefficient of determination on the given data.
    ///
    /// A constant target is fitted perfectly by the intercept, which yields 1.0.
    pub fn r_squared(&self, features: &[Vec<f64>], targets: &[f64]) -> f64 {
        if targets.is_empty() {
            return 0.0;
        }
        let mean = mean(targets);
        let ss_tot: f64 = targets.iter().map(|y| (y - mean).powi(2)).sum();
        let ss_res: f64 = features
            .iter()
            .zip(targets)
            .map(|(row, y)| (y - self.predict(row)).powi(2))
            .sum();

        if ss_tot <= f64::EPSILON {
            return if ss_res <= f64::EPSILON { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

fn column_means(features: &[Vec<f64>], width: usize) -> Vec<f64> {
    let mut sums = vec![0.0; width];
    for row in features {
        for (sum, v) in sums.iter_mut().zip(row) {
            *sum += v;
        }
    }
    let n = features.len().max(1) as f64;
    sums.into_iter().map(|s| s / n).collect()
}

/// Minimum-norm solution of `a · x = b` for symmetric positive semi-definite `a`.
fn pseudo_solve(a: Vec<Vec<f64>>, b: &[f64]) -> Result<Vec<f64>, AiError> {
    let n = b.len();
    let (values, vectors) = symmetric_eigen(a)?;

    let largest = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let cutoff = largest * RANK_TOLERANCE;

    let mut x = vec![0.0; n];
    for (k, &lambda) in values.iter().enumerate() {
        if lambda <= cutoff || lambda <= 0.0 {
            continue;
        }
        // Projection of b onto eigenvector k, scaled by 1/λ.
        let weight = (0..n).map(|i| vectors[i][k] * b[i]).sum::<f64>() / lambda;
        for (i, xi) in x.iter_mut().enumerate() {
            *xi += weight * vectors[i][k];
        }
    }
    Ok(x)
}

/// Eigenvalues and eigenvectors (as columns) of a symmetric matrix.
fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> Result<(Vec<f64>, Vec<Vec<f64>>), AiError> {
    let n = a.len();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    let total: f64 = a.iter().flatten().map(|x| x * x).sum();

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[i][j] * a[i][j])
            .sum();
        if off <= f64::EPSILON * f64::EPSILON * total {
            let values = (0..n).map(|i| a[i][i]).collect();
            return Ok((values, v));
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (akp, akq) = (row[p], row[q]);
                    row[p] = c * akp - s * akq;
                    row[q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    Err(AiError::InferenceFailed(
        "normal matrix eigen-decomposition did not converge".to_string(),
    ))
}
