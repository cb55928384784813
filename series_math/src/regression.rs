//! Regularised linear least squares
//!
//! Contains a ridge regression solved through the normal equations
//! `(X'X + diag(penalty)) b = X'y` with a Cholesky factorisation. Each
//! column gets its own penalty, which is how Gaussian priors of different
//! strength on trend and seasonal coefficients are expressed.

use crate::{MathError, Result};

/// Diagonal jitter keeping unpenalised columns solvable
const JITTER: f64 = 1e-9;

/// Fitted ridge regression
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    coefficients: Vec<f64>,
}

impl RidgeRegression {
    /// Fit coefficients for `rows` (design matrix, one row per observation) against `targets`
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], penalties: &[f64]) -> Result<Self> {
        if rows.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a regression without observations".to_string(),
            ));
        }
        if rows.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Design matrix has {} rows but {} targets were given",
                rows.len(),
                targets.len()
            )));
        }

        let width = penalties.len();
        if width == 0 {
            return Err(MathError::InvalidInput(
                "Design matrix has no columns".to_string(),
            ));
        }
        if let Some(row) = rows.iter().find(|r| r.len() != width) {
            return Err(MathError::InvalidInput(format!(
                "Design row has {} columns, expected {}",
                row.len(),
                width
            )));
        }
        if penalties.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(MathError::InvalidInput(
                "Penalties must be finite and non-negative".to_string(),
            ));
        }

        // Normal equations, upper triangle mirrored afterwards
        let mut gram = vec![vec![0.0; width]; width];
        let mut rhs = vec![0.0; width];
        for (row, &y) in rows.iter().zip(targets.iter()) {
            for i in 0..width {
                let xi = row[i];
                if xi == 0.0 {
                    continue;
                }
                rhs[i] += xi * y;
                for j in i..width {
                    gram[i][j] += xi * row[j];
                }
            }
        }
        for i in 0..width {
            for j in 0..i {
                gram[i][j] = gram[j][i];
            }
            gram[i][i] += penalties[i] + JITTER;
        }

        let coefficients = solve_cholesky(gram, rhs)?;
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(MathError::CalculationError(
                "Regression produced non-finite coefficients".to_string(),
            ));
        }

        Ok(Self { coefficients })
    }

    /// Fitted coefficients, one per design column
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Predict the target for a single design row
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row.iter())
            .map(|(b, x)| b * x)
            .sum()
    }
}

/// Solve `a x = b` for a symmetric positive definite `a`
fn solve_cholesky(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    // In-place lower factor: a = L L'
    for j in 0..n {
        let mut diag = a[j][j];
        for k in 0..j {
            diag -= a[j][k] * a[j][k];
        }
        if diag <= 0.0 || !diag.is_finite() {
            return Err(MathError::CalculationError(
                "Normal equations are not positive definite".to_string(),
            ));
        }
        let diag = diag.sqrt();
        a[j][j] = diag;

        for i in (j + 1)..n {
            let mut value = a[i][j];
            for k in 0..j {
                value -= a[i][k] * a[j][k];
            }
            a[i][j] = value / diag;
        }
    }

    // Forward substitution: L z = b
    for i in 0..n {
        let partial: f64 = (0..i).map(|k| a[i][k] * b[k]).sum();
        b[i] = (b[i] - partial) / a[i][i];
    }

    // Back substitution: L' x = z
    for i in (0..n).rev() {
        let partial: f64 = ((i + 1)..n).map(|k| a[k][i] * b[k]).sum();
        b[i] = (b[i] - partial) / a[i][i];
    }

    Ok(b)
}
