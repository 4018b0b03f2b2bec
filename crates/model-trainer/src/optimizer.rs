//! L2-Regularized Logistic Regression Fitting
//!
//! Full-batch gradient descent with an Armijo backtracking line search on
//!
//! ```text
//! f(w, b) = mean(softplus(z) - y * z) + |w|^2 / (2 * C * n),   z = Xw + b
//! ```
//!
//! which has the same minimizer as `C * sum(loss) + |w|^2 / 2`. The intercept
//! is not penalized.

use crate::TrainerError;
use inference_engine::{sigmoid, LogisticModel};
use ndarray::{Array1, Array2};
use tracing::{debug, trace};

/// Armijo sufficient-decrease constant
const ARMIJO: f64 = 1e-4;
const MAX_HALVINGS: usize = 60;
const MAX_STEP: f64 = 1e4;

/// Optimizer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerSettings {
    /// Inverse regularization strength
    pub regularization: f64,
    pub max_iterations: usize,
    /// Stop once every gradient component is below this
    pub tolerance: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            regularization: 1.0,
            max_iterations: 500,
            tolerance: 1e-4,
        }
    }
}

/// Fitted model and how the optimizer finished
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub model: LogisticModel,
    pub iterations: usize,
    pub converged: bool,
    pub final_loss: f64,
    /// Max-norm of the gradient at the returned parameters
    pub gradient_norm: f64,
}

/// Fit weights and intercept for rows `x` and 0/1 targets `y`
pub fn fit_logistic(
    x: &Array2<f64>,
    y: &Array1<f64>,
    settings: &OptimizerSettings,
) -> Result<FitResult, TrainerError> {
    let (n, d) = x.dim();
    if n == 0 {
        return Err(TrainerError::Matrix("no training rows".to_string()));
    }
    if y.len() != n {
        return Err(TrainerError::Matrix(format!(
            "{} rows but {} targets",
            n,
            y.len()
        )));
    }

    let objective = Objective {
        x,
        y,
        penalty: 1.0 / (settings.regularization * n as f64),
    };

    let mut w = Array1::<f64>::zeros(d);
    let mut b = 0.0;
    let mut loss = objective.value(&w, b);
    let mut step = 1.0;
    let mut iterations = 0;
    let mut converged = false;

    let (mut grad_w, mut grad_b) = objective.gradient(&w, b);
    let mut gradient_norm = max_norm(&grad_w, grad_b);

    while iterations < settings.max_iterations {
        if gradient_norm <= settings.tolerance {
            converged = true;
            break;
        }

        let grad_sq = grad_w.dot(&grad_w) + grad_b * grad_b;
        let mut accepted = None;
        for _ in 0..MAX_HALVINGS {
            let candidate_w = &w - &(&grad_w * step);
            let candidate_b = b - step * grad_b;
            let candidate_loss = objective.value(&candidate_w, candidate_b);
            if candidate_loss <= loss - ARMIJO * step * grad_sq {
                accepted = Some((candidate_w, candidate_b, candidate_loss));
                break;
            }
            step *= 0.5;
        }

        let Some((next_w, next_b, next_loss)) = accepted else {
            debug!("Line search stalled at iteration {}", iterations);
            break;
        };

        w = next_w;
        b = next_b;
        loss = next_loss;
        iterations += 1;
        step = (step * 2.0).min(MAX_STEP);

        (grad_w, grad_b) = objective.gradient(&w, b);
        gradient_norm = max_norm(&grad_w, grad_b);
        trace!("iter={} loss={:.6} |g|={:.2e}", iterations, loss, gradient_norm);
    }

    if !converged && gradient_norm <= settings.tolerance {
        converged = true;
    }

    debug!(
        "Optimizer finished: iterations={} converged={} loss={:.6}",
        iterations, converged, loss
    );

    Ok(FitResult {
        model: LogisticModel::new(w.to_vec(), b),
        iterations,
        converged,
        final_loss: loss,
        gradient_norm,
    })
}

struct Objective<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    /// 1 / (C * n)
    penalty: f64,
}

impl Objective<'_> {
    fn value(&self, w: &Array1<f64>, b: f64) -> f64 {
        let z = self.x.dot(w) + b;
        let data: f64 = z
            .iter()
            .zip(self.y.iter())
            .map(|(&z, &y)| softplus(z) - y * z)
            .sum();
        data / self.y.len() as f64 + 0.5 * self.penalty * w.dot(w)
    }

    fn gradient(&self, w: &Array1<f64>, b: f64) -> (Array1<f64>, f64) {
        let n = self.y.len() as f64;
        let z = self.x.dot(w) + b;
        let residual = z.mapv(sigmoid) - self.y;
        let grad_w = self.x.t().dot(&residual) / n + w * self.penalty;
        let grad_b = residual.sum() / n;
        (grad_w, grad_b)
    }
}

/// `ln(1 + e^z)` without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

fn max_norm(grad_w: &Array1<f64>, grad_b: f64) -> f64 {
    grad_w.iter().fold(grad_b.abs(), |acc, g| acc.max(g.abs()))
}
