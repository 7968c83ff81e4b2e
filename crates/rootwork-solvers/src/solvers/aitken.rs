//! Aitken Δ² acceleration of fixed-point iteration.

use serde::{Deserialize, Serialize};

use crate::error::{FailureReason, SolveResult};
use crate::function::ScalarFn;
use crate::solvers::controller::{try_step, Controller};
use crate::solvers::{Method, Solution, SolverConfig, Step};

/// Result of applying the Δ² formula to three terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AitkenEstimate {
    /// Extrapolated value, or `x2` when not accelerated.
    pub value: f64,
    /// False when the denominator was degenerate and `x2` was returned.
    pub accelerated: bool,
}

/// Applies Aitken's Δ² formula once.
///
/// ```text
/// x̂ = x0 - (x1 - x0)² / (x2 - 2·x1 + x0)
/// ```
///
/// When `|x2 - 2·x1 + x0| < threshold` the terms carry no usable curvature
/// and `x2` is returned unchanged with `accelerated == false`.
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::aitken_extrapolate;
///
/// // Three terms of x_{n+1} = e^{-x_n} from x0 = 1
/// let est = aitken_extrapolate(1.0, 0.367_879, 0.692_201, 1e-15);
/// assert!(est.accelerated);
/// assert!((est.value - 0.5822).abs() < 1e-4);
/// ```
#[must_use]
pub fn aitken_extrapolate(x0: f64, x1: f64, x2: f64, threshold: f64) -> AitkenEstimate {
    let denominator = x2 - 2.0 * x1 + x0;
    if denominator.abs() < threshold {
        return AitkenEstimate {
            value: x2,
            accelerated: false,
        };
    }
    let delta = x1 - x0;
    AitkenEstimate {
        value: x0 - delta * delta / denominator,
        accelerated: true,
    }
}

/// Applies the Δ² formula to every window of three consecutive terms.
///
/// A sequence of `n` terms yields `n - 2` estimates (none for `n < 3`).
/// Windows with a degenerate denominator fall back to their third term, as in
/// [`aitken_extrapolate`]. Pass
/// [`DEFAULT_DENOM_THRESHOLD`](crate::solvers::DEFAULT_DENOM_THRESHOLD) when in doubt.
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::{accelerate_sequence, DEFAULT_DENOM_THRESHOLD};
///
/// // Partial sums of 1 - 1/3 + 1/5 - ... converge slowly to π/4
/// let mut sums = Vec::new();
/// let mut s = 0.0;
/// for k in 0..8 {
///     s += (-1.0f64).powi(k) / (2 * k + 1) as f64;
///     sums.push(s);
/// }
///
/// let accelerated = accelerate_sequence(&sums, DEFAULT_DENOM_THRESHOLD);
/// let target = std::f64::consts::FRAC_PI_4;
/// assert!((accelerated.last().unwrap() - target).abs() < (sums.last().unwrap() - target).abs());
/// ```
#[must_use]
pub fn accelerate_sequence(terms: &[f64], threshold: f64) -> Vec<f64> {
    terms
        .windows(3)
        .map(|w| aitken_extrapolate(w[0], w[1], w[2], threshold).value)
        .collect()
}

/// Fixed-point iteration accelerated with Aitken's Δ² process.
///
/// Each outer iteration recomputes two plain iterates from the current value
/// and extrapolates:
///
/// ```text
/// x1 = g(x),  x2 = g(x1)
/// x̂  = x - (x1 - x)² / (x2 - 2·x1 + x)
/// ```
///
/// and continues from `x̂`. This turns linear convergence into roughly
/// quadratic convergence without a derivative, at two evaluations of `g` per
/// outer step.
///
/// When the denominator is below `denom_threshold`:
///
/// - if `x1 == x` the current value is already a fixed point and is kept
/// - otherwise, with [`SolverConfig::aitken_fallback`] (the default), the
///   step uses `x̂ = x2` and is recorded with `accelerated: false`
/// - with the fallback disabled the step is recorded and the solve ends in
///   `Failed { DegenerateDenominator }`
///
/// The solve converges when successive outer values differ by less than the
/// tolerance.
///
/// # Arguments
///
/// * `g` - The iteration function
/// * `initial_guess` - Starting point `x0`
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::{aitken, SolverConfig};
///
/// let solution = aitken(|x: f64| (-x).exp(), 1.0, &SolverConfig::aitken()).unwrap();
/// assert!((solution.root().unwrap() - 0.567_143_290_4).abs() < 1e-9);
/// assert!(solution.iterations() < 10);
/// ```
pub fn aitken<G>(g: G, initial_guess: f64, config: &SolverConfig) -> SolveResult<Solution>
where
    G: ScalarFn,
{
    let mut ctl = Controller::new(Method::Aitken, config)?;
    let mut x = initial_guess;

    if ctl.max_iter() == 0 {
        let gx = try_step!(ctl, ctl.eval(&g, x));
        return Ok(if gx == x {
            ctl.converged(x)
        } else {
            ctl.not_converged(x)
        });
    }

    for _ in 0..ctl.max_iter() {
        let x1 = try_step!(ctl, ctl.eval(&g, x));
        let x2 = try_step!(ctl, ctl.eval(&g, x1));
        let denominator = x2 - 2.0 * x1 + x;

        let (x_hat, accelerated) = if !ctl.is_degenerate(denominator) {
            let delta = x1 - x;
            let x_hat = try_step!(ctl, ctl.finite(x - delta * delta / denominator));
            (x_hat, true)
        } else if x1 == x {
            (x, false)
        } else {
            tracing::warn!(
                iteration = ctl.iterations() + 1,
                x,
                denominator,
                fallback = ctl.config().aitken_fallback,
                "degenerate Aitken denominator"
            );
            (x2, false)
        };

        let abs_error = (x_hat - x).abs();
        let step = Step::Aitken {
            x,
            x1,
            x2,
            accelerated,
        };
        ctl.record(step, x_hat, abs_error);

        if !accelerated && x1 != x && !ctl.config().aitken_fallback {
            return Ok(ctl.fail(FailureReason::DegenerateDenominator));
        }

        if ctl.within_tolerance(abs_error) {
            return Ok(ctl.converged(x_hat));
        }

        x = x_hat;
    }

    Ok(ctl.not_converged(x))
}
