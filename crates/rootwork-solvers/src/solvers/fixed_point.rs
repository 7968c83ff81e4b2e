//! Fixed-point iteration.

use crate::error::SolveResult;
use crate::function::{central_difference, EvalError, ScalarFn};
use crate::solvers::controller::{try_step, Controller};
use crate::solvers::{Method, Solution, SolverConfig, Step};

/// Fixed-point iteration `x_{n+1} = g(x_n)`.
///
/// Converges linearly to `x* = g(x*)` when `|g'(x*)| < 1` and the start is
/// close enough; there is no safeguard otherwise. A diverging or oscillating
/// sequence runs until `max_iter` and ends as `NotConverged` with the full
/// trace, and a sequence that overflows ends as `Failed { DomainError }`.
///
/// Each step records `[x, g(x)]` with `|g(x) - x|` as absolute error. The
/// solve converges when that error is below the tolerance.
///
/// With `max_iter == 0` only the initial guess is checked: `g(x0) == x0`
/// converges, anything else is `NotConverged`.
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
/// use rootwork_solvers::solvers::{fixed_point, SolverConfig};
///
/// // The Dottie number: cos(x) = x
/// let solution = fixed_point(|x: f64| x.cos(), 1.0, &SolverConfig::fixed_point()).unwrap();
/// assert!((solution.root().unwrap() - 0.739_085).abs() < 1e-5);
/// ```
pub fn fixed_point<G>(g: G, initial_guess: f64, config: &SolverConfig) -> SolveResult<Solution>
where
    G: ScalarFn,
{
    let mut ctl = Controller::new(Method::FixedPoint, config)?;
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
        let gx = try_step!(ctl, ctl.eval(&g, x));
        let abs_error = (gx - x).abs();
        ctl.record(Step::FixedPoint { x, gx }, gx, abs_error);

        if ctl.within_tolerance(abs_error) {
            return Ok(ctl.converged(gx));
        }

        x = gx;
    }

    Ok(ctl.not_converged(x))
}

/// Estimates the local contraction factor `|g'(x)|` by central difference.
///
/// Values below one mean fixed-point iteration contracts near `x`; values at
/// or above one mean it will not converge there.
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::contraction_estimate;
///
/// let k = contraction_estimate(|x: f64| x.cos(), 0.739, 1e-6).unwrap();
/// assert!(k < 1.0);
/// ```
pub fn contraction_estimate<G>(g: G, x: f64, h: f64) -> Result<f64, EvalError>
where
    G: ScalarFn,
{
    central_difference(&g, x, h).map(f64::abs)
}
