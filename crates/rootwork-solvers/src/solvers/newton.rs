//! Newton-Raphson root-finding algorithm.

use crate::error::{FailureReason, SolveResult};
use crate::function::{CentralDifference, ScalarFn};
use crate::solvers::controller::{try_step, Controller};
use crate::solvers::{Method, Solution, SolverConfig, Step};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// This method has quadratic convergence near simple roots but requires
/// the derivative of the function. Near a multiple root convergence drops to
/// linear; global convergence is not guaranteed and the loop is bounded only
/// by `max_iter`.
///
/// Per iteration the solver records `[x, f(x), f'(x)]`, the new estimate and
/// `|x_new - x|`. It stops with:
///
/// - `Converged` when `|x_new - x| < tol` (or `|f(x)| < tol` with
///   [`SolverConfig::newton_residual_check`])
/// - `Failed { DegenerateDerivative }` when `|f'(x)| < denom_threshold`; the
///   step is still recorded, with infinite errors and no movement
/// - `Failed { DomainError }` when `f`, `f'` or the update is not finite
///
/// An initial guess with `f(x0) == 0` converges with an empty history. An
/// iterate that lands exactly on a root is confirmed by one more recorded
/// step of length zero.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::{newton_raphson, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let solution = newton_raphson(f, df, 1.5, &SolverConfig::default()).unwrap();
/// assert!((solution.root().unwrap() - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> SolveResult<Solution>
where
    F: ScalarFn,
    DF: ScalarFn,
{
    iterate(&f, &df, initial_guess, config)
}

fn iterate<F, DF>(f: &F, df: &DF, initial_guess: f64, config: &SolverConfig) -> SolveResult<Solution>
where
    F: ScalarFn,
    DF: ScalarFn,
{
    let mut ctl = Controller::new(Method::NewtonRaphson, config)?;
    let mut x = initial_guess;

    let mut fx = try_step!(ctl, ctl.eval(f, x));
    if fx == 0.0 {
        return Ok(ctl.converged(x));
    }

    for _ in 0..ctl.max_iter() {
        let dfx = try_step!(ctl, ctl.eval(df, x));
        let step = Step::Newton { x, fx, dfx };

        // Check for zero derivative
        if fx != 0.0 && ctl.is_degenerate(dfx) {
            ctl.record(step, x, f64::INFINITY);
            return Ok(ctl.fail(FailureReason::DegenerateDerivative));
        }

        // Newton step; an exact root takes a zero-length step
        let x_new = if fx == 0.0 {
            x
        } else {
            try_step!(ctl, ctl.finite(x - fx / dfx))
        };
        let abs_error = (x_new - x).abs();
        ctl.record(step, x_new, abs_error);

        let residual_met = ctl.config().newton_residual_check && ctl.within_tolerance(fx.abs());
        if ctl.within_tolerance(abs_error) || residual_met {
            return Ok(ctl.converged(x_new));
        }

        x = x_new;
        fx = try_step!(ctl, ctl.eval(f, x));
    }

    Ok(ctl.not_converged(x))
}

/// Newton-Raphson with numerical derivative estimation.
///
/// Uses central differences to estimate the derivative when an analytical
/// derivative is not available:
///
/// ```text
/// f'(x) ≈ (f(x + h) - f(x - h)) / 2h
/// ```
///
/// `h` is [`SolverConfig::derivative_step`], which defaults to
/// [`DEFAULT_DERIVATIVE_STEP`](crate::function::DEFAULT_DERIVATIVE_STEP)
/// (`1e-8`). The default is not tuned to `f`; pass a step through the config
/// for functions that vary on very different scales.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
pub fn newton_raphson_numerical<F>(
    f: F,
    initial_guess: f64,
    config: &SolverConfig,
) -> SolveResult<Solution>
where
    F: ScalarFn,
{
    let df = CentralDifference::new(&f, config.derivative_step());
    iterate(&f, &df, initial_guess, config)
}
