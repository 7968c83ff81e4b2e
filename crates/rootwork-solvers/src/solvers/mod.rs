//! Iterative scalar-equation solvers.
//!
//! This module provides four loops that share one convergence controller:
//!
//! - [`bisection`]: Halves a sign-changing bracket, guaranteed to converge
//! - [`newton_raphson`]: Quadratic convergence near simple roots, needs `f'`
//!   (or [`newton_raphson_numerical`] with a central difference)
//! - [`fixed_point`]: Iterates `x = g(x)`, linear when `|g'(x*)| < 1`
//! - [`aitken`]: Applies Aitken's Δ² process to fixed-point iterates
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//! | Newton-Raphson | Fastest (quadratic) | May diverge | Derivative or step `h` |
//! | Fixed-Point | Linear | Needs `|g'| < 1` | `g` with `g(x*) = x*` |
//! | Aitken | Superlinear | Needs `|g'| < 1` | `g`, 2 evaluations per step |
//!
//! Every solver returns a [`Solution`]: an [`Outcome`] plus one
//! [`IterationRecord`] per step, including steps of solves that failed or ran
//! out of iterations. `Err` is reserved for a rejected [`SolverConfig`].
//!
//! # Convergence Policies
//!
//! - Bisection: `|f(c)| < tol` **or** half-width `< tol`.
//! - Newton-Raphson: `|x_new - x| < tol`; with
//!   [`SolverConfig::newton_residual_check`] also `|f(x)| < tol`.
//! - Fixed-point and Aitken: distance between successive estimates `< tol`.
//!
//! # Example
//!
//! ```rust
//! use rootwork_solvers::solvers::{aitken, fixed_point, SolverConfig};
//!
//! let g = |x: f64| x.cos();
//! let config = SolverConfig::default();
//!
//! let plain = fixed_point(g, 1.0, &config).unwrap();
//! let accelerated = aitken(g, 1.0, &config).unwrap();
//!
//! assert!(plain.is_converged() && accelerated.is_converged());
//! assert!(accelerated.iterations() < plain.iterations());
//! ```

mod aitken;
mod bisection;
pub(crate) mod controller;
mod fixed_point;
mod history;
mod newton;

pub use aitken::{accelerate_sequence, aitken, aitken_extrapolate, AitkenEstimate};
pub use bisection::{bisection, bisection_iteration_bound, scan_brackets};
pub use fixed_point::{contraction_estimate, fixed_point};
pub use history::{relative_error, IterationRecord, Method, Outcome, Solution, Step};
pub use newton::{newton_raphson, newton_raphson_numerical};

use serde::{Deserialize, Serialize};

use crate::error::{SolveError, SolveResult};
use crate::function::{ScalarFn, DEFAULT_DERIVATIVE_STEP};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default magnitude below which a divisor is treated as degenerate.
pub const DEFAULT_DENOM_THRESHOLD: f64 = 1e-14;

/// Configuration for root-finding algorithms.
///
/// Deserializes from partial documents; missing fields take their defaults.
///
/// ```rust
/// use rootwork_solvers::solvers::SolverConfig;
///
/// let config: SolverConfig = serde_json::from_str(r#"{ "tolerance": 1e-8 }"#).unwrap();
/// assert_eq!(config.max_iter, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Absolute tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations. Zero means "check the initial value only".
    pub max_iter: usize,
    /// Step for central-difference derivatives; `None` uses
    /// [`DEFAULT_DERIVATIVE_STEP`].
    pub derivative_step: Option<f64>,
    /// Divisors with magnitude below this are not divided by.
    pub denom_threshold: f64,
    /// Aitken falls back to the plain iterate on a degenerate denominator
    /// instead of failing with `DegenerateDenominator`.
    pub aitken_fallback: bool,
    /// Newton-Raphson also accepts `|f(x)| < tolerance` as convergence.
    pub newton_residual_check: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITERATIONS,
            derivative_step: None,
            denom_threshold: DEFAULT_DENOM_THRESHOLD,
            aitken_fallback: true,
            newton_residual_check: false,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iter: usize) -> Self {
        Self {
            tolerance,
            max_iter,
            ..Self::default()
        }
    }

    /// Bisection defaults: tolerance `1e-6`, 100 iterations.
    #[must_use]
    pub fn bisection() -> Self {
        Self::new(1e-6, 100)
    }

    /// Newton-Raphson defaults: tolerance `1e-10`, 50 iterations.
    #[must_use]
    pub fn newton() -> Self {
        Self::new(1e-10, 50)
    }

    /// Fixed-point defaults: tolerance `1e-6`, 100 iterations.
    #[must_use]
    pub fn fixed_point() -> Self {
        Self::new(1e-6, 100)
    }

    /// Aitken defaults: tolerance `1e-10`, 50 outer iterations.
    #[must_use]
    pub fn aitken() -> Self {
        Self::new(1e-10, 50)
    }

    /// Defaults for `method`.
    #[must_use]
    pub fn for_method(method: Method) -> Self {
        match method {
            Method::Bisection => Self::bisection(),
            Method::NewtonRaphson => Self::newton(),
            Method::FixedPoint => Self::fixed_point(),
            Method::Aitken => Self::aitken(),
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the central-difference step.
    #[must_use]
    pub fn with_derivative_step(mut self, h: f64) -> Self {
        self.derivative_step = Some(h);
        self
    }

    /// Sets the denominator threshold.
    #[must_use]
    pub fn with_denom_threshold(mut self, threshold: f64) -> Self {
        self.denom_threshold = threshold;
        self
    }

    /// Enables or disables the Aitken fallback to the plain iterate.
    #[must_use]
    pub fn with_aitken_fallback(mut self, enabled: bool) -> Self {
        self.aitken_fallback = enabled;
        self
    }

    /// Enables or disables the Newton residual criterion.
    #[must_use]
    pub fn with_newton_residual_check(mut self, enabled: bool) -> Self {
        self.newton_residual_check = enabled;
        self
    }

    /// Central-difference step in effect.
    #[must_use]
    pub fn derivative_step(&self) -> f64 {
        self.derivative_step.unwrap_or(DEFAULT_DERIVATIVE_STEP)
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> SolveResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SolveError::invalid_config(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if let Some(h) = self.derivative_step {
            if !h.is_finite() || h <= 0.0 {
                return Err(SolveError::invalid_config(format!(
                    "derivative_step must be finite and > 0, got {h}"
                )));
            }
        }
        if !self.denom_threshold.is_finite() || self.denom_threshold < 0.0 {
            return Err(SolveError::invalid_config(format!(
                "denom_threshold must be finite and >= 0, got {}",
                self.denom_threshold
            )));
        }
        Ok(())
    }
}

/// Trait for root-finding solvers.
///
/// This trait provides a unified interface over the four methods. Arguments a
/// method has no use for are ignored:
///
/// - bisection uses `bounds`, or `initial_guess ± 1` when none are given
/// - Newton-Raphson uses `derivative` when given, else a central difference
/// - fixed-point and Aitken treat `f` as the iteration function `g`
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::{Method, Solver, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let no_deriv: Option<fn(f64) -> f64> = None;
///
/// for method in [Method::Bisection, Method::NewtonRaphson] {
///     let config = SolverConfig::for_method(method);
///     let solution = method.solve(f, no_deriv, 1.5, Some((1.0, 2.0)), &config).unwrap();
///     assert!((solution.root().unwrap() - std::f64::consts::SQRT_2).abs() < 1e-6);
/// }
/// ```
pub trait Solver: Send + Sync {
    /// Solves for a root (or fixed point) of `f`.
    ///
    /// # Arguments
    ///
    /// * `f` - The function for which to find a root, or `g` for fixed-point methods
    /// * `derivative` - Optional derivative function (Newton-Raphson only)
    /// * `initial_guess` - Starting point for the search
    /// * `bounds` - Optional bracketing interval (a, b)
    /// * `config` - Solver configuration
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> SolveResult<Solution>
    where
        F: ScalarFn,
        D: ScalarFn;

    /// Returns the method implemented.
    fn method(&self) -> Method;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str {
        self.method().name()
    }
}

impl Solver for Method {
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> SolveResult<Solution>
    where
        F: ScalarFn,
        D: ScalarFn,
    {
        match self {
            Self::Bisection => BisectionSolver.solve(f, derivative, initial_guess, bounds, config),
            Self::NewtonRaphson => NewtonSolver.solve(f, derivative, initial_guess, bounds, config),
            Self::FixedPoint => {
                FixedPointSolver.solve(f, derivative, initial_guess, bounds, config)
            }
            Self::Aitken => AitkenSolver.solve(f, derivative, initial_guess, bounds, config),
        }
    }

    fn method(&self) -> Method {
        *self
    }
}

/// Bisection solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BisectionSolver;

impl Solver for BisectionSolver {
    fn solve<F, D>(
        &self,
        f: F,
        _derivative: Option<D>,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> SolveResult<Solution>
    where
        F: ScalarFn,
        D: ScalarFn,
    {
        let (a, b) = bounds.unwrap_or((initial_guess - 1.0, initial_guess + 1.0));
        bisection(f, a, b, config)
    }

    fn method(&self) -> Method {
        Method::Bisection
    }
}

/// Newton-Raphson solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver;

impl Solver for NewtonSolver {
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        _bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> SolveResult<Solution>
    where
        F: ScalarFn,
        D: ScalarFn,
    {
        match derivative {
            Some(df) => newton_raphson(f, df, initial_guess, config),
            None => newton_raphson_numerical(f, initial_guess, config),
        }
    }

    fn method(&self) -> Method {
        Method::NewtonRaphson
    }
}

/// Fixed-point iteration solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPointSolver;

impl Solver for FixedPointSolver {
    fn solve<F, D>(
        &self,
        g: F,
        _derivative: Option<D>,
        initial_guess: f64,
        _bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> SolveResult<Solution>
    where
        F: ScalarFn,
        D: ScalarFn,
    {
        fixed_point(g, initial_guess, config)
    }

    fn method(&self) -> Method {
        Method::FixedPoint
    }
}

/// Aitken-accelerated fixed-point solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AitkenSolver;

impl Solver for AitkenSolver {
    fn solve<F, D>(
        &self,
        g: F,
        _derivative: Option<D>,
        initial_guess: f64,
        _bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> SolveResult<Solution>
    where
        F: ScalarFn,
        D: ScalarFn,
    {
        aitken(g, initial_guess, config)
    }

    fn method(&self) -> Method {
        Method::Aitken
    }
}
