//! Scalar function adapters.
//!
//! Solvers accept anything implementing [`ScalarFn`]. Plain closures and
//! function pointers qualify directly; evaluators that can refuse an input
//! (an expression evaluator asked for `ln(-1)`, a lookup table queried out of
//! range) are wrapped in [`Fallible`] so the refusal reaches the solver as a
//! domain error instead of a panic.

use std::fmt;

use thiserror::Error;

/// A scalar function refused to evaluate at a point.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Cannot evaluate at x = {x}: {message}")]
pub struct EvalError {
    /// The argument that was rejected.
    pub x: f64,
    /// Evaluator-supplied description.
    pub message: String,
}

impl EvalError {
    /// Creates an evaluation error.
    #[must_use]
    pub fn new(x: f64, message: impl Into<String>) -> Self {
        Self {
            x,
            message: message.into(),
        }
    }
}

/// A real function of one real variable.
///
/// Implementations must be reentrant if the same function is shared across
/// threads; solvers never mutate it.
pub trait ScalarFn {
    /// Evaluates the function at `x`.
    ///
    /// A returned `Ok` value may still be NaN or infinite; solvers check
    /// finiteness themselves.
    fn eval(&self, x: f64) -> Result<f64, EvalError>;
}

impl<F> ScalarFn for F
where
    F: Fn(f64) -> f64,
{
    #[inline]
    fn eval(&self, x: f64) -> Result<f64, EvalError> {
        Ok(self(x))
    }
}

/// Adapts a closure returning `Result<f64, E>` into a [`ScalarFn`].
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::function::{Fallible, ScalarFn};
///
/// let ln = Fallible::new(|x: f64| {
///     if x > 0.0 {
///         Ok(x.ln())
///     } else {
///         Err("logarithm of a non-positive number")
///     }
/// });
///
/// assert!(ln.eval(1.0).is_ok());
/// assert!(ln.eval(-1.0).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct Fallible<F>(F);

impl<F> Fallible<F> {
    /// Wraps a fallible evaluator.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for Fallible<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fallible(..)")
    }
}

impl<F, E> ScalarFn for Fallible<F>
where
    F: Fn(f64) -> Result<f64, E>,
    E: fmt::Display,
{
    fn eval(&self, x: f64) -> Result<f64, EvalError> {
        (self.0)(x).map_err(|e| EvalError::new(x, e.to_string()))
    }
}

/// Default step for central-difference derivatives.
///
/// Used by [`CentralDifference`] and Newton-Raphson whenever no analytic
/// derivative and no explicit `derivative_step` are given.
pub const DEFAULT_DERIVATIVE_STEP: f64 = 1e-8;

/// Central-difference estimate of a derivative.
///
/// ```text
/// f'(x) ≈ (f(x + h) - f(x - h)) / 2h
/// ```
///
/// The step is not adapted to the function; callers with badly scaled
/// functions should pick `h` themselves.
#[derive(Debug, Clone, Copy)]
pub struct CentralDifference<'a, F> {
    f: &'a F,
    h: f64,
}

impl<'a, F> CentralDifference<'a, F> {
    /// Differentiates `f` with step `h`.
    pub fn new(f: &'a F, h: f64) -> Self {
        Self { f, h }
    }

    /// Returns the difference step.
    pub fn step(&self) -> f64 {
        self.h
    }
}

impl<F: ScalarFn> ScalarFn for CentralDifference<'_, F> {
    fn eval(&self, x: f64) -> Result<f64, EvalError> {
        let forward = self.f.eval(x + self.h)?;
        let backward = self.f.eval(x - self.h)?;
        Ok((forward - backward) / (2.0 * self.h))
    }
}

/// Estimates `f'(x)` by central difference with step `h`.
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::function::central_difference;
///
/// let d = central_difference(&|x: f64| x * x, 3.0, 1e-6).unwrap();
/// assert!((d - 6.0).abs() < 1e-6);
/// ```
pub fn central_difference<F: ScalarFn>(f: &F, x: f64, h: f64) -> Result<f64, EvalError> {
    CentralDifference::new(f, h).eval(x)
}
