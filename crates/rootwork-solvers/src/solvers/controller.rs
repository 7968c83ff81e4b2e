//! Convergence controller shared by every solver.
//!
//! The controller owns the iteration history of one solve and the checks
//! every loop has to make:
//!
//! - the iteration budget (`max_iter`), so no loop runs unbounded
//! - recording each step before termination is decided
//! - finiteness of every function value and update
//! - denominator guards before a division
//!
//! Solvers compose a [`Controller`] rather than sharing a base type; each
//! loop reads like the textbook algorithm with the bookkeeping delegated.

use crate::error::{FailureReason, SolveResult};
use crate::function::ScalarFn;
use crate::solvers::history::{relative_error, IterationRecord, Method, Outcome, Solution, Step};
use crate::solvers::SolverConfig;

/// Per-solve policy object and history recorder.
#[derive(Debug)]
pub(crate) struct Controller<'a> {
    method: Method,
    config: &'a SolverConfig,
    history: Vec<IterationRecord>,
}

impl<'a> Controller<'a> {
    /// Validates `config` and starts an empty history.
    pub(crate) fn new(method: Method, config: &'a SolverConfig) -> SolveResult<Self> {
        config.validate()?;
        tracing::debug!(
            method = method.name(),
            tolerance = config.tolerance,
            max_iter = config.max_iter,
            "solve started"
        );
        Ok(Self {
            method,
            config,
            history: Vec::with_capacity(config.max_iter.min(64)),
        })
    }

    pub(crate) fn config(&self) -> &SolverConfig {
        self.config
    }

    pub(crate) fn max_iter(&self) -> usize {
        self.config.max_iter
    }

    /// Evaluates `f(x)`, mapping refusals and non-finite values to a domain error.
    pub(crate) fn eval<F: ScalarFn>(&self, f: &F, x: f64) -> Result<f64, FailureReason> {
        match f.eval(x) {
            Ok(y) if y.is_finite() => Ok(y),
            Ok(y) => {
                tracing::warn!(method = self.method.name(), x, y, "non-finite evaluation");
                Err(FailureReason::DomainError)
            }
            Err(e) => {
                tracing::warn!(method = self.method.name(), x, error = %e, "evaluation refused");
                Err(FailureReason::DomainError)
            }
        }
    }

    /// Rejects a non-finite update such as an overflowed Newton step.
    pub(crate) fn finite(&self, value: f64) -> Result<f64, FailureReason> {
        if value.is_finite() {
            Ok(value)
        } else {
            tracing::warn!(method = self.method.name(), value, "non-finite update");
            Err(FailureReason::DomainError)
        }
    }

    /// True when `denominator` is too small to divide by.
    pub(crate) fn is_degenerate(&self, denominator: f64) -> bool {
        denominator.abs() < self.config.denom_threshold
    }

    /// Appends a record; the iteration index and relative error are derived here.
    pub(crate) fn record(&mut self, step: Step, estimate: f64, abs_error: f64) -> &IterationRecord {
        let record = IterationRecord {
            iteration: self.history.len() + 1,
            step,
            estimate,
            abs_error,
            rel_error: relative_error(abs_error, estimate),
        };
        tracing::trace!(
            method = self.method.name(),
            iteration = record.iteration,
            estimate,
            abs_error,
            "iteration"
        );
        self.history.push(record);
        &self.history[self.history.len() - 1]
    }

    /// True when `abs_error` meets the tolerance.
    pub(crate) fn within_tolerance(&self, abs_error: f64) -> bool {
        abs_error < self.config.tolerance
    }

    pub(crate) fn iterations(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn converged(self, value: f64) -> Solution {
        let iterations = self.iterations();
        tracing::debug!(method = self.method.name(), iterations, value, "converged");
        self.finish(Outcome::Converged { value, iterations })
    }

    pub(crate) fn not_converged(self, last_value: f64) -> Solution {
        let iterations = self.iterations();
        tracing::debug!(
            method = self.method.name(),
            iterations,
            last_value,
            "iteration limit reached"
        );
        self.finish(Outcome::NotConverged {
            last_value,
            iterations,
        })
    }

    pub(crate) fn fail(self, reason: FailureReason) -> Solution {
        tracing::warn!(
            method = self.method.name(),
            iterations = self.iterations(),
            %reason,
            "solve failed"
        );
        self.finish(Outcome::Failed { reason })
    }

    fn finish(self, outcome: Outcome) -> Solution {
        Solution {
            method: self.method,
            outcome,
            history: self.history,
        }
    }
}

/// Unwraps a guard result inside a solve loop, ending the solve on failure.
macro_rules! try_step {
    ($ctl:ident, $expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(reason) => return Ok($ctl.fail(reason)),
        }
    };
}
pub(crate) use try_step;
