//! Error types for scalar root-finding.
//!
//! Two layers are kept apart:
//!
//! - [`FailureReason`] is what a solve loop reports inside
//!   [`Outcome::Failed`](crate::solvers::Outcome::Failed) when a division
//!   guard trips or the function leaves its domain.
//! - [`SolveError`] is the crate error for `Result` paths: a rejected
//!   configuration, or an outcome converted with
//!   [`Outcome::into_result`](crate::solvers::Outcome::into_result).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized Result type for solver operations.
pub type SolveResult<T> = Result<T, SolveError>;

/// Why a solve loop stopped without a usable estimate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The endpoints of a bracketing method do not change sign.
    #[error("Invalid bracket: f(a) and f(b) have the same sign")]
    InvalidBracket,

    /// The derivative magnitude fell below the denominator threshold.
    #[error("Degenerate derivative: |f'(x)| below threshold")]
    DegenerateDerivative,

    /// An acceleration denominator fell below the denominator threshold.
    #[error("Degenerate denominator: magnitude below threshold")]
    DegenerateDenominator,

    /// The function could not be evaluated, or produced NaN or an overflow.
    #[error("Domain error: function evaluation was not finite")]
    DomainError,
}

/// Errors returned by solver entry points and outcome conversions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The solver configuration was rejected before iterating.
    #[error("Invalid solver configuration: {reason}")]
    InvalidConfig {
        /// Description of the rejected setting.
        reason: String,
    },

    /// The solve loop stopped on a degeneracy or domain error.
    #[error(transparent)]
    Failed(#[from] FailureReason),

    /// The iteration budget ran out before the tolerance was met.
    #[error("Convergence failed after {iterations} iterations (last value: {last_value:.6e})")]
    NotConverged {
        /// Number of iterations attempted.
        iterations: usize,
        /// Last estimate produced.
        last_value: f64,
    },
}

impl SolveError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Creates a not-converged error.
    #[must_use]
    pub fn not_converged(iterations: usize, last_value: f64) -> Self {
        Self::NotConverged {
            iterations,
            last_value,
        }
    }

    /// Returns the failure reason when this error wraps one.
    #[must_use]
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Failed(reason) => Some(*reason),
            _ => None,
        }
    }
}
