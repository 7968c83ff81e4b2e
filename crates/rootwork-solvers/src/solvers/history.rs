//! Iteration history and solve outcomes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{FailureReason, SolveError, SolveResult};

/// Root-finding method tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Interval halving on a sign-changing bracket.
    Bisection,
    /// Newton-Raphson with analytic or central-difference derivative.
    NewtonRaphson,
    /// Plain iteration `x = g(x)`.
    FixedPoint,
    /// Fixed-point iteration accelerated with Aitken's Δ² process.
    Aitken,
}

impl Method {
    /// Returns the display name of the method.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bisection => "Bisection",
            Self::NewtonRaphson => "Newton-Raphson",
            Self::FixedPoint => "Fixed-Point",
            Self::Aitken => "Aitken",
        }
    }

    /// Returns true for methods that search for `g(x) = x` rather than `f(x) = 0`.
    #[must_use]
    pub const fn is_fixed_point(self) -> bool {
        matches!(self, Self::FixedPoint | Self::Aitken)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Method-specific values seen during one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Step {
    /// Bracket `[a, b]` at entry, midpoint `c` and `f(c)`.
    Bisection {
        /// Left endpoint.
        a: f64,
        /// Right endpoint.
        b: f64,
        /// Midpoint.
        c: f64,
        /// Function value at the midpoint.
        fc: f64,
    },
    /// Iterate with its residual and derivative.
    Newton {
        /// Iterate at entry.
        x: f64,
        /// `f(x)`.
        fx: f64,
        /// `f'(x)`, analytic or estimated.
        dfx: f64,
    },
    /// Iterate and its image under `g`.
    FixedPoint {
        /// Iterate at entry.
        x: f64,
        /// `g(x)`.
        gx: f64,
    },
    /// The three terms fed to the Δ² formula.
    Aitken {
        /// Outer iterate at entry.
        x: f64,
        /// `g(x)`.
        x1: f64,
        /// `g(g(x))`.
        x2: f64,
        /// False when the denominator was degenerate and `x2` was used as is.
        accelerated: bool,
    },
}

/// One row of the solver audit trail.
///
/// For bisection `abs_error` is the half-width of the bracket at entry; for
/// the other methods it is the distance between the entry value and the new
/// estimate.
///
/// Error columns may be infinite. They serialize as the strings `"inf"`,
/// `"-inf"` or `"NaN"` so JSON documents read back unchanged; a `null` left
/// by a plain float serializer reads as `+∞`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration index.
    pub iteration: usize,
    /// Values seen during the step.
    pub step: Step,
    /// Estimate produced by the step.
    pub estimate: f64,
    /// Absolute error of the step.
    #[serde(
        serialize_with = "serialize_error",
        deserialize_with = "deserialize_error"
    )]
    pub abs_error: f64,
    /// `abs_error / |estimate|`, or `+∞` when the estimate is zero.
    #[serde(
        serialize_with = "serialize_error",
        deserialize_with = "deserialize_error"
    )]
    pub rel_error: f64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_error<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if *value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

fn deserialize_error<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(f64::INFINITY),
        Some(Repr::Number(value)) => Ok(value),
        Some(Repr::Text(text)) => match text.as_str() {
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(other),
                &"a number, \"inf\", \"-inf\" or \"NaN\"",
            )),
        },
    }
}

/// Relative error convention shared by every method.
///
/// Returns `+∞` when `estimate` is exactly zero.
#[must_use]
pub fn relative_error(abs_error: f64, estimate: f64) -> f64 {
    if estimate == 0.0 {
        f64::INFINITY
    } else {
        abs_error / estimate.abs()
    }
}

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The tolerance was met.
    Converged {
        /// The root or fixed point found.
        value: f64,
        /// Iterations used.
        iterations: usize,
    },
    /// The iteration budget ran out first.
    NotConverged {
        /// Last estimate produced.
        last_value: f64,
        /// Iterations used.
        iterations: usize,
    },
    /// The loop stopped on a degeneracy or domain error.
    Failed {
        /// Why the loop stopped.
        reason: FailureReason,
    },
}

impl Outcome {
    /// Returns true if the solve converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// Returns the converged value.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Converged { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Returns the failure reason, if any.
    #[must_use]
    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            Self::Failed { reason } => Some(*reason),
            _ => None,
        }
    }

    /// Converts the outcome into a `Result` for `?`-style callers.
    pub fn into_result(self) -> SolveResult<f64> {
        match self {
            Self::Converged { value, .. } => Ok(value),
            Self::NotConverged {
                last_value,
                iterations,
            } => Err(SolveError::not_converged(iterations, last_value)),
            Self::Failed { reason } => Err(reason.into()),
        }
    }
}

/// Outcome of a solve together with its full iteration history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Method that produced the solution.
    pub method: Method,
    /// Terminal state.
    pub outcome: Outcome,
    /// One record per iteration, in order.
    pub history: Vec<IterationRecord>,
}

impl Solution {
    /// Returns the converged value.
    #[must_use]
    pub fn root(&self) -> Option<f64> {
        self.outcome.value()
    }

    /// Returns true if the solve converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.outcome.is_converged()
    }

    /// Number of recorded iterations.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.history.len()
    }

    /// Returns the last record, if any step ran.
    #[must_use]
    pub fn last_record(&self) -> Option<&IterationRecord> {
        self.history.last()
    }

    /// Converts into the converged value or an error.
    pub fn into_result(self) -> SolveResult<f64> {
        self.outcome.into_result()
    }
}
