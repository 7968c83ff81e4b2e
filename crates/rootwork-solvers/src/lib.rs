//! # Rootwork Solvers
//!
//! Iterative solvers for scalar equations `f(x) = 0` and `g(x) = x`.
//!
//! This crate provides:
//!
//! - **Bisection**: Guaranteed convergence on a sign-changing bracket
//! - **Newton-Raphson**: Analytic or central-difference derivative
//! - **Fixed-Point**: Plain iteration `x = g(x)`
//! - **Aitken Δ²**: Accelerated fixed-point iteration
//! - **Function adapters**: Closures, fallible evaluators, numerical derivatives
//!
//! ## Design Philosophy
//!
//! - **Every call terminates**: loops are bounded by `max_iter`
//! - **Full audit trail**: every step is recorded, including failed solves
//! - **Typed failures**: degeneracies and domain errors are reported as
//!   [`FailureReason`] values, never as panics or NaN results
//!
//! ## Example
//!
//! ```rust
//! use rootwork_solvers::prelude::*;
//!
//! let f = |x: f64| x * x - 2.0;
//! let df = |x: f64| 2.0 * x;
//!
//! let solution = newton_raphson(f, df, 1.5, &SolverConfig::newton())?;
//! for record in &solution.history {
//!     println!("{:>2}  {:.12}  {:.3e}", record.iteration, record.estimate, record.abs_error);
//! }
//!
//! let root = solution.into_result()?;
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! # Ok::<(), rootwork_solvers::SolveError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::if_not_else)]
#![allow(clippy::needless_pass_by_value)]

pub mod error;
pub mod function;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{FailureReason, SolveError, SolveResult};
    pub use crate::function::{central_difference, EvalError, Fallible, ScalarFn};
    pub use crate::solvers::{
        aitken, aitken_extrapolate, bisection, fixed_point, newton_raphson,
        newton_raphson_numerical, scan_brackets, AitkenSolver, BisectionSolver, FixedPointSolver,
        IterationRecord, Method, NewtonSolver, Outcome, Solution, Solver, SolverConfig, Step,
    };
}

pub use error::{FailureReason, SolveError, SolveResult};
