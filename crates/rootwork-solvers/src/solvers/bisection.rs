//! Bisection root-finding algorithm.

use crate::error::{FailureReason, SolveResult};
use crate::function::ScalarFn;
use crate::solvers::controller::{try_step, Controller};
use crate::solvers::{Method, Solution, SolverConfig, Step};

/// Bisection root-finding algorithm.
///
/// A simple and reliable bracketing method that works by repeatedly
/// halving the interval and selecting the subinterval containing the root.
///
/// Requires: `f(a) * f(b) < 0` (opposite signs at endpoints). Endpoints may be
/// given in either order. The precondition is checked, never assumed:
///
/// - endpoints with the same sign end in `Failed { InvalidBracket }`
/// - an endpoint where `f` is exactly zero is returned as `Converged` with
///   zero iterations
/// - a non-finite endpoint value ends in `Failed { DomainError }`
///
/// Each step records `[a, b, c, f(c)]` with the half-width `(b - a) / 2` as
/// absolute error, then keeps the half whose endpoints still differ in sign.
/// The solve converges when `|f(c)| < tol` **or** the half-width is `< tol`;
/// either is accepted as evidence of a root. `f(c) == 0` stops immediately.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `a` - One end of the bracket
/// * `b` - The other end of the bracket
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::{bisection, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let solution = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((solution.root().unwrap() - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> SolveResult<Solution>
where
    F: ScalarFn,
{
    let mut ctl = Controller::new(Method::Bisection, config)?;

    if !(a.is_finite() && b.is_finite()) {
        tracing::warn!(a, b, "non-finite bracket endpoint");
        return Ok(ctl.fail(FailureReason::DomainError));
    }

    let mut lo = a.min(b);
    let mut hi = a.max(b);

    let mut f_lo = try_step!(ctl, ctl.eval(&f, lo));
    let f_hi = try_step!(ctl, ctl.eval(&f, hi));

    // Handle case where endpoint is the root
    if f_lo == 0.0 {
        return Ok(ctl.converged(lo));
    }
    if f_hi == 0.0 {
        return Ok(ctl.converged(hi));
    }

    // Check that root is bracketed
    if same_sign(f_lo, f_hi) {
        tracing::warn!(a = lo, b = hi, fa = f_lo, fb = f_hi, "root not bracketed");
        return Ok(ctl.fail(FailureReason::InvalidBracket));
    }

    let mut mid = midpoint(lo, hi);

    for _ in 0..ctl.max_iter() {
        mid = midpoint(lo, hi);
        let half_width = half_width(lo, hi);
        let f_mid = try_step!(ctl, ctl.eval(&f, mid));

        ctl.record(
            Step::Bisection {
                a: lo,
                b: hi,
                c: mid,
                fc: f_mid,
            },
            mid,
            half_width,
        );

        if f_mid == 0.0 || ctl.within_tolerance(f_mid.abs()) || ctl.within_tolerance(half_width) {
            return Ok(ctl.converged(mid));
        }

        // Keep the half whose endpoints still differ in sign
        if same_sign(f_lo, f_mid) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Ok(ctl.not_converged(mid))
}

/// Half of `hi - lo`, finite for any finite endpoints.
fn half_width(lo: f64, hi: f64) -> f64 {
    hi / 2.0 - lo / 2.0
}

/// Midpoint of `[lo, hi]` that cannot overflow near `f64::MAX`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    lo + half_width(lo, hi)
}

/// Sign comparison that cannot underflow the way `fa * fb` can.
fn same_sign(fa: f64, fb: f64) -> bool {
    (fa < 0.0) == (fb < 0.0)
}

/// Number of halvings that guarantee a half-width below `tol`.
///
/// This is the smallest `n >= 1` with `|b - a| / 2^n < tol`, that is
/// `floor(log2(|b - a| / tol)) + 1`. A bisection run with `max_iter >= n`
/// cannot end in `NotConverged` as long as `tol` is above the spacing of
/// floats near the root.
///
/// Returns `usize::MAX` when no finite count exists: `tol` not finite and
/// positive, or a non-finite bracket width.
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::bisection_iteration_bound;
///
/// assert_eq!(bisection_iteration_bound(1.0, 2.0, 1e-6), 20);
/// ```
#[must_use]
pub fn bisection_iteration_bound(a: f64, b: f64, tol: f64) -> usize {
    let width = (b - a).abs();
    if !(tol.is_finite() && tol > 0.0) || !width.is_finite() {
        return usize::MAX;
    }
    if width < tol {
        return 1;
    }

    let ratio = width / tol;
    let log_ratio = if ratio.is_finite() {
        ratio.log2()
    } else {
        // width / tol overflows; the logs do not
        width.log2() - tol.log2()
    };
    log_ratio.floor() as usize + 1
}

/// Scans `[start, end]` in steps of `step` for sign changes.
///
/// Returns each grid cell `(a, b)` with `f(a)` and `f(b)` of strictly opposite
/// sign, ready to hand to [`bisection`]. Grid points where `f` cannot be
/// evaluated or is not finite are skipped together with their cells. A
/// non-positive step or an empty range yields no brackets.
///
/// # Example
///
/// ```rust
/// use rootwork_solvers::solvers::scan_brackets;
///
/// // Roots at -1, 0 and 1
/// let f = |x: f64| x * x * x - x;
/// let brackets = scan_brackets(f, -2.05, 2.0, 0.5);
/// assert_eq!(brackets.len(), 3);
/// ```
pub fn scan_brackets<F>(f: F, start: f64, end: f64, step: f64) -> Vec<(f64, f64)>
where
    F: ScalarFn,
{
    let mut brackets = Vec::new();
    if !(start.is_finite() && end.is_finite() && step.is_finite()) || step <= 0.0 || end <= start {
        return brackets;
    }

    let eval = |x: f64| f.eval(x).ok().filter(|y| y.is_finite());
    let cells = ((end - start) / step).ceil() as usize;

    let mut a = start;
    let mut fa = eval(a);
    for i in 1..=cells {
        let b = (start + i as f64 * step).min(end);
        let fb = eval(b);

        if let (Some(ya), Some(yb)) = (fa, fb) {
            if ya != 0.0 && yb != 0.0 && !same_sign(ya, yb) {
                brackets.push((a, b));
            }
        }

        a = b;
        fa = fb;
    }

    tracing::debug!(start, end, step, found = brackets.len(), "bracket scan finished");
    brackets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::Outcome;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = bisection(f, 1.0, 2.0, &SolverConfig::bisection()).unwrap();

        assert!(result.is_converged());
        assert_relative_eq!(result.root().unwrap(), std::f64::consts::SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn test_reversed_bracket() {
        let f = |x: f64| x * x - 2.0;

        // Reversed bracket should still work
        let result = bisection(f, 2.0, 1.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root().unwrap(), std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;

        // Both endpoints have same sign
        let result = bisection(f, 2.0, 3.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.outcome.failure(), Some(FailureReason::InvalidBracket));
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert_eq!(
            result.outcome,
            Outcome::Converged {
                value: 1.0,
                iterations: 0
            }
        );
    }

    #[test]
    fn test_exact_midpoint_root_short_circuits() {
        let f = |x: f64| x;

        let result = bisection(f, -1.0, 1.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.iterations(), 1);
        assert_eq!(result.root(), Some(0.0));
    }

    #[test]
    fn test_negative_root() {
        let f = |x: f64| x + 1.0;

        let result = bisection(f, -2.0, 0.5, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root().unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_iteration_limit() {
        let f = |x: f64| x.powi(3) - x - 2.0;
        let config = SolverConfig::new(1e-12, 5);

        let result = bisection(f, 1.0, 2.0, &config).unwrap();

        match result.outcome {
            Outcome::NotConverged {
                last_value,
                iterations,
            } => {
                assert_eq!(iterations, 5);
                assert_eq!(last_value, result.history[4].estimate);
            }
            other => panic!("expected NotConverged, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_max_iter() {
        let f = |x: f64| x - 0.3;
        let config = SolverConfig::default().with_max_iter(0);

        let result = bisection(f, 0.0, 1.0, &config).unwrap();

        assert!(result.history.is_empty());
        assert_eq!(
            result.outcome,
            Outcome::NotConverged {
                last_value: 0.5,
                iterations: 0
            }
        );
    }

    #[test]
    fn test_domain_error_at_endpoint() {
        let f = |x: f64| x.ln();

        let result = bisection(f, -1.0, 2.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.outcome.failure(), Some(FailureReason::DomainError));
    }

    #[test]
    fn test_records_keep_sign_change() {
        let f = |x: f64| x.cos() - x;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::bisection()).unwrap();

        assert!(result.is_converged());
        for record in &result.history {
            let Step::Bisection { a, b, .. } = record.step else {
                panic!("unexpected step {:?}", record.step);
            };
            assert!(f(a) * f(b) < 0.0, "sign change lost at {record:?}");
            assert_relative_eq!(record.abs_error, (b - a) / 2.0);
        }
    }

    #[test]
    fn test_iteration_bound_is_sufficient() {
        let f = |x: f64| x.powi(3) - 2.0 * x - 5.0;
        let tol = 1e-8;
        let bound = bisection_iteration_bound(2.0, 3.0, tol);

        let result = bisection(f, 2.0, 3.0, &SolverConfig::new(tol, bound)).unwrap();
        assert!(result.is_converged());
        assert!(result.iterations() <= bound);
    }

    #[test]
    fn test_iteration_bound_small_interval() {
        assert_eq!(bisection_iteration_bound(0.0, 1e-9, 1e-6), 1);
        assert_eq!(bisection_iteration_bound(0.0, 1.0, 0.25), 3);
    }

    #[test]
    fn test_iteration_bound_huge_ratio() {
        // 1e300 / 1e-300 overflows; log2(1e600) ≈ 1993.2
        assert_eq!(bisection_iteration_bound(0.0, 1e300, 1e-300), 1994);
    }

    #[test]
    fn test_iteration_bound_without_finite_answer() {
        assert_eq!(bisection_iteration_bound(0.0, 1.0, 0.0), usize::MAX);
        assert_eq!(bisection_iteration_bound(0.0, 1.0, -1e-6), usize::MAX);
        assert_eq!(bisection_iteration_bound(0.0, 1.0, f64::NAN), usize::MAX);
        assert_eq!(
            bisection_iteration_bound(f64::NEG_INFINITY, 1.0, 1e-6),
            usize::MAX
        );
    }

    #[test]
    fn test_non_finite_endpoint_is_domain_error() {
        let f = |x: f64| x - 1.0;

        for (a, b) in [(f64::NAN, 1.0), (0.0, f64::NAN), (f64::NEG_INFINITY, 2.0)] {
            let result = bisection(f, a, b, &SolverConfig::default()).unwrap();

            assert_eq!(result.outcome.failure(), Some(FailureReason::DomainError));
            assert!(result.history.is_empty());
        }
    }

    #[test]
    fn test_full_float_range_bracket() {
        let f = |x: f64| x;

        let result = bisection(f, -f64::MAX, f64::MAX, &SolverConfig::default()).unwrap();

        assert_eq!(result.root(), Some(0.0));
        assert_eq!(result.history[0].abs_error, f64::MAX);
    }

    #[test]
    fn test_bracket_near_max_does_not_overflow() {
        let root = 1.7e308;
        let f = move |x: f64| x / root - 1.0;
        let config = SolverConfig::new(1e-12, 100);

        let result = bisection(f, 1.6e308, f64::MAX, &config).unwrap();

        assert!(result.is_converged());
        assert!(result.history.iter().all(|r| r.estimate.is_finite()));
        assert_relative_eq!(result.root().unwrap(), root, max_relative = 1e-11);
    }

    #[test]
    fn test_scan_brackets_skips_domain_gaps() {
        // ln(x) - 1 has a single root at e; the scan starts in the invalid region.
        let f = |x: f64| x.ln() - 1.0;

        let brackets = scan_brackets(f, -3.0, 5.0, 1.0);

        assert_eq!(brackets, vec![(2.0, 3.0)]);
    }

    #[test]
    fn test_scan_brackets_rejects_bad_step() {
        let f = |x: f64| x;
        assert!(scan_brackets(f, -1.0, 1.0, 0.0).is_empty());
        assert!(scan_brackets(f, 1.0, -1.0, 0.1).is_empty());
    }
}
