//! Property-based tests for solver invariants.
//!
//! These tests verify properties that should hold for any input:
//! - Bisection keeps a sign change and converges within its iteration bound
//! - Records are numbered 1..=n and never carry NaN
//! - Fixed-point and Aitken find the fixed point of any contraction
//! - Iteration counts never exceed `max_iter`

use proptest::prelude::*;
use rootwork_solvers::prelude::*;
use rootwork_solvers::solvers::bisection_iteration_bound;

fn assert_history_well_formed(solution: &Solution, max_iter: usize) {
    assert!(solution.history.len() <= max_iter);
    for (i, record) in solution.history.iter().enumerate() {
        assert_eq!(record.iteration, i + 1);
        assert!(!record.estimate.is_nan());
        assert!(!record.abs_error.is_nan());
        assert!(!record.rel_error.is_nan());
    }
    match solution.outcome {
        Outcome::Converged { iterations, .. } | Outcome::NotConverged { iterations, .. } => {
            assert_eq!(iterations, solution.history.len());
        }
        Outcome::Failed { .. } => {}
    }
}

proptest! {
    #[test]
    fn prop_bisection_finds_cube_root(c in -1000.0f64..1000.0) {
        // x^3 - c has a single root cbrt(c) inside [-11, 11]
        let f = move |x: f64| x * x * x - c;
        let config = SolverConfig::new(1e-9, 200);

        let solution = bisection(f, -11.0, 11.0, &config).unwrap();

        prop_assert!(solution.is_converged());
        prop_assert!(solution.iterations() <= bisection_iteration_bound(-11.0, 11.0, 1e-9));
        let root = solution.root().unwrap();
        // Either the half-width or the residual met the tolerance
        prop_assert!((root - c.cbrt()).abs() < 1e-6 || f(root).abs() < 1e-9);
        assert_history_well_formed(&solution, config.max_iter);
    }

    #[test]
    fn prop_bisection_records_keep_sign_change(
        root in -50.0f64..50.0,
        left in 0.1f64..20.0,
        right in 0.1f64..20.0,
    ) {
        let f = move |x: f64| (x - root).atan();
        let (a, b) = (root - left, root + right);

        let solution = bisection(f, a, b, &SolverConfig::bisection()).unwrap();

        for record in &solution.history {
            let Step::Bisection { a, b, c, .. } = record.step else {
                panic!("unexpected step {:?}", record.step);
            };
            prop_assert!(a < c && c < b);
            prop_assert!(f(a) <= 0.0 && f(b) >= 0.0);
        }
    }

    #[test]
    fn prop_bisection_rejects_same_sign(lo in 0.0f64..10.0, width in 0.1f64..10.0) {
        let f = |x: f64| x * x + 1.0;

        let solution = bisection(f, lo, lo + width, &SolverConfig::default()).unwrap();

        prop_assert_eq!(solution.outcome.failure(), Some(FailureReason::InvalidBracket));
        prop_assert!(solution.history.is_empty());
    }

    #[test]
    fn prop_newton_square_roots(s in 0.01f64..1.0e6) {
        let f = move |x: f64| x * x - s;
        let df = |x: f64| 2.0 * x;
        let x0 = s.max(1.0);

        let solution = newton_raphson(f, df, x0, &SolverConfig::newton()).unwrap();

        prop_assert!(solution.is_converged());
        let root = solution.root().unwrap();
        prop_assert!((root - s.sqrt()).abs() <= 1e-9 * s.sqrt().max(1.0));
        assert_history_well_formed(&solution, 50);
    }

    #[test]
    fn prop_contraction_has_unique_fixed_point(a in -0.9f64..0.9, b in -100.0f64..100.0) {
        let g = move |x: f64| a * x + b;
        let fixed = b / (1.0 - a);
        let config = SolverConfig::new(1e-10, 1000);

        let plain = fixed_point(g, 0.0, &config).unwrap();
        let accelerated = aitken(g, 0.0, &config).unwrap();

        prop_assert!(plain.is_converged());
        prop_assert!(accelerated.is_converged());
        let scale = fixed.abs().max(1.0);
        prop_assert!((plain.root().unwrap() - fixed).abs() < 1e-8 * scale);
        prop_assert!((accelerated.root().unwrap() - fixed).abs() < 1e-8 * scale);
        prop_assert!(accelerated.iterations() <= plain.iterations());
    }

    #[test]
    fn prop_max_iter_is_respected(max_iter in 0usize..30, x0 in -5.0f64..5.0) {
        let g = |x: f64| -x + 1.0;
        let config = SolverConfig::new(1e-12, max_iter);

        for method in [Method::FixedPoint, Method::Aitken] {
            let solution = method.solve(g, None::<fn(f64) -> f64>, x0, None, &config).unwrap();
            assert_history_well_formed(&solution, max_iter);
        }

        let f = |x: f64| x.powi(3) - 2.0 * x + 2.0;
        let df = |x: f64| 3.0 * x * x - 2.0;
        let solution = newton_raphson(f, df, x0, &config).unwrap();
        assert_history_well_formed(&solution, max_iter);
    }
}
