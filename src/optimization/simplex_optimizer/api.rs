//! High-level entry point for minimizing a user-provided `Objective`.
//!
//! This validates the starting point, lays out the initial simplex, wraps the
//! objective in an `ArgMinAdapter`, and delegates the run to
//! `run_nelder_mead`.
use crate::optimization::{
    errors::OptResult,
    simplex_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::build_nelder_mead,
        run::run_nelder_mead,
        traits::{Objective, SimplexOptions},
        validation::validate_starting_point,
    },
};

/// Minimize an objective `c(θ)` with the Nelder–Mead simplex method.
///
/// # Behavior
/// - Validates the starting point (finite entries) and the objective's own
///   `check(theta0, data)` hook.
/// - Builds the initial simplex around `theta0` from `opts`.
/// - Runs the solver and returns an [`OptimOutcome`].
///
/// # Errors
/// - Propagates any error from `f.check` or starting-point validation.
/// - Propagates builder errors from `build_nelder_mead`.
/// - Propagates runtime errors from `run_nelder_mead`, including errors the
///   objective raised mid-run.
///
/// # Example
/// ```
/// use ndarray::array;
/// use gw_surrogate::optimization::prelude::*;
///
/// struct Bowl;
/// impl Objective for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
///         Ok((theta[0] - 1.0).powi(2) + (theta[1] + 0.5).powi(2))
///     }
/// }
///
/// let out = minimize(&Bowl, array![0.0, 0.0], &(), &SimplexOptions::default())?;
/// assert!((out.theta_hat[0] - 1.0).abs() < 1e-3);
/// # Ok::<(), OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &SimplexOptions,
) -> OptResult<OptimOutcome> {
    validate_starting_point(&theta0)?;
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    let solver = build_nelder_mead(&theta0, opts)?;
    run_nelder_mead(&theta0, opts, problem, solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        simplex_optimizer::{Cost, traits::Tolerances},
    };
    use ndarray::array;

    struct Rosenbrock;

    impl Objective for Rosenbrock {
        type Data = (f64, f64);

        fn value(&self, theta: &Theta, data: &(f64, f64)) -> OptResult<Cost> {
            let (a, b) = *data;
            Ok((a - theta[0]).powi(2) + b * (theta[1] - theta[0].powi(2)).powi(2))
        }
    }

    struct Rejecting;

    impl Objective for Rejecting {
        type Data = ();

        fn value(&self, _theta: &Theta, _data: &()) -> OptResult<Cost> {
            Ok(0.0)
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Err(OptError::ObjectiveFailed { text: "rejected".to_string() })
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify end-to-end convergence on the Rosenbrock valley.
    //
    // Given
    // -----
    // - `a = 1`, `b = 100`, start at `(-1.2, 1.0)`.
    // - `sd_tol = 1e-12`, `max_iter = 2000`.
    //
    // Expect
    // ------
    // - The minimizer lands within `1e-3` of `(1, 1)` and reports
    //   convergence.
    fn minimize_finds_rosenbrock_minimum() {
        // Arrange
        let tols = Tolerances::new(Some(1e-12), Some(2000)).expect("valid tolerances");
        let opts = SimplexOptions::new(tols, None, false).expect("valid opts");

        // Act
        let out = minimize(&Rosenbrock, array![-1.2, 1.0], &(1.0, 100.0), &opts)
            .expect("optimization should succeed");

        // Assert
        assert!((out.theta_hat[0] - 1.0).abs() < 1e-3, "theta_hat = {:?}", out.theta_hat);
        assert!((out.theta_hat[1] - 1.0).abs() < 1e-3, "theta_hat = {:?}", out.theta_hat);
        assert!(out.value < 1e-6);
        assert!(out.converged, "status = {}", out.status);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the objective's `check` hook runs before any solver work.
    //
    // Given
    // -----
    // - An objective whose `check` always fails.
    //
    // Expect
    // ------
    // - `minimize` returns that error untouched.
    fn minimize_propagates_check_failure() {
        // Act
        let err = minimize(&Rejecting, array![0.0], &(), &SimplexOptions::default())
            .expect_err("check must fail");

        // Assert
        assert_eq!(err, OptError::ObjectiveFailed { text: "rejected".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Ensure a non-finite starting point is rejected up front.
    //
    // Given
    // -----
    // - `theta0 = (NaN, 0)`.
    //
    // Expect
    // ------
    // - `OptError::InvalidStartingPoint { index: 0, .. }`.
    fn minimize_rejects_non_finite_start() {
        // Act
        let err = minimize(&Rosenbrock, array![f64::NAN, 0.0], &(1.0, 100.0), &SimplexOptions::default())
            .expect_err("NaN start must fail");

        // Assert
        assert!(matches!(err, OptError::InvalidStartingPoint { index: 0, .. }));
    }
}
