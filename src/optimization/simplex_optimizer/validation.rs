//! Validation helpers for simplex optimization.
//!
//! - **Tolerance checks**: [`verify_sd_tol`] ensures the simplex spread
//!   tolerance is finite and strictly positive when provided.
//! - **Starting points**: [`validate_starting_point`] and
//!   [`validate_initial_step`] reject non-finite or degenerate simplices.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks costs for finiteness.
use crate::optimization::{
    errors::{OptError, OptResult},
    simplex_optimizer::Theta,
};

/// Validate the optional simplex standard-deviation tolerance.
///
/// - Accepts `None` (no stopping rule on simplex spread).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidSdTol`] if the value is non-finite or ≤ 0.0.
pub fn verify_sd_tol(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidSdTol { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidSdTol { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate that every coordinate of the starting point is finite.
///
/// # Errors
/// Returns [`OptError::InvalidStartingPoint`] for the first offending entry.
pub fn validate_starting_point(theta0: &Theta) -> OptResult<()> {
    for (index, &value) in theta0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidStartingPoint { index, value });
        }
    }
    Ok(())
}

/// Validate user-provided initial simplex steps against dimension and
/// degeneracy.
///
/// Checks:
/// - `step.len() == dim`
/// - every element is finite and non-zero (a zero step collapses the simplex)
///
/// # Errors
/// - [`OptError::SimplexDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidSimplexStep`] with the index/value/reason of the first
///   offending element.
pub fn validate_initial_step(step: &Theta, dim: usize) -> OptResult<()> {
    if step.len() != dim {
        return Err(OptError::SimplexDimMismatch { expected: dim, found: step.len() });
    }
    for (index, &value) in step.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidSimplexStep {
                index,
                value,
                reason: "Simplex steps must be finite.",
            });
        }
        if value == 0.0 {
            return Err(OptError::InvalidSimplexStep {
                index,
                value,
                reason: "Simplex steps must be non-zero.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar objective value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Check the accept/reject boundaries of `verify_sd_tol`.
    //
    // Given
    // -----
    // - `None`, a positive tolerance, zero, and NaN.
    //
    // Expect
    // ------
    // - `None` and the positive value pass; zero and NaN are rejected with
    //   `InvalidSdTol`.
    fn verify_sd_tol_accepts_positive_and_rejects_degenerate_values() {
        // Act / Assert
        assert!(verify_sd_tol(None).is_ok());
        assert!(verify_sd_tol(Some(1e-8)).is_ok());
        assert!(matches!(verify_sd_tol(Some(0.0)), Err(OptError::InvalidSdTol { .. })));
        assert!(matches!(verify_sd_tol(Some(f64::NAN)), Err(OptError::InvalidSdTol { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Ensure that a zero step is rejected since it would produce a
    // degenerate simplex.
    //
    // Given
    // -----
    // - A 2-D step vector whose second entry is zero.
    //
    // Expect
    // ------
    // - `InvalidSimplexStep` pointing at index 1.
    fn validate_initial_step_rejects_zero_entry() {
        // Arrange
        let step = array![0.1, 0.0];

        // Act
        let err = validate_initial_step(&step, 2).expect_err("zero step must be rejected");

        // Assert
        match err {
            OptError::InvalidSimplexStep { index, .. } => assert_eq!(index, 1),
            other => panic!("Expected InvalidSimplexStep, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify dimension checking of the initial step vector.
    //
    // Given
    // -----
    // - A 3-element step for a 2-D problem.
    //
    // Expect
    // ------
    // - `SimplexDimMismatch { expected: 2, found: 3 }`.
    fn validate_initial_step_rejects_wrong_dimension() {
        // Arrange
        let step = array![0.1, 0.2, 0.3];

        // Act
        let err = validate_initial_step(&step, 2).expect_err("dimension mismatch");

        // Assert
        assert_eq!(err, OptError::SimplexDimMismatch { expected: 2, found: 3 });
    }

    #[test]
    // Purpose
    // -------
    // Confirm that a missing or non-finite estimate is reported.
    //
    // Given
    // -----
    // - `None` and a vector containing infinity.
    //
    // Expect
    // ------
    // - `MissingThetaHat` and `InvalidThetaHat` respectively.
    fn validate_theta_hat_reports_missing_and_non_finite() {
        // Act / Assert
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![0.0, f64::INFINITY])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
    }
}
