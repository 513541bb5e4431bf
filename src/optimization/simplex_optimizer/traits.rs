//! Public API surface for simplex minimization.
//!
//! - [`Objective`]: trait users implement for their problem.
//! - [`SimplexOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`OptimOutcome`]: normalized result returned by the high-level
//!   `minimize` API.
//!
//! Convention: objectives are *minimized* directly; there is no sign flip
//! anywhere in this layer.
use crate::optimization::{
    errors::{OptError, OptResult},
    simplex_optimizer::{
        Cost, FnEvalMap, Theta,
        validation::{validate_initial_step, validate_theta_hat, validate_value, verify_sd_tol},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};

/// User-implemented objective interface.
///
/// - `type Data`: per-problem payload carried into `value`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `c(θ)`.
///
/// Optional:
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject an
///   obviously invalid starting point. Called once before optimization.
pub trait Objective {
    type Data;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;

    // Optional methods
    fn check(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        Ok(())
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — simplex spread tolerance and iteration limit.
/// - `initial_step: Option<Theta>` — per-coordinate offsets used to build the
///   initial simplex around the starting point. When `None`, a 5% relative
///   step (or `0.00025` for zero coordinates) is used.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
///
/// Default:
/// - `tols`: `sd_tol = 1e-10`, `max_iter = 500`
/// - `initial_step`: `None`
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexOptions {
    pub tols: Tolerances,
    pub initial_step: Option<Theta>,
    pub verbose: bool,
}

impl SimplexOptions {
    /// Create a new set of optimizer options.
    ///
    /// # Errors
    /// - [`OptError::InvalidSimplexStep`] if any provided step is non-finite
    ///   or zero. The dimension is checked later against the starting point.
    pub fn new(tols: Tolerances, initial_step: Option<Theta>, verbose: bool) -> OptResult<Self> {
        if let Some(step) = &initial_step {
            validate_initial_step(step, step.len())?;
        }
        Ok(Self { tols, initial_step, verbose })
    }
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { sd_tol: Some(1e-10), max_iter: Some(500) },
            initial_step: None,
            verbose: false,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `sd_tol`: terminate when the standard deviation of the simplex costs
///   falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Either field can be `None` but **at least one** must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub sd_tol: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `sd_tol` or `max_iter` must be `Some`.
    /// - If provided, `sd_tol` must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if both are `None`.
    /// - [`OptError::InvalidSdTol`] for non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(sd_tol: Option<f64>, max_iter: Option<usize>) -> OptResult<Self> {
        if sd_tol.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_sd_tol(sd_tol)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { sd_tol, max_iter })
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best objective value `c(θ̂)`.
/// - `converged`: `true` if the solver stopped because its own convergence
///   criterion (or a target cost) was met, `false` when it ran out of
///   iterations or was interrupted.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{termination:?}"))
            }
        };
        let iterations = iterations as usize;
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Ensure `Tolerances::new` requires at least one stopping rule.
    //
    // Given
    // -----
    // - Both `sd_tol` and `max_iter` set to `None`.
    //
    // Expect
    // ------
    // - `OptError::NoTolerancesProvided`.
    fn tolerances_require_at_least_one_rule() {
        // Act
        let result = Tolerances::new(None, None);

        // Assert
        assert_eq!(result, Err(OptError::NoTolerancesProvided));
    }

    #[test]
    // Purpose
    // -------
    // Verify that a zero iteration cap is rejected.
    //
    // Given
    // -----
    // - `sd_tol = None`, `max_iter = Some(0)`.
    //
    // Expect
    // ------
    // - `OptError::InvalidMaxIter`.
    fn tolerances_reject_zero_max_iter() {
        // Act
        let result = Tolerances::new(None, Some(0));

        // Assert
        assert!(matches!(result, Err(OptError::InvalidMaxIter { max_iter: 0, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Check how termination reasons translate into the `converged` flag.
    //
    // Given
    // -----
    // - A finite estimate with `SolverConverged` and one with
    //   `MaxItersReached`.
    //
    // Expect
    // ------
    // - `converged == true` for the former and `false` for the latter.
    fn outcome_maps_termination_reason_to_converged_flag() {
        // Arrange
        let conv = TerminationStatus::Terminated(TerminationReason::SolverConverged);
        let capped = TerminationStatus::Terminated(TerminationReason::MaxItersReached);

        // Act
        let ok = OptimOutcome::new(Some(array![0.0, 1.0]), 0.5, conv, 12, FnEvalMap::new())
            .expect("valid outcome");
        let cap = OptimOutcome::new(Some(array![0.0, 1.0]), 0.5, capped, 500, FnEvalMap::new())
            .expect("valid outcome");

        // Assert
        assert!(ok.converged);
        assert!(!cap.converged);
        assert_eq!(cap.iterations, 500);
    }

    #[test]
    // Purpose
    // -------
    // Ensure `SimplexOptions::new` rejects a degenerate initial step.
    //
    // Given
    // -----
    // - An initial step with a NaN entry.
    //
    // Expect
    // ------
    // - `OptError::InvalidSimplexStep`.
    fn simplex_options_reject_non_finite_step() {
        // Arrange
        let tols = Tolerances::new(Some(1e-8), Some(100)).expect("valid tolerances");

        // Act
        let result = SimplexOptions::new(tols, Some(array![f64::NAN, 0.1]), false);

        // Assert
        assert!(matches!(result, Err(OptError::InvalidSimplexStep { index: 0, .. })));
    }
}
