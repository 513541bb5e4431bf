//! simplex_optimizer::builders — Nelder–Mead solver construction helpers.
//!
//! Purpose
//! -------
//! Provide focused builders for the Nelder–Mead solver used by the simplex
//! optimizer. These helpers hide Argmin's generic wiring, lay out the initial
//! simplex around a starting point, and apply crate-level tolerances so that
//! higher-level code can request a configured solver without touching
//! Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Build `n + 1` simplex vertices around `theta0`, offsetting one
//!   coordinate per vertex by either the caller's step or the default
//!   relative/absolute heuristic.
//! - Apply the optional simplex standard-deviation tolerance from
//!   [`SimplexOptions`].
//! - Leave iteration limits to the runner, keeping these builders free of
//!   executor concerns.
//!
//! Invariants & assumptions
//! ------------------------
//! - `theta0` has been validated as finite by the caller.
//! - Any invalid tolerance rejected by Argmin's `with_sd_tolerance` is
//!   surfaced as an [`OptError`] via the crate's `From<Error>` conversion.
//!
//! Testing notes
//! -------------
//! - Unit tests verify vertex layout for default and explicit steps and the
//!   dimension check on explicit steps.
use crate::optimization::{
    errors::OptResult,
    simplex_optimizer::{
        traits::SimplexOptions,
        types::{DEFAULT_NONZERO_STEP, DEFAULT_ZERO_STEP, NelderMeadSolver, Theta},
        validation::validate_initial_step,
    },
};

/// build_nelder_mead — construct a Nelder–Mead solver around `theta0`.
///
/// Parameters
/// ----------
/// - `theta0`: `&Theta`
///   Starting point; becomes the first simplex vertex.
/// - `opts`: `&SimplexOptions`
///   This builder consults `opts.initial_step` and `opts.tols.sd_tol`.
///
/// Returns
/// -------
/// `OptResult<NelderMeadSolver>`
///   - `Ok(solver)` with the initial simplex and any configured tolerance.
///   - `Err(e)` if the explicit step has the wrong dimension or Argmin
///     rejects the tolerance.
pub fn build_nelder_mead(theta0: &Theta, opts: &SimplexOptions) -> OptResult<NelderMeadSolver> {
    let vertices = initial_simplex(theta0, opts.initial_step.as_ref())?;
    let mut solver = NelderMeadSolver::new(vertices);
    if let Some(tol) = opts.tols.sd_tol {
        solver = solver.with_sd_tolerance(tol)?;
    }
    Ok(solver)
}

/// initial_simplex — lay out the `n + 1` starting vertices.
///
/// Vertex `0` is `theta0`; vertex `i + 1` offsets coordinate `i` by
/// `step[i]` when a step vector is given, otherwise by
/// `DEFAULT_NONZERO_STEP · θ_i` (or `DEFAULT_ZERO_STEP` when `θ_i == 0`).
pub fn initial_simplex(theta0: &Theta, step: Option<&Theta>) -> OptResult<Vec<Theta>> {
    let dim = theta0.len();
    if let Some(step) = step {
        validate_initial_step(step, dim)?;
    }
    let mut vertices = Vec::with_capacity(dim + 1);
    vertices.push(theta0.clone());
    for i in 0..dim {
        let offset = match step {
            Some(step) => step[i],
            None if theta0[i] != 0.0 => DEFAULT_NONZERO_STEP * theta0[i],
            None => DEFAULT_ZERO_STEP,
        };
        let mut vertex = theta0.clone();
        vertex[i] += offset;
        vertices.push(vertex);
    }
    Ok(vertices)
}
