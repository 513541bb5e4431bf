//! optimization — derivative-free simplex stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide a small, cohesive optimization layer for alignment problems,
//! combining an Argmin-backed Nelder–Mead minimizer with a single
//! error/result surface. Callers implement an objective, choose tolerances,
//! and obtain the minimizer and diagnostics without touching backend solver
//! details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing objectives** `c(θ)`
//!   (`simplex_optimizer`), including configuration of the initial simplex
//!   and stopping criteria.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are evaluated on finite parameter vectors; a non-finite cost
//!   aborts the run with `OptError::NonFiniteCost` rather than poisoning the
//!   simplex ordering.
//! - The optimizer loop is strictly sequential: every iteration depends on
//!   the previous simplex. Callers wanting bounded runtime set `max_iter`.
//!
//! Conventions
//! -----------
//! - Parameters are `ndarray` vectors (`Theta`); costs are plain `f64`.
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see raw Argmin errors.
//! - This module does not log on its own; per-iteration observation is
//!   available behind the `obs_slog` feature when `SimplexOptions.verbose`
//!   is set.
//!
//! Downstream usage
//! ----------------
//! - The waveform matcher implements `Objective` for its mismatch functional
//!   and calls `minimize` with an analytic initial guess.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover solver wiring, tolerance handling,
//!   simplex construction, and convergence on toy quadratics.
//! - Error conversions from Argmin and from objectives are covered in
//!   `errors`.

pub mod errors;
pub mod simplex_optimizer;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use gw_surrogate::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::simplex_optimizer::prelude::*;
}
