//! simplex_optimizer — derivative-free, argmin-powered minimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed Nelder–Mead layer for **minimizing**
//! scalar objectives `c(θ)` whose gradients are unavailable or unreliable,
//! such as waveform-alignment mismatches evaluated through spline
//! resampling. Callers implement a single trait, [`Objective`], and invoke
//! [`minimize`].
//!
//! Key behaviors
//! -------------
//! - Expose a single, user-facing entrypoint [`minimize`] that:
//!   - validates the starting point and the objective's `check` hook,
//!   - lays out the initial simplex via [`builders`],
//!   - executes the solver via [`run::run_nelder_mead`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Centralize optimizer configuration ([`Tolerances`], [`SimplexOptions`])
//!   and validation logic ([`validation`]) so downstream code can assume
//!   sane, finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`Objective::value`] must treat invalid inputs as recoverable
//!   [`OptError`](crate::optimization::errors::OptError) values, not panics.
//! - Configuration types are validated on construction and are treated as
//!   internally consistent by the solver layer.
//!
//! Conventions
//! -----------
//! - Parameters live in [`Theta`] (`Array1<f64>`); costs are [`Cost`]
//!   (`f64`).
//! - Errors bubble up as `OptResult<T>`; this module never intentionally
//!   panics or uses `unsafe`.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover the adapter's finiteness guard, simplex
//!   layout, tolerance wiring, outcome normalization, and convergence on the
//!   Rosenbrock valley.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{Objective, OptimOutcome, SimplexOptions, Tolerances};
pub use self::types::{Cost, FnEvalMap, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{Objective, OptimOutcome, SimplexOptions, Tolerances};
    pub use super::types::{Cost, Theta};
}
