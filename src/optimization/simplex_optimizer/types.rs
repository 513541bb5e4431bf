//! simplex_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the simplex
//! optimizer so the rest of the code stays agnostic to `ndarray` and Argmin
//! generics.
//!
//! Conventions
//! -----------
//! - `Theta` is treated as a column vector with one entry per free
//!   parameter.
//! - `Cost` is the minimized scalar; no sign flips happen in this layer.
//! - `DEFAULT_NONZERO_STEP` and `DEFAULT_ZERO_STEP` encode the classic
//!   initial-simplex heuristic (5% relative step, small absolute step at
//!   zero coordinates).
use argmin::{core::IterState, solver::neldermead::NelderMead};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ` for objective minimization.
pub type Theta = Array1<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Nelder–Mead solver specialized to this crate's numeric types.
pub type NelderMeadSolver = NelderMead<Theta, Cost>;

/// Argmin iteration state produced by [`NelderMeadSolver`].
pub type SimplexState = IterState<Theta, (), (), (), (), Cost>;

/// Relative initial-simplex step for non-zero coordinates.
pub const DEFAULT_NONZERO_STEP: f64 = 0.05;

/// Absolute initial-simplex step for coordinates equal to zero.
pub const DEFAULT_ZERO_STEP: f64 = 0.00025;
