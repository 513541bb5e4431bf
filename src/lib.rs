//! gw_surrogate — evaluation of reduced-order gravitational-wave surrogates.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers. A surrogate maps a scalar
//! physical parameter to a time-domain waveform by evaluating parametric fits
//! at that parameter and reconstructing the signal from a small reduced
//! basis; this crate evaluates such models, combines their harmonic modes on
//! the sphere, and aligns them against reference waveforms.
//!
//! Key behaviors
//! -------------
//! - [`surrogate`]: data model, fit registry, basis reconstruction, spline
//!   resampling, single-mode and multi-mode evaluation.
//! - [`matching`]: time/rotation alignment of a surrogate against a
//!   reference waveform with a normalized mismatch objective.
//! - [`optimization`]: the derivative-free Nelder–Mead layer (argmin-backed)
//!   used by the matcher.
//!
//! Invariants & assumptions
//! ------------------------
//! - Surrogate records are immutable once constructed; evaluation never
//!   mutates shared state and every evaluator is `Send + Sync`.
//! - Invalid input is reported through [`surrogate::errors::SurrogateError`]
//!   or [`optimization::errors::OptError`]; nothing in the library panics on
//!   user data.
//!
//! Conventions
//! -----------
//! - Internal times are geometric (`t / M`). MKS outputs are produced only
//!   when both total mass (solar masses) and distance (Mpc) are supplied.
//! - Warnings are returned alongside results and logged through `tracing`;
//!   the crate never installs a subscriber.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/` exercises the full
//!   single-mode → multi-mode → matcher pipeline on synthetic surrogates.

pub mod matching;
pub mod optimization;
pub mod surrogate;
