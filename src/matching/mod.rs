//! matching — align surrogate waveforms with reference signals.
//!
//! Purpose
//! -------
//! Estimate the time shift and orbital-plane rotation that best align a
//! surrogate evaluation with a reference waveform, and report the residual
//! normalized mismatch.
//!
//! Key behaviors
//! -------------
//! - [`overlap`] builds the trimmed comparison window and the lag-scan
//!   initial guess.
//! - [`spherical`] prebuilds a spline representation of the projected
//!   multi-mode waveform for cheap repeated evaluation.
//! - [`matcher`] wires both into an [`crate::optimization`] objective and
//!   runs the Nelder–Mead refinement.
//!
//! Testing notes
//! -------------
//! - Self-alignment (reference equal to the surrogate's own evaluation) is
//!   exercised end to end in `tests/integration_surrogate_pipeline.rs`.
pub mod matcher;
pub mod overlap;
pub mod spherical;

pub mod prelude {
    pub use super::matcher::{MatchOptions, MatchOutcome, MatchStrategy, WaveformMatcher};
    pub use super::spherical::SphericalWaveform;
}
