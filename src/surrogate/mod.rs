//! surrogate — reduced-order gravitational-wave surrogate evaluation.
//!
//! Purpose
//! -------
//! Evaluate pre-built surrogate models: map a physical parameter through an
//! affine normalization and parametric fits, reconstruct the waveform from a
//! reduced basis, resample it onto arbitrary time grids, and combine modes
//! on the sphere.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the data model ([`core::record`]), fit registry
//!   ([`core::fits`]), spline resampling, harmonics, and options.
//! - [`single_mode`] evaluates one `(ℓ, m)` mode with unit scaling, phase
//!   referencing, and the starting-frequency check.
//! - [`multi_mode`] resolves mode lists, applies orbital-plane symmetry, and
//!   projects and sums modes.
//!
//! Invariants & assumptions
//! ------------------------
//! - Records are built once (load phase) and only read afterwards (evaluate
//!   phase); every evaluator is therefore safe to share across threads.
//! - Validation failures surface as [`errors::SurrogateError`] before any
//!   reconstruction work; non-fatal conditions are
//!   [`errors::SurrogateWarning`] values that are also logged through
//!   `tracing`.
//!
//! Conventions
//! -----------
//! - Internal times are geometric (`t / M`); MKS outputs require both total
//!   mass (solar masses) and distance (megaparsecs).
pub mod core;
pub mod errors;
pub mod multi_mode;
pub mod single_mode;

pub mod prelude {
    pub use super::core::{
        affine::AffineMapKind,
        bspline::{BSpline, Extrapolation},
        fits::{FitKind, fit_function},
        harmonics::spin_weighted_ylm,
        options::{EvalOptions, RangeCheck},
        parameterization::Parameterization,
        record::{BasisFlavor, BasisKind, BasisMatrices, FitData, RecordData, SingleModeRecord},
        units::{SampleUnits, TimeUnits},
        waveform::{amp_phase, instantaneous_frequency, phase_at_peak, rotate_phase, uniform_time_samples},
    };
    pub use super::errors::{ErrorKind, SurrogateError, SurrogateResult, SurrogateWarning};
    pub use super::multi_mode::{ModeKey, ModeOutput, ModeSelection, MultiModeEvaluation, MultiModeOptions, MultiModeSurrogate};
    pub use super::single_mode::{Evaluation, SingleModeSurrogate};
}
