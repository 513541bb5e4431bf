//! Errors and warnings for surrogate evaluation (record construction, fit
//! dispatch, parameter validation, mode resolution, and alignment).
//!
//! This module defines a single error type, [`SurrogateError`], used across
//! the record builders, evaluators, and the waveform matcher, together with
//! [`SurrogateWarning`] for non-fatal conditions that are reported to the
//! caller while computation continues.
//!
//! ## Conventions
//! - **Indices are 0-based** (rows = time samples, columns = basis vectors).
//! - Every variant classifies into an [`ErrorKind`]; callers that only care
//!   about the broad class match on [`SurrogateError::kind`].
//! - Configuration and consistency errors are raised before any
//!   reconstruction work happens.
use crate::optimization::errors::OptError;

/// Crate-wide result alias for surrogate operations.
pub type SurrogateResult<T> = Result<T, SurrogateError>;

/// Broad error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-programming error: unknown names, invalid combinations, bad
    /// options.
    Configuration,
    /// Physical parameter outside the trained fit interval (strict mode).
    ParameterOutOfRange,
    /// Requested `(ℓ, m)` neither modeled nor derivable by symmetry.
    ModeUnavailable,
    /// Records in a multi-mode collection disagree on grid, interval, or
    /// parameterization.
    InconsistentSurrogate,
    /// Alignment optimizer failed.
    Optimization,
}

/// Unified error type for surrogate evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurrogateError {
    // ---- Registry / names ----
    /// Fit-type name not present in the fit registry.
    UnknownFitKind { name: String },

    /// Affine-map name not recognized.
    UnknownAffineMap { name: String },

    /// Basis-type name not recognized.
    UnknownBasisKind { name: String },

    /// Basis flavor name not recognized.
    UnknownBasisFlavor { name: String },

    /// Parameterization name not recognized.
    UnknownParameterization { name: String },

    /// Sample-units name not recognized.
    UnknownSampleUnits { name: String },

    /// Match-strategy name not recognized.
    UnknownMatchStrategy { name: String },

    // ---- Record construction ----
    /// Time grid must contain at least two strictly increasing finite samples.
    InvalidTimeSamples { index: usize, reason: &'static str },

    /// Fit interval must be finite with `min < max`.
    InvalidFitInterval { min: f64, max: f64 },

    /// Basis matrix shape does not agree with the time grid or the fits.
    BasisShapeMismatch { name: &'static str, expected: (usize, usize), found: (usize, usize) },

    /// Fit coefficients are malformed for their declared fit kind.
    InvalidFitCoefficients { kind: &'static str, row: usize, reason: &'static str },

    /// Fit kinds and basis kind cannot be combined.
    InvalidBasisCombination { reason: &'static str },

    /// Spline degree must be odd and in `1..=5`, with enough samples.
    InvalidSplineDegree { degree: usize, samples: usize },

    /// Optional basis-flavor matrix is unavailable or mis-shaped.
    BasisFlavorUnavailable { flavor: &'static str, reason: &'static str },

    /// Basis index outside `0..dim`.
    BasisIndexOutOfRange { index: usize, dim: usize },

    // ---- Options ----
    /// Invalid evaluation option value.
    InvalidOption { name: &'static str, value: f64, reason: &'static str },

    /// Query samples must be finite and strictly increasing.
    InvalidSamples { index: usize, reason: &'static str },

    /// Option combination is meaningless or ambiguous.
    InvalidOptionCombination { reason: &'static str },

    /// External parameter cannot be mapped by the parameterization.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    // ---- Parameter range ----
    /// Internal parameter outside the inclusive fit interval.
    ParameterOutOfRange { value: f64, min: f64, max: f64 },

    // ---- Modes ----
    /// `(ℓ, m)` is not a valid spherical-harmonic index pair.
    InvalidMode { ell: i32, m: i32 },

    /// Mode neither modeled nor derivable by orbital-plane symmetry.
    ModeUnavailable { ell: i32, m: i32 },

    /// Same mode listed twice in a collection.
    DuplicateMode { ell: i32, m: i32 },

    /// Negative-m record stored while symmetry is enabled.
    NegativeModeWithSymmetry { ell: i32, m: i32 },

    /// `ell` and `m` lists differ in length.
    ModeListLengthMismatch { ell: usize, m: usize },

    /// Negative-m generation requested on a list already holding m < 0.
    NegativeModeRequested { ell: i32, m: i32 },

    /// Collection holds no modes.
    EmptySurrogate,

    // ---- Cross-mode consistency ----
    /// Two records disagree on grid, interval, or parameterization.
    InconsistentSurrogate { mode: (i32, i32), reference: (i32, i32), what: &'static str },

    // ---- Matching ----
    /// Reference waveform malformed.
    InvalidReference { reason: &'static str },

    /// Reference and surrogate do not overlap enough to align.
    InsufficientOverlap { samples: usize },

    /// Alignment optimizer failed.
    OptimizationFailed { source: OptError },
}

impl SurrogateError {
    /// Classify this error into its broad [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            SurrogateError::ParameterOutOfRange { .. } => ErrorKind::ParameterOutOfRange,
            SurrogateError::ModeUnavailable { .. } => ErrorKind::ModeUnavailable,
            SurrogateError::InconsistentSurrogate { .. } => ErrorKind::InconsistentSurrogate,
            SurrogateError::OptimizationFailed { .. } => ErrorKind::Optimization,
            _ => ErrorKind::Configuration,
        }
    }
}

impl std::error::Error for SurrogateError {}

impl std::fmt::Display for SurrogateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Registry / names ----
            SurrogateError::UnknownFitKind { name } => {
                write!(f, "Unknown fit type '{name}'")
            }
            SurrogateError::UnknownAffineMap { name } => {
                write!(f, "Unknown affine map '{name}'")
            }
            SurrogateError::UnknownBasisKind { name } => {
                write!(f, "Unknown surrogate basis type '{name}'")
            }
            SurrogateError::UnknownBasisFlavor { name } => {
                write!(f, "Unknown basis flavor '{name}' (expected cardinal, orthogonal, or waveform)")
            }
            SurrogateError::UnknownParameterization { name } => {
                write!(f, "Unknown parameterization '{name}'")
            }
            SurrogateError::UnknownSampleUnits { name } => {
                write!(f, "Unknown sample units '{name}'; expected 'dimensionless' or 'mks'")
            }
            SurrogateError::UnknownMatchStrategy { name } => {
                write!(f, "Unknown match strategy '{name}'; expected 'fast' or 'slow'")
            }

            // ---- Record construction ----
            SurrogateError::InvalidTimeSamples { index, reason } => {
                write!(f, "Invalid time samples at index {index}: {reason}")
            }
            SurrogateError::InvalidFitInterval { min, max } => {
                write!(f, "Invalid fit interval [{min}, {max}]: bounds must be finite with min < max")
            }
            SurrogateError::BasisShapeMismatch { name, expected, found } => {
                write!(f, "Basis matrix {name} has shape {found:?}, expected {expected:?}")
            }
            SurrogateError::InvalidFitCoefficients { kind, row, reason } => {
                write!(f, "Invalid {kind} fit coefficients in row {row}: {reason}")
            }
            SurrogateError::InvalidBasisCombination { reason } => {
                write!(f, "Invalid fit/basis combination: {reason}")
            }
            SurrogateError::InvalidSplineDegree { degree, samples } => {
                write!(
                    f,
                    "Invalid spline degree {degree} for {samples} samples: degree must be odd, \
                     in 1..=5, and below the number of samples"
                )
            }
            SurrogateError::BasisFlavorUnavailable { flavor, reason } => {
                write!(f, "Basis flavor '{flavor}' unavailable: {reason}")
            }
            SurrogateError::BasisIndexOutOfRange { index, dim } => {
                write!(f, "Basis index {index} out of range for basis dimension {dim}")
            }

            // ---- Options ----
            SurrogateError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid option {name} = {value}: {reason}")
            }
            SurrogateError::InvalidSamples { index, reason } => {
                write!(f, "Invalid query samples at index {index}: {reason}")
            }
            SurrogateError::InvalidOptionCombination { reason } => {
                write!(f, "Invalid option combination: {reason}")
            }
            SurrogateError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid parameter {name} = {value}: {reason}")
            }

            // ---- Parameter range ----
            SurrogateError::ParameterOutOfRange { value, min, max } => {
                write!(f, "Surrogate not trained at parameter value {value}; fit interval is [{min}, {max}]")
            }

            // ---- Modes ----
            SurrogateError::InvalidMode { ell, m } => {
                write!(f, "Invalid mode ({ell}, {m}): require ell >= 2 and |m| <= ell")
            }
            SurrogateError::ModeUnavailable { ell, m } => {
                write!(f, "Mode ({ell}, {m}) is not available")
            }
            SurrogateError::DuplicateMode { ell, m } => {
                write!(f, "Mode ({ell}, {m}) supplied more than once")
            }
            SurrogateError::NegativeModeWithSymmetry { ell, m } => {
                write!(f, "Mode ({ell}, {m}) has m < 0 but orbital-plane symmetry is enabled")
            }
            SurrogateError::ModeListLengthMismatch { ell, m } => {
                write!(f, "ell list has {ell} entries but m list has {m}")
            }
            SurrogateError::NegativeModeRequested { ell, m } => {
                write!(f, "Mode ({ell}, {m}) already has m < 0; cannot also generate negative modes")
            }
            SurrogateError::EmptySurrogate => {
                write!(f, "Multi-mode surrogate holds no modes")
            }

            // ---- Cross-mode consistency ----
            SurrogateError::InconsistentSurrogate { mode, reference, what } => {
                write!(f, "Mode {mode:?} disagrees with mode {reference:?} on {what}")
            }

            // ---- Matching ----
            SurrogateError::InvalidReference { reason } => {
                write!(f, "Invalid reference waveform: {reason}")
            }
            SurrogateError::InsufficientOverlap { samples } => {
                write!(f, "Reference and surrogate overlap on only {samples} samples")
            }
            SurrogateError::OptimizationFailed { source } => {
                write!(f, "Alignment optimizer failed: {source}")
            }
        }
    }
}

impl From<OptError> for SurrogateError {
    fn from(err: OptError) -> Self {
        SurrogateError::OptimizationFailed { source: err }
    }
}

impl From<SurrogateError> for OptError {
    fn from(err: SurrogateError) -> Self {
        match err {
            SurrogateError::OptimizationFailed { source } => source,
            other => OptError::ObjectiveFailed { text: other.to_string() },
        }
    }
}

/// Non-fatal conditions surfaced alongside a successful evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurrogateWarning {
    /// Parameter outside the fit interval, evaluated anyway (lenient mode).
    ParameterOutOfRange { value: f64, min: f64, max: f64 },

    /// Waveform starts above the requested lower frequency.
    LowFrequency { f_start: f64, f_low: f64 },
}

impl SurrogateWarning {
    /// Emit this warning as a `tracing` event.
    pub(crate) fn emit(&self) {
        match self {
            SurrogateWarning::ParameterOutOfRange { value, min, max } => {
                tracing::warn!(value, min, max, "surrogate not trained at requested parameter value");
            }
            SurrogateWarning::LowFrequency { f_start, f_low } => {
                tracing::warn!(f_start, f_low, "surrogate starting frequency exceeds requested f_low");
            }
        }
    }
}

impl std::fmt::Display for SurrogateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurrogateWarning::ParameterOutOfRange { value, min, max } => {
                write!(f, "Surrogate not trained at parameter value {value}; fit interval is [{min}, {max}]")
            }
            SurrogateWarning::LowFrequency { f_start, f_low } => {
                write!(f, "Starting frequency {f_start} exceeds requested lower bound {f_low}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check the error taxonomy mapping used by callers that only inspect the
    // broad class.
    //
    // Given
    // -----
    // - One representative variant per class.
    //
    // Expect
    // ------
    // - `kind()` returns the documented class for each.
    fn kind_classifies_representative_variants() {
        // Arrange / Act / Assert
        assert_eq!(
            SurrogateError::UnknownFitKind { name: "x".into() }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            SurrogateError::ParameterOutOfRange { value: 2.0, min: 0.0, max: 1.0 }.kind(),
            ErrorKind::ParameterOutOfRange
        );
        assert_eq!(SurrogateError::ModeUnavailable { ell: 3, m: 1 }.kind(), ErrorKind::ModeUnavailable);
        assert_eq!(
            SurrogateError::InconsistentSurrogate { mode: (3, 3), reference: (2, 2), what: "x" }.kind(),
            ErrorKind::InconsistentSurrogate
        );
        assert_eq!(
            SurrogateError::from(OptError::MissingThetaHat).kind(),
            ErrorKind::Optimization
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure surrogate failures raised inside an objective reach the
    // optimizer as `ObjectiveFailed` and optimizer failures unwrap cleanly.
    //
    // Given
    // -----
    // - A `ModeUnavailable` error and a wrapped `OptError`.
    //
    // Expect
    // ------
    // - The first maps to `ObjectiveFailed` carrying the display text; the
    //   second unwraps to the original `OptError`.
    fn conversion_into_opt_error_preserves_information() {
        // Arrange
        let mode_err = SurrogateError::ModeUnavailable { ell: 4, m: 4 };
        let wrapped = SurrogateError::from(OptError::NoTolerancesProvided);

        // Act
        let a = OptError::from(mode_err.clone());
        let b = OptError::from(wrapped);

        // Assert
        assert_eq!(a, OptError::ObjectiveFailed { text: mode_err.to_string() });
        assert_eq!(b, OptError::NoTolerancesProvided);
    }
}
