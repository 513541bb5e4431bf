//! record — the immutable per-mode surrogate data model.
//!
//! Purpose
//! -------
//! Hold everything needed to evaluate one `(ℓ, m)` mode: the native time
//! grid, the fit interval and normalization, the parameterization, the
//! compiled parametric fits, the basis matrices, and the spline cache used
//! for off-grid resampling.
//!
//! Key behaviors
//! -------------
//! - Loaders produce a plain [`RecordData`]; [`SingleModeRecord::new`]
//!   validates it, compiles the fits, and builds the [`SplineCache`]. That is
//!   the only place the cache is built.
//! - The basis representation is a sum type, so a `waveform_basis` record
//!   cannot carry `B_1`/`B_2` and an `amp_phase_basis` record cannot carry
//!   `B`.
//! - Optional EIM Vandermonde (`V`) and reduced-basis coefficient (`R`)
//!   matrices enable the orthogonal and waveform basis flavors.
//!
//! Invariants & assumptions
//! ------------------------
//! - `times` has at least two finite, strictly increasing samples and every
//!   basis matrix has `times.len()` rows and one column per basis vector.
//! - `fit_interval[0] < fit_interval[1]`, both finite.
//! - No field is mutated after construction.
use crate::surrogate::{
    core::{
        affine::AffineMapKind,
        fits::{FitKind, FitSet, ParametricFits},
        parameterization::Parameterization,
        resample::SplineCache,
    },
    errors::{SurrogateError, SurrogateResult},
};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use std::str::FromStr;

/// Default spline degree for the resampling cache.
pub const DEFAULT_SPLINE_DEGREE: usize = 3;

/// Which basis representation a record reconstructs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisKind {
    /// One complex basis `B`.
    WaveformBasis,
    /// Real amplitude basis `B_1` and real phase basis `B_2`.
    AmpPhaseBasis,
}

impl BasisKind {
    pub fn name(&self) -> &'static str {
        match self {
            BasisKind::WaveformBasis => "waveform_basis",
            BasisKind::AmpPhaseBasis => "amp_phase_basis",
        }
    }
}

impl FromStr for BasisKind {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "waveform_basis" => Ok(BasisKind::WaveformBasis),
            "amp_phase_basis" => Ok(BasisKind::AmpPhaseBasis),
            _ => Err(SurrogateError::UnknownBasisKind { name: s.to_string() }),
        }
    }
}

/// Basis matrices, rows = time samples, columns = basis vectors.
#[derive(Debug, Clone, PartialEq)]
pub enum BasisMatrices {
    Waveform(Array2<Complex64>),
    AmpPhase { amp: Array2<f64>, phase: Array2<f64> },
}

impl BasisMatrices {
    pub fn kind(&self) -> BasisKind {
        match self {
            BasisMatrices::Waveform(_) => BasisKind::WaveformBasis,
            BasisMatrices::AmpPhase { .. } => BasisKind::AmpPhaseBasis,
        }
    }

    /// Number of time samples (rows).
    pub fn n_samples(&self) -> usize {
        match self {
            BasisMatrices::Waveform(b) => b.nrows(),
            BasisMatrices::AmpPhase { amp, .. } => amp.nrows(),
        }
    }

    /// Reduced-basis dimension (columns).
    pub fn dim(&self) -> usize {
        match self {
            BasisMatrices::Waveform(b) => b.ncols(),
            BasisMatrices::AmpPhase { amp, .. } => amp.ncols(),
        }
    }
}

/// Which basis vector [`SingleModeRecord::basis_vector`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasisFlavor {
    /// Columns of `B`.
    Cardinal,
    /// Columns of `B·V`.
    Orthogonal,
    /// Columns of `B·V·R`.
    #[default]
    Waveform,
}

impl BasisFlavor {
    pub fn name(&self) -> &'static str {
        match self {
            BasisFlavor::Cardinal => "cardinal",
            BasisFlavor::Orthogonal => "orthogonal",
            BasisFlavor::Waveform => "waveform",
        }
    }
}

impl FromStr for BasisFlavor {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cardinal" => Ok(BasisFlavor::Cardinal),
            "orthogonal" => Ok(BasisFlavor::Orthogonal),
            "waveform" => Ok(BasisFlavor::Waveform),
            _ => Err(SurrogateError::UnknownBasisFlavor { name: s.to_string() }),
        }
    }
}

/// Fit kind plus its coefficient matrix (one row per basis vector).
#[derive(Debug, Clone, PartialEq)]
pub struct FitData {
    pub kind: FitKind,
    pub coeffs: Array2<f64>,
}

impl FitData {
    pub fn new(kind: FitKind, coeffs: Array2<f64>) -> Self {
        FitData { kind, coeffs }
    }
}

/// Loader output: a fully materialized, unvalidated record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordData {
    pub time_samples: Array1<f64>,
    pub fit_interval: [f64; 2],
    pub affine_map: AffineMapKind,
    pub parameterization: Parameterization,
    pub fit_amp: FitData,
    pub fit_phase: FitData,
    /// Ignored unless `norms_enabled`.
    pub fit_norm: Option<FitData>,
    pub norms_enabled: bool,
    pub basis: BasisMatrices,
    /// EIM Vandermonde matrix `V` (waveform basis only).
    pub eim_vandermonde: Option<Array2<Complex64>>,
    /// Reduced-basis coefficient matrix `R` (waveform basis only).
    pub rb_coefficients: Option<Array2<Complex64>>,
}

/// Validated, immutable single-mode record.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleModeRecord {
    times: Array1<f64>,
    fit_interval: [f64; 2],
    affine_map: AffineMapKind,
    parameterization: Parameterization,
    fits: ParametricFits,
    basis: BasisMatrices,
    eim_vandermonde: Option<Array2<Complex64>>,
    rb_coefficients: Option<Array2<Complex64>>,
    splines: SplineCache,
    spline_degree: usize,
}

impl SingleModeRecord {
    /// Validate `data`, compile its fits, and build the spline cache.
    ///
    /// # Errors
    /// - `InvalidTimeSamples`, `InvalidFitInterval` for a bad grid or
    ///   interval.
    /// - `InvalidFitCoefficients`, `InvalidBasisCombination` from fit
    ///   compilation and pairing, including fast fits on an
    ///   `amp_phase_basis` record or a missing norm fit with norms enabled.
    /// - `BasisShapeMismatch` when a matrix disagrees with the grid or the
    ///   fit dimension.
    /// - `BasisFlavorUnavailable` for misplaced or mis-shaped `V`/`R`.
    /// - `InvalidSplineDegree` for unsupported spline degrees.
    pub fn new(data: RecordData, spline_degree: usize) -> SurrogateResult<Self> {
        let RecordData {
            time_samples,
            fit_interval,
            affine_map,
            parameterization,
            fit_amp,
            fit_phase,
            fit_norm,
            norms_enabled,
            basis,
            eim_vandermonde,
            rb_coefficients,
        } = data;

        validate_times(&time_samples)?;
        let [lo, hi] = fit_interval;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(SurrogateError::InvalidFitInterval { min: lo, max: hi });
        }

        let norm = match (norms_enabled, fit_norm) {
            (true, Some(n)) => Some(FitSet::compile(n.kind, &n.coeffs)?),
            (true, None) => {
                return Err(SurrogateError::InvalidBasisCombination {
                    reason: "norms are enabled but no norm fit was supplied",
                });
            }
            (false, _) => None,
        };
        let fits = ParametricFits::new(
            FitSet::compile(fit_amp.kind, &fit_amp.coeffs)?,
            FitSet::compile(fit_phase.kind, &fit_phase.coeffs)?,
            norm,
        )?;
        if fits.is_fast() && basis.kind() != BasisKind::WaveformBasis {
            return Err(SurrogateError::InvalidBasisCombination {
                reason: "fast spline fits require a waveform_basis record",
            });
        }

        let expected = (time_samples.len(), fits.dim());
        match &basis {
            BasisMatrices::Waveform(b) => check_shape("B", expected, b.dim())?,
            BasisMatrices::AmpPhase { amp, phase } => {
                check_shape("B_1", expected, amp.dim())?;
                check_shape("B_2", expected, phase.dim())?;
            }
        }
        validate_flavor_matrices(&basis, fits.dim(), eim_vandermonde.as_ref(), rb_coefficients.as_ref())?;

        let splines = SplineCache::build(&time_samples, &basis, spline_degree)?;
        tracing::debug!(
            samples = time_samples.len(),
            dim = fits.dim(),
            basis = basis.kind().name(),
            splines = splines.len(),
            "built single-mode surrogate record"
        );

        Ok(SingleModeRecord {
            times: time_samples,
            fit_interval,
            affine_map,
            parameterization,
            fits,
            basis,
            eim_vandermonde,
            rb_coefficients,
            splines,
            spline_degree,
        })
    }

    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    pub fn fit_interval(&self) -> [f64; 2] {
        self.fit_interval
    }

    pub fn affine_map(&self) -> AffineMapKind {
        self.affine_map
    }

    pub fn parameterization(&self) -> Parameterization {
        self.parameterization
    }

    pub fn fits(&self) -> &ParametricFits {
        &self.fits
    }

    pub fn basis(&self) -> &BasisMatrices {
        &self.basis
    }

    pub fn basis_kind(&self) -> BasisKind {
        self.basis.kind()
    }

    pub fn splines(&self) -> &SplineCache {
        &self.splines
    }

    pub fn spline_degree(&self) -> usize {
        self.spline_degree
    }

    /// Reduced-basis dimension.
    pub fn dim(&self) -> usize {
        self.fits.dim()
    }

    /// The `i`-th cardinal, orthogonal, or waveform basis vector.
    ///
    /// # Errors
    /// - `BasisFlavorUnavailable` on `amp_phase_basis` records or when the
    ///   flavor's `V`/`R` matrix is absent.
    /// - `BasisIndexOutOfRange` when `i` exceeds the flavor's column count.
    pub fn basis_vector(&self, i: usize, flavor: BasisFlavor) -> SurrogateResult<Array1<Complex64>> {
        let BasisMatrices::Waveform(b) = &self.basis else {
            return Err(SurrogateError::BasisFlavorUnavailable {
                flavor: flavor.name(),
                reason: "amp_phase_basis records carry two real bases",
            });
        };
        let missing = |what| SurrogateError::BasisFlavorUnavailable { flavor: flavor.name(), reason: what };
        let column = |m: &Array2<Complex64>, i: usize| {
            if i < m.ncols() {
                Ok(m.column(i).to_owned())
            } else {
                Err(SurrogateError::BasisIndexOutOfRange { index: i, dim: m.ncols() })
            }
        };
        match flavor {
            BasisFlavor::Cardinal => column(b, i),
            BasisFlavor::Orthogonal => {
                let v = self.eim_vandermonde.as_ref().ok_or_else(|| missing("record has no EIM Vandermonde matrix"))?;
                Ok(b.dot(&column(v, i)?))
            }
            BasisFlavor::Waveform => {
                let v = self.eim_vandermonde.as_ref().ok_or_else(|| missing("record has no EIM Vandermonde matrix"))?;
                let r = self.rb_coefficients.as_ref().ok_or_else(|| missing("record has no reduced-basis coefficients"))?;
                Ok(b.dot(&v.dot(&column(r, i)?)))
            }
        }
    }
}

// ---- Validation helpers ----

fn validate_times(times: &Array1<f64>) -> SurrogateResult<()> {
    if times.len() < 2 {
        return Err(SurrogateError::InvalidTimeSamples {
            index: times.len(),
            reason: "at least two time samples are required",
        });
    }
    for (i, &t) in times.iter().enumerate() {
        if !t.is_finite() {
            return Err(SurrogateError::InvalidTimeSamples { index: i, reason: "sample is not finite" });
        }
        if i > 0 && t <= times[i - 1] {
            return Err(SurrogateError::InvalidTimeSamples {
                index: i,
                reason: "samples must be strictly increasing",
            });
        }
    }
    Ok(())
}

fn check_shape(name: &'static str, expected: (usize, usize), found: (usize, usize)) -> SurrogateResult<()> {
    if expected == found { Ok(()) } else { Err(SurrogateError::BasisShapeMismatch { name, expected, found }) }
}

fn validate_flavor_matrices(
    basis: &BasisMatrices, dim: usize, v: Option<&Array2<Complex64>>, r: Option<&Array2<Complex64>>,
) -> SurrogateResult<()> {
    if basis.kind() == BasisKind::AmpPhaseBasis && (v.is_some() || r.is_some()) {
        return Err(SurrogateError::InvalidBasisCombination {
            reason: "V and R matrices are only defined for waveform_basis records",
        });
    }
    match (v, r) {
        (Some(v), _) if v.nrows() != dim => Err(SurrogateError::BasisFlavorUnavailable {
            flavor: "orthogonal",
            reason: "V must have one row per basis vector",
        }),
        (None, Some(_)) => Err(SurrogateError::BasisFlavorUnavailable {
            flavor: "waveform",
            reason: "R was supplied without V",
        }),
        (Some(v), Some(r)) if r.nrows() != v.ncols() => Err(SurrogateError::BasisFlavorUnavailable {
            flavor: "waveform",
            reason: "R must have one row per column of V",
        }),
        _ => Ok(()),
    }
}
