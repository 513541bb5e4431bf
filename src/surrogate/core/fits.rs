//! fits — parametric fit registry and compiled fit evaluation.
//!
//! Purpose
//! -------
//! Map a (normalized) parameter value `x0` to the per-basis-vector amplitude
//! and phase values and the scalar norm that feed basis reconstruction.
//!
//! Key behaviors
//! -------------
//! - [`FitKind`] is the closed set of fit functions a record may name. Names
//!   resolve through [`FitKind::from_str`] or the registry lookup
//!   [`fit_function`]; adding a fit kind means adding a variant, and every
//!   `match` over it is checked at compile time.
//! - [`FitSet`] compiles one coefficient matrix (one row per basis vector)
//!   at record construction. Spline rows are decoded once; `fast_spline_*`
//!   sets share one knot vector and evaluate the basis functions once per
//!   call.
//! - [`ParametricFits`] bundles the amplitude, phase, and optional norm sets
//!   and enforces the pairing rules between fast kinds.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fit evaluation performs no range checking; callers validate the
//!   parameter against the record's fit interval first.
//! - A disabled norm evaluates to exactly `1.0`.
//!
//! Conventions
//! -----------
//! - `polyval_1d` rows are highest degree first; pad at the front.
//! - `chebyshev_1d` rows are lowest order first; pad at the end.
//! - `spline_1d` / `fast_spline_*` rows are packed B-splines
//!   (see [`BSpline::from_packed`]).
use crate::surrogate::{
    core::bspline::{BSpline, Extrapolation},
    errors::{SurrogateError, SurrogateResult},
};
use ndarray::{Array1, Array2, ArrayView1};
use std::str::FromStr;

/// Plain fit function over one coefficient row.
pub type FitFn = fn(ArrayView1<f64>, f64) -> f64;

/// Closed set of fit function kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitKind {
    Polyval1d,
    Chebyshev1d,
    Spline1d,
    /// Evaluates directly to the real part of the EIM coefficients.
    FastSplineReal,
    /// Evaluates directly to the imaginary part of the EIM coefficients.
    FastSplineImag,
}

impl FitKind {
    pub const ALL: [FitKind; 5] = [
        FitKind::Polyval1d,
        FitKind::Chebyshev1d,
        FitKind::Spline1d,
        FitKind::FastSplineReal,
        FitKind::FastSplineImag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FitKind::Polyval1d => "polyval_1d",
            FitKind::Chebyshev1d => "chebyshev_1d",
            FitKind::Spline1d => "spline_1d",
            FitKind::FastSplineReal => "fast_spline_real",
            FitKind::FastSplineImag => "fast_spline_imag",
        }
    }

    pub fn is_fast(&self) -> bool {
        matches!(self, FitKind::FastSplineReal | FitKind::FastSplineImag)
    }

    /// Row-wise evaluation function for this kind.
    pub fn function(&self) -> FitFn {
        match self {
            FitKind::Polyval1d => polyval,
            FitKind::Chebyshev1d => chebval,
            FitKind::Spline1d | FitKind::FastSplineReal | FitKind::FastSplineImag => spline_row,
        }
    }
}

impl FromStr for FitKind {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        FitKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| SurrogateError::UnknownFitKind { name: s.to_string() })
    }
}

/// Registry lookup: resolve a fit-type name to its row evaluation function.
///
/// # Errors
/// - `UnknownFitKind` for names outside the registry.
pub fn fit_function(name: &str) -> SurrogateResult<FitFn> {
    Ok(name.parse::<FitKind>()?.function())
}

// ---- Row functions ----

/// Horner evaluation, highest degree first.
pub fn polyval(coefs: ArrayView1<f64>, x: f64) -> f64 {
    coefs.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Clenshaw evaluation of `Σ c_j T_j(x)`, lowest order first.
pub fn chebval(coefs: ArrayView1<f64>, x: f64) -> f64 {
    let (mut b1, mut b2) = (0.0, 0.0);
    for &c in coefs.iter().skip(1).rev() {
        let b0 = c + 2.0 * x * b1 - b2;
        b2 = b1;
        b1 = b0;
    }
    let c0 = coefs.get(0).copied().unwrap_or(0.0);
    c0 + x * b1 - b2
}

/// Decode-and-evaluate a packed spline row; malformed rows yield NaN.
pub fn spline_row(row: ArrayView1<f64>, x: f64) -> f64 {
    BSpline::from_packed(row).map_or(f64::NAN, |s| s.eval(x, Extrapolation::Polynomial))
}

// ---- Compiled sets ----

#[derive(Debug, Clone, PartialEq)]
enum Compiled {
    Rows(Array2<f64>),
    Splines(Vec<BSpline>),
    SharedKnots(Vec<BSpline>),
}

/// One fit kind applied to every row of a coefficient matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSet {
    kind: FitKind,
    compiled: Compiled,
}

impl FitSet {
    /// Compile `coeffs` (one row per basis vector) for `kind`.
    ///
    /// # Errors
    /// - `InvalidFitCoefficients` for empty or non-finite rows, malformed
    ///   packed splines, or fast rows that do not share a knot vector.
    pub fn compile(kind: FitKind, coeffs: &Array2<f64>) -> SurrogateResult<Self> {
        let bad = |row, reason| SurrogateError::InvalidFitCoefficients { kind: kind.name(), row, reason };
        if coeffs.nrows() == 0 || coeffs.ncols() == 0 {
            return Err(bad(0, "coefficient matrix is empty"));
        }
        let compiled = match kind {
            FitKind::Polyval1d | FitKind::Chebyshev1d => {
                if let Some(pos) = coeffs.iter().position(|v| !v.is_finite()) {
                    return Err(bad(pos / coeffs.ncols(), "coefficients must be finite"));
                }
                Compiled::Rows(coeffs.clone())
            }
            FitKind::Spline1d | FitKind::FastSplineReal | FitKind::FastSplineImag => {
                let splines = coeffs
                    .rows()
                    .into_iter()
                    .enumerate()
                    .map(|(i, row)| BSpline::from_packed(row).map_err(|reason| bad(i, reason)))
                    .collect::<SurrogateResult<Vec<_>>>()?;
                if kind.is_fast() {
                    if let Some(i) = splines.iter().position(|s| !s.same_knots(&splines[0])) {
                        return Err(bad(i, "fast spline rows must share degree and knots"));
                    }
                    Compiled::SharedKnots(splines)
                } else {
                    Compiled::Splines(splines)
                }
            }
        };
        Ok(FitSet { kind, compiled })
    }

    pub fn kind(&self) -> FitKind {
        self.kind
    }

    /// Number of rows (basis vectors) this set evaluates.
    pub fn len(&self) -> usize {
        match &self.compiled {
            Compiled::Rows(c) => c.nrows(),
            Compiled::Splines(s) | Compiled::SharedKnots(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluate every row at `x0`.
    pub fn eval(&self, x0: f64) -> Array1<f64> {
        match &self.compiled {
            Compiled::Rows(coeffs) => {
                let f = self.kind.function();
                coeffs.rows().into_iter().map(|row| f(row, x0)).collect()
            }
            Compiled::Splines(splines) => {
                splines.iter().map(|s| s.eval(x0, Extrapolation::Polynomial)).collect()
            }
            Compiled::SharedKnots(splines) => {
                let (first, vals) = splines[0].basis_at(x0, Extrapolation::Polynomial);
                splines.iter().map(|s| s.dot_basis(first, &vals)).collect()
            }
        }
    }
}

/// Fit outputs at one parameter value.
#[derive(Debug, Clone, PartialEq)]
pub struct FitEvaluation {
    /// Amplitudes, or real parts for fast fits.
    pub amp: Array1<f64>,
    /// Phases, or imaginary parts for fast fits.
    pub phase: Array1<f64>,
    pub norm: f64,
}

/// Amplitude, phase, and optional norm fits of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricFits {
    amp: FitSet,
    phase: FitSet,
    norm: Option<FitSet>,
}

impl ParametricFits {
    /// Bundle compiled fits and validate their pairing.
    ///
    /// # Errors
    /// - `InvalidBasisCombination` when exactly one of amplitude/phase is
    ///   fast, when the fast kinds are not `(real, imag)`, or when the norm
    ///   fit is fast.
    /// - `InvalidFitCoefficients` when amplitude and phase row counts differ
    ///   or the norm set has more than one row.
    pub fn new(amp: FitSet, phase: FitSet, norm: Option<FitSet>) -> SurrogateResult<Self> {
        match (amp.kind(), phase.kind()) {
            (FitKind::FastSplineReal, FitKind::FastSplineImag) => {}
            (a, p) if a.is_fast() || p.is_fast() => {
                return Err(SurrogateError::InvalidBasisCombination {
                    reason: "fast fits require amplitude 'fast_spline_real' with phase 'fast_spline_imag'",
                });
            }
            _ => {}
        }
        if amp.len() != phase.len() {
            return Err(SurrogateError::InvalidFitCoefficients {
                kind: phase.kind().name(),
                row: amp.len().min(phase.len()),
                reason: "amplitude and phase fits must have one row per basis vector",
            });
        }
        if let Some(n) = &norm {
            if n.kind().is_fast() {
                return Err(SurrogateError::InvalidBasisCombination {
                    reason: "norm fit cannot be a fast spline",
                });
            }
            if n.len() != 1 {
                return Err(SurrogateError::InvalidFitCoefficients {
                    kind: n.kind().name(),
                    row: 1,
                    reason: "norm fit must have exactly one row",
                });
            }
        }
        Ok(ParametricFits { amp, phase, norm })
    }

    /// True when amplitude/phase evaluate directly to real/imaginary parts.
    pub fn is_fast(&self) -> bool {
        self.amp.kind() == FitKind::FastSplineReal
    }

    /// Number of basis vectors.
    pub fn dim(&self) -> usize {
        self.amp.len()
    }

    pub fn norms_enabled(&self) -> bool {
        self.norm.is_some()
    }

    /// Evaluate every fit at the mapped parameter `x0`.
    pub fn evaluate(&self, x0: f64) -> FitEvaluation {
        let norm = self.norm.as_ref().map_or(1.0, |n| n.eval(x0)[0]);
        FitEvaluation { amp: self.amp.eval(x0), phase: self.phase.eval(x0), norm }
    }
}
