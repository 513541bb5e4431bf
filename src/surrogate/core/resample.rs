//! resample — per-column spline cache and off-grid basis resampling.
//!
//! Purpose
//! -------
//! Evaluate a record's basis matrices on arbitrary query times. One
//! interpolating spline is fit per real basis column when the record is
//! constructed (real and imaginary parts separately for a complex basis) and
//! never changes afterwards.
//!
//! Key behaviors
//! -------------
//! - Queries outside the native interval use constant (clamped)
//!   extrapolation.
//! - When the first query time lies within `1e-12` (relative, or absolute
//!   when the native start is zero) of the native first sample, that row is
//!   evaluated exactly at the native boundary with in-interval evaluation.
//!   The corrected row is produced while building a fresh output matrix;
//!   nothing is patched in place.
//! - All columns share one knot vector, so the basis functions are evaluated
//!   once per query time and reused for every column.
use crate::surrogate::{
    core::{
        bspline::{BSpline, Extrapolation},
        record::BasisMatrices,
    },
    errors::SurrogateResult,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use num_complex::Complex64;

/// Relative (or absolute, at a zero start) boundary snapping tolerance.
pub const BOUNDARY_TOL: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
enum Columns {
    Waveform { re: Vec<BSpline>, im: Vec<BSpline> },
    AmpPhase { amp: Vec<BSpline>, phase: Vec<BSpline> },
}

/// Splines of every basis column over the native time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineCache {
    t0: f64,
    columns: Columns,
}

impl SplineCache {
    /// Fit one spline of `degree` per real basis column.
    ///
    /// # Errors
    /// Propagates [`BSpline::interpolate`] failures (bad degree or grid).
    pub fn build(times: &Array1<f64>, basis: &BasisMatrices, degree: usize) -> SurrogateResult<Self> {
        let fit_real = |m: ArrayView2<f64>| -> SurrogateResult<Vec<BSpline>> {
            m.columns().into_iter().map(|c| BSpline::interpolate(times.view(), c, degree)).collect()
        };
        let columns = match basis {
            BasisMatrices::Waveform(b) => Columns::Waveform {
                re: fit_real(b.mapv(|z| z.re).view())?,
                im: fit_real(b.mapv(|z| z.im).view())?,
            },
            BasisMatrices::AmpPhase { amp, phase } => {
                Columns::AmpPhase { amp: fit_real(amp.view())?, phase: fit_real(phase.view())? }
            }
        };
        Ok(SplineCache { t0: times[0], columns })
    }

    /// Total number of real splines held.
    pub fn len(&self) -> usize {
        match &self.columns {
            Columns::Waveform { re, im } => re.len() + im.len(),
            Columns::AmpPhase { amp, phase } => amp.len() + phase.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `t` should snap to the native first sample.
    pub fn near_start(&self, t: f64) -> bool {
        let tol = if self.t0 == 0.0 { BOUNDARY_TOL } else { BOUNDARY_TOL * self.t0.abs() };
        (t - self.t0).abs() <= tol
    }

    /// Basis matrices restricted to the query grid `samples`.
    pub fn resample(&self, samples: ArrayView1<f64>) -> BasisMatrices {
        match &self.columns {
            Columns::Waveform { re, im } => {
                let re_m = self.eval_columns(re, samples);
                let im_m = self.eval_columns(im, samples);
                let mut out = Array2::<Complex64>::zeros(re_m.raw_dim());
                ndarray::Zip::from(&mut out)
                    .and(&re_m)
                    .and(&im_m)
                    .for_each(|o, &r, &i| *o = Complex64::new(r, i));
                BasisMatrices::Waveform(out)
            }
            Columns::AmpPhase { amp, phase } => BasisMatrices::AmpPhase {
                amp: self.eval_columns(amp, samples),
                phase: self.eval_columns(phase, samples),
            },
        }
    }

    fn eval_columns(&self, splines: &[BSpline], samples: ArrayView1<f64>) -> Array2<f64> {
        let mut out = Array2::zeros((samples.len(), splines.len()));
        let Some(first_spline) = splines.first() else {
            return out;
        };
        for (r, &t) in samples.iter().enumerate() {
            let (t_eval, mode) = if r == 0 && self.near_start(t) {
                (self.t0, Extrapolation::Polynomial)
            } else {
                (t, Extrapolation::Clamp)
            };
            let (first, vals) = first_spline.basis_at(t_eval, mode);
            for (c, s) in splines.iter().enumerate() {
                out[[r, c]] = s.dot_basis(first, &vals);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    fn native() -> (Array1<f64>, BasisMatrices) {
        let t = Array1::<f64>::linspace(-10.0, 10.0, 41);
        let b = Array2::from_shape_fn((41, 2), |(i, j)| {
            let x = t[i];
            Complex64::new((0.3 * x + j as f64).sin(), (0.2 * x).cos() * (j as f64 + 1.0))
        });
        (t, BasisMatrices::Waveform(b))
    }

    #[test]
    // Purpose
    // -------
    // Resampling on the native grid reproduces the basis.
    //
    // Given
    // -----
    // - A 41 × 2 complex basis on a uniform grid.
    //
    // Expect
    // ------
    // - Max deviation below 1e-12; the cache holds 4 splines.
    fn resample_on_native_grid_reproduces_basis() {
        let (t, basis) = native();
        let cache = SplineCache::build(&t, &basis, 3).expect("cache");

        let BasisMatrices::Waveform(out) = cache.resample(t.view()) else {
            panic!("expected waveform basis");
        };
        let BasisMatrices::Waveform(b) = basis else { unreachable!() };

        assert_eq!(cache.len(), 4);
        let err = (&out - &b).mapv(|z| z.norm()).fold(0.0f64, |a, &v| a.max(v));
        assert!(err < 1e-12, "max deviation {err}");
    }

    #[test]
    // Purpose
    // -------
    // A first query a hair before the native start snaps to the boundary.
    //
    // Given
    // -----
    // - First query at `t0 (1 + 5e-13)` with `t0 = -10`, i.e. slightly left.
    //
    // Expect
    // ------
    // - Row 0 equals the in-interval spline value at `t0` exactly.
    fn near_start_query_snaps_to_boundary() {
        let (t, basis) = native();
        let cache = SplineCache::build(&t, &basis, 3).expect("cache");
        let samples = array![t[0] * (1.0 + 5e-13), 0.0, 3.3];

        let BasisMatrices::Waveform(out) = cache.resample(samples.view()) else {
            panic!("expected waveform basis");
        };
        let BasisMatrices::Waveform(exact) = cache.resample(array![t[0]].view()) else {
            panic!("expected waveform basis");
        };

        assert!(cache.near_start(samples[0]));
        assert_eq!(out.row(0), exact.row(0));
    }

    #[test]
    // Purpose
    // -------
    // Queries far outside the grid are clamped, not extrapolated.
    //
    // Given
    // -----
    // - An amp/phase basis and queries at t = -50 and t = 50.
    //
    // Expect
    // ------
    // - Rows equal the boundary rows of the native basis.
    fn far_queries_are_clamped() {
        let t = Array1::<f64>::linspace(0.0, 4.0, 9);
        let amp = Array2::from_shape_fn((9, 1), |(i, _)| t[i] * t[i]);
        let phase = Array2::from_shape_fn((9, 1), |(i, _)| -t[i]);
        let basis = BasisMatrices::AmpPhase { amp, phase };
        let cache = SplineCache::build(&t, &basis, 3).expect("cache");

        let BasisMatrices::AmpPhase { amp, phase } = cache.resample(array![-50.0, 50.0].view()) else {
            panic!("expected amp/phase basis");
        };

        assert!((amp[[0, 0]] - 0.0).abs() < 1e-12);
        assert!((amp[[1, 0]] - 16.0).abs() < 1e-12);
        assert!((phase[[1, 0]] + 4.0).abs() < 1e-12);
    }
}
