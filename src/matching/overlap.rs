//! overlap — comparison window, discrete inner products, and the analytic
//! initial guess for alignment.
//!
//! Purpose
//! -------
//! Provide the pieces of the mismatch functional that do not depend on how
//! the model waveform is produced:
//! - [`OverlapWindow::new`] intersects the reference and model time ranges,
//!   trims fixed fractional margins at both ends, and keeps the reference
//!   samples inside the trimmed window;
//! - [`mismatch`] computes the normalized discrete L2 distance
//!   `Σ w_i |h_ref,i − h_i|² / Σ w_i |h_ref,i|²` with trapezoid weights;
//! - [`coarse_alignment`] scans a grid of time lags for the peak of the
//!   complex overlap and converts its argument into a rotation estimate.
//!
//! Conventions
//! -----------
//! - Model waveforms are evaluated at `t_common − δt`, i.e. a positive `δt`
//!   delays the model.
use crate::surrogate::errors::{SurrogateError, SurrogateResult};
use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

/// Minimum number of reference samples in the trimmed window.
pub const MIN_OVERLAP_SAMPLES: usize = 4;

/// Reference samples retained for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapWindow {
    pub t: Array1<f64>,
    pub h_ref: Array1<Complex64>,
    pub weights: Array1<f64>,
    /// `Σ w_i |h_ref,i|²`.
    pub ref_norm: f64,
}

impl OverlapWindow {
    /// Trim the overlap of `[t_ref]` and `model_domain` by `trim_fraction` of
    /// its length at each end.
    ///
    /// # Errors
    /// - `InvalidReference` for mismatched lengths, non-finite or
    ///   non-increasing times, or a reference with zero norm in the window.
    /// - `InsufficientOverlap` when fewer than [`MIN_OVERLAP_SAMPLES`]
    ///   samples remain.
    pub fn new(
        t_ref: ArrayView1<f64>, h_ref: ArrayView1<Complex64>, model_domain: (f64, f64), trim_fraction: f64,
    ) -> SurrogateResult<Self> {
        if t_ref.len() != h_ref.len() {
            return Err(SurrogateError::InvalidReference { reason: "time and strain arrays differ in length" });
        }
        if t_ref.iter().any(|v| !v.is_finite()) || h_ref.iter().any(|z| !(z.re.is_finite() && z.im.is_finite())) {
            return Err(SurrogateError::InvalidReference { reason: "reference contains non-finite values" });
        }
        if t_ref.windows(2).into_iter().any(|w| w[1] <= w[0]) {
            return Err(SurrogateError::InvalidReference { reason: "reference times must be strictly increasing" });
        }
        let (Some(&r0), Some(&r1)) = (t_ref.iter().next(), t_ref.iter().last()) else {
            return Err(SurrogateError::InsufficientOverlap { samples: 0 });
        };
        let start = r0.max(model_domain.0);
        let end = r1.min(model_domain.1);
        let margin = trim_fraction * (end - start);
        let (lo, hi) = (start + margin, end - margin);

        let keep: Vec<usize> = (0..t_ref.len()).filter(|&i| t_ref[i] >= lo && t_ref[i] <= hi).collect();
        if end <= start || keep.len() < MIN_OVERLAP_SAMPLES {
            return Err(SurrogateError::InsufficientOverlap { samples: keep.len() });
        }
        let t = Array1::from_iter(keep.iter().map(|&i| t_ref[i]));
        let h = Array1::from_iter(keep.iter().map(|&i| h_ref[i]));
        let weights = trapezoid_weights(t.view());
        let ref_norm = h.iter().zip(&weights).map(|(z, w)| z.norm_sqr() * w).sum::<f64>();
        if ref_norm <= 0.0 {
            return Err(SurrogateError::InvalidReference { reason: "reference vanishes on the overlap window" });
        }
        Ok(OverlapWindow { t, h_ref: h, weights, ref_norm })
    }

    /// Median sample spacing of the window.
    pub fn typical_step(&self) -> f64 {
        let mut dt: Vec<f64> = self.t.windows(2).into_iter().map(|w| w[1] - w[0]).collect();
        dt.sort_by(f64::total_cmp);
        dt.get(dt.len() / 2).copied().unwrap_or(0.0)
    }

    /// Window length `t_last − t_first`.
    pub fn span(&self) -> f64 {
        self.t[self.t.len() - 1] - self.t[0]
    }

    /// Shifted model grid `t − δt`.
    pub fn shifted(&self, dt: f64) -> Array1<f64> {
        &self.t - dt
    }
}

/// Trapezoid quadrature weights for a strictly increasing grid.
pub fn trapezoid_weights(t: ArrayView1<f64>) -> Array1<f64> {
    let n = t.len();
    Array1::from_iter((0..n).map(|i| {
        let left = if i > 0 { t[i] - t[i - 1] } else { 0.0 };
        let right = if i + 1 < n { t[i + 1] - t[i] } else { 0.0 };
        0.5 * (left + right)
    }))
}

/// Normalized mismatch of `h` against the window's reference.
pub fn mismatch(window: &OverlapWindow, h: ArrayView1<Complex64>) -> f64 {
    let num: f64 = window
        .h_ref
        .iter()
        .zip(h.iter())
        .zip(&window.weights)
        .map(|((r, z), w)| (r - z).norm_sqr() * w)
        .sum();
    num / window.ref_norm
}

/// Complex overlap `Σ w_i h_ref,i · conj(h_i)`.
pub fn complex_overlap(window: &OverlapWindow, h: ArrayView1<Complex64>) -> Complex64 {
    window.h_ref.iter().zip(h.iter()).zip(&window.weights).map(|((r, z), w)| r * z.conj() * *w).sum()
}

/// Lag and rotation estimate from a discrete overlap scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialGuess {
    pub time_shift: f64,
    pub phase_shift: f64,
}

/// Scan `n_lags` lags evenly spaced in `[−max_lag, max_lag]` (always
/// including zero), keep the lag with the largest `|overlap|`, and estimate
/// the rotation as `arg(overlap) / m_dom`.
///
/// `model(δt)` returns the unrotated model on the window's grid shifted by
/// `δt`.
pub fn coarse_alignment<F>(window: &OverlapWindow, max_lag: f64, n_lags: usize, m_dom: i32, mut model: F) -> InitialGuess
where
    F: FnMut(f64) -> Array1<Complex64>,
{
    let half = (n_lags / 2) as i64;
    let step = if half > 0 { max_lag / half as f64 } else { 0.0 };
    let mut best = (0.0, Complex64::new(0.0, 0.0));
    for k in -half..=half {
        let lag = k as f64 * step;
        let c = complex_overlap(window, model(lag).view());
        if c.norm() > best.1.norm() {
            best = (lag, c);
        }
    }
    let m = if m_dom == 0 { 2 } else { m_dom };
    InitialGuess { time_shift: best.0, phase_shift: best.1.arg() / m as f64 }
}
