//! Small waveform utilities shared by the evaluators and the matcher.
use crate::surrogate::errors::{SurrogateError, SurrogateResult};
use ndarray::{Array1, ArrayView1, Zip};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Modulus and unwrapped phase of `h = A·e^{iφ}`.
pub fn amp_phase(h: ArrayView1<Complex64>) -> (Array1<f64>, Array1<f64>) {
    let amp = h.mapv(|z| z.norm());
    let mut phase = h.mapv(|z| z.arg());
    unwrap_phase(&mut phase);
    (amp, phase)
}

/// Remove 2π jumps between consecutive samples in place.
pub fn unwrap_phase(phase: &mut Array1<f64>) {
    let mut offset = 0.0;
    let mut prev = match phase.iter().next() {
        Some(&p) => p,
        None => return,
    };
    for p in phase.iter_mut().skip(1) {
        let raw = *p;
        let delta = raw - prev;
        if delta > PI {
            offset -= 2.0 * PI * ((delta + PI) / (2.0 * PI)).floor();
        } else if delta < -PI {
            offset += 2.0 * PI * ((-delta + PI) / (2.0 * PI)).floor();
        }
        prev = raw;
        *p = raw + offset;
    }
}

/// Index of the sample with the largest modulus; first index on ties.
pub fn peak_index(h: ArrayView1<Complex64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, z) in h.iter().enumerate() {
        let a = z.norm();
        if best.is_none_or(|(_, b)| a > b) {
            best = Some((i, a));
        }
    }
    best.map(|(i, _)| i)
}

/// Unwrapped phase at the peak-amplitude sample.
pub fn phase_at_peak(h: ArrayView1<Complex64>) -> Option<f64> {
    let idx = peak_index(h)?;
    let (_, phase) = amp_phase(h);
    Some(phase[idx])
}

/// Uniform rotation `h · e^{iδ}`.
pub fn rotate_phase(h: ArrayView1<Complex64>, delta: f64) -> Array1<Complex64> {
    let rot = Complex64::from_polar(1.0, delta);
    h.mapv(|z| z * rot)
}

/// Starting frequency estimated from the phase advance between the first two
/// samples: `|arg(h₁·conj(h₀))| / (2π (t₁ − t₀))`. Hz when `t` is in seconds.
pub fn instantaneous_frequency(hp: ArrayView1<f64>, hc: ArrayView1<f64>, t: ArrayView1<f64>) -> Option<f64> {
    if hp.len() < 2 || hc.len() < 2 || t.len() < 2 {
        return None;
    }
    let h0 = Complex64::new(hp[0], hc[0]);
    let h1 = Complex64::new(hp[1], hc[1]);
    let dt = t[1] - t[0];
    if dt <= 0.0 {
        return None;
    }
    Some((h1 * h0.conj()).arg().abs() / (2.0 * PI * dt))
}

/// Uniform grid `tmin, tmin + dt, …` up to and including `tmax` (within a
/// relative 1e-9 step tolerance).
///
/// # Errors
/// - `InvalidOption` unless all inputs are finite, `dt > 0`, and
///   `tmin < tmax`.
pub fn uniform_time_samples(tmin: f64, tmax: f64, dt: f64) -> SurrogateResult<Array1<f64>> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SurrogateError::InvalidOption { name: "dt", value: dt, reason: "must be finite and > 0" });
    }
    if !(tmin.is_finite() && tmax.is_finite() && tmin < tmax) {
        return Err(SurrogateError::InvalidOption {
            name: "tmax",
            value: tmax,
            reason: "time bounds must be finite with tmin < tmax",
        });
    }
    let n = ((tmax - tmin) / dt + 1e-9).floor() as usize + 1;
    Ok(Array1::from_iter((0..n).map(|i| tmin + i as f64 * dt)))
}

/// Split a complex waveform into `(h+, h×)`.
pub fn polarizations(h: ArrayView1<Complex64>) -> (Array1<f64>, Array1<f64>) {
    (h.mapv(|z| z.re), h.mapv(|z| z.im))
}

/// Join `(h+, h×)` into `h+ + i·h×`.
pub fn complex_strain(hp: ArrayView1<f64>, hc: ArrayView1<f64>) -> Array1<Complex64> {
    let mut h = Array1::<Complex64>::zeros(hp.len());
    Zip::from(&mut h).and(hp).and(hc).for_each(|o, &p, &c| *o = Complex64::new(p, c));
    h
}
