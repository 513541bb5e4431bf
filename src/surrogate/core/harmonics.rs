//! Spin-weighted spherical harmonics `ₛYℓm(θ, φ)`.
//!
//! Uses the Wigner-d sum with the sign convention common in gravitational-
//! wave modelling, so that `₋₂Y₂₂ = √(5/64π) (1 + cos θ)² e^{2iφ}`.
use num_complex::Complex64;
use statrs::function::factorial::{binomial, factorial};
use std::f64::consts::PI;

/// Spin-weight of gravitational-wave strain modes.
pub const GW_SPIN_WEIGHT: i32 = -2;

/// Largest ℓ accepted by mode lists. Keeps every factorial in the
/// normalization far below `170!`, where `f64` overflows.
pub const MAX_ELL: i32 = 16;

/// Evaluate `ₛYℓm(θ, φ)`.
///
/// Returns zero when `|m| > ℓ` or `|s| > ℓ`, where the harmonic vanishes, and
/// for `ℓ > MAX_ELL`.
pub fn spin_weighted_ylm(s: i32, ell: i32, m: i32, theta: f64, phi: f64) -> Complex64 {
    if !(0..=MAX_ELL).contains(&ell) || m < -ell || m > ell || s < -ell || s > ell {
        return Complex64::new(0.0, 0.0);
    }
    let f = |n: i32| factorial(n as u64);
    let norm = (f(ell + m) * f(ell - m) * (2 * ell + 1) as f64 / (4.0 * PI * f(ell + s) * f(ell - s))).sqrt();
    let sign_m = if m % 2 == 0 { 1.0 } else { -1.0 };

    let (c, sn) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    let r_min = 0.max(m - s);
    let r_max = (ell - s).min(ell + m);
    let mut sum = 0.0;
    for r in r_min..=r_max {
        let sign = if (ell - r - s) % 2 == 0 { 1.0 } else { -1.0 };
        sum += binomial((ell - s) as u64, r as u64)
            * binomial((ell + s) as u64, (r + s - m) as u64)
            * sign
            * c.powi(2 * r + s - m)
            * sn.powi(2 * ell - 2 * r - s + m);
    }
    Complex64::from_polar(sign_m * norm * sum, m as f64 * phi)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THETA: f64 = 0.7;
    const PHI: f64 = 0.3;

    #[test]
    // Purpose
    // -------
    // Check ℓ = 2 harmonics against closed forms.
    //
    // Given
    // -----
    // - θ = 0.7, φ = 0.3, s = -2.
    //
    // Expect
    // ------
    // - Y22, Y2-2, Y21, Y20 match their textbook expressions to 1e-14.
    fn ell_two_matches_closed_forms() {
        let ct = THETA.cos();
        let cases = [
            (2, (5.0 / (64.0 * PI)).sqrt() * (1.0 + ct).powi(2)),
            (-2, (5.0 / (64.0 * PI)).sqrt() * (1.0 - ct).powi(2)),
            (1, (5.0 / (16.0 * PI)).sqrt() * THETA.sin() * (1.0 + ct)),
            (0, (15.0 / (32.0 * PI)).sqrt() * THETA.sin().powi(2)),
        ];
        for (m, modulus) in cases {
            let expected = Complex64::from_polar(modulus, m as f64 * PHI);
            let got = spin_weighted_ylm(GW_SPIN_WEIGHT, 2, m, THETA, PHI);
            assert!((got - expected).norm() < 1e-14, "m = {m}: {got} vs {expected}");
        }
    }

    #[test]
    // Purpose
    // -------
    // The conjugation law `ₛYℓ,-m = (-1)^{s+m} conj(₋ₛYℓm)` holds for ℓ = 3.
    //
    // Given
    // -----
    // - s = ±2, ℓ = 3, m ∈ {-3..3}.
    //
    // Expect
    // ------
    // - Agreement to 1e-13.
    fn conjugation_law_holds() {
        for m in -3..=3 {
            let lhs = spin_weighted_ylm(-2, 3, -m, THETA, PHI);
            let sign = if (-2 + m) % 2 == 0 { 1.0 } else { -1.0 };
            let rhs = spin_weighted_ylm(2, 3, m, THETA, PHI).conj() * sign;
            assert!((lhs - rhs).norm() < 1e-13, "m = {m}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Invalid index pairs vanish.
    //
    // Given
    // -----
    // - (ℓ, m) = (2, 3) and (1, 0) with s = -2.
    //
    // Expect
    // ------
    // - Exactly zero.
    fn invalid_indices_vanish() {
        assert_eq!(spin_weighted_ylm(-2, 2, 3, THETA, PHI), Complex64::new(0.0, 0.0));
        assert_eq!(spin_weighted_ylm(-2, 1, 0, THETA, PHI), Complex64::new(0.0, 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Extreme indices return zero instead of overflowing.
    //
    // Given
    // -----
    // - m = i32::MIN, ℓ = i32::MAX, and ℓ = MAX_ELL + 1.
    //
    // Expect
    // ------
    // - Exactly zero; ℓ = MAX_ELL is still finite.
    fn extreme_indices_vanish() {
        let zero = Complex64::new(0.0, 0.0);

        assert_eq!(spin_weighted_ylm(-2, 2, i32::MIN, THETA, PHI), zero);
        assert_eq!(spin_weighted_ylm(i32::MIN, 2, 2, THETA, PHI), zero);
        assert_eq!(spin_weighted_ylm(-2, i32::MAX, 2, THETA, PHI), zero);
        assert_eq!(spin_weighted_ylm(-2, MAX_ELL + 1, 2, THETA, PHI), zero);
        let top = spin_weighted_ylm(-2, MAX_ELL, MAX_ELL, THETA, PHI);
        assert!(top.re.is_finite() && top.im.is_finite());
    }
}
