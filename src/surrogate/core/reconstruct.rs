//! Basis reconstruction: fit outputs × basis matrices → complex mode.
use crate::surrogate::{
    core::{fits::FitEvaluation, record::BasisMatrices},
    errors::{SurrogateError, SurrogateResult},
};
use ndarray::{Array1, Zip};
use num_complex::Complex64;

/// Complex EIM coefficients for a `waveform_basis` record.
///
/// Fast fits are read as real/imaginary parts, `norm · (amp + i·phase)`;
/// otherwise `norm · amp · exp(i·phase)`.
pub fn eim_coefficients(eval: &FitEvaluation, fast: bool) -> Array1<Complex64> {
    let mut out = Array1::<Complex64>::zeros(eval.amp.len());
    Zip::from(&mut out).and(&eval.amp).and(&eval.phase).for_each(|o, &a, &p| {
        *o = if fast { Complex64::new(a, p) * eval.norm } else { Complex64::from_polar(a, p) * eval.norm };
    });
    out
}

/// Reconstruct the dimensionless complex mode `h = h+ + i·h×` on the grid of
/// `basis` (native or resampled).
///
/// - `waveform_basis`: `h = B · EIM`.
/// - `amp_phase_basis`: `h = norm · (B_1 · amp) · exp(i · B_2 · phase)`.
///
/// # Errors
/// - `InvalidBasisCombination` for fast fits on an `amp_phase_basis`.
pub fn reconstruct(basis: &BasisMatrices, eval: &FitEvaluation, fast: bool) -> SurrogateResult<Array1<Complex64>> {
    match basis {
        BasisMatrices::Waveform(b) => Ok(b.dot(&eim_coefficients(eval, fast))),
        BasisMatrices::AmpPhase { .. } if fast => Err(SurrogateError::InvalidBasisCombination {
            reason: "fast spline fits cannot be combined with amp_phase_basis",
        }),
        BasisMatrices::AmpPhase { amp, phase } => {
            let a = amp.dot(&eval.amp);
            let phi = phase.dot(&eval.phase);
            let mut h = Array1::<Complex64>::zeros(a.len());
            Zip::from(&mut h)
                .and(&a)
                .and(&phi)
                .for_each(|o, &a, &p| *o = Complex64::from_polar(a, p) * eval.norm);
            Ok(h)
        }
    }
}
