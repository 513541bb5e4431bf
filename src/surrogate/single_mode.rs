//! single_mode — evaluate one `(ℓ, m)` mode of a surrogate.
//!
//! Purpose
//! -------
//! Turn a physical parameter into the polarizations `(t, h+, h×)` of one
//! mode by chaining parameter mapping, fit evaluation, basis reconstruction
//! (optionally through the spline cache), phase referencing, unit scaling,
//! and the starting-frequency check.
//!
//! Key behaviors
//! -------------
//! - [`SingleModeSurrogate::evaluate`] runs every step in order; each is a
//!   precondition for the next, and option and range validation happen
//!   before any reconstruction work.
//! - With `samples = None` the mode is reconstructed directly from the
//!   native basis as `B · EIM`; the spline cache is not touched.
//! - Non-fatal conditions are returned in [`Evaluation::warnings`] and
//!   emitted as `tracing` warnings.
//!
//! Invariants & assumptions
//! ------------------------
//! - The evaluator holds its record by value and never mutates it, so
//!   repeated evaluations with equal inputs give identical outputs.
//!
//! Downstream usage
//! ----------------
//! - [`crate::surrogate::multi_mode`] validates the parameter once per call
//!   and then reuses the crate-internal unchecked path for every mode.
use crate::surrogate::{
    core::{
        options::{EvalOptions, RangeCheck},
        reconstruct::reconstruct,
        record::{BasisFlavor, RecordData, SingleModeRecord},
        units::{SampleUnits, TimeUnits, amplitude_scale, time_scale},
        waveform::{instantaneous_frequency, phase_at_peak, polarizations, rotate_phase},
    },
    errors::{SurrogateError, SurrogateResult, SurrogateWarning},
};
use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

/// Time axis and polarizations of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub t: Array1<f64>,
    pub hp: Array1<f64>,
    pub hc: Array1<f64>,
    pub warnings: Vec<SurrogateWarning>,
}

/// Evaluator over one validated record.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleModeSurrogate {
    record: SingleModeRecord,
}

impl SingleModeSurrogate {
    pub fn new(record: SingleModeRecord) -> Self {
        SingleModeSurrogate { record }
    }

    /// Validate loader output and build the evaluator.
    ///
    /// # Errors
    /// Propagates every [`SingleModeRecord::new`] failure.
    pub fn from_data(data: RecordData, spline_degree: usize) -> SurrogateResult<Self> {
        Ok(Self::new(SingleModeRecord::new(data, spline_degree)?))
    }

    pub fn record(&self) -> &SingleModeRecord {
        &self.record
    }

    /// Map `x` to the internal parameter and check it against the fit
    /// interval (inclusive).
    ///
    /// # Errors
    /// - `InvalidParameter` when the parameterization rejects `x`.
    /// - `ParameterOutOfRange` in strict mode.
    pub fn check_parameter(&self, x: f64, range_check: RangeCheck) -> SurrogateResult<(f64, Option<SurrogateWarning>)> {
        let internal = self.record.parameterization().apply(x)?;
        let [min, max] = self.record.fit_interval();
        if (min..=max).contains(&internal) {
            return Ok((internal, None));
        }
        match range_check {
            RangeCheck::Strict => Err(SurrogateError::ParameterOutOfRange { value: internal, min, max }),
            RangeCheck::Lenient => Ok((internal, Some(SurrogateWarning::ParameterOutOfRange { value: internal, min, max }))),
        }
    }

    /// Evaluate the mode at physical parameter `x`.
    ///
    /// # Errors
    /// - Option validation errors from [`EvalOptions::validate`].
    /// - Parameter errors from [`SingleModeSurrogate::check_parameter`].
    pub fn evaluate(&self, x: f64, opts: &EvalOptions) -> SurrogateResult<Evaluation> {
        opts.validate()?;
        let (internal, warning) = self.check_parameter(x, opts.range_check)?;
        let mut out = self.evaluate_unchecked(internal, opts)?;
        if let Some(w) = warning {
            w.emit();
            out.warnings.insert(0, w);
        }
        Ok(out)
    }

    /// Evaluation from an already validated internal parameter and options.
    pub(crate) fn evaluate_unchecked(&self, internal: f64, opts: &EvalOptions) -> SurrogateResult<Evaluation> {
        let samples = self.dimensionless_samples(opts);
        let mut h = self.h_sur(internal, samples.as_ref().map(|s| s.view()))?;

        if let Some(phase_ref) = opts.phase_ref {
            if let Some(peak) = phase_at_peak(h.view()) {
                h = rotate_phase(h.view(), phase_ref - peak);
            }
        }

        let (amp0, t_scale) = match (opts.mass, opts.distance) {
            (Some(mass), Some(distance)) => (amplitude_scale(mass, distance), time_scale(mass)),
            _ => (1.0, 1.0),
        };
        let (mut hp, mut hc) = polarizations(h.view());
        hp *= amp0;
        hc *= amp0;
        let t = samples.unwrap_or_else(|| self.record.times().clone()) * t_scale;

        let mut warnings = Vec::new();
        if let Some(f_low) = opts.f_low {
            if let Some(w) = low_frequency_warning(hp.view(), hc.view(), t.view(), f_low) {
                w.emit();
                warnings.push(w);
            }
        }
        Ok(Evaluation { t, hp, hc, warnings })
    }

    /// Dimensionless complex mode at internal parameter `internal`, on the
    /// native grid or on dimensionless `samples`. No range check.
    pub fn h_sur(&self, internal: f64, samples: Option<ArrayView1<f64>>) -> SurrogateResult<Array1<Complex64>> {
        let x0 = self.record.affine_map().map(internal, self.record.fit_interval());
        let fits = self.record.fits();
        let eval = fits.evaluate(x0);
        match samples {
            None => reconstruct(self.record.basis(), &eval, fits.is_fast()),
            Some(s) => reconstruct(&self.record.splines().resample(s), &eval, fits.is_fast()),
        }
    }

    /// Native grid in the requested units.
    ///
    /// # Errors
    /// - `InvalidOption` when `units = Seconds` without a positive mass.
    pub fn times(&self, units: TimeUnits, mass: Option<f64>) -> SurrogateResult<Array1<f64>> {
        let t = self.record.times();
        match (units, mass) {
            (TimeUnits::Geometric, _) => Ok(t.clone()),
            (TimeUnits::SolarMass, _) => Ok(t * time_scale(1.0)),
            (TimeUnits::Seconds, Some(m)) if m.is_finite() && m > 0.0 => Ok(t * time_scale(m)),
            (TimeUnits::Seconds, m) => Err(SurrogateError::InvalidOption {
                name: "mass",
                value: m.unwrap_or(f64::NAN),
                reason: "seconds require a finite positive total mass",
            }),
        }
    }

    /// The `i`-th basis vector of the requested flavor.
    ///
    /// # Errors
    /// See [`SingleModeRecord::basis_vector`].
    pub fn basis(&self, i: usize, flavor: BasisFlavor) -> SurrogateResult<Array1<Complex64>> {
        self.record.basis_vector(i, flavor)
    }

    /// Output time axis for `opts` without evaluating the mode.
    pub(crate) fn output_times(&self, opts: &EvalOptions) -> Array1<f64> {
        let t_scale = match (opts.mass, opts.distance) {
            (Some(mass), Some(_)) => time_scale(mass),
            _ => 1.0,
        };
        self.dimensionless_samples(opts).unwrap_or_else(|| self.record.times().clone()) * t_scale
    }

    fn dimensionless_samples(&self, opts: &EvalOptions) -> Option<Array1<f64>> {
        let samples = opts.samples.as_ref()?;
        match (opts.samples_units, opts.mass) {
            (SampleUnits::Mks, Some(mass)) => Some(samples / time_scale(mass)),
            _ => Some(samples.clone()),
        }
    }
}

/// `LowFrequency` warning when the waveform starts above `f_low`.
pub(crate) fn low_frequency_warning(
    hp: ArrayView1<f64>, hc: ArrayView1<f64>, t: ArrayView1<f64>, f_low: f64,
) -> Option<SurrogateWarning> {
    let f_start = instantaneous_frequency(hp, hc, t)?;
    (f_start > f_low).then_some(SurrogateWarning::LowFrequency { f_start, f_low })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surrogate::core::{
        affine::AffineMapKind,
        fits::FitKind,
        parameterization::Parameterization,
        record::{BasisMatrices, FitData},
        units::MSUN_IN_SEC,
    };
    use ndarray::{Array2, array};
    use std::f64::consts::PI;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Range checking in strict and lenient modes.
    // - Phase referencing, unit scaling, and the low-frequency warning.
    // - Resampling on alternate grids and time-axis units.
    //
    // Scenario-level properties (constant fits reproduce 2·B[:,0], native
    // grid equals B·EIM bitwise) are exercised in the integration tests.
    // -------------------------------------------------------------------------

    /// One-vector chirp-free mode: h(t) = (1 + 0.2 t) e^{0.3 i t}, amp fit
    /// linear in x0 (amp = 1.5 + 0.5·x0), phase = 0.
    fn surrogate() -> SingleModeSurrogate {
        let t = Array1::<f64>::linspace(-20.0, 20.0, 81);
        let b = Array2::from_shape_fn((81, 1), |(i, _)| {
            Complex64::from_polar(1.0 + 0.02 * (t[i] + 20.0), 0.3 * t[i])
        });
        let data = RecordData {
            time_samples: t,
            fit_interval: [1.0, 3.0],
            affine_map: AffineMapKind::MinusOneToOne,
            parameterization: Parameterization::Identity,
            fit_amp: FitData::new(FitKind::Polyval1d, array![[0.5, 1.5]]),
            fit_phase: FitData::new(FitKind::Polyval1d, array![[0.0]]),
            fit_norm: None,
            norms_enabled: false,
            basis: BasisMatrices::Waveform(b),
            eim_vandermonde: None,
            rb_coefficients: None,
        };
        SingleModeSurrogate::from_data(data, 3).expect("valid record")
    }

    #[test]
    // Purpose
    // -------
    // Strict checking rejects and lenient checking warns.
    //
    // Given
    // -----
    // - fit_interval = [1, 3] and x = 3.5.
    //
    // Expect
    // ------
    // - Strict: `ParameterOutOfRange`. Lenient: output plus one warning.
    fn range_check_modes() {
        let sur = surrogate();
        let strict = EvalOptions::default();
        let lenient = EvalOptions { range_check: RangeCheck::Lenient, ..EvalOptions::default() };

        assert!(matches!(
            sur.evaluate(3.5, &strict),
            Err(SurrogateError::ParameterOutOfRange { value, min, max }) if value == 3.5 && min == 1.0 && max == 3.0
        ));
        let out = sur.evaluate(3.5, &lenient).expect("lenient evaluation");
        assert_eq!(out.hp.len(), 81);
        assert_eq!(
            out.warnings,
            vec![SurrogateWarning::ParameterOutOfRange { value: 3.5, min: 1.0, max: 3.0 }]
        );
    }

    #[test]
    // Purpose
    // -------
    // Interval endpoints are inside the inclusive range.
    //
    // Given
    // -----
    // - x = 1 and x = 3 in strict mode.
    //
    // Expect
    // ------
    // - Both succeed without warnings.
    fn endpoints_are_in_range() {
        let sur = surrogate();
        for x in [1.0, 3.0] {
            let out = sur.evaluate(x, &EvalOptions::default()).expect("in range");
            assert!(out.warnings.is_empty());
        }
    }

    #[test]
    // Purpose
    // -------
    // Phase referencing sets the phase at the amplitude peak.
    //
    // Given
    // -----
    // - phase_ref = 0.25; the amplitude peaks at the last sample.
    //
    // Expect
    // ------
    // - arg(h) at the last sample equals 0.25 (mod 2π); amplitudes unchanged.
    fn phase_ref_rotates_to_peak() {
        let sur = surrogate();
        let plain = sur.evaluate(2.0, &EvalOptions::default()).expect("plain");
        let opts = EvalOptions { phase_ref: Some(0.25), ..EvalOptions::default() };

        let out = sur.evaluate(2.0, &opts).expect("rotated");

        let last = out.hp.len() - 1;
        let z = Complex64::new(out.hp[last], out.hc[last]);
        let diff = (z.arg() - 0.25).rem_euclid(2.0 * PI);
        assert!(diff < 1e-12 || (2.0 * PI - diff) < 1e-12, "arg = {}", z.arg());
        let a0 = Complex64::new(plain.hp[10], plain.hc[10]).norm();
        let a1 = Complex64::new(out.hp[10], out.hc[10]).norm();
        assert!((a0 - a1).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Physical scaling multiplies amplitude by amp0 and time by M·t_sun.
    //
    // Given
    // -----
    // - mass = 50, distance = 400.
    //
    // Expect
    // ------
    // - t = 50·MSUN_IN_SEC·t_native; h scaled by `amplitude_scale(50, 400)`.
    fn physical_scaling() {
        let sur = surrogate();
        let plain = sur.evaluate(2.0, &EvalOptions::default()).expect("plain");
        let opts = EvalOptions { mass: Some(50.0), distance: Some(400.0), ..EvalOptions::default() };

        let out = sur.evaluate(2.0, &opts).expect("physical");

        let amp0 = amplitude_scale(50.0, 400.0);
        assert!((out.t[0] - plain.t[0] * 50.0 * MSUN_IN_SEC).abs() < 1e-15);
        assert!((out.hp[5] - plain.hp[5] * amp0).abs() < 1e-30);
        assert!((out.hc[5] - plain.hc[5] * amp0).abs() < 1e-30);
    }

    #[test]
    // Purpose
    // -------
    // The starting-frequency check warns only when the bound is exceeded.
    //
    // Given
    // -----
    // - Angular frequency 0.3 ⇒ f_start ≈ 0.3 / 2π ≈ 0.0477 (geometric).
    //
    // Expect
    // ------
    // - f_low = 0.01: one `LowFrequency` warning. f_low = 0.1: none.
    fn low_frequency_warning_is_reported() {
        let sur = surrogate();
        let tight = EvalOptions { f_low: Some(0.01), ..EvalOptions::default() };
        let loose = EvalOptions { f_low: Some(0.1), ..EvalOptions::default() };

        let warned = sur.evaluate(2.0, &tight).expect("evaluates");
        let quiet = sur.evaluate(2.0, &loose).expect("evaluates");

        assert!(matches!(
            warned.warnings.as_slice(),
            [SurrogateWarning::LowFrequency { f_start, .. }] if (f_start - 0.3 / (2.0 * PI)).abs() < 1e-9
        ));
        assert!(quiet.warnings.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Alternate samples in mks units are converted before resampling and
    // returned on the requested axis.
    //
    // Given
    // -----
    // - mass = 10, distance = 100, samples at geometric times {-5, 0, 5}
    //   expressed in seconds.
    //
    // Expect
    // ------
    // - Returned t equals the requested samples; values match the native
    //   evaluation at those nodes to 1e-9 relative.
    fn mks_samples_round_trip() {
        let sur = surrogate();
        let ts = time_scale(10.0);
        let samples = array![-5.0, 0.0, 5.0] * ts;
        let opts = EvalOptions {
            mass: Some(10.0),
            distance: Some(100.0),
            samples: Some(samples.clone()),
            samples_units: SampleUnits::Mks,
            ..EvalOptions::default()
        };
        let native = EvalOptions { mass: Some(10.0), distance: Some(100.0), ..EvalOptions::default() };

        let out = sur.evaluate(2.0, &opts).expect("resampled");
        let full = sur.evaluate(2.0, &native).expect("native");

        for (k, idx) in [30usize, 40, 50].into_iter().enumerate() {
            assert!((out.t[k] - samples[k]).abs() <= 1e-12 * ts);
            assert!((out.hp[k] - full.hp[idx]).abs() <= 1e-9 * full.hp[idx].abs().max(1e-30));
        }
    }

    #[test]
    // Purpose
    // -------
    // Time-axis units follow the solar-mass conversion.
    //
    // Given
    // -----
    // - Geometric, solar-mass, and seconds (M = 20) units.
    //
    // Expect
    // ------
    // - Scales 1, MSUN_IN_SEC, 20·MSUN_IN_SEC; seconds without mass fails.
    fn times_in_units() {
        let sur = surrogate();
        let geo = sur.times(TimeUnits::Geometric, None).expect("geometric");
        let sm = sur.times(TimeUnits::SolarMass, None).expect("solar mass");
        let sec = sur.times(TimeUnits::Seconds, Some(20.0)).expect("seconds");

        assert_eq!(geo[0], -20.0);
        assert!((sm[0] + 20.0 * MSUN_IN_SEC).abs() < 1e-20);
        assert!((sec[0] + 400.0 * MSUN_IN_SEC).abs() < 1e-18);
        assert!(matches!(sur.times(TimeUnits::Seconds, None), Err(SurrogateError::InvalidOption { .. })));
    }
}
