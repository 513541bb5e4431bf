//! Evaluation options shared by the single- and multi-mode evaluators.
//!
//! `EvalOptions` mirrors the optional keyword arguments of a surrogate call:
//! physical scaling, phase referencing, the lower-frequency check, and
//! alternate query samples. Fields are public; `validate` is run by every
//! evaluator before any reconstruction work.
use crate::surrogate::{
    core::units::SampleUnits,
    errors::{SurrogateError, SurrogateResult},
};
use ndarray::Array1;
use std::str::FromStr;

/// How an out-of-range parameter is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeCheck {
    /// Fail with `ParameterOutOfRange`.
    #[default]
    Strict,
    /// Evaluate anyway and report a `SurrogateWarning`.
    Lenient,
}

impl FromStr for RangeCheck {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(RangeCheck::Strict),
            "lenient" => Ok(RangeCheck::Lenient),
            _ => Err(SurrogateError::InvalidOptionCombination {
                reason: "range check must be 'strict' or 'lenient'",
            }),
        }
    }
}

/// Options for a single surrogate evaluation.
///
/// Defaults: geometric units, native grid, no phase referencing, no
/// frequency check, strict range checking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvalOptions {
    /// Total mass in solar masses.
    pub mass: Option<f64>,
    /// Luminosity distance in megaparsecs.
    pub distance: Option<f64>,
    /// Phase imposed at the peak-amplitude sample.
    pub phase_ref: Option<f64>,
    /// Lower frequency bound, in the units of the returned time axis.
    pub f_low: Option<f64>,
    /// Query times; `None` evaluates on the native grid.
    pub samples: Option<Array1<f64>>,
    pub samples_units: SampleUnits,
    pub range_check: RangeCheck,
}

impl EvalOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// See [`EvalOptions::validate`].
    pub fn new(
        mass: Option<f64>, distance: Option<f64>, phase_ref: Option<f64>, f_low: Option<f64>,
        samples: Option<Array1<f64>>, samples_units: SampleUnits, range_check: RangeCheck,
    ) -> SurrogateResult<Self> {
        let opts = EvalOptions { mass, distance, phase_ref, f_low, samples, samples_units, range_check };
        opts.validate()?;
        Ok(opts)
    }

    /// Check every option.
    ///
    /// # Errors
    /// - `InvalidOption` for non-finite or non-positive mass, distance, or
    ///   `f_low`, or a non-finite `phase_ref`.
    /// - `InvalidSamples` for empty, non-finite, or non-increasing samples.
    /// - `InvalidOptionCombination` when `samples_units = Mks` without both
    ///   mass and distance.
    pub fn validate(&self) -> SurrogateResult<()> {
        positive("mass", self.mass)?;
        positive("distance", self.distance)?;
        positive("f_low", self.f_low)?;
        if let Some(p) = self.phase_ref {
            if !p.is_finite() {
                return Err(SurrogateError::InvalidOption { name: "phase_ref", value: p, reason: "must be finite" });
            }
        }
        if let Some(samples) = &self.samples {
            validate_samples(samples)?;
            if self.samples_units == SampleUnits::Mks && !self.is_physical() {
                return Err(SurrogateError::InvalidOptionCombination {
                    reason: "mks samples require both mass and distance",
                });
            }
        }
        Ok(())
    }

    /// True when both mass and distance are set, so outputs are in MKS units.
    pub fn is_physical(&self) -> bool {
        self.mass.is_some() && self.distance.is_some()
    }
}

fn positive(name: &'static str, value: Option<f64>) -> SurrogateResult<()> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            Err(SurrogateError::InvalidOption { name, value: v, reason: "must be finite and > 0" })
        }
        _ => Ok(()),
    }
}

/// Query samples must be non-empty, finite, and strictly increasing.
pub fn validate_samples(samples: &Array1<f64>) -> SurrogateResult<()> {
    if samples.is_empty() {
        return Err(SurrogateError::InvalidSamples { index: 0, reason: "samples must be non-empty" });
    }
    for (i, &t) in samples.iter().enumerate() {
        if !t.is_finite() {
            return Err(SurrogateError::InvalidSamples { index: i, reason: "sample is not finite" });
        }
        if i > 0 && t <= samples[i - 1] {
            return Err(SurrogateError::InvalidSamples { index: i, reason: "samples must be strictly increasing" });
        }
    }
    Ok(())
}
