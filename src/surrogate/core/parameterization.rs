//! Named maps from the external physical parameter to the internal fit
//! parameter.
//!
//! Two records are interchangeable only when their parameterizations are
//! equal; the enum's `PartialEq` is that identity test.
use crate::surrogate::errors::{SurrogateError, SurrogateResult};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parameterization {
    /// Internal parameter equals the external one.
    #[default]
    Identity,
    /// Mass ratio `q` → symmetric mass ratio `ν = q / (1 + q)²`.
    SymmetricMassRatio,
    /// Mass ratio `q` → `ln q`.
    LogMassRatio,
}

impl Parameterization {
    /// Map the external parameter `x` to the internal fit parameter.
    ///
    /// # Errors
    /// - `InvalidParameter` when `x` is non-finite, or non-positive for the
    ///   mass-ratio maps.
    pub fn apply(&self, x: f64) -> SurrogateResult<f64> {
        if !x.is_finite() {
            return Err(SurrogateError::InvalidParameter {
                name: "x",
                value: x,
                reason: "parameter must be finite",
            });
        }
        match self {
            Parameterization::Identity => Ok(x),
            Parameterization::SymmetricMassRatio | Parameterization::LogMassRatio if x <= 0.0 => {
                Err(SurrogateError::InvalidParameter {
                    name: "q",
                    value: x,
                    reason: "mass ratio must be positive",
                })
            }
            Parameterization::SymmetricMassRatio => Ok(x / ((1.0 + x) * (1.0 + x))),
            Parameterization::LogMassRatio => Ok(x.ln()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Parameterization::Identity => "identity",
            Parameterization::SymmetricMassRatio => "q_to_nu",
            Parameterization::LogMassRatio => "q_to_log_q",
        }
    }
}

impl FromStr for Parameterization {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identity" => Ok(Parameterization::Identity),
            "q_to_nu" => Ok(Parameterization::SymmetricMassRatio),
            "q_to_log_q" => Ok(Parameterization::LogMassRatio),
            _ => Err(SurrogateError::UnknownParameterization { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check the numerical maps on known values.
    //
    // Given
    // -----
    // - q = 1 and q = e.
    //
    // Expect
    // ------
    // - ν(1) = 1/4, ln(e) = 1, identity passes through.
    fn maps_known_values() {
        assert!((Parameterization::SymmetricMassRatio.apply(1.0).unwrap() - 0.25).abs() < 1e-15);
        assert!((Parameterization::LogMassRatio.apply(std::f64::consts::E).unwrap() - 1.0).abs() < 1e-15);
        assert_eq!(Parameterization::Identity.apply(-3.0), Ok(-3.0));
    }

    #[test]
    // Purpose
    // -------
    // Ensure mass-ratio maps reject non-physical inputs.
    //
    // Given
    // -----
    // - q = 0 and q = NaN.
    //
    // Expect
    // ------
    // - `InvalidParameter` in both cases.
    fn mass_ratio_maps_reject_non_positive() {
        assert!(matches!(
            Parameterization::LogMassRatio.apply(0.0),
            Err(SurrogateError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Parameterization::SymmetricMassRatio.apply(f64::NAN),
            Err(SurrogateError::InvalidParameter { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Names must round-trip through `FromStr`.
    //
    // Given
    // -----
    // - Every variant.
    //
    // Expect
    // ------
    // - `name().parse()` returns the same variant.
    fn names_round_trip() {
        for p in [
            Parameterization::Identity,
            Parameterization::SymmetricMassRatio,
            Parameterization::LogMassRatio,
        ] {
            assert_eq!(p.name().parse::<Parameterization>(), Ok(p));
        }
    }
}
