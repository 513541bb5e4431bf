//! Physical constants (MKS) and unit selectors for time axes.
//!
//! Surrogates are trained in geometric units (G = c = 1), where time is
//! measured in units of the binary's total mass. The constants here convert
//! those dimensionless quantities into seconds and strain at a distance.
use crate::surrogate::errors::SurrogateError;
use std::str::FromStr;

/// Newton's constant, m³ kg⁻¹ s⁻².
pub const G: f64 = 6.67384e-11;
/// Speed of light, m s⁻¹.
pub const C: f64 = 299_792_458.0;
/// Solar mass, kg.
pub const MSUN: f64 = 1.98892e30;
/// One megaparsec, m.
pub const MPC: f64 = 3.08568025e22;
/// One solar mass expressed as a light-travel time, s.
pub const MSUN_IN_SEC: f64 = MSUN * G / (C * C * C);

/// Units of user-supplied query samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleUnits {
    /// Geometric time-over-total-mass.
    #[default]
    Dimensionless,
    /// Seconds; requires a physical total mass to convert.
    Mks,
}

impl FromStr for SampleUnits {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dimensionless" => Ok(SampleUnits::Dimensionless),
            "mks" => Ok(SampleUnits::Mks),
            _ => Err(SurrogateError::UnknownSampleUnits { name: s.to_string() }),
        }
    }
}

/// Units for reporting a record's native time grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnits {
    /// Geometric units, G = c = 1.
    #[default]
    Geometric,
    /// Seconds per solar mass of total mass.
    SolarMass,
    /// Seconds for a given total mass.
    Seconds,
}

/// Amplitude scale `amp0 = (M·M_sun / (d·Mpc)) · G/c²` for total mass `mass`
/// (solar masses) at `distance` (megaparsecs).
pub fn amplitude_scale(mass: f64, distance: f64) -> f64 {
    (mass * MSUN) / (distance * MPC) * (G / (C * C))
}

/// Time scale in seconds per unit of geometric time for total mass `mass`.
pub fn time_scale(mass: f64) -> f64 {
    MSUN_IN_SEC * mass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Sanity-check the derived solar-mass time constant.
    //
    // Given
    // -----
    // - The MKS constants above.
    //
    // Expect
    // ------
    // - `MSUN_IN_SEC ≈ 4.9255e-6 s`.
    fn solar_mass_time_is_about_five_microseconds() {
        assert!((MSUN_IN_SEC - 4.9255e-6).abs() < 1e-9, "got {MSUN_IN_SEC}");
    }

    #[test]
    // Purpose
    // -------
    // Check case-insensitive parsing and rejection of unknown units.
    //
    // Given
    // -----
    // - "MKS", "Dimensionless", and "seconds".
    //
    // Expect
    // ------
    // - The first two parse; the third yields `UnknownSampleUnits`.
    fn sample_units_parse_case_insensitively() {
        assert_eq!("MKS".parse::<SampleUnits>(), Ok(SampleUnits::Mks));
        assert_eq!("Dimensionless".parse::<SampleUnits>(), Ok(SampleUnits::Dimensionless));
        assert!(matches!(
            "seconds".parse::<SampleUnits>(),
            Err(SurrogateError::UnknownSampleUnits { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify the amplitude scale grows with mass and falls with distance.
    //
    // Given
    // -----
    // - Baseline (M = 10, d = 100) and doubled mass / doubled distance.
    //
    // Expect
    // ------
    // - Exact factor-of-two relations.
    fn amplitude_scale_is_linear_in_mass_over_distance() {
        let base = amplitude_scale(10.0, 100.0);
        assert!((amplitude_scale(20.0, 100.0) / base - 2.0).abs() < 1e-12);
        assert!((amplitude_scale(10.0, 200.0) / base - 0.5).abs() < 1e-12);
    }
}
