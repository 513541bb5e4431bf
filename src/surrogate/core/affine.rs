//! Affine normalization of the fit parameter.
//!
//! Fits are trained on a normalized copy of the internal parameter. The map
//! kind is fixed per record; mapping is a pure function of the parameter and
//! the record's fit interval and performs no range checking.
use crate::surrogate::errors::SurrogateError;
use std::str::FromStr;

/// How a parameter is normalized before fit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AffineMapKind {
    /// `x0 = x`.
    #[default]
    None,
    /// `x0 = (x - xmin) / (xmax - xmin)`.
    ZeroToOne,
    /// `x0 = 2 (x - xmin) / (xmax - xmin) - 1`.
    MinusOneToOne,
}

impl AffineMapKind {
    /// Map `x` into the fit domain defined by `interval = [xmin, xmax]`.
    pub fn map(&self, x: f64, interval: [f64; 2]) -> f64 {
        let [xmin, xmax] = interval;
        match self {
            AffineMapKind::None => x,
            AffineMapKind::ZeroToOne => (x - xmin) / (xmax - xmin),
            AffineMapKind::MinusOneToOne => 2.0 * (x - xmin) / (xmax - xmin) - 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AffineMapKind::None => "none",
            AffineMapKind::ZeroToOne => "zero_to_one",
            AffineMapKind::MinusOneToOne => "minus_one_to_one",
        }
    }
}

impl FromStr for AffineMapKind {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(AffineMapKind::None),
            "zero_to_one" => Ok(AffineMapKind::ZeroToOne),
            "minus_one_to_one" => Ok(AffineMapKind::MinusOneToOne),
            _ => Err(SurrogateError::UnknownAffineMap { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: [f64; 2] = [0.1, 1.0];

    #[test]
    // Purpose
    // -------
    // Verify the endpoint laws of every map kind.
    //
    // Given
    // -----
    // - `fit_interval = [0.1, 1.0]`.
    //
    // Expect
    // ------
    // - minus_one_to_one: xmin → -1, xmax → 1.
    // - zero_to_one: xmin → 0, xmax → 1.
    // - none: identity.
    fn map_kinds_hit_their_endpoints() {
        let [xmin, xmax] = INTERVAL;
        assert!((AffineMapKind::MinusOneToOne.map(xmin, INTERVAL) + 1.0).abs() < 1e-15);
        assert!((AffineMapKind::MinusOneToOne.map(xmax, INTERVAL) - 1.0).abs() < 1e-15);
        assert!(AffineMapKind::ZeroToOne.map(xmin, INTERVAL).abs() < 1e-15);
        assert!((AffineMapKind::ZeroToOne.map(xmax, INTERVAL) - 1.0).abs() < 1e-15);
        assert_eq!(AffineMapKind::None.map(0.37, INTERVAL), 0.37);
    }

    #[test]
    // Purpose
    // -------
    // Confirm every map kind is strictly increasing over the interval.
    //
    // Given
    // -----
    // - 50 equally spaced points in `[0.1, 1.0]`.
    //
    // Expect
    // ------
    // - Mapped values strictly increase for each kind.
    fn map_kinds_are_monotonic() {
        for kind in [AffineMapKind::None, AffineMapKind::ZeroToOne, AffineMapKind::MinusOneToOne] {
            let mut prev = f64::NEG_INFINITY;
            for i in 0..50 {
                let x = INTERVAL[0] + (INTERVAL[1] - INTERVAL[0]) * i as f64 / 49.0;
                let y = kind.map(x, INTERVAL);
                assert!(y > prev, "{} not monotonic at x = {x}", kind.name());
                prev = y;
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure names round-trip and unknown names are configuration errors.
    //
    // Given
    // -----
    // - Each kind's `name()` and the string "log".
    //
    // Expect
    // ------
    // - Names parse back to their kind; "log" fails with `UnknownAffineMap`.
    fn parse_accepts_known_names_only() {
        for kind in [AffineMapKind::None, AffineMapKind::ZeroToOne, AffineMapKind::MinusOneToOne] {
            assert_eq!(kind.name().parse::<AffineMapKind>(), Ok(kind));
        }
        assert_eq!(
            "log".parse::<AffineMapKind>(),
            Err(SurrogateError::UnknownAffineMap { name: "log".to_string() })
        );
    }
}
