//! Adapter that exposes a user `Objective` as an `argmin` problem.
//!
//! The objective is minimized as-is; the adapter only enforces that every
//! returned cost is finite so the simplex ordering stays well-defined.
use crate::optimization::{
    errors::OptError,
    simplex_optimizer::{
        traits::Objective,
        types::{Cost, Theta},
    },
};
use argmin::core::{CostFunction, Error};

/// Bridges a user `Objective` to `argmin`'s `CostFunction`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value` via `?`.
    /// - Returns `NonFiniteCost` if the value is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `Objective` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    struct Shifted;

    impl Objective for Shifted {
        type Data = f64;

        fn value(&self, theta: &Theta, data: &f64) -> OptResult<Cost> {
            Ok(theta.iter().map(|x| (x - data).powi(2)).sum())
        }
    }

    struct Blows;

    impl Objective for Blows {
        type Data = ();

        fn value(&self, _theta: &Theta, _data: &()) -> OptResult<Cost> {
            Ok(f64::NAN)
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that the adapter forwards the objective value without any sign
    // change.
    //
    // Given
    // -----
    // - `c(θ) = Σ (θ_i − 1)²` and `θ = (2, 3)`.
    //
    // Expect
    // ------
    // - `cost(θ) == 1 + 4`.
    fn cost_forwards_objective_value() {
        // Arrange
        let data = 1.0;
        let adapter = ArgMinAdapter::new(&Shifted, &data);

        // Act
        let c = adapter.cost(&array![2.0, 3.0]).expect("finite cost");

        // Assert
        assert!((c - 5.0).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Ensure non-finite objective values are surfaced as `NonFiniteCost`.
    //
    // Given
    // -----
    // - An objective that always returns NaN.
    //
    // Expect
    // ------
    // - `cost` fails and converts back into `OptError::NonFiniteCost`.
    fn cost_rejects_non_finite_values() {
        // Arrange
        let adapter = ArgMinAdapter::new(&Blows, &());

        // Act
        let err = adapter.cost(&array![0.0]).expect_err("NaN cost must fail");

        // Assert
        assert!(matches!(OptError::from(err), OptError::NonFiniteCost { .. }));
    }
}
