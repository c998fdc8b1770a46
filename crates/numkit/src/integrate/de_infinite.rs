//! Double-exponential rule on an infinite range.

use crate::error::NumError;
use crate::scalar::Scalar;

/// Numerical integration on the infinite range `(−∞, ∞)` with the
/// double-exponential rule.
///
/// The change of variable is `x = sinh((π/2) sinh(t))`.
#[derive(Debug)]
pub struct DeInfiniteIntegrator<T: Scalar> {
    max_point: T,
    points: usize,
}

impl<T: Scalar> DeInfiniteIntegrator<T> {
    /// Default number of points on each half of the rule.
    pub const DEFAULT_POINTS: usize = 20;

    /// Create an integrator with default parameters.
    pub fn new() -> Self {
        Self {
            max_point: T::cast(4.0),
            points: Self::DEFAULT_POINTS,
        }
    }

    /// Set the truncation point of the changed variable.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `value` is not positive.
    pub fn max_point(mut self, value: T) -> Result<Self, NumError> {
        if value <= T::zero() {
            return Err(NumError::invalid_argument(
                "maximum point must be a positive value",
            ));
        }
        self.max_point = value;
        Ok(self)
    }

    /// Set the number of points on each half of the rule.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `value` is zero.
    pub fn points(mut self, value: usize) -> Result<Self, NumError> {
        if value == 0 {
            return Err(NumError::invalid_argument(
                "number of points must be a positive integer",
            ));
        }
        self.points = value;
        Ok(self)
    }

    /// Integrate a function over `(−∞, ∞)`.
    pub fn integrate<F>(&self, function: F) -> T
    where
        F: Fn(T) -> T,
    {
        let half_pi = T::cast(std::f64::consts::FRAC_PI_2);
        let interval = self.max_point / T::cast(self.points as f64);

        let mut sum = function(T::zero()) * half_pi;

        for i in 1..self.points {
            let changed_var = interval * T::cast(i as f64);
            let half_pi_sinh = half_pi * changed_var.sinh();
            let var = half_pi_sinh.sinh();
            let diff_coeff = half_pi * half_pi_sinh.cosh() * changed_var.cosh();
            sum = sum + function(var) * diff_coeff;
            sum = sum + function(-var) * diff_coeff;
        }

        sum * interval
    }
}

impl<T: Scalar> Default for DeInfiniteIntegrator<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_gaussian() {
        let integrator = DeInfiniteIntegrator::<f64>::new().points(40).unwrap();

        let value = integrator.integrate(|x| (-x * x).exp());
        assert_relative_eq!(value, std::f64::consts::PI.sqrt(), epsilon = 1e-8);
    }

    #[test]
    fn test_integrate_lorentzian() {
        let integrator = DeInfiniteIntegrator::<f64>::new().points(40).unwrap();

        let value = integrator.integrate(|x| 1.0 / (1.0 + x * x));
        assert_relative_eq!(value, std::f64::consts::PI, epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        assert!(matches!(
            DeInfiniteIntegrator::<f64>::new().points(0),
            Err(NumError::InvalidArgument { .. })
        ));
    }
}
