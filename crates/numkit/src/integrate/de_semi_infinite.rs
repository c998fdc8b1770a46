//! Double-exponential rule on a semi-infinite range.

use crate::error::NumError;
use crate::scalar::Scalar;

/// Numerical integration on the semi-infinite range `(0, ∞)` with the
/// double-exponential rule.
///
/// The change of variable is `x = exp(π sinh(t))`; sample points below one
/// are evaluated as reciprocals of the points above one to avoid overflow in
/// the exponential.
#[derive(Debug)]
pub struct DeSemiInfiniteIntegrator<T: Scalar> {
    max_point: T,
    points: usize,
}

impl<T: Scalar> DeSemiInfiniteIntegrator<T> {
    /// Default number of points on each half of the rule.
    pub const DEFAULT_POINTS: usize = 20;

    /// Create an integrator with default parameters.
    pub fn new() -> Self {
        Self {
            max_point: T::de_max_point(),
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

    /// Integrate a function over `(0, ∞)`.
    pub fn integrate<F>(&self, function: F) -> T
    where
        F: Fn(T) -> T,
    {
        let pi = T::cast(std::f64::consts::PI);
        let interval = self.max_point / T::cast(self.points as f64);

        let diff_coeff_center = pi;
        let mut sum = function(T::one()) * diff_coeff_center;

        for i in 1..self.points {
            let changed_var = interval * T::cast(i as f64);
            let pi_sinh_value = pi * changed_var.sinh();

            let var_plus = pi_sinh_value.exp();
            sum = sum + function(var_plus) * Self::diff_coeff(changed_var);

            let var_minus = T::one() / var_plus;
            sum = sum + function(var_minus) * Self::diff_coeff(-changed_var);
        }

        sum * interval
    }

    /// Differential coefficient of the change of variable.
    fn diff_coeff(changed_var: T) -> T {
        let pi = T::cast(std::f64::consts::PI);
        pi * (pi * changed_var.sinh()).exp() * changed_var.cosh()
    }
}

impl<T: Scalar> Default for DeSemiInfiniteIntegrator<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_exponential_decay() {
        let integrator = DeSemiInfiniteIntegrator::<f64>::new();

        let value = integrator.integrate(|x| (-x).exp());
        assert_relative_eq!(value, 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_integrate_gaussian() {
        let integrator = DeSemiInfiniteIntegrator::<f64>::new().points(40).unwrap();

        let value = integrator.integrate(|x| (-x * x).exp());
        assert_relative_eq!(value, 0.5 * std::f64::consts::PI.sqrt(), epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        assert!(matches!(
            DeSemiInfiniteIntegrator::<f64>::new().points(0),
            Err(NumError::InvalidArgument { .. })
        ));
        assert!(matches!(
            DeSemiInfiniteIntegrator::<f64>::new().max_point(0.0),
            Err(NumError::InvalidArgument { .. })
        ));
    }
}
