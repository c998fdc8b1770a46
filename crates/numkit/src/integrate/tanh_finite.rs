//! Tanh rule on a finite interval.

use crate::error::NumError;
use crate::scalar::Scalar;
use crate::util::KahanAdder;

/// Numerical integration on a finite interval with the tanh rule.
///
/// The change of variable `x = c + (w/2) tanh(t)` converges only
/// single-exponentially, so far more points are required than for the
/// double-exponential rule; it remains useful when the integrand must not be
/// sampled extremely close to the endpoints.
#[derive(Debug)]
pub struct TanhFiniteIntegrator<T: Scalar> {
    max_point: T,
    points: usize,
    interval: T,
    variable_rates: Vec<T>,
    weight_rates: Vec<T>,
}

impl<T: Scalar> TanhFiniteIntegrator<T> {
    /// Default number of points on each half of the rule.
    pub const DEFAULT_POINTS: usize = 100;

    /// Create an integrator with default parameters.
    pub fn new() -> Self {
        let mut integrator = Self {
            max_point: T::tanh_max_point(),
            points: Self::DEFAULT_POINTS,
            interval: T::zero(),
            variable_rates: Vec::new(),
            weight_rates: Vec::new(),
        };
        integrator.calculate_coefficients();
        integrator
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
        self.calculate_coefficients();
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
        self.calculate_coefficients();
        Ok(self)
    }

    /// Integrate a function over `[left, right]`.
    ///
    /// Stops sampling towards the endpoints as soon as a function value is
    /// not finite, with a warning.
    pub fn integrate<F>(&self, function: F, left: T, right: T) -> T
    where
        F: Fn(T) -> T,
    {
        let center = T::cast(0.5) * (left + right);
        let width = right - left;

        let center_weight_rate = T::cast(0.5);
        let center_weight = width * center_weight_rate;
        let mut sum = KahanAdder::new();
        sum.add(function(center) * center_weight);

        for i in 0..self.points {
            let variable_distance = width * self.variable_rates[i];
            let weight = width * self.weight_rates[i];

            let var_plus = right - variable_distance;
            let var_minus = left + variable_distance;
            let function_values = function(var_plus) + function(var_minus);
            if !function_values.is_finite() {
                log::warn!(
                    "a function value was not a finite value; stopped numerical integration"
                );
                break;
            }
            sum.add(function_values * weight);
        }

        sum.sum() * self.interval
    }

    fn calculate_coefficients(&mut self) {
        self.variable_rates.clear();
        self.variable_rates.reserve(self.points);
        self.weight_rates.clear();
        self.weight_rates.reserve(self.points);

        self.interval = self.max_point / T::cast(self.points as f64);
        for i in 1..=self.points {
            let changed_variable = self.interval * T::cast(i as f64);
            let exp_value = (T::cast(-2.0) * changed_variable).exp();
            let denominator = T::one() + exp_value;
            self.variable_rates.push(exp_value / denominator);
            self.weight_rates
                .push(T::cast(2.0) * exp_value / (denominator * denominator));
        }
    }
}

impl<T: Scalar> Default for TanhFiniteIntegrator<T> {
    fn default() -> Self {
        Self::new()
    }
}
