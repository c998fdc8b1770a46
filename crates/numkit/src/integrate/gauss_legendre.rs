//! Gauss-Legendre quadrature.

use crate::error::NumError;
use crate::functions::{legendre, LegendreRoots};
use crate::scalar::Scalar;
use nalgebra::DVector;

/// Numerical integration on a finite interval with the Gauss-Legendre
/// formula.
///
/// An order-`n` rule integrates polynomials up to degree `2n − 1` exactly;
/// nodes are the roots of the `n`-th Legendre function and weights
/// `2 (1 − x²) / (n P_{n−1}(x))²`.
#[derive(Debug)]
pub struct GaussLegendreIntegrator<T: Scalar> {
    roots: LegendreRoots<T>,
    weights: DVector<T>,
}

impl<T: Scalar> GaussLegendreIntegrator<T> {
    /// Default order.
    pub const DEFAULT_ORDER: usize = 20;

    /// Create an integrator with the given order.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `order` is zero.
    pub fn new(order: usize) -> Result<Self, NumError> {
        let roots = LegendreRoots::new(order)?;
        let weights = Self::update_weights(&roots);
        Ok(Self { roots, weights })
    }

    /// Recompute internal variables for another order.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `order` is zero.
    pub fn prepare(&mut self, order: usize) -> Result<(), NumError> {
        self.roots.compute(order)?;
        self.weights = Self::update_weights(&self.roots);
        Ok(())
    }

    /// Integrate a function over `[left, right]`.
    pub fn integrate<F>(&self, function: F, left: T, right: T) -> T
    where
        F: Fn(T) -> T,
    {
        let half = T::cast(0.5);
        let mean = half * (left + right);
        let half_width = half * (right - left);
        let mut sum = T::zero();
        for i in 0..self.roots.size() {
            let x = mean + half_width * self.roots.root(i);
            sum = sum + self.weights[i] * function(x);
        }
        sum * half_width
    }

    fn update_weights(roots: &LegendreRoots<T>) -> DVector<T> {
        let order = roots.order();
        DVector::from_fn(order, |i, _| {
            let x = roots.root(i);
            let temp = T::cast(order as f64) * legendre(x, order - 1);
            T::cast(2.0) * (T::one() - x * x) / (temp * temp)
        })
    }
}

impl<T: Scalar> Default for GaussLegendreIntegrator<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ORDER).expect("the default order is positive")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_polynomial() {
        let integrator = GaussLegendreIntegrator::<f64>::new(5).unwrap();

        let value = integrator.integrate(|x| x * x, 0.0, 1.0);
        assert_relative_eq!(value, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_integrate_sine() {
        let integrator = GaussLegendreIntegrator::<f64>::default();

        let value = integrator.integrate(f64::sin, 0.0, std::f64::consts::PI);
        assert_relative_eq!(value, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_integrate_exponential_over_shifted_interval() {
        let integrator = GaussLegendreIntegrator::<f64>::default();

        let value = integrator.integrate(f64::exp, -1.0, 2.0);
        assert_relative_eq!(value, 2.0f64.exp() - (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_prepare_changes_order() {
        let mut integrator = GaussLegendreIntegrator::<f64>::new(2).unwrap();
        integrator.prepare(10).unwrap();

        let value = integrator.integrate(|x| x.powi(8), -1.0, 1.0);
        assert_relative_eq!(value, 2.0 / 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_order_is_rejected() {
        assert!(matches!(
            GaussLegendreIntegrator::<f64>::new(0),
            Err(NumError::InvalidArgument { .. })
        ));
    }
}
