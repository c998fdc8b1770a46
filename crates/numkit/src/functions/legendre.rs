//! Legendre functions and their roots.

use crate::error::NumError;
use crate::roots::{DifferentiableFunction, NewtonRaphson};
use crate::scalar::Scalar;
use nalgebra::DVector;

/// Calculate the value of the `n`-th Legendre function at `x`.
///
/// Uses the three-term recurrence
/// `(i + 1) P_{i+1}(x) = (2i + 1) x P_i(x) − i P_{i−1}(x)`.
pub fn legendre<T: Scalar>(x: T, n: usize) -> T {
    if n == 0 {
        return T::one();
    }
    if n == 1 {
        return x;
    }
    let mut y = x;
    let mut y_m = T::one();
    for i in 1..n {
        let y_p = (T::cast((2 * i + 1) as f64) * x * y - T::cast(i as f64) * y_m)
            / T::cast((i + 1) as f64);
        y_m = y;
        y = y_p;
    }
    y
}

/// Calculate the value and the differential coefficient of the `n`-th
/// Legendre function at `x`.
///
/// At `x = ±1` the usual derivative formula degenerates, so the closed-form
/// endpoint derivatives `±n(n+1)/2` are returned directly.
pub fn legendre_with_diff<T: Scalar>(x: T, n: usize) -> (T, T) {
    if n == 0 {
        return (T::one(), T::zero());
    }
    if n == 1 {
        return (x, T::one());
    }

    let half = T::cast(0.5);
    let endpoint_diff = half * T::cast(n as f64) * T::cast((n + 1) as f64);
    if x == T::one() {
        return (T::one(), endpoint_diff);
    }
    if x == -T::one() {
        if n % 2 == 0 {
            return (T::one(), -endpoint_diff);
        }
        return (-T::one(), endpoint_diff);
    }

    let mut y = x;
    let mut y_m = T::one();
    for i in 1..n {
        let y_p = (T::cast((2 * i + 1) as f64) * x * y - T::cast(i as f64) * y_m)
            / T::cast((i + 1) as f64);
        y_m = y;
        y = y_p;
    }

    let diff = T::cast(n as f64) * (y_m - x * y) / (T::one() - x * x);
    (y, diff)
}

/// Legendre function viewed as an equation for the Newton-Raphson solver.
struct LegendreForNewton<T: Scalar> {
    order: usize,
    value: T,
    jacobian: T,
}

impl<T: Scalar> LegendreForNewton<T> {
    fn new(order: usize) -> Self {
        Self {
            order,
            value: T::zero(),
            jacobian: T::zero(),
        }
    }
}

impl<T: Scalar> DifferentiableFunction<T> for LegendreForNewton<T> {
    fn evaluate_on(&mut self, variable: T) {
        let (value, jacobian) = legendre_with_diff(variable, self.order);
        self.value = value;
        self.jacobian = jacobian;
    }

    fn value(&self) -> T {
        self.value
    }

    fn jacobian(&self) -> T {
        self.jacobian
    }
}

/// Roots of a Legendre function.
///
/// Roots are symmetric about zero, so only half of them are solved for with
/// Newton-Raphson and the rest mirrored; an odd order pins the middle root
/// at exactly zero.
#[derive(Debug)]
pub struct LegendreRoots<T: Scalar> {
    order: usize,
    roots: DVector<T>,
}

impl<T: Scalar> LegendreRoots<T> {
    /// Compute the roots of the Legendre function of the given order.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `order` is zero.
    pub fn new(order: usize) -> Result<Self, NumError> {
        let mut roots = Self {
            order: 0,
            roots: DVector::zeros(0),
        };
        roots.compute(order)?;
        Ok(roots)
    }

    /// Recompute for another order.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `order` is zero.
    pub fn compute(&mut self, order: usize) -> Result<(), NumError> {
        if order == 0 {
            return Err(NumError::invalid_argument(
                "order of the Legendre function must be a positive integer",
            ));
        }
        self.order = order;

        let mut roots = DVector::zeros(order);
        let roots_to_solve = order / 2;

        let tolerance = T::epsilon() * T::cast(1e+2);
        for i in 0..roots_to_solve {
            let initial = (T::cast(std::f64::consts::PI)
                * (T::cast(i as f64) + T::cast(0.75))
                / (T::cast(order as f64) + T::cast(0.5)))
            .cos();

            let mut solver = NewtonRaphson::new(LegendreForNewton::new(order))
                .tol_last_change(tolerance)?
                .tol_value_norm(tolerance)?;
            solver.init(initial);
            solver.solve();
            roots[i] = solver.variable();
        }

        let center = (order - 1) / 2;
        if order % 2 == 1 {
            roots[center] = T::zero();
        }
        for i in (center + 1)..order {
            roots[i] = -roots[order - 1 - i];
        }

        self.roots = roots;
        Ok(())
    }

    /// Get the order of the Legendre function.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Get the number of roots.
    pub fn size(&self) -> usize {
        self.roots.nrows()
    }

    /// Get the `i`-th root, in ascending position from the largest.
    pub fn root(&self, i: usize) -> T {
        self.roots[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_legendre_low_orders() {
        let x = 0.5;
        assert_relative_eq!(legendre(x, 0), 1.0);
        assert_relative_eq!(legendre(x, 1), x);
        assert_relative_eq!(legendre(x, 2), 0.5 * (3.0 * x * x - 1.0));
        assert_relative_eq!(legendre(x, 3), 0.5 * (5.0 * x * x * x - 3.0 * x));
    }

    #[test]
    fn test_legendre_with_diff() {
        let x = 0.5;
        let (value, diff) = legendre_with_diff(x, 2);
        assert_relative_eq!(value, 0.5 * (3.0 * x * x - 1.0));
        assert_relative_eq!(diff, 3.0 * x);
    }

    #[test]
    fn test_legendre_with_diff_at_endpoints() {
        let n = 5;
        let endpoint_diff = 0.5 * (n as f64) * ((n + 1) as f64);

        let (value, diff) = legendre_with_diff(1.0, n);
        assert_relative_eq!(value, 1.0);
        assert_relative_eq!(diff, endpoint_diff);

        let (value, diff) = legendre_with_diff(-1.0, n);
        assert_relative_eq!(value, -1.0);
        assert_relative_eq!(diff, endpoint_diff);

        let (value, diff) = legendre_with_diff(-1.0, 4);
        assert_relative_eq!(value, 1.0);
        assert_relative_eq!(diff, -0.5 * 4.0 * 5.0);
    }

    #[test]
    fn test_roots_of_quadratic_legendre() {
        let roots = LegendreRoots::<f64>::new(2).unwrap();

        assert_eq!(roots.order(), 2);
        assert_eq!(roots.size(), 2);
        // P_2 roots: ±1/sqrt(3).
        assert_relative_eq!(roots.root(0), 1.0 / 3.0f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(roots.root(1), -1.0 / 3.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_roots_of_odd_order_have_zero_center() {
        let roots = LegendreRoots::<f64>::new(5).unwrap();

        assert_eq!(roots.size(), 5);
        assert_eq!(roots.root(2), 0.0);
        // Symmetric pairs.
        assert_relative_eq!(roots.root(0), -roots.root(4), epsilon = 1e-12);
        assert_relative_eq!(roots.root(1), -roots.root(3), epsilon = 1e-12);
    }

    #[test]
    fn test_roots_are_roots() {
        let order = 10;
        let roots = LegendreRoots::<f64>::new(order).unwrap();
        for i in 0..order {
            assert_relative_eq!(legendre(roots.root(i), order), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_zero_order_is_rejected() {
        assert!(matches!(
            LegendreRoots::<f64>::new(0),
            Err(NumError::InvalidArgument { .. })
        ));
    }
}
