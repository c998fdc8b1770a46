//! Explicit Runge-Kutta formulas.

use super::OdeProblem;
use crate::scalar::Scalar;
use nalgebra::DVector;

/// An explicit one-step formula.
pub trait Formula<T: Scalar> {
    /// Number of stages.
    const STAGES: usize;

    /// Order of the formula.
    const ORDER: usize;

    /// Compute an estimate of the variable after one step.
    fn step<P: OdeProblem<T>>(
        &mut self,
        problem: &mut P,
        time: T,
        step_size: T,
        current: &DVector<T>,
    ) -> DVector<T>;
}

/// A formula with an embedded lower-order estimate for error control.
pub trait EmbeddedFormula<T: Scalar>: Formula<T> {
    /// Order of the embedded lower-order estimate.
    const LESSER_ORDER: usize;

    /// Compute the next-step estimate together with an error estimate.
    fn step_embedded<P: OdeProblem<T>>(
        &mut self,
        problem: &mut P,
        time: T,
        step_size: T,
        current: &DVector<T>,
    ) -> (DVector<T>, DVector<T>);
}

/// Classical fourth-order Runge-Kutta formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4Formula;

impl<T: Scalar> Formula<T> for Rk4Formula {
    const STAGES: usize = 4;
    const ORDER: usize = 4;

    fn step<P: OdeProblem<T>>(
        &mut self,
        problem: &mut P,
        time: T,
        step_size: T,
        current: &DVector<T>,
    ) -> DVector<T> {
        let half = T::cast(0.5);

        let k1 = problem.evaluate(time, current);
        let k2 = problem.evaluate(time + half * step_size, &(current + &k1 * (half * step_size)));
        let k3 = problem.evaluate(time + half * step_size, &(current + &k2 * (half * step_size)));
        let k4 = problem.evaluate(time + step_size, &(current + &k3 * step_size));

        current
            + (k1 + k2 * T::cast(2.0) + k3 * T::cast(2.0) + k4) * (step_size / T::cast(6.0))
    }
}

/// Runge-Kutta-Fehlberg 4(5) formula.
///
/// Six stages; the fifth-order weights give the propagated estimate and the
/// difference to the embedded fourth-order weights gives the error estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rkf45Formula;

impl Rkf45Formula {
    const A21: f64 = 1.0 / 4.0;
    const A31: f64 = 3.0 / 32.0;
    const A32: f64 = 9.0 / 32.0;
    const A41: f64 = 1932.0 / 2197.0;
    const A42: f64 = -7200.0 / 2197.0;
    const A43: f64 = 7296.0 / 2197.0;
    const A51: f64 = 439.0 / 216.0;
    const A52: f64 = -8.0;
    const A53: f64 = 3680.0 / 513.0;
    const A54: f64 = -845.0 / 4104.0;
    const A61: f64 = -8.0 / 27.0;
    const A62: f64 = 2.0;
    const A63: f64 = -3544.0 / 2565.0;
    const A64: f64 = 1859.0 / 4104.0;
    const A65: f64 = -11.0 / 40.0;

    const B2: f64 = 1.0 / 4.0;
    const B3: f64 = 3.0 / 8.0;
    const B4: f64 = 12.0 / 13.0;
    const B5: f64 = 1.0;
    const B6: f64 = 1.0 / 2.0;

    const C1: f64 = 16.0 / 135.0;
    const C3: f64 = 6656.0 / 12825.0;
    const C4: f64 = 28561.0 / 56430.0;
    const C5: f64 = -9.0 / 50.0;
    const C6: f64 = 2.0 / 55.0;

    // Weights of the embedded fourth-order estimate.
    const CW1: f64 = 25.0 / 216.0;
    const CW3: f64 = 1408.0 / 2565.0;
    const CW4: f64 = 2197.0 / 4104.0;
    const CW5: f64 = -1.0 / 5.0;

    const CE1: f64 = Self::C1 - Self::CW1;
    const CE3: f64 = Self::C3 - Self::CW3;
    const CE4: f64 = Self::C4 - Self::CW4;
    const CE5: f64 = Self::C5 - Self::CW5;
    const CE6: f64 = Self::C6;
}

impl<T: Scalar> Formula<T> for Rkf45Formula {
    const STAGES: usize = 6;
    const ORDER: usize = 5;

    fn step<P: OdeProblem<T>>(
        &mut self,
        problem: &mut P,
        time: T,
        step_size: T,
        current: &DVector<T>,
    ) -> DVector<T> {
        self.step_embedded(problem, time, step_size, current).0
    }
}

impl<T: Scalar> EmbeddedFormula<T> for Rkf45Formula {
    const LESSER_ORDER: usize = 4;

    fn step_embedded<P: OdeProblem<T>>(
        &mut self,
        problem: &mut P,
        time: T,
        step_size: T,
        current: &DVector<T>,
    ) -> (DVector<T>, DVector<T>) {
        let coeff = T::cast;

        let k1 = problem.evaluate(time, current);
        let k2 = problem.evaluate(
            time + coeff(Self::B2) * step_size,
            &(current + &k1 * (coeff(Self::A21) * step_size)),
        );
        let k3 = problem.evaluate(
            time + coeff(Self::B3) * step_size,
            &(current + (&k1 * coeff(Self::A31) + &k2 * coeff(Self::A32)) * step_size),
        );
        let k4 = problem.evaluate(
            time + coeff(Self::B4) * step_size,
            &(current
                + (&k1 * coeff(Self::A41) + &k2 * coeff(Self::A42) + &k3 * coeff(Self::A43))
                    * step_size),
        );
        let k5 = problem.evaluate(
            time + coeff(Self::B5) * step_size,
            &(current
                + (&k1 * coeff(Self::A51)
                    + &k2 * coeff(Self::A52)
                    + &k3 * coeff(Self::A53)
                    + &k4 * coeff(Self::A54))
                    * step_size),
        );
        let k6 = problem.evaluate(
            time + coeff(Self::B6) * step_size,
            &(current
                + (&k1 * coeff(Self::A61)
                    + &k2 * coeff(Self::A62)
                    + &k3 * coeff(Self::A63)
                    + &k4 * coeff(Self::A64)
                    + &k5 * coeff(Self::A65))
                    * step_size),
        );

        let estimate = current
            + (&k1 * coeff(Self::C1)
                + &k3 * coeff(Self::C3)
                + &k4 * coeff(Self::C4)
                + &k5 * coeff(Self::C5)
                + &k6 * coeff(Self::C6))
                * step_size;
        let error = (&k1 * coeff(Self::CE1)
            + &k3 * coeff(Self::CE3)
            + &k4 * coeff(Self::CE4)
            + &k5 * coeff(Self::CE5)
            + &k6 * coeff(Self::CE6))
            * step_size;
        (estimate, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rk4_step_on_exponential_decay() {
        let mut problem = |_time: f64, variable: &DVector<f64>| -variable;
        let mut formula = Rk4Formula;

        let step_size = 0.1;
        let estimate = formula.step(
            &mut problem,
            0.0,
            step_size,
            &DVector::from_vec(vec![1.0]),
        );

        // Local error of a fourth-order formula is O(h^5).
        assert_relative_eq!(estimate[0], (-step_size).exp(), epsilon = 1e-7);
    }

    #[test]
    fn test_rkf45_step_on_exponential_decay() {
        let mut problem = |_time: f64, variable: &DVector<f64>| -variable;
        let mut formula = Rkf45Formula;

        let step_size = 0.1;
        let (estimate, error) = formula.step_embedded(
            &mut problem,
            0.0,
            step_size,
            &DVector::from_vec(vec![1.0]),
        );

        assert_relative_eq!(estimate[0], (-step_size).exp(), epsilon = 1e-9);
        assert!(error[0].abs() < 1e-7);
    }

    #[test]
    fn test_rkf45_step_uses_time() {
        // dy/dt = t, exact y(h) = y(0) + h^2 / 2.
        let mut problem =
            |time: f64, variable: &DVector<f64>| DVector::from_element(variable.nrows(), time);
        let mut formula = Rkf45Formula;

        let step_size = 0.5;
        let (estimate, _error) = formula.step_embedded(
            &mut problem,
            0.0,
            step_size,
            &DVector::from_vec(vec![1.0]),
        );

        assert_relative_eq!(estimate[0], 1.0 + 0.5 * step_size * step_size, epsilon = 1e-12);
    }
}
