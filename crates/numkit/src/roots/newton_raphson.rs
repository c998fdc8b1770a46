//! Newton-Raphson method.

use super::{DifferentiableFunction, DifferentiableSystem};
use crate::autodiff::{create_diff_variable, differentiate, Variable};
use crate::error::NumError;
use crate::scalar::Scalar;
use nalgebra::DVector;

const DEFAULT_MAX_ITERATIONS: usize = 1000;
const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Newton-Raphson method for a scalar equation f(x) = 0.
///
/// Iterates `x ← x − f(x) / f'(x)` until the maximum number of iterations is
/// exceeded, the last change of the variable drops below its tolerance, or
/// the absolute function value drops below its tolerance.
#[derive(Debug)]
pub struct NewtonRaphson<T: Scalar, F: DifferentiableFunction<T>> {
    function: F,
    variable: T,
    iterations: usize,
    evaluations: usize,
    last_change: T,
    value_norm: T,
    max_iterations: usize,
    tol_last_change: T,
    tol_value_norm: T,
}

impl<T: Scalar, F: DifferentiableFunction<T>> NewtonRaphson<T, F> {
    /// Create a solver for the given function.
    pub fn new(function: F) -> Self {
        Self {
            function,
            variable: T::zero(),
            iterations: 0,
            evaluations: 0,
            last_change: T::infinity(),
            value_norm: T::infinity(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tol_last_change: T::cast(DEFAULT_TOLERANCE),
            tol_value_norm: T::cast(DEFAULT_TOLERANCE),
        }
    }

    /// Set the maximum number of iterations.
    pub fn max_iterations(mut self, value: usize) -> Result<Self, NumError> {
        if value == 0 {
            return Err(NumError::invalid_argument(
                "maximum number of iterations must be a positive integer",
            ));
        }
        self.max_iterations = value;
        Ok(self)
    }

    /// Set the tolerance of the last change of the variable.
    pub fn tol_last_change(mut self, value: T) -> Result<Self, NumError> {
        if value < T::zero() {
            return Err(NumError::invalid_argument(
                "tolerance of the last change must be non-negative",
            ));
        }
        self.tol_last_change = value;
        Ok(self)
    }

    /// Set the tolerance of the absolute function value.
    pub fn tol_value_norm(mut self, value: T) -> Result<Self, NumError> {
        if value < T::zero() {
            return Err(NumError::invalid_argument(
                "tolerance of the function value must be non-negative",
            ));
        }
        self.tol_value_norm = value;
        Ok(self)
    }

    /// Initialize with the given initial variable.
    pub fn init(&mut self, variable: T) {
        self.variable = variable;
        self.last_change = T::infinity();
        self.iterations = 0;
        self.evaluations = 0;

        self.function.evaluate_on(self.variable);
        self.evaluations += 1;
        self.value_norm = self.function.value().abs();
    }

    /// Perform one iteration.
    pub fn iterate(&mut self) {
        let change = -self.function.value() / self.function.jacobian();
        self.variable = self.variable + change;

        self.function.evaluate_on(self.variable);
        self.evaluations += 1;
        self.iterations += 1;
        self.last_change = change.abs();
        self.value_norm = self.function.value().abs();
    }

    /// Check whether iterations should stop.
    pub fn is_stop_criteria_satisfied(&self) -> bool {
        (self.iterations > self.max_iterations)
            || (self.last_change < self.tol_last_change)
            || (self.value_norm < self.tol_value_norm)
    }

    /// Iterate until a stop criterion is satisfied.
    pub fn solve(&mut self) {
        while !self.is_stop_criteria_satisfied() {
            self.iterate();
            log::trace!(
                "newton_raphson: iterations={} evaluations={} value={:?} change={:?}",
                self.iterations,
                self.evaluations,
                self.value_norm,
                self.last_change
            );
        }
    }

    /// Get the function.
    pub fn function(&self) -> &F {
        &self.function
    }

    /// Get the current variable.
    pub fn variable(&self) -> T {
        self.variable
    }

    /// Get the current function value.
    pub fn value(&self) -> T {
        self.function.value()
    }

    /// Get the number of iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Get the number of function evaluations.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Get the last change of the variable.
    pub fn last_change(&self) -> T {
        self.last_change
    }

    /// Get the absolute function value.
    pub fn value_norm(&self) -> T {
        self.value_norm
    }
}

/// Newton-Raphson method for a system of equations F(x) = 0.
///
/// Each iteration solves `J Δ = −F` with an LU decomposition of the Jacobian
/// and applies the change. Stop criteria match the scalar solver, with
/// Euclidean norms in place of absolute values.
#[derive(Debug)]
pub struct VectorNewtonRaphson<T: Scalar, F: DifferentiableSystem<T>> {
    function: F,
    variable: DVector<T>,
    iterations: usize,
    evaluations: usize,
    last_change: T,
    value_norm: T,
    max_iterations: usize,
    tol_last_change: T,
    tol_value_norm: T,
}

impl<T, F> VectorNewtonRaphson<T, F>
where
    T: Scalar + nalgebra::RealField,
    F: DifferentiableSystem<T>,
{
    /// Create a solver for the given system.
    pub fn new(function: F) -> Self {
        Self {
            function,
            variable: DVector::zeros(0),
            iterations: 0,
            evaluations: 0,
            last_change: T::infinity(),
            value_norm: T::infinity(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tol_last_change: T::cast(DEFAULT_TOLERANCE),
            tol_value_norm: T::cast(DEFAULT_TOLERANCE),
        }
    }

    /// Set the maximum number of iterations.
    pub fn max_iterations(mut self, value: usize) -> Result<Self, NumError> {
        if value == 0 {
            return Err(NumError::invalid_argument(
                "maximum number of iterations must be a positive integer",
            ));
        }
        self.max_iterations = value;
        Ok(self)
    }

    /// Set the tolerance of the norm of the last change.
    pub fn tol_last_change(mut self, value: T) -> Result<Self, NumError> {
        if value < T::zero() {
            return Err(NumError::invalid_argument(
                "tolerance of the last change must be non-negative",
            ));
        }
        self.tol_last_change = value;
        Ok(self)
    }

    /// Set the tolerance of the norm of the function value.
    pub fn tol_value_norm(mut self, value: T) -> Result<Self, NumError> {
        if value < T::zero() {
            return Err(NumError::invalid_argument(
                "tolerance of the function value must be non-negative",
            ));
        }
        self.tol_value_norm = value;
        Ok(self)
    }

    /// Initialize with the given initial variable.
    pub fn init(&mut self, variable: DVector<T>) {
        self.variable = variable;
        self.last_change = T::infinity();
        self.iterations = 0;
        self.evaluations = 0;

        self.function.evaluate_on(&self.variable);
        self.evaluations += 1;
        self.value_norm = self.function.value().norm();
    }

    /// Perform one iteration.
    ///
    /// # Errors
    ///
    /// `NumError::SingularJacobian` if the Jacobian cannot be solved.
    pub fn iterate(&mut self) -> Result<(), NumError> {
        let decomposition = self.function.jacobian().clone().lu();
        let change = decomposition
            .solve(&(-self.function.value()))
            .ok_or(NumError::SingularJacobian)?;
        self.variable += &change;

        self.function.evaluate_on(&self.variable);
        self.evaluations += 1;
        self.iterations += 1;
        self.last_change = change.norm();
        self.value_norm = self.function.value().norm();
        Ok(())
    }

    /// Check whether iterations should stop.
    pub fn is_stop_criteria_satisfied(&self) -> bool {
        (self.iterations > self.max_iterations)
            || (self.last_change < self.tol_last_change)
            || (self.value_norm < self.tol_value_norm)
    }

    /// Iterate until a stop criterion is satisfied.
    ///
    /// # Errors
    ///
    /// `NumError::SingularJacobian` if an iteration meets a singular
    /// Jacobian.
    pub fn solve(&mut self) -> Result<(), NumError> {
        while !self.is_stop_criteria_satisfied() {
            self.iterate()?;
            log::trace!(
                "newton_raphson: iterations={} evaluations={} value={:?} change={:?}",
                self.iterations,
                self.evaluations,
                self.value_norm,
                self.last_change
            );
        }
        Ok(())
    }

    /// Get the function.
    pub fn function(&self) -> &F {
        &self.function
    }

    /// Get the current variable.
    pub fn variable(&self) -> &DVector<T> {
        &self.variable
    }

    /// Get the number of iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Get the number of function evaluations.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Get the norm of the last change.
    pub fn last_change(&self) -> T {
        self.last_change
    }

    /// Get the norm of the function value.
    pub fn value_norm(&self) -> T {
        self.value_norm
    }
}

/// Adapter exposing a closure over backward-mode variables as a
/// [`DifferentiableFunction`].
///
/// The closure receives an independent variable and returns the expression
/// to solve for zero; the derivative is obtained from the reverse-mode
/// engine at every evaluation point.
#[derive(Debug)]
pub struct BackwardDiffFunction<T: Scalar, F: Fn(&Variable<T>) -> Variable<T>> {
    function: F,
    value: T,
    jacobian: T,
}

impl<T, F> BackwardDiffFunction<T, F>
where
    T: Scalar,
    F: Fn(&Variable<T>) -> Variable<T>,
{
    /// Wrap a closure building the equation from a variable.
    pub fn new(function: F) -> Self {
        Self {
            function,
            value: T::zero(),
            jacobian: T::zero(),
        }
    }
}

impl<T, F> DifferentiableFunction<T> for BackwardDiffFunction<T, F>
where
    T: Scalar,
    F: Fn(&Variable<T>) -> Variable<T>,
{
    fn evaluate_on(&mut self, variable: T) {
        let argument = create_diff_variable(variable);
        let result = (self.function)(&argument);
        self.value = result.value();
        // A constant result does not depend on the argument at all.
        self.jacobian = differentiate(&result, &argument).unwrap_or_else(|_| T::zero());
    }

    fn value(&self) -> T {
        self.value
    }

    fn jacobian(&self) -> T {
        self.jacobian
    }
}
