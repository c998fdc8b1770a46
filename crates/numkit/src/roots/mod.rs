//! Root-finding algorithms.

pub mod newton_raphson;

pub use newton_raphson::{BackwardDiffFunction, NewtonRaphson, VectorNewtonRaphson};

use crate::scalar::Scalar;
use nalgebra::{DMatrix, DVector};

/// A scalar equation f(x) = 0 together with its derivative.
///
/// Implementations evaluate the function and derivative once per point and
/// expose the results through the accessors.
pub trait DifferentiableFunction<T: Scalar> {
    /// Evaluate the function and its derivative at `variable`.
    fn evaluate_on(&mut self, variable: T);

    /// Function value at the last evaluated point.
    fn value(&self) -> T;

    /// Derivative at the last evaluated point.
    fn jacobian(&self) -> T;
}

/// A system of equations F(x) = 0 together with its Jacobian matrix.
pub trait DifferentiableSystem<T: Scalar> {
    /// Evaluate the function and its Jacobian at `variable`.
    fn evaluate_on(&mut self, variable: &DVector<T>);

    /// Function value at the last evaluated point.
    fn value(&self) -> &DVector<T>;

    /// Jacobian matrix at the last evaluated point.
    fn jacobian(&self) -> &DMatrix<T>;
}
