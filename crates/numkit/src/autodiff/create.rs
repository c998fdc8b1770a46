//! Creation of variables by which functions will be differentiated.

use super::variable::Variable;
use crate::scalar::Scalar;
use nalgebra::DVector;

/// Create a variable by which functions will be differentiated.
pub fn create_diff_variable<T: Scalar>(value: T) -> Variable<T> {
    Variable::leaf(value)
}

/// Create a vector of variables, one fresh independent leaf per element.
pub fn create_diff_variable_vector<T: Scalar>(values: &DVector<T>) -> DVector<Variable<T>> {
    DVector::from_fn(values.nrows(), |i, _| Variable::leaf(values[i]))
}
