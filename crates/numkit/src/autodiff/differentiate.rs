//! Entry points of reverse-mode differentiation.

use super::graph::NodeDifferentiator;
use super::variable::Variable;
use crate::error::NumError;
use crate::scalar::Scalar;
use nalgebra::storage::Storage;
use nalgebra::{DMatrix, Dim, Matrix};

/// Differentiate a scalar output with respect to a scalar target.
///
/// Returns the exact partial derivative of `output` with respect to
/// `target`, evaluated at the point where the expression was built. A target
/// the output does not depend on yields zero.
///
/// # Errors
///
/// `NumError::NoGraphNode` if `output` carries no graph node (it was built
/// purely from constants).
pub fn differentiate<T: Scalar>(
    output: &Variable<T>,
    target: &Variable<T>,
) -> Result<T, NumError> {
    let top_node = output.node().ok_or(NumError::NoGraphNode)?;
    let mut differentiator = NodeDifferentiator::new();
    differentiator.compute(top_node);
    Ok(coeff_of(&differentiator, target))
}

/// Differentiate a scalar output with respect to every element of a matrix
/// of variables.
///
/// A single reverse pass serves all element queries; the result matrix is
/// built element by element from the shared differentiator.
///
/// # Errors
///
/// `NumError::NoGraphNode` if `output` carries no graph node.
pub fn differentiate_matrix<T, R, C, S>(
    output: &Variable<T>,
    targets: &Matrix<Variable<T>, R, C, S>,
) -> Result<DMatrix<T>, NumError>
where
    T: Scalar,
    R: Dim,
    C: Dim,
    S: Storage<Variable<T>, R, C>,
{
    let top_node = output.node().ok_or(NumError::NoGraphNode)?;
    let mut differentiator = NodeDifferentiator::new();
    differentiator.compute(top_node);
    Ok(DMatrix::from_fn(targets.nrows(), targets.ncols(), |i, j| {
        coeff_of(&differentiator, &targets[(i, j)])
    }))
}

/// Differentiate a vector output with respect to a vector target, producing
/// the Jacobian matrix with entry (i, j) = d outputs\[i\] / d targets\[j\].
///
/// Reverse mode runs one propagation per output element, so the cost scales
/// with the number of outputs, not inputs.
///
/// # Errors
///
/// - `NumError::NotColumnVector` if `outputs` or `targets` is not a column
///   vector.
/// - `NumError::NoGraphNode` if any output element carries no graph node.
pub fn differentiate_vector<T, R1, C1, S1, R2, C2, S2>(
    outputs: &Matrix<Variable<T>, R1, C1, S1>,
    targets: &Matrix<Variable<T>, R2, C2, S2>,
) -> Result<DMatrix<T>, NumError>
where
    T: Scalar,
    R1: Dim,
    C1: Dim,
    S1: Storage<Variable<T>, R1, C1>,
    R2: Dim,
    C2: Dim,
    S2: Storage<Variable<T>, R2, C2>,
{
    if outputs.ncols() != 1 {
        return Err(NumError::NotColumnVector {
            rows: outputs.nrows(),
            cols: outputs.ncols(),
        });
    }
    if targets.ncols() != 1 {
        return Err(NumError::NotColumnVector {
            rows: targets.nrows(),
            cols: targets.ncols(),
        });
    }

    let mut differentiators = Vec::with_capacity(outputs.nrows());
    for i in 0..outputs.nrows() {
        let top_node = outputs[(i, 0)].node().ok_or(NumError::NoGraphNode)?;
        let mut differentiator = NodeDifferentiator::new();
        differentiator.compute(top_node);
        differentiators.push(differentiator);
    }

    Ok(DMatrix::from_fn(outputs.nrows(), targets.nrows(), |i, j| {
        coeff_of(&differentiators[i], &targets[(j, 0)])
    }))
}

/// Coefficient of a target variable, zero when it carries no node.
fn coeff_of<T: Scalar>(differentiator: &NodeDifferentiator<T>, target: &Variable<T>) -> T {
    target
        .node()
        .map_or_else(T::zero, |node| differentiator.coeff(node))
}
