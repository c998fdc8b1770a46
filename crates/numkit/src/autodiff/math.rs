//! Elementary functions on variables.

use super::graph::{create_node, ChildNode};
use super::variable::Variable;
use crate::scalar::Scalar;
use std::rc::Rc;

/// Apply a single-argument function with the chain rule.
///
/// `value` is the function value at the argument and `sensitivity` the local
/// derivative there. Constants stay constants.
fn chain<T: Scalar>(argument: &Variable<T>, value: T, sensitivity: T) -> Variable<T> {
    match argument.node() {
        Some(node) => Variable::with_node(
            value,
            create_node([ChildNode::new(Rc::clone(node), sensitivity)]),
        ),
        None => Variable::constant(value),
    }
}

impl<T: Scalar> Variable<T> {
    /// Exponential function.
    pub fn exp(&self) -> Variable<T> {
        let value = self.value().exp();
        // d/dx exp(x) = exp(x), already computed.
        chain(self, value, value)
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Variable<T> {
        chain(self, self.value().ln(), T::one() / self.value())
    }

    /// Square root.
    pub fn sqrt(&self) -> Variable<T> {
        let value = self.value().sqrt();
        chain(self, value, T::cast(0.5) / value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autodiff::differentiate::differentiate;
    use approx::assert_relative_eq;

    #[test]
    fn test_exp_of_variable() {
        let var = Variable::leaf(1.234);

        let res = var.exp();

        assert_relative_eq!(res.value(), var.value().exp());
        assert!(res.node().is_some());

        let coeff = differentiate(&res, &var).unwrap();
        assert_relative_eq!(coeff, var.value().exp());
    }

    #[test]
    fn test_exp_of_constant() {
        let var = Variable::constant(1.234);

        let res = var.exp();

        assert_relative_eq!(res.value(), var.value().exp());
        assert!(res.node().is_none());
    }

    #[test]
    fn test_ln_of_variable() {
        let var = Variable::leaf(1.234);

        let res = var.ln();

        assert_relative_eq!(res.value(), var.value().ln());
        assert!(res.node().is_some());

        let coeff = differentiate(&res, &var).unwrap();
        assert_relative_eq!(coeff, 1.0 / var.value());
    }

    #[test]
    fn test_ln_of_constant() {
        let var = Variable::constant(1.234);

        let res = var.ln();

        assert_relative_eq!(res.value(), var.value().ln());
        assert!(res.node().is_none());
    }

    #[test]
    fn test_sqrt_of_variable() {
        let var = Variable::leaf(1.234);

        let res = var.sqrt();

        assert_relative_eq!(res.value(), var.value().sqrt());
        assert!(res.node().is_some());

        let coeff = differentiate(&res, &var).unwrap();
        assert_relative_eq!(coeff, 0.5 / var.value().sqrt());
    }

    #[test]
    fn test_sqrt_of_constant() {
        let var = Variable::constant(1.234);

        let res = var.sqrt();

        assert_relative_eq!(res.value(), var.value().sqrt());
        assert!(res.node().is_none());
    }

    #[test]
    fn test_ln_of_zero_follows_float_semantics() {
        let var = Variable::leaf(0.0);

        let res = var.ln();

        assert!(res.value().is_infinite());
        assert!(res.node().is_some());
    }
}
