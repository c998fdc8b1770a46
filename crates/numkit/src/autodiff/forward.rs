//! Forward-mode automatic differentiation.
//!
//! Forward mode carries differential coefficients alongside each value, so
//! no computation graph is needed: every operation updates the value and the
//! coefficients together. The coefficient type is either the scalar itself
//! (derivative with respect to a single variable) or a vector (gradient with
//! respect to several variables at once).

use crate::scalar::Scalar;
use nalgebra::{DMatrix, DVector};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Operations a differential-coefficient type must support.
///
/// Implemented by the scalar types themselves and by `DVector` of them.
pub trait Tangent<V>:
    Clone
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<V, Output = Self>
    + Div<V, Output = Self>
{
}

impl<V, D> Tangent<V> for D where
    D: Clone
        + Neg<Output = D>
        + Add<Output = D>
        + Sub<Output = D>
        + Mul<V, Output = D>
        + Div<V, Output = D>
{
}

/// A value paired with its differential coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Dual<V: Scalar, D = V> {
    value: V,
    diff: D,
}

impl<V: Scalar, D> Dual<V, D> {
    /// Create a dual number from a value and its differential coefficients.
    pub fn new(value: V, diff: D) -> Self {
        Self { value, diff }
    }

    /// Get the value.
    pub fn value(&self) -> V {
        self.value
    }

    /// Get the differential coefficients.
    pub fn diff(&self) -> &D {
        &self.diff
    }
}

/// Create a variable by which functions will be differentiated
/// (scalar differential coefficient, set to one).
pub fn create_dual_variable<V: Scalar>(value: V) -> Dual<V> {
    Dual::new(value, V::one())
}

/// Create the `index`-th of `size` variables by which functions will be
/// differentiated (vector differential coefficients, unit vector).
pub fn create_dual_variable_vec<V: Scalar>(value: V, size: usize, index: usize) -> Dual<V, DVector<V>> {
    let mut diff = DVector::zeros(size);
    diff[index] = V::one();
    Dual::new(value, diff)
}

/// Collect the Jacobian matrix of a vector of dual numbers with vector
/// differential coefficients: entry (i, j) = d vector\[i\] / d variable j.
pub fn make_jacobian<V: Scalar>(vector: &DVector<Dual<V, DVector<V>>>) -> DMatrix<V> {
    if vector.is_empty() {
        return DMatrix::zeros(0, 0);
    }
    let num_variables = vector[0].diff().nrows();
    DMatrix::from_fn(vector.nrows(), num_variables, |i, j| vector[i].diff()[j])
}

impl<V: Scalar, D: Tangent<V>> Neg for Dual<V, D> {
    type Output = Dual<V, D>;

    fn neg(self) -> Dual<V, D> {
        Dual {
            value: -self.value,
            diff: -self.diff,
        }
    }
}

impl<V: Scalar, D: Tangent<V>> Add for Dual<V, D> {
    type Output = Dual<V, D>;

    fn add(self, right: Self) -> Dual<V, D> {
        Dual {
            value: self.value + right.value,
            diff: self.diff + right.diff,
        }
    }
}

impl<V: Scalar, D: Tangent<V>> Sub for Dual<V, D> {
    type Output = Dual<V, D>;

    fn sub(self, right: Self) -> Dual<V, D> {
        Dual {
            value: self.value - right.value,
            diff: self.diff - right.diff,
        }
    }
}

impl<V: Scalar, D: Tangent<V>> Mul for Dual<V, D> {
    type Output = Dual<V, D>;

    fn mul(self, right: Self) -> Dual<V, D> {
        Dual {
            value: self.value * right.value,
            diff: self.diff * right.value + right.diff * self.value,
        }
    }
}

impl<V: Scalar, D: Tangent<V>> Div for Dual<V, D> {
    type Output = Dual<V, D>;

    fn div(self, right: Self) -> Dual<V, D> {
        let value = self.value / right.value;
        Dual {
            value,
            diff: (self.diff - right.diff * value) / right.value,
        }
    }
}

impl<V: Scalar, D: Tangent<V>> Add<V> for Dual<V, D> {
    type Output = Dual<V, D>;

    fn add(self, right: V) -> Dual<V, D> {
        Dual {
            value: self.value + right,
            diff: self.diff,
        }
    }
}

impl<V: Scalar, D: Tangent<V>> Sub<V> for Dual<V, D> {
    type Output = Dual<V, D>;

    fn sub(self, right: V) -> Dual<V, D> {
        Dual {
            value: self.value - right,
            diff: self.diff,
        }
    }
}

impl<V: Scalar, D: Tangent<V>> Mul<V> for Dual<V, D> {
    type Output = Dual<V, D>;

    fn mul(self, right: V) -> Dual<V, D> {
        Dual {
            value: self.value * right,
            diff: self.diff * right,
        }
    }
}

impl<V: Scalar, D: Tangent<V>> Div<V> for Dual<V, D> {
    type Output = Dual<V, D>;

    fn div(self, right: V) -> Dual<V, D> {
        Dual {
            value: self.value / right,
            diff: self.diff / right,
        }
    }
}

// Scalar-on-the-left operators, one impl per concrete scalar type.
macro_rules! impl_left_scalar_dual_ops {
    ($($scalar:ty),* $(,)?) => {$(
        impl<D: Tangent<$scalar>> Add<Dual<$scalar, D>> for $scalar {
            type Output = Dual<$scalar, D>;

            fn add(self, right: Dual<$scalar, D>) -> Dual<$scalar, D> {
                right + self
            }
        }

        impl<D: Tangent<$scalar>> Sub<Dual<$scalar, D>> for $scalar {
            type Output = Dual<$scalar, D>;

            fn sub(self, right: Dual<$scalar, D>) -> Dual<$scalar, D> {
                (-right) + self
            }
        }

        impl<D: Tangent<$scalar>> Mul<Dual<$scalar, D>> for $scalar {
            type Output = Dual<$scalar, D>;

            fn mul(self, right: Dual<$scalar, D>) -> Dual<$scalar, D> {
                right * self
            }
        }

        impl<D: Tangent<$scalar>> Div<Dual<$scalar, D>> for $scalar {
            type Output = Dual<$scalar, D>;

            fn div(self, right: Dual<$scalar, D>) -> Dual<$scalar, D> {
                let value = self / right.value;
                let diff = right.diff * (-value / right.value);
                Dual::new(value, diff)
            }
        }
    )*};
}

impl_left_scalar_dual_ops!(f32, f64);

macro_rules! impl_dual_assign_op {
    ($trait:ident, $method:ident, $op_method:ident) => {
        impl<V: Scalar, D: Tangent<V>> $trait for Dual<V, D> {
            fn $method(&mut self, right: Dual<V, D>) {
                *self = self.clone().$op_method(right);
            }
        }

        impl<V: Scalar, D: Tangent<V>> $trait<V> for Dual<V, D> {
            fn $method(&mut self, right: V) {
                *self = self.clone().$op_method(right);
            }
        }
    };
}

impl_dual_assign_op!(AddAssign, add_assign, add);
impl_dual_assign_op!(SubAssign, sub_assign, sub);
impl_dual_assign_op!(MulAssign, mul_assign, mul);
impl_dual_assign_op!(DivAssign, div_assign, div);

impl<V: Scalar, D: Tangent<V>> Dual<V, D> {
    /// Exponential function.
    pub fn exp(&self) -> Dual<V, D> {
        let value = self.value.exp();
        Dual {
            value,
            diff: self.diff.clone() * value,
        }
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Dual<V, D> {
        Dual {
            value: self.value.ln(),
            diff: self.diff.clone() / self.value,
        }
    }

    /// Square root.
    pub fn sqrt(&self) -> Dual<V, D> {
        let value = self.value.sqrt();
        Dual {
            value,
            diff: self.diff.clone() / (V::cast(2.0) * value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_create_dual_variable() {
        let var = create_dual_variable(1.234);

        assert_eq!(var.value(), 1.234);
        assert_eq!(*var.diff(), 1.0);
    }

    #[test]
    fn test_create_dual_variable_vec() {
        let var = create_dual_variable_vec(1.234, 3, 1);

        assert_eq!(var.value(), 1.234);
        assert_eq!(var.diff().as_slice(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_arithmetic_propagates_tangents() {
        let x = create_dual_variable(1.234);

        let res = x.clone() * x.clone() + x.clone() * 2.0 - 1.0;

        assert_relative_eq!(res.value(), 1.234 * 1.234 + 2.0 * 1.234 - 1.0);
        assert_relative_eq!(*res.diff(), 2.0 * 1.234 + 2.0);
    }

    #[test]
    fn test_division_quotient_rule() {
        let x = create_dual_variable(2.0);

        // d/dx (1 / x) = -1 / x^2
        let res = 1.0 / x;

        assert_relative_eq!(res.value(), 0.5);
        assert_relative_eq!(*res.diff(), -0.25);
    }

    #[test]
    fn test_elementary_functions() {
        let x = create_dual_variable(1.234);

        assert_relative_eq!(*x.exp().diff(), 1.234f64.exp());
        assert_relative_eq!(*x.ln().diff(), 1.0 / 1.234);
        assert_relative_eq!(*x.sqrt().diff(), 0.5 / 1.234f64.sqrt());
    }

    #[test]
    fn test_make_jacobian() {
        let x0 = create_dual_variable_vec(1.234, 2, 0);
        let x1 = create_dual_variable_vec(2.345, 2, 1);

        let outputs = DVector::from_vec(vec![
            x0.clone() + x1.clone(),
            x0.clone() - x1.clone(),
            x0.clone() * x1.clone(),
        ]);

        let jacobian = make_jacobian(&outputs);
        assert_eq!(jacobian.shape(), (3, 2));
        assert_relative_eq!(jacobian[(0, 0)], 1.0);
        assert_relative_eq!(jacobian[(0, 1)], 1.0);
        assert_relative_eq!(jacobian[(1, 0)], 1.0);
        assert_relative_eq!(jacobian[(1, 1)], -1.0);
        assert_relative_eq!(jacobian[(2, 0)], 2.345);
        assert_relative_eq!(jacobian[(2, 1)], 1.234);
    }

    #[test]
    fn test_make_jacobian_of_empty_vector() {
        let outputs: DVector<Dual<f64, DVector<f64>>> = DVector::from_vec(vec![]);

        let jacobian = make_jacobian(&outputs);
        assert_eq!(jacobian.shape(), (0, 0));
    }
}
