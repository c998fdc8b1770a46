//! Variables of reverse-mode automatic differentiation.

use super::graph::{create_leaf, create_node, ChildNode, NodePtr};
use crate::scalar::Scalar;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::rc::Rc;

/// A value tracked for reverse-mode automatic differentiation.
///
/// A variable holds a plain value and, when it participates in
/// differentiation, a node of the computation graph. A variable without a
/// node is a constant: it contributes no graph structure to expressions
/// built from it, only its value. Arithmetic on variables extends the graph
/// with nodes recording the local partial derivatives of each operation.
///
/// Cloning a variable is cheap and shares the underlying node, so a common
/// subexpression used several times produces a diamond-shaped graph rather
/// than a copy.
#[derive(Debug, Clone, Default)]
pub struct Variable<T: Scalar> {
    value: T,
    node: Option<NodePtr<T>>,
}

impl<T: Scalar> Variable<T> {
    /// Create a variable with an explicit node.
    pub fn with_node(value: T, node: NodePtr<T>) -> Self {
        Self {
            value,
            node: Some(node),
        }
    }

    /// Create a constant, not subject to differentiation.
    pub fn constant(value: T) -> Self {
        Self { value, node: None }
    }

    /// Create a new independent variable with a fresh leaf node.
    pub fn leaf(value: T) -> Self {
        Self {
            value,
            node: Some(create_leaf()),
        }
    }

    /// Get the value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Get the graph node, or `None` for constants.
    pub fn node(&self) -> Option<&NodePtr<T>> {
        self.node.as_ref()
    }
}

impl<T: Scalar> From<T> for Variable<T> {
    fn from(value: T) -> Self {
        Self::constant(value)
    }
}

/// Comparisons act on values only; graph structure does not participate.
impl<T: Scalar> PartialEq for Variable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Scalar> PartialOrd for Variable<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Scalar> Zero for Variable<T> {
    fn zero() -> Self {
        Self::constant(T::zero())
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl<T: Scalar> One for Variable<T> {
    fn one() -> Self {
        Self::constant(T::one())
    }
}

impl<T: Scalar> Add for &Variable<T> {
    type Output = Variable<T>;

    fn add(self, right: Self) -> Variable<T> {
        let node = match (&self.node, &right.node) {
            (Some(left_node), Some(right_node)) => {
                if Rc::ptr_eq(left_node, right_node) {
                    // Both operands alias the same node: fold the two unit
                    // sensitivities into one edge.
                    Some(create_node([ChildNode::new(
                        Rc::clone(left_node),
                        T::cast(2.0),
                    )]))
                } else {
                    Some(create_node([
                        ChildNode::new(Rc::clone(left_node), T::one()),
                        ChildNode::new(Rc::clone(right_node), T::one()),
                    ]))
                }
            }
            // The local derivative is one, so the existing node is reused
            // unchanged instead of wrapping it in a new node.
            (Some(left_node), None) => Some(Rc::clone(left_node)),
            (None, Some(right_node)) => Some(Rc::clone(right_node)),
            (None, None) => None,
        };
        Variable {
            value: self.value + right.value,
            node,
        }
    }
}

impl<T: Scalar> Sub for &Variable<T> {
    type Output = Variable<T>;

    fn sub(self, right: Self) -> Variable<T> {
        let node = match (&self.node, &right.node) {
            (Some(left_node), Some(right_node)) => {
                if Rc::ptr_eq(left_node, right_node) {
                    // x - x cancels exactly: the result is a new constant.
                    None
                } else {
                    Some(create_node([
                        ChildNode::new(Rc::clone(left_node), T::one()),
                        ChildNode::new(Rc::clone(right_node), -T::one()),
                    ]))
                }
            }
            (Some(left_node), None) => Some(Rc::clone(left_node)),
            (None, Some(right_node)) => {
                Some(create_node([ChildNode::new(Rc::clone(right_node), -T::one())]))
            }
            (None, None) => None,
        };
        Variable {
            value: self.value - right.value,
            node,
        }
    }
}

impl<T: Scalar> Mul for &Variable<T> {
    type Output = Variable<T>;

    fn mul(self, right: Self) -> Variable<T> {
        let node = match (&self.node, &right.node) {
            (Some(left_node), Some(right_node)) => {
                if Rc::ptr_eq(left_node, right_node) {
                    // x * x: total derivative 2x on a single edge.
                    Some(create_node([ChildNode::new(
                        Rc::clone(left_node),
                        T::cast(2.0) * self.value,
                    )]))
                } else {
                    Some(create_node([
                        ChildNode::new(Rc::clone(left_node), right.value),
                        ChildNode::new(Rc::clone(right_node), self.value),
                    ]))
                }
            }
            (Some(left_node), None) => {
                Some(create_node([ChildNode::new(Rc::clone(left_node), right.value)]))
            }
            (None, Some(right_node)) => {
                Some(create_node([ChildNode::new(Rc::clone(right_node), self.value)]))
            }
            (None, None) => None,
        };
        Variable {
            value: self.value * right.value,
            node,
        }
    }
}

impl<T: Scalar> Div for &Variable<T> {
    type Output = Variable<T>;

    fn div(self, right: Self) -> Variable<T> {
        let node = match (&self.node, &right.node) {
            (Some(left_node), Some(right_node)) => {
                if Rc::ptr_eq(left_node, right_node) {
                    // x / x cancels exactly: the result is a new constant.
                    None
                } else {
                    Some(create_node([
                        ChildNode::new(Rc::clone(left_node), T::one() / right.value),
                        ChildNode::new(
                            Rc::clone(right_node),
                            -self.value / (right.value * right.value),
                        ),
                    ]))
                }
            }
            (Some(left_node), None) => Some(create_node([ChildNode::new(
                Rc::clone(left_node),
                T::one() / right.value,
            )])),
            (None, Some(right_node)) => Some(create_node([ChildNode::new(
                Rc::clone(right_node),
                -self.value / (right.value * right.value),
            )])),
            (None, None) => None,
        };
        Variable {
            value: self.value / right.value,
            node,
        }
    }
}

impl<T: Scalar> Neg for &Variable<T> {
    type Output = Variable<T>;

    fn neg(self) -> Variable<T> {
        let node = self
            .node
            .as_ref()
            .map(|node| create_node([ChildNode::new(Rc::clone(node), -T::one())]));
        Variable {
            value: -self.value,
            node,
        }
    }
}

impl<T: Scalar> Neg for Variable<T> {
    type Output = Variable<T>;

    fn neg(self) -> Variable<T> {
        -&self
    }
}

macro_rules! impl_binary_op_forwarding {
    ($trait:ident, $method:ident) => {
        impl<T: Scalar> $trait for Variable<T> {
            type Output = Variable<T>;

            fn $method(self, right: Variable<T>) -> Variable<T> {
                (&self).$method(&right)
            }
        }

        impl<T: Scalar> $trait<&Variable<T>> for Variable<T> {
            type Output = Variable<T>;

            fn $method(self, right: &Variable<T>) -> Variable<T> {
                (&self).$method(right)
            }
        }

        impl<T: Scalar> $trait<Variable<T>> for &Variable<T> {
            type Output = Variable<T>;

            fn $method(self, right: Variable<T>) -> Variable<T> {
                self.$method(&right)
            }
        }

        impl<T: Scalar> $trait<T> for Variable<T> {
            type Output = Variable<T>;

            fn $method(self, right: T) -> Variable<T> {
                (&self).$method(&Variable::constant(right))
            }
        }

        impl<T: Scalar> $trait<T> for &Variable<T> {
            type Output = Variable<T>;

            fn $method(self, right: T) -> Variable<T> {
                self.$method(&Variable::constant(right))
            }
        }
    };
}

impl_binary_op_forwarding!(Add, add);
impl_binary_op_forwarding!(Sub, sub);
impl_binary_op_forwarding!(Mul, mul);
impl_binary_op_forwarding!(Div, div);

// Scalar-on-the-left operators. Coherence rules require one impl per
// concrete scalar type.
macro_rules! impl_left_scalar_ops {
    ($($scalar:ty),* $(,)?) => {$(
        impl Add<Variable<$scalar>> for $scalar {
            type Output = Variable<$scalar>;

            fn add(self, right: Variable<$scalar>) -> Variable<$scalar> {
                &Variable::constant(self) + &right
            }
        }

        impl Sub<Variable<$scalar>> for $scalar {
            type Output = Variable<$scalar>;

            fn sub(self, right: Variable<$scalar>) -> Variable<$scalar> {
                &Variable::constant(self) - &right
            }
        }

        impl Mul<Variable<$scalar>> for $scalar {
            type Output = Variable<$scalar>;

            fn mul(self, right: Variable<$scalar>) -> Variable<$scalar> {
                &Variable::constant(self) * &right
            }
        }

        impl Div<Variable<$scalar>> for $scalar {
            type Output = Variable<$scalar>;

            fn div(self, right: Variable<$scalar>) -> Variable<$scalar> {
                &Variable::constant(self) / &right
            }
        }
    )*};
}

impl_left_scalar_ops!(f32, f64);

macro_rules! impl_assign_op {
    ($trait:ident, $method:ident, $op_method:ident) => {
        impl<T: Scalar> $trait for Variable<T> {
            fn $method(&mut self, right: Variable<T>) {
                *self = (&*self).$op_method(&right);
            }
        }

        impl<T: Scalar> $trait<&Variable<T>> for Variable<T> {
            fn $method(&mut self, right: &Variable<T>) {
                *self = (&*self).$op_method(right);
            }
        }

        impl<T: Scalar> $trait<T> for Variable<T> {
            fn $method(&mut self, right: T) {
                *self = (&*self).$op_method(&Variable::constant(right));
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, add);
impl_assign_op!(SubAssign, sub_assign, sub);
impl_assign_op!(MulAssign, mul_assign, mul);
impl_assign_op!(DivAssign, div_assign, div);
