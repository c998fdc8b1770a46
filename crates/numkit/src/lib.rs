//! numkit - numerical-methods building blocks.
//!
//! This crate provides automatic differentiation (forward and reverse mode),
//! numerical integration, ODE solvers with adaptive step size control, and
//! root finding.
//!
//! # Architecture
//!
//! The reverse-mode engine is the load-bearing piece:
//!
//! ```text
//! Variable<T>  ──arithmetic builds──►  DAG of Rc<Node<T>>
//!      │                                      │
//!      ▼                                      ▼
//! differentiate()  ──runs──►  NodeDifferentiator (two-pass BFS)
//!                                      │
//!                                      ▼
//!                     adjoint of every reachable node
//! ```
//!
//! The other modules are plain numerical loops: quadrature rules in
//! [`integrate`], Runge-Kutta formulas with step size controllers in
//! [`ode`], Newton-Raphson in [`roots`], and Legendre functions in
//! [`functions`]. Dense vectors and matrices come from `nalgebra`;
//! [`autodiff::Variable`] is usable as their scalar type.
//!
//! # Example
//!
//! ```
//! use nalgebra::DVector;
//! use numkit::autodiff::{create_diff_variable_vector, differentiate_vector};
//!
//! let values = DVector::from_vec(vec![1.0, 2.0]);
//! let x = create_diff_variable_vector(&values);
//! let outputs = DVector::from_vec(vec![
//!     &x[0] + &x[1],
//!     &x[0] * &x[1],
//! ]);
//!
//! let jacobian = differentiate_vector(&outputs, &x).unwrap();
//! assert_eq!(jacobian[(0, 0)], 1.0);
//! assert_eq!(jacobian[(1, 0)], 2.0);
//! ```

pub mod autodiff;
pub mod error;
pub mod functions;
pub mod integrate;
pub mod ode;
pub mod roots;
pub mod scalar;
pub mod util;

pub use error::NumError;
pub use scalar::Scalar;
