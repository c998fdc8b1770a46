//! Automatic differentiation.
//!
//! Two modes are provided:
//!
//! - **Backward (reverse) mode**: arithmetic on [`Variable`] dynamically
//!   builds a computation graph of immutable, reference-counted nodes; the
//!   [`differentiate`] entry points then run the adjoint propagation of
//!   [`graph::NodeDifferentiator`] over it. One backward pass yields the
//!   derivative of one output with respect to every input, so this mode is
//!   the right choice for gradients of scalar outputs of many variables.
//! - **Forward mode**: [`forward::Dual`] carries differential coefficients
//!   alongside each value with no graph at all. Cost scales with the number
//!   of inputs, making it the right choice for few inputs or directional
//!   derivatives.
//!
//! # Example
//!
//! ```
//! use numkit::autodiff::{create_diff_variable, differentiate};
//!
//! let x = create_diff_variable(2.0);
//! let y = 0.5 * (&x * &x) - &x;
//! let dy_dx = differentiate(&y, &x).unwrap();
//! assert_eq!(dy_dx, 1.0);
//! ```

pub mod create;
pub mod differentiate;
pub mod forward;
pub mod graph;
mod math;
pub mod variable;

pub use create::{create_diff_variable, create_diff_variable_vector};
pub use differentiate::{differentiate, differentiate_matrix, differentiate_vector};
pub use variable::Variable;
