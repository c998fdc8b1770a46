//! Ordinary differential equation solvers.
//!
//! Problems are initial value problems `dy/dt = f(t, y)` over dense vectors;
//! scalar problems use vectors of length one. Explicit Runge-Kutta formulas
//! advance the state, and the embedded formula variants also produce an
//! error estimate that the step size controllers use to accept or reject
//! steps and to choose the next step size.
//!
//! # Example
//!
//! ```
//! use nalgebra::DVector;
//! use numkit::ode::{EmbeddedSolver, PiStepSizeController, Rkf45Formula};
//!
//! // dy/dt = -y, y(0) = 1.
//! let problem = |_time: f64, y: &DVector<f64>| -y;
//! let mut solver = EmbeddedSolver::new(
//!     problem,
//!     Rkf45Formula,
//!     PiStepSizeController::for_formula::<Rkf45Formula>(),
//! );
//! solver.init(0.0, DVector::from_vec(vec![1.0]));
//! solver.solve_till(1.0);
//! assert!((solver.variable()[0] - (-1.0f64).exp()).abs() < 1e-3);
//! ```

mod error_tolerances;
mod runge_kutta;
mod solver;
mod step_size_controller;
mod step_size_limits;

pub use error_tolerances::ErrorTolerances;
pub use runge_kutta::{EmbeddedFormula, Formula, Rk4Formula, Rkf45Formula};
pub use solver::{EmbeddedSolver, SimpleSolver};
pub use step_size_controller::{
    BasicStepSizeController, PiStepSizeController, StepSizeController,
};
pub use step_size_limits::StepSizeLimits;

use crate::scalar::Scalar;
use nalgebra::DVector;

/// An initial value problem `dy/dt = f(t, y)`.
///
/// Implemented for any closure `FnMut(T, &DVector<T>) -> DVector<T>`.
pub trait OdeProblem<T: Scalar> {
    /// Evaluate the right-hand side at the given time and variable.
    fn evaluate(&mut self, time: T, variable: &DVector<T>) -> DVector<T>;
}

impl<T, F> OdeProblem<T> for F
where
    T: Scalar,
    F: FnMut(T, &DVector<T>) -> DVector<T>,
{
    fn evaluate(&mut self, time: T, variable: &DVector<T>) -> DVector<T> {
        self(time, variable)
    }
}
