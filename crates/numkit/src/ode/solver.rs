//! Solvers of initial value problems.

use super::runge_kutta::{EmbeddedFormula, Formula};
use super::step_size_controller::StepSizeController;
use super::OdeProblem;
use crate::error::NumError;
use crate::scalar::Scalar;
use nalgebra::DVector;

const DEFAULT_STEP_SIZE: f64 = 1e-3;

/// Solver with a fixed step size.
#[derive(Debug)]
pub struct SimpleSolver<T: Scalar, P: OdeProblem<T>, F: Formula<T>> {
    problem: P,
    formula: F,
    time: T,
    variable: DVector<T>,
    step_size: T,
    steps: usize,
}

impl<T, P, F> SimpleSolver<T, P, F>
where
    T: Scalar,
    P: OdeProblem<T>,
    F: Formula<T>,
{
    /// Create a solver for the given problem.
    pub fn new(problem: P, formula: F) -> Self {
        Self {
            problem,
            formula,
            time: T::zero(),
            variable: DVector::zeros(0),
            step_size: T::cast(DEFAULT_STEP_SIZE),
            steps: 0,
        }
    }

    /// Set the step size.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `value` is not positive.
    pub fn step_size(mut self, value: T) -> Result<Self, NumError> {
        if value <= T::zero() {
            return Err(NumError::invalid_argument(
                "step size must be a positive value",
            ));
        }
        self.step_size = value;
        Ok(self)
    }

    /// Initialize with an initial time and variable.
    pub fn init(&mut self, time: T, variable: DVector<T>) {
        self.time = time;
        self.variable = variable;
        self.steps = 0;
    }

    /// Compute one step.
    pub fn step(&mut self) {
        self.step_with(self.step_size);
    }

    /// Solve the problem until the given time.
    ///
    /// The final step is shortened to land on `end_time` exactly.
    pub fn solve_till(&mut self, end_time: T) {
        while self.time < end_time {
            let step_size = if self.time + self.step_size > end_time {
                end_time - self.time
            } else {
                self.step_size
            };
            self.step_with(step_size);
        }
        log::debug!(
            "simple_solver: solved till time {:?} with {} steps",
            self.time,
            self.steps
        );
    }

    /// Get the current time.
    pub fn time(&self) -> T {
        self.time
    }

    /// Get the current variable.
    pub fn variable(&self) -> &DVector<T> {
        &self.variable
    }

    /// Get the number of steps computed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn step_with(&mut self, step_size: T) {
        self.variable =
            self.formula
                .step(&mut self.problem, self.time, step_size, &self.variable);
        self.time = self.time + step_size;
        self.steps += 1;
        log::trace!(
            "simple_solver: time={:?} step_size={:?}",
            self.time,
            step_size
        );
    }
}

/// Solver with adaptive step sizes using an embedded formula.
///
/// Each step is attempted with the current step size; the controller checks
/// the embedded error estimate and either accepts the step (choosing the
/// next step size) or rejects it (shrinking the step size for a retry).
#[derive(Debug)]
pub struct EmbeddedSolver<T, P, F, C>
where
    T: Scalar,
    P: OdeProblem<T>,
    F: EmbeddedFormula<T>,
    C: StepSizeController<T>,
{
    problem: P,
    formula: F,
    controller: C,
    time: T,
    variable: DVector<T>,
    step_size: T,
    steps: usize,
    rejected_steps: usize,
}

impl<T, P, F, C> EmbeddedSolver<T, P, F, C>
where
    T: Scalar,
    P: OdeProblem<T>,
    F: EmbeddedFormula<T>,
    C: StepSizeController<T>,
{
    /// Create a solver for the given problem.
    pub fn new(problem: P, formula: F, controller: C) -> Self {
        Self {
            problem,
            formula,
            controller,
            time: T::zero(),
            variable: DVector::zeros(0),
            step_size: T::cast(DEFAULT_STEP_SIZE),
            steps: 0,
            rejected_steps: 0,
        }
    }

    /// Set the initial step size.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `value` is not positive.
    pub fn step_size(mut self, value: T) -> Result<Self, NumError> {
        if value <= T::zero() {
            return Err(NumError::invalid_argument(
                "step size must be a positive value",
            ));
        }
        self.step_size = value;
        Ok(self)
    }

    /// Initialize with an initial time and variable.
    pub fn init(&mut self, time: T, variable: DVector<T>) {
        self.controller.init(&variable);
        self.time = time;
        self.variable = variable;
        self.steps = 0;
        self.rejected_steps = 0;
    }

    /// Compute one accepted step, retrying with smaller step sizes as
    /// needed.
    pub fn step(&mut self) {
        loop {
            let used_step_size = self.step_size;
            let (estimate, error) = self.formula.step_embedded(
                &mut self.problem,
                self.time,
                used_step_size,
                &self.variable,
            );

            let mut next_step_size = used_step_size;
            if self
                .controller
                .check_and_calc_next(&mut next_step_size, &estimate, &error)
            {
                self.time = self.time + used_step_size;
                self.variable = estimate;
                self.step_size = next_step_size;
                self.steps += 1;
                log::trace!(
                    "embedded_solver: time={:?} step_size={:?}",
                    self.time,
                    used_step_size
                );
                return;
            }
            self.step_size = next_step_size;
            self.rejected_steps += 1;
        }
    }

    /// Solve the problem until the given time.
    ///
    /// The final step is shortened to land on `end_time` exactly.
    pub fn solve_till(&mut self, end_time: T) {
        while self.time < end_time {
            if self.time + self.step_size > end_time {
                self.step_size = end_time - self.time;
            }
            self.step();
        }
        log::debug!(
            "embedded_solver: solved till time {:?} with {} steps ({} rejected)",
            self.time,
            self.steps,
            self.rejected_steps
        );
    }

    /// Get the current time.
    pub fn time(&self) -> T {
        self.time
    }

    /// Get the current variable.
    pub fn variable(&self) -> &DVector<T> {
        &self.variable
    }

    /// Get the current step size.
    pub fn current_step_size(&self) -> T {
        self.step_size
    }

    /// Get the number of accepted steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Get the number of rejected steps.
    pub fn rejected_steps(&self) -> usize {
        self.rejected_steps
    }
}

#[cfg(test)]
mod tests {
    use super::super::runge_kutta::{Rk4Formula, Rkf45Formula};
    use super::super::step_size_controller::{BasicStepSizeController, PiStepSizeController};
    use super::*;
    use approx::assert_relative_eq;

    fn exponential_decay(_time: f64, variable: &DVector<f64>) -> DVector<f64> {
        -variable
    }

    #[test]
    fn test_simple_solver_exponential_decay() {
        let mut solver = SimpleSolver::new(exponential_decay, Rk4Formula)
            .step_size(1e-2)
            .unwrap();
        solver.init(0.0, DVector::from_vec(vec![1.0]));
        solver.solve_till(1.0);

        assert_relative_eq!(solver.time(), 1.0);
        assert_relative_eq!(solver.variable()[0], (-1.0f64).exp(), epsilon = 1e-8);
        // Rounding of the accumulated time may add one clipped final step.
        assert!(solver.steps() >= 100 && solver.steps() <= 101);
    }

    #[test]
    fn test_embedded_solver_with_basic_controller() {
        let mut solver = EmbeddedSolver::new(
            exponential_decay,
            Rkf45Formula,
            BasicStepSizeController::for_formula::<Rkf45Formula>(),
        );
        solver.init(0.0, DVector::from_vec(vec![1.0]));
        solver.solve_till(1.0);

        assert_relative_eq!(solver.time(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(solver.variable()[0], (-1.0f64).exp(), epsilon = 1e-3);
        assert!(solver.steps() > 0);
    }

    #[test]
    fn test_embedded_solver_with_pi_controller() {
        let mut solver = EmbeddedSolver::new(
            exponential_decay,
            Rkf45Formula,
            PiStepSizeController::for_formula::<Rkf45Formula>(),
        );
        solver.init(0.0, DVector::from_vec(vec![1.0]));
        solver.solve_till(1.0);

        assert_relative_eq!(solver.time(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(solver.variable()[0], (-1.0f64).exp(), epsilon = 1e-3);
    }

    #[test]
    fn test_embedded_solver_harmonic_oscillator() {
        // y'' = -y as a system: (y, v)' = (v, -y); y(0) = 1, v(0) = 0.
        let problem = |_time: f64, variable: &DVector<f64>| {
            DVector::from_vec(vec![variable[1], -variable[0]])
        };
        let mut solver = EmbeddedSolver::new(
            problem,
            Rkf45Formula,
            PiStepSizeController::for_formula::<Rkf45Formula>(),
        );
        solver.init(0.0, DVector::from_vec(vec![1.0, 0.0]));
        let end_time = std::f64::consts::PI;
        solver.solve_till(end_time);

        assert_relative_eq!(solver.variable()[0], -1.0, epsilon = 1e-3);
        assert_relative_eq!(solver.variable()[1], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_step_size_is_rejected() {
        let solver = SimpleSolver::new(exponential_decay, Rk4Formula).step_size(0.0);
        assert!(matches!(solver, Err(NumError::InvalidArgument { .. })));
    }
}
