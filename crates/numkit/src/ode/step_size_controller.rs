//! Step size controllers for embedded formulas.

use super::error_tolerances::ErrorTolerances;
use super::runge_kutta::EmbeddedFormula;
use super::step_size_limits::StepSizeLimits;
use crate::error::NumError;
use crate::scalar::Scalar;
use nalgebra::DVector;

const DEFAULT_REDUCTION_RATE: f64 = 0.5;
const DEFAULT_SAFETY_COEFF: f64 = 0.9;
const DEFAULT_MAX_STEP_SIZE_FACTOR: f64 = 2.0;
const DEFAULT_MIN_STEP_SIZE_FACTOR: f64 = 0.1;

/// Checks error estimates and chooses step sizes.
pub trait StepSizeController<T: Scalar> {
    /// Initialize for a problem with the given reference variable.
    ///
    /// Builds default tolerances sized after the reference unless tolerances
    /// were set explicitly.
    fn init(&mut self, reference: &DVector<T>);

    /// Check the error estimate of a step and update the step size.
    ///
    /// On success the step size is set for the next step and `true` is
    /// returned; on failure the step size is reduced for a retry and `false`
    /// is returned. When the step size is already at its lower limit the
    /// step is accepted regardless, with a warning.
    fn check_and_calc_next(
        &mut self,
        step_size: &mut T,
        variable: &DVector<T>,
        error: &DVector<T>,
    ) -> bool;
}

/// Reject a failed step by shrinking the step size, unless it is already at
/// the lower limit.
fn reduce_if_needed<T: Scalar>(
    tolerances: &ErrorTolerances<T>,
    limits: &StepSizeLimits<T>,
    reduction_rate: T,
    step_size: &mut T,
    variable: &DVector<T>,
    error: &DVector<T>,
) -> bool {
    if tolerances.check(variable, error) {
        return false;
    }
    if *step_size > limits.lower_limit() {
        log::trace!(
            "error tolerance not satisfied with step size {:?}; reducing",
            *step_size
        );
        *step_size = limits.apply(*step_size * reduction_rate);
        return true;
    }
    log::warn!(
        "error tolerance not satisfied even with the lowest step size {:?}",
        *step_size
    );
    false
}

/// Basic step size controller.
///
/// The next step size is scaled by `safety · norm^(−1/(order+1))` where
/// `norm` is the weighted error norm and `order` the lower of the formula's
/// two orders.
#[derive(Debug)]
pub struct BasicStepSizeController<T: Scalar> {
    limits: StepSizeLimits<T>,
    tolerances: Option<ErrorTolerances<T>>,
    reduction_rate: T,
    safety_coeff: T,
    max_factor: T,
    order_for_exponent: usize,
}

impl<T: Scalar> BasicStepSizeController<T> {
    /// Create a controller using the error exponent of the given order.
    pub fn new(order_for_exponent: usize) -> Self {
        Self {
            limits: StepSizeLimits::new(),
            tolerances: None,
            reduction_rate: T::cast(DEFAULT_REDUCTION_RATE),
            safety_coeff: T::cast(DEFAULT_SAFETY_COEFF),
            max_factor: T::cast(DEFAULT_MAX_STEP_SIZE_FACTOR),
            order_for_exponent,
        }
    }

    /// Create a controller matching an embedded formula.
    pub fn for_formula<F: EmbeddedFormula<T>>() -> Self {
        Self::new(F::LESSER_ORDER)
    }

    /// Set the step size limits.
    pub fn limits(mut self, value: StepSizeLimits<T>) -> Self {
        self.limits = value;
        self
    }

    /// Set the error tolerances.
    pub fn tolerances(mut self, value: ErrorTolerances<T>) -> Self {
        self.tolerances = Some(value);
        self
    }

    /// Set the safety coefficient of step size factors.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `value` is not positive.
    pub fn step_size_factor_safety_coeff(mut self, value: T) -> Result<Self, NumError> {
        if value <= T::zero() {
            return Err(NumError::invalid_argument(
                "safety coefficient of step size factors must be a positive value",
            ));
        }
        self.safety_coeff = value;
        Ok(self)
    }

    /// Set the maximum factor of step sizes.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `value` is not positive.
    pub fn max_step_size_factor(mut self, value: T) -> Result<Self, NumError> {
        if value <= T::zero() {
            return Err(NumError::invalid_argument(
                "maximum step size factor must be a positive value",
            ));
        }
        self.max_factor = value;
        Ok(self)
    }
}

impl<T: Scalar> StepSizeController<T> for BasicStepSizeController<T> {
    fn init(&mut self, reference: &DVector<T>) {
        if self.tolerances.is_none() {
            self.tolerances = Some(ErrorTolerances::new(reference));
        }
    }

    fn check_and_calc_next(
        &mut self,
        step_size: &mut T,
        variable: &DVector<T>,
        error: &DVector<T>,
    ) -> bool {
        let tolerances = self
            .tolerances
            .as_ref()
            .expect("step size controller used before init");
        if reduce_if_needed(
            tolerances,
            &self.limits,
            self.reduction_rate,
            step_size,
            variable,
            error,
        ) {
            return false;
        }

        let error_norm = tolerances.calc_norm(variable, error);
        let exponent = -T::one() / T::cast((self.order_for_exponent + 1) as f64);
        let mut factor = error_norm.powf(exponent) * self.safety_coeff;
        if factor > self.max_factor || !factor.is_finite() {
            factor = self.max_factor;
        }

        *step_size = self.limits.apply(*step_size * factor);
        true
    }
}

/// PI step size controller.
///
/// Combines the error of the current step with the error of the previous
/// step, which damps the step size oscillation the basic controller is
/// prone to:
/// `factor = safety · norm^(−0.7/(order+1)) · previous_norm^(0.4/(order+1))`.
#[derive(Debug)]
pub struct PiStepSizeController<T: Scalar> {
    limits: StepSizeLimits<T>,
    tolerances: Option<ErrorTolerances<T>>,
    reduction_rate: T,
    safety_coeff: T,
    max_factor: T,
    min_factor: T,
    current_step_error_exponent: T,
    previous_step_error_exponent: T,
    previous_step_error: T,
}

impl<T: Scalar> PiStepSizeController<T> {
    /// Create a controller using the error exponents of the given order.
    pub fn new(order_for_exponent: usize) -> Self {
        let order_plus_one = T::cast((order_for_exponent + 1) as f64);
        Self {
            limits: StepSizeLimits::new(),
            tolerances: None,
            reduction_rate: T::cast(DEFAULT_REDUCTION_RATE),
            safety_coeff: T::cast(DEFAULT_SAFETY_COEFF),
            max_factor: T::cast(DEFAULT_MAX_STEP_SIZE_FACTOR),
            min_factor: T::cast(DEFAULT_MIN_STEP_SIZE_FACTOR),
            current_step_error_exponent: T::cast(0.7) / order_plus_one,
            previous_step_error_exponent: T::cast(0.4) / order_plus_one,
            previous_step_error: T::one(),
        }
    }

    /// Create a controller matching an embedded formula.
    pub fn for_formula<F: EmbeddedFormula<T>>() -> Self {
        Self::new(F::LESSER_ORDER)
    }

    /// Set the step size limits.
    pub fn limits(mut self, value: StepSizeLimits<T>) -> Self {
        self.limits = value;
        self
    }

    /// Set the error tolerances.
    pub fn tolerances(mut self, value: ErrorTolerances<T>) -> Self {
        self.tolerances = Some(value);
        self
    }

    /// Set the safety coefficient of step size factors.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` if `value` is not positive.
    pub fn step_size_factor_safety_coeff(mut self, value: T) -> Result<Self, NumError> {
        if value <= T::zero() {
            return Err(NumError::invalid_argument(
                "safety coefficient of step size factors must be a positive value",
            ));
        }
        self.safety_coeff = value;
        Ok(self)
    }

    /// Set the exponent of the error of the current step.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` unless
    /// `0 ≤ previous_step_error_exponent ≤ value`.
    pub fn current_step_error_exponent(mut self, value: T) -> Result<Self, NumError> {
        if value < self.previous_step_error_exponent {
            return Err(NumError::invalid_argument(
                "0 <= previous_step_error_exponent <= current_step_error_exponent \
                 must be satisfied",
            ));
        }
        self.current_step_error_exponent = value;
        Ok(self)
    }

    /// Set the exponent of the error of the previous step.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` unless
    /// `0 ≤ value ≤ current_step_error_exponent`.
    pub fn previous_step_error_exponent(mut self, value: T) -> Result<Self, NumError> {
        if value < T::zero() || self.current_step_error_exponent < value {
            return Err(NumError::invalid_argument(
                "0 <= previous_step_error_exponent <= current_step_error_exponent \
                 must be satisfied",
            ));
        }
        self.previous_step_error_exponent = value;
        Ok(self)
    }

    /// Set the maximum factor of step sizes.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` unless `min_factor < value`.
    pub fn max_step_size_factor(mut self, value: T) -> Result<Self, NumError> {
        if value <= self.min_factor {
            return Err(NumError::invalid_argument(
                "0 < min_step_size_factor < max_step_size_factor must be satisfied",
            ));
        }
        self.max_factor = value;
        Ok(self)
    }

    /// Set the minimum factor of step sizes.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` unless `0 < value < max_factor`.
    pub fn min_step_size_factor(mut self, value: T) -> Result<Self, NumError> {
        if value <= T::zero() || self.max_factor <= value {
            return Err(NumError::invalid_argument(
                "0 < min_step_size_factor < max_step_size_factor must be satisfied",
            ));
        }
        self.min_factor = value;
        Ok(self)
    }
}

impl<T: Scalar> StepSizeController<T> for PiStepSizeController<T> {
    fn init(&mut self, reference: &DVector<T>) {
        if self.tolerances.is_none() {
            self.tolerances = Some(ErrorTolerances::new(reference));
        }
        self.previous_step_error = T::one();
    }

    fn check_and_calc_next(
        &mut self,
        step_size: &mut T,
        variable: &DVector<T>,
        error: &DVector<T>,
    ) -> bool {
        let tolerances = self
            .tolerances
            .as_ref()
            .expect("step size controller used before init");
        if reduce_if_needed(
            tolerances,
            &self.limits,
            self.reduction_rate,
            step_size,
            variable,
            error,
        ) {
            return false;
        }

        let error_norm = tolerances.calc_norm(variable, error);
        let mut factor = error_norm.powf(-self.current_step_error_exponent)
            * self
                .previous_step_error
                .powf(self.previous_step_error_exponent)
            * self.safety_coeff;
        if !factor.is_finite() {
            factor = T::one();
        }
        if factor > self.max_factor {
            factor = self.max_factor;
        } else if factor < self.min_factor {
            factor = self.min_factor;
        }

        *step_size = self.limits.apply(*step_size * factor);
        self.previous_step_error = error_norm;
        true
    }
}
