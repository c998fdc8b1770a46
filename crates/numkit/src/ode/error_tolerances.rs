//! Error tolerances of ODE solvers.

use crate::error::NumError;
use crate::scalar::Scalar;
use nalgebra::DVector;

const DEFAULT_TOL_REL_ERROR: f64 = 1e-4;
const DEFAULT_TOL_ABS_ERROR: f64 = 1e-4;

/// Elementwise error tolerances.
///
/// An error estimate passes when `|error_i| ≤ rel_i |variable_i| + abs_i`
/// for every element. The same weights define the error norm used for step
/// size selection: the root mean square of the weighted error elements.
#[derive(Debug, Clone)]
pub struct ErrorTolerances<T: Scalar> {
    tol_rel_error: DVector<T>,
    tol_abs_error: DVector<T>,
    norm_weight: T,
}

impl<T: Scalar> ErrorTolerances<T> {
    /// Create tolerances sized after a reference variable, with default
    /// uniform relative and absolute tolerances.
    pub fn new(reference: &DVector<T>) -> Self {
        let size = reference.nrows();
        Self {
            tol_rel_error: DVector::from_element(size, T::cast(DEFAULT_TOL_REL_ERROR)),
            tol_abs_error: DVector::from_element(size, T::cast(DEFAULT_TOL_ABS_ERROR)),
            norm_weight: (T::one() / T::cast(size as f64)).sqrt(),
        }
    }

    /// Check whether an error estimate satisfies the tolerances.
    pub fn check(&self, variable: &DVector<T>, error: &DVector<T>) -> bool {
        for i in 0..variable.nrows() {
            if error[i].abs() > self.tol_rel_error[i] * variable[i].abs() + self.tol_abs_error[i]
            {
                return false;
            }
        }
        true
    }

    /// Calculate the weighted norm of an error estimate.
    ///
    /// A norm of one sits exactly on the tolerance boundary.
    pub fn calc_norm(&self, variable: &DVector<T>, error: &DVector<T>) -> T {
        let mut sum = T::zero();
        for i in 0..variable.nrows() {
            let weighted = error[i]
                / (self.tol_rel_error[i] * variable[i].abs() + self.tol_abs_error[i]);
            sum = sum + weighted * weighted;
        }
        self.norm_weight * sum.sqrt()
    }

    /// Set the relative error tolerances.
    ///
    /// # Errors
    ///
    /// `NumError::SizeMismatch` if the size differs from the reference,
    /// `NumError::InvalidArgument` if any element is negative.
    pub fn tol_rel_error(mut self, value: DVector<T>) -> Result<Self, NumError> {
        if value.nrows() != self.tol_rel_error.nrows() {
            return Err(NumError::SizeMismatch {
                expected: self.tol_rel_error.nrows(),
                actual: value.nrows(),
            });
        }
        if value.iter().any(|element| *element < T::zero()) {
            return Err(NumError::invalid_argument(
                "relative error tolerances must be non-negative",
            ));
        }
        self.tol_rel_error = value;
        Ok(self)
    }

    /// Set the absolute error tolerances.
    ///
    /// # Errors
    ///
    /// `NumError::SizeMismatch` if the size differs from the reference,
    /// `NumError::InvalidArgument` if any element is negative.
    pub fn tol_abs_error(mut self, value: DVector<T>) -> Result<Self, NumError> {
        if value.nrows() != self.tol_abs_error.nrows() {
            return Err(NumError::SizeMismatch {
                expected: self.tol_abs_error.nrows(),
                actual: value.nrows(),
            });
        }
        if value.iter().any(|element| *element < T::zero()) {
            return Err(NumError::invalid_argument(
                "absolute error tolerances must be non-negative",
            ));
        }
        self.tol_abs_error = value;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_check_within_tolerances() {
        let reference = DVector::from_vec(vec![1.0, 1.0]);
        let tolerances = ErrorTolerances::new(&reference);

        let variable = DVector::from_vec(vec![1.0, -2.0]);
        let small_error = DVector::from_vec(vec![1e-5, 1e-5]);
        let large_error = DVector::from_vec(vec![1e-2, 1e-5]);

        assert!(tolerances.check(&variable, &small_error));
        assert!(!tolerances.check(&variable, &large_error));
    }

    #[test]
    fn test_calc_norm_is_one_on_boundary() {
        let reference = DVector::from_vec(vec![0.0, 0.0]);
        let tolerances = ErrorTolerances::new(&reference);

        // With zero variables the bound is the absolute tolerance alone.
        let variable = DVector::from_vec(vec![0.0, 0.0]);
        let error = DVector::from_vec(vec![1e-4, 1e-4]);

        assert_relative_eq!(tolerances.calc_norm(&variable, &error), 1.0);
    }

    #[test]
    fn test_custom_tolerances() {
        let reference = DVector::from_vec(vec![1.0, 1.0]);
        let tolerances = ErrorTolerances::new(&reference)
            .tol_rel_error(DVector::from_vec(vec![1e-8, 1e-8]))
            .unwrap()
            .tol_abs_error(DVector::from_vec(vec![1e-8, 1e-8]))
            .unwrap();

        let variable = DVector::from_vec(vec![1.0, 1.0]);
        let error = DVector::from_vec(vec![1e-6, 1e-6]);
        assert!(!tolerances.check(&variable, &error));
    }

    #[test]
    fn test_invalid_tolerances_are_rejected() {
        let reference = DVector::from_vec(vec![1.0, 1.0]);

        assert!(matches!(
            ErrorTolerances::new(&reference).tol_rel_error(DVector::from_vec(vec![1e-4])),
            Err(NumError::SizeMismatch { .. })
        ));
        assert!(matches!(
            ErrorTolerances::new(&reference)
                .tol_abs_error(DVector::from_vec(vec![-1e-4, 1e-4])),
            Err(NumError::InvalidArgument { .. })
        ));
    }
}
