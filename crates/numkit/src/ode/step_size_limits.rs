//! Limits of step sizes.

use crate::error::NumError;
use crate::scalar::Scalar;

const DEFAULT_UPPER_LIMIT: f64 = 1e+2;
const DEFAULT_LOWER_LIMIT: f64 = 1e-4;

/// Upper and lower limits of step sizes.
#[derive(Debug, Clone, Copy)]
pub struct StepSizeLimits<T: Scalar> {
    upper_limit: T,
    lower_limit: T,
}

impl<T: Scalar> StepSizeLimits<T> {
    /// Create limits with default values.
    pub fn new() -> Self {
        Self {
            upper_limit: T::cast(DEFAULT_UPPER_LIMIT),
            lower_limit: T::cast(DEFAULT_LOWER_LIMIT),
        }
    }

    /// Clamp a step size into the limits.
    pub fn apply(&self, value: T) -> T {
        if value < self.lower_limit {
            return self.lower_limit;
        }
        if value > self.upper_limit {
            return self.upper_limit;
        }
        value
    }

    /// Get the upper limit.
    pub fn upper_limit(&self) -> T {
        self.upper_limit
    }

    /// Get the lower limit.
    pub fn lower_limit(&self) -> T {
        self.lower_limit
    }

    /// Set the upper limit.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` unless `lower_limit < value`.
    pub fn set_upper_limit(mut self, value: T) -> Result<Self, NumError> {
        if value <= self.lower_limit {
            return Err(NumError::invalid_argument(
                "0 < lower_limit < upper_limit must be satisfied",
            ));
        }
        self.upper_limit = value;
        Ok(self)
    }

    /// Set the lower limit.
    ///
    /// # Errors
    ///
    /// `NumError::InvalidArgument` unless `0 < value < upper_limit`.
    pub fn set_lower_limit(mut self, value: T) -> Result<Self, NumError> {
        if value <= T::zero() || self.upper_limit <= value {
            return Err(NumError::invalid_argument(
                "0 < lower_limit < upper_limit must be satisfied",
            ));
        }
        self.lower_limit = value;
        Ok(self)
    }
}

impl<T: Scalar> Default for StepSizeLimits<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_clamps() {
        let limits = StepSizeLimits::<f64>::new();

        assert_eq!(limits.apply(1.0), 1.0);
        assert_eq!(limits.apply(1e-6), limits.lower_limit());
        assert_eq!(limits.apply(1e+6), limits.upper_limit());
    }

    #[test]
    fn test_set_limits() {
        let limits = StepSizeLimits::<f64>::new()
            .set_upper_limit(10.0)
            .unwrap()
            .set_lower_limit(1e-2)
            .unwrap();

        assert_eq!(limits.upper_limit(), 10.0);
        assert_eq!(limits.lower_limit(), 1e-2);
    }

    #[test]
    fn test_invalid_limits_are_rejected() {
        assert!(matches!(
            StepSizeLimits::<f64>::new().set_lower_limit(-1.0),
            Err(NumError::InvalidArgument { .. })
        ));
        assert!(matches!(
            StepSizeLimits::<f64>::new().set_upper_limit(1e-6),
            Err(NumError::InvalidArgument { .. })
        ));
    }
}
