//! Scalar trait for real scalar types.

use num_traits::Float;
use std::fmt::Debug;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

/// Trait for real scalar types supported by numkit.
///
/// This trait wraps `num_traits::Float` with additional bounds required by
/// the solvers. `Float` supplies the arithmetic, the elementary functions
/// (`exp`, `ln`, `sqrt`, ...), and the special values (`epsilon`,
/// `infinity`, `nan`) that generic code queries.
pub trait Scalar:
    Float + Debug + Default + AddAssign + SubAssign + MulAssign + DivAssign + 'static
{
    /// Convert a coefficient given as `f64` into this type.
    fn cast(value: f64) -> Self;

    /// Default truncation point of the double-exponential rule on a
    /// semi-infinite range.
    fn de_max_point() -> Self;

    /// Default truncation point of the tanh rule.
    ///
    /// The useful truncation point depends on the precision of the type,
    /// since the rule converges only single-exponentially.
    fn tanh_max_point() -> Self;
}

impl Scalar for f32 {
    fn cast(value: f64) -> Self {
        value as f32
    }

    fn de_max_point() -> Self {
        3.0
    }

    fn tanh_max_point() -> Self {
        7.0
    }
}

impl Scalar for f64 {
    fn cast(value: f64) -> Self {
        value
    }

    fn de_max_point() -> Self {
        4.0
    }

    fn tanh_max_point() -> Self {
        16.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast() {
        assert_eq!(<f64 as Scalar>::cast(1.25), 1.25);
        assert_eq!(<f32 as Scalar>::cast(1.25), 1.25f32);
    }

    #[test]
    fn test_special_values_pass_through() {
        assert!(f64::epsilon() > 0.0);
        assert!(f64::infinity().is_infinite());
        assert!(f64::nan().is_nan());
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(f64::default(), 0.0);
        assert_eq!(f32::default(), 0.0f32);
    }
}
