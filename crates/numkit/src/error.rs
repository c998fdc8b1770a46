//! Error types for numkit.

use thiserror::Error;

/// Errors that can occur in numkit operations.
#[derive(Debug, Error)]
pub enum NumError {
    /// Differentiation was requested for an output without a graph node.
    #[error("the output variable has no computation graph node (it is a constant)")]
    NoGraphNode,

    /// A column vector was required.
    #[error("expected a column vector, got a {rows}x{cols} matrix")]
    NotColumnVector { rows: usize, cols: usize },

    /// Mismatched sizes between related vectors.
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// An invalid configuration value was given.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The Jacobian matrix could not be inverted.
    #[error("the Jacobian matrix is singular")]
    SingularJacobian,
}

impl NumError {
    /// Shorthand for an `InvalidArgument` error with the given message.
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
