//! Evaluation errors.

use thiserror::Error;

/// Errors raised while evaluating over array values.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A function was called with the wrong number of arguments.
    #[error("expected {expected} argument(s), got {found}")]
    Arity {
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },

    /// A kernel was applied to the wrong number of operands.
    #[error("kernel `{kernel}` takes {expected} operand(s), got {found}")]
    KernelArity {
        /// Kernel name.
        kernel: &'static str,
        /// Required operand count.
        expected: usize,
        /// Supplied operand count.
        found: usize,
    },

    /// Two operand shapes cannot be broadcast together.
    #[error("operands could not be broadcast together with shapes {lhs:?} {rhs:?}")]
    Shape {
        /// Shape of the left operand.
        lhs: Vec<usize>,
        /// Shape of the right operand.
        rhs: Vec<usize>,
    },
}
