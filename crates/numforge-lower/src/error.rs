//! Compilation errors.

use std::fmt;

use numforge_core::NumericError;
use thiserror::Error;

/// Which kind of node could not be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnresolvedCause {
    /// An interior node with no lowering rule and no numeric value.
    Operator,
    /// A leaf that is neither a number, a registered constant nor a
    /// declared variable.
    Leaf,
}

impl fmt::Display for UnresolvedCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedCause::Operator => f.write_str("unresolved operator"),
            UnresolvedCause::Leaf => f.write_str("unresolved leaf"),
        }
    }
}

/// A sub-expression the lowering engine could not translate.
///
/// Lowering is all-or-nothing: this error carries the printed form of the
/// first offending sub-expression and no partial result.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unrecognized expression: {expr} ({cause})")]
pub struct LowerError {
    /// Why the node was rejected.
    pub cause: UnresolvedCause,
    /// Printed form of the offending sub-expression.
    pub expr: String,
    /// Why constant folding did not apply, when it was attempted.
    #[source]
    pub fold_failure: Option<NumericError>,
}

impl LowerError {
    /// Returns true for an unresolved interior node.
    #[must_use]
    pub fn is_unresolved_operator(&self) -> bool {
        self.cause == UnresolvedCause::Operator
    }

    /// Returns true for an unresolved leaf.
    #[must_use]
    pub fn is_unresolved_leaf(&self) -> bool {
        self.cause == UnresolvedCause::Leaf
    }
}

/// Errors from [`Compiler::compile`](crate::Compiler::compile).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The expression could not be lowered.
    #[error(transparent)]
    Lower(#[from] LowerError),

    /// A variable name was declared more than once.
    #[error("variable `{0}` is declared more than once")]
    DuplicateVariable(String),
}

impl CompileError {
    /// The lowering failure, if that is what this is.
    #[must_use]
    pub fn as_lower(&self) -> Option<&LowerError> {
        match self {
            CompileError::Lower(err) => Some(err),
            CompileError::DuplicateVariable(_) => None,
        }
    }
}
