//! Operator identities.
//!
//! [`OperatorKind`] is the closed set of operator identities the compiler
//! understands. Upstream expression models are translated into it by an
//! adapter (see [`crate::expr`]), so registries never depend on how a
//! particular algebra system names its operators.

use std::fmt;

use numforge_core::FunctionId;

/// Identity of an interior expression node's operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    // Arithmetic
    /// n-ary addition.
    Add,
    /// Binary subtraction.
    Sub,
    /// n-ary multiplication.
    Mul,
    /// Binary division.
    Div,
    /// Exponentiation.
    Pow,
    /// Unary negation.
    Neg,

    // Elementary functions
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Inverse sine.
    Asin,
    /// Inverse cosine.
    Acos,
    /// Inverse tangent.
    Atan,
    /// Hyperbolic sine.
    Sinh,
    /// Hyperbolic cosine.
    Cosh,
    /// Hyperbolic tangent.
    Tanh,
    /// Inverse hyperbolic sine.
    Asinh,
    /// Inverse hyperbolic cosine.
    Acosh,
    /// Inverse hyperbolic tangent.
    Atanh,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
    /// Base-10 logarithm.
    Log10,
    /// Square root.
    Sqrt,
    /// Absolute value.
    Abs,

    // Relations
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,

    /// A function of the upstream model outside this enumeration.
    Foreign(FunctionId),
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorKind::Foreign(id) => write!(f, "foreign#{id}"),
            other => write!(f, "{}", format!("{other:?}").to_lowercase()),
        }
    }
}
