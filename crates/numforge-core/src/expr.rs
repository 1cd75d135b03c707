//! Expression node types.
//!
//! This module defines the core expression types stored in the arena.

use std::fmt;

use smallvec::SmallVec;

use crate::handle::ExprHandle;

/// Unique identifier for a symbol.
pub type SymbolId = u32;

/// Unique identifier for a function.
pub type FunctionId = u32;

/// A relational operator.
///
/// Relations can be represented in the arena but have no numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelOp {
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
}

impl RelOp {
    /// Returns the printed token for this operator.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An expression node stored in the arena.
///
/// This enum represents all possible expression types. Each variant is
/// designed to be cache-friendly, using `SmallVec` for inline storage
/// of small argument lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Atoms ===
    /// A 64-bit integer literal.
    Integer(i64),

    /// A rational number (numerator, denominator).
    ///
    /// Invariant: denominator > 0, gcd(num, den) == 1.
    Rational(i64, u64),

    /// A named symbol: either a free variable or a named constant
    /// such as `pi`. The two are only told apart by name.
    Symbol(SymbolId),

    // === Compound Expressions ===
    /// Sum of expressions: a + b + c + ...
    ///
    /// Invariant: at least 2 arguments.
    Add(SmallVec<[ExprHandle; 4]>),

    /// Product of expressions: a * b * c * ...
    ///
    /// Invariant: at least 2 arguments.
    Mul(SmallVec<[ExprHandle; 4]>),

    /// Difference: lhs - rhs.
    Sub {
        /// The minuend.
        lhs: ExprHandle,
        /// The subtrahend.
        rhs: ExprHandle,
    },

    /// Power expression: base^exp.
    Pow {
        /// The base of the power.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// Negation: -expr.
    Neg(ExprHandle),

    /// Division: numerator / denominator.
    Div {
        /// The numerator.
        num: ExprHandle,
        /// The denominator.
        den: ExprHandle,
    },

    // === Functions ===
    /// A function application: f(arg1, arg2, ...).
    Function {
        /// The function identifier.
        id: FunctionId,
        /// The arguments.
        args: SmallVec<[ExprHandle; 2]>,
    },

    // === Relations ===
    /// A relation: lhs op rhs.
    Relation {
        /// The relational operator.
        op: RelOp,
        /// Left-hand side.
        lhs: ExprHandle,
        /// Right-hand side.
        rhs: ExprHandle,
    },
}

impl ExprNode {
    /// Returns true if this node is an atom (no children).
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            ExprNode::Integer(_) | ExprNode::Rational(_, _) | ExprNode::Symbol(_)
        )
    }

    /// Returns the children of this node, in source order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 4]> {
        match self {
            ExprNode::Integer(_) | ExprNode::Rational(_, _) | ExprNode::Symbol(_) => {
                SmallVec::new()
            }
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Sub { lhs, rhs } | ExprNode::Relation { lhs, rhs, .. } => {
                smallvec::smallvec![*lhs, *rhs]
            }
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Neg(arg) => smallvec::smallvec![*arg],
            ExprNode::Div { num, den } => smallvec::smallvec![*num, *den],
            ExprNode::Function { args, .. } => args.iter().copied().collect(),
        }
    }
}

/// Standard function identifiers.
///
/// Ids below [`functions::FIRST_USER`] are reserved for these; functions
/// interned by name through the arena receive ids from `FIRST_USER` upward.
pub mod functions {
    use super::FunctionId;

    /// Sine function.
    pub const SIN: FunctionId = 0;
    /// Cosine function.
    pub const COS: FunctionId = 1;
    /// Tangent function.
    pub const TAN: FunctionId = 2;
    /// Natural exponential.
    pub const EXP: FunctionId = 3;
    /// Natural logarithm.
    pub const LN: FunctionId = 4;
    /// Logarithm base 10.
    pub const LOG10: FunctionId = 5;
    /// Square root.
    pub const SQRT: FunctionId = 6;
    /// Absolute value.
    pub const ABS: FunctionId = 7;
    /// Inverse sine.
    pub const ASIN: FunctionId = 8;
    /// Inverse cosine.
    pub const ACOS: FunctionId = 9;
    /// Inverse tangent.
    pub const ATAN: FunctionId = 10;
    /// Hyperbolic sine.
    pub const SINH: FunctionId = 11;
    /// Hyperbolic cosine.
    pub const COSH: FunctionId = 12;
    /// Hyperbolic tangent.
    pub const TANH: FunctionId = 13;
    /// Inverse hyperbolic sine.
    pub const ASINH: FunctionId = 14;
    /// Inverse hyperbolic cosine.
    pub const ACOSH: FunctionId = 15;
    /// Inverse hyperbolic tangent.
    pub const ATANH: FunctionId = 16;

    /// First id handed out to functions interned by name.
    pub const FIRST_USER: FunctionId = 64;

    /// Printed names of the standard functions, indexed by id.
    pub const STANDARD_NAMES: [&str; 17] = [
        "sin", "cos", "tan", "exp", "ln", "log10", "sqrt", "abs", "asin", "acos", "atan",
        "sinh", "cosh", "tanh", "asinh", "acosh", "atanh",
    ];

    /// Returns the printed name of a standard function.
    #[must_use]
    pub fn standard_name(id: FunctionId) -> Option<&'static str> {
        STANDARD_NAMES.get(id as usize).copied()
    }

    /// Looks up a standard function by its printed name.
    #[must_use]
    pub fn standard_id(name: &str) -> Option<FunctionId> {
        STANDARD_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| i as FunctionId)
    }
}
