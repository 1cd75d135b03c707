//! Intermediate representation of lowered expressions.
//!
//! An [`Ir`] tree is the executable form of an expression: literals,
//! positional parameter references, kernel calls and infix chains. It is
//! interpreted directly over [`Value`]s. Its `Display` form reads like
//! array-language source and exists for diagnostics only.

use std::fmt;

use numforge_array::{EvalError, Kernel, Value};
use numforge_core::Complex64;

/// A literal of the target runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    /// Real number.
    Real(f64),
    /// Complex number.
    Complex(Complex64),
}

impl Literal {
    /// Builds the narrowest literal for `z`: real when the imaginary part is
    /// exactly zero.
    #[must_use]
    pub fn from_complex(z: Complex64) -> Self {
        if z.im == 0.0 {
            Literal::Real(z.re)
        } else {
            Literal::Complex(z)
        }
    }

    /// The imaginary unit.
    #[must_use]
    pub fn imaginary_unit() -> Self {
        Literal::Complex(Complex64::i())
    }

    /// Converts the literal into a scalar runtime value.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Literal::Real(x) => Value::real(x),
            Literal::Complex(z) => Value::complex(z),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Real(x) => write!(f, "{x:?}"),
            Literal::Complex(z) if z.re == 0.0 => write!(f, "{}j", z.im),
            Literal::Complex(z) => write!(f, "({}{:+}j)", z.re, z.im),
        }
    }
}

/// Infix arithmetic separators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfixOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl InfixOp {
    /// Returns the separator token.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
        }
    }

    /// Value of an empty chain.
    fn identity(self) -> Value {
        match self {
            InfixOp::Add | InfixOp::Sub => Value::real(0.0),
            InfixOp::Mul | InfixOp::Div => Value::real(1.0),
        }
    }

    fn apply(self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        match self {
            InfixOp::Add => lhs.add(rhs),
            InfixOp::Sub => lhs.sub(rhs),
            InfixOp::Mul => lhs.mul(rhs),
            InfixOp::Div => lhs.div(rhs),
        }
    }
}

/// A lowered expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Ir {
    /// A constant.
    Literal(Literal),
    /// The `index`-th parameter of the assembled function.
    Param {
        /// Position in the parameter list.
        index: usize,
        /// Parameter name, kept for rendering.
        name: String,
    },
    /// A kernel applied to lowered operands.
    Call {
        /// Runtime kernel.
        kernel: Kernel,
        /// Operands, in source order.
        args: Vec<Ir>,
    },
    /// Operands joined by an infix operator, folded left to right.
    Infix {
        /// The separator.
        op: InfixOp,
        /// Operands, in source order.
        operands: Vec<Ir>,
    },
}

impl Ir {
    /// Evaluates the tree with `args` bound to the parameters by position.
    ///
    /// # Errors
    ///
    /// Propagates shape and kernel-arity errors from the runtime, and
    /// [`EvalError::Arity`] if a parameter index has no argument.
    pub fn eval(&self, args: &[Value]) -> Result<Value, EvalError> {
        match self {
            Ir::Literal(lit) => Ok(lit.to_value()),
            Ir::Param { index, .. } => args.get(*index).cloned().ok_or(EvalError::Arity {
                expected: index + 1,
                found: args.len(),
            }),
            Ir::Call { kernel, args: operands } => {
                let values = operands
                    .iter()
                    .map(|operand| operand.eval(args))
                    .collect::<Result<Vec<_>, _>>()?;
                kernel.apply(&values)
            }
            Ir::Infix { op, operands } => {
                let mut iter = operands.iter();
                let Some(first) = iter.next() else {
                    return Ok(op.identity());
                };
                let mut acc = first.eval(args)?;
                for operand in iter {
                    acc = op.apply(&acc, &operand.eval(args)?)?;
                }
                Ok(acc)
            }
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Ir::Literal(_) | Ir::Param { .. } => 1,
            Ir::Call { args: children, .. } | Ir::Infix { operands: children, .. } => {
                1 + children.iter().map(Ir::node_count).sum::<usize>()
            }
        }
    }
}

impl fmt::Display for Ir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ir::Literal(lit) => write!(f, "{lit}"),
            Ir::Param { name, .. } => f.write_str(name),
            Ir::Call { kernel, args } => {
                write!(f, "{kernel}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Ir::Infix { op, operands } => {
                f.write_str("(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.token())?;
                    }
                    write!(f, "{operand}")?;
                }
                f.write_str(")")
            }
        }
    }
}
