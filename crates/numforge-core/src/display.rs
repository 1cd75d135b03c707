//! Canonical printed form of expressions.
//!
//! The printed text is what downstream consumers match names and constants
//! against, so it must be stable: `x - y`, `sin(x) + cos(y)`, `-I`, `1/2`.

use std::fmt;

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

// Binding strength, loosest first.
const PREC_REL: u8 = 0;
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_PREFIX: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

/// Borrowed view of an expression that formats to its printed form.
#[derive(Clone, Copy)]
pub struct ExprDisplay<'a> {
    arena: &'a ExprArena,
    handle: ExprHandle,
}

impl ExprArena {
    /// Returns a formatter for the printed form of `handle`.
    #[must_use]
    pub fn display(&self, handle: ExprHandle) -> ExprDisplay<'_> {
        ExprDisplay {
            arena: self,
            handle,
        }
    }
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.arena, self.handle, PREC_REL)
    }
}

impl fmt::Debug for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} `{}`", self.handle, self)
    }
}

fn precedence(node: &ExprNode) -> u8 {
    match node {
        ExprNode::Integer(n) if *n < 0 => PREC_PREFIX,
        ExprNode::Integer(_) | ExprNode::Symbol(_) | ExprNode::Function { .. } => PREC_ATOM,
        ExprNode::Rational(..) | ExprNode::Mul(_) | ExprNode::Div { .. } => PREC_PRODUCT,
        ExprNode::Add(_) | ExprNode::Sub { .. } => PREC_SUM,
        ExprNode::Neg(_) => PREC_PREFIX,
        ExprNode::Pow { .. } => PREC_POWER,
        ExprNode::Relation { .. } => PREC_REL,
    }
}

fn write_expr(
    f: &mut fmt::Formatter<'_>,
    arena: &ExprArena,
    handle: ExprHandle,
    min_prec: u8,
) -> fmt::Result {
    let node = arena.get(handle);
    let parens = precedence(node) < min_prec;
    if parens {
        f.write_str("(")?;
    }

    match node {
        ExprNode::Integer(n) => write!(f, "{n}")?,
        ExprNode::Rational(num, den) => write!(f, "{num}/{den}")?,
        ExprNode::Symbol(id) => match arena.symbol_name(*id) {
            Some(name) => f.write_str(name)?,
            None => write!(f, "sym#{id}")?,
        },
        ExprNode::Add(args) => write_joined(f, arena, args, " + ", PREC_SUM)?,
        ExprNode::Mul(args) => write_joined(f, arena, args, "*", PREC_PRODUCT)?,
        ExprNode::Sub { lhs, rhs } => {
            write_expr(f, arena, *lhs, PREC_SUM)?;
            f.write_str(" - ")?;
            write_expr(f, arena, *rhs, PREC_PRODUCT)?;
        }
        ExprNode::Div { num, den } => {
            write_expr(f, arena, *num, PREC_PRODUCT)?;
            f.write_str("/")?;
            write_expr(f, arena, *den, PREC_PREFIX)?;
        }
        ExprNode::Pow { base, exp } => {
            write_expr(f, arena, *base, PREC_ATOM)?;
            f.write_str("^")?;
            write_expr(f, arena, *exp, PREC_POWER)?;
        }
        ExprNode::Neg(arg) => {
            f.write_str("-")?;
            write_expr(f, arena, *arg, PREC_POWER)?;
        }
        ExprNode::Function { id, args } => {
            match arena.function_name(*id) {
                Some(name) => f.write_str(name)?,
                None => write!(f, "fn#{id}")?,
            }
            f.write_str("(")?;
            write_joined(f, arena, args, ", ", PREC_REL)?;
            f.write_str(")")?;
        }
        ExprNode::Relation { op, lhs, rhs } => {
            write_expr(f, arena, *lhs, PREC_SUM)?;
            write!(f, " {op} ")?;
            write_expr(f, arena, *rhs, PREC_SUM)?;
        }
    }

    if parens {
        f.write_str(")")?;
    }
    Ok(())
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    arena: &ExprArena,
    args: &[ExprHandle],
    sep: &str,
    min_prec: u8,
) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write_expr(f, arena, *arg, min_prec)?;
    }
    Ok(())
}
