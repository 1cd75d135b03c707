//! The expression capability set the lowering engine consumes, and its
//! adapter for the `numforge-core` arena.

use numforge_core::expr::functions;
use numforge_core::{Complex64, ExprArena, ExprHandle, ExprNode, FunctionId, NumericError, RelOp};

use crate::operator::OperatorKind;

/// What the lowering engine needs to know about an expression node.
///
/// Implementors are cheap views into an expression owned elsewhere; the
/// engine only reads through them.
pub trait SymbolicExpr: Sized {
    /// Operator identity of an interior node, `None` for a leaf.
    fn operator(&self) -> Option<OperatorKind>;

    /// Operands in source order; empty for a leaf.
    fn operands(&self) -> Vec<Self>;

    /// Numeric value of the node, if it is closed-form.
    ///
    /// # Errors
    ///
    /// Returns why the node has no numeric value.
    fn numeric_value(&self) -> Result<Complex64, NumericError>;

    /// Canonical printed form.
    fn printed(&self) -> String;
}

/// A node of an [`ExprArena`] viewed as a [`SymbolicExpr`].
#[derive(Clone, Copy, Debug)]
pub struct ArenaExpr<'a> {
    arena: &'a ExprArena,
    handle: ExprHandle,
}

impl<'a> ArenaExpr<'a> {
    /// Views `handle` inside `arena`.
    #[must_use]
    pub fn new(arena: &'a ExprArena, handle: ExprHandle) -> Self {
        Self { arena, handle }
    }

    /// The viewed handle.
    #[must_use]
    pub fn handle(&self) -> ExprHandle {
        self.handle
    }
}

impl SymbolicExpr for ArenaExpr<'_> {
    fn operator(&self) -> Option<OperatorKind> {
        let kind = match self.arena.get(self.handle) {
            ExprNode::Integer(_) | ExprNode::Rational(..) | ExprNode::Symbol(_) => return None,
            ExprNode::Add(_) => OperatorKind::Add,
            ExprNode::Mul(_) => OperatorKind::Mul,
            ExprNode::Sub { .. } => OperatorKind::Sub,
            ExprNode::Div { .. } => OperatorKind::Div,
            ExprNode::Pow { .. } => OperatorKind::Pow,
            ExprNode::Neg(_) => OperatorKind::Neg,
            ExprNode::Function { id, .. } => function_kind(*id),
            ExprNode::Relation { op, .. } => relation_kind(*op),
        };
        Some(kind)
    }

    fn operands(&self) -> Vec<Self> {
        self.arena
            .get(self.handle)
            .children()
            .into_iter()
            .map(|child| ArenaExpr::new(self.arena, child))
            .collect()
    }

    fn numeric_value(&self) -> Result<Complex64, NumericError> {
        self.arena.numeric_value(self.handle)
    }

    fn printed(&self) -> String {
        self.arena.display(self.handle).to_string()
    }
}

fn function_kind(id: FunctionId) -> OperatorKind {
    match id {
        functions::SIN => OperatorKind::Sin,
        functions::COS => OperatorKind::Cos,
        functions::TAN => OperatorKind::Tan,
        functions::EXP => OperatorKind::Exp,
        functions::LN => OperatorKind::Ln,
        functions::LOG10 => OperatorKind::Log10,
        functions::SQRT => OperatorKind::Sqrt,
        functions::ABS => OperatorKind::Abs,
        functions::ASIN => OperatorKind::Asin,
        functions::ACOS => OperatorKind::Acos,
        functions::ATAN => OperatorKind::Atan,
        functions::SINH => OperatorKind::Sinh,
        functions::COSH => OperatorKind::Cosh,
        functions::TANH => OperatorKind::Tanh,
        functions::ASINH => OperatorKind::Asinh,
        functions::ACOSH => OperatorKind::Acosh,
        functions::ATANH => OperatorKind::Atanh,
        other => OperatorKind::Foreign(other),
    }
}

fn relation_kind(op: RelOp) -> OperatorKind {
    match op {
        RelOp::Eq => OperatorKind::Eq,
        RelOp::Ne => OperatorKind::Ne,
        RelOp::Lt => OperatorKind::Lt,
        RelOp::Le => OperatorKind::Le,
        RelOp::Gt => OperatorKind::Gt,
        RelOp::Ge => OperatorKind::Ge,
    }
}
