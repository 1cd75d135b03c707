//! The lowering engine.
//!
//! Each node is resolved by the first matching step, in this order:
//!
//! 1. an interior node whose operator has a rule: lower the operands in
//!    source order and let the rule assemble them. A kernel rule whose
//!    arity differs from the operand count is an error;
//! 2. a printed form found in the constant registry: its literal;
//! 3. constant folding: the node's numeric value, when it has one;
//! 4. a printed form equal to a declared variable: a parameter reference;
//! 5. otherwise an error naming the node.
//!
//! Constants therefore shadow variables of the same name.

use tracing::{debug, trace};

use crate::error::{LowerError, UnresolvedCause};
use crate::expr::SymbolicExpr;
use crate::ir::{Ir, Literal};
use crate::registry::{ConstantRegistry, LoweringRule, OperatorRegistry};

/// Which nodes may be replaced by their numeric value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FoldPolicy {
    /// Any node without a rule folds if it evaluates numerically, so an
    /// unregistered function of constants (`gamma(3)`) still compiles.
    #[default]
    Permissive,
    /// Only leaves fold. An interior node must have a rule.
    LiteralsOnly,
}

impl FoldPolicy {
    fn allows(self, is_leaf: bool) -> bool {
        match self {
            FoldPolicy::Permissive => true,
            FoldPolicy::LiteralsOnly => is_leaf,
        }
    }
}

/// Recursive translator from a symbolic expression to [`Ir`].
///
/// Holds only shared references to its registries; each call to
/// [`Lowerer::lower`] works on local state.
#[derive(Clone, Copy, Debug)]
pub struct Lowerer<'r> {
    operators: &'r OperatorRegistry,
    constants: &'r ConstantRegistry,
    fold: FoldPolicy,
}

impl<'r> Lowerer<'r> {
    /// Creates a lowerer over the given registries with permissive folding.
    #[must_use]
    pub fn new(operators: &'r OperatorRegistry, constants: &'r ConstantRegistry) -> Self {
        Self {
            operators,
            constants,
            fold: FoldPolicy::default(),
        }
    }

    /// Sets the folding policy.
    #[must_use]
    pub fn with_fold_policy(mut self, fold: FoldPolicy) -> Self {
        self.fold = fold;
        self
    }

    /// Lowers `expr` with `variables` as the legal free variables.
    ///
    /// Parameter references in the result index into `variables`.
    ///
    /// # Errors
    ///
    /// Returns a [`LowerError`] for the first sub-expression that cannot be
    /// resolved; no partial result is produced.
    pub fn lower<E, S>(&self, expr: &E, variables: &[S]) -> Result<Ir, LowerError>
    where
        E: SymbolicExpr,
        S: AsRef<str>,
    {
        let names: Vec<&str> = variables.iter().map(AsRef::as_ref).collect();
        self.lower_node(expr, &names)
    }

    fn lower_node<E: SymbolicExpr>(&self, node: &E, variables: &[&str]) -> Result<Ir, LowerError> {
        let operator = node.operator();

        if let Some(op) = operator {
            if let Some(rule) = self.operators.rule_for(op) {
                let operands = node.operands();
                if let LoweringRule::Call(kernel) = rule {
                    if kernel.arity() != operands.len() {
                        let text = node.printed();
                        debug!(%text, %kernel, found = operands.len(), "kernel arity mismatch");
                        return Err(LowerError {
                            cause: UnresolvedCause::Operator,
                            expr: text,
                            fold_failure: None,
                        });
                    }
                }
                let operands = operands
                    .iter()
                    .map(|operand| self.lower_node(operand, variables))
                    .collect::<Result<Vec<_>, _>>()?;
                trace!(%op, %rule, operands = operands.len(), "applied lowering rule");
                return Ok(rule.assemble(operands));
            }
        }

        let text = node.printed();

        if let Some(literal) = self.constants.literal_for(&text) {
            trace!(%text, %literal, "registered constant");
            return Ok(Ir::Literal(literal));
        }

        let fold_failure = if self.fold.allows(operator.is_none()) {
            match node.numeric_value() {
                Ok(value) => {
                    let literal = Literal::from_complex(value);
                    trace!(%text, %literal, "folded constant");
                    return Ok(Ir::Literal(literal));
                }
                Err(reason) => Some(reason),
            }
        } else {
            None
        };

        if let Some(index) = variables.iter().position(|name| *name == text) {
            trace!(%text, index, "bound variable");
            return Ok(Ir::Param { index, name: text });
        }

        let cause = if operator.is_some() {
            UnresolvedCause::Operator
        } else {
            UnresolvedCause::Leaf
        };
        debug!(%text, %cause, "lowering failed");
        Err(LowerError {
            cause,
            expr: text,
            fold_failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ArenaExpr;
    use crate::ir::InfixOp;
    use crate::operator::OperatorKind;
    use numforge_array::Kernel;
    use numforge_core::{Complex64, ExprArena, NumericError, RelOp};

    fn standard() -> Lowerer<'static> {
        Lowerer::new(OperatorRegistry::standard(), ConstantRegistry::standard())
    }

    fn param(index: usize, name: &str) -> Ir {
        Ir::Param {
            index,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_lower_sum_of_functions() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let sx = arena.call("sin", &[x]);
        let cy = arena.call("cos", &[y]);
        let sum = arena.add([sx, cy]);

        let ir = standard().lower(&ArenaExpr::new(&arena, sum), &["x", "y"]).unwrap();
        assert_eq!(
            ir,
            Ir::Infix {
                op: InfixOp::Add,
                operands: vec![
                    Ir::Call {
                        kernel: Kernel::Sin,
                        args: vec![param(0, "x")],
                    },
                    Ir::Call {
                        kernel: Kernel::Cos,
                        args: vec![param(1, "y")],
                    },
                ],
            }
        );
        assert_eq!(ir.to_string(), "(sin(x) + cos(y))");
    }

    #[test]
    fn test_parameter_index_follows_declaration_order() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let diff = arena.sub(x, y);

        let ir = standard().lower(&ArenaExpr::new(&arena, diff), &["y", "x"]).unwrap();
        assert_eq!(
            ir,
            Ir::Infix {
                op: InfixOp::Sub,
                operands: vec![param(1, "x"), param(0, "y")],
            }
        );
    }

    #[test]
    fn test_imaginary_unit_uses_constant_registry() {
        let mut arena = ExprArena::new();
        let i = arena.symbol("I");
        let ir = standard().lower(&ArenaExpr::new(&arena, i), &["I"]).unwrap();
        assert_eq!(ir, Ir::Literal(Literal::Complex(Complex64::new(0.0, 1.0))));
    }

    /// A node known only by its printed form.
    struct PrintedLeaf(&'static str);

    impl SymbolicExpr for PrintedLeaf {
        fn operator(&self) -> Option<OperatorKind> {
            None
        }

        fn operands(&self) -> Vec<Self> {
            Vec::new()
        }

        fn numeric_value(&self) -> Result<Complex64, NumericError> {
            Err(NumericError::NotNumeric(self.0.to_string()))
        }

        fn printed(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_negated_unit_printed_as_leaf() {
        let ir = standard().lower(&PrintedLeaf("-I"), &["x"]).unwrap();
        assert_eq!(ir, Ir::Literal(Literal::Complex(Complex64::new(0.0, -1.0))));

        let err = standard().lower(&PrintedLeaf("-J"), &["x"]).unwrap_err();
        assert!(err.is_unresolved_leaf());
        assert_eq!(
            err.fold_failure,
            Some(NumericError::NotNumeric("-J".to_string()))
        );
    }

    #[test]
    fn test_constants_shadow_variables() {
        let mut arena = ExprArena::new();
        let pi = arena.symbol("pi");

        let ir = standard().lower(&ArenaExpr::new(&arena, pi), &["pi"]).unwrap();
        assert_eq!(ir, Ir::Literal(Literal::Real(std::f64::consts::PI)));

        let custom = ConstantRegistry::new().with_literal("x", Literal::Real(2.0));
        let x = arena.symbol("x");
        let ir = Lowerer::new(OperatorRegistry::standard(), &custom)
            .lower(&ArenaExpr::new(&arena, x), &["x"])
            .unwrap();
        assert_eq!(ir, Ir::Literal(Literal::Real(2.0)));
    }

    #[test]
    fn test_undeclared_variable() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let sum = arena.add([x, y]);

        let err = standard()
            .lower(&ArenaExpr::new(&arena, sum), &["x"])
            .unwrap_err();
        assert!(err.is_unresolved_leaf());
        assert_eq!(err.expr, "y");
        assert_eq!(
            err.fold_failure,
            Some(NumericError::FreeSymbol("y".to_string()))
        );
    }

    #[test]
    fn test_relation_is_unresolved_operator() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let rel = arena.relation(RelOp::Eq, x, y);

        let err = standard()
            .lower(&ArenaExpr::new(&arena, rel), &["x", "y"])
            .unwrap_err();
        assert!(err.is_unresolved_operator());
        assert_eq!(err.expr, "x == y");
    }

    #[test]
    fn test_fold_policy() {
        let mut arena = ExprArena::new();
        let three = arena.integer(3);
        let x = arena.symbol("x");
        let gamma_const = arena.call("gamma", &[three]);
        let gamma_x = arena.call("gamma", &[x]);

        // No numeric definition for gamma: both policies fail.
        let err = standard()
            .lower(&ArenaExpr::new(&arena, gamma_const), &["x"])
            .unwrap_err();
        assert!(err.is_unresolved_operator());
        assert_eq!(
            err.fold_failure,
            Some(NumericError::UnknownFunction("gamma".to_string()))
        );

        // An unregistered standard function of constants folds only when permitted.
        let ops = OperatorRegistry::standard().clone().without(OperatorKind::Sqrt);
        let four = arena.integer(4);
        let root = arena.call("sqrt", &[four]);
        let permissive = Lowerer::new(&ops, ConstantRegistry::standard());
        assert_eq!(
            permissive.lower(&ArenaExpr::new(&arena, root), &["x"]).unwrap(),
            Ir::Literal(Literal::Real(2.0))
        );

        let strict = permissive.with_fold_policy(FoldPolicy::LiteralsOnly);
        let err = strict
            .lower(&ArenaExpr::new(&arena, root), &["x"])
            .unwrap_err();
        assert!(err.is_unresolved_operator());
        assert_eq!(err.fold_failure, None);

        let err = strict
            .lower(&ArenaExpr::new(&arena, gamma_x), &["x"])
            .unwrap_err();
        assert_eq!(err.expr, "gamma(x)");
    }

    #[test]
    fn test_kernel_arity_checked_when_lowering() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let two_args = arena.call("sin", &[x, y]);

        let err = standard()
            .lower(&ArenaExpr::new(&arena, two_args), &["x", "y"])
            .unwrap_err();
        assert!(err.is_unresolved_operator());
        assert_eq!(err.expr, "sin(x, y)");
        assert_eq!(err.fold_failure, None);

        // A foreign binary function mapped onto a unary kernel.
        let id = arena.intern_function("hypotish");
        let call = arena.apply(id, &[x, y]);
        let ops = OperatorRegistry::standard()
            .clone()
            .with_rule(OperatorKind::Foreign(id), LoweringRule::Call(Kernel::Abs));
        let err = Lowerer::new(&ops, ConstantRegistry::standard())
            .lower(&ArenaExpr::new(&arena, call), &["x", "y"])
            .unwrap_err();
        assert!(err.is_unresolved_operator());
        assert_eq!(err.expr, "hypotish(x, y)");
    }

    #[test]
    fn test_registered_foreign_function() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let id = arena.intern_function("expm");
        let call = arena.apply(id, &[x]);

        let ops = OperatorRegistry::standard()
            .clone()
            .with_rule(OperatorKind::Foreign(id), LoweringRule::Call(Kernel::Exp));
        let ir = Lowerer::new(&ops, ConstantRegistry::standard())
            .lower(&ArenaExpr::new(&arena, call), &["x"])
            .unwrap();
        assert_eq!(
            ir,
            Ir::Call {
                kernel: Kernel::Exp,
                args: vec![param(0, "x")],
            }
        );
    }
}
