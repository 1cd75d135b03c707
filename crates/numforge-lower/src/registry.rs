//! Operator and constant registries.
//!
//! Both registries are plain immutable values. "Extending" one means
//! building a new registry from an existing one; the process-wide standard
//! tables are never mutated.

use std::fmt;
use std::sync::Arc;

use numforge_array::Kernel;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::ir::{InfixOp, Ir, Literal};
use crate::operator::OperatorKind;

/// How an operator's lowered operands are assembled into its fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoweringRule {
    /// Call a runtime kernel with the operands as arguments.
    Call(Kernel),
    /// Join the operands with an infix operator.
    Infix(InfixOp),
}

impl LoweringRule {
    /// Builds the parent fragment from already-lowered operands.
    #[must_use]
    pub fn assemble(self, operands: Vec<Ir>) -> Ir {
        match self {
            LoweringRule::Call(kernel) => Ir::Call {
                kernel,
                args: operands,
            },
            LoweringRule::Infix(op) => Ir::Infix { op, operands },
        }
    }
}

impl fmt::Display for LoweringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoweringRule::Call(kernel) => write!(f, "call {kernel}"),
            LoweringRule::Infix(op) => write!(f, "infix {}", op.token()),
        }
    }
}

static STANDARD_OPERATORS: Lazy<Arc<OperatorRegistry>> = Lazy::new(|| {
    use Kernel as K;
    use OperatorKind as Op;

    let rules = [
        (Op::Add, LoweringRule::Infix(InfixOp::Add)),
        (Op::Sub, LoweringRule::Infix(InfixOp::Sub)),
        (Op::Mul, LoweringRule::Infix(InfixOp::Mul)),
        (Op::Div, LoweringRule::Infix(InfixOp::Div)),
        (Op::Neg, LoweringRule::Call(K::Negative)),
        // Complex-safe: negative bases and radicands promote to complex.
        (Op::Pow, LoweringRule::Call(K::Power)),
        (Op::Sqrt, LoweringRule::Call(K::Sqrt)),
        (Op::Sin, LoweringRule::Call(K::Sin)),
        (Op::Cos, LoweringRule::Call(K::Cos)),
        (Op::Tan, LoweringRule::Call(K::Tan)),
        (Op::Asin, LoweringRule::Call(K::Arcsin)),
        (Op::Acos, LoweringRule::Call(K::Arccos)),
        (Op::Atan, LoweringRule::Call(K::Arctan)),
        (Op::Sinh, LoweringRule::Call(K::Sinh)),
        (Op::Cosh, LoweringRule::Call(K::Cosh)),
        (Op::Tanh, LoweringRule::Call(K::Tanh)),
        (Op::Asinh, LoweringRule::Call(K::Arcsinh)),
        (Op::Acosh, LoweringRule::Call(K::Arccosh)),
        (Op::Atanh, LoweringRule::Call(K::Arctanh)),
        (Op::Exp, LoweringRule::Call(K::Exp)),
        (Op::Ln, LoweringRule::Call(K::Log)),
        (Op::Log10, LoweringRule::Call(K::Log10)),
        (Op::Abs, LoweringRule::Call(K::Abs)),
    ];
    Arc::new(OperatorRegistry::from_rules(rules))
});

// `-I` is only reached by adapters that print a negated unit as a single
// leaf; arena expressions lower `Neg(I)` through the `Neg` rule.
static STANDARD_CONSTANTS: Lazy<Arc<ConstantRegistry>> = Lazy::new(|| {
    Arc::new(ConstantRegistry::from_literals([
        ("I", Literal::imaginary_unit()),
        ("-I", Literal::Complex(-numforge_core::Complex64::i())),
    ]))
});

/// Immutable map from operator identity to lowering rule.
#[derive(Clone, Debug, Default)]
pub struct OperatorRegistry {
    rules: FxHashMap<OperatorKind, LoweringRule>,
}

impl OperatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table: arithmetic and the elementary functions.
    #[must_use]
    pub fn standard() -> &'static OperatorRegistry {
        &**STANDARD_OPERATORS
    }

    /// The standard table as a shared handle.
    pub(crate) fn standard_shared() -> Arc<OperatorRegistry> {
        Arc::clone(&*STANDARD_OPERATORS)
    }

    /// Builds a registry from `(operator, rule)` pairs; later pairs win.
    pub fn from_rules(rules: impl IntoIterator<Item = (OperatorKind, LoweringRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Returns a new registry with `rule` registered for `op`.
    #[must_use]
    pub fn with_rule(mut self, op: OperatorKind, rule: LoweringRule) -> Self {
        self.rules.insert(op, rule);
        self
    }

    /// Returns a new registry without an entry for `op`.
    #[must_use]
    pub fn without(mut self, op: OperatorKind) -> Self {
        self.rules.remove(&op);
        self
    }

    /// Looks up the rule for `op`.
    #[must_use]
    pub fn rule_for(&self, op: OperatorKind) -> Option<LoweringRule> {
        self.rules.get(&op).copied()
    }

    /// Number of registered operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no operator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Immutable map from printed text to a runtime literal.
///
/// Covers symbols whose numeric meaning cannot come from generic numeric
/// evaluation, such as the imaginary unit.
#[derive(Clone, Debug, Default)]
pub struct ConstantRegistry {
    literals: FxHashMap<String, Literal>,
}

impl ConstantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table: `I` and `-I`.
    #[must_use]
    pub fn standard() -> &'static ConstantRegistry {
        &**STANDARD_CONSTANTS
    }

    /// The standard table as a shared handle.
    pub(crate) fn standard_shared() -> Arc<ConstantRegistry> {
        Arc::clone(&*STANDARD_CONSTANTS)
    }

    /// Builds a registry from `(text, literal)` pairs; later pairs win.
    pub fn from_literals<S: Into<String>>(literals: impl IntoIterator<Item = (S, Literal)>) -> Self {
        Self {
            literals: literals
                .into_iter()
                .map(|(text, lit)| (text.into(), lit))
                .collect(),
        }
    }

    /// Returns a new registry with `text` mapped to `literal`.
    #[must_use]
    pub fn with_literal(mut self, text: impl Into<String>, literal: Literal) -> Self {
        self.literals.insert(text.into(), literal);
        self
    }

    /// Looks up the literal for a printed form.
    #[must_use]
    pub fn literal_for(&self, text: &str) -> Option<Literal> {
        self.literals.get(text).copied()
    }

    /// Number of registered constants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Returns true if no constant is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numforge_core::Complex64;

    #[test]
    fn test_standard_operators() {
        let ops = OperatorRegistry::standard();
        assert_eq!(
            ops.rule_for(OperatorKind::Add),
            Some(LoweringRule::Infix(InfixOp::Add))
        );
        assert_eq!(
            ops.rule_for(OperatorKind::Pow),
            Some(LoweringRule::Call(Kernel::Power))
        );
        assert_eq!(
            ops.rule_for(OperatorKind::Acosh),
            Some(LoweringRule::Call(Kernel::Arccosh))
        );
        assert_eq!(ops.rule_for(OperatorKind::Eq), None);
        assert_eq!(ops.rule_for(OperatorKind::Foreign(64)), None);
    }

    #[test]
    fn test_extension_leaves_standard_untouched() {
        let extended = OperatorRegistry::standard()
            .clone()
            .with_rule(OperatorKind::Foreign(64), LoweringRule::Call(Kernel::Exp));

        assert_eq!(
            extended.rule_for(OperatorKind::Foreign(64)),
            Some(LoweringRule::Call(Kernel::Exp))
        );
        assert_eq!(extended.len(), OperatorRegistry::standard().len() + 1);
        assert_eq!(
            OperatorRegistry::standard().rule_for(OperatorKind::Foreign(64)),
            None
        );

        let reduced = extended.without(OperatorKind::Sin);
        assert_eq!(reduced.rule_for(OperatorKind::Sin), None);
        assert!(OperatorRegistry::standard()
            .rule_for(OperatorKind::Sin)
            .is_some());
    }

    #[test]
    fn test_standard_constants() {
        let constants = ConstantRegistry::standard();
        assert_eq!(
            constants.literal_for("I"),
            Some(Literal::Complex(Complex64::new(0.0, 1.0)))
        );
        assert_eq!(
            constants.literal_for("-I"),
            Some(Literal::Complex(Complex64::new(0.0, -1.0)))
        );
        assert_eq!(constants.literal_for("pi"), None);

        let custom = ConstantRegistry::new().with_literal("half", Literal::Real(0.5));
        assert_eq!(custom.literal_for("half"), Some(Literal::Real(0.5)));
        assert!(ConstantRegistry::standard().literal_for("half").is_none());
    }
}
