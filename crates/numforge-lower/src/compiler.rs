//! Compiler configuration and the end-to-end compile entry point.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, debug_span};

use crate::assemble::{assemble, CompiledFunction};
use crate::error::{CompileError, LowerError};
use crate::expr::SymbolicExpr;
use crate::ir::Ir;
use crate::lower::{FoldPolicy, Lowerer};
use crate::registry::{ConstantRegistry, OperatorRegistry};

/// Registries and policy used to compile expressions.
///
/// Cheap to clone and safe to share between threads; the registries are
/// behind `Arc`s and never mutated.
#[derive(Clone, Debug)]
pub struct Compiler {
    operators: Arc<OperatorRegistry>,
    constants: Arc<ConstantRegistry>,
    fold: FoldPolicy,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            operators: OperatorRegistry::standard_shared(),
            constants: ConstantRegistry::standard_shared(),
            fold: FoldPolicy::default(),
        }
    }
}

impl Compiler {
    /// Creates a compiler with the standard registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the operator registry.
    #[must_use]
    pub fn with_operators(mut self, operators: OperatorRegistry) -> Self {
        self.operators = Arc::new(operators);
        self
    }

    /// Replaces the constant registry.
    #[must_use]
    pub fn with_constants(mut self, constants: ConstantRegistry) -> Self {
        self.constants = Arc::new(constants);
        self
    }

    /// Sets the folding policy.
    #[must_use]
    pub fn with_fold_policy(mut self, fold: FoldPolicy) -> Self {
        self.fold = fold;
        self
    }

    /// The operator registry in use.
    #[must_use]
    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    /// The constant registry in use.
    #[must_use]
    pub fn constants(&self) -> &ConstantRegistry {
        &self.constants
    }

    /// The folding policy in use.
    #[must_use]
    pub fn fold_policy(&self) -> FoldPolicy {
        self.fold
    }

    fn lowerer(&self) -> Lowerer<'_> {
        Lowerer::new(&self.operators, &self.constants).with_fold_policy(self.fold)
    }

    /// Lowers `expr` without assembling it.
    ///
    /// # Errors
    ///
    /// See [`Lowerer::lower`].
    pub fn lower<E, S>(&self, expr: &E, variables: &[S]) -> Result<Ir, LowerError>
    where
        E: SymbolicExpr,
        S: AsRef<str>,
    {
        self.lowerer().lower(expr, variables)
    }

    /// Compiles `expr` into a function of `variables`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::DuplicateVariable`] if a name is declared
    /// twice, or [`CompileError::Lower`] if the expression references an
    /// unknown operator or an undeclared variable.
    pub fn compile<E, S>(&self, expr: &E, variables: &[S]) -> Result<CompiledFunction, CompileError>
    where
        E: SymbolicExpr,
        S: AsRef<str>,
    {
        let _span = debug_span!("compile", arity = variables.len()).entered();

        let mut seen = FxHashSet::default();
        for name in variables.iter().map(AsRef::as_ref) {
            if !seen.insert(name) {
                return Err(CompileError::DuplicateVariable(name.to_string()));
            }
        }

        let body = self.lower(expr, variables)?;
        let nodes = body.node_count();
        let function = assemble(body, variables);
        debug!(%function, nodes, "compiled expression");
        Ok(function)
    }
}
