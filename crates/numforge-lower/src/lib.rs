//! # numforge-lower
//!
//! Compiles symbolic expressions into callable element-wise numeric
//! functions.
//!
//! The pipeline is one-way:
//!
//! ```text
//! expression --Lowerer (OperatorRegistry, ConstantRegistry)--> Ir --assemble--> CompiledFunction
//! ```
//!
//! The lowered [`Ir`] is a tree interpreted over `numforge-array` values;
//! no source text is generated or executed at any point.
//!
//! ## Quick Start
//!
//! ```rust
//! use numforge_core::ExprArena;
//! use numforge_lower::{compile, ArenaExpr};
//!
//! let mut arena = ExprArena::new();
//! let x = arena.symbol("x");
//! let y = arena.symbol("y");
//! let sx = arena.call("sin", &[x]);
//! let cy = arena.call("cos", &[y]);
//! let expr = arena.add([sx, cy]);
//!
//! let f = compile(&ArenaExpr::new(&arena, expr), &["x", "y"]).unwrap();
//! assert_eq!(f.call_scalars(&[0.0, 0.0]).unwrap().real_scalar(), Some(1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assemble;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod ir;
pub mod lower;
pub mod operator;
pub mod registry;

mod proptests;

pub use assemble::{assemble, CompiledFunction};
pub use compiler::Compiler;
pub use error::{CompileError, LowerError, UnresolvedCause};
pub use expr::{ArenaExpr, SymbolicExpr};
pub use ir::{InfixOp, Ir, Literal};
pub use lower::{FoldPolicy, Lowerer};
pub use operator::OperatorKind;
pub use registry::{ConstantRegistry, LoweringRule, OperatorRegistry};

/// Lowers `expr` with the standard registries.
///
/// # Errors
///
/// See [`Lowerer::lower`].
pub fn lower<E, S>(expr: &E, variables: &[S]) -> Result<Ir, LowerError>
where
    E: SymbolicExpr,
    S: AsRef<str>,
{
    Lowerer::new(OperatorRegistry::standard(), ConstantRegistry::standard()).lower(expr, variables)
}

/// Compiles `expr` into a function of `variables` with the standard
/// registries.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile<E, S>(expr: &E, variables: &[S]) -> Result<CompiledFunction, CompileError>
where
    E: SymbolicExpr,
    S: AsRef<str>,
{
    Compiler::new().compile(expr, variables)
}
