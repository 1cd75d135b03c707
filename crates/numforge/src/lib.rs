//! # Numforge
//!
//! Turns symbolic expressions into numeric functions that evaluate
//! element-wise over scalars and n-dimensional arrays.
//!
//! ## Features
//!
//! - **Hash-consed expressions**: an arena-allocated DAG with interned names
//! - **Extensible lowering**: operator and constant registries decide how
//!   each node becomes numeric code
//! - **Complex-safe kernels**: `sqrt(-4)` is `2i`, not `NaN`
//! - **Shareable results**: compiled functions are immutable and `Send + Sync`
//!
//! ## Quick Start
//!
//! ```rust
//! use numforge::prelude::*;
//!
//! let mut arena = ExprArena::new();
//! let x = arena.symbol("x");
//! let y = arena.symbol("y");
//! let sx = arena.call("sin", &[x]);
//! let cy = arena.call("cos", &[y]);
//! let expr = arena.add([sx, cy]);
//!
//! let f = build_numeric_function(&arena, expr, &["x", "y"]).unwrap();
//! assert_eq!(f.call_scalars(&[0.0, 0.0]).unwrap().real_scalar(), Some(1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use numforge_array as array;
pub use numforge_core as core;
pub use numforge_lower as lower;

use numforge_core::{ExprArena, ExprHandle};
use numforge_lower::{ArenaExpr, CompileError, CompiledFunction, Compiler};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{build_numeric_function, build_numeric_function_with};
    pub use numforge_array::{Kernel, Value};
    pub use numforge_core::{ExprArena, ExprHandle, ExprNode};
    pub use numforge_lower::{
        CompileError, CompiledFunction, Compiler, ConstantRegistry, FoldPolicy, Literal,
        LoweringRule, OperatorKind, OperatorRegistry,
    };
}

/// Compiles `expr` from `arena` into a function of `variables`, in order,
/// using the standard registries.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn build_numeric_function<S: AsRef<str>>(
    arena: &ExprArena,
    expr: ExprHandle,
    variables: &[S],
) -> Result<CompiledFunction, CompileError> {
    build_numeric_function_with(&Compiler::new(), arena, expr, variables)
}

/// Like [`build_numeric_function`], with a caller-configured [`Compiler`].
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn build_numeric_function_with<S: AsRef<str>>(
    compiler: &Compiler,
    arena: &ExprArena,
    expr: ExprHandle,
    variables: &[S],
) -> Result<CompiledFunction, CompileError> {
    compiler.compile(&ArenaExpr::new(arena, expr), variables)
}
