//! # numforge-core
//!
//! Symbolic expression model consumed by the numforge compiler.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Type-safe expression handles
//! - The canonical printed form of an expression
//! - Numerical evaluation of closed-form expressions
//!
//! ## Design Principles
//!
//! - **Data-Oriented Design**: Expressions stored contiguously in arena for cache efficiency
//! - **Hash-Consing**: Every structurally unique expression stored exactly once
//! - **Zero-Cost Handles**: 32-bit indices instead of pointers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod display;
pub mod expr;
pub mod handle;
pub mod intern;
pub mod numeric;

mod proptests;

pub use arena::ExprArena;
pub use display::ExprDisplay;
pub use expr::{ExprNode, FunctionId, RelOp, SymbolId};
pub use handle::ExprHandle;
pub use numeric::NumericError;

pub use num_complex::Complex64;
