//! # numforge-array
//!
//! Element-wise numeric runtime targeted by compiled numforge functions.
//!
//! Values are n-dimensional real or complex arrays ([`Value`]); scalars are
//! zero-dimensional. Binary operations broadcast their operands, and
//! [`Kernel`]s apply elementary functions element-wise with scimath-style
//! promotion to complex outside the real domain.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod broadcast;
pub mod error;
pub mod kernel;
pub mod value;

mod proptests;

pub use broadcast::broadcast_shape;
pub use error::EvalError;
pub use kernel::Kernel;
pub use value::Value;

pub use ndarray;
pub use num_complex::Complex64;
