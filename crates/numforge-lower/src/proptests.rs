//! Property-based tests for lowering and evaluation.
