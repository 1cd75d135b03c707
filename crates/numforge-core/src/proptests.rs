//! Property-based tests for the expression arena and numeric evaluation.
