//! Property-based tests for broadcasting and element-wise arithmetic.
