//! Type-safe expression handles.

use std::fmt;

/// A handle to an expression in an [`ExprArena`](crate::ExprArena).
///
/// Handles are plain 32-bit indices. Thanks to hash-consing, two handles from
/// the same arena are equal exactly when the expressions they name are
/// structurally identical. A handle is meaningless outside its arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a handle from a raw arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}
