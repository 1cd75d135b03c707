//! Arena allocator for expression storage.
//!
//! This module provides a contiguous memory arena for storing expression nodes,
//! enabling cache-friendly traversal and constant-time deallocation.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::expr::{functions, ExprNode, FunctionId, RelOp, SymbolId};
use crate::handle::ExprHandle;
use crate::intern::InternTable;

/// The main arena for storing expressions.
///
/// All expressions are stored contiguously in a `Vec`, with hash-consing
/// ensuring each unique expression is stored exactly once. Nodes are never
/// removed, so every handle stays valid for the lifetime of the arena.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol names, indexed by `SymbolId`.
    symbols: InternTable<String>,
    /// Names of non-standard functions, indexed by `id - FIRST_USER`.
    user_functions: InternTable<String>,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` nodes.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Arena capacity exceeded");

        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this arena.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.slot()]
    }

    /// Interns a symbol name, returning its id.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        self.symbols.intern(name)
    }

    /// Gets the name of a symbol by its id.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.symbols.get(id).map(String::as_str)
    }

    /// Resolves a function name to its id, interning non-standard names.
    pub fn intern_function(&mut self, name: &str) -> FunctionId {
        match functions::standard_id(name) {
            Some(id) => id,
            None => functions::FIRST_USER + self.user_functions.intern(name),
        }
    }

    /// Gets the printed name of a function by its id.
    #[must_use]
    pub fn function_name(&self, id: FunctionId) -> Option<&str> {
        if id < functions::FIRST_USER {
            functions::standard_name(id)
        } else {
            self.user_functions
                .get(id - functions::FIRST_USER)
                .map(String::as_str)
        }
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Convenience constructors ===

    /// Creates an integer expression.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.intern(ExprNode::Integer(value))
    }

    /// Creates a rational expression `num/den` in lowest terms.
    ///
    /// Collapses to an integer when the reduced denominator is one.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero, or if the reduced numerator does not fit in
    /// an `i64` (`i64::MIN` over a negative odd denominator).
    pub fn rational(&mut self, num: i64, den: i64) -> ExprHandle {
        assert!(den != 0, "rational with zero denominator");

        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        let reduced = i128::from(num) / i128::from(g);
        let reduced = if den < 0 { -reduced } else { reduced };
        let Ok(num) = i64::try_from(reduced) else {
            panic!("rational numerator {reduced} overflows i64");
        };
        let den = den.unsigned_abs() / g;

        if den == 1 {
            self.integer(num)
        } else {
            self.intern(ExprNode::Rational(num, den))
        }
    }

    /// Creates a symbol expression.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// Creates an addition expression.
    pub fn add(&mut self, args: impl IntoIterator<Item = ExprHandle>) -> ExprHandle {
        let args: SmallVec<[ExprHandle; 4]> = args.into_iter().collect();
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Add(args))
    }

    /// Creates a multiplication expression.
    pub fn mul(&mut self, args: impl IntoIterator<Item = ExprHandle>) -> ExprHandle {
        let args: SmallVec<[ExprHandle; 4]> = args.into_iter().collect();
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Mul(args))
    }

    /// Creates a subtraction expression `lhs - rhs`.
    pub fn sub(&mut self, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Sub { lhs, rhs })
    }

    /// Creates a division expression `num / den`.
    pub fn div(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Div { num, den })
    }

    /// Creates a power expression.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Pow { base, exp })
    }

    /// Creates a negation expression.
    pub fn neg(&mut self, arg: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Neg(arg))
    }

    /// Applies a function, given by id, to its arguments.
    pub fn apply(&mut self, id: FunctionId, args: &[ExprHandle]) -> ExprHandle {
        self.intern(ExprNode::Function {
            id,
            args: SmallVec::from_slice(args),
        })
    }

    /// Applies a function, given by name, to its arguments.
    ///
    /// Standard names (`sin`, `sqrt`, ...) resolve to their reserved ids.
    pub fn call(&mut self, name: &str, args: &[ExprHandle]) -> ExprHandle {
        let id = self.intern_function(name);
        self.apply(id, args)
    }

    /// Creates a relation `lhs op rhs`.
    pub fn relation(&mut self, op: RelOp, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Relation { op, lhs, rhs })
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_basic() {
        let mut arena = ExprArena::new();

        let x = arena.symbol("x");
        let y = arena.symbol("y");

        // Same symbol returns same handle
        let x2 = arena.symbol("x");
        assert_eq!(x, x2);
        assert_ne!(x, y);
    }

    #[test]
    fn test_hash_consing() {
        let mut arena = ExprArena::new();

        let x = arena.symbol("x");
        let one = arena.integer(1);

        let sum1 = arena.add([x, one]);
        let sum2 = arena.add([x, one]);
        assert_eq!(sum1, sum2);

        // x, 1, (x + 1)
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_rational_normalization() {
        let mut arena = ExprArena::new();

        let half = arena.rational(2, 4);
        assert_eq!(arena.get(half), &ExprNode::Rational(1, 2));

        let neg = arena.rational(3, -6);
        assert_eq!(arena.get(neg), &ExprNode::Rational(-1, 2));

        let whole = arena.rational(6, 3);
        assert_eq!(arena.get(whole), &ExprNode::Integer(2));
    }

    #[test]
    fn test_rational_extremes() {
        let mut arena = ExprArena::new();

        let one = arena.integer(1);
        assert_eq!(arena.rational(i64::MIN, i64::MIN), one);

        let half_min = arena.rational(i64::MIN, 2);
        assert_eq!(arena.get(half_min), &ExprNode::Integer(i64::MIN / 2));

        let flipped = arena.rational(i64::MIN, -2);
        assert_eq!(arena.get(flipped), &ExprNode::Integer(1 << 62));

        let third = arena.rational(i64::MIN + 1, -3);
        assert_eq!(arena.get(third), &ExprNode::Rational(i64::MAX, 3));
    }

    #[test]
    #[should_panic(expected = "overflows i64")]
    fn test_rational_unrepresentable_numerator() {
        let mut arena = ExprArena::new();
        let _ = arena.rational(i64::MIN, -1);
    }

    #[test]
    fn test_function_names() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");

        let s = arena.call("sin", &[x]);
        assert_eq!(
            arena.get(s),
            &ExprNode::Function {
                id: functions::SIN,
                args: smallvec::smallvec![x],
            }
        );

        let gamma = arena.intern_function("gamma");
        assert!(gamma >= functions::FIRST_USER);
        assert_eq!(arena.intern_function("gamma"), gamma);
        assert_eq!(arena.function_name(gamma), Some("gamma"));
        assert_eq!(arena.function_name(functions::COSH), Some("cosh"));
    }
}
