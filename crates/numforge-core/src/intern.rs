//! Name interning.
//!
//! Symbol and function names are stored once and referred to by dense ids.

use std::borrow::Borrow;
use std::hash::Hash;

use hashbrown::HashMap;

/// A generic interning table handing out dense `u32` ids.
#[derive(Debug, Clone)]
pub struct InternTable<T> {
    map: HashMap<T, u32>,
    values: Vec<T>,
}

impl<T: Clone + Eq + Hash> Default for InternTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> InternTable<T> {
    /// Creates a new empty interning table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Interns a value, returning its id. Re-interning returns the same id.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` values are interned.
    pub fn intern<Q>(&mut self, value: &Q) -> u32
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = T>,
    {
        if let Some(&id) = self.map.get(value) {
            return id;
        }

        let index = self.values.len();
        assert!(index < u32::MAX as usize, "intern table capacity exceeded");

        let id = index as u32;
        let owned = value.to_owned();
        self.map.insert(owned.clone(), id);
        self.values.push(owned);
        id
    }

    /// Gets a value by its id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&T> {
        self.values.get(id as usize)
    }

    /// Gets the id of a value, if it has been interned.
    #[must_use]
    pub fn get_id<Q>(&self, value: &Q) -> Option<u32>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(value).copied()
    }

    /// Returns the number of interned values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
