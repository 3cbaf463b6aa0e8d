//! String interner for symbol and operator names.
//!
//! Provides O(1) interning and lookup with thread-safe concurrent access.
//! Interned strings are leaked to obtain `'static` lifetime, so lookups can
//! hand out references without holding the lock.

// Arc is needed here for SharedInterner - the interner is shared read-mostly
// across concurrently running machines.
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// The interner exceeded capacity (over 4 billion strings).
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Interner storage: map from string content to index, plus the contents.
struct InternTable {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// Provides O(1) lookup and equality comparison for interned strings. Uses a
/// single `RwLock`ed table; reads (the common case once a program's names are
/// known) take the shared lock.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new, empty interner.
    pub fn new() -> Self {
        StringInterner {
            table: RwLock::new(InternTable {
                map: FxHashMap::default(),
                strings: Vec::with_capacity(256),
            }),
        }
    }

    /// Try to intern a string, returning its `Name` or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: already interned.
        {
            let guard = self.table.read();
            if let Some(&idx) = guard.map.get(s) {
                return Ok(Name::from_raw(idx));
            }
        }

        let mut guard = self.table.write();

        // Double-check after acquiring the write lock.
        if let Some(&idx) = guard.map.get(s) {
            return Ok(Name::from_raw(idx));
        }

        // Leak the string to get 'static lifetime.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());

        let idx = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, idx);

        Ok(Name::from_raw(idx))
    }

    /// Intern a string, returning its `Name`.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity (over 4 billion strings).
    /// Use [`StringInterner::try_intern`] for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a `Name`.
    ///
    /// Returns a `'static` reference; interned strings are never deallocated.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.table.read();
        guard.strings[name.index()]
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Whether no strings have been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner handle for use across concurrently running machines.
///
/// This newtype enforces that all interner sharing goes through this type,
/// preventing ad-hoc `Arc<StringInterner>` plumbing. Cloning is a reference
/// count bump; all clones intern into the same table, so `Name`s obtained
/// through any clone compare equal for equal strings.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_lookup() {
        let interner = StringInterner::new();

        let cons = interner.intern("cons");
        let swap = interner.intern("swap");
        let cons2 = interner.intern("cons");

        assert_eq!(cons, cons2);
        assert_ne!(cons, swap);

        assert_eq!(interner.lookup(cons), "cons");
        assert_eq!(interner.lookup(swap), "swap");
    }

    #[test]
    fn test_len_counts_distinct_strings() {
        let interner = StringInterner::new();
        assert!(interner.is_empty());

        interner.intern("dup");
        interner.intern("dup");
        interner.intern("pop");

        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_shared_interner_clones_share_names() {
        let interner = SharedInterner::new();
        let clone = interner.clone();

        let a = interner.intern("shared");
        let b = clone.intern("shared");

        assert_eq!(a, b);
    }
}
