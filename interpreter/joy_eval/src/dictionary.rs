//! The dictionary: operator names to behaviors.
//!
//! Built-ins are registered once into an immutable table shared between
//! concurrently running machines via `Arc`. User definitions are named
//! quotations in a per-dictionary overlay; they may be added or replaced at
//! any time and take effect for all subsequent lookups (never retroactively
//! for terms already spliced into a queue). The overlay is consulted first,
//! so a user definition can shadow a built-in.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use joy_ir::{Name, SharedInterner, StringInterner, Term};

use crate::builtins;
use crate::combinators;
use crate::errors::RuntimeError;
use crate::machine::Machine;

/// A built-in stack transformation.
///
/// `arity` is the number of stack items the transformation pops; the machine
/// checks it against the stack depth before calling `run`, so underflow never
/// leaves a partial effect.
#[derive(Clone, Copy)]
pub struct Builtin {
    /// Spelling this entry was registered under, used in error messages.
    pub name: &'static str,
    /// Stack items required.
    pub arity: usize,
    /// The transformation. May pop/push stack items and splice terms onto
    /// the front of the pending queue.
    pub run: fn(&mut Machine) -> Result<(), RuntimeError>,
}

/// Alternative spellings: `(alias, canonical)`. The alias gets a copy of the
/// canonical entry under its own name, so errors always name the spelling
/// the program actually used.
const ALIASES: &[(&str, &str)] = &[
    ("add", "+"),
    ("sub", "-"),
    ("mul", "*"),
    ("div", "/"),
    ("rem", "%"),
    ("equal?", "="),
    ("differ?", "!="),
    ("gt", ">"),
    ("gte", ">="),
    ("lt", "<"),
    ("lte", "<="),
    ("size", "length"),
];

/// Immutable table of built-ins, shared read-only across machines.
pub struct BuiltinTable {
    entries: FxHashMap<Name, Builtin>,
}

impl BuiltinTable {
    /// Register the standard operator and combinator library.
    fn standard(interner: &StringInterner) -> Self {
        let mut entries = FxHashMap::default();
        for builtin in builtins::REGISTRY.iter().chain(combinators::REGISTRY) {
            entries.insert(interner.intern(builtin.name), *builtin);
        }
        for (alias, canonical) in ALIASES {
            let Some(entry) = entries.get(&interner.intern(canonical)).copied() else {
                continue;
            };
            entries.insert(
                interner.intern(alias),
                Builtin {
                    name: alias,
                    ..entry
                },
            );
        }
        BuiltinTable { entries }
    }

    fn get(&self, name: Name) -> Option<&Builtin> {
        self.entries.get(&name)
    }
}

/// Result of a dictionary lookup.
pub enum Entry {
    /// A built-in primitive: a fixed, named stack transformation.
    Builtin(Builtin),
    /// A user-defined quotation, to be tail-expanded into the queue.
    Word(Arc<[Term]>),
}

/// Mapping from operator name to behavior.
///
/// Cloning a dictionary is cheap on the built-in side (shared `Arc`) and
/// snapshots the user overlay, which is how concurrent runs get independent
/// overlays over the same built-ins (see the crate docs on concurrency).
#[derive(Clone)]
pub struct Dictionary {
    interner: SharedInterner,
    builtins: Arc<BuiltinTable>,
    words: FxHashMap<Name, Arc<[Term]>>,
}

impl Dictionary {
    /// A dictionary with the standard built-ins and a fresh interner.
    pub fn new() -> Self {
        Self::with_interner(SharedInterner::new())
    }

    /// A dictionary with the standard built-ins, interning through `interner`.
    ///
    /// Use one shared interner for the dictionary and every `parse` call that
    /// feeds it, so names resolve to the same `Name` values.
    pub fn with_interner(interner: SharedInterner) -> Self {
        let builtins = Arc::new(BuiltinTable::standard(&interner));
        Dictionary {
            interner,
            builtins,
            words: FxHashMap::default(),
        }
    }

    /// The interner this dictionary resolves names through.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// A clone of the shared interner handle.
    pub fn shared_interner(&self) -> SharedInterner {
        self.interner.clone()
    }

    /// Install or replace a user definition (a named quotation).
    ///
    /// Takes effect for all subsequent lookups; terms already spliced into a
    /// pending queue are unaffected.
    pub fn define(&mut self, name: Name, body: Arc<[Term]>) {
        self.words.insert(name, body);
    }

    /// Install or replace a user definition by spelling.
    pub fn define_str(&mut self, name: &str, body: Arc<[Term]>) {
        let name = self.interner.intern(name);
        self.define(name, body);
    }

    /// Resolve a name: the user overlay first, then the built-in table.
    pub fn lookup(&self, name: Name) -> Option<Entry> {
        if let Some(body) = self.words.get(&name) {
            return Some(Entry::Word(Arc::clone(body)));
        }
        self.builtins.get(name).map(|b| Entry::Builtin(*b))
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_resolve() {
        let dict = Dictionary::new();
        let plus = dict.interner().intern("+");
        assert!(matches!(dict.lookup(plus), Some(Entry::Builtin(b)) if b.arity == 2));
    }

    #[test]
    fn test_alias_keeps_its_own_spelling() {
        let dict = Dictionary::new();
        let add = dict.interner().intern("add");
        match dict.lookup(add) {
            Some(Entry::Builtin(b)) => assert_eq!(b.name, "add"),
            _ => panic!("expected builtin"),
        }
    }

    #[test]
    fn test_definitions_shadow_and_replace() {
        let mut dict = Dictionary::new();
        let dup = dict.interner().intern("dup");

        dict.define(dup, Arc::from(vec![Term::Number(1)]));
        assert!(matches!(dict.lookup(dup), Some(Entry::Word(_))));

        dict.define(dup, Arc::from(vec![Term::Number(2)]));
        match dict.lookup(dup) {
            Some(Entry::Word(body)) => assert_eq!(body.as_ref(), &[Term::Number(2)]),
            _ => panic!("expected word"),
        }
    }

    #[test]
    fn test_unknown_name_misses() {
        let dict = Dictionary::new();
        let nope = dict.interner().intern("frobnicate");
        assert!(dict.lookup(nope).is_none());
    }
}
