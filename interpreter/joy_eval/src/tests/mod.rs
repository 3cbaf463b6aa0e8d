//! Test modules for the interpreter core.
//!
//! Larger suites live here instead of inline in the implementation files.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

mod scenario_tests;

use joy_ir::{SharedInterner, Term};

use crate::{Dictionary, RuntimeError};

/// Parse and run `source` against a fresh dictionary, returning the final
/// stack (bottom to top) and the interner for building expected terms.
pub(crate) fn eval(source: &str) -> (Vec<Term>, SharedInterner) {
    let dictionary = Dictionary::new();
    let interner = dictionary.shared_interner();
    let terms = joy_parse::parse(source, &interner).unwrap();
    let stack = crate::run(terms, dictionary).unwrap();
    (stack, interner)
}

/// Parse and run `source`, expecting a runtime failure.
pub(crate) fn eval_err(source: &str) -> RuntimeError {
    let dictionary = Dictionary::new();
    let interner = dictionary.shared_interner();
    let terms = joy_parse::parse(source, &interner).unwrap();
    crate::run(terms, dictionary).unwrap_err()
}

/// The top of a final stack.
pub(crate) fn top(stack: &[Term]) -> &Term {
    stack.last().unwrap()
}
