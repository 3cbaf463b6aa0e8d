//! Joy IR - core data structures for the Joy interpreter.
//!
//! This crate contains the types shared by every interpreter phase:
//! - `Name` for interned identifiers (symbols and operator words)
//! - `StringInterner` / `SharedInterner` for identifier storage
//! - `Term`, the tagged value representing every runtime entity
//!
//! # Design Philosophy
//!
//! - **Intern everything**: identifier strings become `Name(u32)`, so symbol
//!   equality is a single integer comparison.
//! - **Immutable terms**: a `Term` is never edited in place. Quotations are
//!   `Arc<[Term]>`, so sharing a quotation between the dictionary, the data
//!   stack, and the pending queue is a pointer copy.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod term;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use term::{Term, TermDisplay};
