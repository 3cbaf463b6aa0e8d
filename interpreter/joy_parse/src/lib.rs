//! Joy Parse - the reader that turns source text into term sequences.
//!
//! The reader tokenizes on whitespace (with `[` and `]` self-delimiting) and
//! classifies each token as an integer, a boolean, a symbol, or an operator
//! word. Bracketed quotations are read iteratively with an explicit nesting
//! stack, so bracket depth never grows the host call stack.
//!
//! The reader performs no evaluation and has no dictionary access: bare words
//! become [`Term::Operator`] references resolved at evaluation time.
//!
//! [`Term::Operator`]: joy_ir::Term

mod cursor;
mod error;
mod reader;
mod token;

pub use error::{SyntaxError, SyntaxErrorKind};
pub use reader::parse;
