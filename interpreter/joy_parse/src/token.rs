//! Tokens produced by the cursor, before classification.

/// A single token with its source position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token<'src> {
    pub(crate) kind: TokenKind<'src>,
    pub(crate) line: u32,
    pub(crate) column: u32,
}

/// Token shape. Brackets are self-delimiting; everything else is an atom
/// classified by the reader (integer, boolean, symbol, or operator word).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind<'src> {
    LBracket,
    RBracket,
    Atom(&'src str),
}
