//! Token classification and quotation nesting.
//!
//! Classification is purely lexical: `true`/`false` are the boolean literals,
//! a leading `'` marks a symbol, a token that starts with a digit (or a sign
//! followed by a digit) must be an integer, and every other token is an
//! operator word left unresolved until evaluation time.

use joy_ir::{StringInterner, Term};
use tracing::trace;

use crate::cursor::Cursor;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::token::{Token, TokenKind};

/// Pulls positioned tokens out of the cursor.
struct Tokenizer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Tokenizer<'src> {
    fn new(source: &'src str) -> Self {
        Tokenizer {
            cursor: Cursor::new(source),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'src>>, SyntaxError> {
        self.cursor.skip_trivia()?;
        let line = self.cursor.line();
        let column = self.cursor.column();
        let kind = match self.cursor.peek() {
            None => return Ok(None),
            Some(b'[') => {
                self.cursor.bump();
                TokenKind::LBracket
            }
            Some(b']') => {
                self.cursor.bump();
                TokenKind::RBracket
            }
            Some(_) => TokenKind::Atom(self.cursor.take_atom()),
        };
        Ok(Some(Token { kind, line, column }))
    }
}

/// Read source text into a sequence of terms.
///
/// Tokenizes on whitespace with `[`/`]` self-delimiting, skips `#` line
/// comments and `(* *)` block comments, and classifies every atom. Nested
/// quotations are assembled with an explicit stack of partial bodies, so
/// nesting depth is bounded by heap memory, not the host call stack.
///
/// The reader never consults a dictionary; bare words come back as
/// [`Term::Operator`] references to be resolved when evaluated.
pub fn parse(source: &str, interner: &StringInterner) -> Result<Vec<Term>, SyntaxError> {
    let mut tokenizer = Tokenizer::new(source);
    // Bodies of enclosing `[`s, innermost last, with the bracket positions
    // for unclosed-quotation reporting.
    let mut nesting: Vec<(Vec<Term>, u32, u32)> = Vec::new();
    let mut current: Vec<Term> = Vec::new();

    while let Some(token) = tokenizer.next_token()? {
        match token.kind {
            TokenKind::LBracket => {
                nesting.push((std::mem::take(&mut current), token.line, token.column));
            }
            TokenKind::RBracket => {
                let Some((enclosing, _, _)) = nesting.pop() else {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnexpectedClosing,
                        token.line,
                        token.column,
                    ));
                };
                let body = std::mem::replace(&mut current, enclosing);
                current.push(Term::quotation(body));
            }
            TokenKind::Atom(text) => {
                current.push(classify(text, &token, interner)?);
            }
        }
    }

    if let Some((_, line, column)) = nesting.last() {
        return Err(SyntaxError::new(
            SyntaxErrorKind::UnclosedQuotation,
            *line,
            *column,
        ));
    }

    trace!(terms = current.len(), "read program");
    Ok(current)
}

/// Whether a token is committed to being an integer literal.
fn looks_numeric(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_digit() => true,
        Some(b'+' | b'-') => bytes.get(1).is_some_and(u8::is_ascii_digit),
        _ => false,
    }
}

fn classify(text: &str, token: &Token<'_>, interner: &StringInterner) -> Result<Term, SyntaxError> {
    if text == "true" {
        return Ok(Term::Boolean(true));
    }
    if text == "false" {
        return Ok(Term::Boolean(false));
    }
    if let Some(name) = text.strip_prefix('\'') {
        if name.is_empty() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::MalformedSymbol {
                    token: text.to_owned(),
                },
                token.line,
                token.column,
            ));
        }
        return Ok(Term::Symbol(interner.intern(name)));
    }
    if looks_numeric(text) {
        return match text.parse::<i64>() {
            Ok(value) => Ok(Term::Number(value)),
            Err(_) => Err(SyntaxError::new(
                SyntaxErrorKind::MalformedNumber {
                    token: text.to_owned(),
                },
                token.line,
                token.column,
            )),
        };
    }
    Ok(Term::Operator(interner.intern(text)))
}
