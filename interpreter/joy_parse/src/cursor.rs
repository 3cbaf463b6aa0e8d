//! Byte cursor over source text with line/column tracking.
//!
//! The cursor advances byte-by-byte and keeps 1-based line and column
//! positions for error reporting. Token boundaries are all ASCII (whitespace
//! and brackets), so slicing the source at cursor positions always lands on
//! UTF-8 character boundaries.

use memchr::memchr;

use crate::error::{SyntaxError, SyntaxErrorKind};

/// Position-tracking cursor over the source bytes.
pub(crate) struct Cursor<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Cursor {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current 1-based line.
    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    /// Current 1-based byte column.
    pub(crate) fn column(&self) -> u32 {
        self.column
    }

    /// Byte at the cursor, or `None` at end of input.
    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Advance one byte, maintaining line/column counters.
    pub(crate) fn bump(&mut self) {
        if let Some(&b) = self.bytes.get(self.pos) {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skip whitespace and comments. Returns an error only for an
    /// unterminated `(*` block comment.
    pub(crate) fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.bump(),
                Some(b'#') => self.skip_line_comment(),
                Some(b'(') if self.bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.skip_block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skip a `#` comment up to (not including) the newline.
    fn skip_line_comment(&mut self) {
        match memchr(b'\n', &self.bytes[self.pos..]) {
            Some(offset) => {
                self.column += u32::try_from(offset).unwrap_or(u32::MAX);
                self.pos += offset;
            }
            None => {
                self.column += u32::try_from(self.bytes.len() - self.pos).unwrap_or(u32::MAX);
                self.pos = self.bytes.len();
            }
        }
    }

    /// Skip a `(* ... *)` comment, including the delimiters.
    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let line = self.line;
        let column = self.column;
        // Consume the opening `(*`.
        self.bump();
        self.bump();
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnterminatedComment,
                        line,
                        column,
                    ));
                }
                Some(b'*') if self.bytes.get(self.pos + 1) == Some(&b')') => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                Some(_) => self.bump(),
            }
        }
    }

    /// Consume an atom: bytes up to the next whitespace or bracket.
    ///
    /// Must be called on a non-empty, non-bracket position.
    pub(crate) fn take_atom(&mut self) -> &'src str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b'[' || b == b']' {
                break;
            }
            self.bump();
        }
        &self.source[start..self.pos]
    }
}
