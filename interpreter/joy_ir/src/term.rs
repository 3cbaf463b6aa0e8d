//! The tagged term type - every runtime entity of the language.
//!
//! A `Term` is both program and data: the reader produces term sequences,
//! the data stack holds terms, and quotations hold the terms of unevaluated
//! code. Terms are immutable once constructed; all observable "mutation" is
//! stack and queue rearrangement of references.

use std::fmt;
use std::sync::Arc;

use crate::{Name, StringInterner};

/// The atomic unit of program and data.
///
/// Equality is structural: numbers, booleans, and symbols by value, and two
/// quotations are equal iff they have the same length and pairwise-equal
/// elements. The derived total order (variant rank, then value) exists to
/// support container-membership tests, not to be meaningful across variants.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Term {
    /// Exact integer.
    Number(i64),
    /// Boolean literal.
    Boolean(bool),
    /// Interned, immutable label. Always data, never auto-invoked.
    Symbol(Name),
    /// Ordered, immutable sequence of terms: the language's only composite
    /// literal, doubling as "list" and as "anonymous procedure".
    Quotation(Arc<[Term]>),
    /// A name resolved against the dictionary at evaluation time, not at
    /// parse time. Late binding allows forward references and redefinition.
    Operator(Name),
}

static_assert_size!(Term, 24);

impl Term {
    /// Build a quotation term from a vector of elements.
    #[inline]
    pub fn quotation(items: Vec<Term>) -> Self {
        Term::Quotation(Arc::from(items))
    }

    /// The empty quotation.
    #[inline]
    pub fn empty_quotation() -> Self {
        Term::Quotation(Arc::from([]))
    }

    /// Variant name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Term::Number(_) => "number",
            Term::Boolean(_) => "boolean",
            Term::Symbol(_) => "symbol",
            Term::Quotation(_) => "quotation",
            Term::Operator(_) => "operator",
        }
    }

    /// Whether this term is a quotation.
    #[inline]
    pub fn is_quotation(&self) -> bool {
        matches!(self, Term::Quotation(_))
    }

    /// The quotation body, if this term is a quotation.
    #[inline]
    pub fn as_quotation(&self) -> Option<&Arc<[Term]>> {
        match self {
            Term::Quotation(body) => Some(body),
            _ => None,
        }
    }

    /// Display adapter that resolves interned names through `interner`.
    ///
    /// `Term` cannot implement `Display` directly because symbol and operator
    /// names live in the interner.
    #[inline]
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> TermDisplay<'a> {
        TermDisplay {
            term: self,
            interner,
        }
    }
}

/// Renders a term the way source text spells it: quotations as `[a b c]`,
/// booleans lowercase, symbols with their leading marker.
pub struct TermDisplay<'a> {
    term: &'a Term,
    interner: &'a StringInterner,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term {
            Term::Number(n) => write!(f, "{n}"),
            Term::Boolean(b) => write!(f, "{b}"),
            Term::Symbol(name) => write!(f, "'{}", self.interner.lookup(*name)),
            Term::Operator(name) => write!(f, "{}", self.interner.lookup(*name)),
            Term::Quotation(body) => {
                write!(f, "[")?;
                for (i, item) in body.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item.display(self.interner))?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structural_equality_of_quotations() {
        let a = Term::quotation(vec![Term::Number(1), Term::Boolean(true)]);
        let b = Term::quotation(vec![Term::Number(1), Term::Boolean(true)]);
        let c = Term::quotation(vec![Term::Number(1)]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_symbol_equality_is_identity_by_name() {
        let interner = StringInterner::new();
        let a = Term::Symbol(interner.intern("alpha"));
        let b = Term::Symbol(interner.intern("alpha"));
        let c = Term::Symbol(interner.intern("beta"));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ordering_is_total_across_variants() {
        let interner = StringInterner::new();
        let mut terms = vec![
            Term::Quotation(Arc::from([])),
            Term::Symbol(interner.intern("s")),
            Term::Boolean(false),
            Term::Number(3),
        ];
        terms.sort();
        // Sorting must not panic and must be stable under re-sort.
        let again = {
            let mut t = terms.clone();
            t.sort();
            t
        };
        assert_eq!(terms, again);
    }

    #[test]
    fn test_display_matches_source_spelling() {
        let interner = StringInterner::new();
        let term = Term::quotation(vec![
            Term::Number(-4),
            Term::Boolean(true),
            Term::Symbol(interner.intern("key")),
            Term::quotation(vec![Term::Operator(interner.intern("dup"))]),
        ]);

        assert_eq!(
            term.display(&interner).to_string(),
            "[-4 true 'key [dup]]"
        );
    }

    #[test]
    fn test_quotation_sharing_is_pointer_copy() {
        let body: Arc<[Term]> = Arc::from(vec![Term::Number(1), Term::Number(2)]);
        let a = Term::Quotation(Arc::clone(&body));
        let b = Term::Quotation(body);
        // Two terms sharing one allocation still compare structurally.
        assert_eq!(a, b);
    }
}
