//! Constraint builders for comparisons and term tests.
//!
//! Every function here returns a `Constraint` (or an `Operand` feeding
//! one), so common checks need no hand-written closure:
//!
//! ```ignore
//! use triplequery::query::operators::{self, Operand};
//!
//! let adults = operators::ge(Variable::new("age"), Term::integer(18));
//! let pattern = pattern.with_constraint(adults);
//! ```
//!
//! Operands that are unbound, or that cannot be compared with each other,
//! make a comparison reject the binding rather than fail the query.

use std::cmp::Ordering;

use super::context::Binding;
use super::types::{Constraint, Variable};
use crate::types::Term;

/// One side of a comparison.
#[derive(Debug)]
pub enum Operand {
    /// The value bound to a variable.
    Variable(Variable),
    /// A fixed term.
    Term(Term),
    /// The string form of a bound value, as a plain literal.
    Str(Variable),
    /// The language tag of a bound literal, as a plain literal.
    Lang(Variable),
    /// The datatype IRI of a bound literal.
    Datatype(Variable),
}

impl From<Variable> for Operand {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<Term> for Operand {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

/// A resolved operand: either a term in the binding or one computed from it.
enum Resolved<'a> {
    Borrowed(&'a Term),
    Owned(Term),
}

impl Resolved<'_> {
    const fn term(&self) -> &Term {
        match self {
            Self::Borrowed(term) => term,
            Self::Owned(term) => term,
        }
    }
}

impl Operand {
    fn resolve<'a>(&'a self, binding: &'a Binding) -> Option<Resolved<'a>> {
        match self {
            Self::Variable(variable) => binding.get(variable).map(Resolved::Borrowed),
            Self::Term(term) => Some(Resolved::Borrowed(term)),
            Self::Str(variable) => {
                let text = match binding.get(variable) {
                    None => String::new(),
                    Some(Term::Iri(iri)) => iri.as_str().to_owned(),
                    Some(Term::BlankNode(label)) => label.as_str().to_owned(),
                    Some(Term::Literal(literal)) => literal.lexical.as_str().to_owned(),
                };
                Some(Resolved::Owned(Term::literal(text)))
            }
            Self::Lang(variable) => {
                let language = binding
                    .get(variable)
                    .and_then(Term::as_literal)
                    .and_then(|literal| literal.language.as_deref())
                    .unwrap_or_default();
                Some(Resolved::Owned(Term::literal(language)))
            }
            Self::Datatype(variable) => {
                let datatype = binding
                    .get(variable)
                    .and_then(Term::as_literal)
                    .and_then(|literal| literal.datatype.as_deref());
                Some(Resolved::Owned(
                    datatype.map_or_else(|| Term::literal(""), Term::iri),
                ))
            }
        }
    }
}

/// Compare two terms by value.
///
/// Numeric literals compare numerically, other literals compare by lexical
/// form when they share datatype and language, and IRIs compare as strings.
/// Any other pair is incomparable.
#[must_use]
pub fn compare_terms(left: &Term, right: &Term) -> Option<Ordering> {
    match (left, right) {
        (Term::Literal(a), Term::Literal(b)) => match (a.numeric(), b.numeric()) {
            (Some(x), Some(y)) => Some(x.total_cmp(y)),
            (None, None) if a.datatype == b.datatype && a.language == b.language => {
                Some(a.lexical.cmp(&b.lexical))
            }
            _ => None,
        },
        (Term::Iri(a), Term::Iri(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn comparison(left: Operand, right: Operand, accept: fn(Ordering) -> bool) -> Constraint {
    Constraint::new(move |binding| {
        let (Some(a), Some(b)) = (left.resolve(binding), right.resolve(binding)) else {
            return false;
        };
        match compare_terms(a.term(), b.term()) {
            Some(ordering) => accept(ordering),
            None => {
                tracing::trace!(left = %a.term(), right = %b.term(), "incomparable operands");
                false
            }
        }
    })
}

/// `left < right`
pub fn lt(left: impl Into<Operand>, right: impl Into<Operand>) -> Constraint {
    comparison(left.into(), right.into(), Ordering::is_lt)
}

/// `left <= right`
pub fn le(left: impl Into<Operand>, right: impl Into<Operand>) -> Constraint {
    comparison(left.into(), right.into(), Ordering::is_le)
}

/// `left > right`
pub fn gt(left: impl Into<Operand>, right: impl Into<Operand>) -> Constraint {
    comparison(left.into(), right.into(), Ordering::is_gt)
}

/// `left >= right`
pub fn ge(left: impl Into<Operand>, right: impl Into<Operand>) -> Constraint {
    comparison(left.into(), right.into(), Ordering::is_ge)
}

/// Value equality. Identical terms are always equal, so blank nodes and
/// literals of unrelated datatypes compare by identity.
pub fn eq(left: impl Into<Operand>, right: impl Into<Operand>) -> Constraint {
    let left = left.into();
    let right = right.into();
    Constraint::new(move |binding| {
        let (Some(a), Some(b)) = (left.resolve(binding), right.resolve(binding)) else {
            return false;
        };
        a.term() == b.term() || compare_terms(a.term(), b.term()) == Some(Ordering::Equal)
    })
}

fn bound_term(variable: Variable, accept: fn(&Term) -> bool) -> Constraint {
    Constraint::new(move |binding| binding.get(&variable).is_some_and(accept))
}

/// The variable has a value.
pub fn bound(variable: Variable) -> Constraint {
    bound_term(variable, |_| true)
}

/// The variable is bound to an IRI.
pub fn is_iri(variable: Variable) -> Constraint {
    bound_term(variable, |term| matches!(term, Term::Iri(_)))
}

/// The variable is bound to a blank node.
pub fn is_blank(variable: Variable) -> Constraint {
    bound_term(variable, Term::is_blank_node)
}

/// The variable is bound to a literal.
pub fn is_literal(variable: Variable) -> Constraint {
    bound_term(variable, |term| term.as_literal().is_some())
}

/// The string form of the value: an IRI's text, a blank node's label or a
/// literal's lexical form. Empty when unbound.
#[must_use]
pub const fn str(variable: Variable) -> Operand {
    Operand::Str(variable)
}

/// The language tag of a literal value, empty if it has none.
#[must_use]
pub const fn lang(variable: Variable) -> Operand {
    Operand::Lang(variable)
}

/// The datatype IRI of a literal value, or an empty literal if it has none.
#[must_use]
pub const fn datatype(variable: Variable) -> Operand {
    Operand::Datatype(variable)
}
