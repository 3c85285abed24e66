//! RDF term values.
//!
//! Provides the `Term` enum (IRI, blank node, literal) and the `Literal`
//! payload, along with the total order used when sorting query results.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// XSD datatypes in the integer family. Their values compare exactly.
const INTEGER_DATATYPES: [&str; 13] = [
    "http://www.w3.org/2001/XMLSchema#integer",
    "http://www.w3.org/2001/XMLSchema#long",
    "http://www.w3.org/2001/XMLSchema#int",
    "http://www.w3.org/2001/XMLSchema#short",
    "http://www.w3.org/2001/XMLSchema#byte",
    "http://www.w3.org/2001/XMLSchema#nonNegativeInteger",
    "http://www.w3.org/2001/XMLSchema#nonPositiveInteger",
    "http://www.w3.org/2001/XMLSchema#positiveInteger",
    "http://www.w3.org/2001/XMLSchema#negativeInteger",
    "http://www.w3.org/2001/XMLSchema#unsignedLong",
    "http://www.w3.org/2001/XMLSchema#unsignedInt",
    "http://www.w3.org/2001/XMLSchema#unsignedShort",
    "http://www.w3.org/2001/XMLSchema#unsignedByte",
];

/// XSD datatypes compared as floating point.
const FLOAT_DATATYPES: [&str; 3] = [
    "http://www.w3.org/2001/XMLSchema#decimal",
    "http://www.w3.org/2001/XMLSchema#double",
    "http://www.w3.org/2001/XMLSchema#float",
];

/// The value of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i128),
    /// A `decimal`, `double` or `float`, or an integer beyond `i128`.
    Float(f64),
}

impl Numeric {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Float(x) => x,
        }
    }

    /// Total order by value. Two integers compare exactly; anything else
    /// compares as `f64`.
    #[must_use]
    pub fn total_cmp(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(&b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

/// Datatype IRI for `xsd:integer`.
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// A literal value: lexical form plus an optional datatype or language tag.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// The lexical form, exactly as written.
    pub lexical: String,
    /// Datatype IRI, if the literal is typed.
    pub datatype: Option<String>,
    /// Language tag, if the literal is a language-tagged string.
    pub language: Option<String>,
}

impl Literal {
    /// Create a copy of this literal.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            lexical: self.lexical.as_str().to_owned(),
            datatype: self.datatype.as_deref().map(str::to_owned),
            language: self.language.as_deref().map(str::to_owned),
        }
    }

    /// The numeric value of this literal, if it has a numeric datatype and
    /// its lexical form parses.
    #[must_use]
    pub fn numeric(&self) -> Option<Numeric> {
        let datatype = self.datatype.as_deref()?;
        let lexical = self.lexical.trim();
        if INTEGER_DATATYPES.contains(&datatype) {
            if let Ok(n) = lexical.parse::<i128>() {
                return Some(Numeric::Integer(n));
            }
        } else if !FLOAT_DATATYPES.contains(&datatype) {
            return None;
        }
        lexical
            .parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .map(Numeric::Float)
    }

    /// The numeric value as `f64`. Large integers lose precision.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        self.numeric().map(Numeric::as_f64)
    }

    fn cmp_lexical(&self, other: &Self) -> Ordering {
        self.lexical
            .cmp(&other.lexical)
            .then_with(|| self.datatype.cmp(&other.datatype))
            .then_with(|| self.language.cmp(&other.language))
    }
}

impl Ord for Literal {
    /// Numeric literals sort before all others and compare by value; the
    /// rest compare by lexical form. Ties fall back to the full structure so
    /// the order agrees with `Eq`.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.total_cmp(b).then_with(|| self.cmp_lexical(other)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.cmp_lexical(other),
        }
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.lexical)?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^<{datatype}>")
        } else {
            Ok(())
        }
    }
}

/// A statement component.
///
/// Terms compare structurally. Sorting places blank nodes first, then IRIs,
/// then literals.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(String),
    BlankNode(String),
    Literal(Literal),
}

impl Term {
    /// Create an IRI term.
    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// Create a blank node with the given label.
    #[must_use]
    pub fn blank(label: impl Into<String>) -> Self {
        Self::BlankNode(label.into())
    }

    /// Create a plain literal.
    #[must_use]
    pub fn literal(lexical: impl Into<String>) -> Self {
        Self::Literal(Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        })
    }

    /// Create a typed literal.
    #[must_use]
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal(Literal {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        })
    }

    /// Create a language-tagged literal.
    #[must_use]
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal(Literal {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        })
    }

    /// Create an `xsd:integer` literal.
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self::typed(n.to_string(), XSD_INTEGER)
    }

    /// Whether this term may appear in subject position.
    #[must_use]
    pub const fn is_subject_capable(&self) -> bool {
        matches!(self, Self::Iri(_) | Self::BlankNode(_))
    }

    #[must_use]
    pub const fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Create a copy of this term.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        match self {
            Self::Iri(iri) => Self::Iri(iri.as_str().to_owned()),
            Self::BlankNode(label) => Self::BlankNode(label.as_str().to_owned()),
            Self::Literal(literal) => Self::Literal(literal.clone_value()),
        }
    }

    const fn kind_rank(&self) -> u8 {
        match self {
            Self::BlankNode(_) => 0,
            Self::Iri(_) => 1,
            Self::Literal(_) => 2,
        }
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Iri(a), Self::Iri(b)) | (Self::BlankNode(a), Self::BlankNode(b)) => a.cmp(b),
            (Self::Literal(a), Self::Literal(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::BlankNode(label) => write!(f, "_:{label}"),
            Self::Literal(literal) => write!(f, "{literal}"),
        }
    }
}
