use std::fmt;

use serde::{Deserialize, Serialize};

use super::term::Term;

/// A (subject, predicate, object) statement.
///
/// INVARIANT: stores never hold a triple whose subject is a literal.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    #[must_use]
    pub const fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Create a copy of this triple.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            subject: self.subject.clone_value(),
            predicate: self.predicate.clone_value(),
            object: self.object.clone_value(),
        }
    }

    /// The three components in statement order.
    #[must_use]
    pub const fn components(&self) -> [&Term; 3] {
        [&self.subject, &self.predicate, &self.object]
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
