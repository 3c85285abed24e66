//! Value types shared by the store and the query engine.

pub mod term;
pub mod triple;

pub use term::{Literal, Numeric, Term, XSD_INTEGER};
pub use triple::Triple;
