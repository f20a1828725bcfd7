//! URL handling module for wikiscribe
//!
//! This module provides URL canonicalization (the identity form used for
//! page de-duplication) and the scope predicate that decides whether a
//! discovered link belongs to the exported space.

mod normalize;
mod scope;

pub use normalize::canonicalize_url;
pub use scope::in_scope;
