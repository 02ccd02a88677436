//! Built-in target definitions.

/// POWER9-class superscalar core.
pub mod p9;
