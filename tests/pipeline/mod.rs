//! End-to-end resolution tests
//!
//! Grammars are built through the builder, lowered to a content graph and
//! resolved into beans:
//! - Class and property naming
//! - Cardinality widening and primitive promotion
//! - Finder resolution
//! - Grammar optimization

pub mod tests_cardinality;
pub mod tests_finders;
pub mod tests_grammar;
pub mod tests_naming;
