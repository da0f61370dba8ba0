//! Interchange tests
//!
//! - XSD documents read into grammars and resolved
//! - Bean-graph snapshots written, read back and fed to the resolver

pub mod tests_snapshot;
pub mod tests_xsd;
