//! # beangen-core
//!
//! Schema grammar model and graph-to-property resolver for generating
//! bean classes from DTD and XML Schema.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! beans     → Bean elements, properties, finders (name & type resolution)
//!   ↓
//! graph     → Content graph: nodes, cardinality-tagged links, lowering
//!   ↓
//! grammar   → Schema construct tree, builder, validate, optimize
//! registry  → Named types, elements, attributes; built-in XSD types
//!   ↓
//! namespace → Prefix bindings and canonical names
//! ```
//!
//! `config` carries the knobs that steer resolution and `interchange`
//! reads schemas and snapshot files.

// ============================================================================
// MODULES (dependency order: namespace → grammar/registry → graph → beans)
// ============================================================================

/// Error type shared by every stage
pub mod error;

/// Namespace prefix bindings and qualified-name helpers
pub mod namespace;

/// Schema construct tree and its stack-driven builder
pub mod grammar;

/// Registry of named types, top-level elements and attributes
pub mod registry;

/// Content graph handed to the bean resolver
pub mod graph;

/// Bean resolution: names, types, cardinalities, finders
pub mod beans;

/// Resolver configuration and per-element metadata
pub mod config;

/// Schema and snapshot interchange: XSD, JSON, YAML
#[cfg(feature = "interchange")]
pub mod interchange;

// Re-export the pipeline entry points
pub use beans::{BeanBuilder, BeanElement, BeanGraph, BeanModel, Property, TypeTag};
pub use config::{BuilderConfig, MetaDd, MetaElement};
pub use error::{Result, SchemaError};
pub use grammar::{Construct, Grammar, GrammarBuilder, NodeKind};
pub use graph::{Cardinality, ContentGraph, SchemaTreeParser, TreeParser};
pub use namespace::NamespaceTable;
