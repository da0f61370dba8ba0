//! Grammar model: an arena of schema constructs with per-kind child rules,
//! content paths, a namespace-aware type registry, validation and an
//! optimize pass.
//!
//! ```text
//! builder   → stack-driven construction from a depth-first reader
//!   ↓
//! tree      → Grammar arena, NodeId, content paths, registry access
//!   ↓
//! construct → per-kind payloads (ElementDecl, Occurs, ...)
//!   ↓
//! kind      → NodeKind and the allowed-children tables
//! ```

mod builder;
mod construct;
mod kind;
mod optimize;
mod tree;
mod validate;

pub use builder::GrammarBuilder;
pub use construct::{
    AttributeDecl, AttributeUse, ComplexTypeDecl, Construct, ElementDecl, GroupDecl, MaxOccurs,
    Occurs, RefOrName, SchemaDecl, SimpleTypeDecl, Wildcard,
};
pub use kind::{FacetKind, NodeKind};
pub use optimize::Optimized;
pub use tree::{Grammar, GrammarNode, NodeId, UNIQUE_PATH_SUFFIX};

#[cfg(test)]
mod tests;
