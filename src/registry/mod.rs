//! Type registry: named definitions keyed by canonical qualified name, plus
//! the built-in XML Schema types every grammar starts with.

mod predefined;
mod types;

pub use predefined::install_predefined_types;
pub use types::TypeRegistry;
