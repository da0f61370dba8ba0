//! Property resolution: content graph in, bean model out.
//!
//! ```text
//! ContentGraph ──BeanBuilder::resolve──▶ BeanModel
//!                     │                     ├── BeanElement (per node)
//!                     │                     │     └── Property (ordered, collision-free)
//!                     │                     ├── const names
//!                     │                     └── BeanGraph snapshot
//!                     └── BuilderConfig (metadata, finders, snapshots)
//! ```

mod builder;
mod element;
mod finder;
mod host_types;
mod model;
pub mod naming;
mod property;
mod snapshot;

pub use builder::BeanBuilder;
pub use element::BeanElement;
pub use finder::{FinderExpr, PropertyRef, ResolvedFinder};
pub use host_types::{TypeTag, is_primitive, to_object_type};
pub use model::BeanModel;
pub use property::{Property, PropertyOrigin};
pub use snapshot::{BeanGraph, SchemaTypeMapping};
