//! Reading and writing the artifacts around bean resolution.
//!
//! - **XSD** - XML Schema documents into and out of a [`Grammar`](crate::grammar::Grammar)
//! - **JSON / YAML** - bean-graph snapshots recording which schema types
//!   already have generated classes
//!
//! ```text
//! ┌──────────────┐                         ┌──────────────┐
//! │   .xsd file  │                         │ .json / .yaml│
//! └──────┬───────┘                         └──────┬───────┘
//!        │ Xsd::read                              │ SnapshotFormat::read
//!        ▼                                        ▼
//! ┌──────────────┐   lower   ┌─────────┐   ┌──────────────┐
//! │   Grammar    │ ────────▶ │  graph  │──▶│  BeanGraph   │──▶ BeanBuilder
//! └──────────────┘           └─────────┘   └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use beangen::interchange::{Xsd, read_bean_graph};
//!
//! let grammar = Xsd::new().read(&std::fs::read("po.xsd")?)?;
//! let snapshot = read_bean_graph("common.json".as_ref())?;
//! ```

mod bean_graph;
mod format;
mod xsd;

pub use bean_graph::{Json, Yaml, detect_format, read_bean_graph, write_bean_graph};
pub use format::SnapshotFormat;
pub use xsd::Xsd;
