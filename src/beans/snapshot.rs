//! Bean-graph snapshots: which schema types earlier runs already generated.

#[cfg(feature = "interchange")]
use serde::{Deserialize, Serialize};

use crate::namespace::canonical_qname;

/// One previously generated (or externally mapped) schema type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "kebab-case"))]
pub struct SchemaTypeMapping {
    pub schema_type_name: String,
    #[cfg_attr(
        feature = "interchange",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub schema_type_namespace: Option<String>,
    /// Host type that stands for the schema type.
    pub java_type: String,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub root: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub bean: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub can_be_empty: bool,
}

impl SchemaTypeMapping {
    pub fn new(schema_type_name: impl Into<String>, java_type: impl Into<String>) -> Self {
        Self {
            schema_type_name: schema_type_name.into(),
            java_type: java_type.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.schema_type_namespace = Some(namespace.into());
        self
    }

    /// `{namespace}name`, the key graph nodes are matched on.
    pub fn key(&self) -> String {
        canonical_qname(self.schema_type_namespace.as_deref(), &self.schema_type_name)
    }
}

/// A serializable list of [`SchemaTypeMapping`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "kebab-case"))]
pub struct BeanGraph {
    #[cfg_attr(feature = "interchange", serde(default))]
    pub schema_type_mappings: Vec<SchemaTypeMapping>,
}

impl BeanGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mapping: SchemaTypeMapping) {
        self.schema_type_mappings.push(mapping);
    }

    pub fn mappings(&self) -> &[SchemaTypeMapping] {
        &self.schema_type_mappings
    }

    pub fn is_empty(&self) -> bool {
        self.schema_type_mappings.is_empty()
    }

    /// The last mapping whose key equals `key`.
    pub fn find(&self, key: &str) -> Option<&SchemaTypeMapping> {
        self.schema_type_mappings.iter().rev().find(|m| m.key() == key)
    }
}
