//! The resolved bean model handed to code emitters.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::element::BeanElement;
use super::finder::PropertyRef;
use super::property::Property;
use super::snapshot::{BeanGraph, SchemaTypeMapping};
use crate::graph::GraphNodeId;

/// Every bean element in document order, plus run-wide tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeanModel {
    pub(crate) beans: IndexMap<GraphNodeId, BeanElement>,
    pub(crate) root: GraphNodeId,
    pub(crate) package: String,
    pub(crate) const_names: IndexMap<String, SmolStr>,
    pub(crate) tags_class_name: String,
}

impl BeanModel {
    /// Every element, markers included, in document order.
    pub fn elements(&self) -> impl Iterator<Item = &BeanElement> {
        self.beans.values()
    }

    /// Elements that generate a record type.
    pub fn beans(&self) -> impl Iterator<Item = &BeanElement> {
        self.beans.values().filter(|b| b.is_bean())
    }

    pub fn bean(&self, node: GraphNodeId) -> Option<&BeanElement> {
        self.beans.get(&node)
    }

    /// First record type with class name `name`.
    pub fn bean_named(&self, name: &str) -> Option<&BeanElement> {
        self.beans().find(|b| b.name == name)
    }

    pub fn root(&self) -> &BeanElement {
        &self.beans[&self.root]
    }

    pub fn property(&self, reference: &PropertyRef) -> Option<&Property> {
        self.beans
            .get(&reference.bean)
            .and_then(|b| b.properties.get(reference.index))
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Constant name to schema name, in first-seen order.
    pub fn const_names(&self) -> &IndexMap<String, SmolStr> {
        &self.const_names
    }

    /// Class name of the tags artifact.
    pub fn tags_class_name(&self) -> &str {
        &self.tags_class_name
    }

    /// Snapshot of this run for reuse by later runs.
    pub fn bean_graph(&self) -> BeanGraph {
        let mut graph = BeanGraph::new();
        for bean in self.beans.values().filter(|b| !b.is_marker) {
            graph.push(SchemaTypeMapping {
                schema_type_name: bean.schema_name.to_string(),
                schema_type_namespace: bean.namespace.as_ref().map(SmolStr::to_string),
                java_type: bean.full_class_type(&self.package),
                root: bean.is_root,
                bean: bean.is_bean(),
                can_be_empty: bean.can_be_empty,
            });
        }
        graph
    }
}
