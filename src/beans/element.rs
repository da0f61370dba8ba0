//! Resolved record-type descriptors.

use smol_str::SmolStr;

use super::finder::ResolvedFinder;
use super::host_types::TypeTag;
use super::property::Property;
use crate::graph::GraphNodeId;

/// The resolved descriptor for one content-graph node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeanElement {
    pub node: GraphNodeId,
    pub schema_name: SmolStr,
    pub namespace: Option<SmolStr>,
    /// Canonical class name (for beans) or converted schema name.
    pub name: String,
    /// Host type this element is represented by.
    pub class_type: String,
    pub tag: TypeTag,
    pub is_root: bool,
    pub is_abstract: bool,
    /// Some other bean extends this one.
    pub is_extended: bool,
    /// Full class type of the supertype.
    pub extends: Option<String>,
    pub implements: Vec<String>,
    /// Interface the generated interface extends.
    pub interface_extends: Option<String>,
    /// A boolean element whose presence is its value.
    pub can_be_empty: bool,
    /// Whether a class is generated for this element.
    pub created: bool,
    /// Host type came from user metadata.
    pub type_set_externally: bool,
    /// Stands for a `#PCDATA` or `EMPTY` marker node.
    pub is_marker: bool,
    pub properties: Vec<Property>,
    pub non_attribute_property_count: usize,
    pub finders: Vec<ResolvedFinder>,
}

impl BeanElement {
    pub(crate) fn new(node: GraphNodeId, schema_name: SmolStr, namespace: Option<SmolStr>) -> Self {
        let name = super::naming::class_name(&schema_name);
        Self {
            node,
            schema_name,
            namespace,
            class_type: name.clone(),
            name,
            tag: TypeTag::Bean,
            is_root: false,
            is_abstract: false,
            is_extended: false,
            extends: None,
            implements: Vec::new(),
            interface_extends: None,
            can_be_empty: false,
            created: true,
            type_set_externally: false,
            is_marker: false,
            properties: Vec::new(),
            non_attribute_property_count: 0,
            finders: Vec::new(),
        }
    }

    /// Whether a record type is generated for this element.
    pub fn is_bean(&self) -> bool {
        self.tag.is_bean()
    }

    /// Class type qualified with `package` for created beans.
    pub fn full_class_type(&self, package: &str) -> String {
        if self.created && self.is_bean() && !package.is_empty() {
            format!("{package}.{}", self.class_type)
        } else {
            self.class_type.clone()
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }
}
