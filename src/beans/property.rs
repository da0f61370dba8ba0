//! Resolved properties of a bean.

use smol_str::SmolStr;

use super::host_types::TypeTag;
use crate::graph::{Cardinality, GraphNodeId};

/// Where a property's value comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PropertyOrigin {
    /// A child element slot.
    #[default]
    Element,
    /// An attribute of the owning bean.
    Attribute,
    /// An attribute of the leaf element held by property `owner`.
    FlattenedAttribute { owner: String },
    /// The synthetic comment list.
    Comments,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    /// Schema name the property was derived from.
    pub schema_name: SmolStr,
    pub namespace: Option<SmolStr>,
    /// Constant naming this property in the tags table.
    pub const_name: String,
    pub class_type: String,
    pub tag: TypeTag,
    /// Occurrence after widening with every enclosing group.
    pub cardinality: Cardinality,
    pub element_instance: Cardinality,
    pub group_instance: Cardinality,
    /// Mutually exclusive with a sibling.
    pub ored: bool,
    pub origin: PropertyOrigin,
    pub default_value: Option<SmolStr>,
    pub nillable: bool,
    pub can_be_empty: bool,
    /// Node the property holds, for element properties.
    pub target: Option<GraphNodeId>,
    /// Grouping depth the slot was found at.
    pub nested_level: usize,
    /// Enumeration restrictions on the value.
    pub known_values: Vec<String>,
}

impl Property {
    pub(crate) fn new(name: String, schema_name: SmolStr, const_name: String) -> Self {
        Self {
            name,
            schema_name,
            namespace: None,
            const_name,
            class_type: TypeTag::String.wrapper_class().to_string(),
            tag: TypeTag::String,
            cardinality: Cardinality::One,
            element_instance: Cardinality::One,
            group_instance: Cardinality::One,
            ored: false,
            origin: PropertyOrigin::Element,
            default_value: None,
            nillable: false,
            can_be_empty: false,
            target: None,
            nested_level: 0,
            known_values: Vec::new(),
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(
            self.origin,
            PropertyOrigin::Attribute | PropertyOrigin::FlattenedAttribute { .. }
        )
    }

    pub fn is_indexed(&self) -> bool {
        self.cardinality.is_multiple()
    }

    pub fn is_bean(&self) -> bool {
        self.tag.is_bean()
    }
}
