//! Content graph nodes, links and attribute descriptors.

use smol_str::SmolStr;

use super::cardinality::Cardinality;

/// Name of the marker node for character content.
pub const PCDATA: &str = "#PCDATA";
/// Name of the marker node for elements with no content.
pub const EMPTY: &str = "EMPTY";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphNodeId(u32);

impl GraphNodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphLinkId(u32);

impl GraphLinkId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A candidate record type.
#[derive(Clone, Debug, Default)]
pub struct GraphNode {
    /// Schema name (element or type local name).
    pub name: SmolStr,
    pub namespace: Option<SmolStr>,
    /// Whether a record type should be generated for this node.
    pub created: bool,
    pub is_abstract: bool,
    /// Host-language type, when the node maps onto one.
    pub java_type: Option<SmolStr>,
    /// Top-level child slots, in document order.
    pub links: Vec<GraphLinkId>,
    pub attributes: Vec<AttrProp>,
    /// Supertype node, for `complexContent/extension`.
    pub extension: Option<GraphNodeId>,
    /// `#PCDATA` and `EMPTY` markers.
    pub marker: bool,
}

impl GraphNode {
    pub fn new(name: impl Into<SmolStr>, namespace: Option<SmolStr>) -> Self {
        Self {
            name: name.into(),
            namespace,
            created: true,
            ..Self::default()
        }
    }

    pub(crate) fn marker(name: &'static str) -> Self {
        Self {
            name: SmolStr::new_static(name),
            marker: true,
            ..Self::default()
        }
    }

    /// `{namespace}name`, or the bare name.
    pub fn name_with_namespace(&self) -> String {
        crate::namespace::canonical_qname(self.namespace.as_deref(), &self.name)
    }
}

/// A child slot of a node, or a grouping of slots.
#[derive(Clone, Debug, Default)]
pub struct GraphLink {
    /// Element name for a named slot; `None` for pure grouping links.
    pub name: Option<SmolStr>,
    pub namespace: Option<SmolStr>,
    /// Node this slot holds.
    pub element: Option<GraphNodeId>,
    /// Occurrence of the element itself.
    pub element_instance: Cardinality,
    /// Occurrence of the group this link opens.
    pub group_instance: Cardinality,
    /// Children of this link are alternatives (`choice`).
    pub sequence_or: bool,
    /// Children of this link co-occur (`sequence`/`all`).
    pub sequence_and: bool,
    pub nillable: bool,
    pub default_value: Option<SmolStr>,
    pub children: Vec<GraphLinkId>,
    pub parent: Option<GraphLinkId>,
    /// Record whose content this link belongs to.
    pub owner: Option<GraphNodeId>,
}

impl GraphLink {
    /// A named slot for `element`.
    pub fn named(name: impl Into<SmolStr>, element: GraphNodeId, instance: Cardinality) -> Self {
        Self {
            name: Some(name.into()),
            element: Some(element),
            element_instance: instance,
            ..Self::default()
        }
    }

    /// An anonymous grouping link.
    pub fn grouping(instance: Cardinality, sequence_or: bool) -> Self {
        Self {
            group_instance: instance,
            sequence_or,
            sequence_and: !sequence_or,
            ..Self::default()
        }
    }

    pub fn is_grouping(&self) -> bool {
        self.name.is_none() && self.element.is_none()
    }
}

/// An attribute carried by a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttrProp {
    /// Local attribute name.
    pub name: SmolStr,
    pub namespace: Option<SmolStr>,
    pub java_type: Option<SmolStr>,
    pub default_value: Option<SmolStr>,
    pub fixed: bool,
    /// `One` for required attributes, `ZeroOrOne` for optional ones.
    pub instance: Cardinality,
    /// Enumeration facet values of the attribute's type.
    pub enumeration: Vec<SmolStr>,
}
