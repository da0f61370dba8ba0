//! Lowering an optimized grammar into a content graph.
//!
//! Elements with complex content and named complex types become record
//! nodes. Elements with simple content become leaf nodes whose only slot
//! holds the `#PCDATA` marker. Model groups become anonymous grouping
//! links; element and group `ref`s are followed; `complexContent/extension`
//! wires the extension edge.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use super::cardinality::Cardinality;
use super::node::{AttrProp, GraphLink, GraphNode, GraphNodeId};
use super::{ContentGraph, LinkParent, TreeParser};
use crate::error::{Result, SchemaError};
use crate::grammar::{AttributeUse, Construct, FacetKind, Grammar, NodeId, NodeKind};
use crate::namespace::remove_prefix;

/// Default [`TreeParser`]: a content graph lowered from a [`Grammar`].
#[derive(Clone, Debug)]
pub struct SchemaTreeParser {
    graph: ContentGraph,
}

impl SchemaTreeParser {
    /// Lower `grammar`, rooted at its first top-level element.
    pub fn parse(grammar: &Grammar) -> Result<Self> {
        Self::parse_with_root(grammar, None)
    }

    /// Lower `grammar`, rooted at the top-level element called `root_name`
    /// when given.
    pub fn parse_with_root(grammar: &Grammar, root_name: Option<&str>) -> Result<Self> {
        let graph = Lowering::new(grammar).run(root_name)?;
        Ok(Self { graph })
    }

    pub fn into_graph(self) -> ContentGraph {
        self.graph
    }
}

impl TreeParser for SchemaTreeParser {
    fn graph(&self) -> &ContentGraph {
        &self.graph
    }
}

struct Lowering<'g> {
    grammar: &'g Grammar,
    graph: ContentGraph,
    lowered: FxHashMap<NodeId, GraphNodeId>,
    /// Group definitions currently being expanded.
    expanding: FxHashSet<NodeId>,
}

impl<'g> Lowering<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            graph: ContentGraph::new(),
            lowered: FxHashMap::default(),
            expanding: FxHashSet::default(),
        }
    }

    fn run(mut self, root_name: Option<&str>) -> Result<ContentGraph> {
        let top = self.grammar.root().ok_or(SchemaError::MissingRoot)?;
        let root_element = match self.grammar.kind(top) {
            NodeKind::Element => top,
            _ => self.pick_root(top, root_name).ok_or(SchemaError::MissingRoot)?,
        };
        let target = self.grammar.namespaces().target_namespace();
        self.graph.set_default_namespace(target);

        let root = self.element_node(root_element)?;
        self.graph.set_root(root);

        // Remaining top-level declarations are candidates too.
        for &child in self.grammar.children(top) {
            match self.grammar.construct(child) {
                Construct::Element(_) => {
                    self.element_node(child)?;
                }
                Construct::ComplexType(decl) if decl.name.is_some() => {
                    self.type_node(child)?;
                }
                _ => {}
            }
        }
        debug!(
            nodes = self.graph.node_count(),
            links = self.graph.link_count(),
            "lowered content graph"
        );
        Ok(self.graph)
    }

    fn pick_root(&self, schema: NodeId, root_name: Option<&str>) -> Option<NodeId> {
        let mut elements = self
            .grammar
            .children(schema)
            .iter()
            .copied()
            .filter(|c| self.grammar.kind(*c) == NodeKind::Element);
        match root_name {
            Some(wanted) => elements.find(|c| {
                self.grammar.content_name(*c).as_deref() == Some(remove_prefix(wanted))
            }),
            None => elements.next(),
        }
    }

    // ========================================================================
    // NODES
    // ========================================================================

    fn element_node(&mut self, element: NodeId) -> Result<GraphNodeId> {
        if let Some(id) = self.lowered.get(&element) {
            return Ok(*id);
        }
        let Construct::Element(decl) = self.grammar.construct(element) else {
            return Err(SchemaError::wrong_construct(
                "lower as element",
                self.grammar.kind(element).as_str(),
            ));
        };

        if decl.reference.is_some() {
            let target = self.require_ref(element)?;
            let id = self.element_node(target)?;
            self.lowered.insert(element, id);
            return Ok(id);
        }

        let name = SmolStr::from(decl.local_name().unwrap_or_default());
        let namespace = decl.namespace.clone();

        if let Some(type_name) = &decl.type_name {
            let definition = self.grammar.require_type(type_name, element)?;
            if self.grammar.kind(definition) == NodeKind::ComplexType {
                let id = self.type_node(definition)?;
                self.lowered.insert(element, id);
                return Ok(id);
            }
            let host = decl
                .java_type
                .clone()
                .or_else(|| self.grammar.host_type_name(definition));
            let id = self.leaf_node(name, namespace, host);
            self.lowered.insert(element, id);
            return Ok(id);
        }

        if let Some(complex) = self.grammar.find_child(element, NodeKind::ComplexType) {
            let mut node = GraphNode::new(name, namespace);
            node.is_abstract = decl.is_abstract;
            let id = self.graph.add_node(node);
            self.lowered.insert(element, id);
            self.complex_type_content(complex, id)?;
            return Ok(id);
        }

        let host = decl.java_type.clone().or_else(|| {
            self.grammar
                .find_child(element, NodeKind::SimpleType)
                .and_then(|simple| self.grammar.host_type_name(simple))
        });
        let id = self.leaf_node(name, namespace, host);
        self.lowered.insert(element, id);
        Ok(id)
    }

    fn type_node(&mut self, complex: NodeId) -> Result<GraphNodeId> {
        if let Some(id) = self.lowered.get(&complex) {
            return Ok(*id);
        }
        let Construct::ComplexType(decl) = self.grammar.construct(complex) else {
            return Err(SchemaError::wrong_construct(
                "lower as complex type",
                self.grammar.kind(complex).as_str(),
            ));
        };
        let qualified = decl.name.clone().unwrap_or_default();
        let namespace = self.grammar.namespaces().namespace_of(&qualified)?;
        let mut node = GraphNode::new(remove_prefix(&qualified), namespace);
        node.is_abstract = decl.is_abstract;
        let id = self.graph.add_node(node);
        self.lowered.insert(complex, id);
        self.complex_type_content(complex, id)?;
        Ok(id)
    }

    fn leaf_node(
        &mut self,
        name: SmolStr,
        namespace: Option<SmolStr>,
        host: Option<SmolStr>,
    ) -> GraphNodeId {
        let mut node = GraphNode::new(name, namespace);
        node.java_type = host;
        let id = self.graph.add_node(node);
        self.add_pcdata(id, Cardinality::One);
        id
    }

    fn add_pcdata(&mut self, node: GraphNodeId, instance: Cardinality) {
        let marker = self.graph.pcdata_marker();
        let link = GraphLink::named(super::PCDATA, marker, instance);
        self.graph.add_link(LinkParent::Node(node), link);
    }

    // ========================================================================
    // CONTENT
    // ========================================================================

    fn complex_type_content(&mut self, complex: NodeId, node: GraphNodeId) -> Result<()> {
        let mixed = matches!(
            self.grammar.construct(complex),
            Construct::ComplexType(decl) if decl.mixed
        );
        for &child in self.grammar.children(complex) {
            match self.grammar.kind(child) {
                NodeKind::SimpleContent => self.simple_content(child, node)?,
                NodeKind::ComplexContent => self.complex_content(child, node)?,
                _ => self.particle_or_attribute(child, node)?,
            }
        }
        if mixed {
            self.add_pcdata(node, Cardinality::ZeroOrOne);
        }
        let lowered = self.graph.node(node);
        if lowered.links.is_empty() && lowered.attributes.is_empty() && lowered.extension.is_none() {
            let marker = self.graph.empty_marker();
            let link = GraphLink::named(super::EMPTY, marker, Cardinality::One);
            self.graph.add_link(LinkParent::Node(node), link);
        }
        Ok(())
    }

    /// Model groups and attribute declarations shared by complex types,
    /// extensions and restrictions.
    fn particle_or_attribute(&mut self, child: NodeId, node: GraphNodeId) -> Result<()> {
        match self.grammar.kind(child) {
            NodeKind::Sequence | NodeKind::Choice | NodeKind::All | NodeKind::Group => {
                self.model_group(child, LinkParent::Node(node))
            }
            NodeKind::Attribute => self.attribute(child, node),
            NodeKind::AttributeGroup => self.attribute_group(child, node),
            _ => Ok(()),
        }
    }

    fn simple_content(&mut self, content: NodeId, node: GraphNodeId) -> Result<()> {
        for &derivation in self.grammar.children(content) {
            let base = match self.grammar.construct(derivation) {
                Construct::Extension { base } | Construct::Restriction { base } => base.clone(),
                _ => continue,
            };
            if let Some(base) = base {
                let definition = self.require_base(&base, derivation)?;
                self.graph.node_mut(node).java_type = self.grammar.host_type_name(definition);
            }
            self.add_pcdata(node, Cardinality::One);
            for &child in self.grammar.children(derivation) {
                self.particle_or_attribute(child, node)?;
            }
        }
        Ok(())
    }

    fn complex_content(&mut self, content: NodeId, node: GraphNodeId) -> Result<()> {
        for &derivation in self.grammar.children(content) {
            match self.grammar.construct(derivation) {
                Construct::Extension { base } => {
                    if let Some(base) = base.clone().filter(|b| !is_any_type(b)) {
                        let definition = self.require_base(&base, derivation)?;
                        if self.grammar.kind(definition) == NodeKind::ComplexType {
                            let supertype = self.type_node(definition)?;
                            trace!(%base, "extension edge");
                            self.graph.node_mut(node).extension = Some(supertype);
                        }
                    }
                }
                Construct::Restriction { .. } => {}
                _ => continue,
            }
            for &child in self.grammar.children(derivation) {
                self.particle_or_attribute(child, node)?;
            }
        }
        Ok(())
    }

    fn model_group(&mut self, group: NodeId, parent: LinkParent) -> Result<()> {
        let construct = self.grammar.construct(group);
        let instance = construct
            .occurs()
            .map(Cardinality::from_occurs)
            .unwrap_or_default();

        let (body, is_choice) = if construct.reference().is_some() {
            let target = self.require_ref(group)?;
            (target, false)
        } else {
            (group, construct.kind() == NodeKind::Choice)
        };

        if !self.expanding.insert(body) {
            warn!(
                path = self.grammar.full_content_path(group),
                "recursive group reference, not expanded again"
            );
            return Ok(());
        }
        let link = self
            .graph
            .add_link(parent, GraphLink::grouping(instance, is_choice));
        for &child in self.grammar.children(body) {
            match self.grammar.kind(child) {
                NodeKind::Element => self.element_link(child, LinkParent::Link(link))?,
                NodeKind::Sequence | NodeKind::Choice | NodeKind::All | NodeKind::Group => {
                    self.model_group(child, LinkParent::Link(link))?
                }
                NodeKind::Any => {
                    debug!(
                        path = self.grammar.full_content_path(child),
                        "wildcard content has no property"
                    );
                }
                _ => {}
            }
        }
        self.expanding.remove(&body);
        Ok(())
    }

    fn element_link(&mut self, element: NodeId, parent: LinkParent) -> Result<()> {
        let target = self.element_node(element)?;
        let Construct::Element(decl) = self.grammar.construct(element) else {
            return Ok(());
        };
        // Occurrence belongs to the use site; nillable and default to the declaration.
        let declaration = match decl.reference {
            Some(_) => match self.grammar.resolve_ref(element)? {
                Some(def) => match self.grammar.construct(def) {
                    Construct::Element(def) => def,
                    _ => decl,
                },
                None => decl,
            },
            None => decl,
        };
        let name = decl.local_name().unwrap_or_default();
        let mut link = GraphLink::named(name, target, Cardinality::from_occurs(decl.occurs));
        link.namespace = declaration.namespace.clone();
        link.nillable = declaration.nillable;
        link.default_value = declaration.default_value.clone();
        self.graph.add_link(parent, link);
        Ok(())
    }

    // ========================================================================
    // ATTRIBUTES
    // ========================================================================

    fn attribute(&mut self, attribute: NodeId, node: GraphNodeId) -> Result<()> {
        let Construct::Attribute(usage) = self.grammar.construct(attribute) else {
            return Ok(());
        };
        if usage.use_ == AttributeUse::Prohibited {
            return Ok(());
        }
        let definition_id = if usage.reference.is_some() {
            self.require_ref(attribute)?
        } else {
            attribute
        };
        let Construct::Attribute(definition) = self.grammar.construct(definition_id) else {
            return Ok(());
        };

        let simple_type = match &definition.type_name {
            Some(type_name) => Some(self.grammar.require_type(type_name, definition_id)?),
            None => self.grammar.find_child(definition_id, NodeKind::SimpleType),
        };
        let java_type = simple_type.and_then(|t| self.grammar.host_type_name(t));
        let enumeration = simple_type
            .map(|t| self.enumeration_values(t))
            .unwrap_or_default();

        let fixed = usage.fixed.clone().or_else(|| definition.fixed.clone());
        let default_value = usage
            .default_value
            .clone()
            .or_else(|| definition.default_value.clone())
            .or_else(|| fixed.clone());
        let instance = match usage.use_ {
            AttributeUse::Required => Cardinality::One,
            _ => Cardinality::ZeroOrOne,
        };
        let attr = AttrProp {
            name: SmolStr::from(definition.local_name().unwrap_or_default()),
            namespace: definition.namespace.clone(),
            java_type,
            default_value,
            fixed: fixed.is_some(),
            instance,
            enumeration,
        };
        trace!(name = %attr.name, "attribute");
        self.graph.node_mut(node).attributes.push(attr);
        Ok(())
    }

    fn attribute_group(&mut self, group: NodeId, node: GraphNodeId) -> Result<()> {
        let body = if self.grammar.construct(group).reference().is_some() {
            self.require_ref(group)?
        } else {
            group
        };
        if !self.expanding.insert(body) {
            return Ok(());
        }
        for &child in self.grammar.children(body) {
            match self.grammar.kind(child) {
                NodeKind::Attribute => self.attribute(child, node)?,
                NodeKind::AttributeGroup => self.attribute_group(child, node)?,
                _ => {}
            }
        }
        self.expanding.remove(&body);
        Ok(())
    }

    fn enumeration_values(&self, simple_type: NodeId) -> Vec<SmolStr> {
        let Some(restriction) = self.grammar.find_child(simple_type, NodeKind::Restriction) else {
            return Vec::new();
        };
        self.grammar
            .children(restriction)
            .iter()
            .filter_map(|facet| match self.grammar.construct(*facet) {
                Construct::Facet {
                    kind: FacetKind::Enumeration,
                    value,
                } => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    // ========================================================================
    // REFERENCES
    // ========================================================================

    fn require_ref(&self, id: NodeId) -> Result<NodeId> {
        match self.grammar.resolve_ref(id)? {
            Some(target) => Ok(target),
            None => Err(SchemaError::unresolved_ref(
                self.grammar.construct(id).reference().unwrap_or_default(),
                self.grammar.full_content_path(id),
            )),
        }
    }

    fn require_base(&self, base: &str, derivation: NodeId) -> Result<NodeId> {
        self.grammar
            .lookup_type(base)?
            .ok_or_else(|| SchemaError::unresolved_base(base, self.grammar.full_content_path(derivation)))
    }
}

fn is_any_type(name: &str) -> bool {
    remove_prefix(name) == "anyType"
}
