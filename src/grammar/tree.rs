//! Arena storage for grammar nodes.
//!
//! Nodes are addressed by [`NodeId`] and never move. Parent links and child
//! lists are ids into the same arena, so cross references never alias live
//! nodes. Nodes removed by the optimize pass stay in the arena, detached.

use std::cell::OnceCell;

use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use super::construct::Construct;
use super::kind::NodeKind;
use crate::error::{Result, SchemaError};
use crate::namespace::{NamespaceTable, canonical_qname, remove_prefix};
use crate::registry::{TypeRegistry, install_predefined_types};

/// Suffix segment appended to a content path that collides with a sibling's.
pub const UNIQUE_PATH_SUFFIX: &str = "#";

/// Unique identifier for a node in a [`Grammar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One construct in the arena together with its tree links.
#[derive(Clone, Debug)]
pub struct GrammarNode {
    construct: Construct,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Number of times the content path was uniquified.
    uniquified: u32,
    content_path: OnceCell<String>,
}

impl GrammarNode {
    fn new(construct: Construct) -> Self {
        Self {
            construct,
            parent: None,
            children: Vec::new(),
            uniquified: 0,
            content_path: OnceCell::new(),
        }
    }

    pub fn construct(&self) -> &Construct {
        &self.construct
    }

    pub fn kind(&self) -> NodeKind {
        self.construct.kind()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The grammar of one input document: node arena, namespace context and
/// type registry.
#[derive(Clone, Debug)]
pub struct Grammar {
    nodes: Vec<GrammarNode>,
    root: Option<NodeId>,
    namespaces: NamespaceTable,
    registry: TypeRegistry,
    element_form_qualified: bool,
    use_big_data_types: bool,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    /// A grammar with the predefined XML Schema types registered, mapping
    /// `decimal`/`integer` onto arbitrary-precision types.
    pub fn new() -> Self {
        Self::with_big_data_types(true)
    }

    pub fn with_big_data_types(use_big_data_types: bool) -> Self {
        let mut grammar = Self {
            nodes: Vec::new(),
            root: None,
            namespaces: NamespaceTable::new(),
            registry: TypeRegistry::default(),
            element_form_qualified: false,
            use_big_data_types,
        };
        install_predefined_types(&mut grammar);
        grammar
    }

    pub fn uses_big_data_types(&self) -> bool {
        self.use_big_data_types
    }

    // ========================================================================
    // ARENA ACCESS
    // ========================================================================

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &GrammarNode {
        &self.nodes[id.index()]
    }

    pub fn construct(&self, id: NodeId) -> &Construct {
        &self.nodes[id.index()].construct
    }

    /// Mutable access to a construct's fields.
    ///
    /// Renaming through this handle bypasses the registry; use it for
    /// occurrence bounds, defaults and flags.
    pub fn construct_mut(&mut self, id: NodeId) -> &mut Construct {
        &mut self.nodes[id.index()].construct
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.construct(id).kind()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `id` the top of the tree. A schema root brings its target
    /// namespace into the namespace context.
    pub fn set_root(&mut self, id: NodeId) {
        if let Construct::Schema(decl) = self.construct(id) {
            let target = decl.target_namespace.clone();
            self.element_form_qualified = decl.element_form_qualified;
            self.namespaces.set_target_namespace(target.as_deref());
        }
        self.root = Some(id);
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceTable {
        &mut self.namespaces
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Allocate a detached node.
    ///
    /// Named types, groups and attribute groups are registered under their
    /// name, normalized against the active target namespace.
    pub fn alloc(&mut self, mut construct: Construct) -> Result<NodeId> {
        let id = NodeId::new(self.nodes.len());
        let type_name = match &mut construct {
            Construct::ComplexType(decl) => normalize_slot(&mut self.namespaces, &mut decl.name),
            Construct::SimpleType(decl) => normalize_slot(&mut self.namespaces, &mut decl.name),
            Construct::Group(decl) => normalize_slot(&mut self.namespaces, &mut decl.name),
            Construct::AttributeGroup(decl) => {
                normalize_slot(&mut self.namespaces, &mut decl.name)
            }
            _ => None,
        };
        let is_simple_type = matches!(construct, Construct::SimpleType(_));
        self.nodes.push(GrammarNode::new(construct));

        if let Some(name) = type_name {
            if is_simple_type && self.has_richer_simple_type(&name)? {
                debug!(%name, "keeping earlier, more specific simple type definition");
            } else {
                self.define_type(&name, id)?;
            }
        }
        Ok(id)
    }

    /// Allocate a built-in type node registered under an already-canonical key.
    pub(crate) fn alloc_predefined(&mut self, construct: Construct, key: String) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(GrammarNode::new(construct));
        self.registry.put_canonical(key, id);
        id
    }

    pub(crate) fn alloc_predefined_child(&mut self, parent: NodeId, construct: Construct) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(GrammarNode::new(construct));
        self.add_child(parent, id);
        id
    }

    pub(crate) fn alloc_predefined_attribute(&mut self, construct: Construct, key: String) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(GrammarNode::new(construct));
        self.registry.define_attribute(key, id);
        id
    }

    /// Allocate a node and append it under `parent`.
    pub fn push_child(&mut self, parent: NodeId, construct: Construct) -> Result<NodeId> {
        let child = self.alloc(construct)?;
        self.add_child(parent, child);
        Ok(child)
    }

    /// Append `child` under `parent`.
    ///
    /// A named element whose full content path collides with any node
    /// already below `parent` gets `/#` appended, repeatedly, until its
    /// path is unique. Top-level elements and attributes are registered.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.invalidate_paths(child);

        let parent_kind = self.kind(parent);
        if parent_kind == NodeKind::Schema {
            self.qualify_top_level(child);
        }

        if self.kind(child) == NodeKind::Element {
            self.uniquify_against(parent, child);
        }
        self.nodes[parent.index()].children.push(child);

        if parent_kind == NodeKind::Schema {
            self.register_top_level(child);
        }
    }

    /// Detach `child` from its parent's child list.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.retain(|c| *c != child);
        self.nodes[child.index()].parent = None;
        self.invalidate_paths(child);
    }

    fn qualify_top_level(&mut self, child: NodeId) {
        let target = self.namespaces.target_namespace().map(SmolStr::from);
        match &mut self.nodes[child.index()].construct {
            Construct::Element(decl) if decl.namespace.is_none() => decl.namespace = target,
            Construct::Attribute(decl) if decl.namespace.is_none() => decl.namespace = target,
            _ => {}
        }
    }

    fn register_top_level(&mut self, child: NodeId) {
        match self.construct(child) {
            Construct::Element(decl) => {
                if let Some(name) = decl.name.clone() {
                    let local = remove_prefix(&name).to_string();
                    let full = canonical_qname(decl.namespace.as_deref(), &local);
                    trace!(%full, "registering top-level element");
                    self.registry.define_element(&local, full, child);
                }
            }
            Construct::Attribute(decl) => {
                if let Some(name) = decl.name.clone() {
                    let full = canonical_qname(decl.namespace.as_deref(), remove_prefix(&name));
                    self.registry.define_attribute(full, child);
                }
            }
            _ => {}
        }
    }

    /// Elements below a non-schema parent pick up the target namespace
    /// when the schema says element forms are qualified.
    pub fn element_namespace_for(&self, parent: NodeId) -> Option<SmolStr> {
        if self.kind(parent) == NodeKind::Schema || self.element_form_qualified {
            self.namespaces.target_namespace().map(SmolStr::from)
        } else {
            None
        }
    }

    // ========================================================================
    // CONTENT PATHS
    // ========================================================================

    /// The name a node contributes to content paths, if any.
    pub fn content_name(&self, id: NodeId) -> Option<SmolStr> {
        self.construct(id).content_name()
    }

    /// Slash-joined chain of ancestor content names, computed once and
    /// cached until the node is re-parented.
    pub fn full_content_path(&self, id: NodeId) -> &str {
        let node = &self.nodes[id.index()];
        node.content_path.get_or_init(|| {
            let mut path = self.base_content_path(id);
            for _ in 0..node.uniquified {
                path.push('/');
                path.push_str(UNIQUE_PATH_SUFFIX);
            }
            path
        })
    }

    fn base_content_path(&self, id: NodeId) -> String {
        let name = self.content_name(id);
        match self.parent(id) {
            None => match name {
                None => "/".to_string(),
                Some(name) => format!("/{name}"),
            },
            Some(parent) => {
                let parent_path = self.full_content_path(parent);
                match name {
                    None => parent_path.to_string(),
                    Some(name) if parent_path == "/" => format!("/{name}"),
                    Some(name) => format!("{parent_path}/{name}"),
                }
            }
        }
    }

    /// Append the uniquifying suffix to a node's content path.
    pub fn uniquify_full_content_path(&mut self, id: NodeId) -> &str {
        self.nodes[id.index()].uniquified += 1;
        self.invalidate_paths(id);
        self.full_content_path(id)
    }

    fn uniquify_against(&mut self, parent: NodeId, child: NodeId) {
        // Rescan after every rename: the suffixed path can collide again.
        loop {
            let path = self.full_content_path(child).to_string();
            let collides = self
                .descendants(parent)
                .into_iter()
                .filter(|other| *other != child)
                .any(|other| self.full_content_path(other) == path);
            if !collides {
                break;
            }
            let renamed = self.uniquify_full_content_path(child).to_string();
            debug!(from = %path, to = %renamed, "duplicate content path");
        }
    }

    /// Drop cached paths for a node and everything below it.
    fn invalidate_paths(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.index()];
            node.content_path.take();
            stack.extend(node.children.iter().copied());
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// All nodes strictly below `id`, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// First direct child of the given kind.
    pub fn find_child(&self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|c| self.kind(*c) == kind)
    }

    /// Walk a chain of kinds, one direct child per step.
    ///
    /// Returns `None` as soon as a step has no match, or when a leaf is
    /// reached before the chain ends.
    pub fn find_path(&self, start: NodeId, kinds: &[NodeKind]) -> Option<NodeId> {
        let mut current = start;
        for kind in kinds {
            current = self.find_child(current, *kind)?;
        }
        Some(current)
    }

    /// Every node below `start` of the given kind.
    pub fn find_all(&self, start: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.descendants(start)
            .into_iter()
            .filter(|id| self.kind(*id) == kind)
            .collect()
    }

    /// Every node below `start` whose content name is `name`.
    pub fn find_all_named(&self, start: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(start)
            .into_iter()
            .filter(|id| self.content_name(*id).as_deref() == Some(name))
            .collect()
    }

    // ========================================================================
    // TYPE REGISTRY
    // ========================================================================

    /// Register `id` under `name`, resolved against the active namespaces.
    pub fn define_type(&mut self, name: &str, id: NodeId) -> Result<()> {
        let key = self.registry.put(&self.namespaces, name, id)?;
        trace!(%key, "defined schema type");
        Ok(())
    }

    /// Find the definition of a named type.
    pub fn lookup_type(&self, name: &str) -> Result<Option<NodeId>> {
        self.registry.get(&self.namespaces, name)
    }

    /// Find the definition of a named type or fail with a reference error.
    pub fn require_type(&self, name: &str, context: NodeId) -> Result<NodeId> {
        self.lookup_type(name)?.ok_or_else(|| {
            SchemaError::unresolved_type(name, self.full_content_path(context).to_string())
        })
    }

    /// Resolve the target of a `ref` on an element, group, attribute or
    /// attribute group. Fails when the target does not exist.
    pub fn resolve_ref(&self, id: NodeId) -> Result<Option<NodeId>> {
        let construct = self.construct(id);
        let Some(reference) = construct.reference() else {
            return Ok(None);
        };
        let target = match construct.kind() {
            NodeKind::Element => self.registry.get_element(&self.namespaces, reference)?,
            NodeKind::Attribute => self.registry.get_attribute(&self.namespaces, reference)?,
            _ => self.lookup_type(reference)?,
        };
        match target {
            Some(target) if self.kind(target) == construct.kind() => Ok(Some(target)),
            _ => Err(SchemaError::unresolved_ref(
                reference,
                self.full_content_path(id).to_string(),
            )),
        }
    }

    fn has_richer_simple_type(&self, name: &str) -> Result<bool> {
        let Some(previous) = self.lookup_type(name)? else {
            return Ok(false);
        };
        match self.construct(previous) {
            Construct::SimpleType(decl) => {
                Ok(decl.java_type.is_some() || !self.children(previous).is_empty())
            }
            _ => {
                warn!(%name, "overwriting non-simple type definition");
                Ok(false)
            }
        }
    }

    /// Host-language type name a construct maps to, if it has one.
    ///
    /// Simple types carry their own; restrictions, extensions and typed
    /// elements defer to their base; other containers use the first child
    /// that has one.
    pub fn host_type_name(&self, id: NodeId) -> Option<SmolStr> {
        self.host_type_name_bounded(id, 0)
    }

    fn host_type_name_bounded(&self, id: NodeId, depth: usize) -> Option<SmolStr> {
        const MAX_DEPTH: usize = 32;
        if depth > MAX_DEPTH {
            return None;
        }
        let via = |name: &Option<SmolStr>| {
            let target = self.lookup_type(name.as_deref()?).ok()??;
            if target == id {
                return None;
            }
            self.host_type_name_bounded(target, depth + 1)
        };
        match self.construct(id) {
            Construct::SimpleType(decl) if decl.java_type.is_some() => decl.java_type.clone(),
            Construct::Element(decl) if decl.java_type.is_some() => decl.java_type.clone(),
            Construct::Element(decl) if decl.type_name.is_some() => via(&decl.type_name),
            Construct::Restriction { base } | Construct::Extension { base } if base.is_some() => {
                via(base).or_else(|| self.first_child_host_type(id, depth))
            }
            Construct::Union { .. } | Construct::List { .. } => Some(SmolStr::new_static("java.lang.String")),
            Construct::Attribute(decl) if decl.type_name.is_some() => via(&decl.type_name),
            _ => self.first_child_host_type(id, depth),
        }
    }

    fn first_child_host_type(&self, id: NodeId, depth: usize) -> Option<SmolStr> {
        self.children(id)
            .iter()
            .find_map(|c| self.host_type_name_bounded(*c, depth + 1))
    }
}

/// Normalize a type-name slot against the target namespace in place and
/// return the normalized name.
fn normalize_slot(namespaces: &mut NamespaceTable, slot: &mut Option<SmolStr>) -> Option<String> {
    let name = slot.as_deref().filter(|n| !n.is_empty())?;
    let normalized = namespaces.normalize_target_namespace(name);
    *slot = Some(SmolStr::from(normalized.as_str()));
    Some(normalized)
}
