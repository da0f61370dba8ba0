//! Content graph: the normalized tree of candidate record types and the
//! child slots between them.
//!
//! A [`ContentGraph`] owns two arenas, nodes and links. Nodes own their
//! top-level links; grouping links own nested links. An extension edge is a
//! plain node id, never a link.
//!
//! ```text
//! Root ──link "Item"*──▶ Item ──link "name"──▶ name ──▶ #PCDATA
//!   │
//!   └──(grouping |)──┬── link "a" ──▶ a
//!                    └── link "b" ──▶ b
//! ```

mod cardinality;
mod dot;
mod lower;
mod node;

pub use cardinality::Cardinality;
pub use dot::to_dot;
pub use lower::SchemaTreeParser;
pub use node::{AttrProp, EMPTY, GraphLink, GraphLinkId, GraphNode, GraphNodeId, PCDATA};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::namespace::remove_prefix;

/// Where a new link is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkParent {
    Node(GraphNodeId),
    Link(GraphLinkId),
}

#[derive(Clone, Debug, Default)]
pub struct ContentGraph {
    nodes: Vec<GraphNode>,
    links: Vec<GraphLink>,
    root: Option<GraphNodeId>,
    /// First node seen for each name.
    by_name: IndexMap<SmolStr, GraphNodeId>,
    default_namespace: Option<SmolStr>,
    pcdata: Option<GraphNodeId>,
    empty: Option<GraphNodeId>,
}

impl ContentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) -> GraphNodeId {
        let id = GraphNodeId::new(self.nodes.len());
        if !node.marker {
            self.by_name.entry(node.name.clone()).or_insert(id);
        }
        self.nodes.push(node);
        id
    }

    /// Attach `link` to a node or under another link.
    pub fn add_link(&mut self, parent: LinkParent, mut link: GraphLink) -> GraphLinkId {
        let id = GraphLinkId::new(self.links.len());
        match parent {
            LinkParent::Node(node) => {
                link.parent = None;
                link.owner = Some(node);
                self.nodes[node.index()].links.push(id);
            }
            LinkParent::Link(parent_link) => {
                link.parent = Some(parent_link);
                link.owner = self.links[parent_link.index()].owner;
                self.links[parent_link.index()].children.push(id);
            }
        }
        self.links.push(link);
        id
    }

    /// The shared `#PCDATA` marker node.
    pub fn pcdata_marker(&mut self) -> GraphNodeId {
        if let Some(id) = self.pcdata {
            return id;
        }
        let id = self.add_node(GraphNode::marker(PCDATA));
        self.pcdata = Some(id);
        id
    }

    /// The shared `EMPTY` marker node.
    pub fn empty_marker(&mut self) -> GraphNodeId {
        if let Some(id) = self.empty {
            return id;
        }
        let id = self.add_node(GraphNode::marker(EMPTY));
        self.empty = Some(id);
        id
    }

    pub fn node(&self, id: GraphNodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: GraphNodeId) -> &mut GraphNode {
        &mut self.nodes[id.index()]
    }

    pub fn link(&self, id: GraphLinkId) -> &GraphLink {
        &self.links[id.index()]
    }

    pub fn link_mut(&mut self, id: GraphLinkId) -> &mut GraphLink {
        &mut self.links[id.index()]
    }

    /// Every node, markers included, in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = GraphNodeId> + '_ {
        (0..self.nodes.len()).map(GraphNodeId::new)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn root(&self) -> Option<GraphNodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: GraphNodeId) {
        self.root = Some(id);
    }

    pub fn node_by_name(&self, name: &str) -> Option<GraphNodeId> {
        self.by_name.get(name).copied()
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    pub fn set_default_namespace(&mut self, namespace: Option<&str>) {
        self.default_namespace = namespace.map(SmolStr::from);
    }

    /// Node ids of the child nodes a node's slots point at, looking through
    /// grouping links.
    pub fn child_nodes(&self, id: GraphNodeId) -> Vec<GraphNodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<GraphLinkId> = self.node(id).links.iter().rev().copied().collect();
        while let Some(link) = stack.pop() {
            let link = self.link(link);
            if let Some(element) = link.element {
                out.push(element);
            }
            stack.extend(link.children.iter().rev().copied());
        }
        out
    }

    /// Find the named slot for `name` among a node's links, searching
    /// through anonymous grouping links depth-first.
    pub fn find_link(&self, node: GraphNodeId, name: &str) -> Option<GraphLinkId> {
        let wanted = remove_prefix(name);
        let mut stack: Vec<GraphLinkId> = self.node(node).links.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let link = self.link(id);
            if link.name.as_deref().map(remove_prefix) == Some(wanted) {
                return Some(id);
            }
            if link.name.is_none() {
                stack.extend(link.children.iter().rev().copied());
            }
        }
        None
    }

    /// Walk a `/`-separated path of slot names from `start`.
    ///
    /// Returns the chain of links, one per segment. Empty segments and `.`
    /// are skipped. `None` when a segment has no matching slot.
    pub fn resolve_path(&self, start: GraphNodeId, path: &str) -> Option<Vec<GraphLinkId>> {
        let mut current = start;
        let mut chain = Vec::new();
        for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            let link = self.find_link(current, segment)?;
            current = self.link(link).element?;
            chain.push(link);
        }
        Some(chain)
    }
}

/// Capabilities the property resolver needs from whatever produced the
/// content graph.
pub trait TreeParser {
    fn graph(&self) -> &ContentGraph;

    /// Every node in document order.
    fn nodes(&self) -> Vec<GraphNodeId> {
        self.graph().node_ids().collect()
    }

    fn root(&self) -> Option<GraphNodeId> {
        self.graph().root()
    }

    fn node_by_name(&self, name: &str) -> Option<GraphNodeId> {
        self.graph().node_by_name(name)
    }

    fn default_namespace(&self) -> Option<&str> {
        self.graph().default_namespace()
    }
}

impl TreeParser for ContentGraph {
    fn graph(&self) -> &ContentGraph {
        self
    }
}
