//! Bottom-up simplification of a grammar tree.
//!
//! Empty model groups, empty annotations and empty text are removed.
//! Groups that reference a named group stay as written. A model group
//! with a single child is not inlined into its parent: folding it would
//! drop the group's own occurrence bounds from the cardinality-width
//! computation.

use tracing::debug;

use super::construct::Construct;
use super::kind::NodeKind;
use super::tree::{Grammar, NodeId};

/// Outcome of optimizing one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Optimized {
    /// Keep the node (possibly with fewer children).
    Keep,
    /// Delete the node from its parent.
    Remove,
}

impl Grammar {
    /// Optimize the tree below the root in place.
    pub fn optimize(&mut self) {
        if let Some(root) = self.root() {
            self.optimize_node(root);
        }
    }

    /// Optimize the subtree rooted at `id` and report what the parent
    /// should do with it.
    pub fn optimize_node(&mut self, id: NodeId) -> Optimized {
        let kind = self.kind(id);
        match kind {
            NodeKind::SimpleContent
            | NodeKind::ComplexContent
            | NodeKind::Facet(_)
            | NodeKind::Include
            | NodeKind::Import => return Optimized::Keep,
            NodeKind::Group if self.construct(id).reference().is_some() => {
                return Optimized::Keep;
            }
            _ => {}
        }

        self.optimize_children(id);

        let empty = self.children(id).is_empty();
        match self.construct(id) {
            Construct::Sequence(_) | Construct::Choice(_) | Construct::All(_) | Construct::Group(_)
                if empty =>
            {
                debug!(%kind, path = self.full_content_path(id), "removing empty model group");
                Optimized::Remove
            }
            Construct::Annotation if empty => Optimized::Remove,
            Construct::Text(text) if text.is_empty() => Optimized::Remove,
            _ => Optimized::Keep,
        }
    }

    fn optimize_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            match self.optimize_node(child) {
                Optimized::Keep => {}
                Optimized::Remove => self.remove_child(id, child),
            }
        }
    }
}
