//! Structural validation of a grammar tree against the allowed-children
//! tables.

use tracing::trace;

use super::construct::Construct;
use super::kind::FacetKind;
use super::tree::{Grammar, NodeId};
use crate::error::{Result, SchemaError};

const WHITE_SPACE_VALUES: [&str; 3] = ["preserve", "replace", "collapse"];

impl Grammar {
    /// Check every reachable node's children against its kind's allowed set.
    ///
    /// Fails on the first offending child, naming the parent kind, the
    /// child kind and the child's full content path.
    pub fn validate(&self) -> Result<()> {
        let root = self.root().ok_or(SchemaError::MissingRoot)?;
        self.validate_node(root)
    }

    /// Validate the subtree rooted at `id`.
    pub fn validate_node(&self, id: NodeId) -> Result<()> {
        let kind = self.kind(id);
        if let Construct::Facet {
            kind: FacetKind::WhiteSpace,
            value,
        } = self.construct(id)
        {
            if !WHITE_SPACE_VALUES.contains(&value.as_str()) {
                return Err(SchemaError::InvalidFacetValue {
                    facet: FacetKind::WhiteSpace.as_str(),
                    value: value.to_string(),
                    path: self.full_content_path(id).to_string(),
                });
            }
        }
        if !kind.validates_children() {
            return Ok(());
        }
        trace!(%kind, path = self.full_content_path(id), "validating");
        for &child in self.children(id) {
            let child_kind = self.kind(child);
            if !kind.allows_child(child_kind) {
                return Err(SchemaError::invalid_contents(
                    kind.as_str(),
                    child_kind.as_str(),
                    self.full_content_path(child),
                ));
            }
            self.validate_node(child)?;
        }
        Ok(())
    }
}
