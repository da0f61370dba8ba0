//! Canonical-name maps from type, element and attribute names to the grammar
//! nodes that define them.

use indexmap::IndexMap;

use crate::error::Result;
use crate::grammar::NodeId;
use crate::namespace::{NamespaceTable, canonical_qname, prefix_of, remove_prefix};

/// Named definitions of one grammar, keyed by canonical qualified name.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    /// `{ns}local` -> complexType/simpleType/group/attributeGroup node.
    schema_types: IndexMap<String, NodeId>,
    /// Top-level elements by local name.
    elements: IndexMap<String, NodeId>,
    /// Top-level elements by canonical name.
    elements_full: IndexMap<String, NodeId>,
    /// Top-level attributes by canonical name.
    attributes: IndexMap<String, NodeId>,
}

impl TypeRegistry {
    /// Store a type definition and return the key it was stored under.
    ///
    /// A bare name resolves against the target namespace.
    pub fn put(&mut self, namespaces: &NamespaceTable, name: &str, id: NodeId) -> Result<String> {
        let key = namespaces.resolve(name)?;
        self.schema_types.insert(key.clone(), id);
        Ok(key)
    }

    /// Look up a type definition.
    ///
    /// Tries the target namespace first. An unprefixed name then falls back
    /// to the document namespace, and finally to a top-level element of the
    /// same local name.
    pub fn get(&self, namespaces: &NamespaceTable, name: &str) -> Result<Option<NodeId>> {
        let key = namespaces.resolve(name)?;
        if let Some(id) = self.schema_types.get(&key) {
            return Ok(Some(*id));
        }
        if prefix_of(name).is_none() {
            let key = canonical_qname(namespaces.document_namespace(), name);
            if let Some(id) = self.schema_types.get(&key) {
                return Ok(Some(*id));
            }
        }
        Ok(self.elements.get(remove_prefix(name)).copied())
    }

    /// Store a type definition under an already-canonical key.
    pub fn put_canonical(&mut self, key: String, id: NodeId) {
        self.schema_types.insert(key, id);
    }

    /// Look up a type by its already-canonical key.
    pub fn get_canonical(&self, key: &str) -> Option<NodeId> {
        self.schema_types.get(key).copied()
    }

    /// Canonical keys of every defined type, in definition order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.schema_types.keys().map(String::as_str)
    }

    pub fn type_count(&self) -> usize {
        self.schema_types.len()
    }

    pub fn define_element(&mut self, local: &str, full: String, id: NodeId) {
        self.elements.insert(local.to_string(), id);
        self.elements_full.insert(full, id);
    }

    /// Find a top-level element, by canonical name first and local name second.
    pub fn get_element(&self, namespaces: &NamespaceTable, name: &str) -> Result<Option<NodeId>> {
        let key = namespaces.resolve(name)?;
        if let Some(id) = self.elements_full.get(&key) {
            return Ok(Some(*id));
        }
        Ok(self.elements.get(remove_prefix(name)).copied())
    }

    pub fn define_attribute(&mut self, full: String, id: NodeId) {
        self.attributes.insert(full, id);
    }

    /// Find a top-level attribute.
    ///
    /// An unprefixed name tries the document namespace before the target
    /// namespace.
    pub fn get_attribute(
        &self,
        namespaces: &NamespaceTable,
        name: &str,
    ) -> Result<Option<NodeId>> {
        if prefix_of(name).is_none() {
            let key = canonical_qname(namespaces.document_namespace(), name);
            if let Some(id) = self.attributes.get(&key) {
                return Ok(Some(*id));
            }
        }
        let key = namespaces.resolve(name)?;
        Ok(self.attributes.get(&key).copied())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_get_falls_back_to_document_namespace() {
        let mut namespaces = NamespaceTable::new();
        namespaces.set_document_namespace(Some("urn:doc"));
        let mut registry = TypeRegistry::default();
        namespaces.bind("d", "urn:doc");
        registry.put(&namespaces, "d:Addr", NodeId::new(3)).unwrap();

        namespaces.set_target_namespace(Some("urn:target"));
        assert_eq!(
            registry.get(&namespaces, "Addr").unwrap(),
            Some(NodeId::new(3))
        );
    }

    #[test]
    fn test_get_falls_back_to_element_by_local_name() {
        let namespaces = NamespaceTable::new();
        let mut registry = TypeRegistry::default();
        registry.define_element("order", "order".to_string(), NodeId::new(7));
        assert_eq!(
            registry.get(&namespaces, "order").unwrap(),
            Some(NodeId::new(7))
        );
        assert_eq!(registry.get(&namespaces, "missing").unwrap(), None);
    }

    #[test]
    fn test_put_resolves_bare_name_against_target() {
        let mut namespaces = NamespaceTable::new();
        namespaces.set_target_namespace(Some("urn:po"));
        let mut registry = TypeRegistry::default();
        let key = registry.put(&namespaces, "Item", NodeId::new(1)).unwrap();
        assert_eq!(key, "{urn:po}Item");
        assert_eq!(registry.get_canonical("{urn:po}Item"), Some(NodeId::new(1)));
    }
}
