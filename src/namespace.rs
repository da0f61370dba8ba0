//! Namespace table and qualified-name helpers.
//!
//! Qualified names come in two spellings:
//!
//! ```text
//! prefixed   xsd:string                                  (as written in a schema)
//! canonical  {http://www.w3.org/2001/XMLSchema}string    (registry key)
//! ```
//!
//! A bare name has no namespace; its canonical form is the bare name itself.

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::error::{Result, SchemaError};

pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

// ============================================================================
// NAME HELPERS
// ============================================================================

/// The prefix of `prefix:local`, or `None` for an unprefixed name.
pub fn prefix_of(name: &str) -> Option<&str> {
    name.find(':').map(|pos| &name[..pos])
}

/// The local part of `prefix:local`, or the name itself.
pub fn remove_prefix(name: &str) -> &str {
    match name.find(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// `{uri}local`, or `local` when the URI is absent or empty.
pub fn canonical_qname(namespace_uri: Option<&str>, local: &str) -> String {
    match namespace_uri {
        Some(uri) if !uri.is_empty() => format!("{{{uri}}}{local}"),
        _ => local.to_string(),
    }
}

/// Derive a prefix for a namespace URI that has none.
///
/// Takes the last path segment, replaces characters that may not appear
/// in a prefix, and keeps clear of the reserved `xml` start.
pub fn guess_prefix(namespace_uri: &str) -> String {
    if namespace_uri == XML_NS {
        return "xml".to_string();
    }
    let segment = match namespace_uri.rfind('/') {
        Some(pos) => &namespace_uri[pos + 1..],
        None => namespace_uri,
    };
    let prefix: String = segment
        .chars()
        .map(|c| match c {
            '#' | '\'' | '"' | ':' => '_',
            other => other,
        })
        .collect();
    if prefix.starts_with("xml") {
        format!("x{prefix}")
    } else {
        prefix
    }
}

// ============================================================================
// NAMESPACE TABLE
// ============================================================================

/// Prefix bindings plus the active target and document namespaces.
#[derive(Clone, Debug)]
pub struct NamespaceTable {
    /// prefix -> URI, in binding order.
    bindings: IndexMap<SmolStr, SmolStr>,
    target_namespace: Option<SmolStr>,
    document_namespace: Option<SmolStr>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTable {
    /// A table with the `xml` and `xsd` prefixes already bound.
    pub fn new() -> Self {
        let mut table = Self {
            bindings: IndexMap::new(),
            target_namespace: None,
            document_namespace: None,
        };
        table.bind("xml", XML_NS);
        table.bind("xsd", XSD_NS);
        table
    }

    /// Bind `prefix` to `uri`, replacing any earlier binding of the prefix.
    pub fn bind(&mut self, prefix: impl Into<SmolStr>, uri: impl Into<SmolStr>) {
        let prefix = prefix.into();
        let uri = uri.into();
        trace!(%prefix, %uri, "binding namespace prefix");
        self.bindings.insert(prefix, uri);
    }

    /// The URI bound to `prefix`.
    pub fn uri_of(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(SmolStr::as_str)
    }

    /// The prefix already bound to `uri`, if any.
    pub fn existing_prefix(&self, uri: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, bound)| bound.as_str() == uri)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// The prefix for `uri`, inventing and binding one if needed.
    ///
    /// Invented prefixes come from [`guess_prefix`] with `2`, `3`, ...
    /// appended until the prefix is unused.
    pub fn prefix_for(&mut self, uri: &str) -> SmolStr {
        if let Some(prefix) = self.existing_prefix(uri) {
            return SmolStr::from(prefix);
        }
        let base = guess_prefix(uri);
        let mut candidate = base.clone();
        let mut count = 2;
        while self.bindings.contains_key(candidate.as_str()) {
            candidate = format!("{base}{count}");
            count += 1;
        }
        debug!(prefix = %candidate, %uri, "guessed namespace prefix");
        let prefix = SmolStr::from(candidate);
        self.bindings.insert(prefix.clone(), SmolStr::from(uri));
        prefix
    }

    /// All prefixes in binding order.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    pub fn set_target_namespace(&mut self, uri: Option<&str>) {
        self.target_namespace = uri.map(SmolStr::from);
    }

    pub fn document_namespace(&self) -> Option<&str> {
        self.document_namespace.as_deref()
    }

    pub fn set_document_namespace(&mut self, uri: Option<&str>) {
        self.document_namespace = uri.map(SmolStr::from);
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Canonical form of `name`, resolving an unprefixed name against the
    /// target namespace.
    pub fn resolve(&self, name: &str) -> Result<String> {
        self.resolve_with_default(name, self.target_namespace())
    }

    /// Canonical form of `name`, resolving an unprefixed name against
    /// `default_ns`.
    pub fn resolve_with_default(&self, name: &str, default_ns: Option<&str>) -> Result<String> {
        let local = remove_prefix(name);
        match prefix_of(name) {
            None => Ok(canonical_qname(default_ns, local)),
            Some(prefix) => {
                let uri = self
                    .uri_of(prefix)
                    .ok_or_else(|| SchemaError::unknown_prefix(prefix, name))?;
                Ok(canonical_qname(Some(uri), local))
            }
        }
    }

    /// The namespace URI a (possibly prefixed) name lives in.
    pub fn namespace_of(&self, name: &str) -> Result<Option<SmolStr>> {
        match prefix_of(name) {
            None => Ok(self.target_namespace.clone()),
            Some(prefix) => self
                .uri_of(prefix)
                .map(|uri| Some(SmolStr::from(uri)))
                .ok_or_else(|| SchemaError::unknown_prefix(prefix, name)),
        }
    }

    /// `prefix:local` for a URI, or `local` when the URI is absent.
    pub fn normalize_namespace(&mut self, uri: Option<&str>, local: &str) -> String {
        match uri {
            Some(uri) if !uri.is_empty() => {
                let prefix = self.prefix_for(uri);
                format!("{prefix}:{local}")
            }
            _ => local.to_string(),
        }
    }

    /// Prefix a bare name with the target namespace's prefix.
    ///
    /// Already-prefixed names, and all names when there is no target
    /// namespace, are returned unchanged.
    pub fn normalize_target_namespace(&mut self, name: &str) -> String {
        let target = self.target_namespace.clone();
        self.normalize_with(target.as_deref(), name)
    }

    /// Same as [`Self::normalize_target_namespace`] for the document namespace.
    pub fn normalize_document_namespace(&mut self, name: &str) -> String {
        let document = self.document_namespace.clone();
        self.normalize_with(document.as_deref(), name)
    }

    fn normalize_with(&mut self, uri: Option<&str>, name: &str) -> String {
        match uri {
            Some(uri) if !name.contains(':') => self.normalize_namespace(Some(uri), name),
            _ => name.to_string(),
        }
    }
}
