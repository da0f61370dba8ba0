//! Resolver configuration and user metadata overrides.

use smol_str::SmolStr;

use crate::beans::BeanGraph;

/// Per-element overrides supplied by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaElement {
    /// Schema name the overrides apply to.
    pub schema_name: SmolStr,
    /// Restricts the match to one namespace when set.
    pub namespace: Option<SmolStr>,
    /// Class name for the element's bean, and name of properties holding it.
    pub bean_name: Option<String>,
    /// Existing host type to use instead of generating a bean.
    pub wrapper_class: Option<String>,
    pub can_be_empty: bool,
    /// Values recorded on properties as enumeration restrictions.
    pub known_values: Vec<String>,
    pub finders: Vec<String>,
}

impl MetaElement {
    pub fn new(schema_name: impl Into<SmolStr>) -> Self {
        Self {
            schema_name: schema_name.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<SmolStr>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_bean_name(mut self, name: impl Into<String>) -> Self {
        self.bean_name = Some(name.into());
        self
    }

    pub fn with_wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.wrapper_class = Some(class.into());
        self
    }

    pub fn with_can_be_empty(mut self, value: bool) -> Self {
        self.can_be_empty = value;
        self
    }

    pub fn with_known_value(mut self, value: impl Into<String>) -> Self {
        self.known_values.push(value.into());
        self
    }

    pub fn with_finder(mut self, expr: impl Into<String>) -> Self {
        self.finders.push(expr.into());
        self
    }
}

/// The user's metadata document: a list of element overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaDd {
    elements: Vec<MetaElement>,
}

impl MetaDd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: MetaElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[MetaElement] {
        &self.elements
    }

    /// First override for `schema_name`. With a namespace given, overrides
    /// bound to a different namespace are skipped.
    pub fn find(&self, schema_name: &str, namespace: Option<&str>) -> Option<&MetaElement> {
        self.elements.iter().find(|e| {
            e.schema_name == schema_name
                && match (namespace, e.namespace.as_deref()) {
                    (Some(wanted), Some(bound)) => wanted == bound,
                    (Some(_), None) => false,
                    (None, _) => true,
                }
        })
    }

    /// Finder expressions from every element, in order.
    pub fn finders(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .flat_map(|e| e.finders.iter().map(String::as_str))
    }
}

impl FromIterator<MetaElement> for MetaDd {
    fn from_iter<I: IntoIterator<Item = MetaElement>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

/// Options for [`crate::beans::BeanBuilder`].
#[derive(Clone, Debug)]
pub struct BuilderConfig {
    /// Turn attributes into properties of the bean that carries them.
    pub attributes_as_properties: bool,
    /// Map `decimal`/`integer` onto arbitrary-precision types.
    pub use_big_data_types: bool,
    /// Give every bean a `Comments` property.
    pub process_comments: bool,
    /// Have every bean implement a `<Name>Interface`.
    pub generate_interfaces: bool,
    /// Interface every generated bean implements; reserved as a class name.
    pub common_interface: Option<String>,
    /// Package generated classes live in. Defaults to the lowercased root
    /// bean name.
    pub package_name: Option<String>,
    pub finders: Vec<String>,
    pub meta: MetaDd,
    /// Previously generated types, which are not generated again.
    pub bean_graphs: Vec<BeanGraph>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            attributes_as_properties: true,
            use_big_data_types: true,
            process_comments: false,
            generate_interfaces: false,
            common_interface: None,
            package_name: None,
            finders: Vec::new(),
            meta: MetaDd::default(),
            bean_graphs: Vec::new(),
        }
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes_as_properties(mut self, value: bool) -> Self {
        self.attributes_as_properties = value;
        self
    }

    pub fn with_big_data_types(mut self, value: bool) -> Self {
        self.use_big_data_types = value;
        self
    }

    pub fn with_process_comments(mut self, value: bool) -> Self {
        self.process_comments = value;
        self
    }

    pub fn with_generate_interfaces(mut self, value: bool) -> Self {
        self.generate_interfaces = value;
        self
    }

    pub fn with_common_interface(mut self, name: impl Into<String>) -> Self {
        self.common_interface = Some(name.into());
        self
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    pub fn with_finder(mut self, expr: impl Into<String>) -> Self {
        self.finders.push(expr.into());
        self
    }

    pub fn with_meta(mut self, meta: MetaDd) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_bean_graph(mut self, graph: BeanGraph) -> Self {
        self.bean_graphs.push(graph);
        self
    }

    /// Every finder expression: configured ones first, then metadata ones.
    pub fn all_finders(&self) -> impl Iterator<Item = &str> {
        self.finders
            .iter()
            .map(String::as_str)
            .chain(self.meta.finders())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_find_respects_namespace() {
        let meta: MetaDd = [
            MetaElement::new("item").with_namespace("urn:a").with_bean_name("AItem"),
            MetaElement::new("item").with_bean_name("AnyItem"),
        ]
        .into_iter()
        .collect();
        let found = |ns| meta.find("item", ns).and_then(|e| e.bean_name.clone());
        assert_eq!(found(Some("urn:a")).as_deref(), Some("AItem"));
        assert_eq!(found(Some("urn:b")), None);
        assert_eq!(found(None).as_deref(), Some("AItem"));
    }

    #[test]
    fn test_all_finders_orders_config_before_meta() {
        let config = BuilderConfig::new()
            .with_finder("on / find a by b")
            .with_meta(
                [MetaElement::new("x").with_finder("on x find c by d")]
                    .into_iter()
                    .collect(),
            );
        let all: Vec<_> = config.all_finders().collect();
        assert_eq!(all, vec!["on / find a by b", "on x find c by d"]);
        assert!(config.attributes_as_properties);
    }
}
