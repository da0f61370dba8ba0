//! Graph-to-property resolution.
//!
//! One pass over the content graph, in document order:
//!
//! ```text
//! create elements ─▶ name classes ─▶ wire extensions ─▶ build properties ─▶ finders
//!   (type tags,        (metadata,        (extends,          (attributes,
//!    snapshots)         reserved names)   interfaces)        links, flattening)
//! ```
//!
//! Every step consumes nodes and links in the order the [`TreeParser`]
//! reports them, so identical input yields identical names, suffixes and
//! property order.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use super::element::BeanElement;
use super::finder::{FinderExpr, PropertyRef, ResolvedFinder};
use super::host_types::{TypeTag, to_object_type};
use super::model::BeanModel;
use super::naming::{
    MAX_ATTEMPTS, UNIQUE_PREFIX, class_name, const_name, convert_name, is_reserved, next_free,
};
use super::property::{Property, PropertyOrigin};
use crate::config::BuilderConfig;
use crate::error::{Result, SchemaError};
use crate::graph::{
    AttrProp, Cardinality, ContentGraph, EMPTY, GraphLinkId, GraphNodeId, PCDATA, TreeParser,
};
use crate::namespace::guess_prefix;

const TAGS_CLASS_NAME: &str = "Tags";
const COMMENTS_PROPERTY: &str = "Comments";
const COMMENT_SCHEMA_NAME: &str = "comment";
const PCDATA_PROPERTY: &str = "pcdata";
const PCDATA_CONST: &str = "PCDATA";

/// Resolves a content graph into a [`BeanModel`].
#[derive(Clone, Debug, Default)]
pub struct BeanBuilder {
    config: BuilderConfig,
}

impl BeanBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Resolve every node the parser reports.
    ///
    /// Fails on a missing root, exhausted names, a malformed finder or a
    /// finder whose `on` path leads nowhere. Finders whose selector or
    /// field cannot be found are kept, flagged as degraded.
    pub fn resolve(&self, parser: &dyn TreeParser) -> Result<BeanModel> {
        let graph = parser.graph();
        let root = parser.root().ok_or(SchemaError::MissingRoot)?;
        let order = parser.nodes();

        let mut run = Resolution::new(&self.config, graph, root);
        run.create_elements(&order);
        run.name_elements(&order)?;
        run.wire_extensions(&order);
        run.build_properties(&order)?;
        run.resolve_finders()?;
        run.finish()
    }
}

// ============================================================================
// RESOLUTION STATE
// ============================================================================

struct Resolution<'a> {
    config: &'a BuilderConfig,
    graph: &'a ContentGraph,
    root: GraphNodeId,
    beans: IndexMap<GraphNodeId, BeanElement>,
    /// Host types suggested by the graph or a snapshot, applied while naming.
    suggested: FxHashMap<GraphNodeId, String>,
    class_names: FxHashSet<String>,
    package: String,
    const_names: IndexMap<String, SmolStr>,
    link_properties: FxHashMap<GraphLinkId, PropertyRef>,
}

/// Properties of the bean being built and the names they hold.
struct PropertyScope {
    bean: GraphNodeId,
    properties: Vec<Property>,
    used: FxHashSet<String>,
    non_attribute: usize,
}

impl PropertyScope {
    fn new(bean: GraphNodeId) -> Self {
        Self {
            bean,
            properties: Vec::new(),
            used: FxHashSet::default(),
            non_attribute: 0,
        }
    }

    /// Claim `base`, or `base2`, `base3`, ...; the constant gets the same
    /// suffix.
    fn claim(&mut self, base: &str, base_const: &str) -> Result<(String, String)> {
        let (name, suffix) = next_free(base, |candidate| self.used.contains(candidate))?;
        let constant = match suffix {
            Some(n) => {
                debug!(bean = ?self.bean, from = %base, to = %name, "renamed property");
                format!("{base_const}{n}")
            }
            None => base_const.to_string(),
        };
        self.used.insert(name.clone());
        Ok((name, constant))
    }

    fn push(&mut self, property: Property) -> usize {
        if !property.is_attribute() && property.origin != PropertyOrigin::Comments {
            self.non_attribute += 1;
        }
        self.properties.push(property);
        self.properties.len() - 1
    }
}

impl<'a> Resolution<'a> {
    fn new(config: &'a BuilderConfig, graph: &'a ContentGraph, root: GraphNodeId) -> Self {
        Self {
            config,
            graph,
            root,
            beans: IndexMap::new(),
            suggested: FxHashMap::default(),
            class_names: FxHashSet::default(),
            package: String::new(),
            const_names: IndexMap::new(),
            link_properties: FxHashMap::default(),
        }
    }

    // ------------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------------

    fn create_elements(&mut self, order: &[GraphNodeId]) {
        let graph = self.graph;
        for &id in order {
            let node = graph.node(id);
            let mut bean = BeanElement::new(id, node.name.clone(), node.namespace.clone());
            bean.is_root = id == self.root;
            bean.is_abstract = node.is_abstract;
            bean.is_marker = node.marker;
            bean.created = node.created;

            let mut suggested = node.java_type.as_ref().map(SmolStr::to_string);
            if !node.marker {
                let key = node.name_with_namespace();
                let snapshot = self
                    .config
                    .bean_graphs
                    .iter()
                    .rev()
                    .find_map(|snapshot| snapshot.find(&key));
                if let Some(mapping) = snapshot {
                    trace!(%key, java_type = %mapping.java_type, "type taken from bean graph");
                    suggested = Some(mapping.java_type.clone());
                    bean.created = false;
                    bean.can_be_empty |= mapping.can_be_empty;
                }
            }

            bean.tag = self.initial_tag(id, &bean);
            if bean.tag == TypeTag::Boolean {
                bean.can_be_empty = true;
            }
            if let Some(class) = suggested {
                self.suggested.insert(id, class);
            }
            self.beans.insert(id, bean);
        }

        self.package = match &self.config.package_name {
            Some(package) => package.clone(),
            None => self
                .beans
                .get(&self.root)
                .map(|b| b.name.to_lowercase())
                .unwrap_or_default(),
        };
    }

    /// Record unless suppressed, in which case a string. A non-root node
    /// holding only `#PCDATA` is a string and one holding only `EMPTY` is a
    /// boolean, suppressed or not.
    fn initial_tag(&self, id: GraphNodeId, bean: &BeanElement) -> TypeTag {
        let tag = if bean.created {
            TypeTag::Bean
        } else {
            TypeTag::String
        };
        if !bean.is_root {
            if let [only] = self.graph.child_nodes(id).as_slice() {
                let child = self.graph.node(*only);
                if child.marker && child.name == PCDATA {
                    return TypeTag::String;
                }
                if child.marker && child.name == EMPTY {
                    return TypeTag::Boolean;
                }
            }
        }
        tag
    }

    fn name_elements(&mut self, order: &[GraphNodeId]) -> Result<()> {
        let (graph, config) = (self.graph, self.config);
        for &id in order {
            let node = graph.node(id);
            if node.marker {
                continue;
            }
            let meta = config.meta.find(&node.name, node.namespace.as_deref());
            let mut suggested = self.suggested.remove(&id);

            let Some(bean) = self.beans.get_mut(&id) else {
                continue;
            };
            if let Some(meta) = meta {
                bean.can_be_empty |= meta.can_be_empty;
                if let Some(name) = &meta.bean_name {
                    bean.name = name.clone();
                    bean.class_type = name.clone();
                }
                if let Some(wrapper) = &meta.wrapper_class {
                    suggested = Some(wrapper.clone());
                    bean.created = false;
                    bean.type_set_externally = true;
                }
            }
            if suggested.is_none() && !bean.is_root && !bean.is_bean() {
                suggested = Some(bean.tag.wrapper_class().to_string());
            }
            if let Some(class) = suggested {
                if !bean.is_bean() || !bean.created {
                    bean.tag = TypeTag::from_wrapper(&class);
                    bean.class_type = class;
                }
            }
            if !bean.is_bean() {
                continue;
            }

            let base = bean.name.clone();
            let namespace = bean.namespace.clone();
            let name = self.claim_class_name(&base, namespace.as_deref())?;
            let interface = config
                .generate_interfaces
                .then(|| self.qualified(&format!("{name}Interface")));
            let common = config
                .common_interface
                .clone()
                .filter(|_| node.java_type.is_none());

            let Some(bean) = self.beans.get_mut(&id) else {
                continue;
            };
            bean.name = name.clone();
            bean.class_type = name;
            bean.implements.extend(interface);
            bean.implements.extend(common);
        }
        Ok(())
    }

    fn class_name_taken(&self, name: &str) -> bool {
        is_reserved(name)
            || self.config.common_interface.as_deref() == Some(name)
            || self.class_names.contains(name)
    }

    /// Prefix `base` until it is neither reserved nor claimed: first with
    /// the namespace's prefix, then with [`UNIQUE_PREFIX`].
    fn claim_class_name(&mut self, base: &str, namespace: Option<&str>) -> Result<String> {
        let mut name = base.to_string();
        for attempt in 0..MAX_ATTEMPTS {
            if !self.class_name_taken(&name) {
                self.class_names.insert(name.clone());
                return Ok(name);
            }
            let prefix = match namespace {
                Some(uri) if attempt == 0 => class_name(&guess_prefix(uri)),
                _ => UNIQUE_PREFIX.to_string(),
            };
            debug!(%name, %prefix, "class name taken");
            name = format!("{prefix}{name}");
        }
        Err(SchemaError::NamingExhausted(base.to_string()))
    }

    fn qualified(&self, class: &str) -> String {
        if self.package.is_empty() {
            class.to_string()
        } else {
            format!("{}.{class}", self.package)
        }
    }

    fn wire_extensions(&mut self, order: &[GraphNodeId]) {
        for &id in order {
            let Some(ext) = self.graph.node(id).extension else {
                continue;
            };
            let is_bean = self.beans.get(&id).is_some_and(BeanElement::is_bean);
            let Some(supertype) = self.beans.get(&ext).filter(|b| b.created && b.is_bean()) else {
                continue;
            };
            if !is_bean {
                continue;
            }
            let extends = supertype.full_class_type(&self.package);
            let interface = self
                .config
                .generate_interfaces
                .then(|| format!("{}Interface", supertype.name));
            trace!(?id, %extends, "extension");

            if let Some(supertype) = self.beans.get_mut(&ext) {
                supertype.is_extended = true;
            }
            if let Some(bean) = self.beans.get_mut(&id) {
                bean.extends = Some(extends);
                bean.interface_extends = interface;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    fn build_properties(&mut self, order: &[GraphNodeId]) -> Result<()> {
        let graph = self.graph;
        for &id in order {
            let node = graph.node(id);
            let wanted = self
                .beans
                .get(&id)
                .is_some_and(|b| !b.is_marker && (b.is_bean() || b.is_root));
            if !wanted {
                continue;
            }

            let mut scope = PropertyScope::new(id);
            if self.config.process_comments {
                self.comments_property(&mut scope)?;
            }
            if self.config.attributes_as_properties {
                for attribute in &node.attributes {
                    self.direct_attribute(&mut scope, attribute)?;
                }
            }
            self.build_links(&mut scope, &node.links, Cardinality::One, false, 0)?;

            debug!(
                bean = ?id,
                properties = scope.properties.len(),
                "built properties"
            );
            if let Some(bean) = self.beans.get_mut(&id) {
                bean.properties = scope.properties;
                bean.non_attribute_property_count = scope.non_attribute;
            }
        }
        Ok(())
    }

    fn comments_property(&mut self, scope: &mut PropertyScope) -> Result<()> {
        let base_const = const_name(COMMENTS_PROPERTY);
        let (name, constant) = scope.claim(COMMENTS_PROPERTY, &base_const)?;
        self.const_names
            .entry(constant.clone())
            .or_insert_with(|| SmolStr::new_static(COMMENT_SCHEMA_NAME));
        let mut property = Property::new(name, SmolStr::new_static(COMMENT_SCHEMA_NAME), constant);
        property.class_type = "java.lang.String".to_string();
        property.tag = TypeTag::Comment;
        property.cardinality = Cardinality::ZeroOrMore;
        property.element_instance = Cardinality::ZeroOrMore;
        property.origin = PropertyOrigin::Comments;
        scope.push(property);
        Ok(())
    }

    fn direct_attribute(&mut self, scope: &mut PropertyScope, attribute: &AttrProp) -> Result<()> {
        let (name, constant) =
            scope.claim(&convert_name(&attribute.name), &const_name(&attribute.name))?;
        let mut property = self.attribute_property(name, attribute.name.clone(), constant, attribute);
        property.cardinality = Cardinality::One.widest(attribute.instance);
        property.origin = PropertyOrigin::Attribute;
        scope.push(property);
        Ok(())
    }

    fn attribute_property(
        &self,
        name: String,
        schema_name: SmolStr,
        constant: String,
        attribute: &AttrProp,
    ) -> Property {
        let mut property = Property::new(name, schema_name, constant);
        if let Some(class) = &attribute.java_type {
            property.tag = TypeTag::from_wrapper(class);
            property.class_type = class.to_string();
        }
        property.namespace = attribute.namespace.clone();
        property.element_instance = attribute.instance;
        property.default_value = attribute.default_value.clone();
        property.known_values = attribute.enumeration.iter().map(SmolStr::to_string).collect();
        if let Some(meta) = self.config.meta.find(&attribute.name, attribute.namespace.as_deref()) {
            property.known_values.extend(meta.known_values.iter().cloned());
        }
        property
    }

    /// Depth-first over `links`; `group` is the width of every enclosing
    /// grouping and `ored` whether an enclosing grouping is a choice.
    fn build_links(
        &mut self,
        scope: &mut PropertyScope,
        links: &[GraphLinkId],
        group: Cardinality,
        ored: bool,
        level: usize,
    ) -> Result<()> {
        let graph = self.graph;
        for &link_id in links {
            let link = graph.link(link_id);
            self.element_property(scope, link_id, group, ored, level)?;
            if !link.children.is_empty() {
                self.build_links(
                    scope,
                    &link.children,
                    group.widest(link.group_instance),
                    ored || link.sequence_or,
                    level + 1,
                )?;
            }
        }
        Ok(())
    }

    fn element_property(
        &mut self,
        scope: &mut PropertyScope,
        link_id: GraphLinkId,
        group: Cardinality,
        ored: bool,
        level: usize,
    ) -> Result<()> {
        let graph = self.graph;
        let link = graph.link(link_id);
        let Some(target_id) = link.element else {
            return Ok(());
        };
        let target_node = graph.node(target_id);
        if target_node.marker && target_node.name == EMPTY {
            return Ok(());
        }
        let Some(target) = self.beans.get(&target_id) else {
            return Ok(());
        };
        let is_pcdata = target_node.marker && target_node.name == PCDATA;

        let schema_name = link
            .name
            .clone()
            .unwrap_or_else(|| target.schema_name.clone());
        let meta = self.config.meta.find(&schema_name, link.namespace.as_deref());
        let (base, base_const) = if is_pcdata {
            (PCDATA_PROPERTY.to_string(), PCDATA_CONST.to_string())
        } else {
            let converted = link
                .name
                .as_deref()
                .map(convert_name)
                .unwrap_or_else(|| target.name.clone());
            let base = meta
                .and_then(|m| m.bean_name.clone())
                .unwrap_or(converted);
            (base, const_name(&schema_name))
        };

        let (name, constant) = scope.claim(&base, &base_const)?;
        self.const_names
            .entry(constant.clone())
            .or_insert_with(|| schema_name.clone());

        let (mut class_type, tag) = if is_pcdata {
            let class = graph
                .node(scope.bean)
                .java_type
                .as_ref()
                .map_or_else(|| TypeTag::String.wrapper_class().to_string(), SmolStr::to_string);
            let tag = TypeTag::from_wrapper(&class);
            (class, tag)
        } else {
            (target.class_type.clone(), target.tag)
        };
        if ored || link.nillable {
            if let Some(object) = to_object_type(&class_type) {
                trace!(%name, from = %class_type, to = object, "promoted primitive");
                class_type = object.to_string();
            }
        }

        let mut property = Property::new(name.clone(), schema_name.clone(), constant);
        property.namespace = link.namespace.clone().or_else(|| target.namespace.clone());
        property.class_type = class_type;
        property.tag = tag;
        property.cardinality = group.widest(link.element_instance);
        property.element_instance = link.element_instance;
        property.group_instance = group;
        property.ored = ored;
        property.default_value = link.default_value.clone();
        property.nillable = link.nillable;
        property.can_be_empty = target.can_be_empty;
        property.target = Some(target_id);
        property.nested_level = level;
        if let Some(meta) = meta {
            property.known_values.extend(meta.known_values.iter().cloned());
        }
        let index = scope.push(property);
        self.link_properties.insert(
            link_id,
            PropertyRef {
                bean: scope.bean,
                index,
                name: name.clone(),
            },
        );

        let flatten = self.config.attributes_as_properties && !target.is_bean() && !is_pcdata;
        if flatten {
            for attribute in &target_node.attributes {
                let base = convert_name(&format!("{name}_{}", attribute.name));
                let base_const = const_name(&format!("{schema_name}_{}", attribute.name));
                let (attr_name, attr_const) = scope.claim(&base, &base_const)?;
                let mut property =
                    self.attribute_property(attr_name, attribute.name.clone(), attr_const, attribute);
                property.cardinality = group
                    .widest(link.element_instance)
                    .widest(attribute.instance);
                property.group_instance = group;
                property.nested_level = level;
                property.origin = PropertyOrigin::FlattenedAttribute {
                    owner: name.clone(),
                };
                scope.push(property);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Finders
    // ------------------------------------------------------------------------

    fn resolve_finders(&mut self) -> Result<()> {
        let config = self.config;
        for text in config.all_finders() {
            let (owner, finder) = self.resolve_finder(text)?;
            if let Some(bean) = self.beans.get_mut(&owner) {
                bean.finders.push(finder);
            }
        }
        Ok(())
    }

    /// Resolve one finder and pick the bean it belongs to: the bean holding
    /// the selector property, or the `on` node when there is none.
    fn resolve_finder(&self, text: &str) -> Result<(GraphNodeId, ResolvedFinder)> {
        let graph = self.graph;
        let expr = FinderExpr::parse(text)?;
        let root_name = graph.node(self.root).name.clone();
        let on_links = graph
            .resolve_path(self.root, expr.relative_on(&root_name))
            .ok_or_else(|| SchemaError::UnresolvableFinder(text.to_string()))?;
        let on_node = on_links
            .last()
            .and_then(|l| graph.link(*l).element)
            .unwrap_or(self.root);

        // A selector naming the `on` element itself is looked up in the
        // record that holds it.
        let selector_chain = graph
            .resolve_path(on_node, &expr.find)
            .filter(|chain| !chain.is_empty())
            .or_else(|| {
                let owner = on_links.last().and_then(|l| graph.link(*l).owner)?;
                graph
                    .resolve_path(owner, &expr.find)
                    .filter(|chain| !chain.is_empty())
            });
        let selector_link = selector_chain.as_ref().and_then(|chain| chain.last().copied());
        let selector = selector_link.and_then(|l| self.link_properties.get(&l).cloned());
        let field = selector_link
            .and_then(|l| graph.link(l).element)
            .and_then(|target| self.field_property(target, &expr.by, selector.as_ref()));

        let degraded = selector.is_none() || field.is_none();
        if degraded {
            warn!(
                finder = %text,
                selector = selector.is_some(),
                field = field.is_some(),
                "finder only partly resolved"
            );
        }
        let owner = selector.as_ref().map_or(on_node, |s| s.bean);
        Ok((
            owner,
            ResolvedFinder {
                expr,
                selector,
                field,
                degraded,
            },
        ))
    }

    /// The property `path` names from the selector's target node: a slot,
    /// an attribute of a record, or an attribute flattened next to the
    /// selector.
    fn field_property(
        &self,
        target: GraphNodeId,
        path: &str,
        selector: Option<&PropertyRef>,
    ) -> Option<PropertyRef> {
        let graph = self.graph;
        if let Some(link) = graph
            .resolve_path(target, path)
            .and_then(|chain| chain.last().copied())
        {
            return self.link_properties.get(&link).cloned();
        }

        let attribute = path.trim_start_matches('@');
        self.find_property(target, |p| {
            p.origin == PropertyOrigin::Attribute && p.schema_name == attribute
        })
        .or_else(|| {
            let selector = selector?;
            self.find_property(selector.bean, |p| {
                p.schema_name == attribute
                    && matches!(&p.origin, PropertyOrigin::FlattenedAttribute { owner } if *owner == selector.name)
            })
        })
    }

    fn find_property(
        &self,
        bean: GraphNodeId,
        matches: impl Fn(&Property) -> bool,
    ) -> Option<PropertyRef> {
        let element = self.beans.get(&bean)?;
        let index = element.properties.iter().position(|p| matches(p))?;
        Some(PropertyRef {
            bean,
            index,
            name: element.properties[index].name.clone(),
        })
    }

    // ------------------------------------------------------------------------
    // Finish
    // ------------------------------------------------------------------------

    fn finish(self) -> Result<BeanModel> {
        let mut tags = TAGS_CLASS_NAME.to_string();
        let mut attempts = 0;
        while self.class_name_taken(&tags) {
            attempts += 1;
            if attempts >= MAX_ATTEMPTS {
                return Err(SchemaError::NamingExhausted(TAGS_CLASS_NAME.to_string()));
            }
            tags = format!("{UNIQUE_PREFIX}{tags}");
        }
        debug!(
            beans = self.beans.values().filter(|b| b.is_bean()).count(),
            constants = self.const_names.len(),
            package = %self.package,
            "resolved bean model"
        );
        Ok(BeanModel {
            beans: self.beans,
            root: self.root,
            package: self.package,
            const_names: self.const_names,
            tags_class_name: tags,
        })
    }
}
