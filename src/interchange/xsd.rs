//! XML Schema documents in and out of the grammar model.
//!
//! ```xml
//! <xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
//!             xmlns:po="http://example.com/po"
//!             targetNamespace="http://example.com/po">
//!   <xsd:element name="purchaseOrder" type="po:PurchaseOrderType"/>
//!   <xsd:complexType name="PurchaseOrderType">
//!     <xsd:sequence>
//!       <xsd:element name="comment" type="xsd:string" minOccurs="0"/>
//!     </xsd:sequence>
//!   </xsd:complexType>
//! </xsd:schema>
//! ```
//!
//! Reading drives a [`GrammarBuilder`]: every start tag pushes a construct,
//! every end tag pops it. Content of `appinfo` and `documentation` is kept
//! as free text and foreign nodes.

use crate::error::{Result, SchemaError};
use crate::grammar::Grammar;

/// XML Schema format handler.
#[derive(Debug, Clone, Copy)]
pub struct Xsd {
    use_big_data_types: bool,
}

impl Default for Xsd {
    fn default() -> Self {
        Self {
            use_big_data_types: true,
        }
    }
}

impl Xsd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `decimal`/`integer` to arbitrary-precision host types.
    pub fn with_big_data_types(mut self, value: bool) -> Self {
        self.use_big_data_types = value;
        self
    }

    /// Parse a schema document into a grammar.
    pub fn read(&self, input: &[u8]) -> Result<Grammar> {
        reader::XsdReader::new(self.use_big_data_types).read(input)
    }

    /// Serialize the tree under the grammar's root as a schema document.
    pub fn write(&self, grammar: &Grammar) -> Result<Vec<u8>> {
        writer::XsdWriter::new(grammar).write()
    }
}

// ============================================================================
// READER
// ============================================================================

mod reader {
    use super::*;
    use crate::grammar::{
        AttributeDecl, AttributeUse, ComplexTypeDecl, Construct, ElementDecl, GrammarBuilder,
        GroupDecl, NodeKind, Occurs, RefOrName, SchemaDecl, SimpleTypeDecl, Wildcard,
    };
    use quick_xml::Reader;
    use quick_xml::events::{BytesStart, Event};
    use smol_str::SmolStr;
    use tracing::{debug, trace};

    type Attributes = Vec<(String, String)>;

    pub struct XsdReader {
        builder: GrammarBuilder,
        /// One entry per open tag: whether it pushed a construct.
        open: Vec<bool>,
    }

    impl XsdReader {
        pub fn new(use_big_data_types: bool) -> Self {
            Self {
                builder: GrammarBuilder::new(Grammar::with_big_data_types(use_big_data_types)),
                open: Vec::new(),
            }
        }

        pub fn read(mut self, input: &[u8]) -> Result<Grammar> {
            let mut reader = Reader::from_reader(input);
            reader.config_mut().trim_text(true);

            let mut buf = Vec::new();
            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(Event::Start(ref e)) => self.handle_start(e)?,
                    Ok(Event::Empty(ref e)) => {
                        self.handle_start(e)?;
                        self.handle_end()?;
                    }
                    Ok(Event::End(_)) => self.handle_end()?,
                    Ok(Event::Text(ref t)) => {
                        let text = t
                            .unescape()
                            .map_err(|e| SchemaError::xml(format!("text error: {e}")))?;
                        self.handle_text(&text)?;
                    }
                    Ok(Event::CData(ref c)) => {
                        let text = std::str::from_utf8(c.as_ref())
                            .map_err(|e| SchemaError::xml(format!("CDATA error: {e}")))?;
                        self.handle_text(text)?;
                    }
                    Ok(Event::Eof) => break,
                    Err(e) => {
                        return Err(SchemaError::xml(format!(
                            "XML parse error at position {}: {e}",
                            reader.error_position()
                        )));
                    }
                    _ => {}
                }
                buf.clear();
            }

            let grammar = self.builder.finish()?;
            debug!(nodes = grammar.len(), "read schema");
            Ok(grammar)
        }

        fn handle_start(&mut self, e: &BytesStart<'_>) -> Result<()> {
            let qname = std::str::from_utf8(e.name().as_ref())
                .map_err(|e| SchemaError::xml(format!("invalid tag name: {e}")))?
                .to_string();
            let local = crate::namespace::remove_prefix(&qname).to_string();
            let attributes = collect_attributes(e)?;

            if self.open.is_empty() {
                if local != "schema" {
                    return Err(SchemaError::xml(format!(
                        "expected a schema document element, found <{qname}>"
                    )));
                }
                self.capture_namespace_declarations(&attributes);
            }

            let construct = if self.in_free_content() {
                Construct::AnyNode {
                    name: SmolStr::from(qname.as_str()),
                    value: None,
                }
            } else {
                match NodeKind::from_xsd_name(&local) {
                    Some(kind) => construct_for(kind, &attributes)?,
                    None => {
                        trace!(tag = %qname, "foreign schema content");
                        Construct::AnyNode {
                            name: SmolStr::from(qname.as_str()),
                            value: None,
                        }
                    }
                }
            };
            self.builder.push(construct)?;
            self.open.push(true);
            Ok(())
        }

        fn handle_end(&mut self) -> Result<()> {
            if self.open.pop() == Some(true) {
                self.builder.pop()?;
            }
            Ok(())
        }

        fn handle_text(&mut self, text: &str) -> Result<()> {
            if self.in_free_content() && !text.is_empty() {
                self.builder.add_leaf(Construct::Text(text.to_string()))?;
            }
            Ok(())
        }

        fn in_free_content(&self) -> bool {
            self.builder.current().is_ok_and(|id| {
                matches!(
                    self.builder.grammar().kind(id),
                    NodeKind::AppInfo | NodeKind::Documentation | NodeKind::AnyNode
                )
            })
        }

        /// Bind the schema element's `xmlns` declarations.
        fn capture_namespace_declarations(&mut self, attributes: &Attributes) {
            let namespaces = self.builder.grammar_mut().namespaces_mut();
            for (key, value) in attributes {
                if key == "xmlns" {
                    namespaces.set_document_namespace(Some(value));
                } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                    namespaces.bind(prefix, value.as_str());
                }
            }
        }
    }

    fn collect_attributes(e: &BytesStart<'_>) -> Result<Attributes> {
        let mut out = Vec::new();
        for attr_result in e.attributes() {
            let attr =
                attr_result.map_err(|e| SchemaError::xml(format!("attribute error: {e}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| SchemaError::xml(format!("attribute key error: {e}")))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| SchemaError::xml(format!("attribute value error: {e}")))?
                .to_string();
            out.push((key, value));
        }
        Ok(out)
    }

    fn get<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
        attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn get_smol(attributes: &Attributes, key: &str) -> Option<SmolStr> {
        get(attributes, key).map(SmolStr::from)
    }

    fn get_bool(attributes: &Attributes, key: &str) -> bool {
        matches!(get(attributes, key), Some("true" | "1"))
    }

    fn occurs(attributes: &Attributes) -> Result<Occurs> {
        let mut occurs = Occurs::ONE;
        if let Some(min) = get(attributes, "minOccurs") {
            occurs.min = min
                .trim()
                .parse()
                .map_err(|_| SchemaError::xml(format!("invalid minOccurs '{min}'")))?;
        }
        if let Some(max) = get(attributes, "maxOccurs") {
            occurs.max = Occurs::parse_max(max)
                .ok_or_else(|| SchemaError::xml(format!("invalid maxOccurs '{max}'")))?;
        }
        Ok(occurs)
    }

    fn construct_for(kind: NodeKind, attributes: &Attributes) -> Result<Construct> {
        let a = attributes;
        let construct = match kind {
            NodeKind::Schema => Construct::Schema(SchemaDecl {
                target_namespace: get_smol(a, "targetNamespace"),
                element_form_qualified: get(a, "elementFormDefault") == Some("qualified"),
                attribute_form_qualified: get(a, "attributeFormDefault") == Some("qualified"),
            }),
            NodeKind::Element => Construct::Element(ElementDecl {
                name: get_smol(a, "name"),
                namespace: None,
                type_name: get_smol(a, "type"),
                reference: get_smol(a, "ref"),
                occurs: occurs(a)?,
                nillable: get_bool(a, "nillable"),
                is_abstract: get_bool(a, "abstract"),
                default_value: get_smol(a, "default").or_else(|| get_smol(a, "fixed")),
                java_type: None,
            }),
            NodeKind::ComplexType => Construct::ComplexType(ComplexTypeDecl {
                name: get_smol(a, "name"),
                mixed: get_bool(a, "mixed"),
                is_abstract: get_bool(a, "abstract"),
            }),
            NodeKind::SimpleType => Construct::SimpleType(SimpleTypeDecl {
                name: get_smol(a, "name"),
                java_type: None,
            }),
            NodeKind::SimpleContent => Construct::SimpleContent,
            NodeKind::ComplexContent => Construct::ComplexContent,
            NodeKind::Sequence => Construct::Sequence(occurs(a)?),
            NodeKind::Choice => Construct::Choice(occurs(a)?),
            NodeKind::All => Construct::All(occurs(a)?),
            NodeKind::Group => Construct::Group(GroupDecl {
                name: get_smol(a, "name"),
                reference: get_smol(a, "ref"),
                occurs: occurs(a)?,
            }),
            NodeKind::Attribute => {
                let use_ = match get(a, "use") {
                    Some(text) => AttributeUse::parse(text)
                        .ok_or_else(|| SchemaError::xml(format!("invalid attribute use '{text}'")))?,
                    None => AttributeUse::Optional,
                };
                Construct::Attribute(AttributeDecl {
                    name: get_smol(a, "name"),
                    namespace: None,
                    type_name: get_smol(a, "type"),
                    reference: get_smol(a, "ref"),
                    default_value: get_smol(a, "default"),
                    fixed: get_smol(a, "fixed"),
                    use_,
                })
            }
            NodeKind::AttributeGroup => Construct::AttributeGroup(RefOrName {
                name: get_smol(a, "name"),
                reference: get_smol(a, "ref"),
            }),
            NodeKind::AnyAttribute => Construct::AnyAttribute(wildcard(a, Occurs::ONE)),
            NodeKind::Any => Construct::Any(wildcard(a, occurs(a)?)),
            NodeKind::Restriction => Construct::Restriction {
                base: get_smol(a, "base"),
            },
            NodeKind::Extension => Construct::Extension {
                base: get_smol(a, "base"),
            },
            NodeKind::Union => Construct::Union {
                member_types: get(a, "memberTypes")
                    .map(|text| text.split_whitespace().map(SmolStr::from).collect())
                    .unwrap_or_default(),
            },
            NodeKind::List => Construct::List {
                item_type: get_smol(a, "itemType"),
            },
            NodeKind::Annotation => Construct::Annotation,
            NodeKind::AppInfo => Construct::AppInfo,
            NodeKind::Documentation => Construct::Documentation,
            NodeKind::Facet(facet) => Construct::Facet {
                kind: facet,
                value: get_smol(a, "value").unwrap_or_default(),
            },
            NodeKind::Key => Construct::Key {
                name: get_smol(a, "name"),
            },
            NodeKind::Unique => Construct::Unique {
                name: get_smol(a, "name"),
            },
            NodeKind::KeyRef => Construct::KeyRef {
                name: get_smol(a, "name"),
                refer: get_smol(a, "refer"),
            },
            NodeKind::Selector => Construct::Selector {
                xpath: get_smol(a, "xpath"),
            },
            NodeKind::Field => Construct::Field {
                xpath: get_smol(a, "xpath"),
            },
            NodeKind::Include => Construct::Include {
                schema_location: get_smol(a, "schemaLocation").unwrap_or_default(),
            },
            NodeKind::Import => Construct::Import {
                namespace: get_smol(a, "namespace"),
                schema_location: get_smol(a, "schemaLocation"),
            },
            NodeKind::Text | NodeKind::AnyNode => Construct::AnyNode {
                name: SmolStr::new_static(kind.as_str()),
                value: None,
            },
        };
        Ok(construct)
    }

    fn wildcard(attributes: &Attributes, occurs: Occurs) -> Wildcard {
        Wildcard {
            namespace: get_smol(attributes, "namespace"),
            process_contents: get_smol(attributes, "processContents"),
            occurs,
        }
    }
}

// ============================================================================
// WRITER
// ============================================================================

mod writer {
    use super::*;
    use crate::grammar::{Construct, MaxOccurs, NodeId, Occurs};
    use crate::namespace::{XSD_NS, remove_prefix};
    use quick_xml::Writer;
    use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
    use std::io::Cursor;

    pub struct XsdWriter<'g> {
        grammar: &'g Grammar,
        prefix: String,
    }

    impl<'g> XsdWriter<'g> {
        pub fn new(grammar: &'g Grammar) -> Self {
            let prefix = grammar
                .namespaces()
                .existing_prefix(XSD_NS)
                .unwrap_or("xsd")
                .to_string();
            Self { grammar, prefix }
        }

        pub fn write(&self) -> Result<Vec<u8>> {
            let root = self.grammar.root().ok_or(SchemaError::MissingRoot)?;
            let mut buffer = Cursor::new(Vec::new());
            let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(write_error)?;
            self.write_node(&mut writer, root)?;

            let mut output = buffer.into_inner();
            output.push(b'\n');
            Ok(output)
        }

        fn write_node<W: std::io::Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<()> {
            let construct = self.grammar.construct(id);
            if let Construct::Text(text) = construct {
                return writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map(|_| ())
                    .map_err(write_error);
            }

            let tag = match construct {
                Construct::AnyNode { name, .. } => name.to_string(),
                other => format!("{}:{}", self.prefix, other.kind().as_str()),
            };
            let mut start = BytesStart::new(tag.as_str());
            for (key, value) in self.attributes_of(id) {
                start.push_attribute((key.as_str(), value.as_str()));
            }

            let children = self.grammar.children(id);
            let value = match construct {
                Construct::AnyNode { value, .. } => value.as_deref(),
                _ => None,
            };
            if children.is_empty() && value.is_none() {
                return writer
                    .write_event(Event::Empty(start))
                    .map(|_| ())
                    .map_err(write_error);
            }
            writer.write_event(Event::Start(start)).map_err(write_error)?;
            if let Some(value) = value {
                writer
                    .write_event(Event::Text(BytesText::new(value)))
                    .map_err(write_error)?;
            }
            for &child in children {
                self.write_node(writer, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(tag.as_str())))
                .map_err(write_error)?;
            Ok(())
        }

        fn attributes_of(&self, id: NodeId) -> Vec<(String, String)> {
            let mut out = Attrs::default();
            match self.grammar.construct(id) {
                Construct::Schema(decl) => {
                    let namespaces = self.grammar.namespaces();
                    if let Some(uri) = namespaces.document_namespace() {
                        out.push("xmlns", uri);
                    }
                    for (prefix, uri) in namespaces.prefixes().filter(|(p, _)| *p != "xml") {
                        out.push(format!("xmlns:{prefix}"), uri);
                    }
                    out.opt("targetNamespace", decl.target_namespace.as_deref());
                    if decl.element_form_qualified {
                        out.push("elementFormDefault", "qualified");
                    }
                    if decl.attribute_form_qualified {
                        out.push("attributeFormDefault", "qualified");
                    }
                }
                Construct::Element(decl) => {
                    out.opt("name", decl.name.as_deref().map(remove_prefix));
                    out.opt("ref", decl.reference.as_deref());
                    out.opt("type", decl.type_name.as_deref());
                    out.occurs(decl.occurs);
                    out.flag("nillable", decl.nillable);
                    out.flag("abstract", decl.is_abstract);
                    out.opt("default", decl.default_value.as_deref());
                }
                Construct::ComplexType(decl) => {
                    out.opt("name", decl.name.as_deref().map(remove_prefix));
                    out.flag("mixed", decl.mixed);
                    out.flag("abstract", decl.is_abstract);
                }
                Construct::SimpleType(decl) => {
                    out.opt("name", decl.name.as_deref().map(remove_prefix));
                }
                Construct::Sequence(occurs) | Construct::Choice(occurs) | Construct::All(occurs) => {
                    out.occurs(*occurs);
                }
                Construct::Group(decl) => {
                    out.opt("name", decl.name.as_deref().map(remove_prefix));
                    out.opt("ref", decl.reference.as_deref());
                    out.occurs(decl.occurs);
                }
                Construct::Attribute(decl) => {
                    out.opt("name", decl.name.as_deref().map(remove_prefix));
                    out.opt("ref", decl.reference.as_deref());
                    out.opt("type", decl.type_name.as_deref());
                    out.opt("default", decl.default_value.as_deref());
                    out.opt("fixed", decl.fixed.as_deref());
                    if decl.use_ != crate::grammar::AttributeUse::Optional {
                        out.push("use", decl.use_.as_str());
                    }
                }
                Construct::AttributeGroup(decl) => {
                    out.opt("name", decl.name.as_deref().map(remove_prefix));
                    out.opt("ref", decl.reference.as_deref());
                }
                Construct::AnyAttribute(w) | Construct::Any(w) => {
                    out.opt("namespace", w.namespace.as_deref());
                    out.opt("processContents", w.process_contents.as_deref());
                    if matches!(self.grammar.construct(id), Construct::Any(_)) {
                        out.occurs(w.occurs);
                    }
                }
                Construct::Restriction { base } | Construct::Extension { base } => {
                    out.opt("base", base.as_deref());
                }
                Construct::Union { member_types } if !member_types.is_empty() => {
                    let joined: Vec<&str> = member_types.iter().map(|m| m.as_str()).collect();
                    out.push("memberTypes", joined.join(" "));
                }
                Construct::List { item_type } => out.opt("itemType", item_type.as_deref()),
                Construct::Facet { value, .. } => out.push("value", value.as_str()),
                Construct::Key { name } | Construct::Unique { name } => {
                    out.opt("name", name.as_deref());
                }
                Construct::KeyRef { name, refer } => {
                    out.opt("name", name.as_deref());
                    out.opt("refer", refer.as_deref());
                }
                Construct::Selector { xpath } | Construct::Field { xpath } => {
                    out.opt("xpath", xpath.as_deref());
                }
                Construct::Include { schema_location } => {
                    out.push("schemaLocation", schema_location.as_str());
                }
                Construct::Import {
                    namespace,
                    schema_location,
                } => {
                    out.opt("namespace", namespace.as_deref());
                    out.opt("schemaLocation", schema_location.as_deref());
                }
                _ => {}
            }
            out.0
        }
    }

    #[derive(Default)]
    struct Attrs(Vec<(String, String)>);

    impl Attrs {
        fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
            self.0.push((key.into(), value.into()));
        }

        fn opt(&mut self, key: &str, value: Option<&str>) {
            if let Some(value) = value {
                self.push(key, value);
            }
        }

        fn flag(&mut self, key: &str, value: bool) {
            if value {
                self.push(key, "true");
            }
        }

        fn occurs(&mut self, occurs: Occurs) {
            if occurs.min != 1 {
                self.push("minOccurs", occurs.min_text());
            }
            if occurs.max != MaxOccurs::Bounded(1) {
                self.push("maxOccurs", occurs.max_text());
            }
        }
    }

    fn write_error(e: impl std::fmt::Display) -> SchemaError {
        SchemaError::xml(format!("write error: {e}"))
    }
}
