//! Construct payloads: the per-kind fields of a grammar node.

use smol_str::SmolStr;

use super::kind::{FacetKind, NodeKind};
use crate::namespace::remove_prefix;

// ============================================================================
// OCCURRENCE BOUNDS
// ============================================================================

/// Upper occurrence bound of a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

/// `minOccurs`/`maxOccurs` of an element, any, or model group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occurs {
    pub min: u32,
    pub max: MaxOccurs,
}

impl Default for Occurs {
    fn default() -> Self {
        Self::ONE
    }
}

impl Occurs {
    pub const ONE: Self = Self {
        min: 1,
        max: MaxOccurs::Bounded(1),
    };

    pub fn new(min: u32, max: MaxOccurs) -> Self {
        Self { min, max }
    }

    /// Parse the textual `maxOccurs` form (`"unbounded"` or a number).
    pub fn parse_max(text: &str) -> Option<MaxOccurs> {
        if text == "unbounded" {
            return Some(MaxOccurs::Unbounded);
        }
        text.trim().parse().ok().map(MaxOccurs::Bounded)
    }

    pub fn is_one(&self) -> bool {
        *self == Self::ONE
    }

    pub fn min_text(&self) -> String {
        self.min.to_string()
    }

    pub fn max_text(&self) -> String {
        match self.max {
            MaxOccurs::Bounded(n) => n.to_string(),
            MaxOccurs::Unbounded => "unbounded".to_string(),
        }
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// Value of an attribute's `use`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttributeUse {
    #[default]
    Optional,
    Required,
    Prohibited,
}

impl AttributeUse {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "optional" => Some(Self::Optional),
            "required" => Some(Self::Required),
            "prohibited" => Some(Self::Prohibited),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Optional => "optional",
            Self::Required => "required",
            Self::Prohibited => "prohibited",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementDecl {
    /// Local (possibly prefixed) element name.
    pub name: Option<SmolStr>,
    /// Namespace URI the element lives in, if qualified.
    pub namespace: Option<SmolStr>,
    /// Declared type, as written (`xsd:string`, `tns:Address`, `Address`).
    pub type_name: Option<SmolStr>,
    pub reference: Option<SmolStr>,
    pub occurs: Occurs,
    pub nillable: bool,
    pub is_abstract: bool,
    pub default_value: Option<SmolStr>,
    /// Host-language type forced onto this element.
    pub java_type: Option<SmolStr>,
}

impl ElementDecl {
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn typed(name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
        Self {
            name: Some(name.into()),
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    pub fn reference(reference: impl Into<SmolStr>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    /// The name this element contributes to content paths.
    pub fn local_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.reference.as_deref())
            .map(remove_prefix)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComplexTypeDecl {
    pub name: Option<SmolStr>,
    pub mixed: bool,
    pub is_abstract: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimpleTypeDecl {
    pub name: Option<SmolStr>,
    pub java_type: Option<SmolStr>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupDecl {
    pub name: Option<SmolStr>,
    pub reference: Option<SmolStr>,
    pub occurs: Occurs,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: Option<SmolStr>,
    pub namespace: Option<SmolStr>,
    pub type_name: Option<SmolStr>,
    pub reference: Option<SmolStr>,
    pub default_value: Option<SmolStr>,
    pub fixed: Option<SmolStr>,
    pub use_: AttributeUse,
}

impl AttributeDecl {
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn local_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.reference.as_deref())
            .map(remove_prefix)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefOrName {
    pub name: Option<SmolStr>,
    pub reference: Option<SmolStr>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wildcard {
    pub namespace: Option<SmolStr>,
    pub process_contents: Option<SmolStr>,
    pub occurs: Occurs,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaDecl {
    pub target_namespace: Option<SmolStr>,
    pub element_form_qualified: bool,
    pub attribute_form_qualified: bool,
}

// ============================================================================
// CONSTRUCT
// ============================================================================

/// One grammar construct together with its construct-specific fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Construct {
    Schema(SchemaDecl),
    Element(ElementDecl),
    ComplexType(ComplexTypeDecl),
    SimpleType(SimpleTypeDecl),
    SimpleContent,
    ComplexContent,
    Sequence(Occurs),
    Choice(Occurs),
    All(Occurs),
    Group(GroupDecl),
    Attribute(AttributeDecl),
    AttributeGroup(RefOrName),
    AnyAttribute(Wildcard),
    Any(Wildcard),
    Restriction { base: Option<SmolStr> },
    Extension { base: Option<SmolStr> },
    Union { member_types: Vec<SmolStr> },
    List { item_type: Option<SmolStr> },
    Annotation,
    AppInfo,
    Documentation,
    Facet { kind: FacetKind, value: SmolStr },
    Key { name: Option<SmolStr> },
    Unique { name: Option<SmolStr> },
    KeyRef { name: Option<SmolStr>, refer: Option<SmolStr> },
    Selector { xpath: Option<SmolStr> },
    Field { xpath: Option<SmolStr> },
    Include { schema_location: SmolStr },
    Import {
        namespace: Option<SmolStr>,
        schema_location: Option<SmolStr>,
    },
    Text(String),
    AnyNode { name: SmolStr, value: Option<String> },
}

impl Construct {
    pub fn kind(&self) -> NodeKind {
        match self {
            Construct::Schema(_) => NodeKind::Schema,
            Construct::Element(_) => NodeKind::Element,
            Construct::ComplexType(_) => NodeKind::ComplexType,
            Construct::SimpleType(_) => NodeKind::SimpleType,
            Construct::SimpleContent => NodeKind::SimpleContent,
            Construct::ComplexContent => NodeKind::ComplexContent,
            Construct::Sequence(_) => NodeKind::Sequence,
            Construct::Choice(_) => NodeKind::Choice,
            Construct::All(_) => NodeKind::All,
            Construct::Group(_) => NodeKind::Group,
            Construct::Attribute(_) => NodeKind::Attribute,
            Construct::AttributeGroup(_) => NodeKind::AttributeGroup,
            Construct::AnyAttribute(_) => NodeKind::AnyAttribute,
            Construct::Any(_) => NodeKind::Any,
            Construct::Restriction { .. } => NodeKind::Restriction,
            Construct::Extension { .. } => NodeKind::Extension,
            Construct::Union { .. } => NodeKind::Union,
            Construct::List { .. } => NodeKind::List,
            Construct::Annotation => NodeKind::Annotation,
            Construct::AppInfo => NodeKind::AppInfo,
            Construct::Documentation => NodeKind::Documentation,
            Construct::Facet { kind, .. } => NodeKind::Facet(*kind),
            Construct::Key { .. } => NodeKind::Key,
            Construct::Unique { .. } => NodeKind::Unique,
            Construct::KeyRef { .. } => NodeKind::KeyRef,
            Construct::Selector { .. } => NodeKind::Selector,
            Construct::Field { .. } => NodeKind::Field,
            Construct::Include { .. } => NodeKind::Include,
            Construct::Import { .. } => NodeKind::Import,
            Construct::Text(_) => NodeKind::Text,
            Construct::AnyNode { .. } => NodeKind::AnyNode,
        }
    }

    /// The name this construct contributes to its full content path.
    ///
    /// Attributes contribute `@name`; named types contribute their type
    /// name; groupings and annotations contribute nothing.
    pub fn content_name(&self) -> Option<SmolStr> {
        match self {
            Construct::Element(decl) => decl.local_name().map(SmolStr::from),
            Construct::Attribute(decl) => decl.local_name().map(|n| SmolStr::from(format!("@{n}"))),
            Construct::ComplexType(decl) => decl.name.clone(),
            Construct::SimpleType(decl) => decl.name.clone(),
            _ => None,
        }
    }

    /// Occurrence bounds, for the constructs that carry them.
    pub fn occurs(&self) -> Option<Occurs> {
        match self {
            Construct::Element(decl) => Some(decl.occurs),
            Construct::Sequence(o) | Construct::Choice(o) | Construct::All(o) => Some(*o),
            Construct::Group(decl) => Some(decl.occurs),
            Construct::Any(w) => Some(w.occurs),
            _ => None,
        }
    }

    pub fn occurs_mut(&mut self) -> Option<&mut Occurs> {
        match self {
            Construct::Element(decl) => Some(&mut decl.occurs),
            Construct::Sequence(o) | Construct::Choice(o) | Construct::All(o) => Some(o),
            Construct::Group(decl) => Some(&mut decl.occurs),
            Construct::Any(w) => Some(&mut w.occurs),
            _ => None,
        }
    }

    /// The `ref` this construct points at, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Construct::Element(decl) => decl.reference.as_deref(),
            Construct::Group(decl) => decl.reference.as_deref(),
            Construct::Attribute(decl) => decl.reference.as_deref(),
            Construct::AttributeGroup(decl) => decl.reference.as_deref(),
            _ => None,
        }
    }
}
