//! Construct kinds and their allowed-children tables.

use std::fmt;

/// A restriction facet of a simple type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FacetKind {
    MinExclusive,
    MaxExclusive,
    MinInclusive,
    MaxInclusive,
    Enumeration,
    Pattern,
    Length,
    MinLength,
    MaxLength,
    TotalDigits,
    FractionDigits,
    WhiteSpace,
}

impl FacetKind {
    pub const ALL: [FacetKind; 12] = [
        FacetKind::MinExclusive,
        FacetKind::MaxExclusive,
        FacetKind::MinInclusive,
        FacetKind::MaxInclusive,
        FacetKind::Enumeration,
        FacetKind::Pattern,
        FacetKind::Length,
        FacetKind::MinLength,
        FacetKind::MaxLength,
        FacetKind::TotalDigits,
        FacetKind::FractionDigits,
        FacetKind::WhiteSpace,
    ];

    /// The XML Schema element name of this facet.
    pub fn as_str(self) -> &'static str {
        match self {
            FacetKind::MinExclusive => "minExclusive",
            FacetKind::MaxExclusive => "maxExclusive",
            FacetKind::MinInclusive => "minInclusive",
            FacetKind::MaxInclusive => "maxInclusive",
            FacetKind::Enumeration => "enumeration",
            FacetKind::Pattern => "pattern",
            FacetKind::Length => "length",
            FacetKind::MinLength => "minLength",
            FacetKind::MaxLength => "maxLength",
            FacetKind::TotalDigits => "totalDigits",
            FacetKind::FractionDigits => "fractionDigits",
            FacetKind::WhiteSpace => "whiteSpace",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// The kind of a grammar construct, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Schema,
    Element,
    ComplexType,
    SimpleType,
    SimpleContent,
    ComplexContent,
    Sequence,
    Choice,
    All,
    Group,
    Attribute,
    AttributeGroup,
    AnyAttribute,
    Any,
    Restriction,
    Extension,
    Union,
    List,
    Annotation,
    AppInfo,
    Documentation,
    Facet(FacetKind),
    Key,
    Unique,
    KeyRef,
    Selector,
    Field,
    Include,
    Import,
    /// Free text inside documentation or appinfo.
    Text,
    /// Content that is not part of the XML Schema vocabulary.
    AnyNode,
}

// ============================================================================
// ALLOWED CHILDREN
// ============================================================================

use NodeKind as K;

const FACETS: [NodeKind; 12] = [
    K::Facet(FacetKind::MinExclusive),
    K::Facet(FacetKind::MaxExclusive),
    K::Facet(FacetKind::MinInclusive),
    K::Facet(FacetKind::MaxInclusive),
    K::Facet(FacetKind::Enumeration),
    K::Facet(FacetKind::Pattern),
    K::Facet(FacetKind::Length),
    K::Facet(FacetKind::MinLength),
    K::Facet(FacetKind::MaxLength),
    K::Facet(FacetKind::TotalDigits),
    K::Facet(FacetKind::FractionDigits),
    K::Facet(FacetKind::WhiteSpace),
];

const SCHEMA_CHILDREN: &[NodeKind] = &[
    K::Annotation,
    K::SimpleType,
    K::ComplexType,
    K::Element,
    K::Attribute,
    K::AttributeGroup,
    K::Include,
    K::Import,
    K::Group,
];

const COMPLEX_TYPE_CHILDREN: &[NodeKind] = &[
    K::Annotation,
    K::Choice,
    K::Group,
    K::Sequence,
    K::All,
    K::Attribute,
    K::AttributeGroup,
    K::AnyAttribute,
    K::SimpleContent,
    K::ComplexContent,
];

const CONTENT_CHILDREN: &[NodeKind] = &[K::Annotation, K::Restriction, K::Extension];

const SIMPLE_TYPE_CHILDREN: &[NodeKind] = &[K::Annotation, K::Restriction, K::List, K::Union];

const UNION_CHILDREN: &[NodeKind] = &[K::Annotation, K::SimpleType];

const RESTRICTION_CHILDREN: &[NodeKind] = &[
    K::Annotation,
    K::SimpleType,
    K::All,
    K::Choice,
    K::Sequence,
    K::Group,
    K::Attribute,
    K::AttributeGroup,
    K::AnyAttribute,
    FACETS[0],
    FACETS[1],
    FACETS[2],
    FACETS[3],
    FACETS[4],
    FACETS[5],
    FACETS[6],
    FACETS[7],
    FACETS[8],
    FACETS[9],
    FACETS[10],
    FACETS[11],
];

const EXTENSION_CHILDREN: &[NodeKind] = &[
    K::Annotation,
    K::Attribute,
    K::AttributeGroup,
    K::AnyAttribute,
    K::Choice,
    K::Group,
    K::Sequence,
    K::All,
];

const ANNOTATION_ONLY: &[NodeKind] = &[K::Annotation];

const SEQUENCE_CHILDREN: &[NodeKind] = &[
    K::Annotation,
    K::Element,
    K::Any,
    K::Choice,
    K::Sequence,
    K::Group,
];

const ALL_CHILDREN: &[NodeKind] = &[K::Annotation, K::Element, K::Any];

const GROUP_CHILDREN: &[NodeKind] = &[K::All, K::Choice, K::Sequence, K::Annotation];

const ANNOTATION_CHILDREN: &[NodeKind] = &[K::AppInfo, K::Documentation];

const FREE_CONTENT_CHILDREN: &[NodeKind] = &[K::AnyNode, K::Text];

const ELEMENT_CHILDREN: &[NodeKind] = &[
    K::Annotation,
    K::SimpleType,
    K::ComplexType,
    K::Unique,
    K::Key,
    K::KeyRef,
];

const IDENTITY_CHILDREN: &[NodeKind] = &[K::Annotation, K::Selector, K::Field];

const ATTRIBUTE_CHILDREN: &[NodeKind] = &[K::Annotation, K::SimpleType];

const ATTRIBUTE_GROUP_CHILDREN: &[NodeKind] = &[
    K::Annotation,
    K::Attribute,
    K::AttributeGroup,
    K::AnyAttribute,
];

impl NodeKind {
    /// The set of child kinds this kind may legally contain.
    pub fn allowed_children(self) -> &'static [NodeKind] {
        match self {
            K::Schema => SCHEMA_CHILDREN,
            K::ComplexType => COMPLEX_TYPE_CHILDREN,
            K::SimpleContent | K::ComplexContent => CONTENT_CHILDREN,
            K::SimpleType => SIMPLE_TYPE_CHILDREN,
            K::Union => UNION_CHILDREN,
            K::Restriction => RESTRICTION_CHILDREN,
            K::Extension => EXTENSION_CHILDREN,
            K::List | K::Facet(_) => ANNOTATION_ONLY,
            K::Sequence | K::Choice => SEQUENCE_CHILDREN,
            K::All => ALL_CHILDREN,
            K::Group => GROUP_CHILDREN,
            K::Annotation => ANNOTATION_CHILDREN,
            K::AppInfo | K::Documentation => FREE_CONTENT_CHILDREN,
            K::Element => ELEMENT_CHILDREN,
            K::Key | K::Unique | K::KeyRef => IDENTITY_CHILDREN,
            K::Selector | K::Field => ANNOTATION_ONLY,
            K::Any | K::AnyAttribute => ANNOTATION_ONLY,
            K::Attribute => ATTRIBUTE_CHILDREN,
            K::AttributeGroup => ATTRIBUTE_GROUP_CHILDREN,
            K::Include | K::Import => &[],
            K::Text | K::AnyNode => FREE_CONTENT_CHILDREN,
        }
    }

    /// Whether `validate` checks this kind's children at all.
    ///
    /// Content wrappers and facets accept whatever they were given.
    pub fn validates_children(self) -> bool {
        !matches!(self, K::SimpleContent | K::ComplexContent | K::Facet(_))
    }

    pub fn allows_child(self, child: NodeKind) -> bool {
        self.allowed_children().contains(&child)
    }

    /// Whether the kind is a grouping-only container (sequence/choice/all/group).
    pub fn is_model_group(self) -> bool {
        matches!(self, K::Sequence | K::Choice | K::All | K::Group)
    }

    pub fn is_facet(self) -> bool {
        matches!(self, K::Facet(_))
    }

    /// The XML Schema element name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            K::Schema => "schema",
            K::Element => "element",
            K::ComplexType => "complexType",
            K::SimpleType => "simpleType",
            K::SimpleContent => "simpleContent",
            K::ComplexContent => "complexContent",
            K::Sequence => "sequence",
            K::Choice => "choice",
            K::All => "all",
            K::Group => "group",
            K::Attribute => "attribute",
            K::AttributeGroup => "attributeGroup",
            K::AnyAttribute => "anyAttribute",
            K::Any => "any",
            K::Restriction => "restriction",
            K::Extension => "extension",
            K::Union => "union",
            K::List => "list",
            K::Annotation => "annotation",
            K::AppInfo => "appinfo",
            K::Documentation => "documentation",
            K::Facet(f) => f.as_str(),
            K::Key => "key",
            K::Unique => "unique",
            K::KeyRef => "keyref",
            K::Selector => "selector",
            K::Field => "field",
            K::Include => "include",
            K::Import => "import",
            K::Text => "#text",
            K::AnyNode => "#any",
        }
    }

    /// Map an XML Schema local element name to its kind.
    ///
    /// Returns `None` for names outside the vocabulary; callers keep those
    /// as [`NodeKind::AnyNode`] content.
    pub fn from_xsd_name(name: &str) -> Option<Self> {
        let kind = match name {
            "schema" => K::Schema,
            "element" => K::Element,
            "complexType" => K::ComplexType,
            "simpleType" => K::SimpleType,
            "simpleContent" => K::SimpleContent,
            "complexContent" => K::ComplexContent,
            "sequence" => K::Sequence,
            "choice" => K::Choice,
            "all" => K::All,
            "group" => K::Group,
            "attribute" => K::Attribute,
            "attributeGroup" => K::AttributeGroup,
            "anyAttribute" => K::AnyAttribute,
            "any" => K::Any,
            "restriction" => K::Restriction,
            "extension" => K::Extension,
            "union" => K::Union,
            "list" => K::List,
            "annotation" => K::Annotation,
            "appinfo" => K::AppInfo,
            "documentation" => K::Documentation,
            "key" => K::Key,
            "unique" => K::Unique,
            "keyref" => K::KeyRef,
            "selector" => K::Selector,
            "field" => K::Field,
            "include" => K::Include,
            "import" => K::Import,
            other => return FacetKind::from_name(other).map(K::Facet),
        };
        Some(kind)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
