//! Built-in XML Schema simple types.
//!
//! Each built-in is a detached `simpleType` node carrying its host-language
//! type. Derived built-ins also get the restriction chain the XML Schema
//! datatypes recommendation gives them, so facet-aware consumers see the
//! same structure they would for a user-defined type.

use smol_str::SmolStr;

use crate::grammar::{AttributeDecl, Construct, FacetKind, Grammar, NodeId, SimpleTypeDecl};
use crate::namespace::{XML_NS, XSD_NS, canonical_qname};

/// `(schema type, host type)` for every built-in with a fixed mapping.
const BUILTINS: &[(&str, &str)] = &[
    ("string", "java.lang.String"),
    ("dateTime", "java.util.Calendar"),
    ("date", "java.util.Calendar"),
    ("long", "long"),
    ("int", "int"),
    ("char", "char"),
    ("short", "short"),
    ("double", "double"),
    ("float", "float"),
    ("byte", "byte"),
    ("boolean", "boolean"),
    ("NMTOKEN", "java.lang.String"),
    ("positiveInteger", "long"),
    ("nonNegativeInteger", "long"),
    ("nonPositiveInteger", "long"),
    ("negativeInteger", "long"),
    ("unsignedLong", "long"),
    ("unsignedInt", "int"),
    ("unsignedShort", "short"),
    ("unsignedByte", "byte"),
    ("anyURI", "java.net.URI"),
    ("QName", "javax.xml.namespace.QName"),
    ("NCName", "java.lang.String"),
    ("Name", "java.lang.String"),
    ("duration", "java.lang.String"),
    ("time", "java.lang.String"),
    ("ID", "java.lang.String"),
    ("token", "java.lang.String"),
    ("normalizedString", "java.lang.String"),
    ("gYear", "int"),
    ("gYearMonth", "java.lang.String"),
    ("gMonthDay", "java.lang.String"),
    ("gDay", "java.lang.String"),
    ("gMonth", "java.lang.String"),
    ("language", "java.lang.String"),
    ("hexBinary", "byte[]"),
    ("base64Binary", "byte[]"),
];

/// `(derived type, base type, facets)` restriction chains.
const RESTRICTIONS: &[(&str, &str, &[(FacetKind, &str)])] = &[
    ("normalizedString", "string", &[(FacetKind::WhiteSpace, "replace")]),
    ("token", "normalizedString", &[(FacetKind::WhiteSpace, "collapse")]),
    ("NMTOKEN", "normalizedString", &[(FacetKind::WhiteSpace, "collapse")]),
    ("Name", "normalizedString", &[(FacetKind::WhiteSpace, "collapse")]),
    ("NCName", "normalizedString", &[(FacetKind::WhiteSpace, "collapse")]),
    ("ID", "normalizedString", &[(FacetKind::WhiteSpace, "collapse")]),
    (
        "language",
        "token",
        &[
            (FacetKind::WhiteSpace, "collapse"),
            (FacetKind::Pattern, "[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*"),
        ],
    ),
    ("nonPositiveInteger", "integer", &[(FacetKind::MaxInclusive, "0")]),
    ("negativeInteger", "nonPositiveInteger", &[(FacetKind::MaxExclusive, "0")]),
    ("nonNegativeInteger", "integer", &[(FacetKind::MinInclusive, "0")]),
    ("unsignedLong", "nonNegativeInteger", &[(FacetKind::MinInclusive, "0")]),
    ("unsignedInt", "unsignedLong", &[(FacetKind::MinInclusive, "0")]),
    ("positiveInteger", "nonNegativeInteger", &[(FacetKind::MinExclusive, "0")]),
];

/// Register every built-in type plus the `xml:lang` attribute.
pub fn install_predefined_types(grammar: &mut Grammar) {
    let (decimal, integer) = if grammar.uses_big_data_types() {
        ("java.math.BigDecimal", "java.math.BigInteger")
    } else {
        ("double", "long")
    };
    let numeric = [("decimal", decimal), ("integer", integer)];

    for (local, host) in BUILTINS.iter().chain(numeric.iter()) {
        let construct = Construct::SimpleType(SimpleTypeDecl {
            name: Some(SmolStr::from(format!("xsd:{local}"))),
            java_type: Some(SmolStr::new(host)),
        });
        grammar.alloc_predefined(construct, canonical_qname(Some(XSD_NS), local));
    }

    for (derived, base, facets) in RESTRICTIONS {
        let Some(owner) = builtin(grammar, derived) else {
            continue;
        };
        let restriction = grammar.alloc_predefined_child(
            owner,
            Construct::Restriction {
                base: Some(SmolStr::from(format!("xsd:{base}"))),
            },
        );
        for (kind, value) in facets.iter() {
            grammar.alloc_predefined_child(
                restriction,
                Construct::Facet {
                    kind: *kind,
                    value: SmolStr::new(value),
                },
            );
        }
    }

    let lang = Construct::Attribute(AttributeDecl {
        namespace: Some(SmolStr::new_static(XML_NS)),
        type_name: Some(SmolStr::new_static("xsd:string")),
        ..AttributeDecl::named("lang")
    });
    grammar.alloc_predefined_attribute(lang, canonical_qname(Some(XML_NS), "lang"));
}

fn builtin(grammar: &Grammar, local: &str) -> Option<NodeId> {
    grammar
        .registry()
        .get_canonical(&canonical_qname(Some(XSD_NS), local))
}
