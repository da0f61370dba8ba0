#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::SchemaError;

fn schema_with_sequence() -> (GrammarBuilder, NodeId) {
    let mut b = GrammarBuilder::default();
    b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    b.start_element("Root").unwrap();
    b.push(Construct::ComplexType(ComplexTypeDecl::default())).unwrap();
    let seq = b.push(Construct::Sequence(Occurs::ONE)).unwrap();
    (b, seq)
}

#[test]
fn test_duplicate_sibling_gets_unique_suffix() {
    let (mut b, _) = schema_with_sequence();
    let first = b.start_element("foo").unwrap();
    b.pop().unwrap();
    let second = b.start_element("foo").unwrap();
    b.pop().unwrap();
    let third = b.start_element("foo").unwrap();
    b.pop().unwrap();

    let g = b.grammar();
    assert_eq!(g.full_content_path(first), "/Root/foo");
    assert_eq!(g.full_content_path(second), "/Root/foo/#");
    assert_eq!(g.full_content_path(third), "/Root/foo/#/#");
}

#[test]
fn test_children_of_uniquified_element_inherit_suffix() {
    let (mut b, _) = schema_with_sequence();
    b.start_element("foo").unwrap();
    b.pop().unwrap();
    b.start_element("foo").unwrap();
    b.push(Construct::ComplexType(ComplexTypeDecl::default())).unwrap();
    b.push(Construct::Sequence(Occurs::ONE)).unwrap();
    let bar = b.start_element("bar").unwrap();
    assert_eq!(b.grammar().full_content_path(bar), "/Root/foo/#/bar");
}

#[test]
fn test_nameless_root_path_is_slash() {
    let mut b = GrammarBuilder::default();
    let schema = b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    let top = b.start_element("top").unwrap();
    assert_eq!(b.grammar().full_content_path(schema), "/");
    assert_eq!(b.grammar().full_content_path(top), "/top");
}

#[test]
fn test_attribute_content_name_has_at_sign() {
    let mut b = GrammarBuilder::default();
    b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    b.start_element("item").unwrap();
    b.push(Construct::ComplexType(ComplexTypeDecl::default())).unwrap();
    let attr = b
        .add_leaf(Construct::Attribute(AttributeDecl::named("id")))
        .unwrap();
    assert_eq!(b.grammar().full_content_path(attr), "/item/@id");
}

#[test]
fn test_validate_rejects_attribute_in_sequence() {
    let (mut b, seq) = schema_with_sequence();
    let bad = b
        .add_leaf(Construct::Attribute(AttributeDecl::named("oops")))
        .unwrap();
    let g = b.grammar();
    assert_eq!(g.parent(bad), Some(seq));
    match g.validate().unwrap_err() {
        SchemaError::InvalidContents { parent, child, path } => {
            assert_eq!(parent, "sequence");
            assert_eq!(child, "attribute");
            assert_eq!(path, "/Root/@oops");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validate_accepts_well_formed_tree() {
    let (mut b, _) = schema_with_sequence();
    b.start_element("child").unwrap();
    b.set_type("xsd:string").unwrap();
    b.pop().unwrap();
    assert!(b.grammar().validate().is_ok());
}

#[test]
fn test_validate_checks_white_space_values() {
    let mut b = GrammarBuilder::default();
    b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    b.push(Construct::SimpleType(SimpleTypeDecl {
        name: Some("Code".into()),
        java_type: None,
    }))
    .unwrap();
    b.push(Construct::Restriction {
        base: Some("xsd:string".into()),
    })
    .unwrap();
    b.add_leaf(Construct::Facet {
        kind: FacetKind::WhiteSpace,
        value: "squash".into(),
    })
    .unwrap();
    let err = b.grammar().validate().unwrap_err();
    assert!(matches!(err, SchemaError::InvalidFacetValue { .. }));
}

#[test]
fn test_optimize_removes_empty_groups_and_is_idempotent() {
    let (mut b, seq) = schema_with_sequence();
    b.push(Construct::Choice(Occurs::ONE)).unwrap();
    b.push(Construct::Sequence(Occurs::ONE)).unwrap();
    b.pop().unwrap();
    b.pop().unwrap();
    b.start_element("kept").unwrap();
    b.pop().unwrap();
    let mut g = b.grammar().clone();

    g.optimize();
    let once: Vec<_> = g.children(seq).to_vec();
    assert_eq!(once.len(), 1);
    assert_eq!(g.kind(once[0]), NodeKind::Element);

    g.optimize();
    assert_eq!(g.children(seq), once.as_slice());
}

#[test]
fn test_optimize_keeps_group_ref_and_single_child_group() {
    let (mut b, seq) = schema_with_sequence();
    b.add_leaf(Construct::Group(GroupDecl {
        reference: Some("Shared".into()),
        ..GroupDecl::default()
    }))
    .unwrap();
    let inner = b.push(Construct::Choice(Occurs::ONE)).unwrap();
    b.start_element("only").unwrap();
    let mut g = b.grammar().clone();
    g.optimize();
    assert_eq!(g.children(seq).len(), 2);
    assert_eq!(g.kind(g.children(inner)[0]), NodeKind::Element);
}

#[test]
fn test_optimize_drops_empty_text_and_annotation() {
    let mut b = GrammarBuilder::default();
    let schema = b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    b.push(Construct::Annotation).unwrap();
    b.push(Construct::Documentation).unwrap();
    b.add_leaf(Construct::Text(String::new())).unwrap();
    let mut g = b.grammar().clone();
    g.optimize();
    let annotation = g.children(schema)[0];
    let doc = g.children(annotation)[0];
    assert!(g.children(doc).is_empty());
}

#[test]
fn test_builder_setters_require_matching_construct() {
    let (mut b, _) = schema_with_sequence();
    b.set_max_occurs(MaxOccurs::Unbounded).unwrap();
    b.push(Construct::Annotation).unwrap();
    let err = b.set_min_occurs(0).unwrap_err();
    assert!(matches!(err, SchemaError::WrongConstruct { .. }));
    let err = b.set_type("xsd:int").unwrap_err();
    assert!(matches!(err, SchemaError::WrongConstruct { .. }));
    b.add_app_info("hint").unwrap();
}

#[test]
fn test_builder_finish_requires_balanced_stack() {
    let (b, _) = schema_with_sequence();
    assert!(b.finish().is_err());

    let mut b = GrammarBuilder::default();
    b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    b.pop().unwrap();
    assert!(b.pop().is_err());
    assert!(b.finish().is_ok());
}

#[test]
fn test_named_types_register_under_target_namespace() {
    let mut b = GrammarBuilder::default();
    b.push(Construct::Schema(SchemaDecl {
        target_namespace: Some("http://example.com/po".into()),
        ..SchemaDecl::default()
    }))
    .unwrap();
    let ct = b
        .push(Construct::ComplexType(ComplexTypeDecl {
            name: Some("Address".into()),
            ..ComplexTypeDecl::default()
        }))
        .unwrap();
    let g = b.grammar();
    assert_eq!(g.content_name(ct).as_deref(), Some("po:Address"));
    assert_eq!(g.lookup_type("Address").unwrap(), Some(ct));
    assert_eq!(g.lookup_type("po:Address").unwrap(), Some(ct));
}

#[test]
fn test_simple_type_keeps_richer_definition() {
    let mut g = Grammar::new();
    let rich = g
        .alloc(Construct::SimpleType(SimpleTypeDecl {
            name: Some("Code".into()),
            java_type: Some("int".into()),
        }))
        .unwrap();
    g.alloc(Construct::SimpleType(SimpleTypeDecl {
        name: Some("Code".into()),
        java_type: None,
    }))
    .unwrap();
    assert_eq!(g.lookup_type("Code").unwrap(), Some(rich));
}

#[test]
fn test_resolve_ref_finds_top_level_element_or_fails() {
    let mut b = GrammarBuilder::default();
    b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    let shared = b.start_element("shared").unwrap();
    b.pop().unwrap();
    b.start_element("Root").unwrap();
    b.push(Construct::ComplexType(ComplexTypeDecl::default())).unwrap();
    b.push(Construct::Sequence(Occurs::ONE)).unwrap();
    let good = b
        .add_leaf(Construct::Element(ElementDecl::reference("shared")))
        .unwrap();
    let bad = b
        .add_leaf(Construct::Element(ElementDecl::reference("missing")))
        .unwrap();
    let g = b.grammar();
    assert_eq!(g.resolve_ref(good).unwrap(), Some(shared));
    assert!(matches!(
        g.resolve_ref(bad).unwrap_err(),
        SchemaError::UnresolvedReference { kind: "ref", .. }
    ));
}

#[test]
fn test_host_type_name_follows_restriction_base() {
    let mut b = GrammarBuilder::default();
    b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    let st = b
        .push(Construct::SimpleType(SimpleTypeDecl {
            name: Some("Qty".into()),
            java_type: None,
        }))
        .unwrap();
    b.add_leaf(Construct::Restriction {
        base: Some("xsd:positiveInteger".into()),
    })
    .unwrap();
    assert_eq!(b.grammar().host_type_name(st).as_deref(), Some("long"));
}

#[test]
fn test_find_queries() {
    let (mut b, seq) = schema_with_sequence();
    b.start_element("a").unwrap();
    b.pop().unwrap();
    b.start_element("b").unwrap();
    b.pop().unwrap();
    let g = b.grammar();
    let root = g.root().unwrap();
    let found = g
        .find_path(root, &[NodeKind::Element, NodeKind::ComplexType, NodeKind::Sequence])
        .unwrap();
    assert_eq!(found, seq);
    assert_eq!(g.find_all(root, NodeKind::Element).len(), 3);
    assert_eq!(g.find_all_named(root, "b").len(), 1);
}
