#![allow(clippy::unwrap_used)]

use beangen::grammar::{Construct, Grammar, GrammarBuilder, NodeKind, Occurs};
use beangen::{SchemaError, SchemaTreeParser};

use crate::helpers::pipeline_helpers::{property_names, resolve};
use crate::helpers::schema_fixtures::{close_all, leaf, open_root, purchase_order, repeated_siblings};

fn content_paths(grammar: &Grammar) -> Vec<String> {
    let root = grammar.root().unwrap();
    grammar
        .descendants(root)
        .into_iter()
        .map(|id| format!("{} {}", grammar.kind(id), grammar.full_content_path(id)))
        .collect()
}

/// Root { name, sequence {}, annotation {} }
fn with_empty_groups() -> Grammar {
    let mut b = GrammarBuilder::default();
    open_root(&mut b, "Root");
    leaf(&mut b, "name", "xsd:string");
    b.push(Construct::Sequence(Occurs::ONE)).unwrap();
    b.pop().unwrap();
    b.push(Construct::Annotation).unwrap();
    close_all(b)
}

#[test]
fn test_fixtures_validate() {
    purchase_order().validate().unwrap();
    repeated_siblings(3).validate().unwrap();
}

#[test]
fn test_repeated_names_get_unique_paths() {
    let grammar = repeated_siblings(3);
    let root = grammar.root().unwrap();
    let foos = grammar.find_all_named(root, "foo");
    let paths: Vec<_> = foos.iter().map(|id| grammar.full_content_path(*id)).collect();
    assert_eq!(
        paths,
        vec!["/Root/foo", "/Root/foo/#", "/Root/foo/#/#"]
    );
}

#[test]
fn test_optimize_removes_empty_groups() {
    let mut grammar = with_empty_groups();
    let root = grammar.root().unwrap();
    let before = grammar.find_all(root, NodeKind::Sequence).len();
    grammar.optimize();
    assert_eq!(grammar.find_all(root, NodeKind::Sequence).len(), before - 1);
    assert!(grammar.find_all(root, NodeKind::Annotation).is_empty());
}

#[test]
fn test_optimize_is_idempotent() {
    let mut grammar = with_empty_groups();
    grammar.optimize();
    let once = content_paths(&grammar);
    grammar.optimize();
    assert_eq!(content_paths(&grammar), once);
}

#[test]
fn test_optimize_keeps_resolved_properties() {
    let plain = resolve(&purchase_order());
    let mut optimized = purchase_order();
    optimized.optimize();
    let optimized = resolve(&optimized);
    for (a, b) in plain.beans().zip(optimized.beans()) {
        assert_eq!(a.name, b.name);
        assert_eq!(property_names(a), property_names(b));
    }
}

#[test]
fn test_invalid_child_is_reported_with_path() {
    let mut b = GrammarBuilder::default();
    open_root(&mut b, "Root");
    b.add_leaf(Construct::Schema(Default::default())).unwrap();
    let grammar = close_all(b);
    let err = grammar.validate().unwrap_err();
    match err {
        SchemaError::InvalidContents { parent, child, path } => {
            assert_eq!(parent, "sequence");
            assert_eq!(child, "schema");
            assert!(path.starts_with("/Root"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_schema_without_elements_has_no_root() {
    let mut b = GrammarBuilder::default();
    b.push(Construct::Schema(Default::default())).unwrap();
    let grammar = close_all(b);
    let err = SchemaTreeParser::parse(&grammar).unwrap_err();
    assert!(matches!(err, SchemaError::MissingRoot));
}
