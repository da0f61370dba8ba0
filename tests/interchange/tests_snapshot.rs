#![allow(clippy::unwrap_used)]

use rstest::rstest;
use tempfile::TempDir;

use beangen::BuilderConfig;
use beangen::beans::BeanGraph;
use beangen::interchange::{detect_format, read_bean_graph, write_bean_graph};

use crate::helpers::pipeline_helpers::{resolve, resolve_with};
use crate::helpers::schema_fixtures::purchase_order;

#[rstest]
#[case("graph.json")]
#[case("graph.yaml")]
#[case("graph.yml")]
fn test_snapshot_survives_a_file_round_trip(#[case] file_name: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);

    let snapshot = resolve(&purchase_order()).bean_graph();
    write_bean_graph(&path, &snapshot).unwrap();
    let loaded = read_bean_graph(&path).unwrap();
    assert_eq!(loaded, snapshot);
}

#[test]
fn test_loaded_snapshot_suppresses_generated_bean() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("common.json");
    let snapshot = resolve(&purchase_order()).bean_graph();
    write_bean_graph(&path, &snapshot).unwrap();

    let loaded = read_bean_graph(&path).unwrap();
    let mut only_item = BeanGraph::new();
    only_item.push(loaded.find("Item").unwrap().clone());

    let config = BuilderConfig::new().with_bean_graph(only_item);
    let model = resolve_with(&purchase_order(), config);
    assert!(model.bean_named("Item").is_none());
    let property = model.root().property("Item").unwrap();
    assert_eq!(property.class_type, "root.Item");
    assert!(!property.is_bean());
}

#[test]
fn test_unknown_extension_has_no_format() {
    assert!(detect_format("graph.txt".as_ref()).is_none());
    assert!(detect_format("graph.JSON".as_ref()).is_some());
}
