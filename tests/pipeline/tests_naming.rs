#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use rstest::rstest;

use beangen::BuilderConfig;
use beangen::beans::naming::{class_name, const_name, convert_name};

use crate::helpers::pipeline_helpers::{property_names, resolve, resolve_with};
use crate::helpers::schema_fixtures::{purchase_order, repeated_siblings};

#[rstest]
#[case(1, &["foo"])]
#[case(2, &["foo", "foo2"])]
#[case(4, &["foo", "foo2", "foo3", "foo4"])]
fn test_repeated_siblings_get_increasing_suffixes(
    #[case] count: usize,
    #[case] expected: &[&str],
) {
    let model = resolve(&repeated_siblings(count));
    let root = model.root();
    assert_eq!(property_names(root), expected);
    for property in &root.properties {
        assert_eq!(property.schema_name, "foo");
    }
}

#[test]
fn test_property_and_const_names_are_unique_per_bean() {
    let model = resolve(&repeated_siblings(5));
    for bean in model.beans() {
        let names: HashSet<_> = bean.property_names().collect();
        assert_eq!(names.len(), bean.properties.len());
        let consts: HashSet<_> = bean.properties.iter().map(|p| p.const_name.as_str()).collect();
        assert_eq!(consts.len(), bean.properties.len());
    }
}

#[test]
fn test_class_names_are_unique_across_beans() {
    let model = resolve(&purchase_order());
    let names: Vec<_> = model.beans().map(|b| b.name.as_str()).collect();
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
    assert_eq!(names, vec!["Root", "Item"]);
}

#[test]
fn test_flattened_attribute_is_named_after_owner() {
    let model = resolve(&purchase_order());
    let root = model.root();
    assert_eq!(property_names(root), vec!["Item", "address", "address_id"]);
    let item = model.bean_named("Item").unwrap();
    assert_eq!(property_names(item), vec!["id", "name"]);
    assert!(item.property("id").unwrap().is_attribute());
}

#[test]
fn test_package_comes_from_root_or_config() {
    let model = resolve(&purchase_order());
    assert_eq!(model.package(), "root");
    assert_eq!(model.root().full_class_type(model.package()), "root.Root");

    let config = BuilderConfig::new().with_package_name("com.example.po");
    let model = resolve_with(&purchase_order(), config);
    assert_eq!(model.package(), "com.example.po");
}

#[test]
fn test_resolution_is_deterministic() {
    let config = BuilderConfig::new()
        .with_process_comments(true)
        .with_finder("on /Root/Item find Item by name");
    let first = resolve_with(&purchase_order(), config.clone());
    let second = resolve_with(&purchase_order(), config);
    assert_eq!(first, second);
}

#[rstest]
#[case("purchase-order", "purchaseOrder", "PurchaseOrder", "PURCHASE_ORDER")]
#[case("shipTo", "shipTo", "ShipTo", "SHIP_TO")]
#[case("item_list", "item_list", "Item_list", "ITEM_LIST")]
fn test_name_conversions(
    #[case] input: &str,
    #[case] converted: &str,
    #[case] class: &str,
    #[case] constant: &str,
) {
    assert_eq!(convert_name(input), converted);
    assert_eq!(class_name(input), class);
    assert_eq!(const_name(input), constant);
}
