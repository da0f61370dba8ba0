#![allow(clippy::unwrap_used)]

use rstest::rstest;

use beangen::beans::FinderExpr;
use beangen::config::{MetaDd, MetaElement};
use beangen::{BeanBuilder, BuilderConfig, SchemaError, SchemaTreeParser};

use crate::helpers::pipeline_helpers::resolve_with;
use crate::helpers::schema_fixtures::purchase_order;

#[test]
fn test_finder_round_trip_through_grammar() {
    let config = BuilderConfig::new().with_finder("on /Root/Item find Item by name");
    let model = resolve_with(&purchase_order(), config);

    let finder = &model.root().finders[0];
    assert!(!finder.degraded);
    assert_eq!(finder.expr.on, "/Root/Item");
    let selector = model.property(finder.selector.as_ref().unwrap()).unwrap();
    assert_eq!(selector.name, "Item");
    let field = model.property(finder.field.as_ref().unwrap()).unwrap();
    assert_eq!(field.name, "name");
}

#[rstest]
#[case("on / findall Item by @id", "id")]
#[case("on /Root find address by id", "address_id")]
fn test_finder_field_resolves_attributes(#[case] expr: &str, #[case] expected: &str) {
    let config = BuilderConfig::new().with_finder(expr);
    let model = resolve_with(&purchase_order(), config);
    let finder = &model.root().finders[0];
    let field = model.property(finder.field.as_ref().unwrap()).unwrap();
    assert_eq!(field.name, expected);
}

#[test]
fn test_meta_finders_follow_config_finders() {
    let meta: MetaDd = [MetaElement::new("Item").with_finder("on /Root find address by id")]
        .into_iter()
        .collect();
    let config = BuilderConfig::new()
        .with_finder("on /Root/Item find Item by name")
        .with_meta(meta);
    let model = resolve_with(&purchase_order(), config);
    let finders = &model.root().finders;
    assert_eq!(finders.len(), 2);
    assert_eq!(finders[0].expr.by, "name");
    assert_eq!(finders[1].expr.by, "id");
}

#[test]
fn test_missing_selector_degrades_instead_of_failing() {
    let config = BuilderConfig::new().with_finder("on /Root find Missing by name");
    let model = resolve_with(&purchase_order(), config);
    let finder = &model.root().finders[0];
    assert!(finder.degraded);
    assert!(finder.selector.is_none());
}

#[test]
fn test_unresolvable_on_path_fails_resolution() {
    let parser = SchemaTreeParser::parse(&purchase_order()).unwrap();
    let config = BuilderConfig::new().with_finder("on /Root/Nowhere find Item by name");
    let err = BeanBuilder::new(config).resolve(&parser).unwrap_err();
    assert!(matches!(err, SchemaError::UnresolvableFinder(_)));
}

#[rstest]
#[case("on /Root find Item")]
#[case("find Item by name")]
#[case("on /Root find Item by name extra")]
fn test_malformed_finders_are_rejected(#[case] expr: &str) {
    assert!(FinderExpr::parse(expr).is_err());
}
