#![allow(clippy::unwrap_used)]

use rstest::rstest;

use beangen::beans::is_primitive;
use beangen::{BuilderConfig, Cardinality};

use crate::helpers::pipeline_helpers::{property_names, resolve, resolve_with};
use crate::helpers::schema_fixtures::{promotion_candidates, purchase_order, repeated_group};

#[rstest]
#[case("count", "java.lang.Integer", true)]
#[case("ratio", "java.lang.Double", true)]
#[case("size", "java.lang.Long", false)]
#[case("plain", "int", false)]
fn test_ored_and_nillable_primitives_are_promoted(
    #[case] name: &str,
    #[case] class_type: &str,
    #[case] ored: bool,
) {
    let model = resolve(&promotion_candidates());
    let property = model.root().property(name).unwrap();
    assert_eq!(property.class_type, class_type);
    assert_eq!(property.ored, ored);
}

#[test]
fn test_no_ored_or_nillable_property_stays_primitive() {
    let model = resolve(&promotion_candidates());
    for bean in model.beans() {
        for property in &bean.properties {
            if property.ored || property.nillable {
                assert!(
                    !is_primitive(&property.class_type),
                    "{} kept primitive type {}",
                    property.name,
                    property.class_type
                );
            }
        }
    }
}

#[test]
fn test_repeated_group_widens_nested_element() {
    let model = resolve(&repeated_group());
    let property = model.root().property("value").unwrap();
    assert_eq!(property.element_instance, Cardinality::One);
    assert_eq!(property.cardinality, Cardinality::ZeroOrMore);
    assert!(property.is_indexed());
    assert!(property.nested_level >= 2);
}

#[test]
fn test_element_occurrence_is_kept() {
    let model = resolve(&purchase_order());
    let root = model.root();
    let item = root.property("Item").unwrap();
    assert_eq!(item.cardinality, Cardinality::ZeroOrMore);
    assert!(item.is_bean());
    assert_eq!(root.property("address").unwrap().cardinality, Cardinality::One);
}

#[test]
fn test_flattened_attribute_takes_widest_cardinality() {
    let model = resolve(&purchase_order());
    let flattened = model.root().property("address_id").unwrap();
    assert_eq!(flattened.cardinality, Cardinality::ZeroOrOne);
}

#[test]
fn test_flattening_disabled_keeps_only_elements() {
    let config = BuilderConfig::new().with_attributes_as_properties(false);
    let model = resolve_with(&purchase_order(), config);
    assert_eq!(property_names(model.root()), vec!["Item", "address"]);
    let item = model.bean_named("Item").unwrap();
    assert_eq!(property_names(item), vec!["name"]);
}

#[rstest]
#[case(true, "java.math.BigDecimal")]
#[case(false, "double")]
fn test_big_data_types_switch_decimal_mapping(#[case] big: bool, #[case] expected: &str) {
    use beangen::grammar::{Grammar, GrammarBuilder};

    use crate::helpers::schema_fixtures::{close_all, leaf, open_root};

    let mut b = GrammarBuilder::new(Grammar::with_big_data_types(big));
    open_root(&mut b, "Root");
    leaf(&mut b, "amount", "xsd:decimal");
    let model = resolve(&close_all(b));
    assert_eq!(model.root().property("amount").unwrap().class_type, expected);
}
