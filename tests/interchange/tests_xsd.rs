#![allow(clippy::unwrap_used)]

use rstest::rstest;

use beangen::interchange::Xsd;
use beangen::{BeanBuilder, BeanModel, BuilderConfig, Cardinality, Grammar, SchemaTreeParser};

use crate::helpers::pipeline_helpers::property_names;

const PURCHASE_ORDER_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:po="http://example.com/po"
            targetNamespace="http://example.com/po"
            elementFormDefault="qualified">
  <xsd:element name="purchaseOrder" type="po:PurchaseOrderType"/>
  <xsd:complexType name="PurchaseOrderType">
    <xsd:sequence>
      <xsd:element name="shipTo" type="po:USAddress"/>
      <xsd:element name="billTo" type="po:USAddress"/>
      <xsd:element name="comment" type="xsd:string" minOccurs="0"/>
      <xsd:element name="items">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="item" minOccurs="0" maxOccurs="unbounded">
              <xsd:complexType>
                <xsd:sequence>
                  <xsd:element name="productName" type="xsd:string"/>
                  <xsd:element name="quantity" type="xsd:positiveInteger"/>
                  <xsd:element name="USPrice" type="xsd:decimal"/>
                </xsd:sequence>
                <xsd:attribute name="partNum" type="xsd:string" use="required"/>
              </xsd:complexType>
            </xsd:element>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
    </xsd:sequence>
    <xsd:attribute name="orderDate" type="xsd:date"/>
  </xsd:complexType>
  <xsd:complexType name="USAddress">
    <xsd:sequence>
      <xsd:element name="name" type="xsd:string"/>
      <xsd:element name="street" type="xsd:string"/>
    </xsd:sequence>
    <xsd:attribute name="country" type="xsd:NMTOKEN" fixed="US"/>
  </xsd:complexType>
</xsd:schema>
"#;

fn read(xsd: Xsd) -> Grammar {
    let mut grammar = xsd.read(PURCHASE_ORDER_XSD.as_bytes()).unwrap();
    grammar.validate().unwrap();
    grammar.optimize();
    grammar
}

fn resolve(grammar: &Grammar) -> BeanModel {
    let parser = SchemaTreeParser::parse(grammar).unwrap();
    BeanBuilder::new(BuilderConfig::default()).resolve(&parser).unwrap()
}

#[test]
fn test_named_types_become_beans() {
    let model = resolve(&read(Xsd::new()));
    let root = model.root();
    assert_eq!(root.name, "PurchaseOrderType");
    assert_eq!(
        property_names(root),
        vec!["orderDate", "shipTo", "billTo", "comment", "items"]
    );

    let ship_to = root.property("shipTo").unwrap();
    assert!(ship_to.is_bean());
    assert_eq!(ship_to.class_type, "USAddress");
    assert_eq!(root.property("billTo").unwrap().class_type, "USAddress");
    assert_eq!(
        root.property("comment").unwrap().cardinality,
        Cardinality::ZeroOrOne
    );

    let address = model.bean_named("USAddress").unwrap();
    let country = address.property("country").unwrap();
    assert!(country.is_attribute());
    assert_eq!(country.default_value.as_deref(), Some("US"));
}

#[test]
fn test_anonymous_types_nest() {
    let model = resolve(&read(Xsd::new()));
    let items = model.bean_named("Items").unwrap();
    let item = items.property("item").unwrap();
    assert_eq!(item.cardinality, Cardinality::ZeroOrMore);
    assert!(item.is_indexed());

    let item = model.bean_named("Item").unwrap();
    assert_eq!(
        property_names(item),
        vec!["partNum", "productName", "quantity", "USPrice"]
    );
    assert_eq!(item.property("quantity").unwrap().class_type, "long");
}

#[rstest]
#[case(true, "java.math.BigDecimal")]
#[case(false, "double")]
fn test_decimal_mapping_follows_reader_setting(#[case] big: bool, #[case] expected: &str) {
    let model = resolve(&read(Xsd::new().with_big_data_types(big)));
    let item = model.bean_named("Item").unwrap();
    assert_eq!(item.property("USPrice").unwrap().class_type, expected);
}

#[test]
fn test_written_schema_resolves_the_same() {
    let grammar = read(Xsd::new());
    let written = Xsd::new().write(&grammar).unwrap();
    let reread = Xsd::new().read(&written).unwrap();

    let first = resolve(&grammar);
    let second = resolve(&reread);
    let summary = |model: &BeanModel| -> Vec<(String, Vec<String>)> {
        model
            .beans()
            .map(|b| {
                let names = b.property_names().map(str::to_string).collect();
                (b.name.clone(), names)
            })
            .collect()
    };
    assert_eq!(summary(&first), summary(&second));
}
