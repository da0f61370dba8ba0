//! Grammars built through the stack-driven builder, the way a schema
//! reader drives it.

#![allow(clippy::unwrap_used)]

use beangen::grammar::{
    AttributeDecl, AttributeUse, ComplexTypeDecl, Construct, ElementDecl, Grammar,
    GrammarBuilder, MaxOccurs, Occurs, SchemaDecl,
};

pub fn complex() -> Construct {
    Construct::ComplexType(ComplexTypeDecl::default())
}

pub fn seq() -> Construct {
    Construct::Sequence(Occurs::ONE)
}

/// Add a typed element without entering it.
pub fn leaf(b: &mut GrammarBuilder, name: &str, type_name: &str) {
    b.add_leaf(Construct::Element(ElementDecl::typed(name, type_name)))
        .unwrap();
}

/// Open `<schema><element name=root><complexType><sequence>`.
pub fn open_root(b: &mut GrammarBuilder, root: &str) {
    b.push(Construct::Schema(SchemaDecl::default())).unwrap();
    b.start_element(root).unwrap();
    b.push(complex()).unwrap();
    b.push(seq()).unwrap();
}

/// Pop every open construct and hand back the grammar.
pub fn close_all(mut b: GrammarBuilder) -> Grammar {
    while b.depth() > 0 {
        b.pop().unwrap();
    }
    b.finish().unwrap()
}

/// Root { Item* { name, @id required int }, address(@id) }
pub fn purchase_order() -> Grammar {
    let mut b = GrammarBuilder::default();
    open_root(&mut b, "Root");

    b.start_element("Item").unwrap();
    b.set_min_occurs(0).unwrap();
    b.set_max_occurs(MaxOccurs::Unbounded).unwrap();
    b.push(complex()).unwrap();
    b.push(seq()).unwrap();
    leaf(&mut b, "name", "xsd:string");
    b.pop().unwrap();
    b.add_leaf(Construct::Attribute(AttributeDecl {
        type_name: Some("xsd:int".into()),
        use_: AttributeUse::Required,
        ..AttributeDecl::named("id")
    }))
    .unwrap();
    b.pop().unwrap();
    b.pop().unwrap();

    b.start_element("address").unwrap();
    b.push(complex()).unwrap();
    b.push(Construct::SimpleContent).unwrap();
    b.push(Construct::Extension {
        base: Some("xsd:string".into()),
    })
    .unwrap();
    b.add_leaf(Construct::Attribute(AttributeDecl::named("id")))
        .unwrap();
    close_all(b)
}

/// Root with `count` sibling elements all called `foo`.
pub fn repeated_siblings(count: usize) -> Grammar {
    let mut b = GrammarBuilder::default();
    open_root(&mut b, "Root");
    for _ in 0..count {
        leaf(&mut b, "foo", "xsd:string");
    }
    close_all(b)
}

/// Root { choice { count:int, ratio:double }, size:long nillable, plain:int }
pub fn promotion_candidates() -> Grammar {
    let mut b = GrammarBuilder::default();
    open_root(&mut b, "Root");
    b.push(Construct::Choice(Occurs::ONE)).unwrap();
    leaf(&mut b, "count", "xsd:int");
    leaf(&mut b, "ratio", "xsd:double");
    b.pop().unwrap();
    b.add_leaf(Construct::Element(ElementDecl {
        nillable: true,
        ..ElementDecl::typed("size", "xsd:long")
    }))
    .unwrap();
    leaf(&mut b, "plain", "xsd:int");
    close_all(b)
}

/// Root { sequence{0..*} { sequence { value } } }
pub fn repeated_group() -> Grammar {
    let mut b = GrammarBuilder::default();
    open_root(&mut b, "Root");
    b.push(Construct::Sequence(Occurs::new(0, MaxOccurs::Unbounded)))
        .unwrap();
    b.push(seq()).unwrap();
    leaf(&mut b, "value", "xsd:string");
    close_all(b)
}
