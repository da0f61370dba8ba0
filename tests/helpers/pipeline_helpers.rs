//! Run a grammar through lowering and bean resolution.

#![allow(clippy::unwrap_used)]

use beangen::{BeanBuilder, BeanElement, BeanModel, BuilderConfig, Grammar, SchemaTreeParser};

/// Resolve `grammar` with the default configuration.
pub fn resolve(grammar: &Grammar) -> BeanModel {
    resolve_with(grammar, BuilderConfig::default())
}

/// Resolve `grammar` with `config`.
pub fn resolve_with(grammar: &Grammar, config: BuilderConfig) -> BeanModel {
    let parser = SchemaTreeParser::parse(grammar).unwrap();
    BeanBuilder::new(config).resolve(&parser).unwrap()
}

pub fn property_names(bean: &BeanElement) -> Vec<&str> {
    bean.property_names().collect()
}
