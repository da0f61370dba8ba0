//! Stack-driven grammar construction.
//!
//! The upstream reader visits its input depth-first. Each start tag pushes
//! a construct, each end tag pops it:
//!
//! ```text
//! <schema>            push(Schema)          stack: [schema]
//!   <element a>       push(Element a)       stack: [schema, a]
//!     <complexType>   push(ComplexType)     stack: [schema, a, ct]
//!     </complexType>  pop()                 stack: [schema, a]
//!   </element>        pop()                 stack: [schema]
//! </schema>           pop()                 stack: []
//! ```
//!
//! The first construct pushed onto an empty stack becomes the root.

use smol_str::SmolStr;
use tracing::trace;

use super::construct::{Construct, ElementDecl, MaxOccurs};
use super::kind::NodeKind;
use super::tree::{Grammar, NodeId};
use crate::error::{Result, SchemaError};

#[derive(Debug, Default)]
pub struct GrammarBuilder {
    grammar: Grammar,
    stack: Vec<NodeId>,
}

impl GrammarBuilder {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            stack: Vec::new(),
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn grammar_mut(&mut self) -> &mut Grammar {
        &mut self.grammar
    }

    /// The construct on top of the stack.
    pub fn current(&self) -> Result<NodeId> {
        self.stack.last().copied().ok_or(SchemaError::EmptyStack)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Add `construct` under the current construct (or make it the root)
    /// and make it current.
    pub fn push(&mut self, construct: Construct) -> Result<NodeId> {
        let id = self.insert(construct)?;
        self.stack.push(id);
        Ok(id)
    }

    /// Leave the current construct.
    pub fn pop(&mut self) -> Result<NodeId> {
        self.stack.pop().ok_or(SchemaError::EmptyStack)
    }

    /// Add `construct` under the current construct without entering it.
    pub fn add_leaf(&mut self, construct: Construct) -> Result<NodeId> {
        if self.stack.is_empty() {
            return Err(SchemaError::EmptyStack);
        }
        self.insert(construct)
    }

    /// Push a named element, qualifying it when the context requires.
    pub fn start_element(&mut self, name: impl Into<SmolStr>) -> Result<NodeId> {
        self.push(Construct::Element(ElementDecl::named(name)))
    }

    fn insert(&mut self, mut construct: Construct) -> Result<NodeId> {
        let parent = self.stack.last().copied();
        if let (Some(parent), Construct::Element(decl)) = (parent, &mut construct) {
            if decl.namespace.is_none() && decl.reference.is_none() {
                decl.namespace = self.grammar.element_namespace_for(parent);
            }
        }
        let kind = construct.kind();
        let id = self.grammar.alloc(construct)?;
        match parent {
            Some(parent) => self.grammar.add_child(parent, id),
            None => self.grammar.set_root(id),
        }
        trace!(%kind, path = self.grammar.full_content_path(id), "inserted");
        Ok(id)
    }

    // ========================================================================
    // CURRENT-CONSTRUCT SETTERS
    // ========================================================================

    pub fn set_min_occurs(&mut self, min: u32) -> Result<()> {
        let id = self.current()?;
        let construct = self.grammar.construct_mut(id);
        let kind = construct.kind();
        let occurs = construct
            .occurs_mut()
            .ok_or_else(|| SchemaError::wrong_construct("set minOccurs", kind.as_str()))?;
        occurs.min = min;
        Ok(())
    }

    pub fn set_max_occurs(&mut self, max: MaxOccurs) -> Result<()> {
        let id = self.current()?;
        let construct = self.grammar.construct_mut(id);
        let kind = construct.kind();
        let occurs = construct
            .occurs_mut()
            .ok_or_else(|| SchemaError::wrong_construct("set maxOccurs", kind.as_str()))?;
        occurs.max = max;
        Ok(())
    }

    /// Set the declared type of the current element or attribute.
    pub fn set_type(&mut self, type_name: impl Into<SmolStr>) -> Result<()> {
        let id = self.current()?;
        match self.grammar.construct_mut(id) {
            Construct::Element(decl) => decl.type_name = Some(type_name.into()),
            Construct::Attribute(decl) => decl.type_name = Some(type_name.into()),
            other => return Err(SchemaError::wrong_construct("set type", other.kind().as_str())),
        }
        Ok(())
    }

    /// Attach an `appinfo` holding `text` to the current annotation.
    pub fn add_app_info(&mut self, text: impl Into<String>) -> Result<NodeId> {
        self.add_annotation_text(Construct::AppInfo, text.into())
    }

    /// Attach a `documentation` holding `text` to the current annotation.
    pub fn add_documentation(&mut self, text: impl Into<String>) -> Result<NodeId> {
        self.add_annotation_text(Construct::Documentation, text.into())
    }

    fn add_annotation_text(&mut self, wrapper: Construct, text: String) -> Result<NodeId> {
        let current = self.current()?;
        let kind = self.grammar.kind(current);
        if kind != NodeKind::Annotation {
            return Err(SchemaError::wrong_construct("attach annotation text", kind.as_str()));
        }
        let id = self.push(wrapper)?;
        self.add_leaf(Construct::Text(text))?;
        self.pop()?;
        Ok(id)
    }

    /// Hand back the finished grammar. Every pushed construct must have
    /// been popped.
    pub fn finish(self) -> Result<Grammar> {
        if let Some(open) = self.stack.last() {
            return Err(SchemaError::wrong_construct(
                "finish with an unclosed construct",
                self.grammar.kind(*open).as_str(),
            ));
        }
        if self.grammar.root().is_none() {
            return Err(SchemaError::MissingRoot);
        }
        Ok(self.grammar)
    }
}
