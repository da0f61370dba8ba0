//! Error types for grammar construction and bean resolution.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while building the grammar model or resolving beans.
///
/// Every fatal variant carries the qualified name or full content path of
/// the offending construct so the caller can point at it.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A child construct is not allowed inside its parent.
    #[error("invalid contents: {parent} may not contain {child} (at {path})")]
    InvalidContents {
        parent: String,
        child: String,
        path: String,
    },

    /// A facet carries a value outside its allowed set.
    #[error("invalid {facet} value '{value}' (at {path})")]
    InvalidFacetValue {
        facet: &'static str,
        value: String,
        path: String,
    },

    /// A namespace prefix has no URI bound to it.
    #[error("namespace prefix '{prefix}' is not declared (while resolving {name})")]
    UnknownPrefix { prefix: String, name: String },

    /// A `ref`, `type`, or `base` names something that is not defined.
    #[error("unresolved {kind} reference '{name}' from {context}")]
    UnresolvedReference {
        kind: &'static str,
        name: String,
        context: String,
    },

    /// The stack-driven builder was asked to do something the current
    /// construct does not support.
    #[error("cannot {operation} on {kind}")]
    WrongConstruct {
        operation: &'static str,
        kind: String,
    },

    /// The builder stack was empty when a construct was expected.
    #[error("no current construct on the builder stack")]
    EmptyStack,

    /// No root node was available to resolve against.
    #[error("content graph has no root node")]
    MissingRoot,

    /// A finder expression contained a token outside its grammar.
    #[error("bad token '{token}' in finder expression '{expr}'")]
    BadFinderToken { token: String, expr: String },

    /// A finder keyword was not followed by its operand.
    #[error("finder keyword '{keyword}' is missing its value in '{expr}'")]
    MissingFinderValue { keyword: &'static str, expr: String },

    /// A finder expression has no `on` clause.
    #[error("missing 'on' expression in finder '{0}'")]
    MissingOnExpression(String),

    /// The `on` path of a finder does not lead anywhere.
    #[error("unable to find the expression from finder '{0}'")]
    UnresolvableFinder(String),

    /// Uniquifying suffixes ran out for a name.
    #[error("could not find a free name for '{0}'")]
    NamingExhausted(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON or YAML (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    /// Create an invalid-contents error for a child kind under a parent kind.
    pub fn invalid_contents(
        parent: impl Into<String>,
        child: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::InvalidContents {
            parent: parent.into(),
            child: child.into(),
            path: path.into(),
        }
    }

    /// Create an unresolved type reference error.
    pub fn unresolved_type(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind: "type",
            name: name.into(),
            context: context.into(),
        }
    }

    /// Create an unresolved `ref` error.
    pub fn unresolved_ref(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind: "ref",
            name: name.into(),
            context: context.into(),
        }
    }

    /// Create an unresolved extension/restriction base error.
    pub fn unresolved_base(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind: "base",
            name: name.into(),
            context: context.into(),
        }
    }

    /// Create an unknown-prefix error.
    pub fn unknown_prefix(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownPrefix {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// Create a wrong-construct error for the builder.
    pub fn wrong_construct(operation: &'static str, kind: impl Into<String>) -> Self {
        Self::WrongConstruct {
            operation,
            kind: kind.into(),
        }
    }

    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}
