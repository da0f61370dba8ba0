//! Finder expressions: `on <path> find|findall <name> by <path>`.
//!
//! Clauses may appear in any order. Paths are `/`-separated slot names;
//! an `on` path may start with `/RootName`.

use logos::Logos;

use crate::error::{Result, SchemaError};
use crate::graph::GraphNodeId;

/// A lexed finder token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    On,
    Find,
    FindAll,
    By,
    Word,
    Error,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let kind = match logos_token {
            Ok(LogosToken::On) => TokenKind::On,
            Ok(LogosToken::Find) => TokenKind::Find,
            Ok(LogosToken::FindAll) => TokenKind::FindAll,
            Ok(LogosToken::By) => TokenKind::By,
            Ok(LogosToken::Word) => TokenKind::Word,
            Err(()) => TokenKind::Error,
        };
        Some(Token { kind, text })
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum LogosToken {
    #[token("on")]
    On,

    #[token("find")]
    Find,

    #[token("findall")]
    FindAll,

    #[token("by")]
    By,

    #[regex(r"[A-Za-z0-9_@/.#:\-]+")]
    Word,
}

// ============================================================================
// EXPRESSION
// ============================================================================

/// A parsed finder expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinderExpr {
    pub on: String,
    pub find: String,
    /// `findall` returns every match instead of the first.
    pub find_all: bool,
    pub by: String,
    pub source: String,
}

impl FinderExpr {
    pub fn parse(expr: &str) -> Result<Self> {
        let mut on = None;
        let mut find = None;
        let mut find_all = false;
        let mut by = None;

        let mut tokens = Lexer::new(expr);
        while let Some(token) = tokens.next() {
            let (slot, keyword) = match token.kind {
                TokenKind::On => (&mut on, "on"),
                TokenKind::Find => (&mut find, "find"),
                TokenKind::FindAll => {
                    find_all = true;
                    (&mut find, "findall")
                }
                TokenKind::By => (&mut by, "by"),
                TokenKind::Word | TokenKind::Error => {
                    return Err(SchemaError::BadFinderToken {
                        token: token.text.to_string(),
                        expr: expr.to_string(),
                    });
                }
            };
            match tokens.next() {
                Some(Token {
                    kind: TokenKind::Word,
                    text,
                }) => *slot = Some(text.to_string()),
                _ => {
                    return Err(SchemaError::MissingFinderValue {
                        keyword,
                        expr: expr.to_string(),
                    });
                }
            }
        }

        let on = on.ok_or_else(|| SchemaError::MissingOnExpression(expr.to_string()))?;
        let find = find.ok_or_else(|| SchemaError::MissingFinderValue {
            keyword: "find",
            expr: expr.to_string(),
        })?;
        let by = by.ok_or_else(|| SchemaError::MissingFinderValue {
            keyword: "by",
            expr: expr.to_string(),
        })?;
        Ok(Self {
            on,
            find,
            find_all,
            by,
            source: expr.to_string(),
        })
    }

    /// The `on` path relative to the root record: a leading `/RootName`
    /// and any leading `/` are dropped.
    pub fn relative_on<'e>(&'e self, root_name: &str) -> &'e str {
        let path = self.on.as_str();
        let path = match path.strip_prefix('/').and_then(|p| p.strip_prefix(root_name)) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        };
        path.trim_start_matches('/')
    }
}

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// A property located in a bean's property list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRef {
    pub bean: GraphNodeId,
    pub index: usize,
    pub name: String,
}

/// A finder attached to a bean.
///
/// When the selector or field could not be resolved to a property the
/// finder is kept with `degraded` set, so an emitter can fall back to a
/// string-keyed lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFinder {
    pub expr: FinderExpr,
    pub selector: Option<PropertyRef>,
    pub field: Option<PropertyRef>,
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_lexer_keywords_and_words() {
        let kinds: Vec<_> = Lexer::new("on /Root findall Item by name")
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::On,
                TokenKind::Word,
                TokenKind::FindAll,
                TokenKind::Word,
                TokenKind::By,
                TokenKind::Word
            ]
        );
        // Keywords inside longer words stay words.
        let token = Lexer::new("online").next().unwrap();
        assert_eq!(token.kind, TokenKind::Word);
    }

    #[test]
    fn test_parse_any_clause_order() {
        let expr = FinderExpr::parse("by name findall Item on /Root/Item").unwrap();
        assert_eq!(expr.on, "/Root/Item");
        assert_eq!(expr.find, "Item");
        assert!(expr.find_all);
        assert_eq!(expr.by, "name");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            FinderExpr::parse("find Item by name").unwrap_err(),
            SchemaError::MissingOnExpression(_)
        ));
        assert!(matches!(
            FinderExpr::parse("on /Root find").unwrap_err(),
            SchemaError::MissingFinderValue { keyword: "find", .. }
        ));
        assert!(matches!(
            FinderExpr::parse("on /Root find Item by name extra").unwrap_err(),
            SchemaError::BadFinderToken { token, .. } if token == "extra"
        ));
        assert!(matches!(
            FinderExpr::parse("on /Root find Item by name!").unwrap_err(),
            SchemaError::BadFinderToken { .. }
        ));
    }

    #[test]
    fn test_relative_on_strips_root() {
        let rel = |on: &str| {
            let expr = FinderExpr::parse(&format!("on {on} find a by b")).unwrap();
            expr.relative_on("Root").to_string()
        };
        assert_eq!(rel("/Root/Item"), "Item");
        assert_eq!(rel("/Root"), "");
        assert_eq!(rel("/RootItem"), "RootItem");
        assert_eq!(rel("Item/Sub"), "Item/Sub");
    }
}
