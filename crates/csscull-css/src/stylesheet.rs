//! Stylesheet, statement, and declaration model.
//!
//! Values are kept close to the tokens they came from: a primitive value
//! remembers its [`TokenKind`] and source text, and nothing is validated or
//! computed.

use serde::Serialize;

use crate::selector::SelectorGroup;
use crate::tokenizer::TokenKind;

/// [CSS 2.1 § 4.1.7 Rule sets, declaration blocks, and selectors](https://www.w3.org/TR/CSS21/syndata.html#rule-sets)
///
/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Property name as written.
    pub property: String,
    /// The value terms, in source order. Never empty.
    pub values: Vec<Value>,
}

/// One term of a declaration value (the grammar's `any`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Value {
    /// A single token: number, dimension, string, identifier, hash, ...
    Primitive {
        /// Kind the token was scanned as.
        kind: TokenKind,
        /// Source text.
        text: String,
    },
    /// `name(arguments)`
    Function {
        /// Function name without the parenthesis.
        name: String,
        /// Argument terms; may be empty.
        arguments: Vec<Value>,
    },
    /// `( ... )`
    Parenthesized(Vec<Value>),
    /// `[ ... ]`
    Bracketed(Vec<Value>),
    /// A `,` separating value terms.
    Comma,
}

impl Value {
    /// Shorthand for a primitive value.
    #[must_use]
    pub fn primitive(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::Primitive {
            kind,
            text: text.into(),
        }
    }
}

/// `prelude { declarations }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ruleset {
    /// The selectors, or `None` for a bare `{ ... }` block.
    pub selectors: Option<SelectorGroup>,
    /// Declarations, in source order.
    pub declarations: Vec<Declaration>,
}

/// Target of an `@import` or `@namespace` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImportTarget {
    /// A quoted string, stored unquoted.
    String(String),
    /// `url(...)`, stored as the bare URL.
    Uri(String),
}

impl ImportTarget {
    /// The URL or string, without quoting.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String(s) | Self::Uri(s) => s,
        }
    }
}

/// [CSS 2.1 § 6.3 The @import rule](https://www.w3.org/TR/CSS21/cascade.html#at-import)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    /// What to import.
    pub target: ImportTarget,
    /// Media types the import is restricted to; empty means all.
    pub media: Vec<String>,
}

/// [CSS Namespaces § 2 Declaring namespaces](https://www.w3.org/TR/css-namespaces-3/#declaration)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    /// Prefix, or `None` for the default namespace.
    pub prefix: Option<String>,
    /// Namespace name.
    pub target: ImportTarget,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Statement {
    /// A ruleset.
    Ruleset(Ruleset),
    /// `@import`
    Import(Import),
    /// `@namespace`
    Namespace(Namespace),
}

/// The statements that parsed cleanly, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Stylesheet {
    /// Statements, in source order.
    pub statements: Vec<Statement>,
}

impl Stylesheet {
    /// Iterate over the rulesets, skipping at-rules.
    pub fn rulesets(&self) -> impl Iterator<Item = &Ruleset> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Ruleset(ruleset) => Some(ruleset),
            Statement::Import(_) | Statement::Namespace(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rulesets_skip_at_rules() {
        let ruleset = Ruleset {
            selectors: None,
            declarations: vec![Declaration {
                property: "margin".to_string(),
                values: vec![Value::primitive(TokenKind::Number, "0")],
            }],
        };
        let stylesheet = Stylesheet {
            statements: vec![
                Statement::Import(Import {
                    target: ImportTarget::Uri("print.css".to_string()),
                    media: vec!["print".to_string()],
                }),
                Statement::Ruleset(ruleset.clone()),
                Statement::Namespace(Namespace {
                    prefix: Some("svg".to_string()),
                    target: ImportTarget::String("http://www.w3.org/2000/svg".to_string()),
                }),
            ],
        };
        let rulesets: Vec<&Ruleset> = stylesheet.rulesets().collect();
        assert_eq!(rulesets, vec![&ruleset]);
    }
}
