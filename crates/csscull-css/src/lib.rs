//! CSS3 tokenizer, grammar, and selector model for csscull.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** ([CSS 2.1 Appendix G.2](https://www.w3.org/TR/CSS21/grammar.html#scanner))
//!   - One ordered, case-insensitive rule table; the first rule that matches wins
//!   - A kind per length, angle, time, and frequency unit, plus a generic dimension
//!   - Color keywords and property names told apart from plain identifiers
//!   - Illegal characters reported and skipped
//!
//! - **Parser** ([CSS 2.1 Appendix G.1](https://www.w3.org/TR/CSS21/grammar.html#grammar),
//!   [Selectors Level 3 § 10](https://www.w3.org/TR/selectors-3/#w3cselgrammar))
//!   - LALR(1) table built from a static production table
//!   - `@import`, `@namespace`, rulesets, declarations, nested value functions
//!   - Statement-level error recovery
//!
//! - **Selector model**
//!   - Type, universal, id, class, attribute, pseudo, and negation selectors
//!   - Descendant, child, and sibling combinators
//!   - Serialization back to selector text
//!
//! - **Selector engine contract**: [`SelectorEngine`] and [`find_unused`]
//!
//! # Not Implemented
//!
//! - At-rules other than `@import` and `@namespace` (diagnosed and skipped)
//! - Cascade, specificity, and value validation
//! - Selector matching (left to a [`SelectorEngine`])

/// Parsing many stylesheets in parallel.
pub mod batch;
/// Selector engine contract.
pub mod engine;
/// Errors for loading stylesheets.
pub mod error;
mod grammar;
/// Stylesheet parser.
pub mod parser;
/// Selector model per [Selectors Level 3](https://www.w3.org/TR/selectors-3/).
pub mod selector;
/// Stylesheet and declaration model.
pub mod stylesheet;
/// CSS3 tokenizer.
pub mod tokenizer;

pub use batch::{parse_file, parse_files};
pub use engine::{EngineFailure, SelectorEngine, UnusedReport, find_unused};
pub use error::CssError;
pub use parser::{ParseResult, Parser, ParserConfig};
pub use selector::{Combinator, Selector, SelectorGroup, SimpleSelectorSequence};
pub use stylesheet::{Declaration, Statement, Stylesheet, Value};
pub use tokenizer::{Token, TokenKind, Tokenizer, TokenizerConfig, classify};
