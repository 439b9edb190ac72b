//! Stylesheet parser module.

mod actions;
mod feed;
/// Parser driver and result types.
pub mod parser;

pub use parser::{ParseResult, Parser, ParserConfig};
