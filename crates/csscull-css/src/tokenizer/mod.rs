//! CSS tokenizer module.

mod lexicon;
/// CSS3 token kinds.
pub mod token;
/// Tokenizer implementation.
pub mod tokenizer;

pub use lexicon::classify;
pub use token::{Token, TokenKind};
pub use tokenizer::{Tokenizer, TokenizerConfig, Tokens};
