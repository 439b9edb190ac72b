use csscull_common::{Diagnostic, Position};

use super::lexicon::{Disposition, LEXICON, Lexicon, classify};
use super::token::{Token, TokenKind};

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Log every produced token at debug level.
    pub debug: bool,
}

impl TokenizerConfig {
    /// Enable or disable per-token debug logging.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// CSS3 tokenizer driven by an ordered rule table.
///
/// A `Tokenizer` holds no per-input state; every call to [`Tokenizer::tokenize`]
/// starts a fresh scan, so the same tokenizer can be reused for any number of
/// inputs.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    lexicon: &'static Lexicon,
    config: TokenizerConfig,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a tokenizer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TokenizerConfig::default())
    }

    /// Create a tokenizer with the given configuration.
    #[must_use]
    pub fn with_config(config: TokenizerConfig) -> Self {
        Self {
            lexicon: &LEXICON,
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> TokenizerConfig {
        self.config
    }

    /// Scan `input` lazily.
    ///
    /// The returned iterator yields `Ok(token)` for every token and
    /// `Err(diagnostic)` for every illegal character, which is skipped. It
    /// never stops early: the scan always runs to the end of the input.
    #[must_use]
    pub const fn tokenize<'a>(&self, input: &'a str) -> Tokens<'a> {
        Tokens {
            lexicon: self.lexicon,
            input,
            position: Position::START,
            debug: self.config.debug,
        }
    }

    /// Scan all of `input` and return the tokens and the diagnostics
    /// separately.
    #[must_use]
    pub fn tokenize_all<'a>(&self, input: &'a str) -> (Vec<Token<'a>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();
        for item in self.tokenize(input) {
            match item {
                Ok(token) => tokens.push(token),
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        }
        (tokens, diagnostics)
    }
}

/// Lazy token stream over one input. Not restartable: tokenize the input
/// again to start over.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    lexicon: &'static Lexicon,
    input: &'a str,
    position: Position,
    debug: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.input[self.position.offset..];
            let c = rest.chars().next()?;
            let position = self.position;

            let Some((rule, len)) = self.lexicon.rule_at(rest) else {
                // Skip one character and keep going.
                self.position = position.after(&rest[..c.len_utf8()]);
                if self.debug {
                    log::debug!("illegal character {c:?} at {position}");
                }
                return Some(Err(Diagnostic::illegal_character(position, c)));
            };

            let text = &rest[..len];
            self.position = position.after(text);

            let kind = match rule.disposition {
                Disposition::Whitespace | Disposition::Comment => continue,
                Disposition::Emit(TokenKind::Ident) => classify(text),
                Disposition::Emit(kind) => kind,
            };
            let token = Token::new(kind, text, position);
            if self.debug {
                log::debug!("{position} {token}");
            }
            return Some(Ok(token));
        }
    }
}

impl core::iter::FusedIterator for Tokens<'_> {}
