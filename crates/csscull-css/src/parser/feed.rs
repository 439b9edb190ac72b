//! Token feed between the tokenizer and the parse loop.
//!
//! Whitespace never reaches the parser, so the feed recovers the one place
//! where it matters: between two compound selectors. It watches token
//! offsets and, in selector context, emits a [`Terminal::Descendant`] when a
//! token that can end a compound selector is followed, after a gap, by one
//! that can start another.

use csscull_common::{Diagnostic, DiagnosticSink, Position};

use crate::grammar::Terminal;
use crate::tokenizer::{Token, TokenKind};

/// The next terminal for the parse loop.
#[derive(Debug, Clone, Copy)]
pub(super) struct Lookahead<'a> {
    pub terminal: Terminal,
    /// The real token, absent for the synthetic terminals.
    pub token: Option<Token<'a>>,
    pub position: Position,
    /// Block nesting depth before this terminal.
    pub depth: u32,
}

impl core::fmt::Display for Lookahead<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.token {
            Some(token) => write!(f, "{token}"),
            None => write!(f, "{}", self.terminal),
        }
    }
}

/// Can this token end a compound selector?
const fn ends_sequence(kind: TokenKind) -> bool {
    kind.is_ident()
        || matches!(
            kind,
            TokenKind::Star | TokenKind::RightBracket | TokenKind::RightParen | TokenKind::Hash
        )
}

/// Can this token start a compound selector?
const fn starts_sequence(kind: TokenKind) -> bool {
    kind.is_ident()
        || matches!(
            kind,
            TokenKind::Star
                | TokenKind::Pipe
                | TokenKind::Hash
                | TokenKind::Dot
                | TokenKind::LeftBracket
                | TokenKind::Colon
        )
}

pub(super) struct Feed<'a, I> {
    tokens: I,
    /// A token held back while a synthetic descendant goes out first.
    pending: Option<Token<'a>>,
    previous: Option<Token<'a>>,
    end: Position,
    blocks: u32,
    parens: u32,
    brackets: u32,
    at_rule: bool,
}

impl<'a, I> Feed<'a, I>
where
    I: Iterator<Item = Result<Token<'a>, Diagnostic>>,
{
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            pending: None,
            previous: None,
            end: Position::START,
            blocks: 0,
            parens: 0,
            brackets: 0,
            at_rule: false,
        }
    }

    /// Next terminal. Lexical diagnostics met on the way go to `sink`. Once
    /// the tokens run out this keeps returning [`Terminal::End`].
    pub fn next(&mut self, sink: &mut dyn DiagnosticSink) -> Lookahead<'a> {
        let (token, held) = match self.pending.take() {
            Some(token) => (token, true),
            None => match self.pull(sink) {
                Some(token) => (token, false),
                None => {
                    return Lookahead {
                        terminal: Terminal::End,
                        token: None,
                        position: self.end,
                        depth: self.blocks,
                    };
                }
            },
        };

        if !held && self.separates(&token) {
            self.pending = Some(token);
            return Lookahead {
                terminal: Terminal::Descendant,
                token: None,
                position: token.position,
                depth: self.blocks,
            };
        }

        let depth = self.blocks;
        self.track(&token);
        Lookahead {
            terminal: Terminal::Token(token.kind),
            token: Some(token),
            position: token.position,
            depth,
        }
    }

    /// Discard terminals from `from` (which is discarded too) up to the end
    /// of the statement it belongs to.
    ///
    /// Inside a block that is the `}` closing the block. At the top level it
    /// is the next `;` outside any block, or the `}` closing a block opened
    /// while skipping.
    pub fn skip_statement(&mut self, from: Lookahead<'a>, sink: &mut dyn DiagnosticSink) {
        let enclosing = from.depth;
        let mut depth = from.depth;
        let mut current = from;
        loop {
            if let Terminal::Token(kind) = current.terminal {
                depth = match kind {
                    TokenKind::LeftBrace => depth + 1,
                    TokenKind::RightBrace => depth.saturating_sub(1),
                    _ => depth,
                };
                let boundary = match kind {
                    TokenKind::RightBrace => depth < enclosing || depth == 0,
                    TokenKind::Semicolon => depth == 0,
                    _ => false,
                };
                if boundary {
                    return;
                }
            }
            current = self.next(sink);
            if current.terminal == Terminal::End {
                return;
            }
        }
    }

    fn pull(&mut self, sink: &mut dyn DiagnosticSink) -> Option<Token<'a>> {
        for item in self.tokens.by_ref() {
            match item {
                Ok(token) => return Some(token),
                Err(diagnostic) => sink.report(&diagnostic),
            }
        }
        None
    }

    fn separates(&self, next: &Token<'a>) -> bool {
        self.blocks == 0
            && self.parens == 0
            && self.brackets == 0
            && !self.at_rule
            && starts_sequence(next.kind)
            && self.previous.is_some_and(|previous| {
                ends_sequence(previous.kind) && previous.end() < next.position.offset
            })
    }

    fn track(&mut self, token: &Token<'a>) {
        match token.kind {
            TokenKind::LeftBrace => {
                self.blocks += 1;
                self.close_prelude();
            }
            TokenKind::RightBrace => {
                self.blocks = self.blocks.saturating_sub(1);
                self.close_prelude();
            }
            TokenKind::Semicolon => self.close_prelude(),
            TokenKind::LeftParen | TokenKind::Function | TokenKind::Not => self.parens += 1,
            TokenKind::RightParen => self.parens = self.parens.saturating_sub(1),
            TokenKind::LeftBracket => self.brackets += 1,
            TokenKind::RightBracket => self.brackets = self.brackets.saturating_sub(1),
            TokenKind::ImportSym | TokenKind::NamespaceSym | TokenKind::AtKeyword => {
                self.at_rule = true;
            }
            _ => {}
        }
        self.end = token.position.after(token.text);
        self.previous = Some(*token);
    }

    const fn close_prelude(&mut self) {
        self.parens = 0;
        self.brackets = 0;
        self.at_rule = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn terminals(input: &str) -> Vec<Terminal> {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut feed = Feed::new(Tokenizer::new().tokenize(input));
        let mut out = Vec::new();
        loop {
            let lookahead = feed.next(&mut diagnostics);
            if lookahead.terminal == Terminal::End {
                return out;
            }
            out.push(lookahead.terminal);
        }
    }

    fn token(kind: TokenKind) -> Terminal {
        Terminal::Token(kind)
    }

    #[test]
    fn test_descendant_between_separated_sequences() {
        assert_eq!(
            terminals("a .b"),
            vec![
                token(TokenKind::Ident),
                Terminal::Descendant,
                token(TokenKind::Dot),
                token(TokenKind::Ident),
            ]
        );
        assert_eq!(
            terminals("a.b"),
            vec![
                token(TokenKind::Ident),
                token(TokenKind::Dot),
                token(TokenKind::Ident),
            ]
        );
    }

    #[test]
    fn test_no_descendant_around_explicit_combinators() {
        assert!(!terminals("a > b").contains(&Terminal::Descendant));
        assert!(!terminals("a , b").contains(&Terminal::Descendant));
        assert!(!terminals("a {").contains(&Terminal::Descendant));
    }

    #[test]
    fn test_no_descendant_inside_blocks_and_arguments() {
        assert!(!terminals("a { margin: 1px auto }").contains(&Terminal::Descendant));
        assert!(!terminals(":not( a )").contains(&Terminal::Descendant));
        assert!(!terminals("[ href ]").contains(&Terminal::Descendant));
        assert!(!terminals("@namespace svg \"x\";").contains(&Terminal::Descendant));
    }

    #[test]
    fn test_descendant_after_closing_argument() {
        let out = terminals(":not(.a) b");
        assert_eq!(out.iter().filter(|&&t| t == Terminal::Descendant).count(), 1);
    }

    #[test]
    fn test_end_repeats() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut feed = Feed::new(Tokenizer::new().tokenize("a"));
        let _ = feed.next(&mut diagnostics);
        assert_eq!(feed.next(&mut diagnostics).terminal, Terminal::End);
        assert_eq!(feed.next(&mut diagnostics).terminal, Terminal::End);
    }

    #[test]
    fn test_skip_statement_inside_block() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut feed = Feed::new(Tokenizer::new().tokenize("a { b: ; c: { } d } e"));
        let mut lookahead = feed.next(&mut diagnostics);
        while lookahead.terminal != token(TokenKind::Semicolon) {
            lookahead = feed.next(&mut diagnostics);
        }
        feed.skip_statement(lookahead, &mut diagnostics);
        let next = feed.next(&mut diagnostics);
        assert_eq!(next.token.map(|t| t.text), Some("e"));
    }

    #[test]
    fn test_skip_statement_at_top_level() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut feed = Feed::new(Tokenizer::new().tokenize("@media x { a { } } b"));
        let first = feed.next(&mut diagnostics);
        feed.skip_statement(first, &mut diagnostics);
        let next = feed.next(&mut diagnostics);
        assert_eq!(next.token.map(|t| t.text), Some("b"));

        let mut feed = Feed::new(Tokenizer::new().tokenize("@charset \"x\"; b"));
        let first = feed.next(&mut diagnostics);
        feed.skip_statement(first, &mut diagnostics);
        let next = feed.next(&mut diagnostics);
        assert_eq!(next.token.map(|t| t.text), Some("b"));
    }
}
