//! Table-driven stylesheet parser.
//!
//! The parser pulls terminals from a [`Feed`] one at a time and runs the
//! LALR(1) table over them. Semantic values live on the parse stack next to
//! the states; every reduction replaces its right-hand side with the value
//! its action builds.
//!
//! Nothing here is fatal. A terminal with no action in the current state is
//! reported, the rest of its statement is discarded, and parsing resumes at
//! the top level with the statements parsed so far.

use csscull_common::{Diagnostic, DiagnosticKind, DiagnosticSink};
use serde::Serialize;

use super::actions::{self, Node, Output};
use super::feed::{Feed, Lookahead};
use crate::grammar::{Action, PARSE_TABLE, PRODUCTIONS, ParseTable, Terminal};
use crate::selector::{Selector, SelectorGroup};
use crate::stylesheet::Stylesheet;
use crate::tokenizer::{Token, Tokenizer};

/// Parser settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Log every shift and reduction at debug level.
    pub trace: bool,
}

impl ParserConfig {
    /// Enable or disable per-step trace logging.
    #[must_use]
    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Everything one parse call produces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParseResult {
    /// The statements that parsed cleanly.
    pub stylesheet: Stylesheet,
    /// One entry per ruleset with selectors, and one per syntax error, in
    /// source order.
    pub items: Vec<Result<SelectorGroup, Diagnostic>>,
    /// Every selector of every selector group, one entry per comma-separated
    /// alternative, in source order. Duplicates are kept.
    pub selectors: Vec<Selector>,
    /// Lexical and syntax diagnostics, in the order they were produced.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// The selectors rendered back to selector text, ready for a selector
    /// engine.
    #[must_use]
    pub fn selector_texts(&self) -> Vec<String> {
        self.selectors.iter().map(ToString::to_string).collect()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// CSS3 stylesheet parser.
///
/// A `Parser` holds only configuration and a reference to the shared parse
/// table, so it can be reused for any number of inputs and shared between
/// threads. All per-input state lives in the call.
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    tokenizer: Tokenizer,
    table: &'static ParseTable,
    config: ParserConfig,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with the given configuration.
    #[must_use]
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            table: &PARSE_TABLE,
            config,
        }
    }

    /// Use `tokenizer` for [`Parser::parse`] and [`Parser::parse_with_sink`].
    #[must_use]
    pub const fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> ParserConfig {
        self.config
    }

    /// Parse a stylesheet.
    ///
    /// Never fails: problems are collected in [`ParseResult::diagnostics`]
    /// next to whatever could be recovered. Empty input gives an empty
    /// result with no diagnostics.
    #[must_use]
    pub fn parse(&self, input: &str) -> ParseResult {
        self.run(self.tokenizer.tokenize(input), None)
    }

    /// Like [`Parser::parse`], also handing each diagnostic to `sink` as it
    /// is produced.
    pub fn parse_with_sink(&self, input: &str, sink: &mut dyn DiagnosticSink) -> ParseResult {
        self.run(self.tokenizer.tokenize(input), Some(sink))
    }

    /// Parse an already tokenized stylesheet. `Err` items are taken as
    /// lexical diagnostics.
    #[must_use]
    pub fn parse_tokens<'a, I>(&self, tokens: I) -> ParseResult
    where
        I: IntoIterator<Item = Result<Token<'a>, Diagnostic>>,
    {
        self.run(tokens.into_iter(), None)
    }

    fn run<'a, I>(&self, tokens: I, sink: Option<&mut dyn DiagnosticSink>) -> ParseResult
    where
        I: Iterator<Item = Result<Token<'a>, Diagnostic>>,
    {
        let session = Session {
            table: self.table,
            trace: self.config.trace,
            stack: vec![(0, Node::Empty)],
            output: Output::default(),
            diagnostics: Collector {
                collected: Vec::new(),
                sink,
            },
        };
        session.run(&mut Feed::new(tokens))
    }
}

/// Keeps every diagnostic for the result and forwards it to the caller's
/// sink, if any.
struct Collector<'s> {
    collected: Vec<Diagnostic>,
    sink: Option<&'s mut dyn DiagnosticSink>,
}

impl DiagnosticSink for Collector<'_> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        if let Some(sink) = self.sink.as_mut() {
            sink.report(diagnostic);
        }
        self.collected.push(diagnostic.clone());
    }
}

/// State of one parse call.
struct Session<'a, 's> {
    table: &'static ParseTable,
    trace: bool,
    stack: Vec<(usize, Node<'a>)>,
    output: Output,
    diagnostics: Collector<'s>,
}

impl<'a> Session<'a, '_> {
    fn run<I>(mut self, feed: &mut Feed<'a, I>) -> ParseResult
    where
        I: Iterator<Item = Result<Token<'a>, Diagnostic>>,
    {
        let mut lookahead = feed.next(&mut self.diagnostics);
        loop {
            match self.table.action(self.state(), lookahead.terminal) {
                Action::Shift(state) => {
                    if self.trace {
                        log::debug!("shift {lookahead} -> {state}");
                    }
                    let node = lookahead.token.map_or(Node::Descendant, Node::Token);
                    self.stack.push((state, node));
                    lookahead = feed.next(&mut self.diagnostics);
                }
                Action::Reduce(production) => {
                    if self.reduce(production).is_none() {
                        log::error!("reduction of production {production} failed");
                        lookahead = self.recover(feed, lookahead);
                    }
                }
                Action::Accept => break,
                Action::Error => lookahead = self.recover(feed, lookahead),
            }
        }
        self.finish()
    }

    fn state(&self) -> usize {
        self.stack.last().map_or(0, |&(state, _)| state)
    }

    fn reduce(&mut self, index: usize) -> Option<()> {
        let production = PRODUCTIONS.get(index)?;
        if self.trace {
            log::debug!("reduce {production}");
        }
        let start = self.stack.len().checked_sub(production.rhs.len())?;
        let children = self.stack.drain(start..).map(|(_, node)| node).collect();
        let node = actions::reduce(production.rule, children, &mut self.output)?;
        let state = self.table.goto(self.state(), production.lhs)?;
        self.stack.push((state, node));
        Some(())
    }

    /// Report `lookahead`, skip the rest of its statement, and go back to the
    /// top level. Returns the terminal to continue with.
    fn recover<I>(&mut self, feed: &mut Feed<'a, I>, lookahead: Lookahead<'a>) -> Lookahead<'a>
    where
        I: Iterator<Item = Result<Token<'a>, Diagnostic>>,
    {
        let kind = match (lookahead.token, lookahead.terminal) {
            (Some(token), _) => DiagnosticKind::UnexpectedToken(token.text.to_owned()),
            (None, Terminal::End) => DiagnosticKind::UnexpectedEnd,
            (None, terminal) => DiagnosticKind::UnexpectedToken(terminal.to_string()),
        };
        let message = expected_message(&self.table.expected(self.state()));
        let diagnostic = Diagnostic::new(lookahead.position, kind, message);
        self.diagnostics.report(&diagnostic);
        self.output.items.push(Err(diagnostic));

        self.reset();
        if lookahead.terminal == Terminal::End {
            return lookahead;
        }
        feed.skip_statement(lookahead, &mut self.diagnostics);
        feed.next(&mut self.diagnostics)
    }

    /// Drop everything above the stylesheet parsed so far.
    fn reset(&mut self) {
        self.stack.truncate(2);
        if self.stack.len() < 2 {
            self.stack.truncate(1);
            self.stack
                .push((self.table.resume, Node::Stylesheet(Vec::new())));
        }
    }

    fn finish(mut self) -> ParseResult {
        let statements = match self.stack.pop() {
            Some((_, Node::Stylesheet(statements))) => statements,
            _ => Vec::new(),
        };
        ParseResult {
            stylesheet: Stylesheet { statements },
            items: self.output.items,
            selectors: self.output.selectors,
            diagnostics: self.diagnostics.collected,
        }
    }
}

fn expected_message(expected: &[Terminal]) -> String {
    const SHOWN: usize = 6;
    let mut names: Vec<String> = expected.iter().take(SHOWN).map(ToString::to_string).collect();
    if expected.len() > SHOWN {
        names.push(format!("{} more", expected.len() - SHOWN));
    }
    match names.len() {
        0 => String::new(),
        1 => format!("expected {}", names[0]),
        _ => format!("expected one of {}", names.join(", ")),
    }
}
