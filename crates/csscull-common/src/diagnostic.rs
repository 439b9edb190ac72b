//! Diagnostics produced while tokenizing and parsing a stylesheet.
//!
//! Nothing in the tokenizer or parser is fatal. Every problem becomes a
//! [`Diagnostic`] that is collected next to whatever was recovered, and
//! optionally forwarded to a caller-supplied [`DiagnosticSink`].

use core::fmt;

use serde::Serialize;
use thiserror::Error;

/// A location in stylesheet source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
}

impl Position {
    /// The first character of the input.
    pub const START: Self = Self::new(0, 1, 1);

    /// Create a new position.
    #[must_use]
    pub const fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The position just past `text`, when `text` starts here.
    #[must_use]
    pub fn after(self, text: &str) -> Self {
        let offset = self.offset + text.len();
        match text.rfind('\n') {
            Some(last) => Self {
                offset,
                line: self.line.saturating_add(count(text.matches('\n'))),
                column: count(text[last + 1..].chars()).saturating_add(1),
            },
            None => Self {
                offset,
                line: self.line,
                column: self.column.saturating_add(count(text.chars())),
            },
        }
    }
}

fn count<I: Iterator>(items: I) -> u32 {
    u32::try_from(items.count()).unwrap_or(u32::MAX)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(tag = "kind", content = "found")]
pub enum DiagnosticKind {
    /// The tokenizer met a character no rule accepts. It skips one character
    /// and carries on.
    #[error("illegal character '{0}'")]
    IllegalCharacter(char),

    /// The parser met a token that continues no production. It discards
    /// tokens up to the next statement boundary and carries on.
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    /// The input ended in the middle of a statement.
    #[error("unexpected end of input")]
    UnexpectedEnd,
}

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Where the offending character or token starts.
    pub position: Position,
    /// The offending character or token.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    /// Extra context, e.g. which tokens would have been accepted.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    #[must_use]
    pub fn new(position: Position, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            message: message.into(),
        }
    }

    /// Diagnostic for a character no tokenizer rule matched.
    #[must_use]
    pub fn illegal_character(position: Position, c: char) -> Self {
        Self::new(
            position,
            DiagnosticKind::IllegalCharacter(c),
            "character skipped",
        )
    }

    /// Returns true if this diagnostic came from the tokenizer.
    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        matches!(self.kind, DiagnosticKind::IllegalCharacter(_))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}: {}", self.position, self.kind)
        } else {
            write!(f, "{}: {} ({})", self.position, self.kind, self.message)
        }
    }
}

/// Receiver for diagnostics as they are produced.
///
/// Sinks are observational: what a sink does with a diagnostic never changes
/// the parse result.
pub trait DiagnosticSink {
    /// Accept one diagnostic.
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Sink that forwards every diagnostic to the `log` facade at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        log::warn!("{diagnostic}");
    }
}
