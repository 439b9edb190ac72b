//! Diagnostics with colored terminal output.
//!
//! Provides deduplication to avoid printing the same diagnostic for one source
//! more than once. Used by the command-line front end to report what the
//! tokenizer and parser recovered from.

use std::collections::HashSet;
use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};

/// Prints diagnostics for one source to stderr, once per unique message.
///
/// Diagnostics that differ only in position are printed once, at the first
/// position met.
///
/// # Example
/// ```ignore
/// let mut reporter = TerminalReporter::new("style.css");
/// let result = parser.parse_with_sink(css, &mut reporter);
/// ```
#[derive(Debug)]
pub struct TerminalReporter {
    source: String,
    seen: HashSet<(DiagnosticKind, String)>,
    color: bool,
}

impl TerminalReporter {
    /// Create a reporter labelled with the source it reports for.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            seen: HashSet::new(),
            color: true,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Number of distinct diagnostics printed so far.
    #[must_use]
    pub fn reported(&self) -> usize {
        self.seen.len()
    }

    /// Clear all recorded diagnostics (call when switching to a new source).
    pub fn reset(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.seen.clear();
    }

    fn render(&self, diagnostic: &Diagnostic) -> String {
        let label = if diagnostic.is_lexical() {
            "lex"
        } else {
            "syntax"
        };
        let detail = if diagnostic.message.is_empty() {
            diagnostic.kind.to_string()
        } else {
            format!("{} ({})", diagnostic.kind, diagnostic.message)
        };
        if self.color {
            format!(
                "{} {}:{} {}",
                format!("[{label}]").yellow().bold(),
                self.source.bold(),
                diagnostic.position,
                detail.yellow()
            )
        } else {
            format!("[{label}] {}:{} {detail}", self.source, diagnostic.position)
        }
    }
}

impl DiagnosticSink for TerminalReporter {
    fn report(&mut self, diagnostic: &Diagnostic) {
        if !self
            .seen
            .insert((diagnostic.kind.clone(), diagnostic.message.clone()))
        {
            return;
        }
        let line = self.render(diagnostic);
        // A closed stderr is not worth aborting a report over.
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Position;

    #[test]
    fn test_duplicates_are_suppressed() {
        let mut reporter = TerminalReporter::new("a.css").with_color(false);
        let d = Diagnostic::illegal_character(Position::new(1, 1, 2), '`');
        reporter.report(&d);
        reporter.report(&d);
        assert_eq!(reporter.reported(), 1);

        // The same problem elsewhere in the file is not repeated.
        reporter.report(&Diagnostic::illegal_character(Position::new(9, 3, 4), '`'));
        assert_eq!(reporter.reported(), 1);
        reporter.report(&Diagnostic::illegal_character(Position::new(12, 3, 7), '!'));
        assert_eq!(reporter.reported(), 2);

        reporter.reset("b.css");
        assert_eq!(reporter.reported(), 0);
    }

    #[test]
    fn test_plain_rendering() {
        let reporter = TerminalReporter::new("a.css").with_color(false);
        let d = Diagnostic::illegal_character(Position::new(7, 2, 5), '`');
        let text = reporter.render(&d);
        assert!(text.starts_with("[lex] a.css:2:5"));
        assert!(text.contains("illegal character '`'"));
    }
}
