//! Common utilities for the csscull tools.
//!
//! This crate provides shared infrastructure used by the stylesheet parser and
//! the command-line front end:
//! - **Diagnostics** - position-tagged records for illegal characters and
//!   syntax errors, plus the [`DiagnosticSink`] trait they are delivered through
//! - **Reporter** - colored, deduplicated terminal output for diagnostics

pub mod diagnostic;
pub mod reporter;

pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, Position};
pub use reporter::TerminalReporter;
