//! Per-file results and their text and JSON renderings.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use csscull_common::Diagnostic;
use csscull_css::{CssError, ParseResult, SelectorEngine, UnusedReport, find_unused};
use owo_colors::OwoColorize;
use serde::Serialize;

/// What csscull found for one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// The stylesheet.
    pub path: PathBuf,
    /// Why the file could not be read, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Every recovered selector, in source order.
    pub selectors: Vec<String>,
    /// Lexical and syntax diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Unused selectors, when a document was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unused: Option<UnusedReport>,
}

impl FileReport {
    /// Build the report for one parse outcome, checking the selectors
    /// against `document` if there is one.
    pub fn new<E: SelectorEngine>(
        path: PathBuf,
        outcome: Result<ParseResult, CssError>,
        check: Option<(&E, &E::Document)>,
    ) -> Self {
        match outcome {
            Ok(result) => Self {
                path,
                error: None,
                selectors: result.selector_texts(),
                unused: check.map(|(engine, document)| {
                    find_unused(&result.selectors, engine, document)
                }),
                diagnostics: result.diagnostics,
            },
            Err(error) => Self {
                path,
                error: Some(error.to_string()),
                selectors: Vec::new(),
                diagnostics: Vec::new(),
                unused: None,
            },
        }
    }
}

/// Build one report per parsed file, in path order.
#[must_use]
pub fn build<E: SelectorEngine>(
    results: BTreeMap<PathBuf, Result<ParseResult, CssError>>,
    check: Option<(&E, &E::Document)>,
) -> Vec<FileReport> {
    results
        .into_iter()
        .map(|(path, outcome)| FileReport::new(path, outcome, check))
        .collect()
}

/// Totals over every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Stylesheets looked at.
    pub files: usize,
    /// Stylesheets that could not be read.
    pub unreadable: usize,
    /// Selectors recovered.
    pub selectors: usize,
    /// Selectors that matched nothing.
    pub unused: usize,
    /// Selectors the engine could not evaluate.
    pub unsupported: usize,
    /// Diagnostics reported.
    pub diagnostics: usize,
}

impl Summary {
    /// Add up `reports`.
    #[must_use]
    pub fn of(reports: &[FileReport]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            summary.files += 1;
            summary.unreadable += usize::from(report.error.is_some());
            summary.selectors += report.selectors.len();
            summary.diagnostics += report.diagnostics.len();
            if let Some(unused) = &report.unused {
                summary.unused += unused.unused.len();
                summary.unsupported += unused.failures.len();
            }
            summary
        })
    }
}

/// The JSON document printed by `--json`.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    /// Per-file results.
    pub files: &'a [FileReport],
    /// Totals.
    pub summary: Summary,
}

/// Render `reports` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(reports: &[FileReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        files: reports,
        summary: Summary::of(reports),
    })
}

/// Render the recovered selectors only, one per line.
#[must_use]
pub fn render_list(reports: &[FileReport]) -> String {
    let mut out = String::new();
    for report in reports {
        for selector in &report.selectors {
            let _ = writeln!(out, "{selector}");
        }
    }
    out
}

/// Render `reports` for a terminal.
#[must_use]
pub fn render_text(reports: &[FileReport], color: bool) -> String {
    let mut out = String::new();
    for report in reports {
        let path = report.path.display().to_string();
        let path = if color { path.bold().to_string() } else { path };

        if let Some(error) = &report.error {
            let _ = writeln!(out, "{path}: {}", paint(error, color, Paint::Error));
            continue;
        }

        let mut line = format!("{path}: {} selectors", report.selectors.len());
        if !report.diagnostics.is_empty() {
            let _ = write!(line, ", {} diagnostics", report.diagnostics.len());
        }
        let Some(unused) = &report.unused else {
            let _ = writeln!(out, "{line}");
            continue;
        };
        let _ = write!(line, ", {} unused", unused.unused.len());
        if !unused.failures.is_empty() {
            let _ = write!(line, ", {} unsupported", unused.failures.len());
        }
        let _ = writeln!(out, "{line}");

        for selector in &unused.unused {
            let _ = writeln!(out, "  {} {selector}", paint("unused", color, Paint::Unused));
        }
        for failure in &unused.failures {
            let _ = writeln!(
                out,
                "  {} {} ({})",
                paint("skipped", color, Paint::Skipped),
                failure.selector,
                failure.reason
            );
        }
    }

    let summary = Summary::of(reports);
    if summary.files > 1 {
        let _ = writeln!(
            out,
            "{} files, {} selectors, {} unused",
            summary.files, summary.selectors, summary.unused
        );
    }
    out
}

#[derive(Clone, Copy)]
enum Paint {
    Error,
    Unused,
    Skipped,
}

fn paint(text: &str, color: bool, style: Paint) -> String {
    if !color {
        return text.to_string();
    }
    match style {
        Paint::Error => text.red().bold().to_string(),
        Paint::Unused => text.red().to_string(),
        Paint::Skipped => text.yellow().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csscull_css::Parser;

    /// Matches a selector if its text is one of the document's "elements".
    struct Exact;

    impl SelectorEngine for Exact {
        type Document = Vec<&'static str>;
        type Error = String;

        fn match_count(&self, selector: &str, document: &Self::Document) -> Result<usize, String> {
            if selector.contains(':') {
                return Err("pseudo-classes are not supported".to_string());
            }
            Ok(document.iter().filter(|&&element| element == selector).count())
        }
    }

    fn results() -> BTreeMap<PathBuf, Result<ParseResult, CssError>> {
        let parser = Parser::new();
        let mut results = BTreeMap::new();
        let _ = results.insert(
            PathBuf::from("b.css"),
            Ok(parser.parse("a, b { } a:hover { } ` c { }")),
        );
        let _ = results.insert(
            PathBuf::from("a.css"),
            Err(CssError::io(
                "a.css",
                std::io::Error::from(std::io::ErrorKind::NotFound),
            )),
        );
        results
    }

    #[test]
    fn test_reports_follow_path_order() {
        let reports = build(results(), Some((&Exact, &vec!["a"])));
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].path, PathBuf::from("a.css"));
        assert!(reports[0].error.is_some());

        let report = &reports[1];
        assert_eq!(report.selectors, vec!["a", "b", "a:hover", "c"]);
        assert_eq!(report.diagnostics.len(), 1);
        let unused = report.unused.as_ref().expect("document given");
        assert_eq!(unused.unused, vec!["b", "c"]);
        assert_eq!(unused.failures.len(), 1);
    }

    #[test]
    fn test_summary() {
        let reports = build(results(), Some((&Exact, &vec!["a"])));
        assert_eq!(
            Summary::of(&reports),
            Summary {
                files: 2,
                unreadable: 1,
                selectors: 4,
                unused: 2,
                unsupported: 1,
                diagnostics: 1,
            }
        );
    }

    #[test]
    fn test_render_text_without_document() {
        let reports = build::<Exact>(results(), None);
        let text = render_text(&reports, false);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("a.css: failed to read stylesheet 'a.css'"));
        assert_eq!(lines[1], "b.css: 4 selectors, 1 diagnostics");
        assert_eq!(lines[2], "2 files, 4 selectors, 0 unused");
    }

    #[test]
    fn test_render_text_with_document() {
        let reports = build(results(), Some((&Exact, &vec!["a"])));
        let text = render_text(&reports[1..], false);
        assert_eq!(
            text,
            "b.css: 4 selectors, 1 diagnostics, 2 unused, 1 unsupported\n  \
             unused b\n  \
             unused c\n  \
             skipped a:hover (pseudo-classes are not supported)\n"
        );
    }

    #[test]
    fn test_render_list() {
        let reports = build::<Exact>(results(), None);
        assert_eq!(render_list(&reports), "a\nb\na:hover\nc\n");
    }

    #[test]
    fn test_json_output() {
        let reports = build(results(), Some((&Exact, &vec!["a"])));
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&reports).expect("serialize")).expect("valid json");
        assert_eq!(json["summary"]["unused"], 2);
        assert_eq!(json["files"][0]["path"], "a.css");
        assert!(json["files"][0].get("unused").is_none());
        assert_eq!(json["files"][1]["unused"]["unused"][1], "c");
        assert_eq!(json["files"][1]["diagnostics"][0]["kind"], "IllegalCharacter");
    }
}
