//! The contract with an external selector engine.
//!
//! Matching selectors against a document is not done here. A
//! [`SelectorEngine`] takes selector text and a document and says how many
//! elements match; [`find_unused`] runs every selector a stylesheet declared
//! through one and keeps those that matched nothing.

use serde::Serialize;

use crate::selector::Selector;

/// Something that can count the elements of a document a selector matches.
pub trait SelectorEngine {
    /// The parsed document type the engine works on.
    type Document;
    /// Why a selector could not be evaluated, e.g. the engine does not
    /// support some pseudo-class.
    type Error: core::fmt::Display;

    /// Count the elements of `document` matched by `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot evaluate `selector`.
    fn match_count(&self, selector: &str, document: &Self::Document)
    -> Result<usize, Self::Error>;
}

/// A selector the engine could not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineFailure {
    /// The selector text handed to the engine.
    pub selector: String,
    /// The engine's explanation.
    pub reason: String,
}

/// Outcome of checking a stylesheet's selectors against a document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UnusedReport {
    /// Selectors that matched no element, in declaration order. A selector
    /// declared twice and unused appears twice.
    pub unused: Vec<String>,
    /// Selectors the engine rejected. They count as neither used nor unused.
    pub failures: Vec<EngineFailure>,
    /// How many selectors were checked.
    pub checked: usize,
}

/// Check every selector in `selectors` against `document`.
#[must_use]
pub fn find_unused<'s, E>(
    selectors: impl IntoIterator<Item = &'s Selector>,
    engine: &E,
    document: &E::Document,
) -> UnusedReport
where
    E: SelectorEngine + ?Sized,
{
    let mut report = UnusedReport::default();
    for selector in selectors {
        let text = selector.to_string();
        report.checked += 1;
        match engine.match_count(&text, document) {
            Ok(0) => report.unused.push(text),
            Ok(count) => log::debug!("{text}: {count} matches"),
            Err(error) => {
                log::debug!("{text}: engine failed: {error}");
                report.failures.push(EngineFailure {
                    selector: text,
                    reason: error.to_string(),
                });
            }
        }
    }
    report
}
