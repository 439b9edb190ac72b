//! Selector matching backed by the `scraper` crate.

use csscull_css::SelectorEngine;
use scraper::{Html, Selector};

/// Counts matches with `scraper`'s implementation of Selectors Level 3.
///
/// Selectors `scraper` cannot parse, such as pseudo-elements or `:hover`,
/// come back as errors and end up in the report's failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperEngine;

impl SelectorEngine for ScraperEngine {
    type Document = Html;
    type Error = String;

    fn match_count(&self, selector: &str, document: &Html) -> Result<usize, String> {
        let selector = Selector::parse(selector).map_err(|error| error.to_string())?;
        Ok(document.select(&selector).count())
    }
}
