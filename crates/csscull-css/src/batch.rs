//! Parsing many stylesheets at once.
//!
//! Each file is an independent parse, so the batch is spread over the
//! `rayon` thread pool. Results are keyed by path; the order files finish in
//! does not matter.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{CssError, Result};
use crate::parser::{ParseResult, Parser};

/// Read and parse one stylesheet.
///
/// # Errors
///
/// Returns [`CssError::Io`] if the file cannot be read as UTF-8 text.
pub fn parse_file(parser: &Parser, path: &Path) -> Result<ParseResult> {
    let text = fs::read_to_string(path).map_err(|source| CssError::io(path, source))?;
    Ok(parser.parse(&text))
}

/// Read and parse every stylesheet in `paths` in parallel.
///
/// A file that cannot be read gets an `Err` entry; the others are parsed
/// regardless.
#[must_use]
pub fn parse_files<P>(parser: &Parser, paths: &[P]) -> BTreeMap<PathBuf, Result<ParseResult>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            log::debug!("parsing {}", path.display());
            (path.to_path_buf(), parse_file(parser, path))
        })
        .collect()
}
