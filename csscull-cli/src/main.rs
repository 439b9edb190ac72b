//! csscull: find the selectors of CSS3 stylesheets that match nothing
//!
//! Stylesheets are parsed in parallel. Whatever the parser recovers is
//! checked against an HTML document with the `scraper` selector engine;
//! diagnostics go to stderr, the report to stdout.

mod collect;
mod engine;
mod report;

use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as _;
use csscull_common::{DiagnosticSink, LogSink, TerminalReporter};
use csscull_css::{Parser, ParserConfig, Tokenizer, TokenizerConfig, parse_files};
use owo_colors::OwoColorize;

use engine::ScraperEngine;

/// csscull: report unused CSS3 selectors
#[derive(clap::Parser, Debug)]
#[command(name = "csscull")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Which selectors in site.css match nothing in index.html?
    csscull --html index.html site.css

    # Every stylesheet under styles/, as JSON
    csscull --html index.html --json styles/

    # Just list the selectors the parser recovered
    csscull --list site.css
"#)]
struct Cli {
    /// Stylesheets, or directories to search for *.css files
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// HTML document to check the selectors against
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "list")]
    json: bool,

    /// Only print the recovered selectors, one per line
    #[arg(long)]
    list: bool,

    /// Log what csscull is doing
    #[arg(short, long)]
    verbose: bool,

    /// Log every token and parser step (implies --verbose)
    #[arg(long)]
    trace: bool,

    /// Number of stylesheets to parse at once (default: one per CPU)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose || cli.trace { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to start the parser thread pool")?;
    }

    let files = collect::stylesheets(&cli.paths)?;
    if files.is_empty() {
        anyhow::bail!("no stylesheets found");
    }

    let parser = Parser::with_config(ParserConfig::default().with_trace(cli.trace))
        .with_tokenizer(Tokenizer::with_config(
            TokenizerConfig::default().with_debug(cli.trace),
        ));
    let results = parse_files(&parser, &files);

    // With --json the diagnostics are part of the report; only log them.
    let mut reporter = TerminalReporter::new("").with_color(io::stderr().is_terminal());
    let mut log_sink = LogSink;
    for (path, result) in &results {
        let Ok(result) = result else { continue };
        reporter.reset(path.display().to_string());
        let sink: &mut dyn DiagnosticSink = if cli.json { &mut log_sink } else { &mut reporter };
        for diagnostic in &result.diagnostics {
            sink.report(diagnostic);
        }
    }

    let document = cli
        .html
        .as_ref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read document '{}'", path.display()))
        })
        .transpose()?
        .map(|html| scraper::Html::parse_document(&html));

    let reports = report::build(results, document.as_ref().map(|document| (&ScraperEngine, document)));
    let unreadable = report::Summary::of(&reports).unreadable;

    if cli.json {
        println!("{}", report::to_json(&reports)?);
    } else if cli.list {
        print!("{}", report::render_list(&reports));
    } else {
        print!("{}", report::render_text(&reports, io::stdout().is_terminal()));
    }

    if unreadable > 0 {
        eprintln!(
            "{} {unreadable} stylesheet(s) could not be read",
            "error:".red().bold()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
