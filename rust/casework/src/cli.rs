//! Command-line entry point for test binaries.
//!
//! ```no_run
//! use casework::prelude::*;
//!
//! #[case(suite = "Math")]
//! fn adds() -> CaseResult {
//!     expect_eq!(1 + 1, 2)?;
//!     Ok(())
//! }
//!
//! fn main() {
//!     casework::main()
//! }
//! ```
//!
//! # Exit Codes
//!
//! - 0: every case passed (or `--list`)
//! - 1: at least one case failed or crashed
//! - 2: the harness itself failed (e.g. stdout closed)

use std::fmt;
use std::io::{self, IsTerminal, Write};

use clap::{Parser, ValueEnum};
use facet::Facet;
use tracing_subscriber::EnvFilter;

use crate::console::{self, ConsoleObserver};
use crate::registry::{self, CaseRegistry};
use crate::report::{CaseOutcome, RunReport};
use crate::runner;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "casework")]
#[command(about = "Run the test cases registered in this binary")]
pub struct HarnessArgs {
    /// List suites and cases without running them
    #[arg(long)]
    pub list: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Error type for the command-line harness
#[derive(Debug)]
pub enum CliError {
    /// Writing to stdout failed
    Io(io::Error),
    /// Serializing the JSON document failed
    Json(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(err) => write!(f, "failed to write output: {err}"),
            CliError::Json(msg) => write!(f, "failed to serialize JSON: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            CliError::Json(_) => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err)
    }
}

/// JSON output for one suite in a listing.
#[derive(Facet)]
struct SuiteJson {
    suite: String,
    cases: Vec<String>,
}

/// JSON output for one case result.
#[derive(Facet)]
struct OutcomeJson {
    suite: String,
    name: String,
    status: String,
    message: Option<String>,
    duration_ms: f64,
}

/// JSON output for a whole run.
#[derive(Facet)]
struct ReportJson {
    success: bool,
    total: u64,
    passed: u64,
    soft_failed: u64,
    hard_failed: u64,
    crashed: u64,
    duration_ms: f64,
    outcomes: Vec<OutcomeJson>,
}

fn millis(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl From<&CaseOutcome> for OutcomeJson {
    fn from(outcome: &CaseOutcome) -> Self {
        Self {
            suite: outcome.suite.clone(),
            name: outcome.name.clone(),
            status: outcome.status.label().to_ascii_lowercase(),
            message: outcome.status.message().map(str::to_string),
            duration_ms: millis(outcome.duration),
        }
    }
}

/// Render a report as a single JSON document.
pub fn report_json(report: &RunReport) -> Result<String, CliError> {
    let counts = report.counts();
    let output = ReportJson {
        success: report.is_success(),
        total: counts.total as u64,
        passed: counts.passed as u64,
        soft_failed: counts.soft_failed as u64,
        hard_failed: counts.hard_failed as u64,
        crashed: counts.crashed as u64,
        duration_ms: millis(report.duration()),
        outcomes: report.outcomes().iter().map(OutcomeJson::from).collect(),
    };
    facet_json::to_string(&output).map_err(|e| CliError::Json(e.to_string()))
}

/// Render a registry listing as a single JSON document.
pub fn listing_json(registry: &CaseRegistry) -> Result<String, CliError> {
    let output: Vec<SuiteJson> = registry
        .suites()
        .map(|suite| SuiteJson {
            suite: suite.name.to_string(),
            cases: suite.cases.iter().map(|c| c.name().to_string()).collect(),
        })
        .collect();
    facet_json::to_string(&output).map_err(|e| CliError::Json(e.to_string()))
}

/// Initialize tracing: stderr, no timestamps, `RUST_LOG` or `warn`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Execute the harness with already-parsed arguments, writing to `out`.
///
/// Returns the process exit status.
pub fn run(args: &HarnessArgs, out: &mut impl Write) -> Result<u8, CliError> {
    if args.list {
        let registry = registry::all_suites();
        match args.format {
            Format::Text => console::write_listing(out, &registry)?,
            Format::Json => writeln!(out, "{}", listing_json(&registry)?)?,
        }
        return Ok(0);
    }

    let report = match args.format {
        Format::Text => {
            let mut observer = ConsoleObserver::new(&mut *out, !args.no_color);
            let report = runner::run_all_with(&mut observer);
            observer.finish()?;
            report
        }
        Format::Json => {
            let report = runner::run_all();
            writeln!(out, "{}", report_json(&report)?)?;
            report
        }
    };
    out.flush()?;
    Ok(report.exit_code())
}

/// Parse the command line, run every registered case and exit.
pub fn main() -> ! {
    init_tracing();
    let mut args = HarnessArgs::parse();
    if !io::stdout().is_terminal() {
        args.no_color = true;
    }

    let code = match run(&args, &mut io::stdout().lock()) {
        Ok(code) => i32::from(code),
        Err(err) => {
            eprintln!("casework: {err}");
            2
        }
    };
    std::process::exit(code)
}
