//! CLI logic for the sdcheck timing-constraint checker.
//!
//! This module contains the core CLI logic: configuration loading, checking
//! every requested file with a fresh pipeline, and rendering the results.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::{
    fmt::Write as _,
    fs,
    io::{self, Write as _},
};

use log::{debug, info, warn};
use serde::Serialize;

use sdcheck::{CheckReport, Checker, SdcheckError};

use error_adapter::{ErrorAdapter, to_reportables};

/// A checked file together with its source text.
#[derive(Debug, Clone)]
pub struct CheckedFile {
    pub report: CheckReport,
    pub source: String,
}

/// A file that could not be read. The run continues without it.
#[derive(Debug)]
pub struct UnreadableFile {
    pub file: String,
    pub error: SdcheckError,
}

/// The results of one CLI run.
#[derive(Debug, Default)]
pub struct Outcome {
    pub files: Vec<CheckedFile>,
    pub unreadable: Vec<UnreadableFile>,
}

impl Outcome {
    /// A run passes when every file was read and none has errors.
    pub fn passed(&self) -> bool {
        self.unreadable.is_empty() && self.files.iter().all(|file| file.report.passed())
    }

    /// Errors across all files. An unreadable file counts as one.
    pub fn error_count(&self) -> usize {
        self.unreadable.len()
            + self
                .files
                .iter()
                .map(|file| file.report.errors.len())
                .sum::<usize>()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|file| file.report.warnings.len()).sum()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    passed: bool,
    files: Vec<&'a CheckReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unreadable: Vec<JsonUnreadable<'a>>,
}

#[derive(Serialize)]
struct JsonUnreadable<'a> {
    file: &'a str,
    error: String,
}

/// Check every file named by `args`.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SdcheckError` for:
/// - Configuration loading errors
/// - Unknown diagnostic kinds in `--suppress`
///
/// A file that cannot be read is recorded in [`Outcome::unreadable`] and
/// the remaining files are still checked.
pub fn check_files(args: &Args) -> Result<Outcome, SdcheckError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let options = config::merge_options(app_config.options()?, args.strict, &args.suppress)?;
    debug!(options:?; "Check options");

    let mut checker = Checker::new(options);
    if app_config.has_command_overrides() {
        checker = checker.with_registry(app_config.registry());
    }

    let mut outcome = Outcome::default();
    for file in &args.files {
        match fs::read_to_string(file) {
            Ok(source) => {
                let report = checker.check(file, &source);
                outcome.files.push(CheckedFile { report, source });
            }
            Err(err) => {
                warn!(file = file.as_str(), err:%; "Cannot read file");
                outcome.unreadable.push(UnreadableFile {
                    file: file.clone(),
                    error: err.into(),
                });
            }
        }
    }
    Ok(outcome)
}

/// Render `outcome` in `format`.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn render(outcome: &Outcome, format: OutputFormat) -> Result<String, SdcheckError> {
    match format {
        OutputFormat::Human => Ok(render_human(outcome)),
        OutputFormat::Json => {
            let output = JsonOutput {
                passed: outcome.passed(),
                files: outcome.files.iter().map(|file| &file.report).collect(),
                unreadable: outcome
                    .unreadable
                    .iter()
                    .map(|unreadable| JsonUnreadable {
                        file: &unreadable.file,
                        error: unreadable.error.to_string(),
                    })
                    .collect(),
            };
            serde_json::to_string_pretty(&output)
                .map_err(|err| SdcheckError::Io(io::Error::other(err)))
        }
    }
}

fn render_human(outcome: &Outcome) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut out = String::new();

    for file in &outcome.files {
        for reportable in to_reportables(&file.report, &file.source) {
            // Rendering into a String cannot fail.
            let _ = reporter.render_report(&mut out, &reportable);
        }
        let status = if file.report.passed() { "ok" } else { "FAILED" };
        let _ = writeln!(
            out,
            "{}: {status} ({} errors, {} warnings)",
            file.report.file,
            file.report.errors.len(),
            file.report.warnings.len()
        );
    }

    for unreadable in &outcome.unreadable {
        let _ = reporter.render_report(&mut out, &ErrorAdapter(&unreadable.error));
        let _ = writeln!(out, "{}: FAILED (could not be read)", unreadable.file);
    }

    out
}

/// Run the sdcheck CLI application
///
/// This function checks every input file and prints the results to
/// standard output. It returns whether every file passed.
///
/// # Errors
///
/// Returns `SdcheckError` for configuration and output errors.
pub fn run(args: &Args) -> Result<bool, SdcheckError> {
    info!(files = args.files.len(), strict = args.strict; "Checking files");

    let outcome = check_files(args)?;
    let rendered = render(&outcome, args.format)?;
    io::stdout().write_all(rendered.as_bytes())?;

    info!(
        errors = outcome.error_count(),
        warnings = outcome.warning_count();
        "Check complete"
    );
    Ok(outcome.passed())
}
