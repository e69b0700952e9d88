//! sdcheck - A checker for SDC timing-constraint files.
//!
//! Tokenizing, parsing, variable resolution and semantic validation of SDC
//! files, producing line/column-precise findings suitable for automated
//! repair loops as well as human review.

pub mod config;
pub mod design;
pub mod objects;
pub mod validators;
pub mod variables;

mod checker;
mod error;
mod report;

pub use sdcheck_core::{ArgKind, ArgSpec, CommandSpec, Registry, Validator};
pub use sdcheck_parser::{Diagnostic, DiagnosticKind, LineIndex, Position, Severity, Span};

pub use error::SdcheckError;
pub use report::{CheckReport, Finding};

use std::{borrow::Cow, fs, path::Path};

use log::{debug, info};

use checker::FileChecker;
use config::{AppConfig, CheckOptions};

/// Checks SDC files against a command registry.
///
/// A checker holds only immutable configuration. Each call to
/// [`check`](Checker::check) builds a fresh pipeline, so one checker can be
/// shared between files and threads.
///
/// # Examples
///
/// ```rust
/// use sdcheck::{Checker, config::CheckOptions};
///
/// let checker = Checker::new(CheckOptions::new());
/// let report = checker.check("top.sdc", "create_clock -period 10.0 clk\n");
/// assert!(report.passed());
///
/// let report = checker.check("top.sdc", "create_clock clk\n");
/// assert!(!report.passed());
/// assert_eq!(report.errors[0].kind.as_str(), "missing_required_arg");
/// ```
#[derive(Debug, Clone)]
pub struct Checker {
    registry: Cow<'static, Registry>,
    options: CheckOptions,
}

impl Checker {
    /// Create a checker with the built-in command registry.
    ///
    /// # Arguments
    ///
    /// * `options` - Strict mode and suppressed warning kinds
    pub fn new(options: CheckOptions) -> Self {
        Self {
            registry: Cow::Borrowed(Registry::builtin()),
            options,
        }
    }

    /// Create a checker from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SdcheckError::Config`] if the configuration names an
    /// unknown diagnostic kind.
    pub fn from_config(config: &AppConfig) -> Result<Self, SdcheckError> {
        let options = config.options()?;
        let checker = Self::new(options);
        if !config.has_command_overrides() {
            return Ok(checker);
        }
        debug!(commands = config.commands().len(); "Applying command overrides");
        Ok(checker.with_registry(config.registry()))
    }

    /// Use `registry` instead of the built-in command table.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Cow::Owned(registry);
        self
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Check the content of one file.
    ///
    /// `file` identifies the file in the findings; it is not read.
    pub fn check(&self, file: &str, content: &str) -> CheckReport {
        info!(file, strict = self.options.strict(); "Checking file");

        let parsed = sdcheck_parser::parse(content, &self.registry);
        debug!(commands = parsed.commands.len(); "File parsed");

        let diagnostics = FileChecker::new(&self.registry, &self.options).run(parsed);
        let report = CheckReport::new(file, content, diagnostics);

        info!(
            file,
            errors = report.errors.len(),
            warnings = report.warnings.len();
            "Check finished"
        );
        report
    }

    /// Read and check the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SdcheckError::Io`] if the file cannot be read.
    pub fn check_file(&self, path: impl AsRef<Path>) -> Result<CheckReport, SdcheckError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Ok(self.check(&path.display().to_string(), &content))
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(CheckOptions::default())
    }
}

/// Check one file with the built-in command registry.
///
/// This is a shorthand for [`Checker::new`] followed by [`Checker::check`].
pub fn check(file: &str, content: &str, options: &CheckOptions) -> CheckReport {
    Checker::new(options.clone()).check(file, content)
}
