//! Configuration types for sdcheck.
//!
//! This module provides the run options of a check and the configuration
//! file structure they are usually loaded from. All file-facing types
//! implement [`serde::Deserialize`].
//!
//! # Overview
//!
//! - [`CheckOptions`] - Strict mode and the set of suppressed warning kinds.
//! - [`AppConfig`] - Top-level configuration: a `[check]` table and extra
//!   `[[commands]]` specs for the command registry.
//!
//! # Example
//!
//! ```
//! # use sdcheck::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! let options = config.options().unwrap();
//! assert!(!options.strict());
//! ```

use std::collections::HashSet;

use serde::Deserialize;

use sdcheck_core::{CommandSpec, Registry};
use sdcheck_parser::DiagnosticKind;

use crate::SdcheckError;

/// Options for one check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOptions {
    strict: bool,
    suppress: HashSet<DiagnosticKind>,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable strict-mode advisories.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Suppress warnings of `kind`. Suppressing an error kind has no effect.
    pub fn with_suppressed(mut self, kind: DiagnosticKind) -> Self {
        self.suppress.insert(kind);
        self
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn suppressed(&self) -> &HashSet<DiagnosticKind> {
        &self.suppress
    }

    pub fn is_suppressed(&self, kind: DiagnosticKind) -> bool {
        kind.severity().is_warning() && self.suppress.contains(&kind)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Check options section.
    #[serde(default)]
    check: CheckConfig,

    /// Extra command specs, added to or replacing built-in ones by name.
    #[serde(default)]
    commands: Vec<CommandSpec>,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from a check section and extra commands.
    pub fn new(check: CheckConfig, commands: Vec<CommandSpec>) -> Self {
        Self { check, commands }
    }

    /// Returns the check configuration.
    pub fn check(&self) -> &CheckConfig {
        &self.check
    }

    /// Returns the extra command specs.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Build run options from the `[check]` section.
    ///
    /// # Errors
    ///
    /// Returns [`SdcheckError::Config`] if a suppressed kind name is not a
    /// known diagnostic kind.
    pub fn options(&self) -> Result<CheckOptions, SdcheckError> {
        let mut options = CheckOptions::new().with_strict(self.check.strict);
        for name in &self.check.suppress {
            options = options.with_suppressed(name.parse()?);
        }
        Ok(options)
    }

    /// The built-in registry extended with the configured commands.
    pub fn registry(&self) -> Registry {
        Registry::builtin().with_overrides(self.commands.iter().cloned())
    }

    /// Returns `true` if the configuration changes the built-in registry.
    pub fn has_command_overrides(&self) -> bool {
        !self.commands.is_empty()
    }
}

/// The `[check]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckConfig {
    /// Enable strict-mode advisories.
    #[serde(default)]
    strict: bool,

    /// Warning kinds to suppress, by name.
    #[serde(default)]
    suppress: Vec<String>,
}

impl CheckConfig {
    /// Creates a new [`CheckConfig`].
    pub fn new(strict: bool, suppress: Vec<String>) -> Self {
        Self { strict, suppress }
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn suppress(&self) -> &[String] {
        &self.suppress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        let options = config.options().unwrap();
        assert!(!options.strict());
        assert!(options.suppressed().is_empty());
        assert!(!config.has_command_overrides());
    }

    #[test]
    fn test_load_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [check]
            strict = true
            suppress = ["negative_delay", "zero_period"]

            [[commands]]
            name = "vendor_set_margin"
            min_positional = 1
            max_positional = 1

            [[commands.args]]
            name = "-corner"
            kind = "key_value"
            required = true
            "#,
        )
        .unwrap();

        let options = config.options().unwrap();
        assert!(options.strict());
        assert!(options.is_suppressed(DiagnosticKind::NegativeDelay));
        assert!(options.is_suppressed(DiagnosticKind::ZeroPeriod));
        assert!(!options.is_suppressed(DiagnosticKind::LargeUncertainty));

        let registry = config.registry();
        let spec = registry.get("vendor_set_margin").unwrap();
        assert_eq!(spec.max_positional(), Some(1));
        assert!(registry.contains("create_clock"));
    }

    #[test]
    fn test_unknown_suppressed_kind() {
        let config = AppConfig::new(
            CheckConfig::new(false, vec!["not_a_kind".to_string()]),
            Vec::new(),
        );
        let err = config.options().unwrap_err();
        assert!(matches!(err, SdcheckError::Config(_)));
        assert!(err.to_string().contains("not_a_kind"));
    }

    #[test]
    fn test_errors_are_never_suppressed() {
        let options = CheckOptions::new().with_suppressed(DiagnosticKind::UndefinedClock);
        assert!(!options.is_suppressed(DiagnosticKind::UndefinedClock));
    }
}
