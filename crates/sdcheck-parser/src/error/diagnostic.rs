//! The core diagnostic type for the sdcheck error system.
//!
//! A [`Diagnostic`] represents a single error or warning with a kind,
//! labeled source spans, and an optional fix suggestion.

use std::fmt;

use crate::{
    error::{DiagnosticKind, Label, Severity},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// Diagnostics provide:
/// - A [`DiagnosticKind`] from a closed set, which also fixes the severity
/// - A primary message describing the issue
/// - One or more labeled source spans
/// - Optional help text suggesting a fix
///
/// # Example
///
/// ```text
/// error[undefined_clock]: generated clock source `sys_clk` is not a defined clock
///   --> top.sdc:4:37
///    |
///  4 | create_generated_clock -source sys_clk -divide_by 2 div2
///    |                                ^^^^^^^ not defined
///    |
///    = help: define `sys_clk` with create_clock before this command
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic of the given kind.
    ///
    /// # Example
    ///
    /// ```
    /// # use sdcheck_parser::error::{Diagnostic, DiagnosticKind};
    /// # use sdcheck_parser::Span;
    ///
    /// let diag = Diagnostic::new(DiagnosticKind::UnknownCommand, "unknown command `create_clk`")
    ///     .with_label(Span::new(0..10), "not a known SDC command")
    ///     .with_help("did you mean `create_clock`?");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Get the diagnostic kind.
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[unknown_command]: message"
        write!(f, "{}[{}]: {}", self.severity(), self.kind, self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(DiagnosticKind::UnknownCommand, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.kind(), DiagnosticKind::UnknownCommand);
        assert_eq!(diag.message(), "test error");
        assert!(diag.labels().is_empty());
        assert!(diag.primary_span().is_none());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_warning_kind_has_warning_severity() {
        let diag = Diagnostic::new(DiagnosticKind::NegativeDelay, "negative input delay");
        assert!(diag.severity().is_warning());
    }

    #[test]
    fn test_primary_span_skips_secondary_labels() {
        let diag = Diagnostic::new(DiagnosticKind::DuplicateClock, "duplicate")
            .with_secondary_label(Span::new(5..15), "first defined here")
            .with_label(Span::new(10..20), "duplicate here");

        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(10..20)));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(DiagnosticKind::UndefinedVariable, "undefined variable `$clk`");
        assert_eq!(
            diag.to_string(),
            "error[undefined_variable]: undefined variable `$clk`"
        );

        let diag = Diagnostic::new(DiagnosticKind::ZeroPeriod, "clock has zero period");
        assert_eq!(diag.to_string(), "warning[zero_period]: clock has zero period");
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::new(DiagnosticKind::DuplicateClock, "clock `clk` is defined twice")
            .with_label(Span::new(100..120), "duplicate definition")
            .with_secondary_label(Span::new(50..70), "first defined here")
            .with_help("remove the duplicate or use a different name");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(
            diag.help(),
            Some("remove the duplicate or use a different name")
        );
    }
}
