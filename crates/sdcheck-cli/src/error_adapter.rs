//! Adapters for rendering sdcheck diagnostics and errors with miette.
//!
//! This module provides the bridge between the library's plain diagnostic
//! and error types and miette's rich report formatting used in the CLI.
//! Each [`Diagnostic`] of a [`CheckReport`] is rendered independently,
//! with the file name and source snippet attached.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, SourceSpan,
    Severity as MietteSeverity,
};

use sdcheck::{CheckReport, SdcheckError, Severity};
use sdcheck_parser::{Diagnostic, Span};

/// Adapter for a single sdcheck diagnostic.
///
/// This adapter wraps a single [`Diagnostic`] and implements
/// [`MietteDiagnostic`] to enable rich formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// The checked file, for displaying snippets
    src: NamedSource<String>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter for a diagnostic of `file`.
    pub fn new(diag: &'a Diagnostic, file: &str, src: &str) -> Self {
        Self {
            diag,
            src: NamedSource::new(file, src.to_string()),
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diag.kind()))
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`SdcheckError`], which has no source location.
pub struct ErrorAdapter<'a>(pub &'a SdcheckError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SdcheckError::Io(_) => "sdcheck::io",
            SdcheckError::Config(_) => "sdcheck::config",
        };
        Some(Box::new(code))
    }
}

/// Convert an sdcheck [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// One adapter per diagnostic of `report`, in report order.
///
/// # Arguments
///
/// * `report` - The check result
/// * `src` - The checked source text the report's spans point into
pub fn to_reportables<'a>(report: &'a CheckReport, src: &str) -> Vec<DiagnosticAdapter<'a>> {
    report
        .diagnostics
        .iter()
        .map(|diag| DiagnosticAdapter::new(diag, &report.file, src))
        .collect()
}
