//! Collector for accumulating diagnostics during a file check.
//!
//! The [`DiagnosticCollector`] lets every phase report multiple errors
//! and warnings instead of stopping at the first one.

use std::collections::HashSet;

use crate::error::{Diagnostic, DiagnosticKind};

/// A collector for accumulating diagnostics.
///
/// Warnings whose kind is in the suppression set are dropped on emit.
/// Errors are always kept.
///
/// # Example
///
/// ```
/// # use sdcheck_parser::error::{Diagnostic, DiagnosticCollector, DiagnosticKind};
/// # use sdcheck_parser::Span;
///
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(
///     Diagnostic::new(DiagnosticKind::UndefinedClock, "clock `foo` is not defined")
///         .with_label(Span::new(0..10), "not found"),
/// );
/// collector.emit(
///     Diagnostic::new(DiagnosticKind::NegativeDelay, "negative input delay")
///         .with_label(Span::new(20..30), "here"),
/// );
///
/// assert!(collector.has_errors());
/// assert_eq!(collector.finish().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    suppressed: HashSet<DiagnosticKind>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector that drops warnings of the given kinds.
    pub fn with_suppressed(suppressed: HashSet<DiagnosticKind>) -> Self {
        Self {
            suppressed,
            ..Self::default()
        }
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        let severity = diagnostic.severity();
        if severity.is_warning() && self.suppressed.contains(&diagnostic.kind()) {
            return;
        }
        if severity.is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Emit every diagnostic from an iterator.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    /// Returns `true` if at least one error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// The diagnostics emitted so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Finish collection and return every kept diagnostic in emission order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
