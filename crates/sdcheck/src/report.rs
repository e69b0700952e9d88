//! Check results.
//!
//! A [`CheckReport`] is the outcome of checking one file: the errors and
//! warnings found, each as a [`Finding`] with a 1-based line and column and
//! a stable kind name. Reports serialize to JSON for repair tooling; the
//! underlying [`Diagnostic`]s are kept alongside for rich rendering.

use serde::{Serialize, Serializer};

use sdcheck_parser::{Diagnostic, DiagnosticKind, LineIndex, Severity};

/// One error or warning, located in its file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: String,
    pub line: usize,
    pub column: usize,
    #[serde(serialize_with = "serialize_display")]
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(serialize_with = "serialize_display")]
    pub severity: Severity,
}

impl Finding {
    /// Locate `diagnostic` in the file indexed by `index`.
    ///
    /// Diagnostics without a span are placed at the start of the file.
    pub fn from_diagnostic(file: &str, diagnostic: &Diagnostic, index: &LineIndex<'_>) -> Self {
        let position = diagnostic
            .primary_span()
            .map(|span| index.position(span.start()))
            .unwrap_or_default();
        Self {
            file: file.to_string(),
            line: position.line,
            column: position.column,
            kind: diagnostic.kind(),
            message: diagnostic.message().to_string(),
            suggestion: diagnostic.help().map(str::to_string),
            severity: diagnostic.severity(),
        }
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

/// The outcome of checking one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub file: String,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    /// Every kept diagnostic in emission order, with spans and labels.
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    /// Build a report from the diagnostics of one file.
    pub fn new(file: &str, source: &str, diagnostics: Vec<Diagnostic>) -> Self {
        let index = LineIndex::new(source);
        let (errors, warnings): (Vec<_>, Vec<_>) = diagnostics
            .iter()
            .map(|diagnostic| Finding::from_diagnostic(file, diagnostic, &index))
            .partition(|finding| finding.severity.is_error());

        Self {
            file: file.to_string(),
            errors,
            warnings,
            diagnostics,
        }
    }

    /// A file passes when it has no errors, whatever its warnings.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every finding, errors first.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.errors.iter().chain(&self.warnings)
    }

    /// Number of findings of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.findings().filter(|finding| finding.kind == kind).count()
    }
}
