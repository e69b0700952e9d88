//! Error and diagnostic system for sdcheck.
//!
//! This module provides:
//! - A closed set of diagnostic kinds with stable machine-readable names
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - A diagnostic collector that accumulates every finding of a file check
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with a [`DiagnosticKind`], one or more source
//! locations, and an optional fix suggestion. Nothing in the pipeline aborts
//! on a diagnostic; they are accumulated by a [`DiagnosticCollector`] and
//! handed back to the caller as data.
//!
//! # Example
//!
//! ```
//! # use sdcheck_parser::error::{Diagnostic, DiagnosticKind};
//! # use sdcheck_parser::Span;
//!
//! let span = Span::new(100..120);
//! let original_span = Span::new(50..70);
//!
//! let diag = Diagnostic::new(DiagnosticKind::DuplicateClock, "clock `clk` is defined multiple times")
//!     .with_label(span, "duplicate definition")
//!     .with_secondary_label(original_span, "first defined here")
//!     .with_help("remove the duplicate or use a different name");
//! ```

mod collector;
mod diagnostic;
mod kind;
mod label;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use kind::{DiagnosticKind, UnknownKind};
pub use label::Label;
pub use severity::Severity;
