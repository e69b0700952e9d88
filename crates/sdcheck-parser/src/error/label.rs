//! Labeled source spans for diagnostic messages.
//!
//! A label associates a message with a span in the source code,
//! providing context for where an error or warning occurred.

use crate::span::Span;

/// A labeled span in source code.
///
/// # Primary vs Secondary Labels
///
/// - **Primary labels** mark the main location of an error or warning. The
///   first primary label determines the line and column reported for the
///   diagnostic.
/// - **Secondary labels** provide additional context, such as "first defined
///   here" for a duplicate clock.
///
/// # Example
///
/// ```text
/// error[duplicate_clock]: clock `clk` is already defined
///   --> top.sdc:10:1
///    |
/// 10 | create_clock -name clk -period 5 [get_ports b]
///    | ^^^^^^^^^^^^ duplicate definition
///    |
///   --> top.sdc:2:1
///    |
///  2 | create_clock -name clk -period 10 [get_ports a]
///    | ------------ first defined here
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
