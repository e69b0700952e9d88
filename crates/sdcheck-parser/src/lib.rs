//! # sdcheck parser
//!
//! Tokenizer and command parser for SDC timing-constraint files. This crate
//! turns source text into an ordered list of [`ParsedCommand`]s and owns
//! the diagnostic types shared by every later stage.
//!
//! ## Usage
//!
//! ```
//! # use sdcheck_core::Registry;
//! # use sdcheck_parser::parse;
//!
//! let source = "create_clock -name clk -period 10 [get_ports clk]\n";
//! let parsed = parse(source, Registry::builtin());
//!
//! assert!(parsed.diagnostics.is_empty());
//! assert_eq!(parsed.commands[0].name(), "create_clock");
//! ```

pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use error::{Diagnostic, DiagnosticKind, Severity};
pub use lexer::{TokenStream, tokenize};
pub use parser::parse_tokens;
pub use parser_types::{Argument, ParsedCommand};
pub use span::{LineIndex, Position, Span, Spanned};
pub use tokens::{PositionedToken, Token};

use log::debug;

use sdcheck_core::Registry;

/// The result of [`parse`].
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub commands: Vec<ParsedCommand>,
    /// Tokenizer diagnostics. Commands are only produced when no
    /// delimiter was left open at end of input.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse source text into commands.
///
/// This runs the two syntactic stages:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Group tokens into commands, using `registry` to decide
///    which flags take values
///
/// A stray closer is reported and otherwise skipped. A delimiter left open
/// at end of input swallows the rest of the file, so the token stream is
/// not trustworthy and no commands are returned.
pub fn parse(source: &str, registry: &Registry) -> Parsed {
    let stream = tokenize(source);
    if stream.has_unclosed() {
        debug!(
            diagnostics = stream.diagnostics.len();
            "Unclosed delimiter at end of input, skipping command parsing"
        );
        return Parsed {
            commands: Vec::new(),
            diagnostics: stream.diagnostics,
        };
    }

    let commands = parse_tokens(&stream.tokens, registry);
    Parsed {
        commands,
        diagnostics: stream.diagnostics,
    }
}
