use std::{borrow::Cow, fmt};

use winnow::stream::Location;

use crate::span::{Position, Span};

/// Token types for SDC source text.
///
/// Whitespace and comments never produce tokens. Newlines and semicolons
/// do, since they terminate commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    /// The first word after a command separator.
    Command(&'src str),
    /// A `-name` flag, including the leading dash.
    Flag(&'src str),
    /// A bare word, a `"quoted"` string with escapes translated, the
    /// verbatim content of a `{braced}` list, or a `[bracketed]`
    /// sub-expression including its brackets.
    Str(Cow<'src, str>),
    /// A numeric literal with an optional sign and unit suffix, as written.
    Number(&'src str),
    /// A `$name` or `${name}` reference; holds the name only.
    Variable(&'src str),

    /// A `}` without a matching `{`.
    ListEnd,
    /// A `]` without a matching `[`.
    BracketEnd,

    Semicolon,
    Newline,
    Eof,

    /// An unclosed delimiter, reported at end of input.
    Error(&'static str),
}

impl Token<'_> {
    /// Returns `true` for tokens that end a command.
    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Semicolon | Token::Newline | Token::Eof)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Command(name) => write!(f, "{name}"),
            Token::Flag(flag) => write!(f, "{flag}"),
            Token::Str(s) => write!(f, "{s}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Variable(name) => write!(f, "${name}"),
            Token::ListEnd => write!(f, "}}"),
            Token::BracketEnd => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
            Token::Newline => write!(f, "\\n"),
            Token::Eof => write!(f, "<eof>"),
            Token::Error(message) => write!(f, "<error: {message}>"),
        }
    }
}

/// A token with its byte span and 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    pub position: Position,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, position: Position) -> Self {
        Self {
            token,
            span,
            position,
        }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.token, self.position)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}
