//! Lexical analyzer for SDC source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! It follows TCL quoting rules: `"..."` strings translate escapes, `{...}`
//! lists are taken verbatim with nesting, and `[...]` sub-expressions are
//! kept whole, brackets included, since they are never evaluated.
//!
//! The public entry point is [`tokenize`]. Tokenization is total: every
//! input produces a stream ending in [`Token::Eof`], and delimiter problems
//! are reported as diagnostics rather than aborting the scan.

use std::borrow::Cow;

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::{digit0, digit1},
    combinator::{alt, delimited, opt, preceded},
    error::ModalResult,
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, DiagnosticKind},
    span::{LineIndex, Span},
    tokens::{PositionedToken, Token},
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Brace,
    Bracket,
    Quote,
}

/// One scanned piece of source, before command/string classification.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme<'a> {
    /// Whitespace, a line continuation, or a comment.
    Blank,
    Newline,
    Semicolon,
    Word(&'a str),
    Number(&'a str),
    Flag(&'a str),
    Variable(&'a str),
    /// Quoted, braced or bracketed text.
    Text(Cow<'a, str>),
    /// An opener whose closer never came; the scan consumed the rest of
    /// the input. Lists every delimiter kind left open.
    Unclosed(Vec<Unclosed>),
    StrayClose(Delimiter),
}

/// A delimiter kind still open at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unclosed {
    delimiter: Delimiter,
    /// Number of closers missing.
    missing: usize,
    /// Offset of the outermost unclosed opener from the start of the lexeme.
    opener: usize,
}

impl Unclosed {
    fn new(delimiter: Delimiter, missing: usize, opener: usize) -> Self {
        Self {
            delimiter,
            missing,
            opener,
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic()
        || matches!(
            c,
            '_' | '/'
                | '.'
                | '*'
                | '?'
                | ':'
                | '|'
                | '@'
                | '^'
                | '!'
                | '+'
                | ','
                | '='
                | '<'
                | '>'
                | '%'
                | '~'
                | '&'
                | '\''
                | '('
                | ')'
                | '#'
        )
}

fn is_word_continue(c: char) -> bool {
    c.is_alphanumeric() || is_word_start(c) || matches!(c, '-' | '$' | '[' | ']')
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The unconsumed rest of the input.
fn remaining<'a>(input: &Input<'a>) -> &'a str {
    **input
}

/// Find the closer that balances an already consumed opener.
///
/// A backslash escapes the following character. Returns the byte offset of
/// the closer, or the number of closers still missing when `text` ends.
fn scan_balanced(text: &str, open: char, close: char) -> Result<usize, usize> {
    let mut depth = 1;
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Ok(i);
            }
        }
    }
    Err(depth)
}

/// Find the `]` that balances an already consumed `[`.
///
/// Braces inside the sub-expression quote their content, so brackets
/// between them do not count. Returns the byte offset of the closer, or
/// every delimiter kind still open when `text` ends, with opener offsets
/// relative to the `[`.
fn scan_bracketed(text: &str) -> Result<usize, Vec<Unclosed>> {
    let mut brackets = 1;
    let mut braces = 0;
    let mut brace_opener = 0;
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => {
                if braces == 0 {
                    brace_opener = i;
                }
                braces += 1;
            }
            '}' if braces > 0 => braces -= 1,
            '[' if braces == 0 => brackets += 1,
            ']' if braces == 0 => {
                brackets -= 1;
                if brackets == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    let mut open = Vec::new();
    if braces > 0 {
        open.push(Unclosed::new(Delimiter::Brace, braces, brace_opener + 1));
    }
    open.push(Unclosed::new(Delimiter::Bracket, brackets, 0));
    Err(open)
}

/// Parse whitespace or a backslash-newline continuation.
fn blank<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    alt((
        take_while(1.., |c: char| c.is_whitespace() && c != '\n').void(),
        literal("\\\n").void(),
        literal("\\\r\n").void(),
    ))
    .value(Lexeme::Blank)
    .parse_next(input)
}

/// Parse a `#` comment. Only valid where a command could start; anywhere
/// else `#` is an ordinary word character.
fn comment<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    ('#', take_while(0.., |c: char| c != '\n'))
        .value(Lexeme::Blank)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    '\n'.value(Lexeme::Newline).parse_next(input)
}

fn semicolon<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    ';'.value(Lexeme::Semicolon).parse_next(input)
}

/// Parse a `"..."` string, translating escapes.
///
/// The value borrows from the source unless an escape had to be rewritten.
fn quoted<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    '"'.parse_next(input)?;
    let rest = remaining(input);

    let mut owned: Option<String> = None;
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                input.next_slice(i + 1);
                let text = match owned {
                    Some(value) => Cow::Owned(value),
                    None => Cow::Borrowed(&rest[..i]),
                };
                return Ok(Lexeme::Text(text));
            }
            '\\' => {
                let value = owned.get_or_insert_with(|| rest[..i].to_string());
                match chars.next().map(|(_, escaped)| escaped) {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\n') => {
                        // Continuation: the newline and the next line's
                        // indentation collapse into one space.
                        value.push(' ');
                        while matches!(chars.clone().next(), Some((_, ' ' | '\t'))) {
                            chars.next();
                        }
                    }
                    // `\$` stays escaped until variables are substituted.
                    Some('$') => value.push_str("\\$"),
                    Some(escaped @ ('\\' | '"' | '[' | ']' | '{' | '}' | ';')) => {
                        value.push(escaped)
                    }
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => value.push('\\'),
                }
            }
            _ => {
                if let Some(value) = owned.as_mut() {
                    value.push(c);
                }
            }
        }
    }

    input.next_slice(rest.len());
    Ok(Lexeme::Unclosed(vec![Unclosed::new(Delimiter::Quote, 1, 0)]))
}

/// Parse a `{...}` list. The content is kept verbatim, nested braces included.
fn braced<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    '{'.parse_next(input)?;
    let rest = remaining(input);

    match scan_balanced(rest, '{', '}') {
        Ok(end) => {
            input.next_slice(end + 1);
            Ok(Lexeme::Text(Cow::Borrowed(&rest[..end])))
        }
        Err(missing) => {
            input.next_slice(rest.len());
            Ok(Lexeme::Unclosed(vec![Unclosed::new(
                Delimiter::Brace,
                missing,
                0,
            )]))
        }
    }
}

/// Parse a `[...]` sub-expression. The value keeps its brackets.
fn bracketed<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    let rest = remaining(input);
    '['.parse_next(input)?;

    match scan_bracketed(&rest[1..]) {
        Ok(end) => {
            input.next_slice(end + 1);
            Ok(Lexeme::Text(Cow::Borrowed(&rest[..end + 2])))
        }
        Err(open) => {
            input.next_slice(rest.len() - 1);
            Ok(Lexeme::Unclosed(open))
        }
    }
}

/// Parse `$name` or `${name}`.
///
/// A reference glued to more word characters (`${prefix}_clk`) is a word,
/// left for variable substitution to expand.
fn variable<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    let ((name, tail), text) = (
        preceded(
            '$',
            alt((
                delimited('{', take_while(1.., |c: char| c != '}' && c != '\n'), '}'),
                take_while(1.., is_name_char),
            )),
        ),
        take_while(0.., is_word_continue),
    )
        .with_taken()
        .parse_next(input)?;

    Ok(if tail.is_empty() {
        Lexeme::Variable(name)
    } else {
        Lexeme::Word(text)
    })
}

/// Parse the text of a numeric literal: an optional sign, digits with at
/// most one decimal point, an optional exponent, and a unit suffix.
fn number_text<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        opt('-'),
        alt((
            (digit1, opt(('.', digit0))).void(),
            ('.', digit1).void(),
        )),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
        take_while(0.., |c: char| c.is_ascii_alphabetic()),
    )
        .take()
        .parse_next(input)
}

/// Parse a number such as `10`, `-0.5`, `1e-3` or `10.5ns`.
///
/// Text that starts like a number but continues with other word
/// characters (`10.0.1`, `2x_clk`) is a word.
fn number<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    let ((number, tail), text) = (number_text, take_while(0.., is_word_continue))
        .with_taken()
        .parse_next(input)?;

    Ok(if tail.is_empty() {
        Lexeme::Number(number)
    } else {
        Lexeme::Word(text)
    })
}

/// Parse a `-flag`. Must come after [`number`] so `-5` stays numeric.
fn flag<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    ('-', take_while(0.., is_word_continue))
        .take()
        .map(Lexeme::Flag)
        .parse_next(input)
}

fn word<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    (one_of(is_word_start), take_while(0.., is_word_continue))
        .take()
        .map(Lexeme::Word)
        .parse_next(input)
}

fn stray_close<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    alt((
        '}'.value(Lexeme::StrayClose(Delimiter::Brace)),
        ']'.value(Lexeme::StrayClose(Delimiter::Bracket)),
    ))
    .parse_next(input)
}

fn lexeme<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    alt((
        blank,
        newline,
        semicolon,
        quoted,
        braced,
        bracketed,
        variable,
        number, // Must come before flag
        flag,
        word,
        stray_close,
    ))
    .parse_next(input)
}

/// The output of [`tokenize`].
#[derive(Debug, Clone)]
pub struct TokenStream<'src> {
    /// Tokens in source order; the last one is always [`Token::Eof`].
    pub tokens: Vec<PositionedToken<'src>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TokenStream<'_> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity().is_error())
    }

    /// Returns `true` if a delimiter was still open at end of input. The
    /// scan then swallowed everything after the opener, so the tokens no
    /// longer describe the file's commands.
    pub fn has_unclosed(&self) -> bool {
        self.tokens
            .iter()
            .any(|token| matches!(token.token, Token::Error(_)))
    }
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token<'a>, Span)>,
    diagnostics: DiagnosticCollector,
    /// Whether the next word is the first one since a separator.
    command_start: bool,
    /// Delimiters left open at end of input, with their opener spans.
    open: Vec<(Unclosed, Span)>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
            command_start: true,
            open: Vec::new(),
        }
    }

    /// Tokenize the input. Characters no token can start with are skipped.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let start = input.current_token_start();
            let scanned = if self.command_start {
                alt((comment, lexeme)).parse_next(&mut input)
            } else {
                lexeme(&mut input)
            };
            match scanned {
                Ok(lexeme) => {
                    let span = Span::new(start..input.current_token_start());
                    self.push_lexeme(lexeme, span);
                }
                Err(_) => {
                    debug!(offset = start; "Skipping unexpected character");
                    input.next_token();
                }
            }
        }
    }

    fn push_lexeme(&mut self, lexeme: Lexeme<'a>, span: Span) {
        let token = match lexeme {
            Lexeme::Blank => return,
            Lexeme::Newline => Token::Newline,
            Lexeme::Semicolon => Token::Semicolon,
            Lexeme::Word(word) if self.command_start => Token::Command(word),
            Lexeme::Word(word) => Token::Str(Cow::Borrowed(word)),
            Lexeme::Number(number) => Token::Number(number),
            Lexeme::Flag(flag) => Token::Flag(flag),
            Lexeme::Variable(name) => Token::Variable(name),
            Lexeme::Text(text) => Token::Str(text),
            Lexeme::Unclosed(open) => {
                for unclosed in open {
                    let at = span.start() + unclosed.opener;
                    self.open.push((unclosed, Span::new(at..at + 1)));
                }
                return;
            }
            Lexeme::StrayClose(delimiter) => {
                self.diagnostics.emit(stray_close_diagnostic(delimiter, span));
                match delimiter {
                    Delimiter::Bracket => Token::BracketEnd,
                    Delimiter::Brace | Delimiter::Quote => Token::ListEnd,
                }
            }
        };
        self.command_start = token.is_separator();
        self.tokens.push((token, span));
    }

    /// Report unclosed delimiters, terminate the stream and resolve positions.
    fn finish(mut self) -> TokenStream<'a> {
        let end = Span::new(self.source.len()..self.source.len());

        for (unclosed, opener) in std::mem::take(&mut self.open) {
            let missing = unclosed.missing;
            let (kind, token, message) = match unclosed.delimiter {
                Delimiter::Brace => (
                    DiagnosticKind::UnmatchedBrace,
                    "unclosed brace",
                    format!("missing {missing} closing {}", plural(missing, "brace")),
                ),
                Delimiter::Bracket => (
                    DiagnosticKind::UnmatchedBracket,
                    "unclosed bracket",
                    format!("missing {missing} closing {}", plural(missing, "bracket")),
                ),
                Delimiter::Quote => (
                    DiagnosticKind::UnmatchedQuote,
                    "unclosed quote",
                    "missing closing quote".to_string(),
                ),
            };
            self.tokens.push((Token::Error(token), end));
            self.diagnostics
                .emit(unclosed_diagnostic(kind, message, end, opener));
        }
        self.tokens.push((Token::Eof, end));

        let index = LineIndex::new(self.source);
        let tokens: Vec<_> = self
            .tokens
            .into_iter()
            .map(|(token, span)| PositionedToken::new(token, span, index.position(span.start())))
            .collect();
        trace!(tokens = tokens.len(); "Tokenized source");

        TokenStream {
            tokens,
            diagnostics: self.diagnostics.finish(),
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

fn stray_close_diagnostic(delimiter: Delimiter, span: Span) -> Diagnostic {
    match delimiter {
        Delimiter::Bracket => Diagnostic::new(
            DiagnosticKind::UnmatchedBracket,
            "unexpected closing bracket `]`",
        )
        .with_label(span, "no matching `[`")
        .with_help("remove the `]` or add the missing `[`"),
        Delimiter::Brace | Delimiter::Quote => {
            Diagnostic::new(DiagnosticKind::UnmatchedBrace, "unexpected closing brace `}`")
                .with_label(span, "no matching `{`")
                .with_help("remove the `}` or add the missing `{`")
        }
    }
}

fn unclosed_diagnostic(kind: DiagnosticKind, message: String, end: Span, opener: Span) -> Diagnostic {
    let closer = match kind {
        DiagnosticKind::UnmatchedBracket => "]",
        DiagnosticKind::UnmatchedQuote => "\"",
        _ => "}",
    };
    Diagnostic::new(kind, message)
        .with_label(end, "end of file reached")
        .with_secondary_label(opener, "unclosed delimiter opened here")
        .with_help(format!("add the missing `{closer}`"))
}

/// Tokenize SDC source text, collecting every diagnostic in one pass.
///
/// Never fails: the returned stream always ends with [`Token::Eof`].
/// Unclosed delimiters add one [`Token::Error`] each just before it.
pub fn tokenize(source: &str) -> TokenStream<'_> {
    let mut lexer = Lexer::new(source);
    lexer.tokenize(LocatingSlice::new(source));
    lexer.finish()
}
