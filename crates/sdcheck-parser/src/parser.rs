//! Parser for SDC tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into
//! an ordered list of [`ParsedCommand`]s. Whether a flag takes a value is
//! not visible in the tokens, so the parser asks the [`Registry`]; flags the
//! registry does not know take the next token as their value when it is a
//! string, number or variable.
//!
//! Parsing is tolerant: a line that does not start with a command word is
//! dropped and parsing resumes after the next separator.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{opt, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use sdcheck_core::Registry;

use crate::{
    parser_types::{Argument, ParsedCommand},
    span::Spanned,
    tokens::{PositionedToken, Token},
};

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = Result<O, ErrMode<ContextError>>;

/// Convert a value token into an argument. Variables keep their `$`, and
/// their braces unless the name is a plain identifier.
fn argument(token: &PositionedToken<'_>) -> Option<Argument> {
    let value = match &token.token {
        Token::Str(text) => text.to_string(),
        Token::Number(number) => number.to_string(),
        Token::Variable(name) if is_plain_name(name) => format!("${name}"),
        Token::Variable(name) => format!("${{{name}}}"),
        _ => return None,
    };
    Some(Spanned::new(value, token.span))
}

fn is_plain_name(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse a newline or semicolon.
fn separator<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| {
        matches!(token.token, Token::Newline | Token::Semicolon)
    })
    .void()
    .parse_next(input)
}

fn separators0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., separator).parse_next(input)
}

fn end_of_input<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Eof))
        .void()
        .parse_next(input)
}

fn command_name<'src>(input: &mut Input<'src>) -> IResult<(&'src str, &'src PositionedToken<'src>)> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Command(name) => Some((name, token)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse a string, number or variable argument.
fn value<'src>(input: &mut Input<'src>) -> IResult<Argument> {
    any.verify_map(argument).parse_next(input)
}

/// Parse one command: the name, then arguments up to the next separator.
///
/// The separator itself is left in the input.
fn command<'src>(input: &mut Input<'src>, registry: &Registry) -> IResult<ParsedCommand> {
    let (name, name_token) = command_name.parse_next(input)?;
    let mut parsed = ParsedCommand::new(name, name_token.span, name_token.position);

    loop {
        let checkpoint = input.checkpoint();
        let Some(token) = input.next_token() else {
            break;
        };
        match &token.token {
            Token::Newline | Token::Semicolon | Token::Eof => {
                input.reset(&checkpoint);
                break;
            }
            Token::Flag(flag) => {
                if registry.is_value_less(name, flag) {
                    parsed.add_bare(*flag, token.span);
                } else {
                    match opt(value).parse_next(input)? {
                        Some(value) => parsed.add_keyed(*flag, value),
                        None => parsed.add_bare(*flag, token.span),
                    }
                }
            }
            Token::Str(_) | Token::Number(_) | Token::Variable(_) => {
                if let Some(value) = argument(token) {
                    parsed.add_positional(value);
                }
            }
            Token::Command(_) | Token::ListEnd | Token::BracketEnd | Token::Error(_) => {
                trace!(token:% = token.token; "Skipping stray token inside command");
            }
        }
    }

    trace!(command:% = parsed; "Parsed command");
    Ok(parsed)
}

/// Skip the rest of a malformed line, leaving the separator in the input.
fn recover<'src>(input: &mut Input<'src>) {
    let start = input.checkpoint();
    let first = input.next_token();
    input.reset(&start);
    if let Some(token) = first {
        debug!(
            token:% = token.token,
            line = token.position.line;
            "Dropping line that does not start with a command"
        );
    }

    loop {
        let checkpoint = input.checkpoint();
        match input.next_token() {
            None => break,
            Some(token) if token.token.is_separator() => {
                input.reset(&checkpoint);
                break;
            }
            Some(_) => {}
        }
    }
}

/// Build the ordered command list from a token stream.
///
/// Never fails. Lines that do not start with a command word are dropped.
pub fn parse_tokens(tokens: &[PositionedToken<'_>], registry: &Registry) -> Vec<ParsedCommand> {
    let mut input = Input::new(tokens);
    let mut commands = Vec::new();

    loop {
        // Cannot fail: zero separators is a match.
        let _ = separators0(&mut input);
        if input.eof_offset() == 0 || end_of_input(&mut input).is_ok() {
            break;
        }
        let checkpoint = input.checkpoint();
        match command(&mut input, registry) {
            Ok(parsed) => commands.push(parsed),
            Err(_) => {
                input.reset(&checkpoint);
                recover(&mut input);
            }
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, span::Position};

    fn parse(source: &str) -> Vec<ParsedCommand> {
        let stream = tokenize(source);
        assert!(stream.diagnostics.is_empty(), "{:?}", stream.diagnostics);
        parse_tokens(&stream.tokens, Registry::builtin())
    }

    fn keyed<'a>(command: &'a ParsedCommand, flag: &str) -> Option<&'a str> {
        command.keyed_value(flag).map(|value| value.as_str())
    }

    fn positionals(command: &ParsedCommand) -> Vec<&str> {
        command.positionals().iter().map(|value| value.as_str()).collect()
    }

    #[test]
    fn test_parse_create_clock() {
        let commands = parse("create_clock -period 10 -name clk [get_ports clk]");
        assert_eq!(commands.len(), 1);

        let clock = &commands[0];
        assert_eq!(clock.name(), "create_clock");
        assert_eq!(keyed(clock, "-period"), Some("10"));
        assert_eq!(keyed(clock, "-name"), Some("clk"));
        assert_eq!(positionals(clock), ["[get_ports clk]"]);
        assert_eq!(clock.position(), Position::new(1, 1));
    }

    #[test]
    fn test_registry_value_less_flags() {
        let commands = parse("create_clock -add -period 5 clk");
        let clock = &commands[0];
        assert!(clock.is_bare("-add"));
        assert_eq!(keyed(clock, "-period"), Some("5"));
        assert_eq!(positionals(clock), ["clk"]);

        let commands = parse("set_clock_latency -source 0.5 [get_clocks clk]");
        let latency = &commands[0];
        assert!(latency.is_bare("-source"));
        assert_eq!(positionals(latency), ["0.5", "[get_clocks clk]"]);
    }

    #[test]
    fn test_unknown_flag_heuristic() {
        let commands = parse("vendor_cmd -foo -bar 1 -setup x -last");
        let cmd = &commands[0];
        assert!(cmd.is_bare("-foo"));
        assert_eq!(keyed(cmd, "-bar"), Some("1"));
        // `-setup` is in the fallback value-less set.
        assert!(cmd.is_bare("-setup"));
        assert!(cmd.is_bare("-last"));
        assert_eq!(positionals(cmd), ["x"]);
    }

    #[test]
    fn test_flag_before_separator_is_bare() {
        let commands = parse("create_generated_clock -source -divide_by 2 pin\nset_input_delay -clock");
        assert_eq!(commands.len(), 2);
        assert!(commands[0].is_bare("-source"));
        assert_eq!(keyed(&commands[0], "-divide_by"), Some("2"));
        assert_eq!(positionals(&commands[0]), ["pin"]);
        assert!(commands[1].is_bare("-clock"));
    }

    #[test]
    fn test_variables_are_stored_with_dollar() {
        let commands = parse("create_clock -period $period ${port}");
        assert_eq!(keyed(&commands[0], "-period"), Some("$period"));
        assert_eq!(positionals(&commands[0]), ["$port"]);
    }

    #[test]
    fn test_braced_variable_names_keep_braces() {
        let commands = parse("create_clock -period ${a.b} ${clk port}");
        assert_eq!(keyed(&commands[0], "-period"), Some("${a.b}"));
        assert_eq!(positionals(&commands[0]), ["${clk port}"]);
    }

    #[test]
    fn test_repeated_flags() {
        let commands = parse("set_clock_groups -asynchronous -group {a b} -group c");
        let groups: Vec<_> = commands[0]
            .keyed_values("-group")
            .iter()
            .map(|value| value.as_str())
            .collect();
        assert_eq!(groups, ["a b", "c"]);
        assert!(commands[0].is_bare("-asynchronous"));
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let commands = parse("-period 10\n{a b} foo\n\n  create_clock -period 5 clk; 42 x");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name(), "create_clock");
        assert_eq!(commands[0].position(), Position::new(4, 3));
    }

    #[test]
    fn test_semicolon_separated_commands() {
        let names: Vec<_> = parse("set a 1; set b 2;;puts $b")
            .iter()
            .map(|command| command.name().to_string())
            .collect();
        assert_eq!(names, ["set", "set", "puts"]);
    }

    #[test]
    fn test_empty_token_stream() {
        assert!(parse("").is_empty());
        assert!(parse_tokens(&[], Registry::builtin()).is_empty());
    }
}
