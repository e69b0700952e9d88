use std::fmt;

use indexmap::IndexMap;

use crate::span::{Position, Span, Spanned};

/// An argument value with the span it was read from.
///
/// Values are the token text: quoted strings with escapes translated,
/// braced lists without their braces, bracketed expressions with their
/// brackets, and variables as `$name`.
pub type Argument = Spanned<String>;

/// One command as written in the source.
///
/// A flag name is never both bare and keyed: recording a value for a bare
/// flag promotes it, and a bare occurrence of a keyed flag is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    name: Spanned<String>,
    position: Position,
    positionals: Vec<Argument>,
    keyed: IndexMap<String, Vec<Argument>>,
    bare: IndexMap<String, Span>,
}

impl ParsedCommand {
    pub fn new(name: impl Into<String>, span: Span, position: Position) -> Self {
        Self {
            name: Spanned::new(name.into(), span),
            position,
            positionals: Vec::new(),
            keyed: IndexMap::new(),
            bare: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.inner()
    }

    /// Span of the command name.
    pub fn span(&self) -> Span {
        self.name.span()
    }

    /// Line and column of the command name.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Span from the command name to its last argument.
    pub fn full_span(&self) -> Span {
        self.positionals
            .iter()
            .chain(self.keyed.values().flatten())
            .map(Spanned::span)
            .chain(self.bare.values().copied())
            .fold(self.span(), |acc, span| acc.union(span))
    }

    pub fn positionals(&self) -> &[Argument] {
        &self.positionals
    }

    pub fn positional(&self, index: usize) -> Option<&Argument> {
        self.positionals.get(index)
    }

    pub fn add_positional(&mut self, value: Argument) {
        self.positionals.push(value);
    }

    /// Remove and return the positional at `index`, if present.
    pub fn remove_positional(&mut self, index: usize) -> Option<Argument> {
        (index < self.positionals.len()).then(|| self.positionals.remove(index))
    }

    /// Record a value for `flag`. Repeated flags keep every value in order.
    pub fn add_keyed(&mut self, flag: impl Into<String>, value: Argument) {
        let flag = flag.into();
        self.bare.shift_remove(&flag);
        self.keyed.entry(flag).or_default().push(value);
    }

    /// Record `flag` without a value.
    pub fn add_bare(&mut self, flag: impl Into<String>, span: Span) {
        let flag = flag.into();
        if !self.keyed.contains_key(&flag) {
            self.bare.entry(flag).or_insert(span);
        }
    }

    /// The last value given for `flag`.
    pub fn keyed_value(&self, flag: &str) -> Option<&Argument> {
        self.keyed.get(flag).and_then(|values| values.last())
    }

    /// Every value given for `flag`, in source order.
    pub fn keyed_values(&self, flag: &str) -> &[Argument] {
        self.keyed.get(flag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterate over keyed flags and all their values.
    pub fn keyed(&self) -> impl Iterator<Item = (&str, &[Argument])> {
        self.keyed
            .iter()
            .map(|(flag, values)| (flag.as_str(), values.as_slice()))
    }

    pub fn is_bare(&self, flag: &str) -> bool {
        self.bare.contains_key(flag)
    }

    /// Span of a bare flag.
    pub fn bare_span(&self, flag: &str) -> Option<Span> {
        self.bare.get(flag).copied()
    }

    pub fn bare_flags(&self) -> impl Iterator<Item = &str> {
        self.bare.keys().map(String::as_str)
    }

    /// Whether `flag` appears at all, bare or with a value.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.is_bare(flag) || self.keyed.contains_key(flag)
    }

    /// Mutable access to every argument value, positional and keyed.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Argument> {
        self.positionals
            .iter_mut()
            .chain(self.keyed.values_mut().flatten())
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        for (flag, values) in self.keyed() {
            for value in values {
                write!(f, " {flag} {value}")?;
            }
        }
        for flag in self.bare_flags() {
            write!(f, " {flag}")?;
        }
        for value in &self.positionals {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}
