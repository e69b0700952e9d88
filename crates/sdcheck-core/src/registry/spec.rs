//! Argument and command schema types.

use serde::{Deserialize, Deserializer};

use crate::registry::Validator;

/// How an argument appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    /// A bare flag such as `-add`; never takes a value.
    Flag,
    /// A flag followed by a value such as `-period 10`.
    KeyValue,
    /// A positional argument. Positional specs are matched to positional
    /// arguments by their order within the command spec.
    Positional,
}

/// Schema for one argument of a command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArgSpec {
    name: String,
    kind: ArgKind,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    validator: Option<Validator>,
    #[serde(default)]
    value_less: bool,
}

impl ArgSpec {
    /// A bare flag argument.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Flag)
    }

    /// A flag that takes a value.
    pub fn key_value(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::KeyValue)
    }

    /// A positional argument.
    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Positional)
    }

    /// Mark this argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a value validator to this argument.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Argument name; flags include their leading dash.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn validator(&self) -> Option<Validator> {
        self.validator
    }

    /// Returns `true` if this argument never consumes a following value.
    pub fn is_value_less(&self) -> bool {
        self.value_less || self.kind == ArgKind::Flag
    }

    fn new(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            validator: None,
            value_less: false,
        }
    }
}

/// Schema for one command.
///
/// `max_positional` of `None` means the number of positional arguments is
/// unbounded. In TOML command tables, a negative `max_positional` (the
/// conventional `-1`) maps to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    name: String,
    #[serde(default)]
    args: Vec<ArgSpec>,
    #[serde(default)]
    min_positional: usize,
    #[serde(default, deserialize_with = "deserialize_max_positional")]
    max_positional: Option<usize>,
}

impl CommandSpec {
    /// Create a spec with no arguments and any number of positionals.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            min_positional: 0,
            max_positional: None,
        }
    }

    /// Add an argument spec.
    pub fn arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Add several bare flags at once.
    pub fn flags(mut self, names: &[&str]) -> Self {
        self.args.extend(names.iter().map(|name| ArgSpec::flag(*name)));
        self
    }

    /// Add several optional key/value flags without validators at once.
    pub fn options(mut self, names: &[&str]) -> Self {
        self.args
            .extend(names.iter().map(|name| ArgSpec::key_value(*name)));
        self
    }

    /// Set the accepted positional argument count.
    pub fn positional(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_positional = min;
        self.max_positional = max;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn min_positional(&self) -> usize {
        self.min_positional
    }

    pub fn max_positional(&self) -> Option<usize> {
        self.max_positional
    }

    /// Look up a flag or key/value argument by its dashed name.
    pub fn flag_spec(&self, flag: &str) -> Option<&ArgSpec> {
        self.args
            .iter()
            .find(|arg| arg.kind != ArgKind::Positional && arg.name == flag)
    }

    /// Positional argument specs in order.
    pub fn positional_specs(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args
            .iter()
            .filter(|arg| arg.kind == ArgKind::Positional)
    }

    /// Required key/value argument specs.
    pub fn required_options(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args
            .iter()
            .filter(|arg| arg.kind == ArgKind::KeyValue && arg.required)
    }
}

fn deserialize_max_positional<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<i64>::deserialize(deserializer)?;
    Ok(value.and_then(|max| usize::try_from(max).ok()))
}
