//! The command registry.
//!
//! A [`Registry`] maps command names to their [`CommandSpec`]. The built-in
//! table covers the SDC command set and is built once on first use;
//! additional or replacement specs can be layered on top with
//! [`Registry::with_overrides`].

mod builtin;
mod spec;
mod validator;

pub use spec::{ArgKind, ArgSpec, CommandSpec};
pub use validator::{UnknownValidator, Validator};

use std::sync::LazyLock;

use indexmap::IndexMap;
use log::debug;

/// Flags that are treated as value-less when the registry has no entry for
/// the `(command, flag)` pair.
const VALUE_LESS_FLAGS: &[&str] = &[
    "-add",
    "-add_delay",
    "-allow_paths",
    "-asynchronous",
    "-clock_fall",
    "-combinational",
    "-data_path",
    "-clock_path",
    "-datapath_only",
    "-early",
    "-end",
    "-fall",
    "-hierarchical",
    "-hold",
    "-ignore_clock_latency",
    "-include_generated_clocks",
    "-invert",
    "-late",
    "-level_sensitive",
    "-logically_exclusive",
    "-max",
    "-min",
    "-network_latency_included",
    "-no_propagate",
    "-nocase",
    "-physically_exclusive",
    "-quiet",
    "-regexp",
    "-reset_path",
    "-rise",
    "-setup",
    "-source_latency_included",
    "-start",
];

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| Registry::new(builtin::commands()));

/// Immutable lookup table of command specs keyed by command name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: IndexMap<String, CommandSpec>,
}

impl Registry {
    /// Build a registry from a list of specs. Later specs replace earlier
    /// ones with the same name.
    pub fn new(specs: impl IntoIterator<Item = CommandSpec>) -> Self {
        let commands = specs
            .into_iter()
            .map(|spec| (spec.name().to_string(), spec))
            .collect();
        Self { commands }
    }

    /// The built-in SDC command table.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// Return a copy of this registry with `specs` added, replacing any
    /// existing entries of the same name.
    pub fn with_overrides(&self, specs: impl IntoIterator<Item = CommandSpec>) -> Registry {
        let mut commands = self.commands.clone();
        for spec in specs {
            debug!(command = spec.name(); "Registering command override");
            commands.insert(spec.name().to_string(), spec);
        }
        Registry { commands }
    }

    /// Look up a command spec.
    pub fn get(&self, command: &str) -> Option<&CommandSpec> {
        self.commands.get(command)
    }

    pub fn contains(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over all command specs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    /// Decide whether `flag` of `command` is a bare flag.
    ///
    /// The command's own spec wins when it knows the flag; otherwise the
    /// flag is checked against a fixed set of commonly value-less flags.
    /// A `false` result means the parser should try to take the next token
    /// as the flag's value.
    pub fn is_value_less(&self, command: &str, flag: &str) -> bool {
        match self.get(command).and_then(|spec| spec.flag_spec(flag)) {
            Some(arg) => arg.is_value_less(),
            None => VALUE_LESS_FLAGS.contains(&flag),
        }
    }
}
