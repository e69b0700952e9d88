//! The per-file checker.
//!
//! A [`FileChecker`] drives every parsed command through variable
//! substitution, structural checks and value validation, and keeps the
//! [`DesignContext`] up to date. After the last command, one finalization
//! pass reports deferred clock references that were never resolved.
//!
//! Nothing here aborts: every defect becomes a diagnostic and checking
//! continues with the next command.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::{debug, trace};

use sdcheck_core::{CommandSpec, Registry, Validator};
use sdcheck_parser::{
    Argument, Diagnostic, DiagnosticKind, ParsedCommand, Parsed, error::DiagnosticCollector,
};

use crate::{
    config::CheckOptions,
    design::{
        ClockGroup, ClockGroupKind, ClockInfo, ClockReference, ConstraintRecord, ConstraintType,
        DesignContext, GeneratedClockInfo, PortDirection, Resolution,
    },
    objects::{ObjectList, is_pattern},
    validators::{self, ValueError},
    variables::{Substituted, VariableStore},
};

/// Commands whose first positional is a delay that should not be negative.
const NEGATIVE_DELAY_COMMANDS: &[&str] = &[
    "set_input_delay",
    "set_output_delay",
    "set_max_delay",
    "set_clock_latency",
];

/// Commands whose first positional is a delay checked for magnitude in
/// strict mode.
const DELAY_COMMANDS: &[&str] = &[
    "set_input_delay",
    "set_output_delay",
    "set_max_delay",
    "set_min_delay",
];

const TRANSITION_COMMANDS: &[&str] = &[
    "set_input_transition",
    "set_max_transition",
    "set_clock_transition",
];

const EXCEPTION_COMMANDS: &[&str] = &[
    "set_false_path",
    "set_multicycle_path",
    "set_max_delay",
    "set_min_delay",
];

/// Commands that should name what they create.
const NAMING_COMMANDS: &[&str] = &[
    "create_clock",
    "create_generated_clock",
    "set_clock_groups",
];

/// Flags whose values are object lists.
const OBJECT_FLAGS: &[&str] = &[
    "-group",
    "-from",
    "-to",
    "-through",
    "-rise_from",
    "-fall_from",
    "-rise_to",
    "-fall_to",
    "-rise_through",
    "-fall_through",
];

/// Flags whose values name clocks.
const CLOCK_FLAGS: &[&str] = &["-clock", "-clocks", "-master_clock"];

const WIRE_LOAD_MODES: &[&str] = &["top", "enclosed", "segmented"];

const CASE_ANALYSIS_VALUES: &[&str] = &[
    "0", "1", "zero", "one", "rise", "rising", "fall", "falling",
];

/// Uncertainty above which a warning is always reported, in seconds.
const UNCERTAINTY_LIMIT: f64 = 1e-9;

// Strict-mode magnitudes, in seconds.
const REALISTIC_PERIOD: (f64, f64) = (0.1e-9, 1000e-9);
const REALISTIC_DELAY: f64 = 100e-9;
const REALISTIC_TRANSITION: f64 = 0.5e-9;
const UNCERTAINTY_PERIOD_RATIO: f64 = 0.2;

/// Returns `true` if the value is known without evaluating the file.
fn is_static(value: &str) -> bool {
    !value.contains('$') && !validators::is_dynamic(value)
}

/// Time value in seconds, when statically known.
fn static_time(value: &Argument) -> Option<f64> {
    if value.contains('$') {
        return None;
    }
    validators::time_seconds(value)
}

fn format_ns(seconds: f64) -> String {
    let ns = (seconds * 1e12).round() / 1e3;
    format!("{ns}ns")
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Checks the commands of one file.
pub(crate) struct FileChecker<'a> {
    registry: &'a Registry,
    options: &'a CheckOptions,
    variables: VariableStore,
    design: DesignContext,
    diagnostics: DiagnosticCollector,
    substitutions: HashMap<String, Substituted>,
}

impl<'a> FileChecker<'a> {
    pub(crate) fn new(registry: &'a Registry, options: &'a CheckOptions) -> Self {
        Self {
            registry,
            options,
            variables: VariableStore::new(),
            design: DesignContext::new(),
            diagnostics: DiagnosticCollector::with_suppressed(options.suppressed().clone()),
            substitutions: HashMap::new(),
        }
    }

    /// Check a parsed file and return every kept diagnostic.
    pub(crate) fn run(mut self, parsed: Parsed) -> Vec<Diagnostic> {
        self.diagnostics.extend(parsed.diagnostics);
        for command in parsed.commands {
            self.check_command(command);
        }
        self.finalize();
        self.diagnostics.finish()
    }

    fn check_command(&mut self, mut command: ParsedCommand) {
        trace!(command:% = command; "Checking command");

        match command.name() {
            "set" => return self.handle_set(&command),
            "unset" => return self.handle_unset(&command),
            "echo" | "puts" => return,
            _ => {}
        }

        let registry = self.registry;
        let Some(spec) = registry.get(command.name()) else {
            self.report_unknown_command(&command);
            return;
        };

        self.substitute(&mut command);
        if command.name() == "create_generated_clock" {
            rehome_generated_clock_source(&mut command);
        }

        self.check_required_args(&command, spec);
        self.check_positional_count(&command, spec);
        self.check_values(&command, spec);
        self.check_object_lists(&command, spec);
        let uncertainty_reported = self.check_quality(&command);
        self.check_structure(&command);
        if self.options.strict() {
            self.check_strict(&command, uncertainty_reported);
        }
        self.track(&command);
    }

    fn handle_set(&mut self, command: &ParsedCommand) {
        match command.positionals() {
            [name, value, ..] => {
                trace!(name = name.as_str(), value = value.as_str(); "Setting variable");
                self.variables.set(name.as_str(), value.as_str());
                self.substitutions.clear();
            }
            _ => debug!(
                line = command.position().line;
                "Ignoring `set` without a name and value"
            ),
        }
    }

    fn handle_unset(&mut self, command: &ParsedCommand) {
        for name in command.positionals() {
            if self.variables.unset(name).is_none() {
                debug!(name = name.as_str(); "Unsetting unknown variable");
            }
        }
        self.substitutions.clear();
    }

    fn report_unknown_command(&mut self, command: &ParsedCommand) {
        self.diagnostics.emit(
            Diagnostic::new(
                DiagnosticKind::UnknownCommand,
                format!("unknown command `{}`", command.name()),
            )
            .with_label(command.span(), "not a known SDC command")
            .with_help(
                "check the command name, or describe the command in a `[[commands]]` \
                 configuration entry",
            ),
        );
    }

    /// Substitute variables into every argument value, then drop the
    /// backslash of escaped `\$`. Each distinct undefined variable is
    /// reported once, at the command.
    fn substitute(&mut self, command: &mut ParsedCommand) {
        let mut undefined = IndexSet::new();

        for value in command.values_mut() {
            if !value.contains('$') {
                continue;
            }
            let variables = &self.variables;
            let result = self
                .substitutions
                .entry(value.to_string())
                .or_insert_with(|| variables.substitute(value.as_str()))
                .clone();
            undefined.extend(result.undefined);
            *value.inner_mut() = result.value.replace("\\$", "$");
        }

        for name in undefined {
            self.diagnostics.emit(
                Diagnostic::new(
                    DiagnosticKind::UndefinedVariable,
                    format!("variable `${name}` is not defined"),
                )
                .with_label(command.span(), format!("`${name}` is used here"))
                .with_help(format!("define it with `set {name} <value>` before this command")),
            );
        }
    }

    fn check_required_args(&mut self, command: &ParsedCommand, spec: &CommandSpec) {
        let name = command.name();

        for arg in spec.required_options() {
            let flag = arg.name();
            if command.keyed_value(flag).is_some() {
                continue;
            }
            let diagnostic = match command.bare_span(flag) {
                Some(span) => Diagnostic::new(
                    DiagnosticKind::MissingRequiredArg,
                    format!("`{flag}` of `{name}` requires a value"),
                )
                .with_label(span, "no value given"),
                None => Diagnostic::new(
                    DiagnosticKind::MissingRequiredArg,
                    format!("`{name}` is missing required argument `{flag}`"),
                )
                .with_label(command.span(), format!("`{flag}` is required")),
            };
            self.diagnostics
                .emit(diagnostic.with_help(format!("add `{flag} <value>`")));
        }

        if name == "create_clock"
            && command.keyed_value("-name").is_none()
            && command.positionals().is_empty()
        {
            self.diagnostics.emit(
                Diagnostic::new(
                    DiagnosticKind::MissingRequiredArg,
                    "`create_clock` needs `-name` or a source object",
                )
                .with_label(command.span(), "clock has no name")
                .with_help("add `-name <clock>` or a source such as `[get_ports clk]`"),
            );
        }
    }

    fn check_positional_count(&mut self, command: &ParsedCommand, spec: &CommandSpec) {
        let name = command.name();
        let count = command.positionals().len();
        let min = spec.min_positional();

        if count < min {
            self.diagnostics.emit(
                Diagnostic::new(
                    DiagnosticKind::InvalidArgCount,
                    format!(
                        "`{name}` expects at least {}, found {count}",
                        plural(min, "positional argument")
                    ),
                )
                .with_label(command.span(), "too few arguments"),
            );
        }

        if let Some(max) = spec.max_positional() {
            if let Some(extra) = command.positional(max) {
                self.diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticKind::InvalidArgCount,
                        format!(
                            "`{name}` expects at most {}, found {count}",
                            plural(max, "positional argument")
                        ),
                    )
                    .with_label(extra.span(), "unexpected argument")
                    .with_help("remove the extra arguments or check for a missing flag"),
                );
            }
        }
    }

    fn check_values(&mut self, command: &ParsedCommand, spec: &CommandSpec) {
        for (flag, values) in command.keyed() {
            let Some(arg) = spec.flag_spec(flag) else {
                debug!(command = command.name(), flag; "Flag is not in the command spec");
                continue;
            };
            if let Some(validator) = arg.validator() {
                for value in values {
                    self.validate_value(command, flag, validator, value);
                }
            }
        }

        for (arg, value) in spec.positional_specs().zip(command.positionals()) {
            if let Some(validator) = arg.validator() {
                self.validate_value(command, arg.name(), validator, value);
            }
        }
    }

    fn validate_value(
        &mut self,
        command: &ParsedCommand,
        arg: &str,
        validator: Validator,
        value: &Argument,
    ) {
        if value.contains('$') {
            return;
        }
        let Err(err) = validators::validate(validator, value) else {
            return;
        };

        let kind = match (&err, validator) {
            (_, Validator::HierarchySeparator) => DiagnosticKind::InvalidHierarchySeparator,
            (ValueError::InvalidFormat(_), _) => DiagnosticKind::InvalidArgType,
            (ValueError::OutOfRange(_) | ValueError::EmptyValue, _) => {
                DiagnosticKind::InvalidArgValue
            }
        };
        self.diagnostics.emit(
            Diagnostic::new(
                kind,
                format!("invalid value for `{arg}` of `{}`: {err}", command.name()),
            )
            .with_label(value.span(), format!("not a valid {}", validator.as_str().replace('_', " ")))
            .with_help(validators::suggestion(validator)),
        );
    }

    fn check_object_lists(&mut self, command: &ParsedCommand, spec: &CommandSpec) {
        for flag in OBJECT_FLAGS {
            for value in command.keyed_values(flag) {
                self.check_not_empty(command, flag, value);
            }
        }
        for (arg, value) in spec.positional_specs().zip(command.positionals()) {
            if arg.name().ends_with("list") || arg.name() == "objects" {
                self.check_not_empty(command, arg.name(), value);
            }
        }
    }

    fn check_not_empty(&mut self, command: &ParsedCommand, arg: &str, value: &Argument) {
        if value.contains('$') || !ObjectList::parse(value).is_empty() {
            return;
        }
        self.diagnostics.emit(
            Diagnostic::new(
                DiagnosticKind::EmptyObjectList,
                format!("`{arg}` of `{}` is an empty object list", command.name()),
            )
            .with_label(value.span(), "names no objects")
            .with_help("name at least one object, or remove the argument"),
        );
    }

    /// Always-on advisories. Returns `true` if a large uncertainty was
    /// reported.
    fn check_quality(&mut self, command: &ParsedCommand) -> bool {
        let name = command.name();

        if NEGATIVE_DELAY_COMMANDS.contains(&name) {
            if let Some(value) = command.positional(0) {
                if static_time(value).is_some_and(|seconds| seconds < 0.0) {
                    self.diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::NegativeDelay,
                            format!("negative delay `{value}` in `{name}`"),
                        )
                        .with_label(value.span(), "negative value")
                        .with_help("negative delays are legal but rarely intended; check the sign"),
                    );
                }
            }
        }

        if name == "create_clock" {
            if let Some(period) = command.keyed_value("-period") {
                if static_time(period) == Some(0.0) {
                    self.diagnostics.emit(
                        Diagnostic::new(DiagnosticKind::ZeroPeriod, "clock period is zero")
                            .with_label(period.span(), "zero period")
                            .with_help("give the clock a positive period"),
                    );
                }
            }
        }

        if name == "set_clock_uncertainty" {
            if let Some(value) = command.positional(0) {
                if static_time(value).is_some_and(|seconds| seconds > UNCERTAINTY_LIMIT) {
                    self.diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::LargeUncertainty,
                            format!(
                                "clock uncertainty `{value}` is larger than {}",
                                format_ns(UNCERTAINTY_LIMIT)
                            ),
                        )
                        .with_label(value.span(), "large uncertainty")
                        .with_help("check the unit; uncertainty is usually a small fraction of a period"),
                    );
                    return true;
                }
            }
        }

        false
    }

    /// Keyword arguments of specific commands.
    fn check_structure(&mut self, command: &ParsedCommand) {
        let (allowed, what) = match command.name() {
            "set_wire_load_mode" => (WIRE_LOAD_MODES, "wire load mode"),
            "set_case_analysis" => (CASE_ANALYSIS_VALUES, "case analysis value"),
            _ => return,
        };
        let Some(value) = command.positional(0) else {
            return;
        };
        if !is_static(value) || allowed.contains(&value.as_str()) {
            return;
        }

        let choices = allowed
            .iter()
            .map(|choice| format!("`{choice}`"))
            .collect::<Vec<_>>()
            .join(", ");
        self.diagnostics.emit(
            Diagnostic::new(
                DiagnosticKind::InvalidArgValue,
                format!("`{value}` is not a valid {what}"),
            )
            .with_label(value.span(), format!("invalid {what}"))
            .with_help(format!("use one of {choices}")),
        );
    }

    fn check_strict(&mut self, command: &ParsedCommand, uncertainty_reported: bool) {
        let name = command.name();

        let values = command
            .positionals()
            .iter()
            .chain(command.keyed().flat_map(|(_, values)| values));
        for value in values {
            if ObjectList::parse(value).has_bare_wildcard() {
                self.diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticKind::AmbiguousWildcard,
                        format!("bare wildcard in `{name}` matches every object"),
                    )
                    .with_label(value.span(), "matches everything")
                    .with_help("use a more specific pattern"),
                );
            }
        }

        if NAMING_COMMANDS.contains(&name) && command.keyed_value("-name").is_none() {
            self.diagnostics.emit(
                Diagnostic::new(
                    DiagnosticKind::MissingRecommendedName,
                    format!("`{name}` has no `-name`"),
                )
                .with_label(command.span(), "unnamed")
                .with_help("add `-name` so later constraints and reports can refer to it"),
            );
        }

        if name == "create_clock" {
            if let Some(period) = command.keyed_value("-period") {
                let realistic = static_time(period).is_none_or(|seconds| {
                    seconds <= 0.0
                        || (REALISTIC_PERIOD.0..=REALISTIC_PERIOD.1).contains(&seconds)
                        || validators::validate(Validator::ClockPeriod, period).is_err()
                });
                if !realistic {
                    self.diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::UnrealisticPeriod,
                            format!("clock period `{period}` is unusual"),
                        )
                        .with_label(period.span(), "outside 0.1ns to 1000ns")
                        .with_help("check the unit; unitless periods are in nanoseconds"),
                    );
                }
            }
        }

        if DELAY_COMMANDS.contains(&name) {
            if let Some(value) = command.positional(0) {
                if static_time(value).is_some_and(|seconds| seconds.abs() > REALISTIC_DELAY) {
                    self.diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::UnrealisticDelay,
                            format!("delay `{value}` in `{name}` is larger than 100ns"),
                        )
                        .with_label(value.span(), "unusually large")
                        .with_help("check the unit; unitless delays are in nanoseconds"),
                    );
                }
            }
        }

        if TRANSITION_COMMANDS.contains(&name) {
            if let Some(value) = command.positional(0) {
                let unrealistic = static_time(value).is_some_and(|seconds| {
                    seconds > REALISTIC_TRANSITION
                        && validators::validate(Validator::Transition, value).is_ok()
                });
                if unrealistic {
                    self.diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::UnrealisticTransition,
                            format!("transition `{value}` in `{name}` is slower than 0.5ns"),
                        )
                        .with_label(value.span(), "unusually slow")
                        .with_help("check the unit; unitless transitions are in nanoseconds"),
                    );
                }
            }
        }

        if name == "set_clock_uncertainty" && !uncertainty_reported {
            let value = command.positional(0);
            let seconds = value.and_then(static_time);
            let fastest = self.design.fastest_clock_period();
            if let (Some(value), Some(seconds), Some(period)) = (value, seconds, fastest) {
                if seconds > period * UNCERTAINTY_PERIOD_RATIO {
                    self.diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::LargeUncertainty,
                            format!(
                                "clock uncertainty `{value}` is more than 20% of the fastest \
                                 clock period ({})",
                                format_ns(period)
                            ),
                        )
                        .with_label(value.span(), "large relative to the clock period")
                        .with_help("check the value against the clock it applies to"),
                    );
                }
            }
        }
    }

    /// Update the design context.
    fn track(&mut self, command: &ParsedCommand) {
        match command.name() {
            "create_clock" => self.track_clock(command),
            "create_generated_clock" => self.track_generated_clock(command),
            "set_input_delay" => self.track_io_delay(command, PortDirection::Input),
            "set_output_delay" => self.track_io_delay(command, PortDirection::Output),
            "set_clock_groups" => self.track_clock_groups(command),
            name => {
                if EXCEPTION_COMMANDS.contains(&name) {
                    self.track_exception(command);
                }
                self.record_clock_uses(command);
            }
        }
    }

    /// The clock name given by `-name`, or the first source object.
    fn clock_name(command: &ParsedCommand) -> Option<Argument> {
        if let Some(name) = command.keyed_value("-name") {
            return Some(name.clone());
        }
        let source = command.positional(0)?;
        let list = ObjectList::parse(source);
        list.first_name()
            .map(|name| source.map(|_| name.to_string()))
    }

    /// Report a clock name that is already defined. Returns `true` if the
    /// name was a duplicate.
    fn check_duplicate_clock(&mut self, name: &Argument) -> bool {
        if let Some(first) = self.design.clock_definition(name) {
            self.diagnostics.emit(
                Diagnostic::new(
                    DiagnosticKind::DuplicateClock,
                    format!("clock `{name}` is defined more than once"),
                )
                .with_label(name.span(), "duplicate definition")
                .with_secondary_label(first, "first defined here")
                .with_help("remove the duplicate or use a different `-name`"),
            );
            return true;
        }

        if self.options.strict() {
            let similar = self.design.clock_with_similar_name(name).map(str::to_string);
            if let Some(similar) = similar {
                let mut diagnostic = Diagnostic::new(
                    DiagnosticKind::DuplicateDefinition,
                    format!("clock `{name}` differs from clock `{similar}` only in case"),
                )
                .with_label(name.span(), "similar name");
                if let Some(first) = self.design.clock_definition(&similar) {
                    diagnostic = diagnostic.with_secondary_label(first, "defined here");
                }
                self.diagnostics
                    .emit(diagnostic.with_help("use one spelling for the clock"));
            }
        }

        false
    }

    fn track_clock(&mut self, command: &ParsedCommand) {
        let Some(name) = Self::clock_name(command) else {
            return;
        };
        if self.check_duplicate_clock(&name) {
            return;
        }

        let source = command.positional(0);
        let clock = ClockInfo {
            name: name.into_inner(),
            period: command.keyed_value("-period").and_then(static_time),
            source: source.map(|source| source.to_string()),
            source_objects: source
                .map(|source| ObjectList::parse(source).names().to_vec())
                .unwrap_or_default(),
            span: command.span(),
            position: command.position(),
        };
        self.design.add_clock(clock);
    }

    fn track_generated_clock(&mut self, command: &ParsedCommand) {
        let Some(name) = Self::clock_name(command) else {
            return;
        };
        let source = command.keyed_value("-source");

        if let Some(source) = source {
            let refers_to_itself = source.as_str() == name.as_str()
                || ObjectList::parse(source)
                    .names()
                    .iter()
                    .any(|object| object == name.as_str());
            if refers_to_itself {
                self.diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticKind::SelfReferencingClock,
                        format!("generated clock `{name}` uses itself as its source"),
                    )
                    .with_label(source.span(), "refers to the clock being defined")
                    .with_help("use the master clock or its source pin as `-source`"),
                );
                return;
            }
        }

        if self.check_duplicate_clock(&name) {
            return;
        }
        if let Some(source) = source {
            self.check_generated_clock_source(command, source);
        }
        self.record_clock_uses(command);

        let clock = GeneratedClockInfo {
            name: name.into_inner(),
            source: source.map(|source| source.to_string()).unwrap_or_default(),
            master: command
                .keyed_value("-master_clock")
                .map(|master| master.to_string()),
            span: command.span(),
            position: command.position(),
        };
        self.design.add_generated_clock(clock);
    }

    /// The `-source` of a generated clock must already exist. Pin and port
    /// queries are not checked; there is no netlist to check them against.
    fn check_generated_clock_source(&mut self, command: &ParsedCommand, source: &Argument) {
        if source.contains('$') {
            return;
        }
        let list = ObjectList::parse(source);
        let clock_query = list.is_clock_query();
        if !clock_query && !matches!(list, ObjectList::Names(_)) {
            return;
        }

        for object in list.names().iter().filter(|object| !is_pattern(object)) {
            self.design.reference_clock(
                object,
                ClockReference {
                    command: command.name().to_string(),
                    arg: "-source".to_string(),
                    span: source.span(),
                    position: command.position(),
                    resolution: Resolution::Eager,
                },
            );

            let defined = if clock_query {
                self.design.is_clock_defined(object)
            } else {
                self.design.is_clock_or_source(object)
            };
            if !defined {
                self.diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticKind::UndefinedClock,
                        format!("generated clock source `{object}` is not a defined clock"),
                    )
                    .with_label(source.span(), "not defined")
                    .with_help(format!(
                        "define `{object}` with create_clock before this command"
                    )),
                );
            }
        }
    }

    fn track_io_delay(&mut self, command: &ParsedCommand, direction: PortDirection) {
        let mut clocks = Vec::new();

        if let Some(value) = command.keyed_value("-clock").filter(|value| !value.contains('$')) {
            let list = ObjectList::parse(value);
            for clock in list.names().iter().filter(|clock| !is_pattern(clock)) {
                self.design.reference_clock(
                    clock,
                    ClockReference {
                        command: command.name().to_string(),
                        arg: "-clock".to_string(),
                        span: value.span(),
                        position: command.position(),
                        resolution: Resolution::Eager,
                    },
                );
                if !self.design.is_clock_defined(clock) {
                    self.diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::UndefinedClock,
                            format!("clock `{clock}` is not defined"),
                        )
                        .with_label(value.span(), "not defined at this point")
                        .with_help(format!(
                            "define `{clock}` with create_clock before `{}`",
                            command.name()
                        )),
                    );
                }
                clocks.push(clock.clone());
            }
        }

        let ports = command
            .positionals()
            .iter()
            .skip(1)
            .flat_map(|value| ObjectList::parse(value).names().to_vec())
            .collect::<Vec<_>>();
        for port in &ports {
            match clocks.as_slice() {
                [] => self.design.add_port(port, direction, None),
                clocks => {
                    for clock in clocks {
                        self.design.add_port(port, direction, Some(clock.as_str()));
                    }
                }
            }
        }

        let constraint_type = match direction {
            PortDirection::Input => ConstraintType::InputDelay,
            PortDirection::Output => ConstraintType::OutputDelay,
        };
        self.design.log_constraint(ConstraintRecord {
            command: command.name().to_string(),
            target: command.positional(1).map(|target| target.to_string()),
            clock: clocks.first().cloned(),
            line: command.position().line,
            constraint_type,
        });
    }

    fn track_clock_groups(&mut self, command: &ParsedCommand) {
        let mut groups = Vec::new();

        for value in command.keyed_values("-group") {
            if value.contains('$') {
                continue;
            }
            let list = ObjectList::parse(value);
            if !list.is_clock_query() && !matches!(list, ObjectList::Names(_)) {
                continue;
            }
            let members = list
                .names()
                .iter()
                .filter(|member| !is_pattern(member))
                .cloned()
                .collect::<Vec<_>>();
            for member in &members {
                self.design.reference_clock(
                    member,
                    ClockReference {
                        command: command.name().to_string(),
                        arg: "-group".to_string(),
                        span: value.span(),
                        position: command.position(),
                        resolution: Resolution::Deferred,
                    },
                );
            }
            groups.push(members);
        }

        trace!(groups:?; "Recording clock groups");
        self.design.add_clock_group(ClockGroup {
            kind: ClockGroupKind::from_flags(command.bare_flags()),
            groups,
            line: command.position().line,
        });
        self.design.log_constraint(ConstraintRecord {
            command: command.name().to_string(),
            target: command.keyed_value("-name").map(|name| name.to_string()),
            clock: None,
            line: command.position().line,
            constraint_type: ConstraintType::ClockGroups,
        });
    }

    fn track_exception(&mut self, command: &ParsedCommand) {
        let target = command
            .keyed_value("-to")
            .or_else(|| command.keyed_value("-from"))
            .map(|target| target.to_string());
        self.design.log_constraint(ConstraintRecord {
            command: command.name().to_string(),
            target,
            clock: None,
            line: command.position().line,
            constraint_type: ConstraintType::Exception,
        });

        let span = command.full_span();
        if let Some(first) = self.design.record_exception(exception_signature(command), span) {
            self.diagnostics.emit(
                Diagnostic::new(
                    DiagnosticKind::DuplicateConstraint,
                    format!("`{}` repeats an earlier identical constraint", command.name()),
                )
                .with_label(span, "duplicate constraint")
                .with_secondary_label(first, "first given here")
                .with_help("remove one of the two constraints"),
            );
        }
    }

    /// Record clock names used through `[get_clocks ...]` or clock-valued
    /// flags. These are resolved after the whole file.
    fn record_clock_uses(&mut self, command: &ParsedCommand) {
        // A generated clock's `-source` is resolved eagerly instead.
        let keyed = command
            .keyed()
            .filter(|(flag, _)| *flag != "-source")
            .flat_map(|(flag, values)| {
                values
                    .iter()
                    .map(move |value| (flag, value, CLOCK_FLAGS.contains(&flag)))
            });
        let positional = command
            .positionals()
            .iter()
            .map(|value| ("positional", value, false));

        let mut uses = Vec::new();
        for (arg, value, clock_valued) in keyed.chain(positional) {
            if value.contains('$') {
                continue;
            }
            let list = ObjectList::parse(value);
            let names_clocks =
                list.is_clock_query() || (clock_valued && matches!(list, ObjectList::Names(_)));
            if !names_clocks {
                continue;
            }
            for name in list.names().iter().filter(|name| !is_pattern(name)) {
                uses.push((name.clone(), arg.to_string(), value.span()));
            }
        }

        for (name, arg, span) in uses {
            self.design.reference_clock(
                &name,
                ClockReference {
                    command: command.name().to_string(),
                    arg,
                    span,
                    position: command.position(),
                    resolution: Resolution::Deferred,
                },
            );
        }
    }

    /// Report deferred clock references that never resolved.
    fn finalize(&mut self) {
        let unresolved = self
            .design
            .unresolved_clock_references()
            .into_iter()
            .map(|(name, reference)| (name.to_string(), reference.clone()))
            .collect::<Vec<_>>();

        for (name, reference) in unresolved {
            self.diagnostics.emit(
                Diagnostic::new(
                    DiagnosticKind::UndefinedClock,
                    format!("clock `{name}` is referenced but never defined"),
                )
                .with_label(
                    reference.span,
                    format!("referenced by `{}` here", reference.command),
                )
                .with_help(format!(
                    "define `{name}` with create_clock or create_generated_clock"
                )),
            );
        }
    }
}

/// `create_generated_clock -source -divide_by 2 pin` leaves `-source` bare
/// and `pin` positional. Move the first positional onto `-source`.
fn rehome_generated_clock_source(command: &mut ParsedCommand) {
    if !command.is_bare("-source") {
        return;
    }
    if let Some(value) = command.remove_positional(0) {
        debug!(value = value.as_str(); "Moving positional argument onto `-source`");
        command.add_keyed("-source", value);
    }
}

/// A normalized form of a timing exception, for duplicate detection.
fn exception_signature(command: &ParsedCommand) -> String {
    let normalize = |value: &Argument| value.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut bare = command.bare_flags().collect::<Vec<_>>();
    bare.sort_unstable();

    let mut keyed = command
        .keyed()
        .map(|(flag, values)| {
            let values = values.iter().map(normalize).collect::<Vec<_>>().join("|");
            format!("{flag}={values}")
        })
        .collect::<Vec<_>>();
    keyed.sort_unstable();

    let positionals = command
        .positionals()
        .iter()
        .map(normalize)
        .collect::<Vec<_>>();

    format!(
        "{} {} {} {}",
        command.name(),
        bare.join(" "),
        keyed.join(" "),
        positionals.join(" ")
    )
}
