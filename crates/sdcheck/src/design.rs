//! Running model of the design described by one constraint file.
//!
//! The [`DesignContext`] records what the file defines (clocks, generated
//! clocks, constrained ports) and how definitions are used (clock
//! references, clock groups, the order of constraints). The checker
//! updates it command by command and queries it for cross-reference
//! checks.
//!
//! Clock references come in two flavors. Eager references are checked when
//! the referencing command is processed; deferred references are checked
//! once, after the whole file, so they may refer to clocks defined later.

use std::fmt;

use indexmap::IndexMap;
use log::trace;

use sdcheck_parser::{Position, Span};

/// A clock defined by `create_clock`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockInfo {
    pub name: String,
    /// Period in seconds, when it is statically known.
    pub period: Option<f64>,
    /// The source object expression, e.g. `[get_ports clk]`.
    pub source: Option<String>,
    /// Object names of the source, e.g. `clk`.
    pub source_objects: Vec<String>,
    pub span: Span,
    pub position: Position,
}

/// A clock defined by `create_generated_clock`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedClockInfo {
    pub name: String,
    pub source: String,
    pub master: Option<String>,
    pub span: Span,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// A port constrained by `set_input_delay` or `set_output_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub direction: PortDirection,
    pub is_clocked: bool,
    pub clocks: Vec<String>,
}

/// How a clock reference is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Checked when the referencing command is processed.
    Eager,
    /// Checked after the whole file has been processed.
    Deferred,
}

/// One use of a clock name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReference {
    pub command: String,
    pub arg: String,
    pub span: Span,
    pub position: Position,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    Clock,
    GeneratedClock,
    InputDelay,
    OutputDelay,
    ClockGroups,
    Exception,
}

/// An entry of the constraint log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRecord {
    pub command: String,
    pub target: Option<String>,
    pub clock: Option<String>,
    pub line: usize,
    pub constraint_type: ConstraintType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockGroupKind {
    Asynchronous,
    LogicallyExclusive,
    PhysicallyExclusive,
}

impl ClockGroupKind {
    /// Determine the relationship from the flags of `set_clock_groups`.
    pub fn from_flags<'a>(mut flags: impl Iterator<Item = &'a str>) -> Option<Self> {
        flags.find_map(|flag| match flag {
            "-asynchronous" => Some(Self::Asynchronous),
            "-logically_exclusive" => Some(Self::LogicallyExclusive),
            "-physically_exclusive" => Some(Self::PhysicallyExclusive),
            _ => None,
        })
    }
}

impl fmt::Display for ClockGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asynchronous => write!(f, "asynchronous"),
            Self::LogicallyExclusive => write!(f, "logically_exclusive"),
            Self::PhysicallyExclusive => write!(f, "physically_exclusive"),
        }
    }
}

/// Clock relationship declared by one `set_clock_groups`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockGroup {
    pub kind: Option<ClockGroupKind>,
    /// Member clocks of each `-group`.
    pub groups: Vec<Vec<String>>,
    pub line: usize,
}

/// Per-file design model.
#[derive(Debug, Default)]
pub struct DesignContext {
    clocks: IndexMap<String, ClockInfo>,
    generated_clocks: IndexMap<String, GeneratedClockInfo>,
    ports: IndexMap<String, PortInfo>,
    clock_references: IndexMap<String, Vec<ClockReference>>,
    constraints: Vec<ConstraintRecord>,
    clock_groups: Vec<ClockGroup>,
    exceptions: IndexMap<String, Span>,
}

impl DesignContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock is defined by either `create_clock` or
    /// `create_generated_clock`.
    pub fn is_clock_defined(&self, name: &str) -> bool {
        self.clocks.contains_key(name) || self.generated_clocks.contains_key(name)
    }

    /// Span of the definition of clock `name`.
    pub fn clock_definition(&self, name: &str) -> Option<Span> {
        self.clocks
            .get(name)
            .map(|clock| clock.span)
            .or_else(|| self.generated_clocks.get(name).map(|clock| clock.span))
    }

    /// A defined clock whose name equals `name` ignoring case but not
    /// exactly.
    pub fn clock_with_similar_name(&self, name: &str) -> Option<&str> {
        self.clock_names()
            .find(|defined| *defined != name && defined.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if `object` names a defined clock, or the source
    /// object of a defined clock.
    pub fn is_clock_or_source(&self, object: &str) -> bool {
        self.is_clock_defined(object)
            || self
                .clocks
                .values()
                .any(|clock| clock.source_objects.iter().any(|source| source == object))
    }

    pub fn clock_names(&self) -> impl Iterator<Item = &str> {
        self.clocks
            .keys()
            .chain(self.generated_clocks.keys())
            .map(String::as_str)
    }

    pub fn clock(&self, name: &str) -> Option<&ClockInfo> {
        self.clocks.get(name)
    }

    pub fn generated_clock(&self, name: &str) -> Option<&GeneratedClockInfo> {
        self.generated_clocks.get(name)
    }

    /// The shortest statically known clock period, in seconds.
    pub fn fastest_clock_period(&self) -> Option<f64> {
        self.clocks
            .values()
            .filter_map(|clock| clock.period)
            .filter(|period| *period > 0.0)
            .min_by(f64::total_cmp)
    }

    pub fn add_clock(&mut self, clock: ClockInfo) {
        trace!(name = clock.name, period:? = clock.period; "Registering clock");
        self.constraints.push(ConstraintRecord {
            command: "create_clock".to_string(),
            target: clock.source.clone(),
            clock: Some(clock.name.clone()),
            line: clock.position.line,
            constraint_type: ConstraintType::Clock,
        });
        self.clocks.insert(clock.name.clone(), clock);
    }

    pub fn add_generated_clock(&mut self, clock: GeneratedClockInfo) {
        trace!(name = clock.name, source = clock.source; "Registering generated clock");
        self.constraints.push(ConstraintRecord {
            command: "create_generated_clock".to_string(),
            target: Some(clock.source.clone()),
            clock: Some(clock.name.clone()),
            line: clock.position.line,
            constraint_type: ConstraintType::GeneratedClock,
        });
        self.generated_clocks.insert(clock.name.clone(), clock);
    }

    /// Record that `port` is constrained in `direction`, optionally
    /// relative to `clock`.
    pub fn add_port(&mut self, port: &str, direction: PortDirection, clock: Option<&str>) {
        let info = self.ports.entry(port.to_string()).or_insert(PortInfo {
            direction,
            is_clocked: false,
            clocks: Vec::new(),
        });
        if let Some(clock) = clock {
            info.is_clocked = true;
            if !info.clocks.iter().any(|known| known == clock) {
                info.clocks.push(clock.to_string());
            }
        }
    }

    pub fn port(&self, name: &str) -> Option<&PortInfo> {
        self.ports.get(name)
    }

    /// Record a use of clock `name`, whether or not it is defined yet.
    pub fn reference_clock(&mut self, name: &str, reference: ClockReference) {
        self.clock_references
            .entry(name.to_string())
            .or_default()
            .push(reference);
    }

    /// Every use of clock `name`.
    pub fn references(&self, name: &str) -> &[ClockReference] {
        self.clock_references
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Deferred references to clocks that are never defined, one per clock
    /// name, paired with the first such reference.
    pub fn unresolved_clock_references(&self) -> Vec<(&str, &ClockReference)> {
        self.clock_references
            .iter()
            .filter(|(name, _)| !self.is_clock_defined(name))
            .filter_map(|(name, references)| {
                references
                    .iter()
                    .find(|reference| reference.resolution == Resolution::Deferred)
                    .map(|reference| (name.as_str(), reference))
            })
            .collect()
    }

    pub fn log_constraint(&mut self, record: ConstraintRecord) {
        self.constraints.push(record);
    }

    /// Every logged constraint, in source order.
    pub fn constraints(&self) -> &[ConstraintRecord] {
        &self.constraints
    }

    pub fn add_clock_group(&mut self, group: ClockGroup) {
        self.clock_groups.push(group);
    }

    pub fn clock_groups(&self) -> &[ClockGroup] {
        &self.clock_groups
    }

    /// Record a timing exception by its normalized signature.
    ///
    /// Returns the span of an earlier exception with the same signature.
    pub fn record_exception(&mut self, signature: String, span: Span) -> Option<Span> {
        match self.exceptions.get(&signature) {
            Some(first) => Some(*first),
            None => {
                self.exceptions.insert(signature, span);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(name: &str, period: Option<f64>, source: &str) -> ClockInfo {
        ClockInfo {
            name: name.to_string(),
            period,
            source: Some(format!("[get_ports {source}]")),
            source_objects: vec![source.to_string()],
            span: Span::new(0..12),
            position: Position::new(1, 1),
        }
    }

    fn reference(resolution: Resolution, line: usize) -> ClockReference {
        ClockReference {
            command: "set_clock_groups".to_string(),
            arg: "-group".to_string(),
            span: Span::new(0..1),
            position: Position::new(line, 1),
            resolution,
        }
    }

    #[test]
    fn test_clock_definition_covers_both_maps() {
        let mut design = DesignContext::new();
        design.add_clock(clock("clk", Some(10e-9), "clk_pin"));
        design.add_generated_clock(GeneratedClockInfo {
            name: "div2".to_string(),
            source: "clk".to_string(),
            master: None,
            span: Span::new(20..42),
            position: Position::new(2, 1),
        });

        assert!(design.is_clock_defined("clk"));
        assert!(design.is_clock_defined("div2"));
        assert!(!design.is_clock_defined("other"));
        assert_eq!(design.clock_definition("div2"), Some(Span::new(20..42)));
        assert!(design.is_clock_or_source("clk_pin"));
        assert_eq!(design.clock_names().collect::<Vec<_>>(), ["clk", "div2"]);
        assert_eq!(design.constraints().len(), 2);
    }

    #[test]
    fn test_fastest_clock_period() {
        let mut design = DesignContext::new();
        assert_eq!(design.fastest_clock_period(), None);

        design.add_clock(clock("slow", Some(20e-9), "a"));
        design.add_clock(clock("fast", Some(2e-9), "b"));
        design.add_clock(clock("unknown", None, "c"));
        assert_eq!(design.fastest_clock_period(), Some(2e-9));
    }

    #[test]
    fn test_similar_clock_name() {
        let mut design = DesignContext::new();
        design.add_clock(clock("clk", None, "a"));
        assert_eq!(design.clock_with_similar_name("CLK"), Some("clk"));
        assert_eq!(design.clock_with_similar_name("clk"), None);
    }

    #[test]
    fn test_unresolved_references_are_deferred_only() {
        let mut design = DesignContext::new();
        design.reference_clock("late", reference(Resolution::Deferred, 1));
        design.reference_clock("late", reference(Resolution::Deferred, 2));
        design.reference_clock("eager", reference(Resolution::Eager, 3));
        design.reference_clock("defined", reference(Resolution::Deferred, 4));
        design.add_clock(clock("defined", None, "a"));

        let unresolved = design.unresolved_clock_references();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].0, "late");
        assert_eq!(unresolved[0].1.position.line, 1);
        assert_eq!(design.references("late").len(), 2);
    }

    #[test]
    fn test_ports_merge_clocks() {
        let mut design = DesignContext::new();
        design.add_port("din", PortDirection::Input, None);
        design.add_port("din", PortDirection::Input, Some("clk"));
        design.add_port("din", PortDirection::Input, Some("clk"));

        let port = design.port("din").unwrap();
        assert!(port.is_clocked);
        assert_eq!(port.clocks, ["clk"]);
    }

    #[test]
    fn test_record_exception() {
        let mut design = DesignContext::new();
        assert_eq!(design.record_exception("a".to_string(), Span::new(0..5)), None);
        assert_eq!(
            design.record_exception("a".to_string(), Span::new(10..15)),
            Some(Span::new(0..5))
        );
    }

    #[test]
    fn test_clock_group_kind_from_flags() {
        let flags = ["-allow_paths", "-logically_exclusive"];
        assert_eq!(
            ClockGroupKind::from_flags(flags.into_iter()),
            Some(ClockGroupKind::LogicallyExclusive)
        );
        assert_eq!(ClockGroupKind::from_flags(std::iter::empty()), None);
    }
}
