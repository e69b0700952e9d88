//! Diagnostic kinds for the sdcheck diagnostic system.
//!
//! Every diagnostic carries exactly one kind from this closed enumeration.
//! The snake_case name returned by [`DiagnosticKind::as_str`] is the stable
//! machine-readable identifier consumed by repair tooling; it is also the
//! name used to suppress warnings.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::error::Severity;

/// Error returned when a diagnostic kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagnostic kind `{0}`")]
pub struct UnknownKind(pub String);

/// The kind of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    // =========================================================================
    // Errors
    // =========================================================================
    /// A required argument of a known command is missing.
    MissingRequiredArg,

    /// The command name is not in the command registry.
    UnknownCommand,

    /// An argument value is well-formed but not acceptable (out of range,
    /// not one of the allowed keywords).
    InvalidArgValue,

    /// An argument value does not have the expected shape (not a number,
    /// wrong list length, unknown unit).
    InvalidArgType,

    /// Too few or too many positional arguments.
    InvalidArgCount,

    /// A `{` without a matching `}`, or a stray `}`.
    UnmatchedBrace,

    /// A `[` without a matching `]`, or a stray `]`.
    UnmatchedBracket,

    /// A `"` without a closing `"`.
    UnmatchedQuote,

    /// An object list that resolves to nothing.
    EmptyObjectList,

    /// A hierarchy separator that is not a single allowed character.
    InvalidHierarchySeparator,

    /// A `$name` reference to a variable that was never `set`.
    UndefinedVariable,

    /// A reference to a clock that is never defined.
    UndefinedClock,

    /// A reference to a port that is never defined.
    UndefinedPort,

    /// A reference to a pin that is never defined.
    UndefinedPin,

    /// A clock name defined more than once.
    DuplicateClock,

    /// A timing exception identical to an earlier one.
    DuplicateConstraint,

    /// A generated clock that names itself as its source.
    SelfReferencingClock,

    // =========================================================================
    // Warnings
    // =========================================================================
    /// A negative value on a delay-like command.
    NegativeDelay,

    /// A clock with a zero period.
    ZeroPeriod,

    /// A clock uncertainty large enough to be suspicious.
    LargeUncertainty,

    /// A bare `*` or `**` wildcard object pattern.
    AmbiguousWildcard,

    /// A command that should be given an explicit `-name`.
    MissingRecommendedName,

    /// A definition that likely duplicates an earlier one.
    DuplicateDefinition,

    /// A clock period outside the range of realistic designs.
    UnrealisticPeriod,

    /// A delay outside the range of realistic designs.
    UnrealisticDelay,

    /// A transition time outside the range of realistic designs.
    UnrealisticTransition,
}

impl DiagnosticKind {
    /// Every kind, errors first.
    pub const ALL: [DiagnosticKind; 26] = [
        DiagnosticKind::MissingRequiredArg,
        DiagnosticKind::UnknownCommand,
        DiagnosticKind::InvalidArgValue,
        DiagnosticKind::InvalidArgType,
        DiagnosticKind::InvalidArgCount,
        DiagnosticKind::UnmatchedBrace,
        DiagnosticKind::UnmatchedBracket,
        DiagnosticKind::UnmatchedQuote,
        DiagnosticKind::EmptyObjectList,
        DiagnosticKind::InvalidHierarchySeparator,
        DiagnosticKind::UndefinedVariable,
        DiagnosticKind::UndefinedClock,
        DiagnosticKind::UndefinedPort,
        DiagnosticKind::UndefinedPin,
        DiagnosticKind::DuplicateClock,
        DiagnosticKind::DuplicateConstraint,
        DiagnosticKind::SelfReferencingClock,
        DiagnosticKind::NegativeDelay,
        DiagnosticKind::ZeroPeriod,
        DiagnosticKind::LargeUncertainty,
        DiagnosticKind::AmbiguousWildcard,
        DiagnosticKind::MissingRecommendedName,
        DiagnosticKind::DuplicateDefinition,
        DiagnosticKind::UnrealisticPeriod,
        DiagnosticKind::UnrealisticDelay,
        DiagnosticKind::UnrealisticTransition,
    ];

    /// Returns the stable machine-readable name (e.g. `"undefined_clock"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingRequiredArg => "missing_required_arg",
            DiagnosticKind::UnknownCommand => "unknown_command",
            DiagnosticKind::InvalidArgValue => "invalid_arg_value",
            DiagnosticKind::InvalidArgType => "invalid_arg_type",
            DiagnosticKind::InvalidArgCount => "invalid_arg_count",
            DiagnosticKind::UnmatchedBrace => "unmatched_brace",
            DiagnosticKind::UnmatchedBracket => "unmatched_bracket",
            DiagnosticKind::UnmatchedQuote => "unmatched_quote",
            DiagnosticKind::EmptyObjectList => "empty_object_list",
            DiagnosticKind::InvalidHierarchySeparator => "invalid_hierarchy_separator",
            DiagnosticKind::UndefinedVariable => "undefined_variable",
            DiagnosticKind::UndefinedClock => "undefined_clock",
            DiagnosticKind::UndefinedPort => "undefined_port",
            DiagnosticKind::UndefinedPin => "undefined_pin",
            DiagnosticKind::DuplicateClock => "duplicate_clock",
            DiagnosticKind::DuplicateConstraint => "duplicate_constraint",
            DiagnosticKind::SelfReferencingClock => "self_referencing_clock",
            DiagnosticKind::NegativeDelay => "negative_delay",
            DiagnosticKind::ZeroPeriod => "zero_period",
            DiagnosticKind::LargeUncertainty => "large_uncertainty",
            DiagnosticKind::AmbiguousWildcard => "ambiguous_wildcard",
            DiagnosticKind::MissingRecommendedName => "missing_recommended_name",
            DiagnosticKind::DuplicateDefinition => "duplicate_definition",
            DiagnosticKind::UnrealisticPeriod => "unrealistic_period",
            DiagnosticKind::UnrealisticDelay => "unrealistic_delay",
            DiagnosticKind::UnrealisticTransition => "unrealistic_transition",
        }
    }

    /// Returns a short description of what this kind means.
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingRequiredArg => "missing required argument",
            DiagnosticKind::UnknownCommand => "unknown command",
            DiagnosticKind::InvalidArgValue => "invalid argument value",
            DiagnosticKind::InvalidArgType => "invalid argument type",
            DiagnosticKind::InvalidArgCount => "invalid argument count",
            DiagnosticKind::UnmatchedBrace => "unmatched brace",
            DiagnosticKind::UnmatchedBracket => "unmatched bracket",
            DiagnosticKind::UnmatchedQuote => "unmatched quote",
            DiagnosticKind::EmptyObjectList => "empty object list",
            DiagnosticKind::InvalidHierarchySeparator => "invalid hierarchy separator",
            DiagnosticKind::UndefinedVariable => "undefined variable",
            DiagnosticKind::UndefinedClock => "undefined clock",
            DiagnosticKind::UndefinedPort => "undefined port",
            DiagnosticKind::UndefinedPin => "undefined pin",
            DiagnosticKind::DuplicateClock => "duplicate clock",
            DiagnosticKind::DuplicateConstraint => "duplicate constraint",
            DiagnosticKind::SelfReferencingClock => "self-referencing generated clock",
            DiagnosticKind::NegativeDelay => "negative delay",
            DiagnosticKind::ZeroPeriod => "zero clock period",
            DiagnosticKind::LargeUncertainty => "large clock uncertainty",
            DiagnosticKind::AmbiguousWildcard => "ambiguous wildcard",
            DiagnosticKind::MissingRecommendedName => "missing recommended name",
            DiagnosticKind::DuplicateDefinition => "possible duplicate definition",
            DiagnosticKind::UnrealisticPeriod => "unrealistic clock period",
            DiagnosticKind::UnrealisticDelay => "unrealistic delay",
            DiagnosticKind::UnrealisticTransition => "unrealistic transition",
        }
    }

    /// Returns the fixed severity of this kind.
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::NegativeDelay
            | DiagnosticKind::ZeroPeriod
            | DiagnosticKind::LargeUncertainty
            | DiagnosticKind::AmbiguousWildcard
            | DiagnosticKind::MissingRecommendedName
            | DiagnosticKind::DuplicateDefinition
            | DiagnosticKind::UnrealisticPeriod
            | DiagnosticKind::UnrealisticDelay
            | DiagnosticKind::UnrealisticTransition => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagnosticKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
