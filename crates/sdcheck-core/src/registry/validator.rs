//! Identifiers for the value validators referenced by argument specs.
//!
//! The validators themselves live in the checker; the registry only names
//! them. Names are stable snake_case strings so that command tables loaded
//! from configuration can refer to them.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Error returned when a validator name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validator `{0}`")]
pub struct UnknownValidator(pub String);

/// A value validator identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    // Plain numbers
    Real,
    PositiveReal,
    NonNegativeReal,
    PositiveInteger,
    NonNegativeInteger,
    Percentage,
    HierarchySeparator,

    // Unit-suffixed physical quantities
    Time,
    Capacitance,
    Resistance,
    Voltage,
    Current,
    Power,
    Distance,

    // Structured lists
    Waveform,
    EdgeList,
    NumberList,

    // Absolute ranges with unit normalization
    ClockPeriod,
    Delay,
    Transition,
    ClockUncertainty,
    Jitter,
    PathMargin,
    CapacitanceRange,
    GlitchThreshold,
}

impl Validator {
    /// Every validator, in declaration order.
    pub const ALL: [Validator; 25] = [
        Validator::Real,
        Validator::PositiveReal,
        Validator::NonNegativeReal,
        Validator::PositiveInteger,
        Validator::NonNegativeInteger,
        Validator::Percentage,
        Validator::HierarchySeparator,
        Validator::Time,
        Validator::Capacitance,
        Validator::Resistance,
        Validator::Voltage,
        Validator::Current,
        Validator::Power,
        Validator::Distance,
        Validator::Waveform,
        Validator::EdgeList,
        Validator::NumberList,
        Validator::ClockPeriod,
        Validator::Delay,
        Validator::Transition,
        Validator::ClockUncertainty,
        Validator::Jitter,
        Validator::PathMargin,
        Validator::CapacitanceRange,
        Validator::GlitchThreshold,
    ];

    /// Returns the stable identifier of this validator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Validator::Real => "real",
            Validator::PositiveReal => "positive_real",
            Validator::NonNegativeReal => "non_negative_real",
            Validator::PositiveInteger => "positive_integer",
            Validator::NonNegativeInteger => "non_negative_integer",
            Validator::Percentage => "percentage",
            Validator::HierarchySeparator => "hierarchy_separator",
            Validator::Time => "time",
            Validator::Capacitance => "capacitance",
            Validator::Resistance => "resistance",
            Validator::Voltage => "voltage",
            Validator::Current => "current",
            Validator::Power => "power",
            Validator::Distance => "distance",
            Validator::Waveform => "waveform",
            Validator::EdgeList => "edge_list",
            Validator::NumberList => "number_list",
            Validator::ClockPeriod => "clock_period",
            Validator::Delay => "delay",
            Validator::Transition => "transition",
            Validator::ClockUncertainty => "clock_uncertainty",
            Validator::Jitter => "jitter",
            Validator::PathMargin => "path_margin",
            Validator::CapacitanceRange => "capacitance_range",
            Validator::GlitchThreshold => "glitch_threshold",
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Validator {
    type Err = UnknownValidator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Validator::ALL
            .into_iter()
            .find(|validator| validator.as_str() == s)
            .ok_or_else(|| UnknownValidator(s.to_string()))
    }
}
