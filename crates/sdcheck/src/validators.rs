//! Value validators for command arguments.
//!
//! Each [`Validator`] id from the command registry maps to a pure predicate
//! over the argument text. Validators accept the value as written, after
//! variable substitution: optional surrounding quotes or braces are
//! stripped, unit suffixes are matched longest first, and range checks are
//! done on values normalized to base units (seconds, farads, volts).
//!
//! Unitless values take the default unit of their quantity: nanoseconds
//! for time, picofarads for capacitance, volts for voltage.
//!
//! Values embedding a bracketed sub-expression such as `[expr $p / 2]` are
//! not statically known and always pass.

use thiserror::Error;

use sdcheck_core::Validator;

/// Relative tolerance applied to range bounds after unit normalization.
const RANGE_EPSILON: f64 = 1e-9;

/// Characters accepted by `set_hierarchy_separator`.
pub const HIERARCHY_SEPARATORS: &[char] = &['/', '@', '^', '#', '.', '|'];

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value does not have the expected shape.
    #[error("{0}")]
    InvalidFormat(String),

    /// The value is well-formed but outside the accepted range.
    #[error("{0}")]
    OutOfRange(String),

    #[error("value is empty")]
    EmptyValue,
}

/// A physical quantity with a unit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Time,
    Capacitance,
    Resistance,
    Voltage,
    Current,
    Power,
    Distance,
}

impl Quantity {
    /// Unit suffixes and their scale to the base unit, longest suffix first.
    /// Suffixes are matched case-insensitively.
    fn units(self) -> &'static [(&'static str, f64)] {
        match self {
            Quantity::Time => &[
                ("fs", 1e-15),
                ("ps", 1e-12),
                ("ns", 1e-9),
                ("us", 1e-6),
                ("ms", 1e-3),
                ("s", 1.0),
            ],
            Quantity::Capacitance => &[
                ("ff", 1e-15),
                ("pf", 1e-12),
                ("nf", 1e-9),
                ("uf", 1e-6),
                ("f", 1.0),
            ],
            Quantity::Resistance => &[("kohm", 1e3), ("mohm", 1e6), ("ohm", 1.0)],
            Quantity::Voltage => &[("uv", 1e-6), ("mv", 1e-3), ("kv", 1e3), ("v", 1.0)],
            Quantity::Current => &[("na", 1e-9), ("ua", 1e-6), ("ma", 1e-3), ("a", 1.0)],
            Quantity::Power => &[
                ("pw", 1e-12),
                ("nw", 1e-9),
                ("uw", 1e-6),
                ("mw", 1e-3),
                ("w", 1.0),
            ],
            Quantity::Distance => &[
                ("nm", 1e-9),
                ("um", 1e-6),
                ("mm", 1e-3),
                ("cm", 1e-2),
                ("m", 1.0),
            ],
        }
    }

    /// Scale applied to values written without a unit.
    fn default_scale(self) -> f64 {
        match self {
            Quantity::Time => 1e-9,
            Quantity::Capacitance => 1e-12,
            Quantity::Resistance => 1e3,
            Quantity::Voltage => 1.0,
            Quantity::Current => 1e-3,
            Quantity::Power => 1e-3,
            Quantity::Distance => 1e-6,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Quantity::Time => "time",
            Quantity::Capacitance => "capacitance",
            Quantity::Resistance => "resistance",
            Quantity::Voltage => "voltage",
            Quantity::Current => "current",
            Quantity::Power => "power",
            Quantity::Distance => "distance",
        }
    }
}

/// Validate `value` with the validator named by `validator`.
pub fn validate(validator: Validator, value: &str) -> Result<(), ValueError> {
    if is_dynamic(value) {
        return Ok(());
    }
    let text = strip_delimiters(value);
    if text.is_empty() {
        return Err(ValueError::EmptyValue);
    }

    match validator {
        Validator::Real => parse_real(text).map(drop),
        Validator::PositiveReal => {
            let number = parse_real(text)?;
            check(number > 0.0, || format!("`{text}` must be greater than 0"))
        }
        Validator::NonNegativeReal => {
            let number = parse_real(text)?;
            check(number >= 0.0, || format!("`{text}` must not be negative"))
        }
        Validator::PositiveInteger => {
            let number = parse_integer(text)?;
            check(number > 0, || format!("`{text}` must be a positive integer"))
        }
        Validator::NonNegativeInteger => {
            let number = parse_integer(text)?;
            check(number >= 0, || format!("`{text}` must not be negative"))
        }
        Validator::Percentage => validate_percentage(text),
        Validator::HierarchySeparator => validate_hierarchy_separator(text),
        Validator::Time => parse_quantity(Quantity::Time, text).map(drop),
        Validator::Capacitance => parse_quantity(Quantity::Capacitance, text).map(drop),
        Validator::Resistance => parse_quantity(Quantity::Resistance, text).map(drop),
        Validator::Voltage => parse_quantity(Quantity::Voltage, text).map(drop),
        Validator::Current => parse_quantity(Quantity::Current, text).map(drop),
        Validator::Power => parse_quantity(Quantity::Power, text).map(drop),
        Validator::Distance => parse_quantity(Quantity::Distance, text).map(drop),
        Validator::Waveform => validate_waveform(text),
        Validator::EdgeList => validate_edge_list(text),
        Validator::NumberList => validate_number_list(text),
        Validator::ClockPeriod => validate_clock_period(text),
        Validator::Delay => validate_delay(text),
        Validator::Transition => validate_transition(text),
        Validator::ClockUncertainty => validate_clock_uncertainty(text),
        Validator::Jitter => validate_jitter(text),
        Validator::PathMargin => validate_path_margin(text),
        Validator::CapacitanceRange => validate_capacitance(text),
        Validator::GlitchThreshold => validate_glitch_threshold(text),
    }
}

/// A short fix suggestion for values rejected by `validator`.
pub fn suggestion(validator: Validator) -> &'static str {
    match validator {
        Validator::Real => "use a number such as `1.5`",
        Validator::PositiveReal => "use a number greater than 0",
        Validator::NonNegativeReal => "use a number of 0 or more",
        Validator::PositiveInteger => "use a whole number of 1 or more",
        Validator::NonNegativeInteger => "use a whole number of 0 or more",
        Validator::Percentage => "use a value between 0 and 100, optionally followed by `%`",
        Validator::HierarchySeparator => "use one of `/`, `@`, `^`, `#`, `.` or `|`",
        Validator::Time => "use a number with an optional unit (fs, ps, ns, us, ms, s)",
        Validator::Capacitance => "use a number with an optional unit (fF, pF, nF, uF, F)",
        Validator::Resistance => "use a number with an optional unit (ohm, kohm, Mohm)",
        Validator::Voltage => "use a number with an optional unit (uV, mV, V, kV)",
        Validator::Current => "use a number with an optional unit (nA, uA, mA, A)",
        Validator::Power => "use a number with an optional unit (pW, nW, uW, mW, W)",
        Validator::Distance => "use a number with an optional unit (nm, um, mm, cm, m)",
        Validator::Waveform => "use two edge times such as `{0 5}`",
        Validator::EdgeList => "use three edge numbers such as `{1 3 5}`",
        Validator::NumberList => "use a list of numbers such as `{0 0.5 1}`",
        Validator::ClockPeriod => "use a period between 1ps and 10ms, e.g. `10` for 10ns",
        Validator::Delay => "use a delay between 0 and 1ms",
        Validator::Transition => "use a transition time between 0 and 1ns",
        Validator::ClockUncertainty => "use an uncertainty between 0 and 10ns",
        Validator::Jitter => "use a jitter between 0 and 1ns",
        Validator::PathMargin => "use a margin between -10ns and 10ns",
        Validator::CapacitanceRange => "use a capacitance between 0 and 1nF",
        Validator::GlitchThreshold => "use a threshold between 0 and 1V",
    }
}

/// Returns `true` if `value` contains an expression whose value is only
/// known when the file is evaluated.
pub fn is_dynamic(value: &str) -> bool {
    value.contains('[')
}

/// Parse a quantity into base units.
///
/// Returns `None` for malformed or dynamic values.
pub fn quantity_value(quantity: Quantity, value: &str) -> Option<f64> {
    if is_dynamic(value) {
        return None;
    }
    parse_quantity(quantity, strip_delimiters(value)).ok()
}

/// Parse a time value into seconds. Unitless values are nanoseconds.
pub fn time_seconds(value: &str) -> Option<f64> {
    quantity_value(Quantity::Time, value)
}

/// Remove one layer of surrounding quotes or braces, and outer whitespace.
fn strip_delimiters(value: &str) -> &str {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .or_else(|| {
            trimmed
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
        });
    inner.map_or(trimmed, str::trim)
}

fn check(ok: bool, message: impl FnOnce() -> String) -> Result<(), ValueError> {
    if ok {
        Ok(())
    } else {
        Err(ValueError::OutOfRange(message()))
    }
}

fn parse_real(text: &str) -> Result<f64, ValueError> {
    text.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| ValueError::InvalidFormat(format!("`{text}` is not a number")))
}

fn parse_integer(text: &str) -> Result<i64, ValueError> {
    text.parse::<i64>()
        .map_err(|_| ValueError::InvalidFormat(format!("`{text}` is not an integer")))
}

/// Parse a unit-suffixed quantity into base units.
fn parse_quantity(quantity: Quantity, text: &str) -> Result<f64, ValueError> {
    let lower = text.to_ascii_lowercase();

    for (suffix, scale) in quantity.units() {
        let Some(number) = lower.strip_suffix(suffix) else {
            continue;
        };
        return match number.trim_end().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value * scale),
            _ => Err(ValueError::InvalidFormat(format!(
                "`{text}` is not a valid {} value",
                quantity.name()
            ))),
        };
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value * quantity.default_scale()),
        _ => Err(ValueError::InvalidFormat(format!(
            "`{text}` is not a valid {} value",
            quantity.name()
        ))),
    }
}

/// Check that `value` lies in `[min, max]`, with a small relative tolerance.
fn in_range(value: f64, min: f64, max: f64) -> bool {
    value >= min - min.abs() * RANGE_EPSILON && value <= max + max.abs() * RANGE_EPSILON
}

fn validate_range(
    quantity: Quantity,
    text: &str,
    (min, max): (f64, f64),
    what: &str,
    bounds: &str,
) -> Result<(), ValueError> {
    let value = parse_quantity(quantity, text)?;
    check(in_range(value, min, max), || {
        format!("{what} `{text}` is outside the range {bounds}")
    })
}

fn validate_percentage(text: &str) -> Result<(), ValueError> {
    let number = text.strip_suffix('%').unwrap_or(text).trim_end();
    let value = parse_real(number)?;
    check((0.0..=100.0).contains(&value), || {
        format!("percentage `{text}` must be between 0 and 100")
    })
}

fn validate_hierarchy_separator(text: &str) -> Result<(), ValueError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if HIERARCHY_SEPARATORS.contains(&c) => Ok(()),
        (Some(_), None) => Err(ValueError::OutOfRange(format!(
            "`{text}` is not an allowed hierarchy separator"
        ))),
        _ => Err(ValueError::InvalidFormat(format!(
            "hierarchy separator `{text}` must be a single character"
        ))),
    }
}

fn validate_waveform(text: &str) -> Result<(), ValueError> {
    let edges = text.split_whitespace().collect::<Vec<_>>();
    if edges.len() != 2 {
        return Err(ValueError::InvalidFormat(format!(
            "waveform `{text}` must list exactly 2 edge times, found {}",
            edges.len()
        )));
    }
    for edge in edges {
        parse_quantity(Quantity::Time, edge)?;
    }
    Ok(())
}

fn validate_edge_list(text: &str) -> Result<(), ValueError> {
    let edges = text.split_whitespace().collect::<Vec<_>>();
    if edges.len() != 3 {
        return Err(ValueError::InvalidFormat(format!(
            "edge list `{text}` must list exactly 3 edges, found {}",
            edges.len()
        )));
    }
    for edge in edges {
        let number = parse_integer(edge)?;
        check(number > 0, || format!("edge `{edge}` must be a positive integer"))?;
    }
    Ok(())
}

fn validate_number_list(text: &str) -> Result<(), ValueError> {
    for item in text.split_whitespace() {
        parse_real(item)?;
    }
    Ok(())
}

/// Accepts periods in `[1ps, 10ms]`.
pub fn validate_clock_period(text: &str) -> Result<(), ValueError> {
    validate_range(Quantity::Time, text, (1e-12, 1e-2), "clock period", "[1ps, 10ms]")
}

/// Accepts delays in `[0, 1ms]`.
pub fn validate_delay(text: &str) -> Result<(), ValueError> {
    validate_range(Quantity::Time, text, (0.0, 1e-3), "delay", "[0, 1ms]")
}

/// Accepts transition times in `[0, 1ns]`.
pub fn validate_transition(text: &str) -> Result<(), ValueError> {
    validate_range(Quantity::Time, text, (0.0, 1e-9), "transition", "[0, 1ns]")
}

/// Accepts clock uncertainties in `[0, 10ns]`.
pub fn validate_clock_uncertainty(text: &str) -> Result<(), ValueError> {
    validate_range(Quantity::Time, text, (0.0, 1e-8), "clock uncertainty", "[0, 10ns]")
}

/// Accepts jitter in `[0, 1ns]`.
pub fn validate_jitter(text: &str) -> Result<(), ValueError> {
    validate_range(Quantity::Time, text, (0.0, 1e-9), "jitter", "[0, 1ns]")
}

/// Accepts path margins in `[-10ns, 10ns]`.
pub fn validate_path_margin(text: &str) -> Result<(), ValueError> {
    validate_range(Quantity::Time, text, (-1e-8, 1e-8), "path margin", "[-10ns, 10ns]")
}

/// Accepts capacitances in `[0, 1nF]`.
pub fn validate_capacitance(text: &str) -> Result<(), ValueError> {
    validate_range(Quantity::Capacitance, text, (0.0, 1e-9), "capacitance", "[0, 1nF]")
}

/// Accepts glitch thresholds in `[0, 1V]`.
pub fn validate_glitch_threshold(text: &str) -> Result<(), ValueError> {
    validate_range(Quantity::Voltage, text, (0.0, 1.0), "glitch threshold", "[0, 1V]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn is_format_error(result: Result<(), ValueError>) -> bool {
        matches!(result, Err(ValueError::InvalidFormat(_)))
    }

    fn is_range_error(result: Result<(), ValueError>) -> bool {
        matches!(result, Err(ValueError::OutOfRange(_)))
    }

    #[test]
    fn test_clock_period_bounds() {
        assert!(validate_clock_period("1ps").is_ok());
        assert!(validate_clock_period("10ms").is_ok());
        assert!(validate_clock_period("0.001").is_ok());
        assert!(validate_clock_period("1e7ps").is_ok());

        assert!(is_range_error(validate_clock_period("0.999ps")));
        assert!(is_range_error(validate_clock_period("10.001ms")));
        assert!(is_range_error(validate_clock_period("0")));
        assert!(is_range_error(validate_clock_period("-5")));
        assert!(is_format_error(validate_clock_period("fast")));
    }

    #[test]
    fn test_unitless_time_is_nanoseconds() {
        assert!(approx_eq!(f64, time_seconds("10.0").unwrap(), 10e-9, epsilon = 1e-20));
        assert!(approx_eq!(f64, time_seconds("10ns").unwrap(), 10e-9, epsilon = 1e-20));
        assert!(approx_eq!(f64, time_seconds("{2.5}").unwrap(), 2.5e-9, epsilon = 1e-20));
        assert_eq!(time_seconds("[expr 1]"), None);
        assert_eq!(time_seconds("abc"), None);
    }

    #[test]
    fn test_longest_suffix_wins() {
        let ms = parse_quantity(Quantity::Time, "3ms").unwrap();
        assert!(approx_eq!(f64, ms, 3e-3, ulps = 2));
        let us = parse_quantity(Quantity::Time, "3us").unwrap();
        assert!(approx_eq!(f64, us, 3e-6, ulps = 2));
        let s = parse_quantity(Quantity::Time, "3s").unwrap();
        assert!(approx_eq!(f64, s, 3.0, ulps = 2));

        let kohm = parse_quantity(Quantity::Resistance, "2kohm").unwrap();
        assert!(approx_eq!(f64, kohm, 2e3, ulps = 2));
        let ff = parse_quantity(Quantity::Capacitance, "15fF").unwrap();
        assert!(approx_eq!(f64, ff, 15e-15, ulps = 2));
        let pf = parse_quantity(Quantity::Capacitance, "0.5").unwrap();
        assert!(approx_eq!(f64, pf, 0.5e-12, ulps = 2));
    }

    #[test]
    fn test_unknown_unit_is_format_error() {
        assert!(is_format_error(validate(Validator::Time, "5xs")));
        assert!(is_format_error(validate(Validator::Time, "5 apples")));
        assert!(validate(Validator::Time, "5 ns").is_ok());
        assert!(validate(Validator::Time, "-2.5").is_ok());
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(validate(Validator::Time, ""), Err(ValueError::EmptyValue));
        assert_eq!(validate(Validator::Real, "{ }"), Err(ValueError::EmptyValue));
        assert_eq!(validate(Validator::Real, "\"\""), Err(ValueError::EmptyValue));
    }

    #[test]
    fn test_dynamic_values_pass() {
        for validator in Validator::ALL {
            assert!(validate(validator, "[expr $p / 2]").is_ok(), "{validator}");
        }
    }

    #[test]
    fn test_numbers() {
        assert!(validate(Validator::Real, "-1e3").is_ok());
        assert!(is_format_error(validate(Validator::Real, "inf")));
        assert!(is_range_error(validate(Validator::PositiveReal, "0")));
        assert!(validate(Validator::NonNegativeReal, "0").is_ok());
        assert!(validate(Validator::PositiveInteger, "2").is_ok());
        assert!(is_format_error(validate(Validator::PositiveInteger, "2.5")));
        assert!(is_range_error(validate(Validator::PositiveInteger, "0")));
        assert!(is_range_error(validate(Validator::NonNegativeInteger, "-1")));
    }

    #[test]
    fn test_percentage() {
        assert!(validate(Validator::Percentage, "50").is_ok());
        assert!(validate(Validator::Percentage, "100%").is_ok());
        assert!(is_range_error(validate(Validator::Percentage, "101")));
        assert!(is_format_error(validate(Validator::Percentage, "half")));
    }

    #[test]
    fn test_hierarchy_separator() {
        for separator in HIERARCHY_SEPARATORS {
            assert!(validate(Validator::HierarchySeparator, &separator.to_string()).is_ok());
        }
        assert!(is_range_error(validate(Validator::HierarchySeparator, ":")));
        assert!(is_format_error(validate(Validator::HierarchySeparator, "//")));
    }

    #[test]
    fn test_structured_lists() {
        assert!(validate(Validator::Waveform, "{0 5}").is_ok());
        assert!(validate(Validator::Waveform, "0 2.5ns").is_ok());
        assert!(is_format_error(validate(Validator::Waveform, "{0 5 10}")));
        assert!(is_format_error(validate(Validator::Waveform, "{0 x}")));

        assert!(validate(Validator::EdgeList, "{1 3 5}").is_ok());
        assert!(is_format_error(validate(Validator::EdgeList, "{1 3}")));
        assert!(is_format_error(validate(Validator::EdgeList, "{1 3 5.5}")));

        assert!(validate(Validator::NumberList, "{0 0.5 -1}").is_ok());
        assert!(is_format_error(validate(Validator::NumberList, "{0 a}")));
    }

    #[test]
    fn test_absolute_ranges() {
        assert!(validate(Validator::Delay, "1ms").is_ok());
        assert!(is_range_error(validate(Validator::Delay, "2ms")));
        assert!(validate(Validator::Transition, "0.2").is_ok());
        assert!(is_range_error(validate(Validator::Transition, "2")));
        assert!(validate(Validator::ClockUncertainty, "10").is_ok());
        assert!(is_range_error(validate(Validator::ClockUncertainty, "11")));
        assert!(is_range_error(validate(Validator::Jitter, "1.5ns")));
        assert!(validate(Validator::PathMargin, "-10").is_ok());
        assert!(is_range_error(validate(Validator::PathMargin, "-11")));
        assert!(validate(Validator::CapacitanceRange, "1000").is_ok());
        assert!(is_range_error(validate(Validator::CapacitanceRange, "2nF")));
        assert!(validate(Validator::GlitchThreshold, "800mV").is_ok());
        assert!(is_range_error(validate(Validator::GlitchThreshold, "1.2")));
    }

    #[test]
    fn test_every_validator_has_suggestion() {
        for validator in Validator::ALL {
            assert!(!suggestion(validator).is_empty());
        }
    }
}
