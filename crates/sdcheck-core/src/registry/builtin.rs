//! The built-in SDC command table.

use crate::registry::{ArgSpec, CommandSpec, Validator};

const FROM_TO_THROUGH: &[&str] = &[
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

const RISE_FALL_MIN_MAX: &[&str] = &["-rise", "-fall", "-min", "-max"];

const OBJECT_QUERY_FLAGS: &[&str] = &["-hierarchical", "-quiet", "-nocase", "-regexp"];

fn io_delay(name: &str) -> CommandSpec {
    CommandSpec::new(name)
        .options(&["-clock", "-reference_pin"])
        .flags(RISE_FALL_MIN_MAX)
        .flags(&[
            "-clock_fall",
            "-level_sensitive",
            "-add_delay",
            "-network_latency_included",
            "-source_latency_included",
        ])
        .arg(ArgSpec::positional("delay_value").with_validator(Validator::Time))
        .arg(ArgSpec::positional("port_pin_list"))
        .positional(2, None)
}

fn object_query(name: &str) -> CommandSpec {
    CommandSpec::new(name)
        .flags(OBJECT_QUERY_FLAGS)
        .options(&["-filter", "-of_objects"])
}

fn value_on_objects(name: &str, validator: Validator) -> CommandSpec {
    CommandSpec::new(name)
        .arg(ArgSpec::positional("value").with_validator(validator))
        .arg(ArgSpec::positional("object_list"))
        .positional(2, None)
}

fn object_list(name: &str) -> CommandSpec {
    CommandSpec::new(name)
        .arg(ArgSpec::positional("object_list"))
        .positional(1, None)
}

pub(super) fn commands() -> Vec<CommandSpec> {
    vec![
        // Clocks
        CommandSpec::new("create_clock")
            .arg(ArgSpec::key_value("-name"))
            .arg(
                ArgSpec::key_value("-period")
                    .required()
                    .with_validator(Validator::ClockPeriod),
            )
            .arg(ArgSpec::key_value("-waveform").with_validator(Validator::Waveform))
            .options(&["-comment"])
            .flags(&["-add"])
            .positional(0, None),
        CommandSpec::new("create_generated_clock")
            .options(&["-name", "-master_clock", "-comment"])
            .arg(ArgSpec::key_value("-source").required())
            .arg(ArgSpec::key_value("-divide_by").with_validator(Validator::PositiveInteger))
            .arg(ArgSpec::key_value("-multiply_by").with_validator(Validator::PositiveInteger))
            .arg(ArgSpec::key_value("-duty_cycle").with_validator(Validator::Percentage))
            .arg(ArgSpec::key_value("-edges").with_validator(Validator::EdgeList))
            .arg(ArgSpec::key_value("-edge_shift").with_validator(Validator::NumberList))
            .flags(&["-invert", "-combinational", "-add"])
            .positional(1, None),
        CommandSpec::new("set_clock_groups")
            .options(&["-name", "-comment"])
            .arg(ArgSpec::key_value("-group").required())
            .flags(&[
                "-asynchronous",
                "-logically_exclusive",
                "-physically_exclusive",
                "-allow_paths",
            ])
            .positional(0, Some(0)),
        CommandSpec::new("set_clock_latency")
            .options(&["-clock"])
            .flags(RISE_FALL_MIN_MAX)
            .flags(&["-source", "-early", "-late"])
            .arg(ArgSpec::positional("delay").with_validator(Validator::Time))
            .arg(ArgSpec::positional("object_list"))
            .positional(2, None),
        CommandSpec::new("set_clock_uncertainty")
            .options(FROM_TO_THROUGH)
            .flags(&["-setup", "-hold"])
            .arg(ArgSpec::positional("uncertainty").with_validator(Validator::ClockUncertainty))
            .arg(ArgSpec::positional("object_list"))
            .positional(1, None),
        CommandSpec::new("set_clock_transition")
            .flags(RISE_FALL_MIN_MAX)
            .arg(ArgSpec::positional("transition").with_validator(Validator::Transition))
            .arg(ArgSpec::positional("clock_list"))
            .positional(2, None),
        CommandSpec::new("set_clock_jitter")
            .arg(ArgSpec::key_value("-cycle").with_validator(Validator::Jitter))
            .arg(ArgSpec::key_value("-duty_cycle").with_validator(Validator::Jitter))
            .options(&["-clock"])
            .positional(0, None),
        CommandSpec::new("set_clock_gating_check")
            .arg(ArgSpec::key_value("-setup").with_validator(Validator::Time))
            .arg(ArgSpec::key_value("-hold").with_validator(Validator::Time))
            .flags(&["-rise", "-fall", "-high", "-low"])
            .positional(0, None),
        CommandSpec::new("set_clock_sense")
            .options(&["-clocks", "-pulse"])
            .flags(&["-positive", "-negative", "-stop_propagation"])
            .positional(1, None),
        object_list("set_propagated_clock"),
        // Input/output delays
        io_delay("set_input_delay"),
        io_delay("set_output_delay"),
        // Timing exceptions
        CommandSpec::new("set_false_path")
            .options(FROM_TO_THROUGH)
            .options(&["-comment"])
            .flags(&["-setup", "-hold", "-rise", "-fall", "-reset_path"])
            .positional(0, Some(0)),
        CommandSpec::new("set_multicycle_path")
            .options(FROM_TO_THROUGH)
            .options(&["-comment"])
            .flags(&["-setup", "-hold", "-rise", "-fall", "-start", "-end"])
            .arg(
                ArgSpec::positional("path_multiplier")
                    .with_validator(Validator::NonNegativeInteger),
            )
            .positional(1, Some(1)),
        CommandSpec::new("set_max_delay")
            .options(FROM_TO_THROUGH)
            .options(&["-comment"])
            .flags(&["-rise", "-fall", "-ignore_clock_latency", "-datapath_only"])
            .arg(ArgSpec::positional("delay_value").with_validator(Validator::Time))
            .positional(1, Some(1)),
        CommandSpec::new("set_min_delay")
            .options(FROM_TO_THROUGH)
            .options(&["-comment"])
            .flags(&["-rise", "-fall", "-ignore_clock_latency"])
            .arg(ArgSpec::positional("delay_value").with_validator(Validator::PathMargin))
            .positional(1, Some(1)),
        CommandSpec::new("set_max_time_borrow")
            .arg(ArgSpec::positional("delay_value").with_validator(Validator::Delay))
            .arg(ArgSpec::positional("object_list"))
            .positional(2, None),
        CommandSpec::new("set_data_check")
            .options(FROM_TO_THROUGH)
            .options(&["-clock"])
            .flags(&["-setup", "-hold"])
            .arg(ArgSpec::positional("value").with_validator(Validator::PathMargin))
            .positional(1, Some(1)),
        CommandSpec::new("set_disable_timing")
            .options(&["-from", "-to"])
            .positional(1, None),
        CommandSpec::new("group_path")
            .arg(ArgSpec::key_value("-name").required())
            .arg(ArgSpec::key_value("-weight").with_validator(Validator::PositiveReal))
            .arg(ArgSpec::key_value("-critical_range").with_validator(Validator::Time))
            .options(FROM_TO_THROUGH)
            .options(&["-comment"])
            .flags(&["-default"])
            .positional(0, Some(0)),
        // Environment
        CommandSpec::new("set_driving_cell")
            .options(&["-lib_cell", "-library", "-pin", "-from_pin", "-multiply_by"])
            .arg(
                ArgSpec::key_value("-input_transition_rise").with_validator(Validator::Transition),
            )
            .arg(
                ArgSpec::key_value("-input_transition_fall").with_validator(Validator::Transition),
            )
            .flags(RISE_FALL_MIN_MAX)
            .flags(&["-dont_scale", "-no_design_rule"])
            .positional(1, None),
        CommandSpec::new("set_drive")
            .flags(RISE_FALL_MIN_MAX)
            .arg(ArgSpec::positional("resistance").with_validator(Validator::Resistance))
            .arg(ArgSpec::positional("port_list"))
            .positional(2, None),
        CommandSpec::new("set_load")
            .flags(RISE_FALL_MIN_MAX)
            .flags(&["-subtract_pin_load", "-pin_load", "-wire_load"])
            .arg(ArgSpec::positional("value").with_validator(Validator::CapacitanceRange))
            .arg(ArgSpec::positional("objects"))
            .positional(2, None),
        CommandSpec::new("set_input_transition")
            .flags(RISE_FALL_MIN_MAX)
            .options(&["-clock"])
            .flags(&["-clock_fall"])
            .arg(ArgSpec::positional("transition").with_validator(Validator::Transition))
            .arg(ArgSpec::positional("port_list"))
            .positional(2, None),
        CommandSpec::new("set_max_transition")
            .flags(&["-clock_path", "-data_path", "-rise", "-fall"])
            .arg(ArgSpec::positional("transition").with_validator(Validator::Transition))
            .arg(ArgSpec::positional("object_list"))
            .positional(2, None),
        value_on_objects("set_max_capacitance", Validator::CapacitanceRange),
        value_on_objects("set_min_capacitance", Validator::CapacitanceRange),
        value_on_objects("set_max_fanout", Validator::PositiveReal),
        value_on_objects("set_fanout_load", Validator::NonNegativeReal),
        value_on_objects("set_port_fanout_number", Validator::NonNegativeInteger),
        value_on_objects("set_resistance", Validator::Resistance)
            .flags(&["-min", "-max"]),
        CommandSpec::new("set_voltage")
            .arg(ArgSpec::key_value("-min").with_validator(Validator::Voltage))
            .options(&["-object_list"])
            .arg(ArgSpec::positional("max_case_voltage").with_validator(Validator::Voltage))
            .positional(1, Some(1)),
        CommandSpec::new("set_max_area")
            .arg(ArgSpec::positional("area_value").with_validator(Validator::NonNegativeReal))
            .positional(1, Some(1)),
        CommandSpec::new("set_max_dynamic_power")
            .arg(ArgSpec::positional("power").with_validator(Validator::Power))
            .positional(1, Some(1)),
        CommandSpec::new("set_max_leakage_power")
            .arg(ArgSpec::positional("power").with_validator(Validator::Power))
            .positional(1, Some(1)),
        CommandSpec::new("set_timing_derate")
            .flags(&[
                "-early",
                "-late",
                "-rise",
                "-fall",
                "-clock",
                "-data",
                "-cell_delay",
                "-net_delay",
                "-cell_check",
                "-static",
                "-dynamic",
                "-increment",
            ])
            .arg(ArgSpec::positional("derate_value").with_validator(Validator::PositiveReal))
            .positional(1, None),
        CommandSpec::new("set_min_pulse_width")
            .flags(&["-low", "-high"])
            .arg(ArgSpec::positional("value").with_validator(Validator::Time))
            .positional(1, None),
        // Logic and case analysis
        CommandSpec::new("set_case_analysis")
            .arg(ArgSpec::positional("value"))
            .arg(ArgSpec::positional("port_or_pin_list"))
            .positional(2, None),
        object_list("set_logic_zero"),
        object_list("set_logic_one"),
        object_list("set_logic_dc"),
        CommandSpec::new("set_ideal_network")
            .flags(&["-no_propagate"])
            .positional(1, None),
        value_on_objects("set_ideal_latency", Validator::Time).flags(RISE_FALL_MIN_MAX),
        value_on_objects("set_ideal_transition", Validator::Transition)
            .flags(RISE_FALL_MIN_MAX),
        CommandSpec::new("set_dont_touch").positional(1, Some(2)),
        object_list("set_dont_touch_network").flags(&["-no_propagate"]),
        // Wire load and operating conditions
        CommandSpec::new("set_wire_load_model")
            .arg(ArgSpec::key_value("-name").required())
            .options(&["-library"])
            .flags(&["-min", "-max"])
            .positional(0, None),
        CommandSpec::new("set_wire_load_mode")
            .arg(ArgSpec::positional("mode_name"))
            .positional(1, Some(1)),
        CommandSpec::new("set_wire_load_min_block_size")
            .arg(ArgSpec::positional("size").with_validator(Validator::NonNegativeReal))
            .positional(1, Some(1)),
        CommandSpec::new("set_wire_load_selection_group")
            .options(&["-library"])
            .flags(&["-min", "-max"])
            .positional(1, None),
        CommandSpec::new("set_operating_conditions")
            .options(&[
                "-library",
                "-analysis_type",
                "-max",
                "-min",
                "-max_library",
                "-min_library",
                "-object_list",
            ])
            .positional(0, Some(1)),
        CommandSpec::new("set_units")
            .options(&[
                "-time",
                "-capacitance",
                "-resistance",
                "-voltage",
                "-current",
                "-power",
            ])
            .positional(0, Some(0)),
        CommandSpec::new("set_hierarchy_separator")
            .arg(ArgSpec::positional("separator").with_validator(Validator::HierarchySeparator))
            .positional(1, Some(1)),
        // Design navigation
        CommandSpec::new("current_design").positional(0, Some(1)),
        CommandSpec::new("current_instance").positional(0, Some(1)),
        CommandSpec::new("source")
            .flags(&["-echo", "-verbose"])
            .positional(1, Some(1)),
        // Object queries
        object_query("get_ports"),
        object_query("get_pins").flags(&["-leaf"]),
        object_query("get_cells"),
        object_query("get_nets"),
        object_query("get_clocks").flags(&["-include_generated_clocks"]),
        object_query("get_lib_cells"),
        object_query("get_lib_pins"),
        object_query("get_libs"),
        CommandSpec::new("all_inputs")
            .flags(&["-level_sensitive", "-edge_triggered"])
            .options(&["-clock"])
            .positional(0, Some(0)),
        CommandSpec::new("all_outputs")
            .flags(&["-level_sensitive", "-edge_triggered"])
            .options(&["-clock"])
            .positional(0, Some(0)),
        CommandSpec::new("all_clocks").positional(0, Some(0)),
        CommandSpec::new("all_registers")
            .flags(&[
                "-no_hierarchy",
                "-cells",
                "-data_pins",
                "-clock_pins",
                "-async_pins",
                "-output_pins",
                "-level_sensitive",
                "-edge_triggered",
                "-master_slave",
            ])
            .options(&["-clock", "-rise_clock", "-fall_clock"])
            .positional(0, Some(0)),
    ]
}
