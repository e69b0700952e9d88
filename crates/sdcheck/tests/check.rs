//! Integration tests for the Checker API
//!
//! These tests run whole files through the public API and look only at
//! the resulting reports.

use std::io::Write;

use sdcheck::{
    CheckReport, Checker, DiagnosticKind, SdcheckError,
    config::{AppConfig, CheckOptions},
};

fn check(source: &str) -> CheckReport {
    Checker::default().check("test.sdc", source)
}

fn check_strict(source: &str) -> CheckReport {
    Checker::new(CheckOptions::new().with_strict(true)).check("test.sdc", source)
}

fn error_kinds(report: &CheckReport) -> Vec<DiagnosticKind> {
    report.errors.iter().map(|finding| finding.kind).collect()
}

fn warning_kinds(report: &CheckReport) -> Vec<DiagnosticKind> {
    report.warnings.iter().map(|finding| finding.kind).collect()
}

#[test]
fn test_minimal_clock_passes() {
    let report = check("create_clock -period 10.0 clk\n");
    assert!(report.passed(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_missing_period() {
    let report = check("create_clock clk\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::MissingRequiredArg]);
    assert!(report.errors[0].message.contains("-period"));
    assert_eq!((report.errors[0].line, report.errors[0].column), (1, 1));
}

#[test]
fn test_generated_clock_with_undefined_source() {
    let report = check("create_generated_clock -source undefined_clk gen\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::UndefinedClock]);
    assert_eq!(report.errors[0].line, 1);
}

#[test]
fn test_finding_position_points_at_argument() {
    let report = check(
        "create_clock -period 10 clk\n\
         create_generated_clock -source missing -divide_by 2 gen\n",
    );
    assert_eq!(error_kinds(&report), [DiagnosticKind::UndefinedClock]);
    let finding = &report.errors[0];
    assert_eq!((finding.line, finding.column), (2, 32));
    assert_eq!(finding.file, "test.sdc");
}

#[test]
fn test_generated_clock_from_clock_source_pin() {
    let report = check(
        "create_clock -name clk -period 10 [get_ports clk_in]\n\
         create_generated_clock -name div2 -source clk_in -divide_by 2 [get_pins u_div/Q]\n\
         create_generated_clock -name div4 -source [get_clocks div2] -divide_by 2 [get_pins u_div4/Q]\n",
    );
    assert!(report.passed(), "unexpected errors: {:?}", report.errors);
}

#[test]
fn test_clock_groups_resolve_forward_references() {
    let report = check(
        "set_clock_groups -asynchronous -group clk_a -group {clk_b}\n\
         create_clock -name clk_a -period 10\n\
         create_clock -name clk_b -period 5\n",
    );
    assert!(report.passed(), "unexpected errors: {:?}", report.errors);
}

#[test]
fn test_unresolved_clock_reported_once_at_first_reference() {
    let report = check(
        "set_clock_groups -asynchronous -group clk_c -group clk_a\n\
         create_clock -name clk_a -period 10\n\
         set_false_path -from [get_clocks clk_c] -to [get_clocks clk_a]\n",
    );
    assert_eq!(error_kinds(&report), [DiagnosticKind::UndefinedClock]);
    assert_eq!(report.errors[0].line, 1);
    assert!(report.errors[0].message.contains("clk_c"));
}

#[test]
fn test_self_referencing_generated_clock() {
    let report = check("create_generated_clock -name g -source g pin\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::SelfReferencingClock]);

    // The clock is not registered, so later references to it fail.
    let report = check(
        "create_generated_clock -name g -source g pin\n\
         set_clock_groups -asynchronous -group g\n",
    );
    assert_eq!(
        error_kinds(&report),
        [
            DiagnosticKind::SelfReferencingClock,
            DiagnosticKind::UndefinedClock
        ]
    );
}

#[test]
fn test_io_delay_clock_must_be_defined_first() {
    let report = check(
        "set_input_delay -clock clk 1 [get_ports din]\n\
         create_clock -name clk -period 10\n",
    );
    assert_eq!(error_kinds(&report), [DiagnosticKind::UndefinedClock]);
    assert_eq!(report.errors[0].line, 1);
}

#[test]
fn test_duplicate_clock() {
    let report = check(
        "create_clock -name clk -period 10 [get_ports a]\n\
         create_clock -name clk -period 5 [get_ports b]\n",
    );
    assert_eq!(error_kinds(&report), [DiagnosticKind::DuplicateClock]);
    assert_eq!(report.errors[0].line, 2);
    // The second label points at the first definition.
    assert_eq!(report.diagnostics[0].labels().len(), 2);
}

#[test]
fn test_duplicate_exception() {
    let report = check(
        "create_clock -name a -period 10 [get_ports a]\n\
         create_clock -name b -period 10 [get_ports b]\n\
         set_false_path -from [get_clocks a] -to [get_clocks b]\n\
         set_false_path -to [get_clocks b] -from [get_clocks a]\n",
    );
    assert_eq!(error_kinds(&report), [DiagnosticKind::DuplicateConstraint]);
    assert_eq!(report.errors[0].line, 4);
}

#[test]
fn test_unknown_command_does_not_stop_checking() {
    let report = check("create_clk -period 10\ncreate_clock -period 10 clk\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::UnknownCommand]);
    assert_eq!(report.errors[0].line, 1);
}

#[test]
fn test_positional_counts() {
    let report = check("set_multicycle_path -setup -from a -to b\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::InvalidArgCount]);

    let report = check("set_multicycle_path 2 3 -from a\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::InvalidArgCount]);
    assert_eq!(report.errors[0].column, 23);
}

#[test]
fn test_value_validation() {
    let report = check(
        "create_clock -name c -period 10 [get_ports c]\n\
         create_clock -name d -period fast [get_ports d]\n\
         create_clock -name e -period 20ms [get_ports e]\n\
         set_clock_uncertainty 12 [get_clocks c]\n",
    );
    assert_eq!(
        error_kinds(&report),
        [
            DiagnosticKind::InvalidArgType,
            DiagnosticKind::InvalidArgValue,
            DiagnosticKind::InvalidArgValue
        ]
    );
    assert_eq!(warning_kinds(&report), [DiagnosticKind::LargeUncertainty]);
    assert!(report.errors[0].suggestion.is_some());
}

#[test]
fn test_structural_values() {
    let report = check("set_wire_load_mode flat\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::InvalidArgValue]);

    let report = check("set_case_analysis 2 [get_ports test_mode]\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::InvalidArgValue]);

    let report = check("set_case_analysis 0 [get_ports test_mode]\nset_wire_load_mode top\n");
    assert!(report.passed());

    let report = check("set_hierarchy_separator ab\n");
    assert_eq!(
        error_kinds(&report),
        [DiagnosticKind::InvalidHierarchySeparator]
    );
}

#[test]
fn test_empty_object_list() {
    let report = check("set_false_path -from {} -to [get_ports b]\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::EmptyObjectList]);
}

#[test]
fn test_tokenizer_errors_skip_checking() {
    let report = check("create_clock -period 10 {clk\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::UnmatchedBrace]);
}

#[test]
fn test_stray_closer_does_not_hide_other_findings() {
    let report = check("create_clock clk\nset x a}\ncreate_clock -name c -period 0 y\n");
    assert_eq!(
        error_kinds(&report),
        [
            DiagnosticKind::UnmatchedBrace,
            DiagnosticKind::MissingRequiredArg,
            DiagnosticKind::InvalidArgValue
        ]
    );
    let lines: Vec<_> = report.errors.iter().map(|finding| finding.line).collect();
    assert_eq!(lines, [2, 1, 3]);
    assert_eq!(warning_kinds(&report), [DiagnosticKind::ZeroPeriod]);
}

#[test]
fn test_unclosed_bracket_and_brace_both_reported() {
    let report = check("set x [foo {a\n");
    assert_eq!(
        error_kinds(&report),
        [DiagnosticKind::UnmatchedBrace, DiagnosticKind::UnmatchedBracket]
    );
}

#[test]
fn test_hash_separator_is_not_a_comment() {
    let report = check("# comment line\nset_hierarchy_separator # ;# trailing comment\n");
    assert!(report.passed(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_variables_are_substituted() {
    let report = check(
        "set period 10\n\
         set half [expr $period / 2]\n\
         create_clock -name clk -period $period -waveform \"0 $half\" [get_ports clk]\n",
    );
    assert!(report.passed(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());

    let report = check("set period 0\ncreate_clock -name clk -period $period x\n");
    assert_eq!(warning_kinds(&report), [DiagnosticKind::ZeroPeriod]);
}

#[test]
fn test_escaped_dollar_is_not_a_variable() {
    let report = check("set_false_path -from a -to b -comment \"costs \\$5 and \\$foo\"\n");
    assert!(report.passed(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());

    // The escape survives a trip through a variable.
    let report = check(
        "set note \"\\$undefined\"\n\
         set_false_path -from a -to b -comment $note\n",
    );
    assert!(report.passed(), "unexpected errors: {:?}", report.errors);
}

#[test]
fn test_braced_variable_with_dotted_name() {
    let report = check("set a.b 5\ncreate_clock -name clk -period ${a.b} x\n");
    assert!(report.passed(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_undefined_variables() {
    let report = check("create_clock -name clk -period $p -waveform {0 $h} x\n");
    assert_eq!(
        error_kinds(&report),
        [
            DiagnosticKind::UndefinedVariable,
            DiagnosticKind::UndefinedVariable
        ]
    );
    assert!(report.errors.iter().all(|finding| finding.line == 1));

    // Each variable is reported once per command.
    let report = check("create_clock -name $p -period $p x\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::UndefinedVariable]);
}

#[test]
fn test_negative_delay_warning() {
    let source = "create_clock -name clk -period 10 [get_ports clk]\n\
                  set_input_delay -clock clk -0.5 [get_ports din]\n";
    let report = check(source);
    assert!(report.passed());
    assert_eq!(warning_kinds(&report), [DiagnosticKind::NegativeDelay]);
    assert_eq!(report.warnings[0].line, 2);
}

#[test]
fn test_suppressed_warnings() {
    let source = "create_clock -name clk -period 10 [get_ports clk]\n\
                  set_input_delay -clock clk -0.5 [get_ports din]\n";
    let options = CheckOptions::new().with_suppressed(DiagnosticKind::NegativeDelay);
    let report = Checker::new(options).check("test.sdc", source);
    assert!(report.warnings.is_empty());

    // Errors cannot be suppressed.
    let options = CheckOptions::new().with_suppressed(DiagnosticKind::UndefinedClock);
    let report = Checker::new(options).check("test.sdc", "set_clock_groups -group x\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::UndefinedClock]);
}

#[test]
fn test_strict_mode_advisories() {
    let source = "create_clock -period 2000 [get_ports clk]\n";
    assert!(check(source).warnings.is_empty());

    let report = check_strict(source);
    assert!(report.passed());
    assert_eq!(
        warning_kinds(&report),
        [
            DiagnosticKind::MissingRecommendedName,
            DiagnosticKind::UnrealisticPeriod
        ]
    );
}

#[test]
fn test_strict_case_collision() {
    let source = "create_clock -name clk -period 10 [get_ports a]\n\
                  create_clock -name CLK -period 10 [get_ports b]\n";
    let report = check(source);
    assert!(report.passed());
    assert!(report.warnings.is_empty());

    let report = check_strict(source);
    assert_eq!(warning_kinds(&report), [DiagnosticKind::DuplicateDefinition]);
    assert_eq!(report.warnings[0].line, 2);
}

#[test]
fn test_strict_magnitudes() {
    let report = check_strict(
        "create_clock -name clk -period 2 [get_ports clk]\n\
         set_clock_uncertainty 0.5 [get_clocks clk]\n",
    );
    assert_eq!(warning_kinds(&report), [DiagnosticKind::LargeUncertainty]);

    let report = check_strict(
        "create_clock -name clk -period 10 [get_ports clk]\n\
         set_input_delay -clock clk 150 [get_ports din]\n",
    );
    assert_eq!(warning_kinds(&report), [DiagnosticKind::UnrealisticDelay]);

    let report = check_strict("set_input_transition 0.8 [get_ports din]\n");
    assert_eq!(
        warning_kinds(&report),
        [DiagnosticKind::UnrealisticTransition]
    );

    let report = check_strict("set_false_path -to [get_pins *]\n");
    assert_eq!(warning_kinds(&report), [DiagnosticKind::AmbiguousWildcard]);
}

#[test]
fn test_files_are_checked_independently() {
    let checker = Checker::default();
    let first = checker.check("a.sdc", "create_clock -name clk -period 10\n");
    assert!(first.passed());

    let second = checker.check("b.sdc", "set_input_delay -clock clk 1 [get_ports din]\n");
    assert_eq!(error_kinds(&second), [DiagnosticKind::UndefinedClock]);
}

#[test]
fn test_checker_from_config() {
    let config: AppConfig = toml::from_str(
        r#"
        [check]
        suppress = ["negative_delay"]

        [[commands]]
        name = "vendor_margin"
        min_positional = 1
        max_positional = 1

        [[commands.args]]
        name = "margin"
        kind = "positional"
        validator = "path_margin"
        "#,
    )
    .unwrap();
    let checker = Checker::from_config(&config).unwrap();
    assert!(checker.registry().contains("vendor_margin"));

    assert!(checker.check("v.sdc", "vendor_margin 2\n").passed());

    let report = checker.check("v.sdc", "vendor_margin 20\n");
    assert_eq!(error_kinds(&report), [DiagnosticKind::InvalidArgValue]);
}

#[test]
fn test_checker_from_invalid_config() {
    let config: AppConfig = toml::from_str("[check]\nsuppress = [\"bogus\"]\n").unwrap();
    let err = Checker::from_config(&config).unwrap_err();
    assert!(matches!(err, SdcheckError::Config(_)));
}

#[test]
fn test_check_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "create_clock clk").unwrap();

    let report = Checker::default().check_file(file.path()).unwrap();
    assert_eq!(error_kinds(&report), [DiagnosticKind::MissingRequiredArg]);
    assert_eq!(report.file, file.path().display().to_string());

    let err = Checker::default()
        .check_file(file.path().with_extension("missing"))
        .unwrap_err();
    assert!(matches!(err, SdcheckError::Io(_)));
}

#[test]
fn test_free_function_check() {
    let report = sdcheck::check("t.sdc", "create_clock -period 10 clk\n", &CheckOptions::new());
    assert!(report.passed());
}
