use sdcheck_core::{CommandSpec, Registry};
use sdcheck_parser::{DiagnosticKind, Position, Token, parse, tokenize};

#[test]
fn test_multiline_file() {
    let source = "\
# Clocks
set period 10.0
create_clock -name sys_clk -period $period [get_ports clk]
create_generated_clock -name div2 \\
    -source [get_ports clk] \\
    -divide_by 2 [get_pins u_div/Q]

set_input_delay -clock sys_clk 2.0 [get_ports {din[*]}]
";
    let parsed = parse(source, Registry::builtin());
    assert!(parsed.diagnostics.is_empty());

    let names: Vec<_> = parsed.commands.iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        [
            "set",
            "create_clock",
            "create_generated_clock",
            "set_input_delay"
        ]
    );

    let generated = &parsed.commands[2];
    assert_eq!(generated.position(), Position::new(4, 1));
    assert_eq!(
        generated.keyed_value("-source").map(|v| v.as_str()),
        Some("[get_ports clk]")
    );
    assert_eq!(
        generated.keyed_value("-divide_by").map(|v| v.as_str()),
        Some("2")
    );

    let input_delay = &parsed.commands[3];
    assert_eq!(input_delay.position(), Position::new(8, 1));
    let positionals: Vec<_> = input_delay
        .positionals()
        .iter()
        .map(|v| v.as_str())
        .collect();
    assert_eq!(positionals, ["2.0", "[get_ports {din[*]}]"]);
}

#[test]
fn test_tokenizer_errors_skip_parsing() {
    let parsed = parse(
        "create_clock -period 10 clk\nset_false_path -from {a",
        Registry::builtin(),
    );
    assert!(parsed.commands.is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind(), DiagnosticKind::UnmatchedBrace);
}

#[test]
fn test_stray_closer_does_not_skip_parsing() {
    let parsed = parse(
        "create_clock clk\nset x a}\ncreate_clock -name c -period 0 y",
        Registry::builtin(),
    );
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind(), DiagnosticKind::UnmatchedBrace);

    let names: Vec<_> = parsed.commands.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["create_clock", "set", "create_clock"]);
    let positionals: Vec<_> = parsed.commands[1]
        .positionals()
        .iter()
        .map(|v| v.as_str())
        .collect();
    assert_eq!(positionals, ["x", "a"]);
}

#[test]
fn test_registry_overrides_change_flag_parsing() {
    let source = "vendor_cmd -verbose target";

    let parsed = parse(source, Registry::builtin());
    assert_eq!(
        parsed.commands[0].keyed_value("-verbose").map(|v| v.as_str()),
        Some("target")
    );

    let registry =
        Registry::builtin().with_overrides([CommandSpec::new("vendor_cmd").flags(&["-verbose"])]);
    let parsed = parse(source, &registry);
    assert!(parsed.commands[0].is_bare("-verbose"));
    assert_eq!(parsed.commands[0].positionals().len(), 1);
}

#[test]
fn test_eof_is_last_token() {
    for source in ["", "create_clock", "{", "}", "\"", "[", "set a [b {c \"d"] {
        let stream = tokenize(source);
        assert_eq!(
            stream.tokens.last().map(|t| &t.token),
            Some(&Token::Eof),
            "{source:?}"
        );
    }
}
