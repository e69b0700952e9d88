use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use sdcheck_cli::{Args, OutputFormat, check_files, render};

/// Collects all .sdc files from a directory
fn collect_sdc_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("sdc")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demo files live at the workspace root, not in the crate.
fn demos_path(kind: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
        .join(kind)
}

fn args_for<P: AsRef<Path>>(files: &[P]) -> Args {
    Args {
        files: files
            .iter()
            .map(|path| path.as_ref().to_string_lossy().to_string())
            .collect(),
        config: None,
        strict: false,
        suppress: Vec::new(),
        format: OutputFormat::Human,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let valid_demos = collect_sdc_files(demos_path("valid"));

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/valid");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let outcome = check_files(&args_for(&[demo_path])).expect("Failed to check demo");
        if !outcome.passed() {
            let rendered = render(&outcome, OutputFormat::Human).unwrap();
            failed_demos.push((demo_path.clone(), rendered));
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, rendered) in &failed_demos {
            eprintln!("  - {}:\n{}", path.display(), rendered);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let error_demos = collect_sdc_files(demos_path("errors"));

    assert!(!error_demos.is_empty(), "No error demos found in demos/errors");

    let mut unexpected_passes = Vec::new();

    for demo_path in &error_demos {
        let outcome = check_files(&args_for(&[demo_path])).expect("Failed to check demo");
        if outcome.passed() {
            unexpected_passes.push(demo_path.clone());
        }
    }

    if !unexpected_passes.is_empty() {
        eprintln!("\nError demos that passed:");
        for path in &unexpected_passes {
            eprintln!("  - {}", path.display());
        }
        panic!("{} error demo(s) passed unexpectedly", unexpected_passes.len());
    }

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_multiple_files_are_independent() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let clocks = temp_dir.path().join("clocks.sdc");
    let io = temp_dir.path().join("io.sdc");
    fs::write(&clocks, "create_clock -name clk -period 10 [get_ports clk]\n").unwrap();
    fs::write(&io, "set_input_delay -clock clk 1 [get_ports din]\n").unwrap();

    let outcome = check_files(&args_for(&[&clocks, &io])).unwrap();
    assert_eq!(outcome.files.len(), 2);
    assert!(outcome.files[0].report.passed());
    assert!(!outcome.files[1].report.passed());
    assert!(!outcome.passed());
    assert_eq!(outcome.error_count(), 1);
}

#[test]
fn e2e_json_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("top.sdc");
    fs::write(&path, "create_clock clk\n").unwrap();

    let outcome = check_files(&args_for(&[&path])).unwrap();
    let json = render(&outcome, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["passed"], false);
    let error = &value["files"][0]["errors"][0];
    assert_eq!(error["kind"], "missing_required_arg");
    assert_eq!(error["severity"], "error");
    assert_eq!(error["line"], 1);
    assert_eq!(error["column"], 1);
    assert!(error["suggestion"].is_string());
    assert!(value["files"][0]["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn e2e_config_and_flags() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("top.sdc");
    fs::write(
        &path,
        "create_clock -name clk -period 10 [get_ports clk]\n\
         set_input_delay -clock clk -0.5 [get_ports din]\n\
         vendor_margin 2\n",
    )
    .unwrap();

    let config_path = temp_dir.path().join("config.toml");
    let mut config = fs::File::create(&config_path).unwrap();
    writeln!(
        config,
        "[[commands]]\nname = \"vendor_margin\"\nmin_positional = 1\nmax_positional = 1"
    )
    .unwrap();

    let mut args = args_for(&[&path]);
    args.config = Some(config_path.to_string_lossy().to_string());
    let outcome = check_files(&args).unwrap();
    assert!(outcome.passed());
    assert_eq!(outcome.warning_count(), 1);

    args.suppress = vec!["negative_delay".to_string()];
    let outcome = check_files(&args).unwrap();
    assert_eq!(outcome.warning_count(), 0);

    args.suppress = vec!["not_a_kind".to_string()];
    assert!(check_files(&args).is_err());
}

#[test]
fn e2e_missing_input_file_does_not_stop_the_run() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.sdc");
    let present = temp_dir.path().join("present.sdc");
    fs::write(&present, "create_clock clk\n").unwrap();

    let outcome = check_files(&args_for(&[&missing, &present])).unwrap();
    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.unreadable.len(), 1);
    assert!(outcome.unreadable[0].file.ends_with("missing.sdc"));
    assert!(!outcome.passed());
    // The unreadable file plus the missing `-period`.
    assert_eq!(outcome.error_count(), 2);

    let human = render(&outcome, OutputFormat::Human).unwrap();
    assert!(human.contains("present.sdc: FAILED (1 errors, 0 warnings)"));
    assert!(human.contains("missing.sdc: FAILED (could not be read)"));

    let json = render(&outcome, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["passed"], false);
    assert_eq!(value["files"].as_array().unwrap().len(), 1);
    assert!(
        value["unreadable"][0]["file"]
            .as_str()
            .unwrap()
            .ends_with("missing.sdc")
    );
}
