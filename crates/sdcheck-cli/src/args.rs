//! Command-line argument definitions for the sdcheck CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the files to check, the configuration
//! file, check options, output format and logging verbosity.

use clap::{Parser, ValueEnum};

/// How check results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Annotated source snippets for each finding.
    #[default]
    Human,
    /// One JSON document with every finding.
    Json,
}

/// Command-line arguments for the sdcheck timing-constraint checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Paths to the SDC files to check
    #[arg(required = true, help = "Paths to the SDC files to check")]
    pub files: Vec<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable strict-mode advisories
    #[arg(long)]
    pub strict: bool,

    /// Warning kind to suppress, such as `negative_delay` (repeatable)
    #[arg(long, value_name = "KIND")]
    pub suppress: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
