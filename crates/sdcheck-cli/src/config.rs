//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory),
//! and merging command-line check options on top.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use sdcheck::{
    DiagnosticKind, SdcheckError,
    config::{AppConfig, CheckOptions},
};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for SdcheckError {
    fn from(err: ConfigError) -> Self {
        SdcheckError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (sdcheck/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SdcheckError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("sdcheck/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "sdcheck", "sdcheck") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SdcheckError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

/// Merge `--strict` and `--suppress` onto the configured options.
///
/// Strict mode is enabled if either source enables it; suppressed kinds
/// are the union of both.
///
/// # Errors
///
/// Returns [`SdcheckError::Config`] for an unknown diagnostic kind name.
pub fn merge_options(
    options: CheckOptions,
    strict: bool,
    suppress: &[String],
) -> Result<CheckOptions, SdcheckError> {
    let strict = strict || options.strict();
    let mut options = options.with_strict(strict);
    for name in suppress {
        let kind: DiagnosticKind = name.parse()?;
        options = options.with_suppressed(kind);
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[check]\nstrict = true\nsuppress = [\"zero_period\"]").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!(config.check().strict());
        assert_eq!(config.check().suppress(), ["zero_period"]);
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, SdcheckError::Config(_)));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[check\nstrict = ").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_merge_options() {
        let options = CheckOptions::new().with_suppressed(DiagnosticKind::ZeroPeriod);
        let merged = merge_options(options, true, &["negative_delay".to_string()]).unwrap();
        assert!(merged.strict());
        assert!(merged.is_suppressed(DiagnosticKind::ZeroPeriod));
        assert!(merged.is_suppressed(DiagnosticKind::NegativeDelay));

        let options = CheckOptions::new().with_strict(true);
        assert!(merge_options(options, false, &[]).unwrap().strict());

        let err = merge_options(CheckOptions::new(), false, &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, SdcheckError::Config(_)));
    }
}
