//! Configuration for the Cover Letter Studio CLI/TUI.
//!
//! Settings are resolved from four layers, highest precedence first:
//!
//! 1. explicit overrides (command-line flags)
//! 2. environment variables (`COVERLETTER_ENDPOINT`, `COVERLETTER_OUTPUT_DIR`)
//! 3. an optional JSON file (`~/.config/coverletter/settings.json` on most
//!    platforms, relocatable with `COVERLETTER_SETTINGS_PATH`)
//! 4. built-in defaults
//!
//! The settings file is only ever read. Nothing entered in the form is
//! written back to disk.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use coverletter_types::DEFAULT_ENDPOINT;
use dirs_next::{config_dir, download_dir};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::expand_tilde;

/// Environment variable allowing callers to override the settings file path.
pub const SETTINGS_PATH_ENV: &str = "COVERLETTER_SETTINGS_PATH";
/// Environment variable overriding the generation endpoint.
pub const ENDPOINT_ENV: &str = "COVERLETTER_ENDPOINT";
/// Environment variable overriding the directory generated letters are saved to.
pub const OUTPUT_DIR_ENV: &str = "COVERLETTER_OUTPUT_DIR";

/// Default filename for the JSON settings file.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Error surfaced when reading settings fails.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O failure (for example, permissions).
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Values recognised in the settings file. Every key is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub endpoint: Option<String>,
    pub output_dir: Option<String>,
    /// Canonical identifier of the preferred theme.
    pub theme: Option<String>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// URL the form is posted to.
    pub endpoint: String,
    /// Directory generated letters are saved into.
    pub output_dir: PathBuf,
    /// Preferred theme identifier, if any.
    pub theme: Option<String>,
}

impl Settings {
    /// Reads the settings file (if any) and resolves every layer.
    pub fn load(overrides: SettingsOverrides) -> Result<Self, SettingsError> {
        let path = default_settings_path();
        let file = load_file(&path)?;
        debug!(path = %path.display(), "resolved settings file");
        Ok(Self::resolve(file, overrides))
    }

    /// Resolves settings from an already-parsed file, the environment, and overrides.
    pub fn resolve(file: SettingsFile, overrides: SettingsOverrides) -> Self {
        let endpoint = overrides
            .endpoint
            .and_then(non_empty)
            .or_else(|| env::var(ENDPOINT_ENV).ok().and_then(non_empty))
            .or_else(|| file.endpoint.and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let output_dir = overrides
            .output_dir
            .or_else(|| env::var(OUTPUT_DIR_ENV).ok().and_then(non_empty).map(|dir| expand_tilde(&dir)))
            .or_else(|| file.output_dir.and_then(non_empty).map(|dir| expand_tilde(&dir)))
            .unwrap_or_else(default_output_dir);

        Self {
            endpoint,
            output_dir,
            theme: file.theme.and_then(non_empty),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(SettingsFile::default(), SettingsOverrides::default())
    }
}

/// Directory the TUI writes its log file into.
pub fn default_config_dir() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("coverletter")
}

fn default_settings_path() -> PathBuf {
    if let Ok(path) = env::var(SETTINGS_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    default_config_dir().join(SETTINGS_FILE_NAME)
}

fn default_output_dir() -> PathBuf {
    download_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn load_file(path: &Path) -> Result<SettingsFile, SettingsError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(file) => Ok(file),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse settings file; using defaults"
                );
                Ok(SettingsFile::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(SettingsFile::default()),
        Err(error) => Err(SettingsError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with_endpoint(endpoint: &str) -> SettingsFile {
        SettingsFile {
            endpoint: Some(endpoint.into()),
            output_dir: Some("/srv/letters".into()),
            theme: Some("dracula_hc".into()),
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        temp_env::with_vars([(ENDPOINT_ENV, None::<&str>), (OUTPUT_DIR_ENV, None::<&str>)], || {
            let settings = Settings::resolve(SettingsFile::default(), SettingsOverrides::default());
            assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
            assert_eq!(settings.output_dir, default_output_dir());
            assert_eq!(settings.theme, None);
        });
    }

    #[test]
    fn file_values_are_used_below_environment() {
        temp_env::with_vars([(ENDPOINT_ENV, None::<&str>), (OUTPUT_DIR_ENV, None::<&str>)], || {
            let settings = Settings::resolve(file_with_endpoint("http://file:9000/generate"), SettingsOverrides::default());
            assert_eq!(settings.endpoint, "http://file:9000/generate");
            assert_eq!(settings.output_dir, PathBuf::from("/srv/letters"));
            assert_eq!(settings.theme.as_deref(), Some("dracula_hc"));
        });
    }

    #[test]
    fn environment_overrides_file_and_flags_override_environment() {
        temp_env::with_vars(
            [
                (ENDPOINT_ENV, Some("http://env:8000/generate")),
                (OUTPUT_DIR_ENV, Some("/env/out")),
            ],
            || {
                let from_env = Settings::resolve(file_with_endpoint("http://file:9000/generate"), SettingsOverrides::default());
                assert_eq!(from_env.endpoint, "http://env:8000/generate");
                assert_eq!(from_env.output_dir, PathBuf::from("/env/out"));

                let overrides = SettingsOverrides {
                    endpoint: Some("http://flag:7000/generate".into()),
                    output_dir: Some(PathBuf::from("/flag/out")),
                };
                let from_flags = Settings::resolve(file_with_endpoint("http://file:9000/generate"), overrides);
                assert_eq!(from_flags.endpoint, "http://flag:7000/generate");
                assert_eq!(from_flags.output_dir, PathBuf::from("/flag/out"));
            },
        );
    }

    #[test]
    fn blank_values_fall_through() {
        temp_env::with_vars([(ENDPOINT_ENV, Some("   ")), (OUTPUT_DIR_ENV, None::<&str>)], || {
            let settings = Settings::resolve(SettingsFile::default(), SettingsOverrides::default());
            assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        });
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{ not json").expect("write settings");
        let file = load_file(&path).expect("malformed file is not fatal");
        assert!(file.endpoint.is_none());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = load_file(&dir.path().join("absent.json")).expect("missing file is fine");
        assert!(file.theme.is_none());
    }

    #[test]
    fn load_reads_the_file_named_by_the_environment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"endpoint":"http://127.0.0.1:9999/generate"}"#).expect("write settings");
        temp_env::with_vars(
            [
                (SETTINGS_PATH_ENV, Some(path.to_string_lossy().as_ref())),
                (ENDPOINT_ENV, None),
            ],
            || {
                let settings = Settings::load(SettingsOverrides::default()).expect("settings load");
                assert_eq!(settings.endpoint, "http://127.0.0.1:9999/generate");
            },
        );
    }
}
