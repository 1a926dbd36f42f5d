//! Agent settings
//!
//! Loaded from `settings.json` next to the executable, or from the path in
//! `ZETTA_SETTINGS`. Every field has a default, so a partial file is fine and
//! a missing or broken file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SETTINGS_ENV: &str = "ZETTA_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the agent binds to
    pub listen: String,
    pub port: u16,
    /// Where the API key is persisted
    pub api_key_file: PathBuf,
    /// Let libzfs print its own messages to stderr
    pub print_on_error: bool,
    /// EnvFilter directive used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            listen: "127.0.0.1".to_string(),
            port: 9876,
            api_key_file: default_api_key_file(),
            print_on_error: false,
            log_filter: "info".to_string(),
        }
    }
}

fn default_api_key_file() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("zetta").join("api_key"))
        .unwrap_or_else(|| PathBuf::from(".zetta_api_key"))
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{path} not found")]
    NotFound { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings file location: `ZETTA_SETTINGS`, else next to the executable
pub fn settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SETTINGS_ENV) {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("settings.json")))
        .unwrap_or_else(|| PathBuf::from("settings.json"))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SettingsError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings or use defaults.
///
/// Runs before logging is set up, so the reason for falling back is
/// returned for the caller to log.
pub fn load_settings() -> (Settings, Option<SettingsError>) {
    match load_settings_from(&settings_path()) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"port": 1234}"#).unwrap();
        assert_eq!(settings.port, 1234);
        assert_eq!(settings.listen, "127.0.0.1");
        assert_eq!(settings.log_filter, "info");
        assert!(!settings.print_on_error);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("zetta-settings-does-not-exist.json");
        let err = load_settings_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let path = std::env::temp_dir().join(format!("zetta-settings-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = load_settings_from(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
