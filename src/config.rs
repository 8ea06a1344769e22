//! Application settings and user preferences.
//!
//! Loaded from `~/.extension-settings/config.json`. Every field has a
//! default, so a missing or partial file is fine; a malformed file logs a
//! warning and falls back to defaults rather than blocking startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::SettingsError;

/// Default global hotkey, in the host's vendor syntax.
pub const DEFAULT_HOTKEY: &str = "CommandOrControl+Shift+N";

/// Default host process the bridge spawns.
pub const DEFAULT_HOST_COMMAND: &str = "extension-host";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Global hotkeys to register at startup (vendor syntax).
    #[serde(default = "default_hotkeys")]
    pub hotkeys: Vec<String>,
    /// Command the bridge spawns as the host process.
    #[serde(default = "default_host_command")]
    pub host_command: String,
    /// Extra arguments for the host process.
    #[serde(default)]
    pub host_args: Vec<String>,
}

fn default_hotkeys() -> Vec<String> {
    vec![DEFAULT_HOTKEY.to_string()]
}

fn default_host_command() -> String {
    DEFAULT_HOST_COMMAND.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hotkeys: default_hotkeys(),
            host_command: default_host_command(),
            host_args: Vec::new(),
        }
    }
}

/// Path to the user config file (`~/.extension-settings/config.json`).
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".extension-settings").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// Decode config file contents.
pub fn parse_config(contents: &str) -> Result<Config, SettingsError> {
    serde_json::from_str(contents)
        .map_err(|e| SettingsError::Config(format!("malformed config file: {e}")))
}

/// Load the config file, falling back to defaults when it is missing or
/// malformed.
pub fn load_config() -> Config {
    let path = config_path();
    match std::fs::read_to_string(&path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Using defaults");
                Config::default()
            }
        },
        Err(_) => {
            info!(path = %path.display(), "No config file, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_register_the_fixed_hotkey() {
        let config = Config::default();
        assert_eq!(config.hotkeys, vec![DEFAULT_HOTKEY.to_string()]);
        assert_eq!(config.host_command, DEFAULT_HOST_COMMAND);
        assert!(config.host_args.is_empty());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config = parse_config(r#"{"hostCommand": "/usr/bin/my-host"}"#)
            .expect("partial config parses");
        assert_eq!(config.host_command, "/usr/bin/my-host");
        assert_eq!(config.hotkeys, vec![DEFAULT_HOTKEY.to_string()]);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let err = parse_config("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
        assert!(err.to_string().contains("malformed config file"));
    }

    #[test]
    fn full_file_round_trips() {
        let config = Config {
            hotkeys: vec!["Alt+A".to_string()],
            host_command: "host".to_string(),
            host_args: vec!["--stdio".to_string()],
        };
        let text = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.hotkeys, config.hotkeys);
        assert_eq!(parsed.host_args, config.host_args);
    }
}
