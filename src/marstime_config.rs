use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::logging::LogLevel;
use crate::zones::TimeZoneProfile;

fn default_zone() -> String {
    "curiosity".to_string()
}

#[derive(Debug, Deserialize)]
pub struct MarsTimeConfig {
    /// Leap second list to use instead of the downloaded or system copy.
    #[serde(default)]
    pub leap_file: Option<PathBuf>,
    #[serde(default = "default_zone")]
    pub default_zone: String,
    #[serde(default)]
    pub log_level: LogLevel,
    /// Extra profiles, keyed by the name used with `--zone`.
    #[serde(default)]
    pub zones: HashMap<String, TimeZoneProfile>,
}

impl Default for MarsTimeConfig {
    fn default() -> Self {
        Self {
            leap_file: None,
            default_zone: default_zone(),
            log_level: LogLevel::default(),
            zones: HashMap::new(),
        }
    }
}

/// Load config from `~/.config/marstime/config.toml`. Falls back to defaults on missing/invalid file.
pub fn load_config() -> MarsTimeConfig {
    load_config_impl().unwrap_or_default()
}

fn load_config_impl() -> Option<MarsTimeConfig> {
    let config_dir = crate::config::config_dir().ok()?;
    load_config_from(&config_dir.join("config.toml"))
}

fn load_config_from(path: &Path) -> Option<MarsTimeConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
