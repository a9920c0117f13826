use crate::common::{GameMode, LogLevel};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub daemon: DaemonSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DaemonSettings {
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// How often the foreground poller samples the focused task.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Mode used for games whose gamelist entry has no explicit preference.
    #[serde(default)]
    pub default_mode: GameMode,

    #[serde(default = "default_apply_mode")]
    pub apply_mode: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_mode: GameMode::default(),
            apply_mode: default_apply_mode(),
        }
    }
}

impl Settings {
    /// Load settings from TOML file, falling back to defaults if it is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse settings.toml")
    }
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_apply_mode() -> bool {
    true
}
