use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Per-app game mode as understood by the platform game manager.
///
/// The numeric ids match the values `cmd game` accepts and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Standard,
    Performance,
    Battery,
    Custom,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        Self::Standard,
        Self::Performance,
        Self::Battery,
        Self::Custom,
    ];

    pub fn id(&self) -> u8 {
        match self {
            Self::Standard => 1,
            Self::Performance => 2,
            Self::Battery => 3,
            Self::Custom => 4,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Standard),
            2 => Some(Self::Performance),
            3 => Some(Self::Battery),
            4 => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Performance => "PERFORMANCE",
            Self::Battery => "BATTERY",
            Self::Custom => "CUSTOM",
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        Self::Performance
    }
}

impl FromStr for GameMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u8>() {
            return Self::from_id(id).ok_or("game mode id must be 1-4");
        }
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "performance" => Ok(Self::Performance),
            "battery" => Ok(Self::Battery),
            "custom" => Ok(Self::Custom),
            _ => Err("expected one of standard|performance|battery|custom"),
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Performance => write!(f, "performance"),
            Self::Battery => write!(f, "battery"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            _ => Err("usage: SETLOG <DEBUG|INFO|WARN|ERROR>"),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}
