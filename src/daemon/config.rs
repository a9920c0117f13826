use crate::common::SOCKET_PATH;
use crate::core::config::{self, GameList, Settings};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub settings: Settings,
    pub gamelist: GameList,
    pub settings_path: PathBuf,
    pub gamelist_path: PathBuf,
    pub socket_path: PathBuf,
}

impl DaemonConfig {
    /// Loads both config files from their standard locations.
    pub fn load() -> anyhow::Result<Self> {
        let (settings, gamelist) = config::load_all()?;
        Ok(Self {
            settings,
            gamelist,
            settings_path: config::settings_path(),
            gamelist_path: config::gamelist_path(),
            socket_path: PathBuf::from(SOCKET_PATH),
        })
    }
}
