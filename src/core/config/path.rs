use crate::common::{CONFIG_DIR, GAMELIST_FILE, SETTINGS_FILE};
use std::path::PathBuf;

pub use super::gamelist::*;
pub use super::settings::*;

pub fn settings_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join(SETTINGS_FILE)
}

pub fn gamelist_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join(GAMELIST_FILE)
}

pub fn load_all() -> anyhow::Result<(Settings, GameList)> {
    let settings = Settings::load(settings_path())?;
    let gamelist = GameList::load(gamelist_path())?;
    Ok((settings, gamelist))
}
