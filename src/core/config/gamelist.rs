use crate::common::GameMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GameList {
    #[serde(default)]
    pub game: Vec<GameProfile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GameProfile {
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<GameMode>,
}

impl GameProfile {
    pub fn new(package: impl Into<String>, mode: Option<GameMode>) -> Self {
        Self {
            package: package.into(),
            mode,
        }
    }
}

impl GameList {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Gamelist file not found, using empty list");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse gamelist.toml")
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let toml_string = toml::to_string(self).context("Failed to serialize gamelist")?;

        let temp_path = path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string).context("Failed to write temporary file")?;

        std::fs::rename(&temp_path, path).context("Failed to rename to final file")?;

        tracing::info!("Gamelist saved to {}", path.display());
        Ok(())
    }

    pub fn find(&self, package: &str) -> Option<&GameProfile> {
        self.game.iter().find(|g| g.package == package)
    }

    pub fn add(&mut self, profile: GameProfile) -> Result<()> {
        if self.find(&profile.package).is_some() {
            anyhow::bail!("Game {} already exists", profile.package);
        }

        self.game.push(profile);
        Ok(())
    }

    pub fn remove(&mut self, package: &str) -> Result<()> {
        let initial_len = self.game.len();
        self.game.retain(|g| g.package != package);

        if self.game.len() == initial_len {
            anyhow::bail!("Game {} not found", package);
        }
        Ok(())
    }

    pub fn set_mode(&mut self, package: &str, mode: GameMode) -> Result<()> {
        match self.game.iter_mut().find(|g| g.package == package) {
            Some(profile) => {
                profile.mode = Some(mode);
                Ok(())
            }
            None => anyhow::bail!("Game {} not found", package),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_with_and_without_mode() {
        let gl: GameList = toml::from_str(
            r#"
            [[game]]
            package = "com.mobile.legends"
            mode = "battery"

            [[game]]
            package = "com.tencent.ig"
            "#,
        )
        .unwrap();

        assert_eq!(gl.game.len(), 2);
        assert_eq!(
            gl.find("com.mobile.legends").and_then(|g| g.mode),
            Some(GameMode::Battery)
        );
        assert_eq!(gl.find("com.tencent.ig").and_then(|g| g.mode), None);
        assert!(gl.find("com.android.chrome").is_none());
    }

    #[test]
    fn add_rejects_duplicates_and_remove_rejects_unknown() {
        let mut gl = GameList::default();
        gl.add(GameProfile::new("com.a.game", None)).unwrap();
        assert!(gl.add(GameProfile::new("com.a.game", None)).is_err());
        assert!(gl.remove("com.b.game").is_err());
        gl.remove("com.a.game").unwrap();
        assert!(gl.game.is_empty());
    }

    #[test]
    fn set_mode_updates_existing_entry_only() {
        let mut gl = GameList::default();
        gl.add(GameProfile::new("com.a.game", None)).unwrap();
        gl.set_mode("com.a.game", GameMode::Standard).unwrap();
        assert_eq!(gl.find("com.a.game").unwrap().mode, Some(GameMode::Standard));
        assert!(gl.set_mode("com.b.game", GameMode::Standard).is_err());
    }

    #[test]
    fn save_then_load_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gamelist.toml");

        let mut gl = GameList::default();
        gl.add(GameProfile::new("com.a.game", Some(GameMode::Custom)))
            .unwrap();
        gl.add(GameProfile::new("com.b.game", None)).unwrap();
        gl.save(&path).unwrap();

        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(GameList::load(&path).unwrap(), gl);
    }

    #[test]
    fn missing_file_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let gl = GameList::load(dir.path().join("gamelist.toml")).unwrap();
        assert!(gl.game.is_empty());
    }
}
