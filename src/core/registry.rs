use crate::common::GameMode;
use crate::core::config::GameList;
use std::sync::{Arc, RwLock};

/// A registered game and the mode the user wants for it.
///
/// `mode` is `None` when the gamelist entry carries no explicit preference;
/// callers substitute their configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    pub package: String,
    pub mode: Option<GameMode>,
}

/// Read-only view over the user's registered games.
///
/// Implementations must reflect the latest persisted edits on every call.
pub trait GameRegistry: Send + Sync {
    fn list_games(&self) -> Vec<GameEntry>;

    fn find(&self, package: &str) -> Option<GameEntry> {
        self.list_games().into_iter().find(|g| g.package == package)
    }
}

impl GameRegistry for GameList {
    fn list_games(&self) -> Vec<GameEntry> {
        self.game
            .iter()
            .map(|g| GameEntry {
                package: g.package.clone(),
                mode: g.mode,
            })
            .collect()
    }

    fn find(&self, package: &str) -> Option<GameEntry> {
        GameList::find(self, package).map(|g| GameEntry {
            package: g.package.clone(),
            mode: g.mode,
        })
    }
}

/// Gamelist shared with the config watcher and the IPC editing commands.
#[derive(Debug, Clone, Default)]
pub struct SharedGameList(Arc<RwLock<GameList>>);

impl SharedGameList {
    pub fn new(gamelist: GameList) -> Self {
        Self(Arc::new(RwLock::new(gamelist)))
    }

    pub fn inner(&self) -> &Arc<RwLock<GameList>> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.read().map(|g| g.game.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn replace(&self, gamelist: GameList) -> anyhow::Result<usize> {
        let mut guard = self
            .0
            .write()
            .map_err(|_| anyhow::anyhow!("Gamelist lock poisoned"))?;
        let count = gamelist.game.len();
        *guard = gamelist;
        Ok(count)
    }
}

impl GameRegistry for SharedGameList {
    fn list_games(&self) -> Vec<GameEntry> {
        match self.0.read() {
            Ok(g) => g.list_games(),
            Err(_) => {
                tracing::warn!(target: "gamespace::session", "Gamelist lock poisoned, treating registry as empty");
                Vec::new()
            }
        }
    }

    fn find(&self, package: &str) -> Option<GameEntry> {
        self.0.read().ok().and_then(|g| GameRegistry::find(&*g, package))
    }
}
