use crate::core::config::GameList;
use crate::core::registry::SharedGameList;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use anyhow::bail;
use tracing::{error, info, warn};

const MAX_RELOAD_ATTEMPTS: u32 = 3;
const RELOAD_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Settings,
    /// The gamelist was re-read into the shared registry.
    Gamelist,
}

/// Watches the config directories. Gamelist edits are loaded straight into
/// `shared` so the very next registry lookup sees them.
///
/// The returned watcher must be kept alive for events to flow.
pub fn start_config_watcher(
    shared: SharedGameList,
    settings_path: PathBuf,
    gamelist_path: PathBuf,
) -> anyhow::Result<(RecommendedWatcher, mpsc::Receiver<ConfigChange>)> {
    let (tx, rx) = mpsc::channel::<ConfigChange>(10);
    let dir = parent_dir(&gamelist_path);
    let settings_dir = parent_dir(&settings_path);
    std::fs::create_dir_all(&dir)?;
    std::fs::create_dir_all(&settings_dir)?;

    let settings_name = settings_path.file_name().map(|n| n.to_os_string());
    let gamelist_name = gamelist_path.file_name().map(|n| n.to_os_string());

    let mut watcher =
        notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            let Ok(event) = res else {
                return;
            };
            if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                return;
            }

            let names: Vec<_> = event.paths.iter().filter_map(|p| p.file_name()).collect();
            if names.iter().any(|n| Some(n.to_os_string()) == settings_name) {
                let _ = tx.blocking_send(ConfigChange::Settings);
            }
            if names.iter().any(|n| Some(n.to_os_string()) == gamelist_name) {
                info!(target: "gamespace::daemon", "Gamelist file changed, reloading...");
                if reload_gamelist(&shared, &gamelist_path) {
                    let _ = tx.blocking_send(ConfigChange::Gamelist);
                }
            }
        })?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!(target: "gamespace::daemon", "Config watcher started on {}", dir.display());
    if settings_dir != dir {
        watcher.watch(&settings_dir, RecursiveMode::NonRecursive)?;
        info!(target: "gamespace::daemon", "Config watcher started on {}", settings_dir.display());
    }

    Ok((watcher, rx))
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// An existing but blank file is a write still in progress, not an empty list.
fn load_written_gamelist(path: &Path) -> anyhow::Result<GameList> {
    if path.exists() && std::fs::read_to_string(path)?.trim().is_empty() {
        bail!("{} is empty", path.display());
    }
    GameList::load(path)
}

fn reload_gamelist(shared: &SharedGameList, path: &Path) -> bool {
    for attempt in 1..=MAX_RELOAD_ATTEMPTS {
        match load_written_gamelist(path) {
            Ok(new_list) => match shared.replace(new_list) {
                Ok(count) => {
                    info!(target: "gamespace::daemon", "Gamelist reloaded: {} games", count);
                    return true;
                }
                Err(e) => {
                    error!(target: "gamespace::daemon", "Failed to store gamelist: {:?}", e);
                    return false;
                }
            },
            Err(e) if attempt < MAX_RELOAD_ATTEMPTS => {
                warn!(target: "gamespace::daemon", "Failed reloading gamelist (attempt {}/{}): {:?}, retrying in 2s...", attempt, MAX_RELOAD_ATTEMPTS, e);
                std::thread::sleep(RELOAD_RETRY_DELAY);
            }
            Err(e) => {
                error!(target: "gamespace::daemon", "Failed to reload gamelist after {} attempts: {:?}", MAX_RELOAD_ATTEMPTS, e);
            }
        }
    }
    false
}
