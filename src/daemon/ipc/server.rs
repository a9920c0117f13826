use super::handlers::handle_client;
use crate::common::LogLevel;
use crate::core::game_mode::GameModeService;
use crate::core::registry::SharedGameList;
use crate::daemon::notifier::BroadcastNotifier;
use crate::daemon::source::SourceEvent;
use crate::daemon::state::CurrentState;
use anyhow::{Context, Result};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use tokio::net::UnixListener;
use tokio::sync::mpsc;

/// Everything a client connection may read or act on.
#[derive(Clone)]
pub struct IpcHandles {
    pub enabled: Arc<AtomicBool>,
    pub gamelist: SharedGameList,
    pub gamelist_path: PathBuf,
    pub override_foreground: Arc<RwLock<Option<String>>>,
    pub events: mpsc::Sender<SourceEvent>,
    pub reload_fn: Arc<dyn Fn() -> Result<usize> + Send + Sync>,
    pub set_log_level: Arc<dyn Fn(LogLevel) + Send + Sync>,
    pub current_state: Arc<RwLock<CurrentState>>,
    pub current_log_level: Arc<RwLock<LogLevel>>,
    pub notifier: BroadcastNotifier,
    pub mode_service: Arc<dyn GameModeService>,
}

pub async fn start<P: AsRef<Path>>(path: P, h: IpcHandles) -> Result<()> {
    let path_ref = path.as_ref();
    let _ = std::fs::remove_file(path_ref);
    let listener = UnixListener::bind(path_ref)
        .with_context(|| format!("Failed to bind IPC socket {}", path_ref.display()))?;
    let _ = std::fs::set_permissions(path_ref, std::fs::Permissions::from_mode(0o666));
    tracing::debug!(target: "gamespace::ipc", "IPC listening at {:?}", path_ref);

    loop {
        let (stream, _) = listener.accept().await?;
        let hc = h.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, hc).await {
                tracing::warn!(target: "gamespace::ipc", "client error: {:?}", e);
            }
        });
    }
}
