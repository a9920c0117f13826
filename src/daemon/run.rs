use crate::common::LogLevel;
use crate::core::config::{GameList, Settings};
use crate::core::game_mode::{CmdGameModeService, GameModeService};
use crate::core::registry::SharedGameList;
use crate::daemon::applier::ModeApplier;
use crate::daemon::config::DaemonConfig;
use crate::daemon::ipc::{self, IpcHandles};
use crate::daemon::notifier::BroadcastNotifier;
use crate::daemon::session::SessionController;
use crate::daemon::source::{DumpsysProbe, ForegroundPoller, SourceEvent};
use crate::daemon::state::CurrentState;
use crate::daemon::tracker::SessionTracker;
use crate::daemon::watcher::{self, ConfigChange};
use anyhow::Result;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const EVENT_BACKLOG: usize = 64;
const MIN_POLL_INTERVAL_MS: u64 = 200;

pub type ReloadHandle =
    tracing_subscriber::reload::Handle<tracing_subscriber::EnvFilter, tracing_subscriber::Registry>;

pub struct Daemon {
    pub(crate) cfg: DaemonConfig,
    pub(crate) mode_service: Arc<dyn GameModeService>,
    pub(crate) shared_gamelist: SharedGameList,
    pub(crate) shared_current: Arc<RwLock<CurrentState>>,
    pub(crate) override_foreground: Arc<RwLock<Option<String>>>,
    pub(crate) enabled: Arc<AtomicBool>,
    pub(crate) current_log_level: Arc<RwLock<LogLevel>>,
    pub(crate) set_log_level: Arc<dyn Fn(LogLevel) + Send + Sync>,
    pub(crate) notifier: BroadcastNotifier,
    pub(crate) controller: SessionController,
    pub(crate) events_tx: mpsc::Sender<SourceEvent>,
}

impl Daemon {
    pub fn new(
        cfg: DaemonConfig,
        mode_service: Arc<dyn GameModeService>,
        filter_handle: ReloadHandle,
    ) -> (Self, mpsc::Receiver<SourceEvent>) {
        let shared_gamelist = SharedGameList::new(cfg.gamelist.clone());
        let shared_current = Arc::new(RwLock::new(CurrentState::default()));
        let enabled = Arc::new(AtomicBool::new(true));
        let notifier = BroadcastNotifier::new();
        let (events_tx, events_rx) = mpsc::channel(EVENT_BACKLOG);

        let session = &cfg.settings.session;
        debug!(target: "gamespace::daemon", "Default mode: {}, apply mode: {}", session.default_mode, session.apply_mode);

        let tracker = SessionTracker::new(Arc::new(shared_gamelist.clone()), session.default_mode);
        let controller = SessionController::new(
            tracker,
            ModeApplier::new(mode_service.clone()),
            Arc::new(notifier.clone()),
            enabled.clone(),
            shared_current.clone(),
        )
        .with_apply_mode(session.apply_mode);

        let current_log_level = Arc::new(RwLock::new(cfg.settings.daemon.log_level));
        let set_log_level = log_level_setter(filter_handle, current_log_level.clone());

        let daemon = Self {
            cfg,
            mode_service,
            shared_gamelist,
            shared_current,
            override_foreground: Arc::new(RwLock::new(None)),
            enabled,
            current_log_level,
            set_log_level,
            notifier,
            controller,
            events_tx,
        };
        (daemon, events_rx)
    }

    fn reload_settings(&mut self) {
        match Settings::load(&self.cfg.settings_path) {
            Ok(new_settings) => {
                self.controller.update_settings(&new_settings.session);

                let level = new_settings.daemon.log_level;
                if self.current_log_level.read().map(|l| *l != level).unwrap_or(true) {
                    (self.set_log_level)(level);
                }
                if new_settings.daemon.poll_interval_ms != self.cfg.settings.daemon.poll_interval_ms {
                    info!(target: "gamespace::daemon", "poll_interval_ms change takes effect after restart");
                }
                self.cfg.settings.session = new_settings.session;
                self.cfg.settings.daemon.log_level = level;
            }
            Err(e) => {
                error!(target: "gamespace::daemon", "Failed to reload settings: {:?}", e);
            }
        }
    }

    pub fn init_ipc(&self) -> JoinHandle<()> {
        let shared = self.shared_gamelist.clone();
        let gamelist_path = self.cfg.gamelist_path.clone();
        let reload_fn = Arc::new(move || -> Result<usize> {
            let new_cfg = GameList::load(&gamelist_path)?;
            shared.replace(new_cfg)
        });

        let ipc_handles = IpcHandles {
            enabled: self.enabled.clone(),
            gamelist: self.shared_gamelist.clone(),
            gamelist_path: self.cfg.gamelist_path.clone(),
            override_foreground: self.override_foreground.clone(),
            events: self.events_tx.clone(),
            reload_fn,
            set_log_level: self.set_log_level.clone(),
            current_state: self.shared_current.clone(),
            current_log_level: self.current_log_level.clone(),
            notifier: self.notifier.clone(),
            mode_service: self.mode_service.clone(),
        };

        let socket_path = self.cfg.socket_path.clone();
        tokio::spawn(async move {
            debug!(target: "gamespace::daemon", "Starting IPC socket listener...");
            match ipc::start(&socket_path, ipc_handles).await {
                Ok(_) => info!(target: "gamespace::daemon", "IPC    | Listener stopped"),
                Err(e) => error!(target: "gamespace::daemon", "IPC    | Error: {:?}", e),
            }
        })
    }

    fn spawn_poller(&self) -> JoinHandle<()> {
        let interval_ms = self.cfg.settings.daemon.poll_interval_ms.max(MIN_POLL_INTERVAL_MS);
        ForegroundPoller::new(
            Arc::new(DumpsysProbe),
            Duration::from_millis(interval_ms),
            self.override_foreground.clone(),
            self.shared_current.clone(),
        )
        .spawn(self.events_tx.clone())
    }
}

fn log_level_setter(
    handle: ReloadHandle,
    current: Arc<RwLock<LogLevel>>,
) -> Arc<dyn Fn(LogLevel) + Send + Sync> {
    Arc::new(move |lvl: LogLevel| {
        if let Ok(mut l) = current.write() {
            *l = lvl;
        }
        match handle.reload(EnvFilter::new(lvl.as_filter())) {
            Ok(_) => debug!(target: "gamespace::ipc", "Log level changed to {:?}", lvl),
            Err(e) => error!(target: "gamespace::ipc", "Failed to change log level: {}", e),
        }
    })
}

async fn next_change(rx: &mut Option<mpsc::Receiver<ConfigChange>>) -> Option<ConfigChange> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

pub async fn run_with_config(cfg: DaemonConfig, filter_handle: ReloadHandle) -> Result<()> {
    let (mut daemon, mut events_rx) =
        Daemon::new(cfg, Arc::new(CmdGameModeService), filter_handle);

    let ipc_task = daemon.init_ipc();

    let (_watcher, mut watch_rx) = match watcher::start_config_watcher(
        daemon.shared_gamelist.clone(),
        daemon.cfg.settings_path.clone(),
        daemon.cfg.gamelist_path.clone(),
    ) {
        Ok((w, rx)) => (Some(w), Some(rx)),
        Err(e) => {
            error!(target: "gamespace::daemon", "Failed to start config watcher: {:?}", e);
            (None, None)
        }
    };

    let poller_task = daemon.spawn_poller();
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            Some(event) = events_rx.recv() => {
                daemon.controller.handle_event(event);
            }
            Some(change) = next_change(&mut watch_rx) => match change {
                ConfigChange::Settings => daemon.reload_settings(),
                ConfigChange::Gamelist => {
                    debug!(target: "gamespace::daemon", "Gamelist now has {} games", daemon.shared_gamelist.len());
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(target: "gamespace::daemon", "Daemon | Received Ctrl-C, shutting down");
                break;
            }
            _ = sigterm.recv() => {
                info!(target: "gamespace::daemon", "Daemon | Received SIGTERM, shutting down");
                break;
            }
        }
    }

    poller_task.abort();
    ipc_task.abort();
    let _ = std::fs::remove_file(&daemon.cfg.socket_path);
    if let Some(pkg) = daemon.controller.tracker().state().active_session.as_deref() {
        debug!(target: "gamespace::daemon", "Discarding open session for {}", pkg);
    }
    info!(target: "gamespace::daemon", "Daemon | Stopped");
    Ok(())
}
