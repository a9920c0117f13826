use crate::core::config::SessionSettings;
use crate::daemon::applier::ModeApplier;
use crate::daemon::notifier::SessionNotifier;
use crate::daemon::source::SourceEvent;
use crate::daemon::state::CurrentState;
use crate::daemon::tracker::{Action, SessionTracker};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info};

/// Routes source events through the tracker and performs the resulting
/// session side effects. Owned by the single event loop task.
pub struct SessionController {
    tracker: SessionTracker,
    applier: ModeApplier,
    apply_mode: bool,
    notifier: Arc<dyn SessionNotifier>,
    enabled: Arc<AtomicBool>,
    current: Arc<RwLock<CurrentState>>,
}

impl SessionController {
    pub fn new(
        tracker: SessionTracker,
        applier: ModeApplier,
        notifier: Arc<dyn SessionNotifier>,
        enabled: Arc<AtomicBool>,
        current: Arc<RwLock<CurrentState>>,
    ) -> Self {
        Self {
            tracker,
            applier,
            apply_mode: true,
            notifier,
            enabled,
            current,
        }
    }

    pub fn with_apply_mode(mut self, apply_mode: bool) -> Self {
        self.apply_mode = apply_mode;
        self
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn update_settings(&mut self, settings: &SessionSettings) {
        if self.tracker.default_mode() != settings.default_mode {
            info!(target: "gamespace::session", "Default game mode {} -> {}", self.tracker.default_mode(), settings.default_mode);
            self.tracker.set_default_mode(settings.default_mode);
        }
        if self.apply_mode != settings.apply_mode {
            info!(target: "gamespace::session", "Mode application {}", if settings.apply_mode { "enabled" } else { "disabled" });
            self.apply_mode = settings.apply_mode;
        }
    }

    /// Handles one event to completion. Errors are logged here and never
    /// reach the caller, so one bad event cannot stop the loop.
    pub fn handle_event(&mut self, event: SourceEvent) -> Action {
        let action = match event {
            SourceEvent::ScreenToggled => {
                self.tracker.reset_foreground_tracking();
                Action::None
            }
            SourceEvent::ForegroundChanged(pkg) => {
                if !self.enabled.load(Ordering::Acquire) {
                    debug!(target: "gamespace::session", "Disabled, ignoring foreground {:?}", pkg);
                    return Action::None;
                }
                let action = self.tracker.handle_foreground_change(pkg.as_deref());
                if let Err(e) = self.dispatch(&action) {
                    error!(target: "gamespace::session", "Session transition failed: {:#}", e);
                }
                action
            }
        };
        self.publish();
        action
    }

    fn dispatch(&self, action: &Action) -> Result<()> {
        match action {
            Action::None => Ok(()),
            Action::EnterSession { package, mode } => {
                info!(target: "gamespace::session", "Entering game session for {} (mode: {})", package, mode);
                if self.apply_mode {
                    let _ = self.applier.apply(package.clone(), *mode);
                }
                self.notifier
                    .on_game_start()
                    .with_context(|| format!("on_game_start failed for {}", package))?;
                if let Ok(mut cur) = self.current.write() {
                    cur.sessions_started += 1;
                }
                Ok(())
            }
            Action::LeaveSession => {
                info!(target: "gamespace::session", "Leaving game session");
                self.notifier.on_game_leave().context("on_game_leave failed")
            }
        }
    }

    fn publish(&self) {
        if let Ok(mut cur) = self.current.write() {
            let state = self.tracker.state();
            cur.foreground = state.last_foreground.clone();
            cur.session = state.active_session.clone();
        }
    }
}
