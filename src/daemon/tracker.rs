use crate::common::GameMode;
use crate::core::registry::GameRegistry;
use crate::daemon::state::SessionState;
use std::sync::Arc;
use tracing::debug;

/// Outcome of feeding one foreground change into the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    EnterSession { package: String, mode: GameMode },
    LeaveSession,
}

/// Decides per foreground change whether a game session starts or ends.
pub struct SessionTracker {
    registry: Arc<dyn GameRegistry>,
    default_mode: GameMode,
    state: SessionState,
}

impl SessionTracker {
    pub fn new(registry: Arc<dyn GameRegistry>, default_mode: GameMode) -> Self {
        Self {
            registry,
            default_mode,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn default_mode(&self) -> GameMode {
        self.default_mode
    }

    pub fn set_default_mode(&mut self, mode: GameMode) {
        self.default_mode = mode;
    }

    pub fn handle_foreground_change(&mut self, foreground: Option<&str>) -> Action {
        let Some(current) = foreground else {
            return Action::None;
        };

        if self.state.last_foreground.as_deref() == Some(current) {
            return Action::None;
        }

        let action = match self.registry.find(current) {
            Some(entry) => {
                self.state.active_session = Some(current.to_string());
                Action::EnterSession {
                    package: current.to_string(),
                    mode: entry.mode.unwrap_or(self.default_mode),
                }
            }
            None if self.state.active_session.is_some() => {
                self.state.active_session = None;
                Action::LeaveSession
            }
            None => Action::None,
        };

        self.state.last_foreground = Some(current.to_string());
        action
    }

    /// Forgets the last seen foreground app so the next event is processed
    /// even if it repeats it. The active session is left untouched.
    pub fn reset_foreground_tracking(&mut self) {
        debug!(target: "gamespace::session", "Foreground tracking reset (was {:?})", self.state.last_foreground);
        self.state.last_foreground = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{GameList, GameProfile};

    const GAME_X: &str = "com.mobile.legends";
    const GAME_Y: &str = "com.tencent.ig";
    const LAUNCHER: &str = "com.android.launcher3";

    fn tracker() -> SessionTracker {
        let mut gl = GameList::default();
        gl.add(GameProfile::new(GAME_X, Some(GameMode::Battery)))
            .unwrap();
        gl.add(GameProfile::new(GAME_Y, None)).unwrap();
        SessionTracker::new(Arc::new(gl), GameMode::Performance)
    }

    fn feed(t: &mut SessionTracker, events: &[Option<&str>]) -> Vec<Action> {
        events
            .iter()
            .map(|e| t.handle_foreground_change(*e))
            .filter(|a| *a != Action::None)
            .collect()
    }

    fn enter(package: &str, mode: GameMode) -> Action {
        Action::EnterSession {
            package: package.to_string(),
            mode,
        }
    }

    #[test]
    fn repeated_events_yield_one_action() {
        let mut t = tracker();
        let actions = feed(&mut t, &[Some(GAME_X), Some(GAME_X), Some(GAME_X)]);
        assert_eq!(actions, vec![enter(GAME_X, GameMode::Battery)]);

        let mut t = tracker();
        assert!(feed(&mut t, &[Some(LAUNCHER), Some(LAUNCHER)]).is_empty());
    }

    #[test]
    fn game_to_game_never_leaves() {
        let mut t = tracker();
        let actions = feed(&mut t, &[Some(GAME_X), Some(GAME_Y)]);
        assert_eq!(
            actions,
            vec![
                enter(GAME_X, GameMode::Battery),
                enter(GAME_Y, GameMode::Performance),
            ]
        );
        assert_eq!(t.state().active_session.as_deref(), Some(GAME_Y));
    }

    #[test]
    fn leaving_to_non_game_leaves_once() {
        let mut t = tracker();
        let actions = feed(
            &mut t,
            &[Some(GAME_X), Some(LAUNCHER), Some("com.android.chrome")],
        );
        assert_eq!(
            actions,
            vec![enter(GAME_X, GameMode::Battery), Action::LeaveSession]
        );
        assert_eq!(t.state().active_session, None);
        assert_eq!(t.state().last_foreground.as_deref(), Some("com.android.chrome"));
    }

    #[test]
    fn reset_reprocesses_same_app() {
        let mut t = tracker();
        assert_eq!(
            t.handle_foreground_change(Some(GAME_X)),
            enter(GAME_X, GameMode::Battery)
        );
        t.reset_foreground_tracking();
        assert_eq!(t.state().last_foreground, None);
        assert_eq!(t.state().active_session.as_deref(), Some(GAME_X));
        assert_eq!(
            t.handle_foreground_change(Some(GAME_X)),
            enter(GAME_X, GameMode::Battery)
        );
    }

    #[test]
    fn first_non_game_is_silent() {
        let mut t = tracker();
        assert!(feed(&mut t, &[Some(LAUNCHER)]).is_empty());
        assert_eq!(t.state().last_foreground.as_deref(), Some(LAUNCHER));
        assert_eq!(t.state().active_session, None);
    }

    #[test]
    fn missing_foreground_is_ignored() {
        let mut t = tracker();
        t.handle_foreground_change(Some(GAME_X));
        assert_eq!(t.handle_foreground_change(None), Action::None);
        assert_eq!(t.state().last_foreground.as_deref(), Some(GAME_X));
        assert_eq!(t.handle_foreground_change(Some(GAME_X)), Action::None);
    }

    #[test]
    fn non_game_after_reset_with_no_session_is_silent() {
        let mut t = tracker();
        feed(&mut t, &[Some(LAUNCHER)]);
        t.reset_foreground_tracking();
        assert_eq!(t.handle_foreground_change(Some(LAUNCHER)), Action::None);
    }

    #[test]
    fn default_mode_changes_apply_to_next_entry() {
        let mut t = tracker();
        t.set_default_mode(GameMode::Standard);
        assert_eq!(
            t.handle_foreground_change(Some(GAME_Y)),
            enter(GAME_Y, GameMode::Standard)
        );
    }
}
