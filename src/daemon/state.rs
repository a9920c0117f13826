/// Mutable state owned by the session tracker.
///
/// `None` means unknown. `active_session` is only `Some` between an
/// `on_game_start` and the matching `on_game_leave`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub last_foreground: Option<String>,
    pub active_session: Option<String>,
}

/// Snapshot published for IPC status queries.
#[derive(Debug, Default, Clone)]
pub struct CurrentState {
    pub foreground: Option<String>,
    pub session: Option<String>,
    pub screen_awake: Option<bool>,
    pub sessions_started: u64,
}
