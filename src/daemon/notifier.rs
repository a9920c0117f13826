use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{debug, info};

const SIGNAL_BACKLOG: usize = 16;

/// Entry points of the overlay service that reacts to game sessions.
pub trait SessionNotifier: Send + Sync {
    fn on_game_start(&self) -> Result<()>;
    fn on_game_leave(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    GameStart,
    GameLeave,
}

impl SessionSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GameStart => "GAME_START",
            Self::GameLeave => "GAME_LEAVE",
        }
    }
}

/// Fans session signals out to every overlay client subscribed over IPC.
///
/// Having no subscriber is not an error: the overlay may not be running.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<SessionSignal>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_BACKLOG);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.tx.subscribe()
    }

    fn publish(&self, signal: SessionSignal) {
        match self.tx.send(signal) {
            Ok(n) => debug!(target: "gamespace::session", "{} delivered to {} overlay client(s)", signal.as_str(), n),
            Err(_) => debug!(target: "gamespace::session", "{} dropped, no overlay client connected", signal.as_str()),
        }
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionNotifier for BroadcastNotifier {
    fn on_game_start(&self) -> Result<()> {
        info!(target: "gamespace::session", "Game session started");
        self.publish(SessionSignal::GameStart);
        Ok(())
    }

    fn on_game_leave(&self) -> Result<()> {
        info!(target: "gamespace::session", "Game session ended");
        self.publish(SessionSignal::GameLeave);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_signals_in_order() {
        let notifier = BroadcastNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.on_game_start().unwrap();
        notifier.on_game_leave().unwrap();

        assert_eq!(rx.recv().await.unwrap(), SessionSignal::GameStart);
        assert_eq!(rx.recv().await.unwrap(), SessionSignal::GameLeave);
    }

    #[test]
    fn no_subscriber_is_fine() {
        let notifier = BroadcastNotifier::new();
        assert!(notifier.on_game_start().is_ok());
    }
}
