use crate::core::dumpsys::{foreground, power::PowerState};
use crate::daemon::state::CurrentState;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Raw input to the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// The focused top-level task was observed; `None` when unavailable.
    ForegroundChanged(Option<String>),
    /// Screen power state flipped (on -> off or off -> on).
    ScreenToggled,
}

/// Platform queries the poller samples on every tick.
#[async_trait]
pub trait ForegroundProbe: Send + Sync {
    async fn foreground(&self) -> Option<String>;
    async fn screen_awake(&self) -> Option<bool>;
}

/// Probe backed by `dumpsys activity` and `dumpsys power`.
#[derive(Debug, Default, Clone)]
pub struct DumpsysProbe;

#[async_trait]
impl ForegroundProbe for DumpsysProbe {
    async fn foreground(&self) -> Option<String> {
        match foreground::get_foreground_package().await {
            Ok(pkg) => pkg,
            Err(e) => {
                debug!(target: "gamespace::source", "Foreground detect error: {:?}", e);
                None
            }
        }
    }

    async fn screen_awake(&self) -> Option<bool> {
        PowerState::fetch().await.map(|p| p.screen_awake)
    }
}

/// Turns periodic platform samples into `SourceEvent`s.
///
/// A foreground event is emitted on every tick while the screen is on;
/// deduplication is the tracker's job. An IPC-injected override replaces the
/// probed package.
pub struct ForegroundPoller {
    probe: Arc<dyn ForegroundProbe>,
    interval: Duration,
    override_foreground: Arc<RwLock<Option<String>>>,
    current: Arc<RwLock<CurrentState>>,
}

impl ForegroundPoller {
    pub fn new(
        probe: Arc<dyn ForegroundProbe>,
        interval: Duration,
        override_foreground: Arc<RwLock<Option<String>>>,
        current: Arc<RwLock<CurrentState>>,
    ) -> Self {
        Self {
            probe,
            interval,
            override_foreground,
            current,
        }
    }

    pub fn spawn(self, tx: mpsc::Sender<SourceEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(tx).await;
            debug!(target: "gamespace::source", "Foreground poller stopped");
        })
    }

    async fn run(self, tx: mpsc::Sender<SourceEvent>) {
        let mut tick = time::interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_awake: Option<bool> = None;

        info!(target: "gamespace::source", "Polling foreground every {}ms", self.interval.as_millis());

        loop {
            tick.tick().await;

            let awake = match self.probe.screen_awake().await {
                Some(awake) => {
                    if last_awake.is_some_and(|prev| prev != awake) {
                        debug!(target: "gamespace::source", "Screen {}", if awake { "on" } else { "off" });
                        if tx.send(SourceEvent::ScreenToggled).await.is_err() {
                            return;
                        }
                    }
                    last_awake = Some(awake);
                    if let Ok(mut cur) = self.current.write() {
                        cur.screen_awake = Some(awake);
                    }
                    awake
                }
                None => last_awake.unwrap_or(true),
            };

            if !awake {
                continue;
            }

            let injected = self.override_foreground.read().ok().and_then(|o| o.clone());
            let pkg = match injected {
                Some(pkg) => Some(pkg),
                None => self.probe.foreground().await,
            };

            if tx.send(SourceEvent::ForegroundChanged(pkg)).await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted samples, then repeats the last one.
    struct ScriptedProbe {
        samples: Mutex<VecDeque<(Option<bool>, Option<&'static str>)>>,
        last: Mutex<(Option<bool>, Option<&'static str>)>,
    }

    impl ScriptedProbe {
        fn new(samples: Vec<(Option<bool>, Option<&'static str>)>) -> Self {
            Self {
                samples: Mutex::new(samples.into()),
                last: Mutex::new((Some(true), None)),
            }
        }
    }

    #[async_trait]
    impl ForegroundProbe for ScriptedProbe {
        async fn screen_awake(&self) -> Option<bool> {
            let next = self.samples.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            if let Some(sample) = next {
                *last = sample;
            }
            last.0
        }

        async fn foreground(&self) -> Option<String> {
            self.last.lock().unwrap().1.map(str::to_string)
        }
    }

    fn poller(
        probe: ScriptedProbe,
        override_foreground: Arc<RwLock<Option<String>>>,
    ) -> (ForegroundPoller, Arc<RwLock<CurrentState>>) {
        let current = Arc::new(RwLock::new(CurrentState::default()));
        (
            ForegroundPoller::new(
                Arc::new(probe),
                Duration::from_millis(100),
                override_foreground,
                current.clone(),
            ),
            current,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn emits_toggles_and_skips_foreground_while_off() {
        let probe = ScriptedProbe::new(vec![
            (Some(true), Some("com.a.game")),
            (Some(false), Some("com.a.game")),
            (Some(true), Some("com.a.game")),
        ]);
        let (poller, current) = poller(probe, Arc::new(RwLock::new(None)));
        let (tx, mut rx) = mpsc::channel(16);
        let handle = poller.spawn(tx);

        let game = || SourceEvent::ForegroundChanged(Some("com.a.game".into()));
        assert_eq!(rx.recv().await, Some(game()));
        assert_eq!(rx.recv().await, Some(SourceEvent::ScreenToggled));
        assert_eq!(rx.recv().await, Some(SourceEvent::ScreenToggled));
        assert_eq!(rx.recv().await, Some(game()));
        assert_eq!(current.read().unwrap().screen_awake, Some(true));

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn injected_package_overrides_probe() {
        let probe = ScriptedProbe::new(vec![(Some(true), Some("com.android.launcher3"))]);
        let injected = Arc::new(RwLock::new(Some("com.injected.game".to_string())));
        let (poller, _) = poller(probe, injected);
        let (tx, mut rx) = mpsc::channel(16);
        let handle = poller.spawn(tx);

        assert_eq!(
            rx.recv().await,
            Some(SourceEvent::ForegroundChanged(Some("com.injected.game".into())))
        );
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_is_gone() {
        let probe = ScriptedProbe::new(vec![(Some(true), Some("com.a.game"))]);
        let (poller, _) = poller(probe, Arc::new(RwLock::new(None)));
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        poller.spawn(tx).await.unwrap();
    }
}
