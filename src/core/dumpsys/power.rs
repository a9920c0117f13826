use crate::core::cmd::run_cmd_timeout_async;

const DUMPSYS_TIMEOUT_MS: u64 = 1500;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PowerState {
    pub screen_awake: bool,
}

impl PowerState {
    /// Returns `None` when the power service could not be queried.
    pub async fn fetch() -> Option<PowerState> {
        match run_cmd_timeout_async("/system/bin/dumpsys", &["power"], DUMPSYS_TIMEOUT_MS).await {
            Ok(out) => Some(Self::parse(&String::from_utf8_lossy(&out.stdout))),
            Err(e) => {
                tracing::debug!(target: "gamespace::source", "dumpsys power failed: {:?}", e);
                None
            }
        }
    }

    pub(crate) fn parse(s: &str) -> PowerState {
        let screen_awake = s.contains("mWakefulness=Awake")
            || s.contains("mInteractive=true")
            || s.contains("mScreenOn=true");
        PowerState { screen_awake }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_awake_and_asleep() {
        assert!(PowerState::parse("  mWakefulness=Awake\n  mIsPowered=false\n").screen_awake);
        assert!(!PowerState::parse("  mWakefulness=Asleep\n  mInteractive=false\n").screen_awake);
    }
}
