use crate::common::GameMode;
use crate::core::game_mode::GameModeService;
use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Applies a game's preferred mode off the event path, best effort.
#[derive(Clone)]
pub struct ModeApplier {
    service: Arc<dyn GameModeService>,
}

impl ModeApplier {
    pub fn new(service: Arc<dyn GameModeService>) -> Self {
        Self { service }
    }

    /// Spawns the mode switch as an independent task. Callers are free to
    /// drop the handle; failures never leave the task.
    pub fn apply(&self, package: String, mode: GameMode) -> JoinHandle<()> {
        let service = self.service.clone();
        tokio::spawn(async move {
            match apply_if_supported(service.as_ref(), &package, mode).await {
                Ok(true) => debug!(target: "gamespace::mode", "Applied {} to {}", mode, package),
                Ok(false) => {
                    debug!(target: "gamespace::mode", "{} does not support {}, leaving mode unchanged", package, mode)
                }
                Err(e) => debug!(target: "gamespace::mode", "Mode apply for {} discarded: {:#}", package, e),
            }
        })
    }
}

async fn apply_if_supported(
    service: &dyn GameModeService,
    package: &str,
    mode: GameMode,
) -> Result<bool> {
    let available = service.available_modes(package).await?;
    if !available.contains(&mode) {
        return Ok(false);
    }
    service.set_mode(package, mode).await?;
    Ok(true)
}
