use crate::common::GameMode;
use crate::core::cmd::run_cmd_stdout;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const GAME_CMD_TIMEOUT_MS: u64 = 5000;
const GAME_OVERLAY_NAMESPACE: &str = "game_overlay";
/// Opts the app into performance and battery modes without downscaling.
const INTERVENTION_CONFIG: &str = "mode=2,downscaleFactor=1.0:mode=3,downscaleFactor=1.0";

static MODES_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)modes?:\s*\[([^\]]*)\]").expect("static regex must compile")
});

/// Platform service that knows which game modes an app supports and can
/// switch an app between them. Calls may be slow or fail.
#[async_trait]
pub trait GameModeService: Send + Sync {
    async fn available_modes(&self, package: &str) -> Result<Vec<GameMode>>;

    async fn set_mode(&self, package: &str, mode: GameMode) -> Result<()>;

    /// Registers a game-mode intervention so the platform offers the
    /// non-standard modes for `package`.
    async fn setup_intervention(&self, package: &str) -> Result<()>;

    async fn clear_intervention(&self, package: &str) -> Result<()>;
}

/// `GameModeService` backed by the `cmd game` shell interface.
#[derive(Debug, Clone, Default)]
pub struct CmdGameModeService;

#[async_trait]
impl GameModeService for CmdGameModeService {
    async fn available_modes(&self, package: &str) -> Result<Vec<GameMode>> {
        let out = run_cmd_stdout("cmd", &["game", "list-modes", package], GAME_CMD_TIMEOUT_MS)
            .await
            .with_context(|| format!("Failed to list game modes for {}", package))?;
        parse_available_modes(&out)
    }

    async fn set_mode(&self, package: &str, mode: GameMode) -> Result<()> {
        debug!(target: "gamespace::mode", "Setting {} to {}", package, mode);
        let id = mode.id().to_string();
        let out = run_cmd_stdout("cmd", &["game", "mode", &id, package], GAME_CMD_TIMEOUT_MS)
            .await
            .with_context(|| format!("Failed to set game mode {} for {}", mode, package))?;

        let lower = out.to_lowercase();
        if lower.contains("not supported") || lower.contains("error") {
            bail!("cmd game mode rejected {} for {}: {}", mode, package, out.trim());
        }
        Ok(())
    }

    async fn setup_intervention(&self, package: &str) -> Result<()> {
        debug!(target: "gamespace::mode", "Setting up game mode intervention for {}", package);
        run_cmd_stdout(
            "device_config",
            &["put", GAME_OVERLAY_NAMESPACE, package, INTERVENTION_CONFIG],
            GAME_CMD_TIMEOUT_MS,
        )
        .await
        .with_context(|| format!("Failed to set up intervention for {}", package))?;
        Ok(())
    }

    async fn clear_intervention(&self, package: &str) -> Result<()> {
        debug!(target: "gamespace::mode", "Clearing game mode intervention for {}", package);
        run_cmd_stdout(
            "device_config",
            &["delete", GAME_OVERLAY_NAMESPACE, package],
            GAME_CMD_TIMEOUT_MS,
        )
        .await
        .with_context(|| format!("Failed to clear intervention for {}", package))?;
        Ok(())
    }
}

pub(crate) fn parse_available_modes(output: &str) -> Result<Vec<GameMode>> {
    let caps = MODES_LIST
        .captures_iter(output)
        .last()
        .context("No mode list in cmd game output")?;

    let mut modes: Vec<GameMode> = caps[1]
        .split(',')
        .filter_map(|m| m.trim().parse::<GameMode>().ok())
        .collect();
    modes.dedup();
    Ok(modes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_mode_list() {
        let out = "package com.mobile.legends current mode: standard, available game modes: [standard,performance,battery]\n";
        assert_eq!(
            parse_available_modes(out).unwrap(),
            vec![GameMode::Standard, GameMode::Performance, GameMode::Battery]
        );
    }

    #[test]
    fn parses_numeric_ids_and_skips_unsupported() {
        let out = "supported modes: [0, 1, 2, 4]";
        assert_eq!(
            parse_available_modes(out).unwrap(),
            vec![GameMode::Standard, GameMode::Performance, GameMode::Custom]
        );
    }

    #[test]
    fn empty_list_is_ok() {
        assert!(parse_available_modes("available game modes: []")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unrecognized_output_is_error() {
        assert!(parse_available_modes("Unknown package: com.foo").is_err());
    }
}
