use anyhow::{Context, Result};
use gamespace::daemon;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cfg = daemon::config::DaemonConfig::load()?;

    let base_filter = EnvFilter::new(cfg.settings.daemon.log_level.as_filter());
    let (filter_layer, filter_handle) = reload::Layer::new(base_filter);
    let timer = fmt::time::UtcTime::new(
        time::format_description::parse("[hour]:[minute]:[second]")
            .context("Invalid log timestamp format")?,
    );

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_level(false)
                .with_timer(timer)
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::info!(
        "Gamespace v{} started (default mode={}, apply={}, games={})",
        env!("CARGO_PKG_VERSION"),
        cfg.settings.session.default_mode,
        if cfg.settings.session.apply_mode { "on" } else { "off" },
        cfg.gamelist.game.len()
    );

    daemon::run::run_with_config(cfg, filter_handle).await
}
