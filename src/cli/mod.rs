mod app;
mod client;
mod executor;
mod output;

use crate::Result;
use clap::Parser;

pub use app::{Cli, Commands};

/// Entry point of `gamespacectl`.
pub async fn run() -> Result<()> {
    executor::execute(Cli::parse()).await
}
