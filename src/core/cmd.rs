use anyhow::{Context, Result, bail};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

pub async fn run_cmd_timeout_async(
    program: &str,
    args: &[&str],
    timeout_ms: u64,
) -> Result<Output> {
    let timeout = Duration::from_millis(timeout_ms);

    tokio::time::timeout(timeout, Command::new(program).args(args).kill_on_drop(true).output())
        .await
        .with_context(|| format!("Command timeout after {}ms: {}", timeout_ms, program))?
        .with_context(|| format!("Failed to execute: {}", program))
}

/// Runs a command and returns its stdout, failing on a non-zero exit status.
pub async fn run_cmd_stdout(program: &str, args: &[&str], timeout_ms: u64) -> Result<String> {
    let out = run_cmd_timeout_async(program, args, timeout_ms).await?;
    if !out.status.success() {
        bail!(
            "{} {} exited with {}: {}",
            program,
            args.join(" "),
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}
