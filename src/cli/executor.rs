use super::{app::*, client::IpcClient, output};
use crate::Result;
use crate::common::SOCKET_PATH;
use anyhow::bail;

pub async fn execute(cli: Cli) -> Result<()> {
    let socket = cli.socket.as_deref().unwrap_or(SOCKET_PATH);
    let client = IpcClient::with_path(socket);

    if !matches!(cli.command, Commands::Status) && !client.is_alive().await {
        bail!("Daemon is not running");
    }

    match cli.command {
        Commands::Status => {
            handle_status(&client).await?;
        }

        Commands::Enable => {
            let resp = client.send("ENABLE").await?;
            println!("{}", resp);
        }

        Commands::Disable => {
            let resp = client.send("DISABLE").await?;
            println!("{}", resp);
        }

        Commands::Reload => {
            let resp = client.send("RELOAD").await?;
            report(&resp, "Gamelist reloaded")?;
        }

        Commands::AddGame { package, mode } => {
            let cmd = match mode {
                Some(m) => format!("ADD_GAME {} {}", package, m.to_upper_str()),
                None => format!("ADD_GAME {}", package),
            };
            let resp = client.send(&cmd).await?;
            report(&resp, "Game added")?;
        }

        Commands::RemoveGame { package } => {
            let resp = client.send(&format!("REMOVE_GAME {}", package)).await?;
            report(&resp, "Game removed")?;
        }

        Commands::SetMode { package, mode } => {
            let cmd = format!("SET_MODE {} {}", package, mode.to_upper_str());
            let resp = client.send(&cmd).await?;
            report(&resp, "Mode set")?;
        }

        Commands::ListGames => {
            let resp = client.send("GET_GAMELIST").await?;
            println!("Configured games:\n{}", resp);
        }

        Commands::SetLog { level } => {
            let cmd = format!("SET_LOG {}", level.to_upper_str());
            let resp = client.send(&cmd).await?;
            report(&resp, "Log level set")?;
        }

        Commands::Inject { package } => {
            let resp = client.send(&format!("INJECT {}", package)).await?;
            report(&resp, "Injected")?;
        }

        Commands::ClearInject => {
            let resp = client.send("CLEAR_INJECT").await?;
            report(&resp, "Inject cleared")?;
        }

        Commands::Reset => {
            let resp = client.send("RESET").await?;
            report(&resp, "Foreground tracking reset")?;
        }

        Commands::Watch => {
            client.watch(|line| println!("{}", line)).await?;
        }

        Commands::Ping => {
            if client.ping().await? {
                output::print_success("Daemon is alive (PONG)");
            } else {
                output::print_error("Daemon not responding");
            }
        }
    }

    Ok(())
}

fn report(resp: &str, what: &str) -> Result<()> {
    if resp.starts_with("ERR") {
        output::print_error(resp);
        bail!("{} failed", what);
    }
    output::print_success(&format!("{}: {}", what, resp));
    Ok(())
}

async fn handle_status(client: &IpcClient) -> Result<()> {
    if !client.is_alive().await {
        output::print_daemon_stopped();
        return Ok(());
    }

    let response = client.send("STATUS").await?;
    output::print_status(&response);
    Ok(())
}
