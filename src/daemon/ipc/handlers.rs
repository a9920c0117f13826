use super::commands::Command;
use super::server::IpcHandles;
use crate::common::IPC_GREETING;
use crate::core::config::{GameList, GameProfile};
use crate::daemon::source::SourceEvent;
use anyhow::Result;
use std::sync::atomic::Ordering;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, WriteHalf};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

const MAX_LINE: usize = 256;

const HELP: &str = "CMDS:
        - HELP | ?
        - STATUS
        - ENABLE | DISABLE
        - RELOAD
        - SETLOG <DEBUG|INFO|WARN|ERROR>
        - INJECT <pkg>
        - CLEAR_INJECT
        - RESET
        - PING
        - QUIT
        - ADD_GAME <pkg> [mode]
        - REMOVE_GAME <pkg>
        - SET_MODE <pkg> <STANDARD|PERFORMANCE|BATTERY|CUSTOM>
        - GET_GAMELIST
        - WATCH
 ";

/// Handle a single IPC client connection.
pub async fn handle_client<S>(stream: S, h: IpcHandles) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (r, mut w) = tokio::io::split(stream);
    let mut reader = BufReader::new(r);
    let mut line = String::new();
    w.write_all(format!("{}\n", IPC_GREETING).as_bytes()).await?;

    while reader.read_line(&mut line).await? > 0 {
        let s = line.trim();
        if s.len() > MAX_LINE {
            w.write_all(b"ERR input too long\n").await?;
            line.clear();
            continue;
        }
        let resp = match s.parse::<Command>() {
            Ok(Command::Help) => HELP.to_string(),
            Ok(Command::Ping) => "PONG\n".into(),
            Ok(Command::Quit) => {
                w.write_all(b"BYE\n").await?;
                break;
            }
            Ok(Command::Watch) => {
                watch_sessions(&mut w, &h).await?;
                break;
            }
            Ok(Command::Status) => status(&h),
            Ok(Command::Enable) => {
                h.enabled.store(true, Ordering::Release);
                "OK ENABLED\n".into()
            }
            Ok(Command::Disable) => {
                h.enabled.store(false, Ordering::Release);
                "OK DISABLED\n".into()
            }
            Ok(Command::Reload) => match (h.reload_fn)() {
                Ok(n) => format!("OK RELOADED {}\n", n),
                Err(e) => format!("ERR RELOAD {:?}\n", e),
            },
            Ok(Command::SetLog(lvl)) => {
                (h.set_log_level)(lvl);
                "OK SET_LOG\n".into()
            }
            Ok(Command::Inject(pkg)) => {
                if let Ok(mut g) = h.override_foreground.write() {
                    *g = Some(pkg);
                }
                "OK INJECT\n".into()
            }
            Ok(Command::ClearInject) => {
                if let Ok(mut g) = h.override_foreground.write() {
                    *g = None;
                }
                "OK CLEAR_INJECT\n".into()
            }
            Ok(Command::Reset) => match h.events.send(SourceEvent::ScreenToggled).await {
                Ok(_) => "OK RESET\n".into(),
                Err(_) => "ERR RESET event loop stopped\n".into(),
            },
            Ok(Command::AddGame(pkg, mode)) => {
                let resp = edit_gamelist(&h, "ADD_GAME", &pkg, |gl| {
                    gl.add(GameProfile::new(pkg.clone(), mode))
                });
                if resp.starts_with("OK")
                    && let Err(e) = h.mode_service.setup_intervention(&pkg).await
                {
                    warn!(target: "gamespace::ipc", "Game mode intervention for {} not set up: {:#}", pkg, e);
                }
                resp
            }
            Ok(Command::RemoveGame(pkg)) => {
                let resp = edit_gamelist(&h, "REMOVE_GAME", &pkg, |gl| gl.remove(&pkg));
                if resp.starts_with("OK")
                    && let Err(e) = h.mode_service.clear_intervention(&pkg).await
                {
                    warn!(target: "gamespace::ipc", "Game mode intervention for {} not cleared: {:#}", pkg, e);
                }
                resp
            }
            Ok(Command::SetMode(pkg, mode)) => {
                edit_gamelist(&h, "SET_MODE", &pkg, |gl| gl.set_mode(&pkg, mode))
            }
            Ok(Command::GetGameList) => gamelist_json(&h),
            Err(e) => format!("ERR {}\n", e),
        };
        if !resp.is_empty() {
            w.write_all(resp.as_bytes()).await?;
        }
        line.clear();
    }
    Ok(())
}

fn status(h: &IpcHandles) -> String {
    let enabled = h.enabled.load(Ordering::Acquire);
    let st = h
        .current_state
        .read()
        .map(|g| g.clone())
        .unwrap_or_default();
    let ov = h.override_foreground.read().ok().and_then(|o| o.clone());
    let log_level = match h.current_log_level.read() {
        Ok(l) => l.to_upper_str(),
        Err(_) => "UNKNOWN",
    };
    let screen = match st.screen_awake {
        Some(true) => "on",
        Some(false) => "off",
        None => "unknown",
    };
    format!(
        "ENABLED={}\nFOREGROUND={}\nSESSION={}\nSCREEN={}\nGAMES={}\nSESSIONS={}\nOVERRIDE={}\nLOG_LEVEL={}\n",
        enabled,
        st.foreground.as_deref().unwrap_or("None"),
        st.session.as_deref().unwrap_or("None"),
        screen,
        h.gamelist.len(),
        st.sessions_started,
        ov.as_deref().unwrap_or("None"),
        log_level
    )
}

fn gamelist_json(h: &IpcHandles) -> String {
    match h.gamelist.inner().read() {
        Ok(gl) => match serde_json::to_string(&gl.game) {
            Ok(json) => format!("{}\n", json),
            Err(e) => format!("ERR GET_GAMELIST {:?}\n", e),
        },
        Err(_) => "ERR lock poisoned\n".to_string(),
    }
}

/// Applies `edit` to the shared gamelist and persists it. The in-memory list
/// is only replaced once the save succeeded.
fn edit_gamelist<F>(h: &IpcHandles, verb: &str, pkg: &str, edit: F) -> String
where
    F: FnOnce(&mut GameList) -> Result<()>,
{
    let Ok(mut gl) = h.gamelist.inner().write() else {
        return "ERR lock poisoned\n".to_string();
    };
    let mut updated = gl.clone();
    if let Err(e) = edit(&mut updated) {
        return format!("ERR {} {}\n", verb, e);
    }
    if let Err(e) = updated.save(&h.gamelist_path) {
        return format!("ERR SAVE_GAMELIST {:?}\n", e);
    }
    *gl = updated;
    info!(target: "gamespace::ipc", "{} {}", verb, pkg);
    format!("OK {} {}\n", verb, pkg)
}

async fn watch_sessions<S>(w: &mut WriteHalf<S>, h: &IpcHandles) -> Result<()>
where
    S: AsyncRead + AsyncWrite,
{
    let mut rx = h.notifier.subscribe();
    w.write_all(b"OK WATCH\n").await?;
    debug!(target: "gamespace::ipc", "Overlay client subscribed to session signals");

    loop {
        match rx.recv().await {
            Ok(signal) => {
                let line = format!("{}\n", signal.as_str());
                if w.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(n)) => {
                debug!(target: "gamespace::ipc", "Watch client lagged, {} signal(s) skipped", n);
            }
            Err(RecvError::Closed) => break,
        }
    }
    debug!(target: "gamespace::ipc", "Overlay client unsubscribed");
    Ok(())
}
