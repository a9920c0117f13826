use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "gamespacectl")]
#[command(version, about = "Gamespace daemon control CLI")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[arg(short, long, global = true)]
    pub socket: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    Status,
    Enable,
    Disable,
    Reload,

    /// Register a game, optionally with its preferred mode
    AddGame {
        package: String,
        #[arg(value_enum)]
        mode: Option<GameMode>,
    },

    RemoveGame {
        package: String,
    },

    /// Change the preferred mode of a registered game
    SetMode {
        package: String,
        #[arg(value_enum)]
        mode: GameMode,
    },

    ListGames,

    SetLog {
        #[arg(value_enum)]
        level: LogLevel,
    },

    /// Pretend `package` is in the foreground
    Inject {
        package: String,
    },
    ClearInject,

    /// Force the next foreground event to be re-evaluated
    Reset,

    /// Stream session start/leave signals until interrupted
    Watch,

    Ping,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GameMode {
    Standard,
    Performance,
    Battery,
    Custom,
}

impl GameMode {
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Performance => "PERFORMANCE",
            Self::Battery => "BATTERY",
            Self::Custom => "CUSTOM",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_game_with_optional_mode() {
        let cli = Cli::try_parse_from(["gamespacectl", "add-game", "com.a.game", "battery"]).unwrap();
        match cli.command {
            Commands::AddGame { package, mode } => {
                assert_eq!(package, "com.a.game");
                assert_eq!(mode.map(|m| m.to_upper_str()), Some("BATTERY"));
            }
            _ => panic!("expected add-game"),
        }

        let cli = Cli::try_parse_from(["gamespacectl", "-s", "/tmp/x.sock", "add-game", "com.a.game"]).unwrap();
        assert_eq!(cli.socket.as_deref(), Some("/tmp/x.sock"));
        assert!(matches!(cli.command, Commands::AddGame { mode: None, .. }));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["gamespacectl", "set-mode", "com.a.game", "turbo"]).is_err());
    }
}
