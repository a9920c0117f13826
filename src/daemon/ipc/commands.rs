use crate::common::{GameMode, LogLevel};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Enable,
    Disable,
    Reload,
    SetLog(LogLevel),
    Inject(String),
    ClearInject,
    Reset,
    Ping,
    Quit,
    AddGame(String, Option<GameMode>),
    RemoveGame(String),
    SetMode(String, GameMode),
    GetGameList,
    Watch,
}

impl FromStr for Command {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            ["HELP"] | ["?"] => Ok(Command::Help),
            ["STATUS"] => Ok(Command::Status),
            ["ENABLE"] => Ok(Command::Enable),
            ["DISABLE"] => Ok(Command::Disable),
            ["RELOAD"] => Ok(Command::Reload),
            ["PING"] => Ok(Command::Ping),
            ["QUIT"] => Ok(Command::Quit),
            ["RESET"] => Ok(Command::Reset),
            ["WATCH"] => Ok(Command::Watch),
            ["GET_GAMELIST"] | ["GETGAMELIST"] => Ok(Command::GetGameList),

            ["SETLOG", level] | ["SET_LOG", level] => level.parse().map(Command::SetLog),

            ["INJECT", pkg] => Ok(Command::Inject(pkg.to_string())),
            ["CLEAR_INJECT"] | ["CLEARINJECT"] => Ok(Command::ClearInject),

            ["ADD_GAME", pkg] | ["ADDGAME", pkg] => Ok(Command::AddGame(pkg.to_string(), None)),
            ["ADD_GAME", pkg, mode] | ["ADDGAME", pkg, mode] => mode
                .parse()
                .map(|m| Command::AddGame(pkg.to_string(), Some(m)))
                .map_err(|_| "usage: ADD_GAME <pkg> [STANDARD|PERFORMANCE|BATTERY|CUSTOM]"),
            ["REMOVE_GAME", pkg] | ["REMOVEGAME", pkg] => Ok(Command::RemoveGame(pkg.to_string())),
            ["SET_MODE", pkg, mode] | ["SETMODE", pkg, mode] => mode
                .parse()
                .map(|m| Command::SetMode(pkg.to_string(), m))
                .map_err(|_| "usage: SET_MODE <pkg> <STANDARD|PERFORMANCE|BATTERY|CUSTOM>"),

            _ => Err("unknown command (try HELP)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_game_editing_commands() {
        assert_eq!(
            "ADD_GAME com.a.game".parse(),
            Ok(Command::AddGame("com.a.game".into(), None))
        );
        assert_eq!(
            "ADDGAME com.a.game battery".parse(),
            Ok(Command::AddGame("com.a.game".into(), Some(GameMode::Battery)))
        );
        assert_eq!(
            "SET_MODE com.a.game 1".parse(),
            Ok(Command::SetMode("com.a.game".into(), GameMode::Standard))
        );
        assert!("SET_MODE com.a.game turbo".parse::<Command>().is_err());
        assert!("SET_MODE com.a.game".parse::<Command>().is_err());
    }

    #[test]
    fn parses_control_commands() {
        assert_eq!("  STATUS ".parse(), Ok(Command::Status));
        assert_eq!("?".parse(), Ok(Command::Help));
        assert_eq!("SETLOG debug".parse(), Ok(Command::SetLog(LogLevel::Debug)));
        assert_eq!("RESET".parse(), Ok(Command::Reset));
        assert_eq!("WATCH".parse(), Ok(Command::Watch));
        assert!("SETLOG loud".parse::<Command>().is_err());
        assert!("status".parse::<Command>().is_err());
    }
}
