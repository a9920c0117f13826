pub mod cmd;
pub mod config;
pub mod dumpsys;
pub mod game_mode;
pub mod registry;
