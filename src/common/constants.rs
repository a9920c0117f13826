pub const SOCKET_PATH: &str = "/dev/socket/gamespace.sock";
pub const CONFIG_DIR: &str = "/data/adb/.config/gamespace";
pub const SETTINGS_FILE: &str = "settings.toml";
pub const GAMELIST_FILE: &str = "gamelist.toml";
pub const IPC_GREETING: &str = "OK GAMESPACE IPC";
