pub mod applier;
pub mod config;
pub mod ipc;
pub mod notifier;
pub mod run;
pub mod session;
pub mod source;
pub mod state;
pub mod tracker;
pub mod watcher;
