pub mod foreground;
pub mod power;
