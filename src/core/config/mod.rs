pub mod gamelist;
pub mod path;
pub mod settings;

pub use path::*;
