//! VR locomotion bridge library
//! Polls VR controller actions and translates them into `move` / `snapturn` commands.

// Module declarations
pub mod config;
pub mod core;
pub mod logging;
pub mod mapping;
pub mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
