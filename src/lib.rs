pub mod config;
pub mod logging;
pub mod monitor;
pub mod state;
pub mod version;
