//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use crate::core::config::EngineConfig;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with an explicit filter string (e.g. `"info"` or `"sprite_engine=trace"`)
///
/// Returns an error if a global logger was already installed.
pub fn init_with_level(filter: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .parse_filters(filter)
        .format_timestamp_millis()
        .try_init()
}

/// Initialize the logging system from engine configuration
///
/// `RUST_LOG` still wins when it is set, so a developer can raise verbosity
/// without touching config files.
pub fn init_from_config(config: &EngineConfig) -> Result<(), log::SetLoggerError> {
    match std::env::var("RUST_LOG") {
        Ok(filter) if !filter.is_empty() => init_with_level(&filter),
        _ => init_with_level(&config.log_level),
    }
}
