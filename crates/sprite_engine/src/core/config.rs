//! # Unified Configuration System
//!
//! Consolidates the configuration of every subsystem into one serializable
//! structure. Loadable from TOML or RON through [`Config`].
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: Logging and debug behavior
//! - **Render Thread Config**: Command queue sizing and thread naming
//! - **Billboard Config**: Feature level and pipeline precaching

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};
use crate::render::primitives::FeatureLevel;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// # Engine Configuration
///
/// Core engine behavior configuration including logging and debug features.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Render Thread Configuration
///
/// Controls the dedicated thread that owns the GPU device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderThreadConfig {
    /// OS thread name, visible in debuggers and profilers
    pub thread_name: String,
    /// Maximum number of pending render commands before `enqueue` blocks
    pub command_queue_capacity: usize,
}

impl RenderThreadConfig {
    /// Set the queue capacity
    pub fn with_command_queue_capacity(mut self, capacity: usize) -> Self {
        self.command_queue_capacity = capacity;
        self
    }
}

impl Default for RenderThreadConfig {
    fn default() -> Self {
        Self {
            thread_name: "RenderThread".to_string(),
            command_queue_capacity: 256,
        }
    }
}

/// # Billboard Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillboardConfig {
    /// Feature level materials are evaluated at
    pub feature_level: FeatureLevel,
    /// Request pipeline state precaching for used materials on load
    pub enable_pso_precaching: bool,
}

impl Default for BillboardConfig {
    fn default() -> Self {
        Self {
            feature_level: FeatureLevel::default(),
            enable_pso_precaching: true,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Render thread configuration
    pub render_thread: RenderThreadConfig,
    /// Billboard system configuration
    pub billboards: BillboardConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.engine.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}', expected one of {:?}",
                self.engine.log_level, LOG_LEVELS
            )));
        }

        if self.render_thread.thread_name.is_empty() {
            return Err(ConfigError::Validation("Render thread name cannot be empty".to_string()));
        }

        if self.render_thread.command_queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "Render command queue capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ApplicationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let mut config = ApplicationConfig::default();
        config.render_thread = config.render_thread.with_command_queue_capacity(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = ApplicationConfig::default();
        config.engine = config.engine.with_log_level("chatty");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let path = std::env::temp_dir().join(format!("sprite_engine_partial_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[billboards]\nfeature_level = \"Es31\"\nenable_pso_precaching = false\n",
        )
        .expect("write temp config");

        let config = ApplicationConfig::load_from_file(&path).expect("load config");
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.billboards.feature_level, FeatureLevel::Es31);
        assert!(!config.billboards.enable_pso_precaching);
        assert_eq!(config.render_thread.command_queue_capacity, 256);
    }

    #[test]
    fn test_ron_save_and_load() {
        let path = std::env::temp_dir().join(format!("sprite_engine_roundtrip_{}.ron", std::process::id()));
        let mut config = ApplicationConfig::default();
        config.render_thread.thread_name = "Sprites".to_string();

        config.save_to_file(&path).expect("save config");
        let loaded = ApplicationConfig::load_from_file(&path).expect("load config");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.render_thread.thread_name, "Sprites");
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ApplicationConfig::load_from_file("settings.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
