//! # Core Engine Module
//!
//! Shared abstractions the other subsystems depend on. At the moment this is
//! the unified configuration consumed by logging, the render thread and the
//! billboard system.

pub mod config;

pub use config::{
    ApplicationConfig,
    BillboardConfig,
    EngineConfig,
    RenderThreadConfig,
};
