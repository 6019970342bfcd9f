//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Linear and packed colors
//! - Logging utilities

pub mod math;
pub mod color;
pub mod logging;
