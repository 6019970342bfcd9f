//! Resource management
//!
//! GPU-facing resources used by render systems: materials, vertex buffers and
//! the vertex factory that binds buffer streams to the pipeline.

pub mod buffers;
pub mod materials;
