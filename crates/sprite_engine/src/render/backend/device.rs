//! GPU device abstraction
//!
//! The render thread talks to the GPU exclusively through [`RenderDevice`].
//! Buffers are addressed by generational handles, so a stale handle is an
//! error rather than an aliasing bug.

use thiserror::Error;

slotmap::new_key_type! {
    /// Handle to a buffer living on the device
    pub struct DeviceBufferHandle;
}

/// Expected update frequency of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Written once at creation
    Static,
    /// Rewritten every frame
    Dynamic,
}

/// Creation parameters for a device buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDesc {
    /// Name shown in GPU debuggers
    pub debug_name: &'static str,
    /// Size in bytes
    pub size: u64,
    /// Update frequency
    pub usage: BufferUsage,
}

/// Device-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The handle does not name a live buffer
    #[error("Unknown device buffer: {0:?}")]
    UnknownBuffer(DeviceBufferHandle),

    /// A write would run past the end of a buffer
    #[error("Write of {len} bytes at offset {offset} overflows '{name}' ({size} bytes)")]
    OutOfBounds {
        /// Buffer debug name
        name: &'static str,
        /// Write offset
        offset: u64,
        /// Write length
        len: u64,
        /// Buffer size
        size: u64,
    },

    /// The device can no longer accept work
    #[error("Device lost: {0}")]
    DeviceLost(String),
}

/// Counters describing device activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Buffers currently alive
    pub live_buffers: usize,
    /// Buffers created since startup
    pub buffers_created: u64,
    /// Buffers released since startup
    pub buffers_released: u64,
    /// Bytes written by `write_buffer` since startup
    pub bytes_uploaded: u64,
}

/// GPU device operations used by render resources
///
/// Only the render thread holds a device, which is why the trait needs `Send`
/// but not `Sync`.
pub trait RenderDevice: Send {
    /// Allocate a vertex buffer
    fn create_vertex_buffer(&mut self, desc: &BufferDesc) -> Result<DeviceBufferHandle, DeviceError>;

    /// Copy `bytes` into a buffer starting at `offset`
    fn write_buffer(&mut self, handle: DeviceBufferHandle, offset: u64, bytes: &[u8]) -> Result<(), DeviceError>;

    /// Free a buffer
    fn release_buffer(&mut self, handle: DeviceBufferHandle) -> Result<(), DeviceError>;

    /// Size in bytes of a live buffer
    fn buffer_size(&self, handle: DeviceBufferHandle) -> Option<u64>;

    /// Read a buffer back to the CPU
    fn read_buffer(&self, handle: DeviceBufferHandle) -> Option<Vec<u8>>;

    /// Activity counters
    fn stats(&self) -> DeviceStats;
}
