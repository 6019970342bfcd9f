//! CPU-memory device
//!
//! Implements [`RenderDevice`] on plain byte vectors. Used by tools, the demo
//! and tests, where there is no GPU but resource lifetimes and uploaded bytes
//! still need to be observable.

use slotmap::SlotMap;

use super::device::{BufferDesc, DeviceBufferHandle, DeviceError, DeviceStats, RenderDevice};

#[derive(Debug)]
struct HeadlessBuffer {
    desc: BufferDesc,
    bytes: Vec<u8>,
}

/// Device that keeps every buffer in host memory
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    buffers: SlotMap<DeviceBufferHandle, HeadlessBuffer>,
    stats: DeviceStats,
}

impl HeadlessDevice {
    /// Create an empty device
    pub fn new() -> Self {
        Self::default()
    }

    /// Debug name of a live buffer
    pub fn buffer_name(&self, handle: DeviceBufferHandle) -> Option<&'static str> {
        self.buffers.get(handle).map(|buffer| buffer.desc.debug_name)
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_vertex_buffer(&mut self, desc: &BufferDesc) -> Result<DeviceBufferHandle, DeviceError> {
        let len = usize::try_from(desc.size)
            .map_err(|_| DeviceError::DeviceLost(format!("buffer '{}' too large for host memory", desc.debug_name)))?;

        let handle = self.buffers.insert(HeadlessBuffer {
            desc: desc.clone(),
            bytes: vec![0; len],
        });
        self.stats.buffers_created += 1;
        self.stats.live_buffers = self.buffers.len();

        log::trace!("Created device buffer '{}' ({} bytes) as {:?}", desc.debug_name, desc.size, handle);
        Ok(handle)
    }

    fn write_buffer(&mut self, handle: DeviceBufferHandle, offset: u64, bytes: &[u8]) -> Result<(), DeviceError> {
        let buffer = self.buffers.get_mut(handle).ok_or(DeviceError::UnknownBuffer(handle))?;

        let len = bytes.len() as u64;
        let out_of_bounds = DeviceError::OutOfBounds {
            name: buffer.desc.debug_name,
            offset,
            len,
            size: buffer.desc.size,
        };
        let end = offset.checked_add(len).ok_or_else(|| out_of_bounds.clone())?;
        if end > buffer.desc.size {
            return Err(out_of_bounds);
        }

        // Both bounds were checked against desc.size, which fit in usize at creation
        let start = usize::try_from(offset).map_err(|_| out_of_bounds.clone())?;
        let end = usize::try_from(end).map_err(|_| out_of_bounds)?;
        buffer.bytes[start..end].copy_from_slice(bytes);

        self.stats.bytes_uploaded += len;
        Ok(())
    }

    fn release_buffer(&mut self, handle: DeviceBufferHandle) -> Result<(), DeviceError> {
        let buffer = self.buffers.remove(handle).ok_or(DeviceError::UnknownBuffer(handle))?;
        self.stats.buffers_released += 1;
        self.stats.live_buffers = self.buffers.len();

        log::trace!("Released device buffer '{}'", buffer.desc.debug_name);
        Ok(())
    }

    fn buffer_size(&self, handle: DeviceBufferHandle) -> Option<u64> {
        self.buffers.get(handle).map(|buffer| buffer.desc.size)
    }

    fn read_buffer(&self, handle: DeviceBufferHandle) -> Option<Vec<u8>> {
        self.buffers.get(handle).map(|buffer| buffer.bytes.clone())
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::device::BufferUsage;

    fn desc(size: u64) -> BufferDesc {
        BufferDesc {
            debug_name: "TestBuffer",
            size,
            usage: BufferUsage::Dynamic,
        }
    }

    #[test]
    fn test_write_and_read_back() {
        let mut device = HeadlessDevice::new();
        let handle = device.create_vertex_buffer(&desc(8)).expect("create");

        device.write_buffer(handle, 4, &[1, 2, 3, 4]).expect("write");

        assert_eq!(device.read_buffer(handle), Some(vec![0, 0, 0, 0, 1, 2, 3, 4]));
        assert_eq!(device.stats().bytes_uploaded, 4);
    }

    #[test]
    fn test_overflowing_write_rejected() {
        let mut device = HeadlessDevice::new();
        let handle = device.create_vertex_buffer(&desc(4)).expect("create");

        let result = device.write_buffer(handle, 2, &[0; 4]);
        assert!(matches!(result, Err(DeviceError::OutOfBounds { .. })));
    }

    #[test]
    fn test_released_handle_is_stale() {
        let mut device = HeadlessDevice::new();
        let handle = device.create_vertex_buffer(&desc(4)).expect("create");
        device.release_buffer(handle).expect("release");

        assert_eq!(device.release_buffer(handle), Err(DeviceError::UnknownBuffer(handle)));
        assert_eq!(device.stats().live_buffers, 0);
        assert_eq!(device.stats().buffers_released, 1);
    }
}
