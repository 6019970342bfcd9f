//! Render-thread-owned global resources
//!
//! Resources shared by every proxy are created when the render thread starts
//! and released when it shuts down, so their lifetime is exactly the lifetime
//! of the device that owns them.

use super::device::{BufferDesc, BufferUsage, DeviceBufferHandle, DeviceError, RenderDevice};
use crate::render::resources::buffers::MaterialSpriteVertex;

/// Resources available to every render command
#[derive(Debug)]
pub struct GlobalRenderResources {
    dummy_vertex_buffer: DeviceBufferHandle,
}

impl GlobalRenderResources {
    /// Create the global resources on `device`
    pub fn init(device: &mut dyn RenderDevice) -> Result<Self, DeviceError> {
        let dummy_vertex_buffer = device.create_vertex_buffer(&BufferDesc {
            debug_name: "DummyMaterialSpriteVertexBuffer",
            size: std::mem::size_of::<MaterialSpriteVertex>() as u64,
            usage: BufferUsage::Static,
        })?;

        log::debug!("Global render resources initialized");
        Ok(Self { dummy_vertex_buffer })
    }

    /// One-vertex placeholder bound to vertex streams that have no buffer of their own
    pub fn dummy_vertex_buffer(&self) -> DeviceBufferHandle {
        self.dummy_vertex_buffer
    }

    /// Release the global resources
    pub fn release(self, device: &mut dyn RenderDevice) -> Result<(), DeviceError> {
        device.release_buffer(self.dummy_vertex_buffer)?;
        log::debug!("Global render resources released");
        Ok(())
    }
}
