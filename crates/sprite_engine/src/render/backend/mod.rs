//! Render backend
//!
//! The device abstraction, a host-memory device, global resources and the
//! render thread that owns them.

pub mod device;
pub mod headless;
pub mod global;
pub mod thread;

pub use device::{BufferDesc, BufferUsage, DeviceBufferHandle, DeviceError, DeviceStats, RenderDevice};
pub use global::GlobalRenderResources;
pub use headless::HeadlessDevice;
pub use thread::{RenderCommandList, RenderCommandQueue, RenderTask, RenderThread, RenderThreadError};
