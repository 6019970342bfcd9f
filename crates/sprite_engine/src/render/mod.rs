//! # Rendering System
//!
//! Render-side half of the engine: the render thread and GPU device
//! abstraction, view description primitives, GPU resources and the systems
//! that turn components into draw batches.
//!
//! ## Architecture
//!
//! - **Backend**: `RenderDevice` trait, headless device and the render thread
//!   that owns it
//! - **Primitives**: Camera, view matrices, show flags
//! - **Resources**: Materials, vertex buffers, vertex factories
//! - **Systems**: Material billboards
//!
//! ## Threading
//!
//! Game-thread code builds scene proxies and enqueues work; only closures
//! running on the render thread ever touch the device.

pub mod backend;
pub mod primitives;
pub mod resources;
pub mod systems;

pub use backend::{
    DeviceBufferHandle, DeviceError, HeadlessDevice, RenderCommandList, RenderCommandQueue, RenderDevice,
    RenderThread, RenderThreadError,
};
pub use primitives::{Camera, EngineShowFlags, FeatureLevel, SceneView, SceneViewFamily, ViewMatrices};
