//! Local vertex factory
//!
//! Describes which device buffer feeds each vertex attribute, and at what
//! offset and stride. The factory is rebound whenever the underlying buffers
//! are recreated; streams without a buffer read from the global placeholder
//! with a zero stride.

use std::sync::{Arc, RwLock};

use crate::render::backend::{DeviceBufferHandle, GlobalRenderResources};

/// Vertex factory families known to pipeline precaching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFactoryType {
    /// Per-vertex streams in local space transformed by the primitive's local-to-world
    Local,
}

/// Attribute formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexElementFormat {
    /// Two floats
    Float2,
    /// Three floats
    Float3,
    /// Four unsigned-normalized bytes holding a signed direction
    PackedNormal,
    /// Four unsigned-normalized bytes holding BGRA color
    Color,
}

/// One attribute stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexStreamComponent {
    /// Source buffer, or `None` before the buffer exists
    pub buffer: Option<DeviceBufferHandle>,
    /// Byte offset of the attribute within a vertex
    pub offset: u32,
    /// Bytes between consecutive vertices; zero repeats the first vertex
    pub stride: u32,
    /// Attribute format
    pub format: VertexElementFormat,
}

impl VertexStreamComponent {
    /// Create a stream component
    pub const fn new(buffer: Option<DeviceBufferHandle>, offset: u32, stride: u32, format: VertexElementFormat) -> Self {
        Self { buffer, offset, stride, format }
    }

    /// Stream with no buffer
    pub const fn unbound(format: VertexElementFormat) -> Self {
        Self::new(None, 0, 0, format)
    }

    fn resolve(self, fallback: DeviceBufferHandle) -> Self {
        match self.buffer {
            Some(_) => self,
            None => Self::new(Some(fallback), 0, 0, self.format),
        }
    }
}

/// Stream layout of a [`LocalVertexFactory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVertexFactoryData {
    /// Positions
    pub position: VertexStreamComponent,
    /// Tangents
    pub tangent_x: VertexStreamComponent,
    /// Normals with basis sign
    pub tangent_z: VertexStreamComponent,
    /// First texture coordinate channel
    pub tex_coord: VertexStreamComponent,
    /// Lightmap coordinates
    pub light_map_coord: VertexStreamComponent,
    /// Vertex colors
    pub color: VertexStreamComponent,
}

impl Default for LocalVertexFactoryData {
    fn default() -> Self {
        Self {
            position: VertexStreamComponent::unbound(VertexElementFormat::Float3),
            tangent_x: VertexStreamComponent::unbound(VertexElementFormat::PackedNormal),
            tangent_z: VertexStreamComponent::unbound(VertexElementFormat::PackedNormal),
            tex_coord: VertexStreamComponent::unbound(VertexElementFormat::Float2),
            light_map_coord: VertexStreamComponent::unbound(VertexElementFormat::Float2),
            color: VertexStreamComponent::unbound(VertexElementFormat::Color),
        }
    }
}

impl LocalVertexFactoryData {
    fn resolve(self, fallback: DeviceBufferHandle) -> Self {
        Self {
            position: self.position.resolve(fallback),
            tangent_x: self.tangent_x.resolve(fallback),
            tangent_z: self.tangent_z.resolve(fallback),
            tex_coord: self.tex_coord.resolve(fallback),
            light_map_coord: self.light_map_coord.resolve(fallback),
            color: self.color.resolve(fallback),
        }
    }
}

/// Vertex factory shared between a proxy, its mesh batches and render commands
pub type SharedVertexFactory = Arc<RwLock<LocalVertexFactory>>;

/// Binding descriptor connecting vertex buffers to the pipeline
#[derive(Debug)]
pub struct LocalVertexFactory {
    debug_name: &'static str,
    data: LocalVertexFactoryData,
    bound: Option<LocalVertexFactoryData>,
}

impl LocalVertexFactory {
    /// Create an uninitialized factory
    pub fn new(debug_name: &'static str) -> Self {
        Self {
            debug_name,
            data: LocalVertexFactoryData::default(),
            bound: None,
        }
    }

    /// Wrap in the shared handle used by mesh batches
    pub fn into_shared(self) -> SharedVertexFactory {
        Arc::new(RwLock::new(self))
    }

    /// Replace the stream layout; takes effect on the next init or update
    pub fn set_data(&mut self, data: LocalVertexFactoryData) {
        self.data = data;
    }

    /// Stream layout as last set
    pub fn data(&self) -> &LocalVertexFactoryData {
        &self.data
    }

    /// Bind the streams for drawing
    pub fn init_resource(&mut self, globals: &GlobalRenderResources) {
        self.bound = Some(self.data.resolve(globals.dummy_vertex_buffer()));
        log::debug!("Vertex factory '{}' initialized", self.debug_name);
    }

    /// Rebind after the underlying buffers changed
    pub fn update_resource(&mut self, globals: &GlobalRenderResources) {
        self.bound = Some(self.data.resolve(globals.dummy_vertex_buffer()));
        log::trace!("Vertex factory '{}' rebound", self.debug_name);
    }

    /// Drop the binding
    pub fn release_resource(&mut self) {
        if self.bound.take().is_some() {
            log::debug!("Vertex factory '{}' released", self.debug_name);
        }
    }

    /// Whether the factory is bound
    pub fn is_initialized(&self) -> bool {
        self.bound.is_some()
    }

    /// Resolved streams a draw reads from
    pub fn streams(&self) -> Option<&LocalVertexFactoryData> {
        self.bound.as_ref()
    }

    /// Debug name
    pub fn debug_name(&self) -> &'static str {
        self.debug_name
    }
}
