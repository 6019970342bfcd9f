//! Static mesh vertex buffers
//!
//! Vertex data lives in four separate streams (position, tangent, texture
//! coordinate, color). `StaticMeshVertexData` is the CPU copy that callers
//! fill by vertex index; `StaticMeshVertexBuffers` owns that copy together
//! with the device buffers it is uploaded into, and must only be touched from
//! render commands once it has been handed to the render thread.

use crate::foundation::color::Color;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::backend::{BufferDesc, BufferUsage, DeviceBufferHandle, DeviceError, RenderDevice};

use super::vertex::{MaterialSpriteVertex, PackedTangentBasis};
use super::vertex_factory::{LocalVertexFactoryData, VertexElementFormat, VertexStreamComponent};

const POSITION_STRIDE: u32 = std::mem::size_of::<[f32; 3]>() as u32;
const TANGENT_STRIDE: u32 = std::mem::size_of::<PackedTangentBasis>() as u32;
const TEX_COORD_STRIDE: u32 = std::mem::size_of::<[f32; 2]>() as u32;
const COLOR_STRIDE: u32 = std::mem::size_of::<Color>() as u32;

/// CPU-side vertex streams
///
/// Writes past the current vertex count are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticMeshVertexData {
    positions: Vec<[f32; 3]>,
    tangents: Vec<PackedTangentBasis>,
    tex_coords: Vec<[f32; 2]>,
    colors: Vec<Color>,
}

impl StaticMeshVertexData {
    /// Empty streams
    pub fn new() -> Self {
        Self::default()
    }

    /// Streams holding `num_vertices` zeroed vertices
    pub fn with_vertices(num_vertices: usize) -> Self {
        let mut data = Self::new();
        data.init(num_vertices);
        data
    }

    /// Resize to `num_vertices` zeroed vertices, discarding previous contents
    pub fn init(&mut self, num_vertices: usize) {
        self.positions.clear();
        self.positions.resize(num_vertices, [0.0; 3]);
        self.tangents.clear();
        self.tangents.resize(num_vertices, PackedTangentBasis::default());
        self.tex_coords.clear();
        self.tex_coords.resize(num_vertices, [0.0; 2]);
        self.colors.clear();
        self.colors.resize(num_vertices, Color::default());
    }

    /// Number of vertices
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Set a vertex position
    pub fn set_position(&mut self, index: usize, position: &Vec3) {
        if let Some(slot) = self.positions.get_mut(index) {
            *slot = [position.x, position.y, position.z];
        }
    }

    /// Pack and set a vertex tangent frame
    pub fn set_tangents(&mut self, index: usize, tangent_x: &Vec3, tangent_y: &Vec3, tangent_z: &Vec3) {
        if let Some(slot) = self.tangents.get_mut(index) {
            *slot = PackedTangentBasis::from_basis(tangent_x, tangent_y, tangent_z);
        }
    }

    /// Set the texture coordinate of a vertex
    pub fn set_tex_coord(&mut self, index: usize, uv: &Vec2) {
        if let Some(slot) = self.tex_coords.get_mut(index) {
            *slot = [uv.x, uv.y];
        }
    }

    /// Set a vertex color
    pub fn set_color(&mut self, index: usize, color: Color) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = color;
        }
    }

    /// Position of a vertex
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).map(|p| Vec3::new(p[0], p[1], p[2]))
    }

    /// Packed tangent frame of a vertex
    pub fn tangents(&self, index: usize) -> Option<PackedTangentBasis> {
        self.tangents.get(index).copied()
    }

    /// Texture coordinate of a vertex
    pub fn tex_coord(&self, index: usize) -> Option<Vec2> {
        self.tex_coords.get(index).map(|uv| Vec2::new(uv[0], uv[1]))
    }

    /// Color of a vertex
    pub fn color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// All streams of one vertex, interleaved
    pub fn vertex(&self, index: usize) -> Option<MaterialSpriteVertex> {
        let tangents = self.tangents.get(index)?;
        Some(MaterialSpriteVertex {
            position: *self.positions.get(index)?,
            tangent_x: tangents.tangent_x,
            tangent_z: tangents.tangent_z,
            color: *self.colors.get(index)?,
            tex_coords: *self.tex_coords.get(index)?,
        })
    }

    fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    fn tangent_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tangents)
    }

    fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }

    fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// One device buffer mirroring a CPU stream
#[derive(Debug)]
struct DeviceVertexBuffer {
    debug_name: &'static str,
    handle: Option<DeviceBufferHandle>,
    size: u64,
}

impl DeviceVertexBuffer {
    const fn new(debug_name: &'static str) -> Self {
        Self { debug_name, handle: None, size: 0 }
    }

    /// Upload `bytes`, recreating the buffer when its size changes
    fn upload(&mut self, device: &mut dyn RenderDevice, bytes: &[u8]) -> Result<(), DeviceError> {
        let size = bytes.len() as u64;
        if size == 0 {
            return self.release(device);
        }

        let handle = match self.handle {
            Some(handle) if self.size == size => handle,
            _ => {
                self.release(device)?;
                let handle = device.create_vertex_buffer(&BufferDesc {
                    debug_name: self.debug_name,
                    size,
                    usage: BufferUsage::Dynamic,
                })?;
                self.handle = Some(handle);
                self.size = size;
                handle
            }
        };

        device.write_buffer(handle, 0, bytes)
    }

    fn release(&mut self, device: &mut dyn RenderDevice) -> Result<(), DeviceError> {
        self.size = 0;
        match self.handle.take() {
            Some(handle) => device.release_buffer(handle),
            None => Ok(()),
        }
    }
}

/// CPU vertex streams plus the device buffers they upload into
#[derive(Debug)]
pub struct StaticMeshVertexBuffers {
    data: StaticMeshVertexData,
    positions: DeviceVertexBuffer,
    tangents: DeviceVertexBuffer,
    tex_coords: DeviceVertexBuffer,
    colors: DeviceVertexBuffer,
}

impl Default for StaticMeshVertexBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticMeshVertexBuffers {
    /// Buffers with no vertices and no device resources
    pub fn new() -> Self {
        Self {
            data: StaticMeshVertexData::new(),
            positions: DeviceVertexBuffer::new("PositionVertexBuffer"),
            tangents: DeviceVertexBuffer::new("TangentVertexBuffer"),
            tex_coords: DeviceVertexBuffer::new("TexCoordVertexBuffer"),
            colors: DeviceVertexBuffer::new("ColorVertexBuffer"),
        }
    }

    /// Resize the CPU streams to `num_vertices` zeroed vertices
    pub fn init(&mut self, num_vertices: usize) {
        self.data.init(num_vertices);
    }

    /// Replace the CPU streams wholesale
    pub fn assign(&mut self, data: StaticMeshVertexData) {
        self.data = data;
    }

    /// CPU streams
    pub fn data(&self) -> &StaticMeshVertexData {
        &self.data
    }

    /// Mutable CPU streams
    pub fn data_mut(&mut self) -> &mut StaticMeshVertexData {
        &mut self.data
    }

    /// Create the device buffers and upload the current contents
    pub fn init_resources(&mut self, device: &mut dyn RenderDevice) -> Result<(), DeviceError> {
        self.update_resources(device)
    }

    /// Upload the CPU streams, recreating device buffers whose size changed
    pub fn update_resources(&mut self, device: &mut dyn RenderDevice) -> Result<(), DeviceError> {
        self.positions.upload(device, self.data.position_bytes())?;
        self.tangents.upload(device, self.data.tangent_bytes())?;
        self.tex_coords.upload(device, self.data.tex_coord_bytes())?;
        self.colors.upload(device, self.data.color_bytes())?;
        Ok(())
    }

    /// Free every device buffer; all four are attempted even if one fails
    pub fn release_resources(&mut self, device: &mut dyn RenderDevice) -> Result<(), DeviceError> {
        let results = [
            self.positions.release(device),
            self.tangents.release(device),
            self.tex_coords.release(device),
            self.colors.release(device),
        ];
        results.into_iter().collect()
    }

    /// Whether every stream has a device buffer
    pub fn is_initialized(&self) -> bool {
        [&self.positions, &self.tangents, &self.tex_coords, &self.colors]
            .iter()
            .all(|buffer| buffer.handle.is_some())
    }

    /// Device buffer handles in stream order: position, tangent, texcoord, color
    pub fn buffer_handles(&self) -> [Option<DeviceBufferHandle>; 4] {
        [self.positions.handle, self.tangents.handle, self.tex_coords.handle, self.colors.handle]
    }

    /// Vertex factory stream layout over the current device buffers
    ///
    /// Texture coordinates double as lightmap coordinates.
    pub fn bind_streams(&self) -> LocalVertexFactoryData {
        LocalVertexFactoryData {
            position: VertexStreamComponent::new(self.positions.handle, 0, POSITION_STRIDE, VertexElementFormat::Float3),
            tangent_x: VertexStreamComponent::new(
                self.tangents.handle,
                0,
                TANGENT_STRIDE,
                VertexElementFormat::PackedNormal,
            ),
            tangent_z: VertexStreamComponent::new(
                self.tangents.handle,
                std::mem::size_of::<super::vertex::PackedNormal>() as u32,
                TANGENT_STRIDE,
                VertexElementFormat::PackedNormal,
            ),
            tex_coord: VertexStreamComponent::new(self.tex_coords.handle, 0, TEX_COORD_STRIDE, VertexElementFormat::Float2),
            light_map_coord: VertexStreamComponent::new(
                self.tex_coords.handle,
                0,
                TEX_COORD_STRIDE,
                VertexElementFormat::Float2,
            ),
            color: VertexStreamComponent::new(self.colors.handle, 0, COLOR_STRIDE, VertexElementFormat::Color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::HeadlessDevice;

    #[test]
    fn test_init_discards_previous_contents() {
        let mut data = StaticMeshVertexData::with_vertices(2);
        data.set_position(1, &Vec3::new(1.0, 2.0, 3.0));
        data.init(4);

        assert_eq!(data.num_vertices(), 4);
        assert_eq!(data.position(1), Some(Vec3::zeros()));
    }

    #[test]
    fn test_out_of_range_writes_are_ignored() {
        let mut data = StaticMeshVertexData::with_vertices(1);
        data.set_color(5, Color::WHITE);
        assert_eq!(data.color(5), None);
        assert_eq!(data.color(0), Some(Color::default()));
    }

    #[test]
    fn test_upload_recreates_buffers_only_on_resize() {
        let mut device = HeadlessDevice::new();
        let mut buffers = StaticMeshVertexBuffers::new();
        buffers.init(1);
        buffers.init_resources(&mut device).expect("init");
        assert!(buffers.is_initialized());
        assert_eq!(device.stats().buffers_created, 4);

        buffers.data_mut().set_position(0, &Vec3::new(1.0, 0.0, 0.0));
        buffers.update_resources(&mut device).expect("same size");
        assert_eq!(device.stats().buffers_created, 4);

        buffers.init(8);
        buffers.update_resources(&mut device).expect("resize");
        assert_eq!(device.stats().buffers_created, 8);
        assert_eq!(device.stats().live_buffers, 4);

        let [position, ..] = buffers.buffer_handles();
        let position = position.expect("position buffer");
        assert_eq!(device.buffer_size(position), Some(8 * 12));

        buffers.release_resources(&mut device).expect("release");
        assert_eq!(device.stats().live_buffers, 0);
    }

    #[test]
    fn test_tangent_streams_share_one_buffer() {
        let mut device = HeadlessDevice::new();
        let mut buffers = StaticMeshVertexBuffers::new();
        buffers.init(1);
        buffers.init_resources(&mut device).expect("init");

        let streams = buffers.bind_streams();
        assert_eq!(streams.tangent_x.buffer, streams.tangent_z.buffer);
        assert_eq!((streams.tangent_x.offset, streams.tangent_z.offset), (0, 4));
        assert_eq!(streams.tangent_x.stride, 8);
        assert_eq!(streams.light_map_coord.buffer, streams.tex_coord.buffer);
    }
}
