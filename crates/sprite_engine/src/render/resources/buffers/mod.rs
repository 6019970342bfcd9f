//! Vertex buffers and vertex factories
//!
//! CPU-side vertex arrays, the device buffers they are uploaded into, and the
//! stream layout a draw binds.

pub mod vertex;
pub mod vertex_buffers;
pub mod vertex_factory;

pub use vertex::{MaterialSpriteVertex, PackedNormal, PackedTangentBasis};
pub use vertex_buffers::{StaticMeshVertexBuffers, StaticMeshVertexData};
pub use vertex_factory::{
    LocalVertexFactory, LocalVertexFactoryData, SharedVertexFactory, VertexElementFormat, VertexFactoryType,
    VertexStreamComponent,
};
