//! Material billboard system
//!
//! Camera-facing quads drawn with arbitrary materials. A component holds an
//! ordered list of elements; each render-state update snapshots them into a
//! scene proxy, which regenerates camera-facing geometry for every visible
//! view each frame and uploads it through the render thread.

pub mod types;
pub mod geometry;
pub mod proxy;
pub mod component;

#[cfg(test)]
mod tests;

pub use types::MaterialSpriteElement;
pub use geometry::{generate_sprite_geometry, sprite_write_offset, write_sprite_vertices, SpriteGeometry, SpriteViewBasis};
pub use proxy::MaterialSpriteSceneProxy;
pub use component::MaterialBillboardComponent;
