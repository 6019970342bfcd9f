//! Material system
//!
//! The material interface billboards draw with, the relevance flags a material
//! contributes to a primitive, and a concrete sprite material.

pub mod material;
pub mod sprite_material;

pub use material::{
    MaterialId, MaterialInterface, MaterialRef, MaterialRelevance, MaterialRenderProxy, PipelinePrecacheParams,
};
pub use sprite_material::{AlphaMode, SpriteMaterial};
