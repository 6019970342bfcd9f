//! Material interface and relevance flags
//!
//! Render systems only see materials through [`MaterialInterface`]: a handle
//! to hand to mesh batches, the relevance flags that decide which passes a
//! primitive takes part in, and a hook for warming pipeline caches.

use std::sync::Arc;

use crate::render::primitives::FeatureLevel;
use crate::render::resources::buffers::VertexFactoryType;
use crate::scene::{PrimitiveType, PrimitiveViewRelevance};

/// Unique identifier for materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Render-thread handle to a material's shading data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialRenderProxy {
    /// Material this proxy renders
    pub material: MaterialId,
}

bitflags::bitflags! {
    /// Passes and features a material needs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MaterialRelevance: u32 {
        /// Drawn in the opaque base pass
        const OPAQUE = 1 << 0;
        /// Alpha tested
        const MASKED = 1 << 1;
        /// Drawn in the translucency pass
        const TRANSLUCENCY = 1 << 2;
        /// Drawn after depth of field in the separate translucency pass
        const SEPARATE_TRANSLUCENCY = 1 << 3;
        /// Ignores the scene depth buffer
        const DISABLE_DEPTH_TEST = 1 << 4;
        /// Writes per-pixel velocity
        const OUTPUTS_VELOCITY = 1 << 5;
        /// Refracts what is behind it
        const DISTORTION = 1 << 6;
    }
}

impl MaterialRelevance {
    /// Copy the pass flags into a view relevance
    pub fn set_primitive_view_relevance(self, relevance: &mut PrimitiveViewRelevance) {
        relevance.opaque = self.contains(Self::OPAQUE);
        relevance.masked = self.contains(Self::MASKED);
        relevance.translucency = self.contains(Self::TRANSLUCENCY);
        relevance.separate_translucency = self.contains(Self::SEPARATE_TRANSLUCENCY);
        relevance.distortion = self.contains(Self::DISTORTION);
        relevance.outputs_velocity = self.contains(Self::OUTPUTS_VELOCITY);
    }
}

/// Pipeline state a primitive will draw a material with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelinePrecacheParams {
    /// Topology
    pub primitive_type: PrimitiveType,
    /// Whether both faces are rasterized
    pub disable_backface_culling: bool,
    /// Feature level the pipeline targets
    pub feature_level: FeatureLevel,
}

/// A shaded surface description
pub trait MaterialInterface: Send + Sync + std::fmt::Debug {
    /// Handle recorded in mesh batches
    fn render_proxy(&self) -> MaterialRenderProxy;

    /// Relevance when rendered at `feature_level`
    fn relevance(&self, feature_level: FeatureLevel) -> MaterialRelevance;

    /// Request compilation of the pipelines this material will need.
    ///
    /// Materials without a pipeline cache ignore the request.
    fn precache_pipelines(&self, vertex_factory: VertexFactoryType, params: &PipelinePrecacheParams) {
        let _ = (vertex_factory, params);
    }
}

/// Shared material reference
pub type MaterialRef = Arc<dyn MaterialInterface>;
