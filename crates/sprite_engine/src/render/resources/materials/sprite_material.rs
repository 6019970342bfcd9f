//! Sprite material
//!
//! A concrete [`MaterialInterface`] for billboards: a blend mode and a few
//! pass flags. Relevance is derived from those on demand.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use super::material::{MaterialId, MaterialInterface, MaterialRelevance, MaterialRenderProxy, PipelinePrecacheParams};
use crate::render::primitives::FeatureLevel;
use crate::render::resources::buffers::VertexFactoryType;

/// How a sprite material blends with the scene
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaMode {
    /// No transparency
    Opaque,
    /// Alpha testing with cutoff value
    Mask(f32),
    /// Alpha blending
    #[default]
    Blend,
    /// Additive blending
    Additive,
}

impl AlphaMode {
    /// Whether the mode draws in the translucency pass
    pub fn is_translucent(self) -> bool {
        matches!(self, Self::Blend | Self::Additive)
    }
}

/// Material used by billboard elements
#[derive(Debug)]
pub struct SpriteMaterial {
    /// Unique identifier for this material
    pub id: MaterialId,
    /// Optional name for debugging
    pub name: Option<String>,
    /// Blend mode
    pub alpha_mode: AlphaMode,
    /// Render after depth of field; ignored on mobile
    pub separate_translucency: bool,
    /// Draw on top of scene geometry
    pub disable_depth_test: bool,
    /// Write velocity from the base pass
    pub outputs_velocity: bool,
    precache_requests: AtomicU32,
    last_precache: Mutex<Option<(VertexFactoryType, PipelinePrecacheParams)>>,
}

impl SpriteMaterial {
    /// Create a material with the given blend mode and no extra flags
    pub fn new(id: MaterialId, alpha_mode: AlphaMode) -> Self {
        Self {
            id,
            name: None,
            alpha_mode,
            separate_translucency: false,
            disable_depth_test: false,
            outputs_velocity: false,
            precache_requests: AtomicU32::new(0),
            last_precache: Mutex::new(None),
        }
    }

    /// Opaque material
    pub fn opaque(id: MaterialId) -> Self {
        Self::new(id, AlphaMode::Opaque)
    }

    /// Alpha-blended material
    pub fn translucent(id: MaterialId) -> Self {
        Self::new(id, AlphaMode::Blend)
    }

    /// Set the material name for debugging
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Render in the separate translucency pass
    pub fn with_separate_translucency(mut self) -> Self {
        self.separate_translucency = true;
        self
    }

    /// Ignore scene depth
    pub fn with_depth_test_disabled(mut self) -> Self {
        self.disable_depth_test = true;
        self
    }

    /// Write velocity
    pub fn with_velocity(mut self) -> Self {
        self.outputs_velocity = true;
        self
    }

    /// Number of pipeline precache requests received
    pub fn precache_requests(&self) -> u32 {
        self.precache_requests.load(Ordering::Relaxed)
    }

    /// Parameters of the most recent precache request
    pub fn last_precache(&self) -> Option<(VertexFactoryType, PipelinePrecacheParams)> {
        *self.last_precache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MaterialInterface for SpriteMaterial {
    fn render_proxy(&self) -> MaterialRenderProxy {
        MaterialRenderProxy { material: self.id }
    }

    fn relevance(&self, feature_level: FeatureLevel) -> MaterialRelevance {
        let mut relevance = match self.alpha_mode {
            AlphaMode::Opaque => MaterialRelevance::OPAQUE,
            AlphaMode::Mask(_) => MaterialRelevance::OPAQUE | MaterialRelevance::MASKED,
            AlphaMode::Blend | AlphaMode::Additive => MaterialRelevance::TRANSLUCENCY,
        };

        if self.alpha_mode.is_translucent() {
            // Mobile has no separate translucency pass
            if self.separate_translucency && feature_level > FeatureLevel::Es31 {
                relevance |= MaterialRelevance::SEPARATE_TRANSLUCENCY;
            }
        } else if self.outputs_velocity {
            relevance |= MaterialRelevance::OUTPUTS_VELOCITY;
        }

        if self.disable_depth_test {
            relevance |= MaterialRelevance::DISABLE_DEPTH_TEST;
        }

        relevance
    }

    fn precache_pipelines(&self, vertex_factory: VertexFactoryType, params: &PipelinePrecacheParams) {
        self.precache_requests.fetch_add(1, Ordering::Relaxed);
        *self.last_precache.lock().unwrap_or_else(PoisonError::into_inner) = Some((vertex_factory, *params));
        log::debug!(
            "Precaching {:?} pipeline for material {:?} ({:?})",
            params.primitive_type,
            self.name.as_deref().unwrap_or("<unnamed>"),
            vertex_factory
        );
    }
}
