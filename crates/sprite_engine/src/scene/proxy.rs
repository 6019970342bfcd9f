//! Scene proxy interfaces
//!
//! A scene proxy is the render-side snapshot of a component. Its generic half
//! (transform, visibility, shadow and velocity bookkeeping) is shared by every
//! primitive type and lives behind [`SceneProxyBase`]; the per-type half
//! implements [`SceneProxy`].

use crate::foundation::math::{Mat4, Mat4Ext, Transform};
use crate::render::backend::RenderCommandQueue;
use crate::render::primitives::{EngineShowFlags, FeatureLevel, SceneView};

use super::mesh_batch::{DepthPriorityGroup, MeshElementCollector};
use super::relevance::PrimitiveViewRelevance;

/// Capabilities every primitive's scene proxy provides
pub trait SceneProxyBase: Send + Sync + std::fmt::Debug {
    /// Local-to-world matrix captured when the proxy was created
    fn local_to_world(&self) -> &Mat4;

    /// Whether the local-to-world matrix mirrors geometry
    fn is_local_to_world_determinant_negative(&self) -> bool;

    /// Whether the primitive is visible in `view`
    fn is_shown(&self, view: &SceneView) -> bool;

    /// Whether the primitive casts shadows in `view`
    fn is_shadow_cast(&self, view: &SceneView) -> bool;

    /// Depth layer in `view`
    fn depth_priority_group(&self, view: &SceneView) -> DepthPriorityGroup;

    /// Whether the primitive can move and so writes velocity
    fn draws_velocity(&self) -> bool;

    /// Whether the primitive is drawn in the main pass
    fn should_render_in_main_pass(&self) -> bool;

    /// Whether the primitive is selected in an editor
    fn is_selected(&self) -> bool;

    /// Heap bytes owned by the base
    fn allocated_size(&self) -> usize {
        0
    }
}

/// A renderable primitive as seen by the renderer
pub trait SceneProxy: Send + Sync {
    /// Append this frame's mesh batches for every view whose bit is set in `visibility_map`
    fn get_dynamic_mesh_elements(&self, views: &[SceneView], visibility_map: u32, collector: &mut MeshElementCollector);

    /// Passes of `view` the primitive takes part in
    fn get_view_relevance(&self, view: &SceneView) -> PrimitiveViewRelevance;

    /// Whether occlusion queries may cull the primitive
    fn can_be_occluded(&self) -> bool {
        true
    }

    /// Bytes used by the proxy, including heap allocations
    fn memory_footprint(&self) -> usize;
}

/// Primitive state copied into a new proxy
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSettings {
    /// World transform
    pub transform: Transform,
    /// Visible in game views
    pub visible: bool,
    /// Casts dynamic shadows
    pub cast_shadow: bool,
    /// Depth layer
    pub depth_priority_group: DepthPriorityGroup,
    /// Selected in an editor
    pub selected: bool,
    /// Drawn in the main pass
    pub render_in_main_pass: bool,
    /// Can move between frames
    pub movable: bool,
}

impl Default for PrimitiveSettings {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            visible: true,
            cast_shadow: false,
            depth_priority_group: DepthPriorityGroup::World,
            selected: false,
            render_in_main_pass: true,
            movable: true,
        }
    }
}

/// Default [`SceneProxyBase`] built from [`PrimitiveSettings`]
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSceneProxyData {
    local_to_world: Mat4,
    determinant_negative: bool,
    visible: bool,
    cast_shadow: bool,
    depth_priority_group: DepthPriorityGroup,
    selected: bool,
    render_in_main_pass: bool,
    movable: bool,
}

impl PrimitiveSceneProxyData {
    /// Capture `settings`
    pub fn from_settings(settings: &PrimitiveSettings) -> Self {
        let local_to_world = settings.transform.to_matrix();
        Self {
            determinant_negative: local_to_world.basis_determinant() < 0.0,
            local_to_world,
            visible: settings.visible,
            cast_shadow: settings.cast_shadow,
            depth_priority_group: settings.depth_priority_group,
            selected: settings.selected,
            render_in_main_pass: settings.render_in_main_pass,
            movable: settings.movable,
        }
    }
}

impl SceneProxyBase for PrimitiveSceneProxyData {
    fn local_to_world(&self) -> &Mat4 {
        &self.local_to_world
    }

    fn is_local_to_world_determinant_negative(&self) -> bool {
        self.determinant_negative
    }

    fn is_shown(&self, _view: &SceneView) -> bool {
        self.visible
    }

    fn is_shadow_cast(&self, view: &SceneView) -> bool {
        self.cast_shadow && self.visible && view.shows(EngineShowFlags::DYNAMIC_SHADOWS)
    }

    fn depth_priority_group(&self, _view: &SceneView) -> DepthPriorityGroup {
        self.depth_priority_group
    }

    fn draws_velocity(&self) -> bool {
        self.movable
    }

    fn should_render_in_main_pass(&self) -> bool {
        self.render_in_main_pass
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Scene state a component needs to create its proxy
#[derive(Debug, Clone)]
pub struct SceneContext {
    /// Feature level the scene renders at
    pub feature_level: FeatureLevel,
    /// Queue for render-thread resource commands
    pub render_commands: RenderCommandQueue,
}

impl SceneContext {
    /// Create a context
    pub fn new(feature_level: FeatureLevel, render_commands: RenderCommandQueue) -> Self {
        Self { feature_level, render_commands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::primitives::{SceneViewFamily, ViewMatrices};

    fn view(flags: EngineShowFlags) -> SceneView {
        SceneView::new(
            ViewMatrices::new(Mat4::identity(), Mat4::identity()),
            SceneViewFamily::with_show_flags(flags),
        )
    }

    #[test]
    fn test_mirrored_transform_sets_negative_determinant() {
        let settings = PrimitiveSettings {
            transform: Transform::identity().with_scale(Vec3::new(1.0, -1.0, 1.0)),
            ..Default::default()
        };
        assert!(PrimitiveSceneProxyData::from_settings(&settings).is_local_to_world_determinant_negative());
        assert!(!PrimitiveSceneProxyData::from_settings(&PrimitiveSettings::default())
            .is_local_to_world_determinant_negative());
    }

    #[test]
    fn test_shadow_cast_requires_flag_and_visibility() {
        let settings = PrimitiveSettings {
            cast_shadow: true,
            ..Default::default()
        };
        let base = PrimitiveSceneProxyData::from_settings(&settings);

        assert!(base.is_shadow_cast(&view(EngineShowFlags::game())));
        assert!(!base.is_shadow_cast(&view(EngineShowFlags::BILLBOARD_SPRITES)));
    }
}
