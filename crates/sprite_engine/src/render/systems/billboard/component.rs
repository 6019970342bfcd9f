//! Material billboard component
//!
//! Game-side owner of the billboard elements. Any edit marks the render state
//! dirty; the next `update_render_state` replaces the scene proxy with a fresh
//! snapshot instead of mutating the live one.

use std::sync::Arc;

use crate::assets::curves::CurveRef;
use crate::core::config::BillboardConfig;
use crate::foundation::color::LinearColor;
use crate::foundation::math::{constants, Transform, Vec3};
use crate::render::resources::buffers::VertexFactoryType;
use crate::render::resources::materials::{MaterialRef, PipelinePrecacheParams};
use crate::scene::{BoxSphereBounds, PrimitiveSettings, PrimitiveType, SceneContext};

use super::proxy::MaterialSpriteSceneProxy;
use super::types::MaterialSpriteElement;

/// Component drawing a stack of camera-facing material sprites
#[derive(Debug)]
pub struct MaterialBillboardComponent {
    elements: Vec<MaterialSpriteElement>,
    pivot_offset_z: f32,
    base_color: LinearColor,
    primitive: PrimitiveSettings,
    render_state_dirty: bool,
    scene_proxy: Option<Arc<MaterialSpriteSceneProxy>>,
}

impl Default for MaterialBillboardComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialBillboardComponent {
    /// Component with no elements at the origin
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            pivot_offset_z: 0.0,
            base_color: LinearColor::WHITE,
            primitive: PrimitiveSettings::default(),
            render_state_dirty: true,
            scene_proxy: None,
        }
    }

    /// Component with custom primitive settings
    pub fn with_primitive_settings(primitive: PrimitiveSettings) -> Self {
        Self {
            primitive,
            ..Self::new()
        }
    }

    /// Append an element
    pub fn add_element(
        &mut self,
        material: Option<MaterialRef>,
        distance_to_opacity_curve: Option<CurveRef>,
        size_is_in_screen_space: bool,
        base_size_x: f32,
        base_size_y: f32,
        distance_to_size_curve: Option<CurveRef>,
    ) {
        self.elements.push(MaterialSpriteElement {
            material,
            distance_to_opacity_curve,
            size_is_in_screen_space,
            base_size_x,
            base_size_y,
            distance_to_size_curve,
        });
        self.mark_render_state_dirty();
    }

    /// Replace every element
    pub fn set_elements(&mut self, elements: Vec<MaterialSpriteElement>) {
        self.elements = elements;
        self.mark_render_state_dirty();
    }

    /// Elements in draw order
    pub fn elements(&self) -> &[MaterialSpriteElement] {
        &self.elements
    }

    /// Change the material of one element; out-of-range indices are ignored
    pub fn set_material(&mut self, element_index: usize, material: Option<MaterialRef>) {
        if let Some(element) = self.elements.get_mut(element_index) {
            element.material = material;
            self.mark_render_state_dirty();
        }
    }

    /// Material of one element, `None` when unset or out of range
    pub fn material(&self, element_index: usize) -> Option<MaterialRef> {
        self.elements
            .get(element_index)
            .and_then(|element| element.material.clone())
    }

    /// Every distinct material in first-use order
    pub fn used_materials(&self) -> Vec<MaterialRef> {
        let mut used: Vec<MaterialRef> = Vec::new();
        for material in self.elements.iter().filter_map(|element| element.material.as_ref()) {
            if !used.iter().any(|known| Arc::ptr_eq(known, material)) {
                used.push(Arc::clone(material));
            }
        }
        used
    }

    /// Vertical offset applied to every element
    pub fn pivot_offset_z(&self) -> f32 {
        self.pivot_offset_z
    }

    /// Set the vertical offset
    pub fn set_pivot_offset_z(&mut self, pivot_offset_z: f32) {
        self.pivot_offset_z = pivot_offset_z;
        self.mark_render_state_dirty();
    }

    /// Color applied to every element
    pub fn base_color(&self) -> LinearColor {
        self.base_color
    }

    /// Set the base color
    pub fn set_base_color(&mut self, base_color: LinearColor) {
        self.base_color = base_color;
        self.mark_render_state_dirty();
    }

    /// Primitive settings the next proxy is built with
    pub fn primitive_settings(&self) -> &PrimitiveSettings {
        &self.primitive
    }

    /// Replace the primitive settings
    pub fn set_primitive_settings(&mut self, primitive: PrimitiveSettings) {
        self.primitive = primitive;
        self.mark_render_state_dirty();
    }

    /// Move the component
    pub fn set_world_transform(&mut self, transform: Transform) {
        self.primitive.transform = transform;
        self.mark_render_state_dirty();
    }

    /// Bounding volume at `local_to_world`
    ///
    /// Screen-space elements change size with the view, so any of them makes
    /// the bounds effectively infinite.
    pub fn calc_bounds(&self, local_to_world: &Transform) -> BoxSphereBounds {
        let mut bounds_size = 1.0_f32;
        for element in &self.elements {
            if element.size_is_in_screen_space {
                bounds_size = constants::HALF_WORLD_MAX;
                break;
            }
            bounds_size = bounds_size.max(element.base_size_x).max(element.base_size_y);
        }
        bounds_size *= local_to_world.maximum_axis_scale();

        BoxSphereBounds::new(
            local_to_world.position,
            Vec3::repeat(bounds_size),
            (3.0 * bounds_size * bounds_size).sqrt(),
        )
    }

    /// Bounds at the current world transform
    pub fn bounds(&self) -> BoxSphereBounds {
        self.calc_bounds(&self.primitive.transform)
    }

    /// Snapshot the component into a new scene proxy
    pub fn create_scene_proxy(&self, context: &SceneContext) -> MaterialSpriteSceneProxy {
        MaterialSpriteSceneProxy::new(self, context)
    }

    /// Request a new proxy on the next update
    pub fn mark_render_state_dirty(&mut self) {
        self.render_state_dirty = true;
    }

    /// Whether the live proxy is out of date
    pub fn is_render_state_dirty(&self) -> bool {
        self.render_state_dirty
    }

    /// Current proxy, recreating it first if the render state is dirty
    pub fn update_render_state(&mut self, context: &SceneContext) -> Arc<MaterialSpriteSceneProxy> {
        if let (false, Some(proxy)) = (self.render_state_dirty, &self.scene_proxy) {
            return Arc::clone(proxy);
        }

        let proxy = Arc::new(self.create_scene_proxy(context));
        self.scene_proxy = Some(Arc::clone(&proxy));
        self.render_state_dirty = false;
        proxy
    }

    /// The live proxy, if any
    pub fn scene_proxy(&self) -> Option<&Arc<MaterialSpriteSceneProxy>> {
        self.scene_proxy.as_ref()
    }

    /// Drop the live proxy; its resources are released on the render thread
    pub fn destroy_render_state(&mut self) {
        if self.scene_proxy.take().is_some() {
            log::debug!("Material billboard render state destroyed");
        }
        self.render_state_dirty = true;
    }

    /// Warm pipeline caches for every material this billboard draws with
    pub fn post_load(&self, config: &BillboardConfig) {
        if !config.enable_pso_precaching {
            return;
        }

        let params = PipelinePrecacheParams {
            primitive_type: PrimitiveType::TriangleStrip,
            disable_backface_culling: true,
            feature_level: config.feature_level,
        };

        let materials = self.used_materials();
        for material in &materials {
            material.precache_pipelines(VertexFactoryType::Local, &params);
        }
        log::debug!("Requested pipeline precaching for {} billboard materials", materials.len());
    }
}
