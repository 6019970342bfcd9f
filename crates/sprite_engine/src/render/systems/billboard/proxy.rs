//! Material sprite scene proxy
//!
//! Render-side snapshot of a [`MaterialBillboardComponent`]. The element list,
//! pivot offset and color are copied at construction and never change; later
//! edits to the component only take effect through a new proxy.
//!
//! The vertex buffers and vertex factory are shared with render commands via
//! `Arc`. Every command that touches them owns a clone, so they stay alive
//! until the last queued command has run even if the proxy is dropped first.
//! Only render commands lock them.
//!
//! [`MaterialBillboardComponent`]: super::MaterialBillboardComponent

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLockWriteGuard};

use crate::foundation::color::LinearColor;
use crate::render::backend::{DeviceBufferHandle, RenderCommandQueue, RenderThreadError};
use crate::render::primitives::{EngineShowFlags, FeatureLevel, SceneView};
use crate::render::resources::buffers::{
    LocalVertexFactory, SharedVertexFactory, StaticMeshVertexBuffers, StaticMeshVertexData,
};
use crate::render::resources::materials::MaterialRelevance;
use crate::scene::{
    MeshBatchElement, MeshElementCollector, PrimitiveSceneProxyData, PrimitiveType, PrimitiveViewRelevance,
    SceneContext, SceneProxy, SceneProxyBase,
};

use super::component::MaterialBillboardComponent;
use super::geometry::{
    generate_sprite_geometry, sprite_write_offset, write_sprite_vertices, SpriteViewBasis, VERTICES_PER_SPRITE,
};
use super::types::MaterialSpriteElement;

/// Scene proxy drawing one quad per element per visible view
#[derive(Debug)]
pub struct MaterialSpriteSceneProxy {
    base: Box<dyn SceneProxyBase>,
    elements: Vec<MaterialSpriteElement>,
    pivot_offset_z: f32,
    base_color: LinearColor,
    material_relevance: MaterialRelevance,
    feature_level: FeatureLevel,
    buffers: Arc<Mutex<StaticMeshVertexBuffers>>,
    vertex_factory: SharedVertexFactory,
    render_commands: RenderCommandQueue,
}

impl MaterialSpriteSceneProxy {
    /// Snapshot `component`
    pub fn new(component: &MaterialBillboardComponent, context: &SceneContext) -> Self {
        Self::with_base(
            Box::new(PrimitiveSceneProxyData::from_settings(component.primitive_settings())),
            component.elements().to_vec(),
            component.pivot_offset_z(),
            component.base_color(),
            context,
        )
    }

    /// Build from explicit parts, with a custom primitive base
    pub fn with_base(
        base: Box<dyn SceneProxyBase>,
        elements: Vec<MaterialSpriteElement>,
        pivot_offset_z: f32,
        base_color: LinearColor,
        context: &SceneContext,
    ) -> Self {
        let material_relevance = elements
            .iter()
            .filter_map(|element| element.material.as_ref())
            .fold(MaterialRelevance::empty(), |relevance, material| {
                relevance | material.relevance(context.feature_level)
            });

        let mut buffers = StaticMeshVertexBuffers::new();
        buffers.init(1);
        let buffers = Arc::new(Mutex::new(buffers));
        let vertex_factory = LocalVertexFactory::new("MaterialSpriteSceneProxy").into_shared();

        let init_buffers = Arc::clone(&buffers);
        let init_factory = Arc::clone(&vertex_factory);
        let enqueued = context.render_commands.enqueue("MaterialSpriteSceneProxyInit", move |commands| {
            let mut buffers = lock_buffers(&init_buffers);
            if let Err(error) = buffers.init_resources(commands.device()) {
                log::error!("Failed to create billboard vertex buffers: {}", error);
            }

            let mut factory = write_factory(&init_factory);
            factory.set_data(buffers.bind_streams());
            factory.init_resource(commands.globals());
        });
        if let Err(error) = enqueued {
            log::error!("Billboard proxy created without render resources: {}", error);
        }

        log::debug!(
            "Created material sprite proxy with {} elements (relevance {:?})",
            elements.len(),
            material_relevance
        );

        Self {
            base,
            elements,
            pivot_offset_z,
            base_color,
            material_relevance,
            feature_level: context.feature_level,
            buffers,
            vertex_factory,
            render_commands: context.render_commands.clone(),
        }
    }

    /// Element snapshot
    pub fn elements(&self) -> &[MaterialSpriteElement] {
        &self.elements
    }

    /// Pivot offset snapshot
    pub fn pivot_offset_z(&self) -> f32 {
        self.pivot_offset_z
    }

    /// Combined relevance of every element's material
    pub fn material_relevance(&self) -> MaterialRelevance {
        self.material_relevance
    }

    /// Feature level relevance was computed for
    pub fn feature_level(&self) -> FeatureLevel {
        self.feature_level
    }

    /// The vertex factory mesh batches draw with
    pub fn vertex_factory(&self) -> &SharedVertexFactory {
        &self.vertex_factory
    }

    /// Copy of the vertex data most recently uploaded, fenced behind all queued commands
    pub fn vertex_data_snapshot(&self) -> Result<StaticMeshVertexData, RenderThreadError> {
        let buffers = Arc::clone(&self.buffers);
        self.render_commands
            .execute_and_wait("MaterialSpriteSceneProxySnapshot", move |_| lock_buffers(&buffers).data().clone())
    }

    /// Device buffers (position, tangent, texcoord, color) after all queued commands
    pub fn device_buffers(&self) -> Result<[Option<DeviceBufferHandle>; 4], RenderThreadError> {
        let buffers = Arc::clone(&self.buffers);
        self.render_commands
            .execute_and_wait("MaterialSpriteSceneProxyBuffers", move |_| lock_buffers(&buffers).buffer_handles())
    }

    fn allocated_size(&self) -> usize {
        self.base.allocated_size() + self.elements.capacity() * std::mem::size_of::<MaterialSpriteElement>()
    }
}

impl SceneProxy for MaterialSpriteSceneProxy {
    #[allow(clippy::cast_possible_truncation)]
    fn get_dynamic_mesh_elements(&self, views: &[SceneView], visibility_map: u32, collector: &mut MeshElementCollector) {
        let num_elements = self.elements.len();
        let worst_case_vertices = VERTICES_PER_SPRITE * num_elements * views.len();
        if worst_case_vertices == 0 {
            return;
        }
        if u32::try_from(worst_case_vertices).is_err() {
            log::warn!("Skipping billboard with {} vertices", worst_case_vertices);
            return;
        }

        let mut vertex_data = StaticMeshVertexData::with_vertices(worst_case_vertices);
        let local_to_world = self.base.local_to_world();
        let reverse_culling = self.base.is_local_to_world_determinant_negative();
        let selected = self.base.is_selected();

        for (view_index, view) in views.iter().enumerate() {
            if !is_view_visible(visibility_map, view_index) {
                continue;
            }

            let basis = SpriteViewBasis::new(&view.view_matrices, local_to_world);

            for (element_index, element) in self.elements.iter().enumerate() {
                let Some(material) = &element.material else {
                    continue;
                };

                let geometry = generate_sprite_geometry(&basis, element, self.pivot_offset_z, self.base_color);
                let write_offset = sprite_write_offset(view_index, element_index, num_elements);
                write_sprite_vertices(&mut vertex_data, write_offset, &geometry);

                let mut mesh = collector.allocate_mesh();
                mesh.vertex_factory = Some(Arc::clone(&self.vertex_factory));
                mesh.material_render_proxy = Some(material.render_proxy());
                mesh.reverse_culling = reverse_culling;
                mesh.cast_shadow = false;
                mesh.depth_priority_group = self.base.depth_priority_group(view);
                mesh.primitive_type = PrimitiveType::TriangleStrip;
                mesh.disable_backface_culling = true;
                mesh.can_apply_view_mode_overrides = true;
                mesh.use_wireframe_selection_coloring = selected;
                *mesh.first_element_mut() = MeshBatchElement {
                    first_index: 0,
                    min_vertex_index: 0,
                    max_vertex_index: 3,
                    num_primitives: 2,
                    // Bounded by the worst case checked above
                    base_vertex_index: write_offset as u32,
                };

                collector.add_mesh(view_index, mesh);
            }
        }

        let buffers = Arc::clone(&self.buffers);
        let vertex_factory = Arc::clone(&self.vertex_factory);
        let enqueued = self.render_commands.enqueue("MaterialSpriteSceneProxyUpdate", move |commands| {
            let mut buffers = lock_buffers(&buffers);
            buffers.assign(vertex_data);
            if let Err(error) = buffers.update_resources(commands.device()) {
                log::error!("Failed to upload billboard vertices: {}", error);
            }

            let mut factory = write_factory(&vertex_factory);
            factory.set_data(buffers.bind_streams());
            factory.update_resource(commands.globals());
        });
        if let Err(error) = enqueued {
            log::warn!("Billboard vertex upload dropped: {}", error);
        }

        log::trace!(
            "Material sprite proxy wrote {} vertices for {} views",
            worst_case_vertices,
            views.len()
        );
    }

    fn get_view_relevance(&self, view: &SceneView) -> PrimitiveViewRelevance {
        let mut result = PrimitiveViewRelevance {
            draw_relevance: view.shows(EngineShowFlags::BILLBOARD_SPRITES) && self.base.is_shown(view),
            dynamic_relevance: true,
            shadow_relevance: self.base.is_shadow_cast(view),
            render_in_main_pass: self.base.should_render_in_main_pass(),
            ..Default::default()
        };
        self.material_relevance.set_primitive_view_relevance(&mut result);
        result.velocity_relevance =
            self.base.draws_velocity() && result.opaque && result.render_in_main_pass && result.outputs_velocity;
        result
    }

    fn can_be_occluded(&self) -> bool {
        !self.material_relevance.contains(MaterialRelevance::DISABLE_DEPTH_TEST)
    }

    fn memory_footprint(&self) -> usize {
        std::mem::size_of::<Self>() + self.allocated_size()
    }
}

impl Drop for MaterialSpriteSceneProxy {
    fn drop(&mut self) {
        let buffers = Arc::clone(&self.buffers);
        let vertex_factory = Arc::clone(&self.vertex_factory);
        let enqueued = self.render_commands.enqueue("MaterialSpriteSceneProxyRelease", move |commands| {
            write_factory(&vertex_factory).release_resource();
            if let Err(error) = lock_buffers(&buffers).release_resources(commands.device()) {
                log::error!("Failed to release billboard vertex buffers: {}", error);
            }
        });
        if let Err(error) = enqueued {
            log::warn!("Billboard render resources not released: {}", error);
        }
    }
}

fn is_view_visible(visibility_map: u32, view_index: usize) -> bool {
    u32::try_from(view_index)
        .ok()
        .and_then(|shift| visibility_map.checked_shr(shift))
        .map_or(false, |bits| bits & 1 != 0)
}

fn lock_buffers(buffers: &Mutex<StaticMeshVertexBuffers>) -> MutexGuard<'_, StaticMeshVertexBuffers> {
    buffers.lock().unwrap_or_else(PoisonError::into_inner)
}

fn write_factory(factory: &SharedVertexFactory) -> RwLockWriteGuard<'_, LocalVertexFactory> {
    factory.write().unwrap_or_else(PoisonError::into_inner)
}
