//! Cross-module billboard scenarios
//!
//! Run against the real render thread and headless device.

use std::sync::Arc;

use crossbeam::channel::bounded;

use approx::assert_relative_eq;

use super::*;
use crate::assets::curves::CurveFloat;
use crate::core::config::{BillboardConfig, RenderThreadConfig};
use crate::foundation::color::{Color, LinearColor};
use crate::foundation::math::{Mat4, Mat4Ext, Quat, Transform, Vec3};
use crate::render::backend::{DeviceStats, HeadlessDevice, RenderThread};
use crate::render::primitives::{EngineShowFlags, FeatureLevel, SceneView, SceneViewFamily, ViewMatrices};
use crate::render::resources::buffers::{MaterialSpriteVertex, VertexFactoryType};
use crate::render::resources::materials::{MaterialId, MaterialRef, SpriteMaterial};
use crate::scene::{MeshElementCollector, PrimitiveSettings, PrimitiveType, SceneContext, SceneProxy};

fn render_thread() -> RenderThread {
    RenderThread::spawn(Box::new(HeadlessDevice::new()), &RenderThreadConfig::default()).expect("render thread")
}

fn context(render_thread: &RenderThread) -> SceneContext {
    SceneContext::new(FeatureLevel::Sm5, render_thread.queue())
}

fn view_with_flags(flags: EngineShowFlags) -> SceneView {
    SceneView::new(
        ViewMatrices::new(
            Mat4::identity(),
            Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0),
        ),
        SceneViewFamily::with_show_flags(flags),
    )
}

fn view() -> SceneView {
    view_with_flags(EngineShowFlags::game())
}

fn material(id: u32) -> MaterialRef {
    Arc::new(SpriteMaterial::translucent(MaterialId(id)))
}

fn billboard_at(pivot: Vec3) -> MaterialBillboardComponent {
    let mut component = MaterialBillboardComponent::new();
    component.set_world_transform(Transform::from_position(pivot));
    component
}

fn collect(proxy: &MaterialSpriteSceneProxy, views: &[SceneView], visibility_map: u32) -> MeshElementCollector {
    let mut collector = MeshElementCollector::new(views.len());
    proxy.get_dynamic_mesh_elements(views, visibility_map, &mut collector);
    collector
}

fn base_vertex_indices(collector: &MeshElementCollector, view_index: usize) -> Vec<u32> {
    collector
        .mesh_batches(view_index)
        .iter()
        .filter_map(|batch| batch.first_element().map(|element| element.base_vertex_index))
        .collect()
}

fn device_stats(render_thread: &RenderThread) -> DeviceStats {
    render_thread
        .queue()
        .execute_and_wait("Stats", |commands| commands.device().stats())
        .expect("stats")
}

#[test]
fn test_batches_follow_element_order_per_view() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    for id in 1..=3 {
        component.add_element(Some(material(id)), None, false, 1.0, 1.0, None);
    }
    let proxy = component.update_render_state(&context(&render_thread));

    let views = [view(), view()];
    let collector = collect(&proxy, &views, 0b11);

    assert_eq!(base_vertex_indices(&collector, 0), vec![0, 4, 8]);
    assert_eq!(base_vertex_indices(&collector, 1), vec![12, 16, 20]);

    let materials: Vec<u32> = collector
        .mesh_batches(1)
        .iter()
        .filter_map(|batch| batch.material_render_proxy.map(|proxy| proxy.material.0))
        .collect();
    assert_eq!(materials, vec![1, 2, 3]);
}

#[test]
fn test_null_material_writes_nothing() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    component.add_element(None, None, false, 1.0, 1.0, None);
    component.add_element(Some(material(3)), None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    let collector = collect(&proxy, &[view()], 0b1);
    assert_eq!(base_vertex_indices(&collector, 0), vec![0, 8]);

    let data = proxy.vertex_data_snapshot().expect("snapshot");
    assert_eq!(data.num_vertices(), 12);
    for index in 4..8 {
        assert_eq!(data.vertex(index), Some(MaterialSpriteVertex::default()));
    }
    assert_eq!(data.color(0), Some(Color::WHITE));
    assert_eq!(data.color(8), Some(Color::WHITE));
}

#[test]
fn test_screen_space_size_scales_with_w() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 3.0));
    component.add_element(Some(material(1)), None, true, 2.0, 2.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    let basis = SpriteViewBasis::new(
        &view().view_matrices,
        &Transform::from_position(Vec3::new(0.0, 0.0, 3.0)).to_matrix(),
    );
    let geometry = generate_sprite_geometry(&basis, &proxy.elements()[0], 0.0, LinearColor::WHITE);
    assert_relative_eq!(geometry.world_size.x, 6.0, epsilon = 1e-5);

    collect(&proxy, &[view()], 0b1);
    let data = proxy.vertex_data_snapshot().expect("snapshot");
    let top_edge = data.position(1).expect("corner 1") - data.position(0).expect("corner 0");
    assert_relative_eq!(top_edge.norm(), 12.0, epsilon = 1e-4);
}

#[test]
fn test_size_curve_scales_base_size() {
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 10.0));
    let curve = CurveFloat::from_keys([(0.0, 1.0), (10.0, 0.5), (20.0, 0.0)]).into_ref();
    component.add_element(Some(material(1)), None, false, 32.0, 16.0, Some(curve));

    let basis = SpriteViewBasis::new(
        &view().view_matrices,
        &component.primitive_settings().transform.to_matrix(),
    );
    let geometry = generate_sprite_geometry(&basis, &component.elements()[0], 0.0, LinearColor::WHITE);

    assert_relative_eq!(basis.distance_to_pivot, 10.0);
    assert_relative_eq!(geometry.scaled_size.x, 16.0);
    assert_relative_eq!(geometry.scaled_size.y, 8.0);
}

#[test]
fn test_screen_space_element_escalates_bounds() {
    let mut world_sized = MaterialBillboardComponent::new();
    world_sized.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let mut screen_sized = MaterialBillboardComponent::new();
    screen_sized.add_element(Some(material(1)), None, true, 1.0, 1.0, None);

    let transform = Transform::from_position(Vec3::new(4.0, 5.0, 6.0));
    let small = world_sized.calc_bounds(&transform);
    let huge = screen_sized.calc_bounds(&transform);

    assert_relative_eq!(small.sphere_radius, 3.0_f32.sqrt(), epsilon = 1e-6);
    assert!(huge.sphere_radius >= small.sphere_radius * 1.0e6);
    assert_relative_eq!(huge.origin, Vec3::new(4.0, 5.0, 6.0));
}

#[test]
fn test_bounds_use_largest_size_and_scale() {
    let mut component = MaterialBillboardComponent::new();
    component.add_element(Some(material(1)), None, false, 3.0, 7.0, None);
    component.add_element(None, None, false, 5.0, 2.0, None);

    let bounds = component.calc_bounds(&Transform::identity().with_scale(Vec3::new(1.0, -2.0, 1.0)));
    assert_relative_eq!(bounds.box_extent, Vec3::repeat(14.0));
    assert_relative_eq!(bounds.sphere_radius, 14.0 * 3.0_f32.sqrt(), epsilon = 1e-4);

    let empty = MaterialBillboardComponent::new().bounds();
    assert_relative_eq!(empty.box_extent, Vec3::repeat(1.0));
}

#[test]
fn test_repeated_frames_are_bit_identical() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(1.0, -2.0, 6.0));
    component.set_pivot_offset_z(0.5);
    component.add_element(Some(material(1)), None, false, 2.0, 3.0, None);
    component.add_element(Some(material(2)), None, true, 0.1, 0.1, None);
    let proxy = component.update_render_state(&context(&render_thread));
    let views = [view(), view_with_flags(EngineShowFlags::game() | EngineShowFlags::WIREFRAME)];

    collect(&proxy, &views, 0b11);
    let first = proxy.vertex_data_snapshot().expect("first");
    let first_buffers = proxy.device_buffers().expect("first buffers");

    collect(&proxy, &views, 0b11);
    let second = proxy.vertex_data_snapshot().expect("second");
    let second_buffers = proxy.device_buffers().expect("second buffers");

    assert_eq!(first, second);
    // Same size, so the device buffers are reused rather than recreated
    assert_eq!(first_buffers, second_buffers);
}

#[test]
fn test_used_materials_deduplicated_in_first_use_order() {
    let (a, b, c) = (material(1), material(2), material(3));
    let mut component = MaterialBillboardComponent::new();
    for entry in [Some(&a), Some(&b), Some(&a), None, Some(&c)] {
        component.add_element(entry.cloned(), None, false, 1.0, 1.0, None);
    }

    let used = component.used_materials();
    assert_eq!(used.len(), 3);
    assert!(Arc::ptr_eq(&used[0], &a));
    assert!(Arc::ptr_eq(&used[1], &b));
    assert!(Arc::ptr_eq(&used[2], &c));
}

#[test]
fn test_opacity_curve_scales_alpha() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    let curve = CurveFloat::from_keys([(0.0, 1.0), (5.0, 0.25), (10.0, 0.0)]).into_ref();
    component.add_element(Some(material(1)), Some(curve), false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    let basis = SpriteViewBasis::new(&view().view_matrices, &component.primitive_settings().transform.to_matrix());
    let geometry = generate_sprite_geometry(&basis, &proxy.elements()[0], 0.0, LinearColor::WHITE);
    assert_relative_eq!(geometry.color.a, 0.25, epsilon = 1e-6);

    collect(&proxy, &[view()], 0b1);
    let data = proxy.vertex_data_snapshot().expect("snapshot");
    for index in 0..4 {
        let color = data.color(index).expect("color");
        assert_relative_eq!(color.alpha_unit(), 0.25, epsilon = 1.0 / 255.0);
    }
}

#[test]
fn test_batch_settings() {
    let render_thread = render_thread();
    let mut component = MaterialBillboardComponent::with_primitive_settings(PrimitiveSettings {
        transform: Transform::from_position(Vec3::new(0.0, 0.0, 4.0)),
        selected: true,
        ..Default::default()
    });
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    let collector = collect(&proxy, &[view()], 0b1);
    let batch = &collector.mesh_batches(0)[0];
    let element = batch.first_element().expect("element");

    assert_eq!(batch.primitive_type, PrimitiveType::TriangleStrip);
    assert!(batch.disable_backface_culling);
    assert!(!batch.cast_shadow);
    assert!(!batch.reverse_culling);
    assert!(batch.can_apply_view_mode_overrides);
    assert!(batch.use_wireframe_selection_coloring);
    assert_eq!((element.num_primitives, element.min_vertex_index, element.max_vertex_index), (2, 0, 3));
    assert!(batch
        .vertex_factory
        .as_ref()
        .is_some_and(|factory| Arc::ptr_eq(factory, proxy.vertex_factory())));
}

#[test]
fn test_mirrored_transform_reverses_culling() {
    let render_thread = render_thread();
    let mut component = MaterialBillboardComponent::new();
    component.set_world_transform(
        Transform::from_position(Vec3::new(0.0, 0.0, 4.0)).with_scale(Vec3::new(-1.0, 1.0, 1.0)),
    );
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    let collector = collect(&proxy, &[view()], 0b1);
    assert!(collector.mesh_batches(0)[0].reverse_culling);
}

#[test]
fn test_visibility_map_selects_views() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    let views = [view(), view(), view()];
    let collector = collect(&proxy, &views, 0b101);

    assert_eq!(base_vertex_indices(&collector, 0), vec![0]);
    assert!(collector.mesh_batches(1).is_empty());
    assert_eq!(base_vertex_indices(&collector, 2), vec![8]);

    let data = proxy.vertex_data_snapshot().expect("snapshot");
    assert_eq!(data.vertex(4), Some(MaterialSpriteVertex::default()));
}

#[test]
fn test_empty_billboard_skips_upload() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    let proxy = component.update_render_state(&context(&render_thread));
    let before = device_stats(&render_thread);

    let collector = collect(&proxy, &[view()], 0b1);
    let no_views = collect(&proxy, &[], 0);
    let after = device_stats(&render_thread);

    assert_eq!(collector.total_batches(), 0);
    assert_eq!(no_views.num_views(), 0);
    assert_eq!(before, after);
}

#[test]
fn test_uploaded_positions_match_cpu_data() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 2.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    collect(&proxy, &[view(), view()], 0b11);
    let data = proxy.vertex_data_snapshot().expect("snapshot");
    let [position_buffer, ..] = proxy.device_buffers().expect("buffers");
    let position_buffer = position_buffer.expect("position buffer");

    let uploaded = render_thread
        .queue()
        .execute_and_wait("ReadPositions", move |commands| commands.device().read_buffer(position_buffer))
        .expect("read")
        .expect("live buffer");
    let expected: Vec<f32> = (0..data.num_vertices())
        .filter_map(|index| data.position(index))
        .flat_map(|position| [position.x, position.y, position.z])
        .collect();

    assert_eq!(uploaded.len(), 8 * 12);
    assert_eq!(uploaded, bytemuck::cast_slice::<f32, u8>(&expected));

    let streams = proxy
        .vertex_factory()
        .read()
        .expect("factory")
        .streams()
        .copied()
        .expect("bound");
    assert_eq!(streams.position.buffer, Some(position_buffer));
}

#[test]
fn test_tangent_frame_faces_camera() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    collect(&proxy, &[view()], 0b1);
    let data = proxy.vertex_data_snapshot().expect("snapshot");
    let tangents = data.tangents(3).expect("tangents");

    assert_relative_eq!(tangents.tangent_x.to_vec3(), Vec3::x(), epsilon = 1.0 / 127.0);
    assert_relative_eq!(tangents.tangent_z.to_vec3(), -Vec3::z(), epsilon = 1.0 / 127.0);
    assert_eq!(data.tex_coord(1).map(|uv| (uv.x, uv.y)), Some((0.0, 1.0)));
    assert_eq!(data.tex_coord(2).map(|uv| (uv.x, uv.y)), Some((1.0, 0.0)));
}

#[test]
fn test_view_relevance() {
    let render_thread = render_thread();
    let context = context(&render_thread);
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context);

    let shown = proxy.get_view_relevance(&view());
    assert!(shown.draw_relevance);
    assert!(shown.dynamic_relevance);
    assert!(shown.translucency);
    assert!(!shown.velocity_relevance);
    assert!(!shown.shadow_relevance);

    let sprites_hidden = proxy.get_view_relevance(&view_with_flags(EngineShowFlags::TRANSLUCENCY));
    assert!(!sprites_hidden.draw_relevance);
    assert!(sprites_hidden.dynamic_relevance);

    component.set_primitive_settings(PrimitiveSettings {
        visible: false,
        ..component.primitive_settings().clone()
    });
    let hidden = component.update_render_state(&context);
    assert!(!hidden.get_view_relevance(&view()).draw_relevance);
}

#[test]
fn test_velocity_relevance_needs_opaque_velocity_material() {
    let render_thread = render_thread();
    let context = context(&render_thread);
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    let opaque: MaterialRef = Arc::new(SpriteMaterial::opaque(MaterialId(7)).with_velocity());
    component.add_element(Some(opaque), None, false, 1.0, 1.0, None);

    let moving = component.update_render_state(&context);
    assert!(moving.get_view_relevance(&view()).velocity_relevance);

    component.set_primitive_settings(PrimitiveSettings {
        movable: false,
        ..component.primitive_settings().clone()
    });
    let fixed = component.update_render_state(&context);
    assert!(!fixed.get_view_relevance(&view()).velocity_relevance);
}

#[test]
fn test_depth_test_disabled_material_prevents_occlusion() {
    let render_thread = render_thread();
    let context = context(&render_thread);
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    assert!(component.update_render_state(&context).can_be_occluded());

    let overlay: MaterialRef = Arc::new(SpriteMaterial::translucent(MaterialId(2)).with_depth_test_disabled());
    component.add_element(Some(overlay), None, false, 1.0, 1.0, None);
    assert!(!component.update_render_state(&context).can_be_occluded());
}

#[test]
fn test_dropped_proxy_releases_device_buffers() {
    let render_thread = render_thread();
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));
    collect(&proxy, &[view()], 0b1);

    // Dummy buffer plus four streams
    assert_eq!(device_stats(&render_thread).live_buffers, 5);

    drop(proxy);
    component.destroy_render_state();
    assert!(component.scene_proxy().is_none());
    assert!(component.is_render_state_dirty());

    assert_eq!(device_stats(&render_thread).live_buffers, 1);
    let device = render_thread.shutdown().expect("shutdown");
    assert_eq!(device.stats().live_buffers, 0);
}

#[test]
fn test_proxy_dropped_with_commands_still_queued() {
    let render_thread = render_thread();
    let queue = render_thread.queue();
    let (started_tx, started_rx) = bounded(1);
    let (open_tx, open_rx) = bounded::<()>(1);
    queue
        .enqueue("Gate", move |_| {
            let _ = started_tx.send(());
            let _ = open_rx.recv();
        })
        .expect("gate");
    started_rx.recv().expect("gate running");

    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));
    collect(&proxy, &[view()], 0b1);
    drop(proxy);
    component.destroy_render_state();

    // Init, upload and release are all still waiting behind the gate
    assert_eq!(queue.pending(), 3);

    open_tx.send(()).expect("open gate");
    assert_eq!(device_stats(&render_thread).live_buffers, 1);
}

#[test]
fn test_rotated_billboard_still_faces_camera() {
    let render_thread = render_thread();
    let context = context(&render_thread);
    let pivot = Vec3::new(1.0, 0.5, 5.0);

    let mut upright = billboard_at(pivot);
    upright.add_element(Some(material(1)), None, false, 1.0, 2.0, None);
    let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 0.7);
    let mut turned = MaterialBillboardComponent::new();
    turned.set_world_transform(Transform::from_position_rotation(pivot, rotation));
    turned.add_element(Some(material(1)), None, false, 1.0, 2.0, None);

    let world_corners = |component: &mut MaterialBillboardComponent| {
        let local_to_world = component.primitive_settings().transform.to_matrix();
        let proxy = component.update_render_state(&context);
        collect(&proxy, &[view()], 0b1);
        let data = proxy.vertex_data_snapshot().expect("snapshot");
        (0..4)
            .map(|index| {
                let local = data.position(index).expect("corner");
                local_to_world.transform_homogeneous(&local).xyz()
            })
            .collect::<Vec<_>>()
    };

    let expected = world_corners(&mut upright);
    let actual = world_corners(&mut turned);
    for (actual, expected) in actual.iter().zip(&expected) {
        assert_relative_eq!(*actual, *expected, epsilon = 1e-4);
    }
}

#[test]
fn test_proxy_is_a_snapshot() {
    let render_thread = render_thread();
    let context = context(&render_thread);
    let mut component = billboard_at(Vec3::new(0.0, 0.0, 5.0));
    component.add_element(Some(material(1)), None, false, 1.0, 1.0, None);
    let first = component.update_render_state(&context);
    assert!(!component.is_render_state_dirty());
    assert!(Arc::ptr_eq(&first, &component.update_render_state(&context)));

    component.add_element(Some(material(2)), None, false, 1.0, 1.0, None);
    component.set_pivot_offset_z(3.0);
    assert!(component.is_render_state_dirty());
    assert_eq!(first.elements().len(), 1);
    assert_relative_eq!(first.pivot_offset_z(), 0.0);

    let second = component.update_render_state(&context);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.elements().len(), 2);
    assert_relative_eq!(second.pivot_offset_z(), 3.0);
}

#[test]
fn test_material_accessors_ignore_out_of_range() {
    let render_thread = render_thread();
    let mut component = MaterialBillboardComponent::new();
    component.add_element(None, None, false, 1.0, 1.0, None);
    component.update_render_state(&context(&render_thread));

    component.set_material(4, Some(material(1)));
    assert!(!component.is_render_state_dirty());
    assert!(component.material(4).is_none());
    assert!(component.material(0).is_none());

    let replacement = material(2);
    component.set_material(0, Some(Arc::clone(&replacement)));
    assert!(component.is_render_state_dirty());
    assert!(component.material(0).is_some_and(|current| Arc::ptr_eq(&current, &replacement)));
}

#[test]
fn test_material_relevance_aggregates_elements() {
    let render_thread = render_thread();
    let mut component = MaterialBillboardComponent::new();
    let opaque: MaterialRef = Arc::new(SpriteMaterial::opaque(MaterialId(1)));
    component.add_element(Some(opaque), None, false, 1.0, 1.0, None);
    component.add_element(Some(material(2)), None, false, 1.0, 1.0, None);
    component.add_element(None, None, false, 1.0, 1.0, None);
    let proxy = component.update_render_state(&context(&render_thread));

    let relevance = proxy.get_view_relevance(&view());
    assert!(relevance.opaque);
    assert!(relevance.translucency);
    assert!(proxy.memory_footprint() >= std::mem::size_of::<MaterialSpriteSceneProxy>());
}

#[test]
fn test_post_load_precaches_each_material_once() {
    let a = Arc::new(SpriteMaterial::translucent(MaterialId(1)));
    let b = Arc::new(SpriteMaterial::opaque(MaterialId(2)));
    let a_ref: MaterialRef = a.clone();
    let b_ref: MaterialRef = b.clone();

    let mut component = MaterialBillboardComponent::new();
    component.add_element(Some(Arc::clone(&a_ref)), None, false, 1.0, 1.0, None);
    component.add_element(Some(Arc::clone(&a_ref)), None, false, 1.0, 1.0, None);
    component.add_element(Some(b_ref), None, false, 1.0, 1.0, None);

    component.post_load(&BillboardConfig {
        enable_pso_precaching: false,
        ..Default::default()
    });
    assert_eq!(a.precache_requests(), 0);

    component.post_load(&BillboardConfig::default());
    assert_eq!(a.precache_requests(), 1);
    assert_eq!(b.precache_requests(), 1);

    let (vertex_factory, params) = a.last_precache().expect("precached");
    assert_eq!(vertex_factory, VertexFactoryType::Local);
    assert_eq!(params.primitive_type, PrimitiveType::TriangleStrip);
    assert!(params.disable_backface_culling);
    assert_eq!(params.feature_level, BillboardConfig::default().feature_level);
}
