//! Material billboard demo
//!
//! Runs a two-layer billboard through a few frames on the headless device and
//! logs what every view would draw.

use std::error::Error;
use std::sync::Arc;

use sprite_engine::foundation::logging;
use sprite_engine::foundation::math::{utils, Quat};
use sprite_engine::prelude::*;

const CONFIG_PATH: &str = "sprite_demo.toml";
const FRAME_COUNT: u32 = 3;

fn build_billboard() -> MaterialBillboardComponent {
    let mut billboard = MaterialBillboardComponent::new();

    // Opaque core that shrinks with distance
    let core: MaterialRef = Arc::new(SpriteMaterial::opaque(MaterialId(1)).with_name("BillboardCore"));
    let shrink = CurveFloat::from_keys([(0.0, 1.0), (20.0, 0.5)]).into_ref();
    billboard.add_element(Some(core), None, false, 1.0, 1.0, Some(shrink));

    // Additive glow with a constant on-screen size that fades out far away
    let glow: MaterialRef = Arc::new(
        SpriteMaterial::translucent(MaterialId(2))
            .with_name("BillboardGlow")
            .with_separate_translucency(),
    );
    let fade = CurveFloat::from_keys([(5.0, 1.0), (30.0, 0.0)]).into_ref();
    billboard.add_element(Some(glow), Some(fade), true, 0.1, 0.1, None);

    billboard.set_pivot_offset_z(0.25);
    billboard.set_base_color(LinearColor::new(1.0, 0.8, 0.6, 1.0));
    // The sprites face the camera whatever the component's own rotation is
    let spin = Quat::from_axis_angle(&Vec3::y_axis(), utils::deg_to_rad(30.0));
    billboard.set_world_transform(Transform::from_position_rotation(Vec3::new(0.0, 1.0, 0.0), spin));
    billboard
}

fn build_views(frame: u32) -> Vec<SceneView> {
    let family = SceneViewFamily::default();
    let orbit = utils::deg_to_rad(15.0 * frame as f32);

    let mut near = Camera::perspective(Vec3::new(0.0, 2.0, 6.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
    near.look_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

    let mut far = Camera::perspective(
        Vec3::new(25.0 * orbit.sin(), 5.0, 25.0 * orbit.cos()),
        45.0,
        4.0 / 3.0,
        0.1,
        200.0,
    );
    far.look_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
    if frame % 2 == 1 {
        // Second viewport switches to widescreen on odd frames
        far.set_aspect_ratio(16.0 / 9.0);
    }

    vec![
        SceneView::new(near.view_matrices(), family),
        SceneView::new(far.view_matrices(), family),
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = ApplicationConfig::load_or_default(CONFIG_PATH)?;
    config.validate()?;
    logging::init_from_config(&config.engine)?;

    log::info!("Starting material billboard demo");

    let render_thread = RenderThread::spawn(Box::new(HeadlessDevice::new()), &config.render_thread)?;
    let context = SceneContext::new(config.billboards.feature_level, render_thread.queue());

    let mut billboard = build_billboard();
    billboard.post_load(&config.billboards);

    let bounds = billboard.bounds();
    log::info!(
        "Billboard bounds: origin {:?}, sphere radius {:.1}",
        bounds.origin,
        bounds.sphere_radius
    );

    for frame in 0..FRAME_COUNT {
        let proxy = billboard.update_render_state(&context);
        let views = build_views(frame);
        let mut collector = MeshElementCollector::new(views.len());

        let relevance = proxy.get_view_relevance(&views[0]);
        log::debug!("Frame {}: view relevance {:?}", frame, relevance);

        proxy.get_dynamic_mesh_elements(&views, 0b11, &mut collector);

        for view_index in 0..views.len() {
            for batch in collector.mesh_batches(view_index) {
                if let Some(element) = batch.first_element() {
                    log::info!(
                        "Frame {} view {}: {:?} x{} from vertex {}",
                        frame,
                        view_index,
                        batch.primitive_type,
                        element.num_primitives,
                        element.base_vertex_index
                    );
                }
            }
        }
    }

    context.render_commands.flush()?;
    billboard.destroy_render_state();

    let device = render_thread.shutdown()?;
    let stats = device.stats();
    log::info!(
        "Device: {} buffers created, {} released, {} bytes uploaded",
        stats.buffers_created,
        stats.buffers_released,
        stats.bytes_uploaded
    );

    Ok(())
}
