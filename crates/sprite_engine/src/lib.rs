//! # Sprite Engine
//!
//! Camera-facing material billboards for a scene-proxy based renderer.
//!
//! ## Features
//!
//! - **Material Billboards**: Multi-layer sprites, one material per element
//! - **Distance Curves**: Size and opacity driven by camera distance
//! - **Screen-Space Sizing**: Constant apparent size regardless of depth
//! - **Render Thread**: FIFO command queue owning every GPU resource
//! - **Headless Device**: CPU-side device for tools and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sprite_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let render_thread = RenderThread::spawn(Box::new(HeadlessDevice::new()), &config.render_thread)?;
//!     let context = SceneContext::new(config.billboards.feature_level, render_thread.queue());
//!
//!     let mut billboard = MaterialBillboardComponent::new();
//!     let material: MaterialRef = Arc::new(SpriteMaterial::translucent(MaterialId(1)));
//!     billboard.add_element(Some(material), None, false, 32.0, 32.0, None);
//!
//!     let proxy = billboard.update_render_state(&context);
//!     let views = [SceneView::new(Camera::default().view_matrices(), SceneViewFamily::default())];
//!     let mut collector = MeshElementCollector::new(views.len());
//!     proxy.get_dynamic_mesh_elements(&views, 0b1, &mut collector);
//!
//!     drop(proxy);
//!     billboard.destroy_render_state();
//!
//!     render_thread.shutdown()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::curves::{CurveFloat, CurveRef, DistanceCurve},
        core::config::{ApplicationConfig, BillboardConfig, EngineConfig, RenderThreadConfig},
        config::{Config, ConfigError},
        foundation::{
            color::{Color, LinearColor},
            math::{Mat4, Mat4Ext, Transform, Vec2, Vec3},
        },
        render::{
            backend::{HeadlessDevice, RenderCommandQueue, RenderDevice, RenderThread},
            primitives::{Camera, EngineShowFlags, FeatureLevel, SceneView, SceneViewFamily, ViewMatrices},
            resources::materials::{MaterialId, MaterialInterface, MaterialRef, MaterialRelevance, SpriteMaterial},
            systems::billboard::{MaterialBillboardComponent, MaterialSpriteElement, MaterialSpriteSceneProxy},
        },
        scene::{
            BoxSphereBounds, MeshBatch, MeshElementCollector, PrimitiveSettings, PrimitiveViewRelevance,
            SceneContext, SceneProxy,
        },
    };
}
