//! Core rendering primitives
//!
//! Camera and per-view descriptions handed to scene proxies each frame.

pub mod camera;
pub mod view;

pub use camera::{Camera, ProjectionMode};
pub use view::{EngineShowFlags, FeatureLevel, SceneView, SceneViewFamily, ViewMatrices};
