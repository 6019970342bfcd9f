//! Per-view rendering description
//!
//! A `SceneView` is everything a scene proxy may know about one camera for one
//! frame: its matrices and the show flags of the view family it belongs to.
//! Split-screen, stereo and shadow passes each contribute their own view.

use serde::{Serialize, Deserialize};

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Hardware capability tier materials are compiled for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureLevel {
    /// Mobile tier
    Es31,
    /// Desktop tier
    #[default]
    Sm5,
    /// Desktop tier with ray tracing and mesh shaders
    Sm6,
}

bitflags::bitflags! {
    /// Engine show flags controlling which primitive categories a view draws
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EngineShowFlags: u32 {
        /// Camera-facing sprites and material billboards
        const BILLBOARD_SPRITES = 1 << 0;
        /// Wireframe view mode
        const WIREFRAME = 1 << 1;
        /// Translucent geometry
        const TRANSLUCENCY = 1 << 2;
        /// Dynamic shadows
        const DYNAMIC_SHADOWS = 1 << 3;
        /// Selection outline and coloring
        const SELECTION = 1 << 4;
    }
}

impl EngineShowFlags {
    /// Flags used by a shipping game view
    pub fn game() -> Self {
        Self::BILLBOARD_SPRITES | Self::TRANSLUCENCY | Self::DYNAMIC_SHADOWS
    }
}

impl Default for EngineShowFlags {
    fn default() -> Self {
        Self::game()
    }
}

/// View and projection matrices with their derived inverses
///
/// Inverses are computed once on construction; a singular matrix falls back to
/// identity so degenerate cameras still produce (meaningless) geometry instead
/// of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewMatrices {
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
    inv_view: Mat4,
    inv_view_projection: Mat4,
    view_origin: Vec3,
}

impl ViewMatrices {
    /// Build from a world-to-view and a view-to-clip matrix
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        let view_projection = projection * view;
        let inv_view = view.try_inverse().unwrap_or_else(|| {
            log::warn!("Singular view matrix, using identity inverse");
            Mat4::identity()
        });
        let inv_view_projection = view_projection.try_inverse().unwrap_or_else(|| {
            log::warn!("Singular view-projection matrix, using identity inverse");
            Mat4::identity()
        });

        Self {
            view,
            projection,
            view_projection,
            inv_view,
            inv_view_projection,
            view_origin: inv_view.origin(),
        }
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// World-to-clip matrix
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection
    }

    /// View-to-world matrix
    pub fn inv_view_matrix(&self) -> &Mat4 {
        &self.inv_view
    }

    /// Clip-to-world matrix
    pub fn inv_view_projection_matrix(&self) -> &Mat4 {
        &self.inv_view_projection
    }

    /// Camera position in world space
    pub fn view_origin(&self) -> Vec3 {
        self.view_origin
    }
}

/// Settings shared by every view rendered in the same frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneViewFamily {
    /// Show flags for the family
    pub engine_show_flags: EngineShowFlags,
    /// Feature level the family renders at
    pub feature_level: FeatureLevel,
}

impl SceneViewFamily {
    /// Create a family with explicit show flags
    pub fn with_show_flags(engine_show_flags: EngineShowFlags) -> Self {
        Self {
            engine_show_flags,
            ..Default::default()
        }
    }
}

/// One camera's view of the scene for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneView {
    /// Camera matrices
    pub view_matrices: ViewMatrices,
    /// Owning view family
    pub family: SceneViewFamily,
}

impl SceneView {
    /// Create a view
    pub fn new(view_matrices: ViewMatrices, family: SceneViewFamily) -> Self {
        Self { view_matrices, family }
    }

    /// Whether the family shows the given category
    pub fn shows(&self, flags: EngineShowFlags) -> bool {
        self.family.engine_show_flags.contains(flags)
    }
}
