//! # 3D Camera System
//!
//! Provides the camera used to build [`ViewMatrices`] for a frame.
//!
//! ## Design Principles
//! - **Library-agnostic**: No device dependencies in camera math
//! - **Immutable operation**: Methods don't modify camera state unexpectedly
//! - **W is depth**: Perspective projections put view-space depth in clip W,
//!   which screen-space sized sprites rely on

use crate::foundation::math::{Vec3, Mat4, Mat4Ext, utils};
use super::view::ViewMatrices;

/// How the camera projects view space onto the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Visible height in world units; width follows from the aspect ratio
        height: f32,
    },
}

/// 3D Camera for perspective and orthographic projections
///
/// # Coordinate System
/// World space is right-handed Y-up. The view matrix includes the Vulkan
/// coordinate flip, so view space is X right, Y down, Z forward and clip W is
/// positive in front of the camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Projection mode
    pub projection: ProjectionMode,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera with standard Y-up orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Field of view angle in degrees (converted to radians internally)
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: ProjectionMode::Perspective {
                fov: utils::deg_to_rad(fov_degrees),
            },
            aspect,
            near,
            far,
        }
    }

    /// Create an orthographic camera showing `height` world units vertically
    pub fn orthographic(position: Vec3, height: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: ProjectionMode::Orthographic { height },
            aspect,
            near,
            far,
        }
    }

    /// Configure camera to look at a specific point with custom up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update camera aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-view matrix, including the Vulkan axis flip
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::vulkan_coordinate_transform() * Mat4::look_at(self.position, self.target, self.up)
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            ProjectionMode::Perspective { fov } => Mat4::perspective(fov, self.aspect, self.near, self.far),
            ProjectionMode::Orthographic { height } => {
                Mat4::orthographic(height * self.aspect, height, self.near, self.far)
            }
        }
    }

    /// Matrices for a scene view
    pub fn view_matrices(&self) -> ViewMatrices {
        ViewMatrices::new(self.view_matrix(), self.projection_matrix())
    }
}

impl Default for Camera {
    /// Perspective camera above and behind the origin, looking at it
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: ProjectionMode::Perspective {
                fov: std::f32::consts::FRAC_PI_4,
            },
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_origin_matches_position() {
        let camera = Camera::perspective(Vec3::new(0.0, 2.0, 5.0), 75.0, 16.0 / 9.0, 0.1, 100.0);
        let matrices = camera.view_matrices();
        assert_relative_eq!(matrices.view_origin(), camera.position, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_w_positive_in_front() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 60.0, 1.0, 0.1, 100.0);
        let clip = camera.view_matrices().view_projection_matrix().transform_homogeneous(&Vec3::zeros());
        assert_relative_eq!(clip.w, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_aspect_ratio_change_rescales_projection() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 60.0, 1.0, 0.1, 100.0);
        camera.set_aspect_ratio(2.0);
        let projection = camera.projection_matrix();
        assert_relative_eq!(projection[(1, 1)], 2.0 * projection[(0, 0)], epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_w_constant() {
        let camera = Camera::orthographic(Vec3::new(0.0, 0.0, 10.0), 8.0, 1.0, 0.1, 100.0);
        let clip = camera.view_matrices().view_projection_matrix().transform_homogeneous(&Vec3::zeros());
        assert_relative_eq!(clip.w, 1.0, epsilon = 1e-6);
    }
}
