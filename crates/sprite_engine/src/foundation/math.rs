//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics and sprite generation.
//! All matrices use nalgebra's column-vector convention: `M * v`.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Replace the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Largest absolute scale along any axis
    pub fn maximum_axis_scale(&self) -> f32 {
        self.scale.abs().max()
    }
}

/// Math constants
pub mod constants {
    /// Half of the largest representable world extent.
    ///
    /// Used as an "unbounded" radius for primitives whose size depends on the view.
    pub const HALF_WORLD_MAX: f32 = 1_048_576.0;

    /// Tolerance below which a vector is treated as zero length
    pub const SMALL_NUMBER: f32 = 1.0e-8;
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix
    ///
    /// The fourth row copies view-space depth into W, so `W` is positive in
    /// front of the camera.
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix covering `width` x `height` view units
    fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Mat4;

    /// Create a look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Create the intermediate coordinate system transformation for Vulkan
    fn vulkan_coordinate_transform() -> Mat4;

    /// Transform a direction (w = 0), ignoring translation and projection
    fn transform_direction(&self, direction: &Vec3) -> Vec3;

    /// Transform a position (w = 1) and return the full homogeneous result without dividing
    fn transform_homogeneous(&self, position: &Vec3) -> Vec4;

    /// Translation component
    fn origin(&self) -> Vec3;

    /// Determinant of the upper 3x3 basis
    fn basis_determinant(&self) -> f32;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // P = [a⁻¹/tan(φ/2)    0              0                    0           ]
        //     [0               1/tan(φ/2)     0                    0           ]
        //     [0               0              f/(f-n)              -nf/(f-n)   ]
        //     [0               0              1                    0           ]
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;

        result
    }

    fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        let mut result = Mat4::identity();
        result[(0, 0)] = 2.0 / width;
        result[(1, 1)] = 2.0 / height;
        result[(2, 2)] = 1.0 / (far - near);
        result[(2, 3)] = -near / (far - near);
        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        // Right-handed look-at, camera looks down -Z
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn vulkan_coordinate_transform() -> Mat4 {
        // Flips Y and Z: Y-down, Z into the screen
        Mat4::new(
            1.0,  0.0,  0.0, 0.0,
            0.0, -1.0,  0.0, 0.0,
            0.0,  0.0, -1.0, 0.0,
            0.0,  0.0,  0.0, 1.0,
        )
    }

    fn transform_direction(&self, direction: &Vec3) -> Vec3 {
        (self * Vec4::new(direction.x, direction.y, direction.z, 0.0)).xyz()
    }

    fn transform_homogeneous(&self, position: &Vec3) -> Vec4 {
        self * Vec4::new(position.x, position.y, position.z, 1.0)
    }

    fn origin(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }

    fn basis_determinant(&self) -> f32 {
        Mat3::new(
            self[(0, 0)], self[(0, 1)], self[(0, 2)],
            self[(1, 0)], self[(1, 1)], self[(1, 2)],
            self[(2, 0)], self[(2, 1)], self[(2, 2)],
        )
        .determinant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_maximum_axis_scale_uses_magnitude() {
        let transform = Transform::identity().with_scale(Vec3::new(2.0, -5.0, 3.0));
        assert_relative_eq!(transform.maximum_axis_scale(), 5.0);
    }

    #[test]
    fn test_transform_direction_ignores_translation() {
        let matrix = Transform::from_position(Vec3::new(10.0, 20.0, 30.0)).to_matrix();
        let direction = matrix.transform_direction(&Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(direction, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(matrix.origin(), Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_perspective_w_is_view_depth() {
        let projection = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let clip = projection.transform_homogeneous(&Vec3::new(1.0, 2.0, 7.5));
        assert_relative_eq!(clip.w, 7.5);
    }

    #[test]
    fn test_orthographic_w_is_one() {
        let projection = Mat4::orthographic(20.0, 10.0, 0.1, 100.0);
        let clip = projection.transform_homogeneous(&Vec3::new(1.0, 2.0, 50.0));
        assert_relative_eq!(clip.w, 1.0);
    }

    #[test]
    fn test_mirrored_transform_has_negative_determinant() {
        let mirrored = Transform::identity().with_scale(Vec3::new(-1.0, 1.0, 1.0)).to_matrix();
        assert!(mirrored.basis_determinant() < 0.0);
        assert!(Mat4::identity().basis_determinant() > 0.0);
    }
}
