//! Bounding volumes

use crate::foundation::math::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }
}

/// Box and sphere sharing one origin
///
/// Culling tests the cheap sphere first and the box second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSphereBounds {
    /// Center of both volumes
    pub origin: Vec3,
    /// Half-size of the box
    pub box_extent: Vec3,
    /// Radius of the sphere
    pub sphere_radius: f32,
}

impl BoxSphereBounds {
    /// Create bounds
    pub fn new(origin: Vec3, box_extent: Vec3, sphere_radius: f32) -> Self {
        Self { origin, box_extent, sphere_radius }
    }

    /// Bounds of a single point
    pub fn point(origin: Vec3) -> Self {
        Self::new(origin, Vec3::zeros(), 0.0)
    }

    /// The box as min/max corners
    pub fn to_aabb(&self) -> AABB {
        AABB::from_center_extents(self.origin, self.box_extent)
    }

    /// Whether `point` lies inside the sphere
    pub fn sphere_contains(&self, point: &Vec3) -> bool {
        (point - self.origin).norm_squared() <= self.sphere_radius * self.sphere_radius
    }
}

impl From<AABB> for BoxSphereBounds {
    fn from(aabb: AABB) -> Self {
        let box_extent = aabb.extents();
        Self::new(aabb.center(), box_extent, box_extent.norm())
    }
}
