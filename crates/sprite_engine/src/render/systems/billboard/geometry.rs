//! Camera-facing sprite geometry
//!
//! Builds the four corners of a sprite quad in the billboard's local space.
//! The quad spans the camera's view plane, so it faces the camera no matter
//! how the billboard itself is rotated; the vertex factory later applies the
//! local-to-world transform.
//!
//! Corners are ordered for a two-triangle strip:
//!
//! ```text
//! 0 ---- 1
//! |    / |
//! |  /   |
//! 2 ---- 3
//! ```

use crate::foundation::color::LinearColor;
use crate::foundation::math::{constants, Mat4, Mat4Ext, Vec2, Vec3};
use crate::render::primitives::ViewMatrices;
use crate::render::resources::buffers::StaticMeshVertexData;

use super::types::MaterialSpriteElement;

/// Vertices per sprite quad
pub const VERTICES_PER_SPRITE: usize = 4;

/// Texture coordinates of corners 0 to 3
pub const SPRITE_UVS: [[f32; 2]; VERTICES_PER_SPRITE] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

/// Per-view quantities shared by every element of one billboard
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteViewBasis {
    /// Billboard origin in world space
    pub world_pivot: Vec3,
    /// Camera position in world space
    pub view_origin: Vec3,
    /// Camera to pivot distance; drives both the size and the opacity curves
    pub distance_to_pivot: f32,
    /// Clip-space X axis in world space
    pub camera_up: Vec3,
    /// Clip-space Y axis in world space
    pub camera_right: Vec3,
    /// View X axis in billboard local space, negated
    pub tangent_x: Vec3,
    /// View Y axis in billboard local space, negated
    pub tangent_y: Vec3,
    /// View Z axis in billboard local space, negated
    pub tangent_z: Vec3,
    /// Clip W of the pivot; view depth for perspective projections
    pub w: f32,
}

impl SpriteViewBasis {
    /// Derive the basis of one view for a billboard at `local_to_world`
    pub fn new(view_matrices: &ViewMatrices, local_to_world: &Mat4) -> Self {
        let world_pivot = local_to_world.origin();
        let view_origin = view_matrices.view_origin();

        let inv_view_projection = view_matrices.inv_view_projection_matrix();
        let camera_up = -inv_view_projection.transform_direction(&Vec3::x());
        let camera_right = -inv_view_projection.transform_direction(&Vec3::y());

        let world_to_local = local_to_world.try_inverse().unwrap_or_else(|| {
            log::warn!("Singular billboard transform, generating sprites in world space");
            Mat4::identity()
        });
        let view_to_local = world_to_local * view_matrices.inv_view_matrix();

        Self {
            world_pivot,
            view_origin,
            distance_to_pivot: (view_origin - world_pivot).norm(),
            camera_up,
            camera_right,
            tangent_x: -view_to_local.transform_direction(&Vec3::x()),
            tangent_y: -view_to_local.transform_direction(&Vec3::y()),
            tangent_z: -view_to_local.transform_direction(&Vec3::z()),
            w: view_matrices.view_projection_matrix().transform_homogeneous(&world_pivot).w,
        }
    }

    /// Screen width over height in world units at unit depth
    pub fn aspect_ratio(&self) -> f32 {
        self.camera_right.norm() / self.camera_up.norm()
    }
}

/// Geometry of one element in one view
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteGeometry {
    /// Local-space corners, strip order
    pub positions: [Vec3; VERTICES_PER_SPRITE],
    /// Vertex tangent
    pub tangent_x: Vec3,
    /// Vertex bitangent
    pub tangent_y: Vec3,
    /// Vertex normal
    pub tangent_z: Vec3,
    /// Vertex color after the opacity curve
    pub color: LinearColor,
    /// Corner texture coordinates
    pub uvs: [Vec2; VERTICES_PER_SPRITE],
    /// Size curve multiplier
    pub scale_factor: f32,
    /// Base size times the size curve
    pub scaled_size: Vec2,
    /// Half-size in world units
    pub world_size: Vec2,
    /// Offset applied to every corner
    pub vertical_offset: Vec3,
}

/// Build the quad for `element` as seen through `basis`
///
/// Degenerate inputs are not corrected: zero sizes produce a zero-area quad,
/// and a pivot behind a perspective camera (`w <= 0`) collapses or inverts
/// screen-space sprites.
pub fn generate_sprite_geometry(
    basis: &SpriteViewBasis,
    element: &MaterialSpriteElement,
    pivot_offset_z: f32,
    base_color: LinearColor,
) -> SpriteGeometry {
    let scale_factor = element
        .distance_to_size_curve
        .as_ref()
        .map_or(1.0, |curve| curve.evaluate(basis.distance_to_pivot));
    let scaled_size = Vec2::new(element.base_size_x, element.base_size_y) * scale_factor;

    let (world_size, depth_scale) = if element.size_is_in_screen_space {
        (
            Vec2::new(scaled_size.x * basis.w, scaled_size.y * basis.aspect_ratio() * basis.w),
            basis.w,
        )
    } else {
        (scaled_size, 1.0)
    };

    let vertical_direction = basis
        .tangent_y
        .try_normalize(constants::SMALL_NUMBER)
        .unwrap_or_else(Vec3::zeros);
    let vertical_offset = vertical_direction * pivot_offset_z * scale_factor * depth_scale;

    let along_x = basis.tangent_y * world_size.x;
    let along_y = basis.tangent_x * world_size.y;
    let positions = [
        -along_x + along_y + vertical_offset,
        along_x + along_y + vertical_offset,
        -along_x - along_y + vertical_offset,
        along_x - along_y + vertical_offset,
    ];

    let opacity = element
        .distance_to_opacity_curve
        .as_ref()
        .map_or(1.0, |curve| curve.evaluate(basis.distance_to_pivot));

    SpriteGeometry {
        positions,
        // Flipped X keeps the shading normal facing the camera
        tangent_x: -basis.tangent_x,
        tangent_y: basis.tangent_y,
        tangent_z: basis.tangent_z,
        color: base_color.with_alpha(base_color.a * opacity),
        uvs: SPRITE_UVS.map(|[u, v]| Vec2::new(u, v)),
        scale_factor,
        scaled_size,
        world_size,
        vertical_offset,
    }
}

/// First vertex of `element_index` in `view_index`
pub fn sprite_write_offset(view_index: usize, element_index: usize, num_elements: usize) -> usize {
    VERTICES_PER_SPRITE * num_elements * view_index + VERTICES_PER_SPRITE * element_index
}

/// Write the four vertices of `geometry` starting at `offset`
pub fn write_sprite_vertices(data: &mut StaticMeshVertexData, offset: usize, geometry: &SpriteGeometry) {
    let color = geometry.color.to_color(true);
    for (corner, (position, uv)) in geometry.positions.iter().zip(&geometry.uvs).enumerate() {
        let index = offset + corner;
        data.set_position(index, position);
        data.set_tangents(index, &geometry.tangent_x, &geometry.tangent_y, &geometry.tangent_z);
        data.set_tex_coord(index, uv);
        data.set_color(index, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use approx::assert_relative_eq;

    fn perspective_view() -> ViewMatrices {
        ViewMatrices::new(
            Mat4::identity(),
            Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0),
        )
    }

    fn basis_at(pivot: Vec3) -> SpriteViewBasis {
        SpriteViewBasis::new(&perspective_view(), &Transform::from_position(pivot).to_matrix())
    }

    #[test]
    fn test_basis_for_camera_at_origin() {
        let basis = basis_at(Vec3::new(0.0, 0.0, 3.0));

        assert_relative_eq!(basis.distance_to_pivot, 3.0);
        assert_relative_eq!(basis.w, 3.0, epsilon = 1e-5);
        assert_relative_eq!(basis.aspect_ratio(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(basis.tangent_x, -Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(basis.tangent_y, -Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(basis.tangent_z, -Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_corner_layout() {
        let basis = basis_at(Vec3::new(0.0, 0.0, 3.0));
        let element = MaterialSpriteElement::default().with_size(2.0, 1.0);
        let geometry = generate_sprite_geometry(&basis, &element, 0.0, LinearColor::WHITE);

        // X size runs along tangent Y, Y size along tangent X
        assert_relative_eq!(geometry.positions[0], Vec3::new(-1.0, 2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(geometry.positions[1], Vec3::new(-1.0, -2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(geometry.positions[2], Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(geometry.positions[3], Vec3::new(1.0, -2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(geometry.tangent_x, Vec3::x(), epsilon = 1e-6);
        assert_eq!(geometry.uvs[1], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_vertical_offset_follows_tangent_y() {
        let basis = basis_at(Vec3::new(0.0, 0.0, 3.0));
        let element = MaterialSpriteElement::default().with_size(0.0, 0.0);
        let geometry = generate_sprite_geometry(&basis, &element, 5.0, LinearColor::WHITE);

        assert_relative_eq!(geometry.vertical_offset, Vec3::new(0.0, -5.0, 0.0), epsilon = 1e-6);
        for corner in geometry.positions {
            assert_relative_eq!(corner, geometry.vertical_offset, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_screen_space_height_uses_aspect_ratio() {
        let view = ViewMatrices::new(
            Mat4::identity(),
            Mat4::perspective(std::f32::consts::FRAC_PI_2, 2.0, 0.1, 100.0),
        );
        let basis = SpriteViewBasis::new(&view, &Transform::from_position(Vec3::new(0.0, 0.0, 4.0)).to_matrix());
        let element = MaterialSpriteElement::default().with_size(1.0, 1.0).in_screen_space();
        let geometry = generate_sprite_geometry(&basis, &element, 0.0, LinearColor::WHITE);

        assert_relative_eq!(basis.aspect_ratio(), 0.5, epsilon = 1e-5);
        assert_relative_eq!(geometry.world_size, Vec2::new(4.0, 2.0), epsilon = 1e-4);
    }

    #[test]
    fn test_camera_at_pivot_is_finite() {
        let basis = basis_at(Vec3::zeros());
        let element = MaterialSpriteElement::default().in_screen_space();
        let geometry = generate_sprite_geometry(&basis, &element, 1.0, LinearColor::WHITE);

        assert_relative_eq!(basis.w, 0.0);
        assert!(geometry.positions.iter().all(|corner| corner.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_write_offsets_are_disjoint() {
        assert_eq!(sprite_write_offset(0, 0, 3), 0);
        assert_eq!(sprite_write_offset(0, 2, 3), 8);
        assert_eq!(sprite_write_offset(1, 0, 3), 12);
        assert_eq!(sprite_write_offset(2, 1, 3), 28);
    }
}
