//! Packed vertex formats
//!
//! Sprites use compact vertex data: tangents are stored as 8-bit normalized
//! vectors and colors as 8-bit BGRA.

use bytemuck::{Pod, Zeroable};

use crate::foundation::color::Color;
use crate::foundation::math::{Vec3, Vec4};

/// Unit vector packed into four bytes
///
/// Each component maps `[-1, 1]` onto `[0, 255]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct PackedNormal {
    /// X component
    pub x: u8,
    /// Y component
    pub y: u8,
    /// Z component
    pub z: u8,
    /// W component; the basis sign for tangent Z
    pub w: u8,
}

impl PackedNormal {
    /// Pack a direction with `w = 1`
    pub fn from_vec3(vector: &Vec3) -> Self {
        Self::from_vec4(&Vec4::new(vector.x, vector.y, vector.z, 1.0))
    }

    /// Pack all four components
    pub fn from_vec4(vector: &Vec4) -> Self {
        Self {
            x: pack_component(vector.x),
            y: pack_component(vector.y),
            z: pack_component(vector.z),
            w: pack_component(vector.w),
        }
    }

    /// Unpack the xyz components
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(unpack_component(self.x), unpack_component(self.y), unpack_component(self.z))
    }

    /// Unpack all four components
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(
            unpack_component(self.x),
            unpack_component(self.y),
            unpack_component(self.z),
            unpack_component(self.w),
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pack_component(value: f32) -> u8 {
    (value * 127.5 + 127.5).trunc().clamp(0.0, 255.0) as u8
}

fn unpack_component(value: u8) -> f32 {
    f32::from(value) / 127.5 - 1.0
}

/// Tangent frame stored as TangentX and TangentZ
///
/// TangentY is reconstructed in the shader as `cross(Z, X) * Z.w`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct PackedTangentBasis {
    /// Tangent
    pub tangent_x: PackedNormal,
    /// Normal, with the basis determinant sign in `w`
    pub tangent_z: PackedNormal,
}

impl PackedTangentBasis {
    /// Pack a full tangent frame
    pub fn from_basis(tangent_x: &Vec3, tangent_y: &Vec3, tangent_z: &Vec3) -> Self {
        let sign = basis_determinant_sign(tangent_x, tangent_y, tangent_z);
        Self {
            tangent_x: PackedNormal::from_vec3(tangent_x),
            tangent_z: PackedNormal::from_vec4(&Vec4::new(tangent_z.x, tangent_z.y, tangent_z.z, sign)),
        }
    }

    /// Sign stored with the normal, `1.0` or `-1.0`
    pub fn basis_sign(self) -> f32 {
        if self.tangent_z.w >= 128 {
            1.0
        } else {
            -1.0
        }
    }
}

fn basis_determinant_sign(x: &Vec3, y: &Vec3, z: &Vec3) -> f32 {
    if x.dot(&y.cross(z)) < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Interleaved layout of one sprite vertex
///
/// Matches the per-stream data written by the billboard proxy and sizes the
/// global placeholder vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialSpriteVertex {
    /// Local-space position
    pub position: [f32; 3],
    /// Packed tangent
    pub tangent_x: PackedNormal,
    /// Packed normal and basis sign
    pub tangent_z: PackedNormal,
    /// sRGB vertex color
    pub color: Color,
    /// Texture coordinates
    pub tex_coords: [f32; 2],
}
