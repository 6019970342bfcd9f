//! Linear and packed colors
//!
//! `LinearColor` is what gameplay code and curves work with; `Color` is the
//! 8-bit BGRA layout written into vertex color streams.

use bytemuck::{Pod, Zeroable};

/// Floating point RGBA color in linear space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearColor {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl LinearColor {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from its channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Copy of this color with a different alpha
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Quantize to 8 bits per channel.
    ///
    /// With `srgb` set the color channels are gamma encoded; alpha always stays linear.
    pub fn to_color(self, srgb: bool) -> Color {
        let encode = |channel: f32| {
            let channel = channel.clamp(0.0, 1.0);
            if !srgb {
                channel
            } else if channel <= 0.003_130_8 {
                channel * 12.92
            } else {
                1.055 * channel.powf(1.0 / 2.4) - 0.055
            }
        };

        Color {
            b: quantize(encode(self.b)),
            g: quantize(encode(self.g)),
            r: quantize(encode(self.r)),
            a: quantize(self.a.clamp(0.0, 1.0)),
        }
    }
}

impl Default for LinearColor {
    fn default() -> Self {
        Self::WHITE
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(unit: f32) -> u8 {
    (unit * 255.999).floor() as u8
}

/// 8-bit BGRA color as stored in vertex buffers
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    /// Blue channel
    pub b: u8,
    /// Green channel
    pub g: u8,
    /// Red channel
    pub r: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self { b: 255, g: 255, r: 255, a: 255 };

    /// Alpha as a unit float
    pub fn alpha_unit(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}
