//! Billboard data structures

use crate::assets::curves::CurveRef;
use crate::render::resources::materials::MaterialRef;

/// One renderable layer of a material billboard
///
/// Elements draw in array order, so later elements land on top of earlier ones.
#[derive(Debug, Clone)]
pub struct MaterialSpriteElement {
    /// Material to draw with; elements without one are skipped
    pub material: Option<MaterialRef>,

    /// Opacity multiplier as a function of camera distance
    pub distance_to_opacity_curve: Option<CurveRef>,

    /// Interpret sizes as fractions of the screen instead of world units
    pub size_is_in_screen_space: bool,

    /// Horizontal half-size before scaling
    pub base_size_x: f32,

    /// Vertical half-size before scaling
    pub base_size_y: f32,

    /// Size multiplier as a function of camera distance
    pub distance_to_size_curve: Option<CurveRef>,
}

impl Default for MaterialSpriteElement {
    fn default() -> Self {
        Self {
            material: None,
            distance_to_opacity_curve: None,
            size_is_in_screen_space: false,
            base_size_x: 32.0,
            base_size_y: 32.0,
            distance_to_size_curve: None,
        }
    }
}

impl MaterialSpriteElement {
    /// Create an element drawn with `material` at the default size
    pub fn new(material: Option<MaterialRef>) -> Self {
        Self {
            material,
            ..Default::default()
        }
    }

    /// Set the base half-sizes
    pub fn with_size(mut self, base_size_x: f32, base_size_y: f32) -> Self {
        self.base_size_x = base_size_x;
        self.base_size_y = base_size_y;
        self
    }

    /// Size in screen space
    pub fn in_screen_space(mut self) -> Self {
        self.size_is_in_screen_space = true;
        self
    }

    /// Drive opacity from camera distance
    pub fn with_opacity_curve(mut self, curve: CurveRef) -> Self {
        self.distance_to_opacity_curve = Some(curve);
        self
    }

    /// Drive size from camera distance
    pub fn with_size_curve(mut self, curve: CurveRef) -> Self {
        self.distance_to_size_curve = Some(curve);
        self
    }
}
