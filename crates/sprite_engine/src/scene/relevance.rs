//! Per-view primitive relevance

/// Which passes of a view a primitive takes part in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveViewRelevance {
    /// Drawn at all in this view
    pub draw_relevance: bool,
    /// Geometry is produced per frame through dynamic mesh elements
    pub dynamic_relevance: bool,
    /// Geometry is cached in static draw lists
    pub static_relevance: bool,
    /// Casts shadows in this view
    pub shadow_relevance: bool,
    /// Writes velocity
    pub velocity_relevance: bool,
    /// Drawn in the main pass rather than only in depth or shadow passes
    pub render_in_main_pass: bool,
    /// Has opaque materials
    pub opaque: bool,
    /// Has masked materials
    pub masked: bool,
    /// Has translucent materials
    pub translucency: bool,
    /// Has materials in the separate translucency pass
    pub separate_translucency: bool,
    /// Has distortion materials
    pub distortion: bool,
    /// Has materials writing velocity
    pub outputs_velocity: bool,
}

impl Default for PrimitiveViewRelevance {
    fn default() -> Self {
        Self {
            draw_relevance: false,
            dynamic_relevance: false,
            static_relevance: false,
            shadow_relevance: false,
            velocity_relevance: false,
            render_in_main_pass: true,
            opaque: false,
            masked: false,
            translucency: false,
            separate_translucency: false,
            distortion: false,
            outputs_velocity: false,
        }
    }
}
