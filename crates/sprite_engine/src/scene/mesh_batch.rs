//! Mesh batches and the per-frame collector
//!
//! Dynamic primitives describe what to draw each frame as `MeshBatch`es and
//! hand them to a `MeshElementCollector`, which keeps one list per view in
//! submission order.

use crate::render::resources::buffers::SharedVertexFactory;
use crate::render::resources::materials::MaterialRenderProxy;

/// Topology of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Independent triangles, three vertices each
    TriangleList,
    /// Each vertex after the second forms a triangle with the two before it
    TriangleStrip,
}

impl PrimitiveType {
    /// Vertices consumed by `num_primitives` primitives
    pub fn vertex_count(self, num_primitives: u32) -> u32 {
        match self {
            Self::TriangleList => num_primitives * 3,
            Self::TriangleStrip if num_primitives == 0 => 0,
            Self::TriangleStrip => num_primitives + 2,
        }
    }
}

/// Depth layer a primitive is composited into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DepthPriorityGroup {
    /// Regular scene depth
    #[default]
    World,
    /// Drawn over the world, for editor widgets and similar
    Foreground,
}

/// Range of vertices one draw call reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshBatchElement {
    /// First index of an indexed draw
    pub first_index: u32,
    /// Lowest vertex referenced, relative to `base_vertex_index`
    pub min_vertex_index: u32,
    /// Highest vertex referenced, relative to `base_vertex_index`
    pub max_vertex_index: u32,
    /// Number of primitives
    pub num_primitives: u32,
    /// Offset added to every vertex index
    pub base_vertex_index: u32,
}

/// Draw description for one material on one vertex factory
#[derive(Debug, Clone)]
pub struct MeshBatch {
    /// Streams the draw reads
    pub vertex_factory: Option<SharedVertexFactory>,
    /// Material to shade with
    pub material_render_proxy: Option<MaterialRenderProxy>,
    /// Flip the winding used for culling
    pub reverse_culling: bool,
    /// Draw into shadow depth passes
    pub cast_shadow: bool,
    /// Depth layer
    pub depth_priority_group: DepthPriorityGroup,
    /// Topology
    pub primitive_type: PrimitiveType,
    /// Rasterize both faces
    pub disable_backface_culling: bool,
    /// Allow wireframe and other debug view modes to replace the material
    pub can_apply_view_mode_overrides: bool,
    /// Tint with the selection color in wireframe
    pub use_wireframe_selection_coloring: bool,
    /// Draw ranges; at least one
    pub elements: Vec<MeshBatchElement>,
}

impl Default for MeshBatch {
    fn default() -> Self {
        Self {
            vertex_factory: None,
            material_render_proxy: None,
            reverse_culling: false,
            cast_shadow: true,
            depth_priority_group: DepthPriorityGroup::World,
            primitive_type: PrimitiveType::TriangleList,
            disable_backface_culling: false,
            can_apply_view_mode_overrides: false,
            use_wireframe_selection_coloring: false,
            elements: vec![MeshBatchElement::default()],
        }
    }
}

impl MeshBatch {
    /// The first draw range
    pub fn first_element(&self) -> Option<&MeshBatchElement> {
        self.elements.first()
    }

    /// Mutable first draw range, created if missing
    pub fn first_element_mut(&mut self) -> &mut MeshBatchElement {
        if self.elements.is_empty() {
            self.elements.push(MeshBatchElement::default());
        }
        &mut self.elements[0]
    }
}

/// Collects the mesh batches produced for each view in a frame
#[derive(Debug)]
pub struct MeshElementCollector {
    batches: Vec<Vec<MeshBatch>>,
}

impl MeshElementCollector {
    /// Collector for `num_views` views
    pub fn new(num_views: usize) -> Self {
        Self {
            batches: (0..num_views).map(|_| Vec::new()).collect(),
        }
    }

    /// Number of views
    pub fn num_views(&self) -> usize {
        self.batches.len()
    }

    /// A fresh batch with default settings
    pub fn allocate_mesh(&self) -> MeshBatch {
        MeshBatch::default()
    }

    /// Append `batch` to the list of `view_index`
    pub fn add_mesh(&mut self, view_index: usize, batch: MeshBatch) {
        match self.batches.get_mut(view_index) {
            Some(batches) => batches.push(batch),
            None => log::warn!(
                "Dropping mesh batch for view {} (collector has {} views)",
                view_index,
                self.batches.len()
            ),
        }
    }

    /// Batches collected for a view, in submission order
    pub fn mesh_batches(&self, view_index: usize) -> &[MeshBatch] {
        self.batches.get(view_index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total batches over all views
    pub fn total_batches(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    /// Empty every view's list, keeping allocations
    pub fn clear(&mut self) {
        self.batches.iter_mut().for_each(Vec::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_kept_per_view_in_order() {
        let mut collector = MeshElementCollector::new(2);
        for base in [0, 4] {
            let mut batch = collector.allocate_mesh();
            batch.first_element_mut().base_vertex_index = base;
            collector.add_mesh(1, batch);
        }

        assert!(collector.mesh_batches(0).is_empty());
        let bases: Vec<u32> = collector
            .mesh_batches(1)
            .iter()
            .filter_map(|batch| batch.first_element().map(|element| element.base_vertex_index))
            .collect();
        assert_eq!(bases, vec![0, 4]);
    }

    #[test]
    fn test_unknown_view_is_dropped() {
        let mut collector = MeshElementCollector::new(1);
        collector.add_mesh(3, MeshBatch::default());
        assert_eq!(collector.total_batches(), 0);
        assert!(collector.mesh_batches(3).is_empty());
    }

    #[test]
    fn test_strip_vertex_count() {
        assert_eq!(PrimitiveType::TriangleStrip.vertex_count(2), 4);
        assert_eq!(PrimitiveType::TriangleList.vertex_count(2), 6);
    }
}
