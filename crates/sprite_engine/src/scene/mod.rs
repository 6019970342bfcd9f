//! Scene-side rendering interfaces
//!
//! What the renderer needs from a primitive: bounds, per-view relevance, the
//! mesh batches it draws, and the base capabilities every scene proxy shares.

pub mod bounds;
pub mod mesh_batch;
pub mod proxy;
pub mod relevance;

pub use bounds::{BoxSphereBounds, AABB};
pub use mesh_batch::{DepthPriorityGroup, MeshBatch, MeshBatchElement, MeshElementCollector, PrimitiveType};
pub use proxy::{PrimitiveSceneProxyData, PrimitiveSettings, SceneContext, SceneProxy, SceneProxyBase};
pub use relevance::PrimitiveViewRelevance;
