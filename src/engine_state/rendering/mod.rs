//! Rendering system for the voxel engine.
//!
//! This module decides what to draw and produces the geometry for it, without
//! touching any GPU API. A GPU layer consumes the [`RenderList`] each frame:
//! it performs the listed uploads from the per-section caches, then draws the
//! opaque sections followed by the translucent ones, offsetting each section by
//! its origin.
//!
//! # Architecture
//! - `visibility`: Face-to-face connectivity of sections, by flood fill
//! - `meshing`: Section geometry generation
//! - `render_data`: Per-section caches and invalidation
//! - `traversal`: The per-frame visibility search and meshing budget
//! - `vertex`: The vertex format

pub mod meshing;
pub mod render_data;
pub mod traversal;
mod vertex;
pub mod visibility;

// Re-export commonly used types
pub use render_data::{SectionRenderData, WorldRenderData};
pub use traversal::{MeshUpload, RenderLayer, RenderList, TraversalStats, WorldRenderer};
pub use vertex::Vertex;
pub use visibility::{SectionFloodFill, SectionVisibility};
