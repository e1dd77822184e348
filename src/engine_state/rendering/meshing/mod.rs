//! Mesh generation for voxel sections.
//!
//! This module turns the blocks of one section into render geometry. Every
//! non-air block is handed to its shape, which emits quads into an opaque or a
//! translucent layer. Faces touching a neighbor that fully covers them are
//! skipped, including across section borders.
//!
//! # Architecture
//! - [`MeshContext`]: Read-only access to the section, its neighbors, light and the registry
//! - `shapes`: Per-shape geometry and face culling
//! - `mesh/`: Quads, layers and the builder collecting them
//!
//! # Shading
//! Each quad carries a single brightness: a per-direction constant multiplied
//! by [`SHADOW_FACTOR`] when the cell the face looks into is not reached by sky
//! light.

mod context;
pub mod mesh;
mod shapes;

pub use context::MeshContext;
pub use mesh::{
    sort_back_to_front, MeshLayer, Quad, SectionMesh, SectionMeshBuilder, MAX_LAYER_VERTICES,
};
pub use shapes::{face_shade, SHADOW_FACTOR};

use crate::error::Result;

/// Generates the mesh of the section described by `ctx`.
///
/// # Errors
/// [`crate::error::VoxelError::SectionMeshOverflow`] if a layer needs more
/// vertices than 16-bit indices can address.
pub fn generate_section_mesh(ctx: &MeshContext) -> Result<SectionMesh> {
    let section = ctx.section();
    if section.is_empty() {
        return Ok(SectionMesh::default());
    }

    let mut builder = SectionMeshBuilder::new(ctx.section_coord());
    for (local, id) in section.blocks() {
        ctx.registry().shape(id).mesh(ctx, local, id, &mut builder);
    }

    log::trace!(
        "Meshed section {:?}: {} quads",
        ctx.section_coord(),
        builder.quad_count()
    );

    builder.finish()
}
