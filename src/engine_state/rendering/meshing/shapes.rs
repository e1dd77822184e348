//! Geometry emitted by each block shape.
//!
//! Box-like shapes (cubes, slabs, liquids) emit up to six axis-aligned faces
//! and cull each face against the neighbor across it. Cross shapes emit two
//! diagonal, double sided planes and are never culled.

use cgmath::Point3;

use crate::engine_state::voxels::block::{
    block_shape::{BlockShape, Occlusion},
    block_side::BlockSide,
    BlockId,
};

use super::context::MeshContext;
use super::mesh::{box_face_corners, Quad, SectionMeshBuilder};

/// Light multiplier for faces that look into a shadowed cell.
pub const SHADOW_FACTOR: f32 = 0.6;

/// Height of a slab.
const SLAB_HEIGHT: f32 = 0.5;

/// Surface height of a liquid with nothing of its kind above it.
const LIQUID_HEIGHT: f32 = 14.0 / 16.0;

/// Brightness of a face by direction.
pub fn face_shade(side: BlockSide) -> f32 {
    match side {
        BlockSide::TOP => 1.0,
        BlockSide::FRONT | BlockSide::BACK => 0.8,
        BlockSide::LEFT | BlockSide::RIGHT => 0.6,
        BlockSide::BOTTOM => 0.5,
    }
}

/// Light multiplier for a face looking into a lit or shadowed cell.
#[inline]
fn light_factor(lit: bool) -> f32 {
    if lit {
        1.0
    } else {
        SHADOW_FACTOR
    }
}

impl BlockShape {
    /// Emits the geometry of one block into `builder`.
    ///
    /// # Arguments
    /// * `ctx` - The world around the section being meshed
    /// * `local` - Position of the block inside the section
    /// * `id` - The block's id
    /// * `builder` - Receives the emitted quads
    pub fn mesh(
        self,
        ctx: &MeshContext,
        local: Point3<usize>,
        id: BlockId,
        builder: &mut SectionMeshBuilder,
    ) {
        let cell = Point3::new(local.x as i32, local.y as i32, local.z as i32);

        match self {
            BlockShape::Air => {}
            BlockShape::Cube | BlockShape::TranslucentCube => {
                mesh_box(self, ctx, cell, id, 1.0, builder)
            }
            BlockShape::Slab => mesh_box(self, ctx, cell, id, SLAB_HEIGHT, builder),
            BlockShape::Liquid => {
                let above = ctx.get_surrounding_block(cell + BlockSide::TOP.offset());
                let height = if above == Some(id) { 1.0 } else { LIQUID_HEIGHT };
                mesh_box(self, ctx, cell, id, height, builder)
            }
            BlockShape::Cross => mesh_cross(ctx, cell, id, builder),
        }
    }

    /// Whether a face of this block is hidden by the block across it.
    fn is_face_hidden(self, ctx: &MeshContext, id: BlockId, neighbor: Point3<i32>, side: BlockSide) -> bool {
        match ctx.get_surrounding_block(neighbor) {
            None => false,
            Some(neighbor_id) => {
                ctx.registry().shape(neighbor_id).occlusion(side.opposite()) == Occlusion::Full
                    || (self.merges_with_self() && neighbor_id == id)
            }
        }
    }
}

/// Emits the faces of a box spanning the full cell footprint up to `height`.
fn mesh_box(
    shape: BlockShape,
    ctx: &MeshContext,
    cell: Point3<i32>,
    id: BlockId,
    height: f32,
    builder: &mut SectionMeshBuilder,
) {
    let definition = ctx.definition(id);
    let min = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);
    let max = Point3::new(min.x + 1.0, min.y + height, min.z + 1.0);
    let translucent = shape.is_translucent();

    for side in BlockSide::all() {
        let neighbor = cell + side.offset();

        // A lowered top face does not touch the cell above.
        let on_cell_boundary = side != BlockSide::TOP || height >= 1.0;
        if on_cell_boundary && shape.is_face_hidden(ctx, id, neighbor, side) {
            continue;
        }

        let uv_extent = match side {
            BlockSide::TOP | BlockSide::BOTTOM => (1.0, 1.0),
            _ => (1.0, height),
        };
        let shade = face_shade(side) * light_factor(ctx.is_lit(neighbor));

        builder.push(
            Quad::new(
                box_face_corners(side, min, max),
                definition.texture(side),
                uv_extent,
                shade,
            ),
            translucent,
        );
    }
}

/// Emits two diagonal planes, each visible from both sides.
fn mesh_cross(ctx: &MeshContext, cell: Point3<i32>, id: BlockId, builder: &mut SectionMeshBuilder) {
    let texture = ctx.definition(id).texture(BlockSide::FRONT);
    let shade = face_shade(BlockSide::FRONT) * light_factor(ctx.is_lit(cell));
    let (x, y, z) = (cell.x as f32, cell.y as f32, cell.z as f32);

    let diagonals = [
        [
            Point3::new(x, y, z),
            Point3::new(x + 1.0, y, z + 1.0),
            Point3::new(x, y + 1.0, z),
            Point3::new(x + 1.0, y + 1.0, z + 1.0),
        ],
        [
            Point3::new(x + 1.0, y, z),
            Point3::new(x, y, z + 1.0),
            Point3::new(x + 1.0, y + 1.0, z),
            Point3::new(x, y + 1.0, z + 1.0),
        ],
    ];

    for corners in diagonals {
        let quad = Quad::new(corners, texture, (1.0, 1.0), shade);
        builder.push(quad, false);
        builder.push(quad.flipped(), false);
    }
}
