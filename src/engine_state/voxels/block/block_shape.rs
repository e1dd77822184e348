//! # Block Shape Module
//!
//! A closed set of block shapes. Each shape decides how it occludes its
//! neighbors, whether it blocks sky light, and which render layer its faces
//! belong to. The geometry each shape emits lives with the mesher, see
//! `rendering::meshing::shapes`.

use serde::Deserialize;

use super::block_side::BlockSide;

/// How much of a face a block covers, as seen from the neighbor sharing it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Occlusion {
    /// Nothing is covered; light and sight pass.
    None,
    /// Part of the face is covered (slab sides). Neighbors still draw their face.
    Half,
    /// The whole face is covered. Neighbor faces against it are culled.
    Full,
}

/// The geometric shape of a block type.
///
/// Configuration names shapes in snake case (`"translucent_cube"`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockShape {
    /// Empty space.
    Air,
    /// A full opaque cube.
    Cube,
    /// A full cube drawn in the translucent layer (glass, ice).
    TranslucentCube,
    /// The bottom half of a cube.
    Slab,
    /// Two crossed diagonal quads (plants).
    Cross,
    /// A translucent fluid with a slightly lowered surface.
    Liquid,
}

impl BlockShape {
    /// Occlusion classification of the given face of this shape.
    pub fn occlusion(self, side: BlockSide) -> Occlusion {
        match self {
            BlockShape::Cube => Occlusion::Full,
            BlockShape::Slab => match side {
                BlockSide::BOTTOM => Occlusion::Full,
                BlockSide::TOP => Occlusion::None,
                _ => Occlusion::Half,
            },
            BlockShape::Air
            | BlockShape::TranslucentCube
            | BlockShape::Cross
            | BlockShape::Liquid => Occlusion::None,
        }
    }

    /// Whether this face stops the section flood fill.
    #[inline]
    pub fn fully_occludes(self, side: BlockSide) -> bool {
        self.occlusion(side) == Occlusion::Full
    }

    /// Whether sky light stops at this block.
    pub fn blocks_light(self) -> bool {
        matches!(self, BlockShape::Cube)
    }

    /// Whether the faces of this shape go into the translucent layer.
    pub fn is_translucent(self) -> bool {
        matches!(self, BlockShape::TranslucentCube | BlockShape::Liquid)
    }

    /// Whether faces against another block of the same id are hidden.
    pub fn merges_with_self(self) -> bool {
        matches!(self, BlockShape::TranslucentCube | BlockShape::Liquid)
    }
}
