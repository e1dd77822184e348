//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and [`FaceSet`], a compact
//! set over those faces. Block sides double as the six axis directions used by the
//! section flood fill and the render traversal.

use cgmath::Vector3;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Represents the six possible faces of a voxel block.
///
/// Each variant corresponds to a specific face and is assigned a unique integer value
/// so it can index per-face tables (textures, occlusion, shading).
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Converts a table index back into a side.
    ///
    /// # Returns
    /// `None` if `index` is not in `0..6`.
    pub fn from_index(index: usize) -> Option<BlockSide> {
        FromPrimitive::from_usize(index)
    }

    /// The side facing the opposite direction.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
        }
    }

    /// Unit step from a cell to its neighbor across this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }
}

/// A set of block sides stored in six bits.
///
/// Used both for "which faces has this flood fill touched" and for "which
/// directions lead back toward already visited territory" during traversal.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct FaceSet(u8);

impl FaceSet {
    const ALL_BITS: u8 = 0b11_1111;

    /// The empty set.
    pub const fn empty() -> Self {
        FaceSet(0)
    }

    /// The set holding all six sides.
    pub const fn all() -> Self {
        FaceSet(Self::ALL_BITS)
    }

    /// A set holding a single side.
    pub fn only(side: BlockSide) -> Self {
        FaceSet(1 << side as u8)
    }

    /// Adds a side to the set.
    pub fn add(&mut self, side: BlockSide) {
        self.0 |= 1 << side as u8;
    }

    /// Returns a copy of this set with `side` added.
    pub fn with(self, side: BlockSide) -> Self {
        FaceSet(self.0 | 1 << side as u8)
    }

    /// Whether `side` is in the set.
    pub fn contains(self, side: BlockSide) -> bool {
        self.0 & (1 << side as u8) != 0
    }

    /// Union of both sets.
    pub fn union(self, other: FaceSet) -> Self {
        FaceSet(self.0 | other.0)
    }

    /// Whether every side is present.
    pub fn is_all(self) -> bool {
        self.0 == Self::ALL_BITS
    }

    /// Whether no side is present.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Number of sides in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the contained sides in [`BlockSide::all`] order.
    pub fn iter(self) -> impl Iterator<Item = BlockSide> {
        BlockSide::all()
            .into_iter()
            .filter(move |side| self.contains(*side))
    }
}

impl std::fmt::Debug for FaceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
