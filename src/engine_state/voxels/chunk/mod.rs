//! # Chunk Module
//!
//! This module provides the `Section` struct: a dense 16x16x16 cube of block ids,
//! the unit of storage, visibility and render caching.
//!
//! ## Memory Layout
//!
//! A section stores one byte per cell in a flat array laid out column-major with
//! y varying fastest: `index = (x * 16 + z) * 16 + y`. Vertical scans (sky light)
//! walk contiguous memory, and every lookup is O(1).
//!
//! Next to the cells the section keeps a live count of non-air cells, so
//! `is_empty` is O(1) and empty sections can skip meshing and flood fill.

use cgmath::Point3;

use super::block::{BlockId, AIR};
use chunk_iteration::SectionBlockIterator;

pub mod chunk_creation;
pub mod chunk_iteration;

/// The dimension (width, height, depth) of a section in blocks.
pub const SECTION_DIMENSION: i32 = 16;
/// [`SECTION_DIMENSION`] as a `usize`, for indexing.
pub const SECTION_DIMENSION_USIZE: usize = SECTION_DIMENSION as usize;
/// The number of blocks in a single 2D plane of a section.
pub const SECTION_PLANE_SIZE: usize = SECTION_DIMENSION_USIZE * SECTION_DIMENSION_USIZE;
/// The total number of blocks in a section.
pub const SECTION_SIZE: usize = SECTION_PLANE_SIZE * SECTION_DIMENSION_USIZE;

/// A 16x16x16 block of voxel data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Block ids in local index order, see [`Section::local_index`].
    blocks: Box<[BlockId]>,
    /// Number of cells whose id is not [`AIR`].
    non_air_count: u32,
}

impl Section {
    /// Creates a section filled with air.
    pub fn empty() -> Self {
        Section {
            blocks: vec![AIR; SECTION_SIZE].into_boxed_slice(),
            non_air_count: 0,
        }
    }

    /// Converts local coordinates into an index into the cell array.
    ///
    /// # Panics
    /// Debug builds panic if a coordinate is not below [`SECTION_DIMENSION`].
    #[inline]
    pub fn local_index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(
            x < SECTION_DIMENSION_USIZE && y < SECTION_DIMENSION_USIZE && z < SECTION_DIMENSION_USIZE
        );
        (x * SECTION_DIMENSION_USIZE + z) * SECTION_DIMENSION_USIZE + y
    }

    /// Inverse of [`Section::local_index`].
    #[inline]
    pub fn local_position(index: usize) -> Point3<usize> {
        Point3::new(
            index / SECTION_PLANE_SIZE,
            index % SECTION_DIMENSION_USIZE,
            (index / SECTION_DIMENSION_USIZE) % SECTION_DIMENSION_USIZE,
        )
    }

    /// Gets the block id at local coordinates.
    #[inline]
    pub fn get_block_id(&self, local: Point3<usize>) -> BlockId {
        self.blocks[Self::local_index(local.x, local.y, local.z)]
    }

    /// Gets the block id at a raw cell index.
    #[inline]
    pub fn get_block_id_at_index(&self, index: usize) -> BlockId {
        self.blocks[index]
    }

    /// Sets the block id at local coordinates and returns the previous id.
    ///
    /// The non-air count only moves when the air-ness of the cell changes.
    pub fn set_block_id(&mut self, local: Point3<usize>, id: BlockId) -> BlockId {
        let index = Self::local_index(local.x, local.y, local.z);
        let previous = self.blocks[index];
        if previous == id {
            return previous;
        }

        self.blocks[index] = id;
        match (previous == AIR, id == AIR) {
            (true, false) => self.non_air_count += 1,
            (false, true) => self.non_air_count -= 1,
            _ => {}
        }

        previous
    }

    /// Number of non-air cells.
    #[inline]
    pub fn non_air_count(&self) -> u32 {
        self.non_air_count
    }

    /// Whether every cell is air.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.non_air_count == 0
    }

    /// Iterates all non-air cells with their local position.
    pub fn blocks(&self) -> SectionBlockIterator<'_> {
        SectionBlockIterator::new(self)
    }

    /// Raw access to the cell array, in local index order.
    pub(crate) fn raw_blocks(&self) -> &[BlockId] {
        &self.blocks
    }
}
