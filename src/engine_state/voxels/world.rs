//! # World Module
//!
//! This module provides the `VoxelGrid` struct, the dense block storage of a
//! bounded world.
//!
//! ## Architecture
//!
//! The world is a fixed box of sections kept in one flat arena. A section at
//! section coordinate `(x, y, z)` lives at index `x + z * nx + y * nx * nz`, and
//! the render data cache uses the same indexing so per-section state lines up
//! without any map lookups.
//!
//! World block coordinates are split into a section coordinate and a local
//! offset with euclidean division, so every in-bounds block resolves to exactly
//! one section and one cell. Reads outside the world return `None`; writes
//! outside the world are rejected with [`VoxelError::OutOfBounds`].

use cgmath::{Point3, Vector3};

use crate::error::{Result, VoxelError};

use super::block::BlockId;
use super::chunk::{chunk_creation, Section, SECTION_DIMENSION, SECTION_DIMENSION_USIZE};

/// Splits a world block position into its section coordinate and local offset.
#[inline]
pub fn split_block_position(position: Point3<i32>) -> (Point3<i32>, Point3<usize>) {
    let section = Point3::new(
        position.x.div_euclid(SECTION_DIMENSION),
        position.y.div_euclid(SECTION_DIMENSION),
        position.z.div_euclid(SECTION_DIMENSION),
    );
    let local = Point3::new(
        position.x.rem_euclid(SECTION_DIMENSION) as usize,
        position.y.rem_euclid(SECTION_DIMENSION) as usize,
        position.z.rem_euclid(SECTION_DIMENSION) as usize,
    );
    (section, local)
}

/// World block position of a section's minimum corner. This is also the
/// per-section offset the GPU layer applies to section-local vertices.
#[inline]
pub fn section_origin(section: Point3<i32>) -> Point3<i32> {
    section * SECTION_DIMENSION
}

/// Arena index of a section in a box of `section_counts` sections, laid out as
/// `x + z * nx + y * nx * nz`. `None` if the section lies outside the box.
#[inline]
pub fn section_arena_index(section_counts: Vector3<usize>, section: Point3<i32>) -> Option<usize> {
    if section.x < 0
        || section.y < 0
        || section.z < 0
        || section.x as usize >= section_counts.x
        || section.y as usize >= section_counts.y
        || section.z as usize >= section_counts.z
    {
        return None;
    }

    Some(
        section.x as usize
            + section.z as usize * section_counts.x
            + section.y as usize * section_counts.x * section_counts.z,
    )
}

/// Dense, bounded voxel storage partitioned into sections.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    /// Sections in arena order.
    sections: Vec<Section>,
    /// Number of sections along each axis.
    section_counts: Vector3<usize>,
}

impl VoxelGrid {
    /// Creates an all-air world with the given number of sections per axis.
    pub fn empty(section_counts: Vector3<usize>) -> Result<Self> {
        Self::validate_size(section_counts * SECTION_DIMENSION_USIZE)?;
        let count = section_counts.x * section_counts.y * section_counts.z;

        Ok(VoxelGrid {
            sections: vec![Section::empty(); count],
            section_counts,
        })
    }

    /// Builds a world from a flat block array laid out as
    /// `x + z * size.x + y * size.x * size.z`.
    ///
    /// # Errors
    /// [`VoxelError::DimensionMismatch`] if any axis is zero or not a multiple
    /// of the section size, [`VoxelError::DataLength`] if `data` does not hold
    /// exactly one byte per block. Both are checked before any section is built.
    pub fn from_flat(size: Vector3<usize>, data: &[BlockId]) -> Result<Self> {
        Self::validate_size(size)?;

        let expected = size.x * size.y * size.z;
        if data.len() != expected {
            return Err(VoxelError::DataLength {
                expected,
                actual: data.len(),
            });
        }

        let section_counts = size / SECTION_DIMENSION_USIZE;
        let sections = chunk_creation::repack_sections(section_counts, data);

        log::debug!(
            "Repacked {} blocks into {} sections ({:?})",
            expected,
            sections.len(),
            section_counts
        );

        Ok(VoxelGrid {
            sections,
            section_counts,
        })
    }

    /// Checks that a world size in blocks is a non-zero multiple of the
    /// section edge length on every axis.
    pub fn validate_size(size: Vector3<usize>) -> Result<()> {
        for (axis, value) in [("x", size.x), ("y", size.y), ("z", size.z)] {
            if value == 0 || value % SECTION_DIMENSION_USIZE != 0 || value > i32::MAX as usize {
                return Err(VoxelError::DimensionMismatch {
                    axis,
                    size: value,
                    section_dimension: SECTION_DIMENSION_USIZE,
                });
            }
        }
        Ok(())
    }

    /// Number of sections along each axis.
    pub fn section_counts(&self) -> Vector3<usize> {
        self.section_counts
    }

    /// Total number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// World size in blocks.
    pub fn size(&self) -> Vector3<i32> {
        let counts = self.section_counts;
        Vector3::new(counts.x as i32, counts.y as i32, counts.z as i32) * SECTION_DIMENSION
    }

    /// Whether a block position lies inside the world.
    pub fn is_in_bounds(&self, position: Point3<i32>) -> bool {
        let size = self.size();
        position.x >= 0
            && position.y >= 0
            && position.z >= 0
            && position.x < size.x
            && position.y < size.y
            && position.z < size.z
    }

    /// Arena index of a section, or `None` outside the world.
    #[inline]
    pub fn section_index(&self, section: Point3<i32>) -> Option<usize> {
        section_arena_index(self.section_counts, section)
    }

    /// Section coordinate of an arena index.
    pub fn section_coord(&self, index: usize) -> Point3<i32> {
        let counts = self.section_counts;
        let x = index % counts.x;
        let z = (index / counts.x) % counts.z;
        let y = index / (counts.x * counts.z);
        Point3::new(x as i32, y as i32, z as i32)
    }

    /// Gets the section at a section coordinate.
    pub fn section(&self, section: Point3<i32>) -> Option<&Section> {
        self.section_index(section).map(|index| &self.sections[index])
    }

    /// Gets the section at an arena index.
    pub fn section_at_index(&self, index: usize) -> &Section {
        &self.sections[index]
    }

    /// Gets the block id at a world position, or `None` outside the world.
    #[inline]
    pub fn get_block_id(&self, position: Point3<i32>) -> Option<BlockId> {
        let (section, local) = split_block_position(position);
        self.section(section)
            .map(|section| section.get_block_id(local))
    }

    /// Sets the block id at a world position and returns the previous id.
    ///
    /// When the previous id equals `id` nothing changes; callers must treat that
    /// as a no-op edit and skip invalidation.
    pub fn set_block_id(&mut self, position: Point3<i32>, id: BlockId) -> Result<BlockId> {
        let (section, local) = split_block_position(position);
        let index = self
            .section_index(section)
            .ok_or_else(|| VoxelError::out_of_bounds(position))?;

        Ok(self.sections[index].set_block_id(local, id))
    }

    /// Iterates every section coordinate in arena order.
    pub fn section_coords(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        (0..self.sections.len()).map(|index| self.section_coord(index))
    }
}
