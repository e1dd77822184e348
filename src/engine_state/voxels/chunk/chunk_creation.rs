//! # Chunk Creation Module
//!
//! Builders that turn raw block data into sections.
//!
//! World data arrives as one flat, world-sized byte array laid out as
//! `x + z * size_x + y * size_x * size_z`. [`repack_sections`] cuts it into
//! per-section arrays in section arena order, rewriting each section in its own
//! column-major local layout. The transform is pure: every coordinate keeps its
//! value.

use cgmath::Vector3;

use crate::engine_state::voxels::block::{BlockId, AIR};

use super::{Section, SECTION_DIMENSION_USIZE, SECTION_SIZE};

/// A builder that fills a section one cell at a time in local index order.
///
/// The builder keeps the non-air count in step with the pushed cells, so the
/// finished section never has to rescan its contents.
pub struct SectionCreationIterator {
    /// Cells pushed so far.
    blocks: Vec<BlockId>,
    /// Number of non-air cells pushed so far.
    non_air_count: u32,
}

impl SectionCreationIterator {
    /// Creates an empty builder.
    pub fn new() -> Self {
        SectionCreationIterator {
            blocks: Vec::with_capacity(SECTION_SIZE),
            non_air_count: 0,
        }
    }

    /// Appends the next cell in local index order.
    pub fn push_block_id(&mut self, id: BlockId) {
        debug_assert!(self.blocks.len() < SECTION_SIZE, "section overfilled");
        if id != AIR {
            self.non_air_count += 1;
        }
        self.blocks.push(id);
    }

    /// Finalizes the section. Cells that were never pushed are air.
    pub fn return_section(mut self) -> Section {
        self.blocks.resize(SECTION_SIZE, AIR);
        Section {
            blocks: self.blocks.into_boxed_slice(),
            non_air_count: self.non_air_count,
        }
    }
}

impl Default for SectionCreationIterator {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of a block in the flat world layout.
#[inline]
pub fn flat_index(size: Vector3<usize>, x: usize, y: usize, z: usize) -> usize {
    x + z * size.x + y * size.x * size.z
}

/// Repacks a flat world array into sections.
///
/// `section_counts` is the number of sections along each axis and `data` must
/// hold exactly `section_counts * 16` blocks per axis; the caller validates this.
/// Sections are returned in arena order (`x + z * nx + y * nx * nz`).
pub fn repack_sections(section_counts: Vector3<usize>, data: &[BlockId]) -> Vec<Section> {
    let size = section_counts * SECTION_DIMENSION_USIZE;
    let mut sections =
        Vec::with_capacity(section_counts.x * section_counts.y * section_counts.z);

    for sy in 0..section_counts.y {
        for sz in 0..section_counts.z {
            for sx in 0..section_counts.x {
                let origin = Vector3::new(sx, sy, sz) * SECTION_DIMENSION_USIZE;
                let mut sci = SectionCreationIterator::new();

                for x in 0..SECTION_DIMENSION_USIZE {
                    for z in 0..SECTION_DIMENSION_USIZE {
                        for y in 0..SECTION_DIMENSION_USIZE {
                            let index =
                                flat_index(size, origin.x + x, origin.y + y, origin.z + z);
                            sci.push_block_id(data[index]);
                        }
                    }
                }

                sections.push(sci.return_section());
            }
        }
    }

    sections
}
