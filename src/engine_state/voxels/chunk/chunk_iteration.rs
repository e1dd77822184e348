//! # Chunk Iteration Module
//!
//! An iterator over the non-air cells of a section. The mesher walks sections
//! through it so air cells cost a single byte comparison each.

use cgmath::Point3;

use crate::engine_state::voxels::block::{BlockId, AIR};

use super::{Section, SECTION_SIZE};

/// An iterator over all non-air blocks in a section, in local index order.
pub struct SectionBlockIterator<'a> {
    /// Reference to the section being iterated over
    section_ref: &'a Section,
    /// Next cell index to inspect
    current_offset: usize,
    /// Non-air cells not yet yielded; lets the iterator stop early
    remaining: u32,
}

impl<'a> SectionBlockIterator<'a> {
    /// Creates a new iterator positioned before the first cell.
    pub fn new(section_ref: &'a Section) -> Self {
        SectionBlockIterator {
            section_ref,
            current_offset: 0,
            remaining: section_ref.non_air_count(),
        }
    }
}

impl Iterator for SectionBlockIterator<'_> {
    type Item = (Point3<usize>, BlockId);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        while self.current_offset < SECTION_SIZE {
            let index = self.current_offset;
            self.current_offset += 1;

            let id = self.section_ref.get_block_id_at_index(index);
            if id != AIR {
                self.remaining -= 1;
                return Some((Section::local_position(index), id));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_yields_nothing() {
        let section = Section::empty();
        assert_eq!(section.blocks().next(), None);
    }

    #[test]
    fn yields_blocks_with_positions() {
        let mut section = Section::empty();
        section.set_block_id(Point3::new(15, 15, 15), 3);
        section.set_block_id(Point3::new(0, 2, 0), 1);
        section.set_block_id(Point3::new(4, 0, 9), 2);

        let found: Vec<_> = section.blocks().collect();
        assert_eq!(
            found,
            vec![
                (Point3::new(0, 2, 0), 1),
                (Point3::new(4, 0, 9), 2),
                (Point3::new(15, 15, 15), 3),
            ]
        );
    }
}
