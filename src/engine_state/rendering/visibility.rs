//! # Visibility Module
//!
//! Per-section portal information. For each section the engine caches which
//! pairs of its six outer faces are connected through non-occluding interior
//! space. The render traversal only walks from one section into the next
//! through such a connection.
//!
//! ## Flood Fill
//!
//! Connectivity is found by breadth-first flood fills over the section's cells,
//! started from every boundary cell. A step from one cell to the next is
//! blocked when either cell fully covers the face they share, which makes the
//! step relation symmetric: a cell reached from one flood would reach exactly
//! the same region from any other, so one visited set serves every flood of a
//! computation. The faces each flood leaves through are all connected to each
//! other.
//!
//! The result may over-report connectivity (a portal that is technically
//! blocked by partial shapes) but never under-reports it.

use std::collections::VecDeque;

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::voxels::{
    block::{
        block_side::{BlockSide, FaceSet},
        BlockRegistry,
    },
    chunk::{Section, SECTION_DIMENSION, SECTION_DIMENSION_USIZE, SECTION_SIZE},
    world::VoxelGrid,
};

/// Number of unordered pairs of distinct faces.
const FACE_PAIR_COUNT: u32 = 15;
/// Mask with every pair bit set.
const ALL_PAIRS: u16 = (1 << FACE_PAIR_COUNT) - 1;

/// Which unordered pairs of section faces see each other.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct SectionVisibility(u16);

impl SectionVisibility {
    /// No face sees any other.
    pub const fn none() -> Self {
        SectionVisibility(0)
    }

    /// Every face sees every other.
    pub const fn all() -> Self {
        SectionVisibility(ALL_PAIRS)
    }

    #[inline]
    fn pair_bit(a: BlockSide, b: BlockSide) -> u16 {
        let (low, high) = if (a as u32) < (b as u32) {
            (a as u32, b as u32)
        } else {
            (b as u32, a as u32)
        };
        // Row offset of `low` in the upper triangle of a 6x6 matrix.
        let row = low * (11 - low) / 2;
        1 << (row + high - low - 1)
    }

    /// Marks two distinct faces as connected.
    pub fn set_visible(&mut self, a: BlockSide, b: BlockSide) {
        if a != b {
            self.0 |= Self::pair_bit(a, b);
        }
    }

    /// Whether a path through the section connects face `a` to face `b`.
    ///
    /// A face is always considered connected to itself.
    #[inline]
    pub fn is_visible(self, a: BlockSide, b: BlockSide) -> bool {
        a == b || self.0 & Self::pair_bit(a, b) != 0
    }

    /// Connects every pair of faces in `faces`.
    pub fn connect_all(&mut self, faces: FaceSet) {
        for a in faces.iter() {
            for b in faces.iter() {
                self.set_visible(a, b);
            }
        }
    }

    /// Connections present in either relation.
    pub fn union(self, other: SectionVisibility) -> Self {
        SectionVisibility(self.0 | other.0)
    }

    /// Whether every pair is connected.
    pub fn is_all(self) -> bool {
        self.0 == ALL_PAIRS
    }

    /// Whether no pair is connected.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for SectionVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for low in 0..6 {
            for high in low + 1..6 {
                let pair = (BlockSide::from_index(low), BlockSide::from_index(high));
                if let (Some(a), Some(b)) = pair {
                    if self.is_visible(a, b) {
                        list.entry(&(a, b));
                    }
                }
            }
        }
        list.finish()
    }
}

/// Reusable flood fill state.
///
/// The boundary seeds do not depend on content and are computed once. The
/// visited set and the queue are reused across computations to avoid
/// per-section allocation.
pub struct SectionFloodFill {
    /// Local indices of every cell on the section boundary.
    seeds: Vec<usize>,
    /// Cells already reached during the current computation.
    visited: BitVec,
    /// BFS frontier.
    queue: VecDeque<usize>,
}

impl SectionFloodFill {
    /// Creates the flood fill state.
    pub fn new() -> Self {
        let last = SECTION_DIMENSION_USIZE - 1;
        let mut seeds = Vec::new();
        for x in 0..SECTION_DIMENSION_USIZE {
            for z in 0..SECTION_DIMENSION_USIZE {
                for y in 0..SECTION_DIMENSION_USIZE {
                    let on_boundary = x == 0
                        || x == last
                        || y == 0
                        || y == last
                        || z == 0
                        || z == last;
                    if on_boundary {
                        seeds.push(Section::local_index(x, y, z));
                    }
                }
            }
        }

        SectionFloodFill {
            seeds,
            visited: BitVec::repeat(false, SECTION_SIZE),
            queue: VecDeque::new(),
        }
    }

    /// Computes the face connectivity of the section at `coord`.
    ///
    /// Sections outside the world connect nothing.
    pub fn compute(
        &mut self,
        grid: &VoxelGrid,
        registry: &BlockRegistry,
        coord: Point3<i32>,
    ) -> SectionVisibility {
        match grid.section(coord) {
            Some(section) => self.compute_section(section, registry),
            None => SectionVisibility::none(),
        }
    }

    /// Computes the face connectivity of one section.
    pub fn compute_section(
        &mut self,
        section: &Section,
        registry: &BlockRegistry,
    ) -> SectionVisibility {
        if section.is_empty() {
            return SectionVisibility::all();
        }

        self.visited.fill(false);
        let mut result = SectionVisibility::none();

        for seed_index in 0..self.seeds.len() {
            if result.is_all() {
                break;
            }

            let seed = self.seeds[seed_index];
            if self.visited[seed] {
                continue;
            }

            let touched = self.flood(section, registry, seed);
            result.connect_all(touched);
        }

        result
    }

    /// Runs one BFS from `seed` and returns the faces it leaves through.
    fn flood(&mut self, section: &Section, registry: &BlockRegistry, seed: usize) -> FaceSet {
        let mut touched = FaceSet::empty();

        self.visited.set(seed, true);
        self.queue.clear();
        self.queue.push_back(seed);

        while let Some(index) = self.queue.pop_front() {
            let shape = registry.shape(section.get_block_id_at_index(index));
            let position = Section::local_position(index);
            let position = Point3::new(position.x as i32, position.y as i32, position.z as i32);

            for side in BlockSide::all() {
                if shape.fully_occludes(side) {
                    continue;
                }

                let next = position + side.offset();
                let inside = (0..SECTION_DIMENSION).contains(&next.x)
                    && (0..SECTION_DIMENSION).contains(&next.y)
                    && (0..SECTION_DIMENSION).contains(&next.z);
                if !inside {
                    touched.add(side);
                    continue;
                }

                let next_index =
                    Section::local_index(next.x as usize, next.y as usize, next.z as usize);
                if self.visited[next_index] {
                    continue;
                }

                let next_shape = registry.shape(section.get_block_id_at_index(next_index));
                if next_shape.fully_occludes(side.opposite()) {
                    continue;
                }

                self.visited.set(next_index, true);
                self.queue.push_back(next_index);
            }

            if touched.is_all() {
                break;
            }
        }

        touched
    }
}

impl Default for SectionFloodFill {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::ids;

    fn filled(mut keep: impl FnMut(usize, usize, usize) -> bool, id: u8) -> Section {
        let mut section = Section::empty();
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    if keep(x, y, z) {
                        section.set_block_id(Point3::new(x, y, z), id);
                    }
                }
            }
        }
        section
    }

    #[test]
    fn pair_bits_are_distinct() {
        let mut seen = 0u16;
        for a in BlockSide::all() {
            for b in BlockSide::all() {
                if (a as u32) < (b as u32) {
                    let bit = SectionVisibility::pair_bit(a, b);
                    assert_eq!(seen & bit, 0);
                    assert_eq!(bit, SectionVisibility::pair_bit(b, a));
                    seen |= bit;
                }
            }
        }
        assert_eq!(seen, ALL_PAIRS);
    }

    #[test]
    fn empty_section_connects_everything() {
        let registry = BlockRegistry::default();
        let mut fill = SectionFloodFill::new();
        assert!(fill.compute_section(&Section::empty(), &registry).is_all());
    }

    #[test]
    fn solid_section_connects_nothing() {
        let registry = BlockRegistry::default();
        let mut fill = SectionFloodFill::new();
        let section = filled(|_, _, _| true, ids::STONE);
        assert!(fill.compute_section(&section, &registry).is_none());
    }

    #[test]
    fn translucent_blocks_do_not_block() {
        let registry = BlockRegistry::default();
        let mut fill = SectionFloodFill::new();
        let section = filled(|_, _, _| true, ids::GLASS);
        assert!(fill.compute_section(&section, &registry).is_all());
    }

    #[test]
    fn wall_separates_left_from_right() {
        let registry = BlockRegistry::default();
        let mut fill = SectionFloodFill::new();
        let section = filled(|x, _, _| x == 8, ids::STONE);
        let visibility = fill.compute_section(&section, &registry);

        assert!(!visibility.is_visible(BlockSide::LEFT, BlockSide::RIGHT));
        assert!(visibility.is_visible(BlockSide::LEFT, BlockSide::TOP));
        assert!(visibility.is_visible(BlockSide::RIGHT, BlockSide::FRONT));
        assert!(visibility.is_visible(BlockSide::FRONT, BlockSide::BACK));
        assert!(visibility.is_visible(BlockSide::TOP, BlockSide::BOTTOM));
    }

    #[test]
    fn hole_in_wall_reconnects() {
        let registry = BlockRegistry::default();
        let mut fill = SectionFloodFill::new();
        let section = filled(|x, y, z| x == 8 && !(y == 5 && z == 5), ids::STONE);
        let visibility = fill.compute_section(&section, &registry);
        assert!(visibility.is_visible(BlockSide::LEFT, BlockSide::RIGHT));
    }

    #[test]
    fn slab_floor_blocks_vertical_passage() {
        let registry = BlockRegistry::default();
        let mut fill = SectionFloodFill::new();
        // Slabs are full on their bottom face only.
        let section = filled(|_, y, _| y == 0, ids::STONE_SLAB);
        let visibility = fill.compute_section(&section, &registry);

        assert!(!visibility.is_visible(BlockSide::BOTTOM, BlockSide::TOP));
        assert!(visibility.is_visible(BlockSide::LEFT, BlockSide::TOP));
    }

    #[test]
    fn slab_layer_is_not_entered_from_below() {
        let registry = BlockRegistry::default();
        let mut fill = SectionFloodFill::new();
        // Air on both sides of the layer. From above the slabs can be
        // entered, from below their full bottom face stops the fill.
        let section = filled(|_, y, _| y == 8, ids::STONE_SLAB);
        let visibility = fill.compute_section(&section, &registry);

        assert!(!visibility.is_visible(BlockSide::BOTTOM, BlockSide::TOP));
        assert!(visibility.is_visible(BlockSide::BOTTOM, BlockSide::LEFT));
        assert!(visibility.is_visible(BlockSide::TOP, BlockSide::RIGHT));
        assert!(visibility.is_visible(BlockSide::LEFT, BlockSide::RIGHT));
    }

    #[test]
    fn debug_lists_connected_pairs() {
        let mut visibility = SectionVisibility::none();
        visibility.set_visible(BlockSide::TOP, BlockSide::FRONT);
        visibility.set_visible(BlockSide::LEFT, BlockSide::RIGHT);
        assert_eq!(format!("{visibility:?}"), "[(FRONT, TOP), (LEFT, RIGHT)]");
        assert_eq!(format!("{:?}", SectionVisibility::none()), "[]");
    }

    #[test]
    fn visited_state_resets_between_sections() {
        let registry = BlockRegistry::default();
        let mut fill = SectionFloodFill::new();
        let wall = filled(|x, _, _| x == 8, ids::STONE);
        let first = fill.compute_section(&wall, &registry);
        let second = fill.compute_section(&wall, &registry);
        assert_eq!(first, second);
    }
}
