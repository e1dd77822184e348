//! # Light Module
//!
//! Sky light modelled as a height map: for every (x, z) column the map stores
//! the y of the topmost light-blocking block plus one, or 0 when the column is
//! open all the way down. A cell is lit when it sits at or above that height.
//!
//! The map is computed once over the whole world and then maintained
//! incrementally, one block edit at a time. Each edit reports whether the
//! column height moved, so the renderer can invalidate only the sections whose
//! shading depends on the affected rows.

use cgmath::Point3;

use super::block::{BlockId, BlockRegistry};
use super::world::VoxelGrid;

/// A change of one column's light height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LightChange {
    /// Height before the edit.
    pub previous: i32,
    /// Height after the edit.
    pub current: i32,
}

impl LightChange {
    /// The lower and upper of the two heights.
    pub fn span(&self) -> (i32, i32) {
        (
            self.previous.min(self.current),
            self.previous.max(self.current),
        )
    }
}

/// Per-column sky light heights.
#[derive(Clone, Debug)]
pub struct LightHeightMap {
    /// Width of the map along x, in blocks.
    size_x: i32,
    /// Depth of the map along z, in blocks.
    size_z: i32,
    /// Heights indexed `x + z * size_x`.
    heights: Vec<i32>,
}

impl LightHeightMap {
    /// Builds the light map for a whole world.
    pub fn new(grid: &VoxelGrid, registry: &BlockRegistry) -> Self {
        let size = grid.size();
        let mut map = LightHeightMap {
            size_x: size.x,
            size_z: size.z,
            heights: vec![0; (size.x * size.z) as usize],
        };
        map.recalculate_all(grid, registry);
        map
    }

    #[inline]
    fn column_index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x >= self.size_x || z >= self.size_z {
            return None;
        }
        Some((x + z * self.size_x) as usize)
    }

    /// Recomputes every column by scanning top down.
    pub fn recalculate_all(&mut self, grid: &VoxelGrid, registry: &BlockRegistry) {
        let top = grid.size().y - 1;
        for z in 0..self.size_z {
            for x in 0..self.size_x {
                let height = Self::scan_down(grid, registry, x, top, z);
                self.heights[(x + z * self.size_x) as usize] = height;
            }
        }
        log::debug!(
            "Recalculated light for {} columns",
            self.heights.len()
        );
    }

    /// Height one above the first light-blocking block at or below `from_y`.
    fn scan_down(grid: &VoxelGrid, registry: &BlockRegistry, x: i32, from_y: i32, z: i32) -> i32 {
        (0..=from_y)
            .rev()
            .find(|y| {
                grid.get_block_id(Point3::new(x, *y, z))
                    .is_some_and(|id| registry.blocks_light(id))
            })
            .map_or(0, |y| y + 1)
    }

    /// Light height of a column, or `None` outside the map.
    pub fn height(&self, x: i32, z: i32) -> Option<i32> {
        self.column_index(x, z).map(|index| self.heights[index])
    }

    /// Whether sky light reaches a cell. Columns outside the map are lit.
    #[inline]
    pub fn is_lit(&self, x: i32, y: i32, z: i32) -> bool {
        match self.column_index(x, z) {
            Some(index) => y >= self.heights[index],
            None => true,
        }
    }

    /// Updates the column after the block at `position` went from
    /// `previous_id` to `new_id`. The grid must already hold `new_id`.
    ///
    /// # Returns
    /// The height change, or `None` if the column height did not move.
    pub fn block_changed(
        &mut self,
        grid: &VoxelGrid,
        registry: &BlockRegistry,
        position: Point3<i32>,
        previous_id: BlockId,
        new_id: BlockId,
    ) -> Option<LightChange> {
        let index = self.column_index(position.x, position.z)?;
        let height = self.heights[index];
        let y = position.y;

        if y < height - 1 {
            return None;
        }

        let blocks_now = registry.blocks_light(new_id);
        if registry.blocks_light(previous_id) == blocks_now {
            return None;
        }

        let current = if blocks_now && y + 1 > height {
            y + 1
        } else if !blocks_now && y + 1 == height {
            Self::scan_down(grid, registry, position.x, y - 1, position.z)
        } else {
            return None;
        };

        self.heights[index] = current;
        Some(LightChange {
            previous: height,
            current,
        })
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::engine_state::voxels::block::{ids, AIR};

    fn grid_with_column(blocks: &[(i32, BlockId)]) -> VoxelGrid {
        let mut grid = VoxelGrid::empty(Vector3::new(1, 2, 1)).unwrap();
        for (y, id) in blocks {
            grid.set_block_id(Point3::new(3, *y, 3), *id).unwrap();
        }
        grid
    }

    #[test]
    fn boundary_is_exact_after_recalculation() {
        let registry = BlockRegistry::default();
        let grid = grid_with_column(&[(4, ids::STONE), (12, ids::GLASS), (20, ids::WATER)]);
        let light = LightHeightMap::new(&grid, &registry);

        assert_eq!(light.height(3, 3), Some(5));
        assert!(light.is_lit(3, 5, 3));
        assert!(!light.is_lit(3, 4, 3));
        assert_eq!(light.height(0, 0), Some(0));
        assert_eq!(light.height(16, 0), None);
        assert!(light.is_lit(-1, -100, 0));
    }

    #[test]
    fn raising_the_column_reports_the_change() {
        let registry = BlockRegistry::default();
        let mut grid = grid_with_column(&[(4, ids::STONE)]);
        let mut light = LightHeightMap::new(&grid, &registry);
        assert_eq!(light.height(3, 3), Some(5));

        let p = Point3::new(3, 10, 3);
        let previous = grid.set_block_id(p, ids::STONE).unwrap();
        let change = light.block_changed(&grid, &registry, p, previous, ids::STONE);

        assert_eq!(change, Some(LightChange { previous: 5, current: 11 }));
        assert_eq!(change.unwrap().span(), (5, 11));
        assert_eq!(light.height(3, 3), Some(11));
    }

    #[test]
    fn removing_the_top_block_scans_down() {
        let registry = BlockRegistry::default();
        let mut grid = grid_with_column(&[(4, ids::STONE), (10, ids::DIRT)]);
        let mut light = LightHeightMap::new(&grid, &registry);

        let p = Point3::new(3, 10, 3);
        let previous = grid.set_block_id(p, AIR).unwrap();
        let change = light.block_changed(&grid, &registry, p, previous, AIR);
        assert_eq!(change, Some(LightChange { previous: 11, current: 5 }));

        let p = Point3::new(3, 4, 3);
        let previous = grid.set_block_id(p, AIR).unwrap();
        let change = light.block_changed(&grid, &registry, p, previous, AIR);
        assert_eq!(change, Some(LightChange { previous: 5, current: 0 }));
    }

    #[test]
    fn edits_that_keep_the_height_report_nothing() {
        let registry = BlockRegistry::default();
        let mut grid = grid_with_column(&[(10, ids::STONE)]);
        let mut light = LightHeightMap::new(&grid, &registry);

        // Below the surface.
        let p = Point3::new(3, 2, 3);
        let previous = grid.set_block_id(p, ids::STONE).unwrap();
        assert_eq!(light.block_changed(&grid, &registry, p, previous, ids::STONE), None);

        // Same light class.
        let p = Point3::new(3, 10, 3);
        let previous = grid.set_block_id(p, ids::DIRT).unwrap();
        assert_eq!(light.block_changed(&grid, &registry, p, previous, ids::DIRT), None);

        // Non-blocking block above the surface.
        let p = Point3::new(3, 20, 3);
        let previous = grid.set_block_id(p, ids::GLASS).unwrap();
        assert_eq!(light.block_changed(&grid, &registry, p, previous, ids::GLASS), None);

        assert_eq!(light.height(3, 3), Some(11));
    }

    #[test]
    fn incremental_updates_match_full_recalculation() {
        let registry = BlockRegistry::default();
        let mut rng = fastrand::Rng::with_seed(42);
        let mut grid = VoxelGrid::empty(Vector3::new(1, 2, 1)).unwrap();
        let palette = [AIR, ids::STONE, ids::GLASS, ids::STONE_SLAB, ids::DIRT];

        let size = grid.size();
        for _ in 0..1500 {
            let p = Point3::new(rng.i32(0..size.x), rng.i32(0..size.y), rng.i32(0..size.z));
            grid.set_block_id(p, palette[rng.usize(0..palette.len())]).unwrap();
        }

        let mut incremental = LightHeightMap::new(&grid, &registry);
        for _ in 0..3000 {
            // Bias edits into a few columns so heights actually move.
            let p = Point3::new(rng.i32(0..4), rng.i32(0..size.y), rng.i32(0..4));
            let id = palette[rng.usize(0..palette.len())];
            let previous = grid.set_block_id(p, id).unwrap();
            if previous == id {
                continue;
            }
            incremental.block_changed(&grid, &registry, p, previous, id);

            let full = LightHeightMap::new(&grid, &registry);
            assert_eq!(incremental.heights, full.heights, "after edit at {p:?}");
        }
    }
}
