//! Read-only view of the world around one section, as seen by the shapes
//! being meshed.

use cgmath::{EuclideanSpace, Point3};

use crate::engine_state::voxels::{
    block::{BlockDefinition, BlockId, BlockRegistry},
    chunk::{Section, SECTION_DIMENSION},
    light::LightHeightMap,
    world::{section_origin, VoxelGrid},
};
use crate::error::{Result, VoxelError};

/// Everything a shape needs while emitting geometry for one section.
pub struct MeshContext<'a> {
    grid: &'a VoxelGrid,
    light: &'a LightHeightMap,
    registry: &'a BlockRegistry,
    /// Section coordinate being meshed
    section_coord: Point3<i32>,
    /// The section being meshed
    section: &'a Section,
    /// World position of the section's minimum corner
    origin: Point3<i32>,
}

impl<'a> MeshContext<'a> {
    /// Creates a context for the section at `section_coord`.
    ///
    /// # Errors
    /// [`VoxelError::OutOfBounds`] if the section is not part of the world.
    pub fn new(
        grid: &'a VoxelGrid,
        light: &'a LightHeightMap,
        registry: &'a BlockRegistry,
        section_coord: Point3<i32>,
    ) -> Result<Self> {
        let origin = section_origin(section_coord);
        let section = grid
            .section(section_coord)
            .ok_or_else(|| VoxelError::out_of_bounds(origin))?;

        Ok(MeshContext {
            grid,
            light,
            registry,
            section_coord,
            section,
            origin,
        })
    }

    /// The section being meshed.
    pub fn section(&self) -> &'a Section {
        self.section
    }

    /// Coordinate of the section being meshed.
    pub fn section_coord(&self) -> Point3<i32> {
        self.section_coord
    }

    /// The block registry.
    pub fn registry(&self) -> &'a BlockRegistry {
        self.registry
    }

    /// Definition of a block id.
    #[inline]
    pub fn definition(&self, id: BlockId) -> &'a BlockDefinition {
        self.registry.get(id)
    }

    /// Block at a local position inside the section.
    #[inline]
    pub fn get_local_block(&self, local: Point3<usize>) -> BlockId {
        self.section.get_block_id(local)
    }

    /// Block at a section-local position that may lie up to one cell outside
    /// the section. Neighbor sections are read through the grid.
    ///
    /// # Returns
    /// `None` if the position lies outside the world.
    #[inline]
    pub fn get_surrounding_block(&self, local: Point3<i32>) -> Option<BlockId> {
        let inside = (0..SECTION_DIMENSION).contains(&local.x)
            && (0..SECTION_DIMENSION).contains(&local.y)
            && (0..SECTION_DIMENSION).contains(&local.z);

        if inside {
            Some(self.section.get_block_id(Point3::new(
                local.x as usize,
                local.y as usize,
                local.z as usize,
            )))
        } else {
            self.grid.get_block_id(self.origin + local.to_vec())
        }
    }

    /// Whether sky light reaches a section-local position.
    #[inline]
    pub fn is_lit(&self, local: Point3<i32>) -> bool {
        let world = self.origin + local.to_vec();
        self.light.is_lit(world.x, world.y, world.z)
    }
}
