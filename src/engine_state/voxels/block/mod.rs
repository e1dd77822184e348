//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block shapes, block faces, and the block registry that maps a block
//! id to its definition.
//!
//! The registry is an explicit immutable table. It is built once at startup and
//! handed by reference to everything that needs to interpret block ids.

use block_shape::BlockShape;
use block_side::BlockSide;

pub mod block_shape;
pub mod block_side;

/// The underlying integer type used to store a block in memory.
pub type BlockId = u8;

/// The id of empty space. Always defined, always [`BlockShape::Air`].
pub const AIR: BlockId = 0;

/// Number of distinct block ids the registry can hold.
pub const BLOCK_ID_COUNT: usize = BlockId::MAX as usize + 1;

/// Everything the renderer needs to know about one block id.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDefinition {
    /// Human readable name, used in logs and configuration.
    pub name: String,
    /// Shape strategy used for meshing and occlusion.
    pub shape: BlockShape,
    /// Texture index for each face, in [`BlockSide`] order.
    pub textures: [u32; 6],
}

impl BlockDefinition {
    /// A definition using the same texture on every face.
    pub fn uniform(name: &str, shape: BlockShape, texture: u32) -> Self {
        BlockDefinition {
            name: name.to_string(),
            shape,
            textures: [texture; 6],
        }
    }

    /// Texture index for a face.
    #[inline]
    pub fn texture(&self, side: BlockSide) -> u32 {
        self.textures[side as usize]
    }
}

/// Immutable lookup table from [`BlockId`] to [`BlockDefinition`].
///
/// Every id has a definition; ids that were never registered resolve to air.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    definitions: Vec<BlockDefinition>,
}

impl BlockRegistry {
    /// Builds a registry from `(id, definition)` pairs. Later pairs win.
    ///
    /// Id 0 is forced to stay air.
    pub fn new(definitions: impl IntoIterator<Item = (BlockId, BlockDefinition)>) -> Self {
        let air = BlockDefinition::uniform("air", BlockShape::Air, 0);
        let mut table = vec![air; BLOCK_ID_COUNT];

        for (id, definition) in definitions {
            if id == AIR {
                log::warn!("Ignoring redefinition of air as {:?}", definition.name);
                continue;
            }
            table[id as usize] = definition;
        }

        BlockRegistry { definitions: table }
    }

    /// Gets the definition for a block id.
    #[inline]
    pub fn get(&self, id: BlockId) -> &BlockDefinition {
        &self.definitions[id as usize]
    }

    /// Gets the shape for a block id.
    #[inline]
    pub fn shape(&self, id: BlockId) -> BlockShape {
        self.definitions[id as usize].shape
    }

    /// Whether sky light stops at this block id.
    #[inline]
    pub fn blocks_light(&self, id: BlockId) -> bool {
        self.shape(id).blocks_light()
    }

    /// Finds the id registered under `name`.
    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.definitions
            .iter()
            .position(|definition| definition.name == name)
            .map(|index| index as BlockId)
    }
}

/// Ids of the built-in block set.
pub mod ids {
    use super::BlockId;

    /// Plain stone.
    pub const STONE: BlockId = 1;
    /// Dirt.
    pub const DIRT: BlockId = 2;
    /// Grass, green on top.
    pub const GRASS: BlockId = 3;
    /// Glass.
    pub const GLASS: BlockId = 4;
    /// Stone slab.
    pub const STONE_SLAB: BlockId = 5;
    /// Tall grass plant.
    pub const TALL_GRASS: BlockId = 6;
    /// Water.
    pub const WATER: BlockId = 7;
    /// Sand.
    pub const SAND: BlockId = 8;
}

impl Default for BlockRegistry {
    fn default() -> Self {
        BlockRegistry::new([
            (ids::STONE, BlockDefinition::uniform("stone", BlockShape::Cube, 1)),
            (ids::DIRT, BlockDefinition::uniform("dirt", BlockShape::Cube, 2)),
            (
                ids::GRASS,
                BlockDefinition {
                    name: "grass".to_string(),
                    shape: BlockShape::Cube,
                    // FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT
                    textures: [4, 4, 2, 3, 4, 4],
                },
            ),
            (
                ids::GLASS,
                BlockDefinition::uniform("glass", BlockShape::TranslucentCube, 5),
            ),
            (
                ids::STONE_SLAB,
                BlockDefinition::uniform("stone_slab", BlockShape::Slab, 1),
            ),
            (
                ids::TALL_GRASS,
                BlockDefinition::uniform("tall_grass", BlockShape::Cross, 6),
            ),
            (ids::WATER, BlockDefinition::uniform("water", BlockShape::Liquid, 7)),
            (ids::SAND, BlockDefinition::uniform("sand", BlockShape::Cube, 8)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_ids_are_air() {
        let registry = BlockRegistry::default();
        assert_eq!(registry.shape(AIR), BlockShape::Air);
        assert_eq!(registry.shape(200), BlockShape::Air);
        assert_eq!(registry.shape(ids::STONE), BlockShape::Cube);
    }

    #[test]
    fn air_cannot_be_redefined() {
        let registry = BlockRegistry::new([(
            AIR,
            BlockDefinition::uniform("not_air", BlockShape::Cube, 1),
        )]);
        assert_eq!(registry.shape(AIR), BlockShape::Air);
    }

    #[test]
    fn lookup_by_name() {
        let registry = BlockRegistry::default();
        assert_eq!(registry.id_by_name("water"), Some(ids::WATER));
        assert_eq!(registry.id_by_name("lava"), None);
        assert_eq!(registry.get(ids::GRASS).texture(BlockSide::TOP), 3);
    }
}
