//! # Configuration
//!
//! Engine settings deserialized from JSON. Every field has a default, so an
//! empty object `{}` is a valid configuration.
//!
//! ```json
//! {
//!     "meshing_budget_ms": 4.0,
//!     "view_distance": 8,
//!     "world": { "section_counts": [8, 4, 8], "seed": 7, "sea_level": 20, "terrain_scale": 0.02 },
//!     "blocks": [ { "id": 9, "name": "ice", "shape": "translucent_cube", "textures": [9, 9, 9, 9, 9, 9] } ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use web_time::Duration;

use crate::engine_state::voxels::block::{
    block_shape::BlockShape, BlockDefinition, BlockId, BlockRegistry,
};
use crate::error::Result;

/// Top level engine configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock cap on mesh work per frame, in milliseconds.
    pub meshing_budget_ms: f64,
    /// Farthest section distance (Chebyshev, in sections) the traversal visits.
    pub view_distance: u32,
    /// World generation parameters.
    pub world: WorldConfig,
    /// Block definitions applied on top of the built-in set.
    pub blocks: Vec<BlockConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            meshing_budget_ms: 4.0,
            view_distance: 8,
            world: WorldConfig::default(),
            blocks: Vec::new(),
        }
    }
}

/// Dimensions and terrain parameters of a generated world.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of sections along x, y and z.
    pub section_counts: [usize; 3],
    /// Noise seed.
    pub seed: u32,
    /// Water fills every open cell up to this y.
    pub sea_level: i32,
    /// Horizontal noise frequency.
    pub terrain_scale: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            section_counts: [8, 4, 8],
            seed: 0,
            sea_level: 20,
            terrain_scale: 0.02,
        }
    }
}

/// A block definition as written in configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BlockConfig {
    /// Id to define. Id 0 is reserved for air.
    pub id: BlockId,
    /// Block name.
    pub name: String,
    /// Shape, written in snake case (`"cube"`, `"translucent_cube"`, ...).
    pub shape: BlockShape,
    /// Texture per face, in `BlockSide` order.
    pub textures: [u32; 6],
}

impl EngineConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    /// The meshing budget as a duration. Negative values mean no budget,
    /// values too large for a [`Duration`] mean an unlimited one.
    pub fn meshing_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.meshing_budget_ms.max(0.0) / 1000.0)
            .unwrap_or(Duration::MAX)
    }

    /// Builds the block registry: the built-in set with the configured
    /// definitions applied on top.
    pub fn block_registry(&self) -> BlockRegistry {
        let defaults = BlockRegistry::default();
        let mut definitions: Vec<(BlockId, BlockDefinition)> = (1..=BlockId::MAX)
            .map(|id| (id, defaults.get(id).clone()))
            .filter(|(_, definition)| definition.shape != BlockShape::Air)
            .collect();

        for block in &self.blocks {
            definitions.push((
                block.id,
                BlockDefinition {
                    name: block.name.clone(),
                    shape: block.shape,
                    textures: block.textures,
                },
            ));
        }

        BlockRegistry::new(definitions)
    }
}
