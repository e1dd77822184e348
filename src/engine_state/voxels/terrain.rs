//! # Terrain Module
//!
//! Generates a world as a flat block array from Perlin noise. The output uses
//! the same flat layout `VoxelGrid::from_flat` reads, so generation and storage
//! stay decoupled.
//!
//! The terrain is a 2D height field (grass over dirt over stone, sand near the
//! water line), flooded with water up to the sea level, carved by 3D noise
//! caves and dotted with tall grass.

use cgmath::Vector3;
use noise::{NoiseFn, Perlin};

use crate::config::WorldConfig;
use crate::error::Result;

use super::block::{ids, BlockId, AIR};
use super::chunk::chunk_creation::flat_index;
use super::chunk::SECTION_DIMENSION_USIZE;
use super::world::VoxelGrid;

/// Lower cave threshold; 3D samples outside the band are carved out.
const CAVE_NEGATIVE_THRESHOLD: f64 = -0.45;
/// Upper cave threshold.
const CAVE_POSITIVE_THRESHOLD: f64 = 0.45;
/// Cave noise frequency relative to the height field.
const CAVE_SCALE_MULTIPLIER: f64 = 2.5;
/// Depth of the dirt layer below the surface block.
const DIRT_DEPTH: usize = 3;
/// Fraction of dry grass surface cells that grow tall grass.
const TALL_GRASS_CHANCE: f64 = 0.08;

/// Generates the flat block array for a world.
///
/// # Arguments
/// * `config` - World dimensions and terrain parameters
///
/// # Returns
/// The world size in blocks and the block ids laid out as
/// `x + z * size.x + y * size.x * size.z`.
///
/// # Errors
/// [`crate::error::VoxelError::DimensionMismatch`] if any section count is
/// zero or too large. Nothing is allocated in that case.
pub fn generate_terrain(config: &WorldConfig) -> Result<(Vector3<usize>, Vec<BlockId>)> {
    let size = Vector3::from(config.section_counts)
        .map(|count| count.saturating_mul(SECTION_DIMENSION_USIZE));
    VoxelGrid::validate_size(size)?;

    let mut data = vec![AIR; size.x * size.y * size.z];

    let perlin = Perlin::new(config.seed);
    let mut rng = fastrand::Rng::with_seed(config.seed as u64);
    let scale = config.terrain_scale;
    let sea_level = config.sea_level.clamp(0, size.y as i32 - 1) as usize;
    let amplitude = (size.y / 4).max(1) as f64;

    for z in 0..size.z {
        for x in 0..size.x {
            let sample = perlin.get([x as f64 * scale, z as f64 * scale]);
            let surface = (sea_level as f64 + sample * amplitude)
                .clamp(1.0, (size.y - 2) as f64) as usize;
            let beach = surface.abs_diff(sea_level) <= 1;

            for y in 0..=surface {
                let id = if y == surface {
                    if beach {
                        ids::SAND
                    } else {
                        ids::GRASS
                    }
                } else if y + DIRT_DEPTH >= surface {
                    if beach {
                        ids::SAND
                    } else {
                        ids::DIRT
                    }
                } else {
                    ids::STONE
                };
                data[flat_index(size, x, y, z)] = id;
            }

            for y in surface + 1..=sea_level {
                data[flat_index(size, x, y, z)] = ids::WATER;
            }

            if surface > sea_level && !beach && rng.f64() < TALL_GRASS_CHANCE {
                data[flat_index(size, x, surface + 1, z)] = ids::TALL_GRASS;
            }
        }
    }

    carve_caves(&perlin, scale * CAVE_SCALE_MULTIPLIER, size, &mut data);

    log::info!(
        "Generated {}x{}x{} terrain (seed {})",
        size.x,
        size.y,
        size.z,
        config.seed
    );

    Ok((size, data))
}

/// Removes stone and dirt where the 3D noise leaves its band.
fn carve_caves(perlin: &Perlin, scale: f64, size: Vector3<usize>, data: &mut [BlockId]) {
    for y in 1..size.y {
        for z in 0..size.z {
            for x in 0..size.x {
                let index = flat_index(size, x, y, z);
                if !matches!(data[index], ids::STONE | ids::DIRT) {
                    continue;
                }

                let sample = perlin.get([x as f64 * scale, y as f64 * scale, z as f64 * scale]);
                if !(CAVE_NEGATIVE_THRESHOLD..=CAVE_POSITIVE_THRESHOLD).contains(&sample) {
                    data[index] = AIR;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VoxelError;

    fn config() -> WorldConfig {
        WorldConfig {
            section_counts: [2, 2, 2],
            seed: 3,
            sea_level: 12,
            terrain_scale: 0.05,
        }
    }

    #[test]
    fn output_fits_the_world() {
        let (size, data) = generate_terrain(&config()).unwrap();
        assert_eq!(size, Vector3::new(32, 32, 32));
        assert!(VoxelGrid::from_flat(size, &data).is_ok());
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(
            generate_terrain(&config()).unwrap().1,
            generate_terrain(&config()).unwrap().1
        );
    }

    #[test]
    fn bedrock_layer_is_never_carved() {
        let (size, data) = generate_terrain(&config()).unwrap();
        for z in 0..size.z {
            for x in 0..size.x {
                assert_ne!(data[flat_index(size, x, 0, z)], AIR);
            }
        }
    }

    #[test]
    fn empty_axis_is_rejected_before_generation() {
        for section_counts in [[2, 0, 2], [0, 1, 1], [1, 1, 0]] {
            let config = WorldConfig {
                section_counts,
                ..config()
            };
            assert!(matches!(
                generate_terrain(&config),
                Err(VoxelError::DimensionMismatch { size: 0, .. })
            ));
        }
    }

    #[test]
    fn oversized_axis_is_rejected() {
        let config = WorldConfig {
            section_counts: [1, usize::MAX, 1],
            ..config()
        };
        assert!(matches!(
            generate_terrain(&config),
            Err(VoxelError::DimensionMismatch { axis: "y", .. })
        ));
    }
}
