//! # Error Module
//!
//! Crate-wide error type. Construction failures, rejected edits and mesh
//! generation failures all surface as a [`VoxelError`] so callers can use `?`
//! from the edit path down to the traversal.

use cgmath::Point3;
use thiserror::Error;

/// Errors produced by the voxel world, the light map and the render path.
#[derive(Debug, Error)]
pub enum VoxelError {
    /// A world dimension is zero or not a multiple of the section edge length.
    #[error("world size along {axis} is {size}, expected a non-zero multiple of {section_dimension}")]
    DimensionMismatch {
        /// Name of the offending axis ("x", "y" or "z").
        axis: &'static str,
        /// Requested size in blocks.
        size: usize,
        /// Section edge length the size must be divisible by.
        section_dimension: usize,
    },

    /// The flat block array does not match the declared world size.
    #[error("block data holds {actual} bytes, world size requires {expected}")]
    DataLength {
        /// Number of bytes implied by the world dimensions.
        expected: usize,
        /// Number of bytes actually supplied.
        actual: usize,
    },

    /// A write addressed a block outside the world.
    #[error("block position ({x}, {y}, {z}) is outside the world")]
    OutOfBounds {
        /// X coordinate in blocks.
        x: i32,
        /// Y coordinate in blocks.
        y: i32,
        /// Z coordinate in blocks.
        z: i32,
    },

    /// A section produced more vertices than a 16-bit index buffer can address.
    #[error("section {section:?} produced {vertices} vertices, more than a layer can index")]
    SectionMeshOverflow {
        /// Section coordinate of the mesh.
        section: Point3<i32>,
        /// Number of vertices the layer would have needed.
        vertices: usize,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl VoxelError {
    /// Shorthand for an out-of-bounds error at a block position.
    pub fn out_of_bounds(position: Point3<i32>) -> Self {
        VoxelError::OutOfBounds {
            x: position.x,
            y: position.y,
            z: position.z,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, VoxelError>;
