//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format produced by the mesher. Vertices are
//! plain old data so a mesh layer can be handed to any GPU API as raw bytes.

use cgmath::Point3;

/// A vertex in the voxel rendering pipeline.
///
/// Positions are section-local; the GPU layer adds the section origin (see
/// `voxels::world::section_origin`) as a per-section offset.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Texture Index: u32 (4 bytes)
/// - Shade: f32 (4 bytes)
///
/// Total size: 28 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the section origin
    position: [f32; 3],
    /// UV texture coordinates
    tex_coords: [f32; 2],
    /// Index of the texture in the texture array
    texture_index: u32,
    /// Brightness multiplier from face direction and sky light
    shade: f32,
}

impl Vertex {
    /// Size of one vertex in bytes, the stride of a vertex buffer.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `position` - The section-local position of the vertex
    /// * `texture_index` - Index of the texture in the texture array
    /// * `u` - U texture coordinate
    /// * `v` - V texture coordinate
    /// * `shade` - Brightness multiplier in `0.0..=1.0`
    ///
    /// # Returns
    /// A new `Vertex` instance
    pub fn new(position: Point3<f32>, texture_index: u32, u: f32, v: f32, shade: f32) -> Self {
        Vertex {
            position: position.into(),
            tex_coords: [u, v],
            texture_index,
            shade,
        }
    }

    /// Section-local position.
    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    /// UV texture coordinates.
    pub fn tex_coords(&self) -> [f32; 2] {
        self.tex_coords
    }

    /// Texture array index.
    pub fn texture_index(&self) -> u32 {
        self.texture_index
    }

    /// Brightness multiplier.
    pub fn shade(&self) -> f32 {
        self.shade
    }
}
