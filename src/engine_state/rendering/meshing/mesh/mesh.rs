//! Mesh data structures for voxel rendering.
//!
//! A section mesh has two layers. The opaque layer is flattened into vertex and
//! index buffers as soon as it is generated. The translucent layer keeps its
//! quads around so it can be re-sorted back to front whenever the camera moves,
//! and is flattened after every sort.

use cgmath::Point3;

use crate::error::{Result, VoxelError};
use crate::engine_state::rendering::Vertex;

use super::quad::Quad;

/// The largest vertex count a layer may reach with 16-bit indices.
pub const MAX_LAYER_VERTICES: usize = u16::MAX as usize + 1;

/// Index pattern of one quad: two triangles, ll-lr-ur and ll-ur-ul.
const QUAD_INDICES: [u16; 6] = [0, 1, 3, 0, 3, 2];

/// GPU-ready geometry of one render layer of a section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshLayer {
    /// The vertex data for this layer
    pub vertices: Vec<Vertex>,
    /// The index data for this layer
    pub indices: Vec<u16>,
}

impl MeshLayer {
    /// Flattens quads into a layer, keeping their order.
    ///
    /// # Errors
    /// [`VoxelError::SectionMeshOverflow`] if the quads need more than
    /// [`MAX_LAYER_VERTICES`] vertices.
    pub fn from_quads<'a>(
        section: Point3<i32>,
        quads: impl ExactSizeIterator<Item = &'a Quad>,
    ) -> Result<Self> {
        let vertex_count = quads.len() * 4;
        if vertex_count > MAX_LAYER_VERTICES {
            return Err(VoxelError::SectionMeshOverflow {
                section,
                vertices: vertex_count,
            });
        }

        let mut layer = MeshLayer {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(quads.len() * 6),
        };

        for quad in quads {
            let base = layer.vertices.len() as u16;
            layer.vertices.extend_from_slice(&quad.vertices);
            layer
                .indices
                .extend(QUAD_INDICES.iter().map(|index| base + index));
        }

        Ok(layer)
    }

    /// Whether the layer has no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of quads in the layer.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// The vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// The generated geometry of one section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionMesh {
    /// Flattened opaque geometry
    pub opaque: MeshLayer,
    /// Unsorted translucent quads
    pub translucent_quads: Vec<Quad>,
}

/// Collects the quads shapes emit for one section.
pub struct SectionMeshBuilder {
    /// Section being meshed, for error reporting
    section: Point3<i32>,
    /// Opaque quads in generation order
    opaque: Vec<Quad>,
    /// Translucent quads in generation order
    translucent: Vec<Quad>,
}

impl SectionMeshBuilder {
    /// Creates an empty builder for the section at `section`.
    pub fn new(section: Point3<i32>) -> Self {
        SectionMeshBuilder {
            section,
            opaque: Vec::new(),
            translucent: Vec::new(),
        }
    }

    /// Adds a quad to the opaque or translucent layer.
    pub fn push(&mut self, quad: Quad, translucent: bool) {
        if translucent {
            self.translucent.push(quad);
        } else {
            self.opaque.push(quad);
        }
    }

    /// Number of quads pushed so far, opaque and translucent.
    pub fn quad_count(&self) -> usize {
        self.opaque.len() + self.translucent.len()
    }

    /// Flattens the opaque layer and returns the finished mesh.
    pub fn finish(self) -> Result<SectionMesh> {
        let opaque = MeshLayer::from_quads(self.section, self.opaque.iter())?;
        if self.translucent.len() * 4 > MAX_LAYER_VERTICES {
            return Err(VoxelError::SectionMeshOverflow {
                section: self.section,
                vertices: self.translucent.len() * 4,
            });
        }

        Ok(SectionMesh {
            opaque,
            translucent_quads: self.translucent,
        })
    }
}

/// Orders quads back to front as seen from `eye`, in section-local space.
pub fn sort_back_to_front(quads: &mut [Quad], eye: Point3<f32>) {
    quads.sort_by(|a, b| b.distance_squared(eye).total_cmp(&a.distance_squared(eye)));
}
