//! Mesh data structures for voxel rendering.
//!
//! This module provides the containers the mesher fills and the GPU layer
//! consumes.
//!
//! # Architecture
//! - [`Quad`]: A single textured quad with its centroid
//! - [`MeshLayer`]: Flattened vertex and 16-bit index buffers of one layer
//! - [`SectionMesh`]: The opaque layer plus the unsorted translucent quads
//! - [`SectionMeshBuilder`]: Collects quads while shapes are meshed
//!
//! # Usage
//! ```no_run
//! use section_renderer::engine_state::rendering::meshing::mesh::{sort_back_to_front, MeshLayer, Quad};
//! use cgmath::Point3;
//!
//! # let mut quads: Vec<Quad> = Vec::new();
//! sort_back_to_front(&mut quads, Point3::new(8.0, 20.0, 8.0));
//! let layer = MeshLayer::from_quads(Point3::new(0, 0, 0), quads.iter()).unwrap();
//! ```

mod mesh;
mod quad;

pub use mesh::*;
pub use quad::{box_face_corners, Quad};
