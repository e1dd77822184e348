//! # Voxel Engine Core
//!
//! This module contains the voxel data side of the engine: what is stored where,
//! and how sky light falls through it.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block ids, shapes, faces and the immutable block registry
//! * **Chunk**: Fixed-size 16x16x16 sections of block ids
//! * **World**: The bounded section arena and world-space block access
//! * **Light**: The per-column sky light height map
//! * **Terrain**: Noise-driven world generation producing flat block data
//!
//! ## Data Flow
//!
//! 1. The world is built once from a flat block array (usually from `terrain`)
//! 2. The light map is computed over the whole world
//! 3. Edits go through the world first, then the light map
//! 4. The rendering side is told which sections went stale
//!
//! ## Thread Safety
//!
//! Nothing here is shared across threads. Edits and rendering happen on the same
//! thread, one after the other.

pub mod block;
pub mod chunk;
pub mod light;
pub mod terrain;
pub mod world;
