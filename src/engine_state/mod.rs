//! # Engine State Module
//!
//! The core engine module that owns the world and everything derived from it.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Camera, projection and view frustum
//! * `rendering` - Visibility, meshing, render caches and the frame traversal
//! * `voxels` - Block storage, block definitions, sky light and terrain
//!
//! ## Architecture
//!
//! `EngineState` is the single writer. Every edit goes through
//! [`EngineState::set_block`], which updates the world, then the light map,
//! then invalidates the render caches that depend on the changed block. A frame
//! is rendered with [`EngineState::render_frame`] strictly after any edits of
//! that frame.

use cgmath::{Matrix4, Point3, Vector3};

use camera_state::{Camera, Projection};
use rendering::{RenderList, WorldRenderData, WorldRenderer};
use voxels::{
    block::{BlockId, BlockRegistry},
    light::LightHeightMap,
    terrain,
    world::VoxelGrid,
};

use crate::config::EngineConfig;
use crate::error::Result;

pub mod camera_state;
pub mod rendering;
pub mod voxels;

/// The main state container for the voxel engine
///
/// This struct owns the world and its derived state and coordinates the edit
/// path and the render path.
///
/// # Examples
///
/// ```no_run
/// use cgmath::{Deg, Point3};
/// use section_renderer::config::EngineConfig;
/// use section_renderer::engine_state::{camera_state::{Camera, Projection}, EngineState};
///
/// let mut engine_state = EngineState::from_config(&EngineConfig::default()).unwrap();
/// let camera = Camera::new(Point3::new(64.0, 40.0, 64.0), Deg(0.0), Deg(-20.0));
/// let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0);
///
/// // Main loop
/// loop {
///     engine_state.set_block(Point3::new(10, 30, 10), 1).unwrap();
///     let list = engine_state.render_frame(&camera, &projection).unwrap();
/// }
/// ```
pub struct EngineState {
    /// Block definitions
    registry: BlockRegistry,
    /// The voxel world
    world: VoxelGrid,
    /// Sky light heights over the world
    light: LightHeightMap,
    /// Per-section render caches
    render_data: WorldRenderData,
    /// Frame traversal and its scratch state
    renderer: WorldRenderer,
}

impl EngineState {
    /// Creates a new engine state around an existing world
    ///
    /// # Arguments
    ///
    /// * `world` - The voxel world
    /// * `registry` - Block definitions used to interpret the world
    /// * `renderer` - The frame traversal, carrying budget and view distance
    ///
    /// # Returns
    ///
    /// An engine state with the light map computed and every section outdated
    pub fn new(world: VoxelGrid, registry: BlockRegistry, renderer: WorldRenderer) -> Self {
        let light = LightHeightMap::new(&world, &registry);
        let render_data = WorldRenderData::new(&world);

        log::info!(
            "Engine state ready: {} sections, view distance {}, meshing budget {:?}",
            world.section_count(),
            renderer.view_distance(),
            renderer.meshing_budget()
        );

        Self {
            registry,
            world,
            light,
            render_data,
            renderer,
        }
    }

    /// Generates a world from configuration and wraps it in an engine state
    ///
    /// # Errors
    /// [`crate::error::VoxelError::DimensionMismatch`] if the configured world
    /// has an empty or oversized axis.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let registry = config.block_registry();
        let (size, data) = terrain::generate_terrain(&config.world)?;
        let world = VoxelGrid::from_flat(size, &data)?;
        Ok(Self::new(world, registry, WorldRenderer::from_config(config)))
    }

    /// Creates an all-air world of the given size
    pub fn empty(section_counts: Vector3<usize>, config: &EngineConfig) -> Result<Self> {
        let world = VoxelGrid::empty(section_counts)?;
        Ok(Self::new(
            world,
            config.block_registry(),
            WorldRenderer::from_config(config),
        ))
    }

    /// The voxel world
    pub fn world(&self) -> &VoxelGrid {
        &self.world
    }

    /// The block registry
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// The sky light map
    pub fn light(&self) -> &LightHeightMap {
        &self.light
    }

    /// The per-section render caches
    pub fn render_data(&self) -> &WorldRenderData {
        &self.render_data
    }

    /// Gets the block at a world position
    pub fn get_block(&self, position: Point3<i32>) -> Option<BlockId> {
        self.world.get_block_id(position)
    }

    /// Changes one block and invalidates everything that depends on it
    ///
    /// # Arguments
    ///
    /// * `position` - World block position
    /// * `id` - The new block id
    ///
    /// # Returns
    ///
    /// The previous block id. Writing the id a block already has changes nothing.
    pub fn set_block(&mut self, position: Point3<i32>, id: BlockId) -> Result<BlockId> {
        let previous = self.world.set_block_id(position, id)?;
        if previous == id {
            return Ok(previous);
        }

        let light_change =
            self.light
                .block_changed(&self.world, &self.registry, position, previous, id);

        self.render_data.invalidate_block(position);
        if let Some(change) = light_change {
            log::trace!(
                "Light at column ({}, {}) moved from {} to {}",
                position.x,
                position.z,
                change.previous,
                change.current
            );
            self.render_data
                .invalidate_light_change(position.x, position.z, change);
        }

        Ok(previous)
    }

    /// Renders one frame from a camera
    pub fn render_frame(&mut self, camera: &Camera, projection: &Projection) -> Result<RenderList> {
        self.render_frame_from(camera.position, &projection.view_projection(camera))
    }

    /// Renders one frame from an eye position and view-projection matrix
    pub fn render_frame_from(
        &mut self,
        camera_position: Point3<f32>,
        view_projection: &Matrix4<f32>,
    ) -> Result<RenderList> {
        self.renderer.render_frame(
            &self.world,
            &self.light,
            &self.registry,
            &mut self.render_data,
            camera_position,
            view_projection,
        )
    }
}
