//! # Render Traversal
//!
//! Decides, every frame, which sections are drawn and keeps their cached
//! geometry fresh.
//!
//! ## Algorithm
//!
//! A breadth-first search starts at the camera's section and expands through
//! section faces. A section is only left through a face that its cached
//! visibility connects to the face it was entered through, and never back
//! toward a direction the path already came from. Sections outside the view
//! frustum or beyond the view distance are dead ends: they are neither drawn
//! nor expanded.
//!
//! ## Meshing Budget
//!
//! Mesh regeneration and translucent sorting share a per-frame wall-clock
//! budget. Once it is spent, the remaining sections keep drawing whatever they
//! cached last and their work is deferred to a later frame. Stale geometry is
//! never an error.
//!
//! ## Output
//!
//! The traversal returns a [`RenderList`]: opaque sections front to back,
//! translucent sections back to front, and the buffer uploads the GPU layer has
//! to perform before drawing.

use std::collections::VecDeque;

use bitvec::vec::BitVec;
use cgmath::{Matrix4, Point3};
use web_time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::engine_state::camera_state::{section_containing, Frustum};
use crate::engine_state::voxels::{
    block::{
        block_side::{BlockSide, FaceSet},
        BlockRegistry,
    },
    chunk::SECTION_DIMENSION,
    light::LightHeightMap,
    world::{section_origin, VoxelGrid},
};
use crate::error::Result;

use super::meshing::{generate_section_mesh, MeshContext};
use super::render_data::WorldRenderData;
use super::visibility::SectionFloodFill;

/// One of the two geometry layers of a section.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    /// Opaque geometry, drawn first
    Opaque,
    /// Translucent geometry, drawn back to front after the opaque pass
    Translucent,
}

/// A request to (re)upload one layer of a section to the GPU.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeshUpload {
    /// Section whose layer changed
    pub section: Point3<i32>,
    /// Which layer changed
    pub layer: RenderLayer,
}

/// Counters describing one traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Sections popped from the frontier and processed
    pub visited: usize,
    /// Visited sections rejected by the frustum or the view distance
    pub culled: usize,
    /// Sections whose connectivity was recomputed
    pub visibility_rebuilt: usize,
    /// Sections whose mesh was regenerated
    pub meshed: usize,
    /// Sections whose translucent layer was re-sorted
    pub sorted: usize,
    /// Sections whose mesh or sort work was pushed to a later frame
    pub deferred: usize,
    /// Whether the meshing budget ran out during the frame
    pub budget_exhausted: bool,
}

/// The result of one traversal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderList {
    /// Sections with opaque geometry, in visit order (near to far)
    pub opaque: Vec<Point3<i32>>,
    /// Sections with translucent geometry, far to near
    pub translucent: Vec<Point3<i32>>,
    /// Layers to upload before drawing
    pub uploads: Vec<MeshUpload>,
    /// Every visited section, in visit order
    pub visited: Vec<Point3<i32>>,
    /// Frame counters
    pub stats: TraversalStats,
}

/// A frontier entry.
#[derive(Copy, Clone, Debug)]
struct Node {
    coord: Point3<i32>,
    /// Face of this section the path entered through; `None` for the root
    entry: Option<BlockSide>,
    /// Directions pointing back along the path
    backwards: FaceSet,
}

/// Per-frame visibility traversal and budgeted mesh maintenance.
///
/// Scratch buffers are reused from frame to frame.
pub struct WorldRenderer {
    meshing_budget: Duration,
    view_distance: u32,
    flood_fill: SectionFloodFill,
    visited: BitVec,
    frontier: VecDeque<Node>,
}

impl WorldRenderer {
    /// Creates a renderer.
    ///
    /// # Arguments
    /// * `meshing_budget` - Wall-clock cap on mesh work per frame
    /// * `view_distance` - Farthest section, in sections along any axis, that is visited
    pub fn new(meshing_budget: Duration, view_distance: u32) -> Self {
        WorldRenderer {
            meshing_budget,
            view_distance,
            flood_fill: SectionFloodFill::new(),
            visited: BitVec::new(),
            frontier: VecDeque::new(),
        }
    }

    /// Creates a renderer from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.meshing_budget(), config.view_distance)
    }

    /// Current meshing budget.
    pub fn meshing_budget(&self) -> Duration {
        self.meshing_budget
    }

    /// Changes the meshing budget for following frames.
    pub fn set_meshing_budget(&mut self, meshing_budget: Duration) {
        self.meshing_budget = meshing_budget;
    }

    /// Current view distance in sections.
    pub fn view_distance(&self) -> u32 {
        self.view_distance
    }

    /// The section the traversal starts from: the camera's section, clamped
    /// into the world.
    pub fn root_section(grid: &VoxelGrid, camera_position: Point3<f32>) -> Point3<i32> {
        let section = section_containing(camera_position);
        let counts = grid.section_counts();

        Point3::new(
            section.x.clamp(0, counts.x as i32 - 1),
            section.y.clamp(0, counts.y as i32 - 1),
            section.z.clamp(0, counts.z as i32 - 1),
        )
    }

    /// Runs one frame: finds the visible sections and refreshes their meshes
    /// within the budget.
    ///
    /// # Arguments
    /// * `grid` - The world
    /// * `light` - Sky light, used for shading
    /// * `registry` - Block definitions
    /// * `render_data` - Per-section caches, updated in place
    /// * `camera_position` - Eye position in world space
    /// * `view_projection` - Combined view-projection matrix of the camera
    ///
    /// # Errors
    /// Propagates mesh generation failures.
    pub fn render_frame(
        &mut self,
        grid: &VoxelGrid,
        light: &LightHeightMap,
        registry: &BlockRegistry,
        render_data: &mut WorldRenderData,
        camera_position: Point3<f32>,
        view_projection: &Matrix4<f32>,
    ) -> Result<RenderList> {
        let start = Instant::now();
        let frustum = Frustum::from_view_projection(view_projection);
        let root = Self::root_section(grid, camera_position);
        let view_distance = self.view_distance as i32;

        let mut list = RenderList::default();
        let mut budget_exhausted = false;

        self.visited.clear();
        self.visited.resize(grid.section_count(), false);
        self.frontier.clear();
        self.frontier.push_back(Node {
            coord: root,
            entry: None,
            backwards: FaceSet::empty(),
        });

        while let Some(node) = self.frontier.pop_front() {
            let Some(index) = grid.section_index(node.coord) else {
                continue;
            };
            if self.visited[index] {
                continue;
            }
            self.visited.set(index, true);
            list.visited.push(node.coord);
            list.stats.visited += 1;

            let is_root = node.coord == root;
            if !is_root {
                let offset = node.coord - root;
                let distance = offset.x.abs().max(offset.y.abs()).max(offset.z.abs());
                let origin = section_origin(node.coord);
                let min = Point3::new(origin.x as f32, origin.y as f32, origin.z as f32);
                let max = Point3::new(
                    min.x + SECTION_DIMENSION as f32,
                    min.y + SECTION_DIMENSION as f32,
                    min.z + SECTION_DIMENSION as f32,
                );

                if distance > view_distance || !frustum.intersects_aabb(min, max) {
                    list.stats.culled += 1;
                    continue;
                }
            }

            let Some(data) = render_data.get_mut(node.coord) else {
                debug_assert!(false, "render data does not match the world");
                continue;
            };

            if data.is_visibility_outdated() {
                data.set_visibility(self.flood_fill.compute(grid, registry, node.coord));
                list.stats.visibility_rebuilt += 1;
            }

            let visibility = data.visibility();
            for side in BlockSide::all() {
                if node.backwards.contains(side) {
                    continue;
                }
                let open = match node.entry {
                    None => true,
                    Some(entry) => visibility.is_visible(entry, side),
                };
                if !open {
                    continue;
                }

                let neighbor = node.coord + side.offset();
                let unvisited = grid
                    .section_index(neighbor)
                    .is_some_and(|neighbor_index| !self.visited[neighbor_index]);
                if unvisited {
                    self.frontier.push_back(Node {
                        coord: neighbor,
                        entry: Some(side.opposite()),
                        backwards: node.backwards.with(side.opposite()),
                    });
                }
            }

            if !budget_exhausted && start.elapsed() >= self.meshing_budget {
                budget_exhausted = true;
            }

            let needs_work =
                data.is_mesh_outdated() || data.needs_sort(camera_position);
            if budget_exhausted {
                if needs_work {
                    list.stats.deferred += 1;
                }
            } else {
                if data.is_mesh_outdated() {
                    let ctx = MeshContext::new(grid, light, registry, node.coord)?;
                    data.set_mesh(generate_section_mesh(&ctx)?);
                    list.uploads.push(MeshUpload {
                        section: node.coord,
                        layer: RenderLayer::Opaque,
                    });
                    list.stats.meshed += 1;
                }

                if data.needs_sort(camera_position) {
                    data.sort_translucent(node.coord, camera_position)?;
                    list.uploads.push(MeshUpload {
                        section: node.coord,
                        layer: RenderLayer::Translucent,
                    });
                    list.stats.sorted += 1;
                }
            }

            if data.has_opaque() {
                list.opaque.push(node.coord);
            }
            if data.has_translucent() {
                list.translucent.push(node.coord);
            }
        }

        list.translucent.reverse();
        list.stats.budget_exhausted = budget_exhausted;

        if list.stats.deferred > 0 {
            log::info!(
                "Meshing budget of {:?} exhausted, deferred {} sections",
                self.meshing_budget,
                list.stats.deferred
            );
        }
        log::debug!(
            "Frame from {:?}: visited {}, culled {}, meshed {}, sorted {}, drawing {} opaque / {} translucent in {:?}",
            root,
            list.stats.visited,
            list.stats.culled,
            list.stats.meshed,
            list.stats.sorted,
            list.opaque.len(),
            list.translucent.len(),
            start.elapsed()
        );

        Ok(list)
    }
}
