/// Integration tests for the frame traversal
/// These tests drive whole frames through the public API and check what ends up
/// visited, drawn and meshed.
use std::collections::HashSet;

use cgmath::{Deg, Point3, Vector3};
use section_renderer::config::EngineConfig;
use section_renderer::engine_state::camera_state::{Camera, Projection};
use section_renderer::engine_state::rendering::meshing::SectionMesh;
use section_renderer::engine_state::rendering::{
    RenderList, SectionVisibility, WorldRenderData, WorldRenderer,
};
use section_renderer::engine_state::voxels::block::{ids, BlockRegistry};
use section_renderer::engine_state::voxels::light::LightHeightMap;
use section_renderer::engine_state::voxels::world::VoxelGrid;
use section_renderer::engine_state::EngineState;
use web_time::Duration;

struct Scene {
    grid: VoxelGrid,
    registry: BlockRegistry,
    render_data: WorldRenderData,
    renderer: WorldRenderer,
}

impl Scene {
    fn new(grid: VoxelGrid, budget: Duration, view_distance: u32) -> Self {
        let render_data = WorldRenderData::new(&grid);
        Scene {
            grid,
            registry: BlockRegistry::default(),
            render_data,
            renderer: WorldRenderer::new(budget, view_distance),
        }
    }

    fn frame(&mut self, camera: &Camera) -> RenderList {
        let light = LightHeightMap::new(&self.grid, &self.registry);
        let projection = Projection::new(1, 1, Deg(90.0), 0.1, 1000.0);
        self.renderer
            .render_frame(
                &self.grid,
                &light,
                &self.registry,
                &mut self.render_data,
                camera.position,
                &projection.view_projection(camera),
            )
            .unwrap()
    }
}

/// A world with one stone block in the middle of every section, so every
/// section that is drawn has opaque geometry and stays fully connected.
fn sparse_stone_world(section_counts: Vector3<usize>) -> VoxelGrid {
    let mut grid = VoxelGrid::empty(section_counts).unwrap();
    let sections: Vec<_> = grid.section_coords().collect();
    for section in sections {
        let center = section * 16 + Vector3::new(8, 8, 8);
        grid.set_block_id(center, ids::STONE).unwrap();
    }
    grid
}

fn mark_all_current(render_data: &mut WorldRenderData, grid: &VoxelGrid) {
    for section in grid.section_coords() {
        let data = render_data.get_mut(section).unwrap();
        data.set_visibility(SectionVisibility::all());
        data.set_mesh(SectionMesh::default());
    }
}

#[test]
fn test_frustum_limits_drawn_sections_to_the_view_direction() {
    let mut scene = Scene::new(
        sparse_stone_world(Vector3::new(8, 3, 3)),
        Duration::from_secs(60),
        4,
    );
    // Section (2, 1, 1), looking along +X.
    let camera = Camera::new(Point3::new(32.5, 24.0, 24.0), Deg(0.0), Deg(0.0));

    let list = scene.frame(&camera);

    assert_eq!(list.visited[0], Point3::new(2, 1, 1));
    for x in 2..=6 {
        assert!(
            list.opaque.contains(&Point3::new(x, 1, 1)),
            "section ({x}, 1, 1) ahead of the camera is not drawn"
        );
    }
    for section in &list.opaque {
        assert!(section.x >= 2, "section {section:?} behind the camera is drawn");
        assert!(section.x <= 6, "section {section:?} beyond the view distance is drawn");
    }
    assert!(list.stats.culled > 0);
    assert!(list.translucent.is_empty());
}

#[test]
fn test_no_section_is_visited_twice() {
    let mut scene = Scene::new(
        sparse_stone_world(Vector3::new(4, 4, 4)),
        Duration::from_secs(60),
        8,
    );
    let camera = Camera::new(Point3::new(30.0, 30.0, 30.0), Deg(30.0), Deg(-20.0));

    let list = scene.frame(&camera);

    let unique: HashSet<_> = list.visited.iter().copied().collect();
    assert_eq!(unique.len(), list.visited.len());
    assert_eq!(list.stats.visited, list.visited.len());
    assert_eq!(list.visited[0], Point3::new(1, 1, 1));
}

#[test]
fn test_solid_wall_hides_the_section_behind_it() {
    let mut grid = VoxelGrid::empty(Vector3::new(3, 1, 1)).unwrap();
    for x in 16..32 {
        for y in 0..16 {
            for z in 0..16 {
                grid.set_block_id(Point3::new(x, y, z), ids::STONE).unwrap();
            }
        }
    }
    let mut scene = Scene::new(grid, Duration::from_secs(60), 8);
    let camera = Camera::new(Point3::new(8.0, 8.0, 8.0), Deg(0.0), Deg(0.0));

    let list = scene.frame(&camera);

    assert!(list.visited.contains(&Point3::new(1, 0, 0)));
    assert!(list.opaque.contains(&Point3::new(1, 0, 0)));
    assert!(!list.visited.contains(&Point3::new(2, 0, 0)));
    assert!(!list.opaque.contains(&Point3::new(2, 0, 0)));
}

#[test]
fn test_tunnel_through_wall_reveals_the_far_section() {
    let mut grid = VoxelGrid::empty(Vector3::new(3, 1, 1)).unwrap();
    for x in 16..32 {
        for y in 0..16 {
            for z in 0..16 {
                if y == 8 && z == 8 {
                    continue;
                }
                grid.set_block_id(Point3::new(x, y, z), ids::STONE).unwrap();
            }
        }
    }
    grid.set_block_id(Point3::new(40, 8, 8), ids::STONE).unwrap();
    let mut scene = Scene::new(grid, Duration::from_secs(60), 8);
    let camera = Camera::new(Point3::new(8.0, 8.5, 8.5), Deg(0.0), Deg(0.0));

    let list = scene.frame(&camera);

    assert!(list.visited.contains(&Point3::new(2, 0, 0)));
    assert!(list.opaque.contains(&Point3::new(2, 0, 0)));
}

#[test]
fn test_zero_budget_defers_all_meshing() {
    let mut scene = Scene::new(
        sparse_stone_world(Vector3::new(4, 2, 4)),
        Duration::ZERO,
        8,
    );
    let camera = Camera::new(Point3::new(8.0, 8.0, 8.0), Deg(45.0), Deg(0.0));

    let list = scene.frame(&camera);

    assert!(list.stats.budget_exhausted);
    assert_eq!(list.stats.meshed, 0);
    assert!(list.uploads.is_empty());
    assert!(list.opaque.is_empty());
    assert_eq!(list.stats.deferred, list.stats.visited - list.stats.culled);
    assert!(list.stats.deferred > 0);
}

#[test]
fn test_ample_budget_meshes_every_drawn_section() {
    let mut scene = Scene::new(
        sparse_stone_world(Vector3::new(4, 2, 4)),
        Duration::from_secs(60),
        8,
    );
    let camera = Camera::new(Point3::new(8.0, 8.0, 8.0), Deg(45.0), Deg(0.0));

    let list = scene.frame(&camera);

    assert!(!list.stats.budget_exhausted);
    assert_eq!(list.stats.deferred, 0);
    assert_eq!(list.stats.meshed, list.stats.visited - list.stats.culled);
    assert_eq!(list.opaque.len(), list.stats.meshed);
    assert_eq!(list.uploads.len(), list.stats.meshed);

    // Nothing changed, nothing to do.
    let again = scene.frame(&camera);
    assert_eq!(again.stats.meshed, 0);
    assert!(again.uploads.is_empty());
    assert_eq!(again.opaque, list.opaque);
}

#[test]
fn test_deferred_meshes_catch_up_once_budget_returns() {
    let mut scene = Scene::new(
        sparse_stone_world(Vector3::new(2, 1, 2)),
        Duration::ZERO,
        8,
    );
    let camera = Camera::new(Point3::new(4.0, 8.0, 4.0), Deg(45.0), Deg(0.0));

    let starved = scene.frame(&camera);
    assert_eq!(starved.stats.meshed, 0);

    scene.renderer.set_meshing_budget(Duration::from_secs(60));
    let fed = scene.frame(&camera);
    assert_eq!(fed.stats.meshed, starved.stats.deferred);
    assert_eq!(fed.stats.deferred, 0);
}

#[test]
fn test_edit_only_remeshes_the_touched_section() {
    let grid = sparse_stone_world(Vector3::new(3, 1, 3));
    let mut scene = Scene::new(grid, Duration::from_secs(60), 8);
    mark_all_current(&mut scene.render_data, &scene.grid);

    scene.grid.set_block_id(Point3::new(24, 4, 24), ids::DIRT).unwrap();
    scene.render_data.invalidate_block(Point3::new(24, 4, 24));

    let camera = Camera::new(Point3::new(4.0, 8.0, 4.0), Deg(45.0), Deg(0.0));
    let list = scene.frame(&camera);

    assert_eq!(list.stats.meshed, 1);
    assert_eq!(list.uploads[0].section, Point3::new(1, 0, 1));
}

#[test]
fn test_light_height_follows_edits_through_engine_state() {
    let mut state =
        EngineState::empty(Vector3::new(1, 2, 1), &EngineConfig::default()).unwrap();

    state.set_block(Point3::new(3, 4, 3), ids::STONE).unwrap();
    assert_eq!(state.light().height(3, 3), Some(5));

    state.set_block(Point3::new(3, 10, 3), ids::STONE).unwrap();
    assert_eq!(state.light().height(3, 3), Some(11));

    // Glass lets light through, so it never moves the height.
    state.set_block(Point3::new(3, 20, 3), ids::GLASS).unwrap();
    assert_eq!(state.light().height(3, 3), Some(11));

    state.set_block(Point3::new(3, 10, 3), ids::GLASS).unwrap();
    assert_eq!(state.light().height(3, 3), Some(5));
    assert!(state.light().is_lit(3, 5, 3));
    assert!(!state.light().is_lit(3, 4, 3));
}

#[test]
fn test_light_change_invalidates_every_section_it_spans() {
    let mut grid = VoxelGrid::empty(Vector3::new(1, 2, 1)).unwrap();
    let registry = BlockRegistry::default();
    let mut light = LightHeightMap::new(&grid, &registry);
    let mut render_data = WorldRenderData::new(&grid);

    grid.set_block_id(Point3::new(3, 4, 3), ids::STONE).unwrap();
    light.block_changed(&grid, &registry, Point3::new(3, 4, 3), 0, ids::STONE);
    mark_all_current(&mut render_data, &grid);

    grid.set_block_id(Point3::new(3, 20, 3), ids::STONE).unwrap();
    let change = light
        .block_changed(&grid, &registry, Point3::new(3, 20, 3), 0, ids::STONE)
        .unwrap();
    assert_eq!((change.previous, change.current), (5, 21));

    render_data.invalidate_light_change(3, 3, change);
    let outdated: Vec<_> = render_data.outdated_sections().collect();
    assert_eq!(outdated, vec![Point3::new(0, 0, 0), Point3::new(0, 1, 0)]);
}

#[test]
fn test_engine_state_frame_draws_generated_terrain() {
    let mut config = EngineConfig::default();
    config.world.section_counts = [3, 2, 3];
    config.meshing_budget_ms = 60_000.0;
    let mut state = EngineState::from_config(&config).unwrap();

    let camera = Camera::new(Point3::new(24.0, 30.0, 24.0), Deg(45.0), Deg(-30.0));
    let projection = Projection::new(16, 9, Deg(70.0), 0.1, 1000.0);
    let list = state.render_frame(&camera, &projection).unwrap();

    assert_eq!(list.visited[0], Point3::new(1, 1, 1));
    assert!(!list.opaque.is_empty());
    assert_eq!(list.stats.deferred, 0);
}
