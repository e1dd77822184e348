//! Cached render state per section, and the rules that decide which cached
//! state goes stale when the world changes.
//!
//! Every section carries two independent dirty flags:
//! - *mesh outdated*: the geometry must be regenerated. Set by block edits in
//!   the section or touching its border, and by light changes in nearby columns.
//! - *visibility outdated*: the face connectivity must be recomputed. Set only
//!   by block edits inside the section itself.
//!
//! Flags are cleared by the render traversal when it does the work.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{
    chunk::SECTION_DIMENSION,
    light::LightChange,
    world::{section_arena_index, section_origin, split_block_position, VoxelGrid},
};
use crate::error::Result;

use super::meshing::{sort_back_to_front, MeshLayer, Quad, SectionMesh};
use super::visibility::SectionVisibility;

/// Cached render state of one section.
#[derive(Clone, Debug)]
pub struct SectionRenderData {
    /// Opaque geometry, ready for upload
    pub opaque: MeshLayer,
    /// Translucent geometry in the order of the last sort
    pub translucent: MeshLayer,
    /// Translucent quads as generated
    translucent_quads: Vec<Quad>,
    /// Cached face connectivity
    visibility: SectionVisibility,
    mesh_outdated: bool,
    visibility_outdated: bool,
    /// Camera position the translucent layer was last sorted for
    sorted_for: Option<Point3<f32>>,
}

impl SectionRenderData {
    /// Fresh render data with everything outdated.
    pub fn new() -> Self {
        SectionRenderData {
            opaque: MeshLayer::default(),
            translucent: MeshLayer::default(),
            translucent_quads: Vec::new(),
            visibility: SectionVisibility::none(),
            mesh_outdated: true,
            visibility_outdated: true,
            sorted_for: None,
        }
    }

    /// Whether the mesh must be regenerated.
    pub fn is_mesh_outdated(&self) -> bool {
        self.mesh_outdated
    }

    /// Whether the face connectivity must be recomputed.
    pub fn is_visibility_outdated(&self) -> bool {
        self.visibility_outdated
    }

    /// Cached face connectivity. Meaningless while outdated.
    pub fn visibility(&self) -> SectionVisibility {
        self.visibility
    }

    /// Marks the mesh for regeneration.
    pub fn mark_mesh_outdated(&mut self) {
        self.mesh_outdated = true;
    }

    /// Marks the face connectivity for recomputation.
    pub fn mark_visibility_outdated(&mut self) {
        self.visibility_outdated = true;
    }

    /// Stores freshly computed face connectivity.
    pub fn set_visibility(&mut self, visibility: SectionVisibility) {
        self.visibility = visibility;
        self.visibility_outdated = false;
    }

    /// Stores a freshly generated mesh. The translucent layer is left for
    /// [`SectionRenderData::sort_translucent`] to rebuild.
    pub fn set_mesh(&mut self, mesh: SectionMesh) {
        self.opaque = mesh.opaque;
        self.translucent_quads = mesh.translucent_quads;
        self.sorted_for = None;
        self.mesh_outdated = false;
    }

    /// Whether the translucent layer must be re-sorted for a camera at
    /// `camera_position`.
    pub fn needs_sort(&self, camera_position: Point3<f32>) -> bool {
        self.sorted_for != Some(camera_position)
            && !(self.translucent_quads.is_empty() && self.translucent.is_empty())
    }

    /// Sorts the translucent quads back to front as seen from
    /// `camera_position` (world space) and rebuilds the translucent layer.
    pub fn sort_translucent(
        &mut self,
        section: Point3<i32>,
        camera_position: Point3<f32>,
    ) -> Result<()> {
        let origin = section_origin(section);
        let eye = camera_position
            - Vector3::new(origin.x as f32, origin.y as f32, origin.z as f32);

        sort_back_to_front(&mut self.translucent_quads, eye);
        self.translucent = MeshLayer::from_quads(section, self.translucent_quads.iter())?;
        self.sorted_for = Some(camera_position);
        Ok(())
    }

    /// Whether there is opaque geometry to draw.
    pub fn has_opaque(&self) -> bool {
        !self.opaque.is_empty()
    }

    /// Whether there is translucent geometry to draw.
    pub fn has_translucent(&self) -> bool {
        !self.translucent.is_empty()
    }
}

impl Default for SectionRenderData {
    fn default() -> Self {
        Self::new()
    }
}

/// Render data for every section of a world, indexed like the world's arena.
#[derive(Clone, Debug)]
pub struct WorldRenderData {
    sections: Vec<SectionRenderData>,
    section_counts: Vector3<usize>,
}

impl WorldRenderData {
    /// Creates outdated render data for every section of `grid`.
    pub fn new(grid: &VoxelGrid) -> Self {
        WorldRenderData {
            sections: vec![SectionRenderData::new(); grid.section_count()],
            section_counts: grid.section_counts(),
        }
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render data of a section, or `None` outside the world.
    pub fn get(&self, section: Point3<i32>) -> Option<&SectionRenderData> {
        section_arena_index(self.section_counts, section).map(|index| &self.sections[index])
    }

    /// Mutable render data of a section, or `None` outside the world.
    pub fn get_mut(&mut self, section: Point3<i32>) -> Option<&mut SectionRenderData> {
        section_arena_index(self.section_counts, section).map(move |index| &mut self.sections[index])
    }

    fn mark_mesh_outdated(&mut self, section: Point3<i32>) {
        if let Some(data) = self.get_mut(section) {
            data.mark_mesh_outdated();
        }
    }

    /// Invalidates everything a block edit at `position` can affect.
    ///
    /// The owning section loses its mesh and its connectivity. Neighbor
    /// sections sharing a face, edge or corner with the block lose their mesh.
    pub fn invalidate_block(&mut self, position: Point3<i32>) {
        let (section, local) = split_block_position(position);
        let Some(owner) = self.get_mut(section) else {
            return;
        };
        owner.mark_mesh_outdated();
        owner.mark_visibility_outdated();

        let last = (SECTION_DIMENSION - 1) as usize;
        let offsets = |coordinate: usize| -> Vec<i32> {
            let mut axis = vec![0];
            if coordinate == 0 {
                axis.push(-1);
            }
            if coordinate == last {
                axis.push(1);
            }
            axis
        };

        for dx in offsets(local.x) {
            for dy in offsets(local.y) {
                for dz in offsets(local.z) {
                    if (dx, dy, dz) != (0, 0, 0) {
                        self.mark_mesh_outdated(section + Vector3::new(dx, dy, dz));
                    }
                }
            }
        }
    }

    /// Invalidates meshes whose shading depends on the light of column
    /// `(x, z)` after its height changed.
    ///
    /// # Panics
    /// Panics if the change does not change anything.
    pub fn invalidate_light_change(&mut self, x: i32, z: i32, change: LightChange) {
        assert_ne!(
            change.previous, change.current,
            "light change at column ({x}, {z}) does not change the height"
        );

        let (low, high) = change.span();
        let first_section_y = (low - 1).div_euclid(SECTION_DIMENSION);
        let last_section_y = high.div_euclid(SECTION_DIMENSION);

        let columns = [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)];
        for (dx, dz) in columns {
            let section_x = (x + dx).div_euclid(SECTION_DIMENSION);
            let section_z = (z + dz).div_euclid(SECTION_DIMENSION);
            for section_y in first_section_y..=last_section_y {
                self.mark_mesh_outdated(Point3::new(section_x, section_y, section_z));
            }
        }
    }

    /// Coordinates of sections with any outdated state, in arena order.
    pub fn outdated_sections(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        let counts = self.section_counts;
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, data)| data.mesh_outdated || data.visibility_outdated)
            .map(move |(index, _)| {
                let x = index % counts.x;
                let z = (index / counts.x) % counts.z;
                let y = index / (counts.x * counts.z);
                Point3::new(x as i32, y as i32, z as i32)
            })
    }

    /// Marks every section current with empty geometry, so tests can observe
    /// exactly what an invalidation touches.
    #[cfg(test)]
    pub(crate) fn mark_all_current(&mut self) {
        for data in &mut self.sections {
            data.set_mesh(SectionMesh::default());
            data.set_visibility(SectionVisibility::all());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(section_counts: Vector3<usize>) -> WorldRenderData {
        let grid = VoxelGrid::empty(section_counts).unwrap();
        let mut data = WorldRenderData::new(&grid);
        data.mark_all_current();
        data
    }

    #[test]
    fn new_data_is_fully_outdated() {
        let grid = VoxelGrid::empty(Vector3::new(2, 1, 2)).unwrap();
        let data = WorldRenderData::new(&grid);
        assert_eq!(data.outdated_sections().count(), 4);
    }

    #[test]
    fn interior_edit_only_touches_its_section() {
        let mut data = fixture(Vector3::new(3, 3, 3));
        data.invalidate_block(Point3::new(20, 20, 20));

        let outdated: Vec<_> = data.outdated_sections().collect();
        assert_eq!(outdated, vec![Point3::new(1, 1, 1)]);
        let owner = data.get(Point3::new(1, 1, 1)).unwrap();
        assert!(owner.is_mesh_outdated() && owner.is_visibility_outdated());
    }

    #[test]
    fn corner_edit_touches_seven_neighbors() {
        let mut data = fixture(Vector3::new(3, 3, 3));
        data.invalidate_block(Point3::new(16, 16, 16));

        let outdated: Vec<_> = data.outdated_sections().collect();
        assert_eq!(outdated.len(), 8);
        for section in &outdated {
            assert!((0..=1).contains(&section.x));
            assert!((0..=1).contains(&section.y));
            assert!((0..=1).contains(&section.z));

            let entry = data.get(*section).unwrap();
            assert!(entry.is_mesh_outdated());
            assert_eq!(entry.is_visibility_outdated(), *section == Point3::new(1, 1, 1));
        }
    }

    #[test]
    fn neighbors_outside_the_world_are_skipped() {
        let mut data = fixture(Vector3::new(1, 1, 1));
        data.invalidate_block(Point3::new(0, 0, 0));
        assert_eq!(data.outdated_sections().count(), 1);

        // Edits outside the world invalidate nothing.
        let mut data = fixture(Vector3::new(1, 1, 1));
        data.invalidate_block(Point3::new(-1, 0, 0));
        assert_eq!(data.outdated_sections().count(), 0);
    }

    #[test]
    fn light_change_marks_column_and_face_neighbors() {
        let mut data = fixture(Vector3::new(3, 2, 3));
        data.invalidate_light_change(
            15,
            20,
            LightChange {
                previous: 5,
                current: 11,
            },
        );

        let outdated: Vec<_> = data.outdated_sections().collect();
        // Column x = 15 lives in section x = 0; its +x neighbor crosses into x = 1.
        assert_eq!(outdated, vec![Point3::new(0, 0, 1), Point3::new(1, 0, 1)]);
        for section in outdated {
            assert!(!data.get(section).unwrap().is_visibility_outdated());
        }
    }

    #[test]
    fn light_change_on_a_section_boundary_reaches_the_section_below() {
        let mut data = fixture(Vector3::new(1, 3, 1));
        data.invalidate_light_change(
            4,
            4,
            LightChange {
                previous: 16,
                current: 24,
            },
        );
        let outdated: Vec<_> = data.outdated_sections().collect();
        assert_eq!(outdated, vec![Point3::new(0, 0, 0), Point3::new(0, 1, 0)]);
    }

    #[test]
    #[should_panic(expected = "does not change the height")]
    fn empty_light_change_panics() {
        let mut data = fixture(Vector3::new(1, 1, 1));
        data.invalidate_light_change(
            0,
            0,
            LightChange {
                previous: 3,
                current: 3,
            },
        );
    }

    #[test]
    fn sorting_tracks_camera_position() {
        let mut entry = SectionRenderData::new();
        let camera = Point3::new(1.0, 2.0, 3.0);
        assert!(!entry.needs_sort(camera));

        let quad = Quad::new(
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            0,
            (1.0, 1.0),
            1.0,
        );
        entry.set_mesh(SectionMesh {
            opaque: MeshLayer::default(),
            translucent_quads: vec![quad, quad],
        });
        assert!(entry.needs_sort(camera));

        entry.sort_translucent(Point3::new(0, 0, 0), camera).unwrap();
        assert!(!entry.needs_sort(camera));
        assert!(entry.has_translucent());
        assert_eq!(entry.translucent.quad_count(), 2);
        assert!(entry.needs_sort(Point3::new(1.0, 2.0, 4.0)));
    }
}
