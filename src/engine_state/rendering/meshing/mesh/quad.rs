use cgmath::{EuclideanSpace, MetricSpace, Point3};

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::rendering::Vertex;

/// A single textured quad in section-local space.
///
/// The four vertices are stored in lower-left, lower-right, upper-left,
/// upper-right order. Seen from the front, ll -> lr -> ur is counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Corners in ll, lr, ul, ur order
    pub vertices: [Vertex; 4],
    /// Centroid, used to order translucent quads by distance
    pub center: Point3<f32>,
}

impl Quad {
    /// Creates a quad from its corners.
    ///
    /// # Arguments
    /// * `corners` - Section-local corners in ll, lr, ul, ur order
    /// * `texture_index` - Texture array index for the whole quad
    /// * `uv_extent` - Texture repeat along the quad's width and height
    /// * `shade` - Brightness multiplier applied to every corner
    pub fn new(corners: [Point3<f32>; 4], texture_index: u32, uv_extent: (f32, f32), shade: f32) -> Self {
        let (u, v) = uv_extent;
        let [ll, lr, ul, ur] = corners;

        Quad {
            vertices: [
                Vertex::new(ll, texture_index, 0.0, v, shade),
                Vertex::new(lr, texture_index, u, v, shade),
                Vertex::new(ul, texture_index, 0.0, 0.0, shade),
                Vertex::new(ur, texture_index, u, 0.0, shade),
            ],
            center: Point3::centroid(&corners),
        }
    }

    /// The same quad facing the other way.
    pub fn flipped(&self) -> Self {
        let [ll, lr, ul, ur] = self.vertices;
        Quad {
            vertices: [lr, ll, ur, ul],
            center: self.center,
        }
    }

    /// Squared distance from the centroid to a section-local point.
    #[inline]
    pub fn distance_squared(&self, point: Point3<f32>) -> f32 {
        self.center.distance2(point)
    }
}

/// Corners of one face of the axis-aligned box `min..max`, in ll, lr, ul, ur
/// order, wound counter-clockwise when seen from outside the box.
pub fn box_face_corners(side: BlockSide, min: Point3<f32>, max: Point3<f32>) -> [Point3<f32>; 4] {
    let p = |x: bool, y: bool, z: bool| {
        Point3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };

    match side {
        BlockSide::RIGHT => [p(true, false, true), p(true, false, false), p(true, true, true), p(true, true, false)],
        BlockSide::LEFT => [p(false, false, false), p(false, false, true), p(false, true, false), p(false, true, true)],
        BlockSide::FRONT => [p(false, false, true), p(true, false, true), p(false, true, true), p(true, true, true)],
        BlockSide::BACK => [p(true, false, false), p(false, false, false), p(true, true, false), p(false, true, false)],
        BlockSide::TOP => [p(false, true, true), p(true, true, true), p(false, true, false), p(true, true, false)],
        BlockSide::BOTTOM => [p(false, false, false), p(true, false, false), p(false, false, true), p(true, false, true)],
    }
}
