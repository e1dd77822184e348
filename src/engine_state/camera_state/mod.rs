//! # Camera State Management
//!
//! This module handles camera-related functionality:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - View frustum extraction and box culling for the render traversal
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages the camera's projection matrix
//! - `Frustum`: Six clip planes extracted from a view-projection matrix

use cgmath::{InnerSpace, Matrix, Matrix4, Point3, Vector4};

pub mod camera;

pub use camera::{section_containing, Camera, Projection};

/// View frustum represented as 6 planes for AABB culling.
///
/// Planes are stored as `ax + by + cz + d = 0` with `(a, b, c)` pointing into
/// the frustum, so a point is inside when every plane evaluates non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// 6 planes: left, right, bottom, top, near, far
    pub planes: [Vector4<f32>; 6],
}

impl Frustum {
    /// Extracts the frustum planes from a view-projection matrix
    /// (Gribb-Hartmann).
    pub fn from_view_projection(view_projection: &Matrix4<f32>) -> Self {
        let row0 = view_projection.row(0);
        let row1 = view_projection.row(1);
        let row2 = view_projection.row(2);
        let row3 = view_projection.row(3);

        Self {
            planes: [
                Self::normalize_plane(row3 + row0),
                Self::normalize_plane(row3 - row0),
                Self::normalize_plane(row3 + row1),
                Self::normalize_plane(row3 - row1),
                Self::normalize_plane(row3 + row2),
                Self::normalize_plane(row3 - row2),
            ],
        }
    }

    #[inline]
    fn normalize_plane(plane: Vector4<f32>) -> Vector4<f32> {
        let normal_length = plane.truncate().magnitude();
        if normal_length > 0.0001 {
            plane / normal_length
        } else {
            plane
        }
    }

    /// Whether an axis-aligned box is at least partially inside the frustum.
    ///
    /// Conservative: boxes near frustum corners may pass without being
    /// visible, but no visible box is rejected.
    pub fn intersects_aabb(&self, min: Point3<f32>, max: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| {
            // Corner furthest along the plane normal.
            let p_vertex = Point3::new(
                if plane.x > 0.0 { max.x } else { min.x },
                if plane.y > 0.0 { max.y } else { min.y },
                if plane.z > 0.0 { max.z } else { min.z },
            );
            plane.x * p_vertex.x + plane.y * p_vertex.y + plane.z * p_vertex.z + plane.w >= 0.0
        })
    }
}
