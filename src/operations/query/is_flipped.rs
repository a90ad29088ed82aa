use crate::error::Result;
use crate::math::polygon_2d::triangle_orientation_2d;
use crate::math::polygon_3d::polygon_unit_normal;
use crate::math::{Point2, Point3};
use crate::mesh::{FaceId, MeshStore, UvLayerId};
use crate::operations::analysis::FLIP_EPSILON;

/// Returns `true` if the UV mapping of a polygon is mirrored.
///
/// Only the first three corners are examined: the orientation of that
/// corner triangle relative to the face normal is compared with its
/// orientation in UV space. Near-zero areas on either side report `false`.
#[must_use]
pub fn is_flipped(points: &[Point3], uvs: &[Point2], epsilon: f64) -> bool {
    if points.len() < 3 || uvs.len() != points.len() {
        return false;
    }
    let Some(normal) = polygon_unit_normal(points) else {
        return false;
    };
    let area_3d = (points[1] - points[0])
        .cross(&(points[2] - points[0]))
        .dot(&normal);
    let area_uv = triangle_orientation_2d(&uvs[0], &uvs[1], &uvs[2]);
    if area_3d.abs() < epsilon || area_uv.abs() < epsilon {
        return false;
    }
    area_3d.signum() != area_uv.signum()
}

/// Tests whether one face has a mirrored UV mapping.
pub struct IsFlipped {
    face: FaceId,
    layer: UvLayerId,
    epsilon: f64,
}

impl IsFlipped {
    /// Creates a new `IsFlipped` query.
    #[must_use]
    pub fn new(face: FaceId, layer: UvLayerId) -> Self {
        Self {
            face,
            layer,
            epsilon: FLIP_EPSILON,
        }
    }

    /// Sets the degenerate-area threshold.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Executes the query. A face without UV data is never flipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or layer is not found.
    pub fn execute(&self, store: &MeshStore) -> Result<bool> {
        let Some(uvs) = store.face_uvs(self.face, self.layer)? else {
            return Ok(false);
        };
        Ok(is_flipped(&store.face_points(self.face)?, &uvs, self.epsilon))
    }
}
