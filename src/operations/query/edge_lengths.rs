use crate::error::Result;
use crate::math::{Point2, Point3};
use crate::mesh::{FaceId, MeshStore, UvLayerId};

/// Per-edge lengths of one face, in 3D and in UV space.
///
/// Entry `i` is the edge from corner `i` to corner `i + 1`, wrapping from the
/// last corner back to the first. Both lists are empty when the face cannot
/// be measured (fewer than three corners, or missing UV data).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeLengthPair {
    /// Euclidean edge lengths in world space.
    pub length_3d: Vec<f64>,
    /// Euclidean edge lengths in UV space.
    pub length_uv: Vec<f64>,
}

impl EdgeLengthPair {
    /// Returns `true` if the face could not be measured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length_3d.is_empty() || self.length_uv.is_empty()
    }

    /// Returns `true` if both lists are non-empty and index-aligned.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        !self.is_empty() && self.length_3d.len() == self.length_uv.len()
    }
}

/// Measures the edges of a polygon given its corner positions and UVs.
#[must_use]
pub fn edge_lengths(points: &[Point3], uvs: &[Point2]) -> EdgeLengthPair {
    let n = points.len();
    if n < 3 || uvs.len() != n {
        return EdgeLengthPair::default();
    }
    let length_3d = (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .collect();
    let length_uv = (0..n).map(|i| (uvs[(i + 1) % n] - uvs[i]).norm()).collect();
    EdgeLengthPair {
        length_3d,
        length_uv,
    }
}

/// Measures the edges of a face in the given UV layer.
pub struct EdgeLengths {
    face: FaceId,
    layer: UvLayerId,
}

impl EdgeLengths {
    /// Creates a new `EdgeLengths` query.
    #[must_use]
    pub fn new(face: FaceId, layer: UvLayerId) -> Self {
        Self { face, layer }
    }

    /// Executes the query.
    ///
    /// A face without UV data in the layer yields an empty pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or the layer is not found.
    pub fn execute(&self, store: &MeshStore) -> Result<EdgeLengthPair> {
        let Some(uvs) = store.face_uvs(self.face, self.layer)? else {
            return Ok(EdgeLengthPair::default());
        };
        let points = store.face_points(self.face)?;
        Ok(edge_lengths(&points, &uvs))
    }
}
